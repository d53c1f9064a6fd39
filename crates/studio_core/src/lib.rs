//! Studio core: pure state machine and view-model helpers.
//!
//! All state lives in [`AppState`]. User intents and provider settlements are
//! [`Msg`]s; [`update`] applies one message and returns the [`Effect`]s the
//! caller must execute.
mod chat;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use chat::{ChatMessage, ChatRole, MessageId, CHAT_FALLBACK_REPLY, CHAT_GREETING};
pub use effect::{ChatTurn, Effect};
pub use msg::{ChatOutcome, GenerationOutcome, Msg};
pub use state::{AppState, AssetId, AssetStatus, AssetUnit, StylePreset, Ticket};
pub use update::update;
pub use view_model::{AppViewModel, AssetCardView, ChatLineView};
