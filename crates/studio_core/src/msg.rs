use chrono::{DateTime, Utc};

use crate::{AssetId, StylePreset, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the item list input.
    InputChanged(String),
    /// User picked a visual style for the next batch.
    StyleSelected(StylePreset),
    /// User submitted the current item list for generation.
    GenerateClicked,
    /// User asked to regenerate one asset.
    RetryClicked(AssetId),
    /// User emptied the gallery.
    ClearGalleryClicked,
    /// User sent a chat message.
    ChatSubmitted { text: String, at: DateTime<Utc> },
    /// An image generation call settled.
    GenerationDone {
        ticket: Ticket,
        asset_id: AssetId,
        outcome: GenerationOutcome,
    },
    /// A chat call settled.
    ChatReplied {
        ticket: Ticket,
        outcome: ChatOutcome,
        at: DateTime<Utc>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed { image_url: String },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Reply(String),
    Failed,
}
