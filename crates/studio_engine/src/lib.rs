//! Studio engine: generation provider, async effect execution and image export.
mod engine;
mod export;
mod filename;
mod gemini;
mod prompt;
mod provider;
mod settings;
mod types;

pub use engine::{EngineError, EngineHandle};
pub use export::{export_image, ExportError};
pub use filename::asset_filename;
pub use gemini::GeminiProvider;
pub use prompt::{build_image_prompt, style_modifier, EMPTY_CHAT_REPLY, PHARMACIST_INSTRUCTION};
pub use provider::GenerationProvider;
pub use settings::ProviderSettings;
pub use types::{
    AssetId, ChatRole, ChatTurn, EngineEvent, ImageReference, ImageStyle, ProviderError,
    ProviderFailureKind, RequestId,
};
