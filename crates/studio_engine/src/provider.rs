use crate::{ChatTurn, ImageReference, ImageStyle, ProviderError};

/// External generative capability: images from a name and a style, chat
/// replies from a transcript and a new message.
#[async_trait::async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate_image(
        &self,
        name: &str,
        style: ImageStyle,
    ) -> Result<ImageReference, ProviderError>;

    async fn send_chat_message(
        &self,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, ProviderError>;
}
