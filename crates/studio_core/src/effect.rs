use crate::{AssetId, ChatRole, StylePreset, Ticket};

/// One prior transcript entry as sent to the chat provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run one image generation call; settles as `Msg::GenerationDone`.
    GenerateImage {
        ticket: Ticket,
        asset_id: AssetId,
        name: String,
        style: StylePreset,
    },
    /// Ask the chat provider for a reply; settles as `Msg::ChatReplied`.
    SendChat {
        ticket: Ticket,
        history: Vec<ChatTurn>,
        message: String,
    },
}
