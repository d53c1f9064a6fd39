use chrono::{DateTime, Utc};

use crate::{AssetId, AssetStatus, ChatRole, StylePreset};

/// Read-only snapshot handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub revision: u64,
    pub input: String,
    pub style: StylePreset,
    pub asset_count: usize,
    pub assets: Vec<AssetCardView>,
    pub batch_in_progress: bool,
    pub chat: Vec<ChatLineView>,
    pub awaiting_reply: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCardView {
    pub id: AssetId,
    pub name: String,
    pub style: StylePreset,
    pub status: AssetStatus,
    pub has_image: bool,
}

impl AssetCardView {
    pub fn can_retry(&self) -> bool {
        self.status == AssetStatus::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLineView {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}
