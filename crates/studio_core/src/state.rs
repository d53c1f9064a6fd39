use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use studio_logging::{studio_debug, studio_info};

use crate::view_model::{AppViewModel, AssetCardView, ChatLineView};
use crate::{
    ChatMessage, ChatOutcome, ChatRole, ChatTurn, GenerationOutcome, MessageId,
    CHAT_FALLBACK_REPLY, CHAT_GREETING,
};

pub type AssetId = u64;

/// Identifies one outbound provider call.
pub type Ticket = u64;

/// Visual treatment applied to every asset of a batch.
///
/// The core only carries the value; the provider decides what it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StylePreset {
    Rustic,
    #[default]
    Modern,
    Social,
}

impl StylePreset {
    pub const ALL: [StylePreset; 3] = [StylePreset::Rustic, StylePreset::Modern, StylePreset::Social];

    pub fn label(self) -> &'static str {
        match self {
            StylePreset::Rustic => "Rustic / Dark",
            StylePreset::Modern => "Light / Modern",
            StylePreset::Social => "Social Media (Top View)",
        }
    }

    /// Short lowercase name used on the command line.
    pub fn keyword(self) -> &'static str {
        match self {
            StylePreset::Rustic => "rustic",
            StylePreset::Modern => "modern",
            StylePreset::Social => "social",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.keyword().eq_ignore_ascii_case(word.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Loading,
    Completed,
    Error,
}

/// One tracked generation job for a single named item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUnit {
    pub id: AssetId,
    pub name: String,
    pub style: StylePreset,
    pub status: AssetStatus,
    /// Set only while `status` is `Completed`.
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    input: String,
    style: StylePreset,
    /// Most recent batch first.
    assets: Vec<AssetUnit>,
    next_asset_id: AssetId,
    next_ticket: Ticket,
    /// Tickets issued by batches that have not settled yet.
    batch_outstanding: BTreeSet<Ticket>,
    transcript: Vec<ChatMessage>,
    next_message_id: MessageId,
    awaiting_reply: Option<Ticket>,
    revision: u64,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Fresh state with the greeting stamped at the Unix epoch. Callers that
    /// show the greeting time should use [`AppState::with_greeting_at`].
    pub fn new() -> Self {
        Self::with_greeting_at(DateTime::<Utc>::default())
    }

    /// Fresh state whose greeting message carries the given timestamp.
    pub fn with_greeting_at(at: DateTime<Utc>) -> Self {
        Self {
            input: String::new(),
            style: StylePreset::default(),
            assets: Vec::new(),
            next_asset_id: 1,
            next_ticket: 1,
            batch_outstanding: BTreeSet::new(),
            transcript: vec![ChatMessage {
                id: 0,
                role: ChatRole::Model,
                text: CHAT_GREETING.to_string(),
                timestamp: at,
            }],
            next_message_id: 1,
            awaiting_reply: None,
            revision: 0,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            revision: self.revision,
            input: self.input.clone(),
            style: self.style,
            asset_count: self.assets.len(),
            assets: self
                .assets
                .iter()
                .map(|asset| AssetCardView {
                    id: asset.id,
                    name: asset.name.clone(),
                    style: asset.style,
                    status: asset.status,
                    has_image: asset.image_url.is_some(),
                })
                .collect(),
            batch_in_progress: self.batch_in_progress(),
            chat: self
                .transcript
                .iter()
                .map(|message| ChatLineView {
                    role: message.role,
                    text: message.text.clone(),
                    timestamp: message.timestamp,
                })
                .collect(),
            awaiting_reply: self.awaiting_reply.is_some(),
            dirty: self.dirty,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn style(&self) -> StylePreset {
        self.style
    }

    pub fn assets(&self) -> &[AssetUnit] {
        &self.assets
    }

    pub fn asset(&self, id: AssetId) -> Option<&AssetUnit> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn batch_in_progress(&self) -> bool {
        !self.batch_outstanding.is_empty()
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply.is_some()
    }

    /// Bumped on every observable change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_style(&mut self, style: StylePreset) {
        if self.style != style {
            self.style = style;
            self.mark_dirty();
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    /// Creates one loading unit per name, prepends them in input order and
    /// registers their tickets with the running batch.
    pub(crate) fn start_batch(
        &mut self,
        names: Vec<String>,
        style: StylePreset,
    ) -> Vec<(Ticket, AssetId, String)> {
        let mut units = Vec::with_capacity(names.len());
        let mut launched = Vec::with_capacity(names.len());
        for name in names {
            let id = self.next_asset_id;
            self.next_asset_id += 1;
            let ticket = self.issue_ticket();
            self.batch_outstanding.insert(ticket);
            launched.push((ticket, id, name.clone()));
            units.push(AssetUnit {
                id,
                name,
                style,
                status: AssetStatus::Loading,
                image_url: None,
            });
        }
        studio_info!(
            "Batch started: {} asset(s), style={:?}, outstanding={}",
            units.len(),
            style,
            self.batch_outstanding.len()
        );
        units.append(&mut self.assets);
        self.assets = units;
        self.input.clear();
        self.mark_dirty();
        launched
    }

    /// Moves an existing unit back to loading and issues a ticket for it.
    pub(crate) fn begin_retry(&mut self, id: AssetId) -> Option<(Ticket, String, StylePreset)> {
        let index = self.assets.iter().position(|asset| asset.id == id)?;
        let ticket = self.issue_ticket();
        let asset = &mut self.assets[index];
        asset.status = AssetStatus::Loading;
        asset.image_url = None;
        let retry = (ticket, asset.name.clone(), asset.style);
        self.mark_dirty();
        Some(retry)
    }

    /// Point-update for one settled generation call. Only the unit with
    /// `asset_id` changes; an id that is no longer present is ignored.
    pub(crate) fn apply_generation(
        &mut self,
        ticket: Ticket,
        asset_id: AssetId,
        outcome: GenerationOutcome,
    ) {
        let mut changed = false;
        if self.batch_outstanding.remove(&ticket) {
            changed = self.batch_outstanding.is_empty();
            if changed {
                studio_info!("Batch settled");
            }
        }

        match self.assets.iter_mut().find(|asset| asset.id == asset_id) {
            Some(asset) => {
                match outcome {
                    GenerationOutcome::Completed { image_url } => {
                        asset.status = AssetStatus::Completed;
                        asset.image_url = Some(image_url);
                    }
                    GenerationOutcome::Failed => {
                        asset.status = AssetStatus::Error;
                        asset.image_url = None;
                    }
                }
                changed = true;
            }
            None => {
                studio_debug!(
                    "Dropping settlement ticket={} for absent asset {}",
                    ticket,
                    asset_id
                );
            }
        }

        if changed {
            self.mark_dirty();
        }
    }

    pub(crate) fn clear_assets(&mut self) {
        if self.assets.is_empty() {
            return;
        }
        studio_info!("Gallery cleared ({} asset(s))", self.assets.len());
        self.assets.clear();
        self.mark_dirty();
    }

    fn append_message(&mut self, role: ChatRole, text: String, at: DateTime<Utc>) {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.transcript.push(ChatMessage {
            id,
            role,
            text,
            timestamp: at,
        });
        self.mark_dirty();
    }

    /// Appends the user message and returns the call to issue, or `None` when
    /// the text is blank or a reply is still pending.
    pub(crate) fn submit_chat(
        &mut self,
        text: String,
        at: DateTime<Utc>,
    ) -> Option<(Ticket, Vec<ChatTurn>, String)> {
        if text.trim().is_empty() || self.awaiting_reply.is_some() {
            return None;
        }
        let history = self
            .transcript
            .iter()
            .map(|message| ChatTurn {
                role: message.role,
                text: message.text.clone(),
            })
            .collect();
        let ticket = self.issue_ticket();
        self.awaiting_reply = Some(ticket);
        self.append_message(ChatRole::User, text.clone(), at);
        Some((ticket, history, text))
    }

    pub(crate) fn apply_chat_reply(&mut self, ticket: Ticket, outcome: ChatOutcome, at: DateTime<Utc>) {
        if self.awaiting_reply != Some(ticket) {
            studio_debug!("Dropping chat reply for stale ticket {}", ticket);
            return;
        }
        self.awaiting_reply = None;
        let text = match outcome {
            ChatOutcome::Reply(text) => text,
            ChatOutcome::Failed => CHAT_FALLBACK_REPLY.to_string(),
        };
        self.append_message(ChatRole::Model, text, at);
    }
}
