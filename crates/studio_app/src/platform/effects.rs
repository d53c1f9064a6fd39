use std::sync::{mpsc, Arc};
use std::thread;

use chrono::{DateTime, Utc};
use studio_core::{ChatOutcome, ChatRole, ChatTurn, Effect, GenerationOutcome, Msg, StylePreset};
use studio_engine::{EngineError, EngineEvent, EngineHandle, GenerationProvider, ImageStyle};
use studio_logging::{studio_debug, studio_info, studio_warn};

/// Turns reducer effects into engine calls and feeds settlements back as `Msg`s.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new<T>(
        provider: Arc<dyn GenerationProvider>,
        msg_tx: mpsc::Sender<T>,
    ) -> Result<Self, EngineError>
    where
        T: From<Msg> + Send + 'static,
    {
        let (engine, events) = EngineHandle::spawn(provider)?;
        spawn_event_loop(events, msg_tx);
        Ok(Self { engine })
    }

    /// Hands effects to the engine. Effects the engine can no longer accept
    /// come back as failed settlements so no ticket stays outstanding.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut undelivered = Vec::new();
        for effect in effects {
            let sent = match &effect {
                Effect::GenerateImage {
                    ticket,
                    asset_id,
                    name,
                    style,
                } => {
                    studio_info!(
                        "GenerateImage ticket={} asset_id={} style={} name={}",
                        ticket,
                        asset_id,
                        style.keyword(),
                        name
                    );
                    self.engine
                        .generate_image(*ticket, *asset_id, name.clone(), map_style(*style))
                }
                Effect::SendChat {
                    ticket,
                    history,
                    message,
                } => {
                    studio_info!(
                        "SendChat ticket={} history_len={} message_len={}",
                        ticket,
                        history.len(),
                        message.len()
                    );
                    let history = history.iter().cloned().map(map_turn).collect();
                    self.engine.send_chat(*ticket, history, message.clone())
                }
            };
            if let Err(err) = sent {
                studio_warn!("Effect not delivered: {}", err);
                undelivered.push(failed_settlement(&effect, Utc::now()));
            }
        }
        undelivered
    }
}

/// The settlement reported for an effect that never reached the provider.
pub fn failed_settlement(effect: &Effect, at: DateTime<Utc>) -> Msg {
    match effect {
        Effect::GenerateImage {
            ticket, asset_id, ..
        } => Msg::GenerationDone {
            ticket: *ticket,
            asset_id: *asset_id,
            outcome: GenerationOutcome::Failed,
        },
        Effect::SendChat { ticket, .. } => Msg::ChatReplied {
            ticket: *ticket,
            outcome: ChatOutcome::Failed,
            at,
        },
    }
}

fn spawn_event_loop<T>(events: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<T>)
where
    T: From<Msg> + Send + 'static,
{
    thread::spawn(move || {
        while let Ok(event) = events.recv() {
            let msg = event_to_msg(event, Utc::now());
            if msg_tx.send(T::from(msg)).is_err() {
                break;
            }
        }
        studio_debug!("Engine event loop finished");
    });
}

/// Maps one engine settlement to the reducer message it resolves.
pub fn event_to_msg(event: EngineEvent, at: DateTime<Utc>) -> Msg {
    match event {
        EngineEvent::ImageSettled {
            request,
            asset_id,
            result,
        } => Msg::GenerationDone {
            ticket: request,
            asset_id,
            outcome: match result {
                Ok(image) => GenerationOutcome::Completed {
                    image_url: image.to_data_url(),
                },
                Err(err) => {
                    studio_warn!("Generation for asset {} failed: {}", asset_id, err);
                    GenerationOutcome::Failed
                }
            },
        },
        EngineEvent::ChatSettled { request, result } => Msg::ChatReplied {
            ticket: request,
            outcome: match result {
                Ok(reply) => ChatOutcome::Reply(reply),
                Err(err) => {
                    studio_warn!("Chat request {} failed: {}", request, err);
                    ChatOutcome::Failed
                }
            },
            at,
        },
    }
}

fn map_style(style: StylePreset) -> ImageStyle {
    match style {
        StylePreset::Rustic => ImageStyle::Rustic,
        StylePreset::Modern => ImageStyle::Modern,
        StylePreset::Social => ImageStyle::Social,
    }
}

fn map_turn(turn: ChatTurn) -> studio_engine::ChatTurn {
    studio_engine::ChatTurn {
        role: match turn.role {
            ChatRole::User => studio_engine::ChatRole::User,
            ChatRole::Model => studio_engine::ChatRole::Model,
        },
        text: turn.text,
    }
}
