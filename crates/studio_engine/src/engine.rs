use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use studio_logging::{studio_debug, studio_error};
use thiserror::Error;

use crate::{AssetId, ChatTurn, EngineEvent, GenerationProvider, ImageStyle, RequestId};

enum EngineCommand {
    GenerateImage {
        request: RequestId,
        asset_id: AssetId,
        name: String,
        style: ImageStyle,
    },
    SendChat {
        request: RequestId,
        history: Vec<ChatTurn>,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("engine thread has stopped")]
    Stopped,
}

/// Runs provider calls on a dedicated tokio runtime thread.
///
/// Every command becomes its own task, so calls overlap freely; each one
/// reports exactly one `EngineEvent` when it settles. Dropping the handle
/// stops the runtime.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn spawn(
        provider: Arc<dyn GenerationProvider>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let provider = provider.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(provider.as_ref(), command, event_tx).await;
                });
            }
            studio_debug!("Engine command channel closed");
        });

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn generate_image(
        &self,
        request: RequestId,
        asset_id: AssetId,
        name: impl Into<String>,
        style: ImageStyle,
    ) -> Result<(), EngineError> {
        self.send(EngineCommand::GenerateImage {
            request,
            asset_id,
            name: name.into(),
            style,
        })
    }

    pub fn send_chat(
        &self,
        request: RequestId,
        history: Vec<ChatTurn>,
        message: impl Into<String>,
    ) -> Result<(), EngineError> {
        self.send(EngineCommand::SendChat {
            request,
            history,
            message: message.into(),
        })
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.cmd_tx.send(command).map_err(|_| {
            studio_error!("Engine thread is gone, command dropped");
            EngineError::Stopped
        })
    }
}

async fn handle_command(
    provider: &dyn GenerationProvider,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::GenerateImage {
            request,
            asset_id,
            name,
            style,
        } => EngineEvent::ImageSettled {
            request,
            asset_id,
            result: provider.generate_image(&name, style).await,
        },
        EngineCommand::SendChat {
            request,
            history,
            message,
        } => EngineEvent::ChatSettled {
            request,
            result: provider.send_chat_message(&history, &message).await,
        },
    };
    let _ = event_tx.send(event);
}
