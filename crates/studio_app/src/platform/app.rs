use std::borrow::Cow;
use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use chrono::Utc;
use studio_core::{update, AppState, AssetId, AssetStatus, Msg, StylePreset};
use studio_engine::{export_image, GeminiProvider, ProviderSettings};
use studio_logging::{studio_debug, studio_info, studio_warn};

use super::commands::{self, Command, HELP};
use super::effects::EffectRunner;
use super::logging;
use super::ui;

const DEFAULT_EXPORT_DIR: &str = "output";

/// Everything the owner loop reacts to, in arrival order.
enum Inbox {
    Line(String),
    Msg(Msg),
    StdinClosed,
}

impl From<Msg> for Inbox {
    fn from(msg: Msg) -> Self {
        Inbox::Msg(msg)
    }
}

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize_from_env();

    let settings = ProviderSettings::from_env();
    if settings.api_key.is_none() {
        studio_warn!("No GEMINI_API_KEY or API_KEY set; every generation will fail");
        println!("warning: GEMINI_API_KEY is not set, requests will fail");
    }
    let provider = GeminiProvider::new(settings).context("failed to build the Gemini client")?;
    studio_info!(
        "Starting with image model {} and chat model {}",
        provider.settings().image_model,
        provider.settings().chat_model
    );

    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();
    let runner = EffectRunner::new(Arc::new(provider), inbox_tx.clone())
        .context("failed to start the generation engine")?;
    spawn_stdin_reader(inbox_tx);

    let mut app = App::new(runner);
    app.print_view();
    println!("{HELP}");

    while let Ok(item) = inbox_rx.recv() {
        let flow = match item {
            Inbox::Line(line) => app.handle_line(&line),
            Inbox::Msg(msg) => {
                app.dispatch(msg, true);
                app.check_drained()
            }
            Inbox::StdinClosed => {
                app.stdin_closed = true;
                app.check_drained()
            }
        };
        if flow.is_break() {
            break;
        }
    }

    studio_info!("Shutting down at state revision {}", app.state.revision());
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        forward_lines(io::stdin().lock(), &tx);
        let _ = tx.send(Inbox::StdinClosed);
    });
}

/// Sends every input line to the inbox until EOF or a read error. Bytes that
/// are not UTF-8 are replaced rather than ending the input.
fn forward_lines(mut reader: impl BufRead, tx: &mpsc::Sender<Inbox>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                studio_warn!("Reading stdin failed: {}", err);
                return;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        if let Cow::Owned(_) = line {
            studio_warn!("Input line was not valid UTF-8, invalid bytes replaced");
        }
        let line = line.trim_end_matches(['\n', '\r']).to_string();
        if tx.send(Inbox::Line(line)).is_err() {
            return;
        }
    }
}

struct App {
    state: AppState,
    runner: EffectRunner,
    stdin_closed: bool,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::with_greeting_at(Utc::now()),
            runner,
            stdin_closed: false,
        }
    }

    fn dispatch(&mut self, msg: Msg, redraw: bool) {
        let mut pending = VecDeque::from([msg]);
        while let Some(msg) = pending.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            pending.extend(self.runner.enqueue(effects));
        }
        if self.state.consume_dirty() && redraw {
            self.print_view();
        }
    }

    fn print_view(&self) {
        let view = self.state.view();
        studio_debug!("Rendering revision {}", view.revision);
        for line in ui::render::render(&view) {
            println!("{line}");
        }
    }

    fn handle_line(&mut self, line: &str) -> ControlFlow<()> {
        let command = match commands::parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return ControlFlow::Continue(()),
            Err(err) => {
                println!("  {err}");
                return ControlFlow::Continue(());
            }
        };

        match command {
            Command::AddLine(item) => {
                let input = if self.state.input().is_empty() {
                    item.clone()
                } else {
                    format!("{}\n{item}", self.state.input())
                };
                self.dispatch(Msg::InputChanged(input), false);
                println!("  + {item}");
            }
            Command::Style(style) => self.select_style(style),
            Command::Generate => {
                if self.state.batch_in_progress() {
                    println!("  a batch is already generating");
                } else if self.state.input().trim().is_empty() {
                    println!("  nothing to generate, type product names first");
                } else {
                    self.dispatch(Msg::GenerateClicked, true);
                }
            }
            Command::Retry(id) => self.retry(id),
            Command::Clear => self.dispatch(Msg::ClearGalleryClicked, true),
            Command::Chat(text) => {
                if self.state.awaiting_reply() {
                    println!("  the assistant is still answering");
                } else {
                    self.dispatch(
                        Msg::ChatSubmitted {
                            text,
                            at: Utc::now(),
                        },
                        true,
                    );
                }
            }
            Command::Export { id, dir } => {
                let dir = dir.unwrap_or_else(|| DEFAULT_EXPORT_DIR.into());
                self.export(id, &dir);
            }
            Command::Show => self.print_view(),
            Command::Help => println!("{HELP}"),
            Command::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn select_style(&mut self, style: StylePreset) {
        self.dispatch(Msg::StyleSelected(style), false);
        println!("  style: {}", style.label());
    }

    fn retry(&mut self, id: AssetId) {
        match self.state.asset(id) {
            None => println!("  no asset #{id}"),
            Some(asset) if matches!(asset.status, AssetStatus::Loading | AssetStatus::Pending) => {
                println!("  asset #{id} is still processing");
            }
            Some(_) => self.dispatch(Msg::RetryClicked(id), true),
        }
    }

    fn export(&self, id: AssetId, dir: &Path) {
        let Some(asset) = self.state.asset(id) else {
            println!("  no asset #{id}");
            return;
        };
        let Some(image_url) = asset.image_url.as_deref() else {
            println!("  asset #{id} has no image yet");
            return;
        };
        match export_image(dir, &asset.name, id, image_url) {
            Ok(path) => println!("  saved {}", path.display()),
            Err(err) => {
                studio_warn!("Export of asset {} failed: {}", id, err);
                println!("  export failed: {err}");
            }
        }
    }

    /// Once input has ended, leave as soon as nothing is in flight.
    fn check_drained(&self) -> ControlFlow<()> {
        let in_flight = self.state.batch_in_progress()
            || self.state.awaiting_reply()
            || self
                .state
                .assets()
                .iter()
                .any(|a| matches!(a.status, AssetStatus::Pending | AssetStatus::Loading));
        if self.stdin_closed && !in_flight {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}
