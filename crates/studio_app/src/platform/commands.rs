use std::path::PathBuf;

use studio_core::{AssetId, StylePreset};
use thiserror::Error;

pub const HELP: &str = "\
Type one product name per line, then:
  /style rustic|modern|social   pick the visual style
  /generate                     generate images for the typed lines
  /retry <id>                   regenerate one asset
  /clear                        empty the gallery
  /chat <message>               ask the pharmacy assistant
  /export <id> [dir]            save a finished image (default dir: output)
  /show                         redraw the gallery
  /help                         this text
  /quit                         leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddLine(String),
    Style(StylePreset),
    Generate,
    Retry(AssetId),
    Clear,
    Chat(String),
    Export { id: AssetId, dir: Option<PathBuf> },
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command /{0} (try /help)")]
    Unknown(String),
    #[error("/{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("unknown style '{0}' (rustic, modern or social)")]
    InvalidStyle(String),
    #[error("'{0}' is not an asset id")]
    InvalidId(String),
}

/// Parses one terminal line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Some(Command::AddLine(trimmed.to_string())));
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "style" => {
            if argument.is_empty() {
                return Err(CommandError::MissingArgument("style"));
            }
            let style = StylePreset::from_keyword(argument)
                .ok_or_else(|| CommandError::InvalidStyle(argument.to_string()))?;
            Command::Style(style)
        }
        "generate" | "gen" => Command::Generate,
        "retry" => Command::Retry(parse_id("retry", argument)?),
        "clear" => Command::Clear,
        "chat" => {
            if argument.is_empty() {
                return Err(CommandError::MissingArgument("chat"));
            }
            Command::Chat(argument.to_string())
        }
        "export" => {
            let mut parts = argument.split_whitespace();
            let id = parse_id("export", parts.next().unwrap_or(""))?;
            let dir = parts.next().map(PathBuf::from);
            Command::Export { id, dir }
        }
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_id(command: &'static str, argument: &str) -> Result<AssetId, CommandError> {
    if argument.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    argument
        .trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidId(argument.to_string()))
}
