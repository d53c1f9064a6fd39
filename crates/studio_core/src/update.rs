use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::StyleSelected(style) => {
            state.set_style(style);
            Vec::new()
        }
        Msg::GenerateClicked => {
            let names = parse_item_names(state.input());
            if names.is_empty() {
                return (state, Vec::new());
            }
            let style = state.style();
            state
                .start_batch(names, style)
                .into_iter()
                .map(|(ticket, asset_id, name)| Effect::GenerateImage {
                    ticket,
                    asset_id,
                    name,
                    style,
                })
                .collect()
        }
        Msg::RetryClicked(asset_id) => match state.begin_retry(asset_id) {
            Some((ticket, name, style)) => vec![Effect::GenerateImage {
                ticket,
                asset_id,
                name,
                style,
            }],
            None => Vec::new(),
        },
        Msg::ClearGalleryClicked => {
            state.clear_assets();
            Vec::new()
        }
        Msg::ChatSubmitted { text, at } => match state.submit_chat(text, at) {
            Some((ticket, history, message)) => vec![Effect::SendChat {
                ticket,
                history,
                message,
            }],
            None => Vec::new(),
        },
        Msg::GenerationDone {
            ticket,
            asset_id,
            outcome,
        } => {
            state.apply_generation(ticket, asset_id, outcome);
            Vec::new()
        }
        Msg::ChatReplied {
            ticket,
            outcome,
            at,
        } => {
            state.apply_chat_reply(ticket, outcome, at);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn parse_item_names(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
