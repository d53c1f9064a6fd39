use studio_core::{AppViewModel, AssetCardView, AssetStatus, ChatLineView, ChatRole, StylePreset};

/// How many transcript lines the gallery view repeats.
pub const CHAT_TAIL: usize = 4;

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let mut header = format!(
        "== PharmaStudio | Style: {} | Assets: {}",
        view.style.label(),
        view.asset_count
    );
    if view.batch_in_progress {
        header.push_str(" | Generating...");
    }
    header.push_str(" ==");
    lines.push(header);

    if view.assets.is_empty() {
        lines.push("  (gallery is empty)".to_string());
    }
    lines.extend(view.assets.iter().map(render_card));

    let pending_items = view.input.lines().filter(|l| !l.trim().is_empty()).count();
    if pending_items > 0 {
        lines.push(format!(
            "  {pending_items} item(s) ready, type /generate to start"
        ));
    }

    let skip = view.chat.len().saturating_sub(CHAT_TAIL);
    lines.push("-- Assistant --".to_string());
    lines.extend(view.chat.iter().skip(skip).map(render_chat_line));
    if view.awaiting_reply {
        lines.push("  assistant is typing...".to_string());
    }

    lines
}

pub fn render_card(card: &AssetCardView) -> String {
    let mut line = format!(
        "  #{:<4} [{}] {} <{}>",
        card.id,
        status_label(card.status),
        card.name,
        style_badge(card.style)
    );
    if card.can_retry() {
        line.push_str(&format!("  (/retry {})", card.id));
    } else if card.has_image {
        line.push_str(&format!("  (/export {})", card.id));
    }
    line
}

pub fn render_chat_line(line: &ChatLineView) -> String {
    let who = match line.role {
        ChatRole::User => "you",
        ChatRole::Model => "assistant",
    };
    format!("  [{}] {}: {}", line.timestamp.format("%H:%M"), who, line.text)
}

fn status_label(status: AssetStatus) -> &'static str {
    match status {
        AssetStatus::Pending => "Pending",
        AssetStatus::Loading => "Processing",
        AssetStatus::Completed => "Ready",
        AssetStatus::Error => "Failed",
    }
}

fn style_badge(style: StylePreset) -> &'static str {
    match style {
        StylePreset::Rustic => "rustic",
        StylePreset::Modern => "modern",
        StylePreset::Social => "social",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn card(id: u64, status: AssetStatus) -> AssetCardView {
        AssetCardView {
            id,
            name: "Dipyrone 1g".to_string(),
            style: StylePreset::Rustic,
            status,
            has_image: status == AssetStatus::Completed,
        }
    }

    fn chat(role: ChatRole, text: &str) -> ChatLineView {
        ChatLineView {
            role,
            text: text.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 14, 5, 0).unwrap(),
        }
    }

    fn view() -> AppViewModel {
        AppViewModel {
            revision: 3,
            input: String::new(),
            style: StylePreset::Modern,
            asset_count: 0,
            assets: Vec::new(),
            batch_in_progress: false,
            chat: vec![chat(ChatRole::Model, "Hello!")],
            awaiting_reply: false,
            dirty: false,
        }
    }

    #[test]
    fn cards_show_status_and_next_action() {
        assert_eq!(
            render_card(&card(2, AssetStatus::Error)),
            "  #2    [Failed] Dipyrone 1g <rustic>  (/retry 2)"
        );
        assert_eq!(
            render_card(&card(5, AssetStatus::Completed)),
            "  #5    [Ready] Dipyrone 1g <rustic>  (/export 5)"
        );
        assert_eq!(
            render_card(&card(7, AssetStatus::Loading)),
            "  #7    [Processing] Dipyrone 1g <rustic>"
        );
    }

    #[test]
    fn empty_gallery_and_greeting() {
        let lines = render(&view());
        assert_eq!(
            lines,
            vec![
                "== PharmaStudio | Style: Light / Modern | Assets: 0 ==".to_string(),
                "  (gallery is empty)".to_string(),
                "-- Assistant --".to_string(),
                "  [14:05] assistant: Hello!".to_string(),
            ]
        );
    }

    #[test]
    fn busy_view_shows_indicators() {
        let mut view = view();
        view.batch_in_progress = true;
        view.awaiting_reply = true;
        view.input = "A\n\nB\n".to_string();
        view.asset_count = 1;
        view.assets = vec![card(1, AssetStatus::Pending)];

        let lines = render(&view);
        assert!(lines[0].contains("Generating..."));
        assert!(lines.contains(&"  2 item(s) ready, type /generate to start".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("  assistant is typing..."));
    }

    #[test]
    fn chat_is_trimmed_to_tail() {
        let mut view = view();
        view.chat = (0..6)
            .map(|i| chat(ChatRole::User, &format!("msg {i}")))
            .collect();
        let lines = render(&view);
        let chat_lines: Vec<_> = lines.iter().filter(|l| l.contains("you:")).collect();
        assert_eq!(chat_lines.len(), CHAT_TAIL);
        assert!(chat_lines[0].ends_with("msg 2"));
    }
}
