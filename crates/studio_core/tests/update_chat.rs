use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use studio_core::{
    update, AppState, ChatOutcome, ChatRole, ChatTurn, Effect, Msg, CHAT_FALLBACK_REPLY,
    CHAT_GREETING,
};

fn init_logging() {
    studio_logging::initialize_for_tests();
}

fn at(secs: i64) -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn send(state: AppState, text: &str, secs: i64) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::ChatSubmitted {
            text: text.to_string(),
            at: at(secs),
        },
    )
}

fn ticket_of(effects: &[Effect]) -> u64 {
    match effects {
        [Effect::SendChat { ticket, .. }] => *ticket,
        other => panic!("expected one chat effect, got {other:?}"),
    }
}

#[test]
fn transcript_starts_with_greeting() {
    let state = AppState::with_greeting_at(at(0));
    let transcript = state.transcript();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].role, ChatRole::Model);
    assert_eq!(transcript[0].text, CHAT_GREETING);
}

#[test]
fn user_message_is_appended_before_the_reply() {
    init_logging();
    let state = AppState::with_greeting_at(at(0));
    let (state, effects) = send(state, "Can I take ibuprofen with coffee?", 1);

    assert_eq!(state.transcript().len(), 2);
    assert_eq!(state.transcript()[1].role, ChatRole::User);
    assert!(state.awaiting_reply());
    assert_eq!(
        effects,
        vec![Effect::SendChat {
            ticket: 1,
            history: vec![ChatTurn {
                role: ChatRole::Model,
                text: CHAT_GREETING.to_string(),
            }],
            message: "Can I take ibuprofen with coffee?".to_string(),
        }]
    );

    let ticket = ticket_of(&effects);
    let (state, _) = update(
        state,
        Msg::ChatReplied {
            ticket,
            outcome: ChatOutcome::Reply("Yes, in moderation.".to_string()),
            at: at(2),
        },
    );
    let last = state.transcript().last().expect("reply");
    assert_eq!(last.role, ChatRole::Model);
    assert_eq!(last.text, "Yes, in moderation.");
    assert_eq!(last.timestamp, at(2));
    assert!(!state.awaiting_reply());
}

#[test]
fn provider_failure_appends_fallback_apology() {
    init_logging();
    let (state, effects) = send(AppState::with_greeting_at(at(0)), "Hello", 1);
    let ticket = ticket_of(&effects);
    let (state, _) = update(
        state,
        Msg::ChatReplied {
            ticket,
            outcome: ChatOutcome::Failed,
            at: at(2),
        },
    );

    let texts: Vec<_> = state.transcript().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec![CHAT_GREETING, "Hello", CHAT_FALLBACK_REPLY]);
}

#[test]
fn blank_or_overlapping_sends_are_ignored() {
    init_logging();
    let state = AppState::with_greeting_at(at(0));
    let (state, effects) = send(state, "   ", 1);
    assert!(effects.is_empty());
    assert_eq!(state.transcript().len(), 1);

    let (state, effects) = send(state, "first", 2);
    assert_eq!(effects.len(), 1);
    let (next, effects) = send(state.clone(), "second", 3);
    assert!(effects.is_empty());
    assert_eq!(state, next);
}

#[test]
fn history_includes_previous_turns() {
    init_logging();
    let (state, effects) = send(AppState::with_greeting_at(at(0)), "first", 1);
    let (state, _) = update(
        state,
        Msg::ChatReplied {
            ticket: ticket_of(&effects),
            outcome: ChatOutcome::Reply("answer".to_string()),
            at: at(2),
        },
    );
    let (_state, effects) = send(state, "second", 3);

    match &effects[..] {
        [Effect::SendChat { history, message, .. }] => {
            let roles: Vec<_> = history.iter().map(|t| t.role).collect();
            assert_eq!(roles, vec![ChatRole::Model, ChatRole::User, ChatRole::Model]);
            assert_eq!(message, "second");
        }
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn stale_reply_is_dropped() {
    init_logging();
    let (state, _effects) = send(AppState::with_greeting_at(at(0)), "hi", 1);
    let (next, _) = update(
        state.clone(),
        Msg::ChatReplied {
            ticket: 42,
            outcome: ChatOutcome::Reply("ghost".to_string()),
            at: at(2),
        },
    );
    assert_eq!(state, next);
}
