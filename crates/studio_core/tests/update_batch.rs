use std::sync::Once;

use pretty_assertions::assert_eq;
use studio_core::{
    update, AppState, AssetStatus, Effect, GenerationOutcome, Msg, StylePreset,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(studio_logging::initialize_for_tests);
}

fn submit_items(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::GenerateClicked)
}

fn settle(state: AppState, effect: &Effect, outcome: GenerationOutcome) -> AppState {
    match effect {
        Effect::GenerateImage {
            ticket, asset_id, ..
        } => {
            update(
                state,
                Msg::GenerationDone {
                    ticket: *ticket,
                    asset_id: *asset_id,
                    outcome,
                },
            )
            .0
        }
        other => panic!("expected a generation effect, got {other:?}"),
    }
}

fn completed(url: &str) -> GenerationOutcome {
    GenerationOutcome::Completed {
        image_url: url.to_string(),
    }
}

fn names(state: &AppState) -> Vec<String> {
    state.assets().iter().map(|a| a.name.clone()).collect()
}

#[test]
fn batch_creates_one_loading_unit_per_non_blank_line() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::StyleSelected(StylePreset::Rustic));
    let (mut state, effects) = submit_items(state, "Paracetamol 500mg\n\nIbuprofeno 400mg");

    assert_eq!(names(&state), vec!["Paracetamol 500mg", "Ibuprofeno 400mg"]);
    assert!(state
        .assets()
        .iter()
        .all(|a| a.status == AssetStatus::Loading && a.style == StylePreset::Rustic));
    assert!(state.batch_in_progress());
    assert_eq!(state.input(), "");
    assert!(state.consume_dirty());

    let ids: Vec<_> = state.assets().iter().map(|a| a.id).collect();
    assert_eq!(
        effects,
        vec![
            Effect::GenerateImage {
                ticket: 1,
                asset_id: ids[0],
                name: "Paracetamol 500mg".to_string(),
                style: StylePreset::Rustic,
            },
            Effect::GenerateImage {
                ticket: 2,
                asset_id: ids[1],
                name: "Ibuprofeno 400mg".to_string(),
                style: StylePreset::Rustic,
            },
        ]
    );
}

#[test]
fn blank_input_is_a_noop() {
    init_logging();
    for input in ["", "\n\n", "  \n\t\n"] {
        let (before, _) = update(AppState::new(), Msg::InputChanged(input.to_string()));
        let (after, effects) = update(before.clone(), Msg::GenerateClicked);
        assert_eq!(before, after);
        assert!(effects.is_empty());
        assert!(!after.batch_in_progress());
    }
}

#[test]
fn new_batches_are_prepended_ahead_of_older_ones() {
    init_logging();
    let (state, _) = submit_items(AppState::new(), "A\nB\n");
    let (state, _) = submit_items(state, " C \nD");

    assert_eq!(names(&state), vec!["C", "D", "A", "B"]);

    let mut ids: Vec<_> = state.assets().iter().map(|a| a.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[test]
fn mixed_settlements_only_touch_their_own_unit() {
    init_logging();
    let (state, effects) = submit_items(AppState::new(), "One\nTwo\nThree");
    assert_eq!(effects.len(), 3);

    let state = settle(state, &effects[0], completed("data:image/png;base64,AAA"));
    assert!(state.batch_in_progress());

    let before_failure: Vec<_> = state
        .assets()
        .iter()
        .filter(|a| a.name != "Two")
        .cloned()
        .collect();
    let state = settle(state, &effects[1], GenerationOutcome::Failed);
    let after_failure: Vec<_> = state
        .assets()
        .iter()
        .filter(|a| a.name != "Two")
        .cloned()
        .collect();
    assert_eq!(before_failure, after_failure);
    assert!(state.batch_in_progress());

    let state = settle(state, &effects[2], completed("data:image/png;base64,CCC"));
    assert!(!state.batch_in_progress());

    let statuses: Vec<_> = state.assets().iter().map(|a| a.status).collect();
    assert_eq!(
        statuses,
        vec![AssetStatus::Completed, AssetStatus::Error, AssetStatus::Completed]
    );
    assert_eq!(state.assets()[1].image_url, None);
    assert_ne!(state.assets()[0].image_url, state.assets()[2].image_url);
}

#[test]
fn settlement_order_does_not_matter_across_units() {
    init_logging();
    let (state, effects) = submit_items(AppState::new(), "One\nTwo");

    let forward = settle(
        settle(state.clone(), &effects[0], completed("u1")),
        &effects[1],
        GenerationOutcome::Failed,
    );
    let backward = settle(
        settle(state, &effects[1], GenerationOutcome::Failed),
        &effects[0],
        completed("u1"),
    );

    assert_eq!(forward.assets(), backward.assets());
    assert!(!forward.batch_in_progress());
    assert!(!backward.batch_in_progress());
}

#[test]
fn repeated_settlement_is_idempotent() {
    init_logging();
    let (state, effects) = submit_items(AppState::new(), "One\nTwo");
    let once = settle(state, &effects[0], completed("u1"));
    let twice = settle(once.clone(), &effects[0], completed("u1"));

    assert_eq!(once.assets(), twice.assets());
    assert_eq!(once.batch_in_progress(), twice.batch_in_progress());
}

#[test]
fn clear_all_empties_registry_and_is_idempotent() {
    init_logging();
    let (state, _) = submit_items(AppState::new(), "One\nTwo");
    let (once, effects) = update(state, Msg::ClearGalleryClicked);
    assert!(effects.is_empty());
    assert!(once.assets().is_empty());

    let (twice, _) = update(once.clone(), Msg::ClearGalleryClicked);
    assert_eq!(once, twice);
}

#[test]
fn late_settlements_after_clear_are_dropped_but_settle_the_batch() {
    init_logging();
    let (state, effects) = submit_items(AppState::new(), "One\nTwo");
    let (state, _) = update(state, Msg::ClearGalleryClicked);
    assert!(state.batch_in_progress());

    let state = settle(state, &effects[0], completed("u1"));
    let state = settle(state, &effects[1], GenerationOutcome::Failed);

    assert!(state.assets().is_empty());
    assert!(!state.batch_in_progress());
}

#[test]
fn flag_waits_for_every_outstanding_batch() {
    init_logging();
    let (state, first) = submit_items(AppState::new(), "One");
    let (state, second) = submit_items(state, "Two");

    let state = settle(state, &first[0], completed("u1"));
    assert!(state.batch_in_progress());
    let state = settle(state, &second[0], completed("u2"));
    assert!(!state.batch_in_progress());
}

#[test]
fn view_reflects_registry() {
    init_logging();
    let (state, effects) = submit_items(AppState::new(), "One\nTwo");
    let state = settle(state, &effects[1], GenerationOutcome::Failed);
    let view = state.view();

    assert_eq!(view.asset_count, 2);
    assert!(view.batch_in_progress);
    assert!(!view.assets[0].can_retry());
    assert!(view.assets[1].can_retry());
    assert!(!view.assets[1].has_image);
    assert!(view.dirty);
}
