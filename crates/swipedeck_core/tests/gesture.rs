use std::sync::mpsc::Receiver;
use swipedeck_core::{
    Item, ReleaseOutcome, StackConfig, StackCoordinator, StackEvent, SwipeDirection,
};

const FRAME: f32 = 1.0 / 60.0;
const WIDTH: f32 = 400.0;

fn setup() -> (StackCoordinator, Receiver<StackEvent>) {
    let (mut stack, events) =
        StackCoordinator::with_channel(StackConfig::for_viewport(WIDTH))
            .expect("valid config");
    stack.set_deck((0..4).map(|i| Item::new(format!("listing {i}"))).collect());
    (stack, events)
}

fn swipe_count(events: &Receiver<StackEvent>) -> usize {
    events
        .try_iter()
        .filter(|event| matches!(event, StackEvent::Swiped { .. }))
        .count()
}

#[test]
fn release_within_threshold_snaps_back_without_commit() {
    for raw_dx in [0.0, 35.0, -80.0, WIDTH * 0.25, -WIDTH * 0.25] {
        let (mut stack, events) = setup();
        assert!(stack.begin_gesture(0));
        stack.update_gesture(0, raw_dx, 10.0);
        let outcome = stack.end_gesture(0, raw_dx, 10.0, 120.0);

        assert_eq!(outcome, ReleaseOutcome::SnapBack, "raw_dx={raw_dx}");
        assert_eq!(stack.active_index(), 0);
        assert_eq!(stack.neighbor_coupling(), 0.0);
        assert_eq!(swipe_count(&events), 0);

        for _ in 0..240 {
            stack.tick(FRAME);
        }
        let visual = stack.card_visual(0).expect("active card mounted");
        assert_eq!(
            (visual.translate_x, visual.translate_y, visual.rotation_deg),
            (0.0, 0.0, 0.0)
        );
    }
}

#[test]
fn release_past_threshold_commits_once_before_any_frame() {
    for (raw_dx, expected) in [(101.0, SwipeDirection::Right), (-260.0, SwipeDirection::Left)] {
        let (mut stack, events) = setup();
        stack.begin_gesture(0);
        stack.update_gesture(0, raw_dx, 0.0);
        let outcome = stack.end_gesture(0, raw_dx, 0.0, 0.0);

        assert_eq!(outcome, ReleaseOutcome::Commit(expected));
        let swiped = events
            .try_iter()
            .filter_map(|event| match event {
                StackEvent::Swiped { direction, .. } => Some(direction),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(swiped, vec![expected]);
        assert_eq!(stack.active_index(), 1);
    }
}

#[test]
fn swiping_signal_raised_on_start_and_lowered_on_end() {
    let (mut stack, events) = setup();
    stack.begin_gesture(0);
    stack.update_gesture(0, 20.0, 0.0);
    stack.end_gesture(0, 20.0, 0.0, 0.0);

    let chrome = events
        .try_iter()
        .filter_map(|event| match event {
            StackEvent::SwipingChanged(value) => Some(value),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(chrome, vec![true, false]);
    assert!(!stack.is_swiping());
}

#[test]
fn drag_drives_neighbor_peek() {
    let (mut stack, _events) = setup();
    let resting = stack.card_visual(1).expect("next card mounted");

    stack.begin_gesture(0);
    stack.update_gesture(0, -200.0, 0.0);
    assert_eq!(stack.neighbor_coupling(), -200.0);

    let peeking = stack.card_visual(1).expect("next card mounted");
    assert!(peeking.scale > resting.scale);
    assert_eq!(peeking.scale, 1.0);
    assert_eq!(peeking.opacity, 1.0);

    let front = stack.card_visual(0).expect("active card mounted");
    assert!((front.translate_x + 184.0).abs() < 1e-3);
    assert!((front.rotation_deg + 6.0).abs() < 1e-3);
}

#[test]
fn non_active_cards_ignore_gestures() {
    let (mut stack, events) = setup();
    assert!(!stack.begin_gesture(1));
    stack.update_gesture(1, 300.0, 0.0);
    assert_eq!(
        stack.end_gesture(1, 300.0, 0.0, 0.0),
        ReleaseOutcome::Ignored
    );
    assert_eq!(stack.active_index(), 0);
    assert_eq!(swipe_count(&events), 0);
}

#[test]
fn gesture_rearms_on_new_active_card() {
    let (mut stack, _events) = setup();
    stack.swipe_left();
    assert!(!stack.begin_gesture(0));
    assert!(stack.begin_gesture(1));
}

#[test]
fn expanded_stack_ignores_drag_start() {
    let (mut stack, events) = setup();
    stack.set_expanded(true);
    assert!(!stack.begin_gesture(0));
    assert_eq!(
        stack.end_gesture(0, 300.0, 0.0, 0.0),
        ReleaseOutcome::Ignored
    );
    let observed = events.try_iter().collect::<Vec<_>>();
    assert_eq!(observed, vec![StackEvent::ExpandChanged(true)]);
}
