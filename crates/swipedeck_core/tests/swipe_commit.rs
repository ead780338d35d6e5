use std::sync::mpsc::Receiver;
use swipedeck_core::{
    Item, StackConfig, StackCoordinator, StackEvent, SwipeDirection, SwipeOrigin,
};

const FRAME: f32 = 1.0 / 60.0;

fn setup(len: usize) -> (StackCoordinator, Receiver<StackEvent>, Vec<Item>) {
    let (mut stack, events) =
        StackCoordinator::with_channel(StackConfig::for_viewport(400.0))
            .expect("valid config");
    let items = (0..len)
        .map(|i| Item::new(format!("listing {i}")))
        .collect::<Vec<_>>();
    stack.set_deck(items.clone());
    (stack, events, items)
}

fn swipes(events: &Receiver<StackEvent>) -> Vec<(usize, SwipeDirection, SwipeOrigin, Item)> {
    events
        .try_iter()
        .filter_map(|event| match event {
            StackEvent::Swiped {
                index,
                direction,
                origin,
                item,
                ..
            } => Some((index, direction, origin, item)),
            _ => None,
        })
        .collect()
}

#[test]
fn sequential_swipe_right_advances_and_reports_each_item_once() {
    let (mut stack, events, items) = setup(5);

    for k in 0..5 {
        assert!(stack.swipe_right(), "swipe {k} should be issued");
        assert_eq!(stack.active_index(), k + 1);
    }
    assert!(stack.is_exhausted());

    let observed = swipes(&events);
    assert_eq!(observed.len(), 5);
    for (k, (index, direction, origin, item)) in observed.into_iter().enumerate() {
        assert_eq!(index, k);
        assert_eq!(direction, SwipeDirection::Right);
        assert_eq!(origin, SwipeOrigin::Command);
        assert_eq!(item, items[k]);
    }
}

#[test]
fn swipe_past_end_is_noop() {
    let (mut stack, events, _items) = setup(1);
    assert!(stack.swipe_left());
    assert!(!stack.swipe_left());
    assert!(!stack.swipe_right());
    assert_eq!(stack.active_index(), 1);
    assert_eq!(swipes(&events).len(), 1);
}

#[test]
fn swiped_event_reports_index_already_advanced() {
    let (mut stack, events, _items) = setup(3);
    stack.swipe_right();

    let event = events.try_recv().expect("swipe event posted synchronously");
    match event {
        StackEvent::Swiped {
            index, next_index, ..
        } => {
            assert_eq!(index, 0);
            assert_eq!(next_index, 1);
            assert_eq!(next_index, stack.active_index());
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn back_to_back_commands_never_double_fire_for_one_item() {
    let (mut stack, events, items) = setup(4);

    stack.swipe_right();
    stack.swipe_right();
    stack.tick(FRAME);

    let observed = swipes(&events);
    assert_eq!(observed.len(), 2);
    assert_eq!(observed[0].3, items[0]);
    assert_eq!(observed[1].3, items[1]);
    assert_eq!(
        observed.iter().filter(|swipe| swipe.3 == items[0]).count(),
        1
    );
}

#[test]
fn rapid_commands_keep_previous_card_exiting_on_top() {
    let (mut stack, _events, _items) = setup(6);
    stack.swipe_left();
    stack.tick(FRAME);
    stack.swipe_left();
    stack.tick(FRAME);

    assert_eq!(stack.active_index(), 2);
    let exiting = stack.card_visual(1).expect("previous card still mounted");
    let front = stack.card_visual(2).expect("active card mounted");
    assert!(exiting.z_index > front.z_index);
    assert!(exiting.translate_x < 0.0);
    assert_eq!(exiting.opacity, 1.0);
    assert!(stack.card_visual(0).is_none());
}

#[test]
fn command_and_gesture_commits_share_payload_and_transition() {
    let (mut by_command, command_events, items) = setup(3);
    let (mut by_gesture, gesture_events) =
        StackCoordinator::with_channel(StackConfig::for_viewport(400.0))
            .expect("valid config");
    by_gesture.set_deck(items.clone());

    by_command.swipe_right();
    assert!(by_gesture.begin_gesture(0));
    by_gesture.update_gesture(0, 90.0, 4.0);
    by_gesture.end_gesture(0, 150.0, 4.0, 650.0);

    let from_command = swipes(&command_events);
    let from_gesture = swipes(&gesture_events);
    assert_eq!(from_command.len(), 1);
    assert_eq!(from_gesture.len(), 1);
    assert_eq!(from_command[0].0, from_gesture[0].0);
    assert_eq!(from_command[0].1, from_gesture[0].1);
    assert_eq!(from_command[0].3, from_gesture[0].3);
    assert_eq!(from_command[0].2, SwipeOrigin::Command);
    assert_eq!(from_gesture[0].2, SwipeOrigin::Gesture);
    assert_eq!(by_command.active_index(), by_gesture.active_index());

    for _ in 0..10 {
        by_command.tick(FRAME);
        by_gesture.tick(FRAME);
    }
    let command_overlays = by_command.card_overlays(0).expect("exiting card mounted");
    let gesture_overlays = by_gesture.card_overlays(0).expect("exiting card mounted");
    assert!(command_overlays.accept_icon.opacity > 0.0);
    assert_eq!(command_overlays.accept_label.opacity, 0.0);
    assert!(gesture_overlays.accept_label.opacity > 0.0);
    assert_eq!(gesture_overlays.accept_icon.opacity, 0.0);
}

#[test]
fn exit_spring_parks_card_off_screen() {
    let (mut stack, _events, _items) = setup(3);
    stack.swipe_right();
    for _ in 0..240 {
        stack.tick(FRAME);
    }

    let parked = stack.card_visual(0).expect("previous card stays mounted");
    assert_eq!(parked.translate_x, 600.0);
    assert_eq!(parked.rotation_deg, 10.0);
    assert_eq!(parked.opacity, 0.0);
    assert!(!parked.interactive);
}

#[test]
fn dropped_receiver_leaves_engine_state_intact() {
    let (mut stack, events, _items) = setup(3);
    drop(events);

    assert!(stack.swipe_right());
    assert_eq!(stack.active_index(), 1);
    assert!(stack.swipe_left());
    assert_eq!(stack.active_index(), 2);
    assert!(stack.undo());
    assert_eq!(stack.active_index(), 1);

    stack.tick(FRAME);
    assert_eq!(stack.mounted_indices(), vec![0, 1, 2]);
}
