use std::sync::{Arc, Mutex};
use std::thread;
use swipedeck_core::{
    ContentSource, HostSession, Item, ItemBatcher, ItemId, StackConfig, StackCoordinator,
    SwipeTally,
};

#[derive(Clone, Default)]
struct RecordingBatcher {
    added: Arc<Mutex<Vec<ItemId>>>,
    flushes: Arc<Mutex<usize>>,
}

impl ItemBatcher for RecordingBatcher {
    fn add_item(&self, item: &Item) {
        self.added.lock().expect("batcher lock").push(item.id);
    }

    fn flush_and_reset(&self) {
        *self.flushes.lock().expect("flush lock") += 1;
    }
}

#[derive(Clone)]
struct FixedSource {
    items: Vec<Item>,
    prefetch_calls: Arc<Mutex<Vec<usize>>>,
}

impl FixedSource {
    fn new(len: usize) -> Self {
        Self {
            items: (0..len).map(|i| Item::new(format!("listing {i}"))).collect(),
            prefetch_calls: Arc::default(),
        }
    }
}

impl ContentSource for FixedSource {
    fn all_items(&self) -> Vec<Item> {
        self.items.clone()
    }

    fn prefetch_if_needed(&self, current_index: usize) {
        self.prefetch_calls
            .lock()
            .expect("prefetch lock")
            .push(current_index);
    }
}

#[test]
fn pump_forwards_accepted_items_and_prefetch_hints() {
    let (mut stack, events) = StackCoordinator::with_channel(StackConfig::default())
        .expect("valid config");
    let batcher = RecordingBatcher::default();
    let source = FixedSource::new(4);
    let mut session = HostSession::new(events, batcher.clone(), source.clone());
    session.load_deck(&mut stack);
    assert_eq!(stack.deck_len(), 4);

    stack.swipe_right();
    stack.swipe_left();
    stack.swipe_right();
    assert_eq!(session.pump(), 3);

    assert_eq!(session.current_index(), 3);
    assert_eq!(
        *batcher.added.lock().unwrap(),
        vec![source.items[0].id, source.items[2].id]
    );
    assert_eq!(*source.prefetch_calls.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(
        session.tally(),
        SwipeTally {
            accepted: 2,
            rejected: 1,
            undone: 0,
        }
    );
    assert_eq!(session.pump(), 0);
}

#[test]
fn undo_and_chrome_events_update_mirror() {
    let (mut stack, events) = StackCoordinator::with_channel(StackConfig::default())
        .expect("valid config");
    let mut session = HostSession::new(events, RecordingBatcher::default(), FixedSource::new(3));
    session.load_deck(&mut stack);

    stack.swipe_left();
    stack.undo();
    stack.begin_gesture(0);
    session.pump();

    assert_eq!(session.current_index(), 0);
    assert_eq!(session.tally().undone, 1);
    assert!(session.is_swiping());

    assert!(!stack.tap_card(0), "tap is ignored mid-drag");
    stack.set_expanded(true);
    session.pump();
    assert!(!session.is_swiping());
    assert!(session.is_expanded());
}

#[test]
fn logic_thread_drains_until_engine_drops() {
    let (mut stack, events) = StackCoordinator::with_channel(StackConfig::default())
        .expect("valid config");
    let batcher = RecordingBatcher::default();
    let source = FixedSource::new(5);
    stack.set_deck(source.all_items());

    let session = HostSession::new(events, batcher.clone(), source);
    let logic = thread::spawn(move || session.run_until_closed());

    for _ in 0..5 {
        stack.swipe_right();
        stack.tick(1.0 / 60.0);
    }
    drop(stack);

    let tally = logic.join().expect("logic thread should not panic");
    assert_eq!(tally.accepted, 5);
    assert_eq!(batcher.added.lock().unwrap().len(), 5);
    assert_eq!(*batcher.flushes.lock().unwrap(), 1);
}
