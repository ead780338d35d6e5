//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `swipedeck_core` linkage without a Flutter runtime.
//! - Replay a fixed three-card swipe/undo script with deterministic output.

use swipedeck_core::{Item, StackConfig, StackCoordinator, StackEvent};

const FRAME_SECONDS: f32 = 1.0 / 60.0;

fn main() {
    println!("swipedeck_core ping={}", swipedeck_core::ping());
    println!("swipedeck_core version={}", swipedeck_core::core_version());

    let (mut stack, events) = match StackCoordinator::with_channel(StackConfig::default()) {
        Ok(pair) => pair,
        Err(err) => {
            eprintln!("stack init failed: {err}");
            std::process::exit(1);
        }
    };
    stack.set_deck(vec![Item::new("A"), Item::new("B"), Item::new("C")]);

    let script: [(&str, fn(&mut StackCoordinator) -> bool); 5] = [
        ("swipe_right", StackCoordinator::swipe_right),
        ("swipe_left", StackCoordinator::swipe_left),
        ("undo", StackCoordinator::undo),
        ("undo", StackCoordinator::undo),
        ("undo", StackCoordinator::undo),
    ];
    for (name, step) in script {
        let accepted = step(&mut stack);
        stack.tick(FRAME_SECONDS);
        println!(
            "step={name} accepted={accepted} active_index={}",
            stack.active_index()
        );
        for event in events.try_iter() {
            match event {
                StackEvent::Swiped {
                    direction, item, ..
                } => println!("  on_swipe direction={direction} content={}", item.content),
                StackEvent::Undone {
                    item, enter_from, ..
                } => println!("  undone content={} enter_from={enter_from}", item.content),
                other => println!("  {other:?}"),
            }
        }
    }
}
