use std::time::Duration;

use origami_compiler::{flatten, StepArray};
use origami_core::config::NavigatorConfig;
use origami_core::driver::ManualLoopTimer;
use origami_core::navigator::Navigator;
use origami_ir::{Command, InstructionNode, StepPath};
use origami_model::looper::LoopDirection;
use origami_model::{FoldState, RepeatLoop, RepeatRange};

fn ten_steps() -> StepArray {
    let children = (0..10)
        .map(|i| InstructionNode::leaf(format!("step {i}"), vec![Command(vec![serde_json::json!(i)])]))
        .collect();
    flatten(&InstructionNode::branch("root", children), false)
}

fn path(s: &str) -> StepPath {
    s.parse().unwrap()
}

fn navigator() -> Navigator<ManualLoopTimer> {
    Navigator::new(ManualLoopTimer::new(), &NavigatorConfig::default())
}

#[test]
fn test_modifier_click_starts_driver() {
    let mut nav = navigator();
    let steps = ten_steps();
    let mut state = FoldState::new(10, false);

    let update = nav.select(&state, &steps, &path("0,3"), true).unwrap();
    state.apply(&update);

    assert_eq!(state.repeat_root(), 3);
    assert_eq!(state.repeat_range(), Some(RepeatRange::new(3, 3)));
    assert_eq!(state.step_idx, 2);

    let driver = nav.driver().unwrap();
    assert!(nav.timer().is_live(driver));
    assert_eq!(nav.timer().started(), &[(driver, Duration::from_millis(2500))]);
    assert_eq!(nav.direction(), LoopDirection::Forward);
}

#[test]
fn test_extending_keeps_driver() {
    let mut nav = navigator();
    let steps = ten_steps();
    let mut state = FoldState::new(10, false);

    state.apply(&nav.select(&state, &steps, &path("0,3"), true).unwrap());
    let driver = nav.driver().unwrap();
    state.apply(&nav.select(&state, &steps, &path("0,7"), true).unwrap());

    assert_eq!(nav.driver(), Some(driver));
    assert_eq!(nav.timer().started().len(), 1);
    assert_eq!(state.repeat_range(), Some(RepeatRange::new(3, 7)));
    assert_eq!(state.step_idx, 2);
}

#[test]
fn test_user_step_cancels_loop_and_driver() {
    let mut nav = navigator();
    let steps = ten_steps();
    let mut state = FoldState::new(10, false);

    state.apply(&nav.select(&state, &steps, &path("0,3"), true).unwrap());
    let driver = nav.driver().unwrap();

    state.apply(&nav.step_forward(&state));
    assert_eq!(state.step_idx, 3);
    assert!(!state.is_looping());
    assert!(nav.driver().is_none());
    assert!(!nav.timer().is_live(driver));
    assert_eq!(nav.timer().stopped(), &[driver]);
}

#[test]
fn test_plain_click_stops_driver() {
    let mut nav = navigator();
    let steps = ten_steps();
    let mut state = FoldState::new(10, false);

    state.apply(&nav.select(&state, &steps, &path("0,3"), true).unwrap());
    state.apply(&nav.select(&state, &steps, &path("0,6"), false).unwrap());

    assert_eq!(state.step_idx, 5);
    assert!(!state.is_looping());
    assert_eq!(nav.timer().live_drivers(), 0);
}

#[test]
fn test_new_loop_replaces_old_driver() {
    let mut nav = navigator();
    let steps = ten_steps();
    let mut state = FoldState::new(10, false);

    state.apply(&nav.select(&state, &steps, &path("0,3"), true).unwrap());
    let first = nav.driver().unwrap();
    state.apply(&nav.stop_loop());
    state.apply(&nav.select(&state, &steps, &path("0,5"), true).unwrap());
    let second = nav.driver().unwrap();

    assert_ne!(first, second);
    assert_eq!(nav.timer().live_drivers(), 1);
    let tick = nav.timer().tick(first);
    assert!(nav.on_tick(&state, tick.driver).is_none());
}

#[test]
fn test_ticks_sweep_the_range() {
    let mut nav = navigator();
    let steps = ten_steps();
    let mut state = FoldState::new(10, false);

    state.apply(&nav.select(&state, &steps, &path("0,2"), true).unwrap());
    state.apply(&nav.select(&state, &steps, &path("0,5"), true).unwrap());
    assert_eq!(state.step_idx, 1);
    let driver = nav.driver().unwrap();

    let mut seen = Vec::new();
    for _ in 0..8 {
        let update = nav.on_tick(&state, driver).unwrap();
        state.apply(&update);
        seen.push(state.step_idx);
    }
    assert_eq!(seen, vec![2, 3, 4, 5, 4, 3, 2, 1]);
    // Looper moves never clear the loop.
    assert!(state.is_looping());
    assert_eq!(nav.driver(), Some(driver));
}

#[test]
fn test_late_tick_after_cancel_is_ignored() {
    let mut nav = navigator();
    let steps = ten_steps();
    let mut state = FoldState::new(10, false);

    state.apply(&nav.select(&state, &steps, &path("0,3"), true).unwrap());
    let driver = nav.driver().unwrap();
    state.apply(&nav.jump_to_end(&state));
    assert_eq!(state.step_idx, 9);

    let before = state.clone();
    assert!(nav.on_tick(&state, driver).is_none());
    assert_eq!(state, before);
    assert!(nav.driver().is_none());
}

#[test]
fn test_stop_loop_twice_is_safe() {
    let mut nav = navigator();
    let steps = ten_steps();
    let mut state = FoldState::new(10, false);

    state.apply(&nav.select(&state, &steps, &path("0,3"), true).unwrap());
    state.apply(&nav.stop_loop());
    state.apply(&nav.stop_loop());
    assert!(!state.is_looping());
    assert_eq!(nav.timer().stopped().len(), 1);
}

#[test]
fn test_unknown_path_leaves_driver_alone() {
    let mut nav = navigator();
    let steps = ten_steps();
    let mut state = FoldState::new(10, false);

    state.apply(&nav.select(&state, &steps, &path("0,3"), true).unwrap());
    assert!(nav.select(&state, &steps, &path("0,99"), false).is_none());
    assert!(nav.driver().is_some());
    assert!(state.is_looping());
}

#[test]
fn test_custom_period() {
    let config = NavigatorConfig {
        loop_period_ms: 750,
        ..Default::default()
    };
    let mut nav = Navigator::new(ManualLoopTimer::new(), &config);
    let steps = ten_steps();
    let state = FoldState::new(10, false);
    nav.select(&state, &steps, &path("0,1"), true).unwrap();
    assert_eq!(nav.timer().started()[0].1, Duration::from_millis(750));
}

#[test]
fn test_extending_restored_loop_starts_driver() {
    let mut nav = navigator();
    let steps = ten_steps();
    // Loop carried in from a saved state; this navigator never started it.
    let mut state = FoldState {
        step_idx: 1,
        repeat: Some(RepeatLoop {
            root: 2,
            range: RepeatRange::new(2, 2),
        }),
        ..FoldState::new(10, false)
    };

    state.apply(&nav.select(&state, &steps, &path("0,4"), true).unwrap());

    assert_eq!(state.repeat_range(), Some(RepeatRange::new(2, 4)));
    assert_eq!(state.repeat_root(), 2);
    let driver = nav.driver().unwrap();
    assert!(nav.timer().is_live(driver));
    assert_eq!(nav.timer().live_drivers(), 1);
    assert_eq!(nav.direction(), LoopDirection::Forward);

    let update = nav.on_tick(&state, driver).unwrap();
    state.apply(&update);
    assert_eq!(state.step_idx, 2);
}

#[test]
fn test_extending_running_loop_keeps_direction() {
    let mut nav = navigator();
    let steps = ten_steps();
    let mut state = FoldState::new(10, false);

    state.apply(&nav.select(&state, &steps, &path("0,3"), true).unwrap());
    let driver = nav.driver().unwrap();
    // 2 -> 3, turning at the end of [3, 3].
    state.apply(&nav.on_tick(&state, driver).unwrap());
    assert_eq!(nav.direction(), LoopDirection::Backward);

    state.apply(&nav.select(&state, &steps, &path("0,6"), true).unwrap());
    assert_eq!(nav.driver(), Some(driver));
    assert_eq!(nav.timer().started().len(), 1);
    assert_eq!(nav.direction(), LoopDirection::Backward);
}

#[test]
fn test_jumps_end_the_loop() {
    let mut nav = navigator();
    let steps = ten_steps();
    let mut state = FoldState::new(10, false);

    state.apply(&nav.select(&state, &steps, &path("0,3"), true).unwrap());
    state.apply(&nav.jump_to_start());
    assert_eq!(state.step_idx, -1);
    assert!(!state.is_looping());
    assert!(nav.driver().is_none());
}
