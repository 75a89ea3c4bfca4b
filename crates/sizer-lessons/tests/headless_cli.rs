#![forbid(unsafe_code)]

//! Headless runs configured the way the binary configures them.

use sizer_lessons::cli::{Opts, Parsed};
use sizer_lessons::headless;

fn opts(args: &[&str]) -> Opts {
    match Opts::parse_from(args, |_| None) {
        Ok(Parsed::Run(opts)) => opts,
        other => panic!("expected options, got {other:?}"),
    }
}

#[test]
fn headless_default_lesson_is_auto_resize() {
    let text = headless::run(&opts(&["--headless"])).unwrap();
    assert!(text.contains("Week 4 · Auto resize with a timer"));
    assert!(text.contains("React logo · 300px"));
    assert!(text.contains("[p] Play"));
}

#[test]
fn headless_script_plays_then_pauses() {
    let text = headless::run(&opts(&[
        "--headless",
        "--keys=p<wait:3000>p++",
        "--advance-ms=5000",
    ]))
    .unwrap();
    // 300 -> 400 -> 500 -> 100, paused, then two manual steps.
    assert!(text.contains("React logo · 120px"), "{text}");
    assert!(text.contains("size 120px · manual"));
}

#[test]
fn headless_interval_flag_changes_cadence() {
    let text = headless::run(&opts(&[
        "--headless",
        "--interval-ms=100",
        "--keys=p<wait:200>",
    ]))
    .unwrap();
    assert!(text.contains("React logo · 500px"), "{text}");
    assert!(text.contains("every 100ms"));
}

#[test]
fn headless_respects_frame_size() {
    let text = headless::run(&opts(&["--headless", "--size=40x10", "--lesson=1"])).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    assert!(lines.iter().all(|l| l.chars().count() <= 40));
}

#[test]
fn headless_lesson_switch_by_key() {
    let text = headless::run(&opts(&["--headless", "--keys=5++"])).unwrap();
    assert!(text.contains("Week 5 · Shared context"));
    assert!(text.contains("React logo · 320px"), "{text}");
}

#[test]
fn exit_after_stops_the_clock_early() {
    let text = headless::run(&opts(&[
        "--headless",
        "--exit-after-ms=1500",
        "--keys=p<wait:10000>",
    ]))
    .unwrap();
    assert!(text.contains("React logo · 400px"), "{text}");
}
