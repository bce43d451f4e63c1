// tailcut-core/tests/brightness_scan_tests.rs

mod common;

use common::{MockFfmpegSpawner, MockFfprobeExecutor, gray_frame, scan_events, showinfo_line};
use std::path::Path;
use tailcut_core::config::BrightnessScanParams;
use tailcut_core::error::CoreError;
use tailcut_core::processing::brightness_scan::find_last_black_frame;

fn params(search_secs: f64) -> BrightnessScanParams {
    BrightnessScanParams {
        threshold: 2,
        search_secs,
    }
}

/// Source frames `first..=last`, bright except `dark`.
fn frames_with_dark(first: u64, last: u64, dark: &[u64]) -> Vec<(u64, u8)> {
    (first..=last)
        .map(|k| (k, if dark.contains(&k) { 0 } else { 120 }))
        .collect()
}

#[test]
fn test_closest_dark_frame_to_end_wins() {
    let input = Path::new("/v/a.webm");
    // 40 frames at 10 fps, 2 s window: candidates 21..=39
    let prober = MockFfprobeExecutor::new().with_video(input, 10.0, 40);
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(
        "gray",
        scan_events(10.0, &frames_with_dark(21, 39, &[25, 33])),
        false,
    );

    let t = find_last_black_frame(&spawner, &prober, input, &params(2.0)).unwrap();
    assert!((t - 3.3).abs() < 1e-9, "got {t}");

    let args = &spawner.get_received_calls()[0];
    assert_eq!(common::arg_after(args, "-ss"), Some("2.050000"));
    assert_eq!(common::arg_after(args, "-frames:v"), Some("19"));
    assert_eq!(common::arg_after(args, "-vf"), Some("showinfo"));
}

#[test]
fn test_millisecond_timestamps_at_30_fps() {
    let input = Path::new("/v/a.webm");
    // 40 frames at 30 fps, 1 s window: candidates 11..=39, seek at 0.35
    let prober = MockFfprobeExecutor::new().with_video(input, 30.0, 40);
    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(
        "gray",
        scan_events(30.0, &frames_with_dark(11, 39, &[39])),
        false,
    );

    let t = find_last_black_frame(&spawner, &prober, input, &params(1.0)).unwrap();
    assert!((t - 39.0 / 30.0).abs() < 1e-9, "got {t}");
    let args = &spawner.get_received_calls()[0];
    assert_eq!(common::arg_after(args, "-ss"), Some("0.350000"));
}

#[test]
fn test_first_window_frame_dropped_by_seek() {
    let input = Path::new("/v/a.webm");
    let prober = MockFfprobeExecutor::new().with_video(input, 30.0, 40);
    let spawner = MockFfmpegSpawner::new();
    // Decoding starts one frame late; stream positions no longer match indices
    spawner.add_success_expectation(
        "gray",
        scan_events(30.0, &frames_with_dark(12, 39, &[39])),
        false,
    );

    let t = find_last_black_frame(&spawner, &prober, input, &params(1.0)).unwrap();
    assert!((t - 39.0 / 30.0).abs() < 1e-9, "got {t}");
}

#[test]
fn test_undecodable_frame_does_not_shift_indices() {
    let input = Path::new("/v/a.webm");
    let prober = MockFfprobeExecutor::new().with_video(input, 10.0, 40);
    let spawner = MockFfmpegSpawner::new();
    let mut frames = frames_with_dark(21, 39, &[35]);
    frames.retain(|&(k, _)| k != 30);
    spawner.add_success_expectation("gray", scan_events(10.0, &frames), false);

    let t = find_last_black_frame(&spawner, &prober, input, &params(2.0)).unwrap();
    assert!((t - 3.5).abs() < 1e-9, "got {t}");
}

#[test]
fn test_frames_and_timestamps_in_any_order() {
    let input = Path::new("/v/a.webm");
    let prober = MockFfprobeExecutor::new().with_video(input, 10.0, 40);
    let spawner = MockFfmpegSpawner::new();
    // All frames first, showinfo lines afterwards
    let events = vec![
        gray_frame(0, 0),
        gray_frame(1, 0),
        gray_frame(2, 90),
        showinfo_line(0, 3.6),
        showinfo_line(1, 3.8),
        showinfo_line(2, 3.9),
    ];
    spawner.add_success_expectation("gray", events, false);

    let t = find_last_black_frame(&spawner, &prober, input, &params(2.0)).unwrap();
    assert!((t - 3.8).abs() < 1e-9, "got {t}");
}

#[test]
fn test_no_dark_frame_is_not_found() {
    let input = Path::new("/v/a.webm");
    let prober = MockFfprobeExecutor::new().with_video(input, 10.0, 40);
    let spawner = MockFfmpegSpawner::new();
    let frames: Vec<(u64, u8)> = (21..=39).map(|k| (k, 2)).collect();
    spawner.add_success_expectation("gray", scan_events(10.0, &frames), false);

    let result = find_last_black_frame(&spawner, &prober, input, &params(2.0));
    match result {
        Err(e @ CoreError::NoBlackFrame { .. }) => assert!(e.is_not_found()),
        other => panic!("expected NoBlackFrame, got {other:?}"),
    }
}

#[test]
fn test_zero_threshold_matches_nothing() {
    let input = Path::new("/v/a.webm");
    let prober = MockFfprobeExecutor::new().with_video(input, 10.0, 40);
    let spawner = MockFfmpegSpawner::new();
    // Fully black frames still do not fall below 0
    let frames: Vec<(u64, u8)> = (21..=39).map(|k| (k, 0)).collect();
    spawner.add_success_expectation("gray", scan_events(10.0, &frames), false);

    let zero = BrightnessScanParams {
        threshold: 0,
        search_secs: 2.0,
    };
    let result = find_last_black_frame(&spawner, &prober, input, &zero);
    assert!(matches!(result, Err(CoreError::NoBlackFrame { .. })), "got {result:?}");
}

#[test]
fn test_unknown_frame_rate_never_decodes() {
    let input = Path::new("/v/a.webm");
    let prober = MockFfprobeExecutor::new().with_video(input, 0.0, 40);
    let spawner = MockFfmpegSpawner::new();

    let result = find_last_black_frame(&spawner, &prober, input, &params(120.0));
    assert!(matches!(result, Err(CoreError::NoBlackFrame { .. })));
    assert!(spawner.get_received_calls().is_empty());
}

#[test]
fn test_window_longer_than_video_excludes_first_frame() {
    let input = Path::new("/v/short.webm");
    // 5 frames at 1 fps, 120 s window: candidates 1..=4
    let prober = MockFfprobeExecutor::new().with_video(input, 1.0, 5);
    let spawner = MockFfmpegSpawner::new();
    // With copyts a dark frame 0 could still surface; it is not a candidate
    let frames = vec![(0, 0), (1, 0), (2, 50), (3, 50), (4, 50)];
    spawner.add_success_expectation("gray", scan_events(1.0, &frames), false);

    let t = find_last_black_frame(&spawner, &prober, input, &params(120.0)).unwrap();
    assert_eq!(t, 1.0);
    let args = &spawner.get_received_calls()[0];
    assert_eq!(common::arg_after(args, "-ss"), Some("0.500000"));
}

#[test]
fn test_partial_decode_still_uses_frames() {
    let input = Path::new("/v/a.webm");
    let prober = MockFfprobeExecutor::new().with_video(input, 10.0, 40);
    let spawner = MockFfmpegSpawner::new();
    spawner.add_exit_error_expectation("gray", scan_events(10.0, &[(21, 0), (22, 90)]), 1);

    let t = find_last_black_frame(&spawner, &prober, input, &params(2.0)).unwrap();
    assert!((t - 2.1).abs() < 1e-9);
}

#[test]
fn test_failed_decode_without_frames_is_error() {
    let input = Path::new("/v/a.webm");
    let prober = MockFfprobeExecutor::new().with_video(input, 10.0, 40);
    let spawner = MockFfmpegSpawner::new();
    spawner.add_exit_error_expectation("gray", vec![], 1);

    let result = find_last_black_frame(&spawner, &prober, input, &params(2.0));
    assert!(matches!(result, Err(CoreError::CommandFailed { .. })));
}
