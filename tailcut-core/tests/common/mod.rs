// tailcut-core/tests/common/mod.rs
//
// Mocks for the external tool traits, shared by the integration tests.

#![allow(dead_code)]

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel, OutputVideoFrame};
use std::cell::RefCell;
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;
use tailcut_core::error::{CoreError, CoreResult};
use tailcut_core::external::{FfmpegProcess, FfmpegSpawner, FfprobeExecutor};
use tailcut_core::processing::VideoHandle;

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Rc<RefCell<Vec<FfmpegEvent>>>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.events_to_emit.borrow().clone();
        for event in events {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    pub create_dummy_output: bool,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each expectation is consumed by the first spawned command having an
/// argument that contains its pattern.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        create_dummy_output: bool,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: ExitStatus::from_raw(0),
        };
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), false);
    }

    /// `exit_code` is the process exit code, e.g. 1.
    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: ExitStatus::from_raw(exit_code << 8),
        };
        self.add_expectation(arg_pattern, Ok(process), false);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }

    pub fn remaining_expectations(&self) -> usize {
        self.expectations.borrow().len()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            panic!("MockFfmpegSpawner: unexpected ffmpeg call: {args:?}");
        };
        let expectation = expectations.remove(index);

        let process = expectation.result?;
        if expectation.create_dummy_output {
            if let Some(output_path) = args.last().map(PathBuf::from) {
                if let Some(parent) = output_path.parent() {
                    std::fs::create_dir_all(parent).unwrap();
                }
                std::fs::write(&output_path, b"trimmed").unwrap();
            }
        }
        Ok(process)
    }
}

/// Mock FfprobeExecutor returning canned timing per path.
///
/// Paths without an entry get `fallback`, if one is set.
#[derive(Default)]
pub struct MockFfprobeExecutor {
    handles: RefCell<HashMap<PathBuf, (f64, u64)>>,
    fallback: RefCell<Option<(f64, u64)>>,
    calls: RefCell<Vec<PathBuf>>,
}

impl MockFfprobeExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_video(self, path: &Path, frame_rate: f64, frame_count: u64) -> Self {
        self.handles
            .borrow_mut()
            .insert(path.to_path_buf(), (frame_rate, frame_count));
        self
    }

    pub fn with_fallback(self, frame_rate: f64, frame_count: u64) -> Self {
        *self.fallback.borrow_mut() = Some((frame_rate, frame_count));
        self
    }

    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn probe_video(&self, input_path: &Path) -> CoreResult<VideoHandle> {
        self.calls.borrow_mut().push(input_path.to_path_buf());
        let timing = self
            .handles
            .borrow()
            .get(input_path)
            .copied()
            .or(*self.fallback.borrow());
        match timing {
            Some((frame_rate, frame_count)) => Ok(VideoHandle::new(
                input_path.to_path_buf(),
                frame_rate,
                frame_count,
            )),
            None => Err(CoreError::VideoInfoError(format!(
                "MockFfprobeExecutor: no timing for {}",
                input_path.display()
            ))),
        }
    }
}

// ---- Event helpers ----

pub fn blackdetect_line(start: f64, end: f64) -> FfmpegEvent {
    FfmpegEvent::Log(
        LogLevel::Info,
        format!(
            "[blackdetect @ 0x5581c0] black_start:{start} black_end:{end} black_duration:{}",
            end - start
        ),
    )
}

pub fn blackdetect_events(starts: &[f64]) -> Vec<FfmpegEvent> {
    let mut events = vec![FfmpegEvent::Log(
        LogLevel::Info,
        "Stream #0:0: Video: vp9, yuv420p, 1280x720".to_string(),
    )];
    events.extend(starts.iter().map(|&s| blackdetect_line(s, s + 0.5)));
    events
}

/// A gray frame of uniform `level` with sidecar numbering `frame_num`.
pub fn gray_frame(frame_num: u32, level: u8) -> FfmpegEvent {
    FfmpegEvent::OutputFrame(OutputVideoFrame {
        width: 4,
        height: 4,
        pix_fmt: "gray".to_string(),
        output_index: 0,
        data: vec![level; 16],
        frame_num,
        timestamp: 0.0,
    })
}

/// showinfo line for output position `n`, with `pts_time` in a millisecond
/// timebase as WebM and Matroska store it.
pub fn showinfo_line(n: u32, pts_time: f64) -> FfmpegEvent {
    let pts = (pts_time * 1000.0).round() as i64;
    FfmpegEvent::Log(
        LogLevel::Info,
        format!(
            "[Parsed_showinfo_0 @ 0x5581c0] n:{n:>4} pts:{pts:>7} pts_time:{} \
             duration:     33 duration_time:0.033 fmt:gray sar:1/1 s:4x4 i:P iskey:0 type:P",
            pts as f64 / 1000.0
        ),
    )
}

/// Events of a scan decoding `source_frames` (source index, gray level) in
/// order. Frames missing from the list did not decode.
pub fn scan_events(frame_rate: f64, source_frames: &[(u64, u8)]) -> Vec<FfmpegEvent> {
    let mut events = Vec::new();
    for (n, &(index, level)) in source_frames.iter().enumerate() {
        let n = n as u32;
        events.push(showinfo_line(n, index as f64 / frame_rate));
        events.push(gray_frame(n, level));
    }
    events
}

pub fn arg_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).map(String::as_str)
}

pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"source video bytes").unwrap();
}
