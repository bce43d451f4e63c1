// ============================================================================
// tailcut-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. Detectors and the trimmer only see the FfmpegSpawner and
// FfmpegProcess traits, so tests can replay canned events instead of running
// a real ffmpeg binary.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner / SidecarProcess: Implementation using ffmpeg-sidecar
//
// A SidecarProcess that is dropped before `wait` returned kills and reaps
// its child, so every exit path of a detector releases the decode session.

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess {
    child: SidecarChild,
    reaped: bool,
}

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.child.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error(
                "ffmpeg (sidecar - get iter)",
                ExitStatus::default(),
                e.to_string(),
            )
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        let status = self
            .child
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for SidecarProcess {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        log::debug!("Releasing unfinished ffmpeg process");
        if let Err(e) = self.child.kill() {
            log::trace!("ffmpeg kill on drop: {}", e);
        }
        if let Err(e) = self.child.wait() {
            log::warn!("Failed to reap ffmpeg process: {}", e);
        }
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        log::debug!("Spawning ffmpeg: {:?}", cmd);
        cmd.spawn()
            .map(|child| SidecarProcess { child, reaped: false })
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}

/// Drains all events through `handler`, then waits for the exit status.
///
/// Shared by every ffmpeg invocation in the crate. The process handle is
/// dropped on return, which also covers the early-return paths of `?`.
pub fn run_to_completion<S, F>(
    spawner: &S,
    cmd: FfmpegCommand,
    handler: F,
) -> CoreResult<ExitStatus>
where
    S: FfmpegSpawner,
    F: FnMut(FfmpegEvent) -> CoreResult<()>,
{
    let mut process = spawner.spawn(cmd)?;
    process.handle_events(handler)?;
    process.wait()
}
