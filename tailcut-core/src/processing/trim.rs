// ============================================================================
// tailcut-core/src/processing/trim.rs
// ============================================================================
//
// TRIMMER: Stream-copy cut of [0, cut) into a new file
//
// ffmpeg limits the input to `cut` seconds and copies every stream without
// re-encoding, so the end of the output lands on packet/keyframe granularity
// and may fall slightly before `cut`. An existing output file is overwritten.
// A failed run can leave a partial output behind; it is not removed.

use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::{FfmpegCommandBuilder, FfmpegSpawner, run_to_completion};

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::path::Path;

/// Checks that `cut` lies strictly inside the video.
///
/// A `duration` of `0.0` means unknown, in which case only the lower
/// bound can be checked.
pub fn validate_cut_point(cut: f64, duration: f64) -> CoreResult<()> {
    let within_lower = cut.is_finite() && cut > 0.0;
    let within_upper = duration <= 0.0 || cut < duration;
    if within_lower && within_upper {
        Ok(())
    } else {
        Err(CoreError::InvalidCutPoint { cut, duration })
    }
}

pub(crate) fn build_trim_command(input_path: &Path, output_path: &Path, cut: f64) -> FfmpegCommand {
    let mut cmd = FfmpegCommandBuilder::new().build();
    cmd.args(["-t", &format!("{cut:.6}")])
        .input(input_path.to_string_lossy().into_owned())
        .args(["-c", "copy"])
        .args(["-loglevel", "error"])
        .overwrite()
        .output(output_path.to_string_lossy().into_owned());
    cmd
}

/// Writes the first `cut` seconds of `input_path` to `output_path` with stream copy.
///
/// Callers are expected to have run [`validate_cut_point`].
pub fn trim_to<S: FfmpegSpawner>(
    spawner: &S,
    input_path: &Path,
    output_path: &Path,
    cut: f64,
) -> CoreResult<()> {
    log::debug!(
        "Trimming {} at {:.3}s -> {}",
        input_path.display(),
        cut,
        output_path.display()
    );

    let cmd = build_trim_command(input_path, output_path, cut);
    let mut stderr_output = String::new();

    let status = run_to_completion(spawner, cmd, |event| {
        match event {
            FfmpegEvent::Log(_, line) | FfmpegEvent::Error(line) => {
                stderr_output.push_str(&line);
                stderr_output.push('\n');
            }
            _ => {}
        }
        Ok(())
    })?;

    if !status.success() {
        log::error!(
            "ffmpeg trim failed for {} with status {}",
            input_path.display(),
            status
        );
        return Err(command_failed_error(
            "ffmpeg (trim)",
            status,
            stderr_output.trim_end(),
        ));
    }

    Ok(())
}
