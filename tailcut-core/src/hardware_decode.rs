//! Hardware decoding configuration.
//!
//! Only NVDEC (`-hwaccel cuda`) is supported, and only for the blackdetect
//! pass. Frames are left in system memory so CPU filters can read them.

use ffmpeg_sidecar::command::FfmpegCommand;

/// Name of the ffmpeg hwaccel used for decoding.
pub const HWACCEL_NAME: &str = "cuda";

/// Gets `FFmpeg` hardware decoding arguments.
#[must_use]
pub fn get_ffmpeg_hwdecode_args() -> Vec<String> {
    vec!["-hwaccel".to_string(), HWACCEL_NAME.to_string()]
}

/// Adds hardware decoding options to an `FFmpeg` command.
///
/// IMPORTANT: This must be called BEFORE adding the input file to the command.
///
/// Returns whether hardware decoding was added.
pub fn add_hardware_decoding_to_command(cmd: &mut FfmpegCommand, use_hw_decode: bool) -> bool {
    if !use_hw_decode {
        return false;
    }

    cmd.args(get_ffmpeg_hwdecode_args());
    log::debug!("Hardware decoding: {} requested", HWACCEL_NAME);
    true
}

/// Human-readable description of the decode path, for status output.
#[must_use]
pub fn describe_decoding(use_hw_decode: bool) -> String {
    if use_hw_decode {
        format!("Hardware ({})", HWACCEL_NAME.to_uppercase())
    } else {
        "Software".to_string()
    }
}
