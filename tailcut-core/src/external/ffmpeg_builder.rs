//! Common prefix of every ffmpeg invocation.
//!
//! Detectors and the trimmer start from [`FfmpegCommandBuilder::build`] and
//! append their input and output arguments. Hardware acceleration here means
//! decoding only; trimming is always a stream copy.

use crate::hardware_decode::add_hardware_decoding_to_command;
use ffmpeg_sidecar::command::FfmpegCommand;

/// Builds the input-side options shared by all ffmpeg runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegCommandBuilder {
    use_hw_decode: bool,
}

impl FfmpegCommandBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode with CUDA (NVDEC) when `enabled`.
    #[must_use]
    pub fn with_hardware_accel(mut self, enabled: bool) -> Self {
        self.use_hw_decode = enabled;
        self
    }

    /// Returns a command holding `-hide_banner` and the decode options.
    ///
    /// Everything added here precedes the input, so callers append `-i`
    /// (and any input options) afterwards.
    #[must_use]
    pub fn build(self) -> FfmpegCommand {
        let mut cmd = FfmpegCommand::new();
        cmd.arg("-hide_banner");
        add_hardware_decoding_to_command(&mut cmd, self.use_hw_decode);
        cmd
    }
}
