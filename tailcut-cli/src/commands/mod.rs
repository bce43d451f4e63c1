//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

use crate::cli::DetectorArgs;
use tailcut_core::CoreConfigBuilder;

/// Module containing the implementation of the `trim` command.
pub mod trim;

/// Module containing the implementation of the `probe` command.
pub mod probe;

/// Applies the shared detector flags to a config builder.
pub fn apply_detector_args(builder: CoreConfigBuilder, args: &DetectorArgs) -> CoreConfigBuilder {
    builder
        .detector(args.detector)
        .picture_threshold(args.picture_threshold)
        .pixel_threshold(args.pixel_threshold)
        .min_black_duration(args.min_black_duration)
        .region_from_end(args.region_from_end)
        .use_hw_decode(args.hw_decode)
        .brightness_threshold(args.brightness_threshold)
        .search_secs(args.search_secs)
}
