//! Downstream video assembly.

/// `ffmpeg`-based MP4 assembly from stored frames.
pub mod ffmpeg;
