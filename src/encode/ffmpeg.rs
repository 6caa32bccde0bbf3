use crate::foundation::error::{ReelError, ReelResult};
use crate::store::dir::frame_file_pattern;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Options for assembling stored frames into an MP4 with the system `ffmpeg`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoOpts {
    /// Output video file path.
    pub out_path: PathBuf,
    /// Rate at which the input frame sequence is read.
    pub input_framerate: u32,
    /// Output frame rate.
    pub output_rate: u32,
    /// Video codec passed to `-c:v`.
    pub codec: String,
    /// Pixel format passed to `-pix_fmt`.
    pub pix_fmt: String,
    /// Overwrite `out_path` if it already exists.
    pub overwrite: bool,
}

impl Default for VideoOpts {
    fn default() -> Self {
        Self {
            out_path: PathBuf::from("outfilter.mp4"),
            input_framerate: 24,
            output_rate: 30,
            codec: "libx264".to_string(),
            pix_fmt: "yuv420p".to_string(),
            overwrite: true,
        }
    }
}

impl VideoOpts {
    pub fn validate(&self) -> ReelResult<()> {
        if self.input_framerate == 0 || self.output_rate == 0 {
            return Err(ReelError::validation("video frame rates must be non-zero"));
        }
        if self.codec.is_empty() || self.pix_fmt.is_empty() {
            return Err(ReelError::validation(
                "video codec and pixel format must be set",
            ));
        }
        Ok(())
    }
}

/// Build the `ffmpeg` invocation that turns `frames_dir/tmp%03d.ppm` into `opts.out_path`.
pub fn build_command(frames_dir: &Path, opts: &VideoOpts) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    cmd.arg(if opts.overwrite { "-y" } else { "-n" });
    cmd.args(["-framerate", &opts.input_framerate.to_string(), "-i"])
        .arg(frames_dir.join(frame_file_pattern()))
        .args([
            "-c:v",
            &opts.codec,
            "-r",
            &opts.output_rate.to_string(),
            "-pix_fmt",
            &opts.pix_fmt,
        ])
        .arg(&opts.out_path)
        .args(["-hide_banner", "-loglevel", "error"]);
    cmd
}

/// Encode the frames stored in `frames_dir` into a single video.
///
/// Blocks until `ffmpeg` exits. A missing binary or non-zero exit is a [`ReelError::Encode`].
#[tracing::instrument(skip(opts), fields(out = %opts.out_path.display()))]
pub fn assemble_video(frames_dir: &Path, opts: &VideoOpts) -> ReelResult<()> {
    opts.validate()?;
    ensure_parent_dir(&opts.out_path)?;
    if !opts.overwrite && opts.out_path.exists() {
        return Err(ReelError::validation(format!(
            "output file '{}' already exists",
            opts.out_path.display()
        )));
    }
    if !is_ffmpeg_on_path() {
        return Err(ReelError::encode(
            "ffmpeg is required for video assembly, but was not found on PATH",
        ));
    }

    let output = build_command(frames_dir, opts).output().map_err(|e| {
        ReelError::encode(format!(
            "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
        ))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReelError::encode(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    tracing::info!("video written");
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn default_command_matches_frame_naming() {
        let cmd = build_command(Path::new("outfiles"), &VideoOpts::default());
        assert_eq!(cmd.get_program(), "ffmpeg");
        let input = Path::new("outfiles")
            .join("tmp%03d.ppm")
            .to_string_lossy()
            .into_owned();
        assert_eq!(
            args(&cmd),
            vec![
                "-y",
                "-framerate",
                "24",
                "-i",
                input.as_str(),
                "-c:v",
                "libx264",
                "-r",
                "30",
                "-pix_fmt",
                "yuv420p",
                "outfilter.mp4",
                "-hide_banner",
                "-loglevel",
                "error",
            ]
        );
    }

    #[test]
    fn no_overwrite_uses_dash_n() {
        let opts = VideoOpts {
            overwrite: false,
            ..VideoOpts::default()
        };
        assert_eq!(args(&build_command(Path::new("x"), &opts))[0], "-n");
    }

    #[test]
    fn zero_rates_are_rejected() {
        let opts = VideoOpts {
            input_framerate: 0,
            ..VideoOpts::default()
        };
        assert!(opts.validate().is_err());
        assert!(assemble_video(Path::new("x"), &opts).is_err());
    }
}
