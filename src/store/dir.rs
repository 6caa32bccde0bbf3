use crate::foundation::core::FrameNumber;
use crate::foundation::error::{ReelError, ReelResult};
use crate::frame::Frame;
use crate::store::FrameStore;
use crate::store::ppm::{decode_p6, encode_p6};
use anyhow::Context as _;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// File name prefix shared by input and output frames.
pub const FRAME_PREFIX: &str = "tmp";
/// File extension shared by input and output frames.
pub const FRAME_EXT: &str = "ppm";

/// File name of frame `n`, e.g. `tmp007.ppm`.
pub fn frame_file_name(n: FrameNumber) -> String {
    format!("{FRAME_PREFIX}{n}.{FRAME_EXT}")
}

/// printf-style pattern matching [`frame_file_name`], as understood by `ffmpeg -i`.
pub fn frame_file_pattern() -> String {
    format!("{FRAME_PREFIX}%03d.{FRAME_EXT}")
}

/// Count regular files directly inside `dir`.
///
/// Directories and symlinks are not counted; names are not checked against the frame pattern.
pub fn count_regular_files(dir: &Path) -> ReelResult<usize> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read input directory '{}'", dir.display()))?;
    let mut n = 0usize;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to list input directory '{}'", dir.display()))?;
        let ty = entry
            .file_type()
            .with_context(|| format!("failed to stat '{}'", entry.path().display()))?;
        if ty.is_file() {
            n += 1;
        }
    }
    Ok(n)
}

/// Reads `tmpNNN.ppm` frames from `input_dir` and writes them under the same name to
/// `output_dir`.
#[derive(Clone, Debug)]
pub struct DirFrameStore {
    input_dir: PathBuf,
    output_dir: PathBuf,
    output_ready: bool,
}

impl DirFrameStore {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            output_ready: false,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn input_path(&self, n: FrameNumber) -> PathBuf {
        self.input_dir.join(frame_file_name(n))
    }

    pub fn output_path(&self, n: FrameNumber) -> PathBuf {
        self.output_dir.join(frame_file_name(n))
    }
}

impl FrameStore for DirFrameStore {
    fn count_frames(&mut self) -> ReelResult<usize> {
        count_regular_files(&self.input_dir)
    }

    fn load(&mut self, n: FrameNumber) -> ReelResult<Option<Frame>> {
        let path = self.input_path(n);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("failed to open frame '{}'", path.display()))
                    .into());
            }
        };
        let mut r = BufReader::new(file);
        let frame = decode_p6(&mut r).map_err(|e| match e {
            ReelError::Format(msg) => {
                ReelError::format(format!("{msg} (error loading '{}')", path.display()))
            }
            other => other,
        })?;
        Ok(Some(frame))
    }

    fn store(&mut self, n: FrameNumber, frame: &Frame) -> ReelResult<()> {
        if !self.output_ready {
            std::fs::create_dir_all(&self.output_dir).with_context(|| {
                format!(
                    "failed to create output directory '{}'",
                    self.output_dir.display()
                )
            })?;
            self.output_ready = true;
        }
        let path = self.output_path(n);
        let file = File::create(&path)
            .with_context(|| format!("unable to open file '{}'", path.display()))?;
        let mut w = BufWriter::new(file);
        encode_p6(&mut w, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rgb8;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = PathBuf::from("target").join("store_dir_tests").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn names_are_zero_padded() {
        assert_eq!(frame_file_name(FrameNumber(1)), "tmp001.ppm");
        assert_eq!(frame_file_name(FrameNumber(42)), "tmp042.ppm");
        assert_eq!(frame_file_pattern(), "tmp%03d.ppm");
    }

    #[test]
    fn count_includes_stray_files_but_not_dirs() {
        let dir = scratch_dir("count");
        std::fs::write(dir.join("tmp001.ppm"), b"x").unwrap();
        std::fs::write(dir.join("notes.txt"), b"x").unwrap();
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        assert_eq!(count_regular_files(&dir).unwrap(), 2);
    }

    #[test]
    fn count_of_missing_dir_is_error() {
        let dir = PathBuf::from("target")
            .join("store_dir_tests")
            .join("does_not_exist");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(count_regular_files(&dir).is_err());
    }

    #[test]
    fn missing_frame_loads_as_none() {
        let dir = scratch_dir("missing");
        let mut store = DirFrameStore::new(&dir, dir.join("out"));
        assert!(store.load(FrameNumber(1)).unwrap().is_none());
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = scratch_dir("round_trip");
        let frame = Frame::filled(4, 3, Rgb8::new(9, 99, 199)).unwrap();

        let mut writer = DirFrameStore::new(dir.join("in_unused"), dir.join("frames"));
        writer.store(FrameNumber(5), &frame).unwrap();
        assert!(dir.join("frames").join("tmp005.ppm").exists());

        let mut reader = DirFrameStore::new(dir.join("frames"), dir.join("out_unused"));
        assert_eq!(reader.load(FrameNumber(5)).unwrap(), Some(frame));
    }

    #[test]
    fn corrupt_frame_is_fatal() {
        let dir = scratch_dir("corrupt");
        std::fs::write(dir.join("tmp001.ppm"), b"P5\n1 1\n255\n\x00").unwrap();
        let mut store = DirFrameStore::new(&dir, dir.join("out"));
        let err = store.load(FrameNumber(1)).unwrap_err();
        let path = dir.join("tmp001.ppm");
        let ReelError::Format(msg) = &err else {
            panic!("expected a format error, got {err:?}");
        };
        assert!(msg.contains(&format!("error loading '{}'", path.display())));
    }
}
