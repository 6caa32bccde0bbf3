use std::path::PathBuf;

use ppmreel::{DirFrameStore, Frame, FrameNumber, FrameStore, Rgb8};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_ppmreel")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "ppmreel.exe"
            } else {
                "ppmreel"
            });
            p
        })
}

#[test]
fn cli_desaturates_frames_without_video() {
    let dir = PathBuf::from("target").join("cli_smoke").join("desaturate");
    let _ = std::fs::remove_dir_all(&dir);
    let in_dir = dir.join("in");
    let out_dir = dir.join("out");

    let mut seed = DirFrameStore::new(dir.join("unused"), &in_dir);
    for n in 1..=3u32 {
        let f = Frame::filled(4, 2, Rgb8::new(30, 60, 90)).unwrap();
        seed.store(FrameNumber(n), &f).unwrap();
    }

    let output = std::process::Command::new(exe())
        .arg("2")
        .arg("--in-dir")
        .arg(&in_dir)
        .arg("--out-dir")
        .arg(&out_dir)
        .args(["--op", "desaturate", "--no-video"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("seconds spent processing"));

    let mut out = DirFrameStore::new(&out_dir, dir.join("unused"));
    for n in 1..=3u32 {
        let f = out.load(FrameNumber(n)).unwrap().unwrap();
        assert!(f.pixels().all(|px| px == Rgb8::gray(60)));
    }
}

#[test]
fn cli_rejects_zero_stride() {
    let dir = PathBuf::from("target").join("cli_smoke").join("zero_stride");
    std::fs::create_dir_all(dir.join("in")).unwrap();

    let status = std::process::Command::new(exe())
        .arg("0")
        .arg("--in-dir")
        .arg(dir.join("in"))
        .arg("--out-dir")
        .arg(dir.join("out"))
        .arg("--no-video")
        .status()
        .unwrap();

    assert!(!status.success());
}

#[test]
fn cli_fails_on_missing_input_dir() {
    let dir = PathBuf::from("target").join("cli_smoke").join("missing_input");
    let _ = std::fs::remove_dir_all(&dir);

    let status = std::process::Command::new(exe())
        .arg("--in-dir")
        .arg(dir.join("in"))
        .arg("--out-dir")
        .arg(dir.join("out"))
        .arg("--no-video")
        .status()
        .unwrap();

    assert!(!status.success());
}
