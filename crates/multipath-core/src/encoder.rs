//! External video encoder (ffmpeg) discovery and invocation.
//!
//! Frames are written as numbered PNGs into a scratch directory that is
//! removed when encoding finishes, then handed to ffmpeg as an image
//! sequence.

use ndarray::{Array4, Axis};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::{EncoderConfig, StillFormat};
use crate::error::PipelineError;
use crate::output::{frame_to_rgb, write_frame};

/// Binary name searched for on `PATH`.
#[cfg(windows)]
const BINARY_NAME: &str = "ffmpeg.exe";
#[cfg(not(windows))]
const BINARY_NAME: &str = "ffmpeg";

/// Install locations checked after `PATH`.
const FALLBACK_LOCATIONS: &[&str] = &[
    "/usr/bin/ffmpeg",
    "/usr/local/bin/ffmpeg",
    "C:\\ffmpeg\\bin\\ffmpeg.exe",
    "C:\\Program Files\\ffmpeg\\bin\\ffmpeg.exe",
];

/// Frame file pattern inside the scratch directory.
const FRAME_PATTERN: &str = "frame_%05d.png";

/// A located ffmpeg binary.
#[derive(Debug, Clone)]
pub struct VideoEncoder {
    binary: PathBuf,
}

impl VideoEncoder {
    /// Find the encoder: the configured binary, then `PATH`, then well-known
    /// install locations.
    ///
    /// A configured binary that does not exist is an error; it does not fall
    /// through to the search.
    pub fn locate(config: &EncoderConfig) -> Result<Self, PipelineError> {
        if let Some(binary) = &config.binary {
            return if binary.is_file() {
                Ok(Self {
                    binary: binary.clone(),
                })
            } else {
                tracing::error!("Configured encoder {:?} does not exist", binary);
                Err(PipelineError::EncoderNotFound)
            };
        }

        search(std::env::var_os("PATH"))
            .map(|binary| {
                tracing::debug!("Using encoder at {:?}", binary);
                Self { binary }
            })
            .ok_or(PipelineError::EncoderNotFound)
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Encode `frames` to an H.264 MP4 at `output`.
    pub fn encode(
        &self,
        frames: &Array4<f32>,
        output: &Path,
        frame_rate: u32,
        crf: u8,
    ) -> Result<(), PipelineError> {
        let scratch = tempfile::tempdir()?;
        for (i, frame) in frames.axis_iter(Axis(0)).enumerate() {
            let path = scratch.path().join(format!("frame_{i:05}.png"));
            write_frame(&frame_to_rgb(frame), &path, StillFormat::Png, 100)?;
        }

        tracing::debug!(
            "Encoding {} frames to {:?} at {} fps, crf {}",
            frames.len_of(Axis(0)),
            output,
            frame_rate,
            crf
        );
        let result = Command::new(&self.binary)
            .args(encode_args(scratch.path(), output, frame_rate, crf))
            .output()?;

        if !result.status.success() {
            return Err(PipelineError::EncodeFailed {
                output: output.to_path_buf(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Arguments for encoding the numbered frames in `frames_dir`.
pub fn encode_args(frames_dir: &Path, output: &Path, frame_rate: u32, crf: u8) -> Vec<OsString> {
    let crf = crf.to_string();
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-framerate".into(),
        frame_rate.to_string().into(),
        "-i".into(),
    ];
    args.push(frames_dir.join(FRAME_PATTERN).into_os_string());
    args.extend(
        [
            "-c:v",
            "libx264",
            "-crf",
            crf.as_str(),
            "-pix_fmt",
            "yuv420p",
            "-preset",
            "medium",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

/// Look for the binary on the given `PATH` value, then in fixed locations.
fn search(path_var: Option<OsString>) -> Option<PathBuf> {
    let on_path = path_var.and_then(|paths| {
        std::env::split_paths(&paths)
            .map(|dir| dir.join(BINARY_NAME))
            .find(|candidate| candidate.is_file())
    });

    on_path.or_else(|| {
        FALLBACK_LOCATIONS
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.is_file())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_args() {
        let args = encode_args(Path::new("/tmp/frames"), Path::new("/out/clip.mp4"), 30, 18);
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-y",
                "-framerate",
                "30",
                "-i",
                "/tmp/frames/frame_%05d.png",
                "-c:v",
                "libx264",
                "-crf",
                "18",
                "-pix_fmt",
                "yuv420p",
                "-preset",
                "medium",
                "/out/clip.mp4",
            ]
        );
    }

    #[test]
    fn test_locate_missing_configured_binary() {
        let dir = tempfile::tempdir().unwrap();
        let config = EncoderConfig {
            binary: Some(dir.path().join("ffmpeg")),
        };
        assert!(matches!(
            VideoEncoder::locate(&config),
            Err(PipelineError::EncoderNotFound)
        ));
    }

    #[test]
    fn test_locate_configured_binary() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("my-ffmpeg");
        std::fs::write(&binary, b"").unwrap();

        let encoder = VideoEncoder::locate(&EncoderConfig {
            binary: Some(binary.clone()),
        })
        .unwrap();
        assert_eq!(encoder.binary(), binary);
    }

    #[test]
    fn test_search_prefers_path_entry() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join(BINARY_NAME);
        std::fs::write(&binary, b"").unwrap();

        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(search(Some(path_var)), Some(binary));
    }

    #[cfg(unix)]
    fn script_encoder(dir: &Path, body: &str) -> VideoEncoder {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-ffmpeg");
        std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        VideoEncoder::locate(&EncoderConfig {
            binary: Some(script),
        })
        .unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn test_encode_reports_encoder_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = script_encoder(dir.path(), "echo 'encoder exploded' >&2\nexit 1");
        let frames = Array4::from_elem((2, 4, 4, 3), 0.5f32);
        let output = dir.path().join("clip.mp4");

        match encoder.encode(&frames, &output, 24, 19) {
            Err(PipelineError::EncodeFailed {
                output: failed,
                stderr,
            }) => {
                assert_eq!(failed, output);
                assert!(stderr.contains("encoder exploded"), "stderr was {stderr:?}");
            }
            other => panic!("expected EncodeFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_encode_hands_numbered_frames_to_encoder() {
        let dir = tempfile::tempdir().unwrap();
        // Argument 5 is the input pattern, argument 14 the output path
        let encoder = script_encoder(dir.path(), "ls \"$(dirname \"$5\")\" > \"${14}\"");
        let frames = Array4::from_elem((3, 4, 4, 3), 0.25f32);
        let output = dir.path().join("listing.mp4");

        encoder.encode(&frames, &output, 30, 18).unwrap();

        let listing = std::fs::read_to_string(&output).unwrap();
        let names: Vec<&str> = listing.lines().collect();
        assert_eq!(
            names,
            vec!["frame_00000.png", "frame_00001.png", "frame_00002.png"]
        );
    }
}
