use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

use crate::image::EncodedImage;

/// Where still frames come from.
///
/// Terminals have no camera API of their own, so capture delegates to an
/// external grabber command (fswebcam, imagesnap, ffmpeg, ...) that writes
/// an encoded image to stdout, or to a prepared still file. `TestFrame`
/// keeps the flow usable on machines with neither.
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Program + arguments; must emit one encoded image on stdout.
    Command(Vec<String>),
    /// Read an already-captured still from disk.
    File(PathBuf),
    /// Built-in 1x1 PNG.
    TestFrame,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture command is empty")]
    EmptyCommand,
    #[error("capture I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture command exited with {status}: {stderr}")]
    CommandFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("capture produced no image data")]
    EmptyFrame,
}

/// Smallest valid PNG: one transparent pixel.
const TEST_FRAME_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

impl CaptureSource {
    /// Acquire one still frame as an encoded payload.
    ///
    /// Failures stay inside this boundary: the controller only ever shows
    /// them in the status line and remains in the Scanning phase.
    pub async fn capture(&self) -> Result<EncodedImage, CaptureError> {
        let (bytes, mime) = match self {
            CaptureSource::Command(argv) => (run_grabber(argv).await?, "image/jpeg"),
            CaptureSource::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                (bytes, mime_for_path(path))
            }
            CaptureSource::TestFrame => (TEST_FRAME_PNG.to_vec(), "image/png"),
        };

        if bytes.is_empty() {
            return Err(CaptureError::EmptyFrame);
        }

        let payload = format!("data:{mime};base64,{}", BASE64.encode(&bytes));
        // Non-empty: the payload always carries at least its prefix.
        Ok(EncodedImage::new(payload).expect("data URL is never empty"))
    }

    pub fn describe(&self) -> String {
        match self {
            CaptureSource::Command(argv) => format!("command `{}`", argv.join(" ")),
            CaptureSource::File(path) => format!("file {}", path.display()),
            CaptureSource::TestFrame => "built-in test frame".to_string(),
        }
    }
}

async fn run_grabber(argv: &[String]) -> Result<Vec<u8>, CaptureError> {
    let (program, args) = argv.split_first().ok_or(CaptureError::EmptyCommand)?;

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr: String = String::from_utf8_lossy(&output.stderr)
            .chars()
            .take(512)
            .collect();
        return Err(CaptureError::CommandFailed {
            status: output.status,
            stderr,
        });
    }

    Ok(output.stdout)
}

fn mime_for_path(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
