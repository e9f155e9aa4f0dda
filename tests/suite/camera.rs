//! Capture boundary tests.

use std::io::Write as _;

use iriscan::camera::{CaptureError, CaptureSource};

#[tokio::test]
async fn file_source_produces_a_typed_data_url() {
    let mut file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .unwrap();
    // Content is opaque to the capture boundary; only the bytes matter.
    file.write_all(b"fake png bytes").unwrap();

    let source = CaptureSource::File(file.path().to_path_buf());
    let image = source.capture().await.unwrap();

    assert_eq!(image.mime_type(), "image/png");
    assert!(image.as_str().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn empty_file_is_rejected() {
    let file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();

    let source = CaptureSource::File(file.path().to_path_buf());
    assert!(matches!(
        source.capture().await,
        Err(CaptureError::EmptyFrame)
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn grabber_command_stdout_becomes_the_payload() {
    let source = CaptureSource::Command(vec!["echo".to_string(), "frame".to_string()]);
    let image = source.capture().await.unwrap();
    assert!(image.as_str().starts_with("data:image/jpeg;base64,"));
}

#[cfg(unix)]
#[tokio::test]
async fn failing_grabber_reports_its_stderr() {
    let source = CaptureSource::Command(vec![
        "sh".to_string(),
        "-c".to_string(),
        "echo device busy >&2; exit 1".to_string(),
    ]);
    match source.capture().await {
        Err(CaptureError::CommandFailed { stderr, .. }) => {
            assert!(stderr.contains("device busy"));
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_command_is_rejected() {
    let source = CaptureSource::Command(Vec::new());
    assert!(matches!(
        source.capture().await,
        Err(CaptureError::EmptyCommand)
    ));
}
