//! Controller state machine tests: transition-table conformance,
//! invariants, and the scan scenarios.

use iriscan::analysis::{AnalysisError, ApiConfig};
use iriscan::app::{App, Phase, PhaseKind};
use iriscan::camera::CaptureSource;
use iriscan::image::EncodedImage;
use iriscan::report::{HealthReport, RiskLevel};

use crate::common::sample_report;

const TEST_PHONE: &str = "5551234567";
const TEST_IMAGE: &str = "data:image/png;base64,AAA";

fn fresh_app() -> App {
    App::with_config(ApiConfig::new("test-key"), CaptureSource::TestFrame)
}

/// Drive an app through Splash and Auth to the Dashboard.
fn authed(mut app: App) -> App {
    app.splash_elapsed();

    let form = app.profile_form_mut().expect("Auth phase has a form");
    for ch in TEST_PHONE.chars() {
        form.phone.enter_char(ch);
    }
    app.submit_profile();
    assert_eq!(app.phase_kind(), PhaseKind::Dashboard);
    app
}

fn authed_app() -> App {
    authed(fresh_app())
}

fn test_image() -> EncodedImage {
    EncodedImage::new(TEST_IMAGE).unwrap()
}

#[test]
fn app_starts_in_splash() {
    let app = fresh_app();
    assert_eq!(app.phase_kind(), PhaseKind::Splash);
    assert!(app.profile().is_none());
}

#[test]
fn happy_path_visits_every_phase_in_order() {
    let mut app = fresh_app();
    assert_eq!(app.phase_kind(), PhaseKind::Splash);

    app.splash_elapsed();
    assert_eq!(app.phase_kind(), PhaseKind::Auth);

    let form = app.profile_form_mut().unwrap();
    for ch in TEST_PHONE.chars() {
        form.phone.enter_char(ch);
    }
    app.submit_profile();
    assert_eq!(app.phase_kind(), PhaseKind::Dashboard);

    app.start_scan();
    assert_eq!(app.phase_kind(), PhaseKind::Scanning);

    let request = app.complete_capture(test_image()).expect("capture accepted");
    assert_eq!(app.phase_kind(), PhaseKind::Analyzing);

    request.resolve(Ok(sample_report()));
    app.process_analysis_events();
    assert_eq!(app.phase_kind(), PhaseKind::Results);

    app.reset();
    assert_eq!(app.phase_kind(), PhaseKind::Dashboard);
}

// Scenario A: submitted profile lands on the Dashboard with the last four
// digits as the session ID.
#[test]
fn submitted_profile_exposes_id_suffix() {
    let app = authed_app();
    let profile = app.profile().expect("profile stored at Auth completion");
    assert_eq!(profile.phone_number, TEST_PHONE);
    assert_eq!(profile.id_suffix(), "4567");
}

#[test]
fn submit_without_phone_stays_in_auth() {
    let mut app = fresh_app();
    app.splash_elapsed();
    app.submit_profile();
    assert_eq!(app.phase_kind(), PhaseKind::Auth);
    assert!(app.profile().is_none());
    assert!(app.status_message().is_some());
}

// Scenario B: capture carries the exact payload and stored profile into
// the analysis request.
#[test]
fn capture_moves_to_analyzing_with_payload_and_profile() {
    let mut app = authed_app();
    app.start_scan();

    let request = app.complete_capture(test_image()).expect("capture accepted");
    assert_eq!(app.phase_kind(), PhaseKind::Analyzing);
    assert_eq!(request.image().as_str(), TEST_IMAGE);
    assert_eq!(
        request.profile().map(|p| p.phone_number.as_str()),
        Some(TEST_PHONE)
    );

    match app.phase() {
        Phase::Analyzing { image, .. } => assert_eq!(image.as_str(), TEST_IMAGE),
        other => panic!("expected Analyzing, got {other:?}"),
    }
}

// Scenario C: a resolved report reaches Results untouched, alongside the
// captured image.
#[test]
fn resolved_analysis_reaches_results_intact() {
    let mut app = authed_app();
    app.start_scan();
    let request = app.complete_capture(test_image()).unwrap();

    request.resolve(Ok(sample_report()));
    app.process_analysis_events();

    match app.phase() {
        Phase::Results { image, report } => {
            assert_eq!(image.as_str(), TEST_IMAGE);
            assert_eq!(*report, sample_report());
            assert_eq!(report.risk_level, RiskLevel::Low);
        }
        other => panic!("expected Results, got {other:?}"),
    }
    // Profile survives for the whole session.
    assert!(app.profile().is_some());
}

// Scenario D: a failed analysis still reaches Results, carrying the
// clearly marked fallback report.
#[test]
fn failed_analysis_substitutes_fallback_report() {
    let mut app = authed_app();
    app.start_scan();
    let request = app.complete_capture(test_image()).unwrap();

    request.resolve(Err(AnalysisError::MissingCandidate));
    app.process_analysis_events();

    match app.phase() {
        Phase::Results { report, .. } => {
            assert!(report.is_fallback());
            assert_eq!(report.risk_level, RiskLevel::Unknown);
            assert!(!report.risk_level.is_diagnostic());
        }
        other => panic!("expected Results, got {other:?}"),
    }
}

#[test]
fn dropped_analysis_task_also_falls_back() {
    let mut app = authed_app();
    app.start_scan();
    let request = app.complete_capture(test_image()).unwrap();

    // Simulate the task dying without resolving.
    drop(request);
    app.process_analysis_events();

    match app.phase() {
        Phase::Results { report, .. } => assert!(report.is_fallback()),
        other => panic!("expected Results, got {other:?}"),
    }
}

// Scenario E: cancelling during Scanning returns to the Dashboard with
// nothing captured and no analysis started.
#[test]
fn cancel_during_scanning_returns_to_dashboard() {
    let mut app = authed_app();
    app.start_scan();
    assert_eq!(app.phase_kind(), PhaseKind::Scanning);

    app.cancel_scan();
    assert_eq!(app.phase_kind(), PhaseKind::Dashboard);

    // No capture happened, so a stray capture trigger is now a no-op.
    assert!(app.complete_capture(test_image()).is_none());
}

#[test]
fn reset_clears_scan_data_and_is_repeatable() {
    let mut app = authed_app();

    for _ in 0..3 {
        app.start_scan();
        let request = app.complete_capture(test_image()).unwrap();
        request.resolve(Ok(sample_report()));
        app.process_analysis_events();
        assert_eq!(app.phase_kind(), PhaseKind::Results);

        app.reset();
        assert_eq!(app.phase_kind(), PhaseKind::Dashboard);
        // Scan data lives only inside the Results variant; after reset a
        // capture trigger outside Scanning yields nothing.
        assert!(app.complete_capture(test_image()).is_none());
        assert_eq!(app.phase_kind(), PhaseKind::Dashboard);
    }
}

#[test]
fn mismatched_triggers_do_not_change_phase() {
    let mut app = fresh_app();

    // Splash: everything but the timer is ignored.
    app.start_scan();
    app.cancel_scan();
    app.reset();
    app.submit_profile();
    assert!(app.complete_capture(test_image()).is_none());
    assert_eq!(app.phase_kind(), PhaseKind::Splash);

    // Auth: scan/reset triggers are ignored.
    app.splash_elapsed();
    app.start_scan();
    app.reset();
    assert!(app.complete_capture(test_image()).is_none());
    assert_eq!(app.phase_kind(), PhaseKind::Auth);

    // Dashboard: capture-complete and reset are no-ops.
    let mut app = authed_app();
    assert!(app.complete_capture(test_image()).is_none());
    app.reset();
    app.cancel_scan();
    assert_eq!(app.phase_kind(), PhaseKind::Dashboard);

    // A second splash trigger later in the flow does nothing.
    app.splash_elapsed();
    assert_eq!(app.phase_kind(), PhaseKind::Dashboard);
}

#[test]
fn analyzing_ignores_further_captures() {
    let mut app = authed_app();
    app.start_scan();
    let first = app.complete_capture(test_image()).unwrap();

    // Already Analyzing: a second capture yields no request.
    assert!(app.complete_capture(test_image()).is_none());
    assert_eq!(app.phase_kind(), PhaseKind::Analyzing);

    first.resolve(Ok(sample_report()));
    app.process_analysis_events();
    assert_eq!(app.phase_kind(), PhaseKind::Results);
}

#[test]
fn profile_is_present_for_all_post_auth_phases() {
    let mut app = authed_app();
    assert!(app.profile().is_some());

    app.start_scan();
    assert!(app.profile().is_some());

    let request = app.complete_capture(test_image()).unwrap();
    assert!(app.profile().is_some());

    request.resolve(Ok(sample_report()));
    app.process_analysis_events();
    assert!(app.profile().is_some());
}

#[test]
fn fallback_report_renders_distinctly_from_success() {
    let fallback = HealthReport::unavailable("boom");
    let healthy = sample_report();
    assert_ne!(fallback.risk_level, healthy.risk_level);
    assert!(fallback.is_fallback());
    assert!(!healthy.is_fallback());
}

/// App wired to a shell grabber, authed to the Dashboard. The analysis
/// endpoint points at a closed local port so no spawned task leaves the
/// machine.
#[cfg(unix)]
fn app_with_grabber(script: &str) -> App {
    let source = CaptureSource::Command(vec![
        "sh".to_string(),
        "-c".to_string(),
        script.to_string(),
    ]);
    let api = ApiConfig::new("test-key").with_endpoint("http://127.0.0.1:9");
    authed(App::with_config(api, source))
}

#[cfg(unix)]
async fn pump_capture_until(app: &mut App, done: impl Fn(&App) -> bool) {
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(3);
    while !done(app) {
        assert!(
            std::time::Instant::now() < deadline,
            "capture did not resolve in time"
        );
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        app.process_capture_events();
    }
}

// A grabber that takes its time must not wedge the controller: the
// trigger returns immediately and the result arrives through the pump.
#[cfg(unix)]
#[tokio::test]
async fn slow_grabber_does_not_stall_the_frame_pump() {
    let mut app = app_with_grabber("sleep 0.3; echo frame");
    app.start_scan();

    let before = std::time::Instant::now();
    app.start_capture();
    assert!(
        before.elapsed() < std::time::Duration::from_millis(200),
        "capture trigger must not wait for the grabber"
    );
    assert!(app.capture_in_flight());
    assert_eq!(app.phase_kind(), PhaseKind::Scanning);

    // The pump keeps running while the grabber sleeps; no progress yet.
    app.process_capture_events();
    assert_eq!(app.phase_kind(), PhaseKind::Scanning);

    pump_capture_until(&mut app, |app| {
        app.phase_kind() != PhaseKind::Scanning
    })
    .await;
    assert_eq!(app.phase_kind(), PhaseKind::Analyzing);
}

#[cfg(unix)]
#[tokio::test]
async fn failed_capture_surfaces_in_status_and_stays_scanning() {
    let mut app = app_with_grabber("echo device busy >&2; exit 1");
    app.start_scan();
    app.start_capture();

    pump_capture_until(&mut app, |app| !app.capture_in_flight()).await;

    assert_eq!(app.phase_kind(), PhaseKind::Scanning);
    let status = app.status_message().expect("failure reaches the status line");
    assert!(status.contains("Capture failed"), "got status {status:?}");
}

#[cfg(unix)]
#[tokio::test]
async fn cancel_discards_an_in_flight_capture() {
    let mut app = app_with_grabber("sleep 0.2; echo frame");
    app.start_scan();
    app.start_capture();
    assert!(app.capture_in_flight());

    app.cancel_scan();
    assert_eq!(app.phase_kind(), PhaseKind::Dashboard);

    // The orphaned grabber resolves into a dropped channel; the pump
    // stays a no-op and the phase is untouched.
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    app.process_capture_events();
    assert_eq!(app.phase_kind(), PhaseKind::Dashboard);
}

#[test]
fn capture_trigger_outside_scanning_is_ignored() {
    let mut app = authed_app();
    app.start_capture();
    assert_eq!(app.phase_kind(), PhaseKind::Dashboard);
    assert!(!app.capture_in_flight());
}
