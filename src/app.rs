use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::analysis::{self, AnalysisError, ApiConfig};
use crate::camera::{CaptureError, CaptureSource};
use crate::config::IriscanConfig;
use crate::image::EncodedImage;
use crate::profile::{ProfileForm, UserProfile};
use crate::report::HealthReport;

/// Fixed splash delay before the Auth screen appears.
pub const SPLASH_DURATION: Duration = Duration::from_millis(2500);

/// Result of one analysis task.
pub type AnalysisOutcome = Result<HealthReport, AnalysisError>;

/// Result of one capture task.
pub type CaptureOutcome = Result<EncodedImage, CaptureError>;

/// Current UI phase.
///
/// A real sum type: each variant carries only the data valid for that
/// phase, so "Results without a report" is unrepresentable.
#[derive(Debug)]
pub enum Phase {
    Splash {
        until: Instant,
    },
    Auth(ProfileForm),
    Dashboard,
    Scanning {
        /// Receiver for an in-flight capture task, if one was triggered.
        capture: Option<mpsc::UnboundedReceiver<CaptureOutcome>>,
    },
    Analyzing {
        image: EncodedImage,
        outcome: mpsc::UnboundedReceiver<AnalysisOutcome>,
    },
    Results {
        image: EncodedImage,
        report: HealthReport,
    },
}

/// Discriminant-only view of [`Phase`], for dispatch and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Splash,
    Auth,
    Dashboard,
    Scanning,
    Analyzing,
    Results,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Splash { .. } => PhaseKind::Splash,
            Phase::Auth(_) => PhaseKind::Auth,
            Phase::Dashboard => PhaseKind::Dashboard,
            Phase::Scanning { .. } => PhaseKind::Scanning,
            Phase::Analyzing { .. } => PhaseKind::Analyzing,
            Phase::Results { .. } => PhaseKind::Results,
        }
    }
}

/// Proof that a capture entered the Analyzing phase.
///
/// `complete_capture` yields exactly one of these per capture, and it is
/// the only way to start an analysis task, so the client cannot be
/// invoked twice for one scan.
#[derive(Debug)]
pub struct AnalysisRequest {
    image: EncodedImage,
    profile: Option<UserProfile>,
    sender: mpsc::UnboundedSender<AnalysisOutcome>,
}

impl AnalysisRequest {
    pub fn image(&self) -> &EncodedImage {
        &self.image
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Deliver the outcome back to the controller.
    pub fn resolve(self, outcome: AnalysisOutcome) {
        // The receiver only disappears on app teardown; nothing to do then.
        let _ = self.sender.send(outcome);
    }
}

/// Application controller: owns the phase machine and all session state.
pub struct App {
    phase: Phase,
    profile: Option<UserProfile>,
    api: ApiConfig,
    capture_source: CaptureSource,
    status_message: Option<String>,
    should_quit: bool,
    tick: usize,
}

impl App {
    pub fn new() -> Self {
        let config = IriscanConfig::load().unwrap_or_default();
        let mut app = Self::with_config(config.api_config(), config.capture_source());
        if !app.api.has_api_key() {
            app.set_status("No API key configured — set GEMINI_API_KEY");
        }
        app
    }

    /// Construct with explicit collaborators. Used by `new` and by tests,
    /// which must not depend on the home directory or environment.
    pub fn with_config(api: ApiConfig, capture_source: CaptureSource) -> Self {
        Self {
            phase: Phase::Splash {
                until: Instant::now() + SPLASH_DURATION,
            },
            profile: None,
            api,
            capture_source,
            status_message: None,
            should_quit: false,
            tick: 0,
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn profile_form_mut(&mut self) -> Option<&mut ProfileForm> {
        match &mut self.phase {
            Phase::Auth(form) => Some(form),
            _ => None,
        }
    }

    pub fn capture_source(&self) -> &CaptureSource {
        &self.capture_source
    }

    pub fn model_name(&self) -> &str {
        self.api.model()
    }

    pub fn has_api_key(&self) -> bool {
        self.api.has_api_key()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn tick_count(&self) -> usize {
        self.tick
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    // === Frame pump ===

    /// Advance animation and the splash deadline. Called once per frame;
    /// the deadline dies with the controller, so no transition can land in
    /// a torn-down app.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if let Phase::Splash { until } = self.phase
            && Instant::now() >= until
        {
            self.splash_elapsed();
        }
    }

    /// Drain the analysis channel. A received outcome moves Analyzing to
    /// Results; a failure becomes the fallback report so the flow stays
    /// total.
    pub fn process_analysis_events(&mut self) {
        let received = match &mut self.phase {
            Phase::Analyzing { outcome, .. } => match outcome.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(mpsc::error::TryRecvError::Empty) => None,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    // Task dropped its sender without resolving.
                    Some(Err(AnalysisError::MissingCandidate))
                }
            },
            _ => None,
        };

        if let Some(outcome) = received {
            self.finish_analysis(outcome);
        }
    }

    // === Transitions (one per trigger; mismatched triggers are no-ops) ===

    /// Splash timer elapsed: Splash -> Auth.
    pub fn splash_elapsed(&mut self) {
        if let Phase::Splash { .. } = self.phase {
            self.phase = Phase::Auth(ProfileForm::default());
        }
    }

    /// Profile submission: Auth -> Dashboard, storing the session profile.
    pub fn submit_profile(&mut self) {
        let Phase::Auth(form) = &self.phase else {
            return;
        };
        match form.submit() {
            Some(profile) => {
                tracing::info!(id = profile.id_suffix(), "profile captured");
                self.profile = Some(profile);
                self.phase = Phase::Dashboard;
                self.clear_status();
            }
            None => self.set_status("Phone number is required"),
        }
    }

    /// User initiates a scan: Dashboard -> Scanning.
    pub fn start_scan(&mut self) {
        if let Phase::Dashboard = self.phase {
            self.phase = Phase::Scanning { capture: None };
            self.clear_status();
        }
    }

    /// User cancels during capture: Scanning -> Dashboard. Dropping the
    /// receiver orphans any in-flight grabber; its result is discarded.
    pub fn cancel_scan(&mut self) {
        if let Phase::Scanning { .. } = self.phase {
            self.phase = Phase::Dashboard;
            self.clear_status();
        }
    }

    /// Whether a capture task is currently running.
    pub fn capture_in_flight(&self) -> bool {
        matches!(
            self.phase,
            Phase::Scanning {
                capture: Some(_),
                ..
            }
        )
    }

    /// Run the capture source on a background task so a slow grabber never
    /// stalls the frame loop. At most one capture is in flight; further
    /// triggers are ignored until it resolves.
    pub fn start_capture(&mut self) {
        let Phase::Scanning { capture } = &mut self.phase else {
            return;
        };
        if capture.is_some() {
            return;
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        *capture = Some(receiver);
        self.clear_status();

        let source = self.capture_source.clone();
        tokio::spawn(async move {
            let _ = sender.send(source.capture().await);
        });
    }

    /// Drain the capture channel. A captured frame moves Scanning to
    /// Analyzing and starts the analysis task; a failure stays in
    /// Scanning with the error in the status line, so the user can retry
    /// or cancel.
    pub fn process_capture_events(&mut self) {
        let Phase::Scanning {
            capture: Some(receiver),
        } = &mut self.phase
        else {
            return;
        };

        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(mpsc::error::TryRecvError::Empty) => return,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.phase = Phase::Scanning { capture: None };
                self.set_status("Capture task ended unexpectedly");
                return;
            }
        };

        match outcome {
            Ok(image) => {
                if let Some(request) = self.complete_capture(image) {
                    self.spawn_analysis(request);
                }
            }
            Err(err) => {
                tracing::warn!("capture failed: {err}");
                self.phase = Phase::Scanning { capture: None };
                self.set_status(format!("Capture failed: {err}"));
            }
        }
    }

    /// Capture completed: Scanning -> Analyzing.
    ///
    /// Returns the request to hand to [`App::spawn_analysis`] (or to
    /// resolve directly in tests). `None` when the trigger does not match
    /// the current phase.
    pub fn complete_capture(&mut self, image: EncodedImage) -> Option<AnalysisRequest> {
        let Phase::Scanning { .. } = self.phase else {
            return None;
        };

        let (sender, receiver) = mpsc::unbounded_channel();
        self.phase = Phase::Analyzing {
            image: image.clone(),
            outcome: receiver,
        };
        self.clear_status();

        Some(AnalysisRequest {
            image,
            profile: self.profile.clone(),
            sender,
        })
    }

    /// Run the analysis client on a background task, exactly once per
    /// request.
    pub fn spawn_analysis(&self, request: AnalysisRequest) {
        let api = self.api.clone();
        tokio::spawn(async move {
            let outcome = analysis::analyze(&api, &request.image, request.profile.as_ref()).await;
            request.resolve(outcome);
        });
    }

    /// Analysis resolved: Analyzing -> Results. Failure is substituted
    /// with the fallback report rather than surfacing as an error.
    fn finish_analysis(&mut self, outcome: AnalysisOutcome) {
        let Phase::Analyzing { .. } = self.phase else {
            return;
        };
        let Phase::Analyzing { image, .. } = std::mem::replace(&mut self.phase, Phase::Dashboard)
        else {
            unreachable!("phase checked above");
        };

        let report = outcome.unwrap_or_else(|err| {
            tracing::warn!("analysis failed: {err}");
            HealthReport::unavailable(err.to_string())
        });
        self.phase = Phase::Results { image, report };
    }

    /// User requests a new scan: Results -> Dashboard, dropping the image
    /// and report together.
    pub fn reset(&mut self) {
        if let Phase::Results { .. } = self.phase {
            self.phase = Phase::Dashboard;
            self.clear_status();
        }
    }
}
