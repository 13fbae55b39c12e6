//! Application state management for CareerCompass.
//!
//! This module contains the core `App` struct that manages all application state,
//! including the current screen, form state, mock catalog data, toasts, and the
//! channel that carries finished sign-in tasks back to the event loop.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use careercompass_core::models::{
    mock_applications, mock_courses, mock_recent_courses, Application, Course, CourseFilter,
    DashboardStats, RecentCourse,
};
use careercompass_core::{
    Effects, FileSlotStore, Identity, Navigator, Notification, Notifier, Route, SessionError,
    SessionManager, UserKind,
};

use crate::config::Config;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the session task message channel.
/// Only one sign-in can be in flight, so a handful of slots is plenty.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Maximum length for name and email input.
const MAX_FIELD_LENGTH: usize = 100;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// How long a toast stays in the status bar.
const TOAST_LIFETIME: Duration = Duration::from_secs(4);

/// Toasts kept around at once; older ones are dropped.
const MAX_TOASTS: usize = 3;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Login,
    Register,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub secret: bool,
}

impl FormField {
    fn text(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            value: String::new(),
            secret: false,
        }
    }

    fn secret(label: &'static str) -> Self {
        Self {
            label,
            placeholder: "",
            value: String::new(),
            secret: true,
        }
    }

    /// Whether `c` may be typed into this field
    pub fn accepts(&self, c: char) -> bool {
        if self.secret {
            can_add_password_char(self.value.chars().count(), c)
        } else {
            can_add_field_char(self.value.chars().count(), c)
        }
    }
}

/// What the focused element of a form is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(usize),
    Submit,
    Link(usize),
}

/// A validated form, ready to hand to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Login {
        email: String,
        password: String,
        kind: UserKind,
    },
    Register {
        name: String,
        email: String,
        password: String,
        kind: UserKind,
    },
}

/// Login or registration form for one side of the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthForm {
    pub kind: UserKind,
    pub mode: FormMode,
    pub fields: Vec<FormField>,
    focus: usize,
    pub error: Option<String>,
}

impl AuthForm {
    pub fn login(kind: UserKind, email: Option<String>) -> Self {
        let placeholder = match kind {
            UserKind::Student => "name@example.com",
            UserKind::Institution => "institution@example.com",
        };
        let mut email_field = FormField::text("Email", placeholder);
        let focus = match email {
            Some(email) if !email.is_empty() => {
                email_field.value = email;
                1
            }
            _ => 0,
        };
        Self {
            kind,
            mode: FormMode::Login,
            fields: vec![email_field, FormField::secret("Password")],
            focus,
            error: None,
        }
    }

    pub fn register(kind: UserKind) -> Self {
        let name = match kind {
            UserKind::Student => FormField::text("Full Name", "Jane Doe"),
            UserKind::Institution => FormField::text("Institution Name", "University of Example"),
        };
        let email = match kind {
            UserKind::Student => FormField::text("Email", "name@example.com"),
            UserKind::Institution => FormField::text("Email", "institution@example.com"),
        };
        Self {
            kind,
            mode: FormMode::Register,
            fields: vec![
                name,
                email,
                FormField::secret("Password"),
                FormField::secret("Confirm Password"),
            ],
            focus: 0,
            error: None,
        }
    }

    /// The form a route shows, if it is a form route.
    pub fn for_route(route: Route, email: Option<String>) -> Option<Self> {
        match route {
            Route::StudentLogin => Some(Self::login(UserKind::Student, email)),
            Route::InstitutionLogin => Some(Self::login(UserKind::Institution, email)),
            Route::StudentRegister => Some(Self::register(UserKind::Student)),
            Route::InstitutionRegister => Some(Self::register(UserKind::Institution)),
            _ => None,
        }
    }

    pub fn title(&self) -> String {
        match self.mode {
            FormMode::Login => format!("{} Login", self.kind.title()),
            FormMode::Register => format!("{} Registration", self.kind.title()),
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match (self.mode, self.kind) {
            (FormMode::Login, UserKind::Student) => "Sign in to access your student dashboard",
            (FormMode::Login, UserKind::Institution) => {
                "Sign in to manage your programs and applicants"
            }
            (FormMode::Register, UserKind::Student) => {
                "Create an account to browse and apply to courses"
            }
            (FormMode::Register, UserKind::Institution) => {
                "Register your institution to connect with potential students"
            }
        }
    }

    pub fn submit_label(&self, transitioning: bool) -> &'static str {
        match (self.mode, transitioning) {
            (FormMode::Login, false) => "Sign In",
            (FormMode::Login, true) => "Signing in...",
            (FormMode::Register, true) => "Creating account...",
            (FormMode::Register, false) => match self.kind {
                UserKind::Student => "Create Account",
                UserKind::Institution => "Register Institution",
            },
        }
    }

    /// Cross-links shown under the form.
    pub fn links(&self) -> [(String, Route); 2] {
        let other = self.kind.other();
        match self.mode {
            FormMode::Login => [
                (
                    format!("Register as {}", with_article(self.kind)),
                    Route::register_for(self.kind),
                ),
                (
                    format!("Sign in as {} instead", with_article(other)),
                    Route::login_for(other),
                ),
            ],
            FormMode::Register => [
                ("Sign in".to_string(), Route::login_for(self.kind)),
                (
                    format!("Register as {} instead", with_article(other)),
                    Route::register_for(other),
                ),
            ],
        }
    }

    fn focus_count(&self) -> usize {
        self.fields.len() + 1 + self.links().len()
    }

    pub fn focus(&self) -> FormFocus {
        let fields = self.fields.len();
        if self.focus < fields {
            FormFocus::Field(self.focus)
        } else if self.focus == fields {
            FormFocus::Submit
        } else {
            FormFocus::Link(self.focus - fields - 1)
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.focus_count();
    }

    pub fn focus_prev(&mut self) {
        let count = self.focus_count();
        self.focus = (self.focus + count - 1) % count;
    }

    pub fn focus_submit(&mut self) {
        self.focus = self.fields.len();
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut FormField> {
        match self.focus() {
            FormFocus::Field(i) => self.fields.get_mut(i),
            _ => None,
        }
    }

    fn value(&self, label: &str) -> String {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    /// Check the form before anything reaches the session.
    pub fn validate(&self) -> std::result::Result<Submission, String> {
        if self.fields.iter().any(|f| f.value.trim().is_empty()) {
            return Err("Please fill out all fields".to_string());
        }
        match self.mode {
            FormMode::Login => Ok(Submission::Login {
                email: self.value("Email").trim().to_string(),
                password: self.value("Password"),
                kind: self.kind,
            }),
            FormMode::Register => {
                let password = self.value("Password");
                if password != self.value("Confirm Password") {
                    return Err("Passwords do not match".to_string());
                }
                Ok(Submission::Register {
                    name: self.fields[0].value.trim().to_string(),
                    email: self.value("Email").trim().to_string(),
                    password,
                    kind: self.kind,
                })
            }
        }
    }
}

fn with_article(kind: UserKind) -> String {
    match kind {
        UserKind::Student => "a student".to_string(),
        UserKind::Institution => "an institution".to_string(),
    }
}

/// A notification with the time it was raised.
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) > TOAST_LIFETIME
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result of a sign-in task, sent back to the event loop.
#[derive(Debug)]
enum SessionResult {
    Finished(Effects),
    Failed(SessionError),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: SessionManager,
    /// Write config changes back to disk
    persist_config: bool,

    // UI State
    pub state: AppState,
    pub route: Route,
    pub form: Option<AuthForm>,
    pub landing_selection: usize,

    // Course browser
    pub course_filter: CourseFilter,
    pub course_selection: usize,

    // Mock data
    pub courses: Vec<Course>,
    pub recent_courses: Vec<RecentCourse>,
    pub applications: Vec<Application>,

    // Notifications, newest last
    pub toasts: VecDeque<Toast>,

    // Background task channel
    session_rx: mpsc::Receiver<SessionResult>,
    session_tx: mpsc::Sender<SessionResult>,
}

impl App {
    /// Create a new application instance backed by the on-disk session slot
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = Config::load_or_default();

        let data_dir = config.data_dir().unwrap_or_else(|_| PathBuf::from("./data"));
        debug!(?data_dir, "Data directory configured");

        let store = FileSlotStore::new(data_dir)?;
        let session = SessionManager::restore(store, config.latency());
        debug!(authenticated = session.state().is_authenticated(), "Session restored");

        let mut app = Self::with_session(config, session);
        app.persist_config = true;
        Ok(app)
    }

    /// Create an application around an existing session
    pub fn with_session(config: Config, session: SessionManager) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            session,
            persist_config: false,

            state: AppState::Normal,
            route: Route::Home,
            form: None,
            landing_selection: 0,

            course_filter: CourseFilter::default(),
            course_selection: 0,

            courses: mock_courses(),
            recent_courses: mock_recent_courses(),
            applications: mock_applications(),

            toasts: VecDeque::new(),

            session_rx: rx,
            session_tx: tx,
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn identity(&self) -> Option<Identity> {
        self.session.identity()
    }

    pub fn user_kind(&self) -> Option<UserKind> {
        self.session.kind()
    }

    pub fn is_transitioning(&self) -> bool {
        self.session.is_transitioning()
    }

    /// Validate the current form and start the sign-in on a background task.
    pub fn submit_form(&mut self) {
        if self.is_transitioning() {
            return;
        }
        let Some(form) = self.form.as_mut() else {
            return;
        };

        let submission = match form.validate() {
            Ok(submission) => submission,
            Err(message) => {
                form.error = Some(message);
                return;
            }
        };
        form.error = None;

        let handle = self.session.handle();
        let tx = self.session_tx.clone();
        tokio::spawn(async move {
            let result = match submission {
                Submission::Login { email, password, kind } => {
                    handle.login(&email, &password, kind).await
                }
                Submission::Register { name, email, password, kind } => {
                    handle.register(&name, &email, &password, kind).await
                }
            };
            let message = match result {
                Ok(effects) => SessionResult::Finished(effects),
                Err(e) => SessionResult::Failed(e),
            };
            if tx.send(message).await.is_err() {
                warn!("Event loop gone before sign-in finished");
            }
        });
    }

    pub fn logout(&mut self) {
        let effects = self.session.logout();
        effects.apply(self);
    }

    /// Drain finished session tasks and expire old toasts
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.session_rx.try_recv() {
            self.process_session_result(result);
        }
        let now = Instant::now();
        self.toasts.retain(|t| !t.is_expired(now));
    }

    fn process_session_result(&mut self, result: SessionResult) {
        match result {
            SessionResult::Finished(effects) => {
                let signed_in = effects.navigate.is_some();
                effects.apply(self);
                if signed_in {
                    self.remember_email();
                }
            }
            SessionResult::Failed(e) => {
                error!(error = %e, "Session task failed");
                self.notify(Notification::destructive("Something went wrong", e.to_string()));
            }
        }
    }

    fn remember_email(&mut self) {
        let Some(identity) = self.identity() else {
            return;
        };
        if self.config.last_email.as_deref() == Some(identity.email.as_str()) {
            return;
        }
        self.config.last_email = Some(identity.email);
        if !self.persist_config {
            return;
        }
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    // =========================================================================
    // Screens
    // =========================================================================

    pub fn go(&mut self, route: Route) {
        self.navigate(route);
    }

    pub fn go_path(&mut self, path: &str) {
        self.navigate(Route::from_path(path));
    }

    /// Call-to-action entries on the landing page
    pub fn landing_actions(&self) -> Vec<(&'static str, Route)> {
        match self.user_kind() {
            Some(kind) => vec![("Go to Dashboard", Route::dashboard_for(kind))],
            None => vec![
                ("I'm a Student", Route::StudentLogin),
                ("I'm an Institution", Route::InstitutionLogin),
                ("Register as Student", Route::StudentRegister),
                ("Register as Institution", Route::InstitutionRegister),
            ],
        }
    }

    pub fn filtered_courses(&self) -> Vec<&Course> {
        self.course_filter.apply(&self.courses)
    }

    pub fn selected_course(&self) -> Option<&Course> {
        self.filtered_courses().get(self.course_selection).copied()
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats::from_records(&self.recent_courses, &self.applications)
    }

    /// Keep the course selection inside the filtered list
    pub fn clamp_course_selection(&mut self) {
        let len = self.filtered_courses().len();
        self.course_selection = self.course_selection.min(len.saturating_sub(1));
    }

    pub fn reset_course_filters(&mut self) {
        self.course_filter.reset();
        self.course_selection = 0;
    }

    /// Newest toast that has not expired
    pub fn current_toast(&self) -> Option<&Toast> {
        let now = Instant::now();
        self.toasts.iter().rev().find(|t| !t.is_expired(now))
    }
}

impl Navigator for App {
    fn navigate(&mut self, route: Route) {
        let target = route.guard(self.user_kind());
        if target != route {
            debug!(from = %route, to = %target, "Redirecting");
        }
        info!(route = %target, "Navigate");

        self.route = target;
        self.state = AppState::Normal;
        self.form = AuthForm::for_route(target, self.config.prefill_email());
        self.landing_selection = 0;
        if target == Route::StudentCourses {
            self.clamp_course_selection();
        }
    }
}

impl Notifier for App {
    fn notify(&mut self, notification: Notification) {
        debug!(title = %notification.title, destructive = notification.is_destructive(), "Toast");
        self.toasts.push_back(Toast {
            notification,
            shown_at: Instant::now(),
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }
}

// ============================================================================
// Input Validation Helpers
// ============================================================================

/// Check if a character is valid for text input (printable, non-control)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a name or email character should be accepted
pub fn can_add_field_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use careercompass_core::MemorySlotStore;

    fn test_app() -> App {
        let session = SessionManager::restore(MemorySlotStore::new(), Duration::ZERO);
        App::with_session(Config::default(), session)
    }

    fn fill(form: &mut AuthForm, values: &[&str]) {
        for (field, value) in form.fields.iter_mut().zip(values) {
            field.value = value.to_string();
        }
    }

    // -------------------------------------------------------------------------
    // Form Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_login_form_validates() {
        let mut form = AuthForm::login(UserKind::Student, None);
        assert_eq!(form.validate(), Err("Please fill out all fields".to_string()));

        fill(&mut form, &["alice@example.com", "secret"]);
        assert_eq!(
            form.validate(),
            Ok(Submission::Login {
                email: "alice@example.com".to_string(),
                password: "secret".to_string(),
                kind: UserKind::Student,
            })
        );
    }

    #[test]
    fn test_register_form_password_mismatch() {
        let mut form = AuthForm::register(UserKind::Institution);
        fill(&mut form, &["Acme University", "a@b.com", "one", "two"]);
        assert_eq!(form.validate(), Err("Passwords do not match".to_string()));

        fill(&mut form, &["Acme University", "a@b.com", "same", "same"]);
        assert!(matches!(
            form.validate(),
            Ok(Submission::Register { ref name, kind: UserKind::Institution, .. }) if name == "Acme University"
        ));
    }

    #[test]
    fn test_login_form_prefill_focuses_password() {
        let form = AuthForm::login(UserKind::Student, Some("bob@x.org".to_string()));
        assert_eq!(form.fields[0].value, "bob@x.org");
        assert_eq!(form.focus(), FormFocus::Field(1));
    }

    #[test]
    fn test_form_focus_cycles() {
        let mut form = AuthForm::login(UserKind::Institution, None);
        assert_eq!(form.focus(), FormFocus::Field(0));
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus(), FormFocus::Submit);
        form.focus_next();
        assert_eq!(form.focus(), FormFocus::Link(0));
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus(), FormFocus::Field(0)); // Wraps around
        form.focus_prev();
        assert_eq!(form.focus(), FormFocus::Link(1));
    }

    #[test]
    fn test_form_titles_and_links() {
        let login = AuthForm::login(UserKind::Student, None);
        assert_eq!(login.title(), "Student Login");
        assert_eq!(login.submit_label(true), "Signing in...");
        let links = login.links();
        assert_eq!(links[0], ("Register as a student".to_string(), Route::StudentRegister));
        assert_eq!(
            links[1],
            ("Sign in as an institution instead".to_string(), Route::InstitutionLogin)
        );

        let register = AuthForm::register(UserKind::Institution);
        assert_eq!(register.title(), "Institution Registration");
        assert_eq!(register.fields[0].label, "Institution Name");
        assert_eq!(register.submit_label(false), "Register Institution");
        assert_eq!(register.links()[1].1, Route::StudentRegister);
    }

    // -------------------------------------------------------------------------
    // Navigation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_student_screens_redirect_when_signed_out() {
        let mut app = test_app();
        app.go(Route::StudentCourses);
        assert_eq!(app.route, Route::StudentLogin);
        assert!(app.form.is_some());

        app.go_path("/contact");
        assert_eq!(app.route, Route::NotFound);
        assert!(app.form.is_none());
    }

    #[tokio::test]
    async fn test_submit_login_reaches_dashboard() {
        let mut app = test_app();
        app.go(Route::StudentLogin);
        if let Some(form) = app.form.as_mut() {
            fill(form, &["alice@example.com", "pw"]);
        }

        app.submit_form();
        let result = app.session_rx.recv().await.unwrap();
        app.process_session_result(result);

        assert_eq!(app.route, Route::StudentDashboard);
        assert_eq!(app.identity().unwrap().display_name, "alice");
        assert_eq!(app.current_toast().unwrap().notification.title, "Logged in successfully");
        assert_eq!(app.config.last_email.as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn test_submit_invalid_form_sets_error() {
        let mut app = test_app();
        app.go(Route::InstitutionRegister);
        if let Some(form) = app.form.as_mut() {
            fill(form, &["Acme", "a@b.com", "x", "y"]);
        }

        app.submit_form();

        assert_eq!(
            app.form.as_ref().and_then(|f| f.error.clone()).as_deref(),
            Some("Passwords do not match")
        );
        assert!(app.session_rx.try_recv().is_err());
        assert!(app.identity().is_none());
    }

    #[tokio::test]
    async fn test_logout_returns_home() {
        let mut app = test_app();
        let effects = app.session.login("s@uni.edu", "pw", UserKind::Student).await;
        effects.apply(&mut app);
        assert_eq!(app.route, Route::StudentDashboard);

        app.logout();

        assert_eq!(app.route, Route::Home);
        assert!(app.identity().is_none());
        assert_eq!(app.current_toast().unwrap().notification.title, "Logged out");
        assert_eq!(app.landing_actions().len(), 4);
    }

    #[test]
    fn test_toasts_are_capped() {
        let mut app = test_app();
        for i in 0..5 {
            app.notify(Notification::info(format!("t{}", i), ""));
        }
        assert_eq!(app.toasts.len(), MAX_TOASTS);
        assert_eq!(app.current_toast().unwrap().notification.title, "t4");
    }

    #[test]
    fn test_course_selection_clamps_to_filter() {
        let mut app = test_app();
        app.course_selection = 2;
        app.course_filter.search = "data".to_string();
        app.clamp_course_selection();
        assert_eq!(app.course_selection, 0);
        assert_eq!(app.selected_course().unwrap().name, "Data Science");

        app.reset_course_filters();
        assert_eq!(app.filtered_courses().len(), 3);
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_field_char() {
        assert!(can_add_field_char(0, 'a'));
        assert!(can_add_field_char(99, '@'));
        assert!(!can_add_field_char(100, 'a'));
        assert!(!can_add_field_char(0, '\n'));
        assert!(!can_add_field_char(0, '\t'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
    }
}
