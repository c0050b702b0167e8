//! Application state: everything a running client holds, owned explicitly.
//!
//! [`App`] ties the session, the router and the record store together and
//! turns user-correctable failures into toasts. Storage failures still
//! propagate as [`Error`].

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::coach::{Coach, CoachResponder, ScriptedResponder, Turn};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::helpers::ProfileProgress;
use crate::models::{Appointment, AppointmentStatus, User};
use crate::notify::{Notifier, Toast};
use crate::records::{Collection, LocalRecordStore, RecordStore, APPOINTMENTS_KEY};
use crate::router::{Router, Screen, View};
use crate::screens::{
    render_appointment_form, render_auth, render_coach, render_dashboard, render_journal,
    render_landing, render_nav, render_schedule, AppointmentDraft, DashboardStats,
};
use crate::session::{AuthMode, SessionManager};
use crate::storage::LocalStorage;

/// Toast shown after the form is submitted.
pub const APPOINTMENT_SCHEDULED: &str = "Appointment Scheduled";

/// A running client.
pub struct App {
    session: SessionManager,
    appointments: Collection<Appointment>,
    router: Router,
    notifier: Notifier,
    coach: Coach,
    responder: Arc<dyn CoachResponder>,
    reply_delay: Duration,
    auth_mode: AuthMode,
    showing_auth: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("session", &self.session)
            .field("router", &self.router)
            .field("auth_mode", &self.auth_mode)
            .field("showing_auth", &self.showing_auth)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Open the configured database and restore the persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or read.
    pub fn open(config: &Config) -> Result<Self> {
        let storage = Arc::new(LocalStorage::open(config.database_path())?);
        Self::with_storage(storage, config)
    }

    /// Build an app over an already opened storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session cannot be read.
    pub fn with_storage(storage: Arc<LocalStorage>, config: &Config) -> Result<Self> {
        let store: Arc<dyn RecordStore> = Arc::new(LocalRecordStore::new(Arc::clone(&storage)));
        Self::new(
            storage,
            store,
            Notifier::new(config.toast_ttl()),
            Arc::new(ScriptedResponder),
            config.reply_delay(),
        )
    }

    /// Assemble an app from its parts.
    ///
    /// `storage` holds the session; `store` holds the record collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session cannot be read.
    pub fn new(
        storage: Arc<LocalStorage>,
        store: Arc<dyn RecordStore>,
        notifier: Notifier,
        responder: Arc<dyn CoachResponder>,
        reply_delay: Duration,
    ) -> Result<Self> {
        let session = SessionManager::restore(storage)?;
        Ok(Self {
            session,
            appointments: Collection::new(store, APPOINTMENTS_KEY),
            router: Router::new(),
            notifier,
            coach: Coach::new(Arc::clone(&responder), reply_delay),
            responder,
            reply_delay,
            auth_mode: AuthMode::default(),
            showing_auth: true,
        })
    }

    // === Session ===

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    /// Show the auth form. Anonymous starts already show it; this is the
    /// landing page's "Log In" action.
    pub fn open_auth(&mut self) {
        if !self.session.is_authenticated() {
            self.showing_auth = true;
        }
    }

    /// Return from the auth form to the landing page.
    pub fn close_auth(&mut self) {
        self.showing_auth = false;
    }

    /// Current auth form mode.
    #[must_use]
    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    /// Switch between sign-in and sign-up labels.
    pub fn toggle_auth_mode(&mut self) -> AuthMode {
        self.auth_mode = self.auth_mode.toggled();
        self.auth_mode
    }

    /// Submit the auth form.
    ///
    /// Rejected credentials raise an error toast and return `false` with
    /// the session unchanged. Success greets the user and lands on the
    /// dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted.
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<bool> {
        let outcome = self.session.sign_in(email, password).map(|u| u.name.clone());
        let Some(name) = self.report(outcome)? else {
            return Ok(false);
        };
        self.notifier.success(format!("Welcome, {name}!"));
        self.showing_auth = false;
        self.router.navigate(View::Dashboard);
        Ok(true)
    }

    /// Sign out and go back to the landing page.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session cannot be removed.
    pub fn logout(&mut self) -> Result<()> {
        self.session.logout()?;
        self.showing_auth = false;
        self.auth_mode = AuthMode::default();
        self.router.navigate(View::Dashboard);
        self.reset_coach();
        Ok(())
    }

    /// Update display name and/or phone. Empty strings clear a field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSignedIn`] when anonymous, or a storage error.
    pub fn update_profile(
        &mut self,
        display_name: Option<String>,
        phone: Option<String>,
    ) -> Result<User> {
        let user = self.session.update_profile(display_name, phone)?.clone();
        self.notifier.success("Profile updated");
        Ok(user)
    }

    /// Which profile fields are still missing.
    #[must_use]
    pub fn profile_progress(&self) -> ProfileProgress {
        ProfileProgress::of(self.session.user())
    }

    // === Navigation ===

    /// Show `view` inside the shell.
    ///
    /// Entering the coach view starts a fresh transcript.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSignedIn`] when anonymous.
    pub fn navigate(&mut self, view: View) -> Result<()> {
        self.require_user()?;
        if view == View::Ai && self.router.current() != View::Ai {
            self.reset_coach();
        }
        self.router.navigate(view);
        Ok(())
    }

    /// The top-level screen currently showing.
    #[must_use]
    pub fn screen(&self) -> Screen {
        if self.session.is_authenticated() {
            Screen::Shell(self.router.current())
        } else if self.showing_auth {
            Screen::Auth
        } else {
            Screen::Landing
        }
    }

    // === Screens ===

    /// Revenue and pending count, recomputed from storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSignedIn`] when anonymous, or a storage error.
    pub async fn dashboard(&self) -> Result<DashboardStats> {
        self.require_user()?;
        DashboardStats::load(&self.appointments).await
    }

    /// Every appointment, in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSignedIn`] when anonymous, or a storage error.
    pub async fn schedule(&self) -> Result<Vec<Appointment>> {
        self.require_user()?;
        self.appointments.all().await
    }

    /// Submit the new-appointment form.
    ///
    /// A blank required field raises an error toast and returns `None`.
    /// Otherwise the appointment is saved and the schedule is shown.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSignedIn`] when anonymous, or a storage error.
    pub async fn submit_appointment(
        &mut self,
        draft: AppointmentDraft,
    ) -> Result<Option<Appointment>> {
        self.require_user()?;
        let Some(appointment) = self.report(draft.into_appointment().map_err(Error::from))? else {
            return Ok(None);
        };
        self.appointments.save(&appointment).await?;
        info!(id = %appointment.id, client = %appointment.client_name, "appointment scheduled");
        self.notifier.success(APPOINTMENT_SCHEDULED);
        self.router.navigate(View::Schedule);
        Ok(Some(appointment))
    }

    /// Leave the form without saving.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSignedIn`] when anonymous.
    pub fn cancel_appointment(&mut self) -> Result<()> {
        self.navigate(View::Schedule)
    }

    /// Mark an appointment as paid.
    ///
    /// An unknown id raises an error toast and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSignedIn`] when anonymous, or a storage error.
    pub async fn mark_paid(&self, id: &str) -> Result<Option<Appointment>> {
        self.require_user()?;
        let Some(mut appointment) = self.appointments.find(id).await? else {
            self.notifier.error(format!("No appointment with id {id}"));
            return Ok(None);
        };
        appointment.status = AppointmentStatus::Paid;
        self.appointments.save(&appointment).await?;
        debug!(id, "appointment paid");
        self.notifier
            .success(format!("{} marked as paid", appointment.client_name));
        Ok(Some(appointment))
    }

    /// Delete an appointment. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSignedIn`] when anonymous, or a storage error.
    pub async fn remove_appointment(&self, id: &str) -> Result<bool> {
        self.require_user()?;
        if !self.appointments.remove(id).await? {
            self.notifier.error(format!("No appointment with id {id}"));
            return Ok(false);
        }
        debug!(id, "appointment removed");
        self.notifier.success("Appointment removed");
        Ok(true)
    }

    /// Ask the coach a question. The returned handle completes once the
    /// reply has been appended; empty input returns `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSignedIn`] when anonymous.
    pub fn ask_coach(&self, question: &str) -> Result<Option<JoinHandle<()>>> {
        self.require_user()?;
        Ok(self.coach.send(question))
    }

    /// Snapshot of the coach transcript.
    #[must_use]
    pub fn coach_transcript(&self) -> Vec<Turn> {
        self.coach.transcript()
    }

    // === Notifications ===

    /// Live toasts, oldest first.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.notifier.toasts()
    }

    /// Take the live toasts for display, leaving none.
    pub fn take_toasts(&self) -> Vec<Toast> {
        self.notifier.drain()
    }

    // === Rendering ===

    /// Plain-text rendering of the current screen.
    ///
    /// # Errors
    ///
    /// Returns an error if a screen's data cannot be loaded.
    pub async fn render(&self) -> Result<String> {
        let view = match self.screen() {
            Screen::Landing => return Ok(render_landing()),
            Screen::Auth => return Ok(render_auth(self.auth_mode)),
            Screen::Shell(view) => view,
        };
        let body = match view {
            View::Dashboard => {
                let user = self.require_user()?;
                render_dashboard(user, &self.dashboard().await?)
            }
            View::Schedule => render_schedule(&self.schedule().await?),
            View::AddAppointment => render_appointment_form(),
            View::Ai => render_coach(&self.coach.transcript()),
            View::Journal => render_journal(),
        };
        Ok(format!("{}\n\n{body}", render_nav(view)))
    }

    fn require_user(&self) -> Result<&User> {
        self.session.user().ok_or(Error::NotSignedIn)
    }

    fn reset_coach(&mut self) {
        self.coach = Coach::new(Arc::clone(&self.responder), self.reply_delay);
    }

    /// Turn a user-correctable error into an error toast.
    fn report<T>(&self, outcome: Result<T>) -> Result<Option<T>> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_user_facing() => {
                self.notifier.error(e.to_string());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
