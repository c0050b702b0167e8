//! Screen models and their plain-text rendering.
//!
//! Every screen is a direct view over the record store: data is reloaded on
//! each visit and nothing is cached between renders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coach::{Role, Turn};
use crate::error::Result;
use crate::helpers::format_time_12h;
use crate::models::{next_id, parse_fee, Appointment, AppointmentStatus, User};
use crate::notify::{Toast, ToastKind};
use crate::records::Collection;
use crate::router::{View, NAV_ITEMS};
use crate::session::AuthMode;

/// Shown on the journal view until journaling exists.
pub const JOURNAL_PLACEHOLDER: &str = "Journal Module Placeholder";

/// Shown on the schedule when there is nothing booked.
pub const EMPTY_SCHEDULE: &str = "No appointments scheduled.";

/// Dashboard aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    /// Sum of fees over paid appointments.
    pub revenue: Decimal,
    /// Number of appointments still scheduled.
    pub pending: usize,
}

impl DashboardStats {
    /// Aggregate over `appointments`.
    ///
    /// Revenue saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn from_appointments(appointments: &[Appointment]) -> Self {
        Self {
            revenue: appointments
                .iter()
                .filter(|a| a.is_paid())
                .fold(Decimal::ZERO, |total, a| total.saturating_add(a.fee)),
            pending: appointments.iter().filter(|a| a.is_scheduled()).count(),
        }
    }

    /// Load the appointment collection and aggregate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn load(appointments: &Collection<Appointment>) -> Result<Self> {
        Ok(Self::from_appointments(&appointments.all().await?))
    }
}

/// A required form field was left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    /// The named field is empty.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Values typed into the new-appointment form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    /// Client's name. Required.
    pub client_name: String,
    /// `YYYY-MM-DD`. Required.
    pub date: String,
    /// `HH:MM`. Required.
    pub time: String,
    /// Service type.
    #[serde(rename = "type", default)]
    pub service_type: String,
    /// Fee as typed.
    #[serde(default)]
    pub fee: String,
}

impl AppointmentDraft {
    /// Check the required fields are filled in.
    ///
    /// # Errors
    ///
    /// Returns the first blank required field.
    pub fn validate(&self) -> std::result::Result<(), FormError> {
        let required = [
            ("clientName", &self.client_name),
            ("date", &self.date),
            ("time", &self.time),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(FormError::MissingField(*field)),
            None => Ok(()),
        }
    }

    /// Turn the draft into a new `Scheduled` appointment with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] if a required field is blank.
    pub fn into_appointment(self) -> std::result::Result<Appointment, FormError> {
        self.validate()?;
        Ok(Appointment {
            id: next_id(),
            client_name: self.client_name,
            date: self.date,
            time: self.time,
            service_type: self.service_type,
            fee: parse_fee(&self.fee),
            status: AppointmentStatus::Scheduled,
        })
    }
}

/// Format a dollar amount with thousands separators, e.g. `$1,234.5`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let text = amount.normalize().to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, fraction) = match digits.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}

/// The "date at time • type" line under a client's name.
#[must_use]
pub fn schedule_subtitle(appointment: &Appointment) -> String {
    format!(
        "{} at {} • {}",
        appointment.date,
        format_time_12h(&appointment.time),
        appointment.service_type
    )
}

/// Landing page for signed-out visitors.
#[must_use]
pub fn render_landing() -> String {
    [
        "NotaryOS",
        "",
        "Drowning in paperwork? Chasing payments?",
        "The operating system for modern notaries. Schedule, eJournal, invoices,",
        "and AI compliance in one pocket.",
        "",
        "  [Log In]   [Start Free Trial]",
    ]
    .join("\n")
}

/// Sign-in / sign-up form.
#[must_use]
pub fn render_auth(mode: AuthMode) -> String {
    let submit = format!("  [{}]", mode.submit_label());
    let switch = format!("  {}", mode.switch_prompt());
    [
        mode.title(),
        "Enter your details to continue.",
        "",
        "  Email:    ________",
        "  Password: ________",
        "",
        submit.as_str(),
        switch.as_str(),
    ]
    .join("\n")
}

/// Sidebar with the active view marked.
#[must_use]
pub fn render_nav(active: View) -> String {
    NAV_ITEMS
        .iter()
        .map(|item| {
            let marker = if item.view == active { '>' } else { ' ' };
            format!("{marker} {:<10} ({})", item.label, item.view)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dashboard for `user`.
#[must_use]
pub fn render_dashboard(user: &User, stats: &DashboardStats) -> String {
    [
        format!("Good Morning, {}.", user.greeting_name()),
        "Here is your daily briefing.".to_string(),
        String::new(),
        format!("  Revenue (YTD):  {}", format_money(stats.revenue)),
        format!("  Pending Jobs:   {}", stats.pending),
        "  AI Coach:       Ask a Question (state laws & fees)".to_string(),
    ]
    .join("\n")
}

/// Appointment list, in storage order.
#[must_use]
pub fn render_schedule(appointments: &[Appointment]) -> String {
    let mut lines = vec!["Schedule".to_string(), String::new()];
    if appointments.is_empty() {
        lines.push(format!("  {EMPTY_SCHEDULE}"));
    }
    for appt in appointments {
        lines.push(format!(
            "  {}  {}  [{}]",
            appt.client_name,
            format_money(appt.fee),
            appt.status
        ));
        lines.push(format!("    {}  (id {})", schedule_subtitle(appt), appt.id));
    }
    lines.join("\n")
}

/// Blank new-appointment form.
#[must_use]
pub fn render_appointment_form() -> String {
    [
        "New Appointment",
        "",
        "  Client Name*, Date* (YYYY-MM-DD), Time* (HH:MM),",
        "  Service Type (e.g. Loan Signing), Fee ($)",
        "",
        "  new <client>|<date>|<time>|<type>|<fee>    cancel",
    ]
    .join("\n")
}

/// Coach transcript.
#[must_use]
pub fn render_coach(transcript: &[Turn]) -> String {
    let mut lines = vec!["AI Coach".to_string(), String::new()];
    for turn in transcript {
        match turn.role {
            Role::User => lines.push(format!("{:>8} {}", "you:", turn.content)),
            Role::Assistant => lines.push(format!("{:>8} {}", "coach:", turn.content)),
        }
    }
    lines.join("\n")
}

/// Journal placeholder.
#[must_use]
pub fn render_journal() -> String {
    JOURNAL_PLACEHOLDER.to_string()
}

/// Live toasts, one per line.
#[must_use]
pub fn render_toasts(toasts: &[Toast]) -> String {
    toasts
        .iter()
        .map(|t| match t.kind {
            ToastKind::Success => format!("[ok] {}", t.msg),
            ToastKind::Error => format!("[!!] {}", t.msg),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appt(fee: i64, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: next_id(),
            client_name: "Client".to_string(),
            date: "2024-05-01".to_string(),
            time: "13:05".to_string(),
            service_type: "Loan Signing".to_string(),
            fee: Decimal::from(fee),
            status,
        }
    }

    fn draft() -> AppointmentDraft {
        AppointmentDraft {
            client_name: "Ann Lee".to_string(),
            date: "2024-05-01".to_string(),
            time: "09:30".to_string(),
            service_type: "Loan Signing".to_string(),
            fee: "150".to_string(),
        }
    }

    #[test]
    fn test_dashboard_stats_example() {
        let appointments = vec![
            appt(100, AppointmentStatus::Paid),
            appt(50, AppointmentStatus::Scheduled),
            appt(75, AppointmentStatus::Paid),
        ];
        let stats = DashboardStats::from_appointments(&appointments);
        assert_eq!(stats.revenue, Decimal::from(175));
        assert_eq!(stats.pending, 1);
    }

    #[test]
    fn test_dashboard_revenue_saturates() {
        let mut huge = appt(0, AppointmentStatus::Paid);
        huge.fee = Decimal::MAX;
        let appointments = vec![huge.clone(), huge, appt(5, AppointmentStatus::Paid)];

        let stats = DashboardStats::from_appointments(&appointments);
        assert_eq!(stats.revenue, Decimal::MAX);
        assert!(format_money(stats.revenue).starts_with("$79,228,162"));
    }

    #[test]
    fn test_dashboard_ignores_other_statuses() {
        let appointments = vec![
            appt(500, AppointmentStatus::Other("Cancelled".to_string())),
            appt(20, AppointmentStatus::Paid),
        ];
        let stats = DashboardStats::from_appointments(&appointments);
        assert_eq!(stats.revenue, Decimal::from(20));
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn test_dashboard_empty() {
        assert_eq!(
            DashboardStats::from_appointments(&[]),
            DashboardStats::default()
        );
    }

    #[test]
    fn test_draft_into_appointment() {
        let appointment = draft().into_appointment().unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.fee, Decimal::from(150));
        assert_eq!(appointment.client_name, "Ann Lee");
        assert!(appointment.id.parse::<i64>().is_ok());
    }

    #[test]
    fn test_draft_ids_unique() {
        let a = draft().into_appointment().unwrap();
        let b = draft().into_appointment().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_draft_requires_fields() {
        let mut d = draft();
        d.client_name = "  ".to_string();
        assert_eq!(d.validate(), Err(FormError::MissingField("clientName")));

        let mut d = draft();
        d.time = String::new();
        assert_eq!(
            d.into_appointment().unwrap_err().to_string(),
            "time is required"
        );
    }

    #[test]
    fn test_draft_optional_fields() {
        let mut d = draft();
        d.service_type = String::new();
        d.fee = String::new();
        let appointment = d.into_appointment().unwrap();
        assert_eq!(appointment.fee, Decimal::ZERO);
    }

    #[test]
    fn test_draft_from_form_json() {
        let d: AppointmentDraft = serde_json::from_str(
            r#"{"clientName":"Bo","date":"2024-01-02","time":"08:00","type":"Jurat"}"#,
        )
        .unwrap();
        assert_eq!(d.service_type, "Jurat");
        assert_eq!(d.fee, "");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::from(175)), "$175");
        assert_eq!(format_money(Decimal::from(1_234_567)), "$1,234,567");
        assert_eq!(format_money(Decimal::new(123_450, 2)), "$1,234.5");
        assert_eq!(format_money(Decimal::ZERO), "$0");
        assert_eq!(format_money(Decimal::from(-1500)), "-$1,500");
    }

    #[test]
    fn test_schedule_subtitle() {
        let a = appt(10, AppointmentStatus::Scheduled);
        assert_eq!(schedule_subtitle(&a), "2024-05-01 at 1:05 PM • Loan Signing");
    }

    #[test]
    fn test_render_schedule_empty() {
        assert!(render_schedule(&[]).contains(EMPTY_SCHEDULE));
    }

    #[test]
    fn test_render_schedule_keeps_order() {
        let mut first = appt(10, AppointmentStatus::Scheduled);
        first.client_name = "Zed".to_string();
        let mut second = appt(20, AppointmentStatus::Paid);
        second.client_name = "Amy".to_string();

        let text = render_schedule(&[first, second]);
        let zed = text.find("Zed").unwrap();
        let amy = text.find("Amy").unwrap();
        assert!(zed < amy);
        assert!(text.contains("[Paid]"));
    }

    #[test]
    fn test_render_dashboard_greets_user() {
        let user = User::from_email("a@b.com");
        let stats = DashboardStats {
            revenue: Decimal::from(2500),
            pending: 3,
        };
        let text = render_dashboard(&user, &stats);
        assert!(text.starts_with("Good Morning, a."));
        assert!(text.contains("$2,500"));
        assert!(text.contains("Pending Jobs:   3"));
    }

    #[test]
    fn test_render_nav_marks_active() {
        let text = render_nav(View::Journal);
        let active: Vec<_> = text.lines().filter(|l| l.starts_with('>')).collect();
        assert_eq!(active.len(), 1);
        assert!(active[0].contains("Journal"));
    }

    #[test]
    fn test_render_auth_modes() {
        assert!(render_auth(AuthMode::SignIn).contains("[Sign In]"));
        assert!(render_auth(AuthMode::SignUp).starts_with("Create Account"));
    }

    #[test]
    fn test_render_toasts() {
        let toasts = vec![
            Toast {
                id: 1,
                msg: "Saved".to_string(),
                kind: ToastKind::Success,
            },
            Toast {
                id: 2,
                msg: "Invalid email".to_string(),
                kind: ToastKind::Error,
            },
        ];
        assert_eq!(render_toasts(&toasts), "[ok] Saved\n[!!] Invalid email");
    }
}
