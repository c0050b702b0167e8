//! Domain records persisted by notaryos.
//!
//! Field names follow the camelCase JSON shapes already found in stored data
//! (`clientName`, `displayName`), so existing collections load unchanged.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Plan assigned to every demo account.
pub const DEFAULT_PLAN: &str = "free";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Login email.
    pub email: String,
    /// Name derived from the email's local part.
    pub name: String,
    /// Subscription plan.
    pub plan: String,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Preferred display name, set from the profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl User {
    /// Build the demo user for `email`.
    ///
    /// The name is everything before the first `@`.
    #[must_use]
    pub fn from_email(email: &str) -> Self {
        let name = email.split('@').next().unwrap_or_default().to_string();
        Self {
            email: email.to_string(),
            name,
            plan: DEFAULT_PLAN.to_string(),
            phone: None,
            display_name: None,
        }
    }

    /// Name to greet the user with.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Lifecycle status of an appointment.
///
/// `Scheduled` and `Paid` drive the dashboard; any other label is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    /// Booked, not yet paid.
    Scheduled,
    /// Paid; counts toward revenue.
    Paid,
    /// Any other label.
    Other(String),
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "Scheduled"),
            Self::Paid => write!(f, "Paid"),
            Self::Other(label) => write!(f, "{label}"),
        }
    }
}

impl From<String> for AppointmentStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Scheduled" => Self::Scheduled,
            "Paid" => Self::Paid,
            _ => Self::Other(label),
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.to_string()
    }
}

/// A booked notary job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Timestamp-derived identifier, see [`next_id`].
    pub id: String,
    /// Client's name.
    pub client_name: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, 24-hour.
    pub time: String,
    /// Service type, e.g. "Loan Signing".
    #[serde(rename = "type", default)]
    pub service_type: String,
    /// Fee in dollars. Stored as a string; numbers and blanks are accepted.
    #[serde(deserialize_with = "deserialize_fee", default)]
    pub fee: Decimal,
    /// Current status.
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Whether this appointment counts toward revenue.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.status == AppointmentStatus::Paid
    }

    /// Whether this appointment is still pending.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}

/// Parse a fee as typed into a form: blank is zero, anything unreadable is zero.
#[must_use]
pub fn parse_fee(raw: &str) -> Decimal {
    let trimmed = raw.trim().trim_start_matches('$');
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

fn deserialize_fee<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(n) => parse_fee(&n.to_string()),
        serde_json::Value::String(s) => parse_fee(&s),
        _ => Decimal::ZERO,
    })
}

/// Last identifier handed out by [`next_id`], in epoch milliseconds.
static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Next record identifier: current epoch milliseconds as a decimal string.
///
/// Strictly increasing within the process, so two calls in the same
/// millisecond still yield distinct ids.
#[must_use]
pub fn next_id() -> String {
    next_id_value().to_string()
}

/// Numeric form of [`next_id`].
#[must_use]
pub fn next_id_value() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::collections::HashSet;

    #[test]
    fn test_user_from_email() {
        let user = User::from_email("a@b.com");
        assert_eq!(user.name, "a");
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.plan, "free");
        assert!(user.phone.is_none());
    }

    #[test]
    fn test_user_greeting_prefers_display_name() {
        let mut user = User::from_email("jane.doe@example.com");
        assert_eq!(user.greeting_name(), "jane.doe");

        user.display_name = Some("Jane".to_string());
        assert_eq!(user.greeting_name(), "Jane");

        user.display_name = Some(String::new());
        assert_eq!(user.greeting_name(), "jane.doe");
    }

    #[test]
    fn test_user_json_shape() {
        let mut user = User::from_email("a@b.com");
        user.display_name = Some("Al".to_string());
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["displayName"], "Al");
        assert!(json.get("phone").is_none());

        let legacy: User =
            serde_json::from_str(r#"{"email":"x@y.z","name":"x","plan":"free"}"#).unwrap();
        assert_eq!(legacy.name, "x");
    }

    #[test]
    fn test_status_round_trip_labels() {
        assert_eq!(AppointmentStatus::from("Paid".to_string()), AppointmentStatus::Paid);
        assert_eq!(
            AppointmentStatus::from("Cancelled".to_string()),
            AppointmentStatus::Other("Cancelled".to_string())
        );
        assert_eq!(AppointmentStatus::Scheduled.to_string(), "Scheduled");
    }

    #[test]
    fn test_appointment_decodes_string_and_number_fees() {
        let from_string: Appointment = serde_json::from_str(
            r#"{"id":"1","clientName":"Ann","date":"2024-05-01","time":"09:30","type":"Loan Signing","fee":"150","status":"Scheduled"}"#,
        )
        .unwrap();
        assert_eq!(from_string.fee, Decimal::from(150));
        assert_eq!(from_string.service_type, "Loan Signing");
        assert!(from_string.is_scheduled());

        let from_number: Appointment = serde_json::from_str(
            r#"{"id":"2","clientName":"Bo","date":"2024-05-01","time":"10:00","type":"","fee":75.5,"status":"Paid"}"#,
        )
        .unwrap();
        assert_eq!(from_number.fee, Decimal::new(755, 1));
        assert!(from_number.is_paid());
    }

    #[test]
    fn test_appointment_blank_fee_is_zero() {
        let appt: Appointment = serde_json::from_str(
            r#"{"id":"3","clientName":"Cy","date":"2024-05-01","time":"10:00","fee":"","status":"Scheduled"}"#,
        )
        .unwrap();
        assert_eq!(appt.fee, Decimal::ZERO);
        assert_eq!(appt.service_type, "");
    }

    #[test]
    fn test_appointment_serializes_fee_as_string() {
        let appt = Appointment {
            id: "9".to_string(),
            client_name: "Dee".to_string(),
            date: "2024-06-01".to_string(),
            time: "13:05".to_string(),
            service_type: "Jurat".to_string(),
            fee: Decimal::from(40),
            status: AppointmentStatus::Scheduled,
        };
        let json = serde_json::to_value(&appt).unwrap();
        assert_eq!(json["fee"], "40");
        assert_eq!(json["clientName"], "Dee");
        assert_eq!(json["type"], "Jurat");
        assert_eq!(json["status"], "Scheduled");
    }

    #[test]
    fn test_parse_fee() {
        assert_eq!(parse_fee("100"), Decimal::from(100));
        assert_eq!(parse_fee(" $25.50 "), Decimal::new(2550, 2));
        assert_eq!(parse_fee(""), Decimal::ZERO);
        assert_eq!(parse_fee("abc"), Decimal::ZERO);
    }

    #[test]
    fn test_next_id_is_unique_and_increasing() {
        let ids: Vec<i64> = (0..1000).map(|_| next_id_value()).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
