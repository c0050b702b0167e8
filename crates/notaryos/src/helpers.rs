//! Pure helpers: time formatting, profile completeness, and the state fee
//! reference table.

use serde::Serialize;

use crate::models::User;

/// Convert a 24-hour `"HH:MM"` string to `"H:MM AM"` / `"H:MM PM"`.
///
/// Empty input yields empty output. Parsing is best-effort: an unreadable
/// hour counts as midnight and the minute text is passed through as-is.
#[must_use]
pub fn format_time_12h(time: &str) -> String {
    if time.is_empty() {
        return String::new();
    }
    let mut parts = time.split(':');
    let hour_text = parts.next().unwrap_or_default();
    let minutes = parts.next().unwrap_or_default();

    let hours: u32 = leading_digits(hour_text).parse().unwrap_or(0);
    let meridiem = if hours >= 12 { "PM" } else { "AM" };
    let h12 = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{h12}:{minutes} {meridiem}")
}

fn leading_digits(s: &str) -> &str {
    let s = s.trim_start();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    &s[..end]
}

/// Which profile fields a user has filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfileProgress {
    /// Both name and phone are present.
    pub completed: bool,
    /// A name (or display name) is present.
    pub name: bool,
    /// A phone number is present.
    pub phone: bool,
}

impl ProfileProgress {
    /// Compute progress for `user`. No user means nothing is filled in.
    #[must_use]
    pub fn of(user: Option<&User>) -> Self {
        let present = |v: Option<&str>| v.is_some_and(|s| !s.is_empty());
        let name = user.is_some_and(|u| {
            present(Some(u.name.as_str())) || present(u.display_name.as_deref())
        });
        let phone = user.is_some_and(|u| present(u.phone.as_deref()));
        Self {
            completed: name && phone,
            name,
            phone,
        }
    }

    /// Names of the fields still missing.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.name {
            missing.push("name");
        }
        if !self.phone {
            missing.push("phone");
        }
        missing
    }
}

/// Statutory notarial fees for one act type pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotaryFees {
    /// Maximum fee for an acknowledgment.
    pub acknowledgment: &'static str,
    /// Maximum fee for a jurat.
    pub jurat: &'static str,
}

/// Reference entry for one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateFees {
    /// Two-letter postal code.
    pub code: &'static str,
    /// Full state name.
    pub state: &'static str,
    /// Fee schedule.
    pub fees: NotaryFees,
    /// Notes on acceptable identification, where the state has any on file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_requirements: Option<&'static str>,
}

const fn entry(code: &'static str, state: &'static str, fee: &'static str) -> StateFees {
    StateFees {
        code,
        state,
        fees: NotaryFees {
            acknowledgment: fee,
            jurat: fee,
        },
        id_requirements: None,
    }
}

static STATE_DATABASE: [StateFees; 7] = [
    entry("AL", "Alabama", "$5.00"),
    entry("AK", "Alaska", "$25.00"),
    entry("AZ", "Arizona", "$10.00"),
    StateFees {
        id_requirements: Some("1 or 2 credible witnesses approved."),
        ..entry("CA", "California", "$15.00")
    },
    entry("TX", "Texas", "$6.00"),
    entry("FL", "Florida", "$10.00"),
    entry("NY", "New York", "$2.00"),
];

/// Look up a state by its exact two-letter code.
///
/// No normalization: `"ca"` is not `"CA"`.
#[must_use]
pub fn state_fees(code: &str) -> Option<&'static StateFees> {
    STATE_DATABASE.iter().find(|s| s.code == code)
}

/// Every state in the reference table.
#[must_use]
pub fn all_states() -> &'static [StateFees] {
    &STATE_DATABASE
}
