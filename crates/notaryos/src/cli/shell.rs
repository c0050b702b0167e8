//! Line commands for the interactive shell.

use thiserror::Error;

use crate::router::{UnknownView, View};
use crate::screens::AppointmentDraft;

/// Shown by `help`.
pub const HELP: &str = "\
Landing / auth:
  login                      open the sign-in form
  back                       return to the landing page
  toggle                     switch between sign-in and sign-up
  signin <email> <password>  submit the form
App:
  go <view>                  dashboard | schedule | Add Appointment | ai | journal
  new <client>|<date>|<time>|<type>|<fee>
  cancel                     leave the form
  pay <id>                   mark an appointment paid
  rm <id>                    delete an appointment
  ask <question>             ask the coach
  name <text>, phone <text>  update your profile
  fees [STATE]               state fee reference
  logout
  help, quit";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Redraw the current screen.
    Render,
    /// Print the command list.
    Help,
    /// Leave the shell.
    Quit,
    /// Open the auth form.
    Login,
    /// Back to the landing page.
    Back,
    /// Toggle sign-in / sign-up.
    Toggle,
    /// Submit the auth form.
    SignIn {
        /// Email field.
        email: String,
        /// Password field.
        password: String,
    },
    /// Sign out.
    Logout,
    /// Switch view.
    Go(View),
    /// Submit the appointment form.
    New(AppointmentDraft),
    /// Leave the appointment form.
    Cancel,
    /// Mark paid.
    Pay(String),
    /// Delete.
    Remove(String),
    /// Ask the coach.
    Ask(String),
    /// Set the display name.
    Name(String),
    /// Set the phone number.
    Phone(String),
    /// Fee reference, optionally for one state.
    Fees(Option<String>),
}

/// A shell line that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellParseError {
    /// First word is not a command.
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    /// Right command, wrong arguments.
    #[error("usage: {0}")]
    Usage(&'static str),
    /// `go` with a bad view name.
    #[error(transparent)]
    View(#[from] UnknownView),
}

/// Parse one line of shell input.
///
/// # Errors
///
/// Returns [`ShellParseError`] for unknown commands or missing arguments.
pub fn parse_line(line: &str) -> Result<ShellCommand, ShellParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "" => ShellCommand::Render,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        "login" => ShellCommand::Login,
        "back" => ShellCommand::Back,
        "toggle" => ShellCommand::Toggle,
        "signin" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(email), password) => ShellCommand::SignIn {
                    email: email.to_string(),
                    password: password.unwrap_or_default().to_string(),
                },
                (None, _) => return Err(ShellParseError::Usage("signin <email> <password>")),
            }
        }
        "logout" => ShellCommand::Logout,
        "go" => ShellCommand::Go(rest.parse()?),
        "new" => ShellCommand::New(parse_draft(rest)),
        "cancel" => ShellCommand::Cancel,
        "pay" => ShellCommand::Pay(required(rest, "pay <id>")?),
        "rm" => ShellCommand::Remove(required(rest, "rm <id>")?),
        "ask" => ShellCommand::Ask(rest.to_string()),
        "name" => ShellCommand::Name(rest.to_string()),
        "phone" => ShellCommand::Phone(rest.to_string()),
        "fees" => ShellCommand::Fees(Some(rest).filter(|s| !s.is_empty()).map(str::to_string)),
        other => return Err(ShellParseError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn required(rest: &str, usage: &'static str) -> Result<String, ShellParseError> {
    if rest.is_empty() {
        Err(ShellParseError::Usage(usage))
    } else {
        Ok(rest.to_string())
    }
}

/// `client|date|time|type|fee`; missing trailing fields are left blank.
fn parse_draft(rest: &str) -> AppointmentDraft {
    let mut fields = rest.split('|').map(|f| f.trim().to_string());
    let mut next = || fields.next().unwrap_or_default();
    AppointmentDraft {
        client_name: next(),
        date: next(),
        time: next(),
        service_type: next(),
        fee: next(),
    }
}
