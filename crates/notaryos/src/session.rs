//! Demo authentication and the persisted session.
//!
//! There is no credential check: any email containing `@` plus any
//! non-empty password signs in. The signed-in [`User`] is stored as one JSON
//! object under [`SESSION_KEY`] and restored on the next start.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::User;
use crate::storage::LocalStorage;

/// Storage key holding the signed-in user.
pub const SESSION_KEY: &str = "notary_user";

/// Why a sign-in attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The email has no `@`.
    #[error("Invalid email")]
    InvalidEmail,
    /// The password field was left empty.
    #[error("Password required")]
    MissingPassword,
}

/// Which variant of the auth form is showing. Both behave the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Returning user.
    #[default]
    SignIn,
    /// New account.
    SignUp,
}

impl AuthMode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }

    /// Form heading.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Welcome Back",
            Self::SignUp => "Create Account",
        }
    }

    /// Submit button label.
    #[must_use]
    pub fn submit_label(self) -> &'static str {
        match self {
            Self::SignIn => "Sign In",
            Self::SignUp => "Sign Up",
        }
    }

    /// Prompt for switching to the other mode.
    #[must_use]
    pub fn switch_prompt(self) -> &'static str {
        match self {
            Self::SignIn => "Don't have an account? Sign up",
            Self::SignUp => "Already have an account? Log in",
        }
    }
}

/// Check credentials the way the demo flow does.
///
/// # Errors
///
/// Returns [`AuthError::InvalidEmail`] if `email` has no `@`, otherwise
/// [`AuthError::MissingPassword`] if `password` is empty.
pub fn check_credentials(email: &str, password: &str) -> std::result::Result<(), AuthError> {
    if !email.contains('@') {
        return Err(AuthError::InvalidEmail);
    }
    if password.is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok(())
}

/// Owns the signed-in user and its persisted copy.
#[derive(Debug)]
pub struct SessionManager {
    storage: Arc<LocalStorage>,
    user: Option<User>,
}

impl SessionManager {
    /// Restore whatever session was persisted.
    ///
    /// An unreadable stored user is treated as signed out.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage read itself fails.
    pub fn restore(storage: Arc<LocalStorage>) -> Result<Self> {
        let user = match storage.get_item(SESSION_KEY)? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    info!(email = %user.email, "restored session");
                    Some(user)
                }
                Err(e) => {
                    warn!(error = %e, "stored session is unreadable; starting signed out");
                    None
                }
            },
            None => None,
        };
        Ok(Self { storage, user })
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether someone is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Sign in (or sign up; the demo does not distinguish).
    ///
    /// On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] for rejected credentials, or a storage error
    /// if the session cannot be persisted.
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<&User> {
        check_credentials(email, password)?;
        let user = User::from_email(email);
        self.persist(&user)?;
        info!(email = %user.email, "signed in");
        Ok(self.user.insert(user))
    }

    /// Sign out and forget the persisted user.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session cannot be removed.
    pub fn logout(&mut self) -> Result<()> {
        self.storage.remove_item(SESSION_KEY)?;
        if let Some(user) = self.user.take() {
            info!(email = %user.email, "signed out");
        }
        Ok(())
    }

    /// Update profile fields on the signed-in user and persist them.
    ///
    /// `None` leaves a field as it is; an empty string clears it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSignedIn`] when anonymous, or a storage error.
    pub fn update_profile(
        &mut self,
        display_name: Option<String>,
        phone: Option<String>,
    ) -> Result<&User> {
        let mut user = self.user.clone().ok_or(Error::NotSignedIn)?;
        if let Some(name) = display_name {
            user.display_name = Some(name).filter(|n| !n.is_empty());
        }
        if let Some(phone) = phone {
            user.phone = Some(phone).filter(|p| !p.is_empty());
        }
        self.persist(&user)?;
        Ok(self.user.insert(user))
    }

    fn persist(&self, user: &User) -> Result<()> {
        let encoded = serde_json::to_string(user)?;
        self.storage.set_item(SESSION_KEY, &encoded)
    }
}
