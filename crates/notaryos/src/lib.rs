//! `notaryos` - practice management for mobile notaries
//!
//! This library holds the client core: a key/value store standing in for
//! browser local storage, the record store and domain model on top of it,
//! demo authentication, view routing, the screens, and transient toasts.
//! The `notaryos` binary drives it from the command line.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod coach;
pub mod config;
pub mod error;
pub mod helpers;
pub mod logging;
pub mod models;
pub mod notify;
pub mod records;
pub mod router;
pub mod screens;
pub mod session;
pub mod storage;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use models::{Appointment, AppointmentStatus, User};
pub use records::{Collection, LocalRecordStore, RecordStore};
pub use router::{Screen, View};
pub use storage::LocalStorage;
