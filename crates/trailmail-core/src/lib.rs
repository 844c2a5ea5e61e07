//! # Trailmail Core
//! Configuration, the environment secret contract, the recipient model,
//! and the shared error type.

pub mod config;
pub mod error;
pub mod recipients;

pub use config::{CampaignConfig, SchedulerConfig, SmtpSettings, TrailmailConfig};
pub use error::{Result, TrailmailError};
pub use recipients::{Recipient, RecipientFailure, load_recipients};
