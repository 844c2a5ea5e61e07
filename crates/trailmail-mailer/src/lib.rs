//! # Trailmail Mailer
//! SMTP sending for the campaign: transport setup, message builders,
//! and the per-recipient campaign loop.

pub mod campaign;
pub mod message;
pub mod smtp;

pub use campaign::{CampaignReport, execute, run_campaign, send_report};
pub use message::{campaign_message, format_usd, report_message};
pub use smtp::Mailer;
