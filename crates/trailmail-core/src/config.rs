//! Trailmail configuration system.
//!
//! Non-secret campaign settings live in a TOML file (`~/.trailmail/config.toml`
//! by default, every field optional). The five SMTP secrets are never stored
//! there: they are read from the process environment at startup, after the
//! `.env` loader has run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TrailmailError};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrailmailConfig {
    #[serde(default)]
    pub campaign: CampaignConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl TrailmailConfig {
    /// Load config from the default path (~/.trailmail/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TrailmailError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| TrailmailError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".trailmail")
            .join("config.toml")
    }
}

/// Campaign content and input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Path to the recipients JSON file.
    #[serde(default = "default_recipients_path")]
    pub recipients_path: String,
    /// Sender display name and signature brand.
    #[serde(default = "default_brand_name")]
    pub brand_name: String,
    /// Booking site linked from the campaign email.
    #[serde(default = "default_site_url")]
    pub site_url: String,
    /// Append-mode run log, attached to the admin report.
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// Cron expression for the weekly dispatch.
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

fn default_recipients_path() -> String { "recipients.json".into() }
fn default_brand_name() -> String { "All Packers Expeditions".into() }
fn default_site_url() -> String { "https://allpackersexpeditions.com/".into() }
fn default_log_file() -> String { "email_campaign.log".into() }
fn default_schedule() -> String { "0 6 * * 1".into() }

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            recipients_path: default_recipients_path(),
            brand_name: default_brand_name(),
            site_url: default_site_url(),
            log_file: default_log_file(),
            schedule: default_schedule(),
        }
    }
}

/// Scheduler loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// How often the scheduler checks for a due dispatch.
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
}

fn default_check_interval() -> u64 { 30 }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { check_interval_secs: default_check_interval() }
    }
}

/// The five-secret SMTP contract, bound from the environment per run.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub address: String,
    pub password: String,
    pub admin_email: String,
}

impl SmtpSettings {
    /// Read the five secrets from the process environment.
    ///
    /// Every missing variable is collected before failing, so a single error
    /// names the full set of configuration defects.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the secrets through a lookup function (testable form of
    /// [`SmtpSettings::from_env`]).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut get = |name: &str| match lookup(name) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                missing.push(name.to_string());
                None
            }
        };

        let server = get("SMTP_SERVER");
        let port_raw = get("SMTP_PORT");
        let address = get("EMAIL_ADDRESS");
        let password = get("EMAIL_PASSWORD");
        let admin_email = get("ADMIN_EMAIL");

        if !missing.is_empty() {
            return Err(TrailmailError::Config(format!(
                "Missing SMTP environment variables: {}",
                missing.join(", ")
            )));
        }

        let port_raw = port_raw.unwrap_or_default();
        let port: u16 = port_raw
            .trim()
            .parse()
            .map_err(|_| TrailmailError::Config(format!("Invalid SMTP_PORT value: {port_raw}")))?;

        Ok(Self {
            server: server.unwrap_or_default(),
            port,
            address: address.unwrap_or_default(),
            password: password.unwrap_or_default(),
            admin_email: admin_email.unwrap_or_default(),
        })
    }
}
