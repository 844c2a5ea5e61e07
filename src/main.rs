//! # Trailmail — scheduled email campaigns for All Packers Expeditions
//!
//! Usage:
//!   trailmail run                  # send the campaign once, right now
//!   trailmail start                # scheduler loop (default: Mon 06:00 UTC)
//!   trailmail check                # validate secrets/config/recipients only

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use trailmail_core::config::{SmtpSettings, TrailmailConfig};
use trailmail_core::recipients::{Recipient, load_recipients};
use trailmail_mailer::campaign;
use trailmail_scheduler::{CampaignSchedule, run_scheduler};

#[derive(Parser)]
#[command(
    name = "trailmail",
    version,
    about = "📨 Trailmail — scheduled email campaigns for All Packers Expeditions"
)]
struct Cli {
    /// Config file path (default: ~/.trailmail/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// .env file to load secrets from before reading the environment
    #[arg(long)]
    env_file: Option<String>,

    /// Recipients JSON file (overrides the config)
    #[arg(long)]
    recipients: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send the campaign once, independent of the schedule
    Run,
    /// Run the scheduler loop (weekly dispatch by default)
    Start,
    /// Validate secrets, schedule, and recipients without sending anything
    Check,
}

fn expand_path(p: &str) -> String {
    shellexpand::tilde(p).to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env before anything reads the environment
    match &cli.env_file {
        Some(path) => {
            dotenv::from_path(expand_path(path))
                .with_context(|| format!("Failed to load env file {path}"))?;
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    let mut config = match &cli.config {
        Some(path) => TrailmailConfig::load_from(Path::new(&expand_path(path)))?,
        None => TrailmailConfig::load()?,
    };
    if let Some(recipients) = &cli.recipients {
        config.campaign.recipients_path = recipients.clone();
    }
    config.campaign.recipients_path = expand_path(&config.campaign.recipients_path);
    config.campaign.log_file = expand_path(&config.campaign.log_file);

    setup_logging(Path::new(&config.campaign.log_file), cli.verbose);
    tracing::info!("All Packers Expeditions email campaign starting");

    match cli.command {
        Command::Run => {
            let settings = SmtpSettings::from_env()?;
            campaign::execute(&settings, &config.campaign).await?;
        }
        Command::Start => {
            let settings = SmtpSettings::from_env()?;
            let schedule =
                CampaignSchedule::new(&config.campaign.schedule).map_err(|e| anyhow!(e))?;
            let check_interval = config.scheduler.check_interval_secs;
            let campaign_config = config.campaign.clone();

            run_scheduler(
                schedule,
                move || {
                    let settings = settings.clone();
                    let campaign_config = campaign_config.clone();
                    async move {
                        campaign::execute(&settings, &campaign_config)
                            .await
                            .map(|report| report.summary())
                            .map_err(|e| e.to_string())
                    }
                },
                check_interval,
            )
            .await;
        }
        Command::Check => run_check(&config)?,
    }

    Ok(())
}

/// Dry validation pass: everything a dispatch needs, nothing sent.
fn run_check(config: &TrailmailConfig) -> Result<()> {
    let settings = SmtpSettings::from_env()?;
    println!(
        "SMTP configuration OK: {}:{} as {}",
        settings.server, settings.port, settings.address
    );
    println!("Admin report goes to {}", settings.admin_email);

    let schedule = CampaignSchedule::new(&config.campaign.schedule).map_err(|e| anyhow!(e))?;
    if let Some(next) = schedule.next_run {
        println!(
            "Schedule '{}' OK, next dispatch at {next}",
            config.campaign.schedule
        );
    }

    let entries = load_recipients(Path::new(&config.campaign.recipients_path))?;
    let mut valid = 0usize;
    let mut invalid = 0usize;
    for entry in &entries {
        match Recipient::from_value(entry) {
            Ok(_) => valid += 1,
            Err(failure) => {
                invalid += 1;
                println!(
                    "  invalid recipient {} ({}): {}",
                    failure.name, failure.email, failure.reason
                );
            }
        }
    }
    println!("Recipients file OK: {valid} valid, {invalid} invalid");
    Ok(())
}

/// Initialize tracing: console plus an append-mode log file. The file is the
/// one the admin report attaches, so writes are synchronous.
/// An uncreatable log directory downgrades to console-only logging.
fn setup_logging(log_path: &Path, verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let dir = match log_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let filename = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("email_campaign.log"));

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!(
            "warn: could not create log directory '{}': {e}; logging to console only",
            dir.display()
        );
        tracing_subscriber::fmt().with_env_filter(filter()).compact().init();
        return;
    }

    let appender = tracing_appender::rolling::never(dir, filename);
    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().compact())
        .with(fmt::layer().with_ansi(false).with_writer(appender))
        .init();
}
