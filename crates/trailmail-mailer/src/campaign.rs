//! Campaign execution — one pass over the recipients list, then the admin
//! report. A failed recipient never stops the run.

use serde_json::Value;
use std::path::Path;

use trailmail_core::config::{CampaignConfig, SmtpSettings};
use trailmail_core::error::Result;
use trailmail_core::recipients::{self, Recipient, RecipientFailure};

use crate::message;
use crate::smtp::Mailer;

/// Outcome of one campaign pass.
#[derive(Debug, Default)]
pub struct CampaignReport {
    pub sent: u32,
    pub failed: u32,
    pub failures: Vec<RecipientFailure>,
}

impl CampaignReport {
    /// One-line run summary, logged and returned to the scheduler.
    pub fn summary(&self) -> String {
        format!(
            "Campaign completed. Successful: {}, Failed: {}",
            self.sent, self.failed
        )
    }

    fn record_failure(&mut self, failure: RecipientFailure) {
        self.failed += 1;
        self.failures.push(failure);
    }
}

/// Send the promotional email to every entry in the list.
pub async fn run_campaign(
    mailer: &Mailer,
    campaign: &CampaignConfig,
    entries: &[Value],
) -> CampaignReport {
    let mut report = CampaignReport::default();

    if entries.is_empty() {
        tracing::warn!("No recipients found to send emails.");
        return report;
    }

    for entry in entries {
        let recipient = match Recipient::from_value(entry) {
            Ok(recipient) => recipient,
            Err(failure) => {
                tracing::error!(
                    "{} in recipient data for {} ({})",
                    failure.reason,
                    failure.name,
                    failure.email
                );
                report.record_failure(failure);
                continue;
            }
        };

        let msg = match message::campaign_message(
            mailer.from(),
            &recipient,
            &campaign.brand_name,
            &campaign.site_url,
        ) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::error!("Could not build email for {}: {e}", recipient.email);
                report.record_failure(RecipientFailure {
                    name: recipient.name.clone(),
                    email: recipient.email.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match mailer.send(msg).await {
            Ok(()) => {
                tracing::info!(
                    "Promotional email sent successfully to {} ({}).",
                    recipient.name,
                    recipient.email
                );
                report.sent += 1;
            }
            Err(e) => {
                tracing::error!("SMTP error when sending email to {}: {e}", recipient.email);
                report.record_failure(RecipientFailure {
                    name: recipient.name.clone(),
                    email: recipient.email.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

/// Email the run log to the admin address.
pub async fn send_report(
    mailer: &Mailer,
    settings: &SmtpSettings,
    campaign: &CampaignConfig,
) -> Result<()> {
    let msg = message::report_message(
        mailer.from(),
        &settings.admin_email,
        &campaign.brand_name,
        Path::new(&campaign.log_file),
    )?;
    mailer.send(msg).await?;
    tracing::info!("Report email sent successfully to admin.");
    Ok(())
}

/// One complete dispatch: load recipients, run the campaign, send the admin
/// report, log the summary. Recipient-file problems downgrade to an empty
/// list; a failed report email is logged, not fatal.
pub async fn execute(settings: &SmtpSettings, campaign: &CampaignConfig) -> Result<CampaignReport> {
    let mailer = Mailer::new(settings, &campaign.brand_name)?;

    let entries = match recipients::load_recipients(Path::new(&campaign.recipients_path)) {
        Ok(entries) => {
            tracing::info!(
                "Loaded {} recipient(s) from {}",
                entries.len(),
                campaign.recipients_path
            );
            entries
        }
        Err(e) => {
            tracing::error!("{e}");
            Vec::new()
        }
    };

    let report = run_campaign(&mailer, campaign, &entries).await;

    if let Err(e) = send_report(&mailer, settings, campaign).await {
        tracing::error!("Failed to send report email: {e}");
    }

    tracing::info!("{}", report.summary());
    if !report.failures.is_empty() {
        tracing::info!("Failed recipients: {:?}", report.failures);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mailer() -> Mailer {
        let settings = SmtpSettings {
            server: "smtp.example.com".into(),
            port: 587,
            address: "trips@example.com".into(),
            password: "hunter2".into(),
            admin_email: "admin@example.com".into(),
        };
        Mailer::new(&settings, "All Packers Expeditions").unwrap()
    }

    #[tokio::test]
    async fn test_empty_list_sends_nothing() {
        let report = run_campaign(&mailer(), &CampaignConfig::default(), &[]).await;
        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_invalid_entries_are_collected_not_fatal() {
        let entries = vec![
            json!({ "email": "kai@example.com", "name": "Kai" }),
            json!({
                "email": "ana@example.com",
                "name": "Ana",
                "trip_name": "Patagonia Circuit",
                "trip_date": "2026-11-02",
                "trip_cost": "expensive",
                "trip_description": "8 days of wind."
            }),
        ];
        let report = run_campaign(&mailer(), &CampaignConfig::default(), &entries).await;
        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, 2);
        assert!(report.failures[0].reason.contains("Missing fields"));
        assert!(report.failures[1].reason.contains("Invalid trip_cost"));
    }

    #[test]
    fn test_summary_line() {
        let report = CampaignReport {
            sent: 12,
            failed: 3,
            failures: Vec::new(),
        };
        assert_eq!(report.summary(), "Campaign completed. Successful: 12, Failed: 3");
    }
}
