//! Dispatch engine — the loop that fires the campaign when its schedule is
//! due. Uses tokio::interval for zero-overhead ticking (sleeps between
//! checks). One job, one callback, no persisted state: `next_run` is
//! recomputed from the expression at startup and after each fire.

use chrono::{DateTime, Utc};

use crate::cron;

/// The single recurring campaign dispatch and its bookkeeping.
#[derive(Debug, Clone)]
pub struct CampaignSchedule {
    expression: String,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub run_count: u32,
    pub enabled: bool,
}

impl CampaignSchedule {
    /// Create a schedule, validating the expression by computing its first
    /// fire time.
    pub fn new(expression: &str) -> Result<Self, String> {
        Self::starting_at(expression, Utc::now())
    }

    /// Create a schedule whose first fire time is computed after `after`
    /// (testable form of [`CampaignSchedule::new`]).
    pub fn starting_at(expression: &str, after: DateTime<Utc>) -> Result<Self, String> {
        let next = cron::next_run_from_cron(expression, after)
            .ok_or_else(|| format!("Invalid cron expression: '{expression}'"))?;
        Ok(Self {
            expression: expression.to_string(),
            last_run: None,
            next_run: Some(next),
            run_count: 0,
            enabled: true,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Check whether the dispatch should fire now.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.enabled && matches!(self.next_run, Some(next) if now >= next)
    }

    /// Record a fire and advance to the next occurrence.
    pub fn mark_fired(&mut self, now: DateTime<Utc>) {
        self.last_run = Some(now);
        self.run_count += 1;
        self.next_run = cron::next_run_from_cron(&self.expression, now);
    }
}

/// Run the scheduler loop. On each due tick the campaign callback executes
/// to completion before the schedule advances, so at most one campaign runs
/// per trigger.
pub async fn run_scheduler<F, Fut>(
    mut schedule: CampaignSchedule,
    callback: F,
    check_interval_secs: u64,
) where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<String, String>> + Send,
{
    tracing::info!(
        "⏰ Scheduler started (schedule '{}', check every {}s)",
        schedule.expression(),
        check_interval_secs
    );
    if let Some(next) = schedule.next_run {
        tracing::info!("Next dispatch at {next}");
    }

    let mut interval = tokio::time::interval(std::time::Duration::from_secs(check_interval_secs));

    loop {
        interval.tick().await;

        let now = Utc::now();
        if !schedule.is_due(now) {
            continue;
        }

        tracing::info!("🔔 Campaign dispatch triggered");
        match callback().await {
            Ok(summary) => tracing::info!("{summary}"),
            Err(e) => tracing::warn!("⚠️ Campaign dispatch failed: {e}"),
        }

        schedule.mark_fired(now);
        match schedule.next_run {
            Some(next) => tracing::info!("Next dispatch at {next}"),
            None => {
                tracing::warn!(
                    "⚠️ No further occurrence for '{}', scheduler stopping",
                    schedule.expression()
                );
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    // 2026-08-03 is a Monday.
    fn monday_midnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 3, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_schedule_computes_first_fire() {
        let schedule = CampaignSchedule::starting_at("0 6 * * 1", monday_midnight()).unwrap();
        assert_eq!(
            schedule.next_run,
            Some(Utc.with_ymd_and_hms(2026, 8, 3, 6, 0, 0).unwrap())
        );
        assert_eq!(schedule.run_count, 0);
    }

    #[test]
    fn test_invalid_expression_rejected() {
        assert!(CampaignSchedule::starting_at("not cron", monday_midnight()).is_err());
    }

    #[test]
    fn test_due_only_at_or_after_next_run() {
        let schedule = CampaignSchedule::starting_at("0 6 * * 1", monday_midnight()).unwrap();
        let five_am = Utc.with_ymd_and_hms(2026, 8, 3, 5, 0, 0).unwrap();
        let six_am = Utc.with_ymd_and_hms(2026, 8, 3, 6, 0, 0).unwrap();
        assert!(!schedule.is_due(five_am));
        assert!(schedule.is_due(six_am));
        assert!(schedule.is_due(six_am + Duration::minutes(3)));
    }

    #[test]
    fn test_disabled_schedule_never_due() {
        let mut schedule = CampaignSchedule::starting_at("0 6 * * 1", monday_midnight()).unwrap();
        schedule.enabled = false;
        let six_am = Utc.with_ymd_and_hms(2026, 8, 3, 6, 0, 0).unwrap();
        assert!(!schedule.is_due(six_am));
    }

    #[test]
    fn test_mark_fired_advances_one_week() {
        let mut schedule = CampaignSchedule::starting_at("0 6 * * 1", monday_midnight()).unwrap();
        let six_am = Utc.with_ymd_and_hms(2026, 8, 3, 6, 0, 0).unwrap();
        schedule.mark_fired(six_am);

        assert_eq!(schedule.last_run, Some(six_am));
        assert_eq!(schedule.run_count, 1);
        assert_eq!(
            schedule.next_run,
            Some(Utc.with_ymd_and_hms(2026, 8, 10, 6, 0, 0).unwrap())
        );
        assert!(!schedule.is_due(six_am + Duration::hours(1)));
    }
}
