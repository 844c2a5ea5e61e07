//! # Trailmail Scheduler
//!
//! The native replacement for the hosting platform's cron facility:
//! a 5-field cron parser and a tokio interval loop that fires the campaign
//! callback when the schedule is due.
//!
//! ```text
//! run_scheduler (tokio interval)
//!   └── CampaignSchedule: "0 6 * * 1" → campaign callback
//!         └── on due → execute campaign → log summary → advance next_run
//! ```
//!
//! Manual dispatch does not go through this crate at all: the CLI `run`
//! command invokes the campaign directly, independent of any schedule.

pub mod cron;
pub mod engine;

pub use cron::next_run_from_cron;
pub use engine::{CampaignSchedule, run_scheduler};
