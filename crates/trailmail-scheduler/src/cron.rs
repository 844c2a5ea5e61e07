//! Lightweight cron expression parser.
//! Supports: "MIN HOUR DOM MON DOW" (5-field, no seconds)
//! Field syntax: *, */N, N, comma lists, N-M ranges.
//! DOW is 0-7 where both 0 and 7 mean Sunday. When DOM and DOW are both
//! restricted, a day matches if either does (classic cron rule).
//! Example: "0 6 * * 1" = every Monday at 06:00.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};

/// Upper bound on the minute-resolution scan: one year is enough for any
/// satisfiable 5-field expression.
const MAX_SCAN_MINUTES: u32 = 366 * 24 * 60;

/// Parse a cron expression and compute the next run time strictly after
/// `after`.
pub fn next_run_from_cron(expression: &str, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = expression.split_whitespace().collect();
    if parts.len() != 5 {
        tracing::warn!(
            "Invalid cron expression: '{}' (need 5 fields: MIN HOUR DOM MON DOW)",
            expression
        );
        return None;
    }

    let minutes = parse_field(parts[0], 0, 59)?;
    let hours = parse_field(parts[1], 0, 23)?;
    let doms = parse_field(parts[2], 1, 31)?;
    let months = parse_field(parts[3], 1, 12)?;
    let dows = parse_field(parts[4], 0, 7)?;

    let dom_restricted = parts[2] != "*";
    let dow_restricted = parts[4] != "*";

    // Find the next matching minute after `after`
    let mut candidate = after + Duration::minutes(1);
    candidate = candidate
        .with_second(0)
        .and_then(|c| c.with_nanosecond(0))
        .unwrap_or(candidate);

    for _ in 0..MAX_SCAN_MINUTES {
        if minutes.contains(&candidate.minute())
            && hours.contains(&candidate.hour())
            && months.contains(&candidate.month())
            && day_matches(&candidate, &doms, &dows, dom_restricted, dow_restricted)
        {
            return Some(candidate);
        }
        candidate += Duration::minutes(1);
    }

    None
}

/// Apply the DOM/DOW match rule: when both fields are restricted, either one
/// matching is enough; otherwise only the restricted one is consulted.
fn day_matches(
    candidate: &DateTime<Utc>,
    doms: &[u32],
    dows: &[u32],
    dom_restricted: bool,
    dow_restricted: bool,
) -> bool {
    let dom_ok = doms.contains(&candidate.day());
    let dow = candidate.weekday().num_days_from_sunday();
    let dow_ok = dows.contains(&dow) || (dow == 0 && dows.contains(&7));

    match (dom_restricted, dow_restricted) {
        (true, true) => dom_ok || dow_ok,
        (true, false) => dom_ok,
        (false, true) => dow_ok,
        (false, false) => true,
    }
}

/// Parse a cron field into a sorted list of matching values.
fn parse_field(field: &str, min: u32, max: u32) -> Option<Vec<u32>> {
    if field == "*" {
        return Some((min..=max).collect());
    }

    // */N — every N
    if let Some(step) = field.strip_prefix("*/") {
        let n: u32 = step.parse().ok()?;
        if n == 0 {
            return None;
        }
        return Some((min..=max).step_by(n as usize).collect());
    }

    // Comma list, each element a single value or an N-M range
    let mut values = Vec::new();
    for part in field.split(',') {
        let part = part.trim();
        if let Some((start, end)) = part.split_once('-') {
            let start: u32 = start.parse().ok()?;
            let end: u32 = end.parse().ok()?;
            if start > end || start < min || end > max {
                return None;
            }
            values.extend(start..=end);
        } else {
            let n: u32 = part.parse().ok()?;
            if n < min || n > max {
                return None;
            }
            values.push(n);
        }
    }
    values.sort_unstable();
    values.dedup();
    Some(values)
}
