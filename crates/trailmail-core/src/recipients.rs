//! Recipient list — loaded from a local JSON array, validated per entry.
//!
//! A malformed entry never aborts the campaign: it is recorded as a failure
//! with a reason and the loop moves on.

use serde_json::Value;
use std::path::Path;

use crate::error::{Result, TrailmailError};

/// A fully validated campaign recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub email: String,
    pub name: String,
    pub trip_name: String,
    pub trip_date: String,
    pub trip_cost: f64,
    pub trip_description: String,
}

/// A recipient that could not be validated or delivered to.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipientFailure {
    pub name: String,
    pub email: String,
    pub reason: String,
}

/// Fields every recipient entry must carry, in report order.
const REQUIRED_FIELDS: [&str; 6] = [
    "email",
    "name",
    "trip_name",
    "trip_date",
    "trip_cost",
    "trip_description",
];

/// Load the recipients file. The file must contain a JSON array; anything
/// else (missing file, parse error, non-array root) is an error the caller
/// may downgrade to an empty list.
pub fn load_recipients(path: &Path) -> Result<Vec<Value>> {
    if !path.is_file() {
        return Err(TrailmailError::Recipients(format!(
            "Recipients JSON file not found at: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    let parsed: Value = serde_json::from_str(&content).map_err(|e| {
        TrailmailError::Recipients(format!("Failed to parse recipients file: {e}"))
    })?;
    match parsed {
        Value::Array(entries) => Ok(entries),
        _ => Err(TrailmailError::Recipients(
            "The recipients file should contain a JSON array".into(),
        )),
    }
}

impl Recipient {
    /// Validate one raw entry. Missing fields are all named in the failure
    /// reason; `trip_cost` accepts a JSON number or a numeric string.
    pub fn from_value(value: &Value) -> std::result::Result<Self, RecipientFailure> {
        let field = |name: &str| value.get(name).and_then(Value::as_str);

        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .filter(|f| match **f {
                "trip_cost" => value.get("trip_cost").is_none(),
                name => field(name).is_none(),
            })
            .copied()
            .collect();

        if !missing.is_empty() {
            return Err(RecipientFailure {
                name: field("name").unwrap_or("Unknown").to_string(),
                email: field("email").unwrap_or("Unknown").to_string(),
                reason: format!("Missing fields: {}", missing.join(", ")),
            });
        }

        let cost_raw = &value["trip_cost"];
        let trip_cost = match cost_raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        let Some(trip_cost) = trip_cost else {
            return Err(RecipientFailure {
                name: field("name").unwrap_or("Unknown").to_string(),
                email: field("email").unwrap_or("Unknown").to_string(),
                reason: format!("Invalid trip_cost: {cost_raw}"),
            });
        };

        Ok(Self {
            email: field("email").unwrap_or_default().to_string(),
            name: field("name").unwrap_or_default().to_string(),
            trip_name: field("trip_name").unwrap_or_default().to_string(),
            trip_date: field("trip_date").unwrap_or_default().to_string(),
            trip_cost,
            trip_description: field("trip_description").unwrap_or_default().to_string(),
        })
    }
}
