//! The serialized snapshot blob and its self-healing decode path.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::models::{Employee, Holiday, LeaveRequest};

use super::seed;

/// The complete local dataset, stored as one JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All employees.
    pub employees: Vec<Employee>,
    /// All holidays.
    pub holidays: Vec<Holiday>,
    /// All leave requests.
    pub vacations: Vec<LeaveRequest>,
}

/// A part of a stored snapshot that was replaced by seed data on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovery {
    /// The collection replaced, or `None` when the whole blob was.
    pub collection: Option<&'static str>,
    /// Why the stored data was unusable.
    pub reason: String,
}

impl std::fmt::Display for Recovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.collection {
            Some(name) => write!(f, "collection '{}' {}", name, self.reason),
            None => write!(f, "snapshot {}", self.reason),
        }
    }
}

impl Snapshot {
    /// The default dataset, dated in `year`.
    pub fn seed(year: i32) -> Self {
        Self {
            employees: seed::employees(),
            holidays: seed::holidays(year),
            vacations: seed::leave_requests(year),
        }
    }

    /// Decodes a stored blob, replacing whatever is unusable with seed data.
    ///
    /// `employees` and `holidays` must be present arrays with at least one
    /// readable record; `vacations` must be a present array but may be empty.
    /// Unreadable records are dropped individually. Each collection replaced
    /// by seed data is reported so the caller can log it.
    pub fn recover(raw: Option<&str>, year: i32) -> (Self, Vec<Recovery>) {
        let Some(raw) = raw else {
            return (Self::seed(year), Vec::new());
        };

        let object = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(object)) => object,
            Ok(_) => return Self::whole_blob(year, "is not a JSON object"),
            Err(err) => return Self::whole_blob(year, &format!("is not valid JSON: {}", err)),
        };

        let mut recoveries = Vec::new();
        let employees = take::<Employee>(&object, &mut recoveries, "employees", false);
        let holidays = take::<Holiday>(&object, &mut recoveries, "holidays", false);
        let vacations = take::<LeaveRequest>(&object, &mut recoveries, "vacations", true);

        let snapshot = Self {
            employees: employees.unwrap_or_else(seed::employees),
            holidays: holidays.unwrap_or_else(|| seed::holidays(year)),
            vacations: vacations.unwrap_or_else(|| seed::leave_requests(year)),
        };
        (snapshot, recoveries)
    }

    fn whole_blob(year: i32, reason: &str) -> (Self, Vec<Recovery>) {
        let recovery = Recovery {
            collection: None,
            reason: reason.to_string(),
        };
        (Self::seed(year), vec![recovery])
    }
}

fn take<T: DeserializeOwned>(
    object: &Map<String, Value>,
    recoveries: &mut Vec<Recovery>,
    name: &'static str,
    allow_empty: bool,
) -> Option<Vec<T>> {
    match collection(object, name, allow_empty) {
        Ok(records) => Some(records),
        Err(reason) => {
            recoveries.push(Recovery {
                collection: Some(name),
                reason,
            });
            None
        }
    }
}

/// Decodes one collection record by record. Records that fail to decode are
/// dropped on their own; the collection is only unusable when it is missing,
/// is not an array, or (unless `allow_empty`) has no usable record left.
fn collection<T: DeserializeOwned>(
    object: &Map<String, Value>,
    name: &str,
    allow_empty: bool,
) -> Result<Vec<T>, String> {
    let values = match object.get(name) {
        None | Some(Value::Null) => return Err("is missing".to_string()),
        Some(Value::Array(values)) => values,
        Some(_) => return Err("is not an array".to_string()),
    };

    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        match T::deserialize(value) {
            Ok(record) => records.push(record),
            Err(err) => warn!(
                collection = name,
                index,
                id = value.get("id").and_then(serde_json::Value::as_str).unwrap_or("<none>"),
                error = %err,
                "Dropping unreadable stored record"
            ),
        }
    }

    if records.is_empty() && !allow_empty {
        return Err(if values.is_empty() {
            "is empty".to_string()
        } else {
            "has no readable record".to_string()
        });
    }
    Ok(records)
}
