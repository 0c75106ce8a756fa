//! Holiday reference data.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A public holiday for a region. Display-only; never aggregated into usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Unique identifier for the holiday.
    pub id: String,
    /// The region where this holiday applies (e.g., "US").
    pub region: String,
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
}

impl Holiday {
    /// Returns the calendar year the holiday falls in.
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}
