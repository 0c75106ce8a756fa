//! Employee model and related types.
//!
//! This module defines the Employee struct, the Role enum, and the lenient
//! day-count decoding used for allowance and carryover values.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Annual allowance applied when none is supplied or the supplied value is unusable.
pub const DEFAULT_ALLOWANCE_DAYS: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Carryover applied when none is supplied or the supplied value is unusable.
pub const DEFAULT_CARRYOVER_DAYS: Decimal = Decimal::ZERO;

/// The role an employee holds in the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regular employee.
    #[default]
    Employee,
    /// A team manager.
    Manager,
    /// An administrator of the ledger.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Employee => write!(f, "employee"),
            Role::Manager => write!(f, "manager"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Represents an employee whose leave is tracked by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Team label (e.g., "Engineering").
    #[serde(default)]
    pub team: String,
    /// Role within the organisation.
    #[serde(default)]
    pub role: Role,
    /// Annual leave entitlement in days.
    #[serde(
        default = "default_allowance_days",
        deserialize_with = "allowance_days",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub allowance_days: Decimal,
    /// Unused days carried over from the previous period.
    #[serde(
        default = "default_carryover_days",
        deserialize_with = "carryover_days",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub carryover_days: Decimal,
    /// IANA timezone label (e.g., "Europe/London").
    #[serde(default)]
    pub timezone: String,
    /// Whether the employee is currently active.
    #[serde(default = "default_active")]
    pub active: bool,
    /// The date the employee started.
    pub start_date: NaiveDate,
}

impl Employee {
    /// Returns "first last".
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_ledger::models::{Employee, Role};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp-ava".to_string(),
    ///     first_name: "Ava".to_string(),
    ///     last_name: "Lopez".to_string(),
    ///     email: "ava@company.com".to_string(),
    ///     team: "Engineering".to_string(),
    ///     role: Role::Employee,
    ///     allowance_days: Decimal::from(22),
    ///     carryover_days: Decimal::from(2),
    ///     timezone: "America/Los_Angeles".to_string(),
    ///     active: true,
    ///     start_date: NaiveDate::from_ymd_opt(2022, 3, 14).unwrap(),
    /// };
    /// assert_eq!(employee.full_name(), "Ava Lopez");
    /// assert_eq!(employee.total_allowance(), Decimal::from(24));
    /// ```
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the annual entitlement: allowance plus carryover.
    pub fn total_allowance(&self) -> Decimal {
        self.allowance_days + self.carryover_days
    }
}

fn default_allowance_days() -> Decimal {
    DEFAULT_ALLOWANCE_DAYS
}

fn default_carryover_days() -> Decimal {
    DEFAULT_CARRYOVER_DAYS
}

fn default_active() -> bool {
    true
}

/// Day counts as they may arrive from storage or a request body.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDays {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Coerces a raw day count to a non-negative decimal, or `None` when unusable.
fn coerce_days(raw: RawDays) -> Option<Decimal> {
    let value = match raw {
        RawDays::Number(number) => Decimal::try_from(number).ok()?,
        RawDays::Text(text) => Decimal::from_str(text.trim()).ok()?,
        RawDays::Other(_) => return None,
    };
    (value >= Decimal::ZERO).then_some(value)
}

/// Decodes an optional day count; unusable values decode as `None`.
pub(crate) fn lenient_days<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDays>::deserialize(deserializer)?;
    Ok(raw.and_then(coerce_days))
}

fn allowance_days<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_days(deserializer)?.unwrap_or(DEFAULT_ALLOWANCE_DAYS))
}

fn carryover_days<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_days(deserializer)?.unwrap_or(DEFAULT_CARRYOVER_DAYS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee_json(allowance: &str, carryover: &str) -> String {
        format!(
            r#"{{
                "id": "emp-ava",
                "first_name": "Ava",
                "last_name": "Lopez",
                "email": "ava@company.com",
                "team": "Engineering",
                "role": "employee",
                "allowance_days": {},
                "carryover_days": {},
                "timezone": "America/Los_Angeles",
                "active": true,
                "start_date": "2022-03-14"
            }}"#,
            allowance, carryover
        )
    }

    #[test]
    fn test_deserialize_numeric_days() {
        let employee: Employee = serde_json::from_str(&employee_json("22", "2")).unwrap();
        assert_eq!(employee.allowance_days, Decimal::from(22));
        assert_eq!(employee.carryover_days, Decimal::from(2));
        assert_eq!(employee.total_allowance(), Decimal::from(24));
    }

    #[test]
    fn test_deserialize_days_supplied_as_text() {
        let employee: Employee =
            serde_json::from_str(&employee_json("\"22.5\"", "\" 3 \"")).unwrap();
        assert_eq!(employee.allowance_days, Decimal::new(225, 1));
        assert_eq!(employee.carryover_days, Decimal::from(3));
    }

    #[test]
    fn test_non_numeric_days_coerce_to_defaults() {
        let employee: Employee =
            serde_json::from_str(&employee_json("\"lots\"", "true")).unwrap();
        assert_eq!(employee.allowance_days, DEFAULT_ALLOWANCE_DAYS);
        assert_eq!(employee.carryover_days, DEFAULT_CARRYOVER_DAYS);
    }

    #[test]
    fn test_negative_and_null_days_coerce_to_defaults() {
        let employee: Employee = serde_json::from_str(&employee_json("-4", "null")).unwrap();
        assert_eq!(employee.allowance_days, Decimal::from(20));
        assert_eq!(employee.carryover_days, Decimal::ZERO);
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let json = r#"{
            "id": "emp-noah",
            "first_name": "Noah",
            "last_name": "Patel",
            "email": "noah@company.com",
            "start_date": "2021-08-01"
        }"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.role, Role::Employee);
        assert!(employee.active);
        assert_eq!(employee.allowance_days, Decimal::from(20));
        assert_eq!(employee.carryover_days, Decimal::ZERO);
    }

    #[test]
    fn test_days_serialize_as_numbers() {
        let employee: Employee = serde_json::from_str(&employee_json("22", "2")).unwrap();
        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["allowance_days"], serde_json::json!(22.0));
        assert_eq!(value["carryover_days"], serde_json::json!(2.0));
        assert_eq!(value["role"], "employee");
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"manager\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(Role::Employee.to_string(), "employee");
    }
}
