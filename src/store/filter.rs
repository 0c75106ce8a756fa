//! Query filters and result ordering shared by every backend.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::models::{Employee, Holiday, LeaveRequest, LeaveStatus, LeaveType};

/// Conjunctive filter over leave requests. Every field is optional; a blank
/// query value (`?type=`) counts as absent.
///
/// # Example
///
/// ```
/// use leave_ledger::models::LeaveStatus;
/// use leave_ledger::store::LeaveFilter;
///
/// let filter = LeaveFilter::for_employee("emp-ava").with_status(LeaveStatus::Approved);
/// assert_eq!(filter.employee_id.as_deref(), Some("emp-ava"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveFilter {
    /// Exact employee match.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub employee_id: Option<String>,
    /// Exact type match.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub leave_type: Option<LeaveType>,
    /// Exact status match.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<LeaveStatus>,
    /// Keep requests ending on or after this date.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub from: Option<NaiveDate>,
    /// Keep requests starting on or before this date.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub to: Option<NaiveDate>,
}

impl LeaveFilter {
    /// A filter matching one employee's requests.
    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            ..Self::default()
        }
    }

    /// Restricts the filter to `status`.
    pub fn with_status(mut self, status: LeaveStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the filter to `leave_type`.
    pub fn with_type(mut self, leave_type: LeaveType) -> Self {
        self.leave_type = Some(leave_type);
        self
    }

    /// Restricts the filter to requests overlapping `[from, to]`.
    pub fn overlapping(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Returns true if `request` satisfies every present field.
    pub fn matches(&self, request: &LeaveRequest) -> bool {
        if self
            .employee_id
            .as_deref()
            .is_some_and(|id| request.employee_id != id)
        {
            return false;
        }
        if self.leave_type.is_some_and(|t| request.leave_type != t) {
            return false;
        }
        if self.status.is_some_and(|s| request.status != s) {
            return false;
        }
        request.range().overlaps(self.from, self.to)
    }
}

/// Filter over holidays by exact region and calendar year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayFilter {
    /// Exact region match.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub region: Option<String>,
    /// Calendar year of the holiday date.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<i32>,
}

impl HolidayFilter {
    /// A filter for one region and year.
    pub fn new(region: impl Into<String>, year: i32) -> Self {
        Self {
            region: Some(region.into()),
            year: Some(year),
        }
    }

    /// Returns true if `holiday` satisfies every present field.
    pub fn matches(&self, holiday: &Holiday) -> bool {
        self.region.as_deref().is_none_or(|r| holiday.region == r)
            && self.year.is_none_or(|y| holiday.date.year() == y)
    }
}

/// Reads an optional query value as text, treating an empty or blank value
/// as absent and parsing anything else.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Orders employees by first name then last name, case-insensitively.
pub(crate) fn sort_employees(employees: &mut [Employee]) {
    employees.sort_by(|a, b| {
        compare_names(&a.first_name, &b.first_name)
            .then_with(|| compare_names(&a.last_name, &b.last_name))
    });
}

/// Orders leave requests by start date, keeping insertion order for ties.
pub(crate) fn sort_leave_requests(requests: &mut [LeaveRequest]) {
    requests.sort_by_key(|request| request.start_date);
}

/// Orders holidays by date.
pub(crate) fn sort_holidays(holidays: &mut [Holiday]) {
    holidays.sort_by_key(|holiday| holiday.date);
}

/// Compares names ignoring case and Latin diacritics, then by exact text.
///
/// Only Latin letters are folded; other scripts compare by lowercase code
/// point rather than by a locale collation.
fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn collation_key(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().flat_map(char::to_lowercase).flat_map(fold_latin)
}

/// Strips the diacritic from a lowercase Latin letter; ligatures expand.
fn fold_latin(c: char) -> impl Iterator<Item = char> {
    let folded: &'static [char] = match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => &['a'],
        'æ' => &['a', 'e'],
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => &['c'],
        'ď' | 'đ' => &['d'],
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => &['e'],
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => &['g'],
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => &['i'],
        'ł' | 'ľ' | 'ĺ' | 'ļ' => &['l'],
        'ñ' | 'ń' | 'ņ' | 'ň' => &['n'],
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => &['o'],
        'œ' => &['o', 'e'],
        'ŕ' | 'ř' => &['r'],
        'ß' => &['s', 's'],
        'ś' | 'ŝ' | 'ş' | 'š' => &['s'],
        'ţ' | 'ť' => &['t'],
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => &['u'],
        'ý' | 'ÿ' => &['y'],
        'ź' | 'ż' | 'ž' => &['z'],
        _ => return FoldedChars::Single(Some(c)),
    };
    FoldedChars::Table(folded.iter())
}

enum FoldedChars {
    Single(Option<char>),
    Table(std::slice::Iter<'static, char>),
}

impl Iterator for FoldedChars {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self {
            FoldedChars::Single(c) => c.take(),
            FoldedChars::Table(chars) => chars.next().copied(),
        }
    }
}
