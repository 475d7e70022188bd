use crate::calendar::{DateError, JalaliDate, YearMonth};
use crate::error::FetchError;
use crate::model::status::{status_label, Status};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const HOURS_PER_DAY: u32 = 24;

/// Per-day summary statuses for one month. Days absent from `days` have no data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthReport {
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    #[serde(default)]
    pub days: BTreeMap<u32, Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_name: Option<String>,
}

impl MonthReport {
    pub fn status_of(&self, day: u32) -> Status {
        self.days.get(&day).copied().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        YearMonth::new(self.year, self.month).map_err(malformed)?;
        if !(29..=31).contains(&self.days_in_month) {
            return Err(FetchError::Malformed(format!(
                "days_in_month out of range: {}",
                self.days_in_month
            )));
        }
        if let Some(day) = self.days.keys().find(|d| **d < 1 || **d > self.days_in_month) {
            return Err(FetchError::Malformed(format!("day {} outside month", day)));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub time: String,
    pub status: String,
    #[serde(default)]
    pub details: Option<String>,
}

impl LogEntry {
    pub fn label(&self) -> &str {
        status_label(&self.status)
    }

    /// Details text, treating an empty string as absent.
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref().filter(|d| !d.is_empty())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct HourBucket {
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DayReport {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub hours: BTreeMap<u32, HourBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_name: Option<String>,
}

impl DayReport {
    pub fn validate(&self) -> Result<(), FetchError> {
        YearMonth::new(self.year, self.month).map_err(malformed)?;
        if !(1..=31).contains(&self.day) {
            return Err(FetchError::Malformed(format!("day out of range: {}", self.day)));
        }
        if let Some(hour) = self.hours.keys().find(|h| **h >= HOURS_PER_DAY) {
            return Err(FetchError::Malformed(format!("hour out of range: {}", hour)));
        }
        Ok(())
    }

    /// The fixed 24 slots, empty buckets filling the hours the report omits.
    pub fn into_slots(mut self) -> Vec<HourBucket> {
        (0..HOURS_PER_DAY)
            .map(|hour| self.hours.remove(&hour).unwrap_or_default())
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LastUpdate {
    pub has_data: bool,
    #[serde(default)]
    pub jalali: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl LastUpdate {
    pub const NO_DATA_TEXT: &'static str = "هیچ داده‌ای دریافت نشده";

    pub fn display_text(&self) -> String {
        match (self.has_data, self.jalali.as_deref()) {
            (true, Some(jalali)) => jalali.to_string(),
            _ => Self::NO_DATA_TEXT.to_string(),
        }
    }

    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CurrentDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CurrentDate {
    pub fn to_date(self) -> Result<JalaliDate, DateError> {
        JalaliDate::new(self.year, self.month, self.day)
    }
}

fn malformed(err: DateError) -> FetchError {
    FetchError::Malformed(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_report_decodes_string_keys() {
        let json = r#"{"year":1404,"month":7,"days_in_month":30,"days":{"1":"safe","5":"nsfw"},"month_name":"مهر"}"#;
        let report: MonthReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.status_of(1), Status::Safe);
        assert_eq!(report.status_of(5), Status::Nsfw);
        assert_eq!(report.status_of(2), Status::NoData);
        assert_eq!(report.month_name.as_deref(), Some("مهر"));
        assert!(report.validate().is_ok());
    }

    #[test]
    fn test_month_report_rejects_day_outside_month() {
        let json = r#"{"year":1404,"month":7,"days_in_month":30,"days":{"31":"safe"}}"#;
        let report: MonthReport = serde_json::from_str(json).unwrap();
        assert!(matches!(report.validate(), Err(FetchError::Malformed(_))));

        let json = r#"{"year":1404,"month":13,"days_in_month":30,"days":{}}"#;
        let report: MonthReport = serde_json::from_str(json).unwrap();
        assert!(report.validate().is_err());
    }

    #[test]
    fn test_day_report_slots_fill_missing_hours() {
        let json = r#"{"year":1404,"month":7,"day":3,"hours":{"14":{"status":"safe","count":2,"logs":[]}}}"#;
        let report: DayReport = serde_json::from_str(json).unwrap();
        assert!(report.validate().is_ok());

        let slots = report.into_slots();
        assert_eq!(slots.len(), 24);
        assert_eq!(slots[14].status, Status::Safe);
        assert_eq!(slots[14].count, 2);
        assert_eq!(slots[0], HourBucket::default());
        assert_eq!(slots[0].status, Status::NoData);
    }

    #[test]
    fn test_day_report_rejects_hour_24() {
        let json = r#"{"year":1404,"month":7,"day":3,"hours":{"24":{"status":"safe","count":1,"logs":[]}}}"#;
        let report: DayReport = serde_json::from_str(json).unwrap();
        assert!(report.validate().is_err());
    }

    #[test]
    fn test_log_entry_details_and_label() {
        let entry = LogEntry {
            time: "14:05".to_string(),
            status: "nsfw".to_string(),
            details: Some(String::new()),
        };
        assert_eq!(entry.label(), "نامناسب");
        assert_eq!(entry.details(), None);

        let entry = LogEntry { status: "weird".to_string(), ..entry };
        assert_eq!(entry.label(), "weird");
    }

    #[test]
    fn test_last_update_text() {
        let json = r#"{"timestamp":"2025-10-16T08:05:00.123000","jalali":"1404/07/24 11:35:00","has_data":true}"#;
        let update: LastUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.display_text(), "1404/07/24 11:35:00");
        assert!(update.parsed_timestamp().is_some());

        let empty: LastUpdate = serde_json::from_str(r#"{"has_data":false}"#).unwrap();
        assert_eq!(empty.display_text(), LastUpdate::NO_DATA_TEXT);
        assert_eq!(empty.parsed_timestamp(), None);
    }
}
