use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::calendar::{JalaliDate, YearMonth};
use crate::error::FetchError;
use crate::model::report::{CurrentDate, DayReport, LastUpdate, MonthReport};
use crate::repository::ReportSource;

/// In-memory source. Requests for anything not registered fail with 404,
/// and `app_error` turns every report request into an application error.
#[derive(Default)]
pub struct MockSource {
    pub months: HashMap<YearMonth, MonthReport>,
    pub days: HashMap<JalaliDate, DayReport>,
    pub last_update: Option<LastUpdate>,
    pub app_error: Option<String>,
    pub calls: Arc<AtomicUsize>,
}

impl MockSource {
    pub fn with_month(mut self, report: MonthReport) -> Self {
        let key = YearMonth::new(report.year, report.month).unwrap();
        self.months.insert(key, report);
        self
    }

    pub fn with_day(mut self, report: DayReport) -> Self {
        let key = JalaliDate::new(report.year, report.month, report.day).unwrap();
        self.days.insert(key, report);
        self
    }

    fn record_call(&self) -> Result<(), FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.app_error {
            Some(message) => Err(FetchError::Application(message.clone())),
            None => Ok(()),
        }
    }
}

impl ReportSource for MockSource {
    async fn month(&self, target: YearMonth) -> Result<MonthReport, FetchError> {
        self.record_call()?;
        self.months.get(&target).cloned().ok_or(FetchError::Status(404))
    }

    async fn day(&self, date: JalaliDate) -> Result<DayReport, FetchError> {
        self.record_call()?;
        self.days.get(&date).cloned().ok_or(FetchError::Status(404))
    }

    async fn last_update(&self) -> Result<LastUpdate, FetchError> {
        self.record_call()?;
        self.last_update
            .clone()
            .ok_or_else(|| FetchError::Malformed("no last update".to_string()))
    }

    async fn current_date(&self) -> Result<CurrentDate, FetchError> {
        self.record_call()?;
        Ok(CurrentDate {
            year: 1404,
            month: 7,
            day: 24,
        })
    }
}
