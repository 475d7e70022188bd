use crate::calendar::{JalaliDate, YearMonth};
use crate::error::FetchError;
use crate::model::report::{CurrentDate, DayReport, LastUpdate, MonthReport};
use std::future::Future;

/// Where the dashboard's reports come from.
pub trait ReportSource {
    fn month(
        &self,
        target: YearMonth,
    ) -> impl Future<Output = Result<MonthReport, FetchError>> + Send;

    fn day(&self, date: JalaliDate) -> impl Future<Output = Result<DayReport, FetchError>> + Send;

    fn last_update(&self) -> impl Future<Output = Result<LastUpdate, FetchError>> + Send;

    fn current_date(&self) -> impl Future<Output = Result<CurrentDate, FetchError>> + Send;
}
