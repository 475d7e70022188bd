pub mod calendar;
pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;

pub use calendar::{
    days_in_month, first_weekday_offset, is_leap_year, month_name, DateError, JalaliDate,
    YearMonth,
};
pub use config::Config;
pub use error::FetchError;
pub use model::report::{CurrentDate, DayReport, HourBucket, LastUpdate, LogEntry, MonthReport};
pub use model::status::{status_label, Status};
pub use repository::{HttpReportSource, ReportSource};
pub use service::events::{CalendarEvents, DayEvents};
pub use service::inspector::{
    DayInspector, DayTicket, HourDetail, HourDetailBody, HourSlot, LogLine,
};
pub use service::navigator::{CalendarNavigator, DayCell, DayRoute, LoadTicket, MonthGrid};
pub use service::refresh::RefreshHandle;
pub use service::view_state::ViewState;
