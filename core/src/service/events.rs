use crate::service::inspector::HourDetail;
use crate::service::navigator::{DayRoute, LoadTicket};

/// User intents on the month view. The front end runs the load described by
/// the returned ticket and hands the result back to the navigator.
pub trait CalendarEvents {
    fn on_advance(&mut self) -> LoadTicket;
    fn on_retreat(&mut self) -> LoadTicket;
    /// Where a click on `day` should navigate, if that day is on the grid.
    fn on_day_selected(&self, day: u32) -> Option<DayRoute>;
}

/// User intents on the day view.
pub trait DayEvents {
    fn on_hour_selected(&mut self, hour: u32) -> Option<&HourDetail>;
}
