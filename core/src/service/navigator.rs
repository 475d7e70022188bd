use std::sync::atomic::{AtomicU64, Ordering};

use log::{info, warn};

use crate::calendar::{first_weekday_offset, DateError, JalaliDate, YearMonth};
use crate::error::FetchError;
use crate::model::report::MonthReport;
use crate::model::status::Status;
use crate::repository::ReportSource;
use crate::service::events::CalendarEvents;
use crate::service::view_state::ViewState;

/// Target of a day cell click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRoute {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DayRoute {
    pub fn path(&self) -> String {
        format!("/day/{}/{}/{}", self.year, self.month, self.day)
    }

    pub fn date(&self) -> Result<JalaliDate, DateError> {
        JalaliDate::new(self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DayCell {
    /// Padding before the first day of the month.
    Blank,
    Day {
        day: u32,
        status: Status,
        today: bool,
        route: DayRoute,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub offset: u32,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn day_count(&self) -> u32 {
        self.cells.len() as u32 - self.offset
    }

    pub fn cell_for_day(&self, day: u32) -> Option<&DayCell> {
        if day == 0 || day > self.day_count() {
            return None;
        }
        self.cells.get((self.offset + day - 1) as usize)
    }

    /// Rows of seven cells, Saturday first. The last row may be short.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }
}

static NEXT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Sequence numbers are unique across every navigator and inspector in the
/// process.
pub(crate) fn next_load_seq() -> u64 {
    NEXT_SEQ.fetch_add(1, Ordering::Relaxed)
}

/// Ticket for one month request. Only the most recently issued ticket may
/// change the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    target: YearMonth,
}

impl LoadTicket {
    pub fn target(&self) -> YearMonth {
        self.target
    }
}

pub struct CalendarNavigator<S: ReportSource> {
    source: S,
    displayed: YearMonth,
    today: JalaliDate,
    view: ViewState<MonthGrid>,
    latest: Option<LoadTicket>,
}

impl<S: ReportSource> CalendarNavigator<S> {
    /// Starts on the month containing `today`.
    pub fn new(source: S, today: JalaliDate) -> Self {
        Self {
            source,
            displayed: today.year_month(),
            today,
            view: ViewState::Loading,
            latest: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn displayed(&self) -> YearMonth {
        self.displayed
    }

    pub fn today(&self) -> JalaliDate {
        self.today
    }

    pub fn view(&self) -> &ViewState<MonthGrid> {
        &self.view
    }

    pub fn title(&self) -> String {
        self.displayed.to_string()
    }

    pub fn advance(&mut self) {
        self.displayed = self.displayed.next();
        info!("Showing {}/{}", self.displayed.year, self.displayed.month);
    }

    pub fn retreat(&mut self) {
        self.displayed = self.displayed.prev();
        info!("Showing {}/{}", self.displayed.year, self.displayed.month);
    }

    /// Marks the view as loading and issues the ticket for the request.
    pub fn begin_load(&mut self) -> LoadTicket {
        let ticket = LoadTicket {
            seq: next_load_seq(),
            target: self.displayed,
        };
        self.latest = Some(ticket);
        self.view = ViewState::Loading;
        ticket
    }

    /// Applies a completed request. Returns false when the ticket is not the
    /// latest one this navigator issued, and the result was dropped.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<MonthReport, FetchError>,
    ) -> bool {
        if self.latest != Some(ticket) || ticket.target != self.displayed {
            warn!(
                "Discarding stale month report for {}/{}",
                ticket.target.year, ticket.target.month
            );
            return false;
        }

        self.view = match result {
            Ok(report) => ViewState::Ready(self.render_grid(&report)),
            Err(err) => {
                warn!(
                    "Loading {}/{} failed: {}",
                    ticket.target.year, ticket.target.month, err
                );
                ViewState::Failed(err.user_message())
            }
        };
        true
    }

    pub async fn load_month(&mut self) -> bool {
        let ticket = self.begin_load();
        let result = self.source.month(ticket.target).await;
        self.finish_load(ticket, result)
    }

    pub fn render_grid(&self, report: &MonthReport) -> MonthGrid {
        let offset = first_weekday_offset(report.year, report.month);
        let mut cells = vec![DayCell::Blank; offset as usize];

        for day in 1..=report.days_in_month {
            let today = report.year == self.today.year()
                && report.month == self.today.month()
                && day == self.today.day();
            cells.push(DayCell::Day {
                day,
                status: report.status_of(day),
                today,
                route: DayRoute {
                    year: report.year,
                    month: report.month,
                    day,
                },
            });
        }

        MonthGrid {
            year: report.year,
            month: report.month,
            offset,
            cells,
        }
    }
}

impl<S: ReportSource> CalendarEvents for CalendarNavigator<S> {
    fn on_advance(&mut self) -> LoadTicket {
        self.advance();
        self.begin_load()
    }

    fn on_retreat(&mut self) -> LoadTicket {
        self.retreat();
        self.begin_load()
    }

    fn on_day_selected(&self, day: u32) -> Option<DayRoute> {
        match self.view.ready()?.cell_for_day(day)? {
            DayCell::Day { route, .. } => Some(*route),
            DayCell::Blank => None,
        }
    }
}
