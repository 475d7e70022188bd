use log::warn;

use crate::calendar::JalaliDate;
use crate::error::FetchError;
use crate::model::report::{DayReport, HourBucket, HOURS_PER_DAY};
use crate::model::status::Status;
use crate::repository::ReportSource;
use crate::service::events::DayEvents;
use crate::service::navigator::next_load_seq;
use crate::service::view_state::ViewState;

pub const NO_RECORDS_MESSAGE: &str = "هیچ رکوردی در این ساعت ثبت نشده";

/// Summary tile for one hour of the day.
#[derive(Debug, Clone, PartialEq)]
pub struct HourSlot {
    pub hour: u32,
    pub status: Status,
    pub count: u32,
    pub selected: bool,
}

impl HourSlot {
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }

    pub fn count_label(&self) -> String {
        format!("{} رکورد", self.count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub time: String,
    pub label: String,
    /// Raw status, used as the visual class.
    pub class: String,
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HourDetailBody {
    NoRecords,
    Entries(Vec<LogLine>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourDetail {
    pub hour: u32,
    pub body: HourDetailBody,
}

impl HourDetail {
    pub fn heading(&self) -> String {
        format!("ساعت {:02}:00", self.hour)
    }
}

pub fn render_hour_detail(hour: u32, bucket: &HourBucket) -> HourDetail {
    if bucket.logs.is_empty() {
        return HourDetail {
            hour,
            body: HourDetailBody::NoRecords,
        };
    }

    let lines = bucket
        .logs
        .iter()
        .map(|entry| LogLine {
            time: entry.time.clone(),
            label: entry.label().to_string(),
            class: entry.status.clone(),
            details: entry.details().map(str::to_string),
        })
        .collect();

    HourDetail {
        hour,
        body: HourDetailBody::Entries(lines),
    }
}

/// Ticket for one day request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTicket {
    seq: u64,
    date: JalaliDate,
}

impl DayTicket {
    pub fn date(&self) -> JalaliDate {
        self.date
    }
}

pub struct DayInspector<S: ReportSource> {
    source: S,
    date: JalaliDate,
    view: ViewState<Vec<HourBucket>>,
    selected_hour: Option<u32>,
    detail: Option<HourDetail>,
    latest: Option<DayTicket>,
}

impl<S: ReportSource> DayInspector<S> {
    pub fn new(source: S, date: JalaliDate) -> Self {
        Self {
            source,
            date,
            view: ViewState::Loading,
            selected_hour: None,
            detail: None,
            latest: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn date(&self) -> JalaliDate {
        self.date
    }

    pub fn title(&self) -> String {
        self.date.to_string()
    }

    pub fn view(&self) -> &ViewState<Vec<HourBucket>> {
        &self.view
    }

    pub fn hours(&self) -> Option<&[HourBucket]> {
        self.view.ready().map(Vec::as_slice)
    }

    pub fn selected_hour(&self) -> Option<u32> {
        self.selected_hour
    }

    pub fn detail(&self) -> Option<&HourDetail> {
        self.detail.as_ref()
    }

    /// The 24 tiles, empty until a report has loaded.
    pub fn slots(&self) -> Vec<HourSlot> {
        let Some(hours) = self.hours() else {
            return Vec::new();
        };
        hours
            .iter()
            .zip(0..HOURS_PER_DAY)
            .map(|(bucket, hour)| HourSlot {
                hour,
                status: bucket.status,
                count: bucket.count,
                selected: self.selected_hour == Some(hour),
            })
            .collect()
    }

    pub fn begin_load(&mut self) -> DayTicket {
        let ticket = DayTicket {
            seq: next_load_seq(),
            date: self.date,
        };
        self.latest = Some(ticket);
        self.view = ViewState::Loading;
        self.selected_hour = None;
        self.detail = None;
        ticket
    }

    /// Returns false when a later load has been started and the result was
    /// dropped.
    pub fn finish_load(
        &mut self,
        ticket: DayTicket,
        result: Result<DayReport, FetchError>,
    ) -> bool {
        if self.latest != Some(ticket) {
            warn!("Discarding stale day report for {}", ticket.date);
            return false;
        }

        self.view = match result {
            Ok(report) => ViewState::Ready(report.into_slots()),
            Err(err) => {
                warn!("Loading day {} failed: {}", self.date, err);
                ViewState::Failed(err.user_message())
            }
        };
        true
    }

    pub async fn load_day(&mut self) -> bool {
        let ticket = self.begin_load();
        let result = self.source.day(self.date).await;
        self.finish_load(ticket, result)
    }

    /// Selects `hour`, replacing any previous selection, and renders its
    /// detail panel. Ignored before the hours have loaded.
    pub fn select_hour(&mut self, hour: u32) -> Option<&HourDetail> {
        let bucket = self.hours()?.get(hour as usize)?;
        let detail = render_hour_detail(hour, bucket);
        self.selected_hour = Some(hour);
        self.detail = Some(detail);
        self.detail.as_ref()
    }
}

impl<S: ReportSource> DayEvents for DayInspector<S> {
    fn on_hour_selected(&mut self, hour: u32) -> Option<&HourDetail> {
        self.select_hour(hour)
    }
}
