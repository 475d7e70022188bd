use std::time::Duration;

use accountability_core::{
    CalendarEvents, CalendarNavigator, DayEvents, DayInspector, DayReport, DayTicket, FetchError,
    HttpReportSource, JalaliDate, LoadTicket, MonthReport, RefreshHandle, ReportSource,
};
use log::{info, warn};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

const HOURS_PER_ROW: u32 = 6;

/// Result of a spawned fetch, posted back to the UI loop.
pub enum Completion {
    Month(LoadTicket, Result<MonthReport, FetchError>),
    Day(DayTicket, Result<DayReport, FetchError>),
}

pub enum Start {
    Calendar,
    Day(JalaliDate),
}

pub struct CalendarScreen {
    pub navigator: CalendarNavigator<HttpReportSource>,
    pub cursor_day: u32,
    pub last_update: RefreshHandle,
}

pub struct DayScreen {
    pub inspector: DayInspector<HttpReportSource>,
    pub cursor_hour: u32,
}

pub enum Screen {
    Calendar(CalendarScreen),
    Day(DayScreen),
}

pub struct App {
    pub screen: Screen,
    source: HttpReportSource,
    today: JalaliDate,
    refresh_period: Duration,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
}

impl App {
    /// Must be called inside a tokio runtime; loads are spawned onto it.
    pub fn new(
        source: HttpReportSource,
        today: JalaliDate,
        refresh_period: Duration,
        start: Start,
    ) -> App {
        let (tx, rx) = unbounded_channel();
        let screen = match start {
            Start::Calendar => calendar_screen(&source, today, refresh_period),
            Start::Day(date) => day_screen(&source, date),
        };
        let mut app = App {
            screen,
            source,
            today,
            refresh_period,
            tx,
            rx,
        };
        app.reload();
        app
    }

    /// Replaces the current screen with the calendar on today's month.
    pub fn open_calendar(&mut self) {
        info!("Opening calendar");
        self.screen = calendar_screen(&self.source, self.today, self.refresh_period);
        self.reload();
    }

    /// Replaces the current screen with a day's breakdown.
    pub fn open_day(&mut self, date: JalaliDate) {
        info!("Opening day {}", date);
        self.screen = day_screen(&self.source, date);
        self.reload();
    }

    pub fn reload(&mut self) {
        match &mut self.screen {
            Screen::Calendar(screen) => {
                let ticket = screen.navigator.begin_load();
                self.spawn_month_load(ticket);
            }
            Screen::Day(screen) => {
                let ticket = screen.inspector.begin_load();
                self.spawn_day_load(ticket);
            }
        }
    }

    fn spawn_month_load(&self, ticket: LoadTicket) {
        let source = self.source.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = source.month(ticket.target()).await;
            let _ = tx.send(Completion::Month(ticket, result));
        });
    }

    fn spawn_day_load(&self, ticket: DayTicket) {
        let source = self.source.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = source.day(ticket.date()).await;
            let _ = tx.send(Completion::Day(ticket, result));
        });
    }

    /// Applies every completion that has arrived since the last frame.
    pub fn drain_completions(&mut self) {
        while let Ok(completion) = self.rx.try_recv() {
            match (completion, &mut self.screen) {
                (Completion::Month(ticket, result), Screen::Calendar(screen)) => {
                    if screen.navigator.finish_load(ticket, result) {
                        let days = screen.navigator.view().ready().map(|g| g.day_count());
                        if let Some(days) = days {
                            screen.cursor_day = screen.cursor_day.clamp(1, days);
                        }
                    }
                }
                (Completion::Day(ticket, result), Screen::Day(screen)) => {
                    screen.inspector.finish_load(ticket, result);
                }
                _ => warn!("Dropping a completion for a screen that is no longer open"),
            }
        }
    }

    pub fn next_month(&mut self) {
        if let Screen::Calendar(screen) = &mut self.screen {
            let ticket = screen.navigator.on_advance();
            self.spawn_month_load(ticket);
        }
    }

    pub fn previous_month(&mut self) {
        if let Screen::Calendar(screen) = &mut self.screen {
            let ticket = screen.navigator.on_retreat();
            self.spawn_month_load(ticket);
        }
    }

    /// Moves the day or hour cursor by `delta` cells, clamped to the grid.
    pub fn move_cursor(&mut self, delta: i32) {
        match &mut self.screen {
            Screen::Calendar(screen) => {
                let days = screen.navigator.displayed().days() as i32;
                screen.cursor_day = (screen.cursor_day as i32 + delta).clamp(1, days) as u32;
            }
            Screen::Day(screen) => {
                screen.cursor_hour = (screen.cursor_hour as i32 + delta).clamp(0, 23) as u32;
            }
        }
    }

    pub fn move_row(&mut self, rows: i32) {
        let width = match self.screen {
            Screen::Calendar(_) => 7,
            Screen::Day(_) => HOURS_PER_ROW as i32,
        };
        self.move_cursor(rows * width);
    }

    /// Enter: open the day under the cursor, or show the hour under it.
    pub fn activate(&mut self) {
        let route = match &mut self.screen {
            Screen::Calendar(screen) => screen.navigator.on_day_selected(screen.cursor_day),
            Screen::Day(screen) => {
                screen.inspector.on_hour_selected(screen.cursor_hour);
                None
            }
        };

        if let Some(route) = route {
            info!("Navigating to {}", route.path());
            match route.date() {
                Ok(date) => self.open_day(date),
                Err(err) => warn!("Invalid route {}: {}", route.path(), err),
            }
        }
    }

    pub fn back(&mut self) {
        if let Screen::Day(_) = self.screen {
            self.open_calendar();
        }
    }

    pub fn hours_per_row(&self) -> u32 {
        HOURS_PER_ROW
    }
}

fn calendar_screen(
    source: &HttpReportSource,
    today: JalaliDate,
    refresh_period: Duration,
) -> Screen {
    Screen::Calendar(CalendarScreen {
        navigator: CalendarNavigator::new(source.clone(), today),
        cursor_day: today.day(),
        last_update: RefreshHandle::spawn(source.clone(), refresh_period),
    })
}

fn day_screen(source: &HttpReportSource, date: JalaliDate) -> Screen {
    Screen::Day(DayScreen {
        inspector: DayInspector::new(source.clone(), date),
        cursor_hour: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use accountability_core::Config;

    fn offline_source() -> HttpReportSource {
        let config = Config {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        HttpReportSource::new(&config).unwrap()
    }

    fn today() -> JalaliDate {
        JalaliDate::new(1404, 7, 24).unwrap()
    }

    #[tokio::test]
    async fn test_start_on_day_builds_only_the_day_screen() {
        let date = JalaliDate::new(1404, 7, 3).unwrap();
        let period = Duration::from_secs(30);
        let app = App::new(offline_source(), today(), period, Start::Day(date));

        match &app.screen {
            Screen::Day(screen) => {
                assert_eq!(screen.inspector.date(), date);
                assert!(screen.inspector.view().is_loading());
                assert_eq!(screen.cursor_hour, 0);
            }
            Screen::Calendar(_) => panic!("expected the day screen"),
        }
    }

    #[tokio::test]
    async fn test_start_on_calendar_shows_todays_month() {
        let period = Duration::from_secs(30);
        let app = App::new(offline_source(), today(), period, Start::Calendar);

        match &app.screen {
            Screen::Calendar(screen) => {
                assert_eq!(screen.navigator.displayed(), today().year_month());
                assert_eq!(screen.cursor_day, 24);
            }
            Screen::Day(_) => panic!("expected the calendar screen"),
        }
    }

    #[tokio::test]
    async fn test_back_from_day_returns_to_calendar() {
        let date = JalaliDate::new(1404, 6, 1).unwrap();
        let period = Duration::from_secs(30);
        let mut app = App::new(offline_source(), today(), period, Start::Day(date));
        app.back();

        match &app.screen {
            Screen::Calendar(screen) => {
                assert_eq!(screen.navigator.displayed(), today().year_month());
            }
            Screen::Day(_) => panic!("expected the calendar screen"),
        }
    }
}
