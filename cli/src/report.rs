use accountability_core::calendar::WEEKDAY_NAMES;
use accountability_core::{
    days_in_month, is_leap_year, CalendarNavigator, DayCell, DayInspector, HourDetail,
    HourDetailBody, ReportSource, YearMonth,
};
use tabled::builder::Builder;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct HourRow {
    #[tabled(rename = "Hour")]
    hour: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Records")]
    count: String,
}

pub fn print_month<S: ReportSource>(navigator: &CalendarNavigator<S>) {
    println!("\x1b[1;36m{}\x1b[0m", navigator.title());

    let Some(grid) = navigator.view().ready() else {
        println!("{}", navigator.view().message().unwrap_or_default());
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(WEEKDAY_NAMES);
    for week in grid.weeks() {
        let mut row: Vec<String> = week.iter().map(cell_text).collect();
        row.resize(WEEKDAY_NAMES.len(), String::new());
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
    println!("* today");
}

fn cell_text(cell: &DayCell) -> String {
    match cell {
        DayCell::Blank => String::new(),
        DayCell::Day {
            day, status, today, ..
        } => {
            let marker = if *today { "*" } else { "" };
            format!("{}{}\n{}", day, marker, status.label())
        }
    }
}

pub fn print_day<S: ReportSource>(inspector: &mut DayInspector<S>, hour: Option<u32>) {
    println!("\x1b[1;36m{}\x1b[0m", inspector.title());

    if let Some(message) = inspector.view().message() {
        println!("{}", message);
        return;
    }

    let rows: Vec<HourRow> = inspector
        .slots()
        .iter()
        .map(|slot| HourRow {
            hour: slot.label(),
            status: slot.status.label().to_string(),
            count: slot.count_label(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);

    if let Some(hour) = hour {
        match inspector.select_hour(hour) {
            Some(detail) => print_detail(detail),
            None => println!("No hour {}", hour),
        }
    }
}

fn print_detail(detail: &HourDetail) {
    println!("\n\x1b[1m{}\x1b[0m", detail.heading());
    match &detail.body {
        HourDetailBody::NoRecords => {
            println!("{}", accountability_core::service::inspector::NO_RECORDS_MESSAGE)
        }
        HourDetailBody::Entries(lines) => {
            for line in lines {
                match &line.details {
                    Some(details) => println!("  {}  {}  {}", line.time, line.label, details),
                    None => println!("  {}  {}", line.time, line.label),
                }
            }
        }
    }
}

pub fn print_offset(target: YearMonth) {
    let weekday = WEEKDAY_NAMES[target.first_weekday_offset() as usize];
    println!("{}", target);
    println!("  Leap year:     {}", is_leap_year(target.year));
    println!("  Days in month: {}", days_in_month(target.year, target.month));
    println!(
        "  First weekday: {} ({})",
        target.first_weekday_offset(),
        weekday
    );
}
