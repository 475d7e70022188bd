use accountability_core::calendar::WEEKDAY_NAMES;
use accountability_core::service::inspector::NO_RECORDS_MESSAGE;
use accountability_core::{DayCell, HourDetail, HourDetailBody, Status};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, CalendarScreen, DayScreen, Screen};

const CALENDAR_HELP: &str = "h/j/k/l: Move | Enter: Open day | n/p: Month | r: Reload | q: Quit";
const DAY_HELP: &str = "h/j/k/l: Move | Enter: Show hour | Esc: Calendar | r: Reload | q: Quit";

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Legend
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    match &app.screen {
        Screen::Calendar(screen) => {
            draw_header(
                f,
                &screen.navigator.title(),
                Some(screen.last_update.text()),
                main_chunks[0],
            );
            draw_calendar(f, screen, main_chunks[1]);
        }
        Screen::Day(screen) => {
            draw_header(f, &screen.inspector.title(), None, main_chunks[0]);
            draw_day(f, screen, app.hours_per_row(), main_chunks[1]);
        }
    }

    draw_legend(f, main_chunks[2]);

    let help = match app.screen {
        Screen::Calendar(_) => CALENDAR_HELP,
        Screen::Day(_) => DAY_HELP,
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Safe => Color::Green,
        Status::Nsfw => Color::Red,
        Status::Error => Color::Yellow,
        Status::NoData => Color::DarkGray,
    }
}

fn class_color(class: &str) -> Color {
    class
        .parse::<Status>()
        .map(status_color)
        .unwrap_or(Color::White)
}

/// Left-pads `text` so it sits in the middle of a column `width` cells wide.
fn center(text: &str, width: u16) -> String {
    let used = text.width();
    let width = width as usize;
    if used >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - used) / 2), text)
}

fn bordered(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

fn draw_header(f: &mut Frame, title: &str, last_update: Option<String>, area: Rect) {
    let mut spans = vec![Span::styled(
        title.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    if let Some(text) = last_update {
        spans.push(Span::styled(
            "   آخرین بروزرسانی: ",
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::raw(text));
    }

    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, area);
}

fn draw_message(f: &mut Frame, message: &str, block: Block, area: Rect) {
    let paragraph = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(paragraph, area);
}

fn draw_calendar(f: &mut Frame, screen: &CalendarScreen, area: Rect) {
    let block = bordered(format!(" {} ", screen.navigator.displayed()));
    let Some(grid) = screen.navigator.view().ready() else {
        let message = screen.navigator.view().message().unwrap_or_default();
        draw_message(f, message, block, area);
        return;
    };

    let column = area.width.saturating_sub(2) / WEEKDAY_NAMES.len() as u16;

    let header = Row::new(
        WEEKDAY_NAMES
            .iter()
            .map(|name| Cell::from(center(name, column))),
    )
    .style(Style::default().fg(Color::Yellow));

    let rows: Vec<Row> = grid
        .weeks()
        .map(|week| {
            let cells: Vec<Cell> = week
                .iter()
                .map(|cell| day_cell(cell, screen.cursor_day, column))
                .collect();
            Row::new(cells).height(2)
        })
        .collect();

    let widths = [Constraint::Ratio(1, WEEKDAY_NAMES.len() as u32); 7];
    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn day_cell(cell: &DayCell, cursor_day: u32, column: u16) -> Cell<'static> {
    let DayCell::Day {
        day, status, today, ..
    } = cell
    else {
        return Cell::from("");
    };

    let mut number_style = Style::default().add_modifier(Modifier::BOLD);
    if *today {
        number_style = number_style.add_modifier(Modifier::UNDERLINED).fg(Color::Cyan);
    }
    let text = Text::from(vec![
        Line::from(Span::styled(center(&day.to_string(), column), number_style)),
        Line::from(Span::styled(
            center(status.label(), column),
            Style::default().fg(status_color(*status)),
        )),
    ]);

    let mut style = Style::default();
    if *day == cursor_day {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Cell::from(text).style(style)
}

fn draw_day(f: &mut Frame, screen: &DayScreen, per_row: u32, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let block = bordered(" ساعت‌ها ".to_string());
    if let Some(message) = screen.inspector.view().message() {
        draw_message(f, message, block, chunks[0]);
        draw_detail(f, None, chunks[1]);
        return;
    }

    let column = chunks[0].width.saturating_sub(2) / per_row as u16;
    let slots = screen.inspector.slots();
    let rows: Vec<Row> = slots
        .chunks(per_row as usize)
        .map(|row| {
            let cells: Vec<Cell> = row
                .iter()
                .map(|slot| {
                    let text = Text::from(vec![
                        Line::from(Span::styled(
                            center(&slot.label(), column),
                            Style::default().add_modifier(Modifier::BOLD),
                        )),
                        Line::from(Span::styled(
                            center(slot.status.label(), column),
                            Style::default().fg(status_color(slot.status)),
                        )),
                        Line::from(Span::styled(
                            center(&slot.count_label(), column),
                            Style::default().fg(Color::DarkGray),
                        )),
                    ]);
                    let mut style = Style::default();
                    if slot.selected {
                        style = style.bg(Color::Blue);
                    }
                    if slot.hour == screen.cursor_hour {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Cell::from(text).style(style)
                })
                .collect();
            Row::new(cells).height(3)
        })
        .collect();

    let widths = vec![Constraint::Ratio(1, per_row); per_row as usize];
    let table = Table::new(rows, widths).block(block);
    f.render_widget(table, chunks[0]);

    draw_detail(f, screen.inspector.detail(), chunks[1]);
}

fn draw_detail(f: &mut Frame, detail: Option<&HourDetail>, area: Rect) {
    let Some(detail) = detail else {
        f.render_widget(bordered(" جزئیات ".to_string()), area);
        return;
    };

    let lines: Vec<Line> = match &detail.body {
        HourDetailBody::NoRecords => vec![Line::from(Span::styled(
            NO_RECORDS_MESSAGE,
            Style::default().fg(Color::DarkGray),
        ))],
        HourDetailBody::Entries(entries) => entries
            .iter()
            .map(|entry| {
                let mut spans = vec![
                    Span::styled(entry.time.clone(), Style::default().fg(Color::Blue)),
                    Span::raw("  "),
                    Span::styled(
                        entry.label.clone(),
                        Style::default().fg(class_color(&entry.class)),
                    ),
                ];
                if let Some(details) = &entry.details {
                    spans.push(Span::raw("  "));
                    spans.push(Span::raw(details.clone()));
                }
                Line::from(spans)
            })
            .collect(),
    };

    let paragraph = Paragraph::new(lines)
        .block(bordered(format!(" {} ", detail.heading())))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_legend(f: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for status in Status::ALL {
        spans.push(Span::styled("■ ", Style::default().fg(status_color(status))));
        spans.push(Span::raw(status.label()));
        spans.push(Span::raw("   "));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}
