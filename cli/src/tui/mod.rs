pub mod app;
pub mod ui;

use std::io;
use std::time::Duration;

use accountability_core::{HttpReportSource, JalaliDate};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::tui::app::{App, Start};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Runs the dashboard until the user quits. Must be called from a thread
/// that is allowed to block inside the tokio runtime.
pub fn run(
    source: HttpReportSource,
    today: JalaliDate,
    refresh_period: Duration,
    start: Start,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, today, refresh_period, start);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.drain_completions();
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Left | KeyCode::Char('h') => app.move_cursor(-1),
            KeyCode::Right | KeyCode::Char('l') => app.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => app.move_row(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_row(1),
            KeyCode::Char('n') => app.next_month(),
            KeyCode::Char('p') => app.previous_month(),
            KeyCode::Char('r') => app.reload(),
            KeyCode::Enter | KeyCode::Char(' ') => app.activate(),
            KeyCode::Esc | KeyCode::Backspace => app.back(),
            _ => {}
        }
    }
}
