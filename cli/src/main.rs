mod report;
mod tui;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::time::Duration;

use accountability_core::{
    CalendarNavigator, Config, DayInspector, HttpReportSource, JalaliDate, ReportSource,
    YearMonth,
};
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use log::info;

use crate::tui::app::Start;

#[derive(Parser)]
#[command(name = "accountability")]
#[command(about = "Jalali activity dashboard for the accountability server", long_about = None)]
struct Cli {
    /// Server base URL (overrides the config file)
    #[arg(long, global = true, env = "ACCOUNTABILITY_URL")]
    base_url: Option<String>,

    /// Session token sent as the `session_token` cookie
    #[arg(long, global = true, env = "ACCOUNTABILITY_TOKEN", hide_env_values = true)]
    session_token: Option<String>,

    /// Config file (default: ~/.accountability/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Today's Jalali date as Y/M/D; fetched from the server when omitted
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the calendar dashboard
    Tui,
    /// Open the dashboard on one day's hourly breakdown
    Day { year: i32, month: u32, day: u32 },
    /// Print a month's day grid
    Month { year: i32, month: u32 },
    /// Print a day's 24 hour slots, optionally with one hour's records
    Hours {
        year: i32,
        month: u32,
        day: u32,
        #[arg(long)]
        hour: Option<u32>,
    },
    /// Print leap year, month length and first weekday for a month (offline)
    Offset { year: i32, month: u32 },
    /// Print when the server last received a log
    LastUpdate,
    /// Log in and store the session token in the config file
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "ACCOUNTABILITY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let config = Config::load_or_init(&config_path)?
        .with_overrides(cli.base_url.clone(), cli.session_token.clone());

    let command = cli.command.unwrap_or(Commands::Tui);
    let interactive = matches!(command, Commands::Tui | Commands::Day { .. });
    init_logging(&config, interactive)?;

    let source = HttpReportSource::new(&config)?;
    let refresh_period = Duration::from_secs(config.refresh_secs);

    match command {
        Commands::Tui => {
            let today = resolve_today(&source, cli.today.as_deref()).await?;
            tokio::task::block_in_place(|| {
                tui::run(source, today, refresh_period, Start::Calendar)
            })?;
        }
        Commands::Day { year, month, day } => {
            let date = JalaliDate::new(year, month, day)?;
            let today = resolve_today(&source, cli.today.as_deref()).await?;
            tokio::task::block_in_place(|| {
                tui::run(source, today, refresh_period, Start::Day(date))
            })?;
        }
        Commands::Month { year, month } => {
            let target = YearMonth::new(year, month)?;
            let today = resolve_today(&source, cli.today.as_deref()).await?;
            let mut navigator = CalendarNavigator::new(source, today);
            while navigator.displayed() < target {
                navigator.advance();
            }
            while navigator.displayed() > target {
                navigator.retreat();
            }
            navigator.load_month().await;
            report::print_month(&navigator);
        }
        Commands::Hours {
            year,
            month,
            day,
            hour,
        } => {
            let date = JalaliDate::new(year, month, day)?;
            let mut inspector = DayInspector::new(source, date);
            inspector.load_day().await;
            report::print_day(&mut inspector, hour);
        }
        Commands::Offset { year, month } => {
            report::print_offset(YearMonth::new(year, month)?);
        }
        Commands::LastUpdate => {
            let result = source.last_update().await;
            println!("{}", accountability_core::service::refresh::last_update_text(&result));
        }
        Commands::Login { username, password } => {
            let token = source.login(&username, &password).await?;
            Config::store_session(&config_path, Some(token))?;
            info!("Stored session for {}", username);
            println!("Logged in. Session stored in {}", config_path.display());
        }
        Commands::Logout => {
            Config::store_session(&config_path, None)?;
            info!("Cleared stored session");
            println!("Logged out. Session removed from {}", config_path.display());
        }
    }
    Ok(())
}

/// The dashboard owns the terminal, so interactive sessions log to a file.
fn init_logging(config: &Config, to_file: bool) -> Result<()> {
    let default_filter = if to_file { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));

    if to_file {
        let path = config.log_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Could not open log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init()?;
    Ok(())
}

async fn resolve_today(source: &HttpReportSource, arg: Option<&str>) -> Result<JalaliDate> {
    if let Some(raw) = arg {
        return Ok(JalaliDate::parse(raw)?);
    }
    let current = source
        .current_date()
        .await
        .context("Could not fetch today's date; pass --today Y/M/D")?;
    Ok(current.to_date()?)
}
