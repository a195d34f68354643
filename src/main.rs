//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run one command.
//! No business logic here.

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use dotenv::dotenv;
use sprint_stats::adapters::calendar::ProjectCalendar;
use sprint_stats::adapters::holidays::RuleHolidayProvider;
use sprint_stats::adapters::persistence::{JsonOffDayStore, JsonSprintStore};
use sprint_stats::adapters::presentation::StatisticsView;
use sprint_stats::adapters::report::write_board_csv;
use sprint_stats::domain::{OffDayRequest, OffDayType};
use sprint_stats::ports::{OffDayGateway, SprintProvider};
use sprint_stats::shared::config::AppConfig;
use sprint_stats::usecases::{OffDayService, QualityBoardService, SprintStatisticsAssembler};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage:
  sprint-stats board [--now <yyyy-mm-ddThh:mm>]
  sprint-stats offday <user> <first yyyy-mm-dd> <last yyyy-mm-dd> <VACATION|SICK|TRIP>";

/// Calendar days covered past the last sprint end, enough for 300 working days of extrapolation.
const EXTRAPOLATION_HORIZON_DAYS: i64 = 450;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "configuration unreadable, using defaults");
        AppConfig::default()
    });
    info!(path = %cfg.data_dir_or_default().display(), "data directory");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("board") => run_board(&cfg, &args[1..]).await,
        Some("offday") => run_offday(&cfg, &args[1..]).await,
        _ => anyhow::bail!("{}", USAGE),
    }
}

async fn run_board(cfg: &AppConfig, args: &[String]) -> anyhow::Result<()> {
    let now = match args {
        [] => chrono::Local::now().naive_local(),
        [flag, value] if flag == "--now" => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
            .with_context(|| format!("invalid --now '{}', expected yyyy-mm-ddThh:mm", value))?,
        _ => anyhow::bail!("{}", USAGE),
    };

    let store = Arc::new(JsonSprintStore::new(cfg.sprints_path()));
    let sprints = store.get_sprints().await?;
    let (Some(first_start), Some(last_end)) = (
        sprints.iter().map(|s| s.start.date()).min(),
        sprints.iter().map(|s| s.end.date()).max(),
    ) else {
        info!(path = %cfg.sprints_path().display(), "no sprints to report");
        return Ok(());
    };

    let horizon_end = last_end.max(now.date()) + TimeDelta::days(EXTRAPOLATION_HORIZON_DAYS);
    let location = cfg.location_or_default(first_start);
    let calendar = ProjectCalendar::for_user(
        "team",
        std::slice::from_ref(&location),
        &[],
        &RuleHolidayProvider::new(),
        horizon_end,
    );

    let assembler = SprintStatisticsAssembler::new(cfg.thresholds()?)
        .with_exclude_holidays(cfg.exclude_holidays_or_default());
    let service = QualityBoardService::new(store, Arc::new(calendar), assembler);
    let board = service.board(now).await?;

    for entry in &board {
        match &entry.statistics {
            Ok(stats) => {
                let view = StatisticsView::new(stats);
                println!(
                    "{:<20} {:<8} expected {:>4}  actual {:>4}  delay {}  extrapolated {}  {}: {}",
                    view.sprint_name,
                    view.release_date_status,
                    view.expected_progress_display,
                    view.actual_progress_display,
                    view.current_effort_delay_display,
                    view.extrapolated_schedule_delay_display,
                    view.release_date_label,
                    view.release_date,
                );
                for w in &view.calendar_warnings {
                    println!("{:<20} warning: {}", "", w);
                }
            }
            Err(e) => println!("{:<20} error: {}", entry.sprint.name, e),
        }
    }

    let report = cfg
        .reports_dir()
        .join(format!("board-{}.csv", now.format("%Y-%m-%d")));
    write_board_csv(&report, &board).await?;
    Ok(())
}

async fn run_offday(cfg: &AppConfig, args: &[String]) -> anyhow::Result<()> {
    let [user, first, last, kind] = args else {
        anyhow::bail!("{}", USAGE);
    };
    let parse_day = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{}', expected yyyy-mm-dd", s))
    };
    let request = OffDayRequest {
        user: user.clone(),
        first_day: parse_day(first)?,
        last_day: parse_day(last)?,
        kind: kind.parse::<OffDayType>()?,
    };

    tokio::fs::create_dir_all(cfg.data_dir_or_default())
        .await
        .context("create data dir")?;
    let store = JsonOffDayStore::new(cfg.off_days_path());
    store.load().await?;
    let existing = store.get_off_days(user).await?;

    let location = cfg.location_or_default(request.first_day);
    let calendar = ProjectCalendar::for_user(
        user.as_str(),
        std::slice::from_ref(&location),
        &existing,
        &RuleHolidayProvider::new(),
        request.last_day.max(request.first_day),
    );

    let service = OffDayService::new(Arc::new(store), Arc::new(calendar));
    let records = service.register(&request).await?;
    if records.is_empty() {
        println!("{}: no working day between {} and {}", user, first, last);
    }
    for r in &records {
        println!("{} {} {}..{}", r.user, r.kind, r.first_day, r.last_day);
    }
    Ok(())
}
