mod calendar;
mod report;
mod tui;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use clap::Parser;
use heatlog_core::{
    normalize_fields, parse_args, parse_duration, parse_human_date, parse_iso_date, time, ActivityService,
    Config, DashboardSession, FileHistoryRepository, FileLabelRepository, LabelService, LabelUpdate, TrendView,
    LOG_FIELDS,
};

#[derive(Parser)]
#[command(name = "heatlog")]
#[command(about = "Log timed activities and see your year as a heatmap", long_about = None)]
struct Cli {
    /// Data directory (defaults to $HEATLOG_DIR, then ~/.heatlog)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Debug logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log an activity (usage: log Deep Work dur:90m date:yesterday)
    Log {
        /// Label words plus key:value fields (duration, date)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Show a day's activities and score
    Day {
        /// today, yesterday, -3d, fri, or YYYY-MM-DD
        date: Option<String>,
    },
    /// Remove an activity from a day by id prefix
    Rm {
        date: String,
        id: String,
    },
    /// Manage activity labels
    Labels {
        #[command(subcommand)]
        command: Option<LabelCommands>,
    },
    /// Print the year heatmap
    Calendar {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Recorded scores for a date range (default: last year to a month ahead)
    Range {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Daily or weekly score trend
    Trend {
        #[arg(long)]
        weekly: bool,
        /// Number of days (or weeks with --weekly)
        #[arg(long)]
        count: Option<usize>,
    },
    /// Time and score per label
    Breakdown {
        #[arg(long)]
        days: Option<usize>,
    },
    /// Period summary
    Stats {
        #[arg(long)]
        days: Option<usize>,
    },
    /// Open the dashboard
    Tui,
}

#[derive(clap::Subcommand)]
enum LabelCommands {
    /// List labels and their rates
    List,
    /// Add a label
    Add {
        name: String,
        /// Points per minute
        rate: f64,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Change a label's rate, color or description
    Update {
        name: String,
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a label (logged activities keep it and score 0)
    Delete {
        name: String,
    },
}

struct LogRequest {
    label: String,
    minutes: f64,
    date: NaiveDate,
    warnings: Vec<String>,
}

fn parse_log_request(args: &[String], today: NaiveDate) -> Result<LogRequest> {
    let parsed = parse_args(args);
    if parsed.label.is_empty() {
        return Err(anyhow!("activity label is required, e.g. log Deep Work dur:45m"));
    }

    let (fields, warnings) = normalize_fields(parsed.fields, &LOG_FIELDS);
    let minutes = match fields.get("duration") {
        Some(d) => parse_duration(d)?,
        None => return Err(anyhow!("duration is required, e.g. dur:45m")),
    };
    let date = match fields.get("date") {
        Some(d) => time::parse_human_date_from(d, today)?,
        None => today,
    };

    Ok(LogRequest { label: parsed.label, minutes, date, warnings })
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.data_dir)?;
    log::debug!("data dir: {}", config.data_dir.display());
    let history_repo = FileHistoryRepository::new(Some(config.data_dir.clone()))?;
    let label_repo = FileLabelRepository::new(Some(config.data_dir.clone()))?;

    match cli.command {
        Some(Commands::Log { args }) => {
            let request = parse_log_request(&args, time::today())?;
            for warning in &request.warnings {
                println!("Warning: {}", warning);
            }
            let (label, minutes, date) = (request.label, request.minutes, request.date);

            let labels = LabelService::new(label_repo.clone()).list()?;
            if !labels.contains(&label) {
                println!("Warning: '{}' is not a known label, it will score 0.", label);
            }

            let service = ActivityService::new(history_repo);
            let entry = service.log_activity(date, &label, minutes)?;
            println!(
                "Logged: {} for {} min on {} (ID: {})",
                entry.label,
                entry.duration_minutes,
                date,
                &entry.id.to_string()[..8]
            );
            let details = service.day_details(date, &labels)?;
            println!("  Day score: {:.2} (level {})", details.total_score, details.level);
        }
        Some(Commands::Day { date }) => {
            let date = match date {
                Some(d) => parse_human_date(&d)?,
                None => time::today(),
            };
            let labels = LabelService::new(label_repo).list()?;
            let details = ActivityService::new(history_repo).day_details(date, &labels)?;
            report::print_day(&details);
        }
        Some(Commands::Rm { date, id }) => {
            let date = parse_human_date(&date)?;
            let removed = ActivityService::new(history_repo).remove_activity(date, &id)?;
            println!("Removed: {} ({} min) from {}", removed.label, removed.duration_minutes, date);
        }
        Some(Commands::Labels { command }) => {
            let service = LabelService::new(label_repo);
            match command.unwrap_or(LabelCommands::List) {
                LabelCommands::List => report::print_labels(&service.list()?),
                LabelCommands::Add { name, rate, color, description } => {
                    let label = service.add(&name, rate, description, color)?;
                    println!("Label added: {} ({} points/min)", label.name, label.productivity_rate);
                }
                LabelCommands::Update { name, rate, color, description } => {
                    let label = service.update(
                        &name,
                        LabelUpdate { productivity_rate: rate, description, color },
                    )?;
                    println!("Label updated: {} ({} points/min, {})", label.name, label.productivity_rate, label.color);
                }
                LabelCommands::Delete { name } => {
                    let label = service.delete(&name)?;
                    println!("Label deleted: {}", label.name);
                }
            }
        }
        Some(Commands::Calendar { year }) => {
            let mut session = DashboardSession::new(&history_repo, &label_repo, &config)?;
            let year = year.unwrap_or_else(|| session.today().year());
            let cells = session.calendar(year)?;
            calendar::print_calendar(cells, year);
        }
        Some(Commands::Range { start, end }) => {
            let start = start.as_deref().map(parse_iso_date).transpose()?;
            let end = end.as_deref().map(parse_iso_date).transpose()?;
            let session = DashboardSession::new(&history_repo, &label_repo, &config)?;
            report::print_range(&session.calendar_range(start, end)?);
        }
        Some(Commands::Trend { weekly, count }) => {
            let view = if weekly { TrendView::Weekly } else { TrendView::Daily };
            let mut session = DashboardSession::new(&history_repo, &label_repo, &config)?;
            session.set_view(view);
            let series = match count {
                Some(n) => session.trend_with(view, n)?,
                None => session.trend()?,
            };
            report::print_trend(&series, view);
        }
        Some(Commands::Breakdown { days }) => {
            let days = days.unwrap_or(config.breakdown_days);
            let session = DashboardSession::new(&history_repo, &label_repo, &config)?;
            report::print_breakdown(&session.breakdown(days)?, days);
        }
        Some(Commands::Stats { days }) => {
            let days = days.unwrap_or(config.stats_days);
            let session = DashboardSession::new(&history_repo, &label_repo, &config)?;
            report::print_stats(&session.stats(days)?);
        }
        Some(Commands::Tui) | None => {
            tui::run(&history_repo, &label_repo, &config)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    #[test]
    fn test_log_request_requires_label() {
        let err = parse_log_request(&args(&["dur:45m"]), today()).err().unwrap();
        assert!(err.to_string().contains("label is required"));
    }

    #[test]
    fn test_log_request_requires_duration() {
        assert!(parse_log_request(&args(&["Deep", "Work"]), today()).is_err());
    }

    #[test]
    fn test_log_request_fields() {
        let request = parse_log_request(&args(&["Deep", "Work", "du:1.5h", "date:-3d"]), today()).unwrap();
        assert_eq!(request.label, "Deep Work");
        assert_eq!(request.minutes, 90.0);
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
        assert!(request.warnings.is_empty());
    }
}
