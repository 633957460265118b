//! Studyplan CLI
//!
//! Command-line front end for the study scheduling engine. Every command reads
//! one learner snapshot (`{subjects, sessions, preferences}` as JSON), runs a
//! single engine operation, and prints either a coloured report or JSON.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use directories::ProjectDirs;
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use studyplan_core::{
    Clock, EngineConfig, FixedClock, IdProvider, RecommendationFacade, SequentialIdProvider,
    StudySnapshot, SystemClock, Topic, UuidIdProvider,
};

/// Name of the config file looked up in the platform config directory
const CONFIG_FILE_NAME: &str = "engine.json";

/// Studyplan - adaptive study scheduling from the command line
#[derive(Parser)]
#[command(name = "studyplan")]
#[command(author = "Studyplan Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Adaptive study scheduling, review queues, and forecasts")]
#[command(long_about = "Reads a JSON snapshot of subjects, study sessions, and preferences, \
and turns it into study plans, spaced-repetition review queues, productivity patterns, \
and deadline forecasts.")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct GlobalArgs {
    /// Snapshot JSON file (reads stdin when omitted)
    #[arg(long, short, global = true)]
    input: Option<PathBuf>,

    /// Current time as RFC 3339 (defaults to the system clock)
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Print JSON instead of a report
    #[arg(long, global = true)]
    json: bool,

    /// Use sequential ids (task-0001, ...) instead of random UUIDs
    #[arg(long, global = true)]
    deterministic_ids: bool,

    /// Engine config file (defaults to engine.json in the config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a multi-day study plan
    Plan {
        /// Days to plan (defaults to scheduler.defaultDaysAhead)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Run the full pipeline and print ranked recommendations
    Insights,

    /// Show the spaced-repetition review queue
    Reviews {
        /// Maximum reviews to list (defaults to retention.maxReviewsPerDay)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the productivity pattern learned from session history
    Pattern,

    /// Forecast completion, velocity, and deadline success
    Predict,

    /// Print the effective engine configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let config = load_config(cli.global.config.as_deref())?;

    match cli.command {
        Commands::Plan { days } => run_plan(&cli.global, config, days),
        Commands::Insights => run_insights(&cli.global, config),
        Commands::Reviews { limit } => run_reviews(&cli.global, config, limit),
        Commands::Pattern => run_pattern(&cli.global, config),
        Commands::Predict => run_predict(&cli.global, config),
        Commands::Config => run_config(&cli.global, &config),
    }
}

// ============================================================================
// PLUMBING
// ============================================================================

/// Logs go to stderr so stdout stays clean for reports and JSON
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

/// Platform config path, e.g. `~/.config/studyplan/engine.json`
fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "studyplan", "studyplan").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// `--config` wins, then the platform config file, then defaults
fn load_config(explicit: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    match path {
        Some(path) => {
            tracing::debug!("Loading engine config from {}", path.display());
            read_config_file(&path)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn read_config_file(path: &Path) -> anyhow::Result<EngineConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
    EngineConfig::from_json_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
}

fn load_snapshot(input: Option<&Path>) -> anyhow::Result<StudySnapshot> {
    let raw = match input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read snapshot {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read snapshot from stdin")?;
            buf
        }
    };
    let snapshot = StudySnapshot::from_json_str(&raw).context("Invalid snapshot JSON")?;
    tracing::debug!(
        "Loaded snapshot: {} subjects, {} sessions",
        snapshot.subjects.len(),
        snapshot.sessions.len()
    );
    Ok(snapshot)
}

fn now_from(global: &GlobalArgs) -> DateTime<Utc> {
    match global.now {
        Some(now) => FixedClock(now).now(),
        None => SystemClock.now(),
    }
}

fn id_provider(deterministic: bool) -> Box<dyn IdProvider> {
    if deterministic {
        Box::new(SequentialIdProvider::new())
    } else {
        Box::new(UuidIdProvider)
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Run plan command
fn run_plan(global: &GlobalArgs, mut config: EngineConfig, days: Option<u32>) -> anyhow::Result<()> {
    if let Some(days) = days {
        config.scheduler.default_days_ahead = days;
        config.validate().context("Invalid --days")?;
    }
    let snapshot = load_snapshot(global.input.as_deref())?;
    let now = now_from(global);
    let facade = RecommendationFacade::with_config(config);
    let mut ids = id_provider(global.deterministic_ids);

    let plan = facade.plan(&snapshot.subjects, &snapshot.sessions, &snapshot.preferences, now, ids.as_mut())?;

    if global.json {
        return print_json(&plan);
    }

    println!("{}", "=== Study Plan ===".cyan().bold());
    println!();
    println!("{}: {} to {}", "Range".white().bold(), plan.start_date, plan.end_date);
    println!("{}: {:.2}", "Planned Hours".white().bold(), plan.total_planned_hours);
    println!("{}: {:.0}%", "Confidence".white().bold(), plan.confidence * 100.0);
    if plan.unscheduled_minutes > 0 {
        println!(
            "{}: {} min",
            "Unscheduled".white().bold(),
            plan.unscheduled_minutes.to_string().yellow()
        );
    }

    for day in &plan.days {
        println!();
        println!(
            "{} {}",
            day.date.format("%a %Y-%m-%d").to_string().yellow().bold(),
            format!("({} min)", day.planned_minutes).dimmed()
        );
        if day.sessions.is_empty() {
            println!("  {}", "Nothing scheduled".dimmed());
            continue;
        }
        for session in &day.sessions {
            let kind = if session.is_review { "review".magenta() } else { "study".green() };
            println!(
                "  {}-{}  {:7} {}  {}",
                session.start_time.format("%H:%M"),
                session.end_time.format("%H:%M"),
                kind,
                session.subject_name.white().bold(),
                session.technique.label().dimmed()
            );
        }
    }

    Ok(())
}

/// Run insights command
fn run_insights(global: &GlobalArgs, config: EngineConfig) -> anyhow::Result<()> {
    let snapshot = load_snapshot(global.input.as_deref())?;
    let now = now_from(global);
    let facade = RecommendationFacade::with_config(config);
    let mut ids = id_provider(global.deterministic_ids);

    let bundle = facade.generate_insights(
        &snapshot.subjects,
        &snapshot.sessions,
        &snapshot.preferences,
        now,
        ids.as_mut(),
    )?;

    if global.json {
        return print_json(&bundle);
    }

    println!("{}", "=== Study Insights ===".cyan().bold());
    println!();
    let risk = bundle.risk.overall_risk.as_str().to_uppercase();
    let colored_risk = match bundle.risk.overall_risk {
        studyplan_core::RiskLevel::High => risk.red().bold(),
        studyplan_core::RiskLevel::Medium => risk.yellow().bold(),
        studyplan_core::RiskLevel::Low => risk.green().bold(),
    };
    println!("{}: {}", "Overall Risk".white().bold(), colored_risk);
    println!("{}: {:.2} h/day", "Velocity".white().bold(), bundle.velocity.current_velocity);
    println!("{}: {:.1} h", "Hours Last 7 Days".white().bold(), bundle.metrics.hours_last_7_days);
    println!("{}: {} days", "Study Streak".white().bold(), bundle.metrics.study_streak_days);
    println!("{}: {}", "Reviews Queued".white().bold(), bundle.review_queue.len());
    println!("{}: {}", "Planned Sessions".white().bold(), bundle.study_plan.sessions().count());

    if !bundle.risk.factors.is_empty() {
        println!();
        println!("{}", "=== Risk Factors ===".yellow().bold());
        for factor in &bundle.risk.factors {
            println!(
                "  {} {} {}",
                format!("[{}/5]", factor.severity).red(),
                factor.kind.as_str().white().bold(),
                factor.description
            );
            println!("        {}", factor.mitigation.dimmed());
        }
    }

    println!();
    println!("{}", "=== Recommendations ===".magenta().bold());
    if bundle.recommendations.is_empty() {
        println!("{}", "No recommendations.".dimmed());
    }
    for (i, rec) in bundle.recommendations.iter().enumerate() {
        let priority = match rec.priority {
            1 => "P1".red().bold(),
            2 => "P2".yellow().bold(),
            _ => "P3".green(),
        };
        println!(
            "  {:>2}. {} {} {}",
            i + 1,
            priority,
            format!("[{}]", rec.kind.as_str()).dimmed(),
            rec.title.white().bold()
        );
        println!("      {}", rec.detail);
    }

    Ok(())
}

/// Run reviews command
fn run_reviews(global: &GlobalArgs, config: EngineConfig, limit: Option<usize>) -> anyhow::Result<()> {
    let snapshot = load_snapshot(global.input.as_deref())?;
    studyplan_core::validate_inputs(&snapshot.subjects, &snapshot.sessions)?;
    let now = now_from(global);
    let facade = RecommendationFacade::with_config(config);
    let retention = facade.retention();

    let topics: Vec<Topic> = snapshot
        .subjects
        .iter()
        .flat_map(|s| s.topics.iter().cloned())
        .collect();
    let max = limit.unwrap_or(retention.config().max_reviews_per_day);
    let queue = retention.prioritize_reviews(&topics, &snapshot.sessions, max, now);
    let schedule = retention.adaptive_review_schedule(&snapshot.subjects, &snapshot.sessions, now);

    if global.json {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ReviewReport<'a> {
            queue: &'a [studyplan_core::ReviewPriority],
            schedule: &'a std::collections::BTreeMap<String, chrono::NaiveDate>,
        }
        return print_json(&ReviewReport { queue: &queue, schedule: &schedule });
    }

    println!("{}", "=== Review Queue ===".cyan().bold());
    println!();
    if queue.is_empty() {
        println!("{}", "No topics to review.".dimmed());
        return Ok(());
    }

    println!(
        "  {:24} {:>7} {:>10} {:>8}  {}",
        "Topic".white().bold(),
        "Score".white().bold(),
        "Retention".white().bold(),
        "Mastery".white().bold(),
        "Next Review".white().bold()
    );
    for item in &queue {
        let retention_text = format!("{:.0}%", item.retention * 100.0);
        let retention_text = if item.retention < 0.5 {
            retention_text.red()
        } else if item.retention < 0.8 {
            retention_text.yellow()
        } else {
            retention_text.green()
        };
        let next = schedule
            .get(&item.topic_id)
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:24} {:>7.3} {:>10} {:>7.0}%  {}",
            item.topic_id,
            item.score,
            retention_text,
            item.mastery * 100.0,
            next
        );
    }

    Ok(())
}

/// Run pattern command
fn run_pattern(global: &GlobalArgs, config: EngineConfig) -> anyhow::Result<()> {
    let snapshot = load_snapshot(global.input.as_deref())?;
    let facade = RecommendationFacade::with_config(config);
    let pattern = facade.analyzer().analyze(&snapshot.sessions);
    let load_table = &facade.optimizer().config().cognitive_load;

    if global.json {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct PatternReport<'a> {
            #[serde(flatten)]
            pattern: &'a studyplan_core::ProductivityPattern,
            cognitive_load: &'a studyplan_core::CognitiveLoadTable,
        }
        return print_json(&PatternReport {
            pattern: &pattern,
            cognitive_load: load_table,
        });
    }

    println!("{}", "=== Productivity Pattern ===".cyan().bold());
    println!();
    println!("{}: {} min", "Optimal Session".white().bold(), pattern.session_length_optimal);
    println!("{}: {} min", "Optimal Break".white().bold(), pattern.break_length_optimal);
    println!("{}: {:.3}/h", "Focus Decline".white().bold(), pattern.focus_decline_rate);
    let peaks: Vec<String> = pattern
        .peak_hours(3)
        .iter()
        .map(|&h| match load_table.optimal_difficulty_at(h) {
            Some(difficulty) => format!("{:02}:00 (difficulty {})", h, difficulty),
            None => format!("{:02}:00", h),
        })
        .collect();
    println!("{}: {}", "Peak Hours".white().bold(), peaks.join(", "));
    if let Some(day) = pattern.best_day() {
        println!("{}: {}", "Best Day".white().bold(), day);
    }

    println!();
    println!("{}", "=== By Hour ===".yellow().bold());
    for (hour, value) in pattern.hourly_productivity.iter().enumerate() {
        print_bar(&format!("{:02}:00", hour), *value);
    }

    println!();
    println!("{}", "=== By Weekday ===".yellow().bold());
    for (day, value) in &pattern.day_of_week_productivity {
        print_bar(day, *value);
    }

    println!();
    println!("{}", "=== Cognitive Load ===".yellow().bold());
    for ceiling in &load_table.periods {
        println!(
            "  {:10} {:02}:00-{:02}:59  max load {}  best difficulty {}",
            ceiling.period.as_str(),
            ceiling.start_hour,
            ceiling.end_hour,
            ceiling.max_load,
            ceiling.optimal_difficulty
        );
    }

    Ok(())
}

/// Run predict command
fn run_predict(global: &GlobalArgs, config: EngineConfig) -> anyhow::Result<()> {
    let snapshot = load_snapshot(global.input.as_deref())?;
    studyplan_core::validate_inputs(&snapshot.subjects, &snapshot.sessions)?;
    let now = now_from(global);
    let facade = RecommendationFacade::with_config(config);
    let predictor = facade.predictor();
    let pattern = facade.analyzer().analyze(&snapshot.sessions);

    let completion: Vec<_> = snapshot
        .subjects
        .iter()
        .map(|s| predictor.predict_subject_completion(s, &snapshot.sessions, &pattern, &snapshot.preferences, now))
        .collect();
    let velocity = predictor.predict_learning_velocity(&snapshot.sessions, &snapshot.subjects, now);
    let deadlines =
        predictor.predict_deadline_success(&snapshot.subjects, &snapshot.sessions, velocity.current_velocity, now);

    if global.json {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct PredictReport<'a> {
            completion: &'a [studyplan_core::CompletionPrediction],
            velocity: &'a studyplan_core::LearningVelocity,
            deadlines: &'a [studyplan_core::DeadlineForecast],
        }
        return print_json(&PredictReport {
            completion: &completion,
            velocity: &velocity,
            deadlines: &deadlines,
        });
    }

    println!("{}", "=== Learning Velocity ===".cyan().bold());
    println!();
    println!("{}: {:.2} h/day", "Current".white().bold(), velocity.current_velocity);
    println!("{}: {:.2} h/day", "Projected".white().bold(), velocity.projected_velocity);
    println!("{}: {}", "Trend".white().bold(), velocity.trend.as_str());

    println!();
    println!("{}", "=== Deadline Forecast ===".yellow().bold());
    if deadlines.is_empty() {
        println!("{}", "No subjects.".dimmed());
    }
    for forecast in &deadlines {
        print_bar(&forecast.subject_name, forecast.probability);
        println!(
            "  {:15} {} days left, needs {:.1} h/day, achieving {:.1} h/day",
            "",
            forecast.days_remaining,
            forecast.required_daily_hours,
            forecast.achievable_daily_hours
        );
        for rec in &forecast.recommendations {
            println!("  {:15} {}", "", rec.dimmed());
        }
    }

    println!();
    println!("{}", "=== Completion ===".magenta().bold());
    for prediction in &completion {
        println!(
            "  {:24} {:>5.0}%  expected {}",
            prediction.subject_id.white().bold(),
            prediction.probability * 100.0,
            prediction.expected_completion_date
        );
        for risk in &prediction.risk_factors {
            println!("      {} {}", "!".red(), risk.description());
        }
    }

    Ok(())
}

/// Run config command
fn run_config(global: &GlobalArgs, config: &EngineConfig) -> anyhow::Result<()> {
    if global.json {
        return print_json(config);
    }

    println!("{}", "=== Engine Config ===".cyan().bold());
    match (&global.config, default_config_path()) {
        (Some(path), _) => println!("{}: {}", "Source".white().bold(), path.display()),
        (None, Some(path)) if path.exists() => println!("{}: {}", "Source".white().bold(), path.display()),
        (None, Some(path)) => println!(
            "{}: defaults ({} not found)",
            "Source".white().bold(),
            path.display().to_string().dimmed()
        ),
        (None, None) => println!("{}: defaults", "Source".white().bold()),
    }
    println!();
    println!("{}", config.to_json_pretty()?);
    Ok(())
}

/// Print a 0-1 value as a bar, red below 0.4 and green from 0.7
fn print_bar(label: &str, value: f64) {
    let bar_width: usize = 30;
    let filled = ((value.clamp(0.0, 1.0)) * bar_width as f64).round() as usize;
    let empty = bar_width.saturating_sub(filled);

    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));
    let colored_bar = if value >= 0.7 {
        bar.green()
    } else if value >= 0.4 {
        bar.yellow()
    } else {
        bar.red()
    };

    println!("  {:15} [{}] {:>5.1}%", label, colored_bar, value * 100.0);
}
