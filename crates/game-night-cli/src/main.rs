mod config;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use overlap_engine::week::DAY_NAMES;
use overlap_engine::wire::{format_timestamp, intervals_from_records, parse_timestamp};
use overlap_engine::{
    day_offset, default_min_free, find_free_slots, normalize, week_start, Block, ProposalView,
    RankingPolicy, ResolutionView, ResolveOptions, ResolveRequest, SlotRecord, TimeInterval,
};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::Overrides;

#[derive(Parser)]
#[command(name = "game-night")]
#[command(about = "Find shared gaming time between two players")]
struct Cli {
    /// Resolver settings file (TOML with a [resolver] table)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Snapping granularity in minutes
    #[arg(long, global = true)]
    granularity: Option<u32>,

    /// Drop shared windows shorter than this many minutes
    #[arg(long, global = true)]
    min_session: Option<u32>,

    /// Candidate order: "longest_first" or "evening_first"
    #[arg(long, global = true)]
    ranking: Option<RankingPolicy>,

    /// IANA timezone for naive timestamps and the week grid
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Log at debug level (otherwise RUST_LOG, default warn)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve shared slots and a suggested game for two users
    Resolve {
        /// JSON file with {"user1": ..., "user2": ...} ("-" for stdin)
        input: PathBuf,
    },
    /// Snap and merge one user's slots
    Normalize {
        /// JSON array of {"start", "end"} slots ("-" for stdin)
        input: PathBuf,
    },
    /// Derive free slots from busy calendar events
    FreeSlots {
        /// JSON array of busy {"start", "end"} events ("-" for stdin)
        input: PathBuf,

        /// Window start (e.g. "2026-03-16T08:00:00Z")
        #[arg(long)]
        from: String,

        /// Window end
        #[arg(long)]
        to: String,

        /// Shortest free slot to keep, in minutes (default 60)
        #[arg(long)]
        min_free: Option<u32>,
    },
    /// Propose a session for the best shared slot
    Propose {
        /// JSON file with {"user1": ..., "user2": ...} ("-" for stdin)
        input: PathBuf,
    },
    /// Show the week grid anchor, or convert a grid block to a slot
    Week {
        /// Instant inside the week (default: now)
        #[arg(long)]
        now: Option<String>,

        /// Day column, 0 = Monday
        #[arg(long, requires_all = ["start", "end"])]
        day: Option<usize>,

        /// Block start as fractional hours (e.g. 18.5)
        #[arg(long, requires = "day")]
        start: Option<f64>,

        /// Block end as fractional hours
        #[arg(long, requires = "day")]
        end: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = load_options(&cli)?;

    match cli.command {
        Commands::Resolve { input } => cmd_resolve(&input, &options),
        Commands::Normalize { input } => cmd_normalize(&input, &options),
        Commands::FreeSlots {
            input,
            from,
            to,
            min_free,
        } => cmd_free_slots(&input, &from, &to, min_free, &options),
        Commands::Propose { input } => cmd_propose(&input, &options),
        Commands::Week {
            now,
            day,
            start,
            end,
        } => cmd_week(now.as_deref(), day.zip(start.zip(end)), &options),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(cli: &Cli) -> Result<ResolveOptions> {
    let resolver = config::load_config(cli.config.as_deref())?.with_overrides(Overrides {
        granularity_minutes: cli.granularity,
        min_session_minutes: cli.min_session,
        ranking: cli.ranking,
        timezone: cli.timezone.clone(),
    });
    debug!(?resolver, "effective resolver settings");

    Ok(resolver.into_options()?)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = read_input(path)?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn slot_records(intervals: &[TimeInterval]) -> Vec<SlotRecord> {
    intervals.iter().map(SlotRecord::from).collect()
}

fn cmd_resolve(input: &Path, options: &ResolveOptions) -> Result<()> {
    let request: ResolveRequest = read_json(input)?;
    let resolution = request.resolve(options)?;
    print_json(&ResolutionView::from(&resolution))
}

fn cmd_normalize(input: &Path, options: &ResolveOptions) -> Result<()> {
    let records: Vec<SlotRecord> = read_json(input)?;
    let intervals = intervals_from_records(&records, options.timezone)?;
    print_json(&slot_records(&normalize(&intervals, options.granularity, options.timezone)))
}

fn cmd_free_slots(
    input: &Path,
    from: &str,
    to: &str,
    min_free: Option<u32>,
    options: &ResolveOptions,
) -> Result<()> {
    let records: Vec<SlotRecord> = read_json(input)?;
    let busy = intervals_from_records(&records, options.timezone)?;

    let window = TimeInterval::new(
        parse_timestamp(from, options.timezone)?,
        parse_timestamp(to, options.timezone)?,
    )
    .context("Window end must be after window start")?;
    let min_duration = min_free
        .map(|minutes| Duration::minutes(i64::from(minutes)))
        .unwrap_or_else(default_min_free);

    print_json(&slot_records(&find_free_slots(&busy, window, min_duration)))
}

fn cmd_propose(input: &Path, options: &ResolveOptions) -> Result<()> {
    let request: ResolveRequest = read_json(input)?;
    let resolution = request.resolve(options)?;

    let Some(proposal) = resolution.propose(&request.user1.user_id, &request.user2.user_id)
    else {
        anyhow::bail!(
            "No shared time between {} and {}",
            request.user1.display_name(),
            request.user2.display_name()
        );
    };

    print_json(&ProposalView::new(
        &proposal,
        request.user1.name.as_deref(),
        request.user2.name.as_deref(),
    ))
}

#[derive(Serialize)]
struct WeekView {
    week_start: String,
    timezone: String,
    days: Vec<DayView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    block: Option<BlockView>,
}

#[derive(Serialize)]
struct DayView {
    index: usize,
    name: &'static str,
    start: String,
}

#[derive(Serialize)]
struct BlockView {
    day: usize,
    label: String,
    hours: f64,
    slot: SlotRecord,
}

fn cmd_week(
    now: Option<&str>,
    block: Option<(usize, (f64, f64))>,
    options: &ResolveOptions,
) -> Result<()> {
    let now: DateTime<Utc> = match now {
        Some(s) => parse_timestamp(s, options.timezone)?,
        None => Utc::now(),
    };
    let anchor = week_start(now, options.timezone)?;

    let days = DAY_NAMES
        .iter()
        .enumerate()
        .map(|(index, &name)| -> Result<DayView> {
            let start = day_offset(anchor, index, 0.0)?;
            Ok(DayView {
                index,
                name,
                start: format_timestamp(start),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let block = block
        .map(|(day, (start, end))| -> Result<BlockView> {
            let block = Block::new(start, end);
            let slot = block.to_interval(anchor, day)?;
            Ok(BlockView {
                day,
                label: block.label(),
                hours: block.hours(),
                slot: SlotRecord::from(&slot),
            })
        })
        .transpose()?;

    print_json(&WeekView {
        week_start: anchor.to_rfc3339(),
        timezone: options.timezone.to_string(),
        days,
        block,
    })
}
