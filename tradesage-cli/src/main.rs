//! TradeSage CLI — strategy summaries, comparisons, grades, journal stats and insights.
//!
//! Commands:
//! - `summary` — per-strategy performance table (filter, sort, paginate)
//! - `compare` — rank two or more strategies by risk-adjusted return
//! - `grade` — A–F grade for completed backtest runs
//! - `trades` — journal statistics with per-emotion breakdown
//! - `insights` — insight cards from the configured provider

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use tradesage_analytics::{
    paginate, render_grades, render_ranking, render_summaries, sort_summaries, ExportFormat,
    JournalConfig, JournalSession, ProviderKind, RunFilter, SortDirection, SortKey,
    TradeStatistics,
};
use tradesage_core::{load_runs, load_strategies, load_trades, RunId, StrategyId};

#[derive(Parser)]
#[command(
    name = "tradesage",
    about = "TradeSage CLI — trading journal and backtest analytics"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    data: DataArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Record files. Override the `[data]` section of the config.
#[derive(Args)]
struct DataArgs {
    /// Strategies file (.json, .jsonl or .csv).
    #[arg(long, global = true)]
    strategies: Option<PathBuf>,

    /// Backtest runs file (.json, .jsonl or .csv).
    #[arg(long, global = true)]
    runs: Option<PathBuf>,

    /// Journal trades file (.json, .jsonl or .csv).
    #[arg(long, global = true)]
    trades: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-strategy performance summary.
    Summary {
        /// Run filter: all, completed or profitable.
        #[arg(long)]
        filter: Option<RunFilter>,

        /// Sort column (e.g. risk_adjusted_return, avg_return, consistency, name).
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort direction: ascending or descending. Defaults to the config value.
        #[arg(long)]
        direction: Option<SortDirection>,

        /// Page number (1-based).
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page. Defaults to the config value.
        #[arg(long)]
        per_page: Option<usize>,

        /// Output format: table, csv, json or markdown.
        #[arg(long, default_value = "table")]
        format: ExportFormat,
    },
    /// Rank selected strategies by risk-adjusted return.
    Compare {
        /// Strategy ids to compare (at least two).
        ids: Vec<String>,

        /// Run filter: all, completed or profitable.
        #[arg(long)]
        filter: Option<RunFilter>,

        /// Output format: table, csv, json or markdown.
        #[arg(long, default_value = "table")]
        format: ExportFormat,
    },
    /// Grade completed backtest runs.
    Grade {
        /// Only grade this run.
        #[arg(long)]
        run: Option<String>,

        /// Output format: table, csv, json or markdown.
        #[arg(long, default_value = "table")]
        format: ExportFormat,
    },
    /// Journal statistics over closed trades.
    Trades {
        /// Print the statistics as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Insight cards for the current data.
    Insights {
        /// Run filter: all, completed or profitable.
        #[arg(long)]
        filter: Option<RunFilter>,

        /// Insight provider: rules or static.
        #[arg(long)]
        provider: Option<ProviderKind>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => {
            log::debug!("reading config from {}", path.display());
            JournalConfig::from_file(path)?
        }
        None => JournalConfig::default(),
    };
    apply_data_overrides(&mut config, cli.data);

    match cli.command {
        Commands::Summary {
            filter,
            sort,
            direction,
            page,
            per_page,
            format,
        } => {
            let mut session = open_session(&config, false)?;
            let options = SummaryOptions {
                filter: filter.unwrap_or(config.analysis.filter),
                sort: sort.unwrap_or(config.analysis.sort),
                direction: direction.unwrap_or(config.analysis.direction),
                page,
                per_page: per_page.unwrap_or(config.analysis.per_page),
                format,
            };
            print!("{}", render_summary(&mut session, &options)?);
            Ok(())
        }
        Commands::Compare {
            ids,
            filter,
            format,
        } => {
            let mut session = open_session(&config, false)?;
            run_compare(&mut session, &ids, filter.unwrap_or(config.analysis.filter), format)
        }
        Commands::Grade { run, format } => {
            let session = open_session(&config, false)?;
            run_grade(&session, run.map(RunId::new), format)
        }
        Commands::Trades { json } => {
            let trades_path = require(&config.data.trades, "trades")?;
            let trades = load_trades(trades_path).context("loading journal trades")?;
            let stats = TradeStatistics::compute(&trades);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_trade_stats(&stats);
            }
            Ok(())
        }
        Commands::Insights { filter, provider } => {
            if let Some(kind) = provider {
                config.insights.provider = kind;
            }
            let mut session = open_session(&config, true)?;
            run_insights(&mut session, filter.unwrap_or(config.analysis.filter))
        }
    }
}

fn apply_data_overrides(config: &mut JournalConfig, data: DataArgs) {
    if data.strategies.is_some() {
        config.data.strategies = data.strategies;
    }
    if data.runs.is_some() {
        config.data.runs = data.runs;
    }
    if data.trades.is_some() {
        config.data.trades = data.trades;
    }
}

fn require<'a>(path: &'a Option<PathBuf>, what: &str) -> Result<&'a Path> {
    match path {
        Some(p) => Ok(p.as_path()),
        None => bail!("no {what} file given (use --{what} or the [data] section of --config)"),
    }
}

/// Load records and build a session. Trades are optional unless `with_trades`.
fn open_session(config: &JournalConfig, with_trades: bool) -> Result<JournalSession> {
    let strategies = load_strategies(require(&config.data.strategies, "strategies")?)
        .context("loading strategies")?;
    let runs = load_runs(require(&config.data.runs, "runs")?).context("loading backtest runs")?;
    let trades = match (&config.data.trades, with_trades) {
        (Some(path), true) => load_trades(path).context("loading journal trades")?,
        _ => Vec::new(),
    };
    Ok(JournalSession::new(
        strategies,
        runs,
        trades,
        config.insights.build_provider(),
    ))
}

/// `summary` options after config defaults are applied.
struct SummaryOptions {
    filter: RunFilter,
    sort: SortKey,
    direction: SortDirection,
    page: usize,
    per_page: usize,
    format: ExportFormat,
}

/// Only the table format gets prose notices; csv, json and markdown always
/// render, so an empty result is `[]` or a header row.
fn render_summary(session: &mut JournalSession, options: &SummaryOptions) -> Result<String> {
    let filter = options.filter;
    let mut summaries = session.summaries(filter).to_vec();
    if summaries.is_empty() && options.format == ExportFormat::Table {
        return Ok(format!("No strategy has runs matching filter '{filter}'.\n"));
    }
    sort_summaries(&mut summaries, options.sort, options.direction);
    let page = paginate(&summaries, options.page, options.per_page);

    let mut out = render_summaries(&page.items, options.format)?;
    if options.format == ExportFormat::Table {
        out.push_str(&format!(
            "\nPage {}/{} ({} strategies, filter '{filter}')\n",
            page.page, page.total_pages, page.total_items
        ));
    }
    Ok(with_newline(out))
}

fn with_newline(mut out: String) -> String {
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn run_compare(
    session: &mut JournalSession,
    ids: &[String],
    filter: RunFilter,
    format: ExportFormat,
) -> Result<()> {
    let selected: Vec<StrategyId> = ids.iter().map(|s| StrategyId::new(s.as_str())).collect();
    let Some(ranked) = session.compare(&selected, filter) else {
        println!("Select at least two strategies to compare.");
        return Ok(());
    };
    if ranked.is_empty() && format == ExportFormat::Table {
        println!("None of the selected strategies have runs matching filter '{filter}'.");
        return Ok(());
    }
    print!("{}", with_newline(render_ranking(&ranked, format)?));
    Ok(())
}

fn run_grade(session: &JournalSession, run: Option<RunId>, format: ExportFormat) -> Result<()> {
    let mut graded = session.grades();
    if let Some(id) = &run {
        graded.retain(|g| &g.run_id == id);
        if graded.is_empty() {
            bail!("run '{id}' not found or not completed");
        }
    }
    if graded.is_empty() && format == ExportFormat::Table {
        println!("No completed runs to grade.");
        return Ok(());
    }
    print!("{}", with_newline(render_grades(&graded, format)?));
    Ok(())
}

fn print_trade_stats(stats: &TradeStatistics) {
    println!(
        "Trades:        {} ({} open, {} closed)",
        stats.total_trades, stats.open_trades, stats.closed_trades
    );
    println!(
        "Win/Loss/BE:   {}/{}/{}",
        stats.winning_trades, stats.losing_trades, stats.breakeven_trades
    );
    println!("Win rate:      {:.2}%", stats.win_rate);
    println!("Net P&L:       {:.2}", stats.net_pnl);
    match stats.profit_factor {
        Some(pf) => println!("Profit factor: {pf:.2}"),
        None => println!("Profit factor: n/a (no losing trades)"),
    }
    println!("Avg win/loss:  {:.2} / {:.2}", stats.avg_win, stats.avg_loss);
    println!("Expectancy:    {:.2}", stats.expectancy);
    println!("Largest win:   {:.2}", stats.largest_win);
    println!("Largest loss:  {:.2}", stats.largest_loss);

    if !stats.by_emotion.is_empty() {
        println!("\nBy emotion:");
        for e in &stats.by_emotion {
            println!(
                "  {:<12} {:>4} trades  win {:>6.2}%  avg {:>10.2}  total {:>10.2}",
                e.emotion.as_str(),
                e.trade_count,
                e.win_rate,
                e.avg_pnl,
                e.total_pnl
            );
        }
    }
}

fn run_insights(session: &mut JournalSession, filter: RunFilter) -> Result<()> {
    let insights = session.insights(filter);
    if insights.is_empty() {
        println!("No insights for the current data.");
        return Ok(());
    }
    for insight in &insights {
        println!(
            "[{}] {}\n    {}",
            insight.kind.as_str(),
            insight.title,
            insight.message
        );
    }
    Ok(())
}
