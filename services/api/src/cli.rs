use crate::demo::{run_demo, run_ranking_report, run_risk_report, DemoArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use supplier_scoring::error::AppError;
use supplier_scoring::scoring::ScoringConfig;

#[derive(Parser, Debug)]
#[command(
    name = "Supplier Scoring",
    about = "Score suppliers, rank them and map category supply risk",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Recalculate scores from CSV exports and print a report
    Scores {
        #[command(subcommand)]
        command: ScoresCommand,
    },
    /// Score a built-in restaurant group and print ranking and risk map
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ScoresCommand {
    /// Print the supplier ranking
    Rank(ReportArgs),
    /// Print the category risk map
    RiskMap(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory of CSV exports to load at startup
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Load the demo restaurant group when no data directory is given
    #[arg(long)]
    pub(crate) seed_demo: bool,
    #[command(flatten)]
    pub(crate) scoring: ScoringOverrides,
}

/// Command-line overrides for the scoring window settings.
#[derive(Args, Debug, Default, Clone, Copy)]
pub(crate) struct ScoringOverrides {
    /// Months of history considered (overrides SCORING_LOOKBACK_MONTHS)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) lookback_months: Option<u32>,
    /// Days a delivery may trail its expected date (overrides SCORING_GRACE_DAYS)
    #[arg(long)]
    pub(crate) grace_days: Option<u32>,
}

impl ScoringOverrides {
    pub(crate) fn apply(self, config: &mut ScoringConfig) {
        if let Some(months) = self.lookback_months {
            config.lookback_months = months;
        }
        if let Some(days) = self.grace_days {
            config.delivery_grace_days = days;
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Scores {
            command: ScoresCommand::Rank(args),
        } => run_ranking_report(args),
        Command::Scores {
            command: ScoresCommand::RiskMap(args),
        } => run_risk_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
