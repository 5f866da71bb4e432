mod commands;

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{Shell, generate};
use release_qc_validator::CodeKind;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "release-qc")]
#[command(version, about = "Quality checks for music release submissions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Scaffold a submission file from a directory of masters
    Init {
        /// Release directory containing audio and cover art
        path: PathBuf,

        /// Primary artist name
        #[arg(long)]
        artist: Option<String>,

        /// Release title
        #[arg(long)]
        title: Option<String>,
    },

    /// Validate submission files
    Validate {
        /// Submission file, or a directory to scan
        path: PathBuf,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Also inspect referenced audio and cover art files
        #[arg(long)]
        assets: bool,

        /// Evaluate date rules as of this day (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,

        /// QC settings file overriding the default limits
        #[arg(long)]
        settings: Option<PathBuf>,
    },

    /// Show which wizard steps a submission can leave
    Gate {
        /// Submission file
        path: PathBuf,

        /// Check a single step (name or 1-6); fails when it is blocked
        #[arg(short, long)]
        step: Option<String>,

        /// Evaluate date rules as of this day (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },

    /// Generate placeholder product codes
    Generate {
        /// Kind of code to generate
        #[arg(value_enum)]
        kind: CodeArg,

        /// How many codes to print
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Group digits for display
        #[arg(long)]
        formatted: bool,
    },

    /// Check a UPC or EAN typed by hand
    Check {
        /// The code to check
        code: String,
    },

    /// Configure the submission endpoint and API token
    Configure,

    /// Validate and send a submission to the distributor
    Submit {
        /// Submission file
        path: PathBuf,

        /// Submit without asking when warnings remain
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CodeArg {
    Upc,
    Ean,
}

impl From<CodeArg> for CodeKind {
    fn from(arg: CodeArg) -> Self {
        match arg {
            CodeArg::Upc => CodeKind::Upc,
            CodeArg::Ean => CodeKind::Ean,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "release_qc=warn,release_qc_submitter=warn".into()),
        )
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Init {
            path,
            artist,
            title,
        } => commands::init::run(path, artist, title).await,
        Command::Validate {
            path,
            json,
            assets,
            today,
            settings,
        } => commands::validate::run(path, json, assets, today, settings).await,
        Command::Gate { path, step, today } => commands::gate::run(path, step, today).await,
        Command::Generate {
            kind,
            count,
            formatted,
        } => commands::generate::run(kind.into(), count, formatted).await,
        Command::Check { code } => commands::generate::check(code).await,
        Command::Configure => commands::configure::configure().await,
        Command::Submit { path, force } => commands::submit::run(path, force).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "release-qc", &mut io::stdout());
            Ok(())
        }
    }
}
