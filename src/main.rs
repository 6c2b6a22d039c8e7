//! pmprof CLI
//!
//! Samples a process with gdb and reports its most frequent call stacks.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;
use std::time::Duration;

use pmprof::commands::{
    display_version, execute_analyze, execute_record, validate_analyze_args,
    validate_record_args, AnalyzeArgs, RecordArgs, RecordTarget,
};
use pmprof::utils::config::{DEFAULT_CAPTURE_LOG, DEFAULT_GDB, GDB_ENV_VAR};

/// pmprof - poor man's profiler on top of gdb
#[derive(Parser, Debug)]
#[command(name = "pmprof")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by run and attach
#[derive(Args, Debug)]
struct RecordOpts {
    /// Capture log to write
    #[arg(short, long, default_value = DEFAULT_CAPTURE_LOG)]
    output: PathBuf,

    /// Seconds between samples (default: 3 for run, 1 for attach)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Stop after this many samples
    #[arg(long)]
    max_rounds: Option<usize>,

    /// gdb program to invoke
    #[arg(long, env = GDB_ENV_VAR, default_value = DEFAULT_GDB)]
    gdb: String,

    /// Analyze the capture log when sampling ends
    #[arg(long)]
    analyze: bool,

    /// With --analyze: report cumulative counts
    #[arg(long, requires = "analyze")]
    cumulative: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch a command and sample it until it exits
    Run {
        #[command(flatten)]
        opts: RecordOpts,

        /// Command to launch, with its arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Sample an already running process until it exits
    Attach {
        #[command(flatten)]
        opts: RecordOpts,

        /// Process id to attach to
        #[arg(short, long)]
        pid: u32,
    },

    /// Analyze a capture log
    Analyze {
        /// Capture log to read
        #[arg(short, long, default_value = DEFAULT_CAPTURE_LOG)]
        file: PathBuf,

        /// Report inclusive counts rolled up over stack suffixes
        #[arg(short, long)]
        cumulative: bool,

        /// Only analyze samples taken while this stack number was live
        #[arg(long)]
        context: Option<usize>,

        /// Output path for JSON report (optional)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Output path for collapsed stacks, for flamegraph tools (optional)
        #[arg(long)]
        folded: Option<PathBuf>,

        /// Do not print the text report
        #[arg(short, long)]
        quiet: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Run { opts, command } => record(RecordTarget::Run(command), opts)?,

        Commands::Attach { opts, pid } => record(RecordTarget::Attach(pid), opts)?,

        Commands::Analyze {
            file,
            cumulative,
            context,
            json,
            folded,
            quiet,
        } => {
            let args = AnalyzeArgs {
                capture_log: file,
                cumulative,
                context,
                output_json: json,
                output_folded: folded,
                print_report: !quiet,
            };

            validate_analyze_args(&args)?;
            execute_analyze(&args)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Run or attach, then fail if any sampling round was lost
///
/// **Private** - internal command implementation
fn record(target: RecordTarget, opts: RecordOpts) -> Result<()> {
    let analyze = opts.analyze.then(|| AnalyzeArgs {
        capture_log: opts.output.clone(),
        cumulative: opts.cumulative,
        ..Default::default()
    });

    let args = RecordArgs {
        target,
        capture_log: opts.output,
        interval: opts.interval.map(Duration::from_secs),
        max_rounds: opts.max_rounds,
        gdb: opts.gdb,
        analyze,
    };

    validate_record_args(&args)?;
    let outcome = execute_record(&args)?;

    if outcome.is_degraded() {
        anyhow::bail!(
            "{} of {} sampling rounds failed; {} holds an incomplete profile",
            outcome.failed_rounds,
            outcome.rounds,
            args.capture_log.display()
        );
    }

    Ok(())
}
