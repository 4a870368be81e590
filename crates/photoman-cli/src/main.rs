use std::path::PathBuf;

use chrono_tz::Tz;
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use photoman_core::{ErrorPolicy, SortError, SortOptions};

#[derive(Parser)]
#[command(name = "photoman", version, about = "Copy photos into YYYY/MM-Mon/MM-DD-YYYY folders by the date they were taken")]
struct Cli {
    /// Folder holding the photos (subfolders are not searched)
    source: PathBuf,

    /// Root of the dated folder tree, created if missing
    destination: PathBuf,

    /// Comma-separated extensions to copy, e.g. jpg,png (default: every file)
    extensions: Option<String>,

    /// Time zone that camera clocks were set to
    #[arg(long, default_value = "America/New_York")]
    timezone: Tz,

    /// What to do with a file that cannot be sorted
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Skip)]
    on_error: ErrorPolicy,

    /// Shorthand for --on-error abort
    #[arg(long, conflicts_with = "on_error")]
    fail_fast: bool,

    /// Print the per-file result as JSON on stdout
    #[arg(long)]
    json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn into_options(self) -> SortOptions {
        let extensions = self
            .extensions
            .map(|list| list.split(',').map(str::to_string).collect())
            .unwrap_or_default();

        SortOptions {
            source: self.source,
            destination: self.destination,
            extensions,
            timezone: self.timezone,
            on_error: if self.fail_fast {
                ErrorPolicy::Abort
            } else {
                self.on_error
            },
        }
    }
}

fn setup_logging(verbosity: u8, quiet: bool) {
    let level = match (quiet, verbosity) {
        (true, _) => log::LevelFilter::Warn,
        (false, 0) => log::LevelFilter::Info,
        (false, 1) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Missing folders is an informational halt, not a failure.
        Err(err) if err.kind() == ErrorKind::MissingRequiredArgument => {
            println!("Please provide source and destination folders.");
            println!("{}", Cli::command().render_usage());
            return Ok(());
        }
        Err(err) => err.exit(),
    };

    setup_logging(cli.verbose, cli.quiet);
    let json = cli.json;
    let options = cli.into_options();
    let t_total = std::time::Instant::now();

    let result = match photoman_core::organize(&options, &|_stage, current, total, name| {
        log::trace!("[{}/{}] {}", current + 1, total, name);
    }) {
        Ok(result) => result,
        Err(SortError::InvalidSource { .. }) => {
            println!("Invalid source path.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        eprintln!(
            "Done! {} files seen, {} copied, {} already present, {} failed ({:.2}s)",
            result.files_seen,
            result.files_copied,
            result.files_skipped,
            result.files_failed,
            t_total.elapsed().as_secs_f64()
        );
    }

    if result.files_failed > 0 {
        anyhow::bail!("{} file(s) could not be sorted", result.files_failed);
    }
    Ok(())
}
