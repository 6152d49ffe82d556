use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{ArgGroup, Parser};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use precinct_results::app::{App, RunOptions, ScrapeRequest};
use precinct_results::config::ConfigLoader;
use precinct_results::domain::{ElectionCategory, Party};
use precinct_results::error::ScrapeError;
use precinct_results::output::{JsonOutput, LogSink, OutputMode, print_summary};
use precinct_results::site::HttpSiteClient;
use precinct_results::store::Store;

#[derive(Parser)]
#[command(name = "precinct-results")]
#[command(about = "Download election results by race and normalize them into per-precinct TSV files")]
#[command(version)]
#[command(group(
    ArgGroup::new("selection")
        .required(true)
        .multiple(true)
        .args(["primaries", "generals", "runoffs", "years"])
))]
struct Cli {
    /// Directory to write data to; created if absent.
    #[arg(short = 'f', long, default_value = ".")]
    directory: Utf8PathBuf,

    /// Scrape primaries, optionally only for the given parties.
    #[arg(short, long, num_args = 0.., value_delimiter = ',', ignore_case = true)]
    primaries: Option<Vec<Party>>,

    /// Scrape general elections.
    #[arg(short, long)]
    generals: bool,

    /// Scrape runoff elections.
    #[arg(short, long)]
    runoffs: bool,

    /// District codes: W<1-50>, pres, IL<1-9>, SS<1-118>, SR<1-59>.
    #[arg(short, long, num_args = 1.., value_delimiter = ',')]
    districts: Vec<String>,

    /// Free-text race-name substrings.
    #[arg(short, long, num_args = 1..)]
    keywords: Vec<String>,

    /// Only elections whose title mentions one of these years.
    #[arg(short, long, num_args = 1.., value_delimiter = ',')]
    years: Vec<String>,

    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    base_url: Option<String>,

    /// List matching races without downloading them.
    #[arg(long)]
    dry_run: bool,

    #[arg(long)]
    non_interactive: bool,
}

impl Cli {
    fn categories(&self) -> Vec<ElectionCategory> {
        let mut categories = Vec::new();
        match &self.primaries {
            Some(parties) if parties.is_empty() => categories.push(ElectionCategory::Primary),
            Some(parties) => categories.extend(
                parties
                    .iter()
                    .copied()
                    .map(ElectionCategory::PartyPrimary),
            ),
            None => {}
        }
        if self.generals {
            categories.push(ElectionCategory::General);
        }
        if self.runoffs {
            categories.push(ElectionCategory::Runoff);
        }
        categories
    }
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<ScrapeError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &ScrapeError) -> u8 {
    match error {
        ScrapeError::Http(_) | ScrapeError::Status { .. } => 3,
        ScrapeError::ConfigRead(_)
        | ScrapeError::ConfigParse(_)
        | ScrapeError::InvalidBaseUrl(_)
        | ScrapeError::EmptySelection => 2,
        error if error.is_malformed_export() => 4,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let mut site = ConfigLoader::resolve(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url.as_deref() {
        site = site.with_base_url(base_url)?;
    }

    let request = ScrapeRequest {
        categories: cli.categories(),
        years: cli.years.clone(),
        districts: cli.districts.clone(),
        keywords: cli.keywords.clone(),
    };
    let options = RunOptions {
        dry_run: cli.dry_run,
    };

    let client = HttpSiteClient::new(&site)?;
    let app = App::new(Store::new(cli.directory), client, site);

    match output_mode {
        OutputMode::NonInteractive => {
            let result = app.run(&request, options, &JsonOutput)?;
            JsonOutput::print_run(&result).into_diagnostic()?;
        }
        OutputMode::Interactive => {
            let result = app.run(&request, options, &LogSink)?;
            print_summary(&result);
        }
    }
    Ok(())
}
