//! hh-probe - smoke test for the hh.ru vacancies API
//!
//! Reads the API key from `HH_API_KEY`, runs the selected checks one after
//! another and exits non-zero if any of them fail. The report goes to
//! stdout; logs go to stderr.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

use hh_probe_core::config::{API_KEY_VAR, ENDPOINT_VAR, TIMEOUT_VAR};
use hh_probe_core::{checks, FailureKind, ProbeConfig, ProbeError, Report, Runner};

/// hh-probe - connectivity and response-shape checks for api.hh.ru
#[derive(Parser, Debug)]
#[command(name = "hh-probe")]
#[command(version)]
#[command(about = "Smoke-test the hh.ru vacancies API with an API key from HH_API_KEY")]
struct Args {
    /// API key sent as a bearer token [default: $HH_API_KEY]
    #[arg(long)]
    api_key: Option<String>,

    /// API base URL [default: $HH_API_ENDPOINT or https://api.hh.ru/]
    #[arg(long)]
    endpoint: Option<String>,

    /// Per-request timeout in seconds [default: $HH_API_TIMEOUT_SECS or 30]
    #[arg(long)]
    timeout_secs: Option<String>,

    /// Run a check by name (repeatable)
    #[arg(long = "check", value_name = "NAME")]
    checks: Vec<String>,

    /// Run every check in a group (repeatable)
    #[arg(long = "group", value_name = "NAME")]
    groups: Vec<String>,

    /// Run the whole catalog
    #[arg(long, conflicts_with_all = ["checks", "groups"])]
    all: bool,

    /// List available checks and exit
    #[arg(long)]
    list: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Stop after the first failed check
    #[arg(long)]
    fail_fast: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Exit code for configuration errors
const EXIT_CONFIG: u8 = 2;
/// Exit code for connection, timeout or TLS failures
const EXIT_TRANSPORT: u8 = 3;
/// Exit code when the API rejects the credential
const EXIT_AUTH: u8 = 4;
/// Exit code for any other failure
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if args.list {
        print!("{}", render_catalog());
        return ExitCode::SUCCESS;
    }

    let (config, selected) = match prepare(&args, |name| std::env::var(name).ok()) {
        Ok(prepared) => prepared,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let report = match runtime.block_on(run(&config, &selected, args.fail_fast)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(exit_code_for_error(&e));
        }
    };

    match args.format {
        Format::Text => print!("{}", report.render_text()),
        Format::Json => match report.render_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::from(EXIT_FAILURE);
            }
        },
    }

    ExitCode::from(exit_code(&report))
}

/// Resolve configuration and the check selection before any network call
///
/// Flags take precedence over the environment; both go through the same
/// `ProbeConfig::from_lookup` parsing.
fn prepare<F>(args: &Args, env: F) -> Result<(ProbeConfig, Vec<checks::Check>), ProbeError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = ProbeConfig::from_lookup(|name| {
        let flag = match name {
            API_KEY_VAR => args.api_key.clone(),
            ENDPOINT_VAR => args.endpoint.clone(),
            TIMEOUT_VAR => args.timeout_secs.clone(),
            _ => None,
        };
        flag.or_else(|| env(name))
    })?;

    let selected = if args.all {
        checks::catalog()
    } else {
        checks::select(&args.checks, &args.groups)?
    };

    Ok((config, selected))
}

async fn run(config: &ProbeConfig, selected: &[checks::Check], fail_fast: bool) -> Result<Report, ProbeError> {
    let runner = Runner::new(config)?.with_fail_fast(fail_fast);
    let report = runner.run(selected).await;

    if report.passed() {
        info!("All {} check(s) passed", report.results.len());
    } else {
        error!("{} of {} check(s) failed", report.failed_count(), report.results.len());
    }

    Ok(report)
}

fn exit_code(report: &Report) -> u8 {
    if report.passed() {
        return 0;
    }
    match report.first_failure().and_then(|r| r.failure_kind()) {
        Some(FailureKind::Transport) => EXIT_TRANSPORT,
        Some(FailureKind::AuthRejected) => EXIT_AUTH,
        _ => EXIT_FAILURE,
    }
}

fn exit_code_for_error(err: &ProbeError) -> u8 {
    match err {
        ProbeError::Transport(_) => EXIT_TRANSPORT,
        e if e.is_config() => EXIT_CONFIG,
        _ => EXIT_FAILURE,
    }
}

fn render_catalog() -> String {
    let mut out = String::new();
    for check in checks::catalog() {
        let default = if check.name == checks::DEFAULT_CHECK {
            " (default)"
        } else {
            ""
        };
        out.push_str(&format!(
            "{:<12} {}{} - {} request(s)\n",
            check.group,
            check.name,
            default,
            check.request_count()
        ));
    }
    out
}
