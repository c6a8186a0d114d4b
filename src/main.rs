use std::path::PathBuf;
use std::process;

use clap::Parser;
use clap::error::ErrorKind;
use gl2bb::adapters::answers::AnswerFile;
use gl2bb::adapters::prompt::TerminalPrompt;
use gl2bb::cmd::export::{self, ExportCommandArgs, ExportOutcome};
use gl2bb::domain::deployment::{ClassifyError, DeploymentClassifier};
use gl2bb::domain::error::{ExportError, TranslateError};
use gl2bb::engine::TranslateOptions;
use serde::Serialize;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

const EX_USAGE: i32 = 64;
const EX_DATAERR: i32 = 65;
const EX_NOINPUT: i32 = 66;
const EX_CANTCREAT: i32 = 73;
const EX_IOERR: i32 = 74;
const EX_CONFIG: i32 = 78;
const EXIT_ABORTED: i32 = 130;

#[derive(Debug, Parser)]
#[command(
    name = "gl2bb",
    version,
    about = "Export a GitLab CI pipeline as a Bitbucket Pipelines file"
)]
struct Cli {
    /// Path to `.gitlab-ci.yml`, or to the directory that holds it.
    #[arg(short, long)]
    source: PathBuf,

    /// Where to write `bitbucket-pipelines.yml`; defaults next to the source.
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// TOML file with deployment answers; skips the interactive prompt.
    #[arg(long, value_name = "FILE")]
    deployments: Option<PathBuf>,

    /// Leave dot-prefixed (hidden) jobs out of the output.
    #[arg(long, default_value_t = false)]
    skip_hidden_jobs: bool,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct CliError<'a> {
    error: &'a str,
    message: String,
    code: i32,
    details: Value,
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return handle_parse_error(error),
    };
    init_tracing(cli.verbose);

    let args = ExportCommandArgs {
        source: cli.source,
        destination: cli.destination,
        options: TranslateOptions {
            skip_hidden_jobs: cli.skip_hidden_jobs,
        },
    };

    let mut classifier: Box<dyn DeploymentClassifier> = match &cli.deployments {
        Some(path) => match AnswerFile::load(path) {
            Ok(answers) => Box::new(answers),
            Err(error) => {
                let details = json!({"deployments": path});
                emit_error("configuration_error", error.to_string(), details, EX_CONFIG);
                return EX_CONFIG;
            }
        },
        None => Box::new(TerminalPrompt::stdio()),
    };

    match export::run(&args, &mut classifier) {
        Ok(outcome) => report_success(&outcome),
        Err(error) => {
            let (code, kind) = map_export_error(&error);
            emit_error(kind, error.to_string(), json!({"source": args.source}), code);
            code
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{error}");
            0
        }
        ErrorKind::MissingRequiredArgument => missing_source(),
        _ => {
            emit_error(
                "usage_error",
                error.to_string(),
                json!({"kind": "cli_parse_error"}),
                EX_USAGE,
            );
            EX_USAGE
        }
    }
}

fn missing_source() -> i32 {
    emit_error(
        "configuration_error",
        "--source or -s is required, you need to specify a file to export.".to_string(),
        json!({"missing": "--source"}),
        EX_CONFIG,
    );
    EX_CONFIG
}

fn report_success(outcome: &ExportOutcome) -> i32 {
    println!(
        "The bitbucket pipeline file has been created {}. The represented object is the following:",
        outcome.destination.display()
    );
    match serde_json::to_string(&outcome.document) {
        Ok(serialized) => {
            println!("{serialized}");
            0
        }
        Err(error) => {
            emit_error(
                "internal_error",
                format!("failed to serialize pipeline summary: {error}"),
                json!({"destination": outcome.destination}),
                1,
            );
            1
        }
    }
}

fn map_export_error(error: &ExportError) -> (i32, &'static str) {
    match error {
        ExportError::NotFound { .. } => (EX_NOINPUT, "input_error"),
        ExportError::EmptyDocument { .. } => (EX_DATAERR, "empty_document"),
        ExportError::MalformedDocument { .. } => (EX_DATAERR, "malformed_document"),
        ExportError::Translate(TranslateError::Classify { source, .. }) => match source {
            ClassifyError::Aborted => (EXIT_ABORTED, "prompt_aborted"),
            ClassifyError::Io(_) => (EX_IOERR, "prompt_error"),
        },
        ExportError::Translate(TranslateError::MalformedJob { .. }) => (EX_DATAERR, "malformed_job"),
        ExportError::Translate(_) => (EX_DATAERR, "invalid_cache"),
        ExportError::WriteOutput { .. } => (EX_CANTCREAT, "output_error"),
    }
}

fn emit_error(error: &'static str, message: String, details: Value, code: i32) {
    let payload = CliError {
        error,
        message,
        code,
        details,
    };
    match serde_json::to_string(&payload) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(_) => eprintln!(
            "{{\"error\":\"internal_error\",\"message\":\"failed to serialize error\",\"code\":1}}"
        ),
    }
}
