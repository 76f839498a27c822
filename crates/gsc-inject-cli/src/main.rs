mod backend;
mod compiler;
mod console;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use gsc_inject_core::{
    BackendKind, ConfigSource, ConfigStore, DeployReport, DeployRequest, ErrorCategory, Gametype,
    Pipeline, PipelineError, Reporter, StructuralChecker,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::backend::HttpProvider;
use crate::compiler::ProcessCompiler;
use crate::console::ConsoleReporter;

/// Missing arguments or an unusable project directory
const EXIT_USAGE: u8 = 2;
/// Any other reported error
const EXIT_FAILURE: u8 = 1;

#[derive(Parser)]
#[command(name = "gsc-inject")]
#[command(about = "Compile a GSC project and inject it into a running game")]
#[command(version)]
struct Args {
    /// Console API: tm/tmapi or cc/ccapi (anything else selects tmapi)
    api: Option<String>,

    /// Project directory with main.gsc at its root
    project_directory: Option<PathBuf>,

    /// Gametype whose script slot is replaced (mp or zm)
    #[arg(short, long, default_value = "mp")]
    gametype: Gametype,

    /// Settings file (default: config.json next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// External GSC compiler executable
    #[arg(long, env = "GSC_INJECT_COMPILER", default_value = "gsc-compiler")]
    compiler: PathBuf,

    /// Console address
    #[arg(short, long, env = "GSC_INJECT_TARGET")]
    target: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gsc_inject=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let console = ConsoleReporter;

    let (api, project_dir) = match positionals(&args) {
        Ok(positionals) => positionals,
        Err(message) => {
            console.error(message);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match run(&args, api, project_dir, &console) {
        Ok(report) => {
            debug!(
                "Deployed {} bytes to {} (pointer {:#010x}, buffer {:#010x})",
                report.bytes_written,
                report.target_name,
                report.pointer_address,
                report.buffer_address
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            console.error(&e.to_string());
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Required positionals, or the diagnostic for the first one missing.
fn positionals(args: &Args) -> Result<(&str, &Path), &'static str> {
    let api = args.api.as_deref().ok_or("No API parameter specified")?;
    let project_dir = args
        .project_directory
        .as_deref()
        .ok_or("No project directory parameter specified")?;
    Ok((api, project_dir))
}

fn run(
    args: &Args,
    api: &str,
    project_dir: &Path,
    console: &ConsoleReporter,
) -> Result<DeployReport> {
    let store = match &args.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::beside_executable(),
    };
    let (config, source) = store.load_with_source();
    debug!("Settings from {} ({})", store.path().display(), source);
    if let ConfigSource::Generated { reason } = &source {
        console.info(&format!(
            "Could not read config ({}), generated a new one at {}.",
            reason,
            store.path().display()
        ));
    }

    let request = DeployRequest {
        backend: BackendKind::select(api),
        gametype: args.gametype,
        project_dir: project_dir.to_path_buf(),
    };
    info!(
        "Deploying {} as {} via {}",
        project_dir.display(),
        request.gametype,
        request.backend
    );

    let compiler = ProcessCompiler::new(&args.compiler);
    let provider = HttpProvider::new(args.target.clone());
    let pipeline = Pipeline {
        checker: &StructuralChecker,
        compiler: &compiler,
        provider: &provider,
    };

    Ok(pipeline.run(&request, &config, console)?)
}

fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<PipelineError>().map(PipelineError::category) {
        Some(ErrorCategory::Usage) => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}
