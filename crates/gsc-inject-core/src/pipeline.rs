//! End-to-end run: assemble, build, connect, deploy.
//!
//! Every local stage completes before the console is contacted, so a
//! validation or build failure never touches the target.

use std::path::PathBuf;

use tracing::debug;

use crate::build::{ScriptCompiler, build};
use crate::config::Configuration;
use crate::deploy::{DeployReport, deploy};
use crate::error::PipelineError;
use crate::gametype::Gametype;
use crate::project::{ProjectAssembler, SyntaxChecker};
use crate::report::Reporter;
use crate::target::{BackendKind, TargetProvider, connect};

/// Parameters of one run.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub backend: BackendKind,
    pub gametype: Gametype,
    pub project_dir: PathBuf,
}

/// Collaborators used by a run.
pub struct Pipeline<'a> {
    pub checker: &'a dyn SyntaxChecker,
    pub compiler: &'a dyn ScriptCompiler,
    pub provider: &'a dyn TargetProvider,
}

impl Pipeline<'_> {
    pub fn run(
        &self,
        request: &DeployRequest,
        config: &Configuration,
        reporter: &dyn Reporter,
    ) -> Result<DeployReport, PipelineError> {
        let assembled =
            ProjectAssembler::new(self.checker).assemble(&request.project_dir, reporter)?;
        reporter.success("No errors in project scripts.");

        let destination = request.gametype.destination();
        let buffer = build(self.compiler, &assembled.text, destination)?;
        debug!(
            "{} files compiled into {} bytes for {}",
            assembled.files.len(),
            buffer.len(),
            request.gametype
        );

        let mut session = connect(self.provider, request.backend)?;
        reporter.success(&format!(
            "Connected and attached to {}.",
            session.target_name()
        ));

        let report = deploy(&mut session, config.profile(request.gametype), &buffer)?;
        reporter.success(&format!("Script injected ({} bytes).", report.bytes_written));
        Ok(report)
    }
}
