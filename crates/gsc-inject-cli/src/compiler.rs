//! External compiler process.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use gsc_inject_core::{CompileError, ScriptCompiler};
use tracing::debug;

/// Runs `<program> --output - <destination>`, feeding the source on stdin
/// and reading bytecode from stdout.
pub struct ProcessCompiler {
    program: PathBuf,
}

impl ProcessCompiler {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, destination: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["--output", "-", destination])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl ScriptCompiler for ProcessCompiler {
    fn compile(&self, source: &str, destination: &str) -> Result<Vec<u8>, CompileError> {
        debug!("Running {} for {}", self.program.display(), destination);

        let mut child = self
            .command(destination)
            .spawn()
            .map_err(|e| CompileError::Unavailable(format!("{}: {}", self.program.display(), e)))?;

        // Feed stdin from another thread so a compiler that streams output
        // before reading all input cannot deadlock against us.
        let stdin = child.stdin.take();
        let input = source.to_owned();
        let writer = thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes())?;
            }
            Ok(())
        });

        let output = child
            .wait_with_output()
            .map_err(|e| CompileError::Failed(format!("waiting for compiler: {}", e)))?;

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("Compiler closed stdin early: {}", e),
            Err(_) => return Err(CompileError::Failed("stdin writer panicked".to_string())),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            return Err(CompileError::Failed(if detail.is_empty() {
                format!("compiler exited with {}", output.status)
            } else {
                detail.to_string()
            }));
        }

        Ok(output.stdout)
    }
}
