//! Build invocation.

use tracing::{debug, info};

use crate::error::{BuildError, CompileError};

/// External GSC compiler.
///
/// Implementations parse `source` as a whole program and return bytecode
/// that reports itself as `destination` inside the target.
pub trait ScriptCompiler {
    fn compile(&self, source: &str, destination: &str) -> Result<Vec<u8>, CompileError>;
}

/// Compile an assembled project. Compiler errors are not retried.
pub fn build(
    compiler: &dyn ScriptCompiler,
    source: &str,
    destination: &str,
) -> Result<Vec<u8>, BuildError> {
    debug!(
        "Compiling {} bytes of source as {}",
        source.len(),
        destination
    );

    let buffer = compiler.compile(source, destination)?;
    if buffer.is_empty() {
        return Err(BuildError::Empty {
            destination: destination.to_string(),
        });
    }

    info!("Compiled {} ({} bytes)", destination, buffer.len());
    Ok(buffer)
}
