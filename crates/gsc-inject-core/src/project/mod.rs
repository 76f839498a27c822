//! Project assembly.
//!
//! A project is a directory tree of `.gsc` files with `main.gsc` at its root.
//! Assembly discovers the files, puts the entry file first, checks every file
//! on its own (so diagnostics carry the line number of the original file),
//! and joins the clean sources into one program for the compiler.
//!
//! Validation is fail-fast: the first diagnostic of the first failing file
//! aborts assembly and no later file is read.

mod scan;
mod source;
mod syntax;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::AssemblyError;
use crate::report::Reporter;

pub use scan::{discover_scripts, entry_first};
pub use source::{decode_source, read_source};
pub use syntax::{Diagnostic, StructuralChecker, SyntaxChecker};

/// Entry file that must sit at the project root
pub const ENTRY_FILE: &str = "main.gsc";

/// Script file extension (matched case-insensitively)
pub const SCRIPT_EXTENSION: &str = "gsc";

/// Separator inserted between consecutive files
pub const FILE_SEPARATOR: &str = "\n";

/// Combined source of a project, entry file first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledSource {
    pub files: Vec<PathBuf>,
    pub text: String,
}

pub struct ProjectAssembler<'a> {
    checker: &'a dyn SyntaxChecker,
}

impl<'a> ProjectAssembler<'a> {
    pub fn new(checker: &'a dyn SyntaxChecker) -> Self {
        Self { checker }
    }

    /// Assemble the project rooted at `root`.
    pub fn assemble(
        &self,
        root: &Path,
        reporter: &dyn Reporter,
    ) -> Result<AssembledSource, AssemblyError> {
        if !root.is_dir() {
            return Err(AssemblyError::NotADirectory(root.to_path_buf()));
        }

        let entry = root.join(ENTRY_FILE);
        if !entry.is_file() {
            return Err(AssemblyError::MissingEntry {
                root: root.to_path_buf(),
            });
        }

        let files = entry_first(discover_scripts(root)?, &entry);

        let mut sources = Vec::with_capacity(files.len());
        for path in &files {
            let text = read_source(path).map_err(|source| AssemblyError::Read {
                path: path.clone(),
                source,
            })?;

            if let Some(first) = self.checker.check(&text).into_iter().next() {
                return Err(AssemblyError::Syntax {
                    path: path.clone(),
                    line: first.line,
                    message: first.message,
                });
            }

            debug!("{} is clean ({} bytes)", path.display(), text.len());
            reporter.info(&format!("No syntax errors in {}.", path.display()));
            sources.push(text);
        }

        info!("Assembled {} files from {}", files.len(), root.display());
        Ok(AssembledSource {
            text: sources.join(FILE_SEPARATOR),
            files,
        })
    }
}
