//! # gsc-inject-core
//!
//! Core library for the GSC project injector.
//!
//! This crate provides:
//! - Settings persistence with self-healing defaults (per-gametype pointer and buffer addresses)
//! - Project assembly: discovery, entry-first ordering, per-file syntax checks, concatenation
//! - Build invocation against an external compiler
//! - Remote target sessions (backend selection, connect, attach, scoped release)
//! - The two-write deployment into the target process
//!
//! The compiler and the console transport are collaborators: this crate only
//! defines the traits it needs from them ([`ScriptCompiler`], [`RemoteTarget`],
//! [`TargetProvider`]) and sequences them through [`Pipeline`].

pub mod build;
pub mod config;
pub mod deploy;
pub mod error;
pub mod gametype;
pub mod pipeline;
pub mod project;
pub mod report;
pub mod target;

pub use build::{ScriptCompiler, build};
pub use config::{ConfigSource, ConfigStore, Configuration, Customs, Defaults, GametypeProfile};
pub use deploy::{DeployReport, deploy};
pub use error::{
    AssemblyError, BuildError, CompileError, DeployError, ErrorCategory, PipelineError,
    SessionError, TransportError,
};
pub use gametype::Gametype;
pub use pipeline::{DeployRequest, Pipeline};
pub use project::{
    AssembledSource, Diagnostic, ENTRY_FILE, ProjectAssembler, SCRIPT_EXTENSION,
    StructuralChecker, SyntaxChecker,
};
pub use report::{Reporter, SilentReporter};
pub use target::{BackendKind, RemoteTarget, Session, TargetProvider, connect};
