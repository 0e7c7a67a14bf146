//! Core library for live gutter change markers.
//!
//! The crate is layered around three responsibilities:
//! - classifying buffer lines against the committed baseline
//! - throttling recomputation while the buffer is being edited
//! - resolving the baseline from a git repository

#![warn(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    missing_docs
)]
#![cfg_attr(
    not(test),
    deny(
        clippy::dbg_macro,
        clippy::expect_used,
        clippy::panic,
        clippy::print_stderr,
        clippy::print_stdout,
        clippy::todo,
        clippy::unwrap_used
    )
)]

use std::sync::Once;

/// Tracker configuration.
pub mod config;
/// Line classification on top of libgit2's line diff.
pub mod diff;
/// Foreign function interface for editor hosts.
pub mod ffi;
/// Git repository access and baseline retrieval.
pub mod repository;
/// Fixed-window recomputation throttle.
pub mod scheduler;
/// Glue between buffer events, the classifier and the sink.
pub mod tracker;

pub use gutter_api::{
    AnnotationMap, BaselineSnapshot, ChangeKind, ContextId, LineAnnotation, LineContext,
};
pub use gutter_host_api::{
    AnnotationSink, BaselineProvider, BufferSignal, BufferSnapshot, HandlerId, SharedSink,
    SignalHost, Subscription, TextBuffer,
};

pub use ffi::{
    open_session, open_session_with_config, BaselineStatus, CoreError, GutterSession,
};

uniffi::include_scaffolding!("gutter_core");

/// Common result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying git operation failed.
    #[error("git error: {source}")]
    Git {
        /// Original libgit2 error bubbled up by the core library.
        #[from]
        source: git2::Error,
    },
    /// Provided path does not correspond to a git repository.
    #[error("path does not reference a git repository: {path}")]
    NotARepository {
        /// Path that failed to resolve to a repository.
        path: String,
    },
    /// Bare repositories have no working tree to compare against.
    #[error("repository at {path} is bare and unsupported")]
    BareRepository {
        /// Path of the repository lacking a working tree.
        path: String,
    },
    /// File lies outside the repository working tree.
    #[error("{path} is outside the working tree of {root}")]
    OutsideWorkdir {
        /// File that was looked up.
        path: String,
        /// Working tree root of the discovered repository.
        root: String,
    },
    /// Tree entry for the file is not a blob (directory, submodule).
    #[error("{path} is not a file in the committed tree")]
    NotABlob {
        /// Repository-relative path of the entry.
        path: String,
    },
    /// Committed content is not valid UTF-8.
    #[error("committed content of {path} is not valid UTF-8")]
    InvalidEncoding {
        /// Repository-relative path of the blob.
        path: String,
    },
    /// Filesystem interaction failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Filesystem path involved in the failed operation.
        path: String,
        /// Source I/O error returned by the standard library.
        #[source]
        source: std::io::Error,
    },
    /// Configuration could not be parsed.
    #[error("invalid configuration: {source}")]
    Config {
        /// Parser error.
        #[from]
        source: toml::de::Error,
    },
}

/// Proof that [`init`] ran; required to construct git-backed providers.
#[derive(Debug, Clone, Copy)]
pub struct Runtime {
    _private: (),
}

/// One-time process setup the host performs before building providers.
///
/// Safe to call repeatedly; only the first call does any work.
pub fn init() -> Runtime {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let version = git2::Version::get();
        let (major, minor, patch) = version.libgit2_version();
        tracing::info!(
            libgit2 = %format!("{major}.{minor}.{patch}"),
            threads = version.threads(),
            "gutter core initialized"
        );
    });
    Runtime { _private: () }
}
