//! Shelldoc Core - documentation generator for shell UI sources
//!
//! This crate provides the pipeline stages:
//! - Lexer: tokenization of JavaScript-family source text
//! - Doc: comment extraction, XML markup and HTML rendering
//! - Config: `shelldoc.toml` loading
//! - Pipeline: batch driver and index page

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lexer module - tokenization of source text
pub mod lexer;

/// Documentation model, extraction and rendering
pub mod doc;

/// Build configuration
pub mod config;

/// Batch driver
pub mod pipeline;

pub use config::{ConfigError, DocConfig, CONFIG_FILE};
pub use doc::{
    DocumentationNode, ExtractError, Extractor, HtmlRenderer, NodeKind, PageIndexEntry,
    RenderError, SerializeError,
};
pub use lexer::{Lexer, Token};
pub use pipeline::{
    BatchReport, FailedFile, FileOutcome, FileState, Pipeline, PipelineError, PipelineEvent,
};
