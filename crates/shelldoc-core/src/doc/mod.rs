//! Documentation extraction and rendering for shell UI sources
//!
//! Source text is scanned into a [`DocumentationNode`] tree by the
//! [`Extractor`], written to intermediate XML by [`markup::serialize`], read
//! back by [`markup::parse`] and rendered as HTML by [`HtmlRenderer`].

pub mod comment;
mod error;
mod extractor;
pub mod html;
pub mod markup;
mod types;

pub use comment::{BlockTag, BlockToken, DocBlock};
pub use error::{ExtractError, ExtractErrorKind, RenderError, SerializeError};
pub use extractor::Extractor;
pub use html::HtmlRenderer;
pub use types::{DocumentationNode, NodeKind, PageIndexEntry, Parameter, Returns, Tag, Walk};
