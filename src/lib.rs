//! # Email block tree to MJML compiler
//!
//! Compiles the block tree produced by the visual email editor into an MJML
//! document. An external MJML renderer turns the result into HTML.
//!
//! ## Features
//! - Typed payloads for every block kind, decoded once per node
//! - Padding, border and margin resolution for the `all` / `separate` control modes
//! - Rich text runs with formatting spans and tracked hyperlinks
//! - `{{ }}` / `{% %}` interpolation of text and raw template blocks
//! - UTM tagging and optional redirect tracking of links
//!
//! ## Example
//! ```ignore
//! use mailbuilder_mjml::{tree_to_mjml, Node, TrackingConfig};
//!
//! let root: Node = serde_json::from_str(json)?;
//! let mjml = tree_to_mjml(&root, Some(r#"{"name":"Ada"}"#), &TrackingConfig::default())?;
//! ```

pub mod blocks;
pub mod compiler;
pub mod error;
pub mod markup;
pub mod node;
pub mod request;
pub mod rich_text;
pub mod style;
pub mod template;
pub mod tracking;

// --- Core types ---
pub use blocks::Block;
pub use compiler::{tree_to_mjml, tree_to_mjml_with_engine, ColumnSlot, Compiler};
pub use error::{CompileError, CompileResult};
pub use node::{BlockKind, Layout, Node};
pub use style::{ControlMode, RootStyles, TextStyle};
pub use template::{JinjaEngine, TemplateEngine, TemplateError};
pub use tracking::TrackingConfig;

// --- Request layer ---
pub use request::{compile_request, CompileRequest, CompileResponse, MjmlRenderer, RenderFailure};
