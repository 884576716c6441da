#![warn(missing_docs)]
//! Linetree - Logical Line Index for Text Editors
//!
//! # Overview
//!
//! `linetree` keeps track of where every line of a document starts, how long it is, how many
//! UTF-8 bytes it occupies and how tall it renders. Lines are the nodes of an augmented
//! red-black tree ([`linetree_rbtree`]), so converting between character offsets, byte offsets,
//! rows and vertical positions costs O(log n) no matter how large the document grows.
//!
//! The index does not store text. Callers apply an edit to their buffer, then report it to the
//! [`LineIndex`], which reads the affected region back and answers with a [`LineChangeSet`]:
//! the lines that were inserted, removed or edited. [`Document`] bundles a rope with an index
//! for callers that do not bring their own buffer.
//!
//! # Core Features
//!
//! - **Stable line identities**: a [`LineId`] survives edits elsewhere in the document
//! - **All delimiters**: LF, CR and CRLF, including CRLF pairs formed or split by an edit
//! - **Several coordinate systems**: characters, bytes, rows and line heights
//! - **Change sets**: precise reports of which lines an edit touched
//! - **Edit processors**: collaborators that react to applied edits
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Document (rope + index + processors)       │  ← Editing API
//! ├─────────────────────────────────────────────┤
//! │  LineIndex                                  │  ← Line queries
//! ├─────────────────────────────────────────────┤
//! │  LineMetadata aggregates (bytes, heights)   │  ← Extra metrics
//! ├─────────────────────────────────────────────┤
//! │  linetree-rbtree                            │  ← Balanced tree
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Using a Document
//!
//! ```rust
//! use linetree::Document;
//!
//! let mut doc = Document::new("fn main() {\n}");
//! let changes = doc.insert_text("    run();\n", 12).unwrap();
//!
//! assert_eq!(doc.line_count(), 3);
//! assert_eq!(changes.inserted_lines().len(), 1);
//! assert_eq!(doc.line_text(1).unwrap().to_string(), "    run();\n");
//! ```
//!
//! ## Using the Index Directly
//!
//! ```rust
//! use linetree::{LineIndex, LineIndexConfig, LinePosition};
//!
//! let mut text = String::from("ab\ncd");
//! let mut index = LineIndex::from_source(text.as_str(), LineIndexConfig::default());
//!
//! text.insert_str(1, "\n");
//! let changes = index.insert_text(text.as_str(), "\n", 1);
//!
//! assert_eq!(index.line_count(), 3);
//! assert_eq!(changes.inserted_lines().len(), 1);
//! assert_eq!(index.line_position(4), Some(LinePosition::new(2, 0)));
//! ```
//!
//! # Module Description
//!
//! - [`line_index`] - The line index and its queries
//! - [`metadata`] - Per-line payload and its aggregators
//! - [`change_set`] - Inserted, removed and edited lines of an edit
//! - [`line_ending`] - Delimiter scanning and detection
//! - [`source`] - Read access to the indexed text
//! - [`document`] - Rope-backed document
//! - [`processing`] - Edit processors
//! - [`position`] - Row/column positions
//! - [`config`] - Index configuration

pub mod change_set;
pub mod config;
pub mod document;
pub mod line_ending;
pub mod line_index;
pub mod metadata;
pub mod position;
pub mod processing;
pub mod source;

pub use change_set::LineChangeSet;
pub use config::{DEFAULT_ESTIMATED_LINE_HEIGHT, LineIndexConfig};
pub use document::{Document, EditError};
pub use line_ending::{LineBreak, LineBreaks, LineEnding, line_breaks, next_line_break};
pub use line_index::{LineId, LineIndex, Lines};
pub use metadata::{LineMetadata, LineNode, byte_count_aggregator, line_height_aggregator};
pub use position::LinePosition;
pub use processing::{EditProcessor, TextEdit};
pub use source::TextSource;
