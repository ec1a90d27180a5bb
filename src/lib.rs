//! Extract layout metrics for named nodes from a Figma JSON export.
//!
//! The core is [`search`]: a depth-first walk over a typed [`Node`] tree that
//! summarizes every node whose name (or TEXT content) matches the configured
//! targets into a [`MatchResult`].

pub mod logger;

pub mod config;
pub mod error;
pub mod extract;
pub mod file;
pub mod node;
pub mod paint;
pub mod search;
pub mod tree;
pub mod types;

pub use config::{Config, DEFAULT_CONFIG_FILE};
pub use error::{ExtractError, Result};
pub use extract::{extract_batch, extract_file};
pub use file::{load_root, locate_root, read_document, RootSelector};
pub use node::{Node, Paint};
pub use paint::{color_to_hex, simplify_paint};
pub use search::{search, MatchMode, SearchOptions, DEFAULT_TARGETS};
pub use tree::summarize_node;
pub use types::{FileReport, MatchResult, SimplifiedPaint};
