//! # llm-dump
//!
//! `llm-dump` concatenates a repository, or a set of linked markdown notes, into a
//! single annotated text file that can be handed to a language model as context.
//!
//! Two dumpers share one output convention:
//!
//! - [`dump_repository`] walks a directory, honours `.gitignore` files (and always
//!   skips `.git`), renders a tree of the included paths and then emits every text
//!   file between `--- Start of <path> ---` / `--- End of <path> ---` markers.
//! - [`dump_markdown`] starts at one note and follows `[[wiki]]` and `[standard](links)`
//!   depth-first up to a maximum depth, emitting each reachable note once.
//!
//! Binary files are detected with a [`ContentClassifier`]; [`BinaryDetection`] covers
//! the usual heuristics and [`ExtensionAllowlist`] is an alternative.
//!
//! # Features
//!
//! - `logging` (default): emits diagnostics through the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use llm_dump::{RepoDumpBuilder, dump_repository, output};
//!
//! let options = RepoDumpBuilder::new(".")
//!     .ignore_patterns(vec!["*.lock".into()])
//!     .build();
//!
//! let dump = dump_repository(options).expect("Failed to dump repository");
//! output::write_dump(&dump, output::OutputFormat::Text, "context.txt")
//!     .expect("Failed to write output");
//! ```

mod content;
mod engine;
mod error;
mod ignore_rules;
mod links;
mod markdown;
mod options;
pub mod output;
mod tree;
mod types;

pub use content::{ContentClassifier, ContentKind, ExtensionAllowlist, ReadOutcome, read_text};
pub use engine::{dump_repository, dump_repository_with};
pub use error::DumpError;
pub use ignore_rules::{IGNORE_FILE, IgnoreRules};
pub use links::{LinkKind, LinkReference, LinkResolver, Links, extract_links, is_external};
pub use markdown::{dump_markdown, dump_markdown_with};
pub use options::{
    BinaryDetection, DEFAULT_MAX_DEPTH, MarkdownDumpBuilder, MarkdownOptions, RepoDumpBuilder,
    RepoOptions,
};
pub use tree::{render_entry, render_tree, scan_tree};
pub use types::{Dump, OutputBlock, PathEntry, SkipReason, SkippedFile, VisitRecord};
