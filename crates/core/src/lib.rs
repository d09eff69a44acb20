//! Core library for sitedrift
//!
//! This crate implements the **Functional Core** of sitedrift, following the
//! Functional Core - Imperative Shell pattern:
//!
//! - **`sitedrift_core`** (this crate): pure transformations with zero I/O
//! - **`sitedrift`**: fetching pages, reading URL lists, appending to the
//!   output store and printing (the Imperative Shell)
//!
//! Everything here is deterministic and tested with fixture HTML, no network
//! and no mocking.
//!
//! # Pipeline
//!
//! ```text
//! archive html ──extract_blocks──┐
//!                                ├── SequenceMatcher ── DiffStats ── ComparisonRecord
//! live html    ──extract_blocks──┘
//!
//! stored percentages ── build_histogram ── Histogram
//! ```
//!
//! - [`blocks`]: HTML document to an ordered sequence of tagged text blocks
//! - [`matcher`]: longest-matching-run sequence alignment and opcodes
//! - [`diff`]: opcode classification and the change percentage
//! - [`record`]: output-store row, percentage formatting and parsing
//! - [`histogram`]: ten-bin summary of stored percentages
//!
//! # Example Usage
//!
//! ```rust
//! use sitedrift_core::diff::compare_documents;
//! use sitedrift_core::record::ComparisonRecord;
//!
//! let archive = "<h1>Welcome</h1><p>Old text</p>";
//! let live = "<h1>Welcome</h1><p>New text</p>";
//!
//! let stats = compare_documents(Some(archive), Some(live)).unwrap();
//! let record = ComparisonRecord::new("https://example.com", &stats);
//!
//! assert_eq!(record.inline_changes, 1);
//! assert_eq!(record.percentage, "33.3%");
//! ```

pub mod blocks;
pub mod diff;
pub mod histogram;
pub mod matcher;
pub mod record;
