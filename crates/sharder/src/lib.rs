//! # csplit sharder
//!
//! Partitions the directive-annotated output of a whole-program analysis
//! run into N roughly balanced shards so the downstream stage can process
//! them in parallel.
//!
//! ## Architecture
//!
//! ```text
//! Input streams (one per project, in project order)
//!     │
//!     ├──> Directive Scanner: project / unit markers + byte offsets
//!     │
//!     ├──> Unit Index: projects, unit arena, occurrence list
//!     │
//!     ├──> Shard Allocator: greedy bin-packing by project-membership weight
//!     │
//!     └──> Shard Writer: per-shard files, per-project wrappers,
//!          verbatim unit blocks copied from recorded offsets
//! ```
//!
//! Indexing completes over all inputs before allocation starts: the
//! allocator weighs each unit by how many projects it belongs to, which is
//! only known once every stream has been scanned. The whole pipeline is
//! synchronous and deterministic; identical inputs and shard count yield
//! byte-identical outputs.
//!
//! ## Example
//!
//! ```no_run
//! use csplit_sharder::{split, SplitOptions};
//! use std::path::PathBuf;
//!
//! let inputs = vec![PathBuf::from("i386.cs"), PathBuf::from("amd64.cs")];
//! let summary = split(
//!     &inputs,
//!     &SplitOptions {
//!         shards: 8,
//!         out_dir: PathBuf::from("."),
//!     },
//! )?;
//! println!("{} shards from {} units", summary.shards, summary.distinct_cus);
//! # Ok::<(), csplit_sharder::SharderError>(())
//! ```

mod allocator;
mod error;
mod index;
mod pipeline;
mod scanner;
mod writer;

pub use allocator::{allocate, Shard};
pub use error::{Result, SharderError};
pub use index::{CuId, CuRecord, UnitIndex};
pub use pipeline::{split, SplitOptions, SplitSummary};
pub use scanner::{Directive, DirectiveScanner, CU_END_PREFIX};
pub use writer::{shard_file_name, ShardWriter};
