#![warn(missing_docs)]
//! Machmeter Workloads - The Standard Suite
//!
//! Seven workloads spanning ML primitives, parsing, compression, hashing,
//! and text search. Every workload satisfies the harness contract: it
//! generates (or is handed) its input, partitions every parallelizable
//! inner loop through [`WorkloadContext::map`], and never spawns
//! concurrency of its own.
//!
//! Inputs are produced deterministically from fixed seeds so that a run on
//! one machine does the same work as a run on any other.
//!
//! [`WorkloadContext::map`]: machmeter_core::WorkloadContext::map

mod compress;
mod hashing;
mod numeric;
mod parse;
mod synth;
mod text;

pub use compress::deflate;
pub use hashing::sha512;
pub use numeric::{kmeans, matrix_multiply, nearest_neighbors};
pub use parse::json_parsing;
pub use text::hamlet_word_count;

use machmeter_core::{DatasetSpec, Registry, WorkloadDescriptor};

/// The Hamlet full text, used by the text-search workload.
pub const HAMLET: DatasetSpec = DatasetSpec {
    name: "hamlet",
    url: "https://www.gutenberg.org/cache/epub/1524/pg1524.txt",
};

/// The shipped suite, in run (and report) order.
pub fn standard_suite() -> Registry {
    Registry::new(vec![
        WorkloadDescriptor {
            name: "nearest neighbors",
            run: nearest_neighbors,
            supports_parallel: true,
            datasets: &[],
        },
        WorkloadDescriptor {
            name: "k-means",
            run: kmeans,
            supports_parallel: false,
            datasets: &[],
        },
        WorkloadDescriptor {
            name: "matrix multiply",
            run: matrix_multiply,
            supports_parallel: true,
            datasets: &[],
        },
        WorkloadDescriptor {
            name: "json parsing",
            run: json_parsing,
            supports_parallel: false,
            datasets: &[],
        },
        WorkloadDescriptor {
            name: "deflate",
            run: deflate,
            supports_parallel: false,
            datasets: &[],
        },
        WorkloadDescriptor {
            name: "sha512",
            run: sha512,
            supports_parallel: false,
            datasets: &[],
        },
        WorkloadDescriptor {
            name: "boyer-moore/horspool",
            run: hamlet_word_count,
            supports_parallel: true,
            datasets: &[HAMLET],
        },
    ])
}
