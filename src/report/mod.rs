//! Ranking and reporting of simulation results
//!
//! - **Ranker**: stable descending order by running count, top-N view
//! - **Writer**: terminal table and the full results file
//! - **Summary**: run statistics

pub mod ranker;
pub mod summary;
pub mod writer;

pub use ranker::{rank, RankedReport};
pub use summary::RunSummary;
pub use writer::{render_summary_table, write_results, write_results_file};
