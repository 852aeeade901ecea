//! Reductions from parsed records to report-ready aggregates.

pub mod authors;
pub mod buckets;
pub mod contributors;
pub mod heatmap;
pub mod reviewers;
pub mod sort;

pub use authors::{aggregate_contributions, AuthorShares, AuthorStats, ContributionSummary};
pub use buckets::BucketedCount;
pub use sort::{RankedEntry, SortDirection, SortKey, SortSpec};
