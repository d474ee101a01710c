pub mod eligibility;
pub mod extract;
pub mod interact;
pub mod listing;
pub mod pipeline;
pub mod query;
pub mod reviews;

#[cfg(test)]
mod tests;

pub use eligibility::{Eligibility, SkipReason};
pub use pipeline::{crawl, crawl_with_layouts};
