//! Task scheduling intelligence: urgency scoring and temporal bucketing.
//!
//! Both components are stateless pure functions, safe to call concurrently
//! without coordination.

mod buckets;
mod urgency;

pub use buckets::{bucket_by_due_date, DueBuckets};
pub use urgency::{compute_urgency, sort_by_urgency, today_local, urgency_score};
