//! Priority ordering for requests.
//!
//! Used standalone for triage lists and by the relationship graph to drive
//! impact-cluster expansion.

mod priority;

pub use priority::{HeapEntry, Prioritized, PriorityQueue};
