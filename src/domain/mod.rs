//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `survey` - Survey structure, raw responses and answer label rules
//! - `aggregation` - Time filtering, label resolution, counting and cache values

pub mod aggregation;
pub mod foundation;
pub mod survey;
