//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod survey_data;
pub mod survey_list;
