//! Survey Insights - Response aggregation and caching for survey dashboards
//!
//! This crate turns raw survey responses into labelled, percentage-normalized
//! per-question statistics, with time-window filtering, a staleness-bounded
//! cache and a reduced-fidelity fallback when survey structure is unavailable.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
