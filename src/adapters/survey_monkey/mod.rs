//! Survey provider adapters.
//!
//! - `SurveyMonkeyClient` - SurveyMonkey v3 REST API over reqwest
//! - `MockSurveyApi` - Configurable in-process provider for tests

mod client;
mod mock;

pub use client::{SurveyMonkeyClient, SurveyMonkeyConfig, DEFAULT_BASE_URL};
pub use mock::MockSurveyApi;
