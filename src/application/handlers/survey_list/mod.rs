//! Survey catalogue query handlers.

mod list_surveys;

pub use list_surveys::{ListSurveysError, ListSurveysHandler, ListSurveysQuery};
