pub mod api;
pub mod app;
pub mod config;
pub mod http;
pub mod output;
pub mod redact;
pub mod refresh;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use app::run;
pub use refresh::{AuthenticatedRequestClient, Outcome, OutcomeKind};
