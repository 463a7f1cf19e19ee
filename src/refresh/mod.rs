mod client;
mod outcome;
mod policy;

pub use client::AuthenticatedRequestClient;
pub use outcome::{Outcome, OutcomeKind};
