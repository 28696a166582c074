// Session state: the single source of truth for the capture/analyze workflow.
// The GUI and the headless CLI both drive it through named transitions.

pub mod controller;
pub mod state;

pub use controller::{Analysis, AnalysisOutcome, AnalysisRequest, Session, SessionSnapshot};
pub use state::SessionPhase;

use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedSession<C> = Arc<Mutex<Session<C>>>;

#[cfg(test)]
mod tests;
