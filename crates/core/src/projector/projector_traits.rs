//! Collaborator contracts of the projector.

use crate::errors::Result;
use crate::strands::{AddFileInput, PortfolioState};

/// Computes the initial state of a newly created portfolio document from its
/// creation parameters.
///
/// This mirrors the upstream document engine's pure state-construction
/// function; the projector only needs it when a drive strand adds a
/// portfolio document it has never seen.
pub trait InitialStateProviderTrait: Send + Sync {
    fn initial_state(&self, input: &AddFileInput) -> Result<PortfolioState>;
}

/// Default provider: a freshly added document projects an empty subgraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyInitialState;

impl InitialStateProviderTrait for EmptyInitialState {
    fn initial_state(&self, _input: &AddFileInput) -> Result<PortfolioState> {
        Ok(PortfolioState::default())
    }
}
