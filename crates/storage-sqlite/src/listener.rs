//! Listener facade: receives strand batches from the delivery mechanism and
//! applies them through the single-writer actor.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::db::WriteHandle;
use strandfolio_core::errors::Result;
use strandfolio_core::projector::ProjectorService;
use strandfolio_core::strands::{ReceiverOptions, Strand};

/// Contract the upstream delivery mechanism pushes strand batches into.
#[async_trait]
pub trait StrandReceiverTrait: Send + Sync {
    async fn transmit(&self, strands: Vec<Strand>) -> Result<()>;
}

/// Applies each incoming batch as one writer job, which the actor wraps in
/// one immediate transaction: either the whole batch lands or none of it
/// does, and a redelivered batch is safe against the idempotent create
/// paths.
pub struct ProjectionListener {
    projector: Arc<ProjectorService>,
    writer: WriteHandle,
}

impl ProjectionListener {
    pub fn new(projector: Arc<ProjectorService>, writer: WriteHandle) -> Self {
        Self { projector, writer }
    }

    /// Registration descriptor for the upstream delivery mechanism.
    pub fn receiver_options() -> ReceiverOptions {
        ReceiverOptions::portfolio_defaults()
    }
}

#[async_trait]
impl StrandReceiverTrait for ProjectionListener {
    async fn transmit(&self, strands: Vec<Strand>) -> Result<()> {
        debug!("received batch of {} strands", strands.len());
        let projector = self.projector.clone();
        self.writer
            .exec(move |conn| projector.apply_strands(&strands, conn))
            .await
    }
}
