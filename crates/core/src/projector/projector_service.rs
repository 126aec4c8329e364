//! Projector: routes strands and enforces the surgical-vs-rebuild decision.

use std::sync::Arc;

use diesel::sqlite::SqliteConnection;
use log::debug;

use super::projector_traits::InitialStateProviderTrait;
use super::{rebuild, registry};
use crate::constants::PORTFOLIO_DOCUMENT_TYPE;
use crate::errors::{ProjectionError, Result};
use crate::portfolio::PortfolioRepositoryTrait;
use crate::strands::{DriveOperation, PortfolioOperation, PortfolioState, Strand};

/// Applies strand batches to the projection store.
///
/// One instance serves the whole process; all collaborators are injected at
/// construction. Every method runs inside the transaction scope the caller
/// opened for the current batch and never commits on its own.
pub struct ProjectorService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    initial_state: Arc<dyn InitialStateProviderTrait>,
}

impl ProjectorService {
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        initial_state: Arc<dyn InitialStateProviderTrait>,
    ) -> Self {
        Self {
            repository,
            initial_state,
        }
    }

    /// Applies a batch of strands sequentially in delivery order.
    ///
    /// Later strands may depend on portfolio rows created by earlier ones in
    /// the same batch (a drive strand adding a document, immediately followed
    /// by that document's first content strand), so there is no intra-batch
    /// reordering or parallelism. The first failure aborts the batch.
    pub fn apply_strands(&self, strands: &[Strand], conn: &mut SqliteConnection) -> Result<()> {
        for strand in strands {
            if strand.is_drive_strand() {
                self.apply_drive_strand(strand, conn)?;
            } else {
                self.apply_document_strand(strand, conn)?;
            }
        }
        Ok(())
    }

    /// Structural changes to the document collection itself.
    fn apply_drive_strand(&self, strand: &Strand, conn: &mut SqliteConnection) -> Result<()> {
        debug!("received strand for drive {}", strand.drive_id);

        if strand.signals_reset() {
            let removed = self
                .repository
                .delete_drive_portfolios(&strand.drive_id, conn)?;
            debug!(
                "drive {} reset: tore down {removed} portfolios",
                strand.drive_id
            );
        }

        for op in &strand.operations {
            match DriveOperation::parse(op)? {
                Some(DriveOperation::AddFile(input)) => {
                    if input.document_type == PORTFOLIO_DOCUMENT_TYPE {
                        debug!("adding portfolio document {}", input.id);
                        let state = self.initial_state.initial_state(&input)?;
                        rebuild::rebuild_portfolio(
                            self.repository.as_ref(),
                            &strand.drive_id,
                            &input.id,
                            &state,
                            conn,
                        )?;
                    } else {
                        debug!(
                            "ignoring added document {} of type {}",
                            input.id, input.document_type
                        );
                    }
                }
                Some(DriveOperation::DeleteNode(input)) => {
                    let removed =
                        self.repository
                            .delete_portfolio(&strand.drive_id, &input.id, conn)?;
                    debug!("removed {removed} portfolios for document {}", input.id);
                }
                None => {
                    debug!("ignoring drive operation {}", op.op_type);
                }
            }
        }

        Ok(())
    }

    /// Content changes to one portfolio document: surgical when every
    /// operation is registered and history is monotonic, full rebuild
    /// otherwise.
    fn apply_document_strand(&self, strand: &Strand, conn: &mut SqliteConnection) -> Result<()> {
        debug!(
            "received strand for document {} with {} operations",
            strand.document_id,
            strand.operations.len()
        );

        let Some(portfolio) =
            self.repository
                .find_portfolio(&strand.drive_id, &strand.document_id, conn)?
        else {
            // Not tracked by this read model, e.g. an earlier ADD_FILE for a
            // different document type.
            debug!(
                "skipping strand for untracked document {}",
                strand.document_id
            );
            return Ok(());
        };

        // Parse everything up front unless history already demands a
        // rebuild. An unregistered operation type anywhere in the strand
        // (including one slipping through mid-iteration) lands on the
        // rebuild path rather than erroring.
        let mut operations: Vec<PortfolioOperation> = Vec::with_capacity(strand.operations.len());
        let mut rebuild_needed = strand.signals_reset();
        if !rebuild_needed {
            for op in &strand.operations {
                match PortfolioOperation::parse(op)? {
                    Some(parsed) => operations.push(parsed),
                    None => {
                        debug!("operation {} is not surgical", op.op_type);
                        rebuild_needed = true;
                        break;
                    }
                }
            }
        }

        if rebuild_needed {
            let state: PortfolioState =
                serde_json::from_value(strand.state.clone()).map_err(|err| {
                    ProjectionError::MalformedState(err.to_string())
                })?;
            // Stale rows from a diverged history must not linger; rebuild
            // itself only ever adds.
            self.repository
                .delete_portfolio_descendants(&portfolio.id, conn)?;
            rebuild::rebuild_portfolio(
                self.repository.as_ref(),
                &strand.drive_id,
                &strand.document_id,
                &state,
                conn,
            )?;
            return Ok(());
        }

        for operation in operations {
            registry::apply_operation(self.repository.as_ref(), operation, &portfolio, conn)?;
        }

        Ok(())
    }
}
