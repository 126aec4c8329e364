//! Wire types for strands delivered by the upstream operation log.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DRIVE_DOCUMENT_TYPE, LISTENER_ID, PORTFOLIO_DOCUMENT_TYPE};

/// One operation inside a strand, as delivered on the wire.
///
/// `input` stays untyped here; the projector parses it into a closed sum
/// type ([`DriveOperation`]/[`PortfolioOperation`]) before any handler sees
/// it.
///
/// [`DriveOperation`]: super::DriveOperation
/// [`PortfolioOperation`]: super::PortfolioOperation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationUpdate {
    #[serde(rename = "type")]
    pub op_type: String,
    pub index: i64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub input: Value,
}

/// An ordered batch of operations for one document (or for the drive itself)
/// plus the authoritative document state after applying them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strand {
    pub drive_id: String,
    /// Empty for drive-level strands.
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub operations: Vec<OperationUpdate>,
    /// Authoritative state snapshot as of the last operation. Parsed into
    /// [`PortfolioState`] only when a rebuild is taken.
    ///
    /// [`PortfolioState`]: super::PortfolioState
    #[serde(default)]
    pub state: Value,
}

impl Strand {
    /// Drive strands describe the collection of documents itself.
    pub fn is_drive_strand(&self) -> bool {
        self.document_id.is_empty()
    }

    /// Whether this strand represents a non-monotonic rewrite of prior
    /// history (revert or compaction collapsing to the start), which forces
    /// a full rebuild of the projection.
    ///
    /// True when the operation list is non-empty and either the first
    /// operation's index is zero, or the last operation's `index - skip`
    /// is zero.
    pub fn signals_reset(&self) -> bool {
        match (self.operations.first(), self.operations.last()) {
            (Some(first), Some(last)) => first.index == 0 || last.index - last.skip == 0,
            _ => false,
        }
    }
}

/// Filter describing which strands a listener wants delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerFilter {
    pub branch: Vec<String>,
    pub document_id: Vec<String>,
    pub document_type: Vec<String>,
    pub scope: Vec<String>,
}

/// Registration descriptor handed to the upstream delivery mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverOptions {
    pub listener_id: String,
    pub label: String,
    pub block: bool,
    pub filter: ListenerFilter,
}

impl ReceiverOptions {
    /// Subscription covering portfolio documents and the drive itself on the
    /// main branch.
    pub fn portfolio_defaults() -> Self {
        Self {
            listener_id: LISTENER_ID.to_string(),
            label: LISTENER_ID.to_string(),
            block: false,
            filter: ListenerFilter {
                branch: vec!["main".to_string()],
                document_id: vec!["*".to_string()],
                document_type: vec![
                    PORTFOLIO_DOCUMENT_TYPE.to_string(),
                    DRIVE_DOCUMENT_TYPE.to_string(),
                ],
                scope: vec!["*".to_string()],
            },
        }
    }
}
