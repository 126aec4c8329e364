/// Document type of portfolio documents in the upstream drive.
///
/// Drive-level `ADD_FILE` operations carrying any other document type are
/// ignored by the projection.
pub const PORTFOLIO_DOCUMENT_TYPE: &str = "makerdao/rwa-portfolio";

/// Document type of the drive itself.
pub const DRIVE_DOCUMENT_TYPE: &str = "powerhouse/document-drive";

/// Listener id under which the projection registers with the upstream
/// delivery mechanism.
pub const LISTENER_ID: &str = "portfolio-read-model";
