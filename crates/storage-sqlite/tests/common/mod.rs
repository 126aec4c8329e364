//! Shared harness for projection integration tests: a throwaway on-disk
//! database with migrations applied, plus strand builders.

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use strandfolio_core::projector::{EmptyInitialState, ProjectorService};
use strandfolio_core::strands::{OperationUpdate, Strand};
use strandfolio_storage_sqlite::{
    create_pool, get_connection, run_migrations, DbConnection, DbPool, PortfolioRepository,
    StorageError,
};

pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub projector: Arc<ProjectorService>,
    _dir: TempDir,
}

pub fn setup() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir
        .path()
        .join("projection.db")
        .to_string_lossy()
        .to_string();
    let pool = create_pool(&db_path).expect("pool");
    run_migrations(&pool).expect("migrations");

    let projector = Arc::new(ProjectorService::new(
        Arc::new(PortfolioRepository::new()),
        Arc::new(EmptyInitialState),
    ));

    TestDb {
        pool,
        projector,
        _dir: dir,
    }
}

impl TestDb {
    pub fn conn(&self) -> DbConnection {
        get_connection(&self.pool).expect("connection")
    }

    /// Applies a batch the way the listener does: one immediate transaction
    /// around the whole batch.
    pub fn apply(&self, strands: &[Strand]) -> strandfolio_core::Result<()> {
        let mut conn = self.conn();
        conn.immediate_transaction::<_, StorageError, _>(|c| {
            self.projector
                .apply_strands(strands, c)
                .map_err(StorageError::from)
        })
        .map_err(strandfolio_core::Error::from)
    }
}

pub fn op(op_type: &str, index: i64, input: Value) -> OperationUpdate {
    OperationUpdate {
        op_type: op_type.to_string(),
        index,
        skip: 0,
        input,
    }
}

pub fn drive_strand(drive_id: &str, operations: Vec<OperationUpdate>) -> Strand {
    Strand {
        drive_id: drive_id.to_string(),
        document_id: String::new(),
        operations,
        state: json!({}),
    }
}

pub fn document_strand(
    drive_id: &str,
    document_id: &str,
    operations: Vec<OperationUpdate>,
    state: Value,
) -> Strand {
    Strand {
        drive_id: drive_id.to_string(),
        document_id: document_id.to_string(),
        operations,
        state,
    }
}

/// Drive strand adding one portfolio document at the given operation index.
pub fn add_portfolio_document(drive_id: &str, document_id: &str, index: i64) -> Strand {
    drive_strand(
        drive_id,
        vec![op(
            "ADD_FILE",
            index,
            json!({ "id": document_id, "documentType": "makerdao/rwa-portfolio" }),
        )],
    )
}
