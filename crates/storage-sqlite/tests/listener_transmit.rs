//! The listener facade end to end: batches go through the single-writer
//! actor, one transaction per batch.

mod common;

use common::{add_portfolio_document, document_strand, op, setup};
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde_json::json;

use strandfolio_core::errors::{Error, ProjectionError};
use strandfolio_storage_sqlite::schema::{portfolios, spvs};
use strandfolio_storage_sqlite::{spawn_writer, ProjectionListener, StrandReceiverTrait};

#[tokio::test]
async fn transmit_applies_a_batch_atomically() {
    let db = setup();
    let listener = ProjectionListener::new(db.projector.clone(), spawn_writer(db.pool.clone()));

    listener
        .transmit(vec![
            add_portfolio_document("d1", "doc1", 3),
            document_strand(
                "d1",
                "doc1",
                vec![op("CREATE_SPV", 4, json!({ "id": "spv1", "name": "V" }))],
                json!({}),
            ),
        ])
        .await
        .unwrap();

    let mut conn = db.conn();
    let portfolio_count: i64 = portfolios::table
        .select(count_star())
        .first(&mut conn)
        .unwrap();
    let spv_count: i64 = spvs::table.select(count_star()).first(&mut conn).unwrap();
    assert_eq!((portfolio_count, spv_count), (1, 1));
}

#[tokio::test]
async fn transmit_rolls_back_a_failing_batch_and_keeps_the_typed_error() {
    let db = setup();
    let listener = ProjectionListener::new(db.projector.clone(), spawn_writer(db.pool.clone()));

    listener
        .transmit(vec![add_portfolio_document("d1", "doc1", 3)])
        .await
        .unwrap();

    let result = listener
        .transmit(vec![document_strand(
            "d1",
            "doc1",
            vec![
                op("CREATE_SPV", 4, json!({ "id": "spv1", "name": "V" })),
                op("EDIT_SPV", 5, json!({ "id": "ghost", "name": "X" })),
            ],
            json!({}),
        )])
        .await;

    assert!(matches!(
        result,
        Err(Error::Projection(ProjectionError::MissingTargetRow { .. }))
    ));

    let mut conn = db.conn();
    let spv_count: i64 = spvs::table.select(count_star()).first(&mut conn).unwrap();
    assert_eq!(spv_count, 0);

    // The batch before the failing one is untouched.
    let portfolio_count: i64 = portfolios::table
        .select(count_star())
        .first(&mut conn)
        .unwrap();
    assert_eq!(portfolio_count, 1);
}

#[tokio::test]
async fn receiver_options_cover_portfolio_and_drive_documents() {
    let options = ProjectionListener::receiver_options();
    assert_eq!(options.listener_id, "portfolio-read-model");
    assert!(options
        .filter
        .document_type
        .contains(&"makerdao/rwa-portfolio".to_string()));
    assert!(options
        .filter
        .document_type
        .contains(&"powerhouse/document-drive".to_string()));
}
