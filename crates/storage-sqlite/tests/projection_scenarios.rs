//! End-to-end projection scenarios against a real SQLite database.

mod common;

use common::{add_portfolio_document, document_strand, drive_strand, op, setup};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde_json::json;

use strandfolio_core::errors::{Error, ProjectionError};
use strandfolio_storage_sqlite::projection::PortfolioDB;
use strandfolio_storage_sqlite::schema::{
    accounts, assets, base_transactions, base_transactions_on_group_transactions,
    fixed_income_types, group_transactions, portfolios, service_providers, spvs,
    spvs_on_portfolios,
};

fn portfolio(conn: &mut SqliteConnection, drive_id: &str, document_id: &str) -> Option<PortfolioDB> {
    portfolios::table
        .filter(portfolios::drive_id.eq(drive_id))
        .filter(portfolios::document_id.eq(document_id))
        .select(PortfolioDB::as_select())
        .first(conn)
        .optional()
        .unwrap()
}

fn spv_ids(conn: &mut SqliteConnection, portfolio_id: &str) -> Vec<String> {
    spvs::table
        .filter(spvs::portfolio_id.eq(portfolio_id))
        .select(spvs::id)
        .order(spvs::id.asc())
        .load(conn)
        .unwrap()
}

#[test]
fn add_file_on_empty_drive_creates_the_portfolio_row() {
    let db = setup();
    db.apply(&[add_portfolio_document("d1", "doc1", 7)]).unwrap();

    let mut conn = db.conn();
    let portfolio = portfolio(&mut conn, "d1", "doc1").expect("portfolio row");
    assert_eq!(portfolio.drive_id, "d1");
    assert_eq!(portfolio.document_id, "doc1");
    assert_eq!(portfolio.principal_lender_account_id, "");
}

#[test]
fn add_file_of_another_document_type_is_not_tracked() {
    let db = setup();
    db.apply(&[drive_strand(
        "d1",
        vec![op(
            "ADD_FILE",
            3,
            json!({ "id": "doc9", "documentType": "powerhouse/budget-statement" }),
        )],
    )])
    .unwrap();

    let mut conn = db.conn();
    assert!(portfolio(&mut conn, "d1", "doc9").is_none());

    // A later content strand for that document is skipped without error.
    db.apply(&[document_strand(
        "d1",
        "doc9",
        vec![op("CREATE_SPV", 4, json!({ "id": "spv1", "name": "V" }))],
        json!({}),
    )])
    .unwrap();
    let spv_count: i64 = spvs::table.select(count_star()).first(&mut conn).unwrap();
    assert_eq!(spv_count, 0);
}

#[test]
fn surgical_create_spv_adds_exactly_one_row_without_rebuilding() {
    let db = setup();
    db.apply(&[add_portfolio_document("d1", "doc1", 7)]).unwrap();

    // The state snapshot deliberately disagrees with the operation: if the
    // projector rebuilt, the row set would come from the state instead.
    db.apply(&[document_strand(
        "d1",
        "doc1",
        vec![op("CREATE_SPV", 4, json!({ "id": "spv1", "name": "Vehicle One" }))],
        json!({ "spvs": [{ "id": "from-state", "name": "Should Not Appear" }] }),
    )])
    .unwrap();

    let mut conn = db.conn();
    let portfolio = portfolio(&mut conn, "d1", "doc1").unwrap();
    assert_eq!(spv_ids(&mut conn, &portfolio.id), vec!["spv1"]);
}

#[test]
fn reset_strand_rebuilds_the_subgraph_from_state() {
    let db = setup();
    db.apply(&[add_portfolio_document("d1", "doc1", 7)]).unwrap();

    // Seed some rows surgically.
    db.apply(&[document_strand(
        "d1",
        "doc1",
        vec![
            op("CREATE_SPV", 4, json!({ "id": "stale-spv", "name": "Old" })),
            op("CREATE_ACCOUNT", 5, json!({ "id": "stale-acc", "reference": "0xold" })),
        ],
        json!({}),
    )])
    .unwrap();

    // History replayed from the beginning: even though CREATE_SPV itself is
    // surgical, the whole subgraph must be regenerated from the state.
    db.apply(&[document_strand(
        "d1",
        "doc1",
        vec![op("CREATE_SPV", 0, json!({ "id": "op-spv", "name": "Ignored" }))],
        json!({
            "principalLenderAccountId": "lender-1",
            "spvs": [{ "id": "fresh-spv", "name": "New" }],
            "accounts": [{ "id": "fresh-acc", "reference": "0xnew" }]
        }),
    )])
    .unwrap();

    let mut conn = db.conn();
    let portfolio = portfolio(&mut conn, "d1", "doc1").unwrap();
    assert_eq!(portfolio.principal_lender_account_id, "lender-1");
    assert_eq!(spv_ids(&mut conn, &portfolio.id), vec!["fresh-spv"]);

    let account_ids: Vec<String> = accounts::table
        .filter(accounts::portfolio_id.eq(&portfolio.id))
        .select(accounts::id)
        .load(&mut conn)
        .unwrap();
    assert_eq!(account_ids, vec!["fresh-acc"]);
}

#[test]
fn unregistered_operation_type_rebuilds_from_state() {
    let db = setup();
    db.apply(&[add_portfolio_document("d1", "doc1", 7)]).unwrap();

    db.apply(&[document_strand(
        "d1",
        "doc1",
        vec![
            op("CREATE_SPV", 4, json!({ "id": "surgical-spv", "name": "A" })),
            op("SOME_FUTURE_OPERATION", 5, json!({ "whatever": true })),
        ],
        json!({ "spvs": [{ "id": "state-spv", "name": "B" }] }),
    )])
    .unwrap();

    let mut conn = db.conn();
    let portfolio = portfolio(&mut conn, "d1", "doc1").unwrap();
    // Nothing from the surgical prefix; everything from the state.
    assert_eq!(spv_ids(&mut conn, &portfolio.id), vec!["state-spv"]);
}

#[test]
fn delete_node_removes_the_portfolio_and_every_descendant() {
    let db = setup();
    db.apply(&[add_portfolio_document("d1", "doc1", 7)]).unwrap();
    db.apply(&[document_strand(
        "d1",
        "doc1",
        vec![
            op("CREATE_SPV", 4, json!({ "id": "spv1", "name": "V" })),
            op("CREATE_ACCOUNT", 5, json!({ "id": "a1", "reference": "0xabc" })),
            op("CREATE_FIXED_INCOME_TYPE", 6, json!({ "id": "fit1", "name": "T-Bill" })),
            op(
                "CREATE_SERVICE_PROVIDER",
                7,
                json!({ "id": "sp1", "name": "Servicer", "feeType": "fixed", "accountId": "a1" }),
            ),
            op("CREATE_CASH_ASSET", 8, json!({ "id": "cash1", "currency": "USD" })),
            op(
                "CREATE_PRINCIPAL_DRAW_GROUP_TRANSACTION",
                9,
                json!({
                    "id": "g1",
                    "cashTransaction": { "id": "c1", "amount": 100 },
                    "feeTransactions": [{ "id": "f1", "amount": 1 }]
                }),
            ),
        ],
        json!({}),
    )])
    .unwrap();

    db.apply(&[drive_strand(
        "d1",
        vec![op("DELETE_NODE", 10, json!({ "id": "doc1" }))],
    )])
    .unwrap();

    let mut conn = db.conn();
    assert!(portfolio(&mut conn, "d1", "doc1").is_none());

    let counts: Vec<i64> = vec![
        spvs::table.select(count_star()).first(&mut conn).unwrap(),
        service_providers::table.select(count_star()).first(&mut conn).unwrap(),
        fixed_income_types::table.select(count_star()).first(&mut conn).unwrap(),
        accounts::table.select(count_star()).first(&mut conn).unwrap(),
        assets::table.select(count_star()).first(&mut conn).unwrap(),
        group_transactions::table.select(count_star()).first(&mut conn).unwrap(),
        base_transactions::table.select(count_star()).first(&mut conn).unwrap(),
        base_transactions_on_group_transactions::table
            .select(count_star())
            .first(&mut conn)
            .unwrap(),
        spvs_on_portfolios::table.select(count_star()).first(&mut conn).unwrap(),
    ];
    assert!(counts.iter().all(|&c| c == 0), "descendants left: {counts:?}");
}

#[test]
fn principal_draw_links_cash_directly_and_fees_through_the_join_table() {
    let db = setup();
    db.apply(&[
        add_portfolio_document("d1", "doc1", 7),
        document_strand(
            "d1",
            "doc1",
            vec![op(
                "CREATE_PRINCIPAL_DRAW_GROUP_TRANSACTION",
                8,
                json!({
                    "id": "g1",
                    "cashTransaction": { "id": "c1", "amount": 1000.5 },
                    "feeTransactions": [{ "id": "f1", "amount": 3 }]
                }),
            )],
            json!({}),
        ),
    ])
    .unwrap();

    let mut conn = db.conn();

    let (tx_type, cash_id): (String, Option<String>) = group_transactions::table
        .filter(group_transactions::id.eq("g1"))
        .select((
            group_transactions::transaction_type,
            group_transactions::cash_transaction_id,
        ))
        .first(&mut conn)
        .unwrap();
    assert_eq!(tx_type, "PrincipalDraw");
    assert_eq!(cash_id.as_deref(), Some("c1"));

    let base_ids: Vec<String> = base_transactions::table
        .select(base_transactions::id)
        .order(base_transactions::id.asc())
        .load(&mut conn)
        .unwrap();
    assert_eq!(base_ids, vec!["c1", "f1"]);

    // Only the fee leg has a join row.
    let joined: Vec<(String, String)> = base_transactions_on_group_transactions::table
        .select((
            base_transactions_on_group_transactions::base_transaction_id,
            base_transactions_on_group_transactions::group_transaction_id,
        ))
        .load(&mut conn)
        .unwrap();
    assert_eq!(joined, vec![("f1".to_string(), "g1".to_string())]);
}

#[test]
fn a_failed_operation_rolls_back_the_whole_batch() {
    let db = setup();
    db.apply(&[add_portfolio_document("d1", "doc1", 7)]).unwrap();

    let result = db.apply(&[document_strand(
        "d1",
        "doc1",
        vec![
            op("CREATE_SPV", 4, json!({ "id": "spv1", "name": "V" })),
            // No such account: MissingTargetRow aborts the transaction.
            op("EDIT_ACCOUNT", 5, json!({ "id": "ghost", "reference": "0x0" })),
        ],
        json!({}),
    )]);

    match result {
        Err(Error::Projection(ProjectionError::MissingTargetRow { entity, .. })) => {
            assert_eq!(entity, "Account");
        }
        other => panic!("expected MissingTargetRow, got {other:?}"),
    }

    // The spv created earlier in the same strand must be gone.
    let mut conn = db.conn();
    let spv_count: i64 = spvs::table.select(count_star()).first(&mut conn).unwrap();
    assert_eq!(spv_count, 0);
}

#[test]
fn a_document_can_be_added_and_filled_within_one_batch() {
    let db = setup();
    db.apply(&[
        add_portfolio_document("d1", "doc1", 0),
        document_strand(
            "d1",
            "doc1",
            vec![op("CREATE_SPV", 1, json!({ "id": "spv1", "name": "V" }))],
            json!({}),
        ),
    ])
    .unwrap();

    let mut conn = db.conn();
    let portfolio = portfolio(&mut conn, "d1", "doc1").unwrap();
    assert_eq!(spv_ids(&mut conn, &portfolio.id), vec!["spv1"]);
}
