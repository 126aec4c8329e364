//! Tests for boundary parsing of wire operations.

use rust_decimal_macros::dec;
use serde_json::{json, Value};

use crate::errors::{Error, ProjectionError};
use crate::portfolio::GroupTransactionType;
use crate::strands::{
    is_surgical, DriveOperation, GroupTransactionInput, OperationUpdate, PortfolioOperation,
    PortfolioState, SURGICAL_OPERATION_TYPES,
};

fn wire_op(op_type: &str, input: Value) -> OperationUpdate {
    OperationUpdate {
        op_type: op_type.to_string(),
        index: 5,
        skip: 0,
        input,
    }
}

/// Smallest payload each registered operation type accepts.
fn minimal_input(op_type: &str) -> Value {
    match op_type {
        "CREATE_SPV" | "CREATE_FIXED_INCOME_TYPE" => json!({ "id": "x", "name": "n" }),
        "CREATE_SERVICE_PROVIDER" => json!({
            "id": "x", "name": "n", "feeType": "fixed", "accountId": "a1"
        }),
        "CREATE_ACCOUNT" => json!({ "id": "x", "reference": "ref" }),
        "EDIT_GROUP_TRANSACTION_TYPE" => json!({ "id": "x", "type": "PrincipalDraw" }),
        "REMOVE_FEE_TRANSACTION_FROM_GROUP_TRANSACTION" => {
            json!({ "id": "x", "feeTransactionId": "f1" })
        }
        _ => json!({ "id": "x" }),
    }
}

#[test]
fn every_registered_type_parses_into_its_variant() {
    for op_type in SURGICAL_OPERATION_TYPES {
        let parsed = PortfolioOperation::parse(&wire_op(op_type, minimal_input(op_type)))
            .unwrap_or_else(|err| panic!("{op_type} failed to parse: {err}"));
        assert!(parsed.is_some(), "{op_type} was reported as not surgical");
    }
}

#[test]
fn unknown_operation_type_is_not_surgical() {
    assert!(!is_surgical("SET_DRIVE_ICON"));
    let parsed = PortfolioOperation::parse(&wire_op("SET_DRIVE_ICON", json!({ "id": "x" })));
    assert!(parsed.unwrap().is_none());
}

#[test]
fn malformed_payload_of_registered_type_is_a_hard_error() {
    // CREATE_SPV requires a name.
    let result = PortfolioOperation::parse(&wire_op("CREATE_SPV", json!({ "id": "spv1" })));
    match result {
        Err(Error::Projection(ProjectionError::MalformedOperation { op_type, .. })) => {
            assert_eq!(op_type, "CREATE_SPV");
        }
        other => panic!("expected MalformedOperation, got {other:?}"),
    }
}

#[test]
fn drive_add_file_parses() {
    let parsed = DriveOperation::parse(&wire_op(
        "ADD_FILE",
        json!({ "id": "doc1", "documentType": "makerdao/rwa-portfolio", "name": "Portfolio 1" }),
    ))
    .unwrap();
    match parsed {
        Some(DriveOperation::AddFile(input)) => {
            assert_eq!(input.id, "doc1");
            assert_eq!(input.document_type, "makerdao/rwa-portfolio");
        }
        other => panic!("expected AddFile, got {other:?}"),
    }
}

#[test]
fn drive_delete_node_parses() {
    let parsed =
        DriveOperation::parse(&wire_op("DELETE_NODE", json!({ "id": "doc1" }))).unwrap();
    assert!(matches!(parsed, Some(DriveOperation::DeleteNode(input)) if input.id == "doc1"));
}

#[test]
fn unrelated_drive_operations_are_ignored() {
    let parsed = DriveOperation::parse(&wire_op("SET_DRIVE_NAME", json!({ "name": "x" }))).unwrap();
    assert!(parsed.is_none());
}

#[test]
fn principal_draw_parts_carry_cash_and_fees_only() {
    let input: GroupTransactionInput = serde_json::from_value(json!({
        "type": "PrincipalDraw",
        "id": "g1",
        "cashTransaction": { "id": "c1", "amount": 1000.5 },
        "feeTransactions": [{ "id": "f1", "amount": 3 }, { "id": "f2", "amount": 4 }]
    }))
    .unwrap();

    let parts = input.into_parts();
    assert_eq!(parts.id, "g1");
    assert_eq!(parts.transaction_type, GroupTransactionType::PrincipalDraw);
    let cash = parts.cash_transaction.unwrap();
    assert_eq!(cash.id, "c1");
    assert_eq!(cash.amount, Some(dec!(1000.5)));
    assert!(parts.fixed_income_transaction.is_none());
    assert!(parts.interest_transaction.is_none());
    assert_eq!(parts.fee_transactions.len(), 2);
}

#[test]
fn interest_draw_parts_carry_the_interest_leg_only() {
    let input: GroupTransactionInput = serde_json::from_value(json!({
        "type": "InterestDraw",
        "id": "g2",
        "interestTransaction": { "id": "i1", "amount": 12 }
    }))
    .unwrap();

    let parts = input.into_parts();
    assert_eq!(parts.transaction_type, GroupTransactionType::InterestDraw);
    assert_eq!(parts.interest_transaction.unwrap().id, "i1");
    assert!(parts.cash_transaction.is_none());
    assert!(parts.fee_transactions.is_empty());
}

#[test]
fn asset_purchase_parts_carry_all_three_roles() {
    let input: GroupTransactionInput = serde_json::from_value(json!({
        "type": "AssetPurchase",
        "id": "g3",
        "cashTransaction": { "id": "c1" },
        "fixedIncomeTransaction": { "id": "x1" },
        "feeTransactions": [{ "id": "f1" }]
    }))
    .unwrap();

    let parts = input.into_parts();
    assert_eq!(parts.transaction_type, GroupTransactionType::AssetPurchase);
    assert_eq!(parts.cash_transaction.unwrap().id, "c1");
    assert_eq!(parts.fixed_income_transaction.unwrap().id, "x1");
    assert_eq!(parts.fee_transactions.len(), 1);
}

#[test]
fn fees_payment_parts_carry_fees_only() {
    let input: GroupTransactionInput = serde_json::from_value(json!({
        "type": "FeesPayment",
        "id": "g4",
        "feeTransactions": [{ "id": "f1" }, { "id": "f2" }, { "id": "f3" }]
    }))
    .unwrap();

    let parts = input.into_parts();
    assert_eq!(parts.transaction_type, GroupTransactionType::FeesPayment);
    assert_eq!(parts.fee_transactions.len(), 3);
    assert!(parts.cash_transaction.is_none());
    assert!(parts.fixed_income_transaction.is_none());
    assert!(parts.interest_transaction.is_none());
}

#[test]
fn portfolio_state_deserializes_upstream_field_names() {
    let state: PortfolioState = serde_json::from_value(json!({
        "principalLenderAccountId": "lender-1",
        "spvs": [{ "id": "spv1", "name": "Vehicle One" }],
        "feeTypes": [{ "id": "sp1", "name": "Servicer", "feeType": "fixed", "accountId": "a1" }],
        "fixedIncomeTypes": [{ "id": "fit1", "name": "T-Bill" }],
        "accounts": [{ "id": "a1", "reference": "0xabc" }],
        "portfolio": [
            { "type": "Cash", "id": "cash1", "currency": "USD" },
            { "type": "FixedIncome", "id": "bond1", "fixedIncomeTypeId": "fit1", "notional": 50000 }
        ],
        "transactions": [
            { "type": "FeesPayment", "id": "g1", "feeTransactions": [{ "id": "f1" }] }
        ]
    }))
    .unwrap();

    assert_eq!(state.principal_lender_account_id, "lender-1");
    assert_eq!(state.spvs.len(), 1);
    assert_eq!(state.service_providers.len(), 1);
    assert_eq!(state.fixed_income_types.len(), 1);
    assert_eq!(state.accounts.len(), 1);
    assert_eq!(state.assets.len(), 2);
    assert_eq!(state.transactions.len(), 1);
}

#[test]
fn empty_state_deserializes_to_defaults() {
    let state: PortfolioState = serde_json::from_value(json!({})).unwrap();
    assert!(state.spvs.is_empty());
    assert!(state.transactions.is_empty());
    assert!(state.principal_lender_account_id.is_empty());
}
