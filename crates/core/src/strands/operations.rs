//! Typed operations parsed from the wire at the router boundary.
//!
//! Handlers never see untyped payloads: an operation either parses into one
//! of the closed sum types below, or it is not a surgical operation and the
//! strand takes the rebuild path.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::state::{
    AccountInput, AssetGroupTransactionInput, BaseTransactionInput, CashAssetInput,
    CashGroupTransactionInput, FeesGroupTransactionInput, FixedIncomeAssetInput,
    FixedIncomeTypeInput, InterestGroupTransactionInput, ServiceProviderInput, SpvInput,
};
use super::strands_model::OperationUpdate;
use crate::errors::{ProjectionError, Result};
use crate::portfolio::{
    AccountUpdate, AssetUpdate, BaseTransactionUpdate, FixedIncomeTypeUpdate,
    GroupTransactionType, ServiceProviderUpdate, SpvUpdate,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

// === Drive-level operations ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFileInput {
    pub id: String,
    pub document_type: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNodeInput {
    pub id: String,
}

/// Structural operations on the drive's document collection. Everything
/// else the drive does (metadata, folders, listeners) is invisible to the
/// read model.
#[derive(Debug, Clone)]
pub enum DriveOperation {
    AddFile(AddFileInput),
    DeleteNode(DeleteNodeInput),
}

impl DriveOperation {
    /// Parses one drive operation. `Ok(None)` means the operation type is of
    /// no interest to the read model and must be ignored.
    pub fn parse(op: &OperationUpdate) -> Result<Option<Self>> {
        let parsed = match op.op_type.as_str() {
            "ADD_FILE" => Some(DriveOperation::AddFile(parse_input(op)?)),
            "DELETE_NODE" => Some(DriveOperation::DeleteNode(parse_input(op)?)),
            _ => None,
        };
        Ok(parsed)
    }
}

// === Document-level edit/delete payloads ===
//
// Create payloads are the state input types in `state.rs`; edits carry the
// same natural key plus only the fields being changed.

/// Shared payload of every delete-by-id operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteInput {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSpvInput {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<EditSpvInput> for SpvUpdate {
    fn from(input: EditSpvInput) -> Self {
        SpvUpdate {
            id: input.id,
            name: input.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditServiceProviderInput {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fee_type: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

impl From<EditServiceProviderInput> for ServiceProviderUpdate {
    fn from(input: EditServiceProviderInput) -> Self {
        ServiceProviderUpdate {
            id: input.id,
            name: input.name,
            fee_type: input.fee_type,
            account_id: input.account_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFixedIncomeTypeInput {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<EditFixedIncomeTypeInput> for FixedIncomeTypeUpdate {
    fn from(input: EditFixedIncomeTypeInput) -> Self {
        FixedIncomeTypeUpdate {
            id: input.id,
            name: input.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditAccountInput {
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl From<EditAccountInput> for AccountUpdate {
    fn from(input: EditAccountInput) -> Self {
        AccountUpdate {
            id: input.id,
            reference: input.reference,
            label: input.label,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCashAssetInput {
    pub id: String,
    #[serde(default)]
    pub spv_id: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl From<EditCashAssetInput> for AssetUpdate {
    fn from(input: EditCashAssetInput) -> Self {
        AssetUpdate {
            asset_ref_id: input.id,
            spv_id: input.spv_id,
            currency: input.currency,
            ..AssetUpdate::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFixedIncomeAssetInput {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub spv_id: Option<String>,
    #[serde(default)]
    pub fixed_income_type_id: Option<String>,
    #[serde(default)]
    pub maturity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notional: Option<Decimal>,
    #[serde(default)]
    pub purchase_price: Option<Decimal>,
    #[serde(default)]
    pub purchase_proceeds: Option<Decimal>,
    #[serde(default)]
    pub total_discount: Option<Decimal>,
    #[serde(default)]
    pub annualized_yield: Option<Decimal>,
    #[serde(default)]
    pub coupon: Option<Decimal>,
    #[serde(rename = "ISIN", default)]
    pub isin: Option<String>,
    #[serde(rename = "CUSIP", default)]
    pub cusip: Option<String>,
}

impl From<EditFixedIncomeAssetInput> for AssetUpdate {
    fn from(input: EditFixedIncomeAssetInput) -> Self {
        AssetUpdate {
            asset_ref_id: input.id,
            name: input.name,
            spv_id: input.spv_id,
            currency: None,
            fixed_income_type_id: input.fixed_income_type_id,
            maturity: input.maturity,
            purchase_date: input.purchase_date,
            notional: input.notional,
            purchase_price: input.purchase_price,
            purchase_proceeds: input.purchase_proceeds,
            total_discount: input.total_discount,
            annualized_yield: input.annualized_yield,
            coupon: input.coupon,
            isin: input.isin,
            cusip: input.cusip,
        }
    }
}

impl From<BaseTransactionInput> for BaseTransactionUpdate {
    fn from(input: BaseTransactionInput) -> Self {
        BaseTransactionUpdate {
            id: input.id,
            asset_id: input.asset_id,
            amount: input.amount,
            entry_time: input.entry_time,
            trade_time: input.trade_time,
            settlement_time: input.settlement_time,
            tx_ref: input.tx_ref,
            account_id: input.account_id,
            counter_party_account_id: input.counter_party_account_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditGroupTransactionTypeInput {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: GroupTransactionType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFeeTransactionsInput {
    /// Group transaction the fees attach to.
    pub id: String,
    #[serde(default)]
    pub fee_transactions: Vec<BaseTransactionInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFeeTransactionInput {
    /// Group transaction the fee is detached from.
    pub id: String,
    pub fee_transaction_id: String,
}

// === The surgical operation registry ===

/// Every document operation the registry can apply incrementally, tagged
/// with its wire operation-type name.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "input")]
pub enum PortfolioOperation {
    #[serde(rename = "CREATE_SPV")]
    CreateSpv(SpvInput),
    #[serde(rename = "EDIT_SPV")]
    EditSpv(EditSpvInput),
    #[serde(rename = "DELETE_SPV")]
    DeleteSpv(DeleteInput),

    #[serde(rename = "CREATE_SERVICE_PROVIDER")]
    CreateServiceProvider(ServiceProviderInput),
    #[serde(rename = "EDIT_SERVICE_PROVIDER")]
    EditServiceProvider(EditServiceProviderInput),
    #[serde(rename = "DELETE_SERVICE_PROVIDER")]
    DeleteServiceProvider(DeleteInput),

    #[serde(rename = "CREATE_FIXED_INCOME_TYPE")]
    CreateFixedIncomeType(FixedIncomeTypeInput),
    #[serde(rename = "EDIT_FIXED_INCOME_TYPE")]
    EditFixedIncomeType(EditFixedIncomeTypeInput),
    #[serde(rename = "DELETE_FIXED_INCOME_TYPE")]
    DeleteFixedIncomeType(DeleteInput),

    #[serde(rename = "CREATE_ACCOUNT")]
    CreateAccount(AccountInput),
    #[serde(rename = "EDIT_ACCOUNT")]
    EditAccount(EditAccountInput),
    #[serde(rename = "DELETE_ACCOUNT")]
    DeleteAccount(DeleteInput),

    #[serde(rename = "CREATE_CASH_ASSET")]
    CreateCashAsset(CashAssetInput),
    #[serde(rename = "EDIT_CASH_ASSET")]
    EditCashAsset(EditCashAssetInput),
    #[serde(rename = "DELETE_CASH_ASSET")]
    DeleteCashAsset(DeleteInput),

    #[serde(rename = "CREATE_FIXED_INCOME_ASSET")]
    CreateFixedIncomeAsset(FixedIncomeAssetInput),
    #[serde(rename = "EDIT_FIXED_INCOME_ASSET")]
    EditFixedIncomeAsset(EditFixedIncomeAssetInput),
    #[serde(rename = "DELETE_FIXED_INCOME_ASSET")]
    DeleteFixedIncomeAsset(DeleteInput),

    #[serde(rename = "CREATE_PRINCIPAL_DRAW_GROUP_TRANSACTION")]
    CreatePrincipalDrawGroupTransaction(CashGroupTransactionInput),
    #[serde(rename = "CREATE_PRINCIPAL_RETURN_GROUP_TRANSACTION")]
    CreatePrincipalReturnGroupTransaction(CashGroupTransactionInput),
    #[serde(rename = "CREATE_ASSET_PURCHASE_GROUP_TRANSACTION")]
    CreateAssetPurchaseGroupTransaction(AssetGroupTransactionInput),
    #[serde(rename = "CREATE_ASSET_SALE_GROUP_TRANSACTION")]
    CreateAssetSaleGroupTransaction(AssetGroupTransactionInput),
    #[serde(rename = "CREATE_INTEREST_DRAW_GROUP_TRANSACTION")]
    CreateInterestDrawGroupTransaction(InterestGroupTransactionInput),
    #[serde(rename = "CREATE_INTEREST_RETURN_GROUP_TRANSACTION")]
    CreateInterestReturnGroupTransaction(InterestGroupTransactionInput),
    #[serde(rename = "CREATE_FEES_PAYMENT_GROUP_TRANSACTION")]
    CreateFeesPaymentGroupTransaction(FeesGroupTransactionInput),

    #[serde(rename = "EDIT_PRINCIPAL_DRAW_GROUP_TRANSACTION")]
    EditPrincipalDrawGroupTransaction(CashGroupTransactionInput),
    #[serde(rename = "EDIT_PRINCIPAL_RETURN_GROUP_TRANSACTION")]
    EditPrincipalReturnGroupTransaction(CashGroupTransactionInput),
    #[serde(rename = "EDIT_ASSET_PURCHASE_GROUP_TRANSACTION")]
    EditAssetPurchaseGroupTransaction(AssetGroupTransactionInput),
    #[serde(rename = "EDIT_ASSET_SALE_GROUP_TRANSACTION")]
    EditAssetSaleGroupTransaction(AssetGroupTransactionInput),
    #[serde(rename = "EDIT_INTEREST_DRAW_GROUP_TRANSACTION")]
    EditInterestDrawGroupTransaction(InterestGroupTransactionInput),
    #[serde(rename = "EDIT_INTEREST_RETURN_GROUP_TRANSACTION")]
    EditInterestReturnGroupTransaction(InterestGroupTransactionInput),
    #[serde(rename = "EDIT_FEES_PAYMENT_GROUP_TRANSACTION")]
    EditFeesPaymentGroupTransaction(FeesGroupTransactionInput),

    #[serde(rename = "EDIT_GROUP_TRANSACTION_TYPE")]
    EditGroupTransactionType(EditGroupTransactionTypeInput),
    #[serde(rename = "ADD_FEE_TRANSACTIONS_TO_GROUP_TRANSACTION")]
    AddFeeTransactionsToGroupTransaction(AddFeeTransactionsInput),
    #[serde(rename = "EDIT_FEE_TRANSACTION")]
    EditFeeTransaction(BaseTransactionInput),
    #[serde(rename = "REMOVE_FEE_TRANSACTION_FROM_GROUP_TRANSACTION")]
    RemoveFeeTransactionFromGroupTransaction(RemoveFeeTransactionInput),
    #[serde(rename = "DELETE_GROUP_TRANSACTION")]
    DeleteGroupTransaction(DeleteInput),
}

/// Wire names of every operation the registry can apply surgically, in the
/// order of the enum above. A strand containing any operation type outside
/// this table forces a full rebuild.
pub const SURGICAL_OPERATION_TYPES: &[&str] = &[
    "CREATE_SPV",
    "EDIT_SPV",
    "DELETE_SPV",
    "CREATE_SERVICE_PROVIDER",
    "EDIT_SERVICE_PROVIDER",
    "DELETE_SERVICE_PROVIDER",
    "CREATE_FIXED_INCOME_TYPE",
    "EDIT_FIXED_INCOME_TYPE",
    "DELETE_FIXED_INCOME_TYPE",
    "CREATE_ACCOUNT",
    "EDIT_ACCOUNT",
    "DELETE_ACCOUNT",
    "CREATE_CASH_ASSET",
    "EDIT_CASH_ASSET",
    "DELETE_CASH_ASSET",
    "CREATE_FIXED_INCOME_ASSET",
    "EDIT_FIXED_INCOME_ASSET",
    "DELETE_FIXED_INCOME_ASSET",
    "CREATE_PRINCIPAL_DRAW_GROUP_TRANSACTION",
    "CREATE_PRINCIPAL_RETURN_GROUP_TRANSACTION",
    "CREATE_ASSET_PURCHASE_GROUP_TRANSACTION",
    "CREATE_ASSET_SALE_GROUP_TRANSACTION",
    "CREATE_INTEREST_DRAW_GROUP_TRANSACTION",
    "CREATE_INTEREST_RETURN_GROUP_TRANSACTION",
    "CREATE_FEES_PAYMENT_GROUP_TRANSACTION",
    "EDIT_PRINCIPAL_DRAW_GROUP_TRANSACTION",
    "EDIT_PRINCIPAL_RETURN_GROUP_TRANSACTION",
    "EDIT_ASSET_PURCHASE_GROUP_TRANSACTION",
    "EDIT_ASSET_SALE_GROUP_TRANSACTION",
    "EDIT_INTEREST_DRAW_GROUP_TRANSACTION",
    "EDIT_INTEREST_RETURN_GROUP_TRANSACTION",
    "EDIT_FEES_PAYMENT_GROUP_TRANSACTION",
    "EDIT_GROUP_TRANSACTION_TYPE",
    "ADD_FEE_TRANSACTIONS_TO_GROUP_TRANSACTION",
    "EDIT_FEE_TRANSACTION",
    "REMOVE_FEE_TRANSACTION_FROM_GROUP_TRANSACTION",
    "DELETE_GROUP_TRANSACTION",
];

/// Whether an operation type is in the surgical registry.
pub fn is_surgical(op_type: &str) -> bool {
    SURGICAL_OPERATION_TYPES.contains(&op_type)
}

impl PortfolioOperation {
    /// Parses one document operation. `Ok(None)` means the operation type is
    /// not in the registry and the strand must take the rebuild path. A
    /// registered type with an unparseable payload is a hard error.
    pub fn parse(op: &OperationUpdate) -> Result<Option<Self>> {
        if !is_surgical(&op.op_type) {
            return Ok(None);
        }
        let tagged = json!({ "type": op.op_type, "input": op.input });
        serde_json::from_value(tagged).map(Some).map_err(|err| {
            ProjectionError::MalformedOperation {
                op_type: op.op_type.clone(),
                reason: err.to_string(),
            }
            .into()
        })
    }
}

fn parse_input<T: serde::de::DeserializeOwned>(op: &OperationUpdate) -> Result<T> {
    serde_json::from_value(op.input.clone()).map_err(|err| {
        ProjectionError::MalformedOperation {
            op_type: op.op_type.clone(),
            reason: err.to_string(),
        }
        .into()
    })
}
