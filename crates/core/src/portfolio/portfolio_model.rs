//! Read-model domain entities.
//!
//! Every non-root entity is keyed by its own id *and* the surrogate id of the
//! owning [`Portfolio`]; no row outlives its portfolio.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

/// Root projected entity for one portfolio document in a drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    /// Surrogate id, generated by the store on first upsert.
    pub id: String,
    pub drive_id: String,
    pub document_id: String,
    pub principal_lender_account_id: String,
}

/// Special-purpose vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spv {
    pub id: String,
    pub portfolio_id: String,
    pub name: String,
}

/// Fee-receiving counterparty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvider {
    pub id: String,
    pub portfolio_id: String,
    pub name: String,
    pub fee_type: String,
    pub account_id: String,
}

/// Taxonomy entry for fixed-income assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedIncomeType {
    pub id: String,
    pub portfolio_id: String,
    pub name: String,
}

/// Ledger account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub portfolio_id: String,
    pub reference: String,
    pub label: Option<String>,
}

/// Discriminator for [`Asset`]. Derived from the operation or state entry
/// that produced the row, never supplied by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetType {
    Cash,
    FixedIncome,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Cash => "Cash",
            AssetType::FixedIncome => "FixedIncome",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(AssetType::Cash),
            "FixedIncome" => Ok(AssetType::FixedIncome),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown asset type '{other}'"
            ))),
        }
    }
}

/// A cash or fixed-income position.
///
/// Cash assets populate `spv_id`/`currency`; fixed-income assets populate the
/// remaining columns. The row keeps one shape for both so the projection
/// stays a single table, mirroring the upstream document model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Id of the asset in the source document ("ref" because the surrogate
    /// row identity is the pair with `portfolio_id`).
    pub asset_ref_id: String,
    pub portfolio_id: String,
    pub asset_type: AssetType,
    pub name: Option<String>,
    pub spv_id: Option<String>,
    pub currency: Option<String>,
    pub fixed_income_type_id: Option<String>,
    pub maturity: Option<DateTime<Utc>>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub notional: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    pub purchase_proceeds: Option<Decimal>,
    pub total_discount: Option<Decimal>,
    pub annualized_yield: Option<Decimal>,
    pub coupon: Option<Decimal>,
    pub isin: Option<String>,
    pub cusip: Option<String>,
}

/// The seven composite transaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupTransactionType {
    PrincipalDraw,
    PrincipalReturn,
    AssetPurchase,
    AssetSale,
    InterestDraw,
    InterestReturn,
    FeesPayment,
}

impl GroupTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupTransactionType::PrincipalDraw => "PrincipalDraw",
            GroupTransactionType::PrincipalReturn => "PrincipalReturn",
            GroupTransactionType::AssetPurchase => "AssetPurchase",
            GroupTransactionType::AssetSale => "AssetSale",
            GroupTransactionType::InterestDraw => "InterestDraw",
            GroupTransactionType::InterestReturn => "InterestReturn",
            GroupTransactionType::FeesPayment => "FeesPayment",
        }
    }
}

impl fmt::Display for GroupTransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupTransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PrincipalDraw" => Ok(GroupTransactionType::PrincipalDraw),
            "PrincipalReturn" => Ok(GroupTransactionType::PrincipalReturn),
            "AssetPurchase" => Ok(GroupTransactionType::AssetPurchase),
            "AssetSale" => Ok(GroupTransactionType::AssetSale),
            "InterestDraw" => Ok(GroupTransactionType::InterestDraw),
            "InterestReturn" => Ok(GroupTransactionType::InterestReturn),
            "FeesPayment" => Ok(GroupTransactionType::FeesPayment),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown group transaction type '{other}'"
            ))),
        }
    }
}

/// Composite transaction. Links at most one cash-, one fixed-income- and one
/// interest base transaction directly; fee base transactions attach through
/// [`FeeTransactionLink`] join rows instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTransaction {
    pub id: String,
    pub portfolio_id: String,
    pub transaction_type: GroupTransactionType,
    pub entry_time: Option<DateTime<Utc>>,
    pub cash_transaction_id: Option<String>,
    pub fixed_transaction_id: Option<String>,
    pub interest_transaction_id: Option<String>,
}

/// One elementary cash/fee/fixed/interest movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseTransaction {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: Option<String>,
    pub amount: Option<Decimal>,
    pub entry_time: Option<DateTime<Utc>>,
    pub trade_time: Option<DateTime<Utc>>,
    pub settlement_time: Option<DateTime<Utc>>,
    pub tx_ref: Option<String>,
    pub account_id: Option<String>,
    pub counter_party_account_id: Option<String>,
}

/// Join row attaching a fee base transaction to a group transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTransactionLink {
    pub portfolio_id: String,
    pub base_transaction_id: String,
    pub group_transaction_id: String,
}

// === Partial updates ===
//
// `None` means "leave the column unchanged", matching the sparse payloads of
// the upstream edit operations.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpvUpdate {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceProviderUpdate {
    pub id: String,
    pub name: Option<String>,
    pub fee_type: Option<String>,
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedIncomeTypeUpdate {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountUpdate {
    pub id: String,
    pub reference: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetUpdate {
    pub asset_ref_id: String,
    pub name: Option<String>,
    pub spv_id: Option<String>,
    pub currency: Option<String>,
    pub fixed_income_type_id: Option<String>,
    pub maturity: Option<DateTime<Utc>>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub notional: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    pub purchase_proceeds: Option<Decimal>,
    pub total_discount: Option<Decimal>,
    pub annualized_yield: Option<Decimal>,
    pub coupon: Option<Decimal>,
    pub isin: Option<String>,
    pub cusip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseTransactionUpdate {
    pub id: String,
    pub asset_id: Option<String>,
    pub amount: Option<Decimal>,
    pub entry_time: Option<DateTime<Utc>>,
    pub trade_time: Option<DateTime<Utc>>,
    pub settlement_time: Option<DateTime<Utc>>,
    pub tx_ref: Option<String>,
    pub account_id: Option<String>,
    pub counter_party_account_id: Option<String>,
}
