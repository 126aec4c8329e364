//! Authoritative document state and the typed inputs shared between the
//! rebuild engine and the create operations.
//!
//! The same input structs appear both as entries of [`PortfolioState`] and as
//! payloads of the corresponding create operations, so rebuild and surgical
//! creation can never drift apart in the row shapes they produce.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::{
    Account, Asset, AssetType, BaseTransaction, FixedIncomeType, GroupTransactionType,
    ServiceProvider, Spv,
};

/// Full authoritative state of one portfolio document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioState {
    #[serde(default)]
    pub principal_lender_account_id: String,
    #[serde(default)]
    pub spvs: Vec<SpvInput>,
    /// The upstream document model names service providers "fee types".
    #[serde(default, rename = "feeTypes", alias = "serviceProviders")]
    pub service_providers: Vec<ServiceProviderInput>,
    #[serde(default)]
    pub fixed_income_types: Vec<FixedIncomeTypeInput>,
    #[serde(default)]
    pub accounts: Vec<AccountInput>,
    /// Asset positions; the upstream state calls this list "portfolio".
    #[serde(default, rename = "portfolio", alias = "assets")]
    pub assets: Vec<AssetInput>,
    #[serde(default)]
    pub transactions: Vec<GroupTransactionInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpvInput {
    pub id: String,
    pub name: String,
}

impl SpvInput {
    pub fn into_row(self, portfolio_id: &str) -> Spv {
        Spv {
            id: self.id,
            portfolio_id: portfolio_id.to_string(),
            name: self.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProviderInput {
    pub id: String,
    pub name: String,
    pub fee_type: String,
    pub account_id: String,
}

impl ServiceProviderInput {
    pub fn into_row(self, portfolio_id: &str) -> ServiceProvider {
        ServiceProvider {
            id: self.id,
            portfolio_id: portfolio_id.to_string(),
            name: self.name,
            fee_type: self.fee_type,
            account_id: self.account_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedIncomeTypeInput {
    pub id: String,
    pub name: String,
}

impl FixedIncomeTypeInput {
    pub fn into_row(self, portfolio_id: &str) -> FixedIncomeType {
        FixedIncomeType {
            id: self.id,
            portfolio_id: portfolio_id.to_string(),
            name: self.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    pub id: String,
    pub reference: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl AccountInput {
    pub fn into_row(self, portfolio_id: &str) -> Account {
        Account {
            id: self.id,
            portfolio_id: portfolio_id.to_string(),
            reference: self.reference,
            label: self.label,
        }
    }
}

/// Asset entry of the state's position list, discriminated the same way the
/// upstream document model discriminates its asset union.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AssetInput {
    Cash(CashAssetInput),
    FixedIncome(FixedIncomeAssetInput),
}

impl AssetInput {
    pub fn into_row(self, portfolio_id: &str) -> Asset {
        match self {
            AssetInput::Cash(input) => input.into_row(portfolio_id),
            AssetInput::FixedIncome(input) => input.into_row(portfolio_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashAssetInput {
    pub id: String,
    #[serde(default)]
    pub spv_id: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl CashAssetInput {
    pub fn into_row(self, portfolio_id: &str) -> Asset {
        Asset {
            asset_ref_id: self.id,
            portfolio_id: portfolio_id.to_string(),
            asset_type: AssetType::Cash,
            name: None,
            spv_id: self.spv_id,
            currency: self.currency,
            fixed_income_type_id: None,
            maturity: None,
            purchase_date: None,
            notional: None,
            purchase_price: None,
            purchase_proceeds: None,
            total_discount: None,
            annualized_yield: None,
            coupon: None,
            isin: None,
            cusip: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedIncomeAssetInput {
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

impl FixedIncomeAssetInput {
    pub fn into_row(self, portfolio_id: &str) -> Asset {
        Asset {
            asset_ref_id: self.id,
            portfolio_id: portfolio_id.to_string(),
            asset_type: AssetType::FixedIncome,
            name: self.name,
            spv_id: self.spv_id,
            currency: None,
            fixed_income_type_id: self.fixed_income_type_id,
            maturity: self.maturity,
            purchase_date: self.purchase_date,
            notional: self.notional,
            purchase_price: self.purchase_price,
            purchase_proceeds: self.purchase_proceeds,
            total_discount: self.total_discount,
            annualized_yield: self.annualized_yield,
            coupon: self.coupon,
            isin: self.isin,
            cusip: self.cusip,
        }
    }
}

/// One elementary movement as carried by the wire, either inside a state
/// snapshot or inside a create/edit operation payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseTransactionInput {
    pub id: String,
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub trade_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settlement_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tx_ref: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub counter_party_account_id: Option<String>,
}

impl BaseTransactionInput {
    pub fn into_row(self, portfolio_id: &str) -> BaseTransaction {
        BaseTransaction {
            id: self.id,
            portfolio_id: portfolio_id.to_string(),
            asset_id: self.asset_id,
            amount: self.amount,
            entry_time: self.entry_time,
            trade_time: self.trade_time,
            settlement_time: self.settlement_time,
            tx_ref: self.tx_ref,
            account_id: self.account_id,
            counter_party_account_id: self.counter_party_account_id,
        }
    }
}

/// Group transaction kinds that move cash, with optional fees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashGroupTransactionInput {
    pub id: String,
    #[serde(default)]
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cash_transaction: Option<BaseTransactionInput>,
    #[serde(default)]
    pub fee_transactions: Vec<BaseTransactionInput>,
}

/// Asset purchase/sale: cash leg, optional fixed-income leg, optional fees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGroupTransactionInput {
    pub id: String,
    #[serde(default)]
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cash_transaction: Option<BaseTransactionInput>,
    #[serde(default)]
    pub fixed_income_transaction: Option<BaseTransactionInput>,
    #[serde(default)]
    pub fee_transactions: Vec<BaseTransactionInput>,
}

/// Interest draw/return: a single optional interest leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestGroupTransactionInput {
    pub id: String,
    #[serde(default)]
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub interest_transaction: Option<BaseTransactionInput>,
}

/// Fees payment: fee legs only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeesGroupTransactionInput {
    pub id: String,
    #[serde(default)]
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fee_transactions: Vec<BaseTransactionInput>,
}

/// A typed group transaction as it appears in the state's transaction list.
///
/// The per-kind payload types make impermissible roles unrepresentable:
/// an interest draw cannot carry a cash leg, a fees payment cannot carry
/// anything but fees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GroupTransactionInput {
    PrincipalDraw(CashGroupTransactionInput),
    PrincipalReturn(CashGroupTransactionInput),
    AssetPurchase(AssetGroupTransactionInput),
    AssetSale(AssetGroupTransactionInput),
    InterestDraw(InterestGroupTransactionInput),
    InterestReturn(InterestGroupTransactionInput),
    FeesPayment(FeesGroupTransactionInput),
}

/// Role decomposition of a group transaction, the unit both the rebuild
/// engine and the create handlers feed to the shared subgraph builder.
#[derive(Debug, Clone)]
pub struct GroupTransactionParts {
    pub id: String,
    pub transaction_type: GroupTransactionType,
    pub entry_time: Option<DateTime<Utc>>,
    pub cash_transaction: Option<BaseTransactionInput>,
    pub fixed_income_transaction: Option<BaseTransactionInput>,
    pub interest_transaction: Option<BaseTransactionInput>,
    pub fee_transactions: Vec<BaseTransactionInput>,
}

impl GroupTransactionParts {
    fn new(
        id: String,
        transaction_type: GroupTransactionType,
        entry_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            transaction_type,
            entry_time,
            cash_transaction: None,
            fixed_income_transaction: None,
            interest_transaction: None,
            fee_transactions: Vec::new(),
        }
    }
}

impl CashGroupTransactionInput {
    pub fn into_parts(self, transaction_type: GroupTransactionType) -> GroupTransactionParts {
        let mut parts = GroupTransactionParts::new(self.id, transaction_type, self.entry_time);
        parts.cash_transaction = self.cash_transaction;
        parts.fee_transactions = self.fee_transactions;
        parts
    }
}

impl AssetGroupTransactionInput {
    pub fn into_parts(self, transaction_type: GroupTransactionType) -> GroupTransactionParts {
        let mut parts = GroupTransactionParts::new(self.id, transaction_type, self.entry_time);
        parts.cash_transaction = self.cash_transaction;
        parts.fixed_income_transaction = self.fixed_income_transaction;
        parts.fee_transactions = self.fee_transactions;
        parts
    }
}

impl InterestGroupTransactionInput {
    pub fn into_parts(self, transaction_type: GroupTransactionType) -> GroupTransactionParts {
        let mut parts = GroupTransactionParts::new(self.id, transaction_type, self.entry_time);
        parts.interest_transaction = self.interest_transaction;
        parts
    }
}

impl FeesGroupTransactionInput {
    pub fn into_parts(self, transaction_type: GroupTransactionType) -> GroupTransactionParts {
        let mut parts = GroupTransactionParts::new(self.id, transaction_type, self.entry_time);
        parts.fee_transactions = self.fee_transactions;
        parts
    }
}

impl GroupTransactionInput {
    pub fn into_parts(self) -> GroupTransactionParts {
        match self {
            GroupTransactionInput::PrincipalDraw(tx) => {
                tx.into_parts(GroupTransactionType::PrincipalDraw)
            }
            GroupTransactionInput::PrincipalReturn(tx) => {
                tx.into_parts(GroupTransactionType::PrincipalReturn)
            }
            GroupTransactionInput::AssetPurchase(tx) => {
                tx.into_parts(GroupTransactionType::AssetPurchase)
            }
            GroupTransactionInput::AssetSale(tx) => {
                tx.into_parts(GroupTransactionType::AssetSale)
            }
            GroupTransactionInput::InterestDraw(tx) => {
                tx.into_parts(GroupTransactionType::InterestDraw)
            }
            GroupTransactionInput::InterestReturn(tx) => {
                tx.into_parts(GroupTransactionType::InterestReturn)
            }
            GroupTransactionInput::FeesPayment(tx) => {
                tx.into_parts(GroupTransactionType::FeesPayment)
            }
        }
    }
}
