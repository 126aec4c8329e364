//! Database models for the projection tables.
//!
//! Decimals and timestamps are stored as TEXT; conversions to the domain
//! types are strict, since every row is written by this crate and a value
//! that fails to parse back means the row is corrupt.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use strandfolio_core::errors::{Error, Result};
use strandfolio_core::portfolio::{
    Account, AccountUpdate, Asset, AssetUpdate, BaseTransaction, BaseTransactionUpdate,
    FixedIncomeType, FixedIncomeTypeUpdate, GroupTransaction, Portfolio, ServiceProvider,
    ServiceProviderUpdate, Spv, SpvUpdate,
};

pub(crate) fn now_string() -> String {
    Utc::now().to_rfc3339()
}

fn time_to_db(value: &Option<DateTime<Utc>>) -> Option<String> {
    value.as_ref().map(|t| t.to_rfc3339())
}

fn time_from_db(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(Error::from)
        })
        .transpose()
}

fn decimal_to_db(value: &Option<Decimal>) -> Option<String> {
    value.as_ref().map(|d| d.to_string())
}

fn decimal_from_db(value: Option<String>) -> Result<Option<Decimal>> {
    value
        .map(|s| Decimal::from_str(&s).map_err(Error::from))
        .transpose()
}

// === Portfolio ===

#[derive(Queryable, Identifiable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: String,
    pub drive_id: String,
    pub document_id: String,
    pub principal_lender_account_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PortfolioDB> for Portfolio {
    fn from(db: PortfolioDB) -> Self {
        Portfolio {
            id: db.id,
            drive_id: db.drive_id,
            document_id: db.document_id,
            principal_lender_account_id: db.principal_lender_account_id,
        }
    }
}

// === Children ===

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::spvs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SpvDB {
    pub id: String,
    pub portfolio_id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl SpvDB {
    pub fn from_domain(row: &Spv, now: &str) -> Self {
        Self {
            id: row.id.clone(),
            portfolio_id: row.portfolio_id.clone(),
            name: row.name.clone(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::service_providers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ServiceProviderDB {
    pub id: String,
    pub portfolio_id: String,
    pub name: String,
    pub fee_type: String,
    pub account_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ServiceProviderDB {
    pub fn from_domain(row: &ServiceProvider, now: &str) -> Self {
        Self {
            id: row.id.clone(),
            portfolio_id: row.portfolio_id.clone(),
            name: row.name.clone(),
            fee_type: row.fee_type.clone(),
            account_id: row.account_id.clone(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::fixed_income_types)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FixedIncomeTypeDB {
    pub id: String,
    pub portfolio_id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl FixedIncomeTypeDB {
    pub fn from_domain(row: &FixedIncomeType, now: &str) -> Self {
        Self {
            id: row.id.clone(),
            portfolio_id: row.portfolio_id.clone(),
            name: row.name.clone(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub portfolio_id: String,
    pub reference: String,
    pub label: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl AccountDB {
    pub fn from_domain(row: &Account, now: &str) -> Self {
        Self {
            id: row.id.clone(),
            portfolio_id: row.portfolio_id.clone(),
            reference: row.reference.clone(),
            label: row.label.clone(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetDB {
    pub asset_ref_id: String,
    pub portfolio_id: String,
    pub asset_type: String,
    pub name: Option<String>,
    pub spv_id: Option<String>,
    pub currency: Option<String>,
    pub fixed_income_type_id: Option<String>,
    pub maturity: Option<String>,
    pub purchase_date: Option<String>,
    pub notional: Option<String>,
    pub purchase_price: Option<String>,
    pub purchase_proceeds: Option<String>,
    pub total_discount: Option<String>,
    pub annualized_yield: Option<String>,
    pub coupon: Option<String>,
    pub isin: Option<String>,
    pub cusip: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl AssetDB {
    pub fn from_domain(row: &Asset, now: &str) -> Self {
        Self {
            asset_ref_id: row.asset_ref_id.clone(),
            portfolio_id: row.portfolio_id.clone(),
            asset_type: row.asset_type.as_str().to_string(),
            name: row.name.clone(),
            spv_id: row.spv_id.clone(),
            currency: row.currency.clone(),
            fixed_income_type_id: row.fixed_income_type_id.clone(),
            maturity: time_to_db(&row.maturity),
            purchase_date: time_to_db(&row.purchase_date),
            notional: decimal_to_db(&row.notional),
            purchase_price: decimal_to_db(&row.purchase_price),
            purchase_proceeds: decimal_to_db(&row.purchase_proceeds),
            total_discount: decimal_to_db(&row.total_discount),
            annualized_yield: decimal_to_db(&row.annualized_yield),
            coupon: decimal_to_db(&row.coupon),
            isin: row.isin.clone(),
            cusip: row.cusip.clone(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

impl TryFrom<AssetDB> for Asset {
    type Error = Error;

    fn try_from(db: AssetDB) -> Result<Self> {
        Ok(Asset {
            asset_ref_id: db.asset_ref_id,
            portfolio_id: db.portfolio_id,
            asset_type: db.asset_type.parse()?,
            name: db.name,
            spv_id: db.spv_id,
            currency: db.currency,
            fixed_income_type_id: db.fixed_income_type_id,
            maturity: time_from_db(db.maturity)?,
            purchase_date: time_from_db(db.purchase_date)?,
            notional: decimal_from_db(db.notional)?,
            purchase_price: decimal_from_db(db.purchase_price)?,
            purchase_proceeds: decimal_from_db(db.purchase_proceeds)?,
            total_discount: decimal_from_db(db.total_discount)?,
            annualized_yield: decimal_from_db(db.annualized_yield)?,
            coupon: decimal_from_db(db.coupon)?,
            isin: db.isin,
            cusip: db.cusip,
        })
    }
}

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::base_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BaseTransactionDB {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: Option<String>,
    pub amount: Option<String>,
    pub entry_time: Option<String>,
    pub trade_time: Option<String>,
    pub settlement_time: Option<String>,
    pub tx_ref: Option<String>,
    pub account_id: Option<String>,
    pub counter_party_account_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl BaseTransactionDB {
    pub fn from_domain(row: &BaseTransaction, now: &str) -> Self {
        Self {
            id: row.id.clone(),
            portfolio_id: row.portfolio_id.clone(),
            asset_id: row.asset_id.clone(),
            amount: decimal_to_db(&row.amount),
            entry_time: time_to_db(&row.entry_time),
            trade_time: time_to_db(&row.trade_time),
            settlement_time: time_to_db(&row.settlement_time),
            tx_ref: row.tx_ref.clone(),
            account_id: row.account_id.clone(),
            counter_party_account_id: row.counter_party_account_id.clone(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

impl TryFrom<BaseTransactionDB> for BaseTransaction {
    type Error = Error;

    fn try_from(db: BaseTransactionDB) -> Result<Self> {
        Ok(BaseTransaction {
            id: db.id,
            portfolio_id: db.portfolio_id,
            asset_id: db.asset_id,
            amount: decimal_from_db(db.amount)?,
            entry_time: time_from_db(db.entry_time)?,
            trade_time: time_from_db(db.trade_time)?,
            settlement_time: time_from_db(db.settlement_time)?,
            tx_ref: db.tx_ref,
            account_id: db.account_id,
            counter_party_account_id: db.counter_party_account_id,
        })
    }
}

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::group_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GroupTransactionDB {
    pub id: String,
    pub portfolio_id: String,
    pub transaction_type: String,
    pub entry_time: Option<String>,
    pub cash_transaction_id: Option<String>,
    pub fixed_transaction_id: Option<String>,
    pub interest_transaction_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl GroupTransactionDB {
    pub fn from_domain(row: &GroupTransaction, now: &str) -> Self {
        Self {
            id: row.id.clone(),
            portfolio_id: row.portfolio_id.clone(),
            transaction_type: row.transaction_type.as_str().to_string(),
            entry_time: time_to_db(&row.entry_time),
            cash_transaction_id: row.cash_transaction_id.clone(),
            fixed_transaction_id: row.fixed_transaction_id.clone(),
            interest_transaction_id: row.interest_transaction_id.clone(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }
}

impl TryFrom<GroupTransactionDB> for GroupTransaction {
    type Error = Error;

    fn try_from(db: GroupTransactionDB) -> Result<Self> {
        Ok(GroupTransaction {
            id: db.id,
            portfolio_id: db.portfolio_id,
            transaction_type: db.transaction_type.parse()?,
            entry_time: time_from_db(db.entry_time)?,
            cash_transaction_id: db.cash_transaction_id,
            fixed_transaction_id: db.fixed_transaction_id,
            interest_transaction_id: db.interest_transaction_id,
        })
    }
}

// === Join rows ===

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::base_transactions_on_group_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FeeTransactionLinkDB {
    pub portfolio_id: String,
    pub base_transaction_id: String,
    pub group_transaction_id: String,
}

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::spvs_on_portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SpvOnPortfolioDB {
    pub portfolio_id: String,
    pub spv_id: String,
}

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::service_providers_on_portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ServiceProviderOnPortfolioDB {
    pub portfolio_id: String,
    pub service_provider_id: String,
}

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::fixed_income_types_on_portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FixedIncomeTypeOnPortfolioDB {
    pub portfolio_id: String,
    pub fixed_income_type_id: String,
}

#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts_on_portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountOnPortfolioDB {
    pub portfolio_id: String,
    pub account_id: String,
}

// === Partial-update changesets ===
//
// `updated_at` is always present so a changeset is never empty even when the
// edit payload carried only the natural key.

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::spvs)]
pub struct SpvChanges {
    pub name: Option<String>,
    pub updated_at: String,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::service_providers)]
pub struct ServiceProviderChanges {
    pub name: Option<String>,
    pub fee_type: Option<String>,
    pub account_id: Option<String>,
    pub updated_at: String,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::fixed_income_types)]
pub struct FixedIncomeTypeChanges {
    pub name: Option<String>,
    pub updated_at: String,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
pub struct AccountChanges {
    pub reference: Option<String>,
    pub label: Option<String>,
    pub updated_at: String,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::assets)]
pub struct AssetChanges {
    pub name: Option<String>,
    pub spv_id: Option<String>,
    pub currency: Option<String>,
    pub fixed_income_type_id: Option<String>,
    pub maturity: Option<String>,
    pub purchase_date: Option<String>,
    pub notional: Option<String>,
    pub purchase_price: Option<String>,
    pub purchase_proceeds: Option<String>,
    pub total_discount: Option<String>,
    pub annualized_yield: Option<String>,
    pub coupon: Option<String>,
    pub isin: Option<String>,
    pub cusip: Option<String>,
    pub updated_at: String,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::base_transactions)]
pub struct BaseTransactionChanges {
    pub asset_id: Option<String>,
    pub amount: Option<String>,
    pub entry_time: Option<String>,
    pub trade_time: Option<String>,
    pub settlement_time: Option<String>,
    pub tx_ref: Option<String>,
    pub account_id: Option<String>,
    pub counter_party_account_id: Option<String>,
    pub updated_at: String,
}

impl SpvChanges {
    pub fn from_update(update: &SpvUpdate, now: &str) -> Self {
        Self {
            name: update.name.clone(),
            updated_at: now.to_string(),
        }
    }
}

impl ServiceProviderChanges {
    pub fn from_update(update: &ServiceProviderUpdate, now: &str) -> Self {
        Self {
            name: update.name.clone(),
            fee_type: update.fee_type.clone(),
            account_id: update.account_id.clone(),
            updated_at: now.to_string(),
        }
    }
}

impl FixedIncomeTypeChanges {
    pub fn from_update(update: &FixedIncomeTypeUpdate, now: &str) -> Self {
        Self {
            name: update.name.clone(),
            updated_at: now.to_string(),
        }
    }
}

impl AccountChanges {
    pub fn from_update(update: &AccountUpdate, now: &str) -> Self {
        Self {
            reference: update.reference.clone(),
            label: update.label.clone(),
            updated_at: now.to_string(),
        }
    }
}

impl AssetChanges {
    pub fn from_update(update: &AssetUpdate, now: &str) -> Self {
        Self {
            name: update.name.clone(),
            spv_id: update.spv_id.clone(),
            currency: update.currency.clone(),
            fixed_income_type_id: update.fixed_income_type_id.clone(),
            maturity: time_to_db(&update.maturity),
            purchase_date: time_to_db(&update.purchase_date),
            notional: decimal_to_db(&update.notional),
            purchase_price: decimal_to_db(&update.purchase_price),
            purchase_proceeds: decimal_to_db(&update.purchase_proceeds),
            total_discount: decimal_to_db(&update.total_discount),
            annualized_yield: decimal_to_db(&update.annualized_yield),
            coupon: decimal_to_db(&update.coupon),
            isin: update.isin.clone(),
            cusip: update.cusip.clone(),
            updated_at: now.to_string(),
        }
    }
}

impl BaseTransactionChanges {
    pub fn from_update(update: &BaseTransactionUpdate, now: &str) -> Self {
        Self {
            asset_id: update.asset_id.clone(),
            amount: decimal_to_db(&update.amount),
            entry_time: time_to_db(&update.entry_time),
            trade_time: time_to_db(&update.trade_time),
            settlement_time: time_to_db(&update.settlement_time),
            tx_ref: update.tx_ref.clone(),
            account_id: update.account_id.clone(),
            counter_party_account_id: update.counter_party_account_id.clone(),
            updated_at: now.to_string(),
        }
    }
}
