//! Diesel implementation of the projection store.
//!
//! All methods run on the connection of the caller's transaction; nothing
//! here commits. Bulk creates use INSERT OR IGNORE so redelivered strands
//! and repeated rebuilds converge; updates and deletes report a missing
//! natural key as `MissingTargetRow`.

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use crate::errors::IntoCore;
use crate::schema::{
    accounts, accounts_on_portfolios, assets, base_transactions,
    base_transactions_on_group_transactions, fixed_income_types,
    fixed_income_types_on_portfolios, group_transactions, portfolios, service_providers,
    service_providers_on_portfolios, spvs, spvs_on_portfolios,
};
use strandfolio_core::errors::{Error, ProjectionError, Result};
use strandfolio_core::portfolio::{
    Account, AccountUpdate, Asset, AssetUpdate, BaseTransaction, BaseTransactionUpdate,
    FeeTransactionLink, FixedIncomeType, FixedIncomeTypeUpdate, GroupTransaction,
    GroupTransactionType, Portfolio, PortfolioRepositoryTrait, ServiceProvider,
    ServiceProviderUpdate, Spv, SpvUpdate,
};

use super::model::{
    now_string, AccountChanges, AccountDB, AccountOnPortfolioDB, AssetChanges, AssetDB,
    BaseTransactionChanges, BaseTransactionDB, FeeTransactionLinkDB, FixedIncomeTypeChanges,
    FixedIncomeTypeDB, FixedIncomeTypeOnPortfolioDB, GroupTransactionDB, PortfolioDB,
    ServiceProviderChanges, ServiceProviderDB, ServiceProviderOnPortfolioDB, SpvChanges, SpvDB,
    SpvOnPortfolioDB,
};

fn missing_target(entity: &'static str, key: impl Into<String>) -> Error {
    Error::Projection(ProjectionError::MissingTargetRow {
        entity,
        key: key.into(),
    })
}

/// Repository for the portfolio projection tables.
#[derive(Debug, Default, Clone)]
pub struct PortfolioRepository;

impl PortfolioRepository {
    pub fn new() -> Self {
        Self
    }
}

impl PortfolioRepositoryTrait for PortfolioRepository {
    fn find_portfolio(
        &self,
        drive_id: &str,
        document_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Portfolio>> {
        let row = portfolios::table
            .filter(portfolios::drive_id.eq(drive_id))
            .filter(portfolios::document_id.eq(document_id))
            .select(PortfolioDB::as_select())
            .first::<PortfolioDB>(conn)
            .optional()
            .into_core()?;
        Ok(row.map(Portfolio::from))
    }

    fn upsert_portfolio(
        &self,
        drive_id: &str,
        document_id: &str,
        principal_lender_account_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<Portfolio> {
        let now = now_string();
        let new_row = PortfolioDB {
            id: Uuid::new_v4().to_string(),
            drive_id: drive_id.to_string(),
            document_id: document_id.to_string(),
            principal_lender_account_id: principal_lender_account_id.to_string(),
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        diesel::insert_into(portfolios::table)
            .values(&new_row)
            .on_conflict((portfolios::drive_id, portfolios::document_id))
            .do_update()
            .set((
                portfolios::principal_lender_account_id.eq(principal_lender_account_id),
                portfolios::updated_at.eq(&now),
            ))
            .execute(conn)
            .into_core()?;

        let row = portfolios::table
            .filter(portfolios::drive_id.eq(drive_id))
            .filter(portfolios::document_id.eq(document_id))
            .select(PortfolioDB::as_select())
            .first::<PortfolioDB>(conn)
            .into_core()?;
        Ok(row.into())
    }

    fn delete_drive_portfolios(
        &self,
        drive_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<usize> {
        diesel::delete(portfolios::table.filter(portfolios::drive_id.eq(drive_id)))
            .execute(conn)
            .into_core()
    }

    fn delete_portfolio(
        &self,
        drive_id: &str,
        document_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<usize> {
        diesel::delete(
            portfolios::table
                .filter(portfolios::drive_id.eq(drive_id))
                .filter(portfolios::document_id.eq(document_id)),
        )
        .execute(conn)
        .into_core()
    }

    fn delete_portfolio_descendants(
        &self,
        portfolio_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        // Group transactions first: their direct-leg foreign keys point at
        // base transactions. Join and membership rows cascade from their
        // parents.
        diesel::delete(
            group_transactions::table.filter(group_transactions::portfolio_id.eq(portfolio_id)),
        )
        .execute(conn)
        .into_core()?;
        diesel::delete(
            base_transactions::table.filter(base_transactions::portfolio_id.eq(portfolio_id)),
        )
        .execute(conn)
        .into_core()?;
        diesel::delete(assets::table.filter(assets::portfolio_id.eq(portfolio_id)))
            .execute(conn)
            .into_core()?;
        diesel::delete(spvs::table.filter(spvs::portfolio_id.eq(portfolio_id)))
            .execute(conn)
            .into_core()?;
        diesel::delete(
            service_providers::table.filter(service_providers::portfolio_id.eq(portfolio_id)),
        )
        .execute(conn)
        .into_core()?;
        diesel::delete(
            fixed_income_types::table.filter(fixed_income_types::portfolio_id.eq(portfolio_id)),
        )
        .execute(conn)
        .into_core()?;
        diesel::delete(accounts::table.filter(accounts::portfolio_id.eq(portfolio_id)))
            .execute(conn)
            .into_core()?;
        Ok(())
    }

    // --- Spvs ---

    fn create_spvs(&self, rows: &[Spv], conn: &mut SqliteConnection) -> Result<usize> {
        let now = now_string();
        let db_rows: Vec<SpvDB> = rows.iter().map(|r| SpvDB::from_domain(r, &now)).collect();
        diesel::insert_or_ignore_into(spvs::table)
            .values(&db_rows)
            .execute(conn)
            .into_core()
    }

    fn update_spv(
        &self,
        portfolio_id: &str,
        update: SpvUpdate,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let changes = SpvChanges::from_update(&update, &now_string());
        let affected = diesel::update(
            spvs::table.find((update.id.clone(), portfolio_id.to_string())),
        )
        .set(&changes)
        .execute(conn)
        .into_core()?;
        if affected == 0 {
            return Err(missing_target("Spv", update.id));
        }
        Ok(())
    }

    fn delete_spv(&self, portfolio_id: &str, id: &str, conn: &mut SqliteConnection) -> Result<()> {
        let affected =
            diesel::delete(spvs::table.find((id.to_string(), portfolio_id.to_string())))
                .execute(conn)
                .into_core()?;
        if affected == 0 {
            return Err(missing_target("Spv", id));
        }
        Ok(())
    }

    // --- Service providers ---

    fn create_service_providers(
        &self,
        rows: &[ServiceProvider],
        conn: &mut SqliteConnection,
    ) -> Result<usize> {
        let now = now_string();
        let db_rows: Vec<ServiceProviderDB> = rows
            .iter()
            .map(|r| ServiceProviderDB::from_domain(r, &now))
            .collect();
        diesel::insert_or_ignore_into(service_providers::table)
            .values(&db_rows)
            .execute(conn)
            .into_core()
    }

    fn update_service_provider(
        &self,
        portfolio_id: &str,
        update: ServiceProviderUpdate,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let changes = ServiceProviderChanges::from_update(&update, &now_string());
        let affected = diesel::update(
            service_providers::table.find((update.id.clone(), portfolio_id.to_string())),
        )
        .set(&changes)
        .execute(conn)
        .into_core()?;
        if affected == 0 {
            return Err(missing_target("ServiceProvider", update.id));
        }
        Ok(())
    }

    fn delete_service_provider(
        &self,
        portfolio_id: &str,
        id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let affected = diesel::delete(
            service_providers::table.find((id.to_string(), portfolio_id.to_string())),
        )
        .execute(conn)
        .into_core()?;
        if affected == 0 {
            return Err(missing_target("ServiceProvider", id));
        }
        Ok(())
    }

    // --- Fixed income types ---

    fn create_fixed_income_types(
        &self,
        rows: &[FixedIncomeType],
        conn: &mut SqliteConnection,
    ) -> Result<usize> {
        let now = now_string();
        let db_rows: Vec<FixedIncomeTypeDB> = rows
            .iter()
            .map(|r| FixedIncomeTypeDB::from_domain(r, &now))
            .collect();
        diesel::insert_or_ignore_into(fixed_income_types::table)
            .values(&db_rows)
            .execute(conn)
            .into_core()
    }

    fn update_fixed_income_type(
        &self,
        portfolio_id: &str,
        update: FixedIncomeTypeUpdate,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let changes = FixedIncomeTypeChanges::from_update(&update, &now_string());
        let affected = diesel::update(
            fixed_income_types::table.find((update.id.clone(), portfolio_id.to_string())),
        )
        .set(&changes)
        .execute(conn)
        .into_core()?;
        if affected == 0 {
            return Err(missing_target("FixedIncomeType", update.id));
        }
        Ok(())
    }

    fn delete_fixed_income_type(
        &self,
        portfolio_id: &str,
        id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let affected = diesel::delete(
            fixed_income_types::table.find((id.to_string(), portfolio_id.to_string())),
        )
        .execute(conn)
        .into_core()?;
        if affected == 0 {
            return Err(missing_target("FixedIncomeType", id));
        }
        Ok(())
    }

    // --- Accounts ---

    fn create_accounts(&self, rows: &[Account], conn: &mut SqliteConnection) -> Result<usize> {
        let now = now_string();
        let db_rows: Vec<AccountDB> = rows
            .iter()
            .map(|r| AccountDB::from_domain(r, &now))
            .collect();
        diesel::insert_or_ignore_into(accounts::table)
            .values(&db_rows)
            .execute(conn)
            .into_core()
    }

    fn update_account(
        &self,
        portfolio_id: &str,
        update: AccountUpdate,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let changes = AccountChanges::from_update(&update, &now_string());
        let affected = diesel::update(
            accounts::table.find((update.id.clone(), portfolio_id.to_string())),
        )
        .set(&changes)
        .execute(conn)
        .into_core()?;
        if affected == 0 {
            return Err(missing_target("Account", update.id));
        }
        Ok(())
    }

    fn delete_account(
        &self,
        portfolio_id: &str,
        id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let affected =
            diesel::delete(accounts::table.find((id.to_string(), portfolio_id.to_string())))
                .execute(conn)
                .into_core()?;
        if affected == 0 {
            return Err(missing_target("Account", id));
        }
        Ok(())
    }

    // --- Assets ---

    fn create_assets(&self, rows: &[Asset], conn: &mut SqliteConnection) -> Result<usize> {
        let now = now_string();
        let db_rows: Vec<AssetDB> = rows.iter().map(|r| AssetDB::from_domain(r, &now)).collect();
        diesel::insert_or_ignore_into(assets::table)
            .values(&db_rows)
            .execute(conn)
            .into_core()
    }

    fn update_asset(
        &self,
        portfolio_id: &str,
        update: AssetUpdate,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let changes = AssetChanges::from_update(&update, &now_string());
        let affected = diesel::update(
            assets::table.find((update.asset_ref_id.clone(), portfolio_id.to_string())),
        )
        .set(&changes)
        .execute(conn)
        .into_core()?;
        if affected == 0 {
            return Err(missing_target("Asset", update.asset_ref_id));
        }
        Ok(())
    }

    fn delete_asset(
        &self,
        portfolio_id: &str,
        asset_ref_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let affected = diesel::delete(
            assets::table.find((asset_ref_id.to_string(), portfolio_id.to_string())),
        )
        .execute(conn)
        .into_core()?;
        if affected == 0 {
            return Err(missing_target("Asset", asset_ref_id));
        }
        Ok(())
    }

    // --- Base transactions ---

    fn create_base_transactions(
        &self,
        rows: &[BaseTransaction],
        conn: &mut SqliteConnection,
    ) -> Result<usize> {
        let now = now_string();
        let db_rows: Vec<BaseTransactionDB> = rows
            .iter()
            .map(|r| BaseTransactionDB::from_domain(r, &now))
            .collect();
        diesel::insert_or_ignore_into(base_transactions::table)
            .values(&db_rows)
            .execute(conn)
            .into_core()
    }

    fn update_base_transaction(
        &self,
        portfolio_id: &str,
        update: BaseTransactionUpdate,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let changes = BaseTransactionChanges::from_update(&update, &now_string());
        let affected = diesel::update(
            base_transactions::table.find((update.id.clone(), portfolio_id.to_string())),
        )
        .set(&changes)
        .execute(conn)
        .into_core()?;
        if affected == 0 {
            return Err(missing_target("BaseTransaction", update.id));
        }
        Ok(())
    }

    fn delete_base_transaction(
        &self,
        portfolio_id: &str,
        id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let affected = diesel::delete(
            base_transactions::table.find((id.to_string(), portfolio_id.to_string())),
        )
        .execute(conn)
        .into_core()?;
        if affected == 0 {
            return Err(missing_target("BaseTransaction", id));
        }
        Ok(())
    }

    // --- Group transactions ---

    fn create_group_transaction(
        &self,
        row: &GroupTransaction,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let db_row = GroupTransactionDB::from_domain(row, &now_string());
        diesel::insert_or_ignore_into(group_transactions::table)
            .values(&db_row)
            .execute(conn)
            .into_core()?;
        Ok(())
    }

    fn update_group_transaction_type(
        &self,
        portfolio_id: &str,
        id: &str,
        transaction_type: GroupTransactionType,
        conn: &mut SqliteConnection,
    ) -> Result<()> {
        let affected = diesel::update(
            group_transactions::table.find((id.to_string(), portfolio_id.to_string())),
        )
        .set((
            group_transactions::transaction_type.eq(transaction_type.as_str()),
            group_transactions::updated_at.eq(now_string()),
        ))
        .execute(conn)
        .into_core()?;
        if affected == 0 {
            return Err(missing_target("GroupTransaction", id));
        }
        Ok(())
    }

    fn delete_group_transaction(
        &self,
        portfolio_id: &str,
        id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<GroupTransaction> {
        let row = group_transactions::table
            .find((id.to_string(), portfolio_id.to_string()))
            .select(GroupTransactionDB::as_select())
            .first::<GroupTransactionDB>(conn)
            .optional()
            .into_core()?
            .ok_or_else(|| missing_target("GroupTransaction", id))?;

        diesel::delete(
            group_transactions::table.find((id.to_string(), portfolio_id.to_string())),
        )
        .execute(conn)
        .into_core()?;

        row.try_into()
    }

    fn create_fee_transaction_links(
        &self,
        links: &[FeeTransactionLink],
        conn: &mut SqliteConnection,
    ) -> Result<usize> {
        let db_rows: Vec<FeeTransactionLinkDB> = links
            .iter()
            .map(|l| FeeTransactionLinkDB {
                portfolio_id: l.portfolio_id.clone(),
                base_transaction_id: l.base_transaction_id.clone(),
                group_transaction_id: l.group_transaction_id.clone(),
            })
            .collect();
        diesel::insert_or_ignore_into(base_transactions_on_group_transactions::table)
            .values(&db_rows)
            .execute(conn)
            .into_core()
    }

    // --- Membership join rows ---

    fn create_spv_memberships(
        &self,
        portfolio_id: &str,
        spv_ids: &[String],
        conn: &mut SqliteConnection,
    ) -> Result<usize> {
        let db_rows: Vec<SpvOnPortfolioDB> = spv_ids
            .iter()
            .map(|spv_id| SpvOnPortfolioDB {
                portfolio_id: portfolio_id.to_string(),
                spv_id: spv_id.clone(),
            })
            .collect();
        diesel::insert_or_ignore_into(spvs_on_portfolios::table)
            .values(&db_rows)
            .execute(conn)
            .into_core()
    }

    fn create_service_provider_memberships(
        &self,
        portfolio_id: &str,
        service_provider_ids: &[String],
        conn: &mut SqliteConnection,
    ) -> Result<usize> {
        let db_rows: Vec<ServiceProviderOnPortfolioDB> = service_provider_ids
            .iter()
            .map(|id| ServiceProviderOnPortfolioDB {
                portfolio_id: portfolio_id.to_string(),
                service_provider_id: id.clone(),
            })
            .collect();
        diesel::insert_or_ignore_into(service_providers_on_portfolios::table)
            .values(&db_rows)
            .execute(conn)
            .into_core()
    }

    fn create_fixed_income_type_memberships(
        &self,
        portfolio_id: &str,
        fixed_income_type_ids: &[String],
        conn: &mut SqliteConnection,
    ) -> Result<usize> {
        let db_rows: Vec<FixedIncomeTypeOnPortfolioDB> = fixed_income_type_ids
            .iter()
            .map(|id| FixedIncomeTypeOnPortfolioDB {
                portfolio_id: portfolio_id.to_string(),
                fixed_income_type_id: id.clone(),
            })
            .collect();
        diesel::insert_or_ignore_into(fixed_income_types_on_portfolios::table)
            .values(&db_rows)
            .execute(conn)
            .into_core()
    }

    fn create_account_memberships(
        &self,
        portfolio_id: &str,
        account_ids: &[String],
        conn: &mut SqliteConnection,
    ) -> Result<usize> {
        let db_rows: Vec<AccountOnPortfolioDB> = account_ids
            .iter()
            .map(|id| AccountOnPortfolioDB {
                portfolio_id: portfolio_id.to_string(),
                account_id: id.clone(),
            })
            .collect();
        diesel::insert_or_ignore_into(accounts_on_portfolios::table)
            .values(&db_rows)
            .execute(conn)
            .into_core()
    }
}
