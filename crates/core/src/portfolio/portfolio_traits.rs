//! Projection store contract.
//!
//! Every method takes the connection of the transaction the caller opened for
//! the current strand batch; no method commits on its own. Bulk `create_*`
//! methods use insert-or-ignore semantics so redelivered strands and repeated
//! rebuilds converge instead of erroring. `update_*` and `delete_*` methods
//! key strictly on the natural key and fail with
//! [`ProjectionError::MissingTargetRow`] when the target is absent, because a
//! mutation addressed at a nonexistent row means the surgical-vs-rebuild
//! decision was wrong or the upstream broke ordering.
//!
//! [`ProjectionError::MissingTargetRow`]: crate::errors::ProjectionError::MissingTargetRow

use diesel::sqlite::SqliteConnection;

use super::portfolio_model::{
    Account, AccountUpdate, Asset, AssetUpdate, BaseTransaction, BaseTransactionUpdate,
    FeeTransactionLink, FixedIncomeType, FixedIncomeTypeUpdate, GroupTransaction,
    GroupTransactionType, Portfolio, ServiceProvider, ServiceProviderUpdate, Spv, SpvUpdate,
};
use crate::errors::Result;

/// Contract the SQLite storage crate implements for the projection.
pub trait PortfolioRepositoryTrait: Send + Sync {
    // --- Portfolio root ---

    /// Looks up the portfolio tracked for `(drive_id, document_id)`, if any.
    fn find_portfolio(
        &self,
        drive_id: &str,
        document_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Portfolio>>;

    /// Creates or updates the portfolio row for `(drive_id, document_id)`
    /// and returns it. The surrogate id is stable across upserts.
    fn upsert_portfolio(
        &self,
        drive_id: &str,
        document_id: &str,
        principal_lender_account_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<Portfolio>;

    /// Deletes every portfolio belonging to a drive, cascading to all
    /// descendant rows. Returns the number of portfolios removed.
    fn delete_drive_portfolios(
        &self,
        drive_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<usize>;

    /// Deletes the portfolio for `(drive_id, document_id)`, cascading to all
    /// descendant rows. Deleting an untracked document is not an error;
    /// returns the number of portfolios removed.
    fn delete_portfolio(
        &self,
        drive_id: &str,
        document_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<usize>;

    /// Deletes every descendant row of a portfolio while keeping the
    /// portfolio row (and its surrogate id) in place. Used ahead of a
    /// document-level rebuild.
    fn delete_portfolio_descendants(
        &self,
        portfolio_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    // --- Spvs ---

    fn create_spvs(&self, rows: &[Spv], conn: &mut SqliteConnection) -> Result<usize>;

    fn update_spv(
        &self,
        portfolio_id: &str,
        update: SpvUpdate,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    fn delete_spv(&self, portfolio_id: &str, id: &str, conn: &mut SqliteConnection) -> Result<()>;

    // --- Service providers ---

    fn create_service_providers(
        &self,
        rows: &[ServiceProvider],
        conn: &mut SqliteConnection,
    ) -> Result<usize>;

    fn update_service_provider(
        &self,
        portfolio_id: &str,
        update: ServiceProviderUpdate,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    fn delete_service_provider(
        &self,
        portfolio_id: &str,
        id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    // --- Fixed income types ---

    fn create_fixed_income_types(
        &self,
        rows: &[FixedIncomeType],
        conn: &mut SqliteConnection,
    ) -> Result<usize>;

    fn update_fixed_income_type(
        &self,
        portfolio_id: &str,
        update: FixedIncomeTypeUpdate,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    fn delete_fixed_income_type(
        &self,
        portfolio_id: &str,
        id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    // --- Accounts ---

    fn create_accounts(&self, rows: &[Account], conn: &mut SqliteConnection) -> Result<usize>;

    fn update_account(
        &self,
        portfolio_id: &str,
        update: AccountUpdate,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    fn delete_account(
        &self,
        portfolio_id: &str,
        id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    // --- Assets ---

    fn create_assets(&self, rows: &[Asset], conn: &mut SqliteConnection) -> Result<usize>;

    fn update_asset(
        &self,
        portfolio_id: &str,
        update: AssetUpdate,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    fn delete_asset(
        &self,
        portfolio_id: &str,
        asset_ref_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    // --- Base transactions ---

    fn create_base_transactions(
        &self,
        rows: &[BaseTransaction],
        conn: &mut SqliteConnection,
    ) -> Result<usize>;

    fn update_base_transaction(
        &self,
        portfolio_id: &str,
        update: BaseTransactionUpdate,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    fn delete_base_transaction(
        &self,
        portfolio_id: &str,
        id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    // --- Group transactions ---

    fn create_group_transaction(
        &self,
        row: &GroupTransaction,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    fn update_group_transaction_type(
        &self,
        portfolio_id: &str,
        id: &str,
        transaction_type: GroupTransactionType,
        conn: &mut SqliteConnection,
    ) -> Result<()>;

    /// Deletes the group transaction and returns the deleted row so the
    /// caller can clean up its directly-owned base transactions. Fee join
    /// rows go with the group transaction.
    fn delete_group_transaction(
        &self,
        portfolio_id: &str,
        id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<GroupTransaction>;

    fn create_fee_transaction_links(
        &self,
        links: &[FeeTransactionLink],
        conn: &mut SqliteConnection,
    ) -> Result<usize>;

    // --- Membership join rows ---

    fn create_spv_memberships(
        &self,
        portfolio_id: &str,
        spv_ids: &[String],
        conn: &mut SqliteConnection,
    ) -> Result<usize>;

    fn create_service_provider_memberships(
        &self,
        portfolio_id: &str,
        service_provider_ids: &[String],
        conn: &mut SqliteConnection,
    ) -> Result<usize>;

    fn create_fixed_income_type_memberships(
        &self,
        portfolio_id: &str,
        fixed_income_type_ids: &[String],
        conn: &mut SqliteConnection,
    ) -> Result<usize>;

    fn create_account_memberships(
        &self,
        portfolio_id: &str,
        account_ids: &[String],
        conn: &mut SqliteConnection,
    ) -> Result<usize>;
}
