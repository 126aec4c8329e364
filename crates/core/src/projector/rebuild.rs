//! Rebuild engine: derives a document's full projected subgraph from its
//! authoritative state.
//!
//! Every write is an upsert or insert-or-ignore, so rebuilding the same
//! state twice converges to the same row set. Rebuild never deletes;
//! tearing down stale rows beforehand is the projector's responsibility
//! (document level) or the router's (drive level).

use diesel::sqlite::SqliteConnection;
use log::debug;

use crate::errors::Result;
use crate::portfolio::{
    BaseTransaction, FeeTransactionLink, GroupTransaction, Portfolio, PortfolioRepositoryTrait,
};
use crate::strands::{GroupTransactionParts, PortfolioState};

/// Reconstructs the projection for one document from `state`, independent of
/// prior row content. Returns the (created or refreshed) portfolio row.
pub fn rebuild_portfolio(
    repository: &dyn PortfolioRepositoryTrait,
    drive_id: &str,
    document_id: &str,
    state: &PortfolioState,
    conn: &mut SqliteConnection,
) -> Result<Portfolio> {
    debug!("rebuilding portfolio for document {document_id} in drive {drive_id}");

    let portfolio = repository.upsert_portfolio(
        drive_id,
        document_id,
        &state.principal_lender_account_id,
        conn,
    )?;

    let spvs: Vec<_> = state
        .spvs
        .iter()
        .cloned()
        .map(|s| s.into_row(&portfolio.id))
        .collect();
    repository.create_spvs(&spvs, conn)?;

    let service_providers: Vec<_> = state
        .service_providers
        .iter()
        .cloned()
        .map(|p| p.into_row(&portfolio.id))
        .collect();
    repository.create_service_providers(&service_providers, conn)?;

    let fixed_income_types: Vec<_> = state
        .fixed_income_types
        .iter()
        .cloned()
        .map(|t| t.into_row(&portfolio.id))
        .collect();
    repository.create_fixed_income_types(&fixed_income_types, conn)?;

    let accounts: Vec<_> = state
        .accounts
        .iter()
        .cloned()
        .map(|a| a.into_row(&portfolio.id))
        .collect();
    repository.create_accounts(&accounts, conn)?;

    let assets: Vec<_> = state
        .assets
        .iter()
        .cloned()
        .map(|a| a.into_row(&portfolio.id))
        .collect();
    repository.create_assets(&assets, conn)?;

    for transaction in state.transactions.iter().cloned() {
        create_group_transaction_subgraph(repository, &portfolio, transaction.into_parts(), conn)?;
    }

    let spv_ids: Vec<String> = state.spvs.iter().map(|s| s.id.clone()).collect();
    repository.create_spv_memberships(&portfolio.id, &spv_ids, conn)?;

    let provider_ids: Vec<String> = state
        .service_providers
        .iter()
        .map(|p| p.id.clone())
        .collect();
    repository.create_service_provider_memberships(&portfolio.id, &provider_ids, conn)?;

    let type_ids: Vec<String> = state
        .fixed_income_types
        .iter()
        .map(|t| t.id.clone())
        .collect();
    repository.create_fixed_income_type_memberships(&portfolio.id, &type_ids, conn)?;

    let account_ids: Vec<String> = state.accounts.iter().map(|a| a.id.clone()).collect();
    repository.create_account_memberships(&portfolio.id, &account_ids, conn)?;

    Ok(portfolio)
}

/// Inserts one group transaction together with its base-transaction legs.
///
/// Shared by the rebuild engine and the create registry handlers so both
/// paths produce identical shapes: cash/fixed/interest legs are referenced
/// directly on the group transaction row, fee legs go through the join
/// table.
pub(crate) fn create_group_transaction_subgraph(
    repository: &dyn PortfolioRepositoryTrait,
    portfolio: &Portfolio,
    parts: GroupTransactionParts,
    conn: &mut SqliteConnection,
) -> Result<()> {
    let mut base_rows: Vec<BaseTransaction> = Vec::new();
    let mut fee_ids: Vec<String> = Vec::new();

    let cash_transaction_id = parts.cash_transaction.map(|tx| {
        let row = tx.into_row(&portfolio.id);
        let id = row.id.clone();
        base_rows.push(row);
        id
    });
    let fixed_transaction_id = parts.fixed_income_transaction.map(|tx| {
        let row = tx.into_row(&portfolio.id);
        let id = row.id.clone();
        base_rows.push(row);
        id
    });
    let interest_transaction_id = parts.interest_transaction.map(|tx| {
        let row = tx.into_row(&portfolio.id);
        let id = row.id.clone();
        base_rows.push(row);
        id
    });
    for fee in parts.fee_transactions {
        let row = fee.into_row(&portfolio.id);
        fee_ids.push(row.id.clone());
        base_rows.push(row);
    }

    repository.create_base_transactions(&base_rows, conn)?;

    repository.create_group_transaction(
        &GroupTransaction {
            id: parts.id.clone(),
            portfolio_id: portfolio.id.clone(),
            transaction_type: parts.transaction_type,
            entry_time: parts.entry_time,
            cash_transaction_id,
            fixed_transaction_id,
            interest_transaction_id,
        },
        conn,
    )?;

    let links: Vec<FeeTransactionLink> = fee_ids
        .into_iter()
        .map(|base_transaction_id| FeeTransactionLink {
            portfolio_id: portfolio.id.clone(),
            base_transaction_id,
            group_transaction_id: parts.id.clone(),
        })
        .collect();
    repository.create_fee_transaction_links(&links, conn)?;

    Ok(())
}
