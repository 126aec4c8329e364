//! Surgical operation registry: the minimal relational mutation for each
//! document operation.
//!
//! Dispatch is a match over the closed [`PortfolioOperation`] sum type; the
//! set of registered operation kinds lives in one place
//! ([`SURGICAL_OPERATION_TYPES`]) next to the enum, so adding an operation
//! never touches the projector.
//!
//! [`SURGICAL_OPERATION_TYPES`]: crate::strands::SURGICAL_OPERATION_TYPES

use diesel::sqlite::SqliteConnection;
use log::debug;

use super::rebuild::create_group_transaction_subgraph;
use crate::errors::Result;
use crate::portfolio::{
    FeeTransactionLink, GroupTransactionType, Portfolio, PortfolioRepositoryTrait,
};
use crate::strands::{AddFeeTransactionsInput, GroupTransactionParts, PortfolioOperation};

/// Applies one parsed operation against the portfolio it belongs to.
pub(crate) fn apply_operation(
    repository: &dyn PortfolioRepositoryTrait,
    operation: PortfolioOperation,
    portfolio: &Portfolio,
    conn: &mut SqliteConnection,
) -> Result<()> {
    match operation {
        PortfolioOperation::CreateSpv(input) => {
            debug!("creating spv {}", input.id);
            repository.create_spvs(&[input.into_row(&portfolio.id)], conn)?;
        }
        PortfolioOperation::EditSpv(input) => {
            debug!("editing spv {}", input.id);
            repository.update_spv(&portfolio.id, input.into(), conn)?;
        }
        PortfolioOperation::DeleteSpv(input) => {
            debug!("deleting spv {}", input.id);
            repository.delete_spv(&portfolio.id, &input.id, conn)?;
        }

        PortfolioOperation::CreateServiceProvider(input) => {
            debug!("creating service provider {}", input.id);
            repository.create_service_providers(&[input.into_row(&portfolio.id)], conn)?;
        }
        PortfolioOperation::EditServiceProvider(input) => {
            debug!("editing service provider {}", input.id);
            repository.update_service_provider(&portfolio.id, input.into(), conn)?;
        }
        PortfolioOperation::DeleteServiceProvider(input) => {
            debug!("deleting service provider {}", input.id);
            repository.delete_service_provider(&portfolio.id, &input.id, conn)?;
        }

        PortfolioOperation::CreateFixedIncomeType(input) => {
            debug!("creating fixed income type {}", input.id);
            repository.create_fixed_income_types(&[input.into_row(&portfolio.id)], conn)?;
        }
        PortfolioOperation::EditFixedIncomeType(input) => {
            debug!("editing fixed income type {}", input.id);
            repository.update_fixed_income_type(&portfolio.id, input.into(), conn)?;
        }
        PortfolioOperation::DeleteFixedIncomeType(input) => {
            debug!("deleting fixed income type {}", input.id);
            repository.delete_fixed_income_type(&portfolio.id, &input.id, conn)?;
        }

        PortfolioOperation::CreateAccount(input) => {
            debug!("creating account {}", input.id);
            repository.create_accounts(&[input.into_row(&portfolio.id)], conn)?;
        }
        PortfolioOperation::EditAccount(input) => {
            debug!("editing account {}", input.id);
            repository.update_account(&portfolio.id, input.into(), conn)?;
        }
        PortfolioOperation::DeleteAccount(input) => {
            debug!("deleting account {}", input.id);
            repository.delete_account(&portfolio.id, &input.id, conn)?;
        }

        PortfolioOperation::CreateCashAsset(input) => {
            debug!("creating cash asset {}", input.id);
            repository.create_assets(&[input.into_row(&portfolio.id)], conn)?;
        }
        PortfolioOperation::EditCashAsset(input) => {
            debug!("editing cash asset {}", input.id);
            repository.update_asset(&portfolio.id, input.into(), conn)?;
        }
        PortfolioOperation::DeleteCashAsset(input) => {
            debug!("deleting cash asset {}", input.id);
            repository.delete_asset(&portfolio.id, &input.id, conn)?;
        }

        PortfolioOperation::CreateFixedIncomeAsset(input) => {
            debug!("creating fixed income asset {}", input.id);
            repository.create_assets(&[input.into_row(&portfolio.id)], conn)?;
        }
        PortfolioOperation::EditFixedIncomeAsset(input) => {
            debug!("editing fixed income asset {}", input.id);
            repository.update_asset(&portfolio.id, input.into(), conn)?;
        }
        PortfolioOperation::DeleteFixedIncomeAsset(input) => {
            debug!("deleting fixed income asset {}", input.id);
            repository.delete_asset(&portfolio.id, &input.id, conn)?;
        }

        PortfolioOperation::CreatePrincipalDrawGroupTransaction(input) => {
            create_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::PrincipalDraw),
                conn,
            )?;
        }
        PortfolioOperation::CreatePrincipalReturnGroupTransaction(input) => {
            create_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::PrincipalReturn),
                conn,
            )?;
        }
        PortfolioOperation::CreateAssetPurchaseGroupTransaction(input) => {
            create_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::AssetPurchase),
                conn,
            )?;
        }
        PortfolioOperation::CreateAssetSaleGroupTransaction(input) => {
            create_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::AssetSale),
                conn,
            )?;
        }
        PortfolioOperation::CreateInterestDrawGroupTransaction(input) => {
            create_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::InterestDraw),
                conn,
            )?;
        }
        PortfolioOperation::CreateInterestReturnGroupTransaction(input) => {
            create_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::InterestReturn),
                conn,
            )?;
        }
        PortfolioOperation::CreateFeesPaymentGroupTransaction(input) => {
            create_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::FeesPayment),
                conn,
            )?;
        }

        PortfolioOperation::EditPrincipalDrawGroupTransaction(input) => {
            edit_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::PrincipalDraw),
                conn,
            )?;
        }
        PortfolioOperation::EditPrincipalReturnGroupTransaction(input) => {
            edit_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::PrincipalReturn),
                conn,
            )?;
        }
        PortfolioOperation::EditAssetPurchaseGroupTransaction(input) => {
            edit_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::AssetPurchase),
                conn,
            )?;
        }
        PortfolioOperation::EditAssetSaleGroupTransaction(input) => {
            edit_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::AssetSale),
                conn,
            )?;
        }
        PortfolioOperation::EditInterestDrawGroupTransaction(input) => {
            edit_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::InterestDraw),
                conn,
            )?;
        }
        PortfolioOperation::EditInterestReturnGroupTransaction(input) => {
            edit_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::InterestReturn),
                conn,
            )?;
        }
        PortfolioOperation::EditFeesPaymentGroupTransaction(input) => {
            edit_group_transaction(
                repository,
                portfolio,
                input.into_parts(GroupTransactionType::FeesPayment),
                conn,
            )?;
        }

        PortfolioOperation::EditGroupTransactionType(input) => {
            debug!("editing group transaction type {}", input.id);
            repository.update_group_transaction_type(
                &portfolio.id,
                &input.id,
                input.transaction_type,
                conn,
            )?;
        }
        PortfolioOperation::AddFeeTransactionsToGroupTransaction(input) => {
            add_fee_transactions(repository, portfolio, input, conn)?;
        }
        PortfolioOperation::EditFeeTransaction(input) => {
            debug!("editing fee transaction {}", input.id);
            repository.update_base_transaction(&portfolio.id, input.into(), conn)?;
        }
        PortfolioOperation::RemoveFeeTransactionFromGroupTransaction(input) => {
            debug!(
                "removing fee transaction {} from group transaction {}",
                input.fee_transaction_id, input.id
            );
            repository.delete_base_transaction(&portfolio.id, &input.fee_transaction_id, conn)?;
        }
        PortfolioOperation::DeleteGroupTransaction(input) => {
            delete_group_transaction(repository, portfolio, &input.id, conn)?;
        }
    }

    Ok(())
}

fn create_group_transaction(
    repository: &dyn PortfolioRepositoryTrait,
    portfolio: &Portfolio,
    parts: GroupTransactionParts,
    conn: &mut SqliteConnection,
) -> Result<()> {
    debug!(
        "creating {} group transaction {}",
        parts.transaction_type, parts.id
    );
    create_group_transaction_subgraph(repository, portfolio, parts, conn)
}

/// Updates the discriminator, then updates every referenced base transaction
/// by its own identity. The referenced rows are assumed to exist; a missing
/// one means the document's history diverged and surfaces as
/// `MissingTargetRow`, which is exactly why reverts force a rebuild instead.
fn edit_group_transaction(
    repository: &dyn PortfolioRepositoryTrait,
    portfolio: &Portfolio,
    parts: GroupTransactionParts,
    conn: &mut SqliteConnection,
) -> Result<()> {
    debug!(
        "editing {} group transaction {}",
        parts.transaction_type, parts.id
    );
    repository.update_group_transaction_type(
        &portfolio.id,
        &parts.id,
        parts.transaction_type,
        conn,
    )?;

    for fee in parts.fee_transactions {
        repository.update_base_transaction(&portfolio.id, fee.into(), conn)?;
    }
    for leg in [
        parts.cash_transaction,
        parts.fixed_income_transaction,
        parts.interest_transaction,
    ]
    .into_iter()
    .flatten()
    {
        repository.update_base_transaction(&portfolio.id, leg.into(), conn)?;
    }

    Ok(())
}

fn add_fee_transactions(
    repository: &dyn PortfolioRepositoryTrait,
    portfolio: &Portfolio,
    input: AddFeeTransactionsInput,
    conn: &mut SqliteConnection,
) -> Result<()> {
    debug!(
        "adding {} fee transactions to group transaction {}",
        input.fee_transactions.len(),
        input.id
    );
    let links: Vec<FeeTransactionLink> = input
        .fee_transactions
        .iter()
        .map(|fee| FeeTransactionLink {
            portfolio_id: portfolio.id.clone(),
            base_transaction_id: fee.id.clone(),
            group_transaction_id: input.id.clone(),
        })
        .collect();
    let rows: Vec<_> = input
        .fee_transactions
        .into_iter()
        .map(|fee| fee.into_row(&portfolio.id))
        .collect();
    repository.create_base_transactions(&rows, conn)?;
    repository.create_fee_transaction_links(&links, conn)?;
    Ok(())
}

fn delete_group_transaction(
    repository: &dyn PortfolioRepositoryTrait,
    portfolio: &Portfolio,
    id: &str,
    conn: &mut SqliteConnection,
) -> Result<()> {
    debug!("deleting group transaction {id}");
    let deleted = repository.delete_group_transaction(&portfolio.id, id, conn)?;

    // Cash and fixed-income legs are owned 1:1 by the group transaction.
    // Fee legs only lose their join rows and stay independently addressable.
    if let Some(cash_id) = deleted.cash_transaction_id {
        repository.delete_base_transaction(&portfolio.id, &cash_id, conn)?;
    }
    if let Some(fixed_id) = deleted.fixed_transaction_id {
        repository.delete_base_transaction(&portfolio.id, &fixed_id, conn)?;
    }

    Ok(())
}
