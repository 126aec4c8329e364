//! Portfolio read model - domain entities and the store contract.

mod portfolio_model;
mod portfolio_traits;

pub use portfolio_model::{
    Account, AccountUpdate, Asset, AssetType, AssetUpdate, BaseTransaction, BaseTransactionUpdate,
    FeeTransactionLink, FixedIncomeType, FixedIncomeTypeUpdate, GroupTransaction,
    GroupTransactionType, Portfolio, ServiceProvider, ServiceProviderUpdate, Spv, SpvUpdate,
};
pub use portfolio_traits::PortfolioRepositoryTrait;
