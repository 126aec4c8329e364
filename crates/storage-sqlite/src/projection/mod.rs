//! SQLite storage implementation for the portfolio projection.

mod model;
mod repository;

pub use model::{
    AccountDB, AssetDB, BaseTransactionDB, FeeTransactionLinkDB, FixedIncomeTypeDB,
    GroupTransactionDB, PortfolioDB, ServiceProviderDB, SpvDB,
};
pub use repository::PortfolioRepository;
