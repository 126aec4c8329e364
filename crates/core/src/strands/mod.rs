//! Strands - the wire contract with the upstream operation log.

mod operations;
mod state;
mod strands_model;

#[cfg(test)]
mod operations_tests;

pub use operations::{
    is_surgical, AddFeeTransactionsInput, AddFileInput, DeleteInput, DeleteNodeInput,
    DriveOperation, EditAccountInput, EditCashAssetInput, EditFixedIncomeAssetInput,
    EditFixedIncomeTypeInput, EditGroupTransactionTypeInput, EditServiceProviderInput,
    EditSpvInput, PortfolioOperation, RemoveFeeTransactionInput, SURGICAL_OPERATION_TYPES,
};
pub use state::{
    AccountInput, AssetGroupTransactionInput, AssetInput, BaseTransactionInput, CashAssetInput,
    CashGroupTransactionInput, FeesGroupTransactionInput, FixedIncomeAssetInput,
    FixedIncomeTypeInput, GroupTransactionInput, GroupTransactionParts,
    InterestGroupTransactionInput, PortfolioState, ServiceProviderInput, SpvInput,
};
pub use strands_model::{ListenerFilter, OperationUpdate, ReceiverOptions, Strand};
