// Hand-maintained to mirror migrations/2026-07-10-104500_create_projection.

diesel::table! {
    portfolios (id) {
        id -> Text,
        drive_id -> Text,
        document_id -> Text,
        principal_lender_account_id -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    spvs (id, portfolio_id) {
        id -> Text,
        portfolio_id -> Text,
        name -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    service_providers (id, portfolio_id) {
        id -> Text,
        portfolio_id -> Text,
        name -> Text,
        fee_type -> Text,
        account_id -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    fixed_income_types (id, portfolio_id) {
        id -> Text,
        portfolio_id -> Text,
        name -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    accounts (id, portfolio_id) {
        id -> Text,
        portfolio_id -> Text,
        reference -> Text,
        label -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    assets (asset_ref_id, portfolio_id) {
        asset_ref_id -> Text,
        portfolio_id -> Text,
        asset_type -> Text,
        name -> Nullable<Text>,
        spv_id -> Nullable<Text>,
        currency -> Nullable<Text>,
        fixed_income_type_id -> Nullable<Text>,
        maturity -> Nullable<Text>,
        purchase_date -> Nullable<Text>,
        notional -> Nullable<Text>,
        purchase_price -> Nullable<Text>,
        purchase_proceeds -> Nullable<Text>,
        total_discount -> Nullable<Text>,
        annualized_yield -> Nullable<Text>,
        coupon -> Nullable<Text>,
        isin -> Nullable<Text>,
        cusip -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    base_transactions (id, portfolio_id) {
        id -> Text,
        portfolio_id -> Text,
        asset_id -> Nullable<Text>,
        amount -> Nullable<Text>,
        entry_time -> Nullable<Text>,
        trade_time -> Nullable<Text>,
        settlement_time -> Nullable<Text>,
        tx_ref -> Nullable<Text>,
        account_id -> Nullable<Text>,
        counter_party_account_id -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    group_transactions (id, portfolio_id) {
        id -> Text,
        portfolio_id -> Text,
        transaction_type -> Text,
        entry_time -> Nullable<Text>,
        cash_transaction_id -> Nullable<Text>,
        fixed_transaction_id -> Nullable<Text>,
        interest_transaction_id -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    base_transactions_on_group_transactions (portfolio_id, base_transaction_id, group_transaction_id) {
        portfolio_id -> Text,
        base_transaction_id -> Text,
        group_transaction_id -> Text,
    }
}

diesel::table! {
    spvs_on_portfolios (portfolio_id, spv_id) {
        portfolio_id -> Text,
        spv_id -> Text,
    }
}

diesel::table! {
    service_providers_on_portfolios (portfolio_id, service_provider_id) {
        portfolio_id -> Text,
        service_provider_id -> Text,
    }
}

diesel::table! {
    fixed_income_types_on_portfolios (portfolio_id, fixed_income_type_id) {
        portfolio_id -> Text,
        fixed_income_type_id -> Text,
    }
}

diesel::table! {
    accounts_on_portfolios (portfolio_id, account_id) {
        portfolio_id -> Text,
        account_id -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    portfolios,
    spvs,
    service_providers,
    fixed_income_types,
    accounts,
    assets,
    base_transactions,
    group_transactions,
    base_transactions_on_group_transactions,
    spvs_on_portfolios,
    service_providers_on_portfolios,
    fixed_income_types_on_portfolios,
    accounts_on_portfolios,
);
