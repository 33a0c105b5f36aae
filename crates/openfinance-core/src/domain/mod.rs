//! # Domain Models
//!
//! Decode targets for the upstream open-finance API, the filters used to
//! refine list requests, and the month-bucketed [`Statement`] view.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Item`] | Connection to one institution, with its [`ItemStatus`] |
//! | [`Account`] | Bank or credit account under an item |
//! | [`Transaction`] | Account movement, optionally with card metadata |
//! | [`Investment`] | Investment position under an item |
//! | [`Bill`] | Credit card bill |
//! | [`Page`] | One page of any list endpoint |
//!
//! Unknown JSON fields are ignored and missing optional fields default, so
//! upstream additions never break decoding.

mod filter;
mod models;
mod statement;

pub use filter::{InvestmentType, InvestmentsFilter, QueryPairs, TransactionFilter};
pub use models::{
    Account, BankData, Bill, Connector, ConnectorHealth, CreditCardMetadata, CreditData,
    DocumentNumber, FinanceCharge, Institution, Investment, InvestmentTransaction, Item,
    ItemStatus, Merchant, Page, PaymentData, PaymentParty, Transaction,
};
pub use statement::Statement;
