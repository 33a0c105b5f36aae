use super::{require_id, segment, PluggyClient};
use crate::domain::{
    Account, Bill, Investment, InvestmentsFilter, Page, QueryPairs, Transaction,
    TransactionFilter,
};
use crate::error::ClientError;

// List endpoints go through the rate limiter; lookups by id do not.
impl PluggyClient {
    pub async fn accounts(&self, item_id: &str) -> Result<Page<Account>, ClientError> {
        let item_id = require_id("item id", item_id)?;
        self.get_json(
            "/accounts",
            "/accounts",
            vec![("itemId", item_id.to_owned())],
            true,
        )
        .await
    }

    pub async fn account(&self, account_id: &str) -> Result<Account, ClientError> {
        let account_id = require_id("account id", account_id)?;
        self.get_json(
            "/accounts/{id}",
            &format!("/accounts/{}", segment(account_id)),
            QueryPairs::new(),
            false,
        )
        .await
    }

    pub async fn transactions(
        &self,
        account_id: &str,
        filter: Option<&TransactionFilter>,
    ) -> Result<Page<Transaction>, ClientError> {
        let account_id = require_id("account id", account_id)?;
        let mut query = vec![("accountId", account_id.to_owned())];
        if let Some(filter) = filter {
            query.extend(filter.query_pairs());
        }
        self.get_json("/transactions", "/transactions", query, true)
            .await
    }

    pub async fn investments(
        &self,
        item_id: &str,
        filter: Option<&InvestmentsFilter>,
    ) -> Result<Page<Investment>, ClientError> {
        let item_id = require_id("item id", item_id)?;
        let mut query = vec![("itemId", item_id.to_owned())];
        if let Some(filter) = filter {
            query.extend(filter.query_pairs());
        }
        self.get_json("/investments", "/investments", query, true)
            .await
    }

    pub async fn bills(&self, account_id: &str) -> Result<Page<Bill>, ClientError> {
        let account_id = require_id("account id", account_id)?;
        self.get_json(
            "/bills",
            "/bills",
            vec![("accountId", account_id.to_owned())],
            true,
        )
        .await
    }

    pub async fn bill(&self, bill_id: &str) -> Result<Bill, ClientError> {
        let bill_id = require_id("bill id", bill_id)?;
        self.get_json(
            "/bills/{id}",
            &format!("/bills/{}", segment(bill_id)),
            QueryPairs::new(),
            false,
        )
        .await
    }
}
