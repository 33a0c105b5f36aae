use std::collections::BTreeMap;

use openfinance_core::uri::QueryParams;
use openfinance_core::{Page, PluggyClient, ResourceUri, Statement, Transaction};
use serde_json::{json, Value};
use tracing::debug;

use crate::cli::StatementsArgs;
use crate::error::CliError;
use crate::resources::ResourceRegistry;

const TRANSACTIONS_TEMPLATE: &str = "accounts://{account_id}/transactions";

pub async fn run(args: &StatementsArgs, client: &PluggyClient) -> Result<Value, CliError> {
    let registry = ResourceRegistry::new()?;
    let mut statements = Vec::<Statement>::new();
    let mut page = 1;
    loop {
        let uri = page_uri(args, page)?;
        let transactions: Page<Transaction> =
            serde_json::from_value(registry.read(client, &uri).await?)?;
        debug!(
            page,
            total_pages = transactions.total_pages,
            results = transactions.results.len(),
            "fetched transactions page"
        );
        statements.extend(transactions.results.iter().map(Transaction::to_statement));

        if !transactions.has_page_after(page) {
            break;
        }
        page += 1;
    }

    Ok(json!({
        "accountId": args.account_id,
        "count": statements.len(),
        "statements": statements,
    }))
}

/// Resource URI for one page of the account's transactions.
fn page_uri(args: &StatementsArgs, page: u32) -> Result<String, CliError> {
    let path_params = BTreeMap::from([(String::from("account_id"), args.account_id.clone())]);

    let mut query = QueryParams::new();
    query.insert(String::from("page"), vec![page.to_string()]);
    query.insert(
        String::from("pageSize"),
        vec![args.page_size.max(1).to_string()],
    );
    if let Some(from) = args.from {
        query.insert(String::from("from"), vec![from.to_string()]);
    }
    if let Some(to) = args.to {
        query.insert(String::from("to"), vec![to.to_string()]);
    }

    Ok(ResourceUri::build(TRANSACTIONS_TEMPLATE, &path_params, &query)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    use openfinance_core::{
        ClientConfig, CredentialCache, HttpClient, HttpError, HttpRequest, HttpResponse,
        KeyValueStore, MemoryStore, RateLimiter, API_KEY_CACHE_KEY,
    };
    use time::macros::date;

    /// Answers `/transactions` from a queue; once it runs dry every call is a 500.
    #[derive(Default)]
    struct PagedTransport {
        pages: Mutex<VecDeque<String>>,
        urls: Mutex<Vec<String>>,
    }

    impl PagedTransport {
        fn with_pages(pages: &[String]) -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(pages.iter().cloned().collect()),
                urls: Mutex::new(Vec::new()),
            })
        }

        fn urls(&self) -> Vec<String> {
            self.urls.lock().expect("url log is not poisoned").clone()
        }
    }

    impl HttpClient for PagedTransport {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            Box::pin(async move {
                self.urls
                    .lock()
                    .expect("url log is not poisoned")
                    .push(request.url.clone());
                let next = self.pages.lock().expect("page queue is not poisoned").pop_front();
                Ok(match next {
                    Some(body) => HttpResponse::ok_json(body),
                    None => HttpResponse::new(500, "exhausted"),
                })
            })
        }
    }

    fn transaction_json(id: &str) -> String {
        format!(
            r#"{{"id":"{id}","description":"PADARIA","currencyCode":"BRL","amount":-12.5,"date":"2024-01-10T12:00:00.000Z","accountId":"acc-1","type":"DEBIT"}}"#
        )
    }

    /// Page body without the echoed `page` field.
    fn page_without_number(total_pages: u32, ids: &[&str]) -> String {
        let results = ids.iter().map(|id| transaction_json(id)).collect::<Vec<_>>();
        format!(
            r#"{{"total":{total},"totalPages":{total_pages},"results":[{results}]}}"#,
            total = ids.len(),
            results = results.join(",")
        )
    }

    async fn client(http: Arc<PagedTransport>) -> PluggyClient {
        let store = Arc::new(MemoryStore::new());
        store
            .set(API_KEY_CACHE_KEY, "cached-key", None)
            .await
            .expect("seed api key");
        let config = ClientConfig::new("id", "secret").with_base_url("https://pluggy.test");
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit));
        PluggyClient::connect(config, CredentialCache::new(store), rate_limiter, http)
            .await
            .expect("connects with cached key")
    }

    fn args() -> StatementsArgs {
        StatementsArgs {
            account_id: String::from("acc-1"),
            from: Some(date!(2024 - 01 - 01)),
            to: None,
            page_size: 0,
        }
    }

    #[test]
    fn flags_become_a_transactions_uri() {
        assert_eq!(
            page_uri(&args(), 2).expect("builds"),
            "accounts://acc-1/transactions?from=2024-01-01&page=2&pageSize=1"
        );
    }

    #[test]
    fn built_uri_routes_to_the_transactions_handler() {
        let registry = ResourceRegistry::new().expect("templates compile");
        let uri = page_uri(&args(), 1).expect("builds");

        let (handler, resource) = registry.resolve(&uri).expect("resolves");
        assert_eq!(handler.name(), "account_transactions");
        assert_eq!(resource.path_param("account_id"), Some("acc-1"));
    }

    #[tokio::test]
    async fn paging_stops_at_total_pages_when_page_is_not_echoed() {
        let http = PagedTransport::with_pages(&[
            page_without_number(3, &["tx-1"]),
            page_without_number(3, &["tx-2"]),
            page_without_number(3, &["tx-3"]),
        ]);
        let client = client(http.clone()).await;

        let output = run(&args(), &client).await.expect("statements");

        assert_eq!(output["count"], 3);
        assert_eq!(output["statements"][2]["correlation_id"], "tx-3");
        let urls = http.urls();
        assert_eq!(urls.len(), 3);
        assert!(urls[2].contains("page=3"));
    }

    #[tokio::test]
    async fn a_single_page_costs_a_single_request() {
        let http = PagedTransport::with_pages(&[page_without_number(1, &[])]);
        let client = client(http.clone()).await;

        let output = run(&args(), &client).await.expect("statements");

        assert_eq!(output["count"], 0);
        assert_eq!(http.urls().len(), 1);
    }
}
