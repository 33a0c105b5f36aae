//! Resource registry: URI templates routed onto client calls.

use std::future::Future;
use std::pin::Pin;

use openfinance_core::uri::{get_int, get_string, get_string_array, get_time, QueryParams};
use openfinance_core::{
    InvestmentType, InvestmentsFilter, PluggyClient, ResourceUri, TimeLayout, TransactionFilter,
    UriTemplate,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, CliError>> + Send + 'a>>;

type ReadFn = for<'a> fn(&'a PluggyClient, &'a ResourceUri) -> HandlerFuture<'a>;

/// Listing entry for one resource template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescription {
    pub uri_template: String,
    /// Path placeholders a URI must fill.
    pub path_params: Vec<String>,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

pub struct ResourceHandler {
    template: UriTemplate,
    name: &'static str,
    description: &'static str,
    read: ReadFn,
}

impl ResourceHandler {
    fn new(
        template: &str,
        name: &'static str,
        description: &'static str,
        read: ReadFn,
    ) -> Result<Self, CliError> {
        Ok(Self {
            template: UriTemplate::parse(template)?,
            name,
            description,
            read,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn describe(&self) -> ResourceDescription {
        ResourceDescription {
            uri_template: self.template.as_str().to_owned(),
            path_params: self.template.param_names().to_vec(),
            name: self.name,
            description: self.description,
            mime_type: "application/json",
        }
    }

    pub fn read<'a>(&'a self, client: &'a PluggyClient, uri: &'a ResourceUri) -> HandlerFuture<'a> {
        (self.read)(client, uri)
    }
}

pub struct ResourceRegistry {
    handlers: Vec<ResourceHandler>,
}

impl ResourceRegistry {
    pub fn new() -> Result<Self, CliError> {
        let handlers = vec![
            ResourceHandler::new(
                "items://{item_id}",
                "item",
                "Item with its connector and sync status",
                read_item,
            )?,
            ResourceHandler::new(
                "items://{item_id}/accounts",
                "item_accounts",
                "Bank and credit accounts of an item",
                read_item_accounts,
            )?,
            ResourceHandler::new(
                "items://{item_id}/investments?type&page&pageSize",
                "item_investments",
                "Investments of an item, optionally filtered by type",
                read_item_investments,
            )?,
            ResourceHandler::new(
                "accounts://{account_id}",
                "account",
                "Single account",
                read_account,
            )?,
            ResourceHandler::new(
                "accounts://{account_id}/transactions?from&to&page&pageSize&createdAtFrom&ids",
                "account_transactions",
                "Transactions of an account by date range or ids",
                read_account_transactions,
            )?,
            ResourceHandler::new(
                "accounts://{account_id}/bills",
                "account_bills",
                "Credit card bills of an account",
                read_account_bills,
            )?,
            ResourceHandler::new("bills://{bill_id}", "bill", "Single bill", read_bill)?,
        ];
        Ok(Self { handlers })
    }

    pub fn describe(&self) -> Vec<ResourceDescription> {
        self.handlers.iter().map(ResourceHandler::describe).collect()
    }

    /// First handler whose template matches `uri`, with the bound parameters.
    pub fn resolve(&self, uri: &str) -> Result<(&ResourceHandler, ResourceUri), CliError> {
        let parsed = ResourceUri::parse(uri)?;
        self.handlers
            .iter()
            .filter(|handler| handler.template.scheme() == parsed.scheme())
            .find_map(|handler| {
                handler
                    .template
                    .match_uri(uri)
                    .ok()
                    .map(|resource| (handler, resource))
            })
            .ok_or_else(|| CliError::UnknownResource(uri.to_owned()))
    }

    pub async fn read(&self, client: &PluggyClient, uri: &str) -> Result<Value, CliError> {
        let (handler, resource) = self.resolve(uri)?;
        tracing::debug!(handler = handler.name(), uri = %resource, "reading resource");
        handler.read(client, &resource).await
    }
}

fn path_param<'a>(uri: &'a ResourceUri, name: &str) -> Result<&'a str, CliError> {
    uri.path_param(name)
        .ok_or_else(|| CliError::usage(format!("'{uri}' has no {name}")))
}

/// Zero and negative values mean "not given".
fn positive(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|value| *value > 0)
}

pub fn investments_filter(params: &QueryParams) -> Result<InvestmentsFilter, CliError> {
    let raw_type = get_string(params, "type");
    let investment_type = if raw_type.is_empty() {
        None
    } else {
        Some(InvestmentType::parse(raw_type).ok_or_else(|| {
            CliError::usage(format!("unknown investment type '{raw_type}'"))
        })?)
    };

    Ok(InvestmentsFilter {
        investment_type,
        page: positive(get_int(params, "page")),
        page_size: positive(get_int(params, "pageSize")),
    })
}

/// `ids` may repeat or hold a comma-separated list.
pub fn transaction_filter(params: &QueryParams) -> TransactionFilter {
    let ids = get_string_array(params, "ids")
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect();

    TransactionFilter {
        ids,
        page: positive(get_int(params, "page")),
        page_size: positive(get_int(params, "pageSize")),
        from: get_time(params, "from", TimeLayout::Date).map(|timestamp| timestamp.date()),
        to: get_time(params, "to", TimeLayout::Date).map(|timestamp| timestamp.date()),
        created_at_from: get_time(params, "createdAtFrom", TimeLayout::Rfc3339),
    }
}

fn read_item<'a>(client: &'a PluggyClient, uri: &'a ResourceUri) -> HandlerFuture<'a> {
    Box::pin(async move {
        let item = client.item(path_param(uri, "item_id")?).await?;
        Ok(serde_json::to_value(item)?)
    })
}

fn read_item_accounts<'a>(client: &'a PluggyClient, uri: &'a ResourceUri) -> HandlerFuture<'a> {
    Box::pin(async move {
        let accounts = client.accounts(path_param(uri, "item_id")?).await?;
        Ok(serde_json::to_value(accounts)?)
    })
}

fn read_item_investments<'a>(client: &'a PluggyClient, uri: &'a ResourceUri) -> HandlerFuture<'a> {
    Box::pin(async move {
        let filter = investments_filter(uri.query_params())?;
        let investments = client
            .investments(path_param(uri, "item_id")?, Some(&filter))
            .await?;
        Ok(serde_json::to_value(investments)?)
    })
}

fn read_account<'a>(client: &'a PluggyClient, uri: &'a ResourceUri) -> HandlerFuture<'a> {
    Box::pin(async move {
        let account = client.account(path_param(uri, "account_id")?).await?;
        Ok(serde_json::to_value(account)?)
    })
}

fn read_account_transactions<'a>(
    client: &'a PluggyClient,
    uri: &'a ResourceUri,
) -> HandlerFuture<'a> {
    Box::pin(async move {
        let filter = transaction_filter(uri.query_params());
        let transactions = client
            .transactions(path_param(uri, "account_id")?, Some(&filter))
            .await?;
        Ok(serde_json::to_value(transactions)?)
    })
}

fn read_account_bills<'a>(client: &'a PluggyClient, uri: &'a ResourceUri) -> HandlerFuture<'a> {
    Box::pin(async move {
        let bills = client.bills(path_param(uri, "account_id")?).await?;
        Ok(serde_json::to_value(bills)?)
    })
}

fn read_bill<'a>(client: &'a PluggyClient, uri: &'a ResourceUri) -> HandlerFuture<'a> {
    Box::pin(async move {
        let bill = client.bill(path_param(uri, "bill_id")?).await?;
        Ok(serde_json::to_value(bill)?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn registry() -> ResourceRegistry {
        ResourceRegistry::new().expect("templates compile")
    }

    #[test]
    fn every_template_is_listed_once() {
        let names = registry()
            .describe()
            .into_iter()
            .map(|description| description.name)
            .collect::<Vec<_>>();

        assert_eq!(
            names,
            vec![
                "item",
                "item_accounts",
                "item_investments",
                "account",
                "account_transactions",
                "account_bills",
                "bill",
            ]
        );
    }

    #[test]
    fn listing_names_the_path_placeholders() {
        let descriptions = registry().describe();

        assert_eq!(descriptions[0].path_params, vec![String::from("item_id")]);
        assert_eq!(
            descriptions[4].path_params,
            vec![String::from("account_id")]
        );
        assert_eq!(descriptions[6].path_params, vec![String::from("bill_id")]);
    }

    #[test]
    fn uris_resolve_to_the_most_specific_template() {
        let registry = registry();

        let (handler, resource) = registry.resolve("items://item-1").expect("item");
        assert_eq!(handler.name(), "item");
        assert_eq!(resource.path_param("item_id"), Some("item-1"));

        let (handler, _) = registry
            .resolve("items://item-1/investments?type=ETF")
            .expect("investments");
        assert_eq!(handler.name(), "item_investments");

        let (handler, resource) = registry
            .resolve("accounts://acc-1/transactions?page=2")
            .expect("transactions");
        assert_eq!(handler.name(), "account_transactions");
        assert_eq!(resource.path_param("account_id"), Some("acc-1"));
    }

    #[test]
    fn unmatched_uris_are_reported() {
        let registry = registry();

        assert!(matches!(
            registry.resolve("accounts://acc-1/loans"),
            Err(CliError::UnknownResource(_))
        ));
        assert!(matches!(
            registry.resolve("loans://1"),
            Err(CliError::UnknownResource(_))
        ));
        assert!(matches!(registry.resolve("nope"), Err(CliError::Uri(_))));
    }

    #[test]
    fn transaction_query_maps_onto_the_filter() {
        let resource = ResourceUri::parse(
            "accounts://acc-1/transactions?from=2024-01-01&to=bogus&page=0&pageSize=50&createdAtFrom=2024-01-05T00:00:00Z&ids=t1,t2&ids=t3",
        )
        .expect("parses");

        let filter = transaction_filter(resource.query_params());

        assert_eq!(filter.ids, vec!["t1", "t2", "t3"]);
        assert_eq!(filter.from, Some(date!(2024 - 01 - 01)));
        assert_eq!(filter.to, None);
        assert_eq!(filter.page, None);
        assert_eq!(filter.page_size, Some(50));
        assert_eq!(
            filter.created_at_from,
            Some(datetime!(2024-01-05 00:00:00 UTC))
        );
    }

    #[test]
    fn investment_type_must_be_known() {
        let known = ResourceUri::parse("items://i/investments?type=mutual_fund&page=3")
            .expect("parses");
        let filter = investments_filter(known.query_params()).expect("known type");
        assert_eq!(filter.investment_type, Some(InvestmentType::MutualFund));
        assert_eq!(filter.page, Some(3));

        let unknown = ResourceUri::parse("items://i/investments?type=CRYPTO").expect("parses");
        assert!(matches!(
            investments_filter(unknown.query_params()),
            Err(CliError::Usage(_))
        ));
    }
}
