//! Tool registry: named operations that are not plain resource reads.

use openfinance_core::PluggyClient;
use serde::Serialize;
use serde_json::json;

use crate::error::CliError;
use crate::resources::HandlerFuture;

type InvokeFn = for<'a> fn(&'a PluggyClient, &'a ToolInput) -> HandlerFuture<'a>;

/// Arguments accepted by tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolInput {
    pub item_id: Option<String>,
}

impl ToolInput {
    fn item_id(&self, tool: &str) -> Result<&str, CliError> {
        self.item_id
            .as_deref()
            .map(str::trim)
            .filter(|item_id| !item_id.is_empty())
            .ok_or_else(|| CliError::usage(format!("{tool} requires --item-id")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescription {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: &'static [&'static str],
}

pub struct ToolHandler {
    name: &'static str,
    description: &'static str,
    arguments: &'static [&'static str],
    invoke: InvokeFn,
}

impl ToolHandler {
    pub fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: self.name,
            description: self.description,
            arguments: self.arguments,
        }
    }

    pub fn invoke<'a>(&'a self, client: &'a PluggyClient, input: &'a ToolInput) -> HandlerFuture<'a> {
        (self.invoke)(client, input)
    }
}

pub struct ToolRegistry {
    handlers: Vec<ToolHandler>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self {
            handlers: vec![
                ToolHandler {
                    name: "pluggy_api_key",
                    description: "Exchange the client credentials for a new API key",
                    arguments: &[],
                    invoke: api_key,
                },
                ToolHandler {
                    name: "pluggy_connect_token",
                    description: "Issue a connect token so the user can update an item",
                    arguments: &["item_id"],
                    invoke: connect_token,
                },
                ToolHandler {
                    name: "pluggy_wait_item_updated",
                    description: "Wait until an item finishes syncing and return it",
                    arguments: &["item_id"],
                    invoke: wait_item_updated,
                },
            ],
        }
    }
}

impl ToolRegistry {
    pub fn describe(&self) -> Vec<ToolDescription> {
        self.handlers.iter().map(ToolHandler::describe).collect()
    }

    pub fn get(&self, name: &str) -> Result<&ToolHandler, CliError> {
        self.handlers
            .iter()
            .find(|handler| handler.name == name)
            .ok_or_else(|| CliError::UnknownTool(name.to_owned()))
    }
}

fn api_key<'a>(client: &'a PluggyClient, _input: &'a ToolInput) -> HandlerFuture<'a> {
    Box::pin(async move {
        let api_key = client.api_key().await?;
        Ok(json!({ "apiKey": api_key }))
    })
}

fn connect_token<'a>(client: &'a PluggyClient, input: &'a ToolInput) -> HandlerFuture<'a> {
    Box::pin(async move {
        let item_id = input.item_id("pluggy_connect_token")?;
        let token = client.connect_token(item_id).await?;
        Ok(json!({ "itemId": item_id, "accessToken": token }))
    })
}

fn wait_item_updated<'a>(client: &'a PluggyClient, input: &'a ToolInput) -> HandlerFuture<'a> {
    Box::pin(async move {
        let item_id = input.item_id("pluggy_wait_item_updated")?;
        let item = client.wait_updated(item_id).await?;
        Ok(serde_json::to_value(item)?)
    })
}
