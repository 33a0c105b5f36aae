use openfinance_core::PluggyClient;
use serde_json::Value;

use crate::cli::ToolArgs;
use crate::error::CliError;
use crate::tools::{ToolInput, ToolRegistry};

pub async fn run(args: &ToolArgs, client: &PluggyClient) -> Result<Value, CliError> {
    let registry = ToolRegistry::default();
    let handler = registry.get(&args.name)?;
    let input = ToolInput {
        item_id: args.item_id.clone(),
    };
    handler.invoke(client, &input).await
}
