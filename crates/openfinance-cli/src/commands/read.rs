use openfinance_core::PluggyClient;
use serde_json::Value;

use crate::cli::ReadArgs;
use crate::error::CliError;
use crate::resources::ResourceRegistry;

pub async fn run(args: &ReadArgs, client: &PluggyClient) -> Result<Value, CliError> {
    ResourceRegistry::new()?.read(client, &args.uri).await
}
