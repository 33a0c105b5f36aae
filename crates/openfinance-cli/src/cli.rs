//! CLI argument definitions for openfinance.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `resources` | List the resource templates that `read` understands |
//! | `tools` | List the tools that `tool` understands |
//! | `read` | Read one resource URI |
//! | `tool` | Invoke one tool |
//! | `statements` | Flatten an account's transactions into monthly statements |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--cache` | `redis` | Credential cache backend (memory, redis) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--log-file` | stderr | Append logs to this file instead |
//!
//! # Examples
//!
//! ```bash
//! openfinance read items://9f3c.../accounts --pretty
//! openfinance read "accounts://acc-1/transactions?from=2024-01-01&to=2024-01-31"
//! openfinance tool pluggy_connect_token --item-id 9f3c...
//! openfinance statements --account-id acc-1 --from 2024-01-01
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use openfinance_core::TimeLayout;
use time::Date;

/// Open-finance aggregation API from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "openfinance",
    author,
    version,
    about = "Open-finance aggregation API client",
    long_about = "Reads accounts, transactions, investments, bills and items from the \
aggregation API through resource URIs, and runs the credential and sync tools.\n\
\n\
Credentials come from PLUGGY_CLIENT_ID and PLUGGY_CLIENT_SECRET (a .env file \
in the working directory is loaded first)."
)]
pub struct Cli {
    /// Where the API key and connect tokens are cached.
    #[arg(long, global = true, value_enum, default_value_t = CacheBackend::Redis)]
    pub cache: CacheBackend,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Append logs to this file instead of stderr.
    ///
    /// Falls back to OPENFINANCE_LOG_FILE when not given.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Credential cache backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackend {
    /// Process-local cache; every run exchanges credentials again.
    Memory,
    /// Shared Redis cache configured from REDIS_HOST, REDIS_PORT and REDIS_PASSWORD.
    Redis,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List resource templates.
    Resources,

    /// List tools.
    Tools,

    /// Read a resource URI.
    ///
    /// # Examples
    ///
    ///   openfinance read items://ITEM_ID
    ///   openfinance read "items://ITEM_ID/investments?type=FIXED_INCOME&pageSize=50"
    ///   openfinance read bills://BILL_ID
    Read(ReadArgs),

    /// Invoke a tool.
    ///
    /// # Examples
    ///
    ///   openfinance tool pluggy_api_key
    ///   openfinance tool pluggy_wait_item_updated --item-id ITEM_ID
    Tool(ToolArgs),

    /// Monthly statements for every transaction of an account.
    Statements(StatementsArgs),
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Resource URI, e.g. accounts://ACCOUNT_ID/bills.
    pub uri: String,
}

#[derive(Debug, Args)]
pub struct ToolArgs {
    /// Tool name as listed by `openfinance tools`.
    pub name: String,

    /// Item the tool acts on.
    #[arg(long)]
    pub item_id: Option<String>,
}

#[derive(Debug, Args)]
pub struct StatementsArgs {
    #[arg(long)]
    pub account_id: String,

    /// First day to include (yyyy-mm-dd).
    #[arg(long, value_parser = parse_date)]
    pub from: Option<Date>,

    /// Last day to include (yyyy-mm-dd).
    #[arg(long, value_parser = parse_date)]
    pub to: Option<Date>,

    /// Transactions fetched per page.
    #[arg(long, default_value_t = 500)]
    pub page_size: u32,
}

fn parse_date(value: &str) -> Result<Date, String> {
    TimeLayout::Date
        .parse(value)
        .map(|timestamp| timestamp.date())
        .ok_or_else(|| format!("'{value}' is not a yyyy-mm-dd date"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use time::macros::date;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn statements_parse_dates_and_global_flags() {
        let cli = Cli::try_parse_from([
            "openfinance",
            "statements",
            "--account-id",
            "acc-1",
            "--from",
            "2024-01-01",
            "--cache",
            "memory",
            "--pretty",
        ])
        .expect("valid arguments");

        assert_eq!(cli.cache, CacheBackend::Memory);
        assert!(cli.pretty);
        match cli.command {
            Command::Statements(args) => {
                assert_eq!(args.account_id, "acc-1");
                assert_eq!(args.from, Some(date!(2024 - 01 - 01)));
                assert_eq!(args.to, None);
                assert_eq!(args.page_size, 500);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let result = Cli::try_parse_from([
            "openfinance",
            "statements",
            "--account-id",
            "acc-1",
            "--to",
            "31/01/2024",
        ]);
        assert!(result.is_err());
    }
}
