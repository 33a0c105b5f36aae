use tracing::info;

use super::{require_id, segment, PluggyClient};
use crate::domain::{Item, ItemStatus, QueryPairs};
use crate::error::ClientError;

impl PluggyClient {
    /// Single item by id. Not throttled.
    pub async fn item(&self, item_id: &str) -> Result<Item, ClientError> {
        let item_id = require_id("item id", item_id)?;
        self.get_json(
            "/items/{id}",
            &format!("/items/{}", segment(item_id)),
            QueryPairs::new(),
            false,
        )
        .await
    }

    /// Polls the item until it leaves `UPDATING`.
    ///
    /// Sleeps one poll interval between fetches, so a sync that is seen as
    /// `UPDATING` twice and then `UPDATED` returns after two intervals.
    /// There is no upper bound on the number of polls; callers needing one
    /// wrap this in `tokio::time::timeout`.
    ///
    /// Any status other than `UPDATED` ends the wait with
    /// [`ClientError::ItemSync`].
    pub async fn wait_updated(&self, item_id: &str) -> Result<Item, ClientError> {
        let mut polls: u32 = 0;
        loop {
            let item = self.item(item_id).await?;
            polls += 1;

            match &item.status {
                ItemStatus::Updating => {
                    info!(item_id, polls, "item still updating");
                    tokio::time::sleep(self.config.poll_interval).await;
                }
                ItemStatus::Updated => {
                    info!(item_id, polls, "item updated");
                    return Ok(item);
                }
                status => {
                    return Err(ClientError::ItemSync {
                        status: status.as_str().to_owned(),
                    });
                }
            }
        }
    }
}
