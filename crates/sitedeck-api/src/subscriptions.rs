// Subscription endpoints
//
// Both calls may trigger a full browser-automation run on the service, so
// they use the longer fetch timeout and report server errors as
// `RemoteExecution`.

use tracing::debug;

use crate::client::ConsoleClient;
use crate::error::Error;
use crate::model::FetchSummaryResponse;

impl ConsoleClient {
    /// Run a fresh fetch for a site and return its summary.
    ///
    /// `POST /subscriptions/{id}/fetch`
    pub async fn fetch_subscription(&self, id: &str) -> Result<FetchSummaryResponse, Error> {
        debug!(id, "triggering subscription fetch");
        self.post_subscription(&["subscriptions", id, "fetch"])
            .await
    }

    /// Retrieve the last extracted subscription content. `use_cache = false`
    /// forces a fresh remote fetch first.
    ///
    /// `GET /subscriptions/{id}?use_cache={bool}`
    pub async fn get_subscription(&self, id: &str, use_cache: bool) -> Result<String, Error> {
        debug!(id, use_cache, "fetching subscription content");
        self.get_subscription_text(
            &["subscriptions", id],
            &[("use_cache", use_cache.to_string())],
        )
        .await
    }
}
