// ── Site collection manager ──
//
// Owns the session, the published site list and per-site fetch state.
// Every remote call goes through the API client; local state changes only
// after the service has answered.

use std::sync::Arc;

use sitedeck_api::{ConsoleClient, FetchSummaryResponse, SiteConfig};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ConsoleConfig;
use crate::editor::Editor;
use crate::error::CoreError;
use crate::session::Session;
use crate::store::collection::{SiteCollection, SiteSnapshot};
use crate::store::fetch::{FetchState, FetchTracker};

/// Result of a confirmed-delete flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The operator declined; nothing was sent.
    Cancelled,
}

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<ManagerInner>`, so fetches for several
/// sites can run concurrently from clones of one handle.
#[derive(Clone)]
pub struct SiteManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    config: ConsoleConfig,
    session: Session,
    sites: SiteCollection,
    fetches: FetchTracker,
}

impl SiteManager {
    /// Build a manager and its HTTP client. Does not touch the network.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let client = ConsoleClient::new(config.api_url.as_str(), &config.transport())?;
        Ok(Self::with_client(config, client))
    }

    /// Build a manager around an existing client.
    pub fn with_client(config: ConsoleConfig, client: ConsoleClient) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                config,
                session: Session::new(Arc::new(client)),
                sites: SiteCollection::new(),
                fetches: FetchTracker::new(),
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    fn client(&self) -> &ConsoleClient {
        self.inner.session.client()
    }

    // ── Site list ────────────────────────────────────────────────────

    /// Re-fetch the site list and replace the published snapshot.
    pub async fn refresh(&self) -> Result<SiteSnapshot, CoreError> {
        let sites = self.client().list_sites().await?;
        debug!(count = sites.len(), "site list refreshed");
        self.inner.sites.replace(sites);
        Ok(self.inner.sites.snapshot())
    }

    /// The last published site list.
    pub fn sites_snapshot(&self) -> SiteSnapshot {
        self.inner.sites.snapshot()
    }

    /// Subscribe to site list replacements.
    pub fn subscribe(&self) -> watch::Receiver<SiteSnapshot> {
        self.inner.sites.subscribe()
    }

    /// Look a site up in the last published list.
    pub fn cached_site(&self, id: &str) -> Option<Arc<SiteConfig>> {
        self.inner.sites.get(id)
    }

    /// Load one site from the service.
    pub async fn get_site(&self, id: &str) -> Result<SiteConfig, CoreError> {
        Ok(self.client().get_site(id).await?)
    }

    // ── Create / edit ────────────────────────────────────────────────

    /// An editor over a new-site draft with service defaults.
    pub async fn new_site_editor(&self) -> Result<Editor<SiteConfig>, CoreError> {
        let form = self.inner.session.site_form().await?;
        Editor::new(SiteConfig::draft(), form)
    }

    /// An editor over an existing site, with its id locked.
    pub async fn edit_site(&self, id: &str) -> Result<Editor<SiteConfig>, CoreError> {
        let site = self.get_site(id).await?;
        let form = self.inner.session.site_form().await?;
        Editor::existing(site, form)
    }

    /// Save the editor's value: create for drafts, update otherwise.
    ///
    /// The list is refreshed afterwards; a failed refresh is logged and
    /// does not fail the save.
    pub async fn submit(&self, editor: &mut Editor<SiteConfig>) -> Result<SiteConfig, CoreError> {
        let client = Arc::clone(self.inner.session.client());
        let saved = if editor.is_new() {
            editor
                .save(|draft| async move { Ok(client.create_site(&draft).await?) })
                .await?
        } else {
            editor
                .save(|draft| async move { Ok(client.update_site(&draft.id, &draft).await?) })
                .await?
        };
        info!(id = %saved.id, "site saved");

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "site list refresh after save failed");
        }
        Ok(saved)
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Delete a site after `confirm` agrees.
    ///
    /// On failure the published list is left as it was.
    pub async fn delete_site<F>(&self, id: &str, confirm: F) -> Result<DeleteOutcome, CoreError>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(id) {
            debug!(id, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        self.client().delete_site(id).await?;
        info!(id, "site deleted");
        self.inner.fetches.forget(id);

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "site list refresh after delete failed");
        }
        Ok(DeleteOutcome::Deleted)
    }

    // ── Fetch ────────────────────────────────────────────────────────

    /// Trigger a remote fetch for one site.
    ///
    /// Rejected with [`CoreError::FetchInFlight`] while a fetch for the
    /// same id is running. Fetches for different ids are independent.
    pub async fn fetch(&self, id: &str) -> Result<FetchSummaryResponse, CoreError> {
        let ticket = self.inner.fetches.begin(id)?;
        debug!(id, "fetch started");

        match self.client().fetch_subscription(id).await {
            Ok(summary) => {
                info!(id, bytes = summary.content_length, "{summary}");
                ticket.succeed(summary.clone());
                Ok(summary)
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(id, error = %err, "fetch failed");
                ticket.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Latest fetch outcome for a site, if any.
    pub fn fetch_status(&self, id: &str) -> Option<FetchState> {
        self.inner.fetches.get(id)
    }

    pub fn is_fetching(&self, id: &str) -> bool {
        self.fetch_status(id)
            .is_some_and(|state| state.is_in_flight())
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Public subscription URL for a site. No network access.
    pub fn subscription_url(&self, id: &str) -> String {
        subscription_url(&self.inner.config.public_origin, id)
    }

    /// Raw subscription content; `use_cache = false` forces a fresh fetch.
    pub async fn subscription_content(&self, id: &str, use_cache: bool) -> Result<String, CoreError> {
        Ok(self.client().get_subscription(id, use_cache).await?)
    }
}

/// `<origin>/api/subscriptions/<id>`
pub fn subscription_url(origin: &Url, id: &str) -> String {
    format!(
        "{}/api/subscriptions/{id}",
        origin.as_str().trim_end_matches('/')
    )
}
