// Site configuration endpoints
//
// CRUD over `/config/sites` plus the site schema document. The id in the
// path is authoritative on update; the body's id is never used to rename.

use reqwest::Method;
use tracing::debug;

use crate::client::ConsoleClient;
use crate::error::Error;
use crate::model::{SchemaDocument, SiteConfig};

impl ConsoleClient {
    /// Fetch the schema document describing `SiteConfig`.
    ///
    /// `GET /config/schema`
    pub async fn get_schema(&self) -> Result<SchemaDocument, Error> {
        debug!("fetching site schema");
        self.get(&["config", "schema"]).await
    }

    /// List all sites, in the order the service returns them.
    ///
    /// `GET /config/sites`
    pub async fn list_sites(&self) -> Result<Vec<SiteConfig>, Error> {
        debug!("listing sites");
        self.get(&["config", "sites"]).await
    }

    /// `GET /config/sites/{id}`
    pub async fn get_site(&self, id: &str) -> Result<SiteConfig, Error> {
        debug!(id, "fetching site");
        self.get(&["config", "sites", id]).await
    }

    /// Create a site. Fails with [`Error::Conflict`] if the id is taken.
    ///
    /// `POST /config/sites`
    pub async fn create_site(&self, site: &SiteConfig) -> Result<SiteConfig, Error> {
        debug!(id = %site.id, "creating site");
        self.send_json(Method::POST, &["config", "sites"], site)
            .await
    }

    /// Replace a site. Fails with [`Error::NotFound`] if absent.
    ///
    /// `PUT /config/sites/{id}`
    pub async fn update_site(&self, id: &str, site: &SiteConfig) -> Result<SiteConfig, Error> {
        debug!(id, "updating site");
        self.send_json(Method::PUT, &["config", "sites", id], site)
            .await
    }

    /// Delete a site. Fails with [`Error::NotFound`] if absent.
    ///
    /// `DELETE /config/sites/{id}`
    pub async fn delete_site(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting site");
        self.delete(&["config", "sites", id]).await
    }
}
