// Global configuration endpoints

use reqwest::Method;
use tracing::debug;

use crate::client::ConsoleClient;
use crate::error::Error;
use crate::model::{GlobalConfig, SchemaDocument};

impl ConsoleClient {
    /// `GET /config/global/schema`
    pub async fn get_global_schema(&self) -> Result<SchemaDocument, Error> {
        debug!("fetching global schema");
        self.get(&["config", "global", "schema"]).await
    }

    /// `GET /config/global`
    pub async fn get_global_config(&self) -> Result<GlobalConfig, Error> {
        debug!("fetching global config");
        self.get(&["config", "global"]).await
    }

    /// Replace the whole global configuration.
    ///
    /// `PUT /config/global`
    pub async fn update_global_config(&self, config: &GlobalConfig) -> Result<GlobalConfig, Error> {
        debug!("updating global config");
        self.send_json(Method::PUT, &["config", "global"], config)
            .await
    }
}
