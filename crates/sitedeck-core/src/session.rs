// ── Console session ──
//
// Session-scoped state: the API client, the global configuration and the
// two schema documents. Each is loaded on first use and replaced as a
// whole, never patched in place.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use sitedeck_api::{ConsoleClient, GlobalConfig, SchemaDocument};
use tracing::{debug, info};

use crate::editor::{Editor, FormDescriptor, ViewMode};
use crate::error::CoreError;

pub struct Session {
    client: Arc<ConsoleClient>,
    global: ArcSwapOption<GlobalConfig>,
    site_schema: ArcSwapOption<SchemaDocument>,
    global_schema: ArcSwapOption<SchemaDocument>,
}

impl Session {
    pub fn new(client: Arc<ConsoleClient>) -> Self {
        Self {
            client,
            global: ArcSwapOption::empty(),
            site_schema: ArcSwapOption::empty(),
            global_schema: ArcSwapOption::empty(),
        }
    }

    pub fn client(&self) -> &Arc<ConsoleClient> {
        &self.client
    }

    // ── Schemas ──────────────────────────────────────────────────────

    /// The site schema, fetched once per session.
    pub async fn site_schema(&self) -> Result<Arc<SchemaDocument>, CoreError> {
        if let Some(schema) = self.site_schema.load_full() {
            return Ok(schema);
        }
        let schema = Arc::new(self.client.get_schema().await?);
        self.site_schema.store(Some(Arc::clone(&schema)));
        Ok(schema)
    }

    /// The global-config schema, fetched once per session.
    pub async fn global_schema(&self) -> Result<Arc<SchemaDocument>, CoreError> {
        if let Some(schema) = self.global_schema.load_full() {
            return Ok(schema);
        }
        let schema = Arc::new(self.client.get_global_schema().await?);
        self.global_schema.store(Some(Arc::clone(&schema)));
        Ok(schema)
    }

    pub async fn site_form(&self) -> Result<FormDescriptor, CoreError> {
        let schema = self.site_schema().await?;
        FormDescriptor::for_site(&schema)
    }

    pub async fn global_form(&self) -> Result<FormDescriptor, CoreError> {
        let schema = self.global_schema().await?;
        FormDescriptor::for_global(&schema)
    }

    // ── Global configuration ─────────────────────────────────────────

    /// The global configuration, fetched on first use.
    pub async fn global_config(&self) -> Result<Arc<GlobalConfig>, CoreError> {
        match self.global.load_full() {
            Some(global) => Ok(global),
            None => self.reload_global().await,
        }
    }

    /// Re-fetch the global configuration from the service.
    pub async fn reload_global(&self) -> Result<Arc<GlobalConfig>, CoreError> {
        let global = Arc::new(self.client.get_global_config().await?);
        self.global.store(Some(Arc::clone(&global)));
        debug!("global config loaded");
        Ok(global)
    }

    /// Last loaded global configuration, without touching the network.
    pub fn cached_global(&self) -> Option<Arc<GlobalConfig>> {
        self.global.load_full()
    }

    /// A text-view editor seeded with the current global configuration.
    ///
    /// The global schema is not loaded; call
    /// [`edit_global_form`](Self::edit_global_form) for field edits.
    pub async fn edit_global(&self) -> Result<Editor<GlobalConfig>, CoreError> {
        let global = self.global_config().await?;
        let editor = Editor::existing(GlobalConfig::clone(&global), FormDescriptor::default())?;
        Ok(editor.in_text_view())
    }

    /// A form-view editor over the global configuration.
    pub async fn edit_global_form(&self) -> Result<Editor<GlobalConfig>, CoreError> {
        let mut editor = self.edit_global().await?;
        editor.attach_form(self.global_form().await?);
        editor.switch_mode(ViewMode::Form)?;
        Ok(editor)
    }

    /// Persist the editor's value as a full replacement.
    pub async fn save_global(
        &self,
        editor: &mut Editor<GlobalConfig>,
    ) -> Result<Arc<GlobalConfig>, CoreError> {
        let client = Arc::clone(&self.client);
        let saved = editor
            .save(|draft| async move { Ok(client.update_global_config(&draft).await?) })
            .await?;
        let saved = Arc::new(saved);
        self.global.store(Some(Arc::clone(&saved)));
        info!("global config saved");
        Ok(saved)
    }
}
