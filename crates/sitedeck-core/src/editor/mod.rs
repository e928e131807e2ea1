// ── Dual-mode editor ──
//
// One authoritative value behind two views: a structured form driven by
// the schema and a raw JSON text buffer. Invalid input in either view is
// held aside and never replaces the value; save is refused until the
// input is valid again.

pub mod form;
pub mod text;

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sitedeck_api::{GlobalConfig, SiteConfig};
use tokio::time::Instant;
use tracing::debug;

use crate::error::CoreError;

pub use form::{FieldKind, FormDescriptor, FormField};
pub use text::{from_text, to_text};

/// How long `Saved` is reported before the editor reads as `Clean`.
pub const SAVED_DISPLAY: Duration = Duration::from_secs(2);

/// Lifecycle of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum EditorState {
    Clean,
    Editing,
    Invalid,
    Saving,
    Saved,
}

/// Which view is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
pub enum ViewMode {
    #[default]
    Form,
    Text,
}

/// A configuration type the editor can hold.
pub trait Editable:
    Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Name of the field that becomes read-only once persisted.
    const ID_FIELD: Option<&'static str> = None;

    fn identity(&self) -> Option<&str> {
        None
    }

    /// Whole-value checks run before anything is sent.
    fn validate(&self) -> Result<(), String>;
}

impl Editable for SiteConfig {
    const ID_FIELD: Option<&'static str> = Some("id");

    fn identity(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn validate(&self) -> Result<(), String> {
        for (name, value) in self.required_text_fields() {
            if value.trim().is_empty() {
                return Err(format!("{name} cannot be empty"));
            }
        }
        Ok(())
    }
}

impl Editable for GlobalConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("timeout must be a positive number of milliseconds".into());
        }
        Ok(())
    }
}

/// Form input that failed to coerce, kept so the operator can correct it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInput {
    pub input: String,
    pub message: String,
}

// ── Editor ───────────────────────────────────────────────────────────

/// Edit session over one value of `T`.
#[derive(Debug)]
pub struct Editor<T: Editable> {
    value: T,
    /// Last loaded or saved value.
    baseline: T,
    text: String,
    form: FormDescriptor,
    mode: ViewMode,
    state: EditorState,
    error: Option<String>,
    pending: BTreeMap<String, PendingInput>,
    /// Identity of a persisted value; edits may not change it.
    locked_id: Option<String>,
    saved_at: Option<Instant>,
}

impl<T: Editable> Editor<T> {
    /// Editor over a draft that has not been persisted yet.
    pub fn new(value: T, form: FormDescriptor) -> Result<Self, CoreError> {
        Ok(Self {
            text: to_text(&value)?,
            baseline: value.clone(),
            value,
            form,
            mode: ViewMode::default(),
            state: EditorState::Clean,
            error: None,
            pending: BTreeMap::new(),
            locked_id: None,
            saved_at: None,
        })
    }

    /// Editor over a persisted value. Its identity field is locked.
    pub fn existing(value: T, form: FormDescriptor) -> Result<Self, CoreError> {
        let mut editor = Self::new(value, form)?;
        editor.lock_identity();
        Ok(editor)
    }

    /// Start in the text view instead of the form view.
    pub fn in_text_view(mut self) -> Self {
        self.mode = ViewMode::Text;
        self
    }

    /// Replace the form descriptors, keeping the identity lock.
    pub fn attach_form(&mut self, form: FormDescriptor) {
        self.form = form;
        if let (Some(_), Some(field)) = (&self.locked_id, T::ID_FIELD) {
            self.form.lock(field);
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The authoritative value: the last valid input.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The raw-view buffer, possibly holding invalid input.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn form(&self) -> &FormDescriptor {
        &self.form
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Current state. `Saved` reads as `Clean` once [`SAVED_DISPLAY`] has
    /// passed since the save completed.
    pub fn state(&self) -> EditorState {
        match (self.state, self.saved_at) {
            (EditorState::Saved, Some(at)) if at.elapsed() >= SAVED_DISPLAY => EditorState::Clean,
            (state, _) => state,
        }
    }

    /// Message for the current invalid input or the last failed save.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending(&self) -> &BTreeMap<String, PendingInput> {
        &self.pending
    }

    /// `true` when the identity has not been persisted yet.
    pub fn is_new(&self) -> bool {
        self.locked_id.is_none()
    }

    /// Whether the input differs from the last loaded or saved value.
    pub fn is_dirty(&self) -> bool {
        self.value != self.baseline || self.state == EditorState::Invalid
    }

    pub fn can_save(&self) -> bool {
        !matches!(self.state(), EditorState::Invalid | EditorState::Saving)
    }

    /// Current value of one field as JSON.
    pub fn field_value(&self, name: &str) -> Option<Value> {
        serde_json::to_value(&self.value)
            .ok()?
            .as_object_mut()?
            .remove(name)
    }

    // ── Edits ────────────────────────────────────────────────────────

    /// Apply one form-view edit. Switches to the form view first.
    ///
    /// Input that fails to coerce is kept as pending and moves the editor
    /// to `Invalid`; the value is left untouched.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), CoreError> {
        self.ensure_not_saving()?;
        self.switch_mode(ViewMode::Form)?;

        let field = self.form.field(name).ok_or_else(|| CoreError::UnknownField {
            name: name.to_owned(),
        })?;
        if field.read_only {
            return Err(CoreError::ReadOnlyField {
                name: name.to_owned(),
            });
        }

        let result = field
            .parse_input(raw)
            .and_then(|value| self.with_field(name, value));
        self.saved_at = None;

        match result {
            Ok(next) => {
                self.text = to_text(&next)?;
                self.value = next;
                self.pending.remove(name);
                self.settle();
                Ok(())
            }
            Err(message) => {
                debug!(field = name, %message, "form input rejected");
                self.pending.insert(
                    name.to_owned(),
                    PendingInput {
                        input: raw.to_owned(),
                        message: message.clone(),
                    },
                );
                self.state = EditorState::Invalid;
                self.error = Some(message.clone());
                Err(CoreError::validation(message))
            }
        }
    }

    /// Replace the raw-view buffer. Switches to the text view first.
    ///
    /// The text is parsed immediately; on failure the buffer keeps the
    /// input, the value keeps the last valid parse and the editor becomes
    /// `Invalid`.
    pub fn edit_text(&mut self, text: impl Into<String>) -> Result<(), CoreError> {
        self.ensure_not_saving()?;
        self.switch_mode(ViewMode::Text)?;

        self.text = text.into();
        self.saved_at = None;

        match from_text::<T>(&self.text).and_then(|v| self.check_identity(v)) {
            Ok(value) => {
                self.value = value;
                self.state = EditorState::Editing;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "raw text rejected");
                self.state = EditorState::Invalid;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Change view. The target view is re-derived from the value; pending
    /// invalid input is discarded.
    pub fn switch_mode(&mut self, mode: ViewMode) -> Result<(), CoreError> {
        self.ensure_not_saving()?;
        if self.mode == mode {
            return Ok(());
        }
        self.pending.clear();
        self.text = to_text(&self.value)?;
        if self.state == EditorState::Invalid {
            self.state = EditorState::Editing;
            self.error = None;
        }
        self.mode = mode;
        Ok(())
    }

    // ── Save ─────────────────────────────────────────────────────────

    /// Validate and enter `Saving`, returning the value to persist.
    pub fn begin_save(&mut self) -> Result<T, CoreError> {
        match self.state() {
            EditorState::Saving => Err(CoreError::EditorBusy),
            EditorState::Invalid => Err(CoreError::validation(
                self.error
                    .clone()
                    .unwrap_or_else(|| "Input is invalid".into()),
            )),
            _ => {
                if let Err(message) = self.value.validate() {
                    self.state = EditorState::Invalid;
                    self.error = Some(message.clone());
                    return Err(CoreError::validation(message));
                }
                self.state = EditorState::Saving;
                self.error = None;
                Ok(self.value.clone())
            }
        }
    }

    /// Complete a save started with [`begin_save`](Self::begin_save).
    ///
    /// On success the server's value becomes authoritative and the
    /// identity is locked. On failure the message stays attached until
    /// the next edit.
    pub fn finish_save(&mut self, result: Result<T, String>) -> Result<(), CoreError> {
        if self.state != EditorState::Saving {
            return Err(CoreError::Internal("no save in progress".into()));
        }
        match result {
            Ok(saved) => {
                let text = match to_text(&saved) {
                    Ok(text) => text,
                    Err(e) => {
                        self.state = EditorState::Editing;
                        self.error = Some(e.to_string());
                        return Err(e);
                    }
                };
                self.text = text;
                self.baseline = saved.clone();
                self.value = saved;
                self.lock_identity();
                self.state = EditorState::Saved;
                self.saved_at = Some(Instant::now());
            }
            Err(message) => {
                self.state = EditorState::Editing;
                self.error = Some(message);
            }
        }
        Ok(())
    }

    /// Run a full save through `persist`.
    pub async fn save<F, Fut>(&mut self, persist: F) -> Result<T, CoreError>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<T, CoreError>> + Send,
    {
        let draft = self.begin_save()?;
        match persist(draft).await {
            Ok(saved) => {
                self.finish_save(Ok(saved.clone()))?;
                Ok(saved)
            }
            Err(e) => {
                self.finish_save(Err(e.to_string()))?;
                Err(e)
            }
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn ensure_not_saving(&self) -> Result<(), CoreError> {
        if self.state == EditorState::Saving {
            Err(CoreError::EditorBusy)
        } else {
            Ok(())
        }
    }

    fn lock_identity(&mut self) {
        if let Some(field) = T::ID_FIELD {
            self.form.lock(field);
        }
        self.locked_id = self.value.identity().map(ToOwned::to_owned);
    }

    /// The value with one field replaced, or why that is not a valid `T`.
    fn with_field(&self, name: &str, value: Value) -> Result<T, String> {
        let mut object = serde_json::to_value(&self.value).map_err(|e| e.to_string())?;
        if let Some(map) = object.as_object_mut() {
            map.insert(name.to_owned(), value);
        }
        serde_json::from_value(object).map_err(|e| format!("{name}: {e}"))
    }

    fn check_identity(&self, value: T) -> Result<T, CoreError> {
        match &self.locked_id {
            Some(locked) if value.identity() != Some(locked.as_str()) => {
                Err(CoreError::ReadOnlyField {
                    name: T::ID_FIELD.unwrap_or("id").to_owned(),
                })
            }
            _ => Ok(value),
        }
    }

    /// State after a valid form edit: still `Invalid` while other fields
    /// hold pending input.
    fn settle(&mut self) {
        if let Some(pending) = self.pending.values().next() {
            self.state = EditorState::Invalid;
            self.error = Some(pending.message.clone());
        } else {
            self.state = EditorState::Editing;
            self.error = None;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sitedeck_api::{SchemaDocument, SubscriptionUrlType};

    fn site(id: &str) -> SiteConfig {
        let mut site = SiteConfig::draft();
        site.id = id.into();
        site.name = "Acme".into();
        site.product_url = "https://acme.test/p".into();
        site.username = "ops".into();
        site.password = "hunter2".into();
        site.login_wait_selector = "#login".into();
        site.post_login_wait_selector = "#home".into();
        site.username_selector = "#u".into();
        site.password_selector = "#p".into();
        site.login_button_selector = "#go".into();
        site.subscription_label_selector = ".label".into();
        site.subscription_group_selector = ".group".into();
        site.subscription_url_selector = ".url".into();
        site
    }

    fn site_form() -> FormDescriptor {
        let doc: SchemaDocument = serde_json::from_value(json!({
            "properties": {
                "id": {"type": "string", "title": "Id"},
                "name": {"type": "string", "title": "Name"},
                "password": {"type": "string", "title": "Password"},
                "captcha_retry_count": {"type": "integer", "title": "Captcha Retry Count"},
                "subscription_url_type": {"type": "string", "enum": ["input", "copy"], "title": "Subscription Url Type"},
                "subscription_url_attribute": {"anyOf": [{"type": "string"}, {"type": "null"}]}
            },
            "required": ["id", "name", "password"]
        }))
        .unwrap();
        FormDescriptor::for_site(&doc).unwrap()
    }

    fn existing() -> Editor<SiteConfig> {
        Editor::existing(site("acme"), site_form()).unwrap()
    }

    // ── State transitions ───────────────────────────────────────────

    #[test]
    fn first_edit_moves_clean_to_editing() {
        let mut editor = existing();
        assert_eq!(editor.state(), EditorState::Clean);
        assert!(!editor.is_dirty());

        editor.set_field("name", "Acme Corp").unwrap();
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.value().name, "Acme Corp");
        assert!(editor.is_dirty());
        assert!(editor.text().contains("\"name\": \"Acme Corp\""));
    }

    #[test]
    fn trailing_comma_keeps_last_valid_value() {
        let mut editor = existing();
        let before = editor.value().clone();
        let broken = format!("{},\n}}", editor.text().trim_end_matches('}').trim_end());

        assert!(editor.edit_text(broken.clone()).is_err());
        assert_eq!(editor.state(), EditorState::Invalid);
        assert_eq!(editor.value(), &before);
        assert_eq!(editor.text(), broken);
        assert!(!editor.can_save());
        assert!(matches!(editor.begin_save(), Err(CoreError::Validation { .. })));
    }

    #[test]
    fn valid_text_recovers_from_invalid() {
        let mut editor = existing();
        editor.edit_text("{").unwrap_err();

        let mut next = site("acme");
        next.captcha_retry_count = 5;
        editor.edit_text(to_text(&next).unwrap()).unwrap();
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.value().captcha_retry_count, 5);
        assert!(editor.error().is_none());
    }

    #[test]
    fn pending_form_input_blocks_until_corrected() {
        let mut editor = existing();
        editor.set_field("captcha_retry_count", "lots").unwrap_err();
        editor.set_field("name", "Renamed").unwrap();

        // Still invalid: the retry count is pending.
        assert_eq!(editor.state(), EditorState::Invalid);
        assert_eq!(editor.pending()["captcha_retry_count"].input, "lots");
        assert_eq!(editor.value().captcha_retry_count, 2);

        editor.set_field("captcha_retry_count", "4").unwrap();
        assert_eq!(editor.state(), EditorState::Editing);
        assert!(editor.pending().is_empty());
        assert_eq!(editor.value().captcha_retry_count, 4);
    }

    #[test]
    fn negative_count_is_rejected_by_the_model() {
        let mut editor = existing();
        let err = editor.set_field("captcha_retry_count", "-1").unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert_eq!(editor.value().captcha_retry_count, 2);
    }

    #[test]
    fn either_url_type_accepts_an_attribute() {
        let mut editor = existing();
        editor.set_field("subscription_url_type", "copy").unwrap();
        editor
            .set_field("subscription_url_attribute", "data-clipboard-text")
            .unwrap();
        editor.set_field("subscription_url_type", "input").unwrap();
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(
            editor.value().subscription_url_attribute.as_deref(),
            Some("data-clipboard-text")
        );
    }

    // ── View switching ──────────────────────────────────────────────

    #[test]
    fn switching_views_preserves_the_value() {
        let mut editor = existing();
        editor.set_field("name", "Switched").unwrap();
        let value = editor.value().clone();

        editor.switch_mode(ViewMode::Text).unwrap();
        assert_eq!(editor.value(), &value);
        assert_eq!(from_text::<SiteConfig>(editor.text()).unwrap(), value);

        editor.switch_mode(ViewMode::Form).unwrap();
        assert_eq!(editor.value(), &value);
        assert_eq!(editor.state(), EditorState::Editing);
    }

    #[test]
    fn text_round_trip_keeps_every_field() {
        let mut value = site("acme");
        value.name = "Ácmé \"Ltd\" \\ tab\t 日本".into();
        value.captcha_image_selector = Some("img#captcha".into());
        value.captcha_input_selector = Some("input[name=\"code\"]".into());
        value.captcha_retry_count = u32::MAX;
        value.subscription_url_type = SubscriptionUrlType::Copy;
        value.subscription_url_attribute = Some("data-clipboard-text".into());
        value.subscription_url_retry_delay_ms = u64::MAX;
        value.post_login_delay_ms = u64::MAX;
        value.content_validation = "strict".into();

        assert_eq!(from_text::<SiteConfig>(&to_text(&value).unwrap()).unwrap(), value);

        let mut editor = Editor::existing(value.clone(), site_form()).unwrap();
        editor.switch_mode(ViewMode::Text).unwrap();
        let text = editor.text().to_owned();
        editor.edit_text(text).unwrap();
        editor.switch_mode(ViewMode::Form).unwrap();
        assert_eq!(editor.value(), &value);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn text_view_editor_takes_a_form_later() {
        let mut editor = Editor::existing(site("acme"), FormDescriptor::default())
            .unwrap()
            .in_text_view();
        assert_eq!(editor.mode(), ViewMode::Text);
        assert!(matches!(
            editor.set_field("name", "x"),
            Err(CoreError::UnknownField { .. })
        ));

        editor.attach_form(site_form());
        assert!(editor.form().field("id").unwrap().read_only);
        editor.set_field("name", "Acme Corp").unwrap();
        assert_eq!(editor.mode(), ViewMode::Form);
        assert_eq!(editor.value().name, "Acme Corp");
    }

    #[test]
    fn switching_away_from_invalid_text_rederives() {
        let mut editor = existing();
        let value = editor.value().clone();
        editor.edit_text("not json").unwrap_err();

        editor.switch_mode(ViewMode::Form).unwrap();
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.value(), &value);
        assert_eq!(editor.text(), to_text(&value).unwrap());
    }

    // ── Read-only identity ──────────────────────────────────────────

    #[test]
    fn id_is_read_only_for_existing_sites() {
        let mut editor = existing();
        assert!(matches!(
            editor.set_field("id", "other"),
            Err(CoreError::ReadOnlyField { .. })
        ));

        let renamed = to_text(&site("other")).unwrap();
        assert!(matches!(
            editor.edit_text(renamed),
            Err(CoreError::ReadOnlyField { .. })
        ));
        assert_eq!(editor.state(), EditorState::Invalid);
        assert_eq!(editor.value().id, "acme");
    }

    #[test]
    fn id_is_editable_on_drafts() {
        let mut editor = Editor::new(SiteConfig::draft(), site_form()).unwrap();
        assert!(editor.is_new());
        editor.set_field("id", "acme").unwrap();
        assert_eq!(editor.value().id, "acme");
    }

    // ── Save ────────────────────────────────────────────────────────

    #[test]
    fn draft_fails_local_validation() {
        let mut editor = Editor::new(SiteConfig::draft(), site_form()).unwrap();
        let err = editor.begin_save().unwrap_err();
        assert_eq!(err.to_string(), "id cannot be empty");
        assert_eq!(editor.state(), EditorState::Invalid);
    }

    #[test]
    fn zero_global_timeout_fails_local_validation() {
        let global = GlobalConfig {
            timeout: 0,
            ..GlobalConfig::default()
        };
        let mut editor = Editor::existing(global, FormDescriptor::default()).unwrap();
        assert!(editor.begin_save().is_err());
        assert_eq!(editor.state(), EditorState::Invalid);
    }

    #[test]
    fn edits_are_refused_while_saving() {
        let mut editor = existing();
        editor.begin_save().unwrap();
        assert_eq!(editor.state(), EditorState::Saving);
        assert!(matches!(
            editor.set_field("name", "x"),
            Err(CoreError::EditorBusy)
        ));
        assert!(matches!(editor.edit_text("{}"), Err(CoreError::EditorBusy)));
        assert!(matches!(editor.begin_save(), Err(CoreError::EditorBusy)));
    }

    #[test]
    fn failed_save_returns_to_editing_with_message() {
        let mut editor = existing();
        editor.begin_save().unwrap();
        editor.finish_save(Err("Site 'acme' not found".into())).unwrap();
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.error(), Some("Site 'acme' not found"));
    }

    #[test]
    fn successful_create_locks_identity() {
        let mut editor = Editor::new(site("acme"), site_form()).unwrap();
        editor.begin_save().unwrap();
        editor.finish_save(Ok(site("acme"))).unwrap();
        assert!(!editor.is_new());
        assert!(editor.form().field("id").unwrap().read_only);
    }

    #[tokio::test(start_paused = true)]
    async fn saved_reverts_to_clean() {
        let mut editor = existing();
        editor.set_field("name", "Saved Name").unwrap();

        let mut from_server = editor.value().clone();
        from_server.post_login_delay_ms = 250;
        let returned = from_server.clone();
        editor
            .save(|_draft| async move { Ok(returned) })
            .await
            .unwrap();

        assert_eq!(editor.state(), EditorState::Saved);
        assert_eq!(editor.value(), &from_server);
        assert!(!editor.is_dirty());

        tokio::time::advance(Duration::from_millis(1_500)).await;
        assert_eq!(editor.state(), EditorState::Saved);

        tokio::time::advance(Duration::from_millis(600)).await;
        assert_eq!(editor.state(), EditorState::Clean);
    }

    #[tokio::test(start_paused = true)]
    async fn saved_does_not_block_edits() {
        let mut editor = existing();
        let value = editor.value().clone();
        editor.save(|_| async move { Ok(value) }).await.unwrap();

        editor.set_field("name", "Again").unwrap();
        assert_eq!(editor.state(), EditorState::Editing);
    }
}
