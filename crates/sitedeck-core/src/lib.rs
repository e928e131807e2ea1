//! Editing workflow and shared state between `sitedeck-api` and the CLI.
//!
//! - **[`SiteManager`]**: central facade. Loads and publishes the site
//!   list, runs create / update / delete flows and tracks per-site fetches.
//!   Cheaply cloneable; concurrent fetches for different sites never
//!   block each other.
//!
//! - **[`Editor`]**: dual-mode editor over one [`SiteConfig`] or
//!   [`GlobalConfig`]. A schema-driven form view and a raw JSON view share
//!   one authoritative value; invalid input never reaches the save path.
//!
//! - **[`Session`]**: session-scoped global configuration and schema
//!   documents.

pub mod config;
pub mod editor;
pub mod error;
pub mod manager;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, TlsVerification, origin_of};
pub use editor::{
    Editable, Editor, EditorState, FieldKind, FormDescriptor, FormField, PendingInput, ViewMode,
};
pub use error::CoreError;
pub use manager::{DeleteOutcome, SiteManager, subscription_url};
pub use session::Session;
pub use store::{FetchState, SiteSnapshot};

// Re-export model types at the crate root for ergonomics.
pub use sitedeck_api::{
    FetchSummaryResponse, GlobalConfig, SchemaDocument, SiteConfig, SubscriptionUrlType,
};
