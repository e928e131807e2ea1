// ── Configuration data model ──
//
// Wire-level types shared by the API client and the editor. No behaviour
// beyond shape, defaults and serde.

pub mod fetch;
pub mod global;
pub mod schema;
pub mod site;

pub use fetch::FetchSummaryResponse;
pub use global::GlobalConfig;
pub use schema::{PropertySchema, SchemaDocument, TypeSpec};
pub use site::{SiteConfig, SubscriptionUrlType};
