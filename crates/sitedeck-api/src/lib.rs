// sitedeck-api: data model and async client for the sitedeck console API

pub mod client;
pub mod error;
pub mod global;
pub mod model;
pub mod sites;
pub mod subscriptions;
pub mod transport;

pub use client::ConsoleClient;
pub use error::Error;
pub use model::{
    FetchSummaryResponse, GlobalConfig, PropertySchema, SchemaDocument, SiteConfig,
    SubscriptionUrlType, TypeSpec,
};
pub use transport::{TlsMode, TransportConfig};
