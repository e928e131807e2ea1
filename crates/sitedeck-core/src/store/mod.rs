// ── Manager state ──
//
// The published site list and per-site fetch outcomes.

pub(crate) mod collection;
pub(crate) mod fetch;

pub use collection::SiteSnapshot;
pub use fetch::FetchState;
