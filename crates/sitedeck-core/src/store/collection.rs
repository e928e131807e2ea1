// ── Site collection ──
//
// The ordered site list, published as an immutable snapshot through a
// `watch` channel. A refresh replaces the whole list in one step, so
// observers never see a partially applied update.

use std::sync::Arc;

use sitedeck_api::SiteConfig;
use tokio::sync::watch;

/// Shared, immutable view of the site list in service order.
pub type SiteSnapshot = Arc<Vec<Arc<SiteConfig>>>;

pub(crate) struct SiteCollection {
    snapshot: watch::Sender<SiteSnapshot>,
}

impl SiteCollection {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { snapshot }
    }

    /// Replace the list wholesale.
    pub(crate) fn replace(&self, sites: Vec<SiteConfig>) {
        let next: SiteSnapshot = Arc::new(sites.into_iter().map(Arc::new).collect());
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = next);
    }

    pub(crate) fn snapshot(&self) -> SiteSnapshot {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SiteSnapshot> {
        self.snapshot.subscribe()
    }

    pub(crate) fn get(&self, id: &str) -> Option<Arc<SiteConfig>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|site| site.id == id)
            .map(Arc::clone)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn site(id: &str) -> SiteConfig {
        let mut site = SiteConfig::draft();
        site.id = id.into();
        site
    }

    #[test]
    fn starts_empty() {
        let col = SiteCollection::new();
        assert!(col.snapshot().is_empty());
    }

    #[test]
    fn replace_keeps_service_order() {
        let col = SiteCollection::new();
        col.replace(vec![site("zeta"), site("acme")]);
        let ids: Vec<String> = col.snapshot().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, ["zeta", "acme"]);
        assert_eq!(col.get("acme").unwrap().id, "acme");
        assert!(col.get("missing").is_none());
    }

    #[test]
    fn old_snapshots_are_unaffected_by_replace() {
        let col = SiteCollection::new();
        col.replace(vec![site("a"), site("b")]);
        let before = col.snapshot();

        col.replace(vec![site("a")]);
        assert_eq!(before.len(), 2);
        assert_eq!(col.snapshot().len(), 1);
    }

    #[test]
    fn subscribers_see_replacement() {
        let col = SiteCollection::new();
        let mut rx = col.subscribe();
        col.replace(vec![site("a")]);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
