// ── Per-site fetch tracking ──
//
// Fetch outcomes keyed by site id. Each entry is only written by that
// site's own fetch lifecycle; different ids never contend.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sitedeck_api::FetchSummaryResponse;

use crate::error::CoreError;

/// Latest known fetch outcome for one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    InFlight {
        started: DateTime<Utc>,
    },
    Succeeded {
        summary: FetchSummaryResponse,
        at: DateTime<Utc>,
    },
    Failed {
        message: String,
        at: DateTime<Utc>,
    },
}

impl FetchState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }
}

pub(crate) struct FetchTracker {
    states: DashMap<String, FetchState>,
}

impl FetchTracker {
    pub(crate) fn new() -> Self {
        Self {
            states: DashMap::new(),
        }
    }

    /// Mark `id` in flight. Rejects a second fetch for the same id.
    pub(crate) fn begin(&self, id: &str) -> Result<FetchTicket<'_>, CoreError> {
        let started = FetchState::InFlight {
            started: Utc::now(),
        };
        let prior = match self.states.entry(id.to_owned()) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_in_flight() {
                    return Err(CoreError::FetchInFlight {
                        site_id: id.to_owned(),
                    });
                }
                Some(entry.insert(started))
            }
            Entry::Vacant(entry) => {
                entry.insert(started);
                None
            }
        };
        Ok(FetchTicket {
            tracker: self,
            id: id.to_owned(),
            prior,
            done: false,
        })
    }

    pub(crate) fn get(&self, id: &str) -> Option<FetchState> {
        self.states.get(id).map(|r| r.value().clone())
    }

    /// Forget a site's outcome (after the site is deleted).
    pub(crate) fn forget(&self, id: &str) {
        self.states
            .remove_if(id, |_, state| !state.is_in_flight());
    }
}

/// Exclusive right to record one fetch outcome for a site.
///
/// Dropping a ticket without recording restores whatever was there before,
/// so an abandoned fetch never leaves the site marked busy.
pub(crate) struct FetchTicket<'a> {
    tracker: &'a FetchTracker,
    id: String,
    prior: Option<FetchState>,
    done: bool,
}

impl FetchTicket<'_> {
    pub(crate) fn succeed(mut self, summary: FetchSummaryResponse) {
        self.record(FetchState::Succeeded {
            summary,
            at: Utc::now(),
        });
    }

    pub(crate) fn fail(mut self, message: String) {
        self.record(FetchState::Failed {
            message,
            at: Utc::now(),
        });
    }

    fn record(&mut self, state: FetchState) {
        self.tracker.states.insert(self.id.clone(), state);
        self.done = true;
    }
}

impl Drop for FetchTicket<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        match self.prior.take() {
            Some(prior) => {
                self.tracker.states.insert(self.id.clone(), prior);
            }
            None => {
                self.tracker.states.remove(&self.id);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn summary(name: &str) -> FetchSummaryResponse {
        FetchSummaryResponse {
            name: name.into(),
            url: "https://sub.example.test".into(),
            content_length: 10,
            cached: false,
        }
    }

    #[test]
    fn second_begin_for_same_site_is_rejected() {
        let tracker = FetchTracker::new();
        let _ticket = tracker.begin("acme").unwrap();
        assert!(matches!(
            tracker.begin("acme"),
            Err(CoreError::FetchInFlight { ref site_id }) if site_id == "acme"
        ));
    }

    #[test]
    fn different_sites_do_not_block() {
        let tracker = FetchTracker::new();
        let _a = tracker.begin("a").unwrap();
        let _b = tracker.begin("b").unwrap();
        assert!(tracker.get("a").unwrap().is_in_flight());
        assert!(tracker.get("b").unwrap().is_in_flight());
    }

    #[test]
    fn outcome_replaces_in_flight() {
        let tracker = FetchTracker::new();
        tracker.begin("a").unwrap().succeed(summary("A"));
        assert!(matches!(tracker.get("a"), Some(FetchState::Succeeded { .. })));

        tracker.begin("a").unwrap().fail("Login failed".into());
        assert!(matches!(
            tracker.get("a"),
            Some(FetchState::Failed { ref message, .. }) if message == "Login failed"
        ));
    }

    #[test]
    fn dropped_ticket_restores_prior_state() {
        let tracker = FetchTracker::new();
        tracker.begin("a").unwrap().succeed(summary("A"));

        drop(tracker.begin("a").unwrap());
        assert!(matches!(tracker.get("a"), Some(FetchState::Succeeded { .. })));

        drop(tracker.begin("fresh").unwrap());
        assert!(tracker.get("fresh").is_none());
    }

    #[test]
    fn forget_keeps_in_flight_entries() {
        let tracker = FetchTracker::new();
        tracker.begin("done").unwrap().succeed(summary("Done"));
        let _busy = tracker.begin("busy").unwrap();

        tracker.forget("done");
        tracker.forget("busy");
        assert!(tracker.get("done").is_none());
        assert!(tracker.get("busy").is_some());
    }
}
