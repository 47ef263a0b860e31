//! Caller-owned dashboard state for one authenticated user.
//!
//! Every refetch takes a [`RequestTicket`] from [`DashboardSession::begin`].
//! A result is published only while its ticket is still the newest one issued
//! for that view, so a slow response can never overwrite a newer one. Publishing
//! consumes the ticket and retires its generation, so each ticket lands at
//! most once.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::aggregations::{ActivityGrid, DomainShare, RoomTable};
use crate::model::{CategoryDimension, RealEstateKind};

/// One independently refreshed panel of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKey {
    Rooms {
        kind: RealEstateKind,
        dimension: CategoryDimension,
    },
    Activity {
        kind: RealEstateKind,
    },
    Domains,
}

impl std::fmt::Display for ViewKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rooms { kind, dimension } => write!(f, "rooms/{}/{}", kind, dimension),
            Self::Activity { kind } => write!(f, "activity/{}", kind),
            Self::Domains => write!(f, "domains"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    view: ViewKey,
    generation: u64,
}

impl RequestTicket {
    pub fn view(&self) -> ViewKey {
        self.view
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct SessionState {
    latest: HashMap<ViewKey, u64>,
    rooms: HashMap<(RealEstateKind, CategoryDimension), RoomTable>,
    activity: HashMap<RealEstateKind, ActivityGrid>,
    domains: Option<Vec<DomainShare>>,
}

#[derive(Debug)]
pub struct DashboardSession {
    user: String,
    next_generation: AtomicU64,
    state: RwLock<SessionState>,
}

impl DashboardSession {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            next_generation: AtomicU64::new(0),
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Start a refetch of `view`, superseding any request still in flight.
    pub fn begin(&self, view: ViewKey) -> RequestTicket {
        let mut state = self.state.write();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        state.latest.insert(view, generation);
        RequestTicket { view, generation }
    }

    /// Whether `ticket` is still the newest request for its view.
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.state.read().latest.get(&ticket.view) == Some(&ticket.generation)
    }

    pub fn publish_rooms(&self, ticket: RequestTicket, table: RoomTable) -> bool {
        let view = ViewKey::Rooms {
            kind: table.kind,
            dimension: table.dimension,
        };
        self.publish(ticket, view, |state| {
            state.rooms.insert((table.kind, table.dimension), table);
        })
    }

    pub fn publish_activity(
        &self,
        ticket: RequestTicket,
        kind: RealEstateKind,
        grid: ActivityGrid,
    ) -> bool {
        self.publish(ticket, ViewKey::Activity { kind }, |state| {
            state.activity.insert(kind, grid);
        })
    }

    pub fn publish_domains(&self, ticket: RequestTicket, shares: Vec<DomainShare>) -> bool {
        self.publish(ticket, ViewKey::Domains, |state| {
            state.domains = Some(shares);
        })
    }

    fn publish(
        &self,
        ticket: RequestTicket,
        view: ViewKey,
        apply: impl FnOnce(&mut SessionState),
    ) -> bool {
        if ticket.view != view {
            tracing::warn!(ticket = %ticket.view, result = %view, "Ticket does not match published view");
            return false;
        }

        let mut state = self.state.write();
        if state.latest.get(&view) != Some(&ticket.generation) {
            tracing::debug!(%view, generation = ticket.generation, "Discarding stale result");
            return false;
        }
        state.latest.remove(&view);
        apply(&mut state);
        true
    }

    pub fn rooms(&self, kind: RealEstateKind, dimension: CategoryDimension) -> Option<RoomTable> {
        self.state.read().rooms.get(&(kind, dimension)).cloned()
    }

    pub fn activity(&self, kind: RealEstateKind) -> Option<ActivityGrid> {
        self.state.read().activity.get(&kind).cloned()
    }

    pub fn domains(&self) -> Option<Vec<DomainShare>> {
        self.state.read().domains.clone()
    }

    /// Drop all published data and invalidate every outstanding ticket.
    pub fn logout(&self) {
        let mut state = self.state.write();
        *state = SessionState::default();
        tracing::info!(user = %self.user, "Session cleared");
    }
}
