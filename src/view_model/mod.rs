//! Stateful view models that fetch expenses and derive display data.
//!
//! Each view model starts [LoadState::Uninitialized], moves to
//! [LoadState::Loading] when a fetch starts and settles on
//! [LoadState::Ready] when the fetch completes. Failed fetches settle on an
//! empty result and are reported through a [Notifier](crate::notify::Notifier).
//!
//! Fetches are tagged with a ticket. Only the most recently started fetch
//! may settle the state; older responses are discarded.

mod comparison;
mod expenses;
mod monthly_summary;
mod trend;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use comparison::{ComparisonView, MonthComparison, percentage_change};
pub use expenses::{ExpenseListModel, ExpenseSnapshot};
pub use monthly_summary::{MonthlySummaryModel, SummaryInputs};
pub use trend::TrendModel;

/// The lifecycle of a view model's data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState<T> {
    /// No fetch has been attempted.
    #[default]
    Uninitialized,
    /// A fetch is in flight.
    Loading,
    /// Data is available. After a failed fetch this holds an empty result.
    Ready(T),
}

impl<T> LoadState<T> {
    /// Whether data is available.
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// The data, if available.
    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Transform the data, keeping the state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            LoadState::Uninitialized => LoadState::Uninitialized,
            LoadState::Loading => LoadState::Loading,
            LoadState::Ready(value) => LoadState::Ready(f(value)),
        }
    }
}

/// Identifies one fetch started by a view model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Hands out fetch tickets in increasing order and remembers the latest.
#[derive(Debug, Default)]
pub struct FetchSequence {
    latest: u64,
}

impl FetchSequence {
    /// Start a new fetch. Every earlier ticket becomes stale.
    pub fn next(&mut self) -> FetchTicket {
        self.latest += 1;
        FetchTicket(self.latest)
    }

    /// Whether `ticket` belongs to the most recently started fetch.
    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest
    }
}

#[derive(Debug)]
struct ResourceInner<T> {
    state: LoadState<T>,
    sequence: FetchSequence,
}

/// A [LoadState] guarded by a [FetchSequence].
///
/// The lock is never held across an `.await`.
#[derive(Debug)]
pub(crate) struct Resource<T> {
    inner: Mutex<ResourceInner<T>>,
}

impl<T: Clone> Resource<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(ResourceInner {
                state: LoadState::Uninitialized,
                sequence: FetchSequence::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ResourceInner<T>> {
        // The state is always left consistent, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a fetch: issue a ticket and move to [LoadState::Loading].
    pub(crate) fn begin(&self) -> FetchTicket {
        let mut inner = self.lock();
        inner.state = LoadState::Loading;
        inner.sequence.next()
    }

    /// Settle the state with the value produced by `settle`, but only if
    /// `ticket` is the latest. `settle` is not called for stale tickets.
    ///
    /// # Returns
    /// `true` if the state was updated.
    pub(crate) fn settle(&self, ticket: FetchTicket, settle: impl FnOnce() -> T) -> bool {
        let mut inner = self.lock();

        if !inner.sequence.is_latest(ticket) {
            return false;
        }

        inner.state = LoadState::Ready(settle());
        true
    }

    /// Run `change` with the state locked.
    pub(crate) fn with_state<R>(&self, change: impl FnOnce(&mut LoadState<T>) -> R) -> R {
        change(&mut self.lock().state)
    }

    pub(crate) fn state(&self) -> LoadState<T> {
        self.lock().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use crate::view_model::{FetchSequence, LoadState, Resource};

    #[test]
    fn only_latest_ticket_is_current() {
        let mut sequence = FetchSequence::default();

        let first = sequence.next();
        let second = sequence.next();

        assert!(!sequence.is_latest(first));
        assert!(sequence.is_latest(second));
        assert!(first < second);
    }

    #[test]
    fn resource_moves_through_states() {
        let resource: Resource<u32> = Resource::new();
        assert_eq!(resource.state(), LoadState::Uninitialized);

        let ticket = resource.begin();
        assert_eq!(resource.state(), LoadState::Loading);

        assert!(resource.settle(ticket, || 7));
        assert_eq!(resource.state(), LoadState::Ready(7));
    }

    #[test]
    fn stale_ticket_does_not_settle() {
        let resource: Resource<u32> = Resource::new();

        let stale = resource.begin();
        let latest = resource.begin();

        assert!(!resource.settle(stale, || unreachable!("stale fetches are not settled")));
        assert_eq!(resource.state(), LoadState::Loading);

        assert!(resource.settle(latest, || 2));
        assert!(!resource.settle(stale, || 1));
        assert_eq!(resource.state(), LoadState::Ready(2));
    }

    #[test]
    fn with_state_sees_current_state() {
        let resource: Resource<u32> = Resource::new();

        let ticket = resource.begin();
        assert!(resource.with_state(|state| state.is_loading()));

        resource.settle(ticket, || 1);
        resource.with_state(|state| {
            if let LoadState::Ready(value) = state {
                *value += 1;
            }
        });

        assert_eq!(resource.state(), LoadState::Ready(2));
    }

    #[test]
    fn map_keeps_state() {
        assert_eq!(LoadState::<u32>::Loading.map(|v| v * 2), LoadState::Loading);
        assert_eq!(LoadState::Ready(2).map(|v| v * 2), LoadState::Ready(4));
        assert_eq!(LoadState::Ready(3).ready(), Some(&3));
        assert!(LoadState::<u32>::Uninitialized.ready().is_none());
    }
}
