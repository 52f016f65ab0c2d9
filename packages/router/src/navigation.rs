//! The navigation store: the current URL and the consumers interested in it.
//!
//! Writing a URL through the store and notifying its subscribers is the only thing that causes
//! the router to match again.

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use nestroute_history::History;
use tracing::{debug, trace, warn};

use crate::error::NavigationError;

/// A consumer of navigation events. Usually re-matches the current URL and re-renders.
pub type Subscriber = Rc<dyn Fn()>;

/// How to write the new URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    /// Options for a navigation that pushes a new entry.
    pub fn push() -> Self {
        Self { replace: false }
    }

    /// Options for a navigation that replaces the current entry.
    pub fn replace() -> Self {
        Self { replace: true }
    }
}

struct StoreInner {
    history: Rc<dyn History>,
    subscribers: RefCell<Vec<Subscriber>>,
    torn_down: Cell<bool>,
}

/// Owns the link to the URL source and the set of subscribers.
///
/// Cloning the store yields another handle to the same state.
///
/// ```rust
/// # use std::{cell::Cell, rc::Rc};
/// # use nestroute::prelude::*;
/// let store = NavigationStore::new(Rc::new(MemoryHistory::default()));
/// let renders = Rc::new(Cell::new(0));
/// let counter = renders.clone();
/// store.subscribe(Rc::new(move || counter.set(counter.get() + 1)));
///
/// store.navigate("/about", NavigateOptions::replace());
/// assert_eq!(store.current_route(), "/about");
/// assert_eq!(renders.get(), 1);
/// ```
#[derive(Clone)]
pub struct NavigationStore {
    inner: Rc<StoreInner>,
}

impl NavigationStore {
    /// Create a store on top of `history`.
    ///
    /// URL changes the history reports on its own also notify the subscribers. Several stores may
    /// share one history as long as it keeps every updater it is given, as
    /// [`MemoryHistory`](nestroute_history::MemoryHistory) does.
    pub fn new(history: Rc<dyn History>) -> Self {
        let inner = Rc::new(StoreInner {
            history,
            subscribers: RefCell::new(Vec::new()),
            torn_down: Cell::new(false),
        });

        let weak: Weak<StoreInner> = Rc::downgrade(&inner);
        inner.history.updater(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                trace!("url changed outside of the router");
                NavigationStore { inner }.notify();
            }
        }));

        Self { inner }
    }

    /// The URL source.
    pub fn history(&self) -> Rc<dyn History> {
        self.inner.history.clone()
    }

    /// Read the current URL from the source.
    pub fn current_route(&self) -> String {
        self.inner.history.current_route()
    }

    /// Write `to` to the source and notify every subscriber once.
    ///
    /// There is no debouncing: every call triggers a full notification pass. After
    /// [`teardown`](Self::teardown) the navigation is logged and dropped.
    pub fn navigate(&self, to: impl Into<String>, options: NavigateOptions) {
        if let Err(e) = self.try_navigate(to, options) {
            warn!("{e}");
        }
    }

    /// Like [`navigate`](Self::navigate), but reports a dropped navigation.
    pub fn try_navigate(
        &self,
        to: impl Into<String>,
        options: NavigateOptions,
    ) -> Result<(), NavigationError> {
        let to = to.into();
        if self.inner.torn_down.get() {
            return Err(NavigationError::TornDown(to));
        }

        debug!(to = %to, replace = options.replace, "navigating");
        self.inner.history.write(to, options.replace);
        self.notify();
        Ok(())
    }

    /// Push a new entry.
    pub fn push(&self, to: impl Into<String>) {
        self.navigate(to, NavigateOptions::push())
    }

    /// Replace the current entry.
    pub fn replace(&self, to: impl Into<String>) {
        self.navigate(to, NavigateOptions::replace())
    }

    /// Whether there is a previous entry.
    pub fn can_go_back(&self) -> bool {
        self.inner.history.can_go_back()
    }

    /// Go back one entry. Subscribers are notified if the source could move.
    pub fn go_back(&self) {
        if self.inner.torn_down.get() || !self.can_go_back() {
            return;
        }
        self.inner.history.go_back();
        self.notify();
    }

    /// Whether there is a future entry.
    pub fn can_go_forward(&self) -> bool {
        self.inner.history.can_go_forward()
    }

    /// Go forward one entry. Subscribers are notified if the source could move.
    pub fn go_forward(&self) {
        if self.inner.torn_down.get() || !self.can_go_forward() {
            return;
        }
        self.inner.history.go_forward();
        self.notify();
    }

    /// Add a subscriber. Returns [`false`] if it was already subscribed.
    ///
    /// Subscribers are compared by allocation, so register a clone of the same [`Rc`] to refer to
    /// the same subscriber.
    pub fn subscribe(&self, subscriber: Subscriber) -> bool {
        if self.inner.torn_down.get() {
            warn!("ignoring subscription to a torn down navigation store");
            return false;
        }

        let mut subscribers = self.inner.subscribers.borrow_mut();
        if subscribers.iter().any(|s| same_subscriber(s, &subscriber)) {
            return false;
        }
        subscribers.push(subscriber);
        true
    }

    /// Remove a subscriber. Returns [`false`] if it was not subscribed.
    pub fn unsubscribe(&self, subscriber: &Subscriber) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| !same_subscriber(s, subscriber));
        before != subscribers.len()
    }

    /// The number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Drop every subscriber and stop accepting navigations.
    pub fn teardown(&self) {
        debug!("tearing down navigation store");
        self.inner.torn_down.set(true);
        self.inner.subscribers.borrow_mut().clear();
    }

    /// Whether [`teardown`](Self::teardown) was called.
    pub fn is_torn_down(&self) -> bool {
        self.inner.torn_down.get()
    }

    /// Invoke every subscriber once.
    ///
    /// Works on a snapshot of the set, so subscribers may subscribe and unsubscribe while being
    /// notified.
    fn notify(&self) {
        let subscribers = self.inner.subscribers.borrow().clone();
        trace!(subscribers = subscribers.len(), "notifying subscribers");
        for subscriber in subscribers {
            subscriber();
        }
    }
}

fn same_subscriber(a: &Subscriber, b: &Subscriber) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

#[cfg(test)]
mod tests {
    use nestroute_history::MemoryHistory;

    use super::*;

    fn counter() -> (Rc<Cell<usize>>, Subscriber) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        (count, Rc::new(move || inner.set(inner.get() + 1)))
    }

    fn store() -> (Rc<MemoryHistory>, NavigationStore) {
        let history = Rc::new(MemoryHistory::default());
        let store = NavigationStore::new(history.clone());
        (history, store)
    }

    #[test]
    fn replace_navigation_notifies_every_subscriber_once() {
        let (history, store) = store();
        let (a, sub_a) = counter();
        let (b, sub_b) = counter();
        store.subscribe(sub_a);
        store.subscribe(sub_b);

        store.navigate("/about", NavigateOptions { replace: true });

        assert_eq!(history.current_route(), "/about");
        assert!(!history.can_go_back());
        assert_eq!((a.get(), b.get()), (1, 1));
    }

    #[test]
    fn push_navigation_adds_entry() {
        let (history, store) = store();
        store.push("/a");
        store.push("/b");

        assert_eq!(store.current_route(), "/b");
        assert!(history.can_go_back());
    }

    #[test]
    fn each_navigation_notifies() {
        let (_, store) = store();
        let (count, sub) = counter();
        store.subscribe(sub);

        store.push("/a");
        store.push("/b");
        store.replace("/c");

        assert_eq!(count.get(), 3);
    }

    #[test]
    fn subscriptions_are_a_set() {
        let (_, store) = store();
        let (count, sub) = counter();

        assert!(store.subscribe(sub.clone()));
        assert!(!store.subscribe(sub.clone()));
        assert_eq!(store.subscriber_count(), 1);

        store.push("/a");
        assert_eq!(count.get(), 1);

        assert!(store.unsubscribe(&sub));
        assert!(!store.unsubscribe(&sub));

        store.push("/b");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn subscriber_may_unsubscribe_itself() {
        let (_, store) = store();
        let slot: Rc<RefCell<Option<Subscriber>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        let sub: Subscriber = {
            let store = store.clone();
            let slot = slot.clone();
            let calls = calls.clone();
            Rc::new(move || {
                calls.set(calls.get() + 1);
                if let Some(me) = slot.borrow().as_ref() {
                    store.unsubscribe(me);
                }
            })
        };
        *slot.borrow_mut() = Some(sub.clone());
        store.subscribe(sub);

        store.push("/a");
        store.push("/b");

        assert_eq!(calls.get(), 1);
        assert_eq!(store.subscriber_count(), 0);
        // break the cycle
        slot.borrow_mut().take();
    }

    #[test]
    fn back_and_forward_notify() {
        let (_, store) = store();
        let (count, sub) = counter();
        store.subscribe(sub);

        store.go_back();
        assert_eq!(count.get(), 0);

        store.push("/a");
        store.go_back();
        assert_eq!(store.current_route(), "/");
        store.go_forward();
        assert_eq!(store.current_route(), "/a");
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn external_change_notifies() {
        let (history, store) = store();
        let (count, sub) = counter();
        store.subscribe(sub);

        history.external_change("/typed-in");

        assert_eq!(count.get(), 1);
        assert_eq!(store.current_route(), "/typed-in");
    }

    #[test]
    fn stores_sharing_a_history_are_all_notified() {
        let history = Rc::new(MemoryHistory::default());
        let first = NavigationStore::new(history.clone());
        let second = NavigationStore::new(history.clone());
        let (a, sub_a) = counter();
        let (b, sub_b) = counter();
        first.subscribe(sub_a);
        second.subscribe(sub_b);

        history.external_change("/shared");

        assert_eq!((a.get(), b.get()), (1, 1));
    }

    #[test]
    fn teardown_drops_subscribers_and_navigations() {
        let (history, store) = store();
        let (count, sub) = counter();
        store.subscribe(sub.clone());

        store.teardown();

        assert!(store.is_torn_down());
        assert_eq!(store.subscriber_count(), 0);
        assert!(!store.subscribe(sub));
        assert_eq!(
            store.try_navigate("/late", NavigateOptions::default()),
            Err(NavigationError::TornDown("/late".into()))
        );
        store.push("/late");
        assert_eq!(history.current_route(), "/");
        assert_eq!(count.get(), 0);
    }
}
