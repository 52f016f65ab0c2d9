//! URL sources for nestroute.
//!
//! The router never talks to a browser, a webview or a terminal directly. It reads and writes the
//! current URL through a [`History`] implementation supplied by the host. This crate defines that
//! trait and ships two implementations: [`MemoryHistory`], which keeps everything in memory, and
//! [`LensHistory`], which exposes a sub-space of another history to a nested router.

use std::rc::Rc;

mod lens;
pub use lens::*;

mod memory;
pub use memory::*;

/// An integration with some kind of navigation history.
///
/// Implementations are expected to behave like a web browser, since that is what most users
/// already know. If yours deviates, document it.
pub trait History {
    /// Get the current route, including the query if there is one.
    ///
    /// **Must _not_ contain** the prefix.
    ///
    /// ```rust
    /// # use nestroute_history::{History, MemoryHistory};
    /// let history = MemoryHistory::default();
    /// assert_eq!(history.current_route(), "/");
    ///
    /// history.push(String::from("/path?tab=2"));
    /// assert_eq!(history.current_route(), "/path?tab=2");
    /// ```
    #[must_use]
    fn current_route(&self) -> String;

    /// Get the current path prefix of the URL.
    ///
    /// Not all [`History`]s need a prefix. It is meant for environments where the routed
    /// application is not mounted on `/`.
    fn current_prefix(&self) -> Option<String> {
        None
    }

    /// The full path including the prefix.
    fn full_route_path(&self) -> String {
        match self.current_prefix() {
            Some(prefix) => format!("{prefix}{}", self.current_route()),
            None => self.current_route(),
        }
    }

    /// Check whether there is a previous page to navigate back to.
    ///
    /// If a [`History`] cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_back(&self) -> bool {
        true
    }

    /// Go back to a previous page.
    ///
    /// If there is no previous page this does nothing. It may be called even if `can_go_back`
    /// returns [`false`].
    fn go_back(&self);

    /// Check whether there is a future page to navigate forward to.
    ///
    /// If a [`History`] cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_forward(&self) -> bool {
        true
    }

    /// Go forward to a future page.
    fn go_forward(&self);

    /// Write a new history entry and make it current. Clears the navigation future.
    fn push(&self, route: String);

    /// Replace the current entry. The navigation past and future stay untouched.
    fn replace(&self, route: String);

    /// Write `route`, either as a new entry or in place of the current one.
    fn write(&self, route: String, replace: bool) {
        if replace {
            self.replace(route)
        } else {
            self.push(route)
        }
    }

    /// Provide the [`History`] with an update callback.
    ///
    /// Some histories receive URL changes from outside the router (a back button, a parent
    /// router). They should call `callback` when that happens.
    ///
    /// This may be called more than once, for example by several stores sharing one history.
    /// Implementations should keep every callback rather than replace the previous one.
    #[allow(unused_variables)]
    fn updater(&self, callback: Rc<dyn Fn()>) {}
}
