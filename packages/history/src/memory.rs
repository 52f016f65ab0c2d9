use std::{cell::RefCell, rc::Rc};

use crate::History;

struct MemoryHistoryState {
    current: String,
    history: Vec<String>,
    future: Vec<String>,
}

/// A [`History`] provider that stores all navigation information in memory.
pub struct MemoryHistory {
    state: RefCell<MemoryHistoryState>,
    base_path: Option<String>,
    updaters: RefCell<Vec<Rc<dyn Fn()>>>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::with_initial_path("/")
    }
}

impl MemoryHistory {
    /// Create a [`MemoryHistory`] starting at `path`.
    ///
    /// ```rust
    /// # use nestroute_history::{History, MemoryHistory};
    /// let history = MemoryHistory::with_initial_path("/settings/profile");
    /// assert_eq!(history.current_route(), "/settings/profile");
    /// assert_eq!(history.can_go_back(), false);
    /// ```
    pub fn with_initial_path(path: impl ToString) -> Self {
        Self {
            state: RefCell::new(MemoryHistoryState {
                current: path.to_string(),
                history: Vec::new(),
                future: Vec::new(),
            }),
            base_path: None,
            updaters: RefCell::new(Vec::new()),
        }
    }

    /// Set the base path for the history.
    ///
    /// ```rust
    /// # use nestroute_history::*;
    /// let history = MemoryHistory::default().with_prefix("/my-app");
    /// assert_eq!(history.current_prefix(), Some("/my-app".to_string()));
    /// assert_eq!(history.full_route_path(), "/my-app/");
    /// ```
    pub fn with_prefix(mut self, prefix: impl ToString) -> Self {
        self.base_path = Some(prefix.to_string());
        self
    }

    /// Simulate a URL change that did not originate from the router, such as the user editing
    /// the address bar. Every registered updater is notified.
    pub fn external_change(&self, route: impl ToString) {
        self.replace(route.to_string());
        let updaters = self.updaters.borrow().clone();
        for updater in updaters {
            updater();
        }
    }
}

impl History for MemoryHistory {
    fn current_prefix(&self) -> Option<String> {
        self.base_path.clone()
    }

    fn current_route(&self) -> String {
        self.state.borrow().current.clone()
    }

    fn can_go_back(&self) -> bool {
        !self.state.borrow().history.is_empty()
    }

    fn go_back(&self) {
        let mut write = self.state.borrow_mut();
        if let Some(last) = write.history.pop() {
            let old = std::mem::replace(&mut write.current, last);
            write.future.push(old);
        }
    }

    fn can_go_forward(&self) -> bool {
        !self.state.borrow().future.is_empty()
    }

    fn go_forward(&self) {
        let mut write = self.state.borrow_mut();
        if let Some(next) = write.future.pop() {
            let old = std::mem::replace(&mut write.current, next);
            write.history.push(old);
        }
    }

    fn push(&self, new: String) {
        let mut write = self.state.borrow_mut();
        // don't push the same route twice
        if write.current == new {
            tracing::trace!(route = %new, "ignoring push of the current route");
            return;
        }
        let old = std::mem::replace(&mut write.current, new);
        write.history.push(old);
        write.future.clear();
    }

    fn replace(&self, path: String) {
        let mut write = self.state.borrow_mut();
        write.current = path;
    }

    fn updater(&self, callback: Rc<dyn Fn()>) {
        self.updaters.borrow_mut().push(callback);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn push_and_go_back() {
        let history = MemoryHistory::default();
        history.push("/a".into());
        history.push("/b".into());

        assert!(history.can_go_back());
        assert!(!history.can_go_forward());

        history.go_back();
        assert_eq!(history.current_route(), "/a");
        assert!(history.can_go_forward());

        history.go_forward();
        assert_eq!(history.current_route(), "/b");
    }

    #[test]
    fn push_clears_future() {
        let history = MemoryHistory::default();
        history.push("/a".into());
        history.go_back();
        history.push("/c".into());

        assert!(!history.can_go_forward());
        assert_eq!(history.current_route(), "/c");
    }

    #[test]
    fn push_same_route_is_ignored() {
        let history = MemoryHistory::with_initial_path("/same");
        history.push("/same".into());

        assert!(!history.can_go_back());
    }

    #[test]
    fn replace_keeps_past() {
        let history = MemoryHistory::default();
        history.push("/a".into());
        history.replace("/b".into());

        assert_eq!(history.current_route(), "/b");
        history.go_back();
        assert_eq!(history.current_route(), "/");
    }

    #[test]
    fn write_dispatches_on_replace_flag() {
        let history = MemoryHistory::default();
        history.write("/a".into(), false);
        history.write("/b".into(), true);

        assert_eq!(history.current_route(), "/b");
        history.go_back();
        assert_eq!(history.current_route(), "/");
    }

    #[test]
    fn external_change_calls_updater() {
        let history = MemoryHistory::default();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        history.updater(Rc::new(move || counter.set(counter.get() + 1)));

        history.external_change("/elsewhere");

        assert_eq!(calls.get(), 1);
        assert_eq!(history.current_route(), "/elsewhere");
    }

    #[test]
    fn every_updater_is_kept() {
        let history = MemoryHistory::default();
        let calls = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let counter = calls.clone();
            history.updater(Rc::new(move || counter.set(counter.get() + 1)));
        }

        history.external_change("/elsewhere");

        assert_eq!(calls.get(), 2);
    }
}
