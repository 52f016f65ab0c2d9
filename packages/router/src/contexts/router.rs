use std::{future::Future, rc::Rc};

use nestroute_history::History;

use crate::{
    navigation::{NavigateOptions, NavigationStore, Subscriber},
    resolution::Resolution,
    state::RouterState,
    tree::RouteTree,
};

/// A handle to the router, passed down to everything that needs to read the route or navigate.
///
/// Cloning is cheap; all clones share the same tree and store.
pub struct RouterContext<T: Clone + 'static> {
    tree: Rc<RouteTree<T>>,
    store: NavigationStore,
}

impl<T: Clone + 'static> Clone for RouterContext<T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            store: self.store.clone(),
        }
    }
}

impl<T: Clone + 'static> RouterContext<T> {
    /// Create a router over `tree`, reading and writing URLs through `history`.
    pub fn new(tree: Rc<RouteTree<T>>, history: Rc<dyn History>) -> Self {
        Self::with_store(tree, NavigationStore::new(history))
    }

    /// Create a router sharing an existing store.
    pub fn with_store(tree: Rc<RouteTree<T>>, store: NavigationStore) -> Self {
        Self { tree, store }
    }

    /// The route tree.
    pub fn tree(&self) -> &Rc<RouteTree<T>> {
        &self.tree
    }

    /// The navigation store.
    pub fn store(&self) -> &NavigationStore {
        &self.store
    }

    /// The current URL.
    pub fn current_route(&self) -> String {
        self.store.current_route()
    }

    /// Match the current URL and start any loads it needs.
    ///
    /// Render [`Resolution::state`] right away and render again once
    /// [`Resolution::settled`] completes.
    pub fn current(&self) -> Resolution<T> {
        self.tree.resolve(&self.store.current_route())
    }

    /// Navigate to `to`, notify the subscribers, then run the configured
    /// [`on_update`](crate::RouterConfig::on_update) callback with the new state.
    pub fn navigate(&self, to: impl Into<String>, options: NavigateOptions) {
        if let Err(e) = self.store.try_navigate(to, options) {
            tracing::warn!("{e}");
            return;
        }

        if let Some(on_update) = &self.tree.config().on_update {
            let state: RouterState<T> = self.current().state;
            on_update(&state);
        }
    }

    /// Push a new entry.
    pub fn push(&self, to: impl Into<String>) {
        self.navigate(to, NavigateOptions::push())
    }

    /// Replace the current entry.
    pub fn replace(&self, to: impl Into<String>) {
        self.navigate(to, NavigateOptions::replace())
    }

    /// Step back in the history, if possible. See [`NavigationStore::go_back`].
    pub fn go_back(&self) {
        self.store.go_back()
    }

    /// Step forward in the history, if possible. See [`NavigationStore::go_forward`].
    pub fn go_forward(&self) {
        self.store.go_forward()
    }

    /// Resolve every lazy route on the way to `path`.
    ///
    /// The returned future owns what it needs, so it can be spawned.
    pub fn preload(&self, path: &str) -> impl Future<Output = ()> + 'static {
        let tree = self.tree.clone();
        let path = path.to_string();
        async move { tree.preload(&path).await }
    }

    /// Register a consumer of navigation events. See [`NavigationStore::subscribe`].
    pub fn subscribe(&self, subscriber: Subscriber) -> bool {
        self.store.subscribe(subscriber)
    }

    /// Remove a consumer of navigation events. See [`NavigationStore::unsubscribe`].
    pub fn unsubscribe(&self, subscriber: &Subscriber) -> bool {
        self.store.unsubscribe(subscriber)
    }
}
