//! Errors surfaced by the router.
//!
//! Failing to match is not an error: an empty [`MatchChain`](crate::matching::MatchChain) simply
//! means there is nothing to render.

use std::rc::Rc;

/// A lazy route's loader rejected.
///
/// The error is stored on the node that produced it and handed to every render slot showing that
/// node, so it is cheap to clone.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to load route `{route}`: {error}")]
pub struct LoadError {
    route: String,
    error: Rc<anyhow::Error>,
}

impl LoadError {
    pub(crate) fn new(route: impl Into<String>, error: anyhow::Error) -> Self {
        Self {
            route: route.into(),
            error: Rc::new(error),
        }
    }

    /// The segment pattern of the route that failed to load.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// The error returned by the loader.
    pub fn error(&self) -> &anyhow::Error {
        &self.error
    }
}

/// Errors returned by [`NavigationStore::try_navigate`](crate::navigation::NavigationStore::try_navigate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// The store was torn down, so the navigation was dropped.
    #[error("navigation store was torn down; dropped navigation to `{0}`")]
    TornDown(String),
}
