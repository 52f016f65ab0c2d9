use std::{fmt::Debug, future::Future, rc::Rc};

use futures_util::future::{FutureExt, LocalBoxFuture};

use super::Route;

/// Produces the content of a lazy route.
///
/// A loader is invoked at most once per resolution attempt; its future is cached on the node
/// while it is in flight.
pub type Loader<T> = Rc<dyn Fn() -> LocalBoxFuture<'static, anyhow::Result<LazyRoute<T>>>>;

/// What a lazy route resolves to: the renderable handle, plus any child routes that were not
/// known before the load.
pub struct LazyRoute<T> {
    pub(crate) content: T,
    pub(crate) children: Vec<Route<T>>,
}

impl<T> LazyRoute<T> {
    /// Resolve to `content` without discovering any children.
    pub fn new(content: T) -> Self {
        Self {
            content,
            children: Vec::new(),
        }
    }

    /// Attach child routes discovered by the load.
    ///
    /// They are placed after any children declared when the tree was built.
    pub fn children(mut self, children: Vec<Route<T>>) -> Self {
        self.children = children;
        self
    }
}

impl<T> From<T> for LazyRoute<T> {
    fn from(content: T) -> Self {
        Self::new(content)
    }
}

/// The renderable unit of a route: either already available, or behind a loader.
#[derive(Clone)]
pub enum Renderable<T> {
    /// The handle is available right away.
    Ready(T),
    /// The handle has to be loaded first.
    Lazy(Loader<T>),
}

impl<T> Renderable<T> {
    /// Returns [`true`] if the renderable is [`Lazy`].
    ///
    /// [`Lazy`]: Renderable::Lazy
    #[must_use]
    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }
}

// loaders don't implement [`Debug`]
impl<T: Debug> Debug for Renderable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(content) => f.debug_tuple("Ready").field(content).finish(),
            Self::Lazy(_) => f.debug_tuple("Lazy").finish(),
        }
    }
}

/// Options for building a route.
///
/// ```rust
/// # use nestroute::prelude::*;
/// let eager = RouteOptions::new("Home");
/// let lazy = RouteOptions::lazy(|| async { Ok("Settings") }).fallback("Loading…");
/// # let _: [RouteOptions<&str>; 2] = [eager, lazy];
/// ```
pub struct RouteOptions<T> {
    pub(crate) renderable: Renderable<T>,
    pub(crate) fallback: Option<T>,
}

impl<T> RouteOptions<T> {
    /// Options for a route whose content is available right away.
    pub fn new(content: T) -> Self {
        Self {
            renderable: Renderable::Ready(content),
            fallback: None,
        }
    }

    /// Options for a route whose content comes from `loader`.
    pub fn lazy<F, Fut, L>(loader: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<L>> + 'static,
        L: Into<LazyRoute<T>>,
        T: 'static,
    {
        Self {
            renderable: Renderable::Lazy(Rc::new(move || {
                let fut = loader();
                async move { fut.await.map(Into::into) }.boxed_local()
            })),
            fallback: None,
        }
    }

    /// Content shown while a lazy route is loading.
    ///
    /// # Panic
    /// - If a fallback was already set, but only in debug builds. Release builds keep the first.
    pub fn fallback(mut self, content: T) -> Self {
        debug_assert!(self.fallback.is_none(), "fallback content cannot be changed");
        self.fallback.get_or_insert(content);
        self
    }
}

impl<T> From<T> for RouteOptions<T> {
    fn from(content: T) -> Self {
        Self::new(content)
    }
}
