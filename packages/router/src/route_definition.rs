//! Building the route tree.
//!
//! Routes are plain values. They describe the tree, and a [`RouteTree`](crate::tree::RouteTree)
//! is built from them once, before any matching happens.
//!
//! ```rust
//! # use nestroute::prelude::*;
//! let routes: Vec<Route<&str>> = vec![layout(
//!     "Shell",
//!     vec![
//!         index("Home"),
//!         route("about", "About", vec![]),
//!         route("posts", "Posts", vec![route(":id", "Post", vec![])]),
//!     ],
//! )];
//! let tree = RouteTree::new(routes);
//! assert_eq!(tree.match_path("/posts/42").len(), 3);
//! ```

mod content;
pub use content::*;

mod segment;
pub use segment::*;

/// A route, as declared by the application.
pub struct Route<T> {
    pub(crate) pattern: SegmentPattern,
    pub(crate) renderable: Renderable<T>,
    pub(crate) fallback: Option<T>,
    pub(crate) children: Vec<Route<T>>,
}

impl<T> Route<T> {
    /// The segment pattern of this route.
    pub fn pattern(&self) -> &SegmentPattern {
        &self.pattern
    }

    /// The routes nested below this one, in declaration order.
    pub fn nested(&self) -> &[Route<T>] {
        &self.children
    }
}

/// Create a route matching `pattern`.
///
/// `children` are tried in declaration order; the first one that matches wins.
pub fn route<T>(
    pattern: &str,
    options: impl Into<RouteOptions<T>>,
    children: Vec<Route<T>>,
) -> Route<T> {
    let RouteOptions {
        renderable,
        fallback,
    } = options.into();

    Route {
        pattern: SegmentPattern::parse(pattern),
        renderable,
        fallback,
        children,
    }
}

/// Create a layout route. Layouts consume no segments and wrap their children.
///
/// # Panic
/// - If `children` is empty, but only in debug builds.
pub fn layout<T>(options: impl Into<RouteOptions<T>>, children: Vec<Route<T>>) -> Route<T> {
    debug_assert!(!children.is_empty(), "a layout route needs children");
    route("", options, children)
}

/// Create an index route. It matches only when no segments remain at its depth.
pub fn index<T>(options: impl Into<RouteOptions<T>>) -> Route<T> {
    route("", options, Vec::new())
}
