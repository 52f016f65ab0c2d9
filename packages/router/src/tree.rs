//! The arena that owns every route node.
//!
//! Nodes are addressed by [`NodeId`]. Matches hold ids, never the nodes themselves, so the tree
//! is built once and shared by every match and every load.

use std::{
    cell::{Ref, RefCell},
    fmt::{Display, Formatter},
    rc::{Rc, Weak},
};

use slab::Slab;
use tracing::debug;

use crate::{
    error::LoadError,
    resolution::Pending,
    route_definition::{Loader, Renderable, Route, SegmentPattern},
    router_cfg::RouterConfig,
};

/// The identity of a node in a [`RouteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The load state of a lazy node.
pub(crate) enum LoadState<T> {
    Unresolved,
    Resolving(Pending),
    Resolved(T),
    Failed(LoadError),
}

/// Where a node's content currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStatus {
    /// The node was declared with its content; nothing to load.
    Ready,
    /// The node is lazy and its loader was never invoked.
    Unresolved,
    /// The loader was invoked and has not settled yet.
    Resolving,
    /// The loader succeeded.
    Resolved,
    /// The loader failed.
    Failed,
}

pub(crate) enum NodeContent<T> {
    Ready(T),
    Lazy {
        loader: Loader<T>,
        state: LoadState<T>,
    },
}

pub(crate) struct RouteNode<T> {
    pub(crate) pattern: SegmentPattern,
    pub(crate) content: NodeContent<T>,
    pub(crate) fallback: Option<T>,
    pub(crate) children: Vec<NodeId>,
    /// Whether any children were declared when the tree was built.
    pub(crate) static_children: bool,
    pub(crate) parent: Option<NodeId>,
}

impl<T> RouteNode<T> {
    pub(crate) fn status(&self) -> LoadStatus {
        match &self.content {
            NodeContent::Ready(_) => LoadStatus::Ready,
            NodeContent::Lazy { state, .. } => match state {
                LoadState::Unresolved => LoadStatus::Unresolved,
                LoadState::Resolving(_) => LoadStatus::Resolving,
                LoadState::Resolved(_) => LoadStatus::Resolved,
                LoadState::Failed(_) => LoadStatus::Failed,
            },
        }
    }

    /// A lazy boundary: its content is not loaded and it has no statically known children, so
    /// matching cannot look past it.
    pub(crate) fn is_boundary(&self) -> bool {
        matches!(self.status(), LoadStatus::Unresolved | LoadStatus::Resolving)
            && !self.static_children
    }

    /// A lazy node that failed before revealing any children. Matching ends here so the error is
    /// rendered in place of everything below.
    pub(crate) fn is_failed_leaf(&self) -> bool {
        self.status() == LoadStatus::Failed && self.children.is_empty()
    }
}

/// A static tree of routes with per-node lazy content.
///
/// The tree is always handed out behind an [`Rc`]; in-flight loads hold a weak reference back to
/// it so they can record their outcome.
pub struct RouteTree<T: Clone + 'static> {
    pub(crate) nodes: RefCell<Slab<RouteNode<T>>>,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) config: RouterConfig<T>,
    pub(crate) this: Weak<RouteTree<T>>,
}

impl<T: Clone + 'static> RouteTree<T> {
    /// Build a tree from its root routes, with the default configuration.
    pub fn new(routes: Vec<Route<T>>) -> Rc<Self> {
        Self::with_config(routes, RouterConfig::default())
    }

    /// Build a tree from its root routes.
    pub fn with_config(routes: Vec<Route<T>>, config: RouterConfig<T>) -> Rc<Self> {
        let mut nodes = Slab::new();
        let roots = routes
            .into_iter()
            .map(|route| insert_route(&mut nodes, route, None, &[]))
            .collect();

        debug!(nodes = nodes.len(), "built route tree");

        Rc::new_cyclic(|this| Self {
            nodes: RefCell::new(nodes),
            roots,
            config,
            this: this.clone(),
        })
    }

    /// The root nodes, in declaration order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// The configuration this tree was built with.
    pub fn config(&self) -> &RouterConfig<T> {
        &self.config
    }

    /// The number of nodes currently in the tree, including children discovered by loads.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Whether the tree has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// The children of `id`, in declaration order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).children.clone()
    }

    /// The parent of `id`, or [`None`] for a root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The segment pattern of `id`.
    pub fn pattern(&self, id: NodeId) -> SegmentPattern {
        self.node(id).pattern.clone()
    }

    /// The load status of `id`.
    pub fn load_status(&self, id: NodeId) -> LoadStatus {
        self.node(id).status()
    }

    /// The content of `id`, if it is available.
    pub fn content(&self, id: NodeId) -> Option<T> {
        match &self.node(id).content {
            NodeContent::Ready(content) => Some(content.clone()),
            NodeContent::Lazy {
                state: LoadState::Resolved(content),
                ..
            } => Some(content.clone()),
            NodeContent::Lazy { .. } => None,
        }
    }

    /// The error `id` failed with, if its load failed.
    pub fn load_error(&self, id: NodeId) -> Option<LoadError> {
        match &self.node(id).content {
            NodeContent::Lazy {
                state: LoadState::Failed(err),
                ..
            } => Some(err.clone()),
            _ => None,
        }
    }

    /// Find the node reached by following `patterns` from the roots, taking the first node whose
    /// pattern renders to each given string.
    ///
    /// ```rust
    /// # use nestroute::prelude::*;
    /// let tree = RouteTree::new(vec![route("posts", "Posts", vec![route(":id", "Post", vec![])])]);
    /// let post = tree.find(&["posts", ":id"]).unwrap();
    /// assert_eq!(tree.content(post), Some("Post"));
    /// ```
    pub fn find(&self, patterns: &[&str]) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let mut candidates = self.roots.clone();
        let mut found = None;
        for pattern in patterns {
            let id = *candidates
                .iter()
                .find(|id| nodes[id.0].pattern.to_string() == *pattern)?;
            candidates = nodes[id.0].children.clone();
            found = Some(id);
        }
        found
    }

    pub(crate) fn node(&self, id: NodeId) -> Ref<'_, RouteNode<T>> {
        Ref::map(self.nodes.borrow(), |nodes| &nodes[id.0])
    }
}

/// Flatten `route` into `nodes`, returning the id of the inserted node.
pub(crate) fn insert_route<T>(
    nodes: &mut Slab<RouteNode<T>>,
    route: Route<T>,
    parent: Option<NodeId>,
    ancestor_params: &[String],
) -> NodeId {
    let Route {
        pattern,
        renderable,
        fallback,
        children,
    } = route;

    for name in pattern.parameter_names() {
        if ancestor_params.iter().any(|a| a == name) {
            debug!(
                parameter = name,
                %pattern,
                "parameter shadows an ancestor parameter, the nested value prevails"
            );
        }
    }
    let mut params = ancestor_params.to_vec();
    params.extend(pattern.parameter_names().map(String::from));

    let content = match renderable {
        Renderable::Ready(content) => NodeContent::Ready(content),
        Renderable::Lazy(loader) => NodeContent::Lazy {
            loader,
            state: LoadState::Unresolved,
        },
    };

    let id = NodeId(nodes.insert(RouteNode {
        pattern,
        content,
        fallback,
        children: Vec::new(),
        static_children: !children.is_empty(),
        parent,
    }));

    let children = children
        .into_iter()
        .map(|child| insert_route(nodes, child, Some(id), &params))
        .collect();
    nodes[id.0].children = children;

    id
}

/// The parameter names declared by `id` and all of its ancestors.
pub(crate) fn ancestor_parameters<T>(nodes: &Slab<RouteNode<T>>, id: NodeId) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = Some(id);
    while let Some(id) = current {
        let node = &nodes[id.0];
        names.extend(node.pattern.parameter_names().map(String::from));
        current = node.parent;
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route_definition::{index, layout, route, RouteOptions};

    fn tree() -> Rc<RouteTree<&'static str>> {
        RouteTree::new(vec![layout(
            "Shell",
            vec![
                index("Home"),
                route("about", "About", vec![]),
                route("settings", RouteOptions::lazy(|| async { Ok("Settings") }), vec![]),
            ],
        )])
    }

    #[test]
    fn flattens_routes() {
        let tree = tree();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.roots().len(), 1);

        let root = tree.roots()[0];
        let children = tree.children(root);
        assert_eq!(children.len(), 3);
        assert!(children.iter().all(|c| tree.parent(*c) == Some(root)));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn status_and_content() {
        let tree = tree();
        let about = tree.find(&["", "about"]).unwrap();
        let settings = tree.find(&["", "settings"]).unwrap();

        assert_eq!(tree.load_status(about), LoadStatus::Ready);
        assert_eq!(tree.content(about), Some("About"));

        assert_eq!(tree.load_status(settings), LoadStatus::Unresolved);
        assert_eq!(tree.content(settings), None);
        assert!(tree.load_error(settings).is_none());
        assert!(tree.node(settings).is_boundary());
        assert!(!tree.node(about).is_boundary());
    }

    #[test]
    fn lazy_with_static_children_is_not_a_boundary() {
        let tree: Rc<RouteTree<&str>> = RouteTree::new(vec![route(
            "admin",
            RouteOptions::lazy(|| async { Ok("Admin") }),
            vec![index("Dashboard")],
        )]);

        assert!(!tree.node(tree.roots()[0]).is_boundary());
    }

    #[test]
    fn find_missing() {
        assert_eq!(tree().find(&["", "nope"]), None);
        assert_eq!(tree().find(&[]), None);
    }

    #[test]
    fn ancestor_parameter_names() {
        let tree: Rc<RouteTree<&str>> = RouteTree::new(vec![route(
            "users/:user",
            "User",
            vec![route("posts/:post", "Post", vec![])],
        )]);
        let post = tree.find(&["users/:user", "posts/:post"]).unwrap();

        let names = ancestor_parameters(&tree.nodes.borrow(), post);
        assert_eq!(names, vec!["post".to_string(), "user".to_string()]);
    }
}
