use crate::{
    error::LoadError,
    matching::{merge_params, MatchChain, Params},
    query::Query,
    tree::{LoadState, LoadStatus, NodeContent, NodeId, RouteTree},
};

/// What to render for one matched node.
#[derive(Debug, Clone)]
pub enum SlotContent<T> {
    /// The node's content is available.
    Ready(T),
    /// The node is still loading. Shows the fallback, if the route declared one.
    Loading {
        /// The route's fallback content.
        fallback: Option<T>,
    },
    /// The node failed to load.
    Failed(LoadError),
}

impl<T> SlotContent<T> {
    /// The content to render, if there is any: the resolved content or the fallback.
    pub fn renderable(&self) -> Option<&T> {
        match self {
            Self::Ready(content) => Some(content),
            Self::Loading { fallback } => fallback.as_ref(),
            Self::Failed(_) => None,
        }
    }

    /// Returns [`true`] if the slot is [`Loading`].
    ///
    /// [`Loading`]: SlotContent::Loading
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// One level of the rendered route, root first.
#[derive(Debug, Clone)]
pub struct RouteSlot<T> {
    /// The matched node.
    pub node: NodeId,
    /// The node's load status when the snapshot was taken.
    pub status: LoadStatus,
    /// What to render.
    pub content: SlotContent<T>,
    /// The parameters captured by this node only.
    pub params: Params,
    /// The parameters of this node and all of its ancestors, deeper values winning.
    pub parameters: Params,
}

/// The current routing information, as handed to the rendering integration.
#[derive(Debug, Clone)]
pub struct RouterState<T> {
    /// The URL the snapshot was taken for.
    pub url: String,
    /// The parsed query.
    pub query: Query,
    /// All parameters, merged from the root to the leaf.
    pub parameters: Params,
    /// One slot per matched node, root first. Empty when nothing matched.
    pub slots: Vec<RouteSlot<T>>,
}

impl<T> RouterState<T> {
    /// Whether nothing matched, meaning nothing should be rendered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slot at `depth`, where the root is at depth `0`.
    pub fn slot(&self, depth: usize) -> Option<&RouteSlot<T>> {
        self.slots.get(depth)
    }

    /// Get a merged parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Whether any slot is still loading.
    pub fn is_loading(&self) -> bool {
        self.slots.iter().any(|s| s.content.is_loading())
    }
}

impl<T: Clone + 'static> RouteTree<T> {
    /// Build a snapshot of `chain`, which was matched against `url`.
    ///
    /// Taking a snapshot never starts a load.
    pub fn state_for(&self, url: &str, chain: &MatchChain) -> RouterState<T> {
        let nodes = self.nodes.borrow();
        let slots = chain
            .iter()
            .enumerate()
            .map(|(depth, m)| {
                let node = &nodes[m.node.0];
                let content = match &node.content {
                    NodeContent::Ready(content) => SlotContent::Ready(content.clone()),
                    NodeContent::Lazy { state, .. } => match state {
                        LoadState::Resolved(content) => SlotContent::Ready(content.clone()),
                        LoadState::Failed(err) => SlotContent::Failed(err.clone()),
                        LoadState::Unresolved | LoadState::Resolving(_) => SlotContent::Loading {
                            fallback: node.fallback.clone(),
                        },
                    },
                };

                RouteSlot {
                    node: m.node,
                    status: node.status(),
                    content,
                    params: m.params.clone(),
                    parameters: merge_params(&chain.matches()[..=depth]),
                }
            })
            .collect();

        RouterState {
            url: url.to_string(),
            query: Query::from_url(url),
            parameters: chain.merged_params(),
            slots,
        }
    }
}
