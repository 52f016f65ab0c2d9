//! Loading lazy routes.
//!
//! Every lazy node moves through `Unresolved → Resolving → Resolved | Failed`. The move to
//! `Resolving` invokes the loader and caches a [`Pending`] handle on the node; anyone asking for
//! the node while it is in flight gets a clone of that handle instead of a second load. The
//! outcome is written to the node by the load itself, so it lands exactly once, whoever awaits.
//!
//! Loads for the nodes of one matched chain start together and are awaited together. Nodes
//! discovered by a load can only be matched after it settled, so nested boundaries load one level
//! after another.

use std::{
    collections::HashSet,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures_util::future::{join_all, FutureExt, LocalBoxFuture, Shared};
use tracing::{debug, trace, warn};

use crate::{
    error::LoadError,
    matching::{split_path, MatchChain},
    route_definition::LazyRoute,
    router_cfg::FailurePolicy,
    state::RouterState,
    tree::{ancestor_parameters, insert_route, LoadState, NodeContent, NodeId, RouteTree},
};

/// A one-shot completion handle for an in-flight load.
///
/// All clones complete together, once the load settled and its outcome was recorded on the node.
#[derive(Clone)]
pub struct Pending(Shared<LocalBoxFuture<'static, ()>>);

impl Future for Pending {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.0.poll_unpin(cx)
    }
}

/// Completes once every load started by [`RouteTree::resolve`] settled, successfully or not.
pub struct Settled {
    loads: usize,
    fut: LocalBoxFuture<'static, ()>,
}

impl Settled {
    fn new(pending: Vec<Pending>) -> Self {
        Self {
            loads: pending.len(),
            fut: join_all(pending).map(|_| ()).boxed_local(),
        }
    }

    /// The number of loads this waits for.
    pub fn loads(&self) -> usize {
        self.loads
    }

    /// Whether there is nothing to wait for. Re-rendering after awaiting would change nothing.
    pub fn is_idle(&self) -> bool {
        self.loads == 0
    }
}

impl Future for Settled {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.fut.poll_unpin(cx)
    }
}

/// The result of resolving a URL while rendering.
pub struct Resolution<T> {
    /// The matched chain.
    pub chain: MatchChain,
    /// What to render right now.
    pub state: RouterState<T>,
    /// Completes when the loads started for this URL settled. Re-match after it does.
    pub settled: Settled,
}

impl<T: Clone + 'static> RouteTree<T> {
    /// Resolve every lazy route on the path to `url`, ahead of rendering.
    ///
    /// Runs one level at a time: match, start the loads of every pending node on the chain,
    /// wait for all of them, and match again to find boundaries that were hidden below. Each
    /// node is loaded at most once per call; loads already in flight are joined, not repeated.
    pub async fn preload(&self, url: &str) {
        let segments = split_path(url);
        let mut visited = HashSet::new();
        let mut level = 0usize;

        loop {
            let chain = self.match_segments(&self.roots, &segments, 0);
            let pending: Vec<_> = chain
                .nodes()
                .into_iter()
                .filter(|id| visited.insert(*id))
                .filter_map(|id| self.begin_load(id))
                .collect();

            if pending.is_empty() {
                break;
            }

            debug!(url, level, loads = pending.len(), "preloading lazy routes");
            join_all(pending).await;
            level += 1;
        }
    }

    /// Match `url`, start loading every pending node on the chain without waiting, and return
    /// what to render now.
    pub fn resolve(&self, url: &str) -> Resolution<T> {
        let chain = self.match_path(url);
        let pending = chain
            .nodes()
            .into_iter()
            .filter_map(|id| self.begin_load(id))
            .collect();
        let state = self.state_for(url, &chain);

        Resolution {
            chain,
            state,
            settled: Settled::new(pending),
        }
    }

    /// Start loading `id` if it needs it, or join the load already in flight.
    ///
    /// Returns [`None`] for nodes with nothing to wait for.
    pub fn load(&self, id: NodeId) -> Option<Pending> {
        self.begin_load(id)
    }

    fn begin_load(&self, id: NodeId) -> Option<Pending> {
        let (loader, route) = {
            let nodes = self.nodes.borrow();
            let node = &nodes[id.0];
            let NodeContent::Lazy { loader, state } = &node.content else {
                return None;
            };

            match state {
                LoadState::Resolving(pending) => {
                    trace!(%id, route = %node.pattern, "joining in-flight load");
                    return Some(pending.clone());
                }
                LoadState::Resolved(_) => return None,
                LoadState::Failed(_) if self.config.failure_policy == FailurePolicy::Keep => {
                    return None
                }
                LoadState::Failed(_) => {
                    debug!(%id, route = %node.pattern, "retrying failed load")
                }
                LoadState::Unresolved => {}
            }

            (loader.clone(), node.pattern.to_string())
        };

        debug!(%id, %route, "loading lazy route");

        // the loader is user code, so no borrow may be held while it runs
        let load = loader();
        let tree = self.this.clone();
        let pending = Pending(
            async move {
                let outcome = load.await;
                match tree.upgrade() {
                    Some(tree) => tree.settle(id, outcome),
                    None => warn!(%id, %route, "route tree dropped before its load settled"),
                }
            }
            .boxed_local()
            .shared(),
        );

        if let NodeContent::Lazy { state, .. } = &mut self.nodes.borrow_mut()[id.0].content {
            *state = LoadState::Resolving(pending.clone());
        }

        Some(pending)
    }

    fn settle(&self, id: NodeId, outcome: anyhow::Result<LazyRoute<T>>) {
        let mut nodes = self.nodes.borrow_mut();
        let route = nodes[id.0].pattern.to_string();

        let settled = match outcome {
            Ok(LazyRoute { content, children }) => {
                let ancestors = ancestor_parameters(&nodes, id);
                let discovered: Vec<_> = children
                    .into_iter()
                    .map(|child| insert_route(&mut nodes, child, Some(id), &ancestors))
                    .collect();

                debug!(%id, %route, discovered = discovered.len(), "lazy route resolved");
                nodes[id.0].children.extend(discovered);
                LoadState::Resolved(content)
            }
            Err(error) => {
                warn!(%id, %route, "lazy route failed to load: {error:#}");
                LoadState::Failed(LoadError::new(route, error))
            }
        };

        if let NodeContent::Lazy { state, .. } = &mut nodes[id.0].content {
            *state = settled;
        }
    }
}
