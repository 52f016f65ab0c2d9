//! Matching a URL against the route tree.
//!
//! Matching walks the tree depth-first. Siblings are tried in declaration order and the first one
//! that matches wins; there is no specificity scoring. Matching stops early at a lazy boundary,
//! since the routes below it are not known until it has loaded.

use std::collections::BTreeMap;

use slab::Slab;

use crate::tree::{NodeId, RouteNode, RouteTree};

/// Parameters captured from the URL, keyed by name.
pub type Params = BTreeMap<String, String>;

/// A single matched node, with the parameters its own pattern captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// The matched node.
    pub node: NodeId,
    /// The parameters captured by this node only.
    pub params: Params,
    /// How many URL segments this node consumed.
    pub consumed: usize,
}

/// The matched nodes for a URL, from the root to the deepest match.
///
/// An empty chain means nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchChain {
    matches: Vec<Match>,
}

impl MatchChain {
    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The number of matched nodes.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// The matches, root first.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Iterate over the matches, root first.
    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }

    /// The matched node ids, root first.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.matches.iter().map(|m| m.node).collect()
    }

    /// The deepest match.
    pub fn leaf(&self) -> Option<&Match> {
        self.matches.last()
    }

    /// The total number of URL segments consumed by the chain.
    pub fn consumed(&self) -> usize {
        self.matches.iter().map(|m| m.consumed).sum()
    }

    /// All parameters, merged from the root to the leaf. Deeper values overwrite shallower ones.
    ///
    /// ```rust
    /// # use nestroute::prelude::*;
    /// let tree = RouteTree::new(vec![route(":id", "Outer", vec![route(":id", "Inner", vec![])])]);
    /// let chain = tree.match_path("/a/b");
    /// assert_eq!(chain.merged_params()["id"], "b");
    /// # let _: &RouteTree<&str> = &tree;
    /// ```
    pub fn merged_params(&self) -> Params {
        merge_params(&self.matches)
    }
}

impl<'a> IntoIterator for &'a MatchChain {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Merge the parameters of `matches` from first to last.
pub(crate) fn merge_params(matches: &[Match]) -> Params {
    let mut merged = Params::new();
    for m in matches {
        merged.extend(m.params.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

/// Split the path part of `url` into segments.
///
/// The query and fragment are dropped, as are leading, trailing and repeated separators. No
/// URL is rejected.
///
/// ```rust
/// # use nestroute::matching::split_path;
/// assert_eq!(split_path("//posts//42/?tab=1#top"), vec!["posts", "42"]);
/// assert!(split_path("/").is_empty());
/// ```
pub fn split_path(url: &str) -> Vec<&str> {
    let end = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
    url[..end].split('/').filter(|s| !s.is_empty()).collect()
}

impl<T: Clone + 'static> RouteTree<T> {
    /// Match `segments`, starting at `start`, against `nodes` and their descendants.
    ///
    /// Matching never suspends and never starts a load.
    pub fn match_segments<S: AsRef<str>>(
        &self,
        nodes: &[NodeId],
        segments: &[S],
        start: usize,
    ) -> MatchChain {
        let segments: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
        let tree = self.nodes.borrow();
        let mut matches = match_nodes(
            &tree,
            nodes,
            &segments,
            start,
            self.config.decode_parameters,
        );
        matches.reverse();

        tracing::trace!(
            segments = ?segments,
            matched = matches.len(),
            "matched route segments"
        );

        MatchChain { matches }
    }

    /// Match a URL from the roots of the tree.
    pub fn match_path(&self, url: &str) -> MatchChain {
        self.match_segments(&self.roots, &split_path(url), 0)
    }
}

/// The recursive matcher. Returns the chain leaf first, so that parents can be pushed onto the
/// end without shifting.
fn match_nodes<T>(
    tree: &Slab<RouteNode<T>>,
    nodes: &[NodeId],
    segments: &[&str],
    start: usize,
    decode: bool,
) -> Vec<Match> {
    let total = segments.len();
    if start > total {
        return Vec::new();
    }
    let remaining = total - start;

    for &id in nodes {
        let node = &tree[id.0];

        // too long for what is left
        if node.pattern.len() > remaining {
            continue;
        }

        let Some(params) = node.pattern.capture(&segments[start..], decode) else {
            continue;
        };
        let consumed = node.pattern.len();
        let next = start + consumed;
        let found = Match {
            node: id,
            params,
            consumed,
        };

        // nothing below an unloaded boundary is known yet, and a failed one renders its error
        if node.is_boundary() || node.is_failed_leaf() {
            debug_assert!(next <= total);
            return vec![found];
        }

        if !node.children.is_empty() {
            let mut rest = match_nodes(tree, &node.children, segments, next, decode);
            if !rest.is_empty() {
                rest.push(found);
                return rest;
            }
        } else if next == total {
            return vec![found];
        }
    }

    Vec::new()
}
