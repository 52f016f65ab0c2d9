#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod error;
pub mod matching;
pub mod navigation;
pub mod query;
pub mod resolution;
pub mod route_definition;
pub mod state;
pub mod tree;

mod contexts {
    pub(crate) mod router;
    pub use router::*;
}

mod router_cfg;

pub use contexts::*;
pub use router_cfg::*;

/// The URL sources the router can be driven by.
pub use nestroute_history as history;

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::contexts::*;
    pub use crate::error::*;
    pub use crate::matching::{split_path, Match, MatchChain, Params};
    pub use crate::navigation::*;
    pub use crate::query::Query;
    pub use crate::resolution::{Pending, Resolution, Settled};
    pub use crate::route_definition::*;
    pub use crate::router_cfg::{FailurePolicy, RouterConfig};
    pub use crate::state::*;
    pub use crate::tree::{LoadStatus, NodeId, RouteTree};
    pub use nestroute_history::{History, LensHistory, MemoryHistory};
}
