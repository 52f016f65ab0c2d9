use std::rc::Rc;

use crate::state::RouterState;

/// What happens when a lazy route is needed again after its loader failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    /// The failure is final. The loader is never invoked again.
    #[default]
    Keep,
    /// The next preload or resolution invokes the loader again, at most once per pass.
    Retry,
}

/// A callback invoked with the new routing state after a navigation.
pub type RoutingCallback<T> = Rc<dyn Fn(&RouterState<T>)>;

/// Global configuration options for the router.
///
/// This implements [`Default`] and follows the builder pattern, so you can use it like this:
/// ```rust
/// # use nestroute::prelude::*;
/// let cfg = RouterConfig::<&str>::default()
///     .decode_parameters(true)
///     .failure_policy(FailurePolicy::Retry);
/// let tree = RouteTree::with_config(vec![route(":name", "Greeting", vec![])], cfg);
/// assert_eq!(tree.match_path("/J%C3%BCrgen").merged_params()["name"], "Jürgen");
/// ```
pub struct RouterConfig<T> {
    pub(crate) decode_parameters: bool,
    pub(crate) failure_policy: FailurePolicy,
    pub(crate) on_update: Option<RoutingCallback<T>>,
}

impl<T> Default for RouterConfig<T> {
    fn default() -> Self {
        Self {
            decode_parameters: false,
            failure_policy: FailurePolicy::default(),
            on_update: None,
        }
    }
}

impl<T> Clone for RouterConfig<T> {
    fn clone(&self) -> Self {
        Self {
            decode_parameters: self.decode_parameters,
            failure_policy: self.failure_policy,
            on_update: self.on_update.clone(),
        }
    }
}

impl<T> RouterConfig<T> {
    /// Whether captured parameters are percent-decoded.
    ///
    /// Values that fail to decode are kept as they are. Defaults to [`false`], which keeps the
    /// literal URL text.
    pub fn decode_parameters(self, decode: bool) -> Self {
        Self {
            decode_parameters: decode,
            ..self
        }
    }

    /// What to do with routes whose loader failed. Defaults to [`FailurePolicy::Keep`].
    pub fn failure_policy(self, policy: FailurePolicy) -> Self {
        Self {
            failure_policy: policy,
            ..self
        }
    }

    /// A function to be called whenever a [`RouterContext`](crate::RouterContext) navigates.
    ///
    /// The callback runs after the subscribers were notified, with the state of the new URL.
    /// Defaults to [`None`].
    pub fn on_update(self, callback: impl Fn(&RouterState<T>) + 'static) -> Self {
        Self {
            on_update: Some(Rc::new(callback)),
            ..self
        }
    }
}
