use std::rc::Rc;

use crate::History;

type ToChild = Rc<dyn Fn(String) -> Option<String>>;
type ToParent = Rc<dyn Fn(String) -> String>;

/// A [`History`] that exposes part of a parent history to a nested router.
///
/// Reads are mapped from the parent's route space into the child's; a parent route outside of it
/// reads as `/`. Writes are mapped back before they reach the parent. Back and forward, and URL
/// changes reported by the parent, pass straight through.
///
/// ```rust
/// # use std::rc::Rc;
/// # use nestroute_history::*;
/// let parent = Rc::new(MemoryHistory::with_initial_path("/admin/users?page=2"));
/// let lens = LensHistory::under_prefix(parent.clone(), "/admin");
/// assert_eq!(lens.current_route(), "/users?page=2");
///
/// lens.push("/groups".to_string());
/// assert_eq!(parent.current_route(), "/admin/groups");
/// ```
pub struct LensHistory {
    parent: Rc<dyn History>,
    mount: Option<String>,
    to_child: ToChild,
    to_parent: ToParent,
}

impl LensHistory {
    /// Create a lens over `parent` with custom mappings.
    ///
    /// `to_child` returns [`None`] for parent routes the child cannot see.
    pub fn new(
        parent: Rc<dyn History>,
        to_child: impl Fn(String) -> Option<String> + 'static,
        to_parent: impl Fn(String) -> String + 'static,
    ) -> Self {
        Self {
            parent,
            mount: None,
            to_child: Rc::new(to_child),
            to_parent: Rc::new(to_parent),
        }
    }

    /// Create a lens that shows the child everything below `prefix`.
    ///
    /// `prefix` should start with `/` and not end with one.
    pub fn under_prefix(parent: Rc<dyn History>, prefix: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        let read = prefix.clone();
        let write = prefix.clone();

        let mut lens = Self::new(
            parent,
            move |route| {
                let rest = route.strip_prefix(read.as_str())?;
                match rest.chars().next() {
                    None => Some("/".to_string()),
                    Some('?' | '#') => Some(format!("/{rest}")),
                    Some('/') => Some(rest.to_string()),
                    // `/adminx` is not below `/admin`
                    Some(_) => None,
                }
            },
            move |route| format!("{write}{route}"),
        );
        lens.mount = Some(prefix);
        lens
    }
}

impl History for LensHistory {
    fn current_route(&self) -> String {
        (self.to_child)(self.parent.current_route()).unwrap_or_else(|| "/".to_string())
    }

    fn current_prefix(&self) -> Option<String> {
        match (self.parent.current_prefix(), &self.mount) {
            (Some(outer), Some(mount)) => Some(format!("{outer}{mount}")),
            (outer, mount) => outer.or_else(|| mount.clone()),
        }
    }

    fn full_route_path(&self) -> String {
        self.parent.full_route_path()
    }

    fn can_go_back(&self) -> bool {
        self.parent.can_go_back()
    }

    fn go_back(&self) {
        self.parent.go_back()
    }

    fn can_go_forward(&self) -> bool {
        self.parent.can_go_forward()
    }

    fn go_forward(&self) {
        self.parent.go_forward()
    }

    fn push(&self, route: String) {
        self.parent.push((self.to_parent)(route));
    }

    fn replace(&self, route: String) {
        self.parent.replace((self.to_parent)(route));
    }

    fn updater(&self, callback: Rc<dyn Fn()>) {
        self.parent.updater(callback)
    }
}
