use std::rc::Rc;

use nestroute::prelude::*;

type Tree = Rc<RouteTree<&'static str>>;

fn rendered(tree: &Tree, chain: &MatchChain) -> Vec<&'static str> {
    chain
        .iter()
        .map(|m| tree.content(m.node).unwrap_or("<pending>"))
        .collect()
}

#[test]
fn layout_index_and_leaf() {
    let tree: Tree = RouteTree::new(vec![layout(
        "Shell",
        vec![index("Home"), route("about", "About", vec![])],
    )]);
    let root = tree.roots()[0];

    let chain = tree.match_segments::<&str>(&[root], &[], 0);
    assert_eq!(rendered(&tree, &chain), vec!["Shell", "Home"]);
    assert!(chain.merged_params().is_empty());

    let chain = tree.match_segments(&[root], &["about"], 0);
    assert_eq!(rendered(&tree, &chain), vec!["Shell", "About"]);

    assert!(tree.match_segments(&[root], &["nope"], 0).is_empty());
}

#[test]
fn parameter_under_fixed_route() {
    let tree: Tree = RouteTree::new(vec![route(
        "posts",
        "Posts",
        vec![route(":id", "Post", vec![])],
    )]);
    let posts = tree.roots()[0];

    let chain = tree.match_segments(&[posts], &["posts", "42"], 0);
    assert_eq!(rendered(&tree, &chain), vec!["Posts", "Post"]);
    assert!(chain.matches()[0].params.is_empty());
    assert_eq!(chain.matches()[1].params.get("id").map(String::as_str), Some("42"));
}

#[test]
fn unresolved_boundary_stops_the_chain() {
    let tree: Tree = RouteTree::new(vec![route(
        "settings",
        RouteOptions::lazy(|| async { Ok("Settings") }),
        vec![],
    )]);
    let settings = tree.roots()[0];

    let chain = tree.match_segments(&[settings], &["settings", "profile"], 0);
    assert_eq!(chain.nodes(), vec![settings]);
    assert_eq!(tree.load_status(settings), LoadStatus::Unresolved);

    let chain = tree.match_path("/settings/profile/avatar/edit");
    assert_eq!(chain.nodes(), vec![settings]);
}

#[test]
fn declaration_order_breaks_ties() {
    let tree: Tree = RouteTree::new(vec![layout(
        "Shell",
        vec![
            route("new", "NewPost", vec![]),
            route(":slug", "Post", vec![]),
            route("new", "Unreachable", vec![]),
        ],
    )]);

    assert_eq!(
        rendered(&tree, &tree.match_path("/new")),
        vec!["Shell", "NewPost"]
    );
    assert_eq!(
        rendered(&tree, &tree.match_path("/hello")),
        vec!["Shell", "Post"]
    );
}

#[test]
fn matching_twice_yields_the_same_nodes() {
    let tree: Tree = RouteTree::new(vec![layout(
        "Shell",
        vec![route("users/:id", "User", vec![index("Profile")])],
    )]);

    for url in ["/users/1", "/users/1/", "users/1?tab=x", "/nope"] {
        assert_eq!(tree.match_path(url).nodes(), tree.match_path(url).nodes());
    }
}

#[test]
fn merged_params_prefer_deeper_routes() {
    let tree: Tree = RouteTree::new(vec![route(
        "org/:id",
        "Org",
        vec![route("team/:id", "Team", vec![route(":member", "Member", vec![])])],
    )]);

    let chain = tree.match_path("/org/acme/team/core/ada");
    let params = chain.merged_params();
    assert_eq!(params.get("id").map(String::as_str), Some("core"));
    assert_eq!(params.get("member").map(String::as_str), Some("ada"));
    assert_eq!(chain.consumed(), 5);
}

#[test]
fn permissive_tokenization() {
    let tree: Tree = RouteTree::new(vec![route("a/b", "AB", vec![])]);

    for url in ["a/b", "/a/b", "/a/b/", "//a//b//", "/a/b?x=1", "/a/b#top"] {
        assert_eq!(rendered(&tree, &tree.match_path(url)), vec!["AB"], "{url}");
    }
}

#[test]
fn decoding_parameters_is_opt_in() {
    let routes = || vec![route(":name", "Greeting", vec![])];

    let literal: Tree = RouteTree::new(routes());
    assert_eq!(
        literal.match_path("/hello%20world").merged_params()["name"],
        "hello%20world"
    );

    let decoded: Tree =
        RouteTree::with_config(routes(), RouterConfig::default().decode_parameters(true));
    assert_eq!(
        decoded.match_path("/hello%20world").merged_params()["name"],
        "hello world"
    );
}
