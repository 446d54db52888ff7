//! Integration tests for presenting records end to end.
//!
//! These tests run the registry, the resolvers and the parameter parsing
//! together over an in-memory blog.

mod common;

use common::{Account, Blog, Query, Row, labels, registry};
use pretty_assertions::assert_eq;
use prax_presenter::prelude::*;
use prax_presenter::{ErrorCode, ParamKeys, PresenterStatus};

fn params(query: &str) -> PresenterParams {
    PresenterParams::from_query(query, &ParamKeys::default()).expect("Failed to parse params")
}

/// Test included collections through nested, single and sequence descriptors
#[test]
fn test_included_collections() {
    let blog = Blog::new();
    let presenter = registry()
        .present(
            Some(Account::author(1)),
            blog.posts(),
            params("include=categories,subCategories,users"),
        )
        .expect("Failed to present posts");

    let collections = presenter.included_collections();
    let names: Vec<&str> = collections.keys().map(|name| name.as_str()).collect();
    assert_eq!(names, ["categories", "sub_categories", "users"]);

    assert_eq!(labels(&collections["categories"]), ["Category:1"]);
    assert_eq!(labels(&collections["sub_categories"]), ["SubCategory:1", "SubCategory:2"]);
    assert_eq!(labels(&collections["users"]), ["User:1", "User:2", "User:3"]);
}

/// Test that names the presenter does not declare or the user may not list are absent
#[test]
fn test_unauthorized_collections_are_absent() {
    let blog = Blog::new();
    let presenter = registry()
        .present(None, blog.posts(), params("include=users,categories,comments"))
        .expect("Failed to present posts");

    let collections = presenter.included_collections();
    assert!(collections.contains_key("categories"));
    assert!(!collections.contains_key("users"));
    assert!(!collections.contains_key("comments"));
}

/// Test collections gated by a named condition
#[test]
fn test_conditional_collection() {
    let blog = Blog::new();
    let registry = registry();

    let author = registry
        .present(Some(Account::author(1)), blog.posts(), params("include=publishers"))
        .expect("Failed to present posts");
    assert!(author.included_collections().is_empty());

    let admin = registry
        .present(Some(Account::admin()), blog.posts(), params("include=publishers"))
        .expect("Failed to present posts");
    assert_eq!(labels(&admin.included_collections()["publishers"]), ["User:3"]);
}

/// Test traversal three associations deep and sequences inside nesting
#[test]
fn test_deeply_nested_collections() {
    let blog = Blog::new();
    let presenter = registry()
        .present(Some(Account::author(1)), blog.comments(), params("include[]=categories&include[]=users"))
        .expect("Failed to present comments");

    let collections = presenter.included_collections();
    assert_eq!(labels(&collections["categories"]), ["Category:1"]);
    assert_eq!(labels(&collections["users"]), ["User:2", "User:3", "User:1"]);
}

/// Test that one preload carries the top-level keys of every whitelisted collection
#[test]
fn test_single_preload_for_included_collections() {
    let blog = Blog::new();
    let query = blog.posts();
    let log = query.preload_log();

    registry()
        .present(None, query, params("include=categories,subCategories,users"))
        .expect("Failed to present posts");

    assert_eq!(*log.lock(), vec![vec!["sub_category".to_string()]]);
}

/// Test policies in record order with exactly the requested methods
#[test]
fn test_policies() {
    let blog = Blog::new();
    let query = blog.posts();
    let log = query.preload_log();

    let presenter = registry()
        .present(Some(Account::author(2)), query, params("policies=true"))
        .expect("Failed to present posts");

    let policies = serde_json::to_value(presenter.policies()).expect("Failed to serialize policies");
    assert_eq!(
        policies,
        serde_json::json!([
            { "post_id": 1, "update": false, "destroy": false },
            { "post_id": 2, "update": true, "destroy": false },
        ])
    );
    assert_eq!(*log.lock(), vec![vec!["creator".to_string()]]);
}

/// Test that policies are skipped without a current user
#[test]
fn test_policies_require_current_user() {
    let blog = Blog::new();
    let presenter = registry()
        .present(None, blog.posts(), params("policies=true"))
        .expect("Failed to present posts");

    assert!(presenter.policies().is_empty());
}

/// Test count-only mode with a pagination total
#[test]
fn test_count_only() {
    let blog = Blog::new();
    let query = blog.posts();
    let log = query.preload_log();

    let presenter = registry()
        .present(
            Some(Account::admin()),
            Paginated::new(query, 25),
            params("count=true&include=users&policies=true"),
        )
        .expect("Failed to present posts");

    assert!(presenter.collection().is_empty());
    assert_eq!(presenter.total_count(), 25);
    assert!(presenter.included_collections().is_empty());
    assert!(presenter.policies().is_empty());
    assert!(log.lock().is_empty());
}

/// Test presenter lookup through the base model of a subclass
#[test]
fn test_subclass_uses_base_presenter() {
    let blog = Blog::new();
    let featured = Row::new("FeaturedPost", 7)
        .subclass_of("Post")
        .belongs_to("creator", &blog.users[0])
        .into_ref();

    let presenter = registry()
        .present_record(Some(Account::author(1)), featured, params("include=users&policies=1"))
        .expect("Failed to present featured post");

    assert_eq!(labels(&presenter.included_collections()["users"]), ["User:1"]);
    assert_eq!(presenter.policies()[0].id_key(), "post_id");
    assert_eq!(presenter.policies()[0].get("update"), Some(true));
}

/// Test that an unregistered model falls back to the generic presenter
#[test]
fn test_unregistered_model_resolves_nothing() {
    let blog = Blog::new();
    let query = Query::new("User", blog.users.clone());

    let presenter = registry()
        .present(Some(Account::admin()), query, params("include=categories"))
        .expect("Failed to present users");

    assert_eq!(presenter.collection().len(), 3);
    assert!(presenter.included_collections().is_empty());
}

/// Test that a missing record policy is reported, not skipped
#[test]
fn test_missing_policy_is_an_error() {
    let blog = Blog::new();
    let query = Query::new("Comment", blog.comments.clone());

    let err = registry()
        .present(Some(Account::admin()), query, params("policies=true"))
        .expect_err("Comments have no record policy");

    assert_eq!(err.code(), ErrorCode::PolicyNotFound);
}

/// Test presenting through the shared axum state
#[test]
fn test_presenter_state() {
    let blog = Blog::new();
    let state = PresenterState::from(registry());

    let presenter = state
        .present(Some(Account::author(1)), blog.posts(), params("include=sub_categories"))
        .expect("Failed to present posts");

    assert_eq!(presenter.status(), PresenterStatus::Resolved);
    assert_eq!(presenter.included_collections()["sub_categories"].len(), 2);
}
