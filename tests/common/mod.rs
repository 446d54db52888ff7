//! Blog fixture shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use prax_presenter::prelude::*;
use prax_presenter::{Preload, PresenterRegistry};
use smol_str::SmolStr;

/// The authenticated user of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub user_id: i64,
    pub admin: bool,
}

impl Account {
    pub fn author(user_id: i64) -> Self {
        Self { user_id, admin: false }
    }

    pub fn admin() -> Self {
        Self { user_id: 100, admin: true }
    }
}

/// A row of any blog table.
#[derive(Debug)]
pub struct Row {
    model: &'static str,
    base_model: &'static str,
    id: i64,
    associations: HashMap<&'static str, Associated>,
}

impl Row {
    pub fn new(model: &'static str, id: i64) -> Self {
        Self {
            model,
            base_model: model,
            id,
            associations: HashMap::new(),
        }
    }

    pub fn subclass_of(mut self, base_model: &'static str) -> Self {
        self.base_model = base_model;
        self
    }

    pub fn belongs_to(mut self, key: &'static str, record: &RecordRef) -> Self {
        self.associations.insert(key, Associated::One(record.clone()));
        self
    }

    pub fn has_many(mut self, key: &'static str, records: &[RecordRef]) -> Self {
        self.associations.insert(key, Associated::Many(records.to_vec()));
        self
    }

    pub fn into_ref(self) -> RecordRef {
        Arc::new(self)
    }
}

impl Record for Row {
    fn model_name(&self) -> &'static str {
        self.model
    }

    fn base_model_name(&self) -> &'static str {
        self.base_model
    }

    fn id(&self) -> RecordId {
        self.id.into()
    }

    fn associated(&self, key: &AssociationKey) -> Associated {
        self.associations.get(key.as_str()).cloned().unwrap_or_default()
    }
}

/// A query over one table that records the preloads it was asked for.
#[derive(Debug)]
pub struct Query {
    model: &'static str,
    rows: Vec<RecordRef>,
    preloads: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Query {
    pub fn new(model: &'static str, rows: Vec<RecordRef>) -> Self {
        Self {
            model,
            rows,
            preloads: Arc::default(),
        }
    }

    /// Handle to inspect preloads after the query moved into a presenter.
    pub fn preload_log(&self) -> Arc<Mutex<Vec<Vec<String>>>> {
        Arc::clone(&self.preloads)
    }
}

impl RecordSet for Query {
    fn model_name(&self) -> Option<&'static str> {
        Some(self.model)
    }

    fn records(&self) -> Vec<RecordRef> {
        self.rows.clone()
    }

    fn as_preloadable(&mut self) -> Option<&mut dyn Preload> {
        Some(self)
    }
}

impl Preload for Query {
    fn preload(&mut self, hint: &PreloadHint) {
        let keys = hint.keys().map(|key| key.to_string()).collect();
        self.preloads.lock().push(keys);
    }
}

/// One category with two sub-categories, three users and two posts.
///
/// Post 1 is in sub-category 1, created by user 1; post 2 is in
/// sub-category 2, created by user 2. User 3 published both.
pub struct Blog {
    pub category: RecordRef,
    pub sub_categories: Vec<RecordRef>,
    pub users: Vec<RecordRef>,
    pub posts: Vec<RecordRef>,
    pub comments: Vec<RecordRef>,
}

impl Blog {
    pub fn new() -> Self {
        let category = Row::new("Category", 1).into_ref();
        let sub_categories = vec![
            Row::new("SubCategory", 1).belongs_to("category", &category).into_ref(),
            Row::new("SubCategory", 2).belongs_to("category", &category).into_ref(),
        ];
        let users: Vec<RecordRef> = (1..=3).map(|id| Row::new("User", id).into_ref()).collect();
        let posts = vec![
            Row::new("Post", 1)
                .belongs_to("sub_category", &sub_categories[0])
                .belongs_to("creator", &users[0])
                .belongs_to("publisher", &users[2])
                .into_ref(),
            Row::new("Post", 2)
                .belongs_to("sub_category", &sub_categories[1])
                .belongs_to("creator", &users[1])
                .belongs_to("publisher", &users[2])
                .into_ref(),
        ];
        let comments = vec![
            Row::new("Comment", 1).belongs_to("post", &posts[0]).has_many("mentions", &users[1..]).into_ref(),
            Row::new("Comment", 2).belongs_to("post", &posts[0]).into_ref(),
            Row::new("Comment", 3).belongs_to("post", &posts[1]).into_ref(),
        ];

        Self {
            category,
            sub_categories,
            users,
            posts,
            comments,
        }
    }

    pub fn posts(&self) -> Query {
        Query::new("Post", self.posts.clone())
    }

    pub fn comments(&self) -> Query {
        Query::new("Comment", self.comments.clone())
    }
}

/// Presenter for posts.
pub struct PostPresenter;

impl PresenterDefinition<Account> for PostPresenter {
    fn associations_map(&self) -> AssociationMap<Account> {
        AssociationMap::new()
            .with(
                "categories",
                AssociationEntry::new(AssociationDescriptor::nested("sub_category", "category")),
            )
            .with("sub_categories", AssociationEntry::new("sub_category"))
            .with("users", AssociationEntry::new(vec!["creator", "publisher"]))
            .with("publishers", AssociationEntry::new("publisher").target_model("User").when_named("admin"))
    }

    fn policy_methods(&self) -> Vec<SmolStr> {
        vec!["update".into(), "destroy".into()]
    }

    fn policy_associations(&self) -> PreloadHint {
        PreloadHint::new().with("creator")
    }

    fn condition(&self, name: &str, presenter: &Presenter<Account>) -> Option<bool> {
        match name {
            "admin" => Some(presenter.current_user().is_some_and(|account| account.admin)),
            _ => None,
        }
    }
}

/// Presenter for comments, reaching categories three associations away.
pub struct CommentPresenter;

impl PresenterDefinition<Account> for CommentPresenter {
    fn associations_map(&self) -> AssociationMap<Account> {
        AssociationMap::new()
            .with(
                "categories",
                AssociationEntry::new(AssociationDescriptor::nested(
                    "post",
                    AssociationDescriptor::nested("sub_category", "category"),
                )),
            )
            .with(
                "users",
                AssociationEntry::new(vec![
                    AssociationDescriptor::key("mentions"),
                    AssociationDescriptor::nested("post", vec!["creator", "publisher"]),
                ]),
            )
    }
}

fn creator_id(record: &dyn Record) -> Option<RecordId> {
    record
        .associated(&AssociationKey::new("creator"))
        .into_iter()
        .next()
        .map(|creator| creator.id())
}

/// Everyone lists categories and sub-categories; signed-in accounts list
/// users; creators and admins update posts; admins destroy them.
pub fn authorizer() -> Arc<dyn Authorizer<Account>> {
    let mut registry = PolicyRegistry::new();
    registry
        .register_model("Category", |_: Option<&Account>| {
            Box::new(ActionPolicy::new("Category").allow("index"))
        })
        .register_model("SubCategory", |_: Option<&Account>| {
            Box::new(ActionPolicy::new("SubCategory").allow("index"))
        })
        .register_model("User", |account: Option<&Account>| {
            Box::new(ActionPolicy::new("User").set("index", account.is_some()))
        })
        .register_record("Post", |account: Option<&Account>, record: &dyn Record| {
            let admin = account.is_some_and(|a| a.admin);
            let creator = account.is_some_and(|a| creator_id(record) == Some(RecordId::Int(a.user_id)));
            Box::new(ActionPolicy::new("Post").set("update", admin || creator).set("destroy", admin))
        });

    Arc::new(registry)
}

pub fn registry() -> PresenterRegistry<Account> {
    PresenterRegistry::new(authorizer())
        .with("Post", PostPresenter)
        .with("Comment", CommentPresenter)
}

/// `Model:id` labels of records, for compact assertions.
pub fn labels(records: &[RecordRef]) -> Vec<String> {
    records
        .iter()
        .map(|record| format!("{}:{}", record.model_name(), record.id()))
        .collect()
}
