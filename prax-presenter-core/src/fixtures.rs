//! In-memory blog used by unit tests.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::association::AssociationKey;
use crate::policy::{ActionPolicy, Authorizer, PolicyRegistry};
use crate::record::{Associated, PreloadHint, Preload, Record, RecordId, RecordList, RecordRef, RecordSet};

/// The current user in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reader {
    pub id: i64,
    pub admin: bool,
    pub verified: bool,
}

impl Reader {
    pub fn member() -> Self {
        Self { id: 1, admin: false, verified: true }
    }

    pub fn admin() -> Self {
        Self { id: 9, admin: true, verified: true }
    }

    pub fn guest() -> Self {
        Self { id: 0, admin: false, verified: false }
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    model: &'static str,
    base_model: &'static str,
    id: i64,
    associations: IndexMap<&'static str, Associated>,
}

impl Node {
    pub fn new(model: &'static str, id: i64) -> Self {
        Self {
            model,
            base_model: model,
            id,
            associations: IndexMap::new(),
        }
    }

    pub fn base(mut self, base_model: &'static str) -> Self {
        self.base_model = base_model;
        self
    }

    pub fn with(mut self, key: &'static str, associated: impl Into<Associated>) -> Self {
        self.associations.insert(key, associated.into());
        self
    }

    pub fn shared(self) -> RecordRef {
        Arc::new(self)
    }
}

impl Record for Node {
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

/// Two posts in two sub-categories of one category, written by two users
/// and published by a third.
pub(crate) struct Blog {
    pub users: Vec<RecordRef>,
    pub posts: Vec<RecordRef>,
    preloads: Arc<Mutex<Vec<PreloadHint>>>,
}

impl Blog {
    pub fn new() -> Self {
        let category = Node::new("Category", 1).shared();
        let sub_categories = vec![
            Node::new("SubCategory", 1).with("category", category.clone()).shared(),
            Node::new("SubCategory", 2).with("category", category).shared(),
        ];
        let users = vec![
            Node::new("User", 1).shared(),
            Node::new("User", 2).shared(),
            Node::new("User", 3).shared(),
        ];
        let posts = vec![
            Node::new("Post", 1)
                .with("sub_category", sub_categories[0].clone())
                .with("creator", users[0].clone())
                .with("publisher", users[2].clone())
                .shared(),
            Node::new("Post", 2)
                .with("sub_category", sub_categories[1].clone())
                .with("creator", users[1].clone())
                .with("publisher", users[2].clone())
                .shared(),
        ];

        Self {
            users,
            posts,
            preloads: Arc::default(),
        }
    }

    /// A preloadable query over the posts.
    pub fn query(&self) -> PostQuery {
        PostQuery {
            posts: self.posts.clone(),
            preloads: Arc::clone(&self.preloads),
        }
    }

    /// The posts as a plain list.
    pub fn list(&self) -> RecordList {
        RecordList::new(self.posts.clone())
    }

    /// Preload hints received by queries built from this blog.
    pub fn preloads(&self) -> Vec<PreloadHint> {
        self.preloads.lock().clone()
    }
}

pub(crate) struct PostQuery {
    posts: Vec<RecordRef>,
    preloads: Arc<Mutex<Vec<PreloadHint>>>,
}

impl RecordSet for PostQuery {
    fn model_name(&self) -> Option<&'static str> {
        Some("Post")
    }

    fn records(&self) -> Vec<RecordRef> {
        self.posts.clone()
    }

    fn as_preloadable(&mut self) -> Option<&mut dyn Preload> {
        Some(self)
    }
}

impl Preload for PostQuery {
    fn preload(&mut self, hint: &PreloadHint) {
        self.preloads.lock().push(hint.clone());
    }
}

fn is_creator(reader: Option<&Reader>, record: &dyn Record) -> bool {
    let creator = record.associated(&AssociationKey::from("creator")).into_iter().next();
    match (reader, creator) {
        (Some(reader), Some(creator)) => creator.id() == RecordId::Int(reader.id),
        _ => false,
    }
}

/// Everyone lists categories and posts, verified readers list users, admins
/// and creators update posts, only admins destroy them.
pub(crate) fn authorizer() -> Arc<dyn Authorizer<Reader>> {
    let registry = PolicyRegistry::new()
        .with_model("Category", |_: Option<&Reader>| Box::new(ActionPolicy::new("Category").allow("index")))
        .with_model("SubCategory", |_: Option<&Reader>| {
            Box::new(ActionPolicy::new("SubCategory").allow("index"))
        })
        .with_model("Post", |_: Option<&Reader>| Box::new(ActionPolicy::new("Post").allow("index")))
        .with_model("User", |reader: Option<&Reader>| {
            Box::new(ActionPolicy::new("User").set("index", reader.is_some_and(|r| r.verified)))
        })
        .with_record("Post", |reader: Option<&Reader>, record: &dyn Record| {
            let admin = reader.is_some_and(|r| r.admin);
            Box::new(
                ActionPolicy::new("Post")
                    .set("update", admin || is_creator(reader, record))
                    .set("destroy", admin),
            )
        });

    Arc::new(registry)
}
