//! # prax-presenter-core
//!
//! Presenters for Prax-backed APIs.
//!
//! A presenter sits between a controller's query and its serializer. Given
//! the primary records of a request it can:
//! - Reduce the response to a total count (`?count=true`)
//! - Resolve related collections a client asks for (`?include=categories,users`),
//!   gated by the current user's list permission and per-collection conditions
//! - Resolve per-record policies for the current user (`?policies=true`)
//!
//! ## Include parsing
//!
//! ```rust
//! use prax_presenter_core::{IncludeParam, parse_include_params};
//!
//! let names = parse_include_params(Some(&IncludeParam::from("subCategories,users,users")));
//! assert_eq!(names, ["sub_categories", "users"]);
//! ```
//!
//! ## Presenting
//!
//! ```rust
//! use std::sync::Arc;
//! use prax_presenter_core::prelude::*;
//!
//! #[derive(Debug)]
//! struct Post {
//!     id: i64,
//!     creator: RecordRef,
//! }
//!
//! #[derive(Debug)]
//! struct User {
//!     id: i64,
//! }
//!
//! impl Record for Post {
//!     fn model_name(&self) -> &'static str {
//!         "Post"
//!     }
//!
//!     fn id(&self) -> RecordId {
//!         self.id.into()
//!     }
//!
//!     fn associated(&self, key: &AssociationKey) -> Associated {
//!         match key.as_str() {
//!             "creator" => Associated::One(self.creator.clone()),
//!             _ => Associated::None,
//!         }
//!     }
//! }
//!
//! impl Record for User {
//!     fn model_name(&self) -> &'static str {
//!         "User"
//!     }
//!
//!     fn id(&self) -> RecordId {
//!         self.id.into()
//!     }
//!
//!     fn associated(&self, _key: &AssociationKey) -> Associated {
//!         Associated::None
//!     }
//! }
//!
//! struct PostPresenter;
//!
//! impl PresenterDefinition<i64> for PostPresenter {
//!     fn associations_map(&self) -> AssociationMap<i64> {
//!         AssociationMap::new().with("users", AssociationEntry::new("creator"))
//!     }
//! }
//!
//! let authorizer: Arc<dyn Authorizer<i64>> = Arc::new(
//!     PolicyRegistry::new()
//!         .with_model("User", |_: Option<&i64>| Box::new(ActionPolicy::new("User").allow("index"))),
//! );
//! let registry = PresenterRegistry::new(authorizer).with("Post", PostPresenter);
//!
//! let author: RecordRef = Arc::new(User { id: 7 });
//! let posts: RecordList = vec![
//!     Arc::new(Post { id: 1, creator: author.clone() }) as RecordRef,
//!     Arc::new(Post { id: 2, creator: author }) as RecordRef,
//! ]
//! .into_iter()
//! .collect();
//!
//! let params = PresenterParams::from_query("include=users", &Default::default()).unwrap();
//! let presenter = registry.present(Some(1), posts, params).unwrap();
//!
//! assert_eq!(presenter.collection().len(), 2);
//! assert_eq!(presenter.included_collections()["users"].len(), 1);
//! ```

pub mod association;
pub mod config;
pub mod error;
pub mod include;
pub mod logging;
pub mod params;
pub mod policy;
pub mod presenter;
pub mod record;
pub mod registry;
pub mod resolvers;

#[cfg(test)]
mod fixtures;

pub use association::{
    AssociationDescriptor, AssociationEntry, AssociationKey, AssociationMap, Condition, ConditionFn,
};
pub use config::{ParamKeys, PresenterConfig, configuration, configure};
pub use error::{ErrorCode, PresenterError, PresenterResult};
pub use include::{CollectionName, IncludeItem, IncludeParam, parse_include_params};
pub use params::PresenterParams;
pub use policy::{ActionPolicy, Authorizer, BoxedPolicy, Policy, PolicyRegistry};
pub use presenter::{BasePresenter, Presenter, PresenterDefinition, PresenterStatus};
pub use record::{
    Associated, Pageable, Paginated, Preload, PreloadHint, Record, RecordId, RecordKey, RecordList, RecordRef,
    RecordSet,
};
pub use registry::{PresenterRegistry, SharedDefinition};
pub use resolvers::{IncludedCollectionsResolver, PoliciesResolver, PolicyRecord, ResolvedCollections, Resolver};

// Re-export logging utilities
pub use logging::{get_log_format, get_log_level, init as init_logging, is_debug_enabled};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::association::{AssociationDescriptor, AssociationEntry, AssociationKey, AssociationMap};
    pub use crate::error::{PresenterError, PresenterResult};
    pub use crate::include::{CollectionName, IncludeParam};
    pub use crate::params::PresenterParams;
    pub use crate::policy::{ActionPolicy, Authorizer, Policy, PolicyRegistry};
    pub use crate::presenter::{BasePresenter, Presenter, PresenterDefinition};
    pub use crate::record::{Associated, Paginated, PreloadHint, Record, RecordId, RecordList, RecordRef, RecordSet};
    pub use crate::registry::PresenterRegistry;
    pub use crate::resolvers::PolicyRecord;
}
