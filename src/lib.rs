//! # Prax Presenter
//!
//! Presentation-layer resolution for Prax-backed APIs.
//!
//! A presenter takes the primary records of a request and, driven by the
//! request parameters, reduces them to a count or resolves:
//! - Related collections requested with `include`, gated by the current
//!   user's list permission and per-collection conditions
//! - Per-record policies for the current user when `policies` is set
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use prax_presenter::prelude::*;
//!
//! struct PostPresenter;
//!
//! impl PresenterDefinition<User> for PostPresenter {
//!     fn associations_map(&self) -> AssociationMap<User> {
//!         AssociationMap::new()
//!             .with(
//!                 "categories",
//!                 AssociationEntry::new(AssociationDescriptor::nested("sub_category", "category")),
//!             )
//!             .with("sub_categories", AssociationEntry::new("sub_category"))
//!             .with("users", AssociationEntry::new(vec!["creator", "publisher"]))
//!     }
//!
//!     fn policy_methods(&self) -> Vec<SmolStr> {
//!         vec!["update".into(), "destroy".into()]
//!     }
//! }
//!
//! let registry = PresenterRegistry::new(authorizer).with("Post", PostPresenter);
//! let params = PresenterParams::from_configured_query("include=categories,users&policies=true")?;
//! let presenter = registry.present(Some(current_user), posts, params)?;
//!
//! for (name, records) in presenter.included_collections() {
//!     println!("{name}: {}", records.len());
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Axum integration.
#[cfg(feature = "axum")]
#[cfg_attr(docsrs, doc(cfg(feature = "axum")))]
pub mod axum {
    pub use prax_presenter_axum::{PresentParams, PresenterAxumError, PresenterState, Result};
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use prax_presenter_core::prelude::*;

    #[cfg(feature = "axum")]
    pub use prax_presenter_axum::{PresentParams, PresenterAxumError, PresenterState};
}

// Re-export the core crate at the root
pub use prax_presenter_core::*;
