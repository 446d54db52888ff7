//! Resolvers run by a [`Presenter`](crate::Presenter) during `call`.
//!
//! A resolver is constructed from the presenter (taking the opportunity to
//! request preloads on the primary record set) and then called with it to
//! produce its output. Construction and resolution are separate steps so
//! that gating decisions are fixed before any traversal happens.
//!
//! - [`IncludedCollectionsResolver`]: whitelists requested collection names
//!   and walks their association descriptors.
//! - [`PoliciesResolver`]: evaluates the presenter's policy methods for every
//!   primary record.

mod included;
mod policies;

pub use included::{IncludedCollectionsResolver, ResolvedCollections};
pub use policies::{PoliciesResolver, PolicyRecord};

use crate::error::PresenterResult;
use crate::presenter::Presenter;

/// A resolution step over a presenter.
pub trait Resolver<U> {
    /// Resolved value.
    type Output;

    /// Resolve and return the stored output.
    ///
    /// Calling again returns the stored output without resolving twice.
    fn call(&mut self, presenter: &Presenter<U>) -> PresenterResult<&Self::Output>;

    /// Whether `call` already produced the output.
    fn is_resolved(&self) -> bool;
}
