//! Authorization oracle used by the resolvers.
//!
//! Presenters never decide permissions themselves. They ask an
//! [`Authorizer`] for a [`Policy`], either for a whole model (may the user
//! list categories at all?) or for one record (may the user update post 7?),
//! and record what the policy answers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::{PresenterError, PresenterResult};
use crate::record::Record;

/// Action checked to decide whether a collection may be listed.
pub const INDEX_ACTION: &str = "index";

/// Named authorization checks for one model or record.
pub trait Policy: Send + Sync {
    /// Evaluate the named check (e.g. `"update"`).
    fn check(&self, action: &str) -> PresenterResult<bool>;

    /// Whether records of the model may be listed.
    fn index(&self) -> PresenterResult<bool> {
        self.check(INDEX_ACTION)
    }
}

/// Boxed policy returned by an authorizer.
pub type BoxedPolicy = Box<dyn Policy>;

/// Source of policies for a current user.
///
/// Errors are propagated by the resolvers: a model without a policy is a
/// configuration defect, never a reason to silently skip data.
pub trait Authorizer<U>: Send + Sync {
    /// Policy for a model as a whole.
    fn policy_for_model(&self, user: Option<&U>, model: &str) -> PresenterResult<BoxedPolicy>;

    /// Policy for a single record.
    fn policy_for_record(&self, user: Option<&U>, record: &dyn Record) -> PresenterResult<BoxedPolicy>;
}

/// A policy backed by a fixed table of actions.
#[derive(Debug, Clone)]
pub struct ActionPolicy {
    model: SmolStr,
    actions: IndexMap<SmolStr, bool>,
}

impl ActionPolicy {
    /// Create a policy with no actions.
    pub fn new(model: impl AsRef<str>) -> Self {
        Self {
            model: SmolStr::new(model),
            actions: IndexMap::new(),
        }
    }

    /// Set the outcome of an action.
    pub fn set(mut self, action: impl AsRef<str>, allowed: bool) -> Self {
        self.actions.insert(SmolStr::new(action), allowed);
        self
    }

    /// Allow an action.
    pub fn allow(self, action: impl AsRef<str>) -> Self {
        self.set(action, true)
    }

    /// Deny an action.
    pub fn deny(self, action: impl AsRef<str>) -> Self {
        self.set(action, false)
    }

    /// Model the policy applies to.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Policy for ActionPolicy {
    fn check(&self, action: &str) -> PresenterResult<bool> {
        self.actions
            .get(action)
            .copied()
            .ok_or_else(|| PresenterError::unknown_policy_action(self.model.as_str(), action))
    }
}

/// Factory for model-level policies.
pub type ModelPolicyFn<U> = Arc<dyn Fn(Option<&U>) -> BoxedPolicy + Send + Sync>;

/// Factory for record-level policies.
pub type RecordPolicyFn<U> = Arc<dyn Fn(Option<&U>, &dyn Record) -> BoxedPolicy + Send + Sync>;

/// An authorizer that maps model names to policy factories.
///
/// Record lookups try the record's model first, then its base model.
pub struct PolicyRegistry<U> {
    model_policies: HashMap<String, ModelPolicyFn<U>>,
    record_policies: HashMap<String, RecordPolicyFn<U>>,
}

impl<U> PolicyRegistry<U> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            model_policies: HashMap::new(),
            record_policies: HashMap::new(),
        }
    }

    /// Register the model-level policy of a model.
    pub fn register_model<F>(&mut self, model: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Option<&U>) -> BoxedPolicy + Send + Sync + 'static,
    {
        self.model_policies.insert(model.into(), Arc::new(f));
        self
    }

    /// Register the record-level policy of a model.
    pub fn register_record<F>(&mut self, model: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Option<&U>, &dyn Record) -> BoxedPolicy + Send + Sync + 'static,
    {
        self.record_policies.insert(model.into(), Arc::new(f));
        self
    }

    /// Register a model-level policy, builder style.
    pub fn with_model<F>(mut self, model: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<&U>) -> BoxedPolicy + Send + Sync + 'static,
    {
        self.register_model(model, f);
        self
    }

    /// Register a record-level policy, builder style.
    pub fn with_record<F>(mut self, model: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<&U>, &dyn Record) -> BoxedPolicy + Send + Sync + 'static,
    {
        self.register_record(model, f);
        self
    }

    /// Check if a model-level policy is registered.
    pub fn has_model_policy(&self, model: &str) -> bool {
        self.model_policies.contains_key(model)
    }

    /// Check if a record-level policy is registered.
    pub fn has_record_policy(&self, model: &str) -> bool {
        self.record_policies.contains_key(model)
    }
}

impl<U> Default for PolicyRegistry<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> fmt::Debug for PolicyRegistry<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyRegistry")
            .field("model_policies", &self.model_policies.keys().collect::<Vec<_>>())
            .field("record_policies", &self.record_policies.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<U> Authorizer<U> for PolicyRegistry<U> {
    fn policy_for_model(&self, user: Option<&U>, model: &str) -> PresenterResult<BoxedPolicy> {
        self.model_policies
            .get(model)
            .map(|factory| factory(user))
            .ok_or_else(|| PresenterError::policy_not_found(model))
    }

    fn policy_for_record(&self, user: Option<&U>, record: &dyn Record) -> PresenterResult<BoxedPolicy> {
        self.record_policies
            .get(record.model_name())
            .or_else(|| self.record_policies.get(record.base_model_name()))
            .map(|factory| factory(user, record))
            .ok_or_else(|| PresenterError::policy_not_found(record.model_name()))
    }
}
