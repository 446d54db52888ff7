//! Policy resolution for the primary records.

use convert_case::{Case, Casing};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::Resolver;
use crate::error::PresenterResult;
use crate::presenter::Presenter;
use crate::record::{PreloadHint, RecordId, RecordRef};

/// Policy outcomes of one record.
///
/// Serializes as a single flat object keyed by the identifier key and the
/// policy method names:
///
/// ```json
/// { "post_id": 1, "update": true, "destroy": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRecord {
    id_key: SmolStr,
    id: RecordId,
    checks: IndexMap<SmolStr, bool>,
}

impl PolicyRecord {
    /// Create a record with no checks.
    pub fn new(id_key: impl AsRef<str>, id: RecordId) -> Self {
        Self {
            id_key: SmolStr::new(id_key),
            id,
            checks: IndexMap::new(),
        }
    }

    /// Store the outcome of a check.
    pub fn insert(&mut self, method: impl AsRef<str>, allowed: bool) -> &mut Self {
        self.checks.insert(SmolStr::new(method), allowed);
        self
    }

    /// Identifier key (e.g. `post_id`).
    pub fn id_key(&self) -> &str {
        &self.id_key
    }

    /// Identifier of the record.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Outcome of one check.
    pub fn get(&self, method: &str) -> Option<bool> {
        self.checks.get(method).copied()
    }

    /// All checks, in policy method order.
    pub fn checks(&self) -> &IndexMap<SmolStr, bool> {
        &self.checks
    }
}

impl Serialize for PolicyRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.checks.len() + 1))?;
        map.serialize_entry(self.id_key.as_str(), &self.id)?;
        for (method, allowed) in &self.checks {
            map.serialize_entry(method.as_str(), allowed)?;
        }
        map.end()
    }
}

/// Resolves the presenter's policy methods for every primary record.
#[derive(Debug)]
pub struct PoliciesResolver {
    policy_methods: Vec<SmolStr>,
    resolved: Option<Vec<PolicyRecord>>,
}

impl PoliciesResolver {
    /// Preload the presenter's policy associations, if any.
    pub fn new<U>(presenter: &mut Presenter<U>) -> Self {
        let hint: PreloadHint = presenter.definition().policy_associations();
        if !hint.is_empty() {
            presenter.preload(&hint);
        }

        Self {
            policy_methods: presenter.definition().policy_methods(),
            resolved: None,
        }
    }

    /// Policy methods evaluated per record.
    pub fn policy_methods(&self) -> &[SmolStr] {
        &self.policy_methods
    }

    /// Take the policy records; empty if `call` never ran.
    pub fn into_policies(self) -> Vec<PolicyRecord> {
        self.resolved.unwrap_or_default()
    }

    fn resolve<U>(&self, presenter: &Presenter<U>) -> PresenterResult<Vec<PolicyRecord>> {
        let records = presenter.relation().records();
        let Some(id_key) = id_key(presenter, &records) else {
            return Ok(Vec::new());
        };

        debug!(id_key = %id_key, records = records.len(), methods = ?self.policy_methods, "Resolving policies");

        records
            .iter()
            .map(|record| -> PresenterResult<PolicyRecord> {
                let policy = presenter
                    .authorizer()
                    .policy_for_record(presenter.current_user(), record.as_ref())?;

                let mut policy_record = PolicyRecord::new(&id_key, record.id());
                for method in &self.policy_methods {
                    let allowed = policy.check(method)?;
                    trace!(id = %record.id(), method = %method, allowed, "Policy check");
                    policy_record.insert(method, allowed);
                }
                Ok(policy_record)
            })
            .collect()
    }
}

impl<U> Resolver<U> for PoliciesResolver {
    type Output = Vec<PolicyRecord>;

    fn call(&mut self, presenter: &Presenter<U>) -> PresenterResult<&Self::Output> {
        if self.resolved.is_none() {
            self.resolved = Some(self.resolve(presenter)?);
        }

        Ok(self.resolved.get_or_insert_with(Vec::new))
    }

    fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// `<snake_case base model>_id`, from the declared record set model or the
/// first record; `None` when there is nothing to key.
fn id_key<U>(presenter: &Presenter<U>, records: &[RecordRef]) -> Option<String> {
    let base_model = presenter
        .relation()
        .base_model_name()
        .or_else(|| records.first().map(|record| record.base_model_name()))?;

    Some(format!("{}_id", base_model.to_case(Case::Snake)))
}
