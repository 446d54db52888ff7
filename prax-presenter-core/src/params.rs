//! Request parameters understood by presenters.

use url::form_urlencoded;

use crate::config::{self, ParamKeys};
use crate::error::{PresenterError, PresenterResult};
use crate::include::{IncludeItem, IncludeParam};

/// Options a client sets on a presented request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenterParams {
    /// Return only the total count.
    pub count: bool,
    /// Related collections to include.
    pub include: Option<IncludeParam>,
    /// Resolve policies for the primary records.
    pub policies: bool,
}

impl PresenterParams {
    /// Create empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a count only.
    pub fn count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    /// Request related collections.
    pub fn include(mut self, include: impl Into<IncludeParam>) -> Self {
        self.include = Some(include.into());
        self
    }

    /// Request policy resolution.
    pub fn policies(mut self, policies: bool) -> Self {
        self.policies = policies;
        self
    }

    /// Read parameters from an urlencoded query string, using the given key
    /// names.
    ///
    /// The include parameter may be given once as a delimited string
    /// (`include=a,b`) or repeated in list form (`include[]=a&include[]=b`),
    /// but not both.
    ///
    /// ```rust
    /// use prax_presenter_core::PresenterParams;
    /// use prax_presenter_core::config::ParamKeys;
    ///
    /// let params = PresenterParams::from_query("include=users&policies=true", &ParamKeys::default()).unwrap();
    /// assert!(params.policies);
    /// assert!(!params.count);
    /// ```
    pub fn from_query(query: &str, keys: &ParamKeys) -> PresenterResult<Self> {
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()), keys)
    }

    /// Read parameters from an urlencoded query string, using the
    /// process-wide key names.
    pub fn from_configured_query(query: &str) -> PresenterResult<Self> {
        Self::from_query(query, &config::configuration().params)
    }

    /// Read parameters from decoded key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I, keys: &ParamKeys) -> PresenterResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let list_key = format!("{}[]", keys.include);
        let mut params = Self::default();
        let mut delimited: Option<String> = None;
        let mut items: Vec<IncludeItem> = Vec::new();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            if key == keys.count {
                params.count = parse_flag(key, value)?;
            } else if key == keys.policies {
                params.policies = parse_flag(key, value)?;
            } else if key == keys.include {
                delimited = Some(value.to_string());
            } else if key == list_key {
                items.push(IncludeItem::Text(value.to_string()));
            }
        }

        params.include = match (delimited, items.is_empty()) {
            (Some(_), false) => {
                return Err(PresenterError::invalid_parameters(format!(
                    "`{}` given both as a string and as a list",
                    keys.include
                )));
            }
            (Some(text), true) => Some(IncludeParam::Delimited(text)),
            (None, false) => Some(IncludeParam::List(items)),
            (None, true) => None,
        };

        Ok(params)
    }
}

/// Interpret a boolean flag; a bare key (`?count`) sets the flag.
fn parse_flag(key: &str, value: &str) -> PresenterResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "" | "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(PresenterError::invalid_parameters(format!(
            "`{key}` expects a boolean, got `{other}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;

    fn keys() -> ParamKeys {
        ParamKeys::default()
    }

    #[test]
    fn test_builder() {
        let params = PresenterParams::new().count(true).include("users").policies(true);
        assert!(params.count);
        assert!(params.policies);
        assert_eq!(params.include, Some(IncludeParam::Delimited("users".into())));
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(PresenterParams::from_query("", &keys()).unwrap(), PresenterParams::default());
    }

    #[test]
    fn test_delimited_include() {
        let params =
            PresenterParams::from_query("include=categories%2CsubCategories&count=false", &keys()).unwrap();
        assert_eq!(
            params.include,
            Some(IncludeParam::Delimited("categories,subCategories".into()))
        );
        assert!(!params.count);
    }

    #[test]
    fn test_list_include() {
        let params = PresenterParams::from_query("include[]=categories&include[]=users", &keys()).unwrap();
        assert_eq!(params.include, Some(IncludeParam::list(["categories", "users"])));
    }

    #[test]
    fn test_mixed_include_rejected() {
        let err = PresenterParams::from_query("include=users&include[]=categories", &keys()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameters);
    }

    #[test]
    fn test_flags() {
        let params = PresenterParams::from_query("count&policies=YES", &keys()).unwrap();
        assert!(params.count);
        assert!(params.policies);

        let err = PresenterParams::from_query("count=maybe", &keys()).unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn test_renamed_keys() {
        let keys = ParamKeys {
            count: "count_only".into(),
            include: "includes".into(),
            policies: "with_policies".into(),
        };

        let params =
            PresenterParams::from_query("includes=users&with_policies=1&include=posts&count=1", &keys).unwrap();
        assert_eq!(params.include, Some(IncludeParam::Delimited("users".into())));
        assert!(params.policies);
        assert!(!params.count);
    }
}
