//! Typed access to a raw response object.

use super::{DerivationPolicy, FieldSpec};
use crate::errors::SchemaError;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Borrowed view of one raw JSON object being normalized into a shape.
///
/// Accessors treat an explicit `null` the same as an absent key.
#[derive(Debug, Clone, Copy)]
pub struct RawObject<'a> {
    shape: &'static str,
    map: &'a Map<String, Value>,
    policy: DerivationPolicy,
}

impl<'a> RawObject<'a> {
    /// Wraps a raw object for the named shape.
    pub fn new(shape: &'static str, map: &'a Map<String, Value>, policy: DerivationPolicy) -> Self {
        Self { shape, map, policy }
    }

    /// Derivation policy in effect.
    pub fn policy(&self) -> DerivationPolicy {
        self.policy
    }

    fn get(&self, field: &FieldSpec) -> Option<&'a Value> {
        self.map.get(field.remote).filter(|v| !v.is_null())
    }

    fn require(&self, field: &FieldSpec) -> Result<&'a Value, SchemaError> {
        self.get(field).ok_or(SchemaError::MissingRequiredField {
            shape: self.shape,
            field: field.remote,
        })
    }

    fn mismatch(&self, field: &FieldSpec, expected: &'static str, found: &Value) -> SchemaError {
        SchemaError::TypeMismatch {
            shape: self.shape,
            field: field.remote,
            expected,
            found: json_kind(found).to_string(),
        }
    }

    /// Reads a required string.
    pub fn required_string(&self, field: &FieldSpec) -> Result<String, SchemaError> {
        let value = self.require(field)?;
        self.as_string(field, value)
    }

    /// Reads an optional string.
    pub fn optional_string(&self, field: &FieldSpec) -> Result<Option<String>, SchemaError> {
        self.get(field)
            .map(|value| self.as_string(field, value))
            .transpose()
    }

    fn as_string(&self, field: &FieldSpec, value: &Value) -> Result<String, SchemaError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.mismatch(field, "string", value))
    }

    /// Reads a required boolean.
    pub fn required_bool(&self, field: &FieldSpec) -> Result<bool, SchemaError> {
        let value = self.require(field)?;
        value
            .as_bool()
            .ok_or_else(|| self.mismatch(field, "boolean", value))
    }

    /// Reads an optional integer.
    pub fn optional_i64(&self, field: &FieldSpec) -> Result<Option<i64>, SchemaError> {
        self.get(field)
            .map(|value| {
                value
                    .as_i64()
                    .ok_or_else(|| self.mismatch(field, "integer", value))
            })
            .transpose()
    }

    /// Reads a required RFC 3339 timestamp.
    pub fn required_datetime(&self, field: &FieldSpec) -> Result<DateTime<Utc>, SchemaError> {
        let value = self.require(field)?;
        self.as_datetime(field, value)
    }

    /// Reads an optional RFC 3339 timestamp.
    pub fn optional_datetime(
        &self,
        field: &FieldSpec,
    ) -> Result<Option<DateTime<Utc>>, SchemaError> {
        self.get(field)
            .map(|value| self.as_datetime(field, value))
            .transpose()
    }

    fn as_datetime(&self, field: &FieldSpec, value: &Value) -> Result<DateTime<Utc>, SchemaError> {
        let text = value
            .as_str()
            .ok_or_else(|| self.mismatch(field, "date-time", value))?;
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| SchemaError::TypeMismatch {
                shape: self.shape,
                field: field.remote,
                expected: "date-time",
                found: format!("unparsable string {:?}", text),
            })
    }

    /// Reads an optional nested object.
    pub fn optional_object(
        &self,
        field: &FieldSpec,
    ) -> Result<Option<&'a Map<String, Value>>, SchemaError> {
        self.get(field)
            .map(|value| {
                value
                    .as_object()
                    .ok_or_else(|| self.mismatch(field, "object", value))
            })
            .transpose()
    }

    /// Projects `principal.user.<key>` out of an identity set.
    ///
    /// Under the lenient policy every missing link yields `None`. Under the
    /// strict policy a present principal whose `user` entry cannot supply
    /// a string `key` is a `DerivationAmbiguity`.
    ///
    /// A non-string `key` value counts as missing: the derived fields are
    /// strings, so a number or object there resolves like an absent key.
    pub fn principal_user_field(
        &self,
        principal: Option<&Map<String, Value>>,
        key: &str,
        derived: &'static str,
    ) -> Result<Option<String>, SchemaError> {
        let Some(principal) = principal else {
            return Ok(None);
        };

        let resolved = principal
            .get("user")
            .and_then(Value::as_object)
            .and_then(|user| user.get(key))
            .and_then(Value::as_str)
            .map(str::to_owned);

        match (resolved, self.policy) {
            (Some(value), _) => Ok(Some(value)),
            (None, DerivationPolicy::Lenient) => Ok(None),
            (None, DerivationPolicy::Strict) => Err(SchemaError::DerivationAmbiguity {
                shape: self.shape,
                field: derived,
                reason: format!("lastModifiedBy has no user.{}", key),
            }),
        }
    }
}

/// Extension of a drive item name.
///
/// Folders never have an extension; otherwise the text after the last `.`
/// is the extension, and a name without a `.` has none.
pub(crate) fn derive_extension(name: &str, folder: Option<&Map<String, Value>>) -> Option<String> {
    if folder.is_some() {
        return None;
    }
    name.rsplit_once('.').map(|(_, ext)| ext.to_string())
}

/// JSON type name used in mismatch reports.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
