//! JWT claims customization payloads and their validation gate.
//!
//! A customizer is a user-written script plus the environment variables and
//! sample data used to exercise it in the console editor. Payloads are closed:
//! any key outside the four declared fields is rejected.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Which token a customizer script applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JwtCustomizerKind {
    /// Tokens issued to end users (`getCustomJwtClaims(token, data, envVariables)`).
    AccessToken,
    /// Machine-to-machine tokens (`getCustomJwtClaims(token, envVariables)`).
    ClientCredentials,
}

impl JwtCustomizerKind {
    /// Configuration key under which the customizer is persisted.
    pub fn config_key(&self) -> &'static str {
        match self {
            JwtCustomizerKind::AccessToken => "jwt.accessToken",
            JwtCustomizerKind::ClientCredentials => "jwt.clientCredentials",
        }
    }
}

impl core::fmt::Display for JwtCustomizerKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            JwtCustomizerKind::AccessToken => write!(f, "AccessToken"),
            JwtCustomizerKind::ClientCredentials => write!(f, "ClientCredentials"),
        }
    }
}

/// How a payload is going to be used.
///
/// Both modes accept the same inputs. `Partial` marks payloads that will be
/// merged over a stored customizer instead of replacing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationMode {
    Full,
    Partial,
}

impl core::fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValidationMode::Full => write!(f, "full"),
            ValidationMode::Partial => write!(f, "partial"),
        }
    }
}

/// The recognised field names, in declaration order.
pub const CUSTOMIZER_FIELDS: [&str; 4] = ["script", "envVars", "contextSample", "tokenSample"];

/// A JWT customizer payload.
///
/// Every field is optional; absent fields are omitted again on serialization
/// so an accepted payload re-serializes to the value it was parsed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JwtCustomizer {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<BTreeMap<String, String>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub context_sample: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub token_sample: Option<Value>,
}

// An explicit `null` is a value, not an absent field: `script: null` must fail
// as a non-string, while `contextSample: null` is kept as `Some(Value::Null)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl JwtCustomizer {
    /// Overlay the fields present in `patch` onto `self`.
    pub fn merge(&mut self, patch: JwtCustomizer) {
        if patch.script.is_some() {
            self.script = patch.script;
        }
        if patch.env_vars.is_some() {
            self.env_vars = patch.env_vars;
        }
        if patch.context_sample.is_some() {
            self.context_sample = patch.context_sample;
        }
        if patch.token_sample.is_some() {
            self.token_sample = patch.token_sample;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_none()
            && self.env_vars.is_none()
            && self.context_sample.is_none()
            && self.token_sample.is_none()
    }
}

/// A payload that passed [`validate`], tagged with the schema that accepted it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedPayload {
    #[serde(skip)]
    pub kind: JwtCustomizerKind,
    #[serde(skip)]
    pub mode: ValidationMode,
    #[serde(flatten)]
    pub customizer: JwtCustomizer,
}

impl ValidatedPayload {
    pub fn into_inner(self) -> JwtCustomizer {
        self.customizer
    }

    /// The payload as JSON, identical to what was submitted.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.customizer)
    }
}

/// Validation failure for a customizer payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind} customizer payload ({mode}): {reason}")]
pub struct SchemaRejection {
    pub kind: JwtCustomizerKind,
    pub mode: ValidationMode,
    /// Field-level detail, e.g. ``unknown field `abc` ``.
    pub reason: String,
}

/// Gate a raw customizer payload before it is persisted.
///
/// Accepts any subset of [`CUSTOMIZER_FIELDS`] with the expected shapes and
/// rejects everything else, including extra keys. No script checking happens
/// here.
pub fn validate(
    payload: &Value,
    kind: JwtCustomizerKind,
    mode: ValidationMode,
) -> Result<ValidatedPayload, SchemaRejection> {
    let reject = |reason: String| {
        tracing::warn!(%kind, %mode, reason = %reason, "customizer payload rejected");
        SchemaRejection { kind, mode, reason }
    };

    // Serde would also read a sequence positionally into the struct.
    if !payload.is_object() {
        return Err(reject(format!(
            "invalid type: {}, expected an object",
            json_type(payload)
        )));
    }

    let customizer = JwtCustomizer::deserialize(payload).map_err(|e| reject(e.to_string()))?;

    tracing::debug!(%kind, %mode, "customizer payload accepted");
    Ok(ValidatedPayload {
        kind,
        mode,
        customizer,
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
