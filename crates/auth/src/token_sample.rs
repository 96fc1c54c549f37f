//! Token payload and user context samples for the customizer test panel.
//!
//! These are the shapes a customizer script receives. The console pre-fills
//! the editor with the defaults below so a script can be run before any real
//! token exists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::jwt_customizer::{JwtCustomizer, JwtCustomizerKind};

/// Claims shared by every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardTokenPayload {
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub client_id: String,
    pub scope: String,
    pub aud: String,
}

/// Access token claims seen by an access token customizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenPayload {
    #[serde(flatten)]
    pub standard: StandardTokenPayload,
    pub grant_id: String,
    pub account_id: String,
    pub kind: TokenKindTag,
}

/// Client credentials token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentialsPayload {
    #[serde(flatten)]
    pub standard: StandardTokenPayload,
    pub kind: TokenKindTag,
}

/// The `kind` claim carried by sample tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKindTag {
    AccessToken,
    ClientCredentials,
}

/// User data passed to access token customizers as `data.user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtCustomizerUserContext {
    pub id: String,
    pub primary_email: Option<String>,
    pub primary_phone: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub identities: BTreeMap<String, Value>,
    #[serde(default)]
    pub custom_data: BTreeMap<String, Value>,
}

/// Context sample wrapper (`{ "user": { ... } }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTokenContext {
    pub user: JwtCustomizerUserContext,
}

const SAMPLE_ISSUED_AT: i64 = 1_516_235_022;

impl Default for StandardTokenPayload {
    fn default() -> Self {
        Self {
            jti: "f1d3d2d1-1f2d-3d4e-5d6f-7d8a9d0e1d2".to_string(),
            iat: SAMPLE_ISSUED_AT,
            exp: SAMPLE_ISSUED_AT + 3600,
            client_id: "my_app".to_string(),
            scope: "read write".to_string(),
            aud: "http://localhost:3000/api/test".to_string(),
        }
    }
}

impl Default for AccessTokenPayload {
    fn default() -> Self {
        Self {
            standard: StandardTokenPayload::default(),
            grant_id: "grant_123".to_string(),
            account_id: "uid_123".to_string(),
            kind: TokenKindTag::AccessToken,
        }
    }
}

impl Default for ClientCredentialsPayload {
    fn default() -> Self {
        Self {
            standard: StandardTokenPayload::default(),
            kind: TokenKindTag::ClientCredentials,
        }
    }
}

impl Default for UserTokenContext {
    fn default() -> Self {
        Self {
            user: JwtCustomizerUserContext {
                id: "123".to_string(),
                primary_email: Some("foo@example.com".to_string()),
                primary_phone: Some("+1234567890".to_string()),
                username: Some("foo".to_string()),
                name: Some("Foo Bar".to_string()),
                avatar: Some("https://example.com/avatar.png".to_string()),
                identities: BTreeMap::new(),
                custom_data: BTreeMap::new(),
            },
        }
    }
}

const DEFAULT_ACCESS_TOKEN_SCRIPT: &str = r#"/**
* This function is called to get custom claims for the JWT token.
*
* @param {AccessTokenPayload} token -The JWT token.
* @param {Data} data - Internal data that can be used to pass additional information
* @param {JwtCustomizerUserContext} data.user - The user info associated with the token.
* @param {EnvironmentVariables} [envVariables] - The environment variables.
*
* @returns The custom claims.
*/

exports.getCustomJwtClaims = async (token, data) => {
  return {};
}"#;

const DEFAULT_CLIENT_CREDENTIALS_SCRIPT: &str = r#"/**
* This function is called to get custom claims for the JWT token.
*
* @param {ClientCredentialsPayload} token -The JWT token.
* @param {EnvironmentVariables} [envVariables] - The environment variables.
*
* @returns The custom claims.
*/

exports.getCustomJwtClaims = async (token) => {
  return {};
}"#;

impl JwtCustomizerKind {
    /// Script the editor starts from.
    pub fn default_script(&self) -> &'static str {
        match self {
            JwtCustomizerKind::AccessToken => DEFAULT_ACCESS_TOKEN_SCRIPT,
            JwtCustomizerKind::ClientCredentials => DEFAULT_CLIENT_CREDENTIALS_SCRIPT,
        }
    }

    /// Token sample the editor starts from.
    pub fn default_token_sample(&self) -> Result<Value, serde_json::Error> {
        match self {
            JwtCustomizerKind::AccessToken => serde_json::to_value(AccessTokenPayload::default()),
            JwtCustomizerKind::ClientCredentials => {
                serde_json::to_value(ClientCredentialsPayload::default())
            }
        }
    }

    /// Context sample the editor starts from; client credentials have none.
    pub fn default_context_sample(&self) -> Result<Option<Value>, serde_json::Error> {
        match self {
            JwtCustomizerKind::AccessToken => {
                serde_json::to_value(UserTokenContext::default()).map(Some)
            }
            JwtCustomizerKind::ClientCredentials => Ok(None),
        }
    }
}

impl JwtCustomizer {
    /// A fresh customizer pre-filled with the editor defaults for `kind`.
    pub fn template(kind: JwtCustomizerKind) -> Result<Self, serde_json::Error> {
        Ok(Self {
            script: Some(kind.default_script().to_string()),
            env_vars: None,
            context_sample: kind.default_context_sample()?,
            token_sample: Some(kind.default_token_sample()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt_customizer::{ValidationMode, validate};
    use serde_json::json;

    #[test]
    fn access_token_sample_matches_wire_shape() {
        let sample = JwtCustomizerKind::AccessToken.default_token_sample().unwrap();
        assert_eq!(
            sample,
            json!({
                "jti": "f1d3d2d1-1f2d-3d4e-5d6f-7d8a9d0e1d2",
                "iat": 1_516_235_022,
                "exp": 1_516_238_622,
                "client_id": "my_app",
                "scope": "read write",
                "aud": "http://localhost:3000/api/test",
                "grantId": "grant_123",
                "accountId": "uid_123",
                "kind": "AccessToken",
            })
        );
    }

    #[test]
    fn client_credentials_sample_has_no_grant() {
        let sample = JwtCustomizerKind::ClientCredentials.default_token_sample().unwrap();
        assert_eq!(sample["kind"], "ClientCredentials");
        assert!(sample.get("grantId").is_none());
        let context = JwtCustomizerKind::ClientCredentials.default_context_sample();
        assert!(context.unwrap().is_none());
    }

    #[test]
    fn user_context_sample_parses_back() {
        let value = JwtCustomizerKind::AccessToken.default_context_sample().unwrap().unwrap();
        assert_eq!(value["user"]["primaryEmail"], "foo@example.com");
        let context: UserTokenContext = serde_json::from_value(value).unwrap();
        assert_eq!(context, UserTokenContext::default());
    }

    #[test]
    fn scripts_differ_by_signature() {
        assert!(
            JwtCustomizerKind::AccessToken
                .default_script()
                .contains("async (token, data) =>")
        );
        assert!(
            JwtCustomizerKind::ClientCredentials
                .default_script()
                .contains("async (token) =>")
        );
    }

    #[test]
    fn templates_pass_validation() {
        for kind in [JwtCustomizerKind::AccessToken, JwtCustomizerKind::ClientCredentials] {
            let template = JwtCustomizer::template(kind).unwrap();
            let raw = serde_json::to_value(&template).unwrap();
            let validated = validate(&raw, kind, ValidationMode::Full).unwrap();
            assert_eq!(validated.customizer, template);
            assert_eq!(validated.to_value().unwrap(), raw);
        }
    }
}
