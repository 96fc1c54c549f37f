//! `warden-auth` — credential hashing and the JWT claims customization contract.
//!
//! Decoupled from HTTP and from any concrete storage; persistence goes through
//! the [`JwtCustomizerStore`] collaborator.

pub mod customizer_store;
pub mod jwt_customizer;
pub mod password;
pub mod token_sample;

pub use customizer_store::{
    CustomizerStoreError, InMemoryJwtCustomizerStore, JwtCustomizerStore, patch, save,
};
pub use jwt_customizer::{
    CUSTOMIZER_FIELDS, JwtCustomizer, JwtCustomizerKind, SchemaRejection, ValidatedPayload,
    ValidationMode, validate,
};
pub use password::{
    PasswordError, UsersPasswordAlgorithm, encrypt_password, encrypt_password_with_salt,
};
pub use token_sample::{
    AccessTokenPayload, ClientCredentialsPayload, JwtCustomizerUserContext, StandardTokenPayload,
    TokenKindTag, UserTokenContext,
};
