//! Tenant-scoped persistence of validated JWT customizers.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use thiserror::Error;

use warden_core::TenantId;

use crate::jwt_customizer::{
    JwtCustomizer, JwtCustomizerKind, SchemaRejection, ValidationMode, validate,
};

/// Customizer store error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustomizerStoreError {
    #[error(transparent)]
    Rejected(#[from] SchemaRejection),

    #[error("no {0} customizer configured")]
    NotFound(JwtCustomizerKind),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Configuration store for customizers, one entry per tenant and kind.
///
/// Implementations only ever receive payloads that passed [`validate`].
pub trait JwtCustomizerStore: Send + Sync {
    fn get(
        &self,
        tenant_id: TenantId,
        kind: JwtCustomizerKind,
    ) -> Result<Option<JwtCustomizer>, CustomizerStoreError>;

    /// Insert or replace the stored customizer.
    fn upsert(
        &self,
        tenant_id: TenantId,
        kind: JwtCustomizerKind,
        customizer: JwtCustomizer,
    ) -> Result<(), CustomizerStoreError>;

    fn delete(
        &self,
        tenant_id: TenantId,
        kind: JwtCustomizerKind,
    ) -> Result<(), CustomizerStoreError>;

    fn list(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<(JwtCustomizerKind, JwtCustomizer)>, CustomizerStoreError>;
}

impl<S> JwtCustomizerStore for Arc<S>
where
    S: JwtCustomizerStore + ?Sized,
{
    fn get(
        &self,
        tenant_id: TenantId,
        kind: JwtCustomizerKind,
    ) -> Result<Option<JwtCustomizer>, CustomizerStoreError> {
        (**self).get(tenant_id, kind)
    }

    fn upsert(
        &self,
        tenant_id: TenantId,
        kind: JwtCustomizerKind,
        customizer: JwtCustomizer,
    ) -> Result<(), CustomizerStoreError> {
        (**self).upsert(tenant_id, kind, customizer)
    }

    fn delete(
        &self,
        tenant_id: TenantId,
        kind: JwtCustomizerKind,
    ) -> Result<(), CustomizerStoreError> {
        (**self).delete(tenant_id, kind)
    }

    fn list(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<(JwtCustomizerKind, JwtCustomizer)>, CustomizerStoreError> {
        (**self).list(tenant_id)
    }
}

/// Validate `raw` as a complete customizer and replace the stored one.
pub fn save<S>(
    store: &S,
    tenant_id: TenantId,
    kind: JwtCustomizerKind,
    raw: &Value,
) -> Result<JwtCustomizer, CustomizerStoreError>
where
    S: JwtCustomizerStore + ?Sized,
{
    let customizer = validate(raw, kind, ValidationMode::Full)?.into_inner();
    store.upsert(tenant_id, kind, customizer.clone())?;

    tracing::info!(tenant_id = %tenant_id, key = kind.config_key(), "customizer saved");
    Ok(customizer)
}

/// Validate `raw` as a partial update and merge it over the stored customizer.
///
/// Fields absent from `raw` keep their stored value.
pub fn patch<S>(
    store: &S,
    tenant_id: TenantId,
    kind: JwtCustomizerKind,
    raw: &Value,
) -> Result<JwtCustomizer, CustomizerStoreError>
where
    S: JwtCustomizerStore + ?Sized,
{
    let update = validate(raw, kind, ValidationMode::Partial)?.into_inner();

    let mut customizer = store.get(tenant_id, kind)?.unwrap_or_default();
    customizer.merge(update);
    store.upsert(tenant_id, kind, customizer.clone())?;

    tracing::info!(tenant_id = %tenant_id, key = kind.config_key(), "customizer patched");
    Ok(customizer)
}

/// In-memory customizer store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryJwtCustomizerStore {
    inner: RwLock<HashMap<(TenantId, JwtCustomizerKind), JwtCustomizer>>,
}

impl InMemoryJwtCustomizerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E>(_: E) -> CustomizerStoreError {
    CustomizerStoreError::Storage("customizer store lock poisoned".to_string())
}

impl JwtCustomizerStore for InMemoryJwtCustomizerStore {
    fn get(
        &self,
        tenant_id: TenantId,
        kind: JwtCustomizerKind,
    ) -> Result<Option<JwtCustomizer>, CustomizerStoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(&(tenant_id, kind)).cloned())
    }

    fn upsert(
        &self,
        tenant_id: TenantId,
        kind: JwtCustomizerKind,
        customizer: JwtCustomizer,
    ) -> Result<(), CustomizerStoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert((tenant_id, kind), customizer);
        Ok(())
    }

    fn delete(
        &self,
        tenant_id: TenantId,
        kind: JwtCustomizerKind,
    ) -> Result<(), CustomizerStoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.remove(&(tenant_id, kind))
            .map(|_| ())
            .ok_or(CustomizerStoreError::NotFound(kind))
    }

    fn list(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<(JwtCustomizerKind, JwtCustomizer)>, CustomizerStoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        let mut entries: Vec<_> = map
            .iter()
            .filter(|((tid, _), _)| *tid == tenant_id)
            .map(|((_, kind), customizer)| (*kind, customizer.clone()))
            .collect();
        entries.sort_by_key(|(kind, _)| kind.config_key());
        Ok(entries)
    }
}
