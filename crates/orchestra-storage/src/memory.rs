// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory credential store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use orchestra_core::{
    CredentialId, CredentialRecord, CredentialStore, CredentialUpdate, NewCredentialRecord,
    OrchestraError, ProviderKind, TenantId,
};

/// Non-persistent [`CredentialStore`] with the same uniqueness and ordering
/// rules as the SQLite store. Every operation holds the lock for its whole
/// duration, so per-record updates are atomic.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RwLock<HashMap<CredentialId, CredentialRecord>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create_record(
        &self,
        record: NewCredentialRecord,
    ) -> Result<CredentialRecord, OrchestraError> {
        let mut records = self.records.write().await;
        if records
            .values()
            .any(|r| r.tenant_id == record.tenant_id && r.provider == record.provider)
        {
            return Err(OrchestraError::CredentialConflict {
                tenant_id: record.tenant_id.0,
                provider: record.provider.to_string(),
            });
        }

        let created = CredentialRecord {
            id: CredentialId::generate(),
            tenant_id: record.tenant_id,
            provider: record.provider,
            ciphertext: record.ciphertext,
            nonce: record.nonce,
            auth_tag: record.auth_tag,
            label: record.label,
            last_used_at: None,
            created_at: Utc::now(),
        };
        records.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn get_record_by_tenant_and_provider(
        &self,
        tenant_id: &TenantId,
        provider: ProviderKind,
    ) -> Result<Option<CredentialRecord>, OrchestraError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.tenant_id == *tenant_id && r.provider == provider)
            .cloned())
    }

    async fn update_record(
        &self,
        id: &CredentialId,
        update: CredentialUpdate,
    ) -> Result<Option<CredentialRecord>, OrchestraError> {
        let mut records = self.records.write().await;
        Ok(records.get_mut(id).map(|record| {
            record.ciphertext = update.ciphertext;
            record.nonce = update.nonce;
            record.auth_tag = update.auth_tag;
            record.label = update.label;
            record.clone()
        }))
    }

    async fn get_record_by_id(
        &self,
        id: &CredentialId,
    ) -> Result<Option<CredentialRecord>, OrchestraError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn delete_record(&self, id: &CredentialId) -> Result<bool, OrchestraError> {
        Ok(self.records.write().await.remove(id).is_some())
    }

    async fn touch_last_used(&self, id: &CredentialId) -> Result<(), OrchestraError> {
        if let Some(record) = self.records.write().await.get_mut(id) {
            record.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn list_records_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<CredentialRecord>, OrchestraError> {
        let records = self.records.read().await;
        let mut owned: Vec<CredentialRecord> = records
            .values()
            .filter(|r| r.tenant_id == *tenant_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.provider.as_str().cmp(b.provider.as_str()))
        });
        Ok(owned)
    }
}
