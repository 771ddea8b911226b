// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential lifecycle: store (upsert), fetch, list, delete.
//!
//! At most one record exists per (tenant, provider). Storing again rotates
//! the sealed secret in place and keeps the existing label unless a new one
//! is supplied. Decrypted secrets are returned to the caller and never kept.

use std::sync::Arc;

use orchestra_config::model::VaultConfig;
use orchestra_core::{
    CredentialId, CredentialRecord, CredentialStore, CredentialSummary, CredentialUpdate,
    NewCredentialRecord, OrchestraError, ProviderKind, TenantId,
};
use secrecy::SecretString;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::cipher::VaultCipher;
use crate::crypto::SealedSecret;
use crate::master;

/// Multi-tenant credential vault over a durable [`CredentialStore`].
///
/// Debug output intentionally omits the cipher for security.
pub struct CredentialVault {
    store: Arc<dyn CredentialStore>,
    cipher: Arc<VaultCipher>,
}

impl std::fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVault")
            .field("cipher", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl CredentialVault {
    pub fn new(store: Arc<dyn CredentialStore>, cipher: VaultCipher) -> Self {
        Self {
            store,
            cipher: Arc::new(cipher),
        }
    }

    /// Build a vault whose master secret comes from the configured
    /// environment variable. Fails immediately if it is missing.
    pub fn from_config(
        store: Arc<dyn CredentialStore>,
        config: &VaultConfig,
    ) -> Result<Self, OrchestraError> {
        let master_secret = master::master_secret_from_env(&config.master_secret_env)?;
        let cipher = VaultCipher::new(master_secret, config.kdf_salt.clone())?;
        Ok(Self::new(store, cipher))
    }

    /// Encrypt and upsert the tenant's credential for `provider`.
    ///
    /// An empty or blank `label` counts as not supplied.
    pub async fn store(
        &self,
        tenant_id: &TenantId,
        provider: ProviderKind,
        secret: &str,
        label: Option<&str>,
    ) -> Result<CredentialSummary, OrchestraError> {
        let label = label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);
        let sealed = self.seal(secret).await?;

        if let Some(existing) = self
            .store
            .get_record_by_tenant_and_provider(tenant_id, provider)
            .await?
        {
            return self.rotate(existing, sealed, label).await;
        }

        match self.create(tenant_id, provider, &sealed, label.clone()).await {
            Err(OrchestraError::CredentialConflict { .. }) => {
                // A concurrent store created the record first.
                let existing = self
                    .store
                    .get_record_by_tenant_and_provider(tenant_id, provider)
                    .await?
                    .ok_or_else(|| {
                        OrchestraError::Internal(format!(
                            "credential for {provider} conflicted on create but is missing"
                        ))
                    })?;
                self.rotate(existing, sealed, label).await
            }
            other => other,
        }
    }

    /// Decrypt the tenant's credential for `provider`, if one is configured.
    ///
    /// Updates the last-used timestamp on a best-effort basis.
    pub async fn fetch(
        &self,
        tenant_id: &TenantId,
        provider: ProviderKind,
    ) -> Result<Option<SecretString>, OrchestraError> {
        let Some(record) = self
            .store
            .get_record_by_tenant_and_provider(tenant_id, provider)
            .await?
        else {
            debug!(tenant_id = %tenant_id, provider = %provider, "no credential configured");
            return Ok(None);
        };

        let secret = self
            .open(&record)
            .await
            .inspect_err(|e| {
                warn!(credential_id = %record.id, provider = %provider, error = %e, "credential failed to decrypt");
            })?;

        if let Err(e) = self.store.touch_last_used(&record.id).await {
            warn!(credential_id = %record.id, error = %e, "failed to record credential use");
        }

        debug!(credential_id = %record.id, provider = %provider, "credential fetched");
        Ok(Some(secret))
    }

    pub async fn list(&self, tenant_id: &TenantId) -> Result<Vec<CredentialSummary>, OrchestraError> {
        let records = self.store.list_records_by_tenant(tenant_id).await?;
        Ok(records.iter().map(CredentialSummary::from).collect())
    }

    /// Providers the tenant has a credential for.
    pub async fn configured_providers(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<ProviderKind>, OrchestraError> {
        let records = self.store.list_records_by_tenant(tenant_id).await?;
        Ok(records.iter().map(|r| r.provider).collect())
    }

    /// Delete a credential the tenant owns.
    ///
    /// Returns `false` both when the id does not exist and when it belongs to
    /// another tenant; the record is left untouched in the latter case.
    pub async fn delete(
        &self,
        tenant_id: &TenantId,
        credential_id: &CredentialId,
    ) -> Result<bool, OrchestraError> {
        match self.store.get_record_by_id(credential_id).await? {
            Some(record) if record.tenant_id == *tenant_id => {
                let deleted = self.store.delete_record(credential_id).await?;
                if deleted {
                    info!(tenant_id = %tenant_id, credential_id = %credential_id, provider = %record.provider, "credential deleted");
                }
                Ok(deleted)
            }
            Some(_) => {
                warn!(tenant_id = %tenant_id, credential_id = %credential_id, "refused to delete credential owned by another tenant");
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Key derivation is CPU-bound, so sealing runs on the blocking pool.
    async fn seal(&self, secret: &str) -> Result<SealedSecret, OrchestraError> {
        let cipher = Arc::clone(&self.cipher);
        let plaintext = Zeroizing::new(secret.to_string());
        tokio::task::spawn_blocking(move || cipher.encrypt(&plaintext))
            .await
            .map_err(|e| OrchestraError::Internal(format!("cipher task failed: {e}")))?
    }

    async fn open(&self, record: &CredentialRecord) -> Result<SecretString, OrchestraError> {
        let cipher = Arc::clone(&self.cipher);
        let ciphertext = record.ciphertext.clone();
        let nonce = record.nonce.clone();
        let tag = record.auth_tag.clone();
        tokio::task::spawn_blocking(move || cipher.decrypt(&ciphertext, &nonce, &tag))
            .await
            .map_err(|e| OrchestraError::Internal(format!("cipher task failed: {e}")))?
    }

    async fn create(
        &self,
        tenant_id: &TenantId,
        provider: ProviderKind,
        sealed: &SealedSecret,
        label: Option<String>,
    ) -> Result<CredentialSummary, OrchestraError> {
        let record = self
            .store
            .create_record(NewCredentialRecord {
                tenant_id: tenant_id.clone(),
                provider,
                ciphertext: sealed.ciphertext.clone(),
                nonce: sealed.nonce.to_vec(),
                auth_tag: sealed.tag.to_vec(),
                label,
            })
            .await?;
        info!(tenant_id = %tenant_id, provider = %provider, credential_id = %record.id, "credential stored");
        Ok(CredentialSummary::from(&record))
    }

    async fn rotate(
        &self,
        existing: CredentialRecord,
        sealed: SealedSecret,
        label: Option<String>,
    ) -> Result<CredentialSummary, OrchestraError> {
        let update = CredentialUpdate {
            ciphertext: sealed.ciphertext.clone(),
            nonce: sealed.nonce.to_vec(),
            auth_tag: sealed.tag.to_vec(),
            label: label.clone().or(existing.label),
        };
        match self.store.update_record(&existing.id, update).await? {
            Some(record) => {
                info!(tenant_id = %record.tenant_id, provider = %record.provider, credential_id = %record.id, "credential rotated");
                Ok(CredentialSummary::from(&record))
            }
            // Deleted between read and update.
            None => {
                self.create(&existing.tenant_id, existing.provider, &sealed, label)
                    .await
            }
        }
    }
}
