// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable store trait for encrypted credential records.

use async_trait::async_trait;

use crate::error::OrchestraError;
use crate::types::{
    CredentialId, CredentialRecord, CredentialUpdate, NewCredentialRecord, ProviderKind, TenantId,
};

/// Persistence collaborator consumed by the credential vault.
///
/// Implementations hold no business rules beyond uniqueness of the
/// (tenant, provider) pair, which they report as
/// [`OrchestraError::CredentialConflict`]. Each operation must be atomic
/// with respect to a single record.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a new record, assigning its id and creation time.
    async fn create_record(
        &self,
        record: NewCredentialRecord,
    ) -> Result<CredentialRecord, OrchestraError>;

    async fn get_record_by_tenant_and_provider(
        &self,
        tenant_id: &TenantId,
        provider: ProviderKind,
    ) -> Result<Option<CredentialRecord>, OrchestraError>;

    /// Replaces sealed material and label. Returns `None` if the record is gone.
    async fn update_record(
        &self,
        id: &CredentialId,
        update: CredentialUpdate,
    ) -> Result<Option<CredentialRecord>, OrchestraError>;

    async fn get_record_by_id(
        &self,
        id: &CredentialId,
    ) -> Result<Option<CredentialRecord>, OrchestraError>;

    /// Returns whether a record was removed.
    async fn delete_record(&self, id: &CredentialId) -> Result<bool, OrchestraError>;

    /// Sets the last-used timestamp to now.
    async fn touch_last_used(&self, id: &CredentialId) -> Result<(), OrchestraError>;

    async fn list_records_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<CredentialRecord>, OrchestraError>;
}
