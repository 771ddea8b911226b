// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fault-injecting credential store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use orchestra_core::{
    CredentialId, CredentialRecord, CredentialStore, CredentialUpdate, NewCredentialRecord,
    OrchestraError, ProviderKind, TenantId,
};

/// Wraps a real store and fails selected operations on demand.
pub struct FlakyStore {
    inner: Arc<dyn CredentialStore>,
    fail_touch: AtomicBool,
    fail_reads: AtomicBool,
    hide_next_lookup: AtomicBool,
    vanish_on_next_update: AtomicBool,
    touch_attempts: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: Arc<dyn CredentialStore>) -> Self {
        Self {
            inner,
            fail_touch: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            hide_next_lookup: AtomicBool::new(false),
            vanish_on_next_update: AtomicBool::new(false),
            touch_attempts: AtomicUsize::new(0),
        }
    }

    /// Make `touch_last_used` fail until switched off again.
    pub fn set_fail_touch(&self, fail: bool) {
        self.fail_touch.store(fail, Ordering::SeqCst);
    }

    /// Make every lookup fail, as if the database were unreachable.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Answer the next tenant/provider lookup with `None` even if a record
    /// exists, as if a concurrent writer created it just afterwards.
    pub fn hide_next_lookup(&self) {
        self.hide_next_lookup.store(true, Ordering::SeqCst);
    }

    /// Delete the target of the next `update_record` before applying it, as
    /// if a concurrent delete won the race. The update then reports `None`.
    pub fn vanish_on_next_update(&self) {
        self.vanish_on_next_update.store(true, Ordering::SeqCst);
    }

    /// Number of `touch_last_used` calls seen, failed or not.
    pub fn touch_attempts(&self) -> usize {
        self.touch_attempts.load(Ordering::SeqCst)
    }

    fn check_reads(&self) -> Result<(), OrchestraError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(OrchestraError::storage("injected read failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FlakyStore {
    async fn create_record(
        &self,
        record: NewCredentialRecord,
    ) -> Result<CredentialRecord, OrchestraError> {
        self.inner.create_record(record).await
    }

    async fn get_record_by_tenant_and_provider(
        &self,
        tenant_id: &TenantId,
        provider: ProviderKind,
    ) -> Result<Option<CredentialRecord>, OrchestraError> {
        self.check_reads()?;
        if self.hide_next_lookup.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner
            .get_record_by_tenant_and_provider(tenant_id, provider)
            .await
    }

    async fn update_record(
        &self,
        id: &CredentialId,
        update: CredentialUpdate,
    ) -> Result<Option<CredentialRecord>, OrchestraError> {
        if self.vanish_on_next_update.swap(false, Ordering::SeqCst) {
            self.inner.delete_record(id).await?;
        }
        self.inner.update_record(id, update).await
    }

    async fn get_record_by_id(
        &self,
        id: &CredentialId,
    ) -> Result<Option<CredentialRecord>, OrchestraError> {
        self.check_reads()?;
        self.inner.get_record_by_id(id).await
    }

    async fn delete_record(&self, id: &CredentialId) -> Result<bool, OrchestraError> {
        self.inner.delete_record(id).await
    }

    async fn touch_last_used(&self, id: &CredentialId) -> Result<(), OrchestraError> {
        self.touch_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_touch.load(Ordering::SeqCst) {
            return Err(OrchestraError::storage("injected touch failure"));
        }
        self.inner.touch_last_used(id).await
    }

    async fn list_records_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<CredentialRecord>, OrchestraError> {
        self.check_reads()?;
        self.inner.list_records_by_tenant(tenant_id).await
    }
}
