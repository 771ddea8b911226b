// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `CredentialStore` trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use orchestra_config::model::StorageConfig;
use orchestra_core::{
    CredentialId, CredentialRecord, CredentialStore, CredentialUpdate, NewCredentialRecord,
    OrchestraError, ProviderKind, TenantId,
};

use crate::database::Database;
use crate::queries::credentials;

/// SQLite-backed credential store.
///
/// The database is opened lazily by [`SqliteCredentialStore::initialize`];
/// [`SqliteCredentialStore::open`] does both steps.
pub struct SqliteCredentialStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteCredentialStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Create and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, OrchestraError> {
        let store = Self::new(config);
        store.initialize().await?;
        Ok(store)
    }

    /// Wrap an already opened database (e.g. in-memory for tests).
    pub fn from_database(config: StorageConfig, db: Database) -> Self {
        Self {
            config,
            db: OnceCell::from(db),
        }
    }

    /// Open the database file and run migrations.
    pub async fn initialize(&self) -> Result<(), OrchestraError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| OrchestraError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite credential store initialized");
        Ok(())
    }

    /// Flush the WAL before shutdown.
    pub async fn close(&self) -> Result<(), OrchestraError> {
        self.db()?.checkpoint().await
    }

    fn db(&self) -> Result<&Database, OrchestraError> {
        self.db
            .get()
            .ok_or_else(|| OrchestraError::storage("storage not initialized -- call initialize() first"))
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn create_record(
        &self,
        record: NewCredentialRecord,
    ) -> Result<CredentialRecord, OrchestraError> {
        credentials::create_credential(self.db()?, record).await
    }

    async fn get_record_by_tenant_and_provider(
        &self,
        tenant_id: &TenantId,
        provider: ProviderKind,
    ) -> Result<Option<CredentialRecord>, OrchestraError> {
        credentials::get_credential_by_tenant_and_provider(self.db()?, tenant_id, provider).await
    }

    async fn update_record(
        &self,
        id: &CredentialId,
        update: CredentialUpdate,
    ) -> Result<Option<CredentialRecord>, OrchestraError> {
        credentials::update_credential(self.db()?, id, update).await
    }

    async fn get_record_by_id(
        &self,
        id: &CredentialId,
    ) -> Result<Option<CredentialRecord>, OrchestraError> {
        credentials::get_credential(self.db()?, id).await
    }

    async fn delete_record(&self, id: &CredentialId) -> Result<bool, OrchestraError> {
        credentials::delete_credential(self.db()?, id).await
    }

    async fn touch_last_used(&self, id: &CredentialId) -> Result<(), OrchestraError> {
        credentials::touch_last_used(self.db()?, id).await
    }

    async fn list_records_by_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<CredentialRecord>, OrchestraError> {
        credentials::list_credentials_by_tenant(self.db()?, tenant_id).await
    }
}
