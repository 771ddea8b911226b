// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential record CRUD. Each function is a single SQL statement.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use orchestra_core::{
    CredentialId, CredentialRecord, CredentialUpdate, NewCredentialRecord, OrchestraError,
    ProviderKind, TenantId,
};
use rusqlite::types::Type;
use rusqlite::{params, ErrorCode, Row};

use crate::database::{map_tr_err, Database};

const COLUMNS: &str =
    "id, tenant_id, provider, ciphertext, nonce, auth_tag, label, last_used_at, created_at";

/// Insert a record. Returns `CredentialConflict` if the pair already exists.
pub async fn create_credential(
    db: &Database,
    record: NewCredentialRecord,
) -> Result<CredentialRecord, OrchestraError> {
    let now = Utc::now().trunc_subsecs(6);
    let created = CredentialRecord {
        id: CredentialId::generate(),
        tenant_id: record.tenant_id,
        provider: record.provider,
        ciphertext: record.ciphertext,
        nonce: record.nonce,
        auth_tag: record.auth_tag,
        label: record.label,
        last_used_at: None,
        created_at: now,
    };

    let row = created.clone();
    let inserted = db
        .connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let result = conn.execute(
                "INSERT INTO credentials
                 (id, tenant_id, provider, ciphertext, nonce, auth_tag, label, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    row.id.as_str(),
                    row.tenant_id.as_str(),
                    row.provider.as_str(),
                    row.ciphertext,
                    row.nonce,
                    row.auth_tag,
                    row.label,
                    timestamp(row.created_at),
                ],
            );
            match result {
                Ok(_) => Ok(true),
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Ok(false)
                }
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    if inserted {
        Ok(created)
    } else {
        Err(OrchestraError::CredentialConflict {
            tenant_id: created.tenant_id.0,
            provider: created.provider.to_string(),
        })
    }
}

pub async fn get_credential_by_tenant_and_provider(
    db: &Database,
    tenant_id: &TenantId,
    provider: ProviderKind,
) -> Result<Option<CredentialRecord>, OrchestraError> {
    let tenant_id = tenant_id.0.clone();
    db.connection()
        .call(move |conn| -> Result<Option<CredentialRecord>, rusqlite::Error> {
            let sql = format!(
                "SELECT {COLUMNS} FROM credentials WHERE tenant_id = ?1 AND provider = ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            match stmt.query_row(params![tenant_id, provider.as_str()], record_from_row) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_credential(
    db: &Database,
    id: &CredentialId,
) -> Result<Option<CredentialRecord>, OrchestraError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| -> Result<Option<CredentialRecord>, rusqlite::Error> {
            let sql = format!("SELECT {COLUMNS} FROM credentials WHERE id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            match stmt.query_row(params![id], record_from_row) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Replace sealed material and label, returning the updated row.
pub async fn update_credential(
    db: &Database,
    id: &CredentialId,
    update: CredentialUpdate,
) -> Result<Option<CredentialRecord>, OrchestraError> {
    let id = id.0.clone();
    let now = timestamp(Utc::now());
    db.connection()
        .call(move |conn| -> Result<Option<CredentialRecord>, rusqlite::Error> {
            let sql = format!(
                "UPDATE credentials
                 SET ciphertext = ?2, nonce = ?3, auth_tag = ?4, label = ?5, updated_at = ?6
                 WHERE id = ?1
                 RETURNING {COLUMNS}"
            );
            let mut stmt = conn.prepare(&sql)?;
            let result = stmt.query_row(
                params![
                    id,
                    update.ciphertext,
                    update.nonce,
                    update.auth_tag,
                    update.label,
                    now,
                ],
                record_from_row,
            );
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_credential(db: &Database, id: &CredentialId) -> Result<bool, OrchestraError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let deleted = conn.execute("DELETE FROM credentials WHERE id = ?1", params![id])?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn touch_last_used(db: &Database, id: &CredentialId) -> Result<(), OrchestraError> {
    let id = id.0.clone();
    let now = timestamp(Utc::now());
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "UPDATE credentials SET last_used_at = ?2 WHERE id = ?1",
                params![id, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All records of one tenant, oldest first.
pub async fn list_credentials_by_tenant(
    db: &Database,
    tenant_id: &TenantId,
) -> Result<Vec<CredentialRecord>, OrchestraError> {
    let tenant_id = tenant_id.0.clone();
    db.connection()
        .call(move |conn| -> Result<Vec<CredentialRecord>, rusqlite::Error> {
            let sql = format!(
                "SELECT {COLUMNS} FROM credentials WHERE tenant_id = ?1
                 ORDER BY created_at ASC, provider ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![tenant_id], record_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<CredentialRecord> {
    let provider: String = row.get(2)?;
    let provider = ProviderKind::from_str(&provider)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    let last_used_at: Option<String> = row.get(7)?;
    let last_used_at = last_used_at
        .map(|ts| parse_timestamp(7, &ts))
        .transpose()?;
    let created_at: String = row.get(8)?;

    Ok(CredentialRecord {
        id: CredentialId(row.get(0)?),
        tenant_id: TenantId(row.get(1)?),
        provider,
        ciphertext: row.get(3)?,
        nonce: row.get(4)?,
        auth_tag: row.get(5)?,
        label: row.get(6)?,
        last_used_at,
        created_at: parse_timestamp(8, &created_at)?,
    })
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Fixed-width UTC timestamps so textual ordering matches time ordering.
fn timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
