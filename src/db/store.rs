//! Contract record store.
//!
//! The store is an explicitly constructed handle with caller-controlled
//! lifecycle: open it, pass it where it is needed, drop it to close. No
//! module-level connection, no lazy global state. The canonical record is
//! persisted whole as its documented JSON shape, with a few indexed columns
//! pulled out for querying.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DatabaseError;
use crate::models::CanonicalContract;

/// Migrations are append-only; version 0 means an empty database.
const MIGRATIONS: &[(i64, &str)] = &[(
    1,
    "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);
     CREATE TABLE IF NOT EXISTS contracts (
         id TEXT PRIMARY KEY,
         hotel_name TEXT NOT NULL,
         currency CHAR(3) NOT NULL,
         period_from TEXT,
         period_to TEXT,
         extraction_method TEXT,
         confidence REAL,
         payload TEXT NOT NULL,
         created_at TEXT NOT NULL DEFAULT (datetime('now'))
     );
     CREATE INDEX IF NOT EXISTS idx_contracts_hotel ON contracts(hotel_name);
     CREATE INDEX IF NOT EXISTS idx_contracts_period ON contracts(period_from, period_to);
     INSERT INTO schema_version (version) VALUES (1);",
)];

/// SQLite-backed store for canonical contract records.
pub struct ContractStore {
    conn: Connection,
}

impl ContractStore {
    /// Open (or create) the store at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path)?;
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Persist a canonical contract and return its new record id.
    pub fn create_record(&self, contract: &CanonicalContract) -> Result<Uuid, DatabaseError> {
        let id = Uuid::new_v4();
        let payload = serde_json::to_string(contract)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        self.conn.execute(
            "INSERT INTO contracts (id, hotel_name, currency, period_from, period_to, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id.to_string(),
                contract.meta.hotel_name,
                contract.meta.currency,
                contract.effective_period.from.map(|d| d.to_string()),
                contract.effective_period.to.map(|d| d.to_string()),
                payload,
            ],
        )?;

        tracing::info!(record_id = %id, hotel = %contract.meta.hotel_name, "Contract stored");
        Ok(id)
    }

    /// Fetch a contract by id. Returns `None` when the id is unknown.
    pub fn get_record(&self, id: &Uuid) -> Result<Option<CanonicalContract>, DatabaseError> {
        let result = self.conn.query_row(
            "SELECT payload FROM contracts WHERE id = ?1",
            params![id.to_string()],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(payload) => Ok(Some(
                serde_json::from_str(&payload)
                    .map_err(|e| DatabaseError::Serialization(e.to_string()))?,
            )),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List the most recently stored contracts, newest first.
    pub fn list_records(&self, limit: usize) -> Result<Vec<CanonicalContract>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM contracts ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| row.get::<_, String>(0))?;

        let mut contracts = Vec::new();
        for payload in rows {
            let payload = payload?;
            contracts.push(
                serde_json::from_str(&payload)
                    .map_err(|e| DatabaseError::Serialization(e.to_string()))?,
            );
        }
        Ok(contracts)
    }

    /// Replace a stored contract. User edits create a new revision of the
    /// record; extraction provenance inside the payload is not touched here.
    pub fn update_record(
        &self,
        id: &Uuid,
        contract: &CanonicalContract,
    ) -> Result<(), DatabaseError> {
        let payload = serde_json::to_string(contract)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        let updated = self.conn.execute(
            "UPDATE contracts SET hotel_name = ?2, currency = ?3, period_from = ?4,
             period_to = ?5, payload = ?6 WHERE id = ?1",
            params![
                id.to_string(),
                contract.meta.hotel_name,
                contract.meta.currency,
                contract.effective_period.from.map(|d| d.to_string()),
                contract.effective_period.to.map(|d| d.to_string()),
                payload,
            ],
        )?;

        if updated == 0 {
            return Err(DatabaseError::NotFound(*id));
        }
        Ok(())
    }

    pub fn delete_record(&self, id: &Uuid) -> Result<(), DatabaseError> {
        let deleted = self
            .conn
            .execute("DELETE FROM contracts WHERE id = ?1", params![id.to_string()])?;
        if deleted == 0 {
            return Err(DatabaseError::NotFound(*id));
        }
        Ok(())
    }

    /// Number of stored contracts (for stats surfaces).
    pub fn count(&self) -> Result<i64, DatabaseError> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM contracts", [], |row| row.get(0))?;
        Ok(n)
    }

    /// Contracts whose effective period covers the given date.
    pub fn records_effective_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<CanonicalContract>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM contracts
             WHERE period_from IS NOT NULL AND period_to IS NOT NULL
               AND period_from <= ?1 AND period_to >= ?1
             ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![date.to_string()], |row| row.get::<_, String>(0))?;

        let mut contracts = Vec::new();
        for payload in rows {
            let payload = payload?;
            contracts.push(
                serde_json::from_str(&payload)
                    .map_err(|e| DatabaseError::Serialization(e.to_string()))?,
            );
        }
        Ok(contracts)
    }
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current = current_version(conn);
    for (version, sql) in MIGRATIONS {
        if *version > current {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql)
                .map_err(|e| DatabaseError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
        }
    }
    Ok(())
}

fn current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}
