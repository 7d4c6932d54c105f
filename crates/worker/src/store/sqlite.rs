//! SQLite-backed cache store.
//!
//! All named caches share one database; rows are namespaced by the
//! `cache` column. Database work runs on tokio-rusqlite's background
//! thread, so store calls never block the runtime.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use seawall_core::Error;
use tokio_rusqlite::rusqlite;
use tokio_rusqlite::{Connection, params};

use super::{CacheStore, MatchOptions, migrations, path_part};
use crate::http::WorkerResponse;

/// Shared database handle behind every `SqliteCache`.
#[derive(Clone, Debug)]
pub struct StoreDb {
    conn: Connection,
}

impl StoreDb {
    /// Open (or create) the database at `path`, apply pragmas, and run
    /// pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Store(e.to_string()))?;
        Self::prepare(conn).await
    }

    /// Open an in-memory database with the same setup. For tests.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory().await.map_err(|e| Error::Store(e.to_string()))?;
        Self::prepare(conn).await
    }

    async fn prepare(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA temp_store=MEMORY;",
            )?;
            Ok(())
        })
        .await
        .map_err(|e| Error::Store(e.to_string()))?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }
}

/// One named cache over the shared database.
pub struct SqliteCache {
    db: StoreDb,
    name: String,
}

impl SqliteCache {
    pub fn new(db: StoreDb, name: &str) -> Self {
        Self { db, name: name.to_string() }
    }
}

#[async_trait]
impl CacheStore for SqliteCache {
    async fn lookup(&self, key: &str, options: MatchOptions) -> Result<Option<WorkerResponse>, Error> {
        let cache = self.name.clone();
        let key = key.to_string();

        let row = self
            .db
            .conn
            .call(move |conn| {
                let result = if options.ignore_search {
                    conn.query_row(
                        "SELECT status, headers_json, body FROM entries
                         WHERE cache = ?1 AND path = ?2
                         ORDER BY rowid LIMIT 1",
                        params![cache, path_part(&key)],
                        map_row,
                    )
                } else {
                    conn.query_row(
                        "SELECT status, headers_json, body FROM entries
                         WHERE cache = ?1 AND key = ?2",
                        params![cache, key],
                        map_row,
                    )
                };

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(|e| Error::Store(e.to_string()))?;

        row.map(|(status, headers_json, body)| decode_response(status, &headers_json, body)).transpose()
    }

    async fn put(&self, key: &str, response: WorkerResponse) -> Result<(), Error> {
        let cache = self.name.clone();
        let owned_key = key.to_string();
        let path = path_part(key).to_string();
        let status = response.status.as_u16();
        let headers_json = encode_headers(&response.headers)?;
        let body = response.body.to_vec();
        let stored_at = chrono::Utc::now().to_rfc3339();

        self.db
            .conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT OR REPLACE INTO entries (cache, key, path, status, headers_json, body, stored_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![cache, owned_key, path, status, headers_json, body, stored_at],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| Error::Store(e.to_string()))?;

        tracing::debug!("stored {} in {}", key, self.name);
        Ok(())
    }
}

type StoredRow = (u16, String, Vec<u8>);

fn map_row(row: &rusqlite::Row<'_>) -> Result<StoredRow, rusqlite::Error> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn decode_response(status: u16, headers_json: &str, body: Vec<u8>) -> Result<WorkerResponse, Error> {
    let status = StatusCode::from_u16(status).map_err(|e| Error::Store(format!("stored status invalid: {e}")))?;
    let headers = decode_headers(headers_json)?;
    Ok(WorkerResponse::new(status, headers, Bytes::from(body)))
}

/// Headers persist as a JSON array of name/value pairs, preserving
/// repeated names.
fn encode_headers(headers: &HeaderMap) -> Result<String, Error> {
    let pairs: Vec<(String, String)> = headers
        .iter()
        .map(|(name, value)| (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
        .collect();
    serde_json::to_string(&pairs).map_err(|e| Error::Store(e.to_string()))
}

fn decode_headers(json: &str) -> Result<HeaderMap, Error> {
    let pairs: Vec<(String, String)> =
        serde_json::from_str(json).map_err(|e| Error::Store(format!("stored headers invalid: {e}")))?;

    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::Store(format!("stored header name invalid: {e}")))?;
        let value =
            HeaderValue::from_str(&value).map_err(|e| Error::Store(format!("stored header value invalid: {e}")))?;
        headers.append(name, value);
    }
    Ok(headers)
}
