//! Entry reads and writes within a generation.
//!
//! Writes are per-key upserts. The owning generation row is created on
//! demand, so a put never fails just because nobody opened the cache first.

use super::connection::CacheDb;
use super::hash::request_key;
use crate::{Error, Request, Response};
use tokio_rusqlite::{params, rusqlite};

struct EntryRow {
    key_hash: String,
    method: String,
    url: String,
    status: u16,
    content_type: Option<String>,
    headers_json: String,
    body: Vec<u8>,
}

impl EntryRow {
    fn encode(request: &Request, response: &Response) -> Result<Self, Error> {
        let headers_json =
            serde_json::to_string(&response.headers).map_err(|e| Error::CorruptEntry(e.to_string()))?;
        Ok(Self {
            key_hash: request_key(request),
            method: request.method.as_str().to_string(),
            url: request.url.clone(),
            status: response.status,
            content_type: response.content_type.clone(),
            headers_json,
            body: response.body.to_vec(),
        })
    }
}

fn upsert(conn: &rusqlite::Connection, generation: &str, row: &EntryRow, stored_at: &str) -> Result<(), Error> {
    conn.execute(
        "INSERT INTO entries (
            generation, key_hash, method, url, status, content_type, headers_json, body, stored_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(generation, key_hash) DO UPDATE SET
            method = excluded.method,
            url = excluded.url,
            status = excluded.status,
            content_type = excluded.content_type,
            headers_json = excluded.headers_json,
            body = excluded.body,
            stored_at = excluded.stored_at",
        params![
            generation,
            &row.key_hash,
            &row.method,
            &row.url,
            row.status,
            &row.content_type,
            &row.headers_json,
            &row.body,
            stored_at,
        ],
    )?;
    Ok(())
}

fn ensure_generation(conn: &rusqlite::Connection, generation: &str, now: &str) -> Result<(), Error> {
    conn.execute(
        "INSERT OR IGNORE INTO generations (name, created_at) VALUES (?1, ?2)",
        params![generation, now],
    )?;
    Ok(())
}

/// Decode the first row of an entry query, if any.
fn first_match<P>(conn: &rusqlite::Connection, sql: &str, args: P) -> Result<Option<Response>, Error>
where
    P: rusqlite::Params,
{
    let mut stmt = conn.prepare(sql)?;
    let result = stmt.query_row(args, |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, u16>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Vec<u8>>(4)?,
        ))
    });

    let (url, status, content_type, headers_json, body) = match result {
        Ok(row) => row,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let headers = match headers_json {
        Some(json) => serde_json::from_str(&json).map_err(|e| Error::CorruptEntry(format!("{url}: {e}")))?,
        None => Vec::new(),
    };

    Ok(Some(Response { url, status, headers, content_type, body: body.into() }))
}

impl CacheDb {
    /// Exact lookup of a request in one generation.
    ///
    /// Returns None if either the generation or the entry is absent.
    pub async fn match_entry(&self, generation: &str, request: &Request) -> Result<Option<Response>, Error> {
        let generation = generation.to_string();
        let key_hash = request_key(request);
        self.conn
            .call(move |conn| -> Result<Option<Response>, Error> {
                first_match(
                    conn,
                    "SELECT url, status, content_type, headers_json, body
                     FROM entries WHERE generation = ?1 AND key_hash = ?2",
                    params![generation, key_hash],
                )
            })
            .await
            .map_err(Error::from)
    }

    /// Lookup of a request across every generation.
    ///
    /// `preferred` wins when it holds the key; otherwise the oldest
    /// generation holding it does.
    pub async fn match_any_entry(&self, preferred: &str, request: &Request) -> Result<Option<Response>, Error> {
        let preferred = preferred.to_string();
        let key_hash = request_key(request);
        self.conn
            .call(move |conn| -> Result<Option<Response>, Error> {
                first_match(
                    conn,
                    "SELECT e.url, e.status, e.content_type, e.headers_json, e.body
                     FROM entries e JOIN generations g ON g.name = e.generation
                     WHERE e.key_hash = ?2
                     ORDER BY (e.generation = ?1) DESC, g.created_at ASC, g.rowid ASC
                     LIMIT 1",
                    params![preferred, key_hash],
                )
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace a single entry.
    pub async fn put_entry(&self, generation: &str, request: &Request, response: &Response) -> Result<(), Error> {
        let generation = generation.to_string();
        let row = EntryRow::encode(request, response)?;
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let now = chrono::Utc::now().to_rfc3339();
                ensure_generation(conn, &generation, &now)?;
                upsert(conn, &generation, &row, &now)
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace many entries in one transaction: all land or none do.
    pub async fn put_entries(&self, generation: &str, entries: &[(Request, Response)]) -> Result<(), Error> {
        let generation = generation.to_string();
        let rows = entries
            .iter()
            .map(|(req, resp)| EntryRow::encode(req, resp))
            .collect::<Result<Vec<_>, _>>()?;
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let now = chrono::Utc::now().to_rfc3339();
                let tx = conn.transaction()?;
                ensure_generation(&tx, &generation, &now)?;
                for row in &rows {
                    upsert(&tx, &generation, row, &now)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// URLs cached in a generation, sorted.
    pub async fn entry_urls(&self, generation: &str) -> Result<Vec<String>, Error> {
        let generation = generation.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT url FROM entries WHERE generation = ?1 ORDER BY url ASC")?;
                let urls = stmt
                    .query_map(params![generation], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(urls)
            })
            .await
            .map_err(Error::from)
    }
}
