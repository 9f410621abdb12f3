use anyhow::{Context, Result};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{Draw, Market, StoredDraw};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    market       TEXT NOT NULL,
    result       TEXT NOT NULL,
    recorded_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_draws_market ON draws (market, id);
";

impl ToSql for Draw {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Draw {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Draw::parse(text).map_err(|e| FromSqlError::Other(e.into()))
    }
}

impl ToSql for Market {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for Market {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Market::from_code(text)
            .ok_or_else(|| FromSqlError::Other(format!("Pasaran tidak dikenal: '{}'", text).into()))
    }
}

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("toto3d.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Tidak bisa membuat direktori {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Tidak bisa membuka database {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Migrasi gagal")?;
    Ok(())
}

fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Menambahkan satu hasil di akhir riwayat pasaran. Mengembalikan id baris.
pub fn insert_draw(conn: &Connection, market: Market, draw: &Draw) -> Result<i64> {
    conn.execute(
        "INSERT INTO draws (market, result, recorded_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![market, draw, now()],
    ).context("Gagal menyimpan hasil")?;
    let id = conn.last_insert_rowid();
    tracing::debug!(market = market.code(), %draw, id, "hasil disimpan");
    Ok(id)
}

/// Menambahkan beberapa hasil dalam satu transaksi, urutan dipertahankan.
pub fn insert_draws(conn: &Connection, market: Market, draws: &[Draw]) -> Result<usize> {
    let tx = conn.unchecked_transaction()
        .context("Tidak bisa memulai transaksi")?;
    let recorded_at = now();
    {
        let mut stmt = tx.prepare(
            "INSERT INTO draws (market, result, recorded_at) VALUES (?1, ?2, ?3)"
        )?;
        for draw in draws {
            stmt.execute(rusqlite::params![market, draw, recorded_at])
                .with_context(|| format!("Gagal menyimpan hasil {}", draw))?;
        }
    }
    tx.commit().context("Commit gagal")?;
    tracing::debug!(market = market.code(), count = draws.len(), "hasil disimpan");
    Ok(draws.len())
}

/// Riwayat lengkap pasaran, urut kronologis (paling lama lebih dulu).
pub fn fetch_history(conn: &Connection, market: Market) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT result FROM draws WHERE market = ?1 ORDER BY id ASC"
    )?;
    let draws = stmt.query_map([market], |row| row.get::<_, Draw>(0))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Riwayat {} rusak", market.code()))?;
    Ok(draws)
}

/// `limit` hasil terakhir, yang terbaru lebih dulu.
pub fn fetch_last_draws(conn: &Connection, market: Market, limit: u32) -> Result<Vec<StoredDraw>> {
    let mut stmt = conn.prepare(
        "SELECT id, market, result, recorded_at
         FROM draws WHERE market = ?1 ORDER BY id DESC LIMIT ?2"
    )?;
    let draws = stmt.query_map(rusqlite::params![market, limit], |row| {
        Ok(StoredDraw {
            id: row.get(0)?,
            market: row.get(1)?,
            draw: row.get(2)?,
            recorded_at: row.get(3)?,
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection, market: Market) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM draws WHERE market = ?1",
        [market],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn clear_market(conn: &Connection, market: Market) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM draws WHERE market = ?1", [market])
        .with_context(|| format!("Gagal menghapus data {}", market.code()))?;
    tracing::debug!(market = market.code(), deleted, "data pasaran dihapus");
    Ok(deleted)
}
