use anyhow::{Context, Result};
use toto3d_db::rusqlite::Connection;
use std::path::Path;

use toto3d_db::db::{fetch_history, insert_draws};
use toto3d_db::models::{Draw, Market};

pub struct ImportResult {
    pub total_lines: u32,
    pub inserted: u32,
    pub rejected: u32,
}

/// Satu hasil per baris. Baris kosong dilewati; baris yang bukan 4 digit
/// dikembalikan bersama nomor barisnya.
pub fn parse_history(text: &str) -> (Vec<Draw>, Vec<(usize, String)>) {
    let mut draws = Vec::new();
    let mut rejected = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match Draw::parse(line) {
            Ok(draw) => draws.push(draw),
            Err(_) => rejected.push((i + 1, line.to_string())),
        }
    }
    (draws, rejected)
}

pub fn import_text(conn: &Connection, market: Market, path: &Path) -> Result<ImportResult> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Tidak bisa membuka {:?}", path))?;

    let (draws, rejected) = parse_history(&text);
    for (line_no, line) in &rejected {
        tracing::warn!(line = line_no, content = %line, "baris ditolak, bukan 4 digit");
    }

    let inserted = insert_draws(conn, market, &draws)?;

    Ok(ImportResult {
        total_lines: text.lines().count() as u32,
        inserted: inserted as u32,
        rejected: rejected.len() as u32,
    })
}

pub fn export_text(conn: &Connection, market: Market, path: &Path) -> Result<usize> {
    let history = fetch_history(conn, market)?;
    let text = history
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Tidak bisa membuat direktori {:?}", parent))?;
        }
    }
    std::fs::write(path, text)
        .with_context(|| format!("Tidak bisa menulis {:?}", path))?;
    Ok(history.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use toto3d_db::db::{count_draws, migrate};

    fn temp_file(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("toto3d-{}-{}.txt", name, std::process::id()))
    }

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_parse_history() {
        let (draws, rejected) = parse_history("1234\n\n  5678 \n12a4\n123\n0001\n");
        let rendered: Vec<String> = draws.iter().map(|d| d.to_string()).collect();
        assert_eq!(rendered, vec!["1234", "5678", "0001"]);
        assert_eq!(rejected, vec![(4, "12a4".to_string()), (5, "123".to_string())]);
    }

    #[test]
    fn test_import_appends_valid_lines() {
        let conn = setup();
        let path = temp_file("import");
        std::fs::write(&path, "1234\nxxxx\n5678\n").unwrap();

        let result = import_text(&conn, Market::SydneyPools, &path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(result.total_lines, 3);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.rejected, 1);
        assert_eq!(count_draws(&conn, Market::SydneyPools).unwrap(), 2);
    }

    #[test]
    fn test_import_counts_blank_lines_as_read() {
        let conn = setup();
        let path = temp_file("blank");
        std::fs::write(&path, "1234\n\n   \n5678\nabc\n").unwrap();

        let result = import_text(&conn, Market::HongkongPools, &path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(result.total_lines, 5);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.rejected, 1);
    }

    #[test]
    fn test_import_missing_file() {
        let conn = setup();
        assert!(import_text(&conn, Market::SydneyPools, &temp_file("tidak-ada")).is_err());
    }

    #[test]
    fn test_export_then_import_keeps_order() {
        let conn = setup();
        let draws: Vec<Draw> = ["0420", "9999", "0420", "1000"]
            .iter()
            .map(|s| Draw::parse(s).unwrap())
            .collect();
        insert_draws(&conn, Market::HongkongLotto, &draws).unwrap();

        let path = temp_file("export");
        assert_eq!(export_text(&conn, Market::HongkongLotto, &path).unwrap(), 4);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0420\n9999\n0420\n1000");

        import_text(&conn, Market::SydneyLotto, &path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(fetch_history(&conn, Market::SydneyLotto).unwrap(), draws);
    }
}
