mod config;
mod display;
mod import;
mod interactive;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, save_config, AppConfig, DEFAULT_CONFIG};
use crate::display::{
    display_backtest, display_bbfs, display_draws, display_features, display_import_summary,
    display_markets, display_prediction_3d,
};
use toto3d_db::db::{
    clear_market, count_draws, fetch_history, fetch_last_draws, insert_draws, migrate, open_db,
};
use toto3d_db::models::{Draw, Market};
use toto3d_db::rusqlite::Connection;
use toto3d_engine::{backtest, backtest_3d_with, extract_features, rank_3d, rank_bbfs};

#[derive(Parser)]
#[command(name = "toto3d", about = "3D Intelligence: prediksi 3D multi pasaran")]
struct Cli {
    /// File konfigurasi JSON
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Lokasi database (menimpa konfigurasi)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Daftar pasaran dan jumlah datanya
    Markets,

    /// Menambahkan hasil 4D ke riwayat pasaran
    Add {
        #[arg(short, long, value_enum)]
        market: Option<Market>,

        /// Hasil 4D, urut dari yang paling lama
        #[arg(required = true)]
        draws: Vec<String>,
    },

    /// Mengimpor riwayat dari file teks (satu hasil per baris)
    Import {
        #[arg(short, long, value_enum)]
        market: Option<Market>,

        #[arg(short, long)]
        file: PathBuf,
    },

    /// Mengekspor riwayat ke file teks
    Export {
        #[arg(short, long, value_enum)]
        market: Option<Market>,

        #[arg(short, long)]
        file: PathBuf,
    },

    /// Menampilkan hasil terakhir
    List {
        #[arg(short, long, value_enum)]
        market: Option<Market>,

        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Menampilkan pola yang terdeteksi
    Features {
        #[arg(short, long, value_enum)]
        market: Option<Market>,

        #[arg(long)]
        json: bool,
    },

    /// Prediksi 10 angka 3D kuat
    Predict {
        #[arg(short, long, value_enum)]
        market: Option<Market>,

        #[arg(long)]
        json: bool,
    },

    /// Prediksi BBFS 3D (6 digit)
    Bbfs {
        #[arg(short, long, value_enum)]
        market: Option<Market>,

        #[arg(long)]
        json: bool,
    },

    /// Backtest 3D: apakah 3D berikutnya masuk prediksi?
    Backtest {
        #[arg(short, long, value_enum)]
        market: Option<Market>,

        /// Hanya tampilkan ringkasan
        #[arg(short, long)]
        quiet: bool,
    },

    /// Menghapus seluruh data pasaran
    Clear {
        #[arg(short, long, value_enum)]
        market: Option<Market>,

        /// Tanpa konfirmasi
        #[arg(short, long)]
        yes: bool,
    },

    /// Menampilkan konfigurasi aktif
    Config {
        /// Menulis konfigurasi ke file
        #[arg(long)]
        init: bool,
    },

    /// Menampilkan lokasi database
    DbPath,

    /// Menu interaktif
    Interactive,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let path = cli.db.clone().unwrap_or_else(|| config.database.clone());

    if let Command::Config { init } = cli.command {
        return cmd_config(&config, &cli.config, init);
    }

    let conn = open_db(&path)?;
    migrate(&conn)?;
    let default_market = config.default_market;

    match cli.command {
        Command::Markets => cmd_markets(&conn),
        Command::Add { market, draws } => cmd_add(&conn, market.unwrap_or(default_market), &draws),
        Command::Import { market, file } => cmd_import(&conn, market.unwrap_or(default_market), &file),
        Command::Export { market, file } => cmd_export(&conn, market.unwrap_or(default_market), &file),
        Command::List { market, last } => cmd_list(&conn, market.unwrap_or(default_market), last),
        Command::Features { market, json } => cmd_features(&conn, market.unwrap_or(default_market), json),
        Command::Predict { market, json } => cmd_predict(&conn, market.unwrap_or(default_market), json),
        Command::Bbfs { market, json } => cmd_bbfs(&conn, market.unwrap_or(default_market), json),
        Command::Backtest { market, quiet } => {
            cmd_backtest(&conn, market.unwrap_or(default_market), config.show_backtest_steps && !quiet)
        }
        Command::Clear { market, yes } => cmd_clear(&conn, market.unwrap_or(default_market), yes),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::Interactive => interactive::run_interactive(&conn, &config),
        Command::Config { .. } => Ok(()),
    }
}

pub(crate) fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let n = io::stdin()
        .read_line(&mut input)
        .context("Gagal membaca input")?;
    if n == 0 {
        anyhow::bail!("Input ditutup");
    }
    Ok(input.trim().to_string())
}

fn cmd_config(config: &AppConfig, path: &Path, init: bool) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    if init {
        save_config(config, path)?;
        println!("\nKonfigurasi disimpan di : {}", path.display());
    }
    Ok(())
}

pub(crate) fn market_counts(conn: &Connection) -> Result<Vec<(Market, u32)>> {
    Market::ALL
        .into_iter()
        .map(|m| Ok((m, count_draws(conn, m)?)))
        .collect()
}

fn cmd_markets(conn: &Connection) -> Result<()> {
    display_markets(&market_counts(conn)?);
    Ok(())
}

pub(crate) fn cmd_add(conn: &Connection, market: Market, inputs: &[String]) -> Result<()> {
    // Semua input divalidasi dulu: satu yang salah, tidak ada yang disimpan
    let draws = inputs
        .iter()
        .map(|s| Draw::parse(s.trim()))
        .collect::<Result<Vec<_>>>()?;
    let n = insert_draws(conn, market, &draws)?;
    println!("💾 {} hasil disimpan: {} ({} data)", n, market, count_draws(conn, market)?);
    Ok(())
}

fn cmd_import(conn: &Connection, market: Market, file: &Path) -> Result<()> {
    let result = import::import_text(conn, market, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_export(conn: &Connection, market: Market, file: &Path) -> Result<()> {
    let n = import::export_text(conn, market, file)?;
    println!("{} hasil {} diekspor ke {}", n, market, file.display());
    Ok(())
}

fn cmd_list(conn: &Connection, market: Market, last: u32) -> Result<()> {
    let draws = fetch_last_draws(conn, market, last)?;
    display_draws(market, &draws);
    Ok(())
}

fn cmd_features(conn: &Connection, market: Market, json: bool) -> Result<()> {
    let history = fetch_history(conn, market)?;
    let Some(features) = extract_features(&history) else {
        println!(
            "⚠️ Butuh minimal {} data {} (ada {}).",
            toto3d_engine::features::MIN_HISTORY,
            market,
            history.len()
        );
        return Ok(());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&features)?);
    } else {
        display_features(market, &features);
    }
    Ok(())
}

pub(crate) fn cmd_predict(conn: &Connection, market: Market, json: bool) -> Result<()> {
    let history = fetch_history(conn, market)?;
    let prediction = rank_3d(&history);
    if json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }
    if prediction.fallback {
        println!("⚠️ Butuh 10+ data {} (ada {}), daftar cadangan ditampilkan.", market, history.len());
    }
    display_prediction_3d(market, &prediction);
    Ok(())
}

pub(crate) fn cmd_bbfs(conn: &Connection, market: Market, json: bool) -> Result<()> {
    let history = fetch_history(conn, market)?;
    let prediction = rank_bbfs(&history);
    if json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }
    if prediction.fallback {
        println!("⚠️ Butuh 10+ data {} (ada {}), digit cadangan ditampilkan.", market, history.len());
    }
    display_bbfs(market, &prediction);
    Ok(())
}

pub(crate) fn cmd_backtest(conn: &Connection, market: Market, show_steps: bool) -> Result<()> {
    let history = fetch_history(conn, market)?;

    let pb = ProgressBar::new(history.len().saturating_sub(1) as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
        .progress_chars("=> "));
    pb.set_message(market.name());

    let report = backtest_3d_with(&history, |_| pb.inc(1));
    pb.finish_and_clear();

    let Some(report) = report else {
        println!("❌ Butuh minimal {} data!", backtest::MIN_HISTORY);
        return Ok(());
    };

    tracing::info!(
        market = market.code(),
        hits = report.hits,
        total = report.total,
        "backtest selesai"
    );
    display_backtest(&report, show_steps);
    Ok(())
}

pub(crate) fn cmd_clear(conn: &Connection, market: Market, yes: bool) -> Result<()> {
    if !yes {
        let answer = prompt(&format!("Hapus {}? (y/t): ", market))?;
        if answer.to_lowercase() != "y" {
            println!("Dibatalkan.");
            return Ok(());
        }
    }
    let deleted = clear_market(conn, market)?;
    println!("🗑️ {} dihapus ({} data)", market, deleted);
    Ok(())
}
