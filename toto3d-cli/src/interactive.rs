use anyhow::Result;
use toto3d_db::db::{count_draws, insert_draws};
use toto3d_db::models::{Draw, Market};
use toto3d_db::rusqlite::Connection;

use crate::config::AppConfig;
use crate::display::display_markets;
use crate::{market_counts, prompt};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Input(Market),
    Predict,
    Bbfs,
    Backtest,
    Clear,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    if let Some(market) = Market::from_menu_key(input) {
        return Some(InteractiveCommand::Input(market));
    }
    match input.trim().to_lowercase().as_str() {
        "5" | "prediksi" | "predict" | "3d" => Some(InteractiveCommand::Predict),
        "6" | "bbfs" => Some(InteractiveCommand::Bbfs),
        "7" | "backtest" | "bt" => Some(InteractiveCommand::Backtest),
        "8" | "hapus" | "clear" => Some(InteractiveCommand::Clear),
        "9" | "keluar" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu(conn: &Connection) -> Result<()> {
    println!();
    println!("── 3D Intelligence ──");
    println!("\nPilih Pasaran (input data):");
    display_markets(&market_counts(conn)?);
    println!("\nAksi:");
    println!("  5. prediksi  Prediksi 10 Angka 3D Kuat");
    println!("  6. bbfs      Prediksi BBFS 3D (6 digit)");
    println!("  7. backtest  Backtest 3D");
    println!("  8. hapus     Hapus Data Pasaran");
    println!("  9. keluar    Keluar");
    println!();
    Ok(())
}

fn pick_market(conn: &Connection, title: &str) -> Result<Option<Market>> {
    println!("\n{}", title);
    display_markets(&market_counts(conn)?);
    let pick = prompt("Pilih: ")?;
    let market = Market::from_menu_key(&pick);
    if market.is_none() {
        println!("Pilihan salah!");
    }
    Ok(market)
}

fn input_draws(conn: &Connection, market: Market) -> Result<()> {
    let existing = count_draws(conn, market)? as usize;
    println!("\n📁 {} | {} data", market, existing);
    println!("Masukkan 4D (kosongkan untuk kembali):");

    let mut pending: Vec<Draw> = Vec::new();
    loop {
        let input = prompt(&format!("Hasil {}: ", existing + pending.len() + 1))?;
        if input.is_empty() {
            break;
        }
        match Draw::parse(&input) {
            Ok(draw) => {
                pending.push(draw);
                println!("✓");
            }
            Err(_) => println!("✗ 4 digit!"),
        }
    }

    if !pending.is_empty() {
        insert_draws(conn, market, &pending)?;
        println!("💾 Disimpan: {} (+{})", market, pending.len());
    }
    Ok(())
}

fn with_enough_data(conn: &Connection, market: Market, min: usize) -> Result<bool> {
    let n = count_draws(conn, market)? as usize;
    if n < min {
        println!("\n⚠️ Butuh {}+ data {}!", min, market);
        return Ok(false);
    }
    Ok(true)
}

fn run_action(conn: &Connection, config: &AppConfig, command: InteractiveCommand) -> Result<()> {
    match command {
        InteractiveCommand::Input(market) => input_draws(conn, market),
        InteractiveCommand::Predict => {
            let Some(market) = pick_market(conn, "Pilih pasaran untuk prediksi 3D:")? else {
                return Ok(());
            };
            if with_enough_data(conn, market, toto3d_engine::ranker::MIN_HISTORY)? {
                super::cmd_predict(conn, market, false)?;
            }
            Ok(())
        }
        InteractiveCommand::Bbfs => {
            let Some(market) = pick_market(conn, "Pilih pasaran untuk BBFS 3D:")? else {
                return Ok(());
            };
            if with_enough_data(conn, market, toto3d_engine::bbfs::MIN_HISTORY)? {
                super::cmd_bbfs(conn, market, false)?;
            }
            Ok(())
        }
        InteractiveCommand::Backtest => {
            let Some(market) = pick_market(conn, "Pilih pasaran untuk backtest 3D:")? else {
                return Ok(());
            };
            super::cmd_backtest(conn, market, config.show_backtest_steps)
        }
        InteractiveCommand::Clear => {
            let Some(market) = pick_market(conn, "Pilih pasaran untuk hapus:")? else {
                return Ok(());
            };
            super::cmd_clear(conn, market, false)
        }
        InteractiveCommand::Quit => Ok(()),
    }
}

pub fn run_interactive(conn: &Connection, config: &AppConfig) -> Result<()> {
    loop {
        display_menu(conn)?;
        let input = match prompt("Pilih: ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("\nSemoga 3D Anda selalu tembus! 🍀");
                break;
            }
            Some(command) => {
                if let Err(e) = run_action(conn, config, command) {
                    println!("Error: {e:#}");
                }
            }
            None => {
                println!("Pilih 1-9! ('{}' tidak dikenal)", input);
            }
        }
    }

    Ok(())
}
