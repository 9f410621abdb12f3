use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use toto3d_db::models::{Market, StoredDraw};
use toto3d_engine::{AccuracyGrade, BacktestReport, BbfsPrediction, FeatureBundle, Prediction3d};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn digits_str(digits: &[u8]) -> String {
    digits.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(" ")
}

pub fn grade_color(grade: AccuracyGrade) -> Color {
    match grade {
        AccuracyGrade::Good => Color::Green,
        AccuracyGrade::Fair => Color::Yellow,
        AccuracyGrade::Poor => Color::Red,
    }
}

pub fn display_markets(markets: &[(Market, u32)]) {
    let mut table = new_table();
    table.set_header(vec!["#", "Pasaran", "Kode", "Data"]);
    for (market, count) in markets {
        table.add_row(vec![
            market.menu_key().to_string(),
            market.name().to_string(),
            market.code().to_string(),
            count.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_draws(market: Market, draws: &[StoredDraw]) {
    if draws.is_empty() {
        println!("Belum ada data {}.", market);
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["#", "Hasil", "3D", "Dicatat"]);
    for stored in draws {
        table.add_row(vec![
            stored.id.to_string(),
            stored.draw.to_string(),
            stored.draw.tail().to_string(),
            stored.recorded_at.clone(),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import selesai :");
    println!("  Baris dibaca : {}", result.total_lines);
    println!("  Disimpan     : {}", result.inserted);
    if result.rejected > 0 {
        println!("  Ditolak      : {}", result.rejected);
    }
}

fn display_reasons(reasons: &[String]) {
    println!("\n💡 Alasan:");
    for reason in reasons {
        println!("   • {}", reason);
    }
}

pub fn display_prediction_3d(market: Market, prediction: &Prediction3d) {
    println!("\n🎯 PASARAN: {}", market);
    println!("🔥 10 ANGKA 3D KUAT:\n");

    let mut table = new_table();
    table.set_header(vec!["#", "3D", "Skor"]);
    for (i, (tail, score)) in prediction.candidates.iter().zip(&prediction.scores).enumerate() {
        let score_cell = if *score > 0 {
            Cell::new(score.to_string())
        } else {
            Cell::new("—").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", i + 1)),
            Cell::new(tail.to_string()).fg(Color::Yellow),
            score_cell,
        ]);
    }
    println!("{table}");
    display_reasons(&prediction.reasons);
}

pub fn display_bbfs(market: Market, prediction: &BbfsPrediction) {
    println!("\n🎯 PASARAN: {}", market);
    println!("🎯 BBFS 3D (6 digit):");
    println!(" → {}", prediction.digits.iter().map(|d| d.to_string()).collect::<Vec<_>>().join("  "));
    println!("\n💡 Untuk: 3D, colok bebas, kombinasi");
    display_reasons(&prediction.reasons);
}

pub fn display_features(market: Market, features: &FeatureBundle) {
    println!("\n🔍 Pola 3D {}\n", market);

    let mut table = new_table();
    table.set_header(vec!["Pola", "Nilai"]);
    let hot = features.hot3d.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ");
    let rows = [
        ("3D terpanas", hot),
        ("Ratusan", digits_str(&features.pos_hundreds)),
        ("Puluhan", digits_str(&features.pos_tens)),
        ("Satuan", digits_str(&features.pos_units)),
        ("Mistik ekor", digits_str(&features.mystic_tail)),
        ("Tesson 2", digits_str(&features.tesson2)),
        ("Tesson 3", digits_str(&features.tesson3)),
        ("Shio kuat", digits_str(&features.shio_strong)),
        ("Angka dingin", digits_str(&features.cold_digits)),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    println!("{table}");
}

pub fn display_backtest(report: &BacktestReport, show_steps: bool) {
    println!("\n🔍 BACKTEST: Apakah 3D MASUK prediksi?\n");

    if show_steps {
        let mut table = new_table();
        table.set_header(vec!["", "Sebelumnya", "Hasil", "3D"]);
        for step in &report.steps {
            let status = if step.hit {
                Cell::new("✅").fg(Color::Green)
            } else {
                Cell::new("❌").fg(Color::Red)
            };
            table.add_row(vec![
                status,
                Cell::new(step.previous.to_string()),
                Cell::new(step.actual.to_string()),
                Cell::new(step.tail.to_string()),
            ]);
        }
        println!("{table}");
    }

    let mut summary = new_table();
    summary.set_header(vec!["Tembus", "Total", "Akurasi 3D"]);
    summary.add_row(vec![
        Cell::new(report.hits.to_string()),
        Cell::new(report.total.to_string()),
        Cell::new(format!("{:.1}%", report.accuracy())).fg(grade_color(report.grade())),
    ]);
    println!("{summary}");
}
