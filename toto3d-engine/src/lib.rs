pub mod backtest;
pub mod bbfs;
pub mod counter;
pub mod features;
pub mod mystic;
pub mod ranker;

use toto3d_db::models::Draw;

pub use backtest::{backtest_3d, backtest_3d_with, replay, AccuracyGrade, BacktestReport, BacktestStep};
pub use bbfs::{rank_bbfs, BbfsPrediction};
pub use features::{extract_features, FeatureBundle};
pub use ranker::{rank_3d, Prediction3d};

/// Riwayat sintetis yang deterministik, untuk pengujian.
pub fn make_test_history(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let value = (i * 7919 + 1234 + (i % 7) * 311) % 10_000;
            Draw::from_value(value as u16)
        })
        .collect()
}

/// Panik jika ada hasil yang tidak valid.
pub fn history_from(results: &[&str]) -> Vec<Draw> {
    results.iter().map(|s| Draw::parse(s).unwrap()).collect()
}
