use serde::Serialize;
use toto3d_db::models::{Draw, Tail};

use crate::counter::OrderedCounter;
use crate::features::{extract_features, FeatureBundle};
use crate::mystic::shio;

pub const MIN_HISTORY: usize = 10;
pub const TOP_3D: usize = 10;

/// Daftar cadangan saat data kurang.
pub const FALLBACK_3D: [u16; TOP_3D] = [123, 456, 789, 12, 345, 678, 234, 567, 890, 135];

pub const HOT_WEIGHT: u32 = 10;
pub const POSITION_WEIGHT: u32 = 5;
pub const MYSTIC_WEIGHT: u32 = 3;
pub const TESSON_WEIGHT: u32 = 2;
pub const SHIO_WEIGHT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction3d {
    pub candidates: Vec<Tail>,
    /// Skor tiap kandidat, sejajar dengan `candidates`. Nol untuk isian cadangan.
    pub scores: Vec<u32>,
    pub reasons: Vec<String>,
    pub fallback: bool,
}

impl Prediction3d {
    fn fallback() -> Self {
        Self {
            candidates: FALLBACK_3D.iter().map(|&v| Tail::from_value(v)).collect(),
            scores: vec![0; TOP_3D],
            reasons: vec!["Data kurang".to_string()],
            fallback: true,
        }
    }

    pub fn contains(&self, tail: &Tail) -> bool {
        self.candidates.contains(tail)
    }
}

/// Membangun pool kandidat 3D dari pola. Aturan dijalankan berurutan;
/// aturan 3-5 hanya menaikkan skor kandidat yang sudah ada.
pub fn score_candidates(features: &FeatureBundle) -> OrderedCounter<Tail> {
    let mut pool = OrderedCounter::new();

    for &tail in &features.hot3d {
        pool.add(tail, HOT_WEIGHT);
    }

    for &r in &features.pos_hundreds {
        for &p in &features.pos_tens {
            for &s in &features.pos_units {
                pool.add(Tail::from_digits(r, p, s), POSITION_WEIGHT);
            }
        }
    }

    for &m in &features.mystic_tail {
        for r in 0..10 {
            for p in 0..10 {
                let combo = Tail::from_digits(r, p, m);
                if pool.contains(&combo) {
                    pool.add(combo, MYSTIC_WEIGHT);
                }
            }
        }
    }

    for t in features.tesson_union() {
        pool.add_matching(TESSON_WEIGHT, |c| c.units() == t);
    }

    pool.add_matching(SHIO_WEIGHT, |c| features.shio_strong.contains(&shio(c.value())));

    pool
}

fn reasons(features: &FeatureBundle) -> Vec<String> {
    vec![
        format!("3D Panas: {}", features.hot3d.len()),
        format!(
            "Posisi: R{:?}, P{:?}, S{:?}",
            features.pos_hundreds, features.pos_tens, features.pos_units
        ),
        format!("Mistik: {:?}", features.mystic_tail),
        format!("Tesson: {:?}, {:?}", features.tesson2, features.tesson3),
    ]
}

/// generate_3d_kuat: 10 angka 3D terkuat beserta alasannya.
pub fn rank_3d(history: &[Draw]) -> Prediction3d {
    if history.len() < MIN_HISTORY {
        return Prediction3d::fallback();
    }
    let Some(features) = extract_features(history) else {
        return Prediction3d::fallback();
    };

    let pool = score_candidates(&features);
    let (mut candidates, mut scores): (Vec<Tail>, Vec<u32>) =
        pool.most_common(TOP_3D).into_iter().unzip();

    // Pool bisa lebih kecil dari 10 jika riwayat sangat seragam
    for tail in FALLBACK_3D.iter().map(|&v| Tail::from_value(v)) {
        if candidates.len() >= TOP_3D {
            break;
        }
        if !candidates.contains(&tail) {
            candidates.push(tail);
            scores.push(0);
        }
    }

    tracing::debug!(pool = pool.len(), top = ?candidates.first(), "peringkat 3D");

    Prediction3d {
        candidates,
        scores,
        reasons: reasons(&features),
        fallback: false,
    }
}
