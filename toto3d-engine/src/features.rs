use std::collections::BTreeSet;

use serde::Serialize;
use toto3d_db::models::{Draw, Tail};

use crate::counter::OrderedCounter;
use crate::mystic::{mystic_pairs, shio, tesson2, tesson3};

/// Di bawah jumlah ini pola tidak dihitung.
pub const MIN_HISTORY: usize = 5;

pub const HOT_3D_COUNT: usize = 10;
pub const POSITION_TOP: usize = 3;
pub const SHIO_TOP: usize = 3;
/// Digit yang muncul kurang dari ini dianggap dingin.
pub const COLD_THRESHOLD: u32 = 2;

/// Pola yang dideteksi dari satu riwayat. Himpunan digit selalu urut naik.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureBundle {
    pub hot3d: Vec<Tail>,
    pub pos_hundreds: Vec<u8>,
    pub pos_tens: Vec<u8>,
    pub pos_units: Vec<u8>,
    pub mystic_tail: Vec<u8>,
    pub tesson2: Vec<u8>,
    pub tesson3: Vec<u8>,
    pub shio_strong: Vec<u8>,
    pub cold_digits: Vec<u8>,
}

impl FeatureBundle {
    /// Gabungan digit posisi kuat, urutan kemunculan pertama (ratusan, puluhan, satuan).
    pub fn position_union(&self) -> Vec<u8> {
        union_in_order(&[&self.pos_hundreds, &self.pos_tens, &self.pos_units])
    }

    pub fn tesson_union(&self) -> Vec<u8> {
        union_in_order(&[&self.tesson2, &self.tesson3])
    }

    pub fn symbolic_union(&self) -> Vec<u8> {
        union_in_order(&[&self.mystic_tail, &self.tesson2, &self.tesson3])
    }
}

fn union_in_order(lists: &[&[u8]]) -> Vec<u8> {
    let mut seen = [false; 10];
    let mut out = Vec::new();
    for &d in lists.iter().flat_map(|l| l.iter()) {
        let idx = d as usize;
        if idx < seen.len() && !seen[idx] {
            seen[idx] = true;
            out.push(d);
        }
    }
    out
}

fn digit_set(digits: impl Iterator<Item = u8>) -> Vec<u8> {
    digits.collect::<BTreeSet<_>>().into_iter().collect()
}

fn top_digits_at(history: &[Draw], position: fn(&Draw) -> u8) -> Vec<u8> {
    history
        .iter()
        .map(position)
        .collect::<OrderedCounter<u8>>()
        .most_common_keys(POSITION_TOP)
}

/// deteksi_pola_3d: `None` jika riwayat kurang dari [`MIN_HISTORY`].
pub fn extract_features(history: &[Draw]) -> Option<FeatureBundle> {
    if history.len() < MIN_HISTORY {
        return None;
    }

    let hot3d = history
        .iter()
        .map(Draw::tail)
        .collect::<OrderedCounter<Tail>>()
        .most_common_keys(HOT_3D_COUNT);

    let units = || history.iter().map(Draw::units);

    let shio_strong = history
        .iter()
        .map(|d| shio(d.tail().value()))
        .collect::<OrderedCounter<u8>>()
        .most_common_keys(SHIO_TOP);

    let mut digit_counts = [0u32; 10];
    for draw in history {
        for d in draw.digits() {
            digit_counts[d as usize] += 1;
        }
    }
    let cold_digits = (0..10u8)
        .filter(|&d| digit_counts[d as usize] < COLD_THRESHOLD)
        .collect();

    let bundle = FeatureBundle {
        hot3d,
        pos_hundreds: top_digits_at(history, Draw::hundreds),
        pos_tens: top_digits_at(history, Draw::tens),
        pos_units: top_digits_at(history, Draw::units),
        mystic_tail: digit_set(units().flat_map(mystic_pairs)),
        tesson2: digit_set(units().map(tesson2)),
        tesson3: digit_set(units().map(tesson3)),
        shio_strong,
        cold_digits,
    };

    tracing::debug!(
        draws = history.len(),
        hot3d = bundle.hot3d.len(),
        mystic = bundle.mystic_tail.len(),
        cold = bundle.cold_digits.len(),
        "pola 3D terdeteksi"
    );

    Some(bundle)
}
