use serde::Serialize;
use toto3d_db::models::Draw;

use crate::counter::OrderedCounter;
use crate::features::{extract_features, FeatureBundle};

pub const MIN_HISTORY: usize = 10;
pub const BBFS_SIZE: usize = 6;

pub const FALLBACK_BBFS: [u8; BBFS_SIZE] = [1, 2, 4, 5, 7, 8];

pub const HOT_WEIGHT: u32 = 8;
pub const POSITION_WEIGHT: u32 = 6;
pub const SYMBOLIC_WEIGHT: u32 = 5;
pub const COLD_WEIGHT: u32 = 7;
pub const SHIO_WEIGHT: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BbfsPrediction {
    /// Enam digit, urut naik.
    pub digits: Vec<u8>,
    pub reasons: Vec<String>,
    pub fallback: bool,
}

impl BbfsPrediction {
    fn fallback() -> Self {
        Self {
            digits: FALLBACK_BBFS.to_vec(),
            reasons: vec!["Fallback".to_string()],
            fallback: true,
        }
    }
}

pub fn score_digits(features: &FeatureBundle) -> OrderedCounter<u8> {
    let mut pool = OrderedCounter::new();

    // Per kemunculan: digit yang berulang di 3D panas dihitung berulang
    for tail in &features.hot3d {
        for d in tail.digits() {
            pool.add(d, HOT_WEIGHT);
        }
    }

    for d in features.position_union() {
        pool.add(d, POSITION_WEIGHT);
    }

    for d in features.symbolic_union() {
        pool.add(d, SYMBOLIC_WEIGHT);
    }

    for &d in &features.cold_digits {
        pool.add(d, COLD_WEIGHT);
    }

    for &s in &features.shio_strong {
        pool.add(s % 10, SHIO_WEIGHT);
    }

    pool
}

fn reasons(features: &FeatureBundle) -> Vec<String> {
    let tesson_head: Vec<u8> = features.tesson2.iter().take(3).copied().collect();
    vec![
        "3D Panas & Posisi".to_string(),
        format!("Mistik: {:?}", features.mystic_tail),
        format!("Tesson: {:?}...", tesson_head),
        format!("Dingin: {:?}", features.cold_digits),
        format!("Shio: {:?}", features.shio_strong),
    ]
}

/// generate_bbfs_3d: 6 digit bebas, diurutkan naik.
pub fn rank_bbfs(history: &[Draw]) -> BbfsPrediction {
    if history.len() < MIN_HISTORY {
        return BbfsPrediction::fallback();
    }
    let Some(features) = extract_features(history) else {
        return BbfsPrediction::fallback();
    };

    let pool = score_digits(&features);
    let mut digits = pool.most_common_keys(BBFS_SIZE);
    for d in FALLBACK_BBFS {
        if digits.len() >= BBFS_SIZE {
            break;
        }
        if !digits.contains(&d) {
            digits.push(d);
        }
    }
    digits.sort_unstable();

    tracing::debug!(pool = pool.len(), ?digits, "BBFS 3D");

    BbfsPrediction {
        digits,
        reasons: reasons(&features),
        fallback: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{history_from, make_test_history};
    use toto3d_db::models::Tail;

    #[test]
    fn test_fallback_below_ten() {
        for n in 0..MIN_HISTORY {
            let pred = rank_bbfs(&make_test_history(n));
            assert!(pred.fallback);
            assert_eq!(pred.digits, vec![1, 2, 4, 5, 7, 8]);
            assert_eq!(pred.reasons, vec!["Fallback"]);
        }
    }

    #[test]
    fn test_rule_scores() {
        let features = FeatureBundle {
            hot3d: vec![Tail::from_value(123), Tail::from_value(456)],
            pos_hundreds: vec![1],
            pos_tens: vec![2],
            pos_units: vec![3, 9],
            mystic_tail: vec![3],
            tesson2: vec![9],
            tesson3: vec![7],
            shio_strong: vec![3, 11],
            cold_digits: vec![0, 7],
        };
        let pool = score_digits(&features);
        assert_eq!(pool.get(&3), 8 + 6 + 5 + 4);
        assert_eq!(pool.get(&1), 8 + 6 + 4);
        assert_eq!(pool.get(&2), 8 + 6);
        assert_eq!(pool.get(&7), 5 + 7);
        assert_eq!(pool.get(&9), 6 + 5);
        assert_eq!(pool.get(&4), 8);
        assert_eq!(pool.get(&0), 7);
        assert_eq!(pool.get(&8), 0);
        // 4, 5 dan 6 seri di 8: 4 masuk lebih dulu
        assert_eq!(pool.most_common_keys(6), vec![3, 1, 2, 7, 9, 4]);
    }

    #[test]
    fn test_repeated_digits_score_each_occurrence() {
        let features = FeatureBundle {
            hot3d: vec![Tail::from_value(111), Tail::from_value(121)],
            pos_hundreds: vec![],
            pos_tens: vec![],
            pos_units: vec![],
            mystic_tail: vec![],
            tesson2: vec![],
            tesson3: vec![],
            shio_strong: vec![1, 11],
            cold_digits: vec![],
        };
        let pool = score_digits(&features);
        // 1 muncul lima kali di 3D panas; shio 1 dan 11 sama-sama jatuh ke 1
        assert_eq!(pool.get(&1), 5 * 8 + 2 * 4);
        assert_eq!(pool.get(&2), 8);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_synthetic_history_digits() {
        // 4 (75), 6 (51), 7 (39), 9 (35), lalu 2 dan 1 seri di 30
        let pred = rank_bbfs(&make_test_history(10));
        assert_eq!(pred.digits, vec![1, 2, 4, 6, 7, 9]);
    }

    #[test]
    fn test_identical_draws() {
        let pred = rank_bbfs(&history_from(&["1111"; 10]));
        assert!(!pred.fallback);
        // 1 (35), 7 (12), 3 (11), lalu 0, 2, 4 dari angka dingin
        assert_eq!(pred.digits, vec![0, 1, 2, 3, 4, 7]);
        assert_eq!(pred.reasons.len(), 5);
        assert_eq!(pred.reasons[3], "Dingin: [0, 2, 3, 4, 5, 6, 7, 8, 9]");
        assert_eq!(pred.reasons[4], "Shio: [3]");
    }

    #[test]
    fn test_sorted_ascending_six_digits() {
        for n in [10, 12, 25, 50] {
            let pred = rank_bbfs(&make_test_history(n));
            assert_eq!(pred.digits.len(), BBFS_SIZE, "n = {}", n);
            assert!(pred.digits.windows(2).all(|w| w[0] < w[1]), "{:?}", pred.digits);
            assert!(pred.digits.iter().all(|&d| d < 10));
        }
    }

    #[test]
    fn test_deterministic() {
        let history = make_test_history(33);
        assert_eq!(rank_bbfs(&history), rank_bbfs(&history));
    }
}
