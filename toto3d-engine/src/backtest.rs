use serde::Serialize;
use toto3d_db::models::{Draw, Tail};

use crate::ranker::rank_3d;

pub const MIN_HISTORY: usize = 2;

pub const GOOD_ACCURACY: f64 = 70.0;
pub const FAIR_ACCURACY: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BacktestStep {
    /// Indeks hasil terakhir yang diketahui.
    pub index: usize,
    pub previous: Draw,
    pub actual: Draw,
    pub tail: Tail,
    pub hit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyGrade {
    Good,
    Fair,
    Poor,
}

impl AccuracyGrade {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= GOOD_ACCURACY {
            AccuracyGrade::Good
        } else if accuracy >= FAIR_ACCURACY {
            AccuracyGrade::Fair
        } else {
            AccuracyGrade::Poor
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub steps: Vec<BacktestStep>,
    pub hits: usize,
    pub total: usize,
}

impl BacktestReport {
    pub fn from_steps(steps: impl IntoIterator<Item = BacktestStep>) -> Self {
        let steps: Vec<BacktestStep> = steps.into_iter().collect();
        let hits = steps.iter().filter(|s| s.hit).count();
        let total = steps.len();
        Self { steps, hits, total }
    }

    /// Persentase tembus, 0.0 jika tidak ada langkah.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.hits as f64 / self.total as f64 * 100.0
    }

    pub fn grade(&self) -> AccuracyGrade {
        AccuracyGrade::from_accuracy(self.accuracy())
    }
}

/// Menjalankan ulang riwayat langkah demi langkah: untuk tiap `i`, prediksi dari
/// `history[..=i]` dibandingkan dengan 3D dari `history[i + 1]`.
pub fn replay(history: &[Draw]) -> impl Iterator<Item = BacktestStep> + '_ {
    (0..history.len().saturating_sub(1)).map(move |i| {
        let prediction = rank_3d(&history[..=i]);
        let actual = history[i + 1];
        let tail = actual.tail();
        BacktestStep {
            index: i,
            previous: history[i],
            actual,
            tail,
            hit: prediction.contains(&tail),
        }
    })
}

/// backtest_3d: `None` jika riwayat kurang dari 2 hasil.
pub fn backtest_3d(history: &[Draw]) -> Option<BacktestReport> {
    backtest_3d_with(history, |_| {})
}

/// Seperti [`backtest_3d`], `on_step` dipanggil setelah tiap langkah selesai.
pub fn backtest_3d_with(
    history: &[Draw],
    mut on_step: impl FnMut(&BacktestStep),
) -> Option<BacktestReport> {
    if history.len() < MIN_HISTORY {
        return None;
    }
    let report = BacktestReport::from_steps(replay(history).inspect(|step| on_step(step)));
    tracing::debug!(
        hits = report.hits,
        total = report.total,
        accuracy = report.accuracy(),
        "backtest 3D selesai"
    );
    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{history_from, make_test_history};

    #[test]
    fn test_insufficient_history() {
        assert!(backtest_3d(&[]).is_none());
        assert!(backtest_3d(&history_from(&["1234"])).is_none());
    }

    #[test]
    fn test_two_draws_hit_fallback() {
        let report = backtest_3d(&history_from(&["1234", "5678"])).unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.hits, 1);
        assert!((report.accuracy() - 100.0).abs() < 1e-9);
        let step = &report.steps[0];
        assert_eq!(step.previous.to_string(), "1234");
        assert_eq!(step.actual.to_string(), "5678");
        assert_eq!(step.tail.to_string(), "678");
        assert!(step.hit);
    }

    #[test]
    fn test_two_draws_miss() {
        let report = backtest_3d(&history_from(&["1234", "5000"])).unwrap();
        assert_eq!(report.hits, 0);
        assert_eq!(report.accuracy(), 0.0);
        assert_eq!(report.grade(), AccuracyGrade::Poor);
    }

    #[test]
    fn test_totals_and_accuracy() {
        for n in [2, 3, 10, 11, 25, 40] {
            let history = make_test_history(n);
            let report = backtest_3d(&history).unwrap();
            assert_eq!(report.total, n - 1);
            assert_eq!(report.steps.len(), n - 1);
            assert!(report.hits <= report.total);
            let expected = report.hits as f64 / report.total as f64 * 100.0;
            assert_eq!(report.accuracy(), expected);
        }
    }

    #[test]
    fn test_steps_follow_history() {
        let history = make_test_history(15);
        let report = backtest_3d(&history).unwrap();
        for (i, step) in report.steps.iter().enumerate() {
            assert_eq!(step.index, i);
            assert_eq!(step.previous, history[i]);
            assert_eq!(step.actual, history[i + 1]);
            assert_eq!(step.hit, rank_3d(&history[..=i]).contains(&history[i + 1].tail()));
        }
    }

    #[test]
    fn test_replay_matches_report() {
        let history = make_test_history(20);
        let steps: Vec<BacktestStep> = replay(&history).collect();
        assert_eq!(steps, backtest_3d(&history).unwrap().steps);
    }

    #[test]
    fn test_step_callback_sees_every_step() {
        let history = make_test_history(12);
        let mut seen = Vec::new();
        let report = backtest_3d_with(&history, |step| seen.push(step.index)).unwrap();
        assert_eq!(seen, (0..11).collect::<Vec<_>>());
        assert_eq!(report.total, seen.len());

        let mut calls = 0;
        assert!(backtest_3d_with(&history_from(&["1234"]), |_| calls += 1).is_none());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_grades() {
        assert_eq!(AccuracyGrade::from_accuracy(70.0), AccuracyGrade::Good);
        assert_eq!(AccuracyGrade::from_accuracy(69.9), AccuracyGrade::Fair);
        assert_eq!(AccuracyGrade::from_accuracy(50.0), AccuracyGrade::Fair);
        assert_eq!(AccuracyGrade::from_accuracy(49.9), AccuracyGrade::Poor);
    }
}
