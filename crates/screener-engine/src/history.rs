//! Synthetic yearly price history for charting. Cosmetic only.

use chrono::Datelike;
use rand::Rng;
use screener_core::HistoryPoint;

/// Baseline subtracted from each uniform draw; values below 0.5 bias the
/// walk upward over time.
const DRIFT_BASELINE: f64 = 0.40;

/// Maximum relative move per step before the drift shift
const STEP_SCALE: f64 = 0.12;

/// Yearly series of `points + 1` prices ending in `end_year` at exactly
/// `current_price`.
///
/// Each year-over-year move is `(u - 0.40) * 0.12` for `u` uniform in
/// `[0, 1)`; the walk is unwound backwards from the current price.
pub fn generate_history<R: Rng + ?Sized>(
    current_price: f64,
    points: usize,
    end_year: i32,
    rng: &mut R,
) -> Vec<HistoryPoint> {
    let mut prices = vec![0.0; points + 1];
    prices[points] = current_price;

    for i in (0..points).rev() {
        let change = (rng.gen::<f64>() - DRIFT_BASELINE) * STEP_SCALE;
        prices[i] = prices[i + 1] / (1.0 + change);
    }

    prices
        .into_iter()
        .enumerate()
        .map(|(i, price)| HistoryPoint {
            year: (end_year - points as i32 + i as i32).to_string(),
            price: round_cents(price),
        })
        .collect()
}

/// Same as [`generate_history`] with an unseeded RNG, ending this year
pub fn generate_history_now(current_price: f64, points: usize) -> Vec<HistoryPoint> {
    let year = chrono::Utc::now().year();
    generate_history(current_price, points, year, &mut rand::thread_rng())
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_ends_at_current_price() {
        let mut rng = StdRng::seed_from_u64(7);
        let history = generate_history(235.45, 30, 2025, &mut rng);

        assert_eq!(history.len(), 31);
        assert_eq!(history.first().unwrap().year, "1995");
        let last = history.last().unwrap();
        assert_eq!(last.year, "2025");
        assert_eq!(last.price, 235.45);
    }

    #[test]
    fn test_steps_are_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        let history = generate_history(1000.0, 50, 2025, &mut rng);

        for pair in history.windows(2) {
            let ratio = pair[1].price / pair[0].price;
            // Allow slack for cent rounding
            assert!(ratio > 1.0 - 0.048 - 0.001, "ratio {}", ratio);
            assert!(ratio < 1.0 + 0.072 + 0.001, "ratio {}", ratio);
        }
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let a = generate_history(50.0, 10, 2025, &mut StdRng::seed_from_u64(1));
        let b = generate_history(50.0, 10, 2025, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_points() {
        let history = generate_history_now(12.0, 0);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, 12.0);
    }
}
