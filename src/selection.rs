//! Transition rule and roulette selection of the next city.

use crate::error::AcoError;
use crate::pheromone::PheromoneMatrix;
use ndarray::Array2;

/// Probability of moving from `curr` to each city of `candidates`, in order.
///
/// Each weight is `tau^alpha * eta^beta`, normalised by their sum.
pub fn transition_probabilities(
    curr: usize,
    candidates: &[usize],
    pheromones: &PheromoneMatrix,
    visibility: &Array2<f64>,
    alpha: f64,
    beta: f64,
) -> Result<Vec<f64>, AcoError> {
    if candidates.is_empty() {
        return Err(AcoError::NoCandidates { city: curr });
    }

    let mut weights: Vec<f64> = candidates
        .iter()
        .map(|&city| {
            let pheromone = pheromones.get(curr, city).powf(alpha);
            let visibility = visibility[[curr, city]].powf(beta);
            pheromone * visibility
        })
        .collect();

    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return Err(AcoError::DegenerateWeights { city: curr });
    }

    for w in &mut weights {
        *w /= sum;
    }

    Ok(weights)
}

/// Roulette wheel over `probs` with a uniform `draw` in `[0, 1)`.
///
/// Returns the position of the chosen candidate. When rounding keeps the
/// remainder from ever going negative the last candidate is taken.
pub fn roulette(probs: &[f64], draw: f64) -> Option<usize> {
    let mut remainder = draw;
    for (i, p) in probs.iter().enumerate() {
        remainder -= p;
        if remainder < 0.0 {
            return Some(i);
        }
    }

    probs.len().checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn visibility(n: usize) -> Array2<f64> {
        Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                0.0
            } else {
                1.0 / (1.0 + (i as f64 - j as f64).abs())
            }
        })
    }

    #[test]
    fn weights_follow_exponents() {
        let tau = PheromoneMatrix::new((3, 3), 1.0, 0.0);
        let eta = visibility(3);

        // eta[0][1] = 1/2, eta[0][2] = 1/3, squared: 1/4 and 1/9
        let probs = transition_probabilities(0, &[1, 2], &tau, &eta, 1.0, 2.0).unwrap();
        let total = 0.25 + 1.0 / 9.0;
        assert!((probs[0] - 0.25 / total).abs() < 1e-12);
        assert!((probs[1] - (1.0 / 9.0) / total).abs() < 1e-12);
    }

    #[test]
    fn zero_exponents_give_uniform_choice() {
        let tau = PheromoneMatrix::new((5, 5), 0.3, 0.0);
        let probs = transition_probabilities(0, &[1, 2, 3, 4], &tau, &visibility(5), 0.0, 0.0)
            .unwrap();
        assert!(probs.iter().all(|p| (p - 0.25).abs() < 1e-12));
    }

    #[test]
    fn vanished_pheromone_is_an_error() {
        let mut tau = PheromoneMatrix::new((3, 3), 1.0, 0.0);
        tau.evaporate(1.0);

        let result = transition_probabilities(1, &[0, 2], &tau, &visibility(3), 1.0, 2.0);
        assert!(matches!(result, Err(AcoError::DegenerateWeights { city: 1 })));
    }

    #[test]
    fn empty_candidates_is_an_error() {
        let tau = PheromoneMatrix::new((2, 2), 1.0, 0.0);
        let result = transition_probabilities(0, &[], &tau, &visibility(2), 1.0, 1.0);
        assert!(matches!(result, Err(AcoError::NoCandidates { city: 0 })));
    }

    #[test]
    fn roulette_walks_cumulative_distribution() {
        let probs = [0.2, 0.5, 0.3];
        assert_eq!(roulette(&probs, 0.0), Some(0));
        assert_eq!(roulette(&probs, 0.19), Some(0));
        assert_eq!(roulette(&probs, 0.2), Some(1));
        assert_eq!(roulette(&probs, 0.69), Some(1));
        assert_eq!(roulette(&probs, 0.71), Some(2));
    }

    #[test]
    fn roulette_falls_back_to_last() {
        // Sums to slightly less than 1
        let probs = [0.3, 0.3, 0.3999999];
        assert_eq!(roulette(&probs, 1.0 - f64::EPSILON), Some(2));
        assert_eq!(roulette(&[], 0.5), None);
    }

    proptest! {
        #[test]
        fn probabilities_sum_to_one(
            n in 2_usize..12,
            tau0 in 1e-6_f64..10.0,
            alpha in 0.0_f64..4.0,
            beta in 0.0_f64..4.0,
            curr in 0_usize..12,
        ) {
            let curr = curr % n;
            let tau = PheromoneMatrix::new((n, n), tau0, 0.0);
            let candidates: Vec<usize> = (0..n).filter(|&c| c != curr).collect();

            let probs = transition_probabilities(curr, &candidates, &tau, &visibility(n), alpha, beta)
                .unwrap();
            let total: f64 = probs.iter().sum();
            prop_assert_eq!(probs.len(), candidates.len());
            prop_assert!((total - 1.0).abs() < 1e-9);
            prop_assert!(probs.iter().all(|&p| p >= 0.0));
        }

        #[test]
        fn roulette_picks_a_candidate(
            weights in prop::collection::vec(1e-6_f64..1.0, 1..20),
            draw in 0.0_f64..1.0,
        ) {
            let total: f64 = weights.iter().sum();
            let probs: Vec<f64> = weights.iter().map(|w| w / total).collect();
            let picked = roulette(&probs, draw).unwrap();
            prop_assert!(picked < probs.len());

            let top = roulette(&probs, 1.0 - f64::EPSILON).unwrap();
            prop_assert!(top < probs.len());
        }
    }
}
