// src/engine/entropy.rs — Spatial entropy of the population

use super::density::DensityField;

/// Plug-in (resubstitution) differential entropy estimate:
///
/// ```text
/// H = −(1/N) Σ_i log_density(x_i)
/// ```
///
/// The population's own points serve as the Monte-Carlo sample of the
/// distribution they were drawn from. With the unnormalized kernel,
/// log-densities are ≤ 0, so the estimate is always ≥ 0: 0 for a fully
/// collapsed population (all duplicates), larger the more spread out the
/// embeddings are.
///
/// For N ≤ 1 entropy is 0 by definition — no diversity is measurable from
/// a single sample.
pub fn spatial_entropy(field: &DensityField) -> f64 {
    let n = field.len();
    if n <= 1 {
        return 0.0;
    }
    let sum: f64 = field.points.values().map(|p| p.log_density).sum();
    -sum / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::density;

    const EPS: f64 = 1e-10;

    fn entropy_of(points: &[Vec<f32>]) -> f64 {
        let named: Vec<(String, Vec<f32>)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (format!("c{i}"), p.clone()))
            .collect();
        spatial_entropy(&density::estimate(&named, EPS))
    }

    #[test]
    fn test_empty_and_single_are_zero() {
        assert_eq!(entropy_of(&[]), 0.0);
        assert_eq!(entropy_of(&[vec![1.0, 2.0]]), 0.0);
    }

    #[test]
    fn test_duplicates_are_zero() {
        let e = entropy_of(&[vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]]);
        assert!(e.abs() < 1e-9);
    }

    #[test]
    fn test_entropy_nonnegative() {
        let e = entropy_of(&[vec![0.0, 0.0], vec![0.5, 0.5], vec![1.0, 0.0]]);
        assert!(e >= 0.0);
    }

    #[test]
    fn test_spread_increases_entropy() {
        // Same cardinality, same dimension; only the spread differs.
        let clustered = entropy_of(&[
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
        ]);
        let separated = entropy_of(&[
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            vec![0.0, 10.0],
            vec![10.0, 10.0],
        ]);
        assert!(
            separated > clustered,
            "separated {separated} should exceed clustered {clustered}"
        );
    }
}
