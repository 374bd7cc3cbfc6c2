// src/engine/density.rs — Gaussian kernel density estimation

use std::collections::BTreeMap;

/// Density at one candidate's embedding, with its floored natural log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityPoint {
    pub density: f64,
    pub log_density: f64,
}

/// The per-cycle density field over all embedded active candidates.
///
/// Keyed by candidate id in a BTreeMap so iteration order (and therefore
/// every downstream computation) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct DensityField {
    pub points: BTreeMap<String, DensityPoint>,
    /// Bandwidth used this cycle; `None` when fewer than two points exist
    /// and no pairwise scale is defined.
    pub bandwidth: Option<f64>,
}

impl DensityField {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_density(&self) -> Option<f64> {
        self.points
            .values()
            .map(|p| p.density)
            .fold(None, |acc, d| Some(acc.map_or(d, |a: f64| a.max(d))))
    }
}

/// Estimate the density field with an isotropic Gaussian kernel:
///
/// ```text
/// density(x_i) = (1/N) Σ_j exp(−‖x_i − x_j‖² / (2h²))
/// ```
///
/// The kernel is unnormalized (peak 1), so densities lie in (0, 1] and
/// log-densities are ≤ 0. The bandwidth is `h = sqrt(m)` where `m` is the
/// median pairwise Euclidean distance: monotone in spread, deterministic
/// for a fixed embedding set, and deliberately sublinear — a bandwidth
/// proportional to `m` would cancel out of `‖d‖²/h²` under uniform
/// scaling and make entropy blind to how far apart the population sits.
/// `log_density` is floored at `ln(min_density_epsilon)`.
///
/// `N = 0` returns an empty field; `N = 1` is the degenerate single-point
/// case and gets the kernel peak (density 1, log 0) without ever dividing
/// by a zero spread.
pub fn estimate(points: &[(String, Vec<f32>)], min_density_epsilon: f64) -> DensityField {
    let n = points.len();
    if n == 0 {
        return DensityField::default();
    }
    if n == 1 {
        let mut field = DensityField::default();
        field.points.insert(
            points[0].0.clone(),
            DensityPoint {
                density: 1.0,
                log_density: 0.0,
            },
        );
        return field;
    }

    // Pairwise squared distances, upper triangle.
    let mut sq_dists = vec![0.0f64; n * n];
    let mut pair_dists = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let d2 = squared_distance(&points[i].1, &points[j].1);
            sq_dists[i * n + j] = d2;
            sq_dists[j * n + i] = d2;
            pair_dists.push(d2.sqrt());
        }
    }

    let m = median(&mut pair_dists);
    // All-duplicate population: every distance is 0, every kernel term is
    // exp(0) = 1 regardless of h, so any positive bandwidth is equivalent.
    let h = if m > 0.0 { m.sqrt() } else { 1.0 };
    let denom = 2.0 * h * h;

    let log_floor = min_density_epsilon.ln();
    let mut field = DensityField {
        points: BTreeMap::new(),
        bandwidth: Some(h),
    };
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..n {
            sum += (-sq_dists[i * n + j] / denom).exp();
        }
        let density = (sum / n as f64).max(min_density_epsilon);
        let log_density = density.ln().max(log_floor);
        field.points.insert(
            points[i].0.clone(),
            DensityPoint {
                density,
                log_density,
            },
        );
    }
    field
}

fn squared_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum()
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    fn named(points: &[Vec<f32>]) -> Vec<(String, Vec<f32>)> {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| (format!("c{i}"), p.clone()))
            .collect()
    }

    #[test]
    fn test_empty_population() {
        let field = estimate(&[], EPS);
        assert!(field.is_empty());
        assert!(field.bandwidth.is_none());
    }

    #[test]
    fn test_single_point_kernel_peak() {
        let field = estimate(&named(&[vec![3.0, -1.0]]), EPS);
        let p = field.points.get("c0").unwrap();
        assert_eq!(p.density, 1.0);
        assert_eq!(p.log_density, 0.0);
    }

    #[test]
    fn test_duplicate_points_density_one() {
        let field = estimate(&named(&[vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]]), EPS);
        for p in field.points.values() {
            assert!((p.density - 1.0).abs() < 1e-12);
            assert!(p.log_density.abs() < 1e-12);
        }
    }

    #[test]
    fn test_densities_bounded() {
        let field = estimate(
            &named(&[vec![0.0, 0.0], vec![5.0, 0.0], vec![0.0, 5.0], vec![9.0, 9.0]]),
            EPS,
        );
        for p in field.points.values() {
            assert!(p.density > 0.0 && p.density <= 1.0);
            assert!(p.log_density <= 0.0);
        }
    }

    #[test]
    fn test_outlier_has_lowest_density() {
        // Three clustered points and one far away.
        let field = estimate(
            &named(&[
                vec![0.0, 0.0],
                vec![0.1, 0.0],
                vec![0.0, 0.1],
                vec![50.0, 50.0],
            ]),
            EPS,
        );
        let outlier = field.points.get("c3").unwrap().density;
        for id in ["c0", "c1", "c2"] {
            assert!(field.points.get(id).unwrap().density > outlier);
        }
    }

    #[test]
    fn test_bandwidth_monotone_in_spread() {
        let tight = estimate(&named(&[vec![0.0], vec![0.1], vec![0.2]]), EPS);
        let wide = estimate(&named(&[vec![0.0], vec![1.0], vec![2.0]]), EPS);
        assert!(wide.bandwidth.unwrap() > tight.bandwidth.unwrap());
    }

    #[test]
    fn test_deterministic_for_fixed_input() {
        let points = named(&[vec![0.3, 0.7], vec![-1.2, 0.4], vec![2.0, 2.0]]);
        let a = estimate(&points, EPS);
        let b = estimate(&points, EPS);
        assert_eq!(a.points, b.points);
        assert_eq!(a.bandwidth, b.bandwidth);
    }
}
