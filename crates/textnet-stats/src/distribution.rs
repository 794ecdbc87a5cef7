//! Empirical distributions and two-sample comparison of degree sequences.
//!
//! # Overview
//!
//! - [`cdf`] / [`ccdf`]: empirical (complementary) CDF of the positive part
//!   of a sample, one point per distinct value.
//! - [`degree_hist`]: normalized in-degree histogram of a graph.
//! - [`kolmogorov_smirnoff`]: two-sample Kolmogorov–Smirnov test on the
//!   nonzero degrees of two graphs, selected by [`DegreeMode`].
//!
//! # KS p-values
//!
//! The two-sided p-value `P(D >= d)` is exact when both samples have at most
//! [`EXACT_KS_MAX_N`] values: it is the probability that a uniformly random
//! monotone lattice path from `(0, 0)` to `(n1, n2)` leaves the band
//! `|i/n1 - j/n2| < d`. The path probability is propagated step by step, so
//! no binomial coefficient is ever formed. Larger samples use the asymptotic
//! Kolmogorov distribution at `sqrt(n1 n2 / (n1 + n2)) * d`.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use textnet_graph::GraphView;
use tracing::{debug, instrument};

use crate::error::{Result, StatsError};

/// Largest sample size for which the exact KS p-value is computed.
pub const EXACT_KS_MAX_N: usize = 10_000;

// ---------------------------------------------------------------------------
// CDF / CCDF
// ---------------------------------------------------------------------------

/// Empirical CDF of the strictly positive values of `values`.
///
/// Returns `(x, y)` with `x` the sorted distinct positive values and `y[i]`
/// the fraction of positive values strictly below `x[i]`. With `survival`,
/// `y[i]` is `1 - cdf` instead.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cdf(values: &[f64], survival: bool) -> (Vec<f64>, Vec<f64>) {
    let mut x: Vec<f64> = values.iter().copied().filter(|v| *v > 0.0).collect();
    x.sort_by(f64::total_cmp);

    let n = x.len() as f64;
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (rank, &v) in x.iter().enumerate() {
        if xs.last() == Some(&v) {
            continue;
        }
        let below = rank as f64 / n;
        xs.push(v);
        ys.push(if survival { 1.0 - below } else { below });
    }
    (xs, ys)
}

/// Complementary CDF: `cdf(values, true)`.
#[must_use]
pub fn ccdf(values: &[f64]) -> (Vec<f64>, Vec<f64>) {
    cdf(values, true)
}

// ---------------------------------------------------------------------------
// Degree histogram
// ---------------------------------------------------------------------------

/// Frequency of each observed in-degree value divided by the node count,
/// ordered by ascending degree.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn degree_hist<G: GraphView + ?Sized>(graph: &G) -> Vec<f64> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for d in graph.in_degrees() {
        *counts.entry(d).or_default() += 1;
    }
    counts.into_values().map(|c| c as f64 / n as f64).collect()
}

// ---------------------------------------------------------------------------
// Kolmogorov–Smirnov
// ---------------------------------------------------------------------------

/// Which degree sequence to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegreeMode {
    In,
    Out,
    #[default]
    All,
}

impl DegreeMode {
    /// The degree-sequence function this mode stands for.
    #[must_use]
    pub fn selector<G: GraphView>(self) -> fn(&G) -> Vec<usize> {
        match self {
            Self::In => G::in_degrees,
            Self::Out => G::out_degrees,
            Self::All => G::degrees,
        }
    }
}

/// How a KS p-value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KsMethod {
    Exact,
    Asymptotic,
}

/// Two-sample KS statistic and two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KsResult {
    pub statistic: f64,
    pub pvalue: f64,
    pub method: KsMethod,
}

/// Compare the nonzero degree distributions of two graphs.
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] if either graph has no node with a
/// nonzero degree under `mode`.
#[allow(clippy::cast_precision_loss)]
pub fn kolmogorov_smirnoff<G1, G2>(g1: &G1, g2: &G2, mode: DegreeMode) -> Result<KsResult>
where
    G1: GraphView,
    G2: GraphView,
{
    let nonzero = |degrees: Vec<usize>| -> Vec<f64> {
        degrees
            .into_iter()
            .filter(|&d| d > 0)
            .map(|d| d as f64)
            .collect()
    };
    let d1 = nonzero(mode.selector::<G1>()(g1));
    let d2 = nonzero(mode.selector::<G2>()(g2));
    ks_2samp(&d1, &d2)
}

/// Two-sample Kolmogorov–Smirnov test.
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] if either sample is empty.
#[instrument(skip_all, fields(n1 = a.len(), n2 = b.len()))]
pub fn ks_2samp(a: &[f64], b: &[f64]) -> Result<KsResult> {
    if a.is_empty() || b.is_empty() {
        return Err(StatsError::EmptySample("kolmogorov-smirnov sample"));
    }

    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let statistic = ks_statistic(&a, &b);

    let (n1, n2) = (a.len(), b.len());
    if n1.max(n2) <= EXACT_KS_MAX_N {
        let pvalue = exact_pvalue(n1, n2, statistic);
        return Ok(KsResult {
            statistic,
            pvalue,
            method: KsMethod::Exact,
        });
    }

    debug!("sample too large for exact KS p-value; using asymptotic distribution");
    Ok(KsResult {
        statistic,
        pvalue: asymptotic_pvalue(n1, n2, statistic),
        method: KsMethod::Asymptotic,
    })
}

/// `max |F_a(v) - F_b(v)|` over every observed value; inputs sorted.
#[allow(clippy::cast_precision_loss)]
fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    a.iter()
        .chain(b)
        .map(|&v| {
            let fa = a.partition_point(|&x| x <= v) as f64 / n1;
            let fb = b.partition_point(|&x| x <= v) as f64 / n2;
            (fa - fb).abs()
        })
        .fold(0.0, f64::max)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `P(D >= statistic)` for sample sizes `n1`, `n2`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn exact_pvalue(n1: usize, n2: usize, statistic: f64) -> f64 {
    let (m, n) = (n1 as u64, n2 as u64);
    let lcm = m / gcd(m, n) * n;
    let h = (statistic * lcm as f64).round() as u64;
    if h == 0 {
        return 1.0;
    }
    let (step_i, step_j) = (lcm / m, lcm / n);
    let inside = |i: usize, j: usize| (i as u64 * step_i).abs_diff(j as u64 * step_j) < h;

    // reach[j]: probability a random path visits (i, j) without leaving the band.
    let mut prev = vec![0.0_f64; n2 + 1];
    for i in 0..=n1 {
        let mut row = vec![0.0_f64; n2 + 1];
        for j in 0..=n2 {
            let mut p = if i == 0 && j == 0 { 1.0 } else { 0.0 };
            if i > 0 {
                let up = (n1 - i + 1) as f64;
                let right = (n2 - j) as f64;
                p += prev[j] * up / (up + right);
            }
            if j > 0 {
                let up = (n1 - i) as f64;
                let right = (n2 - j + 1) as f64;
                p += row[j - 1] * right / (up + right);
            }
            row[j] = if inside(i, j) { p } else { 0.0 };
        }
        prev = row;
    }

    (1.0 - prev[n2]).clamp(0.0, 1.0)
}

/// Survival function of the limiting Kolmogorov distribution.
#[allow(clippy::cast_precision_loss)]
fn asymptotic_pvalue(n1: usize, n2: usize, statistic: f64) -> f64 {
    let (m, n) = (n1 as f64, n2 as f64);
    let lambda = (m * n / (m + n)).sqrt() * statistic;
    kolmogorov_survival(lambda)
}

#[allow(clippy::cast_precision_loss)]
fn kolmogorov_survival(lambda: f64) -> f64 {
    const TERMS: usize = 100;
    if lambda <= 0.0 {
        return 1.0;
    }
    if lambda < 1.0 {
        // P(K <= λ) = sqrt(2π)/λ Σ exp(-(2k-1)² π² / (8 λ²))
        let cdf: f64 = (1..=TERMS)
            .map(|k| {
                let odd = (2 * k - 1) as f64;
                (-(odd * odd) * PI * PI / (8.0 * lambda * lambda)).exp()
            })
            .sum::<f64>()
            * (2.0 * PI).sqrt()
            / lambda;
        return (1.0 - cdf).clamp(0.0, 1.0);
    }
    // Q(λ) = 2 Σ (-1)^(k-1) exp(-2 k² λ²)
    let mut sum = 0.0;
    let mut sign = 1.0;
    for k in 1..=TERMS {
        let kf = k as f64;
        sum += sign * (-2.0 * kf * kf * lambda * lambda).exp();
        sign = -sign;
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::DiGraph;

    fn star(leaves: usize) -> DiGraph<(), ()> {
        let mut g = DiGraph::new();
        let hub = g.add_node(());
        for _ in 0..leaves {
            let leaf = g.add_node(());
            g.add_edge(hub, leaf, ());
        }
        g
    }

    #[test]
    fn cdf_drops_non_positive_and_collapses_ties() {
        let (x, y) = cdf(&[0.0, -3.0, 2.0, 1.0, 2.0, 4.0, f64::NAN], false);
        assert_eq!(x, vec![1.0, 2.0, 4.0]);
        assert_eq!(y, vec![0.0, 0.25, 0.75]);
    }

    #[test]
    fn ccdf_is_complement() {
        let sample = [5.0, 1.0, 1.0, 3.0];
        let (xc, yc) = ccdf(&sample);
        let (x, y) = cdf(&sample, false);
        assert_eq!(x, xc);
        for (a, b) in y.iter().zip(&yc) {
            assert!((1.0 - a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn cdf_of_empty_sample_is_empty() {
        let (x, y) = cdf(&[0.0, 0.0], false);
        assert!(x.is_empty() && y.is_empty());
    }

    #[test]
    fn degree_hist_normalizes_by_node_count() {
        // Star with 3 leaves: in-degrees [0, 1, 1, 1].
        let hist = degree_hist(&star(3));
        assert_eq!(hist, vec![0.25, 0.75]);
        assert!(degree_hist(&DiGraph::<(), ()>::new()).is_empty());
    }

    #[test]
    fn selector_maps_modes_to_degree_functions() {
        let g = star(2);
        assert_eq!(DegreeMode::In.selector::<DiGraph<(), ()>>()(&g), vec![0, 1, 1]);
        assert_eq!(DegreeMode::Out.selector::<DiGraph<(), ()>>()(&g), vec![2, 0, 0]);
        assert_eq!(DegreeMode::All.selector::<DiGraph<(), ()>>()(&g), vec![2, 1, 1]);
    }

    #[test]
    fn same_graph_has_zero_statistic() {
        let g = star(5);
        for mode in [DegreeMode::In, DegreeMode::Out, DegreeMode::All] {
            let ks = kolmogorov_smirnoff(&g, &g, mode).expect("nonzero degrees");
            assert!(ks.statistic.abs() < 1e-12);
            assert!((ks.pvalue - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_degree_sample_is_an_error() {
        let empty = DiGraph::<(), ()>::new();
        let err = kolmogorov_smirnoff(&empty, &star(2), DegreeMode::All);
        assert!(matches!(err, Err(StatsError::EmptySample(_))));
    }

    #[test]
    fn disjoint_samples_exact_pvalue() {
        // D = 1 for disjoint supports; P(D >= 1) = 2 / C(6, 3) = 0.1.
        let ks = ks_2samp(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).expect("non-empty");
        assert!((ks.statistic - 1.0).abs() < 1e-12);
        assert!((ks.pvalue - 0.1).abs() < 1e-12);
        assert_eq!(ks.method, KsMethod::Exact);
    }

    #[test]
    fn unequal_sizes_exact_pvalue() {
        // a = [1, 2], b = [3]: D = 1; only the paths a,a,b and b,a,a reach
        // |i/2 - j/1| = 1, probability 2 / C(3, 1).
        let ks = ks_2samp(&[1.0, 2.0], &[3.0]).expect("non-empty");
        assert!((ks.statistic - 1.0).abs() < 1e-12);
        assert!((ks.pvalue - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn kolmogorov_survival_known_values() {
        assert!((kolmogorov_survival(0.0) - 1.0).abs() < 1e-12);
        // Q(1.36) ≈ 0.0495 (classic 5% critical value).
        assert!((kolmogorov_survival(1.36) - 0.0495).abs() < 1e-3);
        // Q(0.5) ≈ 0.9639; checks the small-λ series.
        assert!((kolmogorov_survival(0.5) - 0.9639).abs() < 1e-3);
        // Both series agree at the switch point.
        let below = kolmogorov_survival(1.0 - 1e-12);
        let above = kolmogorov_survival(1.0);
        assert!((below - above).abs() < 1e-9);
    }

    #[test]
    fn large_samples_use_asymptotic_distribution() {
        let a: Vec<f64> = (1..=EXACT_KS_MAX_N + 1).map(|v| v as f64).collect();
        let ks = ks_2samp(&a, &a).expect("non-empty");
        assert_eq!(ks.method, KsMethod::Asymptotic);
        assert!(ks.statistic.abs() < 1e-12);
        assert!((ks.pvalue - 1.0).abs() < 1e-12);
    }
}
