//! Link quality as a function of distance to a base station.
//!
//! Contains helpers for:
//! - The deterministic distance model (bandwidth falls, latency rises toward the edge of coverage)
//! - Optional multiplicative shadowing noise
//!
//! Units:
//! - Bandwidth: Mbps
//! - Latency: ms
//! - Distance: world units, same as `TechnologySpec::max_range`

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use super::types::TechnologySpec;

/// Bandwidth never drops below this, even at the edge of coverage with
/// heavy shadowing.
pub const MIN_BANDWIDTH: f64 = 0.1;

/// Fraction of the best-case bandwidth lost at maximum range.
const BANDWIDTH_EDGE_LOSS: f64 = 0.9;

/// Latency multiplier growth at maximum range (edge latency is 10x best).
const LATENCY_EDGE_GROWTH: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkQuality {
    pub bandwidth: f64,
    pub latency: f64,
}

/// Calculate the link quality at a given distance using a linear
/// degradation model.
///
/// # Formula
///
/// ```text
/// r         = d / max_range                 (0.0 ..= 1.0)
/// bandwidth = best_bandwidth × (1 − 0.9 r)
/// latency   = best_latency   × (1 + 9 r)
/// ```
///
/// # Returns
///
/// `None` when `distance` exceeds the technology's range. At distance 0 the
/// result equals the nominal best case.
pub fn link_quality_at_distance(distance: f64, spec: &TechnologySpec) -> Option<LinkQuality> {
    if !(distance <= spec.max_range) {
        return None;
    }
    let ratio = (distance / spec.max_range).clamp(0.0, 1.0);
    let bandwidth = spec.best_bandwidth * (1.0 - BANDWIDTH_EDGE_LOSS * ratio);
    let latency = spec.best_latency * (1.0 + LATENCY_EDGE_GROWTH * ratio);
    Some(LinkQuality {
        bandwidth: bandwidth.max(MIN_BANDWIDTH),
        latency,
    })
}

/// Perturb a link with multiplicative shadowing `1 + N(0, σ)`, sampled
/// independently for bandwidth and latency.
///
/// The result stays within the technology's envelope: bandwidth in
/// `[MIN_BANDWIDTH, best_bandwidth]`, latency no lower than `best_latency`.
/// A non-positive or non-finite `sigma` disables shadowing.
pub fn apply_shadowing<R: Rng + ?Sized>(quality: LinkQuality, spec: &TechnologySpec, sigma: f64, rng: &mut R) -> LinkQuality {
    if !(sigma > 0.0) || !sigma.is_finite() {
        return quality;
    }
    let normal = match Normal::new(0.0_f64, sigma) {
        Ok(normal) => normal,
        Err(_) => return quality,
    };
    let bandwidth_factor = 1.0 + normal.sample(rng);
    let latency_factor = 1.0 + normal.sample(rng);

    LinkQuality {
        bandwidth: (quality.bandwidth * bandwidth_factor).clamp(MIN_BANDWIDTH, spec.best_bandwidth.max(MIN_BANDWIDTH)),
        latency: (quality.latency * latency_factor).max(spec.best_latency),
    }
}
