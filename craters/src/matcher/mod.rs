//! Pairing of bright contours with dark contours into crater candidates.
//!
//! Every contour is reduced to its minimum enclosing circle, read as a point
//! `(x, y, radius)`; the distance between two contours is the Euclidean
//! distance between those points. Both strategies evaluate all `n * m` pairs,
//! which is fine for the tens to hundreds of contours one image produces but
//! has no spatial index to scale beyond that.

mod assignment;


pub use assignment::min_cost_assignment;

use glam::DVec2;

use crate::config::{MatchConfig, MatchStrategy};
use crate::error::{Error, Result};
use crate::report::Reporter;
use crate::vision::{min_enclosing_circle, Contour};

/// Matching key of a contour: its enclosing circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourFeature {
    pub center: DVec2,
    pub radius: f64,
}

impl ContourFeature {
    pub fn of(contour: &Contour) -> Self {
        let circle = min_enclosing_circle(contour.points());
        Self {
            center: circle.center,
            radius: circle.radius,
        }
    }

    /// Distance in `(x, y, radius)` space.
    pub fn distance(&self, other: &ContourFeature) -> f64 {
        let dr = self.radius - other.radius;
        (self.center.distance_squared(other.center) + dr * dr).sqrt()
    }
}

/// A bright contour, the dark contour it was paired with, and their union.
///
/// The combined contour holds the bright points followed by the dark ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraterCandidate {
    high: Contour,
    low: Contour,
    combined: Contour,
}

impl CraterCandidate {
    pub fn new(high: Contour, low: Contour) -> Self {
        let combined = high.concat(&low);
        Self {
            high,
            low,
            combined,
        }
    }

    pub fn high(&self) -> &Contour {
        &self.high
    }

    pub fn low(&self) -> &Contour {
        &self.low
    }

    pub fn combined(&self) -> &Contour {
        &self.combined
    }
}

/// Candidates in bright-contour order, with the `(bright, dark)` index pair
/// each one was built from.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub candidates: Vec<CraterCandidate>,
    pub pairs: Vec<(usize, usize)>,
}

/// Pairs bright contours (`high`) with dark contours (`low`).
///
/// Fails with [`Error::NoDarkContours`] when `low` is empty and with
/// [`Error::NoBrightContours`] when `high` is empty, in that order.
pub fn match_contours(
    high: &[Contour],
    low: &[Contour],
    config: &MatchConfig,
    reporter: &dyn Reporter,
) -> Result<MatchOutcome> {
    if low.is_empty() {
        return Err(Error::NoDarkContours);
    }
    if high.is_empty() {
        return Err(Error::NoBrightContours);
    }

    let high_features: Vec<ContourFeature> = high.iter().map(ContourFeature::of).collect();
    let low_features: Vec<ContourFeature> = low.iter().map(ContourFeature::of).collect();

    let pairs = match config.strategy {
        MatchStrategy::Greedy => greedy_pairs(&high_features, &low_features),
        MatchStrategy::OneToOne => {
            let pairs = one_to_one_pairs(&high_features, &low_features);
            let unmatched = high.len() - pairs.len();
            if unmatched > 0 {
                reporter.warn(format_args!(
                    "{unmatched} of {} bright contours left without a dark partner",
                    high.len()
                ));
            }
            pairs
        }
    };

    let candidates = pairs
        .iter()
        .map(|&(i, j)| CraterCandidate::new(high[i].clone(), low[j].clone()))
        .collect();
    reporter.debug(format_args!(
        "matched {} bright against {} dark contours ({}): {} candidates",
        high.len(),
        low.len(),
        config.strategy,
        pairs.len()
    ));

    Ok(MatchOutcome { candidates, pairs })
}

/// Nearest dark contour for every bright one. Ties keep the lowest dark index.
fn greedy_pairs(high: &[ContourFeature], low: &[ContourFeature]) -> Vec<(usize, usize)> {
    high.iter()
        .enumerate()
        .map(|(i, h)| {
            let mut best = 0;
            let mut best_distance = h.distance(&low[0]);
            for (j, l) in low.iter().enumerate().skip(1) {
                let distance = h.distance(l);
                if distance < best_distance {
                    best = j;
                    best_distance = distance;
                }
            }
            (i, best)
        })
        .collect()
}

fn one_to_one_pairs(high: &[ContourFeature], low: &[ContourFeature]) -> Vec<(usize, usize)> {
    let cost: Vec<f64> = high
        .iter()
        .flat_map(|h| low.iter().map(move |l| h.distance(l)))
        .collect();
    min_cost_assignment(&cost, high.len(), low.len())
        .into_iter()
        .enumerate()
        .filter_map(|(i, j)| j.map(|j| (i, j)))
        .collect()
}
