//! One-dimensional linear scales with "nice" tick generation.

use serde::{Deserialize, Serialize};

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Affine map from a data domain onto a display range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: [f32; 2],
    range: [f32; 2],
}

impl Default for LinearScale {
    fn default() -> Self {
        Self {
            domain: [0.0, 1.0],
            range: [0.0, 1.0],
        }
    }
}

impl LinearScale {
    pub fn new(domain: [f32; 2], range: [f32; 2]) -> Self {
        Self { domain, range }
    }

    #[inline]
    pub fn domain(mut self, domain: [f32; 2]) -> Self {
        self.domain = domain;
        self
    }

    #[inline]
    pub fn range(mut self, range: [f32; 2]) -> Self {
        self.range = range;
        self
    }

    pub fn domain_bounds(&self) -> [f32; 2] {
        self.domain
    }

    pub fn range_bounds(&self) -> [f32; 2] {
        self.range
    }

    /// Map a domain value into the range. A zero-width domain maps to the range midpoint.
    pub fn apply(&self, value: f32) -> f32 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) * 0.5;
        }
        let t = (value - d0) / span;
        r0 + t * (r1 - r0)
    }

    /// Map a range value back into the domain.
    pub fn invert(&self, value: f32) -> f32 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = r1 - r0;
        if span == 0.0 || !span.is_finite() {
            return (d0 + d1) * 0.5;
        }
        let t = (value - r0) / span;
        d0 + t * (d1 - d0)
    }

    /// Roughly `count` round values covering the domain.
    pub fn ticks(&self, count: usize) -> Vec<f32> {
        ticks(self.domain[0] as f64, self.domain[1] as f64, count)
            .into_iter()
            .map(|t| t as f32)
            .collect()
    }
}

/// Round values between `start` and `stop`, stepping by 1, 2 or 5 times a power of ten.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop && count > 0 {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };

    let step = tick_increment(lo, hi, count);
    if step == 0.0 || !step.is_finite() {
        return Vec::new();
    }

    let mut out = Vec::new();
    if step > 0.0 {
        let first = (lo / step).ceil();
        let last = (hi / step).floor();
        let n = (last - first + 1.0).max(0.0) as usize;
        out.extend((0..n).map(|i| (first + i as f64) * step));
    } else {
        let inv = -step;
        let first = (lo * inv).ceil();
        let last = (hi * inv).floor();
        let n = (last - first + 1.0).max(0.0) as usize;
        out.extend((0..n).map(|i| (first + i as f64) / inv));
    }

    if reverse {
        out.reverse();
    }
    out
}

/// Positive values are the tick step; negative values are the inverse of the step,
/// which keeps sub-unit steps exact when multiplied back.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    if count == 0 {
        return f64::INFINITY;
    }
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Format a tick value for a label.
pub fn format_tick(value: f32) -> String {
    if value.fract() == 0.0 && value.abs() < 1e7 {
        format!("{value:.0}")
    } else {
        let s = format!("{value:.4}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_domain_onto_range() {
        let s = LinearScale::default().domain([0.0, 10.0]).range([-1.0, 1.0]);
        assert_eq!(s.apply(0.0), -1.0);
        assert_eq!(s.apply(10.0), 1.0);
        assert_eq!(s.apply(5.0), 0.0);
        assert_eq!(s.invert(1.0), 10.0);
    }

    #[test]
    fn degenerate_domain_maps_to_midpoint() {
        let s = LinearScale::new([3.0, 3.0], [-2.0, 4.0]);
        assert_eq!(s.apply(3.0), 1.0);
    }

    #[test]
    fn unit_domain_ticks_by_fifths() {
        let t = LinearScale::default().ticks(4);
        assert_eq!(t, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn integer_domain_ticks() {
        assert_eq!(ticks(0.0, 10.0, 4), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks(4.0, 6.0, 4), vec![4.0, 4.5, 5.0, 5.5, 6.0]);
        assert_eq!(ticks(-100.0, 100.0, 4), vec![-100.0, -50.0, 0.0, 50.0, 100.0]);
    }

    #[test]
    fn reversed_domain_ticks_descend() {
        assert_eq!(ticks(10.0, 0.0, 4), vec![10.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
    }

    #[test]
    fn equal_bounds_give_single_tick() {
        assert_eq!(ticks(2.0, 2.0, 4), vec![2.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn tick_labels() {
        assert_eq!(format_tick(2.0), "2");
        assert_eq!(format_tick(-0.5), "-0.5");
        assert_eq!(format_tick(0.2), "0.2");
    }
}
