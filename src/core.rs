use crate::{PlotError, Result};
use bevy_math::Vec3;
use error_stack::Report;
use meval::{Context, ContextProvider, Expr};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
}

impl From<Color> for bevy::prelude::Color {
    #[inline]
    fn from(c: Color) -> Self {
        bevy::prelude::Color::srgba(c.r, c.g, c.b, c.a)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    #[inline]
    pub fn of(self, p: Vec3) -> f32 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
            Axis::Z => p.z,
        }
    }
}

/// Raw 3D samples and their per-axis bounds.
///
/// Bounds are always strictly increasing: an axis on which every sample is equal is
/// widened by one unit on each side.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSet {
    points: Vec<Vec3>,
    low: [f32; 3],
    high: [f32; 3],
}

impl SampleSet {
    pub fn new(points: &[Vec3]) -> Self {
        let points = points.to_vec();
        let mut low = [f32::INFINITY; 3];
        let mut high = [f32::NEG_INFINITY; 3];

        for p in &points {
            for axis in Axis::ALL {
                let v = axis.of(*p);
                if !v.is_finite() {
                    continue;
                }
                let i = axis.index();
                low[i] = low[i].min(v);
                high[i] = high[i].max(v);
            }
        }

        for i in 0..3 {
            // no finite samples on this axis
            if low[i] > high[i] {
                low[i] = 0.0;
                high[i] = 0.0;
            }
            if low[i] == high[i] {
                low[i] -= 1.0;
                high[i] += 1.0;
            }
        }

        debug!(count = points.len(), ?low, ?high, "sample bounds");
        Self { points, low, high }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn low(&self, axis: Axis) -> f32 {
        self.low[axis.index()]
    }

    #[inline]
    pub fn high(&self, axis: Axis) -> f32 {
        self.high[axis.index()]
    }

    /// `[low_x, high_x, low_y, high_y, low_z, high_z]`
    pub fn limits(&self) -> [f32; 6] {
        [
            self.low[0],
            self.high[0],
            self.low[1],
            self.high[1],
            self.low[2],
            self.high[2],
        ]
    }

    /// Affine map of `value` into `[0, 1]` over the bounds of `axis`.
    pub fn normalize(&self, value: f32, axis: Axis) -> f32 {
        let i = axis.index();
        (value - self.low[i]) / (self.high[i] - self.low[i])
    }
}

/// Height-map samples: row `r`, column `c` becomes the point `(c, heights[r][c], r)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceSamples {
    pub samples: SampleSet,
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
}

impl SurfaceSamples {
    pub fn new(heights: &[Vec<f32>]) -> Result<Self> {
        let height = heights.len();
        let width = heights.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(Report::new(PlotError::EmptyHeightMap));
        }
        if let Some(row) = heights.iter().position(|r| r.len() != width) {
            return Err(Report::new(PlotError::RaggedHeightMap { row, expected: width }));
        }

        let mut points = Vec::with_capacity(height * width);
        for (z, row) in heights.iter().enumerate() {
            for (x, &y) in row.iter().enumerate() {
                points.push(Vec3::new(x as f32, y, z as f32));
            }
        }

        Ok(Self {
            samples: SampleSet::new(&points),
            height,
            width,
        })
    }
}

/// Sampling window and resolution for a function plot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionRange {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    /// Window for the function value.
    pub min_z: f32,
    pub max_z: f32,
    pub points_x: usize,
    pub points_y: usize,
}

impl Default for FunctionRange {
    fn default() -> Self {
        Self {
            min_x: -1.0,
            max_x: 1.0,
            min_y: -1.0,
            max_y: 1.0,
            min_z: -1.0,
            max_z: 1.0,
            points_x: 20,
            points_y: 20,
        }
    }
}

struct XyVars {
    x: f64,
    y: f64,
}

impl ContextProvider for XyVars {
    fn get_var(&self, name: &str) -> Option<f64> {
        match name {
            "x" => Some(self.x),
            "y" => Some(self.y),
            _ => None,
        }
    }
}

/// `z = f(x, y)` parsed from an expression string.
#[derive(Clone, Debug)]
pub struct FunctionSamples {
    pub samples: SampleSet,
    pub range: FunctionRange,
    expr: Expr,
}

impl FunctionSamples {
    pub fn new(expression: &str, range: FunctionRange) -> Result<Self> {
        let expr: Expr = expression
            .trim()
            .parse()
            .map_err(|e: meval::Error| Report::new(PlotError::Expression(e.to_string())))?;

        // Reject unknown variables up front rather than on every sample.
        let builtins = Context::new();
        expr.eval_with_context((XyVars { x: 0.0, y: 0.0 }, &builtins))
            .map_err(|e| Report::new(PlotError::Expression(e.to_string())))?;

        let corners = [
            Vec3::new(range.min_x, range.min_y, range.min_z),
            Vec3::new(range.max_x, range.max_y, range.max_z),
        ];
        Ok(Self {
            samples: SampleSet::new(&corners),
            range,
            expr,
        })
    }

    /// `None` when the expression fails or yields a non-finite value.
    pub fn eval(&self, x: f32, y: f32) -> Option<f32> {
        let builtins = Context::new();
        self.expr
            .eval_with_context((
                XyVars {
                    x: x as f64,
                    y: y as f64,
                },
                &builtins,
            ))
            .ok()
            .map(|z| z as f32)
            .filter(|z| z.is_finite())
    }

    /// Parametric grid of `(points_x + 1) * (points_y + 1)` samples, row-major in `y`.
    pub fn grid(&self) -> Vec<Option<Vec3>> {
        let r = &self.range;
        let nx = r.points_x.max(1);
        let ny = r.points_y.max(1);
        let mut out = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            let v = j as f32 / ny as f32;
            let y = r.min_y + v * (r.max_y - r.min_y);
            for i in 0..=nx {
                let u = i as f32 / nx as f32;
                let x = r.min_x + u * (r.max_x - r.min_x);
                out.push(self.eval(x, y).map(|z| Vec3::new(x, y, z)));
            }
        }
        out
    }
}

/// What a plot draws inside its cube.
#[derive(Clone, Debug)]
pub enum PlotContent {
    /// One pickable sphere per sample.
    Spheres(SampleSet),
    Points(SampleSet),
    Surface(SurfaceSamples),
    Function(FunctionSamples),
}

impl PlotContent {
    /// The samples the display cube is built from.
    pub fn samples(&self) -> &SampleSet {
        match self {
            PlotContent::Spheres(s) | PlotContent::Points(s) => s,
            PlotContent::Surface(s) => &s.samples,
            PlotContent::Function(f) => &f.samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn limits_cover_every_point() {
        let pts = vec![
            Vec3::new(-3.0, 2.0, 0.5),
            Vec3::new(4.0, -1.0, 7.0),
            Vec3::new(0.0, 9.0, -2.0),
        ];
        let s = SampleSet::new(&pts);
        let l = s.limits();
        for p in &pts {
            assert!(l[0] <= p.x && p.x <= l[1]);
            assert!(l[2] <= p.y && p.y <= l[3]);
            assert!(l[4] <= p.z && p.z <= l[5]);
        }
        assert_eq!(l, [-3.0, 4.0, -1.0, 9.0, -2.0, 7.0]);
    }

    #[test]
    fn single_point_is_widened() {
        let s = SampleSet::new(&[Vec3::splat(5.0)]);
        assert_eq!(s.limits(), [4.0, 6.0, 4.0, 6.0, 4.0, 6.0]);
    }

    #[test]
    fn empty_set_has_unit_bounds() {
        let s = SampleSet::new(&[]);
        assert!(s.is_empty());
        assert_eq!(s.limits(), [-1.0, 1.0, -1.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn normalize_hits_endpoints() {
        let s = SampleSet::new(&[Vec3::new(2.0, -4.0, 0.0), Vec3::new(6.0, 4.0, 1.0)]);
        assert_eq!(s.normalize(2.0, Axis::X), 0.0);
        assert_eq!(s.normalize(6.0, Axis::X), 1.0);
        assert_eq!(s.normalize(0.0, Axis::Y), 0.5);
        assert_eq!(s.normalize(4.0, Axis::default()), 0.5);
    }

    #[test]
    fn height_map_points() {
        let map = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let s = SurfaceSamples::new(&map).unwrap();
        assert_eq!((s.height, s.width), (2, 3));
        assert_eq!(s.samples.len(), 6);
        assert_eq!(s.samples.points()[4], Vec3::new(1.0, 5.0, 1.0));
        assert_eq!(s.samples.limits(), [0.0, 2.0, 1.0, 6.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_empty_and_ragged_maps() {
        let err = SurfaceSamples::new(&[]).unwrap_err();
        assert!(matches!(err.current_context(), PlotError::EmptyHeightMap));
        let err = SurfaceSamples::new(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(
            err.current_context(),
            PlotError::RaggedHeightMap { row: 1, expected: 2 }
        ));
    }

    #[test]
    fn function_samples_use_range_corners() {
        let f = FunctionSamples::new("x^2 + y", FunctionRange::default()).unwrap();
        assert_eq!(f.samples.limits(), [-1.0, 1.0, -1.0, 1.0, -1.0, 1.0]);
        assert_eq!(f.eval(2.0, 1.0), Some(5.0));
        assert_eq!(f.grid().len(), 21 * 21);
    }

    #[test]
    fn function_non_finite_is_none() {
        let f = FunctionSamples::new("1 / x", FunctionRange::default()).unwrap();
        assert_eq!(f.eval(0.0, 0.0), None);
        assert_eq!(f.eval(0.5, 0.0), Some(2.0));
    }

    #[test]
    fn function_rejects_bad_expressions() {
        assert!(FunctionSamples::new("x +* y", FunctionRange::default()).is_err());
        assert!(FunctionSamples::new("x + w", FunctionRange::default()).is_err());
    }
}
