//! Mesh builders for the plot content and the face decorations.

use crate::colormap::shade;
use crate::config::StyleConfig;
use crate::core::{Axis, Color, FunctionSamples, SampleSet, SurfaceSamples};
use crate::layout::{DisplayGraph, Face};
use bevy::prelude::{Mesh, Rectangle, Vec3};
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use tracing::debug;

/// Function vertices this far outside the plotted window still count as inside.
const BOUNDS_TOLERANCE: f32 = 0.0005;

/// Indexed triangle list with per-vertex colors, kept as plain data until it
/// is turned into a [`Mesh`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl TriangleGeometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn into_mesh(self) -> Mesh {
        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals)
            .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, self.colors)
            .with_inserted_indices(Indices::U32(self.indices))
    }
}

/// Translucent background of a face, in face-local coordinates.
pub fn face_quad_mesh(face: &Face) -> Mesh {
    Mesh::from(Rectangle::new(face.size.x, face.size.y))
}

pub fn grid_lines_mesh(face: &Face) -> Mesh {
    let positions: Vec<[f32; 3]> = face
        .grid
        .iter()
        .flat_map(|[a, b]| [a.to_array(), b.to_array()])
        .collect();
    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

/// A rendered sample and the data point it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpherePoint {
    /// Root-space position.
    pub position: Vec3,
    pub original: Vec3,
}

pub fn sphere_points(graph: &DisplayGraph, samples: &SampleSet) -> Vec<SpherePoint> {
    samples
        .points()
        .iter()
        .map(|&p| SpherePoint {
            position: graph.normalized_point(p),
            original: p,
        })
        .collect()
}

/// Sphere radius in root space; constant on screen whatever the data extent.
pub fn sphere_radius(graph: &DisplayGraph, style: &StyleConfig) -> f32 {
    style.sphere_radius / graph.scale_factor
}

pub fn point_cloud_mesh(graph: &DisplayGraph, samples: &SampleSet) -> Mesh {
    let positions: Vec<[f32; 3]> = samples
        .points()
        .iter()
        .map(|&p| graph.normalized_point(p).to_array())
        .collect();
    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

/// Surface of `z = f(x, y)` over the function window. Vertices that failed to
/// evaluate or fall outside the window drop every triangle touching them.
/// Colored by the normalized function value.
pub fn function_geometry(graph: &DisplayGraph, function: &FunctionSamples, colors: &[Color]) -> TriangleGeometry {
    let r = &function.range;
    let nx = r.points_x.max(1);
    let ny = r.points_y.max(1);
    let cols = nx + 1;

    let window = [
        window(graph, Axis::X, r.min_x, r.max_x),
        window(graph, Axis::Y, r.min_y, r.max_y),
        window(graph, Axis::Z, r.min_z, r.max_z),
    ];

    let grid = function.grid();
    let mut geo = TriangleGeometry::default();
    let mut valid = Vec::with_capacity(grid.len());
    for sample in &grid {
        match sample {
            Some(p) => {
                let display = graph.normalized_point(*p);
                let inside = Axis::ALL.into_iter().all(|axis| {
                    let v = display_coord(display, axis);
                    let [lo, hi] = window[axis.index()];
                    v >= lo - BOUNDS_TOLERANCE && v <= hi + BOUNDS_TOLERANCE
                });
                let t = function.samples.normalize(p.z, Axis::Z);
                geo.positions.push(display.to_array());
                geo.colors.push(shade(colors, t).to_array());
                valid.push(inside);
            }
            None => {
                geo.positions.push([0.0; 3]);
                geo.colors.push(Color::WHITE.to_array());
                valid.push(false);
            }
        }
    }

    for j in 0..ny {
        for i in 0..nx {
            let i0 = j * cols + i;
            let i1 = i0 + 1;
            let i2 = i0 + cols;
            let i3 = i2 + 1;
            for tri in [[i0, i2, i1], [i1, i2, i3]] {
                if tri.iter().all(|&k| valid[k]) {
                    geo.indices.extend(tri.map(|k| k as u32));
                }
            }
        }
    }

    geo.normals = smooth_normals(&geo.positions, &geo.indices);
    debug!(
        vertices = geo.positions.len(),
        triangles = geo.triangle_count(),
        "function surface"
    );
    geo
}

/// Height-field surface: one vertex per sample, two triangles per cell, colored
/// by the normalized height.
pub fn surface_geometry(graph: &DisplayGraph, surface: &SurfaceSamples, colors: &[Color]) -> TriangleGeometry {
    let (w, h) = (surface.width, surface.height);
    let samples = &surface.samples;

    let mut geo = TriangleGeometry {
        positions: Vec::with_capacity(w * h),
        colors: Vec::with_capacity(w * h),
        indices: Vec::with_capacity(w.saturating_sub(1) * h.saturating_sub(1) * 6),
        ..TriangleGeometry::default()
    };
    for &p in samples.points() {
        geo.positions.push(graph.normalized_point(p).to_array());
        geo.colors
            .push(shade(colors, samples.normalize(p.y, Axis::Y)).to_array());
    }

    for y in 0..h.saturating_sub(1) {
        for x in 0..w.saturating_sub(1) {
            let i0 = (y * w + x) as u32;
            let i1 = i0 + 1;
            let i2 = i0 + w as u32;
            let i3 = i2 + 1;
            geo.indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }

    geo.normals = smooth_normals(&geo.positions, &geo.indices);
    geo
}

/// Display-space interval covered by `[lo, hi]` on a data axis.
fn window(graph: &DisplayGraph, axis: Axis, lo: f32, hi: f32) -> [f32; 2] {
    let scale = graph.scale(axis);
    let (a, b) = (scale.apply(lo), scale.apply(hi));
    [a.min(b), a.max(b)]
}

/// Display coordinate carrying the given data axis.
fn display_coord(display: Vec3, axis: Axis) -> f32 {
    match axis {
        Axis::X => display.z,
        Axis::Y => display.y,
        Axis::Z => display.x,
    }
}

fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    let pos = |i: usize| Vec3::from_array(positions[i]);

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let n = (pos(b) - pos(a)).cross(pos(c) - pos(a));
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }

    normals
        .into_iter()
        .map(|n| n.normalize_or_zero().to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::lookup;
    use crate::core::FunctionRange;
    use crate::layout::{BoundingCube, FaceKind};
    use bevy_mesh::VertexAttributeValues;
    use pretty_assertions::assert_eq;

    fn viridis() -> Vec<Color> {
        lookup("viridis", 72).unwrap()
    }

    #[test]
    fn surface_has_two_triangles_per_cell() {
        let s = SurfaceSamples::new(&[vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]]).unwrap();
        let g = BoundingCube::build(&s.samples);
        let geo = surface_geometry(&g, &s, &viridis());
        assert_eq!(geo.positions.len(), 6);
        assert_eq!(geo.triangle_count(), 4);
        assert_eq!(&geo.indices[..6], &[0, 3, 1, 1, 3, 4]);
        assert_eq!(geo.normals.len(), 6);
    }

    #[test]
    fn surface_colors_follow_height() {
        let s = SurfaceSamples::new(&[vec![0.0, 10.0]]).unwrap();
        let g = BoundingCube::build(&s.samples);
        let colors = viridis();
        let geo = surface_geometry(&g, &s, &colors);
        assert_eq!(geo.colors[0], colors[0].to_array());
        assert_eq!(geo.colors[1], colors[71].to_array());
        assert_eq!(geo.triangle_count(), 0);
    }

    #[test]
    fn function_grid_is_complete_when_inside() {
        let range = FunctionRange {
            points_x: 4,
            points_y: 3,
            ..FunctionRange::default()
        };
        let f = FunctionSamples::new("x * y", range).unwrap();
        let g = BoundingCube::build(&f.samples);
        let geo = function_geometry(&g, &f, &viridis());
        assert_eq!(geo.positions.len(), 5 * 4);
        assert_eq!(geo.triangle_count(), 4 * 3 * 2);
    }

    #[test]
    fn function_drops_triangles_out_of_window() {
        let range = FunctionRange {
            points_x: 2,
            points_y: 2,
            min_z: -0.5,
            max_z: 0.5,
            ..FunctionRange::default()
        };
        // 2x exceeds the z window at both x ends
        let f = FunctionSamples::new("2 * x", range).unwrap();
        let g = BoundingCube::build(&f.samples);
        let geo = function_geometry(&g, &f, &viridis());
        assert_eq!(geo.positions.len(), 9);
        assert_eq!(geo.triangle_count(), 0);
    }

    #[test]
    fn function_drops_triangles_at_poles() {
        let range = FunctionRange {
            points_x: 2,
            points_y: 2,
            min_z: -100.0,
            max_z: 100.0,
            ..FunctionRange::default()
        };
        // non-finite at the centre vertex only
        let f = FunctionSamples::new("1 / (x * x + y * y)", range).unwrap();
        let g = BoundingCube::build(&f.samples);
        let geo = function_geometry(&g, &f, &viridis());
        // only the two corner triangles avoid the centre
        assert_eq!(geo.triangle_count(), 2);
        assert!(geo.indices.iter().all(|&i| i != 4));
    }

    #[test]
    fn spheres_keep_original_points() {
        let samples = SampleSet::new(&[Vec3::ZERO, Vec3::ONE]);
        let g = BoundingCube::build(&samples);
        let spheres = sphere_points(&g, &samples);
        assert_eq!(spheres[1].original, Vec3::ONE);
        assert_eq!(spheres[1].position, Vec3::splat(0.5));
        assert!((sphere_radius(&g, &StyleConfig::default()) - 0.03).abs() < 1e-6);
    }

    #[test]
    fn point_cloud_and_grid_lines() {
        let samples = SampleSet::new(&[Vec3::ZERO, Vec3::ONE, Vec3::splat(0.5)]);
        let g = BoundingCube::build(&samples);
        let cloud = point_cloud_mesh(&g, &samples);
        assert_eq!(cloud.primitive_topology(), PrimitiveTopology::PointList);
        assert_eq!(cloud.count_vertices(), 3);

        let face = g.face(FaceKind::Front);
        let lines = grid_lines_mesh(face);
        assert_eq!(lines.count_vertices(), face.grid.len() * 2);
        match lines.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(v)) => assert_eq!(v[0], face.grid[0][0].to_array()),
            other => panic!("unexpected attribute {other:?}"),
        }
    }

    #[test]
    fn geometry_converts_to_mesh() {
        let s = SurfaceSamples::new(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let g = BoundingCube::build(&s.samples);
        let mesh = surface_geometry(&g, &s, &viridis()).into_mesh();
        assert_eq!(mesh.count_vertices(), 4);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(6));
        assert!(mesh.attribute(Mesh::ATTRIBUTE_COLOR).is_some());
    }
}
