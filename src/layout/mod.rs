//! Axis planes, tick labels and view-dependent visibility for a 3D plot.
//!
//! - `cube`: data bounds -> display cube, scales and the six faces
//! - `faces`: face pairs with grid lines and tick anchor groups
//! - `labels`: tick and title billboards on the anchor groups
//! - `visibility`: nearest face / nearest anchor selection against a camera

mod cube;
mod faces;
mod labels;
mod visibility;

pub use cube::{BoundingCube, DisplayGraph};
pub use faces::{AnchorGroup, AnchorSlot, Face, FaceAnchors, FaceKind, PlaneSpec, generate_plane};
pub use labels::{AxisLabeler, AxisTitles, Billboard, LabelParams, make_label};
pub use visibility::{CameraPose, Shown, ViewCamera, VisibilitySelector, VisibilityState};
