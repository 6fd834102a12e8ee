//! Algorithms over [`TriMesh`](crate::trimesh::TriMesh)

/// Isosurface extraction from a sampled density field
pub mod contour;

/// Vertex welding
pub mod repair;

/// Connected component splitting
pub mod components;

/// Vertex normal estimation
pub mod normals;

/// Manifold validation, volume and area
pub mod manifold;

pub use components::connected_components;
pub use contour::isocontour;
pub use manifold::{
    ManifoldAnalysis, analyze_manifold, edge_triangle_counts, signed_volume, surface_area,
};
pub use normals::estimate_normals;
pub use repair::repair_mesh_vertices;
