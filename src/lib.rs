//! Garbage-collected **indexed triangle meshes**, **isosurface extraction** from
//! sampled density fields, and **geodesic transport** of points and particles
//! across the extracted surfaces.
//!
//! The pieces fit together as:
//! 1. a density field (a closure, or a [`Solid`](solid::Solid) grid) is contoured
//!    by [`isocontour`](algorithm::isocontour) into a [`TriMesh`](trimesh::TriMesh)
//! 2. the mesh is cleaned up with [`repair_mesh_vertices`](algorithm::repair_mesh_vertices),
//!    split with [`connected_components`](algorithm::connected_components), shaded with
//!    [`estimate_normals`](algorithm::estimate_normals)
//! 3. [`SurfaceCoordinate`](surface::SurfaceCoordinate)s and
//!    [`SurfaceParticle`](surface::SurfaceParticle)s walk on it
//! 4. the mesh is exported as flat [buffers](trimesh::TriMesh::buffers), PLY or STL
//!
//! Densities are **negative inside** and positive outside.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` export
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to sample [`Solid`](solid::Solid) cells

#![forbid(unsafe_code)]
#![warn(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod algorithm;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod shapes;
pub mod solid;
pub mod spatial_grid;
pub mod surface;
pub mod trimesh;
pub mod vertex;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::{MeshError, SolidError};
pub use solid::{Cell, Solid};
pub use surface::{Surface, SurfaceCoordinate, SurfaceParticle};
pub use trimesh::{MeshBuffers, TriMesh, Triangle};
pub use vertex::{HasNormal, HasPosition, Vertex};
