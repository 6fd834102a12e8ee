//! Mesh exporters. PLY is always available, STL sits behind the `stl-io` feature.

mod ply;

#[cfg(feature = "stl-io")]
mod stl;

pub use ply::write_ply_ascii;

#[cfg(feature = "stl-io")]
pub use stl::{to_stl_ascii, to_stl_binary};

/// Export errors.
#[derive(Debug)]
pub enum IoError {
    StdIo(std::io::Error),

    /// The mesh still holds dead slots; run `garbage_collect` first.
    NotCompact { dead_vertices: usize, dead_triangles: usize },
    /// More vertices than a 32-bit face index can address.
    TooManyVertices(usize),
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use IoError::*;

        match self {
            StdIo(error) => write!(f, "std::io::Error: {error}"),

            NotCompact {
                dead_vertices,
                dead_triangles,
            } => write!(
                f,
                "Mesh is not compact: {dead_vertices} dead vertices, \
                 {dead_triangles} dead triangles"
            ),
            TooManyVertices(count) => {
                write!(f, "Mesh has {count} vertices, more than a face index can address")
            },
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::StdIo(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(value: std::io::Error) -> Self {
        Self::StdIo(value)
    }
}
