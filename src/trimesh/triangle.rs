//! The index triple stored for every triangle of a [`TriMesh`](super::TriMesh).

/// Three vertex names. Order is significant for the face normal (right-hand rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Triangle {
    pub v: [usize; 3],
}

impl Triangle {
    #[inline]
    pub const fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Triangle { v: [v0, v1, v2] }
    }

    /// Position of `vertex` inside the index triple, if present.
    #[inline]
    pub fn index_of(&self, vertex: usize) -> Option<usize> {
        self.v.iter().position(|&x| x == vertex)
    }

    #[inline]
    pub fn contains(&self, vertex: usize) -> bool {
        self.v.contains(&vertex)
    }

    /// True when two corners name the same vertex.
    #[inline]
    pub const fn is_degenerate(&self) -> bool {
        self.v[0] == self.v[1] || self.v[1] == self.v[2] || self.v[2] == self.v[0]
    }

    /// Replace the first occurrence of `from` with `to`. Returns whether a corner changed.
    #[inline]
    pub fn replace(&mut self, from: usize, to: usize) -> bool {
        match self.index_of(from) {
            Some(k) => {
                self.v[k] = to;
                true
            },
            None => false,
        }
    }

    /// Directed edges `(v0, v1)`, `(v1, v2)`, `(v2, v0)`.
    pub fn edges(&self) -> [(usize, usize); 3] {
        [(self.v[0], self.v[1]), (self.v[1], self.v[2]), (self.v[2], self.v[0])]
    }
}

impl From<[usize; 3]> for Triangle {
    fn from(v: [usize; 3]) -> Self {
        Triangle { v }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_can_collapse_a_triangle() {
        let mut tri = Triangle::new(4, 7, 9);
        assert!(!tri.is_degenerate());
        assert!(tri.replace(7, 9));
        assert_eq!(tri.v, [4, 9, 9]);
        assert!(tri.is_degenerate());
        assert!(!tri.replace(7, 1));
    }
}
