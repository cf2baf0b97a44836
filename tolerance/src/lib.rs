/// Tolerances used when validating a PTO orientation frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    /// Largest allowed |dot(y, z)| between unit axes.
    orthogonality: f64,
    /// Norms at or below this are treated as zero.
    degenerate: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            orthogonality: 1e-3,
            degenerate: 1e-12,
        }
    }
}

impl Tolerances {
    pub fn new(orthogonality: f64, degenerate: f64) -> Self {
        Self {
            orthogonality,
            degenerate,
        }
    }

    pub fn orthogonality(&self) -> f64 {
        self.orthogonality
    }

    pub fn degenerate(&self) -> f64 {
        self.degenerate
    }

    /// True if two unit vectors with the given dot product are orthogonal enough.
    pub fn is_orthogonal(&self, dot: f64) -> bool {
        check_orthogonal(dot, self.orthogonality)
    }

    /// True if a vector with this norm cannot be normalized.
    pub fn is_degenerate(&self, norm: f64) -> bool {
        !norm.is_finite() || norm <= self.degenerate
    }
}

pub fn check_orthogonal(dot: f64, tol: f64) -> bool {
    dot.is_finite() && dot.abs() <= tol
}
