/// Validation failures raised by rigid alignment and correspondence search.
///
/// All variants are local input problems; retrying with the same inputs can
/// never succeed, so none of them are retried anywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationError {
    /// Fewer points than the operation needs.
    InsufficientPoints { got: usize, needed: usize },
    /// The matched points are collinear or coincident: the cross-covariance
    /// rank dropped below 2 and the rotation is underdetermined.
    DegenerateConfiguration { rank: usize },
    /// Paired operations require equal-length sets.
    LengthMismatch { moving: usize, fixed: usize },
    /// One of the search inputs has no points at all.
    EmptySet { query: usize, reference: usize },
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationError::InsufficientPoints { got, needed } => {
                write!(f, "insufficient points: got {}, need at least {}", got, needed)
            }
            RegistrationError::DegenerateConfiguration { rank } => write!(
                f,
                "degenerate point configuration: covariance rank {} < 2 (collinear or coincident points)",
                rank
            ),
            RegistrationError::LengthMismatch { moving, fixed } => write!(
                f,
                "moving set length ({}) does not match fixed set length ({})",
                moving, fixed
            ),
            RegistrationError::EmptySet { query, reference } => write!(
                f,
                "empty input set: query has {} points, reference has {}",
                query, reference
            ),
        }
    }
}

impl std::error::Error for RegistrationError {}
