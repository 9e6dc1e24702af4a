use nalgebra::{Matrix3, Vector3, SVD};

use fiducials_core::FiducialSet;

use crate::error::RegistrationError;

/// A rotation (orthonormal, det = +1) plus translation, mapping the "moving"
/// frame onto the "fixed" frame. Rotation is row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub rotation: [[f32; 3]; 3],
    pub translation: [f32; 3],
}

impl RigidTransform {
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0, 0.0, 0.0],
        }
    }

    pub fn is_identity(&self, eps: f32) -> bool {
        let id = Self::identity();
        for r in 0..3 {
            for c in 0..3 {
                if (self.rotation[r][c] - id.rotation[r][c]).abs() > eps {
                    return false;
                }
            }
        }
        for a in 0..3 {
            if self.translation[a].abs() > eps {
                return false;
            }
        }
        true
    }

    /// Checks the rotation invariant: R * R^T within `eps` of the identity
    /// and det(R) within `eps` of +1 (proper rotation, no reflection).
    pub fn is_orthonormal(&self, eps: f32) -> bool {
        let r = mat3_from_arrays(&self.rotation);
        let rrt = r * r.transpose();
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == col { 1.0 } else { 0.0 };
                if (rrt[(row, col)] - expected).abs() > eps {
                    return false;
                }
            }
        }
        (r.determinant() - 1.0).abs() <= eps
    }

    /// Apply the rigid transform to a single point: R * p + t
    pub fn apply_to_point(&self, p: &[f32; 3]) -> [f32; 3] {
        let r = &self.rotation;
        let t = &self.translation;
        [
            r[0][0] * p[0] + r[0][1] * p[1] + r[0][2] * p[2] + t[0],
            r[1][0] * p[0] + r[1][1] * p[1] + r[1][2] * p[2] + t[1],
            r[2][0] * p[0] + r[2][1] * p[1] + r[2][2] * p[2] + t[2],
        ]
    }

    /// Compose two transforms: apply `self` first, then `other`.
    ///
    /// Result: R_new = other.R * self.R, t_new = other.R * self.t + other.t
    pub fn compose(&self, other: &RigidTransform) -> RigidTransform {
        let r_self = mat3_from_arrays(&self.rotation);
        let r_other = mat3_from_arrays(&other.rotation);
        let t_self = Vector3::new(
            self.translation[0],
            self.translation[1],
            self.translation[2],
        );
        let t_other = Vector3::new(
            other.translation[0],
            other.translation[1],
            other.translation[2],
        );

        let r_new = r_other * r_self;
        let t_new = r_other * t_self + t_other;

        RigidTransform {
            rotation: mat3_to_arrays(&r_new),
            translation: [t_new[0], t_new[1], t_new[2]],
        }
    }

    /// The inverse mapping, from the fixed frame back to the moving frame:
    /// R_inv = R^T, t_inv = -R^T * t.
    pub fn inverse(&self) -> RigidTransform {
        let rt = mat3_from_arrays(&self.rotation).transpose();
        let t = Vector3::new(
            self.translation[0],
            self.translation[1],
            self.translation[2],
        );
        let t_inv = -(rt * t);

        RigidTransform {
            rotation: mat3_to_arrays(&rt),
            translation: [t_inv[0], t_inv[1], t_inv[2]],
        }
    }
}

/// Apply a rigid transform to all points in a set, returning a new set.
/// Labels ride along unchanged.
pub fn apply_transform(set: &FiducialSet, transform: &RigidTransform) -> FiducialSet {
    let n = set.len();
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    let mut z = Vec::with_capacity(n);

    for i in 0..n {
        let p = [set.x[i], set.y[i], set.z[i]];
        let tp = transform.apply_to_point(&p);
        x.push(tp[0]);
        y.push(tp[1]);
        z.push(tp[2]);
    }

    let mut out = FiducialSet::from_xyz(x, y, z);
    out.labels = set.labels.clone();
    out
}

/// Least-squares rigid alignment of two equal-length point slices with
/// assumed index-wise correspondence (absolute orientation / Kabsch).
///
/// Returns the transform mapping `moving` onto `fixed` that minimizes the
/// sum of squared residuals. Requires at least 3 non-collinear point pairs;
/// the centroid / cross-covariance / SVD sequence runs in f64 for numerical
/// stability, with a reflection correction so det(R) = +1.
///
/// # Errors
///
/// - [`RegistrationError::LengthMismatch`] if the slices differ in length.
/// - [`RegistrationError::InsufficientPoints`] for fewer than 3 pairs.
/// - [`RegistrationError::DegenerateConfiguration`] when the cross-covariance
///   rank is below 2 (collinear or coincident points), which leaves the
///   rotation underdetermined.
pub fn align_points(
    moving: &[[f32; 3]],
    fixed: &[[f32; 3]],
) -> Result<RigidTransform, RegistrationError> {
    if moving.len() != fixed.len() {
        return Err(RegistrationError::LengthMismatch {
            moving: moving.len(),
            fixed: fixed.len(),
        });
    }
    let n = moving.len();
    if n < 3 {
        return Err(RegistrationError::InsufficientPoints { got: n, needed: 3 });
    }

    let mut mov_centroid = Vector3::<f64>::zeros();
    let mut fix_centroid = Vector3::<f64>::zeros();
    for (p, q) in moving.iter().zip(fixed) {
        mov_centroid += vec3_f64(p);
        fix_centroid += vec3_f64(q);
    }
    let n_f = n as f64;
    mov_centroid /= n_f;
    fix_centroid /= n_f;

    // Cross-covariance H = sum (mov_i - mov_centroid)(fix_i - fix_centroid)^T
    let mut h = Matrix3::<f64>::zeros();
    for (p, q) in moving.iter().zip(fixed) {
        let mp = vec3_f64(p) - mov_centroid;
        let fp = vec3_f64(q) - fix_centroid;
        h += mp * fp.transpose();
    }

    let svd = SVD::new(h, true, true);
    let u = svd.u.expect("SVD should produce U matrix");
    let mut v_t = svd.v_t.expect("SVD should produce V^T matrix");

    // Rank of H: singular values above a relative tolerance of the largest.
    // Non-finite coordinates also land here, since their singular values
    // never pass the comparison.
    let max_sv = svd.singular_values.iter().fold(0.0_f64, |a, &s| a.max(s));
    let tol = max_sv * 1e-9;
    let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
    if rank < 2 {
        return Err(RegistrationError::DegenerateConfiguration { rank });
    }

    // Handle reflection: if det(V * U^T) < 0, negate the singular vector of
    // the smallest singular value so the result stays a proper rotation.
    let v = v_t.transpose();
    let det = (v * u.transpose()).determinant();
    if det < 0.0 {
        let min_idx = (0..3).fold(0, |best, i| {
            if svd.singular_values[i] < svd.singular_values[best] {
                i
            } else {
                best
            }
        });
        for c in 0..3 {
            v_t[(min_idx, c)] = -v_t[(min_idx, c)];
        }
    }

    let rotation = v_t.transpose() * u.transpose();
    let translation = fix_centroid - rotation * mov_centroid;

    Ok(RigidTransform {
        rotation: mat3_f64_to_arrays(&rotation),
        translation: [
            translation[0] as f32,
            translation[1] as f32,
            translation[2] as f32,
        ],
    })
}

/// [`align_points`] over whole fiducial sets, index `i` of `moving` assumed
/// to correspond to index `i` of `fixed`.
pub fn align_paired(
    moving: &FiducialSet,
    fixed: &FiducialSet,
) -> Result<RigidTransform, RegistrationError> {
    let mov: Vec<[f32; 3]> = moving.iter_points().collect();
    let fix: Vec<[f32; 3]> = fixed.iter_points().collect();
    align_points(&mov, &fix)
}

/// Mean Euclidean distance between transformed `moving` points and their
/// index-wise partners in `fixed`. Empty pairs yield 0.0.
///
/// # Errors
///
/// [`RegistrationError::LengthMismatch`] if the sets differ in length.
pub fn mean_residual(
    moving: &FiducialSet,
    fixed: &FiducialSet,
    transform: &RigidTransform,
) -> Result<f32, RegistrationError> {
    let distances = pair_distances(moving, fixed, transform)?;
    if distances.is_empty() {
        return Ok(0.0);
    }
    Ok(distances.iter().sum::<f32>() / distances.len() as f32)
}

/// Root mean square of the same per-pair distances as [`mean_residual`].
///
/// # Errors
///
/// [`RegistrationError::LengthMismatch`] if the sets differ in length.
pub fn rms_residual(
    moving: &FiducialSet,
    fixed: &FiducialSet,
    transform: &RigidTransform,
) -> Result<f32, RegistrationError> {
    let distances = pair_distances(moving, fixed, transform)?;
    if distances.is_empty() {
        return Ok(0.0);
    }
    let sum_sq: f32 = distances.iter().map(|d| d * d).sum();
    Ok((sum_sq / distances.len() as f32).sqrt())
}

fn pair_distances(
    moving: &FiducialSet,
    fixed: &FiducialSet,
    transform: &RigidTransform,
) -> Result<Vec<f32>, RegistrationError> {
    if moving.len() != fixed.len() {
        return Err(RegistrationError::LengthMismatch {
            moving: moving.len(),
            fixed: fixed.len(),
        });
    }

    Ok(moving
        .iter_points()
        .zip(fixed.iter_points())
        .map(|(p, q)| point_distance(&transform.apply_to_point(&p), &q))
        .collect())
}

#[inline]
pub(crate) fn point_distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

#[inline]
fn vec3_f64(p: &[f32; 3]) -> Vector3<f64> {
    Vector3::new(p[0] as f64, p[1] as f64, p[2] as f64)
}

/// Convert a nalgebra Matrix3 to a [[f32; 3]; 3] array (row-major).
fn mat3_to_arrays(m: &Matrix3<f32>) -> [[f32; 3]; 3] {
    [
        [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
        [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
        [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
    ]
}

fn mat3_f64_to_arrays(m: &Matrix3<f64>) -> [[f32; 3]; 3] {
    [
        [m[(0, 0)] as f32, m[(0, 1)] as f32, m[(0, 2)] as f32],
        [m[(1, 0)] as f32, m[(1, 1)] as f32, m[(1, 2)] as f32],
        [m[(2, 0)] as f32, m[(2, 1)] as f32, m[(2, 2)] as f32],
    ]
}

/// Convert a [[f32; 3]; 3] array to a nalgebra Matrix3.
fn mat3_from_arrays(a: &[[f32; 3]; 3]) -> Matrix3<f32> {
    Matrix3::new(
        a[0][0], a[0][1], a[0][2], a[1][0], a[1][1], a[1][2], a[2][0], a[2][1], a[2][2],
    )
}
