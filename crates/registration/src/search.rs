use fiducials_core::FiducialSet;
use log::debug;
use rayon::prelude::*;

use crate::enumerate::{pairing_count, pairings};
use crate::error::RegistrationError;
use crate::rigid::{align_points, point_distance, RigidTransform};

/// One matched pair of the winning correspondence: query point
/// `source_index` maps to reference point `target_index`, `distance` is the
/// post-alignment Euclidean residual for that pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correspondence {
    pub source_index: usize,
    pub target_index: usize,
    pub distance: f32,
}

/// Which input of [`search`] played the query (smaller) role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuerySide {
    A,
    B,
}

/// The winning candidate of a correspondence search.
///
/// `transform` maps the query frame onto the reference frame;
/// `correspondences` holds one entry per query point, ordered by
/// `source_index`. `mean_error` is the score the search minimized,
/// `rms_error` the root mean square of the same pair distances.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationResult {
    pub transform: RigidTransform,
    pub correspondences: Vec<Correspondence>,
    pub mean_error: f32,
    pub rms_error: f32,
    pub query_side: QuerySide,
    pub candidates_evaluated: usize,
    pub candidates_skipped: usize,
}

// Above this many candidates, score in parallel batches.
const PARALLEL_MIN_CANDIDATES: u128 = 5_000;
const PARALLEL_BATCH: usize = 4_096;

#[derive(Debug, Clone)]
struct Candidate {
    mean: f32,
    index: usize,
    transform: RigidTransform,
    mapping: Vec<usize>,
}

/// Registers two fiducial sets of unknown correspondence.
///
/// The smaller set becomes the query, the larger the reference; when sizes
/// are equal, `set_a` is the query. The returned transform always maps the
/// query frame onto the reference frame, and [`RegistrationResult::query_side`]
/// records which input that was.
///
/// Every ordered injective mapping of the n query indices into the m
/// reference indices is scored, so the cost is `O(P(m, n) * n)` distance
/// evaluations with `P(m, n) = m!/(m-n)!`. This brute force is exact but
/// only tractable for tens of fiducials; check [`pairing_count`] before
/// calling with anything larger.
///
/// # Errors
///
/// - [`RegistrationError::EmptySet`] if either input is empty.
/// - [`RegistrationError::InsufficientPoints`] if the query has fewer than
///   3 points or the reference is smaller than the query.
/// - [`RegistrationError::DegenerateConfiguration`] if every candidate is
///   degenerate (e.g. a collinear query set).
pub fn search(
    set_a: &FiducialSet,
    set_b: &FiducialSet,
) -> Result<RegistrationResult, RegistrationError> {
    if set_b.len() < set_a.len() {
        let mut result = search_query_reference(set_b, set_a)?;
        result.query_side = QuerySide::B;
        Ok(result)
    } else {
        search_query_reference(set_a, set_b)
    }
}

/// [`search`] with explicit roles: the first argument is always the query.
/// The reported `query_side` is [`QuerySide::A`], meaning "first argument".
///
/// # Errors
///
/// As [`search`], plus [`RegistrationError::InsufficientPoints`] when
/// `reference.len() < query.len()`.
pub fn search_query_reference(
    query: &FiducialSet,
    reference: &FiducialSet,
) -> Result<RegistrationResult, RegistrationError> {
    if query.is_empty() || reference.is_empty() {
        return Err(RegistrationError::EmptySet {
            query: query.len(),
            reference: reference.len(),
        });
    }
    let n = query.len();
    let m = reference.len();
    if n < 3 {
        return Err(RegistrationError::InsufficientPoints { got: n, needed: 3 });
    }
    if m < n {
        return Err(RegistrationError::InsufficientPoints { got: m, needed: n });
    }

    // Pre-extract points into contiguous arrays for the candidate loop.
    let query_pts: Vec<[f32; 3]> = query.iter_points().collect();
    let ref_pts: Vec<[f32; 3]> = reference.iter_points().collect();

    // Score one candidate: Kabsch solve on the matched pairs, then the mean
    // pair distance. Degenerate candidates (collinear/coincident matched
    // points) are excluded from the minimization, not fatal.
    let score = |index: usize, mapping: &[usize]| -> Option<Candidate> {
        let matched: Vec<[f32; 3]> = mapping.iter().map(|&j| ref_pts[j]).collect();
        match align_points(&query_pts, &matched) {
            Ok(transform) => {
                let sum: f32 = query_pts
                    .iter()
                    .zip(&matched)
                    .map(|(p, q)| point_distance(&transform.apply_to_point(p), q))
                    .sum();
                Some(Candidate {
                    mean: sum / n as f32,
                    index,
                    transform,
                    mapping: mapping.to_vec(),
                })
            }
            Err(err) => {
                debug!("skipping candidate {}: {}", index, err);
                None
            }
        }
    };

    let total = pairing_count(m, n);
    let use_parallel = total.map_or(true, |t| t >= PARALLEL_MIN_CANDIDATES);

    let mut best: Option<Candidate> = None;
    let mut evaluated = 0usize;
    let mut skipped = 0usize;

    if use_parallel {
        // Enumerate in fixed-size batches; score each batch with rayon and
        // reduce by (mean, enumeration index) so the first-in-order
        // tie-break survives the parallel reduction.
        let mut batch: Vec<(usize, Vec<usize>)> = Vec::with_capacity(PARALLEL_BATCH);
        let flush = |batch: &mut Vec<(usize, Vec<usize>)>,
                     best: &mut Option<Candidate>,
                     skipped: &mut usize| {
            let (batch_best, batch_skipped) = batch
                .par_iter()
                .map(|(index, mapping)| match score(*index, mapping) {
                    Some(c) => (Some(c), 0usize),
                    None => (None, 1),
                })
                .reduce(
                    || (None, 0),
                    |a, b| (merge(a.0, b.0), a.1 + b.1),
                );
            *best = merge(best.take(), batch_best);
            *skipped += batch_skipped;
            batch.clear();
        };

        for (index, mapping) in pairings(m, n).enumerate() {
            batch.push((index, mapping));
            evaluated += 1;
            if batch.len() == PARALLEL_BATCH {
                flush(&mut batch, &mut best, &mut skipped);
            }
        }
        if !batch.is_empty() {
            flush(&mut batch, &mut best, &mut skipped);
        }
    } else {
        for (index, mapping) in pairings(m, n).enumerate() {
            evaluated += 1;
            match score(index, &mapping) {
                Some(c) => best = merge(best, Some(c)),
                None => skipped += 1,
            }
        }
    }

    let Some(winner) = best else {
        // Every candidate was degenerate; surface the failure of the first
        // one (lowest enumeration index) so the error is deterministic.
        let first: Vec<usize> = (0..n).collect();
        let matched: Vec<[f32; 3]> = first.iter().map(|&j| ref_pts[j]).collect();
        let err = align_points(&query_pts, &matched)
            .err()
            .unwrap_or(RegistrationError::DegenerateConfiguration { rank: 0 });
        return Err(err);
    };

    let mut correspondences = Vec::with_capacity(n);
    let mut sum = 0.0f32;
    let mut sum_sq = 0.0f32;
    for (i, &j) in winner.mapping.iter().enumerate() {
        let tp = winner.transform.apply_to_point(&query_pts[i]);
        let d = point_distance(&tp, &ref_pts[j]);
        correspondences.push(Correspondence {
            source_index: i,
            target_index: j,
            distance: d,
        });
        sum += d;
        sum_sq += d * d;
    }

    Ok(RegistrationResult {
        transform: winner.transform,
        correspondences,
        mean_error: sum / n as f32,
        rms_error: (sum_sq / n as f32).sqrt(),
        query_side: QuerySide::A,
        candidates_evaluated: evaluated,
        candidates_skipped: skipped,
    })
}

/// Keep the candidate with the lower mean; ties go to the lower enumeration
/// index.
fn merge(a: Option<Candidate>, b: Option<Candidate>) -> Option<Candidate> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if b.mean < a.mean || (b.mean == a.mean && b.index < a.index) {
                Some(b)
            } else {
                Some(a)
            }
        }
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}
