use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use fiducials_core::FiducialSet;

/// Parameters for synthetic registration test cases.
///
/// The defaults reproduce the classic fiducial scenario: 8 base points in a
/// cube of side 100 centered at the origin, a 6-point reference with
/// per-coordinate Gaussian noise of standard deviation 3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    /// Number of base points.
    pub point_count: usize,
    /// Side length of the cube the base points are drawn from.
    pub scale: f32,
    /// Per-coordinate Gaussian noise standard deviation for the sampled set.
    pub sigma: f32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            point_count: 8,
            scale: 100.0,
            sigma: 3.0,
        }
    }
}

/// A generated case: `sampled[i]` is a noisy copy of `base[mapping[i]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticCase {
    pub base: FiducialSet,
    pub sampled: FiducialSet,
    /// Ground-truth correspondence from sampled index to base index.
    pub mapping: Vec<usize>,
}

/// Generates a synthetic case with a random (non-deterministic) seed. For
/// reproducible cases, use [`generate_seeded`] instead.
pub fn generate(params: &SynthParams) -> SyntheticCase {
    let seed = rand::thread_rng().next_u64();
    generate_seeded(params, seed)
}

/// Generates a synthetic registration case deterministically from a seed.
///
/// Base points are uniform in the cube `[-scale/2, scale/2]^3` and labeled
/// `F-1` through `F-k`. The sampled set takes `point_count - 2` of them in
/// shuffled order and perturbs every coordinate with independent Gaussian
/// noise of standard deviation `sigma`. Labels follow their source points,
/// and the returned mapping lets tests check correspondence recovery.
pub fn generate_seeded(params: &SynthParams, seed: u64) -> SyntheticCase {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0f32, params.sigma)
        .expect("sigma must be non-negative and finite");

    let count = params.point_count;
    let mut x = Vec::with_capacity(count);
    let mut y = Vec::with_capacity(count);
    let mut z = Vec::with_capacity(count);
    for _ in 0..count {
        x.push((rng.gen::<f32>() - 0.5) * params.scale);
        y.push((rng.gen::<f32>() - 0.5) * params.scale);
        z.push((rng.gen::<f32>() - 0.5) * params.scale);
    }
    let labels: Vec<String> = (1..=count).map(|i| format!("F-{}", i)).collect();
    let base = FiducialSet::from_xyz(x, y, z).with_labels(labels);

    // Drop two points and shuffle the rest, the "missing points and messed
    // up order" half of the scenario.
    let mut mapping: Vec<usize> = (0..count).collect();
    mapping.shuffle(&mut rng);
    mapping.truncate(count.saturating_sub(2));

    let mut sampled = base.select(&mapping);
    for i in 0..sampled.len() {
        sampled.x[i] += noise.sample(&mut rng);
        sampled.y[i] += noise.sample(&mut rng);
        sampled.z[i] += noise.sample(&mut rng);
    }

    SyntheticCase {
        base,
        sampled,
        mapping,
    }
}
