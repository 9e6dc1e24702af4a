#![forbid(unsafe_code)]

//! Rigid fiducial registration: least-squares paired alignment (Kabsch) and
//! an exhaustive correspondence search over all ordered injective mappings
//! between two fiducial sets. The search scores `P(m, n) = m!/(m-n)!`
//! candidates and is only tractable for tens of fiducials.

pub mod enumerate;
pub mod error;
pub mod rigid;
pub mod search;
pub mod synth;

pub use enumerate::{pairing_count, pairings};
pub use error::RegistrationError;
pub use rigid::{
    align_paired, align_points, apply_transform, mean_residual, rms_residual, RigidTransform,
};
pub use search::{
    search, search_query_reference, Correspondence, QuerySide, RegistrationResult,
};
pub use synth::{generate, generate_seeded, SynthParams, SyntheticCase};
