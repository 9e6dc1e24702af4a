#![forbid(unsafe_code)]

//! Fiducial point-set registration with unknown correspondence.
//!
//! Given two 3-D fiducial sets of possibly different sizes and unknown
//! point-to-point correspondence, [`search`] finds the rigid transform and
//! the correspondence that minimize the mean registration residual. The
//! underlying paired solver is exposed as [`align_paired`] for callers that
//! already know the correspondence.
//!
//! The search is exhaustive by design: every ordered injective mapping of
//! the smaller set's indices into the larger set's is scored, which is
//! `P(m, n) = m!/(m-n)!` candidates. That is exact and deterministic, but
//! only tractable for tens of fiducials; use [`pairing_count`] to check the
//! candidate count before calling on larger inputs.
//!
//! Inputs come from the host as [`FiducialSet`] values (or zero-copy
//! [`FiducialView`] borrows of interleaved buffers); results go back as
//! [`RegistrationResult`] values. The crate does no rendering, persistence,
//! or unit conversion.

pub use fiducials_core::{FiducialSet, FiducialView};
pub use fiducials_registration::{
    align_paired, align_points, apply_transform, generate, generate_seeded, mean_residual,
    pairing_count, pairings, rms_residual, search, search_query_reference, Correspondence,
    QuerySide, RegistrationError, RegistrationResult, RigidTransform, SynthParams, SyntheticCase,
};
