#![forbid(unsafe_code)]

pub mod set;
pub mod view;

pub use set::FiducialSet;
pub use view::FiducialView;
