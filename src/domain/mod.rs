//! Domain layer types and invariants.

pub mod booking;
pub mod decor;
pub mod error;
pub mod front_matter;
pub mod posts;
pub mod scroll;
