//! Value helpers shared by the records and the mapper.

pub mod tri_state;

pub use tri_state::TriState;
