//! # Core Module
//!
//! Fundamental utilities shared by every engine subsystem.
//!
//! ## Key Components
//! - `RandomSource`: reseedable uniform random number generator used for all
//!   randomized particle parameters
//!
//! Subsystems never reach for an ambient global generator; a `RandomSource`
//! is constructed once and handed by mutable reference to the code that needs
//! it, which keeps every simulation run reproducible from a seed.

pub mod random_source;

pub use random_source::RandomSource;
