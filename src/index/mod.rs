//! Count structures built while scanning the corpus.

pub mod histogram;

pub use histogram::TokenHistogram;
