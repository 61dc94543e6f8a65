//! Configuration loaders for the demo binaries.

pub mod demo;
