//! Geographic boundary data for the map panel.

pub mod boundary;

pub use boundary::{BoundaryClient, BoundaryConfig, MapPanel};
