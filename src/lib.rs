//! Height-field terrain: configuration and the orchestrator that ties the field, noise
//! generators, section builds and collision cooking together.

pub mod config;
pub mod terrain;

pub use config::{LodConfig, TerrainConfig, load_config};
pub use terrain::{Terrain, TerrainStats};
