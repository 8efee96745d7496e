// src/config/mod.rs

//! Qualification run configuration.
//!
//! - [`model`] is the serde data model handed to the PK-Sim CLI.
//! - [`serializer`] writes it to `config.json` before the CLI starts.

pub mod model;
pub mod serializer;

pub use model::{
    BuildingBlockRef, BuildingBlockSwap, BuildingBlockType, Input, QualificationConfiguration,
    ReferencingProject, ReferencingSimulation, SimulationParameterRef, SimulationParameterSwap,
    SimulationPlot, for_project,
};
pub use serializer::{ConfigSerializer, JsonConfigSerializer};
