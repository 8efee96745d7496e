#![allow(dead_code)]

use std::path::{Path, PathBuf};

use qualification_runner::config::{
    BuildingBlockSwap, BuildingBlockType, Input, QualificationConfiguration,
    SimulationParameterSwap, SimulationPlot,
};

/// Builder for `QualificationConfiguration` to simplify test setup.
pub struct ConfigurationBuilder {
    config: QualificationConfiguration,
}

impl ConfigurationBuilder {
    /// A configuration whose folders all live under `root`.
    pub fn new(project: &str, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config: QualificationConfiguration {
                project: project.to_string(),
                snapshot_file: root.join(format!("{project}.json")),
                output_folder: root.join("output"),
                observed_data_folder: root.join("observed_data"),
                inputs_folder: root.join("inputs"),
                mapping_file: root.join("mapping.json"),
                temp_folder: root.to_path_buf(),
                report_configuration_file: root.join("report.json"),
                ..Default::default()
            },
        }
    }

    pub fn temp_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.config.temp_folder = folder.into();
        self
    }

    pub fn with_plot(mut self, simulation: &str, section_id: i32) -> Self {
        let project = self.config.project.clone();
        self.config.simulation_plots.push(SimulationPlot {
            simulation: simulation.to_string(),
            project,
            section_id,
        });
        self
    }

    pub fn with_input(mut self, kind: BuildingBlockType, name: &str, section_id: i32) -> Self {
        let project = self.config.project.clone();
        self.config.inputs.push(Input {
            kind,
            name: name.to_string(),
            project,
            section_id,
        });
        self
    }

    pub fn with_building_block_swap(
        mut self,
        kind: BuildingBlockType,
        name: &str,
        snapshot: &str,
    ) -> Self {
        self.config.building_blocks.push(BuildingBlockSwap {
            kind,
            name: name.to_string(),
            snapshot_file: PathBuf::from(snapshot),
        });
        self
    }

    pub fn with_parameter_swap(mut self, simulation: &str, path: &str, targets: &[&str]) -> Self {
        self.config.simulation_parameters.push(SimulationParameterSwap {
            snapshot_file: PathBuf::from("swap.json"),
            simulation: simulation.to_string(),
            parameter_path: path.to_string(),
            target_simulations: targets.iter().map(|t| t.to_string()).collect(),
        });
        self
    }

    pub fn build(self) -> QualificationConfiguration {
        self.config
    }
}
