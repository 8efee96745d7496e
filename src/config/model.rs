// src/config/model.rs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of PK-Sim building block referenced by a qualification plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingBlockType {
    Individual,
    Population,
    Compound,
    Protocol,
    Formulation,
    Event,
    ObserverSet,
    ExpressionProfile,
    ObservedData,
    Simulation,
}

/// Anything in the configuration that points at a project by name.
pub trait ReferencingProject {
    fn project(&self) -> &str;
}

/// A project reference narrowed to one of its simulations.
pub trait ReferencingSimulation: ReferencingProject {
    fn simulation(&self) -> &str;
}

/// Replace a building block of the project with one taken from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildingBlockSwap {
    #[serde(rename = "Type")]
    pub kind: BuildingBlockType,
    pub name: String,
    pub snapshot_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildingBlockRef {
    #[serde(rename = "Type")]
    pub kind: BuildingBlockType,
    pub name: String,
    pub project: String,
}

/// Copy a parameter value from a simulation in a snapshot into the target
/// simulations of the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimulationParameterSwap {
    pub snapshot_file: PathBuf,
    pub simulation: String,
    pub parameter_path: String,
    #[serde(default)]
    pub target_simulations: Vec<String>,
}

/// A parameter of a project simulation, applied to `target_simulations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimulationParameterRef {
    pub path: String,
    #[serde(default)]
    pub target_simulations: Vec<String>,
    pub project: String,
    pub simulation: String,
}

/// A building block exported as report input for a given section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Input {
    #[serde(rename = "Type")]
    pub kind: BuildingBlockType,
    pub name: String,
    pub project: String,
    pub section_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimulationPlot {
    pub simulation: String,
    pub project: String,
    pub section_id: i32,
}

impl ReferencingProject for BuildingBlockRef {
    fn project(&self) -> &str {
        &self.project
    }
}

impl ReferencingProject for SimulationParameterRef {
    fn project(&self) -> &str {
        &self.project
    }
}

impl ReferencingSimulation for SimulationParameterRef {
    fn simulation(&self) -> &str {
        &self.simulation
    }
}

impl ReferencingProject for Input {
    fn project(&self) -> &str {
        &self.project
    }
}

impl ReferencingProject for SimulationPlot {
    fn project(&self) -> &str {
        &self.project
    }
}

impl ReferencingSimulation for SimulationPlot {
    fn simulation(&self) -> &str {
        &self.simulation
    }
}

/// Everything the PK-Sim CLI needs to qualify one project.
///
/// This is plain data: it is written verbatim to `config.json` and never
/// interpreted by the engine beyond `temp_folder` and `project`.
///
/// ```json
/// {
///   "Project": "Midazolam",
///   "SnapshotFile": "C:/snapshots/Midazolam.json",
///   "OutputFolder": "C:/out/Midazolam",
///   "TempFolder": "C:/tmp/Midazolam",
///   "SimulationPlots": [{ "Simulation": "S1", "Project": "Midazolam", "SectionId": 2 }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QualificationConfiguration {
    /// Name of the project as referenced in the qualification plan.
    pub project: String,

    /// Project snapshot used for this run.
    pub snapshot_file: PathBuf,

    /// Where project artefacts are exported; created by the CLI if missing.
    pub output_folder: PathBuf,

    pub observed_data_folder: PathBuf,

    pub inputs_folder: PathBuf,

    /// Mapping file created for the project.
    pub mapping_file: PathBuf,

    /// Scratch folder owned by this run. The engine writes `config.json`
    /// here and the CLI writes `log.txt`.
    pub temp_folder: PathBuf,

    pub report_configuration_file: PathBuf,

    #[serde(default)]
    pub simulation_plots: Vec<SimulationPlot>,

    #[serde(default)]
    pub inputs: Vec<Input>,

    #[serde(default)]
    pub building_blocks: Vec<BuildingBlockSwap>,

    #[serde(default)]
    pub simulation_parameters: Vec<SimulationParameterSwap>,
}

impl QualificationConfiguration {
    pub fn project_id(&self) -> &str {
        &self.project
    }

    pub fn inputs_for_project(&self, project: &str) -> Vec<&Input> {
        for_project(&self.inputs, project)
    }

    pub fn simulation_plots_for_project(&self, project: &str) -> Vec<&SimulationPlot> {
        for_project(&self.simulation_plots, project)
    }
}

impl ReferencingProject for QualificationConfiguration {
    fn project(&self) -> &str {
        &self.project
    }
}

/// Items of `items` that reference `project` (exact, case-sensitive match).
pub fn for_project<'a, T: ReferencingProject>(items: &'a [T], project: &str) -> Vec<&'a T> {
    items.iter().filter(|x| x.project() == project).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot(project: &str, section: i32) -> SimulationPlot {
        SimulationPlot {
            simulation: format!("{project}-sim"),
            project: project.to_string(),
            section_id: section,
        }
    }

    #[test]
    fn for_project_filters_by_exact_name() {
        let cfg = QualificationConfiguration {
            project: "A".into(),
            simulation_plots: vec![plot("A", 1), plot("B", 2), plot("a", 3), plot("A", 4)],
            ..Default::default()
        };

        let sections: Vec<i32> = cfg
            .simulation_plots_for_project("A")
            .iter()
            .map(|p| p.section_id)
            .collect();
        assert_eq!(sections, vec![1, 4]);
        assert!(cfg.inputs_for_project("A").is_empty());
    }

    #[test]
    fn json_uses_pascal_case_keys() {
        let cfg = QualificationConfiguration {
            project: "Midazolam".into(),
            temp_folder: PathBuf::from("tmp"),
            building_blocks: vec![BuildingBlockSwap {
                kind: BuildingBlockType::Compound,
                name: "Midazolam".into(),
                snapshot_file: PathBuf::from("compound.json"),
            }],
            ..Default::default()
        };

        let value = serde_json::to_value(&cfg).unwrap();
        assert_eq!(value["Project"], "Midazolam");
        assert_eq!(value["TempFolder"], "tmp");
        assert_eq!(value["BuildingBlocks"][0]["Type"], "Compound");
        assert_eq!(value["BuildingBlocks"][0]["SnapshotFile"], "compound.json");
    }

    #[test]
    fn references_filter_by_project_and_keep_simulation() {
        let refs = vec![
            SimulationParameterRef {
                path: "Organism|Liver|Volume".into(),
                target_simulations: vec!["S2".into()],
                project: "A".into(),
                simulation: "S1".into(),
            },
            SimulationParameterRef {
                path: "Organism|Weight".into(),
                target_simulations: Vec::new(),
                project: "B".into(),
                simulation: "S9".into(),
            },
        ];
        let blocks = vec![BuildingBlockRef {
            kind: BuildingBlockType::Compound,
            name: "Midazolam".into(),
            project: "B".into(),
        }];

        let for_a = for_project(&refs, "A");
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].simulation(), "S1");
        assert_eq!(for_project(&blocks, "B")[0].name, "Midazolam");
        assert!(for_project(&blocks, "A").is_empty());

        let value = serde_json::to_value(&refs[0]).unwrap();
        assert_eq!(value["Path"], "Organism|Liver|Volume");
        assert_eq!(value["TargetSimulations"][0], "S2");
        assert_eq!(value["Project"], "A");
        assert_eq!(value["Simulation"], "S1");

        let block = serde_json::to_value(&blocks[0]).unwrap();
        assert_eq!(block["Type"], "Compound");
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let json = r#"{
            "Project": "P",
            "SnapshotFile": "s.json",
            "OutputFolder": "out",
            "ObservedDataFolder": "obs",
            "InputsFolder": "inputs",
            "MappingFile": "map.json",
            "TempFolder": "tmp",
            "ReportConfigurationFile": "report.json"
        }"#;
        let cfg: QualificationConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.project_id(), "P");
        assert!(cfg.simulation_plots.is_empty());
        assert!(cfg.simulation_parameters.is_empty());
    }
}
