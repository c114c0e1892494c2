#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod bridge;
pub mod conditions;
pub mod design_file;
pub mod errors;
pub mod geometry;
pub mod interpolation;
pub mod inventory;
pub mod loads;
pub mod roadway;
pub mod solver;
pub mod stiffness;

pub use analysis::{analyze_bridge, Analysis, AnalysisResults, AnalysisStatus, MemberFailure};
pub use bridge::{Bridge, DesignNotes, Joint, Member, MemberRef};
pub use conditions::{DeckType, DesignConditions, LoadType};
pub use design_file::{load_design, parse_design, save_design, DesignDocument, MemberRecord};
pub use errors::{BridgeEditError, CatalogError, DesignFileError, Instability, ScenarioError};
pub use geometry::{displacement, point, Displacement, Point};
pub use interpolation::Interpolation;
pub use inventory::{CrossSection, Inventory, Material, Shape, StrengthModel};
pub use loads::Restraints;
pub use roadway::{FlatRoadway, PolylineRoadway, Roadway};
