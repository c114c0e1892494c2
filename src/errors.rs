//! Error types produced while building bridges and reading design files.
//!
//! Numerical outcomes of an analysis are not errors; they are reported
//! through [`AnalysisStatus`](crate::AnalysisStatus).

use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::Point;

/// Error returned when editing a [`Bridge`](crate::Bridge) with invalid input.
///
/// # Examples
///
/// ```
/// use trussbridge::{Bridge, BridgeEditError, DesignConditions};
///
/// let conditions = DesignConditions::from_key_code(1_050_800_000).expect("valid code");
/// let mut bridge = Bridge::new(conditions);
/// let error = bridge
///     .add_member(0, 42, 0, 1, 10)
///     .expect_err("unknown joint is rejected");
/// assert_eq!(error, BridgeEditError::UnknownJoint(42));
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BridgeEditError {
    /// Returned when a joint index is not part of the bridge.
    #[error("joint {0} does not exist in this bridge")]
    UnknownJoint(usize),
    /// Returned when a member index is not part of the bridge.
    #[error("member {0} does not exist in this bridge")]
    UnknownMember(usize),
    /// Returned when both ends of a member sit at the same location.
    #[error("member between joints {joint_a} and {joint_b} has zero length")]
    ZeroLengthMember {
        /// First end joint.
        joint_a: usize,
        /// Second end joint.
        joint_b: usize,
    },
    /// Returned when a stored prescribed joint disagrees with the scenario.
    #[error("prescribed joint {joint} is at {found:?} but the scenario requires {expected:?}")]
    PrescribedJointMismatch {
        /// Index of the offending joint.
        joint: usize,
        /// Location required by the design conditions.
        expected: Point,
        /// Location supplied.
        found: Point,
    },
    /// Returned when a design lists fewer joints than the scenario prescribes.
    #[error("scenario prescribes {expected} joints but only {found} were supplied")]
    MissingPrescribedJoints {
        /// Number of prescribed joints required.
        expected: usize,
        /// Number of joints supplied.
        found: usize,
    },
    /// Returned when a member references an unknown catalog entry.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Error returned when a scenario key code cannot be decoded.
///
/// The variants follow the checks applied to a key code digit by digit and
/// then for consistency between digits.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    /// The code has more than ten digits.
    #[error("scenario code {0} does not have ten digits")]
    Malformed(u64),
    /// The code is not a decimal number.
    #[error("scenario code is not a number")]
    NotNumeric,
    /// Digit 1 must be a load case between 1 and 4.
    #[error("load case digit {0} is not between 1 and 4")]
    LoadCase(u8),
    /// Digits 2 and 3 must give a span of 1 to 20 panels.
    #[error("span of {0} panels is not between 1 and 20")]
    PanelCount(u32),
    /// Digits 4 and 5 must give an overhead clearance of 0 to 40 m.
    #[error("overhead clearance of {0} m is not between 0 and 40")]
    OverClearance(u32),
    /// Digit 10 must be 0 or 1.
    #[error("high pier digit {0} is not 0 or 1")]
    HiPierDigit(u8),
    /// Digits 6 and 7 must give an under clearance of 0 to 32 m.
    #[error("under clearance of {0} m is not between 0 and 32")]
    UnderClearance(u32),
    /// Digit 8 must select one of the four support layouts.
    #[error("support layout digit {0} is not between 0 and 3")]
    SupportLayout(u8),
    /// A high pier was requested without a pier.
    #[error("high pier requested without a pier")]
    HiPierWithoutPier,
    /// The pier panel lies beyond the span.
    #[error("pier panel {pier} is beyond the {panels} panel span")]
    PierBeyondSpan {
        /// Zero-based pier panel.
        pier: u32,
        /// Number of panels.
        panels: u32,
    },
    /// Only spans of 5 to 11 panels are supported.
    #[error("span of {0} panels is not between 5 and 11")]
    UnsupportedSpan(u32),
    /// Deck elevation must lie between the water line and grade.
    #[error("deck elevation {0} m is outside the gap")]
    DeckElevation(u32),
    /// Deck elevation plus overhead clearance exceeds the power line height.
    #[error("overhead clearance reaches above the power lines")]
    OverheadTooHigh,
    /// Structure would extend under water.
    #[error("under clearance extends below the water line")]
    UnderWater,
    /// Pier conflicts with an abutment.
    #[error("pier conflicts with an abutment")]
    PierAtAbutment,
    /// Arches and piers cannot be combined.
    #[error("arch and pier cannot be combined")]
    ArchWithPier,
    /// Low pier base is left of the left bank.
    #[error("pier base is outside the left bank")]
    PierLeftOfBank,
    /// Low pier base is right of the right bank.
    #[error("pier base is outside the right bank")]
    PierRightOfBank,
}

/// Error returned when a catalog index does not name a stock item.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Unknown material index.
    #[error("material index {0} is not in the inventory")]
    UnknownMaterial(usize),
    /// Unknown cross-section index.
    #[error("cross-section index {0} is not in the inventory")]
    UnknownSection(usize),
    /// Unknown size for the given cross-section.
    #[error("size index {size} is not available for cross-section {section}")]
    UnknownSize {
        /// Cross-section index.
        section: usize,
        /// Rejected size index.
        size: usize,
    },
}

/// Error returned when a bridge design document cannot be read or written.
#[derive(Debug, Error)]
pub enum DesignFileError {
    /// The file could not be read or written.
    #[error("could not access {}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON for a bridge design.
    #[error("malformed design document: {0}")]
    Json(#[from] serde_json::Error),
    /// The scenario code is invalid.
    #[error("invalid scenario: {0}")]
    Scenario(#[from] ScenarioError),
    /// The structure described by the document is invalid.
    #[error("invalid structure: {0}")]
    Structure(#[from] BridgeEditError),
}

/// Error returned by the solver when a pivot is too small to eliminate.
///
/// The analysis reports this as [`AnalysisStatus::Unstable`](crate::AnalysisStatus::Unstable).
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("equation {equation} has pivot {pivot:e}, the structure is unstable")]
pub struct Instability {
    /// Equation at which elimination stopped.
    pub equation: usize,
    /// Offending diagonal value.
    pub pivot: f64,
}
