//! JSON bridge design documents.
//!
//! A document names the site by its key code and lists joints and members
//! with 0-based indices:
//!
//! ```json
//! {
//!   "scenario_code": 1050800000,
//!   "joints": [[0.0, 0.0], [4.0, 0.0]],
//!   "members": [
//!     { "joint_a": 0, "joint_b": 1, "material": 0, "section": 1, "size": 20 }
//!   ]
//! }
//! ```
//!
//! The leading joints must repeat the joints the site prescribes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bridge::{Bridge, DesignNotes};
use crate::conditions::DesignConditions;
use crate::errors::{BridgeEditError, DesignFileError};
use crate::geometry::point;

/// Largest distance a stored prescribed joint may sit from its site location.
const PRESCRIBED_JOINT_TOLERANCE: f64 = 1.0e-6;

/// One member as stored in a document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Start joint.
    pub joint_a: usize,
    /// End joint.
    pub joint_b: usize,
    /// Material index in the inventory.
    pub material: usize,
    /// Cross-section index in the inventory.
    pub section: usize,
    /// Size index within the cross-section.
    pub size: usize,
    /// Last recorded compression force/strength ratio.
    #[serde(default)]
    pub compression_ratio: Option<f64>,
    /// Last recorded tension force/strength ratio.
    #[serde(default)]
    pub tension_ratio: Option<f64>,
}

/// Serialized form of a [`Bridge`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    /// Ten digit site key code.
    pub scenario_code: u64,
    /// Joint coordinates `[x, y]` in metres.
    pub joints: Vec<[f64; 2]>,
    /// Members in index order.
    pub members: Vec<MemberRecord>,
    /// Name of the designer.
    #[serde(default)]
    pub designed_by: String,
    /// Project identifier.
    #[serde(default)]
    pub project_id: String,
    /// Design iteration number.
    #[serde(default = "first_iteration")]
    pub iteration: u32,
}

/// Iteration number of a fresh design.
fn first_iteration() -> u32 {
    1
}

impl DesignDocument {
    /// Capture a bridge.
    #[must_use]
    pub fn from_bridge(bridge: &Bridge) -> Self {
        let notes = bridge.notes();
        Self {
            scenario_code: bridge.conditions().key_code(),
            joints: bridge
                .joints()
                .map(|joint| [joint.position.x, joint.position.y])
                .collect(),
            members: bridge
                .members()
                .map(|member| MemberRecord {
                    joint_a: member.joint_a,
                    joint_b: member.joint_b,
                    material: member.member.material().index,
                    section: member.member.shape().section.index(),
                    size: member.member.shape().size_index,
                    compression_ratio: member.member.compression_force_strength_ratio(),
                    tension_ratio: member.member.tension_force_strength_ratio(),
                })
                .collect(),
            designed_by: notes.designed_by.clone(),
            project_id: notes.project_id.clone(),
            iteration: notes.iteration,
        }
    }

    /// Rebuild the bridge the document describes.
    ///
    /// # Errors
    ///
    /// Returns [`DesignFileError::Scenario`] for an invalid key code and
    /// [`DesignFileError::Structure`] when the joints or members are invalid.
    pub fn into_bridge(self) -> Result<Bridge, DesignFileError> {
        let conditions = DesignConditions::from_key_code(self.scenario_code)?;
        let prescribed = conditions.n_prescribed_joints();
        if self.joints.len() < prescribed {
            return Err(BridgeEditError::MissingPrescribedJoints {
                expected: prescribed,
                found: self.joints.len(),
            }
            .into());
        }
        for (joint, (&expected, &[x, y])) in conditions
            .prescribed_joints()
            .iter()
            .zip(&self.joints)
            .enumerate()
        {
            let found = point(x, y);
            if expected.distance(found) > PRESCRIBED_JOINT_TOLERANCE {
                return Err(BridgeEditError::PrescribedJointMismatch {
                    joint,
                    expected,
                    found,
                }
                .into());
            }
        }

        let mut bridge = Bridge::new(conditions);
        for &[x, y] in &self.joints[prescribed..] {
            bridge.add_joint(point(x, y));
        }
        for record in &self.members {
            let index = bridge.add_member(
                record.joint_a,
                record.joint_b,
                record.material,
                record.section,
                record.size,
            )?;
            bridge.set_strength_ratios(index, record.compression_ratio, record.tension_ratio)?;
        }
        *bridge.notes_mut() = DesignNotes {
            designed_by: self.designed_by,
            project_id: self.project_id,
            iteration: self.iteration,
        };
        Ok(bridge)
    }
}

/// Parse a bridge from document text.
///
/// # Errors
///
/// Returns [`DesignFileError`] for malformed JSON or an invalid design.
pub fn parse_design(text: &str) -> Result<Bridge, DesignFileError> {
    let document: DesignDocument = serde_json::from_str(text)?;
    document.into_bridge()
}

/// Render a bridge as pretty-printed document text.
///
/// # Errors
///
/// Returns [`DesignFileError::Json`] if serialization fails.
pub fn design_to_string(bridge: &Bridge) -> Result<String, DesignFileError> {
    Ok(serde_json::to_string_pretty(&DesignDocument::from_bridge(bridge))?)
}

/// Read a bridge from a document on disk.
///
/// # Errors
///
/// Returns [`DesignFileError::Io`] when the file cannot be read, otherwise
/// the errors of [`parse_design`].
pub fn load_design(path: impl AsRef<Path>) -> Result<Bridge, DesignFileError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| DesignFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bridge = parse_design(&text)?;
    tracing::debug!(
        path = %path.display(),
        joints = bridge.joint_count(),
        members = bridge.member_count(),
        "loaded bridge design"
    );
    Ok(bridge)
}

/// Write a bridge to a document on disk.
///
/// # Errors
///
/// Returns [`DesignFileError::Io`] when the file cannot be written.
pub fn save_design(bridge: &Bridge, path: impl AsRef<Path>) -> Result<(), DesignFileError> {
    let path = path.as_ref();
    let text = design_to_string(bridge)?;
    fs::write(path, text).map_err(|source| DesignFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}
