//! Load test analysis of a bridge.
//!
//! [`Analysis::initialize`] assembles and solves the structure for every
//! load case, recovers member forces and classifies the bridge. The
//! perturbed variant softens members that have already failed so the
//! collapse can be animated; it borrows the bridge immutably and so never
//! disturbs the ratios recorded by a real run.

use ndarray::{Array2, ArrayView1};

use crate::bridge::Bridge;
use crate::geometry::{Displacement, Point};
use crate::inventory::StrengthModel;
use crate::loads::{self, Restraints};
use crate::solver;
use crate::stiffness::{self, TrussElement, FAILED_MEMBER_DEGRADATION};

/// Overall outcome of an analysis, ordered from least to most successful.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnalysisStatus {
    /// No analysis has completed.
    #[default]
    NoStatus,
    /// A member is too slender; the load test results are still valid.
    FailsSlenderness,
    /// The structure is a mechanism and has no results.
    Unstable,
    /// A member is overloaded in some load case.
    FailsLoadTest,
    /// Every member carries every load case.
    Passes,
}

impl AnalysisStatus {
    /// True when a load test report may be produced.
    #[must_use]
    pub fn allows_report(self) -> bool {
        self > AnalysisStatus::Unstable
    }
}

/// Failure state of one member during a collapse animation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum MemberFailure {
    /// The member carries its load.
    #[default]
    NotFailed,
    /// The member is overloaded.
    Failed,
    /// The member is overloaded and was this long, displaced, when it gave way.
    FailedWithBaseLength(f64),
}

impl MemberFailure {
    /// True for either failed state.
    #[must_use]
    pub fn is_failure(self) -> bool {
        !matches!(self, MemberFailure::NotFailed)
    }

    /// Displaced length at failure, when known.
    #[must_use]
    pub fn base_length(self) -> Option<f64> {
        match self {
            MemberFailure::FailedWithBaseLength(length) => Some(length),
            _ => None,
        }
    }
}

/// Undeformed geometry the results refer to.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Frame {
    /// Joint positions in joint order.
    pub(crate) joints: Vec<Point>,
    /// `(joint_a, joint_b)` per member.
    pub(crate) members: Vec<(usize, usize)>,
    /// Number of deck joints that carry load.
    pub(crate) n_loaded_joints: usize,
}

/// Forces, displacements and strengths of a completed analysis.
///
/// Load cases index rows of the per-case tables.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisResults {
    /// Axial force per load case and member, negative in compression.
    member_force: Array2<f64>,
    /// Joint displacement per load case, x and y interleaved.
    joint_displacement: Array2<f64>,
    /// Overload flag per load case and member.
    member_fails: Array2<bool>,
    /// Compressive strength per member.
    compressive_strength: Vec<f64>,
    /// Tensile strength per member.
    tensile_strength: Vec<f64>,
    /// Largest compressive force magnitude per member.
    max_compression: Vec<f64>,
    /// Largest tensile force per member.
    max_tension: Vec<f64>,
    /// Geometry the results were computed for.
    frame: Frame,
}

impl AnalysisResults {
    /// Number of load cases.
    #[must_use]
    pub fn load_case_count(&self) -> usize {
        self.member_force.nrows()
    }

    /// Number of members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.frame.members.len()
    }

    /// Number of joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.frame.joints.len()
    }

    /// Number of loaded deck joints.
    #[must_use]
    pub fn loaded_joint_count(&self) -> usize {
        self.frame.n_loaded_joints
    }

    /// Axial force of a member in a load case, negative in compression.
    #[must_use]
    pub fn member_force(&self, load_case: usize, member: usize) -> f64 {
        self.member_force[(load_case, member)]
    }

    /// Forces of every member in one load case.
    #[must_use]
    pub fn member_forces(&self, load_case: usize) -> ArrayView1<'_, f64> {
        self.member_force.row(load_case)
    }

    /// Horizontal displacement of a joint.
    #[must_use]
    pub fn x_joint_displacement(&self, load_case: usize, joint: usize) -> f64 {
        self.joint_displacement[(load_case, 2 * joint)]
    }

    /// Vertical displacement of a joint.
    #[must_use]
    pub fn y_joint_displacement(&self, load_case: usize, joint: usize) -> f64 {
        self.joint_displacement[(load_case, 2 * joint + 1)]
    }

    /// Displacement of a joint.
    #[must_use]
    pub fn joint_displacement(&self, load_case: usize, joint: usize) -> Displacement {
        Displacement::new(
            self.x_joint_displacement(load_case, joint),
            self.y_joint_displacement(load_case, joint),
        )
    }

    /// True when the member is overloaded in the load case.
    #[must_use]
    pub fn member_fails(&self, load_case: usize, member: usize) -> bool {
        self.member_fails[(load_case, member)]
    }

    /// Largest compressive force magnitude over all load cases.
    #[must_use]
    pub fn member_compressive_force(&self, member: usize) -> f64 {
        self.max_compression[member]
    }

    /// Largest tensile force over all load cases.
    #[must_use]
    pub fn member_tensile_force(&self, member: usize) -> f64 {
        self.max_tension[member]
    }

    /// Compressive strength of a member.
    #[must_use]
    pub fn member_compressive_strength(&self, member: usize) -> f64 {
        self.compressive_strength[member]
    }

    /// Tensile strength of a member.
    #[must_use]
    pub fn member_tensile_strength(&self, member: usize) -> f64 {
        self.tensile_strength[member]
    }

    /// Worst compressive force over compressive strength.
    #[must_use]
    pub fn compression_ratio(&self, member: usize) -> f64 {
        self.max_compression[member] / self.compressive_strength[member]
    }

    /// Worst tensile force over tensile strength.
    #[must_use]
    pub fn tension_ratio(&self, member: usize) -> f64 {
        self.max_tension[member] / self.tensile_strength[member]
    }

    /// Signed force over the strength that applies to its sign.
    ///
    /// Compression gives a negative ratio.
    #[must_use]
    pub fn force_ratio(&self, member: usize, force: f64) -> f64 {
        if force > 0.0 {
            force / self.tensile_strength[member]
        } else {
            force / self.compressive_strength[member]
        }
    }

    /// Undeformed position of a joint.
    #[must_use]
    pub fn joint_position(&self, joint: usize) -> Point {
        self.frame.joints[joint]
    }

    /// End joints of a member.
    #[must_use]
    pub fn member_joints(&self, member: usize) -> (usize, usize) {
        self.frame.members[member]
    }
}

/// Analysis state for one bridge.
#[derive(Clone, Debug, Default)]
pub struct Analysis {
    /// Outcome of the last run.
    status: AnalysisStatus,
    /// Results of the last run, absent when unstable.
    results: Option<AnalysisResults>,
}

impl Analysis {
    /// An analysis that has not run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome of the last run.
    #[must_use]
    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    /// Results of the last run, if it produced any.
    #[must_use]
    pub fn results(&self) -> Option<&AnalysisResults> {
        self.results.as_ref()
    }

    /// Analyse the bridge with strengths from its own inventory.
    ///
    /// # Examples
    /// ```
    /// use trussbridge::{Analysis, AnalysisStatus, Bridge, DesignConditions};
    ///
    /// let conditions = DesignConditions::from_key_code(1_050_800_000).expect("valid code");
    /// let bridge = Bridge::new(conditions);
    /// let mut analysis = Analysis::new();
    /// // Six deck joints and no members form a mechanism.
    /// assert_eq!(analysis.initialize(&bridge), AnalysisStatus::Unstable);
    /// assert!(analysis.results().is_none());
    /// ```
    pub fn initialize(&mut self, bridge: &Bridge) -> AnalysisStatus {
        self.initialize_with(bridge, bridge.inventory())
    }

    /// Analyse the bridge with strengths from `strength`.
    pub fn initialize_with(
        &mut self,
        bridge: &Bridge,
        strength: &impl StrengthModel,
    ) -> AnalysisStatus {
        self.run(bridge, strength, &[]);
        tracing::info!(status = ?self.status, "load test complete");
        self.status
    }

    /// Analyse the bridge with failed members softened.
    ///
    /// Members whose entry in `failures` is a failure have their elastic
    /// modulus scaled by [`FAILED_MEMBER_DEGRADATION`]. Missing entries
    /// count as not failed.
    pub fn initialize_perturbed(
        &mut self,
        bridge: &Bridge,
        failures: &[MemberFailure],
    ) -> AnalysisStatus {
        self.run(bridge, bridge.inventory(), failures);
        tracing::debug!(
            status = ?self.status,
            failed = failures.iter().filter(|f| f.is_failure()).count(),
            "perturbed analysis complete"
        );
        self.status
    }

    /// Shared body of the real and perturbed runs.
    fn run(&mut self, bridge: &Bridge, strength: &impl StrengthModel, failures: &[MemberFailure]) {
        self.status = AnalysisStatus::NoStatus;
        self.results = None;

        let conditions = bridge.conditions();
        let n_joints = bridge.joint_count();
        let geometry = loads::member_geometry(bridge);
        let mut load_cases = loads::build_load_cases(bridge, &geometry);
        let restraints = Restraints::derive(conditions, n_joints);

        let elements: Vec<TrussElement> = bridge
            .members()
            .zip(&geometry)
            .map(|(member, geometry)| {
                let mut elastic_modulus = member.member.material().elastic_modulus;
                if failures.get(member.index).is_some_and(|f| f.is_failure()) {
                    elastic_modulus *= FAILED_MEMBER_DEGRADATION;
                }
                TrussElement::new(
                    member.joint_a,
                    member.joint_b,
                    member.member.shape().area,
                    elastic_modulus,
                    geometry,
                )
            })
            .collect();

        let mut matrix = stiffness::assemble(n_joints, &elements);
        stiffness::apply_restraints(&mut matrix, &mut load_cases, &restraints);
        let joint_displacement = match solver::solve(matrix, &load_cases) {
            Ok(displacements) => displacements,
            Err(instability) => {
                tracing::warn!(
                    equation = instability.equation,
                    pivot = instability.pivot,
                    "structure is unstable"
                );
                self.status = AnalysisStatus::Unstable;
                return;
            }
        };

        let n_load_cases = load_cases.nrows();
        let n_members = elements.len();
        let mut member_force = Array2::zeros((n_load_cases, n_members));
        let rows = joint_displacement.rows().into_iter().zip(member_force.rows_mut());
        for (displacements, mut forces) in rows {
            for (force, element) in forces.iter_mut().zip(&elements) {
                *force = element.axial_force(displacements);
            }
        }

        let mut compressive_strength = Vec::with_capacity(n_members);
        let mut tensile_strength = Vec::with_capacity(n_members);
        for (member, geometry) in bridge.members().zip(&geometry) {
            let material = member.member.material();
            let shape = member.member.shape();
            compressive_strength.push(strength.compressive_strength(
                material,
                shape,
                geometry.length,
            ));
            tensile_strength.push(strength.tensile_strength(material, shape));
        }

        let mut status = AnalysisStatus::Passes;
        let mut member_fails = Array2::from_elem((n_load_cases, n_members), false);
        let mut max_compression = vec![0.0; n_members];
        let mut max_tension = vec![0.0; n_members];
        for member in 0..n_members {
            for case in 0..n_load_cases {
                let force = member_force[(case, member)];
                let ratio = if force < 0.0 {
                    max_compression[member] = f64::max(max_compression[member], -force);
                    -force / compressive_strength[member]
                } else {
                    max_tension[member] = f64::max(max_tension[member], force);
                    force / tensile_strength[member]
                };
                member_fails[(case, member)] = ratio > 1.0;
            }
            let compression_ratio = max_compression[member] / compressive_strength[member];
            let tension_ratio = max_tension[member] / tensile_strength[member];
            if compression_ratio > 1.0 || tension_ratio > 1.0 {
                status = AnalysisStatus::FailsLoadTest;
            }
        }
        if !bridge.is_passing_slenderness_check() {
            status = AnalysisStatus::FailsSlenderness;
        }

        self.results = Some(AnalysisResults {
            member_force,
            joint_displacement,
            member_fails,
            compressive_strength,
            tensile_strength,
            max_compression,
            max_tension,
            frame: Frame {
                joints: bridge.joints().map(|joint| joint.position).collect(),
                members: bridge
                    .members()
                    .map(|member| (member.joint_a, member.joint_b))
                    .collect(),
                n_loaded_joints: conditions.n_loaded_joints(),
            },
        });
        self.status = status;
    }
}

/// Run a real analysis and record the member ratios on the bridge.
///
/// Ratios are left untouched when the structure is unstable.
pub fn analyze_bridge(bridge: &mut Bridge) -> Analysis {
    let mut analysis = Analysis::new();
    analysis.initialize(bridge);
    if let Some(results) = analysis.results() {
        bridge.record_strength_ratios(results);
    }
    analysis
}
