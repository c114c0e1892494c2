//! Global stiffness matrix of a pin-jointed truss.

use nalgebra::{DMatrix, Matrix4};
use ndarray::{Array2, ArrayView1};

use crate::loads::{MemberGeometry, Restraints};

/// Factor applied to the elastic modulus of members that have already failed.
pub const FAILED_MEMBER_DEGRADATION: f64 = 1.0 / 50.0;

/// A two-force member as seen by the assembler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrussElement {
    /// Start joint.
    pub joint_a: usize,
    /// End joint.
    pub joint_b: usize,
    /// `A·E/L` in kN/m.
    pub axial_stiffness: f64,
    /// x direction cosine from A to B.
    pub cos_x: f64,
    /// y direction cosine from A to B.
    pub cos_y: f64,
}

impl TrussElement {
    /// Element for a member of the given area, modulus and geometry.
    #[must_use]
    pub fn new(
        joint_a: usize,
        joint_b: usize,
        area: f64,
        elastic_modulus: f64,
        geometry: &MemberGeometry,
    ) -> Self {
        Self {
            joint_a,
            joint_b,
            axial_stiffness: area * elastic_modulus / geometry.length,
            cos_x: geometry.cos_x,
            cos_y: geometry.cos_y,
        }
    }

    /// Element stiffness in global coordinates, ordered `[ax, ay, bx, by]`.
    #[must_use]
    pub fn global_stiffness(&self) -> Matrix4<f64> {
        let xx = self.axial_stiffness * self.cos_x * self.cos_x;
        let yy = self.axial_stiffness * self.cos_y * self.cos_y;
        let xy = self.axial_stiffness * self.cos_x * self.cos_y;
        Matrix4::new(
            xx, xy, -xx, -xy, //
            xy, yy, -xy, -yy, //
            -xx, -xy, xx, xy, //
            -xy, -yy, xy, yy,
        )
    }

    /// Equation numbers of the element's four degrees of freedom.
    #[must_use]
    pub fn equations(&self) -> [usize; 4] {
        [
            2 * self.joint_a,
            2 * self.joint_a + 1,
            2 * self.joint_b,
            2 * self.joint_b + 1,
        ]
    }

    /// Axial force for one set of joint displacements, negative in compression.
    #[must_use]
    pub fn axial_force(&self, displacements: ArrayView1<'_, f64>) -> f64 {
        let [ax, ay, bx, by] = self.equations();
        self.axial_stiffness
            * (self.cos_x * (displacements[bx] - displacements[ax])
                + self.cos_y * (displacements[by] - displacements[ay]))
    }
}

/// Accumulate element stiffnesses into a `2·n_joints` square matrix.
#[must_use]
pub fn assemble(n_joints: usize, elements: &[TrussElement]) -> DMatrix<f64> {
    let n_equations = 2 * n_joints;
    let mut matrix = DMatrix::zeros(n_equations, n_equations);
    for element in elements {
        let local = element.global_stiffness();
        let equations = element.equations();
        for (row_local, &row) in equations.iter().enumerate() {
            for (col_local, &col) in equations.iter().enumerate() {
                matrix[(row, col)] += local[(row_local, col_local)];
            }
        }
    }
    tracing::debug!(
        equations = n_equations,
        elements = elements.len(),
        "assembled stiffness matrix"
    );
    matrix
}

/// Impose zero displacement on every restrained equation.
///
/// The row and column are cleared with a unit diagonal and the load is
/// cleared in every load case.
pub fn apply_restraints(
    stiffness: &mut DMatrix<f64>,
    loads: &mut Array2<f64>,
    restraints: &Restraints,
) {
    for equation in restraints.restrained_equations() {
        stiffness.row_mut(equation).fill(0.0);
        stiffness.column_mut(equation).fill(0.0);
        stiffness[(equation, equation)] = 1.0;
        loads.column_mut(equation).fill(0.0);
    }
}
