//! Member geometry, load cases and support restraints.
//!
//! Load case 0 carries dead load only. Load case `i >= 1` adds the truck with
//! its front axle at loaded joint `i` and its rear axle at loaded joint `i - 1`.
//! Loads are in kilonewtons and act on the y equations, negative downward.

use ndarray::Array2;

use crate::bridge::Bridge;
use crate::conditions::{DeckType, DesignConditions, LoadType};
use crate::geometry::Point;

/// Factor applied to every dead load.
pub const DEAD_LOAD_FACTOR: f64 = 1.35;
/// Factor applied to truck axle loads, impact included.
pub const LIVE_LOAD_FACTOR: f64 = 1.75 * 1.33;
/// Gravitational acceleration in m/s².
pub const GRAVITY: f64 = 9.8066;

/// Unfactored deck weight per panel point for a medium-strength deck, kN.
const MEDIUM_DECK_WEIGHT: f64 = 120.265;
/// Unfactored deck weight per panel point for a high-strength deck, kN.
const HIGH_DECK_WEIGHT: f64 = 82.608;
/// Wear surface and deck beam load per panel point, kN.
const DECK_SUPERIMPOSED_LOAD: f64 = 33.097;

/// Length and direction of one member.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemberGeometry {
    /// Distance between the end joints in metres.
    pub length: f64,
    /// x component of the unit vector from joint A to joint B.
    pub cos_x: f64,
    /// y component of the unit vector from joint A to joint B.
    pub cos_y: f64,
}

impl MemberGeometry {
    /// Geometry of the segment from `a` to `b`.
    #[must_use]
    pub fn between(a: Point, b: Point) -> Self {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let length = (dx * dx + dy * dy).sqrt();
        Self {
            length,
            cos_x: dx / length,
            cos_y: dy / length,
        }
    }
}

/// Length and direction cosines of every member, in member order.
#[must_use]
pub fn member_geometry(bridge: &Bridge) -> Vec<MemberGeometry> {
    bridge
        .members()
        .map(|member| MemberGeometry::between(member.start, member.end))
        .collect()
}

/// Unfactored front and rear axle loads of a design truck, kN.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxleLoads {
    /// Front axle.
    pub front: f64,
    /// Rear axle.
    pub rear: f64,
}

impl From<LoadType> for AxleLoads {
    fn from(load_type: LoadType) -> Self {
        match load_type {
            LoadType::StandardTruck => Self {
                front: 44.0,
                rear: 181.0,
            },
            LoadType::HeavyTruck => Self {
                front: 124.0,
                rear: 124.0,
            },
        }
    }
}

/// Factored deck dead load per interior panel point, kN.
#[must_use]
pub fn deck_point_load(deck_type: DeckType) -> f64 {
    let deck = match deck_type {
        DeckType::MediumStrength => MEDIUM_DECK_WEIGHT,
        DeckType::HighStrength => HIGH_DECK_WEIGHT,
    };
    DEAD_LOAD_FACTOR * deck + DECK_SUPERIMPOSED_LOAD
}

/// Nodal loads for every load case as rows of `2 * joint_count` entries.
///
/// `geometry` must be the output of [`member_geometry`] for the same bridge.
#[must_use]
pub fn build_load_cases(bridge: &Bridge, geometry: &[MemberGeometry]) -> Array2<f64> {
    let conditions = bridge.conditions();
    let n_load_cases = conditions.n_loaded_joints();
    let n_equations = 2 * bridge.joint_count();
    let mut loads = Array2::zeros((n_load_cases, n_equations));

    for (member, geometry) in bridge.members().zip(geometry) {
        let shape = member.member.shape();
        let material = member.member.material();
        let self_weight = DEAD_LOAD_FACTOR
            * shape.area
            * geometry.length
            * material.density
            * GRAVITY
            / 2.0
            / 1000.0;
        let dof_a = 2 * member.joint_a + 1;
        let dof_b = 2 * member.joint_b + 1;
        for mut case in loads.rows_mut() {
            case[dof_a] -= self_weight;
            case[dof_b] -= self_weight;
        }
    }

    let deck_load = deck_point_load(conditions.deck_type());
    let last_loaded = n_load_cases - 1;
    for joint in 0..n_load_cases {
        let load = if joint == 0 || joint == last_loaded {
            deck_load / 2.0
        } else {
            deck_load
        };
        loads.column_mut(2 * joint + 1).mapv_inplace(|value| value - load);
    }

    let axles = AxleLoads::from(conditions.load_type());
    for (case, mut row) in loads.rows_mut().into_iter().enumerate().skip(1) {
        let front = 2 * case + 1;
        let rear = front - 2;
        row[front] -= LIVE_LOAD_FACTOR * axles.front;
        row[rear] -= LIVE_LOAD_FACTOR * axles.rear;
    }
    loads
}

/// Restrained degrees of freedom of every joint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Restraints {
    /// Horizontal restraint per joint.
    x: Vec<bool>,
    /// Vertical restraint per joint.
    y: Vec<bool>,
}

impl Restraints {
    /// Supports implied by a site for a bridge of `joint_count` joints.
    ///
    /// The left deck end is a pin and the right deck end a roller. A pier
    /// adds a pin, and a high pier turns the left end into a roller. An arch
    /// moves the supports from the deck ends to its two bases, and each cable
    /// anchorage is a pin.
    ///
    /// # Examples
    /// ```
    /// use trussbridge::{DesignConditions, Restraints};
    ///
    /// let conditions = DesignConditions::from_key_code(1_050_800_000).expect("valid code");
    /// let restraints = Restraints::derive(&conditions, 9);
    /// assert!(restraints.is_x_restrained(0));
    /// assert!(restraints.is_y_restrained(5));
    /// assert_eq!(restraints.count(), 3);
    /// ```
    #[must_use]
    pub fn derive(conditions: &DesignConditions, joint_count: usize) -> Self {
        let mut restraints = Self::unrestrained(joint_count);
        let last_loaded = conditions.n_loaded_joints() - 1;
        restraints.set(0, true, true);
        restraints.set_y(last_loaded, true);
        if let Some(pier) = conditions.pier_joint_index() {
            restraints.set(pier, true, true);
            if conditions.is_hi_pier() {
                restraints.set_x(0, false);
            }
        }
        if let Some(arch) = conditions.arch_joint_index() {
            restraints.set(0, false, false);
            restraints.set_y(last_loaded, false);
            restraints.set(arch, true, true);
            restraints.set(arch + 1, true, true);
        }
        for anchorage in [
            conditions.left_anchorage_joint_index(),
            conditions.right_anchorage_joint_index(),
        ]
        .into_iter()
        .flatten()
        {
            restraints.set(anchorage, true, true);
        }
        restraints
    }

    /// No supports at all on `joint_count` joints.
    #[must_use]
    pub fn unrestrained(joint_count: usize) -> Self {
        Self {
            x: vec![false; joint_count],
            y: vec![false; joint_count],
        }
    }

    /// Number of joints covered.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.x.len()
    }

    /// True when the joint cannot move horizontally.
    #[must_use]
    pub fn is_x_restrained(&self, joint: usize) -> bool {
        self.x.get(joint).copied().unwrap_or(false)
    }

    /// True when the joint cannot move vertically.
    #[must_use]
    pub fn is_y_restrained(&self, joint: usize) -> bool {
        self.y.get(joint).copied().unwrap_or(false)
    }

    /// Number of restrained degrees of freedom.
    #[must_use]
    pub fn count(&self) -> usize {
        self.x.iter().chain(&self.y).filter(|&&fixed| fixed).count()
    }

    /// Restrained equation numbers in ascending order.
    pub fn restrained_equations(&self) -> impl Iterator<Item = usize> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .enumerate()
            .flat_map(|(joint, (&x, &y))| {
                [(2 * joint, x), (2 * joint + 1, y)]
                    .into_iter()
                    .filter_map(|(equation, fixed)| fixed.then_some(equation))
            })
    }

    /// Set both restraints of a joint, ignoring joints outside the bridge.
    pub fn set(&mut self, joint: usize, x: bool, y: bool) {
        self.set_x(joint, x);
        self.set_y(joint, y);
    }

    /// Set the horizontal restraint of a joint.
    fn set_x(&mut self, joint: usize, fixed: bool) {
        if let Some(slot) = self.x.get_mut(joint) {
            *slot = fixed;
        }
    }

    /// Set the vertical restraint of a joint.
    fn set_y(&mut self, joint: usize, fixed: bool) {
        if let Some(slot) = self.y.get_mut(joint) {
            *slot = fixed;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::point;

    fn bridge(code: u64) -> Bridge {
        Bridge::new(DesignConditions::from_key_code(code).expect("valid code"))
    }

    #[test]
    fn geometry_points_from_a_to_b() {
        let geometry = MemberGeometry::between(point(4.0, 0.0), point(1.0, 4.0));
        assert_relative_eq!(geometry.length, 5.0);
        assert_relative_eq!(geometry.cos_x, -0.6);
        assert_relative_eq!(geometry.cos_y, 0.8);
    }

    #[test]
    fn deck_loads_halve_at_the_ends() {
        let bridge = bridge(1_050_800_000);
        let loads = build_load_cases(&bridge, &member_geometry(&bridge));
        assert_eq!(loads.dim(), (6, 12));
        let deck = DEAD_LOAD_FACTOR * 120.265 + 33.097;
        assert_relative_eq!(loads[(0, 1)], -deck / 2.0);
        assert_relative_eq!(loads[(0, 5)], -deck);
        assert_relative_eq!(loads[(0, 11)], -deck / 2.0);
        assert_relative_eq!(loads[(0, 4)], 0.0);
    }

    #[test]
    fn truck_axles_straddle_a_panel() {
        let bridge = bridge(1_050_800_000);
        let loads = build_load_cases(&bridge, &member_geometry(&bridge));
        let dead = loads.row(0).to_owned();
        let live = &loads.row(3) - &dead;
        assert_relative_eq!(live[7], -LIVE_LOAD_FACTOR * 44.0, epsilon = 1.0e-9);
        assert_relative_eq!(live[5], -LIVE_LOAD_FACTOR * 181.0, epsilon = 1.0e-9);
        assert_relative_eq!(live.iter().sum::<f64>(), -LIVE_LOAD_FACTOR * 225.0, epsilon = 1.0e-9);
    }

    #[test]
    fn self_weight_is_split_between_end_joints() {
        let mut bridge = bridge(3_050_800_000);
        let top = bridge.add_joint(point(4.0, 3.0));
        bridge.add_member(0, top, 0, 0, 10).expect("member added");
        let loads = build_load_cases(&bridge, &member_geometry(&bridge));
        let weight = DEAD_LOAD_FACTOR * 0.0064 * 5.0 * 7850.0 * GRAVITY / 2.0 / 1000.0;
        let deck = DEAD_LOAD_FACTOR * 82.608 + 33.097;
        assert_relative_eq!(loads[(2, 2 * top + 1)], -weight, epsilon = 1.0e-12);
        assert_relative_eq!(loads[(0, 1)], -weight - deck / 2.0, epsilon = 1.0e-9);
    }

    #[test]
    fn simple_span_is_pinned_and_rolled() {
        let conditions = DesignConditions::from_key_code(1_050_800_000).expect("valid code");
        let restraints = Restraints::derive(&conditions, 8);
        assert_eq!(restraints.restrained_equations().collect::<Vec<_>>(), [0, 1, 11]);
        assert_eq!(restraints.count(), conditions.n_joint_restraints());
    }

    #[test]
    fn restraint_count_matches_every_support_layout() {
        for code in [
            1_110_824_000,
            1_100_804_100,
            1_101_220_060,
            1_101_220_061,
            1_101_220_200,
            1_101_220_300,
        ] {
            let conditions = DesignConditions::from_key_code(code).expect("valid code");
            let restraints = Restraints::derive(&conditions, conditions.n_prescribed_joints());
            assert_eq!(restraints.count(), conditions.n_joint_restraints(), "code {code}");
        }
    }

    #[test]
    fn arch_moves_supports_to_its_bases() {
        let conditions = DesignConditions::from_key_code(1_100_804_100).expect("valid code");
        let restraints = Restraints::derive(&conditions, conditions.n_prescribed_joints());
        assert!(!restraints.is_x_restrained(0));
        assert!(!restraints.is_y_restrained(0));
        assert!(!restraints.is_y_restrained(10));
        assert!(restraints.is_x_restrained(11) && restraints.is_y_restrained(11));
        assert!(restraints.is_x_restrained(12) && restraints.is_y_restrained(12));
    }

    #[test]
    fn high_pier_frees_the_left_end() {
        let conditions = DesignConditions::from_key_code(1_101_220_061).expect("valid code");
        let restraints = Restraints::derive(&conditions, conditions.n_prescribed_joints());
        assert!(!restraints.is_x_restrained(0));
        assert!(restraints.is_y_restrained(0));
        assert!(restraints.is_x_restrained(5) && restraints.is_y_restrained(5));
    }
}
