//! Animation snapshots between solved load cases.
//!
//! An [`Interpolation`] turns a continuous truck position into joint
//! displacements, member force ratios, member failures and the pose of the
//! truck. Positions are measured in panels: `0` puts the front axle over the
//! left abutment and `n_loaded_joints - 1` over the right one.

use nalgebra::{Matrix4, Vector2};

use crate::analysis::{AnalysisResults, MemberFailure};
use crate::conditions::PANEL_SIZE_WORLD;
use crate::geometry::{point, Displacement, Point};
use crate::roadway::Roadway;

/// Height of the driving surface above the deck joints, metres.
pub const WEAR_SURFACE_HEIGHT: f64 = 0.8;
/// Accepted error in axle spacing when placing the rear axle, metres.
const CONTACT_TOLERANCE: f64 = 0.01;
/// Bisection steps when placing the rear axle.
const CONTACT_ITERATIONS: usize = 20;

/// Direction from the rear axle contact to `front` when the rear axle rests
/// on the segment `p0`–`p1`, `distance` behind the front axle.
///
/// The segment is searched slightly beyond both ends. Returns `None` when
/// `p0` is already closer than `distance` or the bisection does not settle.
///
/// # Examples
/// ```
/// use trussbridge::interpolation::rear_contact_direction;
/// use trussbridge::point;
///
/// let direction = rear_contact_direction(point(4.0, 0.0), point(-4.0, 0.0), point(4.0, 0.0), 4.0)
///     .expect("level road");
/// assert!((direction.x - 1.0).abs() < 1.0e-9);
/// ```
#[must_use]
pub fn rear_contact_direction(
    front: Point,
    p0: Point,
    p1: Point,
    distance: f64,
) -> Option<Vector2<f64>> {
    if front.distance(p0) < distance {
        return None;
    }
    let (mut t0, mut t1) = (-0.5, 1.5);
    for _ in 0..CONTACT_ITERATIONS {
        let t = 0.5 * (t0 + t1);
        let rear = point((1.0 - t) * p0.x + t * p1.x, (1.0 - t) * p0.y + t * p1.y);
        let error = front.distance(rear) - distance;
        if error > CONTACT_TOLERANCE {
            t0 = t;
        } else if error < -CONTACT_TOLERANCE {
            t1 = t;
        } else {
            let direction = front.to_vector() - rear.to_vector();
            let length = direction.norm();
            return Some(if length > 1.0e-6 {
                direction / length
            } else {
                Vector2::x()
            });
        }
    }
    None
}

/// One animation frame derived from an [`AnalysisResults`].
#[derive(Clone, Debug)]
pub struct Interpolation<R> {
    /// Road the truck drives on off the bridge.
    roadway: R,
    /// Displacement per joint, exaggerated for display.
    displacements: Vec<Displacement>,
    /// Signed force over strength per member, negative in compression.
    force_ratios: Vec<f64>,
    /// Failure state per member.
    failures: Vec<MemberFailure>,
    /// Where the front axle touches the road.
    load_point: Point,
    /// Unit vector from the rear axle contact to the front one.
    load_rotation: Vector2<f64>,
    /// Truck position in panels.
    x_load_parameter: f64,
    /// Number of failed members.
    failure_count: usize,
}

impl<R: Roadway> Interpolation<R> {
    /// An empty snapshot over `roadway`.
    #[must_use]
    pub fn new(roadway: R) -> Self {
        Self {
            roadway,
            displacements: Vec::new(),
            force_ratios: Vec::new(),
            failures: Vec::new(),
            load_point: Point::default(),
            load_rotation: Vector2::x(),
            x_load_parameter: 0.0,
            failure_count: 0,
        }
    }

    /// Road profile of the snapshot.
    #[must_use]
    pub fn roadway(&self) -> &R {
        &self.roadway
    }

    /// Fade in the dead load before the truck arrives.
    ///
    /// Displacements are load case 0 scaled by `fraction` and `exaggeration`.
    /// Force ratios are scaled by `fraction` twice.
    pub fn initialize_dead_load_only(
        &mut self,
        results: &AnalysisResults,
        fraction: f64,
        x_load: f64,
        exaggeration: f64,
    ) {
        self.x_load_parameter = x_load;
        self.displacements = (0..results.joint_count())
            .map(|joint| scaled(results.joint_displacement(0, joint), fraction * exaggeration))
            .collect();
        self.set_forces(results, |member| {
            let ratio = results.force_ratio(member, fraction * results.member_force(0, member));
            (ratio * fraction, false)
        });
        let x = x_load * PANEL_SIZE_WORLD + results.joint_position(0).x + self.displacements[0].x;
        self.load_point = point(x, self.roadway.centerline_elevation(x));
        self.settle_on_roadway();
    }

    /// Snapshot for the truck at `x_load` panels.
    ///
    /// Off the bridge the dead load case applies and the truck follows the
    /// road. On the bridge the two bracketing load cases are blended; a
    /// member failed in the left case stays failed.
    pub fn initialize(&mut self, results: &AnalysisResults, x_load: f64, exaggeration: f64) {
        self.x_load_parameter = x_load;
        let n_loaded = results.loaded_joint_count();
        if x_load <= 0.0 || x_load >= n_loaded as f64 {
            self.displacements = (0..results.joint_count())
                .map(|joint| scaled(results.joint_displacement(0, joint), exaggeration))
                .collect();
            self.set_forces(results, |member| {
                (results.force_ratio(member, results.member_force(0, member)), false)
            });
        } else {
            let (left, right, t1) = bracket(x_load, n_loaded);
            let t0 = 1.0 - t1;
            self.displacements = (0..results.joint_count())
                .map(|joint| {
                    let d = results
                        .joint_displacement(left, joint)
                        .lerp(results.joint_displacement(right, joint), t1);
                    scaled(d, exaggeration)
                })
                .collect();
            self.set_forces(results, |member| {
                let force =
                    t0 * results.member_force(left, member) + t1 * results.member_force(right, member);
                (
                    results.force_ratio(member, force),
                    results.member_fails(left, member),
                )
            });
        }
        self.place_load(results, x_load);
    }

    /// Blend the displacements of two snapshots of the same bridge.
    ///
    /// Force ratios, failures and the truck position come from `base`.
    /// Members failed in `base` record their displaced length there.
    pub fn initialize_blend(
        &mut self,
        results: &AnalysisResults,
        base: &Self,
        target: &Self,
        t: f64,
    ) {
        self.x_load_parameter = base.x_load_parameter;
        self.displacements = base
            .displacements
            .iter()
            .zip(&target.displacements)
            .map(|(b, f)| b.lerp(*f, t))
            .collect();
        self.force_ratios.clone_from(&base.force_ratios);
        self.failures = base
            .failures
            .iter()
            .enumerate()
            .map(|(member, failure)| {
                if failure.is_failure() {
                    let (a, b) = results.member_joints(member);
                    let pa = results.joint_position(a).displaced(base.displacements[a]);
                    let pb = results.joint_position(b).displaced(base.displacements[b]);
                    MemberFailure::FailedWithBaseLength(pa.distance(pb))
                } else {
                    MemberFailure::NotFailed
                }
            })
            .collect();
        self.failure_count = base.failure_count;
        self.place_load(results, self.x_load_parameter);
    }

    /// Displacement of a joint.
    ///
    /// # Panics
    ///
    /// Panics when `joint` is not part of the snapshot.
    #[must_use]
    pub fn displacement(&self, joint: usize) -> Displacement {
        self.displacements[joint]
    }

    /// Displacements of every joint.
    #[must_use]
    pub fn displacements(&self) -> &[Displacement] {
        &self.displacements
    }

    /// Signed force over strength of a member.
    ///
    /// # Panics
    ///
    /// Panics when `member` is not part of the snapshot.
    #[must_use]
    pub fn force_ratio(&self, member: usize) -> f64 {
        self.force_ratios[member]
    }

    /// Failure state of a member.
    ///
    /// # Panics
    ///
    /// Panics when `member` is not part of the snapshot.
    #[must_use]
    pub fn member_failure(&self, member: usize) -> MemberFailure {
        self.failures[member]
    }

    /// Failure state of every member.
    #[must_use]
    pub fn failure_status(&self) -> &[MemberFailure] {
        &self.failures
    }

    /// True when any member has failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.failure_count > 0
    }

    /// True when the member has failed.
    #[must_use]
    pub fn is_member_failure(&self, member: usize) -> bool {
        self.failures
            .get(member)
            .is_some_and(|failure| failure.is_failure())
    }

    /// Number of failed members.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    /// Contact point of the front axle.
    #[must_use]
    pub fn load_point(&self) -> Point {
        self.load_point
    }

    /// Unit vector along the truck, rear to front.
    #[must_use]
    pub fn load_rotation(&self) -> Vector2<f64> {
        self.load_rotation
    }

    /// Rotation about z that aligns the truck with [`Self::load_rotation`].
    #[must_use]
    pub fn load_rotation_matrix(&self) -> Matrix4<f32> {
        let cos = self.load_rotation.x as f32;
        let sin = self.load_rotation.y as f32;
        Matrix4::new(
            cos, -sin, 0.0, 0.0, //
            sin, cos, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Truck position in panels.
    #[must_use]
    pub fn x_load_parameter(&self) -> f64 {
        self.x_load_parameter
    }

    /// Fill force ratios and failures from `(ratio, failed_before)` per member.
    fn set_forces(&mut self, results: &AnalysisResults, ratio: impl Fn(usize) -> (f64, bool)) {
        self.force_ratios.clear();
        self.failures.clear();
        self.failure_count = 0;
        for member in 0..results.member_count() {
            let (ratio, failed_before) = ratio(member);
            let failure = if failed_before || !(-1.0..=1.0).contains(&ratio) {
                self.failure_count += 1;
                MemberFailure::Failed
            } else {
                MemberFailure::NotFailed
            };
            self.force_ratios.push(ratio);
            self.failures.push(failure);
        }
    }

    /// Put the truck at `x_load` using the current displacements.
    fn place_load(&mut self, results: &AnalysisResults, x_load: f64) {
        self.load_rotation = Vector2::x();
        let n_loaded = results.loaded_joint_count();
        if x_load <= 0.0 || x_load >= n_loaded as f64 {
            let anchor = if x_load <= 0.0 { 0 } else { n_loaded - 1 };
            let x = (x_load - anchor as f64) * PANEL_SIZE_WORLD
                + results.joint_position(anchor).x
                + self.displacements[anchor].x;
            self.load_point = point(x, self.roadway.centerline_elevation(x));
            self.settle_on_roadway();
            return;
        }

        let (left, right, t1) = bracket(x_load, n_loaded);
        let t0 = 1.0 - t1;
        let displacements = &self.displacements;
        let deck = |joint: usize| results.joint_position(joint).displaced(displacements[joint]);
        let left_deck = deck(left);
        let mut search_right;
        if left + 1 < n_loaded {
            let right_deck = deck(right);
            self.load_point = point(
                t0 * left_deck.x + t1 * right_deck.x,
                t0 * left_deck.y + t1 * right_deck.y + WEAR_SURFACE_HEIGHT,
            );
            search_right = right_deck.raised(WEAR_SURFACE_HEIGHT);
        } else {
            // Front axle is on the approach, rear axle still on the last panel.
            let x = left_deck.x + t1 * PANEL_SIZE_WORLD;
            self.load_point = point(
                x,
                t0 * (left_deck.y + WEAR_SURFACE_HEIGHT) + t1 * self.roadway.centerline_elevation(x),
            );
            search_right = self.load_point;
        }

        let panels = (0..=left).rev().map(Some).chain(std::iter::once(None));
        for joint in panels {
            let search_left = match joint {
                Some(joint) => deck(joint).raised(WEAR_SURFACE_HEIGHT),
                None => self.roadway_behind(),
            };
            if let Some(direction) =
                rear_contact_direction(self.load_point, search_left, search_right, PANEL_SIZE_WORLD)
            {
                self.load_rotation = direction;
                break;
            }
            search_right = search_left;
        }
    }

    /// Level the truck, then tilt it to rest on the road behind the load point.
    fn settle_on_roadway(&mut self) {
        self.load_rotation = Vector2::x();
        let behind = self.roadway_behind();
        if let Some(direction) =
            rear_contact_direction(self.load_point, behind, self.load_point, PANEL_SIZE_WORLD)
        {
            self.load_rotation = direction;
        }
    }

    /// Road surface one panel left of the load point.
    fn roadway_behind(&self) -> Point {
        let x = self.load_point.x - PANEL_SIZE_WORLD;
        point(x, self.roadway.centerline_elevation(x))
    }
}

/// Bracketing load cases and blend weight for a position on the bridge.
///
/// Past the last loaded joint the right case wraps to dead load only.
fn bracket(x_load: f64, n_loaded: usize) -> (usize, usize, f64) {
    let left = (x_load.floor() as usize).min(n_loaded - 1);
    let right = if left + 1 < n_loaded { left + 1 } else { 0 };
    (left, right, x_load - left as f64)
}

/// Displacement multiplied by `factor`.
fn scaled(d: Displacement, factor: f64) -> Displacement {
    Displacement::new(factor * d.x, factor * d.y)
}
