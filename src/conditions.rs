//! Site scenarios decoded from ten-digit key codes.
//!
//! Digit by digit, a key code gives the load case (1), the span in 4 m panels
//! (2-3), the overhead clearance (4-5), the under clearance (6-7), the support
//! layout (8), the pier panel (9) and whether the pier is high (10). Everything
//! else about the site is derived from those digits.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ScenarioError;
use crate::geometry::{point, Point};

/// Horizontal distance between adjacent deck joints in metres.
pub const PANEL_SIZE_WORLD: f64 = 4.0;
/// Depth of the river gap below grade in metres.
pub const GAP_DEPTH: f64 = 24.0;
/// Minimum clearance below the power lines in metres.
pub const MIN_OVERHEAD: f64 = 8.0;
/// Horizontal offset of a cable anchorage from the end of the deck.
pub const ANCHOR_OFFSET: f64 = 8.0;
/// Slenderness limit applied when the bridge has no cable anchorage.
pub const MAX_SLENDERNESS: f64 = 300.0;
/// Slenderness limit applied when the bridge is cable supported.
const UNLIMITED_SLENDERNESS: f64 = 1e100;

/// Truck driven across the bridge during the load test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadType {
    /// 44 kN front axle, 181 kN rear axle.
    StandardTruck,
    /// 124 kN on both axles.
    HeavyTruck,
}

/// Concrete deck carried by the structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckType {
    /// 23 cm medium-strength concrete.
    MediumStrength,
    /// 15 cm high-performance concrete.
    HighStrength,
}

/// Everything about a site that constrains the bridge and its loading.
#[derive(Clone, Debug, PartialEq)]
pub struct DesignConditions {
    /// The key code these conditions were decoded from.
    code: u64,
    /// Truck used for the live load.
    load_type: LoadType,
    /// Deck used for the dead load.
    deck_type: DeckType,
    /// Number of deck panels.
    n_panels: usize,
    /// Height of the design space above the deck.
    over_clearance: f64,
    /// Depth of the design space below the deck.
    under_clearance: f64,
    /// Deck elevation above the water line.
    deck_elevation: f64,
    /// Zero-based deck panel point of the pier.
    pier_panel_index: Option<usize>,
    /// True when the pier reaches the deck.
    hi_pier: bool,
    /// Joint carrying the pier support.
    pier_joint_index: Option<usize>,
    /// First of the two arch base joints.
    arch_joint_index: Option<usize>,
    /// Joint anchoring the left cables.
    left_anchorage_joint_index: Option<usize>,
    /// Joint anchoring the right cables.
    right_anchorage_joint_index: Option<usize>,
    /// Number of restrained degrees of freedom.
    n_joint_restraints: usize,
    /// Locations of the joints every design for this site starts with.
    prescribed_joints: Vec<Point>,
    /// Largest permitted member slenderness.
    allowable_slenderness: f64,
}

/// Split a key code into its ten decimal digits, most significant first.
fn digits(code: u64) -> Result<[u8; 10], ScenarioError> {
    let mut rest = code;
    let mut digits = [0_u8; 10];
    for digit in digits.iter_mut().rev() {
        *digit = (rest % 10) as u8;
        rest /= 10;
    }
    if rest > 0 {
        return Err(ScenarioError::Malformed(code));
    }
    Ok(digits)
}

/// Two-digit field starting at `i`.
fn pair(code: &[u8; 10], i: usize) -> u32 {
    10 * u32::from(code[i]) + u32::from(code[i + 1])
}

/// Reject key codes that do not describe a buildable site.
fn check(code: &[u8; 10]) -> Result<(), ScenarioError> {
    if !(1..=4).contains(&code[0]) {
        return Err(ScenarioError::LoadCase(code[0]));
    }
    let n_panels = pair(code, 1);
    if !(1..=20).contains(&n_panels) {
        return Err(ScenarioError::PanelCount(n_panels));
    }
    let over = pair(code, 3);
    if over > 40 {
        return Err(ScenarioError::OverClearance(over));
    }
    if code[9] > 1 {
        return Err(ScenarioError::HiPierDigit(code[9]));
    }
    let under = pair(code, 5);
    if under > 32 {
        return Err(ScenarioError::UnderClearance(under));
    }
    if code[7] > 3 {
        return Err(ScenarioError::SupportLayout(code[7]));
    }
    let arch = code[7] == 1;
    let pier = code[8] > 0;
    let hi_pier = code[9] > 0;

    if hi_pier && !pier {
        return Err(ScenarioError::HiPierWithoutPier);
    }
    // Only meaningful with a pier; the digit is one-based.
    let pier_panel = u32::from(code[8]).saturating_sub(1);
    if pier && pier_panel >= n_panels {
        return Err(ScenarioError::PierBeyondSpan {
            pier: pier_panel,
            panels: n_panels,
        });
    }
    if !(5..=11).contains(&n_panels) {
        return Err(ScenarioError::UnsupportedSpan(n_panels));
    }
    let deck_elevation = if arch {
        4 * (n_panels - 5) + under
    } else {
        4 * (n_panels - 5)
    };
    if f64::from(deck_elevation) > GAP_DEPTH {
        return Err(ScenarioError::DeckElevation(deck_elevation));
    }
    if f64::from(deck_elevation + over) > GAP_DEPTH + MIN_OVERHEAD {
        return Err(ScenarioError::OverheadTooHigh);
    }
    if !arch && deck_elevation < under {
        return Err(ScenarioError::UnderWater);
    }
    if pier && (pier_panel == 0 || pier_panel >= n_panels - 1) {
        return Err(ScenarioError::PierAtAbutment);
    }
    if arch && pier {
        return Err(ScenarioError::ArchWithPier);
    }
    if pier && !hi_pier {
        // The pier footing must sit on the banks, which slope 2:1.
        let xp = f64::from(pier_panel) * PANEL_SIZE_WORLD;
        let yp = f64::from(deck_elevation) - f64::from(under);
        let x_left = 0.0;
        let y_bank = f64::from(deck_elevation);
        let x_right = f64::from(n_panels) * PANEL_SIZE_WORLD;
        if xp < x_left + (y_bank - yp) * 0.5 {
            return Err(ScenarioError::PierLeftOfBank);
        }
        if xp > x_right - (y_bank - yp) * 0.5 {
            return Err(ScenarioError::PierRightOfBank);
        }
    }
    Ok(())
}

impl DesignConditions {
    /// Decode and validate a key code.
    ///
    /// # Errors
    ///
    /// Returns the first [`ScenarioError`] check the code fails.
    ///
    /// # Examples
    /// ```
    /// use trussbridge::{DesignConditions, LoadType};
    ///
    /// let conditions = DesignConditions::from_key_code(1_050_800_000).expect("valid code");
    /// assert_eq!(conditions.n_loaded_joints(), 6);
    /// assert_eq!(conditions.load_type(), LoadType::StandardTruck);
    /// ```
    pub fn from_key_code(code: u64) -> Result<Self, ScenarioError> {
        let digits = digits(code)?;
        check(&digits)?;

        let hi_pier = digits[9] > 0;
        let pier_panel_index = usize::from(digits[8]).checked_sub(1);
        let arch = digits[7] == 1;
        let left_cable = digits[7] == 2 || digits[7] == 3;
        let right_cable = digits[7] == 3;
        let under_clearance = f64::from(pair(&digits, 5));
        let over_clearance = f64::from(pair(&digits, 3));
        let n_panels = pair(&digits, 1) as usize;
        let load_case_index = digits[0] - 1;
        let load_type = if load_case_index & 1 == 0 {
            LoadType::StandardTruck
        } else {
            LoadType::HeavyTruck
        };
        let deck_type = if load_case_index & 2 == 0 {
            DeckType::MediumStrength
        } else {
            DeckType::HighStrength
        };
        let base_elevation = 4.0 * (n_panels as f64 - 5.0);
        let deck_elevation = if arch {
            base_elevation + under_clearance
        } else {
            base_elevation
        };

        let n_loaded_joints = n_panels + 1;
        let x_left = 0.0;
        let x_right = n_panels as f64 * PANEL_SIZE_WORLD;
        let mut prescribed_joints: Vec<Point> = (0..n_loaded_joints)
            .map(|i| point(i as f64 * PANEL_SIZE_WORLD, 0.0))
            .collect();

        // Simple abutments: pin on the left, roller on the right.
        let mut n_joint_restraints = 3;
        let mut pier_joint_index = pier_panel_index;
        if let Some(panel) = pier_panel_index {
            if hi_pier {
                // The pier is a pin at deck level and the left end becomes a roller.
                n_joint_restraints += 1;
            } else {
                pier_joint_index = Some(prescribed_joints.len());
                prescribed_joints.push(point(panel as f64 * PANEL_SIZE_WORLD, -under_clearance));
                n_joint_restraints += 2;
            }
        }
        let mut arch_joint_index = None;
        if arch {
            arch_joint_index = Some(prescribed_joints.len());
            prescribed_joints.push(point(x_left, -under_clearance));
            prescribed_joints.push(point(x_right, -under_clearance));
            n_joint_restraints += 1;
        }
        let mut left_anchorage_joint_index = None;
        if left_cable {
            left_anchorage_joint_index = Some(prescribed_joints.len());
            prescribed_joints.push(point(x_left - ANCHOR_OFFSET, 0.0));
            n_joint_restraints += 2;
        }
        let mut right_anchorage_joint_index = None;
        if right_cable {
            right_anchorage_joint_index = Some(prescribed_joints.len());
            prescribed_joints.push(point(x_right + ANCHOR_OFFSET, 0.0));
            n_joint_restraints += 2;
        }

        let allowable_slenderness = if left_cable || right_cable {
            UNLIMITED_SLENDERNESS
        } else {
            MAX_SLENDERNESS
        };

        Ok(Self {
            code,
            load_type,
            deck_type,
            n_panels,
            over_clearance,
            under_clearance,
            deck_elevation,
            pier_panel_index,
            hi_pier,
            pier_joint_index,
            arch_joint_index,
            left_anchorage_joint_index,
            right_anchorage_joint_index,
            n_joint_restraints,
            prescribed_joints,
            allowable_slenderness,
        })
    }

    /// The key code these conditions were decoded from.
    #[must_use]
    pub fn key_code(&self) -> u64 {
        self.code
    }

    /// The key code as the zero-padded ten character string.
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("{:010}", self.code)
    }

    /// Truck used for the live load.
    #[must_use]
    pub fn load_type(&self) -> LoadType {
        self.load_type
    }

    /// Deck used for the dead load.
    #[must_use]
    pub fn deck_type(&self) -> DeckType {
        self.deck_type
    }

    /// Deck slab thickness in metres.
    #[must_use]
    pub fn deck_thickness(&self) -> f64 {
        match self.deck_type {
            DeckType::MediumStrength => 0.23,
            DeckType::HighStrength => 0.15,
        }
    }

    /// Number of deck panels.
    #[must_use]
    pub fn n_panels(&self) -> usize {
        self.n_panels
    }

    /// Number of deck joints, one load case per joint.
    #[must_use]
    pub fn n_loaded_joints(&self) -> usize {
        self.n_panels + 1
    }

    /// Number of joints prescribed by the site.
    #[must_use]
    pub fn n_prescribed_joints(&self) -> usize {
        self.prescribed_joints.len()
    }

    /// Location of prescribed joint `i`.
    #[must_use]
    pub fn prescribed_joint(&self, i: usize) -> Option<Point> {
        self.prescribed_joints.get(i).copied()
    }

    /// Locations of all prescribed joints in index order.
    #[must_use]
    pub fn prescribed_joints(&self) -> &[Point] {
        &self.prescribed_joints
    }

    /// Number of restrained degrees of freedom.
    #[must_use]
    pub fn n_joint_restraints(&self) -> usize {
        self.n_joint_restraints
    }

    /// Height of the design space above the deck.
    #[must_use]
    pub fn over_clearance(&self) -> f64 {
        self.over_clearance
    }

    /// Depth of the design space below the deck.
    #[must_use]
    pub fn under_clearance(&self) -> f64 {
        self.under_clearance
    }

    /// Deck elevation above the water line.
    #[must_use]
    pub fn deck_elevation(&self) -> f64 {
        self.deck_elevation
    }

    /// True when the site has an intermediate pier.
    #[must_use]
    pub fn is_pier(&self) -> bool {
        self.pier_panel_index.is_some()
    }

    /// True when the pier reaches the deck.
    #[must_use]
    pub fn is_hi_pier(&self) -> bool {
        self.hi_pier
    }

    /// Zero-based deck panel point of the pier.
    #[must_use]
    pub fn pier_panel_index(&self) -> Option<usize> {
        self.pier_panel_index
    }

    /// Joint carrying the pier support.
    #[must_use]
    pub fn pier_joint_index(&self) -> Option<usize> {
        self.pier_joint_index
    }

    /// True when the bridge springs from arch abutments.
    #[must_use]
    pub fn is_arch(&self) -> bool {
        self.arch_joint_index.is_some()
    }

    /// First of the two arch base joints; the second follows it.
    #[must_use]
    pub fn arch_joint_index(&self) -> Option<usize> {
        self.arch_joint_index
    }

    /// True when the left cable anchorage is present.
    #[must_use]
    pub fn is_left_anchorage(&self) -> bool {
        self.left_anchorage_joint_index.is_some()
    }

    /// True when the right cable anchorage is present.
    #[must_use]
    pub fn is_right_anchorage(&self) -> bool {
        self.right_anchorage_joint_index.is_some()
    }

    /// Joint anchoring the left cables.
    #[must_use]
    pub fn left_anchorage_joint_index(&self) -> Option<usize> {
        self.left_anchorage_joint_index
    }

    /// Joint anchoring the right cables.
    #[must_use]
    pub fn right_anchorage_joint_index(&self) -> Option<usize> {
        self.right_anchorage_joint_index
    }

    /// x-coordinate of the leftmost deck joint.
    #[must_use]
    pub fn x_leftmost_deck_joint(&self) -> f64 {
        self.prescribed_joints[0].x
    }

    /// x-coordinate of the rightmost deck joint.
    #[must_use]
    pub fn x_rightmost_deck_joint(&self) -> f64 {
        self.prescribed_joints[self.n_panels].x
    }

    /// Largest permitted member slenderness.
    #[must_use]
    pub fn allowable_slenderness(&self) -> f64 {
        self.allowable_slenderness
    }
}

impl FromStr for DesignConditions {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().parse::<u64>().map_err(|_| ScenarioError::NotNumeric)?;
        Self::from_key_code(code)
    }
}
