//! Stock materials and cross-sections, and the member strength curves.
//!
//! Units follow the rest of the crate: lengths in metres, moduli and yield
//! stresses in kilopascals, so strengths come out in kilonewtons.

use serde::{Deserialize, Serialize};

use crate::errors::CatalogError;

/// Resistance factor applied to compressive (buckling) capacity.
pub const COMPRESSION_RESISTANCE_FACTOR: f64 = 0.90;
/// Resistance factor applied to tensile (yield) capacity.
pub const TENSION_RESISTANCE_FACTOR: f64 = 0.95;

/// Nominal widths in millimetres shared by every cross-section.
const WIDTHS: [u32; 33] = [
    30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, // 0 to 10
    90, 100, 110, 120, 130, 140, 150, 160, 170, 180, 190, 200, // 11 to 22
    220, 240, 260, 280, 300, // 23 to 27
    320, 340, 360, 400, 500, // 28 to 32
];

/// A structural steel grade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Position in the inventory.
    pub index: usize,
    /// Full name.
    pub name: String,
    /// Abbreviation used in reports.
    pub short_name: String,
    /// Elastic modulus in kPa.
    pub elastic_modulus: f64,
    /// Yield stress in kPa.
    pub yield_stress: f64,
    /// Mass density in kg/m³.
    pub density: f64,
}

/// Cross-section families available in stock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossSection {
    /// Solid square bar.
    Bar,
    /// Hollow square tube.
    Tube,
}

impl CrossSection {
    /// All families in inventory order.
    pub const ALL: [CrossSection; 2] = [CrossSection::Bar, CrossSection::Tube];

    /// Position in the inventory.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            CrossSection::Bar => 0,
            CrossSection::Tube => 1,
        }
    }

    /// Family for an inventory position.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSection`] for an index past the end.
    pub fn from_index(index: usize) -> Result<Self, CatalogError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(CatalogError::UnknownSection(index))
    }

    /// Full name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CrossSection::Bar => "Solid Bar",
            CrossSection::Tube => "Hollow Tube",
        }
    }

    /// Abbreviation used in reports.
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            CrossSection::Bar => "Bar",
            CrossSection::Tube => "Tube",
        }
    }

    /// Number of stock sizes.
    #[must_use]
    pub fn n_sizes(self) -> usize {
        WIDTHS.len()
    }

    /// Build the shape for one stock size.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSize`] for a size past the end.
    pub fn shape(self, size_index: usize) -> Result<Shape, CatalogError> {
        let width = *WIDTHS.get(size_index).ok_or(CatalogError::UnknownSize {
            section: self.index(),
            size: size_index,
        })?;
        let w = f64::from(width);
        let shape = match self {
            CrossSection::Bar => Shape::new(
                self,
                size_index,
                format!("{width}x{width}"),
                w,
                w * w * 1e-6,
                w.powi(4) / 12.0 * 1e-12,
                w,
            ),
            CrossSection::Tube => {
                let thickness = (width / 20).max(2);
                let inner = f64::from(width - 2 * thickness);
                Shape::new(
                    self,
                    size_index,
                    format!("{width}x{width}x{thickness}"),
                    w,
                    (w * w - inner * inner) * 1e-6,
                    (w.powi(4) - inner.powi(4)) / 12.0 * 1e-12,
                    f64::from(thickness),
                )
            }
        };
        Ok(shape)
    }
}

/// One stock size of a cross-section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Family of the shape.
    pub section: CrossSection,
    /// Position within the family.
    pub size_index: usize,
    /// Dimensions as printed on reports.
    pub name: String,
    /// Outside width in millimetres.
    pub width: f64,
    /// Cross-sectional area in m².
    pub area: f64,
    /// Second moment of area in m⁴.
    pub moment: f64,
    /// `sqrt(area / moment)` in 1/m.
    pub inverse_radius_of_gyration: f64,
    /// Wall thickness in millimetres; the width for solid bars.
    pub thickness: f64,
}

impl Shape {
    /// Assemble a shape and derive its radius of gyration.
    #[must_use]
    pub fn new(
        section: CrossSection,
        size_index: usize,
        name: String,
        width: f64,
        area: f64,
        moment: f64,
        thickness: f64,
    ) -> Self {
        Self {
            section,
            size_index,
            name,
            width,
            area,
            moment,
            inverse_radius_of_gyration: (area / moment).sqrt(),
            thickness,
        }
    }
}

/// Source of member capacities consumed by the analysis.
pub trait StrengthModel {
    /// Axial compressive capacity in kN, including buckling over `length` metres.
    fn compressive_strength(&self, material: &Material, shape: &Shape, length: f64) -> f64;

    /// Axial tensile capacity in kN.
    fn tensile_strength(&self, material: &Material, shape: &Shape) -> f64;
}

/// Compressive capacity from the column curve.
///
/// Short columns follow `0.66^λ · Fy · A`, slender ones the Euler-based
/// `0.88 · Fy · A / λ`, with `λ = L² Fy A / (π² E I)`.
#[must_use]
pub fn compressive_strength(material: &Material, shape: &Shape, length: f64) -> f64 {
    let fy = material.yield_stress;
    let area = shape.area;
    let lambda =
        length * length * fy * area / (9.869_604_4 * material.elastic_modulus * shape.moment);
    if lambda <= 2.25 {
        COMPRESSION_RESISTANCE_FACTOR * 0.66_f64.powf(lambda) * fy * area
    } else {
        COMPRESSION_RESISTANCE_FACTOR * 0.88 * fy * area / lambda
    }
}

/// Tensile capacity at yield.
#[must_use]
pub fn tensile_strength(material: &Material, shape: &Shape) -> f64 {
    TENSION_RESISTANCE_FACTOR * material.yield_stress * shape.area
}

/// The stock catalog.
#[derive(Clone, Debug)]
pub struct Inventory {
    /// Steel grades in index order.
    materials: Vec<Material>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Build the standard catalog of three steels and two cross-section families.
    #[must_use]
    pub fn new() -> Self {
        let steel = |index: usize, name: &str, short_name: &str, yield_stress: f64| Material {
            index,
            name: name.to_string(),
            short_name: short_name.to_string(),
            elastic_modulus: 200_000_000.0,
            yield_stress,
            density: 7850.0,
        };
        Self {
            materials: vec![
                steel(0, "Carbon Steel", "CS", 250_000.0),
                steel(1, "High-Strength Low-Alloy Steel", "HSS", 345_000.0),
                steel(2, "Quenched & Tempered Steel", "QTS", 485_000.0),
            ],
        }
    }

    /// Steel grades in index order.
    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Look up a steel grade.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownMaterial`] for an index past the end.
    pub fn material(&self, index: usize) -> Result<&Material, CatalogError> {
        self.materials
            .get(index)
            .ok_or(CatalogError::UnknownMaterial(index))
    }

    /// Look up a stock shape.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when either index is out of range.
    pub fn shape(&self, section: usize, size: usize) -> Result<Shape, CatalogError> {
        CrossSection::from_index(section)?.shape(size)
    }
}

impl StrengthModel for Inventory {
    fn compressive_strength(&self, material: &Material, shape: &Shape, length: f64) -> f64 {
        compressive_strength(material, shape, length)
    }

    fn tensile_strength(&self, material: &Material, shape: &Shape) -> f64 {
        tensile_strength(material, shape)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn bar_properties_follow_width() {
        let bar = CrossSection::Bar.shape(0).expect("stock size");
        assert_eq!(bar.name, "30x30");
        assert_relative_eq!(bar.area, 9.0e-4, epsilon = 1.0e-15);
        assert_relative_eq!(bar.moment, 30.0_f64.powi(4) / 12.0 * 1e-12, epsilon = 1.0e-20);
        assert_relative_eq!(
            bar.inverse_radius_of_gyration,
            (12.0_f64).sqrt() / 0.030,
            epsilon = 1.0e-9
        );
    }

    #[test]
    fn tube_wall_is_at_least_two_millimetres() {
        let small = CrossSection::Tube.shape(0).expect("stock size");
        assert_eq!(small.name, "30x30x2");
        let large = CrossSection::Tube.shape(32).expect("stock size");
        assert_eq!(large.name, "500x500x25");
        assert_relative_eq!(large.area, (500.0 * 500.0 - 450.0 * 450.0) * 1e-6, epsilon = 1e-12);
    }

    #[test]
    fn unknown_catalog_entries_are_rejected() {
        let inventory = Inventory::new();
        assert_eq!(
            inventory.material(3).expect_err("three steels"),
            CatalogError::UnknownMaterial(3)
        );
        assert_eq!(
            inventory.shape(2, 0).expect_err("two families"),
            CatalogError::UnknownSection(2)
        );
        assert_eq!(
            inventory.shape(1, 33).expect_err("33 sizes"),
            CatalogError::UnknownSize { section: 1, size: 33 }
        );
    }

    #[test]
    fn tensile_strength_is_factored_yield() {
        let inventory = Inventory::new();
        let material = inventory.material(0).expect("carbon steel");
        let shape = inventory.shape(0, 10).expect("80 mm bar");
        assert_relative_eq!(
            tensile_strength(material, &shape),
            0.95 * 250_000.0 * 0.0064,
            epsilon = 1.0e-9
        );
    }

    #[test]
    fn compressive_strength_switches_curves() {
        let inventory = Inventory::new();
        let material = inventory.material(0).expect("carbon steel");
        let shape = inventory.shape(1, 12).expect("100 mm tube");
        let squash = COMPRESSION_RESISTANCE_FACTOR * material.yield_stress * shape.area;
        assert_relative_eq!(
            compressive_strength(material, &shape, 0.0),
            squash,
            epsilon = 1.0e-9
        );

        // λ = 2.25 is where both curves meet.
        let pi2 = 9.869_604_4;
        let crossover = (2.25 * pi2 * material.elastic_modulus * shape.moment
            / (material.yield_stress * shape.area))
            .sqrt();
        let short = compressive_strength(material, &shape, crossover * 0.999_999);
        let long = compressive_strength(material, &shape, crossover * 1.000_001);
        assert_relative_eq!(short, long, max_relative = 1.0e-4);

        let mut previous = squash;
        for step in 1..40 {
            let strength = compressive_strength(material, &shape, f64::from(step) * 0.5);
            assert!(strength < previous);
            previous = strength;
        }
    }
}
