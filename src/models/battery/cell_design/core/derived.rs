//! Quantities computed from the primary inputs.
//!
//! Each value is rounded to three decimals, and values built from other
//! derived values use the rounded ones. Intermediate values that are not
//! fields themselves stay unrounded, as do the ratios the design rules
//! check. Units: lengths in mm, coating and foil thicknesses in µm, masses
//! in g, mass loadings in mg/cm².

use std::f64::consts::PI;

use crate::support::units::Rounding;

use super::{CellDesign, Geometry, Side};

/// Gap between the jelly roll and the can wall of a cylindrical cell, in mm.
const CYLINDRICAL_CLEARANCE: f64 = 0.1;

/// Electrolyte mass per ampere-hour of capacity, in g.
const ELECTROLYTE_PER_AMP_HOUR: f64 = 2.0;

/// Width of the cell, or its diameter when cylindrical.
fn width_or_diameter(geometry: &Geometry) -> f64 {
    match *geometry {
        Geometry::Prismatic { width } | Geometry::Pouch { width } => width,
        Geometry::Cylindrical { diameter, .. } => diameter,
    }
}

impl CellDesign {
    #[must_use]
    pub fn nominal_voltage(&self) -> f64 {
        (self.positive.formulation.nominal_voltage_v() - self.negative.formulation.nominal_voltage_v())
            .round3()
    }

    /// Capacity in A·h.
    ///
    /// Both faces of every positive sheet are coated. Only the primary active
    /// material contributes.
    #[must_use]
    pub fn nominal_capacity(&self) -> f64 {
        let e = &self.positive;
        (2.0 * f64::from(self.positive_sheet_count)
            * self.sheet_height(Side::Positive)
            * self.sheet_width(Side::Positive)
            * 1e-2
            * e.mass_loading
            * 1e-3
            * e.formulation.specific_capacity_mah_g()
            * 1e-3
            * e.formulation.primary_active_material_mass_fraction())
        .round3()
    }

    /// Energy in W·h.
    #[must_use]
    pub fn nominal_energy(&self) -> f64 {
        (self.nominal_voltage() * self.nominal_capacity()).round3()
    }

    /// Ratio of negative to positive areal capacity.
    #[must_use]
    pub fn np_ratio(&self) -> f64 {
        self.np_ratio_raw().round3()
    }

    /// Unrounded N/P ratio, as the design rules check it.
    pub(crate) fn np_ratio_raw(&self) -> f64 {
        self.areal_capacity(Side::Negative) / self.areal_capacity(Side::Positive)
    }

    fn areal_capacity(&self, side: Side) -> f64 {
        let e = self.electrode(side);
        e.formulation.specific_capacity_mah_g()
            * e.mass_loading
            * e.formulation.primary_active_material_mass_fraction()
    }

    /// Current density at 1C in A/cm² of coated positive area.
    #[must_use]
    pub fn current_density(&self) -> f64 {
        let area_cm2 = self.sheet_height(Side::Positive)
            * self.sheet_width(Side::Positive)
            * f64::from(self.positive_sheet_count)
            * 2.0
            * 1e-2;
        (self.nominal_capacity() / area_cm2).round3()
    }

    /// Outer volume in L.
    #[must_use]
    pub fn cell_volume(&self) -> f64 {
        let volume = match self.geometry {
            Geometry::Prismatic { width } | Geometry::Pouch { width } => {
                self.height * width * self.cell_thickness_mm() * 1e-6
            }
            Geometry::Cylindrical { diameter, .. } => {
                PI * (diameter / 2.0).powi(2) * self.height * 1e-6
            }
        };
        volume.round3()
    }

    #[must_use]
    pub fn cell_mass(&self) -> f64 {
        (self.jelly_roll_mass() + self.electrolyte_mass() + self.casing_mass()).round3()
    }

    #[must_use]
    pub fn electrolyte_mass(&self) -> f64 {
        (ELECTROLYTE_PER_AMP_HOUR * self.nominal_capacity()).round3()
    }

    /// Mass of the can, bag or tube, from the casing material density.
    #[must_use]
    pub fn casing_mass(&self) -> f64 {
        let c = self.casing_thickness;
        let h = self.height;
        let volume_mm3 = match self.geometry {
            Geometry::Prismatic { width } => {
                let t = self.cell_thickness_mm();
                h * width * t - h * (width - 2.0 * c) * (t - 2.0 * c)
            }
            Geometry::Pouch { width } => {
                let t = self.cell_thickness_mm();
                2.0 * (h * width + h * t + width * t) * c
            }
            Geometry::Cylindrical { diameter, .. } => {
                let outer = diameter / 2.0;
                let inner = outer - c;
                PI * h * (outer.powi(2) - inner.powi(2))
            }
        };
        (volume_mm3 * 1e-3 * self.casing_material.density_g_cm3()).round3()
    }

    /// Area available for cooling, in mm².
    #[must_use]
    pub fn cooling_surface_area(&self) -> f64 {
        let area = match self.geometry {
            Geometry::Prismatic { width } => width * self.cell_thickness_mm(),
            Geometry::Pouch { width } => width * self.height,
            Geometry::Cylindrical {
                diameter,
                cooling_arc,
                cooling_channel_height,
                ..
            } => PI * cooling_arc / 180.0 * diameter / 2.0 * cooling_channel_height,
        };
        area.round3()
    }

    /// Stack thickness plus the casing walls. `None` for cylindrical cells.
    #[must_use]
    pub fn cell_thickness(&self) -> Option<f64> {
        self.form_factor()
            .is_stacked()
            .then(|| self.cell_thickness_mm())
    }

    fn cell_thickness_mm(&self) -> f64 {
        (self.stack_thickness() + 2.0 * self.casing_thickness).round3()
    }

    #[must_use]
    pub fn jelly_roll_height(&self) -> f64 {
        let height = if self.form_factor().is_stacked() {
            self.height * self.volume_packing_ratio.sqrt()
        } else {
            self.height * self.volume_packing_ratio
        };
        height.round3()
    }

    /// Width of the stacked jelly roll. `None` for cylindrical cells.
    #[must_use]
    pub fn jelly_roll_width(&self) -> Option<f64> {
        match self.geometry {
            Geometry::Prismatic { width } | Geometry::Pouch { width } => {
                Some((width * self.volume_packing_ratio.sqrt()).round3())
            }
            Geometry::Cylindrical { .. } => None,
        }
    }

    /// Thickness of the sheet stack. `None` for cylindrical cells.
    #[must_use]
    pub fn jelly_roll_thickness(&self) -> Option<f64> {
        self.form_factor()
            .is_stacked()
            .then(|| self.stack_thickness())
    }

    fn stack_thickness(&self) -> f64 {
        ((self.sheet_thickness(Side::Positive) * f64::from(self.positive_sheet_count)
            + self.sheet_thickness(Side::Negative) * f64::from(self.negative_sheet_count())
            + self.separator.thickness * f64::from(self.separator_sheet_count()))
            * 1e-3)
            .round3()
    }

    /// Outer diameter of the wound jelly roll. `None` for stacked cells.
    #[must_use]
    pub fn jelly_roll_outer_diameter(&self) -> Option<f64> {
        match self.geometry {
            Geometry::Cylindrical { diameter, .. } => Some(
                (diameter - 2.0 * self.casing_thickness - CYLINDRICAL_CLEARANCE).round3(),
            ),
            _ => None,
        }
    }

    /// Thickness in mm of one winding: both electrodes and two separators.
    fn winding_layer_thickness(&self) -> f64 {
        let electrode = |side: Side| {
            let e = self.electrode(side);
            (2.0 * e.coating_thickness * 1e-3 + e.foil_thickness * 1e-3)
                * f64::from(self.sheet_count(side))
        };
        electrode(Side::Positive) + electrode(Side::Negative) + 2.0 * self.separator.thickness * 1e-3
    }

    /// Annular gap between the mandrel and the jelly roll outer surface.
    fn winding_gap(&self) -> Option<f64> {
        match (self.geometry, self.jelly_roll_outer_diameter()) {
            (
                Geometry::Cylindrical {
                    jelly_roll_inner_diameter,
                    ..
                },
                Some(outer),
            ) => Some(outer / 2.0 - jelly_roll_inner_diameter / 2.0),
            _ => None,
        }
    }

    /// Radial thickness left over after the last full winding.
    #[must_use]
    pub fn jelly_roll_wrapping_thickness(&self) -> Option<f64> {
        let gap = self.winding_gap()?;
        let layer = self.winding_layer_thickness();
        let windings = gap / layer;
        Some(((windings - windings.trunc()) * layer).round3())
    }

    /// Full windings around the mandrel, counted in the gap left after the
    /// rounded wrapping thickness.
    #[must_use]
    pub fn jelly_roll_windings(&self) -> Option<u32> {
        let filled = self.winding_gap()? - self.jelly_roll_wrapping_thickness()?;
        let windings = (filled / self.winding_layer_thickness()).trunc();
        // Saturating: a degenerate geometry gives zero windings.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(windings.max(0.0) as u32)
    }

    /// Mass of electrodes and separators.
    #[must_use]
    pub fn jelly_roll_mass(&self) -> f64 {
        let electrodes: f64 = [Side::Positive, Side::Negative]
            .into_iter()
            .map(|side| {
                let e = self.electrode(side);
                let areal_g_cm2 = 2.0 * e.coating_thickness * 1e-4 * self.coating_density(side)
                    + e.foil_thickness * 1e-4 * e.foil_density;
                areal_g_cm2
                    * f64::from(self.sheet_count(side))
                    * self.sheet_height(side)
                    * self.sheet_width(side)
                    * 1e-2
            })
            .sum();
        let separator = self.separator.areal_density
            * f64::from(self.separator_sheet_count())
            * self.separator_sheet_height()
            * self.separator_sheet_width()
            * 1e-6;
        (electrodes + separator).round3()
    }

    /// Jelly roll volume in L.
    #[must_use]
    pub fn jelly_roll_volume(&self) -> f64 {
        let volume = match self.geometry {
            Geometry::Cylindrical {
                jelly_roll_inner_diameter,
                ..
            } => {
                let outer = self.jelly_roll_outer_diameter().unwrap_or_default();
                (outer.powi(2) - jelly_roll_inner_diameter.powi(2))
                    * self.jelly_roll_height()
                    * PI
                    / 4.0
                    * 1e-6
            }
            _ => self.cell_volume() * self.volume_packing_ratio,
        };
        volume.round3()
    }

    #[must_use]
    pub fn sheet_count(&self, side: Side) -> u32 {
        match side {
            Side::Positive => self.positive_sheet_count,
            Side::Negative => self.negative_sheet_count(),
        }
    }

    /// Stacked cells interleave one more negative sheet than positive ones.
    #[must_use]
    pub fn negative_sheet_count(&self) -> u32 {
        if self.form_factor().is_stacked() {
            self.positive_sheet_count + 1
        } else {
            self.positive_sheet_count
        }
    }

    #[must_use]
    pub fn separator_sheet_count(&self) -> u32 {
        if self.form_factor().is_stacked() {
            self.positive_sheet_count + 4
        } else {
            self.positive_sheet_count + 1
        }
    }

    /// The positive sheet is inset by twice the overhang of the negative one.
    #[must_use]
    pub fn sheet_height(&self, side: Side) -> f64 {
        let overhangs = match side {
            Side::Positive => 4.0,
            Side::Negative => 2.0,
        };
        (self.jelly_roll_height() - overhangs * self.electrode_overhang).round3()
    }

    #[must_use]
    pub fn sheet_width(&self, side: Side) -> f64 {
        let width = match (self.jelly_roll_width(), side) {
            (Some(jelly_roll), Side::Positive) => jelly_roll - 4.0 * self.electrode_overhang,
            (Some(jelly_roll), Side::Negative) => jelly_roll - 2.0 * self.electrode_overhang,
            (None, Side::Positive) => self.wound_length(),
            (None, Side::Negative) => {
                self.sheet_width(Side::Positive) + 2.0 * self.electrode_overhang
            }
        };
        width.round3()
    }

    /// Length of positive electrode that fills the jelly roll annulus.
    fn wound_length(&self) -> f64 {
        match self.geometry {
            Geometry::Cylindrical {
                jelly_roll_inner_diameter,
                ..
            } => {
                let outer = self.jelly_roll_outer_diameter().unwrap_or_default();
                (outer.powi(2) - jelly_roll_inner_diameter.powi(2)) * PI
                    / 4.0
                    / self.winding_layer_thickness()
            }
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn separator_sheet_height(&self) -> f64 {
        self.jelly_roll_height()
    }

    #[must_use]
    pub fn separator_sheet_width(&self) -> f64 {
        let width = match self.jelly_roll_width() {
            Some(jelly_roll) => jelly_roll,
            None => self.sheet_width(Side::Positive) + 4.0 * self.electrode_overhang,
        };
        width.round3()
    }

    /// Coating on both faces plus the foil, in µm.
    #[must_use]
    pub fn sheet_thickness(&self, side: Side) -> f64 {
        let e = self.electrode(side);
        (2.0 * e.coating_thickness + e.foil_thickness).round3()
    }

    /// Coating density in g/cm³ implied by the loading and thickness.
    #[must_use]
    pub fn coating_density(&self, side: Side) -> f64 {
        let e = self.electrode(side);
        (e.mass_loading * 1e-3 / (e.coating_thickness * 1e-4)).round3()
    }

    #[must_use]
    pub fn porosity(&self, side: Side) -> f64 {
        self.porosity_raw(side).round3()
    }

    /// Unrounded porosity, as the design rules check it.
    pub(crate) fn porosity_raw(&self, side: Side) -> f64 {
        let formulation_density = self.electrode(side).formulation.density_g_cm3();
        1.0 - self.coating_density(side) / formulation_density
    }

    #[must_use]
    pub fn active_material_volume_fraction(&self, side: Side) -> f64 {
        let e = self.electrode(side);
        (e.mass_loading * 1e-3 * e.formulation.primary_active_material_mass_fraction()
            / (e.formulation.active_material_density_g_cm3() * e.coating_thickness * 1e-4))
            .round3()
    }

    /// Width of a prismatic or pouch cell, or the diameter of a cylinder.
    #[must_use]
    pub fn width(&self) -> f64 {
        width_or_diameter(&self.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::battery::cell_design::core::{FormFactor, test_support::default_design};

    #[test]
    fn prismatic_defaults() {
        let design = default_design(FormFactor::Prismatic);
        assert_relative_eq!(design.nominal_voltage(), 3.67);
        assert_relative_eq!(design.jelly_roll_height(), 94.868);
        assert_eq!(design.jelly_roll_width(), Some(213.454));
        assert_relative_eq!(design.sheet_height(Side::Positive), 92.868);
        assert_relative_eq!(design.sheet_width(Side::Negative), 212.454);
        assert_eq!(design.negative_sheet_count(), 81);
        assert_eq!(design.separator_sheet_count(), 84);
        assert_relative_eq!(design.sheet_thickness(Side::Positive), 112.0);
        assert_eq!(design.jelly_roll_thickness(), Some(20.174));
        assert_eq!(design.cell_thickness(), Some(21.774));
        assert_relative_eq!(design.np_ratio(), 1.183);
        assert_relative_eq!(design.coating_density(Side::Positive), 3.0);
        assert_relative_eq!(design.porosity(Side::Positive), 0.357);
        assert!(design.nominal_capacity() > 90.0 && design.nominal_capacity() < 95.0);
        assert_eq!(design.jelly_roll_windings(), None);
    }

    #[test]
    fn cylindrical_defaults() {
        let design = default_design(FormFactor::Cylindrical);
        assert_relative_eq!(design.jelly_roll_height(), 68.6);
        assert_eq!(design.jelly_roll_outer_diameter(), Some(20.1));
        assert_eq!(design.negative_sheet_count(), 1);
        assert_eq!(design.separator_sheet_count(), 2);
        assert_relative_eq!(design.winding_layer_thickness(), 0.262, epsilon = 1e-12);
        assert_relative_eq!(design.sheet_width(Side::Positive), 1163.139, epsilon = 1e-3);
        assert_relative_eq!(
            design.separator_sheet_width(),
            design.sheet_width(Side::Positive) + 2.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(design.cell_volume(), 0.024);
        assert_eq!(design.cell_thickness(), None);
        assert!(design.nominal_capacity() > 4.0 && design.nominal_capacity() < 5.0);

        let windings = design.jelly_roll_windings().unwrap();
        let wrapping = design.jelly_roll_wrapping_thickness().unwrap();
        assert_eq!(windings, 30);
        assert!(wrapping >= 0.0 && wrapping < 0.262);
    }

    #[test]
    fn fractional_micron_coating_winds_on_the_exact_layer() {
        let mut design = default_design(FormFactor::Cylindrical);
        design.positive.coating_thickness = 48.7;

        let layer = design.winding_layer_thickness();
        assert_relative_eq!(layer, 0.2594, epsilon = 1e-12);
        assert_relative_eq!(
            design.sheet_width(Side::Positive),
            ((20.1_f64.powi(2) - 4.0_f64.powi(2)) * PI / 4.0 / layer).round3()
        );
        assert_relative_eq!(design.sheet_width(Side::Positive), 1174.797);

        // 31.03 layers fit the gap, but the rounded wrapping leaves 30.998.
        assert_eq!(design.jelly_roll_wrapping_thickness(), Some(0.009));
        assert_eq!(design.jelly_roll_windings(), Some(30));
    }

    #[test]
    fn checked_ratios_are_not_rounded() {
        let mut design = default_design(FormFactor::Prismatic);
        design.negative.mass_loading *= 1.2004 / design.np_ratio_raw();
        assert_relative_eq!(design.np_ratio(), 1.2);
        assert_relative_eq!(design.np_ratio_raw(), 1.2004, epsilon = 1e-9);

        let raw = design.porosity_raw(Side::Positive);
        assert_relative_eq!(design.porosity(Side::Positive), raw.round3());
    }

    #[test]
    fn pouch_casing_is_an_envelope() {
        let design = default_design(FormFactor::Pouch);
        let t = design.cell_thickness().unwrap();
        let expected = 2.0 * (150.0 * 100.0 + 150.0 * t + 100.0 * t) * 0.15 * 1e-3
            * design.casing_material().density_g_cm3();
        assert_relative_eq!(design.casing_mass(), expected, epsilon = 1e-3);
        assert_relative_eq!(design.cooling_surface_area(), 15_000.0);
    }

    #[test]
    fn cell_mass_adds_up() {
        let design = default_design(FormFactor::Prismatic);
        assert_relative_eq!(
            design.cell_mass(),
            design.jelly_roll_mass() + design.electrolyte_mass() + design.casing_mass(),
            epsilon = 1e-3
        );
        assert_relative_eq!(design.electrolyte_mass(), 2.0 * design.nominal_capacity(), epsilon = 1e-3);
    }

    #[test]
    fn current_density_uses_coated_area() {
        let design = default_design(FormFactor::Pouch);
        let area = design.sheet_height(Side::Positive) * design.sheet_width(Side::Positive) * 160.0
            / 100.0;
        assert_relative_eq!(design.current_density(), (design.nominal_capacity() / area).round3());
    }
}
