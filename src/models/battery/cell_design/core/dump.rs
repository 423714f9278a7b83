use serde_json::{Map, Value};
use uom::si::{
    electric_charge::ampere_hour,
    electric_potential::volt,
    energy::watt_hour,
    f64::{ElectricCharge, ElectricPotential, Energy, Mass, Volume},
    mass::gram,
    volume::liter,
};

use super::{CellDesign, Field, Geometry, Side};

impl CellDesign {
    /// The value of one field, or `None` if it does not apply to this
    /// design's form factor.
    ///
    /// Nested records come back as alias-keyed objects and the form factor as
    /// its name.
    #[must_use]
    pub fn value(&self, field: Field) -> Option<Value> {
        if !field.applies_to(self.form_factor()) {
            return None;
        }
        let cylinder = match self.geometry {
            Geometry::Cylindrical {
                diameter,
                cooling_arc,
                cooling_channel_height,
                jelly_roll_inner_diameter,
            } => Some((diameter, cooling_arc, cooling_channel_height, jelly_roll_inner_diameter)),
            _ => None,
        };
        let (pos, neg) = (&self.positive, &self.negative);

        let value: Value = match field {
            Field::FormFactor => Value::from(self.form_factor().as_str()),
            Field::CellHeight => self.height.into(),
            Field::CellWidth | Field::CellDiameter => self.width().into(),
            Field::VolumePackingRatio => self.volume_packing_ratio.into(),
            Field::CasingThickness => self.casing_thickness.into(),
            Field::CasingMaterial => Value::Object(self.casing_material.to_alias_map()),
            Field::ThermalResistance => self.thermal_resistance.into(),
            Field::ElectrodeOverhang => self.electrode_overhang.into(),
            Field::UpperVoltageCutoff => self.upper_voltage_cutoff.into(),
            Field::LowerVoltageCutoff => self.lower_voltage_cutoff.into(),
            Field::JellyRollCount => self.jelly_roll_count.into(),
            Field::CoolingArc => cylinder?.1.into(),
            Field::CoolingChannelHeight => cylinder?.2.into(),
            Field::JellyRollInnerDiameter => cylinder?.3.into(),
            Field::PositiveFormulation => Value::Object(pos.formulation.to_alias_map()),
            Field::PositiveSheetCount => self.positive_sheet_count.into(),
            Field::PositiveMassLoading => pos.mass_loading.into(),
            Field::PositiveCoatingThickness => pos.coating_thickness.into(),
            Field::PositiveFoilThickness => pos.foil_thickness.into(),
            Field::PositiveFoilDensity => pos.foil_density.into(),
            Field::NegativeFormulation => Value::Object(neg.formulation.to_alias_map()),
            Field::NegativeMassLoading => neg.mass_loading.into(),
            Field::NegativeCoatingThickness => neg.coating_thickness.into(),
            Field::NegativeFoilThickness => neg.foil_thickness.into(),
            Field::NegativeFoilDensity => neg.foil_density.into(),
            Field::NegativeCurrentCollectorThickness => {
                self.negative_current_collector_thickness.into()
            }
            Field::SeparatorComposition => self.separator.composition.clone().into(),
            Field::SeparatorThickness => self.separator.thickness.into(),
            Field::SeparatorArealDensity => self.separator.areal_density.into(),
            Field::SeparatorPorosity => self.separator.porosity.into(),
            Field::ElectrolyteComposition => Value::Object(self.electrolyte.to_alias_map()),

            Field::NominalVoltage => self.nominal_voltage().into(),
            Field::NominalCapacity => self.nominal_capacity().into(),
            Field::NominalEnergy => self.nominal_energy().into(),
            Field::NpRatio => self.np_ratio().into(),
            Field::CurrentDensity => self.current_density().into(),
            Field::CellVolume => self.cell_volume().into(),
            Field::CellMass => self.cell_mass().into(),
            Field::CasingMass => self.casing_mass().into(),
            Field::CoolingSurfaceArea => self.cooling_surface_area().into(),
            Field::CellThickness => self.cell_thickness()?.into(),
            Field::JellyRollHeight => self.jelly_roll_height().into(),
            Field::JellyRollWidth => self.jelly_roll_width()?.into(),
            Field::JellyRollThickness => self.jelly_roll_thickness()?.into(),
            Field::JellyRollOuterDiameter => self.jelly_roll_outer_diameter()?.into(),
            Field::JellyRollWindings => self.jelly_roll_windings()?.into(),
            Field::JellyRollWrappingThickness => self.jelly_roll_wrapping_thickness()?.into(),
            Field::JellyRollMass => self.jelly_roll_mass().into(),
            Field::JellyRollVolume => self.jelly_roll_volume().into(),
            Field::PositiveSheetHeight => self.sheet_height(Side::Positive).into(),
            Field::PositiveSheetWidth => self.sheet_width(Side::Positive).into(),
            Field::PositiveSheetThickness => self.sheet_thickness(Side::Positive).into(),
            Field::PositiveCoatingDensity => self.coating_density(Side::Positive).into(),
            Field::PositivePorosity => self.porosity(Side::Positive).into(),
            Field::PositiveActiveMaterialVolumeFraction => {
                self.active_material_volume_fraction(Side::Positive).into()
            }
            Field::NegativeSheetCount => self.negative_sheet_count().into(),
            Field::NegativeSheetHeight => self.sheet_height(Side::Negative).into(),
            Field::NegativeSheetWidth => self.sheet_width(Side::Negative).into(),
            Field::NegativeSheetThickness => self.sheet_thickness(Side::Negative).into(),
            Field::NegativeCoatingDensity => self.coating_density(Side::Negative).into(),
            Field::NegativePorosity => self.porosity(Side::Negative).into(),
            Field::NegativeActiveMaterialVolumeFraction => {
                self.active_material_volume_fraction(Side::Negative).into()
            }
            Field::SeparatorSheetCount => self.separator_sheet_count().into(),
            Field::SeparatorSheetWidth => self.separator_sheet_width().into(),
            Field::SeparatorSheetHeight => self.separator_sheet_height().into(),
            Field::ElectrolyteMass => self.electrolyte_mass().into(),
        };
        Some(value)
    }

    /// Every applicable field, inputs and derived, keyed by alias.
    ///
    /// Feeding this map back as overrides rebuilds the same design.
    #[must_use]
    pub fn dump_by_alias(&self) -> Map<String, Value> {
        Field::ALL
            .iter()
            .filter_map(|&field| Some((field.alias().to_string(), self.value(field)?)))
            .collect()
    }

    /// Compact JSON of [`dump_by_alias`](Self::dump_by_alias) with keys in
    /// sorted order, so equal designs give equal strings.
    #[must_use]
    pub fn canonical_json(&self) -> String {
        Value::Object(self.dump_by_alias()).to_string()
    }

    /// Headline figures as typed quantities.
    #[must_use]
    pub fn summary(&self) -> CellSummary {
        CellSummary {
            nominal_voltage: ElectricPotential::new::<volt>(self.nominal_voltage()),
            nominal_capacity: ElectricCharge::new::<ampere_hour>(self.nominal_capacity()),
            nominal_energy: Energy::new::<watt_hour>(self.nominal_energy()),
            volume: Volume::new::<liter>(self.cell_volume()),
            mass: Mass::new::<gram>(self.cell_mass()),
        }
    }
}

/// Headline figures of a design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSummary {
    pub nominal_voltage: ElectricPotential,
    pub nominal_capacity: ElectricCharge,
    pub nominal_energy: Energy,
    pub volume: Volume,
    pub mass: Mass,
}

impl CellSummary {
    /// Gravimetric energy density in Wh/kg.
    #[must_use]
    pub fn specific_energy_wh_kg(&self) -> f64 {
        self.nominal_energy.get::<watt_hour>() / (self.mass.get::<gram>() * 1e-3)
    }

    /// Volumetric energy density in Wh/L.
    #[must_use]
    pub fn energy_density_wh_l(&self) -> f64 {
        self.nominal_energy.get::<watt_hour>() / self.volume.get::<liter>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::battery::cell_design::core::{FormFactor, test_support::default_design};

    #[test]
    fn dump_holds_only_applicable_fields() {
        let prismatic = default_design(FormFactor::Prismatic).dump_by_alias();
        assert!(prismatic.contains_key("Cell width [mm]"));
        assert!(prismatic.contains_key("Cell thickness [mm]"));
        assert!(!prismatic.contains_key("Cell diameter [mm]"));
        assert!(!prismatic.contains_key("Jelly roll windings"));

        let cylindrical = default_design(FormFactor::Cylindrical).dump_by_alias();
        assert_eq!(cylindrical["Cell diameter [mm]"], Value::from(21.0));
        assert_eq!(cylindrical["Jelly roll windings"], Value::from(30));
        assert!(!cylindrical.contains_key("Cell width [mm]"));
        assert!(!cylindrical.contains_key("Cell thickness [mm]"));
    }

    #[test]
    fn nested_records_dump_as_objects() {
        let dump = default_design(FormFactor::Pouch).dump_by_alias();
        assert_eq!(dump["Form factor"], Value::from("Pouch"));
        assert_eq!(
            dump["Positive electrode formulation"]["Name"],
            Value::from("NMC811")
        );
        assert_eq!(
            dump["Cell casing material"]["Name"],
            Value::from("Aluminum-Laminate")
        );
        assert!(dump["Electrolyte composition"].is_object());
    }

    #[test]
    fn canonical_json_is_sorted_and_stable() {
        let design = default_design(FormFactor::Prismatic);
        let json = design.canonical_json();
        assert_eq!(json, design.clone().canonical_json());
        assert!(json.starts_with("{\"Cell N/P ratio\":"));
        assert!(!json.contains('\n'));
    }

    #[test]
    fn summary_carries_units() {
        let design = default_design(FormFactor::Prismatic);
        let summary = design.summary();
        assert_relative_eq!(
            summary.nominal_capacity.get::<ampere_hour>(),
            design.nominal_capacity()
        );
        assert_relative_eq!(summary.volume.get::<liter>(), 0.49, epsilon = 1e-12);
        assert!(summary.specific_energy_wh_kg() > 0.0);
        assert_relative_eq!(
            summary.energy_density_wh_l(),
            design.nominal_energy() / 0.49,
            epsilon = 1e-9
        );
    }
}
