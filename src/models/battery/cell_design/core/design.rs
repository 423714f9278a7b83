use serde_json::Value;

use crate::support::{
    catalog::Catalog, electrolyte::ElectrolyteComposition, formulation::ElectrodeFormulation,
    materials::Material,
};

use super::{DesignError, FormFactor, Geometry, OptimizationReport};

/// Which electrode of the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Positive,
    Negative,
}

impl Side {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

/// Coating and current collector of one electrode.
#[derive(Debug, Clone, PartialEq)]
pub struct Electrode {
    pub formulation: ElectrodeFormulation,
    /// Coating mass per side in mg/cm².
    pub mass_loading: f64,
    /// Coating thickness per side in µm.
    pub coating_thickness: f64,
    /// Foil thickness in µm.
    pub foil_thickness: f64,
    /// Foil density in g/cm³.
    pub foil_density: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Separator {
    pub composition: String,
    /// Thickness in µm.
    pub thickness: f64,
    /// Areal density in g/m².
    pub areal_density: f64,
    pub porosity: f64,
}

/// A complete cell design.
///
/// Holds the primary inputs only. Every derived quantity is computed on
/// demand from them, so a design cannot hold stale values.
///
/// Lengths are in mm unless a field says otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct CellDesign {
    pub(super) geometry: Geometry,
    pub(super) height: f64,
    pub(super) volume_packing_ratio: f64,
    pub(super) casing_thickness: f64,
    pub(super) casing_material: Material,
    /// K/W
    pub(super) thermal_resistance: f64,
    pub(super) electrode_overhang: f64,
    pub(super) upper_voltage_cutoff: f64,
    pub(super) lower_voltage_cutoff: f64,
    pub(super) jelly_roll_count: u32,
    pub(super) positive_sheet_count: u32,
    /// m
    pub(super) negative_current_collector_thickness: f64,
    pub(super) positive: Electrode,
    pub(super) negative: Electrode,
    pub(super) separator: Separator,
    pub(super) electrolyte: ElectrolyteComposition,
    pub(super) optimization: OptimizationReport,
}

impl CellDesign {
    /// The default design of a form factor.
    ///
    /// # Errors
    ///
    /// Fails only if the catalog lacks the default formulations or casing
    /// materials.
    pub fn defaults(form_factor: FormFactor, catalog: &Catalog) -> Result<Self, DesignError> {
        let (height, volume_packing_ratio, casing_thickness, casing, thermal_resistance, sheets) =
            match form_factor {
                FormFactor::Prismatic => (100.0, 0.9, 0.8, "Aluminum", 0.15, 80),
                FormFactor::Cylindrical => (70.0, 0.98, 0.4, "Steel", 2.0, 1),
                FormFactor::Pouch => (150.0, 0.95, 0.15, "Aluminum-Laminate", 0.15, 80),
            };

        Ok(Self {
            geometry: Geometry::default_for(form_factor),
            height,
            volume_packing_ratio,
            casing_thickness,
            casing_material: catalog.material(&Value::from(casing))?,
            thermal_resistance,
            electrode_overhang: 0.5,
            upper_voltage_cutoff: 4.2,
            lower_voltage_cutoff: 2.8,
            jelly_roll_count: 1,
            positive_sheet_count: sheets,
            negative_current_collector_thickness: 1.6e-5,
            positive: Electrode {
                formulation: catalog.formulation(&Value::from("NMC811"))?,
                mass_loading: 15.0,
                coating_thickness: 50.0,
                foil_thickness: 12.0,
                foil_density: 2.7,
            },
            negative: Electrode {
                formulation: catalog.formulation(&Value::from("Graphite"))?,
                mass_loading: 10.0,
                coating_thickness: 60.0,
                foil_thickness: 6.0,
                foil_density: 8.96,
            },
            separator: Separator {
                composition: "Ceramic coated PE".into(),
                thickness: 12.0,
                areal_density: 12.0,
                porosity: 0.42,
            },
            electrolyte: ElectrolyteComposition::default(),
            optimization: OptimizationReport::default(),
        })
    }

    #[must_use]
    pub fn form_factor(&self) -> FormFactor {
        self.geometry.form_factor()
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn volume_packing_ratio(&self) -> f64 {
        self.volume_packing_ratio
    }

    #[must_use]
    pub fn electrode(&self, side: Side) -> &Electrode {
        match side {
            Side::Positive => &self.positive,
            Side::Negative => &self.negative,
        }
    }

    pub(super) fn electrode_mut(&mut self, side: Side) -> &mut Electrode {
        match side {
            Side::Positive => &mut self.positive,
            Side::Negative => &mut self.negative,
        }
    }

    #[must_use]
    pub fn positive(&self) -> &Electrode {
        &self.positive
    }

    #[must_use]
    pub fn negative(&self) -> &Electrode {
        &self.negative
    }

    #[must_use]
    pub fn separator(&self) -> &Separator {
        &self.separator
    }

    #[must_use]
    pub fn casing_material(&self) -> &Material {
        &self.casing_material
    }

    #[must_use]
    pub fn electrolyte(&self) -> &ElectrolyteComposition {
        &self.electrolyte
    }

    #[must_use]
    pub fn positive_sheet_count(&self) -> u32 {
        self.positive_sheet_count
    }

    #[must_use]
    pub fn voltage_window(&self) -> (f64, f64) {
        (self.lower_voltage_cutoff, self.upper_voltage_cutoff)
    }

    /// Coating thickness changes made by the optimizer.
    #[must_use]
    pub fn optimization(&self) -> &OptimizationReport {
        &self.optimization
    }

    /// Sets the positive mass loading, leaving every other input as is.
    #[must_use]
    pub fn with_positive_mass_loading(&self, mass_loading: f64) -> Self {
        let mut design = self.clone();
        design.positive.mass_loading = mass_loading;
        design
    }
}
