//! Design limits.

use crate::support::constraint::DesignRange;

use super::{FormFactor, Side};

pub(crate) const VOLUME_PACKING_RATIO: DesignRange =
    DesignRange::new("Cell volume packing ratio", 0.75, 0.99);

pub(crate) const FOIL_THICKNESS: DesignRange =
    DesignRange::new("Foil thickness", 5.0, f64::INFINITY).with_unit("um");

pub(crate) const SEPARATOR_THICKNESS: DesignRange =
    DesignRange::new("Separator thickness", 10.0, 20.0).with_unit("um");

pub(crate) const SEPARATOR_AREAL_DENSITY: DesignRange =
    DesignRange::new("Separator areal density", 10.0, 20.0).with_unit("g.m-2");

pub(crate) const CYLINDRICAL_SHEET_COUNT: DesignRange =
    DesignRange::new("Positive electrode sheet count (cylindrical)", 0.0, 1.0);

pub(crate) const POROSITY: DesignRange = DesignRange::new("Electrode porosity", 0.15, 0.37);

pub(crate) const ACTIVE_MATERIAL_VOLUME_FRACTION: DesignRange =
    DesignRange::new("Electrode active material volume fraction", 0.0, 1.0);

pub(crate) const N_P_RATIO: DesignRange = DesignRange::new("Cell N/P ratio", 1.0, 1.2);

/// Cooling channel height as a fraction of cell height.
pub(crate) const MAX_COOLING_CHANNEL_FRACTION: f64 = 0.9;

/// Capacity tolerance when matching a target.
pub(crate) const CAPACITY_TOLERANCE: f64 = 0.01;

pub(crate) fn casing_thickness(form_factor: FormFactor) -> DesignRange {
    let (min, max) = match form_factor {
        FormFactor::Prismatic => (0.5, 0.9),
        FormFactor::Cylindrical => (0.3, 0.7),
        FormFactor::Pouch => (0.1, 0.3),
    };
    DesignRange::new("Cell casing thickness", min, max).with_unit("mm")
}

pub(crate) fn mass_loading(side: Side) -> DesignRange {
    let (min, max) = match side {
        Side::Positive => (15.0, 25.0),
        Side::Negative => (8.0, 18.0),
    };
    DesignRange::new("Mass loading", min, max).with_unit("mg.cm-2")
}

/// Coating thicknesses the optimizer may choose.
pub(crate) fn coating_thickness(side: Side) -> DesignRange {
    let (name, max) = match side {
        Side::Positive => ("Positive electrode coating thickness", 100.0),
        Side::Negative => ("Negative electrode coating thickness", 120.0),
    };
    DesignRange::new(name, 30.0, max).with_unit("um")
}
