//! Design rules.
//!
//! [`per_field`] checks inputs one at a time and runs before optimization.
//! [`cross_field`] checks derived quantities and runs after it. Both stop at
//! the first violation.

use crate::support::constraint::{DesignRange, NonNegative, StrictlyPositive, UnitInterval};

use super::{CellDesign, Field, Geometry, Side, Violation, limits};

/// Checks every input against its own limits.
///
/// # Errors
///
/// Returns the first [`Violation`] found.
pub(crate) fn per_field(design: &CellDesign) -> Result<(), Violation> {
    let form_factor = design.form_factor();

    strictly_positive(Field::CellHeight, design.height)?;
    match design.geometry {
        Geometry::Prismatic { width } | Geometry::Pouch { width } => {
            strictly_positive(Field::CellWidth, width)?;
        }
        Geometry::Cylindrical {
            diameter,
            cooling_arc,
            cooling_channel_height,
            jelly_roll_inner_diameter,
        } => {
            strictly_positive(Field::CellDiameter, diameter)?;
            non_negative(Field::CoolingArc, cooling_arc)?;
            strictly_positive(Field::CoolingChannelHeight, cooling_channel_height)?;
            strictly_positive(Field::JellyRollInnerDiameter, jelly_roll_inner_diameter)?;

            let max_channel = limits::MAX_COOLING_CHANNEL_FRACTION * design.height;
            if cooling_channel_height > max_channel {
                return Err(Violation::new(
                    Field::CoolingChannelHeight.alias(),
                    format!(
                        "Cell cooling channel height is {cooling_channel_height} but must be less than 90% of cell height that is <= {max_channel}"
                    ),
                )
                .with_value(cooling_channel_height));
            }
        }
    }

    in_range(limits::VOLUME_PACKING_RATIO, design.volume_packing_ratio)?;
    in_range(limits::casing_thickness(form_factor), design.casing_thickness)?;
    non_negative(Field::ThermalResistance, design.thermal_resistance)?;
    non_negative(Field::ElectrodeOverhang, design.electrode_overhang)?;
    strictly_positive(Field::UpperVoltageCutoff, design.upper_voltage_cutoff)?;
    non_negative(Field::LowerVoltageCutoff, design.lower_voltage_cutoff)?;
    if design.lower_voltage_cutoff >= design.upper_voltage_cutoff {
        return Err(Violation::new(
            Field::LowerVoltageCutoff.alias(),
            format!(
                "Lower voltage cut-off is {} but must be below the upper voltage cut-off of {}",
                design.lower_voltage_cutoff, design.upper_voltage_cutoff
            ),
        )
        .with_value(design.lower_voltage_cutoff));
    }

    strictly_positive(Field::JellyRollCount, f64::from(design.jelly_roll_count))?;
    strictly_positive(Field::PositiveSheetCount, f64::from(design.positive_sheet_count))?;
    if !form_factor.is_stacked() {
        in_range(
            limits::CYLINDRICAL_SHEET_COUNT,
            f64::from(design.positive_sheet_count),
        )?;
    }

    for (side, thickness, density) in [
        (
            Side::Positive,
            Field::PositiveCoatingThickness,
            Field::PositiveFoilDensity,
        ),
        (
            Side::Negative,
            Field::NegativeCoatingThickness,
            Field::NegativeFoilDensity,
        ),
    ] {
        let e = design.electrode(side);
        strictly_positive(thickness, e.coating_thickness)?;
        strictly_positive(density, e.foil_density)?;
        in_range(limits::FOIL_THICKNESS, e.foil_thickness)?;
        mass_loading(side, e.mass_loading)?;
    }
    non_negative(
        Field::NegativeCurrentCollectorThickness,
        design.negative_current_collector_thickness,
    )?;

    in_range(limits::SEPARATOR_THICKNESS, design.separator.thickness)?;
    in_range(limits::SEPARATOR_AREAL_DENSITY, design.separator.areal_density)?;
    UnitInterval::new(design.separator.porosity).map_err(|_| {
        Violation::new(
            Field::SeparatorPorosity.alias(),
            format!(
                "Separator porosity is {} but must be between 0 and 1",
                design.separator.porosity
            ),
        )
        .with_value(design.separator.porosity)
    })?;

    Ok(())
}

/// Checks the derived quantities that depend on several inputs.
///
/// # Errors
///
/// Returns the first [`Violation`] found.
pub(crate) fn cross_field(design: &CellDesign) -> Result<(), Violation> {
    for side in [Side::Positive, Side::Negative] {
        name_consistency(design, side)?;
    }
    for side in [Side::Positive, Side::Negative] {
        porosity(design, side)?;
        volume_fractions(design, side)?;
    }
    np_ratio(design)
}

fn in_range(range: DesignRange, value: f64) -> Result<f64, Violation> {
    range
        .check(value)
        .map_err(|violation| Violation::out_of_range(violation, None))
}

fn strictly_positive(field: Field, value: f64) -> Result<(), Violation> {
    StrictlyPositive::new(value).map(|_| ()).map_err(|_| {
        Violation::new(
            field.alias(),
            format!("{} is {value} but must be greater than 0", field.alias()),
        )
        .with_value(value)
    })
}

fn non_negative(field: Field, value: f64) -> Result<(), Violation> {
    NonNegative::new(value).map(|_| ()).map_err(|_| {
        Violation::new(
            field.alias(),
            format!("{} is {value} but must not be negative", field.alias()),
        )
        .with_value(value)
    })
}

/// A loading out of range gets a hint to scale the active material fraction
/// by `min / value` instead.
fn mass_loading(side: Side, value: f64) -> Result<(), Violation> {
    let range = limits::mass_loading(side);
    range.check(value).map(|_| ()).map_err(|violation| {
        let hint = format!(
            "Or consider reducing the active material mass fraction by {:.2}.",
            range.min() / value
        );
        Violation::out_of_range(violation, Some(hint))
    })
}

fn capitalized(side: Side) -> &'static str {
    match side {
        Side::Positive => "Positive",
        Side::Negative => "Negative",
    }
}

fn name_consistency(design: &CellDesign, side: Side) -> Result<(), Violation> {
    let formulation = &design.electrode(side).formulation;
    if formulation.name_mentions_active_material() {
        return Ok(());
    }
    Err(Violation::new(
        format!("{} electrode formulation", capitalized(side)),
        format!(
            "{} electrode formulation name '{}' must contain similar string as primary active material '{}'",
            capitalized(side),
            formulation.name(),
            formulation.primary_active_material()
        ),
    ))
}

fn porosity(design: &CellDesign, side: Side) -> Result<(), Violation> {
    let porosity = design.porosity_raw(side);
    if limits::POROSITY.contains(porosity) {
        return Ok(());
    }

    let e = design.electrode(side);
    let density = e.formulation.density_g_cm3();
    let thickness_at =
        |porosity: f64| e.mass_loading * 1e-3 / ((1.0 - porosity) * density * 1e-4);
    let label = side.label();
    Err(Violation::new(
        format!("{} electrode porosity", capitalized(side)),
        format!(
            "Calculated {label} electrode porosity {porosity:.3} is outside the valid range [0.15, 0.37]. Set the {label} electrode coating thickness, which is {}, between {:.3} um and {:.3} um.",
            e.coating_thickness,
            thickness_at(limits::POROSITY.min()),
            thickness_at(limits::POROSITY.max()),
        ),
    )
    .with_value(porosity)
    .with_range(limits::POROSITY))
}

fn volume_fractions(design: &CellDesign, side: Side) -> Result<(), Violation> {
    let label = side.label();
    let fraction = design.active_material_volume_fraction(side);
    if !limits::ACTIVE_MATERIAL_VOLUME_FRACTION.contains(fraction) {
        return Err(Violation::new(
            format!("{} electrode active material volume fraction", capitalized(side)),
            format!(
                "Calculated {label} electrode active material volume fraction {fraction:.3} is outside the valid range [0, 1]."
            ),
        )
        .with_value(fraction)
        .with_range(limits::ACTIVE_MATERIAL_VOLUME_FRACTION));
    }

    let total = design.porosity(side) + fraction;
    if total > 1.0 {
        let formulation = &design.electrode(side).formulation;
        let max_fraction =
            formulation.active_material_density_g_cm3() / formulation.density_g_cm3();
        return Err(Violation::new(
            format!("{} electrode active material mass fraction", capitalized(side)),
            format!(
                "{} electrode porosity + active material volume fraction sum exceeds 1.0. Set the {label} electrode active material mass fraction, which is {}, below {max_fraction:.3}",
                capitalized(side),
                formulation.primary_active_material_mass_fraction(),
            ),
        )
        .with_value(total));
    }
    Ok(())
}

/// The hint gives the negative loading range that brings N/P into
/// `[1.0, 1.2]`, or an active fraction to lower when that range would fall
/// below the minimum loading.
fn np_ratio(design: &CellDesign) -> Result<(), Violation> {
    let ratio = design.np_ratio_raw();
    if limits::N_P_RATIO.contains(ratio) {
        return Ok(());
    }

    let pos = design.positive();
    let neg = design.negative();
    let positive_capacity = pos.formulation.specific_capacity_mah_g()
        * pos.mass_loading
        * pos.formulation.primary_active_material_mass_fraction();
    let negative_fraction = neg.formulation.primary_active_material_mass_fraction();
    let per_loading = negative_fraction * neg.formulation.specific_capacity_mah_g();
    let loading_min = positive_capacity / per_loading * limits::N_P_RATIO.min();
    let loading_max = positive_capacity / per_loading * limits::N_P_RATIO.max();
    let negative_floor = limits::mass_loading(Side::Negative).min();

    let mut message = format!(
        "N/P ratio {ratio:.2} must be between 1.0 and 1.2. With the current positive electrode mass loading of {} mg/cm²",
        pos.mass_loading
    );
    if loading_min <= negative_floor {
        let fraction = loading_min * negative_fraction / negative_floor;
        message.push_str(&format!(
            " the negative electrode active material mass fraction, which is {negative_fraction}, should be less than {fraction:.2}, and the negative electrode mass loading, which is {}, should be more than {loading_min:.2} mg/cm².",
            neg.mass_loading
        ));
    } else {
        message.push_str(&format!(
            " and negative electrode active material mass fraction of {negative_fraction}, the negative electrode mass loading, which is {}, should be between {loading_min:.2} and {loading_max:.2} mg/cm².",
            neg.mass_loading
        ));
    }

    Err(Violation::new(Field::NpRatio.alias(), message)
        .with_value(ratio)
        .with_range(limits::N_P_RATIO))
}
