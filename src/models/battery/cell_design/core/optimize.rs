//! Coating thickness correction.
//!
//! A coating is buildable when its density (mass loading over thickness) is
//! between 63% and 85% of the dry formulation density, which is the same
//! as a porosity between 0.15 and 0.37. Before the cross-field checks run,
//! each electrode whose thickness puts it outside that band is moved to the
//! nearest edge, inset slightly so rounding keeps it inside.

use tracing::{debug, warn};

use crate::support::{
    constraint::DesignRange,
    units::{Rounding, coating_thickness},
};

use super::{CellDesign, DesignConfig, Side, limits};

/// What the optimizer did to one electrode.
#[derive(Debug, Clone, PartialEq)]
pub struct CoatingAdjustment {
    pub side: Side,
    /// Thickness before optimization, in µm.
    pub original: f64,
    pub outcome: AdjustmentOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdjustmentOutcome {
    /// The thickness was moved into the band.
    Moved { thickness: f64 },

    /// The band needs a thickness outside the allowed limits, so the
    /// thickness was left as it was.
    OutOfLimits { required: f64, limits: DesignRange },
}

/// Every change, or failed change, made by one optimization pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizationReport {
    pub adjustments: Vec<CoatingAdjustment>,
}

impl OptimizationReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }

    /// Adjustments that could not be applied.
    pub fn failures(&self) -> impl Iterator<Item = &CoatingAdjustment> {
        self.adjustments
            .iter()
            .filter(|a| matches!(a.outcome, AdjustmentOutcome::OutOfLimits { .. }))
    }
}

/// Thickness range in µm that puts the coating density inside the band.
fn thickness_band(design: &CellDesign, side: Side, config: &DesignConfig) -> (f64, f64) {
    let e = design.electrode(side);
    let density = e.formulation.density_g_cm3();
    (
        coating_thickness(e.mass_loading, config.max_coating_density_ratio * density),
        coating_thickness(e.mass_loading, config.min_coating_density_ratio * density),
    )
}

/// Runs one pass over both electrodes.
///
/// Failures are reported through `warn!` and the returned report; they do
/// not stop the pipeline, and the cross-field checks then explain what is
/// wrong with the unchanged thickness.
pub(crate) fn optimize(mut design: CellDesign, config: &DesignConfig) -> CellDesign {
    let mut report = OptimizationReport::default();

    for side in [Side::Positive, Side::Negative] {
        let original = design.electrode(side).coating_thickness;
        let (thinnest, thickest) = thickness_band(&design, side, config);

        let target = if original < thinnest {
            thinnest * (1.0 + config.band_edge_inset)
        } else if original > thickest {
            thickest * (1.0 - config.band_edge_inset)
        } else {
            continue;
        };
        let target = target.round3();

        let limits = limits::coating_thickness(side);
        if limits.contains(target) {
            debug!(
                electrode = side.label(),
                from = original,
                to = target,
                "moved coating thickness into density band"
            );
            design.electrode_mut(side).coating_thickness = target;
            report.adjustments.push(CoatingAdjustment {
                side,
                original,
                outcome: AdjustmentOutcome::Moved { thickness: target },
            });
        } else {
            warn!(
                electrode = side.label(),
                thickness = original,
                required = target,
                "coating thickness cannot reach the density band within its limits"
            );
            report.adjustments.push(CoatingAdjustment {
                side,
                original,
                outcome: AdjustmentOutcome::OutOfLimits {
                    required: target,
                    limits,
                },
            });
        }
    }

    design.optimization = report;
    design
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::battery::cell_design::core::{FormFactor, test_support::default_design};

    #[test]
    fn in_band_coatings_are_untouched() {
        let design = optimize(default_design(FormFactor::Prismatic), &DesignConfig::default());
        assert!(design.optimization().is_empty());
        assert_relative_eq!(design.positive().coating_thickness, 50.0);
    }

    #[test]
    fn dense_coating_is_thickened() {
        let mut design = default_design(FormFactor::Pouch);
        design.positive.mass_loading = 20.0;
        let design = optimize(design, &DesignConfig::default());

        let [adjustment] = design.optimization().adjustments.as_slice() else {
            panic!("expected one adjustment");
        };
        assert_eq!(adjustment.side, Side::Positive);
        let AdjustmentOutcome::Moved { thickness } = adjustment.outcome else {
            panic!("expected the thickness to move");
        };
        assert_relative_eq!(thickness, design.positive().coating_thickness);
        let porosity = design.porosity(Side::Positive);
        assert!((0.15..=0.37).contains(&porosity), "porosity {porosity}");
    }

    #[test]
    fn sparse_coating_is_thinned() {
        let mut design = default_design(FormFactor::Prismatic);
        design.negative.coating_thickness = 75.0;
        let design = optimize(design, &DesignConfig::default());
        assert!(design.negative().coating_thickness < 75.0);
        let porosity = design.porosity(Side::Negative);
        assert!((0.15..=0.37).contains(&porosity), "porosity {porosity}");
    }

    #[test]
    fn unreachable_band_is_reported() {
        let mut design = default_design(FormFactor::Prismatic);
        design.negative.mass_loading = 25.0;
        design.negative.coating_thickness = 20.0;
        let design = optimize(design, &DesignConfig::default());

        assert_relative_eq!(design.negative().coating_thickness, 20.0);
        let failures: Vec<_> = design.optimization().failures().collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0].outcome,
            AdjustmentOutcome::OutOfLimits { required, .. } if required > 120.0
        ));
    }
}
