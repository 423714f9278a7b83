//! Lithium-ion cell design.
//!
//! [`CellDesigner`] is the [`twine_core::Model`] for this module: it turns
//! alias-keyed overrides into a validated [`CellDesign`]. [`get_cell_design`]
//! adds the checks an outer tool layer needs on top of that. The computation
//! lives in the internal `core` module.
//!
//! ```
//! use serde_json::json;
//! use twine_cell_design::models::battery::cell_design::{CellDesigner, Overrides};
//! use twine_core::Model;
//!
//! let overrides: Overrides = serde_json::from_value(json!({
//!     "Form factor": "Cylindrical",
//!     "Cell diameter [mm]": 21.0,
//! }))
//! .unwrap();
//! let design = CellDesigner::default().call(&overrides).unwrap();
//! assert!(design.nominal_capacity() > 4.0);
//! ```

pub(crate) mod core;
mod request;

pub use self::core::{
    AdjustmentOutcome, CapacityMatch, CellDesign, CellSummary, CoatingAdjustment, DesignConfig,
    DesignError, Electrode, Field, FieldKind, FormFactor, Geometry, OptimizationReport,
    Overrides, Scope, Separator, Side, TargetCapacityConfig, TargetCapacityError,
    UnknownFormFactor, Violation,
};
pub use request::{DesignOutcome, DesignRequest, get_cell_design};

use twine_core::Model;

use crate::support::catalog::Catalog;

/// Builds validated cell designs from alias-keyed overrides.
#[derive(Debug, Clone, Default)]
pub struct CellDesigner {
    catalog: Catalog,
    config: DesignConfig,
}

impl CellDesigner {
    #[must_use]
    pub fn new(catalog: Catalog, config: DesignConfig) -> Self {
        Self { catalog, config }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &DesignConfig {
        &self.config
    }
}

impl Model for CellDesigner {
    type Input = Overrides;
    type Output = CellDesign;
    type Error = DesignError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        CellDesign::from_overrides(&self.catalog, input, &self.config)
    }
}
