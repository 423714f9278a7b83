use std::fmt;

use thiserror::Error;

use crate::support::{
    constraint::{DesignRange, RangeViolation},
    electrolyte::ElectrolyteError,
    formulation::FormulationError,
    materials::MaterialError,
};

/// Errors raised while building or validating a cell design.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignError {
    /// An override key that is neither a known alias nor a dotted sub-key.
    #[error(
        "Unrecognized parameter '{key}'. Check for typos or use the correct field alias as defined in the model."
    )]
    UnrecognizedParameter { key: String },

    #[error(transparent)]
    UnknownMaterial(MaterialError),

    #[error(transparent)]
    InvalidFormulation(FormulationError),

    /// A value or combination of values outside what can be built.
    #[error(transparent)]
    InvalidDesign(Violation),
}

impl From<FormulationError> for DesignError {
    fn from(err: FormulationError) -> Self {
        match err {
            FormulationError::Material(err) => err.into(),
            other => Self::InvalidFormulation(other),
        }
    }
}

impl From<MaterialError> for DesignError {
    fn from(err: MaterialError) -> Self {
        if matches!(err, MaterialError::InvalidProperties { .. }) {
            Self::InvalidDesign(Violation::new("Cell casing material", err.to_string()))
        } else {
            Self::UnknownMaterial(err)
        }
    }
}

impl From<ElectrolyteError> for DesignError {
    fn from(err: ElectrolyteError) -> Self {
        Self::InvalidDesign(Violation::new("Electrolyte composition", err.to_string()))
    }
}

impl From<Violation> for DesignError {
    fn from(violation: Violation) -> Self {
        Self::InvalidDesign(violation)
    }
}

/// One broken design rule, with a message a user can act on.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Alias or name of the offending parameter.
    pub parameter: String,
    pub value: Option<f64>,
    pub range: Option<DesignRange>,
    pub message: String,
}

impl Violation {
    #[must_use]
    pub fn new(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            value: None,
            range: None,
            message: message.into(),
        }
    }

    /// A range violation, optionally followed by a corrective hint.
    #[must_use]
    pub fn out_of_range(violation: RangeViolation, hint: Option<String>) -> Self {
        let message = match hint {
            Some(hint) => format!("{violation}. {hint}"),
            None => violation.to_string(),
        };
        Self {
            parameter: violation.range.name().to_string(),
            value: Some(violation.value),
            range: Some(violation.range),
            message,
        }
    }

    #[must_use]
    pub fn with_value(self, value: f64) -> Self {
        Self {
            value: Some(value),
            ..self
        }
    }

    #[must_use]
    pub fn with_range(self, range: DesignRange) -> Self {
        Self {
            range: Some(range),
            ..self
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Violation {}
