use std::{fmt, str::FromStr};

use thiserror::Error;

/// The three supported cell packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormFactor {
    /// Stacked sheets in a rigid can.
    #[default]
    Prismatic,
    /// A wound jelly roll in a round can.
    Cylindrical,
    /// Stacked sheets in a laminated foil bag.
    Pouch,
}

impl FormFactor {
    pub const ALL: [Self; 3] = [Self::Prismatic, Self::Cylindrical, Self::Pouch];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prismatic => "Prismatic",
            Self::Cylindrical => "Cylindrical",
            Self::Pouch => "Pouch",
        }
    }

    /// Stacked form factors cut sheets to the jelly roll footprint.
    #[must_use]
    pub fn is_stacked(self) -> bool {
        !matches!(self, Self::Cylindrical)
    }
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Form factor must be either 'Prismatic', 'Cylindrical', or 'Pouch'.")]
pub struct UnknownFormFactor(pub String);

impl FromStr for FormFactor {
    type Err = UnknownFormFactor;

    /// Parses a form factor name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|ff| ff.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownFormFactor(s.to_string()))
    }
}

/// Outer dimensions that differ between form factors.
///
/// Lengths are in mm and the cooling arc in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Prismatic {
        width: f64,
    },
    Cylindrical {
        diameter: f64,
        cooling_arc: f64,
        cooling_channel_height: f64,
        jelly_roll_inner_diameter: f64,
    },
    Pouch {
        width: f64,
    },
}

impl Geometry {
    /// Default dimensions of each form factor.
    #[must_use]
    pub fn default_for(form_factor: FormFactor) -> Self {
        match form_factor {
            FormFactor::Prismatic => Self::Prismatic { width: 225.0 },
            FormFactor::Cylindrical => Self::Cylindrical {
                diameter: 21.0,
                cooling_arc: 30.0,
                cooling_channel_height: 45.5,
                jelly_roll_inner_diameter: 4.0,
            },
            FormFactor::Pouch => Self::Pouch { width: 100.0 },
        }
    }

    #[must_use]
    pub fn form_factor(&self) -> FormFactor {
        match self {
            Self::Prismatic { .. } => FormFactor::Prismatic,
            Self::Cylindrical { .. } => FormFactor::Cylindrical,
            Self::Pouch { .. } => FormFactor::Pouch,
        }
    }
}
