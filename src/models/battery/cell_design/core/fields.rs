//! The alias of every design field.
//!
//! Overrides and dumps are keyed by human-readable aliases such as
//! `Cell height [mm]`. [`Field`] is the single table mapping those aliases to
//! design fields, recording whether a field is an input or derived, and
//! which form factors it applies to.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::FormFactor;

/// Whether a field is set by the caller or computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Input,
    Derived,
}

/// The form factors a field exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    /// Prismatic and pouch.
    Stacked,
    Cylindrical,
}

impl Scope {
    #[must_use]
    pub fn includes(self, form_factor: FormFactor) -> bool {
        match self {
            Self::All => true,
            Self::Stacked => form_factor.is_stacked(),
            Self::Cylindrical => !form_factor.is_stacked(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    // Inputs
    FormFactor,
    CellHeight,
    CellWidth,
    CellDiameter,
    VolumePackingRatio,
    CasingThickness,
    CasingMaterial,
    ThermalResistance,
    ElectrodeOverhang,
    UpperVoltageCutoff,
    LowerVoltageCutoff,
    JellyRollCount,
    CoolingArc,
    CoolingChannelHeight,
    JellyRollInnerDiameter,
    PositiveFormulation,
    PositiveSheetCount,
    PositiveMassLoading,
    PositiveCoatingThickness,
    PositiveFoilThickness,
    PositiveFoilDensity,
    NegativeFormulation,
    NegativeMassLoading,
    NegativeCoatingThickness,
    NegativeFoilThickness,
    NegativeFoilDensity,
    NegativeCurrentCollectorThickness,
    SeparatorComposition,
    SeparatorThickness,
    SeparatorArealDensity,
    SeparatorPorosity,
    ElectrolyteComposition,

    // Derived
    NominalVoltage,
    NominalCapacity,
    NominalEnergy,
    NpRatio,
    CurrentDensity,
    CellVolume,
    CellMass,
    CasingMass,
    CoolingSurfaceArea,
    CellThickness,
    JellyRollHeight,
    JellyRollWidth,
    JellyRollThickness,
    JellyRollOuterDiameter,
    JellyRollWindings,
    JellyRollWrappingThickness,
    JellyRollMass,
    JellyRollVolume,
    PositiveSheetHeight,
    PositiveSheetWidth,
    PositiveSheetThickness,
    PositiveCoatingDensity,
    PositivePorosity,
    PositiveActiveMaterialVolumeFraction,
    NegativeSheetCount,
    NegativeSheetHeight,
    NegativeSheetWidth,
    NegativeSheetThickness,
    NegativeCoatingDensity,
    NegativePorosity,
    NegativeActiveMaterialVolumeFraction,
    SeparatorSheetCount,
    SeparatorSheetWidth,
    SeparatorSheetHeight,
    ElectrolyteMass,
}

static BY_ALIAS: Lazy<HashMap<&'static str, Field>> =
    Lazy::new(|| Field::ALL.iter().map(|field| (field.alias(), *field)).collect());

impl Field {
    pub const ALL: [Self; 67] = [
        Self::FormFactor,
        Self::CellHeight,
        Self::CellWidth,
        Self::CellDiameter,
        Self::VolumePackingRatio,
        Self::CasingThickness,
        Self::CasingMaterial,
        Self::ThermalResistance,
        Self::ElectrodeOverhang,
        Self::UpperVoltageCutoff,
        Self::LowerVoltageCutoff,
        Self::JellyRollCount,
        Self::CoolingArc,
        Self::CoolingChannelHeight,
        Self::JellyRollInnerDiameter,
        Self::PositiveFormulation,
        Self::PositiveSheetCount,
        Self::PositiveMassLoading,
        Self::PositiveCoatingThickness,
        Self::PositiveFoilThickness,
        Self::PositiveFoilDensity,
        Self::NegativeFormulation,
        Self::NegativeMassLoading,
        Self::NegativeCoatingThickness,
        Self::NegativeFoilThickness,
        Self::NegativeFoilDensity,
        Self::NegativeCurrentCollectorThickness,
        Self::SeparatorComposition,
        Self::SeparatorThickness,
        Self::SeparatorArealDensity,
        Self::SeparatorPorosity,
        Self::ElectrolyteComposition,
        Self::NominalVoltage,
        Self::NominalCapacity,
        Self::NominalEnergy,
        Self::NpRatio,
        Self::CurrentDensity,
        Self::CellVolume,
        Self::CellMass,
        Self::CasingMass,
        Self::CoolingSurfaceArea,
        Self::CellThickness,
        Self::JellyRollHeight,
        Self::JellyRollWidth,
        Self::JellyRollThickness,
        Self::JellyRollOuterDiameter,
        Self::JellyRollWindings,
        Self::JellyRollWrappingThickness,
        Self::JellyRollMass,
        Self::JellyRollVolume,
        Self::PositiveSheetHeight,
        Self::PositiveSheetWidth,
        Self::PositiveSheetThickness,
        Self::PositiveCoatingDensity,
        Self::PositivePorosity,
        Self::PositiveActiveMaterialVolumeFraction,
        Self::NegativeSheetCount,
        Self::NegativeSheetHeight,
        Self::NegativeSheetWidth,
        Self::NegativeSheetThickness,
        Self::NegativeCoatingDensity,
        Self::NegativePorosity,
        Self::NegativeActiveMaterialVolumeFraction,
        Self::SeparatorSheetCount,
        Self::SeparatorSheetWidth,
        Self::SeparatorSheetHeight,
        Self::ElectrolyteMass,
    ];

    /// Looks up a field by its exact alias.
    #[must_use]
    pub fn from_alias(alias: &str) -> Option<Self> {
        BY_ALIAS.get(alias).copied()
    }

    #[must_use]
    pub fn alias(self) -> &'static str {
        self.entry().0
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        self.entry().1
    }

    #[must_use]
    pub fn scope(self) -> Scope {
        self.entry().2
    }

    #[must_use]
    pub fn applies_to(self, form_factor: FormFactor) -> bool {
        self.scope().includes(form_factor)
    }

    #[allow(clippy::too_many_lines)]
    fn entry(self) -> (&'static str, FieldKind, Scope) {
        use FieldKind::{Derived, Input};
        use Scope::{All, Cylindrical, Stacked};

        match self {
            Self::FormFactor => ("Form factor", Input, All),
            Self::CellHeight => ("Cell height [mm]", Input, All),
            Self::CellWidth => ("Cell width [mm]", Input, Stacked),
            Self::CellDiameter => ("Cell diameter [mm]", Input, Cylindrical),
            Self::VolumePackingRatio => ("Cell volume packing ratio", Input, All),
            Self::CasingThickness => ("Cell casing thickness [mm]", Input, All),
            Self::CasingMaterial => ("Cell casing material", Input, All),
            Self::ThermalResistance => ("Cell thermal resistance [K.W-1]", Input, All),
            Self::ElectrodeOverhang => ("Cell electrode overhang [mm]", Input, All),
            Self::UpperVoltageCutoff => ("Upper voltage cut-off [V]", Input, All),
            Self::LowerVoltageCutoff => ("Lower voltage cut-off [V]", Input, All),
            Self::JellyRollCount => ("Jelly roll count", Input, All),
            Self::CoolingArc => ("Cell cooling arc [degree]", Input, Cylindrical),
            Self::CoolingChannelHeight => ("Cell cooling channel height [mm]", Input, Cylindrical),
            Self::JellyRollInnerDiameter => ("Jelly roll inner diameter [mm]", Input, Cylindrical),
            Self::PositiveFormulation => ("Positive electrode formulation", Input, All),
            Self::PositiveSheetCount => ("Positive electrode sheet count", Input, All),
            Self::PositiveMassLoading => ("Positive electrode mass loading [mg.cm-2]", Input, All),
            Self::PositiveCoatingThickness => {
                ("Positive electrode coating thickness [um]", Input, All)
            }
            Self::PositiveFoilThickness => ("Positive electrode foil thickness [um]", Input, All),
            Self::PositiveFoilDensity => ("Positive electrode foil density [g.cm-3]", Input, All),
            Self::NegativeFormulation => ("Negative electrode formulation", Input, All),
            Self::NegativeMassLoading => ("Negative electrode mass loading [mg.cm-2]", Input, All),
            Self::NegativeCoatingThickness => {
                ("Negative electrode coating thickness [um]", Input, All)
            }
            Self::NegativeFoilThickness => ("Negative electrode foil thickness [um]", Input, All),
            Self::NegativeFoilDensity => ("Negative electrode foil density [g.cm-3]", Input, All),
            Self::NegativeCurrentCollectorThickness => {
                ("Negative current collector thickness [m]", Input, All)
            }
            Self::SeparatorComposition => ("Separator composition", Input, All),
            Self::SeparatorThickness => ("Separator thickness [um]", Input, All),
            Self::SeparatorArealDensity => ("Separator areal density [g.m-2]", Input, All),
            Self::SeparatorPorosity => ("Separator porosity", Input, All),
            Self::ElectrolyteComposition => ("Electrolyte composition", Input, All),

            Self::NominalVoltage => ("Cell nominal voltage [V]", Derived, All),
            Self::NominalCapacity => ("Cell nominal capacity [A.h]", Derived, All),
            Self::NominalEnergy => ("Cell nominal energy [W.h]", Derived, All),
            Self::NpRatio => ("Cell N/P ratio", Derived, All),
            Self::CurrentDensity => ("Cell current density [A.cm-2]", Derived, All),
            Self::CellVolume => ("Cell volume [L]", Derived, All),
            Self::CellMass => ("Cell mass [g]", Derived, All),
            Self::CasingMass => ("Cell casing mass [g]", Derived, All),
            Self::CoolingSurfaceArea => ("Cell cooling surface area [mm2]", Derived, All),
            Self::CellThickness => ("Cell thickness [mm]", Derived, Stacked),
            Self::JellyRollHeight => ("Jelly roll height [mm]", Derived, All),
            Self::JellyRollWidth => ("Jelly roll width [mm]", Derived, Stacked),
            Self::JellyRollThickness => ("Jelly roll thickness [mm]", Derived, Stacked),
            Self::JellyRollOuterDiameter => {
                ("Jelly roll outer diameter [mm]", Derived, Cylindrical)
            }
            Self::JellyRollWindings => ("Jelly roll windings", Derived, Cylindrical),
            Self::JellyRollWrappingThickness => {
                ("Jelly roll wrapping thickness [mm]", Derived, Cylindrical)
            }
            Self::JellyRollMass => ("Jelly roll mass [g]", Derived, All),
            Self::JellyRollVolume => ("Jelly roll volume [L]", Derived, All),
            Self::PositiveSheetHeight => ("Positive electrode sheet height [mm]", Derived, All),
            Self::PositiveSheetWidth => ("Positive electrode sheet width [mm]", Derived, All),
            Self::PositiveSheetThickness => ("Positive electrode sheet thickness [um]", Derived, All),
            Self::PositiveCoatingDensity => {
                ("Positive electrode coating density [g.cm-3]", Derived, All)
            }
            Self::PositivePorosity => ("Positive electrode porosity", Derived, All),
            Self::PositiveActiveMaterialVolumeFraction => {
                ("Positive electrode active material volume fraction", Derived, All)
            }
            Self::NegativeSheetCount => ("Negative electrode sheet count", Derived, All),
            Self::NegativeSheetHeight => ("Negative electrode sheet height [mm]", Derived, All),
            Self::NegativeSheetWidth => ("Negative electrode sheet width [mm]", Derived, All),
            Self::NegativeSheetThickness => ("Negative electrode sheet thickness [um]", Derived, All),
            Self::NegativeCoatingDensity => {
                ("Negative electrode coating density [g.cm-3]", Derived, All)
            }
            Self::NegativePorosity => ("Negative electrode porosity", Derived, All),
            Self::NegativeActiveMaterialVolumeFraction => {
                ("Negative electrode active material volume fraction", Derived, All)
            }
            Self::SeparatorSheetCount => ("Separator sheet count", Derived, All),
            Self::SeparatorSheetWidth => ("Separator sheet width [mm]", Derived, All),
            Self::SeparatorSheetHeight => ("Separator sheet height [mm]", Derived, All),
            Self::ElectrolyteMass => ("Electrolyte mass [g]", Derived, All),
        }
    }
}
