use crate::support::{materials::MaterialRegistry, units::Rounding};

use super::FormulationError;

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Component {
    pub material: String,
    pub fraction: f64,
}

/// A two-material active blend in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Blend {
    pub primary: Component,
    pub secondary: Component,
    /// `"{secondary fraction}:{primary fraction}"`.
    pub ratio: String,
}

/// Checks a blend against its stated ratio and puts it in canonical order.
///
/// The ratio is written `"secondary:primary"`. The fractions must reproduce
/// it to two decimals. Afterwards the component with the larger fraction
/// becomes primary, and the ratio is rewritten from the fractions.
pub(super) fn canonicalize(
    primary: Component,
    secondary: Component,
    ratio: Option<&str>,
    materials: &MaterialRegistry,
) -> Result<Blend, FormulationError> {
    if materials.resolve(&primary.material)? == materials.resolve(&secondary.material)? {
        return Err(FormulationError::SameBlendMaterials {
            material: primary.material,
        });
    }

    let ratio = match ratio.map(str::trim) {
        Some(ratio) if !ratio.is_empty() => ratio,
        _ => {
            return Err(FormulationError::MissingBlendRatio {
                primary: primary.material,
                secondary: secondary.material,
            });
        }
    };

    let (stated_secondary, stated_primary) = parse_ratio(ratio)?;
    if stated_secondary > 0.0 && secondary.fraction > 0.0 {
        let stated = stated_primary / stated_secondary;
        let actual = primary.fraction / secondary.fraction;
        if stated.round_to(2) != actual.round_to(2) {
            return Err(FormulationError::BlendRatioMismatch {
                ratio: ratio.to_string(),
                primary: primary.fraction,
                secondary: secondary.fraction,
            });
        }
    }

    let (primary, secondary) = if primary.fraction < secondary.fraction {
        (secondary, primary)
    } else {
        (primary, secondary)
    };
    let ratio = format!("{}:{}", secondary.fraction, primary.fraction);

    Ok(Blend {
        primary,
        secondary,
        ratio,
    })
}

fn parse_ratio(ratio: &str) -> Result<(f64, f64), FormulationError> {
    let invalid = || FormulationError::InvalidBlendRatio {
        ratio: ratio.to_string(),
    };
    let (secondary, primary) = ratio.split_once(':').ok_or_else(invalid)?;
    let secondary: f64 = secondary.trim().parse().map_err(|_| invalid())?;
    let primary: f64 = primary.trim().parse().map_err(|_| invalid())?;
    if secondary < 0.0 || primary < 0.0 {
        return Err(invalid());
    }
    Ok((secondary, primary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(material: &str, fraction: f64) -> Component {
        Component {
            material: material.to_string(),
            fraction,
        }
    }

    #[test]
    fn matching_ratio_is_rewritten_from_fractions() -> Result<(), FormulationError> {
        let blend = canonicalize(
            component("Graphite", 0.931),
            component("Si", 0.049),
            Some("5:95"),
            &MaterialRegistry::standard(),
        )?;
        assert_eq!(blend.primary.material, "Graphite");
        assert_eq!(blend.ratio, "0.049:0.931");
        Ok(())
    }

    #[test]
    fn larger_fraction_becomes_primary() -> Result<(), FormulationError> {
        let blend = canonicalize(
            component("Si", 0.1),
            component("Graphite", 0.88),
            Some("88:10"),
            &MaterialRegistry::standard(),
        )?;
        assert_eq!(blend.primary.material, "Graphite");
        assert_eq!(blend.secondary.material, "Si");
        assert_eq!(blend.ratio, "0.1:0.88");
        Ok(())
    }

    #[test]
    fn ratio_must_match_fractions() {
        let err = canonicalize(
            component("Graphite", 0.8),
            component("Si", 0.18),
            Some("10:90"),
            &MaterialRegistry::standard(),
        )
        .unwrap_err();
        assert!(matches!(err, FormulationError::BlendRatioMismatch { .. }));
    }

    #[test]
    fn blend_needs_two_materials_and_a_ratio() {
        let registry = MaterialRegistry::standard();
        assert!(matches!(
            canonicalize(component("Si", 0.5), component("Silicon", 0.48), Some("1:1"), &registry),
            Err(FormulationError::SameBlendMaterials { .. })
        ));
        assert!(matches!(
            canonicalize(component("Graphite", 0.9), component("Si", 0.08), None, &registry),
            Err(FormulationError::MissingBlendRatio { .. })
        ));
        assert!(matches!(
            canonicalize(component("Graphite", 0.9), component("Si", 0.08), Some("8/90"), &registry),
            Err(FormulationError::InvalidBlendRatio { .. })
        ));
    }
}
