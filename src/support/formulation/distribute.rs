use super::{FormulationFields, Polarity};

/// Splits the non-active remainder between binder and conductive agent.
///
/// Runs only when the active fraction is given and no binder or conductive
/// fraction is, so a partially specified record is never second-guessed.
/// Cathodes get a binder and a conductive agent; anodes get two binders.
/// Slot names already present are kept.
pub(super) fn distribute_mass_fractions(
    fields: FormulationFields,
    polarity: Polarity,
) -> FormulationFields {
    let Some(active) = fields.primary_active_material_mass_fraction else {
        return fields;
    };
    if fields.primary_binder_mass_fraction.is_some()
        || fields.primary_conductive_agent_mass_fraction.is_some()
        || fields.secondary_binder_mass_fraction.is_some()
    {
        return fields;
    }

    let remaining = 1.0 - active - fields.secondary_active_material_mass_fraction.unwrap_or(0.0);
    if remaining <= 0.0 {
        return fields;
    }
    let half = remaining / 2.0;

    match polarity {
        Polarity::Cathode => FormulationFields {
            primary_binder: fields.primary_binder.or_else(|| Some("PVDF".into())),
            primary_binder_mass_fraction: Some(half),
            primary_conductive_agent: fields
                .primary_conductive_agent
                .or_else(|| Some("Carbon".into())),
            primary_conductive_agent_mass_fraction: Some(half),
            ..fields
        },
        Polarity::Anode => FormulationFields {
            primary_binder: fields.primary_binder.or_else(|| Some("CMC".into())),
            primary_binder_mass_fraction: Some(half),
            secondary_binder: fields.secondary_binder.or_else(|| Some("SBR".into())),
            secondary_binder_mass_fraction: Some(half),
            ..fields
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn active_only(material: &str, fraction: f64) -> FormulationFields {
        FormulationFields {
            name: Some(material.into()),
            primary_active_material: Some(material.into()),
            primary_active_material_mass_fraction: Some(fraction),
            ..FormulationFields::default()
        }
    }

    #[test]
    fn cathode_gets_binder_and_conductive_agent() {
        let fields = distribute_mass_fractions(active_only("NMC811", 0.96), Polarity::Cathode);
        assert_eq!(fields.primary_binder.as_deref(), Some("PVDF"));
        assert_eq!(fields.primary_conductive_agent.as_deref(), Some("Carbon"));
        assert_relative_eq!(fields.primary_binder_mass_fraction.unwrap(), 0.02, epsilon = 1e-12);
        assert_relative_eq!(
            fields.primary_conductive_agent_mass_fraction.unwrap(),
            0.02,
            epsilon = 1e-12
        );
    }

    #[test]
    fn anode_gets_two_binders() {
        let fields = distribute_mass_fractions(active_only("Graphite", 0.95), Polarity::Anode);
        assert_eq!(fields.primary_binder.as_deref(), Some("CMC"));
        assert_eq!(fields.secondary_binder.as_deref(), Some("SBR"));
        assert_eq!(fields.primary_conductive_agent, None);
        assert_relative_eq!(fields.secondary_binder_mass_fraction.unwrap(), 0.025, epsilon = 1e-12);
    }

    #[test]
    fn partial_records_are_left_alone() {
        let fields = FormulationFields {
            primary_binder_mass_fraction: Some(0.03),
            ..active_only("LFP", 0.94)
        };
        assert_eq!(distribute_mass_fractions(fields.clone(), Polarity::Cathode), fields);

        let full = active_only("LFP", 1.0);
        assert_eq!(distribute_mass_fractions(full.clone(), Polarity::Cathode), full);
    }
}
