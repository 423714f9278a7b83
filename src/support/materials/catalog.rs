//! Standard material table.
//!
//! Units: density g/cm³, electrical conductivity S/m, thermal conductivity
//! W/(m·K), specific heat J/(g·K).

pub(super) struct Entry {
    pub name: &'static str,
    pub density: f64,
    pub electrical_conductivity: f64,
    pub thermal_conductivity: f64,
    pub specific_heat: f64,
    pub aliases: &'static [&'static str],
}

const fn entry(
    name: &'static str,
    [density, electrical_conductivity, thermal_conductivity, specific_heat]: [f64; 4],
    aliases: &'static [&'static str],
) -> Entry {
    Entry {
        name,
        density,
        electrical_conductivity,
        thermal_conductivity,
        specific_heat,
        aliases,
    }
}

/// Registry order matters: alias collisions resolve to the later entry.
pub(super) const MATERIALS: &[Entry] = &[
    // Casing and current collector metals
    entry(
        "Aluminum-Laminate",
        [2.7, 3.77e7, 237.0, 0.897],
        &["Al-Laminate", "Al-Lam", "Aluminum Laminate", "Al Laminate", "Al-L", "AL"],
    ),
    entry(
        "Copper",
        [8.96, 5.96e7, 401.0, 0.385],
        &["Cu", "Copper metal", "Copper foil", "Cu foil", "Copper sheet"],
    ),
    entry(
        "Aluminum",
        [2.70, 3.77e7, 237.0, 0.897],
        &["Al", "Aluminum metal", "Aluminum foil", "Al foil", "Al sheet", "Aluminum sheet"],
    ),
    entry(
        "Steel",
        [7.85, 1.45e6, 50.2, 0.49],
        &["Carbon steel", "Mild steel", "Low carbon steel", "Steel alloy", "Steel sheet"],
    ),
    entry(
        "Stainless Steel",
        [8.00, 1.45e6, 16.2, 0.50],
        &["SS", "Stainless", "Stainless steel alloy", "SS sheet", "Corrosion resistant steel"],
    ),
    entry(
        "Nickel",
        [8.90, 1.43e7, 90.9, 0.444],
        &["Ni", "Nickel metal", "Nickel foil", "Ni foil", "Nickel sheet"],
    ),
    entry(
        "Titanium",
        [4.51, 2.38e6, 21.9, 0.523],
        &["Ti", "Titanium metal", "Titanium alloy", "Ti alloy", "Titanium sheet"],
    ),
    // Lithium-ion active materials
    entry(
        "Silicon",
        [2.33, 1e3, 149.0, 0.71],
        &["Si", "Silicon metal", "Silicon powder", "Si powder", "Silicon anode"],
    ),
    entry(
        "Graphite",
        [2.26, 1e5, 120.0, 0.71],
        &[
            "C",
            "Carbon graphite",
            "Graphite powder",
            "Graphite anode",
            "Natural graphite",
            "Synthetic graphite",
        ],
    ),
    entry(
        "NMC811",
        [4.8, 1.0, 2.5, 0.8],
        &["NMC", "NMC811", "LiNi0.8Mn0.1Co0.1O2", "NMC-811"],
    ),
    entry(
        "LFP",
        [3.6, 1e-6, 1.5, 0.7],
        &["Lithium Iron Phosphate", "LiFePO4", "LFP cathode", "Iron phosphate", "LiFePO4 cathode"],
    ),
    entry(
        "LCO",
        [5.1, 1e-4, 3.7, 0.8],
        &["Lithium Cobalt Oxide", "LiCoO2", "LCO cathode", "Cobalt oxide", "LiCoO2 cathode"],
    ),
    entry(
        "NCA",
        [4.8, 1.0, 2.5, 0.8],
        &["Nickel Cobalt Aluminum", "LiNi0.8Co0.15Al0.05O2", "NCA cathode", "Aluminum doped NCA"],
    ),
    entry(
        "NMC622",
        [4.75, 1.0, 2.5, 0.8],
        &["NMC-622", "LiNi0.6Mn0.2Co0.2O2", "NMC622 cathode"],
    ),
    entry(
        "NMC523",
        [4.75, 1.0, 2.5, 0.8],
        &["NMC-523", "LiNi0.5Mn0.3Co0.2O2", "NMC523 cathode"],
    ),
    entry(
        "NMC111",
        [4.7, 1.0, 2.5, 0.8],
        &["NMC-111", "LiNi0.33Mn0.33Co0.33O2", "NMC111 cathode"],
    ),
    entry(
        "LNO",
        [4.8, 1.0, 2.5, 0.8],
        &["Lithium Nickel Oxide", "LiNiO2", "LNO cathode"],
    ),
    entry(
        "LTO",
        [3.5, 1e-7, 1.0, 0.7],
        &["Lithium Titanate", "Li4Ti5O12", "LTO anode", "Titanate anode", "Li4Ti5O12 anode"],
    ),
    // Binders and conductive additives
    entry(
        "PVDF",
        [1.78, 1e-16, 0.19, 1.2],
        &[
            "Polyvinylidene fluoride",
            "Polyvinylidene difluoride",
            "PVDF binder",
            "PVDF polymer",
            "Kynar",
        ],
    ),
    entry(
        "Carbon",
        [2.2, 1e4, 140.0, 0.71],
        &[
            "C",
            "Carbon black",
            "Carbon powder",
            "Carbon additive",
            "Carbon conductive agent",
            "CNT",
        ],
    ),
    entry(
        "CMC",
        [1.6, 1e-10, 0.2, 1.2],
        &[
            "Carboxymethyl cellulose",
            "Sodium CMC",
            "CMC binder",
            "Cellulose derivative",
            "CMC thickener",
        ],
    ),
    entry(
        "SBR",
        [0.94, 1e-12, 0.13, 1.7],
        &[
            "Styrene butadiene rubber",
            "SBR binder",
            "Styrene butadiene",
            "SBR latex",
            "SBR emulsion",
        ],
    ),
    // Sodium-ion chemistries
    entry(
        "Sodium",
        [0.97, 2.1e7, 142.0, 1.23],
        &["Na", "Sodium metal", "Na metal", "Sodium anode", "Na anode", "Sodium foil"],
    ),
    entry(
        "NaFePO4",
        [3.4, 1e-8, 1.2, 0.8],
        &["Sodium Iron Phosphate", "SFP", "NaFePO4 cathode", "Sodium iron phosphate", "SFP cathode"],
    ),
    entry(
        "Na3V2(PO4)3",
        [3.2, 1e-6, 1.8, 0.9],
        &[
            "Sodium Vanadium Phosphate",
            "NVP",
            "Na3V2(PO4)3 cathode",
            "NVP cathode",
            "Sodium vanadium phosphate",
        ],
    ),
    entry(
        "Na2Fe2(SO4)3",
        [3.5, 1e-7, 1.5, 0.8],
        &[
            "Sodium Iron Sulfate",
            "NFS",
            "Na2Fe2(SO4)3 cathode",
            "NFS cathode",
            "Sodium iron sulfate",
        ],
    ),
    entry(
        "NaCrO2",
        [4.8, 1e-4, 2.2, 0.7],
        &["Sodium Chromium Oxide", "NCO", "NaCrO2 cathode", "NCO cathode", "Sodium chromium oxide"],
    ),
    entry(
        "NaMnO2",
        [4.2, 1e-5, 2.0, 0.8],
        &["Sodium Manganese Oxide", "NMO", "NaMnO2 cathode", "NMO cathode", "Sodium manganese oxide"],
    ),
    entry(
        "NaNiO2",
        [4.9, 1e-3, 2.5, 0.8],
        &["Sodium Nickel Oxide", "NNO", "NaNiO2 cathode", "NNO cathode", "Sodium nickel oxide"],
    ),
    entry(
        "NaCoO2",
        [5.1, 1e-4, 2.8, 0.8],
        &["Sodium Cobalt Oxide", "NCO", "NaCoO2 cathode", "NCO cathode", "Sodium cobalt oxide"],
    ),
    entry(
        "NaTi2(PO4)3",
        [2.9, 1e-8, 1.1, 0.9],
        &[
            "Sodium Titanium Phosphate",
            "NTP",
            "NaTi2(PO4)3 anode",
            "NTP anode",
            "Sodium titanium phosphate",
        ],
    ),
    entry(
        "Na2Ti3O7",
        [3.1, 1e-7, 1.3, 0.8],
        &["Sodium Titanium Oxide", "NTO", "Na2Ti3O7 anode", "NTO anode", "Sodium titanium oxide"],
    ),
    entry(
        "Hard Carbon",
        [1.8, 1e3, 80.0, 0.7],
        &[
            "Hard carbon",
            "Hard carbon anode",
            "Hard carbon sodium",
            "Hard carbon Na",
            "Hard carbon sodium-ion",
        ],
    ),
    entry(
        "Soft Carbon",
        [1.6, 1e4, 100.0, 0.7],
        &[
            "Soft carbon",
            "Soft carbon anode",
            "Soft carbon sodium",
            "Soft carbon Na",
            "Soft carbon sodium-ion",
        ],
    ),
    // Lithium metal
    entry(
        "Lithium",
        [0.534, 1.1e7, 85.0, 3.58],
        &[
            "Li",
            "Lithium metal",
            "Li metal",
            "Lithium anode",
            "Li anode",
            "Lithium foil",
            "Lithium sheet",
        ],
    ),
    entry(
        "Lithium Metal",
        [0.534, 1.1e7, 85.0, 3.58],
        &["Li metal", "Lithium metal", "Li anode", "Lithium anode", "Lithium foil", "Li foil"],
    ),
    // Sodium salts
    entry(
        "NaPF6",
        [2.37, 1e-12, 0.2, 1.1],
        &[
            "Sodium Hexafluorophosphate",
            "NaPF6 electrolyte",
            "Sodium PF6",
            "NaPF6 salt",
            "Sodium hexafluorophosphate",
        ],
    ),
    entry(
        "NaClO4",
        [2.02, 1e-12, 0.2, 1.0],
        &["Sodium Perchlorate", "NaClO4 electrolyte", "Sodium perchlorate", "NaClO4 salt"],
    ),
    entry(
        "NaBF4",
        [2.47, 1e-12, 0.2, 1.1],
        &["Sodium Tetrafluoroborate", "NaBF4 electrolyte", "Sodium tetrafluoroborate", "NaBF4 salt"],
    ),
    entry(
        "NaTFSI",
        [1.96, 1e-12, 0.2, 1.2],
        &[
            "Sodium Trifluoromethanesulfonimide",
            "NaTFSI electrolyte",
            "Sodium TFSI",
            "NaTFSI salt",
            "Sodium trifluoromethanesulfonimide",
        ],
    ),
    entry(
        "NaFSI",
        [2.15, 1e-12, 0.2, 1.1],
        &[
            "Sodium Bis(fluorosulfonyl)imide",
            "NaFSI electrolyte",
            "Sodium FSI",
            "NaFSI salt",
            "Sodium bis(fluorosulfonyl)imide",
        ],
    ),
];
