//! # Twine Cell Design
//!
//! Lithium-ion cell design computation and validation built on
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! A design is described by parameters keyed by human-readable aliases such
//! as `"Positive electrode mass loading [mg.cm-2]"`. The engine fills in the
//! defaults of the chosen form factor, resolves materials and electrode
//! formulations, derives capacity, energy, masses and geometry, and rejects
//! designs that cannot be built with a message saying what to change.
//!
//! ## Crate layout
//!
//! - [`models`]: The [`twine_core::Model`] for cell design and the request
//!   layer around it.
//! - [`support`]: Reference data and utilities used by the models: material
//!   and formulation catalogs, electrolytes, numeric constraints and units.
//!
//! Modules in [`support`] are part of the public API, but their APIs are not
//! stable.

pub mod models;
pub mod support;
