//! Battery models.
//!
//! This module contains models for battery cells and their components.

pub mod cell_design;
