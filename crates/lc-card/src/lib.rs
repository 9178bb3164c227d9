//! # lc-card
//!
//! Datacard assembly engine. A caller declares a 4-dimensional experiment
//! space (eras × analyses × channels × processes), populates expected and
//! observed yields, attaches systematic uncertainties over arbitrary
//! subsets of that space, and renders the resolved result as a fixed-width
//! datacard for the limit-setting tool.
//!
//! Components:
//! - [`space::SpaceRegistry`] — dimension vocabularies and validation.
//! - [`yields::YieldStore`] — expected/observed yield payloads.
//! - [`systematics::SystematicRegistry`] — templated uncertainty declarations.
//! - [`resolve`] — template expansion and per-cell value resolution.
//! - [`assemble::RowAssembler`] — bins/rates/nuisance-row construction.
//! - [`render`] — fixed-width card serialization.
//! - [`workspace::FitWorkspace`] — shared workspace for parametric models.
//! - [`builder::CardBuilder`] — session-level facade over all of the above.

#![warn(clippy::all)]

pub mod assemble;
pub mod builder;
pub mod models;
pub mod payload;
pub mod render;
pub mod resolve;
pub mod space;
pub mod systematics;
pub mod workspace;
pub mod yields;

pub use assemble::{AssembleOptions, CardTable, RowAssembler, Selection};
pub use builder::CardBuilder;
pub use models::{ModelKind, ModelSpec, ParamRange};
pub use payload::{Payload, YIELD_FLOOR};
pub use space::{Dimension, SpaceRegistry, WILDCARD};
pub use systematics::{Cell, DimFilter, Entry, Mode, SystValue, Systematic, SystematicRegistry};
pub use workspace::FitWorkspace;
pub use yields::YieldStore;
