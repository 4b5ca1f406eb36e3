//! Navigation: the fixed set of console screens and their mounted lists.

pub mod definition;
pub mod registry;

pub use definition::{ListSource, ScreenDefinition, ScreenKind, console_screens};
pub use registry::{ScreenFetcher, ScreenRegistry};
