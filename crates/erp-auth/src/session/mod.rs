//! The console's sign-in state.

pub mod context;

pub use context::SessionContext;
