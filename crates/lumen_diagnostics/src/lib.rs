//! lumen_diagnostics - Diagnostic model for the Lumen compiler
//!
//! Defines severities, resolved source positions, and the renderable
//! [`Diagnostic`] structure the checker and driver use to report errors
//! and warnings in a uniform textual (and JSON) form.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diagnostic;

pub use diagnostic::{Diagnostic, Severity, SourcePos};
