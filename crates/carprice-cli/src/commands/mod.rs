//! CLI Command Implementations
//!
//! - [`predict`]: one-shot estimate from flags
//! - [`form`]: interactive line form
//! - [`check`]: artifact self-test
//! - [`export`]: demo artifact export

mod check;
mod export;
mod form;
mod predict;

pub use check::CheckCommand;
pub use export::ExportDemoCommand;
pub use form::{run_session, FormCommand};
pub use predict::PredictCommand;
