//! Check Command Implementation
//!
//! Loads the artifacts the same way `predict` and `form` do and reports what
//! the schema resolved to.

use std::io::{self, Write};

use anyhow::Result;
use carprice_core::CategoricalField;
use carprice_serving::{ArtifactConfig, ColumnRole, PricePredictor};
use clap::Args;

use crate::load_predictor;

/// Load the artifacts and report the resolved feature layout
#[derive(Args, Debug, Clone, Default)]
pub struct CheckCommand {
    /// Also run one estimate with the form defaults
    #[arg(long)]
    pub smoke: bool,
}

impl CheckCommand {
    /// Execute the check command.
    pub fn run(&self, config: &ArtifactConfig) -> Result<()> {
        let predictor = load_predictor(config)?;
        let stdout = io::stdout();
        self.report(&predictor, &mut stdout.lock())
    }

    /// Write the layout report for an already-loaded predictor.
    pub fn report<W: Write>(&self, predictor: &PricePredictor, out: &mut W) -> Result<()> {
        let bundle = predictor.bundle();
        let layout = bundle.layout();

        writeln!(out, "Model input width: {}", bundle.model().input_dim())?;
        writeln!(out, "Columns:")?;
        for (position, column) in layout.columns().iter().enumerate() {
            let role = match layout.role(position) {
                Some(ColumnRole::Numeric(_)) => "numeric, scaled".to_string(),
                Some(ColumnRole::Indicator { field, category }) => {
                    format!("{field} = {category}")
                }
                None => "unresolved".to_string(),
            };
            writeln!(out, "  {position:>2}  {column:<24} {role}")?;
        }

        writeln!(out, "Reference categories:")?;
        for field in CategoricalField::ALL {
            let references = layout.reference_categories(field);
            let shown = if references.is_empty() {
                "(none)".to_string()
            } else {
                references.join(", ")
            };
            writeln!(out, "  {:<13} {shown}", field.label())?;
        }

        if self.smoke {
            let estimate = predictor.predict(&Default::default())?;
            writeln!(out, "Smoke estimate: {}", estimate.formatted())?;
        }
        Ok(())
    }
}
