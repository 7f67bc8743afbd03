//! Form Command Implementation
//!
//! A line-oriented version of the estimator's input form. Each field is
//! prompted with its range or options and a default; an empty line keeps the
//! default and invalid input is re-prompted with the reason.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use carprice_core::{CarAttributes, FuelType, InputBounds, Make, Transmission};
use carprice_serving::PricePredictor;
use clap::Args;
use tracing::info;

pub const TITLE: &str = "Car Price Prediction App 🚗";
pub const SUBTITLE: &str = "Enter car details below to predict its price:";

/// Fill in the car details interactively
///
/// Reads from stdin and writes to stdout. End of input closes the session.
#[derive(Args, Debug, Clone, Default)]
pub struct FormCommand {
    /// Ask for a single car, then exit
    #[arg(long)]
    pub once: bool,
}

impl FormCommand {
    /// Execute the form on the terminal.
    pub fn run(&self, predictor: &PricePredictor) -> Result<()> {
        let shown = run_session(
            predictor,
            InputBounds::current(),
            self.once,
            io::stdin().lock(),
            io::stdout().lock(),
        )?;
        info!(estimates = shown, "Form session ended");
        Ok(())
    }
}

/// Run form sessions until the user stops or input ends.
///
/// Returns the number of estimates shown.
pub fn run_session<R: BufRead, W: Write>(
    predictor: &PricePredictor,
    bounds: InputBounds,
    once: bool,
    input: R,
    output: W,
) -> Result<usize> {
    let mut form = Form {
        bounds,
        input,
        output,
    };
    writeln!(form.output, "{TITLE}")?;
    writeln!(form.output, "{SUBTITLE}")?;

    let mut shown = 0;
    loop {
        writeln!(form.output)?;
        let Some(attrs) = form.fill()? else {
            break;
        };

        match form.confirm("Predict Price?", true)? {
            None => break,
            Some(true) => {
                let estimate = predictor.predict(&attrs).context("Prediction failed")?;
                writeln!(form.output, "{estimate}")?;
                shown += 1;
            }
            Some(false) => {}
        }

        if once || form.confirm("Another estimate?", false)? != Some(true) {
            break;
        }
    }

    form.output.flush()?;
    Ok(shown)
}

struct Form<R, W> {
    bounds: InputBounds,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Form<R, W> {
    /// `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask<T>(
        &mut self,
        label: &str,
        hint: &str,
        default: &str,
        parse: impl Fn(&str) -> carprice_core::Result<T>,
    ) -> io::Result<Option<T>> {
        loop {
            write!(self.output, "{label} ({hint}) [{default}]: ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let raw = if line.is_empty() { default } else { line.as_str() };
            match parse(raw) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "  {e}")?,
            }
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> io::Result<Option<bool>> {
        let choices = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "{question} [{choices}]: ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.to_ascii_lowercase().as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "  Please answer y or n.")?,
            }
        }
    }

    fn fill(&mut self) -> io::Result<Option<CarAttributes>> {
        let b = self.bounds;
        let defaults = CarAttributes::default();

        let Some(year) = self.ask(
            "Year",
            &format!("{}-{}", b.year_min, b.year_max),
            &defaults.year.to_string(),
            |s| b.parse_year(s),
        )?
        else {
            return Ok(None);
        };
        let Some(engine_size) = self.ask(
            "Engine Size (L)",
            &format!("{:.1}-{:.1}", b.engine_size_min, b.engine_size_max),
            &format!("{:.1}", defaults.engine_size),
            |s| b.parse_engine_size(s),
        )?
        else {
            return Ok(None);
        };
        let Some(mileage) = self.ask(
            "Mileage",
            &format!("{}-{}", b.mileage_min, b.mileage_max),
            &defaults.mileage.to_string(),
            |s| b.parse_mileage(s),
        )?
        else {
            return Ok(None);
        };
        let Some(fuel_type) = self.ask(
            "Fuel Type",
            &FuelType::LABELS.join("/"),
            defaults.fuel_type.label(),
            str::parse::<FuelType>,
        )?
        else {
            return Ok(None);
        };
        let Some(transmission) = self.ask(
            "Transmission",
            &Transmission::LABELS.join("/"),
            defaults.transmission.label(),
            str::parse::<Transmission>,
        )?
        else {
            return Ok(None);
        };
        let Some(make) = self.ask(
            "Make",
            &Make::LABELS.join("/"),
            defaults.make.label(),
            str::parse::<Make>,
        )?
        else {
            return Ok(None);
        };

        Ok(Some(CarAttributes {
            year,
            engine_size,
            mileage,
            fuel_type,
            transmission,
            make,
        }))
    }
}
