//! Orchestration of calculators over a shared dataset.
//!
//! A [`Tool`] owns the dataset, the [`Options`], a [`GeneratorRegistry`] and
//! a set of named [`Calculator`]s. [`Tool::run`] executes calculators by
//! name, filling in their missing inputs through the registry first.

mod calculator;

pub use calculator::{Calculator, CalculatorError};

use std::{collections::BTreeMap, time::Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    models::{
        cold_stress::wind_chill::WindChillCalculator,
        heat_stress::{
            approx::{AcsmCalculator, BernardCalculator, DimiceliCalculator},
            argonne::ArgonneCalculator,
        },
    },
    support::{
        generators::{GeneratorRegistry, Options, Resolution},
        grid::Dataset,
    },
};

/// Errors from [`Tool::run`] and [`Tool::require_data`].
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("calculator `{calculator}` failed")]
    Calculator {
        calculator: String,
        #[source]
        source: CalculatorError,
    },
}

/// Runs calculators against a shared dataset.
pub struct Tool {
    data: Dataset,
    options: Options,
    registry: GeneratorRegistry,
    calculators: BTreeMap<String, Box<dyn Calculator>>,
}

impl Tool {
    /// Creates a tool with the built-in generators and no calculators.
    #[must_use]
    pub fn new(data: Dataset, options: Options) -> Self {
        Self {
            data,
            options,
            registry: GeneratorRegistry::with_defaults(),
            calculators: BTreeMap::new(),
        }
    }

    /// Creates a tool with the built-in generators and every built-in
    /// calculator in its default configuration.
    #[must_use]
    pub fn with_defaults(data: Dataset, options: Options) -> Self {
        Self::new(data, options)
            .with_calculator(ArgonneCalculator::default())
            .with_calculator(AcsmCalculator)
            .with_calculator(BernardCalculator)
            .with_calculator(DimiceliCalculator)
            .with_calculator(WindChillCalculator)
    }

    /// Adds or replaces a calculator under its name.
    #[must_use]
    pub fn with_calculator(mut self, calculator: impl Calculator + 'static) -> Self {
        self.calculators
            .insert(calculator.name().to_owned(), Box::new(calculator));
        self
    }

    /// Replaces the generator registry.
    #[must_use]
    pub fn with_registry(mut self, registry: GeneratorRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Consumes the tool, returning its dataset.
    #[must_use]
    pub fn into_data(self) -> Dataset {
        self.data
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Names of the registered calculators, sorted.
    pub fn calculator_names(&self) -> impl Iterator<Item = &str> {
        self.calculators.keys().map(String::as_str)
    }

    /// Makes sure every field is present, generating missing ones in order.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError::MissingData`] for the first field that cannot
    /// be resolved. `requester` names the calculator in the error.
    pub fn require_data(&mut self, requester: &str, fields: &[&str]) -> Result<(), CalculatorError> {
        for field in fields {
            let resolution = self
                .registry
                .resolve(&mut self.data, &self.options, field)
                .map_err(|source| CalculatorError::MissingData {
                    calculator: requester.to_owned(),
                    field: (*field).to_owned(),
                    source,
                })?;
            if let Resolution::Generated { generator } = resolution {
                info!(field = *field, %generator, "generated missing field");
            }
        }
        Ok(())
    }

    /// Runs the named calculators in order.
    ///
    /// Unknown names are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Calculator`] for the first calculator that fails.
    /// Exports of calculators that finished before it are kept.
    pub fn run<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), ToolError> {
        for name in names {
            let name = name.as_ref();
            if !self.calculators.contains_key(name) {
                warn!(calculator = name, "unknown calculator, skipping");
                continue;
            }
            self.run_one(name).map_err(|source| ToolError::Calculator {
                calculator: name.to_owned(),
                source,
            })?;
        }
        Ok(())
    }

    fn run_one(&mut self, name: &str) -> Result<(), CalculatorError> {
        let Some(calculator) = self.calculators.remove(name) else {
            return Ok(());
        };
        let result = self.execute(calculator.as_ref());
        self.calculators.insert(name.to_owned(), calculator);
        result
    }

    fn execute(&mut self, calculator: &dyn Calculator) -> Result<(), CalculatorError> {
        let started = Instant::now();
        let name = calculator.name();
        info!(calculator = name, cells = self.data.grid().len(), "running calculator");

        self.require_data(name, calculator.required_fields())?;
        let input = self.data.select(calculator.required_fields())?;
        let output = calculator.execute(&input, &self.options)?;
        self.data.merge_renamed(&output, calculator.exports())?;

        info!(
            calculator = name,
            elapsed = ?started.elapsed(),
            "calculator finished"
        );
        Ok(())
    }
}
