use std::{collections::BTreeMap, fmt, sync::Arc};

use tracing::debug;

use crate::support::grid::Dataset;

use super::{Context, GeneratorError, Options, ResolveError, common, radiation, solar};

/// Maximum number of chained generator hops below a top-level resolution.
pub const MAX_CHAIN_DEPTH: usize = 2;

/// The function run by a generator.
pub type GeneratorFn = Arc<dyn Fn(&mut Context<'_>) -> Result<(), GeneratorError> + Send + Sync>;

/// A registered field generator.
#[derive(Clone)]
pub struct Generator {
    name: String,
    provides: Vec<String>,
    requires: Vec<String>,
    options: Vec<String>,
    func: GeneratorFn,
}

impl Generator {
    /// Creates a generator that provides nothing yet.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<(), GeneratorError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            provides: Vec::new(),
            requires: Vec::new(),
            options: Vec::new(),
            func: Arc::new(func),
        }
    }

    /// Fields this generator writes.
    #[must_use]
    pub fn provides(mut self, fields: &[&str]) -> Self {
        self.provides = fields.iter().map(|&f| f.to_owned()).collect();
        self
    }

    /// Fields that must be present before this generator may run.
    #[must_use]
    pub fn requires(mut self, fields: &[&str]) -> Self {
        self.requires = fields.iter().map(|&f| f.to_owned()).collect();
        self
    }

    /// Options that must be set before this generator may run.
    #[must_use]
    pub fn options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|&o| o.to_owned()).collect();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn provided_fields(&self) -> &[String] {
        &self.provides
    }

    #[must_use]
    pub fn required_fields(&self) -> &[String] {
        &self.requires
    }

    #[must_use]
    pub fn required_options(&self) -> &[String] {
        &self.options
    }

    fn is_satisfied(&self, data: &Dataset, options: &Options) -> bool {
        self.requires.iter().all(|field| data.contains(field)) && options.has_all(self.options.as_slice())
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("name", &self.name)
            .field("provides", &self.provides)
            .field("requires", &self.requires)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The field was already in the dataset; nothing ran.
    AlreadyPresent,

    /// The named generator ran and produced the field.
    Generated { generator: String },
}

/// Generators keyed by the fields they provide, in registration order.
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    generators: Vec<Generator>,
    by_field: BTreeMap<String, Vec<usize>>,
}

impl GeneratorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in common, radiation and solar generators.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        common::register(&mut registry);
        radiation::register(&mut registry);
        solar::register(&mut registry);
        registry
    }

    /// Adds a generator as the least preferred candidate for each field it provides.
    pub fn register(&mut self, generator: Generator) -> &mut Self {
        let index = self.generators.len();
        for field in &generator.provides {
            self.by_field.entry(field.clone()).or_default().push(index);
        }
        self.generators.push(generator);
        self
    }

    /// Candidates for `field`, most preferred first.
    pub fn candidates(&self, field: &str) -> impl Iterator<Item = &Generator> {
        self.by_field
            .get(field)
            .into_iter()
            .flatten()
            .map(|&index| &self.generators[index])
    }

    /// Returns `true` if some generator provides `field`.
    #[must_use]
    pub fn knows(&self, field: &str) -> bool {
        self.by_field.contains_key(field)
    }

    /// Makes sure `field` is in `data`, running the first satisfiable generator if not.
    ///
    /// Resolving a field that is already present returns
    /// [`Resolution::AlreadyPresent`] without running anything.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoGenerator`] if nothing provides the field,
    /// [`ResolveError::Unsatisfiable`] if no candidate can run, and the
    /// generator's failure otherwise.
    pub fn resolve(
        &self,
        data: &mut Dataset,
        options: &Options,
        field: &str,
    ) -> Result<Resolution, ResolveError> {
        let mut chain = Vec::new();
        self.resolve_chained(data, options, field, &mut chain)
    }

    pub(super) fn resolve_chained(
        &self,
        data: &mut Dataset,
        options: &Options,
        field: &str,
        chain: &mut Vec<String>,
    ) -> Result<Resolution, ResolveError> {
        if data.contains(field) {
            return Ok(Resolution::AlreadyPresent);
        }

        if chain.iter().any(|active| active == field) {
            let mut cycle = chain.clone();
            cycle.push(field.to_owned());
            return Err(ResolveError::Cycle { chain: cycle });
        }

        if chain.len() > MAX_CHAIN_DEPTH {
            return Err(ResolveError::DepthExceeded {
                field: field.to_owned(),
                depth: chain.len(),
            });
        }

        if !self.knows(field) {
            return Err(ResolveError::NoGenerator {
                field: field.to_owned(),
            });
        }

        let generator = self
            .candidates(field)
            .find(|generator| generator.is_satisfied(data, options))
            .ok_or_else(|| ResolveError::Unsatisfiable {
                field: field.to_owned(),
            })?;

        debug!(
            field,
            generator = generator.name(),
            depth = chain.len(),
            "generating field"
        );

        chain.push(field.to_owned());
        let outcome = {
            let mut ctx = Context {
                data: &mut *data,
                options,
                registry: self,
                chain: &mut *chain,
            };
            (generator.func)(&mut ctx)
        };
        chain.pop();

        outcome.map_err(|source| ResolveError::Generator {
            field: field.to_owned(),
            generator: generator.name.clone(),
            source: Box::new(source),
        })?;

        if !data.contains(field) {
            return Err(ResolveError::NotProduced {
                field: field.to_owned(),
                generator: generator.name.clone(),
            });
        }

        Ok(Resolution::Generated {
            generator: generator.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use ndarray::Array3;

    use crate::support::grid::{FieldMeta, test_support::constant_dataset};

    fn innermost(err: &ResolveError) -> &ResolveError {
        match err {
            ResolveError::Generator { source, .. } => match source.as_ref() {
                GeneratorError::Input(inner) => innermost(inner),
                _ => err,
            },
            _ => err,
        }
    }

    fn constant(field: &'static str, value: f64) -> Generator {
        Generator::new(format!("const_{field}"), move |ctx| {
            let shape = ctx.grid().shape();
            ctx.insert(field, Array3::from_elem(shape, value), FieldMeta::default())
        })
        .provides(&[field])
    }

    #[test]
    fn unknown_and_unsatisfiable_are_distinct() {
        let mut registry = GeneratorRegistry::new();
        registry.register(constant("b", 1.0).requires(&["a"]));

        let mut data = constant_dataset(&[]);
        let options = Options::new();

        assert!(matches!(
            registry.resolve(&mut data, &options, "zzz"),
            Err(ResolveError::NoGenerator { field }) if field == "zzz"
        ));
        assert!(matches!(
            registry.resolve(&mut data, &options, "b"),
            Err(ResolveError::Unsatisfiable { field }) if field == "b"
        ));
    }

    #[test]
    fn registration_order_is_preference_order() {
        let mut registry = GeneratorRegistry::new();
        registry
            .register(constant("x", 1.0).requires(&["missing"]))
            .register(constant("x", 2.0).requires(&["t2m"]))
            .register(constant("x", 3.0).requires(&["t2m"]));

        let mut data = constant_dataset(&[("t2m", 300.0)]);
        registry.resolve(&mut data, &Options::new(), "x").unwrap();

        assert_eq!(data.values("x").unwrap()[[0, 0, 0]], 2.0);
    }

    #[test]
    fn options_gate_candidates() {
        let mut registry = GeneratorRegistry::new();
        registry.register(constant("x", 1.0).options(&["needed"]));

        let mut data = constant_dataset(&[]);
        assert!(matches!(
            registry.resolve(&mut data, &Options::new(), "x"),
            Err(ResolveError::Unsatisfiable { .. })
        ));

        let options = Options::new().with("needed", true);
        registry.resolve(&mut data, &options, "x").unwrap();
        assert!(data.contains("x"));
    }

    #[test]
    fn resolving_twice_is_a_no_op() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        let mut registry = GeneratorRegistry::new();
        registry.register(
            Generator::new("counted", move |ctx| {
                counter.fetch_add(1, Ordering::SeqCst);
                let shape = ctx.grid().shape();
                ctx.insert("x", Array3::zeros(shape), FieldMeta::default())
            })
            .provides(&["x"]),
        );

        let mut data = constant_dataset(&[]);
        let first = registry.resolve(&mut data, &Options::new(), "x").unwrap();
        let second = registry.resolve(&mut data, &Options::new(), "x").unwrap();

        assert_eq!(
            first,
            Resolution::Generated {
                generator: "counted".into()
            }
        );
        assert_eq!(second, Resolution::AlreadyPresent);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn chained_resolution_within_depth() {
        let mut registry = GeneratorRegistry::new();
        registry
            .register(constant("a", 1.0))
            .register(
                Generator::new("b_from_a", |ctx| {
                    ctx.ensure("a")?;
                    let b = ctx.values("a")? + 1.0;
                    ctx.insert("b", b, FieldMeta::default())
                })
                .provides(&["b"]),
            )
            .register(
                Generator::new("c_from_b", |ctx| {
                    ctx.ensure("b")?;
                    let c = ctx.values("b")? * 10.0;
                    ctx.insert("c", c, FieldMeta::default())
                })
                .provides(&["c"]),
            );

        let mut data = constant_dataset(&[]);
        registry.resolve(&mut data, &Options::new(), "c").unwrap();

        assert_eq!(data.values("c").unwrap()[[1, 2, 1]], 20.0);
        assert!(data.contains("a") && data.contains("b"));
    }

    #[test]
    fn chains_deeper_than_the_limit_fail() {
        let mut registry = GeneratorRegistry::new();
        registry.register(constant("f0", 0.0));
        for (out, input) in [("f1", "f0"), ("f2", "f1"), ("f3", "f2")] {
            registry.register(
                Generator::new(format!("{out}_from_{input}"), move |ctx| {
                    ctx.ensure(input)?;
                    let values = ctx.values(input)?.clone();
                    ctx.insert(out, values, FieldMeta::default())
                })
                .provides(&[out]),
            );
        }

        let mut data = constant_dataset(&[]);
        let err = registry.resolve(&mut data, &Options::new(), "f3").unwrap_err();

        // f3 -> f2 -> f1 -> f0 is three hops below f3.
        assert!(matches!(
            innermost(&err),
            ResolveError::DepthExceeded { field, depth: 3 } if field == "f0"
        ));
        assert!(!data.contains("f3"));

        let mut data = constant_dataset(&[]);
        registry.resolve(&mut data, &Options::new(), "f2").unwrap();
    }

    #[test]
    fn cycles_are_detected() {
        let mut registry = GeneratorRegistry::new();
        registry
            .register(
                Generator::new("a_from_b", |ctx| {
                    ctx.ensure("b")?;
                    Ok(())
                })
                .provides(&["a"]),
            )
            .register(
                Generator::new("b_from_a", |ctx| {
                    ctx.ensure("a")?;
                    Ok(())
                })
                .provides(&["b"]),
            );

        let mut data = constant_dataset(&[]);
        let err = registry.resolve(&mut data, &Options::new(), "a").unwrap_err();

        assert!(matches!(
            innermost(&err),
            ResolveError::Cycle { chain } if chain == &["a", "b", "a"]
        ));
    }

    #[test]
    fn generator_must_produce_its_field() {
        let mut registry = GeneratorRegistry::new();
        registry.register(Generator::new("lazy", |_| Ok(())).provides(&["x"]));

        let mut data = constant_dataset(&[]);
        assert!(matches!(
            registry.resolve(&mut data, &Options::new(), "x"),
            Err(ResolveError::NotProduced { .. })
        ));
    }

    #[test]
    fn defaults_cover_the_common_fields() {
        let registry = GeneratorRegistry::with_defaults();
        for field in [
            "t2mC", "d2mC", "sktC", "ws10", "wdir10", "d2m", "e_kPa", "rh", "msl_kPa", "sp_kPa",
            "Isw_in", "Isw_net", "Isw_frac", "Ibeam", "fal", "ws2", "ts", "lon", "lat", "solza",
            "solaz", "solhra", "soldist",
        ] {
            assert!(registry.knows(field), "{field}");
        }
    }
}
