//! Variant catalog: the static table of executables under test.
//!
//! The catalog is declared once at startup (from the config file, or the
//! built-in default table) and never mutated afterwards. Precision-mode
//! twins are ordinary table entries with an `Extended` precision field,
//! not runtime clones of the standard entries.

use serde::Deserialize;
use std::collections::HashSet;

use crate::error::HarnessError;

/// Execution strategy of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecKind {
    /// Single-threaded, one process.
    Sequential,
    /// In-process threads; the thread count is passed on the command line.
    Concurrent,
    /// Multiple processes launched through a distributed-process launcher.
    Distributed,
}

impl ExecKind {
    /// Concurrency degrees exercised for this kind. Fixed mapping, not
    /// configurable per run.
    pub fn degrees(self) -> &'static [u32] {
        match self {
            ExecKind::Sequential => &[1],
            ExecKind::Concurrent => &[1, 2, 8],
            ExecKind::Distributed => &[2, 4, 8],
        }
    }
}

/// Numeric-precision mode.
///
/// Cases and variants partition into two non-interacting pools: a Standard
/// case never runs an Extended variant and vice versa, since the two
/// compute different representations of the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionMode {
    #[default]
    Standard,
    Extended,
}

impl PrecisionMode {
    /// Derive the mode of a case or variant from its name. By naming
    /// convention, extended-precision entries carry a marker substring
    /// (`bigNumber` by default).
    pub fn for_name(name: &str, marker: &str) -> Self {
        if name.contains(marker) {
            PrecisionMode::Extended
        } else {
            PrecisionMode::Standard
        }
    }
}

/// One alternative executable implementation of the computation under test.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variant {
    /// Identifier, unique within the catalog. Also names the source file
    /// and artifact for the default build step.
    pub name: String,
    pub kind: ExecKind,
    #[serde(default)]
    pub precision: PrecisionMode,
}

/// Immutable, declaration-ordered set of variants.
#[derive(Debug, Clone)]
pub struct VariantCatalog {
    variants: Vec<Variant>,
}

impl VariantCatalog {
    /// Build a catalog, rejecting duplicate names.
    pub fn new(variants: Vec<Variant>) -> Result<Self, HarnessError> {
        let mut seen = HashSet::new();
        for variant in &variants {
            if !seen.insert(variant.name.as_str()) {
                return Err(HarnessError::Config(format!(
                    "duplicate variant name '{}' in catalog",
                    variant.name
                )));
            }
        }
        Ok(Self { variants })
    }

    /// Catalog from the config file's `[[variants]]` table, falling back
    /// to the built-in default set when none are declared.
    pub fn from_declared(variants: Vec<Variant>) -> Result<Self, HarnessError> {
        if variants.is_empty() {
            Ok(Self::default_catalog())
        } else {
            Self::new(variants)
        }
    }

    /// The built-in table: one sequential and two distributed
    /// implementations of the suman computation, each with an
    /// extended-precision twin.
    pub fn default_catalog() -> Self {
        let table = [
            ("suman_sequential", ExecKind::Sequential, PrecisionMode::Standard),
            ("suman_reduce", ExecKind::Distributed, PrecisionMode::Standard),
            ("suman_dynamic", ExecKind::Distributed, PrecisionMode::Standard),
            ("suman_sequential_bigNumber", ExecKind::Sequential, PrecisionMode::Extended),
            ("suman_reduce_bigNumber", ExecKind::Distributed, PrecisionMode::Extended),
            ("suman_dynamic_bigNumber", ExecKind::Distributed, PrecisionMode::Extended),
        ];
        Self {
            variants: table
                .into_iter()
                .map(|(name, kind, precision)| Variant {
                    name: name.to_string(),
                    kind,
                    precision,
                })
                .collect(),
        }
    }

    /// Every variant whose precision matches `mode` exactly, in
    /// declaration order.
    pub fn applicable(&self, mode: PrecisionMode) -> Vec<&Variant> {
        self.variants.iter().filter(|v| v.precision == mode).collect()
    }

    /// All entries, for the up-front build phase.
    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(name: &str, kind: ExecKind, precision: PrecisionMode) -> Variant {
        Variant {
            name: name.to_string(),
            kind,
            precision,
        }
    }

    #[test]
    fn test_execution_plan_degrees() {
        assert_eq!(ExecKind::Sequential.degrees(), &[1]);
        assert_eq!(ExecKind::Concurrent.degrees(), &[1, 2, 8]);
        assert_eq!(ExecKind::Distributed.degrees(), &[2, 4, 8]);
    }

    #[test]
    fn test_precision_from_name() {
        assert_eq!(
            PrecisionMode::for_name("case1", "bigNumber"),
            PrecisionMode::Standard
        );
        assert_eq!(
            PrecisionMode::for_name("case1_bigNumber", "bigNumber"),
            PrecisionMode::Extended
        );
        assert_eq!(
            PrecisionMode::for_name("bigNumber_first", "bigNumber"),
            PrecisionMode::Extended
        );
    }

    #[test]
    fn test_applicable_preserves_declaration_order() {
        let catalog = VariantCatalog::new(vec![
            variant("b", ExecKind::Distributed, PrecisionMode::Standard),
            variant("x", ExecKind::Sequential, PrecisionMode::Extended),
            variant("a", ExecKind::Sequential, PrecisionMode::Standard),
        ])
        .unwrap();

        let standard: Vec<&str> = catalog
            .applicable(PrecisionMode::Standard)
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(standard, vec!["b", "a"]);

        let extended: Vec<&str> = catalog
            .applicable(PrecisionMode::Extended)
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(extended, vec!["x"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = VariantCatalog::new(vec![
            variant("a", ExecKind::Sequential, PrecisionMode::Standard),
            variant("a", ExecKind::Distributed, PrecisionMode::Standard),
        ]);
        assert!(matches!(result, Err(HarnessError::Config(_))));
    }

    #[test]
    fn test_same_name_different_precision_is_still_duplicate() {
        let result = VariantCatalog::new(vec![
            variant("a", ExecKind::Sequential, PrecisionMode::Standard),
            variant("a", ExecKind::Sequential, PrecisionMode::Extended),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_catalog_modes_partition() {
        let catalog = VariantCatalog::default_catalog();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.applicable(PrecisionMode::Standard).len(), 3);
        assert_eq!(catalog.applicable(PrecisionMode::Extended).len(), 3);
    }

    #[test]
    fn test_from_declared_falls_back_to_default() {
        let catalog = VariantCatalog::from_declared(Vec::new()).unwrap();
        assert!(!catalog.is_empty());
    }
}
