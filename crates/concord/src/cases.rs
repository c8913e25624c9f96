//! Case discovery and selection.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::catalog::PrecisionMode;
use crate::error::HarnessError;

/// One named input payload, driven through every applicable variant.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Identity: the case file name, unique within the cases directory.
    pub name: String,
    /// Raw bytes staged into the well-known input file.
    pub content: Vec<u8>,
    /// Derived from the name at discovery time.
    pub precision: PrecisionMode,
}

/// Read every file in `dir` as a test case, sorted by name.
pub fn discover_cases(dir: &Path, marker: &str) -> Result<Vec<TestCase>, HarnessError> {
    let mut cases = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            HarnessError::Config(format!("cannot read cases dir '{}': {}", dir.display(), e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let content = fs::read(entry.path())?;
        let precision = PrecisionMode::for_name(&name, marker);
        cases.push(TestCase {
            name,
            content,
            precision,
        });
    }
    cases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cases)
}

/// User-supplied restriction on which discovered cases run.
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    /// Allow-list of case names. Names matching nothing are silently
    /// ignored, not an error.
    pub names: Option<Vec<String>>,
    /// Restrict to one precision mode.
    pub precision: Option<PrecisionMode>,
}

/// Apply `filter` to an already-sorted case list, preserving its order.
pub fn select(cases: Vec<TestCase>, filter: &CaseFilter) -> Vec<TestCase> {
    cases
        .into_iter()
        .filter(|case| {
            filter
                .names
                .as_ref()
                .map_or(true, |names| names.iter().any(|n| n == &case.name))
        })
        .filter(|case| {
            filter
                .precision
                .map_or(true, |precision| precision == case.precision)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn case(name: &str, precision: PrecisionMode) -> TestCase {
        TestCase {
            name: name.to_string(),
            content: Vec::new(),
            precision,
        }
    }

    fn names(cases: &[TestCase]) -> Vec<&str> {
        cases.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_discovery_sorts_and_derives_precision() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("case2"), b"5\n3\n").unwrap();
        fs::write(dir.path().join("case1_bigNumber"), b"99999999999\n").unwrap();
        fs::write(dir.path().join("case0"), b"1\n").unwrap();

        let cases = discover_cases(dir.path(), "bigNumber").unwrap();

        assert_eq!(names(&cases), vec!["case0", "case1_bigNumber", "case2"]);
        assert_eq!(cases[0].precision, PrecisionMode::Standard);
        assert_eq!(cases[1].precision, PrecisionMode::Extended);
        assert_eq!(cases[1].content, b"99999999999\n");
    }

    #[test]
    fn test_discovery_missing_dir_is_config_error() {
        let result = discover_cases(Path::new("/nonexistent/cases"), "bigNumber");
        assert!(matches!(result, Err(HarnessError::Config(_))));
    }

    #[test]
    fn test_select_no_filter_keeps_everything() {
        let cases = vec![
            case("a", PrecisionMode::Standard),
            case("b", PrecisionMode::Extended),
        ];
        let selected = select(cases, &CaseFilter::default());
        assert_eq!(names(&selected), vec!["a", "b"]);
    }

    #[test]
    fn test_select_allow_list_ignores_unknown_names() {
        let cases = vec![
            case("a", PrecisionMode::Standard),
            case("b", PrecisionMode::Standard),
            case("c", PrecisionMode::Standard),
        ];
        let filter = CaseFilter {
            names: Some(vec!["c".to_string(), "a".to_string(), "zzz".to_string()]),
            precision: None,
        };
        // unknown "zzz" is ignored; discovery order (sorted) is preserved
        let selected = select(cases, &filter);
        assert_eq!(names(&selected), vec!["a", "c"]);
    }

    #[test]
    fn test_select_filters_compose() {
        let cases = vec![
            case("a", PrecisionMode::Standard),
            case("a_bigNumber", PrecisionMode::Extended),
            case("b", PrecisionMode::Standard),
            case("b_bigNumber", PrecisionMode::Extended),
        ];
        let filter = CaseFilter {
            names: Some(vec![
                "a".to_string(),
                "b_bigNumber".to_string(),
                "a_bigNumber".to_string(),
            ]),
            precision: Some(PrecisionMode::Extended),
        };
        let selected = select(cases, &filter);
        assert_eq!(names(&selected), vec!["a_bigNumber", "b_bigNumber"]);
    }

    #[test]
    fn test_select_precision_only_can_empty_the_run() {
        let cases = vec![case("case1_bigNumber", PrecisionMode::Extended)];
        let filter = CaseFilter {
            names: None,
            precision: Some(PrecisionMode::Standard),
        };
        assert!(select(cases, &filter).is_empty());
    }
}
