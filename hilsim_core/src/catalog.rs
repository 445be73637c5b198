//! Test catalog loading.
//!
//! The catalog is a TOML document with a `[[runs]]` array; each entry names
//! the compiled test binary and may carry an unstripped companion binary
//! and extra simulator arguments:
//!
//! ```toml
//! [[runs]]
//! elf = "build/matmul.elf"
//! symbols = "build/matmul.debug.elf"
//! args = ["+max-cycles=2000000"]
//!
//! [[runs]]
//! elf = "build/boot.elf"
//! ```
//!
//! Unknown keys are ignored so older orchestrators keep working against
//! newer catalogs. Required fields are validated after deserialization so
//! the error names the offending entry instead of failing deep inside
//! execution.

use crate::error::CatalogError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Immutable descriptor of one test. Loaded once from the catalog, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSpec {
    /// Unique identifier, derived from the ELF file stem
    pub id: String,

    /// Path to the compiled test binary
    pub elf: PathBuf,

    /// Optional unstripped companion binary for post-hoc symbol inspection
    pub symbols: Option<PathBuf>,

    /// Extra arguments forwarded to the simulator
    pub args: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogDoc {
    runs: Option<Vec<RunEntry>>,
}

#[derive(Debug, Deserialize)]
struct RunEntry {
    elf: Option<PathBuf>,
    symbols: Option<PathBuf>,
    #[serde(default)]
    args: Vec<String>,
}

/// Loads the catalog document at `path` into an ordered list of test
/// specs. Reads the file and nothing else.
pub fn load(path: &Path) -> Result<Vec<TestSpec>, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}

fn parse(text: &str, path: &Path) -> Result<Vec<TestSpec>, CatalogError> {
    let doc: CatalogDoc = toml::from_str(text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = doc.runs.ok_or_else(|| CatalogError::MissingRuns {
        path: path.to_path_buf(),
    })?;

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut specs = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let elf = entry.elf.ok_or_else(|| CatalogError::MissingElf {
            path: path.to_path_buf(),
            index,
        })?;
        specs.push(TestSpec {
            id: derive_id(&elf, &mut seen),
            elf,
            symbols: entry.symbols,
            args: entry.args,
        });
    }
    Ok(specs)
}

/// Derives a unique test id from the ELF file stem. Entries sharing a stem
/// get a numeric suffix so their run directories stay disjoint.
fn derive_id(elf: &Path, seen: &mut HashMap<String, usize>) -> String {
    let stem = elf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "test".to_string());
    let count = seen.entry(stem.clone()).or_insert(0);
    *count += 1;
    if *count == 1 {
        stem
    } else {
        format!("{}_{}", stem, count)
    }
}

/// Retains only the specs whose ELF lives under `scope`.
///
/// The match is on whole path segments, so scope `a` keeps `a/x.elf` and
/// `a/b/y.elf` but not `ab/z.elf`. Catalog order is preserved.
pub fn scope_filter(specs: Vec<TestSpec>, scope: &Path) -> Vec<TestSpec> {
    specs
        .into_iter()
        .filter(|spec| spec.elf.starts_with(scope))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_runs_in_order() {
        let text = r#"
[[runs]]
elf = "build/matmul.elf"
symbols = "build/matmul.debug.elf"
args = ["+max-cycles=1000"]

[[runs]]
elf = "build/boot.elf"
"#;
        let specs = parse(text, Path::new("testlist.toml")).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].id, "matmul");
        assert_eq!(specs[0].symbols, Some(PathBuf::from("build/matmul.debug.elf")));
        assert_eq!(specs[0].args, vec!["+max-cycles=1000"]);
        assert_eq!(specs[1].id, "boot");
        assert!(specs[1].symbols.is_none());
        assert!(specs[1].args.is_empty());
    }

    #[test]
    fn tolerates_unknown_keys() {
        let text = r#"
schema_version = 3

[meta]
owner = "verif"

[[runs]]
elf = "build/boot.elf"
priority = "high"
"#;
        let specs = parse(text, Path::new("testlist.toml")).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].id, "boot");
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let err = load(Path::new("/nonexistent/testlist.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn missing_runs_collection_is_rejected() {
        let err = parse("schema_version = 3\n", Path::new("t.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::MissingRuns { .. }));
    }

    #[test]
    fn entry_without_elf_is_rejected_by_index() {
        let text = r#"
[[runs]]
elf = "build/boot.elf"

[[runs]]
args = ["+x"]
"#;
        let err = parse(text, Path::new("t.toml")).unwrap_err();
        match err {
            CatalogError::MissingElf { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = parse("[[runs]\nelf = 3", Path::new("t.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn duplicate_stems_get_unique_ids() {
        let text = r#"
[[runs]]
elf = "a/boot.elf"

[[runs]]
elf = "b/boot.elf"
"#;
        let specs = parse(text, Path::new("t.toml")).unwrap();
        assert_eq!(specs[0].id, "boot");
        assert_eq!(specs[1].id, "boot_2");
    }

    #[test]
    fn scope_filter_matches_path_segments() {
        let text = r#"
[[runs]]
elf = "a/x.elf"

[[runs]]
elf = "a/b/y.elf"

[[runs]]
elf = "c/z.elf"

[[runs]]
elf = "ab/w.elf"
"#;
        let specs = parse(text, Path::new("t.toml")).unwrap();
        let filtered = scope_filter(specs, Path::new("a"));
        let ids: Vec<_> = filtered.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }
}
