//! Patch engine: exact find/replace over matching files, written back in place.
//!
//! Given a `PatchSpec` (root, pattern, rule), this module:
//! 1. Compiles the file name pattern
//! 2. Walks the root collecting matching files
//! 3. Rewrites each file through one read+write handle, truncating to the new length
//! 4. Returns a per-file report (or a dry-run preview)
//!
//! The run is fail-fast. Files patched before an error stay patched.

use crate::error::{Error, Result};
use crate::{io, validation};
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

// ============================================================================
// Types
// ============================================================================

/// A search literal and what to replace it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchRule {
    pub search: String,
    pub replace: String,
}

/// New content plus the number of occurrences that were replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub content: String,
    pub replacements: usize,
}

impl PatchRule {
    pub fn new(search: &str, replace: &str) -> Result<Self> {
        validation::require_literal(search, "search", "Search literal cannot be empty")?;

        Ok(PatchRule {
            search: search.to_string(),
            replace: replace.to_string(),
        })
    }

    /// Replace every non-overlapping occurrence of the search literal,
    /// scanning left to right. No regex or boundary semantics.
    pub fn apply(&self, text: &str) -> Replacement {
        let replacements = text.matches(self.search.as_str()).count();

        if replacements == 0 {
            return Replacement {
                content: text.to_string(),
                replacements,
            };
        }

        Replacement {
            content: text.replace(self.search.as_str(), &self.replace),
            replacements,
        }
    }
}

/// Everything a single run needs.
#[derive(Debug, Clone)]
pub struct PatchSpec {
    pub root: PathBuf,
    pub pattern: String,
    pub rule: PatchRule,
    /// Directory names never descended into, at any depth.
    pub skip_dirs: Vec<String>,
    /// Read and count only; nothing is written.
    pub dry_run: bool,
    /// Print every visited file to stderr.
    pub verbose: bool,
}

impl PatchSpec {
    pub fn new(root: impl Into<PathBuf>, pattern: &str, rule: PatchRule) -> Self {
        PatchSpec {
            root: root.into(),
            pattern: pattern.to_string(),
            rule,
            skip_dirs: Vec::new(),
            dry_run: false,
            verbose: false,
        }
    }
}

/// What happened to one matched file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// File path relative to root.
    pub file: String,
    /// Occurrences of the search literal found in the file.
    pub replacements: usize,
    /// Whether the new content differs from the old.
    pub changed: bool,
}

/// The full result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct PatchReport {
    pub root: String,
    pub pattern: String,
    pub rule: PatchRule,
    /// Every matched file, in traversal order.
    pub files: Vec<FileOutcome>,
    pub total_files: usize,
    pub changed_files: usize,
    pub total_replacements: usize,
    pub dry_run: bool,
    /// Whether files were written to disk.
    pub applied: bool,
}

// ============================================================================
// Pattern handling
// ============================================================================

/// Compile a file name pattern such as `*.cs` or `*.gen.cs`.
///
/// Patterns match the file name only, so path separators are rejected.
/// Whitespace is part of the pattern and is never trimmed.
pub fn compile_pattern(pattern: &str) -> Result<glob::Pattern> {
    let pattern = validation::require_non_blank(pattern, "pattern", "Pattern cannot be empty")?;

    if pattern.contains('/') || pattern.contains('\\') {
        return Err(Error::validation_invalid_argument(
            "pattern",
            format!("Pattern '{}' must match a file name, not a path", pattern),
            Some(pattern.to_string()),
        )
        .with_hint("Use --root to choose the directory and --pattern for the file name"));
    }

    glob::Pattern::new(pattern).map_err(|e| {
        Error::validation_invalid_argument(
            "pattern",
            format!("Invalid glob pattern '{}': {}", pattern, e),
            Some(pattern.to_string()),
        )
    })
}

// ============================================================================
// File walking
// ============================================================================

/// Collect every regular file under `root` whose name matches `pattern`.
///
/// Entries are visited in name order within each directory. Symlinked
/// directories are not followed.
pub fn collect_files(
    root: &Path,
    pattern: &glob::Pattern,
    skip_dirs: &[String],
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::validation_invalid_argument(
            "root",
            format!("Root directory does not exist: {}", root.display()),
            Some(root.display().to_string()),
        ));
    }

    let mut files = Vec::new();
    walk_recursive(root, pattern, skip_dirs, &mut files)?;
    Ok(files)
}

fn walk_recursive(
    dir: &Path,
    pattern: &glob::Pattern,
    skip_dirs: &[String],
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    let list_err =
        |e: std::io::Error| Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())));

    let mut entries = std::fs::read_dir(dir)
        .map_err(list_err)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(list_err)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        let file_type = entry.file_type().map_err(list_err)?;

        if file_type.is_dir() {
            if skip_dirs.iter().any(|skip| skip == &name) {
                continue;
            }
            walk_recursive(&path, pattern, skip_dirs, files)?;
        } else if path.is_file() && pattern.matches(&name) {
            files.push(path);
        }
    }

    Ok(())
}

fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

// ============================================================================
// Patching
// ============================================================================

/// Patch one file through a single read+write handle.
///
/// The file is rewritten even when nothing matched, and always truncated to
/// the new length. In dry-run mode it is opened read-only and left alone.
pub fn patch_file(root: &Path, path: &Path, rule: &PatchRule, dry_run: bool) -> Result<FileOutcome> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(!dry_run)
        .open(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("open {}", path.display()))))?;

    let original = io::read_handle(&mut file, path, &format!("read {}", path.display()))?;
    let replaced = rule.apply(&original);
    let changed = replaced.content != original;

    if !dry_run {
        io::overwrite_handle(&mut file, &replaced.content, &format!("write {}", path.display()))?;
    }

    Ok(FileOutcome {
        file: relative_display(root, path),
        replacements: replaced.replacements,
        changed,
    })
}

/// Run the patcher over the whole tree.
pub fn run(spec: &PatchSpec) -> Result<PatchReport> {
    let pattern = compile_pattern(&spec.pattern)?;
    let files = collect_files(&spec.root, &pattern, &spec.skip_dirs)?;

    let mut outcomes = Vec::with_capacity(files.len());

    for path in &files {
        if spec.verbose {
            log_status!("patch", always, "{}", path.display());
        }

        let outcome = patch_file(&spec.root, path, &spec.rule, spec.dry_run).map_err(|err| {
            if spec.dry_run || outcomes.is_empty() {
                err
            } else {
                err.with_hint(format!(
                    "{} file(s) were already rewritten before this failure",
                    outcomes.len()
                ))
            }
        })?;
        outcomes.push(outcome);
    }

    let changed_files = outcomes.iter().filter(|o| o.changed).count();
    let total_replacements = outcomes.iter().map(|o| o.replacements).sum();

    if !spec.dry_run {
        log_status!(
            "patch",
            "Rewrote {} file(s), {} changed, {} replacement(s)",
            outcomes.len(),
            changed_files,
            total_replacements
        );
    }

    Ok(PatchReport {
        root: spec.root.display().to_string(),
        pattern: pattern.as_str().to_string(),
        rule: spec.rule.clone(),
        total_files: outcomes.len(),
        files: outcomes,
        changed_files,
        total_replacements,
        dry_run: spec.dry_run,
        applied: !spec.dry_run,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn unity_rule() -> PatchRule {
        PatchRule::new("using System.Numerics", "using UnityEngine").unwrap()
    }

    #[test]
    fn apply_replaces_using_directive() {
        let result = unity_rule().apply("using System.Numerics;\nclass Foo {}");
        assert_eq!(result.content, "using UnityEngine;\nclass Foo {}");
        assert_eq!(result.replacements, 1);
    }

    #[test]
    fn apply_without_match_is_identity() {
        let text = "using System;\nclass Foo {}\n";
        let result = unity_rule().apply(text);
        assert_eq!(result.content, text);
        assert_eq!(result.replacements, 0);
    }

    #[test]
    fn apply_is_leftmost_non_overlapping() {
        let rule = PatchRule::new("aa", "b").unwrap();
        let result = rule.apply("aaaaa");
        assert_eq!(result.content, "bba");
        assert_eq!(result.replacements, 2);
    }

    #[test]
    fn apply_has_no_regex_semantics() {
        let rule = PatchRule::new("System.*", "X").unwrap();
        let result = rule.apply("System.Numerics System.*");
        assert_eq!(result.content, "System.Numerics X");
        assert_eq!(result.replacements, 1);
    }

    #[test]
    fn apply_twice_is_idempotent() {
        let rule = unity_rule();
        let once = rule.apply("using System.Numerics;\nusing System.Numerics;\n");
        let twice = rule.apply(&once.content);
        assert_eq!(once.content, twice.content);
        assert_eq!(twice.replacements, 0);
    }

    #[test]
    fn empty_search_literal_rejected() {
        let err = PatchRule::new("", "x").unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
        assert_eq!(err.details["field"], "search");
    }

    #[test]
    fn compile_pattern_matches_file_names() {
        let generated = compile_pattern("*.gen.cs").unwrap();
        assert!(generated.matches("Vector.gen.cs"));
        assert!(!generated.matches("Vector.cs"));

        let all = compile_pattern("*.cs").unwrap();
        assert!(all.matches("Vector.cs"));
        assert!(all.matches("Vector.gen.cs"));
        assert!(!all.matches("Vector.csproj"));
    }

    #[test]
    fn compile_pattern_keeps_surrounding_whitespace() {
        let padded = compile_pattern("  *.cs  ").unwrap();
        assert_eq!(padded.as_str(), "  *.cs  ");
        assert!(!padded.matches("Vector.cs"));
        assert!(padded.matches("  Vector.cs  "));
        assert!(compile_pattern("   ").is_err());
    }

    #[test]
    fn compile_pattern_rejects_bad_input() {
        assert!(compile_pattern("").is_err());
        assert!(compile_pattern("src/*.cs").is_err());

        let err = compile_pattern("[*.cs").unwrap_err();
        assert_eq!(err.details["field"], "pattern");
    }

    #[test]
    fn collect_files_recurses_and_sorts() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("Source").join("Renderer");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("b.cs"), "").unwrap();
        fs::write(dir.path().join("a.cs"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(nested.join("Mesh.cs"), "").unwrap();

        let pattern = compile_pattern("*.cs").unwrap();
        let files = collect_files(dir.path(), &pattern, &[]).unwrap();
        let relative: Vec<String> = files
            .iter()
            .map(|f| relative_display(dir.path(), f))
            .collect();

        assert_eq!(relative, vec!["Source/Renderer/Mesh.cs", "a.cs", "b.cs"]);
    }

    #[test]
    fn collect_files_honors_skip_dirs() {
        let dir = TempDir::new().unwrap();
        let lib = dir.path().join("Library");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("Cached.cs"), "").unwrap();
        fs::write(dir.path().join("Main.cs"), "").unwrap();

        let pattern = compile_pattern("*.cs").unwrap();
        let files = collect_files(dir.path(), &pattern, &["Library".to_string()]).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Main.cs"));
    }

    #[test]
    fn collect_files_missing_root_is_validation_error() {
        let dir = TempDir::new().unwrap();
        let pattern = compile_pattern("*.cs").unwrap();
        let err = collect_files(&dir.path().join("missing"), &pattern, &[]).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
        assert_eq!(err.details["field"], "root");
    }

    #[test]
    fn patch_file_truncates_shorter_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Vec.cs");
        fs::write(&path, "using System.Numerics;\n").unwrap();

        let outcome = patch_file(dir.path(), &path, &unity_rule(), false).unwrap();

        assert_eq!(outcome.file, "Vec.cs");
        assert_eq!(outcome.replacements, 1);
        assert!(outcome.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "using UnityEngine;\n");
    }

    #[test]
    fn patch_file_grows_longer_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Vec.cs");
        fs::write(&path, "using UnityEngine;\n").unwrap();

        let rule = PatchRule::new("using UnityEngine", "using System.Numerics").unwrap();
        patch_file(dir.path(), &path, &rule, false).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "using System.Numerics;\n");
    }

    #[test]
    fn patch_file_dry_run_leaves_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Vec.cs");
        fs::write(&path, "using System.Numerics;\n").unwrap();

        let outcome = patch_file(dir.path(), &path, &unity_rule(), true).unwrap();

        assert_eq!(outcome.replacements, 1);
        assert!(outcome.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "using System.Numerics;\n");
    }

    #[test]
    fn replacement_equal_to_search_is_not_a_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Same.cs");
        fs::write(&path, "using UnityEngine;\n").unwrap();

        let rule = PatchRule::new("using UnityEngine", "using UnityEngine").unwrap();
        let outcome = patch_file(dir.path(), &path, &rule, false).unwrap();

        assert_eq!(outcome.replacements, 1);
        assert!(!outcome.changed);
    }

    #[test]
    fn run_reports_totals() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("A.cs"),
            "using System.Numerics;\nusing System.Numerics;\n",
        )
        .unwrap();
        fs::write(dir.path().join("B.cs"), "class B {}\n").unwrap();

        let spec = PatchSpec::new(dir.path(), "*.cs", unity_rule());
        let report = run(&spec).unwrap();

        assert_eq!(report.total_files, 2);
        assert_eq!(report.changed_files, 1);
        assert_eq!(report.total_replacements, 2);
        assert!(report.applied);
        assert!(!report.dry_run);
        assert_eq!(report.files[0].file, "A.cs");
        assert_eq!(report.files[1].replacements, 0);
    }

    #[test]
    fn run_aborts_on_first_decode_failure() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A.cs"), "using System.Numerics;\n").unwrap();
        fs::write(dir.path().join("B.cs"), [0xffu8, 0xfe, 0x00]).unwrap();
        fs::write(dir.path().join("C.cs"), "using System.Numerics;\n").unwrap();

        let spec = PatchSpec::new(dir.path(), "*.cs", unity_rule());
        let err = run(&spec).unwrap_err();

        assert_eq!(err.code.as_str(), "file.decode_failed");
        assert!(err.hints.iter().any(|h| h.message.contains("1 file(s)")));
        assert_eq!(
            fs::read_to_string(dir.path().join("A.cs")).unwrap(),
            "using UnityEngine;\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("C.cs")).unwrap(),
            "using System.Numerics;\n"
        );
    }

    #[test]
    fn run_with_no_matches_is_empty_success() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.md"), "using System.Numerics").unwrap();

        let spec = PatchSpec::new(dir.path(), "*.cs", unity_rule());
        let report = run(&spec).unwrap();

        assert_eq!(report.total_files, 0);
        assert_eq!(report.total_replacements, 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("readme.md")).unwrap(),
            "using System.Numerics"
        );
    }
}
