use std::{
    collections::BTreeSet,
    path::{Component, Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// `inc` relative to `base_dir`; a `.` base keeps paths relative.
fn resolve(base_dir: &str, inc: &str) -> PathBuf {
    if base_dir.is_empty() || base_dir == "." {
        PathBuf::from(inc)
    } else {
        Path::new(base_dir).join(inc)
    }
}

/// Result of scanning files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Sorted so that reports come out in a stable order.
    pub files: BTreeSet<String>,
    /// Includes that matched nothing on disk.
    pub missing: Vec<String>,
    pub skipped_count: usize,
}

/// Collect source files under `includes` (relative to `base_dir`).
///
/// An include naming a file is taken as is, whatever its extension.
/// Directories are walked recursively for files with one of `extensions`.
pub fn scan_files(
    base_dir: &str,
    includes: &[String],
    ignore_patterns: &[String],
    extensions: &[String],
    verbose: bool,
) -> ScanResult {
    let mut result = ScanResult::default();

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignore_paths.push(resolve(base_dir, p));
        }
    }

    let is_ignored = |path: &Path| {
        literal_ignore_paths
            .iter()
            .any(|ignore_path| path.starts_with(ignore_path))
            || glob_patterns
                .iter()
                .any(|p| p.matches(&path.to_string_lossy()))
    };

    let default_include = [".".to_string()];
    let includes = if includes.is_empty() {
        &default_include[..]
    } else {
        includes
    };

    let mut roots: Vec<PathBuf> = Vec::new();
    for inc in includes {
        if is_glob_pattern(inc) {
            let full_pattern = resolve(base_dir, inc);
            match glob(&full_pattern.to_string_lossy()) {
                Ok(entries) => roots.extend(entries.flatten()),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid glob pattern '{}': {}",
                            "warning:".bold().yellow(),
                            inc,
                            e
                        );
                    }
                }
            }
        } else {
            let path = resolve(base_dir, inc);
            if path.exists() {
                roots.push(path);
            } else {
                result.missing.push(inc.clone());
            }
        }
    }

    for root in roots {
        if root.is_file() {
            let path = root.strip_prefix(".").unwrap_or(&root);
            result.files.insert(path.to_string_lossy().into_owned());
            continue;
        }
        for entry in WalkDir::new(&root) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    result.skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };
            let path = entry.path();
            let path = path.strip_prefix(".").unwrap_or(path);
            if is_ignored(path) {
                continue;
            }
            if path.is_file() && has_extension(path, extensions) {
                result.files.insert(path.to_string_lossy().into_owned());
            }
        }
    }

    result
}

/// Deepest directory shared by every include.
///
/// A directory include counts as itself and a file include as its parent.
/// A glob counts as the literal components before its first wildcard.
pub fn common_root(includes: &[String]) -> PathBuf {
    let mut root: Option<PathBuf> = None;
    for inc in includes {
        let path = without_cur_dir(Path::new(inc));
        let dir = if is_glob_pattern(inc) {
            path.components()
                .take_while(|c| !is_glob_pattern(&c.as_os_str().to_string_lossy()))
                .collect()
        } else if Path::new(inc).is_dir() {
            path
        } else {
            path.parent().map(Path::to_path_buf).unwrap_or_default()
        };
        root = Some(match root {
            None => dir,
            Some(current) => current
                .components()
                .zip(dir.components())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect(),
        });
    }
    root.unwrap_or_default()
}

/// Where `file` lands when output goes to `output_dir` instead of in place.
pub fn output_path(file: &str, root: &Path, output_dir: &str) -> PathBuf {
    let file = without_cur_dir(Path::new(file));
    let relative = match file.strip_prefix(without_cur_dir(root)) {
        Ok(rest) => rest.to_path_buf(),
        Err(_) => file.file_name().map(PathBuf::from).unwrap_or_else(|| file.clone()),
    };
    Path::new(output_dir).join(relative)
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn swift() -> Vec<String> {
        vec!["swift".to_owned()]
    }

    #[test]
    fn test_scan_swift_files() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("SettingsView.swift")).unwrap();
        File::create(dir_path.join("Model.swift")).unwrap();
        File::create(dir_path.join("Info.plist")).unwrap();

        let result = scan_files(dir_path.to_str().unwrap(), &[], &[], &swift(), false);

        assert_eq!(result.files.len(), 2);
        assert!(result.files.iter().any(|f| f.ends_with("SettingsView.swift")));
        assert!(!result.files.iter().any(|f| f.ends_with("Info.plist")));
    }

    #[test]
    fn test_scan_ignores_pods() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let pods = dir_path.join("Pods").join("Lib");
        fs::create_dir_all(&pods).unwrap();
        File::create(pods.join("Vendor.swift")).unwrap();
        File::create(dir_path.join("App.swift")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &[],
            &["**/Pods/**".to_owned()],
            &swift(),
            false,
        );

        assert_eq!(result.files.len(), 1);
        assert!(!result.files.iter().any(|f| f.contains("Pods")));
    }

    #[test]
    fn test_scan_nested_and_sorted() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let views = dir_path.join("Views");
        fs::create_dir(&views).unwrap();
        File::create(views.join("B.swift")).unwrap();
        File::create(views.join("A.swift")).unwrap();

        let result = scan_files(dir_path.to_str().unwrap(), &[], &[], &swift(), false);

        let names: Vec<&str> = result.files.iter().map(|f| f.rsplit('/').next().unwrap()).collect();
        assert_eq!(names, vec!["A.swift", "B.swift"]);
    }

    #[test]
    fn test_explicit_file_ignores_extension() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();
        File::create(dir_path.join("View.swift.txt")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["View.swift.txt".to_owned()],
            &[],
            &swift(),
            false,
        );

        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_missing_includes_are_reported() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();
        File::create(dir_path.join("App.swift")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["App.swift".to_owned(), "Nope.swift".to_owned()],
            &[],
            &swift(),
            false,
        );

        assert_eq!(result.files.len(), 1);
        assert_eq!(result.missing, vec!["Nope.swift".to_owned()]);
    }

    #[test]
    fn test_common_root_of_includes() {
        let dir = tempdir().unwrap();
        let app = dir.path().join("App");
        fs::create_dir_all(app.join("Views")).unwrap();
        File::create(app.join("Views").join("A.swift")).unwrap();
        File::create(app.join("Root.swift")).unwrap();
        let path = |p: &Path| p.to_str().unwrap().to_string();

        // A directory is its own root, even when every file sits deeper.
        assert_eq!(common_root(&[path(&app)]), app);
        assert_eq!(
            common_root(&[path(&app.join("Views/A.swift")), path(&app.join("Root.swift"))]),
            app
        );
        assert_eq!(
            common_root(&[format!("{}/**/*.swift", path(&app))]),
            app
        );
        assert_eq!(common_root(&[".".to_string()]), PathBuf::new());
    }

    #[test]
    fn test_output_path_keeps_relative_layout() {
        assert_eq!(
            output_path("App/Views/A.swift", Path::new("App"), "out"),
            PathBuf::from("out/Views/A.swift")
        );
        assert_eq!(
            output_path("App/Root.swift", Path::new("."), "out"),
            PathBuf::from("out/App/Root.swift")
        );
        assert_eq!(
            output_path("./App/Root.swift", Path::new("App"), "/tmp/out"),
            PathBuf::from("/tmp/out/Root.swift")
        );
    }

    #[test]
    fn test_overlapping_includes_are_deduplicated() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let nested = dir_path.join("App").join("Views");
        fs::create_dir_all(&nested).unwrap();
        File::create(nested.join("Root.swift")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["App".to_owned(), "App/Views".to_owned()],
            &[],
            &swift(),
            false,
        );

        assert_eq!(result.files.len(), 1);
    }
}
