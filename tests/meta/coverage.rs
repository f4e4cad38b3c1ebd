//! Keeps `tests/unit/` a mirror of `src/`

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    // Crate roots and module listings carry no logic of their own
    fn is_layout_file(path: &Path) -> bool {
        matches!(
            path.file_name().and_then(|name| name.to_str()),
            Some("lib.rs" | "main.rs" | "mod.rs")
        )
    }

    fn rust_files(base: &Path) -> io::Result<BTreeSet<PathBuf>> {
        let mut files = BTreeSet::new();
        let mut pending = vec![base.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                    let relative = path
                        .strip_prefix(base)
                        .map_err(|_| io::Error::other("Failed to strip prefix"))?;
                    files.insert(relative.to_path_buf());
                }
            }
        }
        Ok(files)
    }

    fn logic_files(base: &str) -> BTreeSet<PathBuf> {
        let base = Path::new(base);
        let files = rust_files(base).unwrap_or_else(|error| {
            unreachable!("Failed to scan {}: {error}", base.display())
        });
        files.into_iter().filter(|path| !is_layout_file(path)).collect()
    }

    #[test]
    fn test_all_src_files_have_unit_tests() {
        let src = logic_files("src");
        let unit = logic_files("tests/unit");
        let missing: Vec<String> = src
            .difference(&unit)
            .map(|path| format!("  - src/{0} -> tests/unit/{0}", path.display()))
            .collect();

        assert!(
            missing.is_empty(),
            "The following src files are missing unit test counterparts:\n{}",
            missing.join("\n")
        );
    }

    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let src = logic_files("src");
        let unit = logic_files("tests/unit");
        let orphaned: Vec<String> = unit
            .difference(&src)
            .map(|path| format!("  - tests/unit/{} (no src counterpart)", path.display()))
            .collect();

        assert!(
            orphaned.is_empty(),
            "The following unit test files have no corresponding src files:\n{}",
            orphaned.join("\n")
        );
    }

    #[test]
    fn test_all_test_files_contain_tests() {
        let base = Path::new("tests");
        let files = rust_files(base).unwrap_or_default();
        let without_tests: Vec<String> = files
            .iter()
            .filter(|path| !is_layout_file(path))
            .filter(|path| {
                fs::read_to_string(base.join(path))
                    .map(|content| !content.contains("#[test]"))
                    .unwrap_or(true)
            })
            .map(|path| format!("  - tests/{}", path.display()))
            .collect();

        assert!(
            without_tests.is_empty(),
            "The following test files don't contain any #[test] functions:\n{}",
            without_tests.join("\n")
        );
    }
}
