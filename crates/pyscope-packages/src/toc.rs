//! Depth-bounded table-of-contents traversal
//!
//! Explicit worklist of `(dotted path, remaining depth)` pairs rather than
//! recursion; the visited set and depth budget stay visible, which keeps
//! the depth-monotonicity of the totals easy to reason about.

use pyo3::prelude::*;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

use pyscope_core::{ModuleMembers, TableOfContents};

use crate::locator::PackageFinder;

impl PackageFinder {
    /// Build a structural summary of a package's submodule tree.
    ///
    /// The root enters at the full `depth` budget and descent stops once it
    /// is exhausted. Modules that fail to import are skipped. When
    /// `public_only` is set, underscore-prefixed members and submodules are
    /// excluded; when it is not, everything is included, underscore-prefixed
    /// submodules too.
    ///
    /// Every successfully imported module gets a `structure` entry (possibly
    /// with empty member lists), so `total_modules == structure.len()`.
    pub fn generate_toc(&self, name: &str, depth: usize, public_only: bool) -> TableOfContents {
        let mut toc = TableOfContents::empty(name);

        Python::with_gil(|py| {
            match self.locate(py, name) {
                Ok(Some(_)) => {}
                Ok(None) => return,
                Err(err) => {
                    debug!(package = name, error = %err, "package resolution failed");
                    return;
                }
            }

            let mut queue: VecDeque<(String, usize)> = VecDeque::new();
            queue.push_back((name.to_string(), depth));
            let mut visited: HashSet<String> = HashSet::new();

            while let Some((path, remaining)) = queue.pop_front() {
                if !visited.insert(path.clone()) {
                    continue;
                }
                let module = match py.import(path.as_str()) {
                    Ok(module) => module,
                    Err(err) => {
                        debug!(module = path.as_str(), error = %err, "import failed, skipping");
                        continue;
                    }
                };

                let members = collect_members(&module, &path, public_only);
                toc.total_classes += members.classes.len();
                toc.total_functions += members.functions.len();
                toc.structure.insert(path.clone(), members);

                if remaining == 0 {
                    continue;
                }
                for child in child_modules(&module) {
                    if public_only && child.starts_with('_') {
                        continue;
                    }
                    queue.push_back((format!("{}.{}", path, child), remaining - 1));
                }
            }

            toc.total_modules = toc.structure.len();
        });

        toc
    }
}

/// Direct classes and functions of one module: members whose `__module__`
/// matches the module's own dotted path, so inherited and re-exported names
/// are not double-counted.
fn collect_members(
    module: &Bound<'_, PyModule>,
    module_path: &str,
    public_only: bool,
) -> ModuleMembers {
    let mut members = ModuleMembers::default();
    let py = module.py();
    let Ok(inspect) = py.import("inspect") else {
        return members;
    };
    let Ok(names) = module.dir() else {
        return members;
    };

    for name in names.iter() {
        let Ok(name) = name.extract::<String>() else {
            continue;
        };
        if public_only && name.starts_with('_') {
            continue;
        }
        let Ok(value) = module.getattr(name.as_str()) else {
            continue;
        };

        let origin: Option<String> = value
            .getattr("__module__")
            .ok()
            .filter(|origin| !origin.is_none())
            .and_then(|origin| origin.extract().ok());
        if origin.as_deref() != Some(module_path) {
            continue;
        }

        if predicate(&inspect, "isclass", &value) {
            members.classes.push(name);
        } else if predicate(&inspect, "isfunction", &value)
            || predicate(&inspect, "isbuiltin", &value)
        {
            members.functions.push(name);
        }
    }

    members.classes.sort();
    members.functions.sort();
    members
}

/// Direct child module names of a package, empty for plain modules.
fn child_modules(module: &Bound<'_, PyModule>) -> Vec<String> {
    let Ok(path_attr) = module.getattr("__path__") else {
        return Vec::new();
    };
    let py = module.py();
    let Ok(pkgutil) = py.import("pkgutil") else {
        return Vec::new();
    };
    let Ok(infos) = pkgutil.call_method1("iter_modules", (path_attr,)) else {
        return Vec::new();
    };
    let Ok(iter) = infos.try_iter() else {
        return Vec::new();
    };

    let mut children: Vec<String> = iter
        .filter_map(|info| info.ok())
        .filter_map(|info| info.getattr("name").ok())
        .filter_map(|name| name.extract().ok())
        .collect();
    children.sort();
    children
}

fn predicate(inspect: &Bound<'_, PyModule>, name: &str, value: &Bound<'_, PyAny>) -> bool {
    inspect
        .call_method1(name, (value,))
        .and_then(|result| result.is_truthy())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(toc: &TableOfContents) -> usize {
        toc.total_modules + toc.total_classes + toc.total_functions
    }

    #[test]
    fn test_toc_for_standard_package() {
        let finder = PackageFinder::new();
        let toc = finder.generate_toc("json", 2, true);

        assert_eq!(toc.package_name, "json");
        assert!(toc.total_modules > 0);
        assert!(toc.structure.contains_key("json"));
        assert_eq!(toc.total_modules, toc.structure.len());

        let root = &toc.structure["json"];
        assert!(root.functions.contains(&"loads".to_string()));
    }

    #[test]
    fn test_toc_includes_private_modules_when_asked() {
        let finder = PackageFinder::new();

        // importlib keeps most of its implementation in underscore modules.
        let all = finder.generate_toc("importlib", 1, false);
        assert!(all
            .structure
            .keys()
            .any(|path| path.starts_with("importlib._")));

        let public = finder.generate_toc("importlib", 1, true);
        assert!(public
            .structure
            .keys()
            .all(|path| !path.starts_with("importlib._")));
    }

    #[test]
    fn test_toc_regression_not_empty_with_private_filter_off() {
        let finder = PackageFinder::new();
        let toc = finder.generate_toc("json", 2, false);

        assert!(total(&toc) > 0);
        assert!(!toc.structure.is_empty());
    }

    #[test]
    fn test_public_only_totals_are_bounded_by_full_totals() {
        let finder = PackageFinder::new();
        let all = finder.generate_toc("json", 2, false);
        let public = finder.generate_toc("json", 2, true);

        assert!(public.total_modules <= all.total_modules);
        assert!(public.total_classes <= all.total_classes);
        assert!(public.total_functions <= all.total_functions);
    }

    #[test]
    fn test_totals_monotonic_in_depth() {
        let finder = PackageFinder::new();
        let mut previous = 0;
        for depth in 0..3 {
            let toc = finder.generate_toc("json", depth, false);
            assert!(
                total(&toc) >= previous,
                "totals decreased between depth {} and {}",
                depth.saturating_sub(1),
                depth
            );
            previous = total(&toc);
        }
    }

    #[test]
    fn test_depth_zero_visits_only_the_root() {
        let finder = PackageFinder::new();
        let toc = finder.generate_toc("json", 0, false);

        assert_eq!(toc.total_modules, 1);
        assert!(toc.structure.contains_key("json"));
    }

    #[test]
    fn test_toc_for_nonexistent_package() {
        let finder = PackageFinder::new();
        let toc = finder.generate_toc("nonexistent_package_12345", 2, true);

        assert_eq!(toc.package_name, "nonexistent_package_12345");
        assert_eq!(toc.total_modules, 0);
        assert_eq!(toc.total_classes, 0);
        assert_eq!(toc.total_functions, 0);
        assert!(toc.structure.is_empty());
    }

    #[test]
    fn test_toc_for_malformed_name() {
        let finder = PackageFinder::new();
        let toc = finder.generate_toc("", 2, true);
        assert_eq!(total(&toc), 0);
        assert!(toc.structure.is_empty());
    }
}
