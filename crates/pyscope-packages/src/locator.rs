//! Package location against the live interpreter's search paths

use pyo3::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use pyscope_core::{Error, PackageInfo, Result};

/// Names longer than this are rejected before resolution is attempted
const MAX_NAME_LEN: usize = 255;

/// Locates installed packages and builds tables of contents.
///
/// "Not found" is data, not an error: every name, however malformed,
/// resolves to a well-formed `PackageInfo`.
pub struct PackageFinder;

impl PackageFinder {
    pub fn new() -> Self {
        Self
    }

    /// Locate a package by name.
    ///
    /// Resolution goes through `importlib.util.find_spec`, which does not
    /// execute the package. Any resolution failure, and any built-in module
    /// with no filesystem presence, yields the not-found value object.
    pub fn find_package(&self, name: &str) -> PackageInfo {
        match Python::with_gil(|py| self.locate(py, name)) {
            Ok(Some(info)) => info,
            Ok(None) => PackageInfo::not_found(name),
            Err(err) => {
                debug!(package = name, error = %err, "package resolution failed");
                PackageInfo::not_found(name)
            }
        }
    }

    /// Ordered, deduplicated list of existing package-root directories
    /// the interpreter searches.
    pub fn site_packages(&self) -> Vec<PathBuf> {
        Python::with_gil(|py| self.collect_search_paths(py).unwrap_or_default())
    }

    pub(crate) fn locate(&self, py: Python<'_>, name: &str) -> Result<Option<PackageInfo>> {
        validate_name(name)?;

        let util = py.import("importlib.util")?;
        let spec = match util.call_method1("find_spec", (name,)) {
            Ok(spec) => spec,
            Err(err) => {
                debug!(package = name, error = %err, "find_spec raised");
                return Ok(None);
            }
        };
        if spec.is_none() {
            return Ok(None);
        }

        let origin: Option<String> = spec
            .getattr("origin")
            .ok()
            .filter(|origin| !origin.is_none())
            .and_then(|origin| origin.extract().ok());

        let search_locations: Vec<String> = spec
            .getattr("submodule_search_locations")
            .ok()
            .filter(|locations| !locations.is_none())
            .map(|locations| extract_string_iter(&locations))
            .unwrap_or_default();

        let is_namespace = origin.is_none() && !search_locations.is_empty();

        let location: Option<PathBuf> = if let Some(dir) = search_locations.first() {
            Some(PathBuf::from(dir))
        } else {
            origin
                .as_deref()
                .map(Path::new)
                .filter(|path| path.exists())
                .map(Path::to_path_buf)
        };

        // Built-in or frozen module: resolvable but nowhere on disk.
        let Some(location) = location else {
            return Ok(None);
        };

        let mut submodules = Vec::new();
        if search_locations.is_empty() {
            if location.is_dir() {
                submodules = list_submodules(&location)?;
            }
        } else {
            for root in &search_locations {
                submodules.extend(list_submodules(Path::new(root)).unwrap_or_default());
            }
            submodules.sort();
            submodules.dedup();
        }

        Ok(Some(PackageInfo {
            name: name.to_string(),
            version: distribution_version(py, name),
            location: Some(location),
            is_namespace,
            submodules,
        }))
    }

    fn collect_search_paths(&self, py: Python<'_>) -> Result<Vec<PathBuf>> {
        let mut candidates: Vec<String> = Vec::new();

        let site = py.import("site")?;
        if let Ok(dirs) = site.call_method0("getsitepackages") {
            candidates.extend(extract_string_iter(&dirs));
        }
        if let Ok(user_dir) = site.call_method0("getusersitepackages") {
            if let Ok(dir) = user_dir.extract::<String>() {
                candidates.push(dir);
            }
        }

        let sys_path = py.import("sys")?.getattr("path")?;
        candidates.extend(
            extract_string_iter(&sys_path)
                .into_iter()
                .filter(|entry| {
                    entry.ends_with("site-packages") || entry.ends_with("dist-packages")
                }),
        );

        let mut seen = HashSet::new();
        Ok(candidates
            .into_iter()
            .filter(|raw| seen.insert(raw.clone()))
            .map(PathBuf::from)
            .filter(|path| path.is_dir())
            .collect())
    }
}

impl Default for PackageFinder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_name("empty package name"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::invalid_name(format!(
            "package name too long ({} bytes)",
            name.len()
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(Error::invalid_name(format!(
            "invalid characters in {:?}",
            name
        )));
    }
    Ok(())
}

/// Collect the string items of any Python iterable, skipping the rest.
fn extract_string_iter(value: &Bound<'_, PyAny>) -> Vec<String> {
    let Ok(iter) = value.try_iter() else {
        return Vec::new();
    };
    iter.filter_map(|item| item.ok())
        .filter_map(|item| item.extract::<String>().ok())
        .collect()
}

/// Version from distribution metadata; never imports the package itself.
fn distribution_version(py: Python<'_>, name: &str) -> Option<String> {
    let metadata = py.import("importlib.metadata").ok()?;
    let root = name.split('.').next().unwrap_or(name);
    metadata
        .call_method1("version", (root,))
        .ok()
        .and_then(|version| version.extract().ok())
}

/// One-level listing of direct submodules and subpackages under `root`.
fn list_submodules(root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if stem == "__init__" || stem == "__pycache__" {
            continue;
        }
        if path.is_dir() {
            if path.join("__init__.py").is_file() {
                names.push(stem.to_string());
            }
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("py") {
            names.push(stem.to_string());
        }
    }
    names.sort();
    names.dedup();
    Ok(names)
}
