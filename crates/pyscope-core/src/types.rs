//! Common types used across pyscope

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default maximum width of a rendered attribute line
pub const DEFAULT_MAX_WIDTH: usize = 120;

/// Options controlling an attribute inspection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectOptions {
    /// Include attributes whose name starts with an underscore
    pub show_private: bool,
    /// Extract docstring snippets
    pub show_docs: bool,
    /// Sort primarily by type description instead of name
    pub group_by_type: bool,
    /// Keep at most this many attributes after sorting
    pub max_items: Option<usize>,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            show_private: false,
            show_docs: true,
            group_by_type: true,
            max_items: None,
        }
    }
}

/// One discovered attribute of an inspected object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub name: String,
    pub type_description: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub docstring_snippet: Option<String>,
    #[serde(default)]
    pub value_preview: Option<String>,
    pub is_private: bool,
    #[serde(default)]
    pub module_origin: Option<String>,
}

impl AttributeInfo {
    /// Format as a single compact line, capped at `max_width` characters.
    ///
    /// Layout: privacy marker, name, `(type)`, optional signature (50 chars
    /// max), optional `= preview`, optional `-> doc` (collapsed to one line,
    /// 80 chars max).
    pub fn format_compact(&self, max_width: usize) -> String {
        let marker = if self.is_private { "[-]" } else { "[+]" };
        let mut line = format!("{} {} ({})", marker, self.name, self.type_description);

        if let Some(sig) = &self.signature {
            line.push(' ');
            line.push_str(&ellipsize(sig, 50));
        }

        if let Some(preview) = &self.value_preview {
            line.push_str(" = ");
            line.push_str(preview);
        }

        if let Some(doc) = &self.docstring_snippet {
            let doc = collapse_whitespace(doc);
            line.push_str(" -> ");
            line.push_str(&ellipsize(&doc, 80));
        }

        ellipsize(&line, max_width)
    }

    /// Primitive-only mapping suitable for machine consumption
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "type_description": self.type_description,
            "signature": self.signature,
            "docstring_snippet": self.docstring_snippet,
            "value_preview": self.value_preview,
            "is_private": self.is_private,
            "module_origin": self.module_origin,
        })
    }
}

/// Result of locating a named package
///
/// `location == None` means "not found"; a not-found package carries no
/// other metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub location: Option<PathBuf>,
    pub is_namespace: bool,
    #[serde(default)]
    pub submodules: Vec<String>,
}

impl PackageInfo {
    /// Value object for a package that could not be located
    pub fn not_found(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            location: None,
            is_namespace: false,
            submodules: Vec::new(),
        }
    }

    /// Primitive-only mapping; `location` rendered as a string path
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "version": self.version,
            "location": self.location.as_ref().map(|p| p.display().to_string()),
            "is_namespace": self.is_namespace,
            "submodules": self.submodules,
        })
    }

    /// Multi-line human-readable rendering
    pub fn format_human(&self) -> String {
        let mut out = format!("Package: {}\n", self.name);
        match &self.location {
            Some(path) => out.push_str(&format!("Location: {}\n", path.display())),
            None => out.push_str("Location: Not found\n"),
        }
        if let Some(version) = &self.version {
            out.push_str(&format!("Version: {}\n", version));
        }
        if self.is_namespace {
            out.push_str("Namespace package: yes\n");
        }
        if !self.submodules.is_empty() {
            out.push_str(&format!(
                "Submodules ({}): {}\n",
                self.submodules.len(),
                self.submodules.join(", ")
            ));
        }
        out
    }
}

/// Classes and functions recorded at one module path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleMembers {
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
}

impl ModuleMembers {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty()
    }
}

/// Recursive structural summary of a package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOfContents {
    pub package_name: String,
    /// Dotted module path -> members found there (ordered by path)
    pub structure: BTreeMap<String, ModuleMembers>,
    pub total_modules: usize,
    pub total_classes: usize,
    pub total_functions: usize,
}

impl TableOfContents {
    /// All-empty TOC for a package that could not be located
    pub fn empty(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            structure: BTreeMap::new(),
            total_modules: 0,
            total_classes: 0,
            total_functions: 0,
        }
    }

    /// Primitive-only mapping suitable for machine consumption
    pub fn to_json(&self) -> serde_json::Value {
        let structure: serde_json::Map<String, serde_json::Value> = self
            .structure
            .iter()
            .map(|(path, members)| {
                (
                    path.clone(),
                    json!({
                        "classes": members.classes,
                        "functions": members.functions,
                    }),
                )
            })
            .collect();

        json!({
            "package_name": self.package_name,
            "structure": structure,
            "total_modules": self.total_modules,
            "total_classes": self.total_classes,
            "total_functions": self.total_functions,
        })
    }

    /// Multi-line human-readable rendering with aggregate counts
    pub fn format_human(&self) -> String {
        let mut out = format!("Table of Contents: {}\n", self.package_name);
        out.push_str(&format!(
            "Modules: {} | Classes: {} | Functions: {}\n",
            self.total_modules, self.total_classes, self.total_functions
        ));

        for (path, members) in &self.structure {
            out.push('\n');
            out.push_str(path);
            out.push('\n');
            if !members.classes.is_empty() {
                out.push_str(&format!("  classes: {}\n", members.classes.join(", ")));
            }
            if !members.functions.is_empty() {
                out.push_str(&format!("  functions: {}\n", members.functions.join(", ")));
            }
        }
        out
    }
}

/// Truncate to `max` characters, ellipsis-terminated (char-safe)
pub fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Collapse all whitespace runs (including newlines) to single spaces
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_info_to_json() {
        let info = PackageInfo {
            name: "test_package".to_string(),
            version: Some("1.0.0".to_string()),
            location: Some(PathBuf::from("/test/path")),
            is_namespace: false,
            submodules: vec!["submodule1".to_string(), "submodule2".to_string()],
        };

        let value = info.to_json();
        assert_eq!(value["name"], "test_package");
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["location"], "/test/path");
        assert_eq!(value["is_namespace"], false);
        assert_eq!(value["submodules"][1], "submodule2");
    }

    #[test]
    fn test_package_info_format_human() {
        let info = PackageInfo {
            name: "test_package".to_string(),
            version: Some("1.0.0".to_string()),
            location: Some(PathBuf::from("/test/path")),
            is_namespace: false,
            submodules: vec![],
        };

        let text = info.format_human();
        assert!(text.contains("Package: test_package"));
        assert!(text.contains("/test/path"));
        assert!(text.contains("1.0.0"));
    }

    #[test]
    fn test_package_info_format_human_not_found() {
        let info = PackageInfo::not_found("missing_package");

        let text = info.format_human();
        assert!(text.contains("missing_package"));
        assert!(text.contains("Location: Not found"));
        assert!(!text.contains("Version:"));
    }

    #[test]
    fn test_not_found_carries_no_metadata() {
        let info = PackageInfo::not_found("anything");
        assert!(info.location.is_none());
        assert!(info.version.is_none());
        assert!(!info.is_namespace);
        assert!(info.submodules.is_empty());
    }

    #[test]
    fn test_toc_to_json() {
        let mut structure = BTreeMap::new();
        structure.insert(
            "test_package".to_string(),
            ModuleMembers {
                classes: vec!["Class1".to_string()],
                functions: vec!["func1".to_string(), "func2".to_string()],
            },
        );
        let toc = TableOfContents {
            package_name: "test_package".to_string(),
            structure,
            total_modules: 1,
            total_classes: 1,
            total_functions: 2,
        };

        let value = toc.to_json();
        assert_eq!(value["package_name"], "test_package");
        assert_eq!(value["total_modules"], 1);
        assert_eq!(value["total_classes"], 1);
        assert_eq!(value["total_functions"], 2);
        assert_eq!(value["structure"]["test_package"]["classes"][0], "Class1");
    }

    #[test]
    fn test_toc_format_human() {
        let mut structure = BTreeMap::new();
        structure.insert(
            "test_package".to_string(),
            ModuleMembers {
                classes: vec!["Class1".to_string()],
                functions: vec!["function1".to_string()],
            },
        );
        let toc = TableOfContents {
            package_name: "test_package".to_string(),
            structure,
            total_modules: 1,
            total_classes: 1,
            total_functions: 1,
        };

        let text = toc.format_human();
        assert!(text.contains("Table of Contents"));
        assert!(text.contains("test_package"));
        assert!(text.contains("Modules: 1 | Classes: 1 | Functions: 1"));
        assert!(text.contains("Class1"));
        assert!(text.contains("function1"));
    }

    #[test]
    fn test_format_compact_basic() {
        let info = AttributeInfo {
            name: "loads".to_string(),
            type_description: "function".to_string(),
            signature: Some("(s, *, cls=None)".to_string()),
            docstring_snippet: Some("Deserialize s to a Python object.".to_string()),
            value_preview: None,
            is_private: false,
            module_origin: Some("json".to_string()),
        };

        let line = info.format_compact(DEFAULT_MAX_WIDTH);
        assert!(line.starts_with("[+] loads (function)"));
        assert!(line.contains("(s, *, cls=None)"));
        assert!(line.contains("-> Deserialize s to a Python object."));
    }

    #[test]
    fn test_format_compact_private_marker_and_width_cap() {
        let info = AttributeInfo {
            name: "_secret".to_string(),
            type_description: "string".to_string(),
            signature: None,
            docstring_snippet: Some("x".repeat(300)),
            value_preview: Some("'abc'".to_string()),
            is_private: true,
            module_origin: None,
        };

        let line = info.format_compact(60);
        assert!(line.starts_with("[-] _secret (string) = 'abc'"));
        assert!(line.chars().count() <= 60);
        assert!(line.ends_with("..."));
    }

    #[test]
    fn test_format_compact_collapses_doc_whitespace() {
        let info = AttributeInfo {
            name: "f".to_string(),
            type_description: "function".to_string(),
            signature: None,
            docstring_snippet: Some("first  line\nwith   gaps".to_string()),
            value_preview: None,
            is_private: false,
            module_origin: None,
        };

        let line = info.format_compact(DEFAULT_MAX_WIDTH);
        assert!(line.contains("-> first line with gaps"));
    }

    #[test]
    fn test_ellipsize_char_safe() {
        assert_eq!(ellipsize("short", 10), "short");
        let long = "αβγδεζηθικλμν";
        let cut = ellipsize(long, 8);
        assert_eq!(cut.chars().count(), 8);
        assert!(cut.ends_with("..."));
    }
}
