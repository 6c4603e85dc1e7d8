//! pyscope-inspect: live Python object inspection
//!
//! This crate provides:
//! - Attribute enumeration with per-name fault isolation
//! - Ordered capability-predicate classification of values
//! - Signature/docstring/preview extraction
//! - Compact report rendering (grouped or flat)
//!
//! No public entry point returns an error: enumeration failure yields an
//! empty result, and any per-attribute failure degrades only the affected
//! field.

pub mod classify;
pub mod report;

pub use classify::Classifier;
pub use report::{print_object_inspection, render_inspection};

use pyo3::prelude::*;
use tracing::debug;

use pyscope_core::{AttributeInfo, InspectOptions};

/// Docstring snippets are capped at this many characters
pub const DOC_SNIPPET_MAX: usize = 100;

/// Enumerate, classify, and sort the accessible attributes of a live object.
///
/// Attributes whose access raises are omitted entirely; attributes whose
/// metadata extraction fails keep the record with the affected fields
/// absent. Sorting is by `(type_description, name)` when grouping, by name
/// alone otherwise, names compared case-insensitively.
pub fn inspect_object(obj: &Bound<'_, PyAny>, options: &InspectOptions) -> Vec<AttributeInfo> {
    let py = obj.py();
    let Ok(classifier) = Classifier::new(py) else {
        return Vec::new();
    };
    let Ok(names) = obj.dir() else {
        debug!("attribute enumeration failed");
        return Vec::new();
    };

    let mut items = Vec::new();
    for name in names.iter() {
        let Ok(name) = name.extract::<String>() else {
            continue;
        };
        let is_private = name.starts_with('_');
        if is_private && !options.show_private {
            continue;
        }
        // Attributes that raise on access are skipped, never half-recorded.
        let Ok(value) = obj.getattr(name.as_str()) else {
            continue;
        };

        items.push(AttributeInfo {
            type_description: classifier.type_description(&value),
            signature: classifier.signature(&value),
            docstring_snippet: if options.show_docs {
                classifier.doc_snippet(&value, DOC_SNIPPET_MAX)
            } else {
                None
            },
            value_preview: classifier.value_preview(&value),
            module_origin: classifier.module_origin(&value),
            is_private,
            name,
        });
    }

    if options.group_by_type {
        items.sort_by(|a, b| {
            (a.type_description.as_str(), a.name.to_lowercase())
                .cmp(&(b.type_description.as_str(), b.name.to_lowercase()))
        });
    } else {
        items.sort_by_key(|item| item.name.to_lowercase());
    }

    if let Some(max) = options.max_items {
        items.truncate(max);
    }

    items
}

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{inspect_object, print_object_inspection, render_inspection, Classifier};
    pub use pyscope_core::{AttributeInfo, InspectOptions};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn names(items: &[AttributeInfo]) -> BTreeSet<String> {
        items.iter().map(|item| item.name.clone()).collect()
    }

    #[test]
    fn test_public_result_is_subset_of_private_result() {
        Python::with_gil(|py| {
            let json = py.import("json").unwrap().into_any();

            let public = inspect_object(&json, &InspectOptions::default());
            let all = inspect_object(
                &json,
                &InspectOptions {
                    show_private: true,
                    ..Default::default()
                },
            );

            let public_names = names(&public);
            let all_names = names(&all);
            assert!(public_names.is_subset(&all_names));
            assert!(public_names.iter().all(|name| !name.starts_with('_')));
            assert!(all_names.iter().any(|name| name.starts_with('_')));
        });
    }

    #[test]
    fn test_max_items_truncates_after_sorting() {
        Python::with_gil(|py| {
            let json = py.import("json").unwrap().into_any();

            let full = inspect_object(&json, &InspectOptions::default());
            let limited = inspect_object(
                &json,
                &InspectOptions {
                    max_items: Some(3),
                    ..Default::default()
                },
            );

            assert_eq!(limited.len(), full.len().min(3));
            for (kept, original) in limited.iter().zip(full.iter()) {
                assert_eq!(kept.name, original.name);
            }
        });
    }

    #[test]
    fn test_grouped_and_flat_contain_same_names() {
        Python::with_gil(|py| {
            let json = py.import("json").unwrap().into_any();

            let grouped = inspect_object(&json, &InspectOptions::default());
            let flat = inspect_object(
                &json,
                &InspectOptions {
                    group_by_type: false,
                    ..Default::default()
                },
            );

            assert_eq!(names(&grouped), names(&flat));

            // Flat ordering is case-insensitive by name.
            let lowered: Vec<String> = flat.iter().map(|i| i.name.to_lowercase()).collect();
            let mut sorted = lowered.clone();
            sorted.sort();
            assert_eq!(lowered, sorted);
        });
    }

    #[test]
    fn test_show_docs_false_leaves_snippets_absent() {
        Python::with_gil(|py| {
            let json = py.import("json").unwrap().into_any();

            let items = inspect_object(
                &json,
                &InspectOptions {
                    show_docs: false,
                    ..Default::default()
                },
            );
            assert!(!items.is_empty());
            assert!(items.iter().all(|item| item.docstring_snippet.is_none()));
        });
    }

    #[test]
    fn test_results_come_from_enumerated_names() {
        Python::with_gil(|py| {
            let json = py.import("json").unwrap().into_any();
            let enumerated: BTreeSet<String> = json
                .dir()
                .unwrap()
                .iter()
                .filter_map(|n| n.extract::<String>().ok())
                .collect();

            let items = inspect_object(
                &json,
                &InspectOptions {
                    show_private: true,
                    ..Default::default()
                },
            );
            assert!(names(&items).is_subset(&enumerated));
        });
    }

    #[test]
    fn test_functions_carry_signatures_and_origin() {
        Python::with_gil(|py| {
            let json = py.import("json").unwrap().into_any();
            let items = inspect_object(&json, &InspectOptions::default());

            let loads = items.iter().find(|item| item.name == "loads").unwrap();
            assert_eq!(loads.type_description, "function");
            assert!(loads.signature.as_deref().unwrap().starts_with('('));
            assert_eq!(loads.module_origin.as_deref(), Some("json"));
        });
    }
}
