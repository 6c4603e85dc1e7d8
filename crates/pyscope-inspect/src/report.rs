//! Report rendering for inspection results

use pyo3::prelude::*;

use pyscope_core::{InspectOptions, DEFAULT_MAX_WIDTH};

use crate::classify::Classifier;
use crate::inspect_object;

/// Render a full inspection report as a multi-line string.
///
/// Summary line, then one compact line per attribute, grouped under a
/// header per type description when `group_by_type` is set.
pub fn render_inspection(obj: &Bound<'_, PyAny>, options: &InspectOptions) -> String {
    let items = inspect_object(obj, options);
    if items.is_empty() {
        return "No accessible attributes found.\n".to_string();
    }

    let mut out = String::new();

    if let Ok(classifier) = Classifier::new(obj.py()) {
        let kind = classifier.type_description(obj);
        let name = classifier.object_name(obj);
        let total = obj.dir().map(|names| names.len()).unwrap_or(items.len());

        out.push_str(&format!("Inspecting {}: {}\n", kind, name));
        if items.len() != total {
            out.push_str(&format!(
                "Showing {} attributes (of {} total)\n",
                items.len(),
                total
            ));
        } else {
            out.push_str(&format!("Showing {} attributes\n", items.len()));
        }
        out.push_str(&"=".repeat(80));
        out.push('\n');
    }

    if options.group_by_type {
        let mut current_type: Option<&str> = None;
        for item in &items {
            if current_type != Some(item.type_description.as_str()) {
                current_type = Some(item.type_description.as_str());
                out.push_str(&format!("\n[{}]\n", item.type_description));
            }
            out.push_str("  ");
            out.push_str(&item.format_compact(DEFAULT_MAX_WIDTH));
            out.push('\n');
        }
    } else {
        for item in &items {
            out.push_str(&item.format_compact(DEFAULT_MAX_WIDTH));
            out.push('\n');
        }
    }

    if let Some(max) = options.max_items {
        if items.len() == max {
            out.push_str(&format!("\nResults truncated to {} items.\n", max));
        }
    }

    out
}

/// Print an inspection report to stdout
pub fn print_object_inspection(obj: &Bound<'_, PyAny>, options: &InspectOptions) {
    print!("{}", render_inspection(obj, options));
}
