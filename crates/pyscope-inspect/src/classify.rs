//! Value classification and per-field extraction
//!
//! The classifier evaluates an ordered sequence of capability predicates
//! over a live Python value and returns the first match. Each extractor is
//! independently fault-isolated: any interpreter error degrades that one
//! field to `None`.

use pyo3::prelude::*;
use pyo3::types::{
    PyComplex, PyDict, PyFloat, PyFrozenSet, PyInt, PyList, PyModule, PySet, PyString, PyTuple,
    PyType,
};

use pyscope_core::ellipsize;

/// Value previews are capped at this many characters
const PREVIEW_MAX: usize = 50;

/// Classifies live Python values and extracts their metadata.
///
/// Holds the reflection collaborators (the `inspect` module and the builtin
/// descriptor types) for the duration of one inspection call.
pub struct Classifier<'py> {
    inspect: Bound<'py, PyModule>,
    property_type: Bound<'py, PyAny>,
    classmethod_type: Bound<'py, PyAny>,
    staticmethod_type: Bound<'py, PyAny>,
}

impl<'py> Classifier<'py> {
    pub fn new(py: Python<'py>) -> PyResult<Self> {
        let builtins = py.import("builtins")?;
        Ok(Self {
            inspect: py.import("inspect")?,
            property_type: builtins.getattr("property")?,
            classmethod_type: builtins.getattr("classmethod")?,
            staticmethod_type: builtins.getattr("staticmethod")?,
        })
    }

    /// Coarse semantic category of a value, first predicate wins.
    pub fn type_description(&self, value: &Bound<'py, PyAny>) -> String {
        if let Ok(class) = value.downcast::<PyType>() {
            if class
                .is_subclass_of::<pyo3::exceptions::PyBaseException>()
                .unwrap_or(false)
            {
                return "exception".to_string();
            }
            let is_abstract = class
                .getattr("__abstractmethods__")
                .and_then(|methods| methods.is_truthy())
                .unwrap_or(false);
            if is_abstract {
                return "abstract class".to_string();
            }
            return "class".to_string();
        }

        if self.check("isfunction", value) {
            return "function".to_string();
        }
        if self.check("ismethod", value) {
            return "method".to_string();
        }
        if self.check("isbuiltin", value) {
            return "builtin".to_string();
        }
        if value.is_instance(&self.property_type).unwrap_or(false) {
            return "property".to_string();
        }
        if value.is_instance(&self.classmethod_type).unwrap_or(false) {
            return "classmethod".to_string();
        }
        if value.is_instance(&self.staticmethod_type).unwrap_or(false) {
            return "staticmethod".to_string();
        }
        if value.is_instance_of::<PyModule>() {
            return "module".to_string();
        }
        if value.is_callable() {
            return "callable".to_string();
        }
        if is_number(value) {
            return "number".to_string();
        }
        if value.is_instance_of::<PyString>() {
            return "string".to_string();
        }
        if is_sequence_like(value) {
            return format!("{}[{}]", self.type_name(value), value.len().unwrap_or(0));
        }
        if value.is_instance_of::<PyDict>() {
            return format!("dict[{}]", value.len().unwrap_or(0));
        }
        if value.hasattr("__dict__").unwrap_or(false) && !value.is_callable() {
            return "instance".to_string();
        }
        self.type_name(value)
    }

    /// Call-signature string for callables that are not classes.
    pub fn signature(&self, value: &Bound<'py, PyAny>) -> Option<String> {
        if !value.is_callable() || value.is_instance_of::<PyType>() {
            return None;
        }
        let signature = self.inspect.call_method1("signature", (value,)).ok()?;
        signature
            .str()
            .ok()
            .map(|s| s.to_string_lossy().into_owned())
    }

    /// First non-blank documentation line, length-capped.
    pub fn doc_snippet(&self, value: &Bound<'py, PyAny>, max_length: usize) -> Option<String> {
        let doc = self.inspect.call_method1("getdoc", (value,)).ok()?;
        if doc.is_none() {
            return None;
        }
        let doc: String = doc.extract().ok()?;
        let first_line = doc.lines().map(str::trim).find(|line| !line.is_empty())?;
        Some(ellipsize(first_line, max_length))
    }

    /// Short textual representation for simple values only.
    pub fn value_preview(&self, value: &Bound<'py, PyAny>) -> Option<String> {
        if is_number(value) {
            return value.str().ok().map(|s| s.to_string_lossy().into_owned());
        }

        if let Ok(s) = value.downcast::<PyString>() {
            let text = s.to_string_lossy().into_owned();
            if text.chars().count() <= PREVIEW_MAX {
                return repr_string(value);
            }
            let truncated: String = text.chars().take(PREVIEW_MAX - 5).collect();
            let shortened = PyString::new(value.py(), &format!("{}...", truncated));
            return repr_string(shortened.as_any());
        }

        if is_sequence_like(value) {
            let len = value.len().unwrap_or(0);
            if len <= 3 {
                if let Some(repr) = repr_string(value) {
                    if repr.chars().count() <= PREVIEW_MAX {
                        return Some(repr);
                    }
                }
            }
            return Some(format!("{}[{} items]", self.type_name(value), len));
        }

        if value.is_instance_of::<PyDict>() {
            let len = value.len().unwrap_or(0);
            if len <= 2 {
                if let Some(repr) = repr_string(value) {
                    if repr.chars().count() <= PREVIEW_MAX {
                        return Some(repr);
                    }
                }
            }
            return Some(format!("dict[{} items]", len));
        }

        None
    }

    /// Name of the module that defines the value, if recorded.
    pub fn module_origin(&self, value: &Bound<'py, PyAny>) -> Option<String> {
        let module = value.getattr("__module__").ok()?;
        if module.is_none() {
            return None;
        }
        module.extract().ok()
    }

    /// `__name__` where present, runtime type name otherwise.
    pub fn object_name(&self, value: &Bound<'py, PyAny>) -> String {
        value
            .getattr("__name__")
            .ok()
            .and_then(|name| name.extract::<String>().ok())
            .unwrap_or_else(|| self.type_name(value))
    }

    fn check(&self, predicate: &str, value: &Bound<'py, PyAny>) -> bool {
        self.inspect
            .call_method1(predicate, (value,))
            .and_then(|result| result.is_truthy())
            .unwrap_or(false)
    }

    fn type_name(&self, value: &Bound<'py, PyAny>) -> String {
        value
            .get_type()
            .name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "object".to_string())
    }
}

fn is_number(value: &Bound<'_, PyAny>) -> bool {
    value.is_instance_of::<PyInt>()
        || value.is_instance_of::<PyFloat>()
        || value.is_instance_of::<PyComplex>()
}

fn is_sequence_like(value: &Bound<'_, PyAny>) -> bool {
    value.is_instance_of::<PyList>()
        || value.is_instance_of::<PyTuple>()
        || value.is_instance_of::<PySet>()
        || value.is_instance_of::<PyFrozenSet>()
}

fn repr_string(value: &Bound<'_, PyAny>) -> Option<String> {
    value.repr().ok().map(|r| r.to_string_lossy().into_owned())
}
