//! pyscope — human-readable introspection of a live Python environment
//!
//! Thin presentation layer over the inspector and package crates: argument
//! parsing, logging setup, and rendering. No inspection logic lives here.

use anyhow::Result;
use clap::{Parser, Subcommand};
use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

use pyscope_core::{Error, InspectOptions};
use pyscope_inspect::{inspect_object, print_object_inspection};
use pyscope_packages::PackageFinder;

#[derive(Parser, Debug)]
#[command(name = "pyscope")]
#[command(about = "Explore live Python objects and installed packages")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect a live object reached by dotted path
    Inspect {
        /// Module or attribute path, e.g. "json" or "json.JSONEncoder"
        target: String,

        /// Include underscore-prefixed attributes
        #[arg(long)]
        private: bool,

        /// Skip docstring snippets
        #[arg(long)]
        no_docs: bool,

        /// Flat listing instead of grouping by type
        #[arg(long)]
        flat: bool,

        /// Keep at most this many attributes
        #[arg(long)]
        limit: Option<usize>,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Locate an installed package
    Find {
        name: String,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a submodule table of contents
    Toc {
        name: String,

        /// Traversal depth below the root package
        #[arg(long, default_value_t = 2)]
        depth: usize,

        /// Include underscore-prefixed modules and members
        #[arg(long)]
        all: bool,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// List the directories searched for packages
    Paths {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Inspect {
            target,
            private,
            no_docs,
            flat,
            limit,
            json,
        } => {
            let options = InspectOptions {
                show_private: private,
                show_docs: !no_docs,
                group_by_type: !flat,
                max_items: limit,
            };
            Python::with_gil(|py| -> Result<()> {
                let obj = resolve_target(py, &target)?;
                if json {
                    let items: Vec<serde_json::Value> = inspect_object(&obj, &options)
                        .iter()
                        .map(|item| item.to_json())
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&items)?);
                } else {
                    print_object_inspection(&obj, &options);
                }
                Ok(())
            })?;
        }
        Commands::Find { name, json } => {
            let info = PackageFinder::new().find_package(&name);
            if json {
                println!("{}", serde_json::to_string_pretty(&info.to_json())?);
            } else {
                print!("{}", info.format_human());
            }
        }
        Commands::Toc {
            name,
            depth,
            all,
            json,
        } => {
            let toc = PackageFinder::new().generate_toc(&name, depth, !all);
            if json {
                println!("{}", serde_json::to_string_pretty(&toc.to_json())?);
            } else {
                print!("{}", toc.format_human());
            }
        }
        Commands::Paths { json } => {
            let paths = PackageFinder::new().site_packages();
            if json {
                let rendered: Vec<String> =
                    paths.iter().map(|p| p.display().to_string()).collect();
                println!("{}", serde_json::to_string_pretty(&rendered)?);
            } else {
                for path in &paths {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

/// Resolve a dotted target: import the longest importable module prefix,
/// then walk the remaining segments with attribute lookups.
fn resolve_target<'py>(py: Python<'py>, target: &str) -> pyscope_core::Result<Bound<'py, PyAny>> {
    if let Ok(module) = py.import(target) {
        return Ok(module.into_any());
    }

    let segments: Vec<&str> = target.split('.').collect();
    for split in (1..segments.len()).rev() {
        let module_path = segments[..split].join(".");
        let Ok(module) = py.import(module_path.as_str()) else {
            continue;
        };
        let mut obj = module.into_any();
        for segment in &segments[split..] {
            obj = obj.getattr(*segment).map_err(|_| {
                Error::not_found(format!("{} has no attribute {}", module_path, segment))
            })?;
        }
        return Ok(obj);
    }

    Err(Error::not_found(format!("cannot import {}", target)))
}
