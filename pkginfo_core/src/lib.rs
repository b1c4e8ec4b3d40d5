//! `pkginfo_core` generates and maintains `package-info.java` files for every
//! package of a Java source tree from a list of pattern-to-template rules.
//!
//! ## Processing Pipeline
//!
//! ```text
//! pkginfo.toml
//!   → Config (rules, roots, marker pattern, generate/inline switches)
//!   → Validation (every rule has a pattern and a readable template file)
//!   → Template store (each template read once)
//!   → Tree walker (depth-first over the source tree, one package per directory)
//!       → Pattern matcher (first rule whose dotted glob matches the package)
//!       → Declaration rewriter (template `package` line → target package)
//!       → Fresh write into the output tree, or marker-region replacement in place
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `pkginfo.toml`.
//! - [`pattern`]: Dotted glob matching of package names.
//! - [`declaration`]: Rewriting the `package` statement of a template.
//! - [`marker`]: Replacing the body of a marked region in an existing file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use pkginfo_core::GenerateOptions;
//! use pkginfo_core::PkgInfoConfig;
//! use pkginfo_core::run;
//!
//! let root = Path::new(".");
//! let config = PkgInfoConfig::load(root).unwrap().unwrap_or_default();
//! let options = GenerateOptions::from_config(root, &config).unwrap();
//! let report = run(&options).unwrap();
//!
//! println!("{} file(s) written", report.changes.len());
//! ```

pub use config::*;
pub use error::*;
pub use marker::*;
pub use pattern::*;
pub use template::*;
pub use walker::*;

pub mod config;
pub mod declaration;
#[allow(unused_assignments)]
mod error;
pub mod marker;
pub mod pattern;
mod template;
mod walker;

#[cfg(test)]
mod __fixtures;
