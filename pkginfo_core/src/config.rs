use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::PkgInfoError;
use crate::PkgInfoResult;
use crate::marker::DEFAULT_INLINE_REPLACE_PATTERN;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["pkginfo.toml", ".pkginfo.toml", ".config/pkginfo.toml"];

/// Source directory used when none is configured.
pub const DEFAULT_SOURCE_DIRECTORY: &str = "src/main/java";

/// Output directory used when none is configured.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "target/generated-sources/package-info";

/// Name of the per-package documentation file.
pub const DEFAULT_MARKER_FILE: &str = "package-info.java";

/// Extension of the files that make a directory a package.
pub const DEFAULT_SOURCE_EXTENSION: &str = "java";

/// One `[[packages]]` entry as written in the config file.
///
/// Fields are optional at this level so that a missing `pattern` or
/// `template` is reported with the entry's index rather than as a TOML error.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PackageConfig {
	/// Dotted glob matched against package names.
	#[serde(default)]
	pub pattern: Option<String>,
	/// Whether `pattern` is matched case-sensitively. Defaults to `true`.
	#[serde(default = "default_true")]
	pub case_sensitive: bool,
	/// Template file, relative to the project root.
	#[serde(default)]
	pub template: Option<PathBuf>,
}

/// Configuration loaded from a `pkginfo.toml` file.
///
/// ```toml
/// source_directory = "src/main/java"
/// output_directory = "target/generated-sources/package-info"
/// generate = true
/// inline = true
///
/// [[packages]]
/// pattern = "com.example.**"
/// template = "templates/package-info.java"
///
/// [[packages]]
/// pattern = "**"
/// case_sensitive = false
/// template = "templates/default-package-info.java"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PkgInfoConfig {
	/// Root of the source tree to walk.
	#[serde(default = "default_source_directory")]
	pub source_directory: PathBuf,
	/// Root of the mirrored tree receiving freshly generated files.
	#[serde(default = "default_output_directory")]
	pub output_directory: PathBuf,
	/// Write a new marker file when a package does not have one.
	#[serde(default = "default_true")]
	pub generate: bool,
	/// Replace the marker region of an existing marker file.
	#[serde(default = "default_true")]
	pub inline: bool,
	/// Regular expression with three groups: prefix marker, body, suffix
	/// marker.
	#[serde(default = "default_inline_replace_pattern")]
	pub inline_replace_pattern: String,
	/// File name of the per-package documentation file.
	#[serde(default = "default_marker_file")]
	pub marker_file: String,
	/// Extensions (without the dot) of source files.
	#[serde(default = "default_source_extensions")]
	pub source_extensions: Vec<String>,
	/// Ordered package rules. The first matching rule wins.
	#[serde(default)]
	pub packages: Vec<PackageConfig>,
}

impl Default for PkgInfoConfig {
	fn default() -> Self {
		Self {
			source_directory: default_source_directory(),
			output_directory: default_output_directory(),
			generate: true,
			inline: true,
			inline_replace_pattern: default_inline_replace_pattern(),
			marker_file: default_marker_file(),
			source_extensions: default_source_extensions(),
			packages: Vec::new(),
		}
	}
}

fn default_true() -> bool {
	true
}

fn default_source_directory() -> PathBuf {
	PathBuf::from(DEFAULT_SOURCE_DIRECTORY)
}

fn default_output_directory() -> PathBuf {
	PathBuf::from(DEFAULT_OUTPUT_DIRECTORY)
}

fn default_inline_replace_pattern() -> String {
	DEFAULT_INLINE_REPLACE_PATTERN.to_string()
}

fn default_marker_file() -> String {
	DEFAULT_MARKER_FILE.to_string()
}

fn default_source_extensions() -> Vec<String> {
	vec![DEFAULT_SOURCE_EXTENSION.to_string()]
}

impl PkgInfoConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> PkgInfoResult<Option<PkgInfoConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Parse config from TOML text.
	pub fn parse(content: &str) -> PkgInfoResult<PkgInfoConfig> {
		toml::from_str(content).map_err(|e| PkgInfoError::ConfigParse(e.to_string()))
	}
}
