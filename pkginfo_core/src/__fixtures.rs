use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::GenerateOptions;

pub const SOURCE_DIR: &str = "src/main/java";
pub const OUTPUT_DIR: &str = "target/generated-sources/package-info";
pub const TEMPLATE_PATH: &str = "templates/package-info.java";

pub const TEMPLATE: &str = "/**\n * Widgets.\n */\npackage com.template;\n";

pub const EXISTING_WITH_MARKERS: &str =
	"// Copyright Example\n// <replace>\nstale\n// </replace>\n";

/// The template rewritten for `package`, as written to a fresh file.
pub fn rendered(package: &str) -> String {
	if package.is_empty() {
		"/**\n * Widgets.\n */\n\n".to_string()
	} else {
		format!("/**\n * Widgets.\n */\npackage {package};\n")
	}
}

/// A throwaway project directory with a conventional Java layout.
pub struct Project {
	dir: TempDir,
}

impl Project {
	pub fn new() -> Self {
		let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
		Self { dir }
	}

	/// A project with the default template already written.
	pub fn with_template() -> Self {
		let project = Self::new();
		project.write(TEMPLATE_PATH, TEMPLATE);
		project
	}

	pub fn root(&self) -> &Path {
		self.dir.path()
	}

	pub fn path(&self, relative: &str) -> PathBuf {
		self.dir.path().join(relative)
	}

	pub fn source(&self) -> PathBuf {
		self.path(SOURCE_DIR)
	}

	pub fn output(&self) -> PathBuf {
		self.path(OUTPUT_DIR)
	}

	pub fn template(&self) -> PathBuf {
		self.path(TEMPLATE_PATH)
	}

	/// Write a file relative to the project root, creating parent
	/// directories.
	pub fn write(&self, relative: &str, content: &str) -> PathBuf {
		let path = self.path(relative);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
		}
		std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {relative}: {e}"));
		path
	}

	/// Write a Java source file into a package directory under the source
	/// root.
	pub fn write_source(&self, package_dir: &str, file: &str, content: &str) -> PathBuf {
		let relative = if package_dir.is_empty() {
			format!("{SOURCE_DIR}/{file}")
		} else {
			format!("{SOURCE_DIR}/{package_dir}/{file}")
		};
		self.write(&relative, content)
	}

	pub fn mkdir(&self, relative: &str) -> PathBuf {
		let path = self.path(relative);
		std::fs::create_dir_all(&path).unwrap_or_else(|e| panic!("create dir: {e}"));
		path
	}

	pub fn output_file(&self, package_dir: &str) -> PathBuf {
		if package_dir.is_empty() {
			self.output().join("package-info.java")
		} else {
			self.output().join(package_dir).join("package-info.java")
		}
	}

	/// Default options with a single rule bound to the default template.
	pub fn options(&self, pattern: &str) -> GenerateOptions {
		GenerateOptions::new(self.source(), self.output()).with_package(pattern, self.template())
	}
}

/// Change the permission bits of `path`.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) {
	use std::os::unix::fs::PermissionsExt;

	std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
		.unwrap_or_else(|e| panic!("chmod {}: {e}", path.display()));
}
