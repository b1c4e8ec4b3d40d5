#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const TEMPLATE: &str = "/**\n * Widgets.\n */\npackage com.template;\n";

pub fn pkginfo_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("pkginfo"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("PKGINFO_LOG");
	cmd
}

/// Write a file relative to `root`, creating parent directories.
pub fn write(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}

/// A project with one catch-all rule, a template, and two Java packages.
pub fn sample_project(root: &Path) -> std::io::Result<()> {
	write(
		root,
		"pkginfo.toml",
		"[[packages]]\npattern = \"com.**\"\ntemplate = \"templates/package-info.java\"\n",
	)?;
	write(root, "templates/package-info.java", TEMPLATE)?;
	write(root, "src/main/java/com/example/A.java", "package com.example;\n")?;
	write(
		root,
		"src/main/java/com/example/widgets/B.java",
		"package com.example.widgets;\n",
	)?;
	Ok(())
}
