mod common;

use pkginfo_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

const OUTPUT: &str = "target/generated-sources/package-info";

#[test]
fn generate_writes_fresh_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path())?;

	common::pkginfo_cmd()
		.arg("generate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Wrote 2 file(s)."));

	let output = tmp.path().join(OUTPUT);
	let content = std::fs::read_to_string(output.join("com/example/package-info.java"))?;
	assert_eq!(content, "/**\n * Widgets.\n */\npackage com.example;\n");

	let content = std::fs::read_to_string(output.join("com/example/widgets/package-info.java"))?;
	assert_eq!(content, "/**\n * Widgets.\n */\npackage com.example.widgets;\n");

	Ok(())
}

#[test]
fn generate_twice_reports_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path())?;

	common::pkginfo_cmd()
		.arg("generate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::pkginfo_cmd()
		.arg("generate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already up to date"));

	Ok(())
}

#[test]
fn generate_dry_run_writes_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path())?;

	common::pkginfo_cmd()
		.arg("generate")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::contains("Dry run: would write 2 file(s):")
				.and(predicates::str::contains("com/example/package-info.java")),
		);

	assert!(!tmp.path().join(OUTPUT).exists());

	Ok(())
}

#[test]
fn generate_replaces_marker_region_in_place() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path())?;
	common::write(
		tmp.path(),
		"src/main/java/com/example/package-info.java",
		"// <replace>\nstale\n// </replace>\npackage com.example;\n",
	)?;

	common::pkginfo_cmd()
		.arg("generate")
		.arg("--no-generate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Wrote 1 file(s)."));

	let content =
		std::fs::read_to_string(tmp.path().join("src/main/java/com/example/package-info.java"))?;
	assert_eq!(
		content,
		"// <replace>\n/**\n * Widgets.\n */\npackage com.example;\n// </replace>\npackage \
		 com.example;\n"
	);
	assert!(!tmp.path().join(OUTPUT).exists());

	Ok(())
}

#[test]
fn generate_warns_about_missing_marker_region() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path())?;
	common::write(
		tmp.path(),
		"src/main/java/com/example/package-info.java",
		"package com.example;\n",
	)?;

	common::pkginfo_cmd()
		.arg("generate")
		.arg("--no-generate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("no marker region in"))
		.stdout(predicates::str::contains("already up to date"));

	Ok(())
}

#[test]
fn generate_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_project(tmp.path())?;

	let output = common::pkginfo_cmd()
		.arg("generate")
		.arg("--dry-run")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["dry_run"], Value::Bool(true));
	assert_eq!(json["changes"].as_array().map(Vec::len), Some(2));
	assert_eq!(json["changes"][0]["package"], "com.example");
	assert_eq!(json["changes"][0]["created"], Value::Bool(true));
	assert_eq!(json["visits"][0]["outcome"]["kind"], "generated");

	Ok(())
}

#[test]
fn generate_without_config_is_a_noop() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::pkginfo_cmd()
		.arg("generate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No pkginfo.toml found"));

	Ok(())
}

#[test]
fn generate_reports_missing_template_with_rule_index() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(
		tmp.path(),
		"pkginfo.toml",
		"[[packages]]\npattern = \"**\"\ntemplate = \"templates/missing.java\"\n",
	)?;
	common::write(tmp.path(), "src/main/java/com/A.java", "package com;\n")?;

	common::pkginfo_cmd()
		.arg("generate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(
			predicates::str::contains("pkginfo::template_not_found")
				.and(predicates::str::contains("packages[0]")),
		);

	assert!(!tmp.path().join(OUTPUT).exists());

	Ok(())
}

#[test]
fn generate_reports_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "pkginfo.toml", "generate = \"sometimes\"\n")?;

	common::pkginfo_cmd()
		.arg("generate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("pkginfo::config_parse"));

	Ok(())
}
