use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate and maintain package-info.java files from pattern-matched templates.",
	long_about = "pkginfo walks a Java source tree and gives every package a package-info.java \
	              file rendered from the first template whose package pattern matches.\n\nNew \
	              files are written into a mirrored output directory. Existing files in the \
	              source tree have their marked region refreshed in place.\n\nQuick start:\n  \
	              pkginfo init      Create a sample config and template\n  pkginfo generate  \
	              Write and refresh package-info files\n  pkginfo check     Verify everything \
	              is up to date"
)]
pub struct PkgInfoCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize pkginfo in a project with a sample config and template.
	///
	/// Creates `pkginfo.toml` and `templates/package-info.java` in the project
	/// root. Existing files are left untouched.
	Init,
	/// Generate missing package-info files and refresh marked regions.
	///
	/// Walks the configured source directory, matches each package against
	/// the configured rules, and writes the rendered template into the output
	/// directory or into the marked region of an existing package-info file.
	Generate {
		/// Preview changes without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Do not write new package-info files into the output directory.
		#[arg(long, default_value_t = false)]
		no_generate: bool,

		/// Do not touch existing package-info files in the source tree.
		#[arg(long, default_value_t = false)]
		no_inline: bool,

		/// Output format for the run summary.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Check that every package-info file is up to date.
	///
	/// Performs a dry run and exits with a non-zero status code if any file
	/// would be written. Ideal for CI pipelines.
	Check {
		/// Show a unified diff for each file that would change.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the configured rules and the packages each one claims.
	List,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	#[default]
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
