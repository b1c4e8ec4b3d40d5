use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use pkginfo_cli::Commands;
use pkginfo_cli::OutputFormat;
use pkginfo_cli::PkgInfoCli;
use pkginfo_core::CONFIG_FILE_CANDIDATES;
use pkginfo_core::FileChange;
use pkginfo_core::GenerateOptions;
use pkginfo_core::GenerateReport;
use pkginfo_core::PkgInfoConfig;
use pkginfo_core::VisitOutcome;
use pkginfo_core::run;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "PKGINFO_LOG";

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = PkgInfoCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Generate {
			dry_run,
			no_generate,
			no_inline,
			format,
		}) => {
			let flags = GenerateFlags {
				dry_run,
				generate: !no_generate,
				inline: !no_inline,
			};
			run_generate(&args, flags, format)
		}
		Some(Commands::Check { diff, format }) => run_check(&args, diff, format),
		Some(Commands::List) => run_list(&args),
		None => {
			eprintln!("No subcommand specified. Run `pkginfo --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<pkginfo_core::PkgInfoError>() {
			Ok(pkginfo_err) => {
				let report: miette::Report = (*pkginfo_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.init();
}

fn resolve_root(args: &PkgInfoCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Overrides applied on top of the loaded config.
#[derive(Debug, Clone, Copy)]
struct GenerateFlags {
	dry_run: bool,
	generate: bool,
	inline: bool,
}

/// Load the project config and turn it into generation options. Returns
/// `None` after printing a hint when the project has no config file.
fn load_options(
	root: &Path,
	flags: GenerateFlags,
) -> Result<Option<GenerateOptions>, Box<dyn std::error::Error>> {
	let Some(config) = PkgInfoConfig::load(root)? else {
		println!(
			"No pkginfo.toml found in {}. Run `pkginfo init` to create one.",
			root.display()
		);
		return Ok(None);
	};

	tracing::debug!(root = %root.display(), ?flags, "loaded project config");

	let mut options = GenerateOptions::from_config(root, &config)?;
	options.dry_run = flags.dry_run;
	options.generate &= flags.generate;
	options.inline &= flags.inline;

	Ok(Some(options))
}

fn run_init(args: &PkgInfoCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config_path = root.join(CONFIG_FILE_CANDIDATES[0]);
	let template_path = root.join("templates").join("package-info.java");

	let config_exists = PkgInfoConfig::resolve_path(&root).is_some();
	let template_exists = template_path.exists();

	if config_exists {
		println!("Config file already exists in {}", root.display());
	} else {
		let sample_config = "# pkginfo configuration\n\nsource_directory = \
		                     \"src/main/java\"\noutput_directory = \
		                     \"target/generated-sources/package-info\"\n\n# Write new \
		                     package-info.java files into output_directory.\ngenerate = true\n# \
		                     Refresh the marked region of existing package-info.java \
		                     files.\ninline = true\n\n# Rules are tried in order. The first \
		                     matching pattern wins.\n[[packages]]\npattern = \"**\"\ntemplate = \
		                     \"templates/package-info.java\"\n";

		std::fs::write(&config_path, sample_config)?;
		println!("Created {}", CONFIG_FILE_CANDIDATES[0]);
	}

	if template_exists {
		println!("Template file already exists: {}", template_path.display());
	} else {
		let sample_template = "/**\n * Package documentation.\n */\npackage example;\n";

		if let Some(parent) = template_path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&template_path, sample_template)?;
		println!("Created template file: {}", template_path.display());
	}

	if !config_exists {
		println!();
		println!("Next steps:");
		println!("  1. Edit {} to describe your packages", template_path.display());
		println!("  2. Add package rules to {}", CONFIG_FILE_CANDIDATES[0]);
		println!("  3. Run `pkginfo generate` to write package-info files");
	}

	Ok(())
}

fn run_generate(
	args: &PkgInfoCli,
	flags: GenerateFlags,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let Some(options) = load_options(&root, flags)? else {
		return Ok(());
	};
	let report = run(&options)?;

	if matches!(format, OutputFormat::Json) {
		println!("{}", serde_json::to_string(&report_json(&report, &root))?);
		return Ok(());
	}

	print_marker_warnings(&report, &root);

	if report.is_clean() {
		println!("All package-info files are already up to date.");
		return Ok(());
	}

	if report.dry_run {
		println!("Dry run: would write {} file(s):", report.changes.len());
		for change in &report.changes {
			println!("  {}", make_relative(&change.file, &root));
		}
	} else {
		println!("Wrote {} file(s).", report.changes.len());

		if args.verbose {
			for change in &report.changes {
				println!("  {}", make_relative(&change.file, &root));
			}
		}
	}

	Ok(())
}

fn run_check(
	args: &PkgInfoCli,
	show_diff: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let flags = GenerateFlags {
		dry_run: true,
		generate: true,
		inline: true,
	};
	let Some(options) = load_options(&root, flags)? else {
		return Ok(());
	};
	let report = run(&options)?;

	if report.is_clean() {
		match format {
			OutputFormat::Json => {
				println!("{}", serde_json::to_string(&report_json(&report, &root))?);
			}
			OutputFormat::Text => {
				println!("Check passed: all package-info files are up to date.");
			}
		}
		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string(&report_json(&report, &root))?);
		}
		OutputFormat::Text => {
			eprintln!("Check failed.");
			eprintln!("  pending writes: {}", report.changes.len());
			eprintln!();

			for change in &report.changes {
				let rel = make_relative(&change.file, &root);
				let action = if change.previous.is_some() {
					"update"
				} else {
					"create"
				};
				eprintln!(
					"  {} {rel} ({})",
					colored!(action, yellow),
					display_package(&change.package)
				);

				if show_diff {
					print_change_diff(change);
				}
			}

			eprintln!();
			eprintln!("Run `pkginfo generate` to write them.");
		}
	}

	process::exit(1);
}

fn run_list(args: &PkgInfoCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let flags = GenerateFlags {
		dry_run: true,
		generate: true,
		inline: true,
	};
	let Some(options) = load_options(&root, flags)? else {
		return Ok(());
	};

	if options.packages.is_empty() {
		println!("No package rules configured.");
		return Ok(());
	}

	let report = run(&options)?;

	println!("{}", colored!("Rules:", bold));
	for (index, package) in options.packages.iter().enumerate() {
		let pattern = package.pattern.as_deref().unwrap_or_default();
		let template = package
			.template
			.as_deref()
			.map(|template| make_relative(template, &root))
			.unwrap_or_default();
		let case = if package.case_sensitive {
			""
		} else {
			" (case-insensitive)"
		};
		println!("  [{index}] {pattern}{case} -> {template}");

		for visit in report
			.visits
			.iter()
			.filter(|visit| visit.rule == Some(index))
		{
			let pending = if visit.outcome.is_write() {
				" (out of date)"
			} else {
				""
			};
			println!("      {}{pending}", display_package(&visit.package));
		}
	}

	let unmatched: Vec<_> = report
		.visits
		.iter()
		.filter(|visit| visit.rule.is_none())
		.collect();
	if !unmatched.is_empty() {
		println!();
		println!("{}", colored!("Unmatched:", bold));
		for visit in unmatched {
			println!("  {}", display_package(&visit.package));
		}
	}

	println!(
		"\n{} rule(s), {} package(s), {} unmatched",
		options.packages.len(),
		report.visits.len(),
		report.count(|outcome| matches!(outcome, VisitOutcome::NoMatch))
	);

	Ok(())
}

fn report_json(report: &GenerateReport, root: &Path) -> serde_json::Value {
	let changes: Vec<serde_json::Value> = report
		.changes
		.iter()
		.map(|change| {
			serde_json::json!({
				"file": make_relative(&change.file, root),
				"package": change.package,
				"created": change.previous.is_none(),
			})
		})
		.collect();
	let visits: Vec<serde_json::Value> = report
		.visits
		.iter()
		.map(|visit| {
			serde_json::json!({
				"directory": make_relative(&visit.directory, root),
				"package": visit.package,
				"rule": visit.rule,
				"outcome": visit.outcome,
			})
		})
		.collect();

	serde_json::json!({
		"ok": report.is_clean() || !report.dry_run,
		"dry_run": report.dry_run,
		"changes": changes,
		"visits": visits,
	})
}

/// Existing package-info files without a marked region are left alone. Point
/// them out so the user can add markers.
fn print_marker_warnings(report: &GenerateReport, root: &Path) {
	for visit in &report.visits {
		if !matches!(visit.outcome, VisitOutcome::MarkerNotFound { .. }) {
			continue;
		}

		if let Some(file) = visit.outcome.file() {
			eprintln!(
				"{} no marker region in {}",
				colored!("warning:", yellow),
				make_relative(file, root)
			);
		}
	}
}

fn print_change_diff(change: &FileChange) {
	let current = change.previous.as_deref().unwrap_or_default();
	print_diff(current, &change.content);
	eprintln!();
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("    {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("    {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("     {change}");
			}
		}
	}
}

fn display_package(package: &str) -> &str {
	if package.is_empty() {
		"<root>"
	} else {
		package
	}
}

fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
