use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::PkgInfoError;
use crate::PkgInfoResult;
use crate::Rule;
use crate::TemplateStore;
use crate::config::DEFAULT_MARKER_FILE;
use crate::config::DEFAULT_SOURCE_EXTENSION;
use crate::config::PackageConfig;
use crate::config::PkgInfoConfig;
use crate::declaration::rewrite_declaration;
use crate::marker::MarkerPattern;
use crate::marker::replace_marker_region;
use crate::pattern::SEGMENT_SEPARATOR;
use crate::pattern::find_match;

/// Everything a generation run needs, resolved to absolute paths.
///
/// Build it with [`GenerateOptions::from_config`] or construct it directly.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateOptions {
	/// Root of the source tree. Maps to the root package.
	pub source_directory: PathBuf,
	/// Root of the mirrored output tree for freshly generated files.
	pub output_directory: PathBuf,
	/// Ordered package rules, validated when the run starts.
	pub packages: Vec<PackageConfig>,
	/// Marker region pattern for inline replacement.
	pub inline_replace_pattern: MarkerPattern,
	/// Write new marker files for packages without one.
	pub generate: bool,
	/// Patch the marker region of existing marker files.
	pub inline: bool,
	/// File name of the marker file, e.g. `package-info.java`.
	pub marker_file: String,
	/// Extensions of files that make a directory a package.
	pub source_extensions: Vec<String>,
	/// Compute outcomes without touching the filesystem.
	pub dry_run: bool,
}

impl GenerateOptions {
	/// Options with default settings for the given source and output roots
	/// and no package rules.
	pub fn new(source_directory: impl Into<PathBuf>, output_directory: impl Into<PathBuf>) -> Self {
		Self {
			source_directory: source_directory.into(),
			output_directory: output_directory.into(),
			packages: Vec::new(),
			inline_replace_pattern: MarkerPattern::default(),
			generate: true,
			inline: true,
			marker_file: DEFAULT_MARKER_FILE.to_string(),
			source_extensions: vec![DEFAULT_SOURCE_EXTENSION.to_string()],
			dry_run: false,
		}
	}

	/// Append a case-sensitive package rule.
	#[must_use]
	pub fn with_package(mut self, pattern: impl Into<String>, template: impl Into<PathBuf>) -> Self {
		self.packages.push(PackageConfig {
			pattern: Some(pattern.into()),
			case_sensitive: true,
			template: Some(template.into()),
		});
		self
	}

	/// Construct options from a loaded config. Relative paths are resolved
	/// against `root`.
	pub fn from_config(root: &Path, config: &PkgInfoConfig) -> PkgInfoResult<Self> {
		let packages = config
			.packages
			.iter()
			.map(|package| {
				PackageConfig {
					template: package.template.as_ref().map(|t| root.join(t)),
					..package.clone()
				}
			})
			.collect();

		Ok(Self {
			source_directory: root.join(&config.source_directory),
			output_directory: root.join(&config.output_directory),
			packages,
			inline_replace_pattern: MarkerPattern::new(&config.inline_replace_pattern)?,
			generate: config.generate,
			inline: config.inline,
			marker_file: config.marker_file.clone(),
			source_extensions: config.source_extensions.clone(),
			dry_run: false,
		})
	}

	/// Check the roots and every package rule. Returns the validated rules
	/// in declared order.
	pub fn validate(&self) -> PkgInfoResult<Vec<Rule>> {
		tracing::debug!("validating options");

		if !self.source_directory.is_dir() {
			return Err(PkgInfoError::SourceNotDirectory {
				path: self.source_directory.display().to_string(),
			});
		}

		if self.generate && self.output_directory.exists() && !self.output_directory.is_dir() {
			return Err(PkgInfoError::OutputNotDirectory {
				path: self.output_directory.display().to_string(),
			});
		}

		self.packages
			.iter()
			.enumerate()
			.map(|(index, package)| validate_package(index, package))
			.collect()
	}

	fn is_source_file(&self, path: &Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| self.source_extensions.iter().any(|e| e == ext))
	}
}

fn validate_package(index: usize, package: &PackageConfig) -> PkgInfoResult<Rule> {
	let Some(pattern) = package.pattern.as_deref().filter(|p| !p.is_empty()) else {
		return Err(PkgInfoError::MissingPattern { index });
	};

	let Some(template) = package.template.as_ref() else {
		return Err(PkgInfoError::MissingTemplate { index });
	};

	if !template.exists() {
		return Err(PkgInfoError::TemplateNotFound {
			index,
			path: template.display().to_string(),
		});
	}

	if !template.is_file() {
		return Err(PkgInfoError::TemplateNotFile {
			index,
			path: template.display().to_string(),
		});
	}

	Ok(Rule::new(
		index,
		pattern,
		package.case_sensitive,
		template.clone(),
	))
}

/// What happened to one package directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum VisitOutcome {
	/// No rule matches the package.
	NoMatch,
	/// A fresh marker file was written (or would be, in a dry run).
	Generated { file: PathBuf },
	/// The fresh marker file already had the expected content.
	GeneratedUpToDate { file: PathBuf },
	/// No marker file exists and fresh generation is disabled.
	GenerateDisabled,
	/// The marker region of an existing file was replaced (or would be).
	Replaced { file: PathBuf },
	/// The marker region already had the expected content.
	MarkerUpToDate { file: PathBuf },
	/// The existing marker file has no marker region.
	MarkerNotFound { file: PathBuf },
	/// The existing marker file is itself a template and is left alone.
	TemplateSource { file: PathBuf },
	/// A marker file exists and inline editing is disabled.
	SkipExisting { file: PathBuf },
}

impl VisitOutcome {
	/// Whether this outcome writes a file.
	pub fn is_write(&self) -> bool {
		matches!(self, Self::Generated { .. } | Self::Replaced { .. })
	}

	/// The marker file this outcome refers to, if any.
	pub fn file(&self) -> Option<&Path> {
		match self {
			Self::NoMatch | Self::GenerateDisabled => None,
			Self::Generated { file }
			| Self::GeneratedUpToDate { file }
			| Self::Replaced { file }
			| Self::MarkerUpToDate { file }
			| Self::MarkerNotFound { file }
			| Self::TemplateSource { file }
			| Self::SkipExisting { file } => Some(file),
		}
	}
}

/// A directory that contains source files, with its package and outcome.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryVisit {
	/// The source directory.
	pub directory: PathBuf,
	/// Dotted package name. Empty for the root package.
	pub package: String,
	/// Index of the matching rule, if any.
	pub rule: Option<usize>,
	pub outcome: VisitOutcome,
}

/// A file written by the run, with its content before and after.
#[derive(Debug, Clone, Serialize)]
pub struct FileChange {
	pub file: PathBuf,
	pub package: String,
	/// Content on disk before the run. `None` for new files.
	#[serde(skip)]
	pub previous: Option<String>,
	#[serde(skip)]
	pub content: String,
}

/// Result of a generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateReport {
	/// Whether the run was a dry run. When true, `changes` are pending and
	/// were not written.
	pub dry_run: bool,
	/// One entry per directory containing source files, in walk order.
	pub visits: Vec<DirectoryVisit>,
	/// Files written (or pending, in a dry run), in walk order.
	pub changes: Vec<FileChange>,
}

impl GenerateReport {
	fn new(dry_run: bool) -> Self {
		Self {
			dry_run,
			..Self::default()
		}
	}

	/// Returns true when nothing was written or would be written.
	pub fn is_clean(&self) -> bool {
		self.changes.is_empty()
	}

	/// Paths of all written (or pending) files.
	pub fn written_files(&self) -> Vec<&Path> {
		self.changes.iter().map(|change| change.file.as_path()).collect()
	}

	/// Number of visits matching `predicate`.
	pub fn count(&self, predicate: impl Fn(&VisitOutcome) -> bool) -> usize {
		self.visits
			.iter()
			.filter(|visit| predicate(&visit.outcome))
			.count()
	}

	/// Find the visit for a package name.
	pub fn visit(&self, package: &str) -> Option<&DirectoryVisit> {
		self.visits.iter().find(|visit| visit.package == package)
	}
}

/// Generate or update the marker file of every package under the source
/// directory.
///
/// Configuration and templates are fully validated before anything on disk
/// is touched. The first I/O failure during the walk aborts the run; files
/// written before the failure stay on disk.
pub fn run(options: &GenerateOptions) -> PkgInfoResult<GenerateReport> {
	tracing::info!(
		source = %options.source_directory.display(),
		output = %options.output_directory.display(),
		generate = options.generate,
		inline = options.inline,
		dry_run = options.dry_run,
		"generating {} files",
		options.marker_file
	);

	let mut report = GenerateReport::new(options.dry_run);

	if options.packages.is_empty() {
		tracing::warn!("skipping generate, no packages configured");
		return Ok(report);
	}

	if !options.source_directory.exists() {
		tracing::info!(
			source = %options.source_directory.display(),
			"skipping generate, source directory not found"
		);
		return Ok(report);
	}

	let rules = options.validate()?;
	tracing::debug!("loading templates");
	let templates = TemplateStore::load_all(&rules)?;

	if options.generate && !options.dry_run && !options.output_directory.exists() {
		create_directory(&options.output_directory)?;
	}

	let mut walker = Walker {
		options,
		rules: &rules,
		templates: &templates,
		ancestors: HashSet::new(),
		report: &mut report,
	};
	walker.walk(&options.source_directory, &options.output_directory, "")?;

	tracing::debug!(
		visited = report.visits.len(),
		changed = report.changes.len(),
		"done"
	);

	Ok(report)
}

struct Walker<'a> {
	options: &'a GenerateOptions,
	rules: &'a [Rule],
	templates: &'a TemplateStore,
	/// Canonical paths of the directories on the current walk path.
	ancestors: HashSet<PathBuf>,
	report: &'a mut GenerateReport,
}

/// Source files and visible subdirectories of a single directory, sorted by
/// name.
struct DirectoryListing {
	source_files: Vec<PathBuf>,
	subdirectories: Vec<PathBuf>,
}

impl Walker<'_> {
	fn walk(&mut self, source_dir: &Path, output_dir: &Path, package: &str) -> PkgInfoResult<()> {
		let canonical = source_dir
			.canonicalize()
			.unwrap_or_else(|_| source_dir.to_path_buf());
		if !self.ancestors.insert(canonical.clone()) {
			return Err(PkgInfoError::SymlinkCycle {
				path: source_dir.display().to_string(),
			});
		}

		let listing = self.list_directory(source_dir)?;

		if !listing.source_files.is_empty() {
			let marker_file = listing
				.source_files
				.iter()
				.find(|file| file.file_name().is_some_and(|name| name == self.options.marker_file.as_str()));
			let (rule, outcome) = self.visit(package, marker_file.map(PathBuf::as_path), output_dir)?;

			self.report.visits.push(DirectoryVisit {
				directory: source_dir.to_path_buf(),
				package: package.to_string(),
				rule,
				outcome,
			});
		}

		for child in &listing.subdirectories {
			// Directory names that are not valid UTF-8 cannot form a package
			// name.
			let Some(name) = child.file_name().and_then(|name| name.to_str()) else {
				tracing::debug!(path = %child.display(), "skipping non UTF-8 directory name");
				continue;
			};

			let child_package = if package.is_empty() {
				name.to_string()
			} else {
				format!("{package}{SEGMENT_SEPARATOR}{name}")
			};

			self.walk(child, &output_dir.join(name), &child_package)?;
		}

		// Only ancestors count towards a cycle.
		self.ancestors.remove(&canonical);

		Ok(())
	}

	fn list_directory(&self, dir: &Path) -> PkgInfoResult<DirectoryListing> {
		let read_error = |source| {
			PkgInfoError::ReadDirectory {
				path: dir.display().to_string(),
				source,
			}
		};

		let mut source_files = Vec::new();
		let mut subdirectories = Vec::new();

		for entry in std::fs::read_dir(dir).map_err(read_error)? {
			let path = entry.map_err(read_error)?.path();

			if path.is_dir() {
				if !is_hidden(&path) {
					subdirectories.push(path);
				}
			} else if path.is_file() && self.options.is_source_file(&path) {
				source_files.push(path);
			}
		}

		// Sort for deterministic ordering.
		source_files.sort();
		subdirectories.sort();

		Ok(DirectoryListing {
			source_files,
			subdirectories,
		})
	}

	fn visit(
		&mut self,
		package: &str,
		marker_file: Option<&Path>,
		output_dir: &Path,
	) -> PkgInfoResult<(Option<usize>, VisitOutcome)> {
		let Some(rule) = find_match(package, self.rules) else {
			tracing::debug!(package, "package does not match any patterns");
			return Ok((None, VisitOutcome::NoMatch));
		};

		let outcome = match marker_file {
			None if self.options.generate => self.generate(rule, package, output_dir)?,
			None => {
				tracing::debug!(package, "skipping package, generate is disabled");
				VisitOutcome::GenerateDisabled
			}
			Some(file) if self.options.inline => self.replace_inline(rule, package, file)?,
			Some(file) => {
				tracing::debug!(
					package,
					file = %file.display(),
					"skipping package, main source already has a {}",
					self.options.marker_file
				);
				VisitOutcome::SkipExisting {
					file: file.to_path_buf(),
				}
			}
		};

		Ok((Some(rule.index), outcome))
	}

	/// The template of `rule` with its declaration rewritten for `package`.
	fn render(&self, rule: &Rule, package: &str) -> PkgInfoResult<String> {
		let template = self.templates.get(&rule.template)?;
		Ok(rewrite_declaration(template, package))
	}

	fn generate(&mut self, rule: &Rule, package: &str, output_dir: &Path) -> PkgInfoResult<VisitOutcome> {
		let file = output_dir.join(&self.options.marker_file);
		let content = self.render(rule, package)?;
		let previous = read_optional(&file)?;

		if previous.as_deref() == Some(content.as_bytes()) {
			tracing::debug!(package, file = %file.display(), "generated file is up to date");
			return Ok(VisitOutcome::GeneratedUpToDate { file });
		}

		tracing::debug!(package, file = %file.display(), "writing package");

		if !self.options.dry_run {
			if !output_dir.exists() {
				create_directory(output_dir)?;
			}
			write_file(&file, &content)?;
		}

		self.report.changes.push(FileChange {
			file: file.clone(),
			package: package.to_string(),
			previous: previous.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
			content,
		});

		Ok(VisitOutcome::Generated { file })
	}

	fn replace_inline(&mut self, rule: &Rule, package: &str, file: &Path) -> PkgInfoResult<VisitOutcome> {
		tracing::debug!(
			package,
			file = %file.display(),
			"existing marker file found, looking for replacement markers"
		);

		if self.templates.contains(file) {
			tracing::debug!(file = %file.display(), "marker file is a template, skipping");
			return Ok(VisitOutcome::TemplateSource {
				file: file.to_path_buf(),
			});
		}

		let source = std::fs::read_to_string(file).map_err(|source| {
			PkgInfoError::ReadFile {
				path: file.display().to_string(),
				source,
			}
		})?;
		let body = self.render(rule, package)?;
		// The markers carry their own surrounding whitespace.
		let replacement =
			replace_marker_region(&source, &self.options.inline_replace_pattern, body.trim());

		if !replacement.matched {
			tracing::debug!(
				pattern = self.options.inline_replace_pattern.as_str(),
				file = %file.display(),
				"replace pattern not found, skipping"
			);
			return Ok(VisitOutcome::MarkerNotFound {
				file: file.to_path_buf(),
			});
		}

		if !replacement.changed {
			return Ok(VisitOutcome::MarkerUpToDate {
				file: file.to_path_buf(),
			});
		}

		if !self.options.dry_run {
			write_file(file, &replacement.content)?;
		}

		self.report.changes.push(FileChange {
			file: file.to_path_buf(),
			package: package.to_string(),
			previous: Some(source),
			content: replacement.content,
		});

		Ok(VisitOutcome::Replaced {
			file: file.to_path_buf(),
		})
	}
}

fn is_hidden(path: &Path) -> bool {
	path.file_name()
		.and_then(|name| name.to_str())
		.is_some_and(|name| name.starts_with('.'))
}

/// Read a file's bytes, treating a missing file as `None`.
fn read_optional(path: &Path) -> PkgInfoResult<Option<Vec<u8>>> {
	if !path.is_file() {
		return Ok(None);
	}

	std::fs::read(path).map(Some).map_err(|source| {
		PkgInfoError::ReadFile {
			path: path.display().to_string(),
			source,
		}
	})
}

fn create_directory(path: &Path) -> PkgInfoResult<()> {
	std::fs::create_dir_all(path).map_err(|source| {
		PkgInfoError::CreateDirectory {
			path: path.display().to_string(),
			source,
		}
	})
}

fn write_file(path: &Path, content: &str) -> PkgInfoResult<()> {
	std::fs::write(path, content).map_err(|source| {
		PkgInfoError::WriteFile {
			path: path.display().to_string(),
			source,
		}
	})
}
