use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum PkgInfoError {
	#[error(transparent)]
	#[diagnostic(code(pkginfo::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(pkginfo::config_parse),
		help("check that pkginfo.toml is valid TOML with one or more [[packages]] entries")
	)]
	ConfigParse(String),

	#[error("packages[{index}]: `pattern` is required")]
	#[diagnostic(
		code(pkginfo::missing_pattern),
		help("set `pattern` to a dotted glob such as `com.example.**`")
	)]
	MissingPattern { index: usize },

	#[error("packages[{index}]: `template` is required")]
	#[diagnostic(
		code(pkginfo::missing_template),
		help("set `template` to the path of a package-info template file")
	)]
	MissingTemplate { index: usize },

	#[error("packages[{index}]: template `{path}` does not exist")]
	#[diagnostic(code(pkginfo::template_not_found))]
	TemplateNotFound { index: usize, path: String },

	#[error("packages[{index}]: template `{path}` is not a file")]
	#[diagnostic(code(pkginfo::template_not_file))]
	TemplateNotFile { index: usize, path: String },

	#[error("source directory `{path}` is not a directory")]
	#[diagnostic(code(pkginfo::source_not_directory))]
	SourceNotDirectory { path: String },

	#[error("output directory `{path}` is not a directory")]
	#[diagnostic(
		code(pkginfo::output_not_directory),
		help("remove the file or point `output_directory` somewhere else")
	)]
	OutputNotDirectory { path: String },

	#[error("invalid inline replace pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(pkginfo::invalid_marker_pattern),
		help("the pattern needs exactly three capture groups: prefix marker, body, suffix marker")
	)]
	InvalidMarkerPattern { pattern: String, reason: String },

	#[error("failed to load template `{path}`")]
	#[diagnostic(code(pkginfo::template_load))]
	TemplateLoad {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("template `{path}` was matched but never loaded")]
	#[diagnostic(
		code(pkginfo::template_not_loaded),
		help("this is a bug in pkginfo, please report it")
	)]
	TemplateNotLoaded { path: String },

	#[error("unable to list directory `{path}`")]
	#[diagnostic(code(pkginfo::read_directory))]
	ReadDirectory {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("unable to read `{path}`")]
	#[diagnostic(code(pkginfo::read_file))]
	ReadFile {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("unable to write to `{path}`")]
	#[diagnostic(code(pkginfo::write_file))]
	WriteFile {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("unable to create directory `{path}`")]
	#[diagnostic(code(pkginfo::create_directory))]
	CreateDirectory {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(pkginfo::symlink_cycle),
		help("remove the circular symlink from the source tree")
	)]
	SymlinkCycle { path: String },
}

impl PkgInfoError {
	/// Whether this error was raised before any file was touched.
	pub fn is_configuration_error(&self) -> bool {
		matches!(
			self,
			Self::ConfigParse(_)
				| Self::MissingPattern { .. }
				| Self::MissingTemplate { .. }
				| Self::TemplateNotFound { .. }
				| Self::TemplateNotFile { .. }
				| Self::SourceNotDirectory { .. }
				| Self::OutputNotDirectory { .. }
				| Self::InvalidMarkerPattern { .. }
				| Self::TemplateLoad { .. }
		)
	}
}

pub type PkgInfoResult<T> = Result<T, PkgInfoError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
