use std::fmt;

use regex::Regex;
use regex::RegexBuilder;

use crate::PkgInfoError;
use crate::PkgInfoResult;

/// Default inline replace pattern: a `// <replace>` line comment, the body,
/// and a `// </replace>` line comment. Dot-all so multi-line bodies written
/// by a previous run are matched again.
pub const DEFAULT_INLINE_REPLACE_PATTERN: &str =
	r"(?s)(\s*//\s*<replace>\s*)(.*?)(\s*//\s*</replace>\s*)";

const MARKER_GROUPS: usize = 3;

/// A compiled marker pattern with exactly three capture groups: the prefix
/// marker, the body and the suffix marker.
///
/// Patterns are compiled in multi-line mode, so `^` and `$` match at line
/// boundaries.
#[derive(Clone)]
pub struct MarkerPattern {
	regex: Regex,
}

impl MarkerPattern {
	pub fn new(pattern: &str) -> PkgInfoResult<Self> {
		let regex = compile(pattern).map_err(|e| {
			PkgInfoError::InvalidMarkerPattern {
				pattern: pattern.to_string(),
				reason: e.to_string(),
			}
		})?;

		// `captures_len` counts the implicit whole-match group.
		let groups = regex.captures_len() - 1;
		if groups != MARKER_GROUPS {
			return Err(PkgInfoError::InvalidMarkerPattern {
				pattern: pattern.to_string(),
				reason: format!("expected {MARKER_GROUPS} capture groups, found {groups}"),
			});
		}

		Ok(Self { regex })
	}

	pub fn as_str(&self) -> &str {
		self.regex.as_str()
	}
}

impl Default for MarkerPattern {
	fn default() -> Self {
		Self {
			regex: compile(DEFAULT_INLINE_REPLACE_PATTERN)
				.unwrap_or_else(|e| panic!("default inline replace pattern is invalid: {e}")),
		}
	}
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
	RegexBuilder::new(pattern).multi_line(true).build()
}

impl fmt::Debug for MarkerPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("MarkerPattern")
			.field(&self.regex.as_str())
			.finish()
	}
}

impl PartialEq for MarkerPattern {
	fn eq(&self, other: &Self) -> bool {
		self.as_str() == other.as_str()
	}
}

impl Eq for MarkerPattern {}

/// Result of attempting a marker-region replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerReplacement {
	/// The file content after replacement. Identical to the input when
	/// nothing changed.
	pub content: String,
	/// Whether the marker region was found.
	pub matched: bool,
	/// Whether `content` differs from the input.
	pub changed: bool,
}

/// Replace the body of the first marker region in `source` with `body`.
///
/// The prefix and suffix markers are kept byte-for-byte. When the pattern
/// does not match, the source is returned unchanged with `matched == false`.
pub fn replace_marker_region(
	source: &str,
	pattern: &MarkerPattern,
	body: &str,
) -> MarkerReplacement {
	let unchanged = |matched| {
		MarkerReplacement {
			content: source.to_string(),
			matched,
			changed: false,
		}
	};

	let Some(captures) = pattern.regex.captures(source) else {
		return unchanged(false);
	};

	let (Some(_prefix), Some(existing), Some(_suffix)) =
		(captures.get(1), captures.get(2), captures.get(3))
	else {
		return unchanged(false);
	};

	if existing.as_str() == body {
		return unchanged(true);
	}

	let mut content = String::with_capacity(source.len() - existing.len() + body.len());
	content.push_str(&source[..existing.start()]);
	content.push_str(body);
	content.push_str(&source[existing.end()..]);
	let changed = content != source;

	MarkerReplacement {
		content,
		matched: true,
		changed,
	}
}
