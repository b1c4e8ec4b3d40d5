use std::path::PathBuf;

use serde::Serialize;

/// Segment delimiter for package names.
pub const SEGMENT_SEPARATOR: char = '.';

const ANY_SEGMENTS: &str = "**";

/// A validated package rule: a dotted glob pattern bound to a template file.
///
/// Rules are produced by [`GenerateOptions`](crate::GenerateOptions) and are
/// read-only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
	/// Position of the rule in the configured `[[packages]]` list.
	pub index: usize,
	/// Dotted glob pattern, e.g. `com.example.**`.
	pub pattern: String,
	/// Whether the pattern is compared case-sensitively.
	pub case_sensitive: bool,
	/// Path to the template file used for matching packages.
	pub template: PathBuf,
}

impl Rule {
	pub fn new(
		index: usize,
		pattern: impl Into<String>,
		case_sensitive: bool,
		template: impl Into<PathBuf>,
	) -> Self {
		Self {
			index,
			pattern: pattern.into(),
			case_sensitive,
			template: template.into(),
		}
	}

	/// Returns true when this rule claims the given package name.
	pub fn matches(&self, package_name: &str) -> bool {
		matches_package(&self.pattern, package_name, self.case_sensitive)
	}
}

/// Find the first rule, in declared order, whose pattern matches
/// `package_name`.
pub fn find_match<'a>(package_name: &str, rules: &'a [Rule]) -> Option<&'a Rule> {
	rules.iter().find(|rule| rule.matches(package_name))
}

/// Match a dotted glob pattern against a package name.
///
/// - `*` matches any run of characters inside one segment.
/// - `?` matches exactly one character inside one segment.
/// - `**` matches zero or more whole segments.
/// - A pattern ending in `.` behaves as if it ended in `.**`.
///
/// The root package is the empty string. It is matched by `""` and by `**`.
pub fn matches_package(pattern: &str, package_name: &str, case_sensitive: bool) -> bool {
	let mut pattern_segments = split_segments(pattern);
	if pattern.ends_with(SEGMENT_SEPARATOR) && pattern_segments.last() != Some(&ANY_SEGMENTS) {
		pattern_segments.push(ANY_SEGMENTS);
	}
	let name_segments = split_segments(package_name);

	match_segments(&pattern_segments, &name_segments, case_sensitive)
}

fn split_segments(value: &str) -> Vec<&str> {
	let mut segments: Vec<&str> = Vec::new();
	for segment in value.split(SEGMENT_SEPARATOR).filter(|s| !s.is_empty()) {
		// Runs of `**` are equivalent to a single one.
		if segment == ANY_SEGMENTS && segments.last() == Some(&ANY_SEGMENTS) {
			continue;
		}
		segments.push(segment);
	}
	segments
}

fn match_segments(pattern: &[&str], name: &[&str], case_sensitive: bool) -> bool {
	match pattern.split_first() {
		None => name.is_empty(),
		Some((&ANY_SEGMENTS, rest)) => {
			(0..=name.len()).any(|skip| match_segments(rest, &name[skip..], case_sensitive))
		}
		Some((segment, rest)) => {
			match name.split_first() {
				Some((head, tail)) => {
					match_segment(segment, head, case_sensitive)
						&& match_segments(rest, tail, case_sensitive)
				}
				None => false,
			}
		}
	}
}

fn segment_chars(value: &str, case_sensitive: bool) -> Vec<char> {
	if case_sensitive {
		value.chars().collect()
	} else {
		value.chars().flat_map(char::to_lowercase).collect()
	}
}

/// Wildcard match of a single segment with `*` and `?`.
fn match_segment(pattern: &str, text: &str, case_sensitive: bool) -> bool {
	let pattern = segment_chars(pattern, case_sensitive);
	let text = segment_chars(text, case_sensitive);

	let mut p = 0;
	let mut t = 0;
	// Position of the last `*` seen and the text index it is currently
	// absorbing up to.
	let mut backtrack: Option<(usize, usize)> = None;

	while t < text.len() {
		if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
			p += 1;
			t += 1;
		} else if p < pattern.len() && pattern[p] == '*' {
			backtrack = Some((p, t));
			p += 1;
		} else if let Some((star, absorbed)) = backtrack {
			p = star + 1;
			t = absorbed + 1;
			backtrack = Some((star, t));
		} else {
			return false;
		}
	}

	pattern[p..].iter().all(|c| *c == '*')
}
