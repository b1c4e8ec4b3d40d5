//! Rewrites the `package` statement of a template for a target package.

/// Keyword that opens a package declaration.
pub const PACKAGE_KEYWORD: &str = "package";

/// Build the declaration statement for a package. The root package has no
/// declaration.
pub fn package_declaration(package_name: &str) -> String {
	if package_name.is_empty() {
		String::new()
	} else {
		format!("{PACKAGE_KEYWORD} {package_name};")
	}
}

/// Replace the first package declaration line in `template` with the
/// declaration for `package_name`.
///
/// Only the content of the line is replaced, its line terminator is kept.
/// For the root package the line content is removed. Templates without a
/// declaration are returned unchanged.
pub fn rewrite_declaration(template: &str, package_name: &str) -> String {
	let Some(range) = find_declaration(template) else {
		return template.to_string();
	};

	let replacement = package_declaration(package_name);
	let mut result = String::with_capacity(template.len() - range.len() + replacement.len());
	result.push_str(&template[..range.start]);
	result.push_str(&replacement);
	result.push_str(&template[range.end..]);
	result
}

/// Byte range of the first declaration line, excluding its terminator.
pub fn find_declaration(source: &str) -> Option<std::ops::Range<usize>> {
	let mut offset = 0;

	for raw_line in source.split_inclusive('\n') {
		let line = raw_line.strip_suffix('\n').unwrap_or(raw_line);
		let line = line.strip_suffix('\r').unwrap_or(line);

		if is_declaration_line(line) {
			return Some(offset..offset + line.len());
		}

		offset += raw_line.len();
	}

	None
}

/// Returns the declared package name when `line` is exactly a package
/// statement: optional indentation, the keyword, a name and `;`.
pub fn parse_declaration_line(line: &str) -> Option<&str> {
	let rest = line.trim_start_matches(is_blank);
	let rest = rest.strip_prefix(PACKAGE_KEYWORD)?;
	if !rest.starts_with(is_blank) {
		return None;
	}

	let rest = rest.trim_start_matches(is_blank);
	let (name, tail) = rest.split_once(';')?;
	let name = name.trim_end_matches(is_blank);

	if name.is_empty() || name.contains(char::is_whitespace) {
		return None;
	}

	if !tail.trim_end_matches(is_blank).is_empty() {
		return None;
	}

	Some(name)
}

fn is_declaration_line(line: &str) -> bool {
	parse_declaration_line(line).is_some()
}

fn is_blank(c: char) -> bool {
	c == ' ' || c == '\t'
}
