use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use crate::PkgInfoError;
use crate::PkgInfoResult;
use crate::Rule;

/// In-memory cache of template sources keyed by canonical template path.
///
/// Populated once before the tree walk and read-only afterwards.
#[derive(Debug, Default)]
pub struct TemplateStore {
	templates: HashMap<PathBuf, String>,
}

impl TemplateStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Load the template of every rule. Aborts on the first unreadable
	/// template.
	pub fn load_all(rules: &[Rule]) -> PkgInfoResult<Self> {
		let mut store = Self::new();
		for rule in rules {
			let source = store.load(&rule.template)?;
			tracing::debug!(
				template = %rule.template.display(),
				bytes = source.len(),
				"loaded template for packages[{}]",
				rule.index
			);
		}
		Ok(store)
	}

	/// Read a template from disk into the store. Loading the same file twice
	/// reuses the cached text.
	pub fn load(&mut self, template: &Path) -> PkgInfoResult<&str> {
		let key = template_key(template);
		if !self.templates.contains_key(&key) {
			let source =
				std::fs::read_to_string(template).map_err(|source| PkgInfoError::TemplateLoad {
					path: template.display().to_string(),
					source,
				})?;
			self.templates.insert(key.clone(), source);
		}

		Ok(self.templates[&key].as_str())
	}

	/// Fetch a previously loaded template.
	pub fn get(&self, template: &Path) -> PkgInfoResult<&str> {
		self.templates
			.get(&template_key(template))
			.map(String::as_str)
			.ok_or_else(|| {
				PkgInfoError::TemplateNotLoaded {
					path: template.display().to_string(),
				}
			})
	}

	/// Whether `path` refers to one of the loaded template files.
	pub fn contains(&self, path: &Path) -> bool {
		self.templates.contains_key(&template_key(path))
	}

	pub fn len(&self) -> usize {
		self.templates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.templates.is_empty()
	}
}

fn template_key(path: &Path) -> PathBuf {
	path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
