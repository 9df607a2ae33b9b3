use std::path::{Path, PathBuf};

pub(crate) const INDEX_FILE_NAME: &str = "README.md";

#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub article_dir: PathBuf,
    /// Skipped with their whole subtree. Compared against `article_dir`-joined entry paths.
    pub ignored_paths: Vec<PathBuf>,
    pub ignored_names: Vec<String>,
    pub index_file_name: String,

    pub dry_run: bool,
}

impl Context {
    pub fn new(article_dir: PathBuf) -> Self {
        let ignored_paths = vec![article_dir.join("assets")];
        Self {
            article_dir,
            ignored_paths,
            ignored_names: vec![INDEX_FILE_NAME.to_string(), "index.md".to_string()],
            index_file_name: INDEX_FILE_NAME.to_string(),
            dry_run: false,
        }
    }

    /// Adds ignored paths, resolving each one against `article_dir`. `assets` stays ignored.
    pub fn with_ignored_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = self.article_dir.join(path);
            if !self.ignored_paths.contains(&path) {
                self.ignored_paths.push(path);
            }
        }
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_ignored(&self, name: &str, path: &Path) -> bool {
        name.starts_with('.')
            || name == self.index_file_name
            || self.ignored_names.iter().any(|n| n == name)
            || self.ignored_paths.iter().any(|p| p == path)
    }
}
