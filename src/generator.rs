use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use log::{debug, info};

use crate::{
    context::Context, date::DateResolver, metadata::Post, renderer::render_section, section::merge,
};

pub(crate) mod data;
pub(crate) mod utils;

pub(crate) struct Generator<'a, R: DateResolver> {
    context: &'a Context,
    dates: R,
}

impl<'a, R: DateResolver> Generator<'a, R> {
    pub fn new(context: &'a Context, dates: R) -> Self {
        Self { context, dates }
    }

    /// Indexes every directory of the article tree, the root last, and
    /// returns all the posts found.
    pub fn generate(&self) -> anyhow::Result<Vec<Post>> {
        let root = &self.context.article_dir;
        let posts = self.collect(root, &[])?;
        if !posts.is_empty() {
            self.write_index(root, &posts)?;
        }
        info!("{} posts indexed", posts.len());
        Ok(posts)
    }

    /// Posts found under `dir`. Each subdirectory holding posts gets its index
    /// written once all of its own subdirectories are done.
    pub fn collect(&self, dir: &Path, tags: &[String]) -> anyhow::Result<Vec<Post>> {
        let mut entries = std::fs::read_dir(dir)
            .with_context(|| format!("while reading directory {dir:?}"))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("while reading directory {dir:?}"))?;
        entries.sort_by_key(|e| e.file_name());

        let mut posts = vec![];
        for entry in entries {
            // lossy name for tags and name rules only, the path must stay exact
            let name = entry.file_name().to_string_lossy().to_string();
            let path = entry.path();
            if self.context.is_ignored(&name, &path) {
                debug!("skipping {path:?}");
                continue;
            }

            let file_type = entry
                .file_type()
                .with_context(|| format!("while inspecting {path:?}"))?;
            if file_type.is_dir() {
                let mut sub_tags = tags.to_vec();
                sub_tags.push(name);
                let sub_posts = self.collect(&path, &sub_tags)?;
                if !sub_posts.is_empty() {
                    self.write_index(&path, &sub_posts)?;
                }
                posts.extend(sub_posts);
            } else if name.ends_with(".md") {
                posts.push(self.read_post(path, tags)?);
            }
        }
        Ok(posts)
    }

    fn read_post(&self, path: PathBuf, tags: &[String]) -> anyhow::Result<Post> {
        let body =
            std::fs::read_to_string(&path).with_context(|| format!("while reading {path:?}"))?;
        let created_at = self
            .dates
            .resolve(&path)
            .with_context(|| format!("while dating {path:?}"))?;
        Ok(Post {
            title: utils::extract_title(&body),
            tags: tags.to_vec(),
            path,
            created_at,
        })
    }

    fn write_index(&self, dir: &Path, posts: &[Post]) -> anyhow::Result<()> {
        let path = dir.join(&self.context.index_file_name);
        let existing = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e).with_context(|| format!("while reading {path:?}")),
        };

        let content = merge(&existing, &render_section(dir, posts));
        if content == existing {
            debug!("{path:?} is up to date");
            return Ok(());
        }
        if self.context.dry_run {
            info!("would update {path:?} ({} posts)", posts.len());
            return Ok(());
        }

        std::fs::write(&path, content).with_context(|| format!("while writing {path:?}"))?;
        info!("updated {path:?} ({} posts)", posts.len());
        Ok(())
    }
}
