use std::{
    cell::RefCell,
    collections::HashMap,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{anyhow, Context};
use chrono::{DateTime, Local};
use log::debug;

pub(crate) trait DateResolver {
    fn resolve(&self, path: &Path) -> anyhow::Result<DateTime<Local>>;
}

/// Creation date from the oldest commit touching the file, or from the
/// filesystem when the file is not committed yet.
#[derive(Debug, Default)]
pub(crate) struct GitDateResolver {
    resolved: RefCell<HashMap<PathBuf, DateTime<Local>>>,
}

impl GitDateResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DateResolver for GitDateResolver {
    fn resolve(&self, path: &Path) -> anyhow::Result<DateTime<Local>> {
        if let Some(date) = self.resolved.borrow().get(path) {
            return Ok(*date);
        }

        let date = match first_commit_date(path) {
            Ok(date) => date,
            Err(e) => {
                debug!("no git history for {path:?} ({e}), using filesystem date");
                filesystem_date(path)?
            }
        };
        self.resolved.borrow_mut().insert(path.to_owned(), date);
        Ok(date)
    }
}

fn first_commit_date(path: &Path) -> anyhow::Result<DateTime<Local>> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("path has no file name"))?;
    let mut command = Command::new("git");
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        command.arg("-C").arg(parent);
    }
    let output = command
        .args(["log", "--format=%aI", "--reverse", "--"])
        .arg(file_name)
        .output()
        .context("failed to run git")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("git log failed: {}", stderr.trim()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| anyhow!("file is not tracked"))?;
    parse_git_date(first)
}

fn parse_git_date(raw: &str) -> anyhow::Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Local))
        .with_context(|| format!("invalid git date: {raw}"))
}

fn filesystem_date(path: &Path) -> anyhow::Result<DateTime<Local>> {
    let meta = std::fs::metadata(path).with_context(|| format!("while reading {path:?}"))?;
    // birth time is not reported everywhere
    let time = meta
        .created()
        .or_else(|_| meta.modified())
        .with_context(|| format!("no timestamp available for {path:?}"))?;
    Ok(DateTime::from(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;

    #[test]
    fn parses_strict_iso_dates() {
        let date = parse_git_date("2021-07-03T14:22:01+02:00").unwrap();
        assert_eq!(
            date.timestamp(),
            DateTime::parse_from_rfc3339("2021-07-03T12:22:01Z")
                .unwrap()
                .timestamp()
        );
        assert!(parse_git_date("not a date").is_err());
    }

    #[test]
    fn untracked_file_falls_back_to_filesystem() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("post.md");
        std::fs::write(&path, "# Post\n").unwrap();

        let resolver = GitDateResolver::new();
        let date = resolver.resolve(&path).unwrap();

        let age = Local::now() - date;
        assert!(age < Duration::days(1), "unexpected date {date}");
        assert!(age > Duration::minutes(-1), "unexpected date {date}");
    }

    #[test]
    fn repeated_lookups_are_memoized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("post.md");
        std::fs::write(&path, "# Post\n").unwrap();

        let resolver = GitDateResolver::new();
        let first = resolver.resolve(&path).unwrap();
        let second = resolver.resolve(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(resolver.resolved.borrow().len(), 1);
    }

    fn git(repo: &Path, args: &[&str], date: &str) {
        let status = Command::new("git")
            .arg("-C")
            .arg(repo)
            .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_DATE", date)
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    #[test]
    fn date_comes_from_oldest_commit() {
        let git_available = Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        if !git_available {
            return;
        }

        let dir = tempdir().unwrap();
        let repo = dir.path();
        let path = repo.join("sub/p.md");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        git(repo, &["init", "-q"], "2020-03-05T10:00:00+00:00");
        std::fs::write(&path, "# First\n").unwrap();
        git(repo, &["add", "."], "2020-03-05T10:00:00+00:00");
        git(repo, &["commit", "-q", "-m", "first"], "2020-03-05T10:00:00+00:00");
        std::fs::write(&path, "# Second\n").unwrap();
        git(repo, &["commit", "-q", "-a", "-m", "second"], "2021-07-09T10:00:00+00:00");

        let date = GitDateResolver::new().resolve(&path).unwrap();
        assert_eq!(
            date,
            DateTime::parse_from_rfc3339("2020-03-05T10:00:00+00:00").unwrap()
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let resolver = GitDateResolver::new();
        assert!(resolver.resolve(&dir.path().join("missing.md")).is_err());
    }
}
