use std::{borrow::Borrow, cmp::Ordering, path::Path};

use crate::metadata::Post;

/// Newest first. Callers rely on a stable sort to keep traversal order on ties.
pub(crate) fn sort_post<T: Borrow<Post>>(a: &T, b: &T) -> Ordering {
    b.borrow().created_at.cmp(&a.borrow().created_at)
}

/// Text after the first `# ` up to the end of that line. Empty when the
/// body has no heading marker.
pub(super) fn extract_title(body: &str) -> String {
    let Some(start) = body.find("# ") else {
        return String::new();
    };
    let rest = &body[start + 2..];
    let line = rest.split('\n').next().unwrap_or_default();
    line.strip_suffix('\r').unwrap_or(line).to_string()
}

/// `./`-prefixed link to `path` from `base`, without extension and with `/` separators.
pub(crate) fn relative_link(base: &Path, path: &Path) -> String {
    let path = path.with_extension("");
    let relative = path.strip_prefix(base).unwrap_or(&path);
    let segments: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    format!("./{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::path::PathBuf;

    #[test]
    fn title_is_first_heading_line() {
        assert_eq!(extract_title("# Ceci est un post\n\nbody"), "Ceci est un post");
        assert_eq!(extract_title("intro\n# Second\n# Third\n"), "Second");
        assert_eq!(extract_title("# Windows\r\nbody"), "Windows");
        assert_eq!(extract_title("# No newline"), "No newline");
    }

    #[test]
    fn title_without_heading_is_empty() {
        assert_eq!(extract_title("just some text\n"), "");
        assert_eq!(extract_title(""), "");
    }

    #[test]
    fn links_are_relative_without_extension() {
        let base = Path::new("docs");
        assert_eq!(
            relative_link(base, Path::new("docs/langages/python/ceci-est-un-post.md")),
            "./langages/python/ceci-est-un-post"
        );
        assert_eq!(
            relative_link(Path::new("docs/langages"), Path::new("docs/langages/intro.md")),
            "./intro"
        );
        assert_eq!(
            relative_link(base, Path::new("docs/v1.2-notes.md")),
            "./v1.2-notes"
        );
    }

    #[test]
    fn sort_is_newest_first() {
        let post = |day| Post {
            title: format!("{day}"),
            tags: vec![],
            path: PathBuf::from(format!("{day}.md")),
            created_at: Local.with_ymd_and_hms(2021, 7, day, 12, 0, 0).unwrap(),
        };
        let mut posts = vec![post(1), post(20), post(5)];
        posts.sort_by(sort_post);
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["20", "5", "1"]);
    }
}
