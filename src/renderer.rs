use std::path::Path;

use chrono::Datelike;

use crate::{
    generator::{
        data::IndexGroup,
        utils::{relative_link, sort_post},
    },
    metadata::Post,
};

pub(crate) const SECTION_HEADING: &str = "## Articles";

pub(crate) const MONTHS: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

fn month_label(post: &Post) -> String {
    format!(
        "{} {}",
        MONTHS[post.created_at.month0() as usize],
        post.created_at.year()
    )
}

pub(crate) fn group_posts(posts: &[Post]) -> Vec<IndexGroup<'_>> {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by(sort_post);

    let mut groups: Vec<IndexGroup> = vec![];
    for post in sorted {
        let label = month_label(post);
        // sorted posts keep each month contiguous
        if let Some(group) = groups.last_mut().filter(|g| g.label == label) {
            group.posts.push(post);
            continue;
        }
        groups.push(IndexGroup {
            label,
            posts: vec![post],
        });
    }
    groups
}

fn render_post(base_dir: &Path, post: &Post) -> String {
    let tags: Vec<String> = post
        .tags
        .iter()
        .map(|tag| format!("<kbd>{tag}</kbd>"))
        .collect();
    let line = format!(
        "* [{} {}]({})",
        post.title,
        tags.join(" "),
        relative_link(base_dir, &post.path)
    );
    line.trim_end().to_string()
}

/// ```md
/// ### Juillet 2021
/// * [Ceci est un post <kbd>langages</kbd> <kbd>python</kbd>](./langages/python/ceci-est-un-post)
///
/// ### Juin 2021
/// * [Un autre post <kbd>langages</kbd>](./langages/un-autre-post)
/// ```
pub(crate) fn render_index(base_dir: &Path, posts: &[Post]) -> String {
    group_posts(posts)
        .iter()
        .map(|group| {
            let lines: Vec<String> = group
                .posts
                .iter()
                .map(|post| render_post(base_dir, post))
                .collect();
            format!("### {}\n{}", group.label, lines.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub(crate) fn render_section(base_dir: &Path, posts: &[Post]) -> String {
    format!("{SECTION_HEADING}\n{}", render_index(base_dir, posts))
}
