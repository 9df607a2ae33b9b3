//! Locating and replacing the generated `## Articles` section of a README.
//!
//! A section is the heading line followed by month groups:
//!
//! ```md
//! ## Articles
//! ### Juillet 2021
//! * [Post <kbd>tag</kbd>](./tag/post)
//!
//! ### Juin 2021
//! * [Older post](./older-post)
//! ```
//!
//! The located range stops right after the last bullet, so the line breaks
//! and blank lines following the section belong to the surrounding text.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::renderer::SECTION_HEADING;

static BULLET_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\* \[[^\r\n]+\]\([^\r\n]+\)$").unwrap());
static BULLET_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\* \[[^\r\n]+\]\([^\r\n]+\)").unwrap());

/// Splices `section` into `existing`: replaces the current generated section,
/// or appends it as a new paragraph, or makes it the whole file.
pub(crate) fn merge(existing: &str, section: &str) -> String {
    if existing.is_empty() {
        return format!("{section}\n");
    }

    match find_section(existing) {
        Some(range) => {
            let mut content = String::with_capacity(existing.len() + section.len());
            content.push_str(&existing[..range.start]);
            content.push_str(section);
            content.push_str(&existing[range.end..]);
            content
        }
        None => {
            let prefix = if existing.ends_with('\n') { "" } else { "\n" };
            format!("{existing}{prefix}\n{section}\n")
        }
    }
}

/// Byte range of the first generated section in `content`.
pub(crate) fn find_section(content: &str) -> Option<Range<usize>> {
    let start = find_heading(content)?;
    let heading_end = start + SECTION_HEADING.len();

    let rest = &content[heading_end..];
    let end = line_break_len(rest)
        .and_then(|len| match_groups(content, heading_end + len))
        .unwrap_or(heading_end);
    Some(start..end)
}

fn find_heading(content: &str) -> Option<usize> {
    let mut offset = 0;
    for line in content.split('\n') {
        if trim_cr(line).eq_ignore_ascii_case(SECTION_HEADING) {
            return Some(offset);
        }
        offset += line.len() + 1;
    }
    None
}

fn trim_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// Length of the `\n` or `\r\n` at the start of `s`.
fn line_break_len(s: &str) -> Option<usize> {
    if s.starts_with('\n') {
        Some(1)
    } else if s.starts_with("\r\n") {
        Some(2)
    } else {
        None
    }
}

/// Matches the month groups starting at `pos`, returning the end offset of
/// the last bullet. Groups are separated by exactly one blank line.
fn match_groups(content: &str, pos: usize) -> Option<usize> {
    let mut pos = pos;
    let mut end = None;
    loop {
        let Some(group) = match_group(content, pos) else {
            return end;
        };
        end = Some(group.end);
        match group.next {
            // a further group is only part of the section after exactly one blank line
            Some(next) => match line_break_len(&content[next..]) {
                Some(len) => pos = next + len,
                None => return end,
            },
            None => return end,
        }
    }
}

struct GroupMatch {
    /// Offset just after the last bullet's `)`.
    end: usize,
    /// Offset of the line after the last bullet, when it ends with a line break.
    next: Option<usize>,
}

fn match_group(content: &str, pos: usize) -> Option<GroupMatch> {
    let (heading, mut next) = line_at(content, pos);
    let title = trim_cr(heading).strip_prefix("### ")?;
    if title.is_empty() || title.contains('\r') {
        return None;
    }

    let mut last: Option<GroupMatch> = None;
    while let Some(line_start) = next {
        let (line, after) = line_at(content, line_start);
        let line = trim_cr(line);
        match after {
            Some(after) if BULLET_LINE.is_match(line) => {
                last = Some(GroupMatch {
                    end: line_start + line.len(),
                    next: Some(after),
                });
                next = Some(after);
            }
            _ => {
                // the final bullet may be followed by other text or end of content
                if let Some(m) = BULLET_PREFIX.find(line) {
                    return Some(GroupMatch {
                        end: line_start + m.end(),
                        next: None,
                    });
                }
                break;
            }
        }
    }
    last
}

/// The line starting at `pos` without its `\n`, and the offset of the next
/// line if there is a line break.
fn line_at(content: &str, pos: usize) -> (&str, Option<usize>) {
    let rest = &content[pos..];
    match rest.find('\n') {
        Some(i) => (&rest[..i], Some(pos + i + 1)),
        None => (rest, None),
    }
}
