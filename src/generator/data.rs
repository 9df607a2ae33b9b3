use crate::metadata::Post;

/// One month of an index: `### <label>` followed by its posts, newest first.
#[derive(Debug)]
pub(crate) struct IndexGroup<'a> {
    pub label: String,
    pub posts: Vec<&'a Post>,
}
