use super::domain::{JobPosting, PostingId};

/// Select the first posting when nothing is selected yet. An existing selection is kept as is.
pub fn default_selection(postings: &[JobPosting], current: Option<PostingId>) -> Option<PostingId> {
    current.or_else(|| postings.first().map(|posting| posting.id))
}

/// Selection after `removed` leaves `postings` (the ordering before removal).
///
/// Removing the selected posting moves to the next one, else the previous one, else clears.
/// Removing any other posting keeps the selection.
pub fn repair_after_removal(
    postings: &[JobPosting],
    current: Option<PostingId>,
    removed: PostingId,
) -> Option<PostingId> {
    if current != Some(removed) {
        return current;
    }

    let index = postings.iter().position(|posting| posting.id == removed)?;
    postings
        .get(index + 1)
        .or_else(|| index.checked_sub(1).and_then(|prev| postings.get(prev)))
        .map(|posting| posting.id)
}
