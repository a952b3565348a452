use anyhow::Result;
use serde::Serialize;

use crate::client::WikiReadApi;

/// Aggregate edit activity for one server's category within the cutoff
/// window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryEditStats {
    pub recent_edits: u64,
    pub total_pages: u64,
}

/// Revision count for a single page since the cutoff. A page that does not
/// exist contributes 0 edits.
pub fn page_recent_edits<A: WikiReadApi + ?Sized>(
    api: &mut A,
    cutoff: &str,
    title: &str,
) -> Result<u64> {
    api.count_revisions_since(title, cutoff)
}

/// Summed recent edits and page count over a category's members. A category
/// that does not exist counts as zero data.
pub fn category_recent_edits<A: WikiReadApi + ?Sized>(
    api: &mut A,
    cutoff: &str,
    category: &str,
) -> Result<CategoryEditStats> {
    if !api.category_exists(category)? {
        return Ok(CategoryEditStats::default());
    }
    let mut stats = CategoryEditStats::default();
    for member in api.get_category_members(category)? {
        stats.recent_edits += page_recent_edits(&mut *api, cutoff, &member)?;
        stats.total_pages += 1;
    }
    Ok(stats)
}
