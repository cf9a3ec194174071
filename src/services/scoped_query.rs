// ==================== OWNERSHIP-SCOPED QUERIES ====================
// Every collection read starts from the owner restriction; search and
// pagination are layered on top of it, never instead of it.

use crate::utils::{error::AppError, pagination::PageWindow};
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    Collection,
};
use serde::de::DeserializeOwned;

/// Escapes regex metacharacters so a search term always matches literally.
pub fn regex_escape(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if ".^$*+?()[]{}|\\".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds the filter every scoped query starts from: the structural owner
/// restriction, plus an optional case-insensitive substring match on `name`
/// ANDed onto it. Caller-supplied input can narrow the view, never widen it.
pub fn scoped_filter(owner_key: &str, owner_id: &str, q: Option<&str>) -> Document {
    let mut filter = Document::new();
    filter.insert(owner_key, owner_id);

    if let Some(q) = q {
        filter.insert(
            "name",
            doc! { "$regex": regex_escape(q), "$options": "i" },
        );
    }

    filter
}

/// Runs a scoped, paginated query: the total is counted before the page
/// window is applied, so it always reflects the full matching set. A window
/// past the end yields an empty page and the true total.
pub async fn paged_find<T>(
    collection: &Collection<T>,
    filter: Document,
    window: &PageWindow,
) -> Result<(Vec<T>, u64), AppError>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    let total = collection.count_documents(filter.clone()).await?;

    // date_created keeps page windows stable under concurrent inserts
    let mut cursor = collection
        .find(filter)
        .sort(doc! { "date_created": 1, "_id": 1 })
        .skip(window.offset())
        .limit(window.per_page)
        .await?;

    let mut rows = Vec::new();
    while let Some(row) = cursor.try_next().await? {
        rows.push(row);
    }

    Ok((rows, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_escape_leaves_plain_terms_alone() {
        assert_eq!(regex_escape("choleric"), "choleric");
    }

    #[test]
    fn test_regex_escape_neutralizes_metacharacters() {
        assert_eq!(regex_escape(".*"), "\\.\\*");
        assert_eq!(regex_escape("a+b(c)"), "a\\+b\\(c\\)");
        assert_eq!(regex_escape("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_filter_always_carries_the_owner_restriction() {
        let filter = scoped_filter("user_id", "u-1", None);
        assert_eq!(filter.get_str("user_id").unwrap(), "u-1");
        assert!(filter.get("name").is_none());
    }

    #[test]
    fn test_search_is_anded_onto_the_owner_restriction() {
        let filter = scoped_filter("user_id", "u-1", Some("Choleric"));
        assert_eq!(filter.get_str("user_id").unwrap(), "u-1");

        let name = filter.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), "Choleric");
        assert_eq!(name.get_str("$options").unwrap(), "i");
    }
}
