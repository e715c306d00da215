//! Merging of pull request references from the page sidebar and the search API.

use crate::facts::PullRequestRef;
use std::collections::HashSet;

/// Merge two provenance streams into one list, unique by pull request number.
///
/// Scraped references come first, since they carry richer page context; search results whose
/// number was not already seen follow in search order. The first occurrence of a number wins.
#[must_use]
pub fn dedupe_pull_requests(scraped: &[PullRequestRef], searched: &[PullRequestRef]) -> Vec<PullRequestRef> {
    let mut seen = HashSet::with_capacity(scraped.len() + searched.len());

    scraped
        .iter()
        .chain(searched)
        .filter(|pr| seen.insert(pr.number))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Provenance;

    fn pr(number: u64, provenance: Provenance) -> PullRequestRef {
        PullRequestRef {
            url: format!("https://github.com/a/b/pull/{number}"),
            number,
            title: format!("PR {number} from {provenance}"),
            draft: false,
            author: None,
            created_at: None,
            updated_at: None,
            provenance,
        }
    }

    fn numbers(prs: &[PullRequestRef]) -> Vec<u64> {
        prs.iter().map(|p| p.number).collect()
    }

    #[test]
    fn test_scrape_first_then_unseen_search() {
        let scraped = [pr(3, Provenance::Sidebar), pr(7, Provenance::Sidebar)];
        let searched = [pr(7, Provenance::Search), pr(9, Provenance::Search)];

        let merged = dedupe_pull_requests(&scraped, &searched);
        assert_eq!(numbers(&merged), [3, 7, 9]);
    }

    #[test]
    fn test_scrape_provenance_wins_duplicates() {
        let scraped = [pr(7, Provenance::Sidebar)];
        let searched = [pr(7, Provenance::Search)];

        let merged = dedupe_pull_requests(&scraped, &searched);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].provenance, Provenance::Sidebar);
    }

    #[test]
    fn test_search_order_preserved_in_tail() {
        let searched = [pr(20, Provenance::Search), pr(4, Provenance::Search), pr(11, Provenance::Search)];
        assert_eq!(numbers(&dedupe_pull_requests(&[], &searched)), [20, 4, 11]);
    }

    #[test]
    fn test_duplicates_within_one_stream_collapse() {
        let scraped = [pr(5, Provenance::Sidebar), pr(5, Provenance::Sidebar)];
        assert_eq!(numbers(&dedupe_pull_requests(&scraped, &[])), [5]);
    }

    #[test]
    fn test_both_empty() {
        assert!(dedupe_pull_requests(&[], &[]).is_empty());
    }
}
