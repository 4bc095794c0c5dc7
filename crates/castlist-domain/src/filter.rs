//! Query criteria and paginated results for actor listings

use crate::actor::{Actor, Gender};

/// Default page size when the caller does not specify one
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Optional filter criteria for listing actors
///
/// All fields are optional; present fields combine with logical AND.
/// String fields match as case-insensitive substrings, the rest match
/// exactly. Absent fields apply no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorFilter {
    /// Restrict to records owned by this user
    pub user_id: Option<i64>,

    /// Substring match on first name
    pub first_name: Option<String>,

    /// Substring match on last name
    pub last_name: Option<String>,

    /// Substring match on address
    pub address: Option<String>,

    /// Exact gender match
    pub gender: Option<Gender>,

    /// Substring match on the original description
    pub description: Option<String>,

    /// Exact height match
    pub height: Option<u32>,

    /// Exact weight match
    pub weight: Option<u32>,

    /// Exact age match
    pub age: Option<u32>,

    /// 1-based page number, defaults to 1
    pub page: Option<u32>,

    /// Page size, defaults to [`DEFAULT_PER_PAGE`]
    pub per_page: Option<u32>,
}

/// One page of a filtered actor listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorPage {
    /// Records on this page, newest first
    pub items: Vec<Actor>,

    /// Total records matching the filter across all pages
    pub total: u64,

    /// 1-based page number this result represents
    pub page: u32,

    /// Page size used for this query
    pub per_page: u32,
}

impl ActorPage {
    /// Number of pages needed to cover `total` at `per_page`
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_filter_has_no_constraints() {
        let filter = ActorFilter::default();
        assert_eq!(filter.user_id, None);
        assert_eq!(filter.gender, None);
        assert_eq!(filter.page, None);
        assert_eq!(filter.per_page, None);
    }

    #[test]
    fn test_total_pages_exact_and_partial() {
        let page = ActorPage {
            items: vec![],
            total: 25,
            page: 1,
            per_page: 10,
        };
        assert_eq!(page.total_pages(), 3);

        let page = ActorPage {
            items: vec![],
            total: 30,
            page: 1,
            per_page: 10,
        };
        assert_eq!(page.total_pages(), 3);

        let page = ActorPage {
            items: vec![],
            total: 0,
            page: 1,
            per_page: 10,
        };
        assert_eq!(page.total_pages(), 0);
    }

    proptest! {
        #[test]
        fn test_total_pages_covers_total(total in 0u64..100_000, per_page in 1u32..1_000) {
            let page = ActorPage { items: vec![], total, page: 1, per_page };
            let pages = page.total_pages();
            prop_assert!(pages * per_page as u64 >= total);
            prop_assert!(pages == 0 || (pages - 1) * (per_page as u64) < total);
        }
    }
}
