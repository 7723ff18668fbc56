//! Follower cohorts: paging cached follower IDs into membership sets.

use std::collections::HashSet;

use crate::cache::FollowerPageSource;
use crate::constants::END_OF_PAGES_CURSOR;
use crate::error::{Result, TweepError};

/// Follow `next_cursor` from `start_cursor` until the end-of-pages cursor,
/// concatenating every page's IDs in page order.
///
/// A page missing from the cache ends the walk. A cursor that comes round a
/// second time is an error.
pub fn read_follower_ids<S>(source: &S, screen_name: &str, start_cursor: i64) -> Result<Vec<i64>>
where
    S: FollowerPageSource + ?Sized,
{
    let mut ids = Vec::new();
    let mut visited = HashSet::new();
    let mut cursor = start_cursor;
    let mut pages = 0u64;

    while cursor != END_OF_PAGES_CURSOR {
        if !visited.insert(cursor) {
            return Err(TweepError::CursorCycle {
                screen_name: screen_name.to_string(),
                cursor,
            });
        }
        let Some(page) = source.follower_page(screen_name, cursor)? else {
            tracing::warn!(
                screen_name,
                cursor,
                pages,
                "follower page not cached; treating it as the last page"
            );
            break;
        };
        pages += 1;
        ids.extend_from_slice(&page.ids);
        cursor = page.next_cursor;
    }

    tracing::debug!(screen_name, pages, ids = ids.len(), "read follower ids");
    Ok(ids)
}

/// The followers of one account.
#[derive(Debug, Clone, Default)]
pub struct Cohort {
    screen_name: String,
    ids: HashSet<i64>,
}

impl Cohort {
    pub fn load<S>(source: &S, screen_name: &str, start_cursor: i64) -> Result<Self>
    where
        S: FollowerPageSource + ?Sized,
    {
        let ids = read_follower_ids(source, screen_name, start_cursor)?;
        let cohort = Self::from_ids(screen_name, ids);
        tracing::info!(
            screen_name,
            followers = cohort.len(),
            "loaded follower ids"
        );
        Ok(cohort)
    }

    pub fn from_ids(screen_name: impl Into<String>, ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            screen_name: screen_name.into(),
            ids: ids.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn screen_name(&self) -> &str {
        &self.screen_name
    }

    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub first: bool,
    pub second: bool,
}

/// The two reference cohorts a profile is checked against.
#[derive(Debug, Clone)]
pub struct CohortPair {
    pub first: Cohort,
    pub second: Cohort,
}

impl CohortPair {
    #[must_use]
    pub fn new(first: Cohort, second: Cohort) -> Self {
        Self { first, second }
    }

    /// `None` when `id` follows neither account.
    #[must_use]
    pub fn membership(&self, id: i64) -> Option<Membership> {
        let membership = Membership {
            first: self.first.contains(id),
            second: self.second.contains(id),
        };
        (membership.first || membership.second).then_some(membership)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FollowerPage;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Pages(HashMap<(String, i64), FollowerPage>);

    impl Pages {
        fn with(mut self, name: &str, cursor: i64, ids: &[i64], next_cursor: i64) -> Self {
            self.0.insert(
                (name.to_string(), cursor),
                FollowerPage {
                    ids: ids.to_vec(),
                    next_cursor,
                },
            );
            self
        }
    }

    impl FollowerPageSource for Pages {
        fn follower_page(&self, screen_name: &str, cursor: i64) -> Result<Option<FollowerPage>> {
            Ok(self.0.get(&(screen_name.to_string(), cursor)).cloned())
        }
    }

    #[test]
    fn follows_cursors_until_zero() {
        let pages = Pages::default()
            .with("a", -1, &[1, 2], 100)
            .with("a", 100, &[3], 200)
            .with("a", 200, &[4, 5], 0);
        assert_eq!(read_follower_ids(&pages, "a", -1).unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn zero_start_cursor_reads_nothing() {
        let pages = Pages::default().with("a", 0, &[1], 0);
        assert!(read_follower_ids(&pages, "a", 0).unwrap().is_empty());
    }

    #[test]
    fn missing_page_ends_the_walk() {
        let pages = Pages::default().with("a", -1, &[1, 2], 100);
        assert_eq!(read_follower_ids(&pages, "a", -1).unwrap(), vec![1, 2]);
        assert!(read_follower_ids(&pages, "nobody", -1).unwrap().is_empty());
    }

    #[test]
    fn cursor_cycle_is_an_error() {
        let pages = Pages::default()
            .with("a", -1, &[1], 100)
            .with("a", 100, &[2], -1);
        assert!(matches!(
            read_follower_ids(&pages, "a", -1),
            Err(TweepError::CursorCycle { cursor: -1, .. })
        ));
    }

    #[test]
    fn membership_flags() {
        let pair = CohortPair::new(
            Cohort::from_ids("first", [5, 9]),
            Cohort::from_ids("second", [9, 7]),
        );
        assert_eq!(
            pair.membership(9),
            Some(Membership {
                first: true,
                second: true
            })
        );
        assert_eq!(
            pair.membership(5),
            Some(Membership {
                first: true,
                second: false
            })
        );
        assert_eq!(
            pair.membership(7),
            Some(Membership {
                first: false,
                second: true
            })
        );
        assert_eq!(pair.membership(3), None);
    }
}
