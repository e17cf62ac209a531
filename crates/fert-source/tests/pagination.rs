use std::cell::{Cell, RefCell};

use fert_core::errors::{ErrorInfo, FertError};
use fert_core::TokenRecord;
use fert_source::{
    fetch_all_tokens, PageCursor, PaginationOpts, Snapshot, SnapshotSource, TokenPages,
};
use proptest::prelude::*;

fn token(id: u64, season: u32) -> TokenRecord {
    TokenRecord {
        id,
        supply: 1,
        humidity: 2.5,
        start_progress: 0,
        end_progress: id,
        season,
    }
}

/// One token per season, ids increasing with season.
fn distinct_seasons(count: usize) -> Vec<TokenRecord> {
    (0..count)
        .map(|idx| token(1_000 + idx as u64, 6_000 + idx as u32))
        .collect()
}

struct Recording<P> {
    inner: P,
    cursors: RefCell<Vec<PageCursor>>,
}

impl<P> Recording<P> {
    fn new(inner: P) -> Self {
        Self {
            inner,
            cursors: RefCell::new(Vec::new()),
        }
    }

    fn requests(&self) -> usize {
        self.cursors.borrow().len()
    }
}

impl<P: TokenPages> TokenPages for Recording<P> {
    fn fetch_page(&self, cursor: &PageCursor, first: usize) -> Result<Vec<TokenRecord>, FertError> {
        self.cursors.borrow_mut().push(*cursor);
        self.inner.fetch_page(cursor, first)
    }
}

fn source(tokens: Vec<TokenRecord>) -> Recording<SnapshotSource> {
    Recording::new(SnapshotSource::new(Snapshot {
        progress: 0,
        tokens,
    }))
}

fn opts(page_size: usize, max_requests: usize) -> PaginationOpts {
    PaginationOpts {
        page_size,
        max_requests,
    }
}

#[test]
fn empty_source_takes_one_request() {
    let pages = source(Vec::new());
    let outcome = fetch_all_tokens(&pages, &opts(1000, 100)).expect("fetch");
    assert!(outcome.tokens.is_empty());
    assert_eq!(outcome.requests, 1);
    assert_eq!(pages.requests(), 1);
    assert!(!outcome.exhausted);
    assert_eq!(pages.cursors.borrow()[0], PageCursor::start());
}

#[test]
fn partial_last_page_stops_pagination() {
    let pages = source(distinct_seasons(2_500));
    let outcome = fetch_all_tokens(&pages, &opts(1000, 100)).expect("fetch");
    assert_eq!(outcome.tokens.len(), 2_500);
    assert_eq!(outcome.requests, 3);
    let seasons: Vec<_> = outcome.tokens.iter().map(|t| t.season).collect();
    let mut sorted = seasons.clone();
    sorted.sort();
    assert_eq!(seasons, sorted);
}

#[test]
fn exact_multiple_needs_trailing_empty_page() {
    let pages = source(distinct_seasons(2_000));
    let outcome = fetch_all_tokens(&pages, &opts(1000, 100)).expect("fetch");
    assert_eq!(outcome.tokens.len(), 2_000);
    assert_eq!(outcome.requests, 3);
    let cursors = pages.cursors.borrow();
    assert_eq!(cursors[1].season, Some(6_999));
    assert_eq!(cursors[2].season, Some(7_999));
}

#[test]
fn season_ties_across_page_boundary_are_not_lost() {
    let tokens = vec![
        token(10, 6074),
        token(11, 6074),
        token(12, 6074),
        token(13, 6074),
        token(14, 6074),
        token(20, 6075),
    ];
    let pages = source(tokens.clone());
    let outcome = fetch_all_tokens(&pages, &opts(2, 100)).expect("fetch");
    assert_eq!(outcome.tokens, tokens);
    assert_eq!(outcome.duplicates, 0);
    assert_eq!(outcome.requests, 4);
    assert_eq!(
        pages.cursors.borrow()[1],
        PageCursor {
            season: Some(6074),
            last_id: Some(11)
        }
    );
}

/// Ignores the cursor and always answers with the same full page.
struct Stuck {
    page: Vec<TokenRecord>,
    calls: Cell<usize>,
}

impl TokenPages for Stuck {
    fn fetch_page(&self, _cursor: &PageCursor, first: usize) -> Result<Vec<TokenRecord>, FertError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.page.iter().take(first).cloned().collect())
    }
}

#[test]
fn failsafe_stops_a_source_that_never_advances() {
    let pages = Stuck {
        page: vec![token(1, 7), token(2, 7), token(3, 7)],
        calls: Cell::new(0),
    };
    let outcome = fetch_all_tokens(&pages, &opts(3, 5)).expect("degraded, not fatal");
    assert!(outcome.exhausted);
    assert_eq!(outcome.requests, 5);
    assert_eq!(pages.calls.get(), 5);
    assert_eq!(outcome.tokens.len(), 3);
    assert_eq!(outcome.duplicates, 12);
}

struct FailsOnSecond {
    inner: SnapshotSource,
    calls: Cell<usize>,
}

impl TokenPages for FailsOnSecond {
    fn fetch_page(&self, cursor: &PageCursor, first: usize) -> Result<Vec<TokenRecord>, FertError> {
        self.calls.set(self.calls.get() + 1);
        if self.calls.get() == 2 {
            return Err(FertError::Transport(ErrorInfo::new(
                "test.unreachable",
                "connection reset",
            )));
        }
        self.inner.fetch_page(cursor, first)
    }
}

#[test]
fn transport_failure_aborts_the_fetch() {
    let pages = FailsOnSecond {
        inner: SnapshotSource::new(Snapshot {
            progress: 0,
            tokens: distinct_seasons(10),
        }),
        calls: Cell::new(0),
    };
    let err = fetch_all_tokens(&pages, &opts(4, 100)).expect_err("fatal");
    assert!(matches!(err, FertError::Transport(_)));
    assert_eq!(pages.calls.get(), 2);
}

#[test]
fn zero_page_size_is_a_config_error() {
    let pages = source(distinct_seasons(3));
    let err = fetch_all_tokens(&pages, &opts(0, 10)).expect_err("bounds");
    assert!(matches!(err, FertError::Config(_)));
    assert_eq!(pages.requests(), 0);
}

proptest! {
    #[test]
    fn request_count_matches_page_arithmetic(count in 0usize..400, page_size in 1usize..60) {
        let pages = source(distinct_seasons(count));
        let outcome = fetch_all_tokens(&pages, &opts(page_size, 1_000)).unwrap();
        prop_assert_eq!(outcome.tokens.len(), count);
        prop_assert_eq!(outcome.requests, count / page_size + 1);
        if count % page_size != 0 {
            prop_assert_eq!(outcome.requests, (count + page_size - 1) / page_size);
        }
        prop_assert!(!outcome.exhausted);
    }

    #[test]
    fn never_exceeds_max_requests(count in 0usize..200, page_size in 1usize..10, max in 1usize..8) {
        let pages = source(distinct_seasons(count));
        let outcome = fetch_all_tokens(&pages, &opts(page_size, max)).unwrap();
        prop_assert!(pages.requests() <= max);
        prop_assert_eq!(outcome.exhausted, count / page_size + 1 > max);
    }
}
