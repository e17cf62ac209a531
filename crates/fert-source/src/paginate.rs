use std::collections::BTreeSet;
use std::fmt;

use fert_core::config::SourceConfig;
use fert_core::errors::{ErrorInfo, FertError};
use fert_core::TokenRecord;
use tracing::{debug, info, warn};

/// Position after the last record of a page.
///
/// Seasons alone do not advance past a season whose records straddle a page
/// boundary, so the cursor also carries the id of the last record and the next
/// page starts strictly after `(season, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    /// Season of the last record seen; `None` before the first page.
    pub season: Option<u32>,
    /// Id of the last record seen within `season`.
    pub last_id: Option<u64>,
}

impl PageCursor {
    /// Cursor positioned before every record.
    pub fn start() -> Self {
        Self::default()
    }

    /// Cursor positioned right after `token`.
    pub fn after(token: &TokenRecord) -> Self {
        Self {
            season: Some(token.season),
            last_id: Some(token.id),
        }
    }

    /// Season bound for `season > bound` filters; `-1` sits below season 0.
    pub fn season_floor(&self) -> i64 {
        self.season.map(i64::from).unwrap_or(-1)
    }

    /// Whether `token` lies strictly after the cursor in `(season, id)` order.
    pub fn admits(&self, token: &TokenRecord) -> bool {
        match self.season {
            None => true,
            Some(season) if token.season > season => true,
            Some(season) if token.season == season => {
                self.last_id.map_or(true, |last| token.id > last)
            }
            Some(_) => false,
        }
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.season, self.last_id) {
            (Some(season), Some(id)) => write!(f, "season {season} after id {id}"),
            (Some(season), None) => write!(f, "season {season}"),
            _ => write!(f, "start"),
        }
    }
}

/// One page request against the upstream token source.
pub trait TokenPages {
    /// Returns up to `first` records after `cursor`, ordered by season then id.
    fn fetch_page(&self, cursor: &PageCursor, first: usize) -> Result<Vec<TokenRecord>, FertError>;
}

/// Page size and failsafe bound for a full fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationOpts {
    /// Records requested per page.
    pub page_size: usize,
    /// Maximum page requests before the fetch gives up.
    pub max_requests: usize,
}

impl Default for PaginationOpts {
    fn default() -> Self {
        Self {
            page_size: fert_core::config::DEFAULT_PAGE_SIZE,
            max_requests: fert_core::config::DEFAULT_MAX_REQUESTS,
        }
    }
}

impl From<&SourceConfig> for PaginationOpts {
    fn from(config: &SourceConfig) -> Self {
        Self {
            page_size: config.page_size,
            max_requests: config.max_requests,
        }
    }
}

/// Result of a full paginated fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// Distinct records in fetch order.
    pub tokens: Vec<TokenRecord>,
    /// Page requests issued.
    pub requests: usize,
    /// Records dropped because their id was already accumulated.
    pub duplicates: usize,
    /// Set when the failsafe stopped the fetch; `tokens` is then partial.
    pub exhausted: bool,
}

/// Fetches every token record, page by page, until a short page arrives.
///
/// Transport errors abort the fetch. Hitting `max_requests` is not an error:
/// the accumulated records are returned with `exhausted` set.
pub fn fetch_all_tokens<P>(pages: &P, opts: &PaginationOpts) -> Result<FetchOutcome, FertError>
where
    P: TokenPages + ?Sized,
{
    if opts.page_size == 0 || opts.max_requests == 0 {
        return Err(FertError::Config(
            ErrorInfo::new(
                "fert_source.pagination_bounds",
                "page size and max requests must be positive",
            )
            .with_context("page_size", opts.page_size.to_string())
            .with_context("max_requests", opts.max_requests.to_string()),
        ));
    }
    info!(page_size = opts.page_size, "querying token source for fertilizer tokens");
    let mut cursor = PageCursor::start();
    let mut tokens = Vec::new();
    let mut seen = BTreeSet::new();
    let mut duplicates = 0usize;
    for request in 1..=opts.max_requests {
        info!(request, cursor = %cursor, "paginate: season > {}", cursor.season_floor());
        let page = pages.fetch_page(&cursor, opts.page_size)?;
        let received = page.len();
        let next = page.last().map(PageCursor::after);
        for token in page {
            if seen.insert(token.id) {
                tokens.push(token);
            } else {
                duplicates += 1;
            }
        }
        debug!(request, received, total = tokens.len(), "page received");
        if received < opts.page_size {
            if duplicates > 0 {
                warn!(duplicates, "dropped token records already seen on earlier pages");
            }
            info!(count = tokens.len(), requests = request, "loaded fertilizer tokens");
            return Ok(FetchOutcome {
                tokens,
                requests: request,
                duplicates,
                exhausted: false,
            });
        }
        if let Some(next) = next {
            if next == cursor {
                warn!(cursor = %cursor, "token source returned a page that does not advance the cursor");
            }
            cursor = next;
        }
    }
    warn!(
        max_requests = opts.max_requests,
        count = tokens.len(),
        duplicates,
        "pagination exceeded maximum requests; continuing with a partial token list"
    );
    Ok(FetchOutcome {
        tokens,
        requests: opts.max_requests,
        duplicates,
        exhausted: true,
    })
}
