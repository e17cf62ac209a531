//! Token and global progress sources for the Fertilizer metadata pipeline.
//!
//! Tokens are read page by page through [`TokenPages`] and accumulated by
//! [`fetch_all_tokens`]; the global progress counter comes from a
//! [`ProgressSource`]. Network-backed implementations talk to a subgraph over
//! GraphQL and to an Ethereum node over JSON-RPC; [`SnapshotSource`] serves
//! both from a local JSON file.

pub mod graphql;
pub mod paginate;
pub mod progress;
pub mod snapshot;
pub mod subgraph;

pub use graphql::{GraphqlClient, HttpGraphqlClient};
pub use paginate::{fetch_all_tokens, FetchOutcome, PageCursor, PaginationOpts, TokenPages};
pub use progress::{ProgressSource, RpcProgressSource};
pub use snapshot::{Snapshot, SnapshotSource};
pub use subgraph::SubgraphTokenPages;
