use fert_core::errors::{ErrorInfo, FertError};
use fert_core::TokenRecord;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::graphql::GraphqlClient;
use crate::paginate::{PageCursor, TokenPages};

/// Page query over `fertilizerTokens`.
///
/// The `or` filter resumes strictly after the `(season, id)` cursor. It relies
/// on the subgraph breaking season ties by id, which graph-node does for every
/// `orderBy`.
pub const FERTILIZER_TOKENS_QUERY: &str = r#"query FertilizerTokens($first: Int!, $season: Int!, $lastId: String!) {
  fertilizerTokens(
    first: $first
    orderBy: season
    orderDirection: asc
    where: { or: [{ season_gt: $season }, { season: $season, id_gt: $lastId }] }
  ) {
    id
    supply
    humidity
    season
    startBpf
    endBpf
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokensData {
    fertilizer_tokens: Vec<TokenRecord>,
}

/// Token pages read from the Beanstalk subgraph.
#[derive(Debug, Clone)]
pub struct SubgraphTokenPages<C> {
    client: C,
}

impl<C: GraphqlClient> SubgraphTokenPages<C> {
    /// Wraps a GraphQL client pointed at the subgraph.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Variables sent for a page after `cursor`.
    pub fn variables(cursor: &PageCursor, first: usize) -> Value {
        json!({
            "first": first,
            "season": cursor.season_floor(),
            "lastId": cursor.last_id.map(|id| id.to_string()).unwrap_or_default(),
        })
    }
}

/// Extracts the token list from a query's `data` member.
pub fn parse_page(data: Value) -> Result<Vec<TokenRecord>, FertError> {
    let parsed: TokensData = serde_json::from_value(data).map_err(|err| {
        FertError::Serde(ErrorInfo::new("fert_source.page_decode", err.to_string()))
    })?;
    Ok(parsed.fertilizer_tokens)
}

impl<C: GraphqlClient> TokenPages for SubgraphTokenPages<C> {
    fn fetch_page(&self, cursor: &PageCursor, first: usize) -> Result<Vec<TokenRecord>, FertError> {
        let data = self
            .client
            .query(FERTILIZER_TOKENS_QUERY, Self::variables(cursor, first))?;
        parse_page(data)
    }
}
