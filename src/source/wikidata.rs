//! Actor/movie pairs from the Wikidata SPARQL endpoint, one year at a time.

use reqwest::Url;

use super::{DataSource, step};
use crate::decode::{ActorMovieDecoder, MovieActor};
use crate::{HuginnError, Result};

const SPARQL_ENDPOINT: &str = "https://query.wikidata.org/sparql";
const DATASET: &str = "wikidata-actormovie";

/// Cache key for the actor/movie query over `[begin, end]`.
pub fn composite_key(begin: i32, end: i32) -> String {
    format!("{DATASET}-{begin}-{end}")
}

/// SPARQL selecting cast members of English-language films released in
/// `[begin, end]`.
pub fn actor_movie_query(begin: i32, end: i32) -> String {
    format!(
        "SELECT ?movie ?movieLabel ?actor ?actorLabel WHERE \n\
         {{\n\
         ?movie wdt:P31 wd:Q11424.\n\
         ?movie wdt:P161 ?actor.\n\
         ?movie wdt:P364 wd:Q1860.\n\
         ?movie wdt:P577 ?date.\n\
         FILTER(YEAR(?date) >= {begin} && YEAR(?date) <= {end}).\n\
         SERVICE wikibase:label {{ bd:serviceParam wikibase:language \"en\". }} \n\
         }}"
    )
}

/// Endpoint URL for `query`, asking for JSON results.
pub fn sparql_url(query: &str) -> Result<String> {
    let url = Url::parse_with_params(SPARQL_ENDPOINT, &[("query", query), ("format", "json")])
        .map_err(|e| HuginnError::Configuration(format!("invalid SPARQL URL: {e}")))?;
    Ok(url.to_string())
}

impl DataSource {
    /// Actor/movie pairs for films released between `begin` and `end`
    /// inclusive, in year order.
    ///
    /// The endpoint drops wide queries, so each year is requested and
    /// cached on its own under `wikidata-actormovie-<year>-<year>`.
    /// Overlapping ranges reuse the years already fetched. An empty range
    /// (`begin > end`) makes no requests.
    pub async fn wikidata_actor_movie(&self, begin: i32, end: i32) -> Result<Vec<MovieActor>> {
        let headers = [
            format!("User-Agent: {}", self.user_agent),
            "Accept: application/json".to_string(),
        ];

        let mut pairs = Vec::new();
        for year in begin..=end {
            let key = composite_key(year, year);
            let url = sparql_url(&actor_movie_query(year, year))?;
            let chunk = self
                .fetch_keyed(&key, &url, &headers, &ActorMovieDecoder)
                .await?;
            step!(self, year, pairs = chunk.len(), "actor/movie chunk");
            pairs.extend(chunk);
        }
        Ok(pairs)
    }
}
