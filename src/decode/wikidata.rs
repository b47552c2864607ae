//! Actor/movie pairs from a Wikidata SPARQL JSON result.

use serde::{Deserialize, Serialize};

use super::{Decoder, parse_json};
use crate::Result;

/// Namespace every Wikidata entity URI starts with.
pub const WIKIDATA_ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";

/// One cast membership: an actor appearing in a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieActor {
    /// Bare entity id of the actor (e.g. `Q42`).
    pub actor_uri: String,
    /// Bare entity id of the movie.
    pub movie_uri: String,
    pub actor_name: String,
    pub movie_name: String,
}

#[derive(Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Deserialize)]
struct SparqlResults {
    bindings: Vec<ActorMovieBinding>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActorMovieBinding {
    actor: Term,
    movie: Term,
    actor_label: Term,
    movie_label: Term,
}

#[derive(Deserialize)]
struct Term {
    value: String,
}

/// Remove the first occurrence of `pattern` from `s`, if any.
pub fn strip_first(s: &str, pattern: &str) -> String {
    s.replacen(pattern, "", 1)
}

/// Decodes `results.bindings[*].{actor,movie,actorLabel,movieLabel}.value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorMovieDecoder;

impl Decoder for ActorMovieDecoder {
    type Output = Vec<MovieActor>;

    fn name(&self) -> &'static str {
        "wikidata"
    }

    fn decode(&self, body: &str) -> Result<Vec<MovieActor>> {
        let response: SparqlResponse = parse_json(body, self.name())?;
        Ok(response
            .results
            .bindings
            .into_iter()
            .map(|b| MovieActor {
                actor_uri: strip_first(&b.actor.value, WIKIDATA_ENTITY_PREFIX),
                movie_uri: strip_first(&b.movie.value, WIKIDATA_ENTITY_PREFIX),
                actor_name: b.actor_label.value,
                movie_name: b.movie_label.value,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(actor: &str, movie: &str, actor_label: &str, movie_label: &str) -> String {
        format!(
            r#"{{"actor":{{"type":"uri","value":"{actor}"}},
                "movie":{{"type":"uri","value":"{movie}"}},
                "actorLabel":{{"xml:lang":"en","type":"literal","value":"{actor_label}"}},
                "movieLabel":{{"xml:lang":"en","type":"literal","value":"{movie_label}"}}}}"#
        )
    }

    fn response(bindings: &[String]) -> String {
        format!(
            r#"{{"head":{{"vars":["movie","movieLabel","actor","actorLabel"]}},
                "results":{{"bindings":[{}]}}}}"#,
            bindings.join(",")
        )
    }

    #[test]
    fn strips_entity_prefix() {
        assert_eq!(
            strip_first("http://www.wikidata.org/entity/Q42", WIKIDATA_ENTITY_PREFIX),
            "Q42"
        );
    }

    #[test]
    fn leaves_unprefixed_ids_alone() {
        assert_eq!(strip_first("Q42", WIKIDATA_ENTITY_PREFIX), "Q42");
    }

    #[test]
    fn strips_first_occurrence_only() {
        let doubled = format!("{WIKIDATA_ENTITY_PREFIX}{WIKIDATA_ENTITY_PREFIX}Q1");
        assert_eq!(
            strip_first(&doubled, WIKIDATA_ENTITY_PREFIX),
            format!("{WIKIDATA_ENTITY_PREFIX}Q1")
        );
    }

    #[test]
    fn decodes_bindings_in_order() {
        let body = response(&[
            binding(
                "http://www.wikidata.org/entity/Q1",
                "http://www.wikidata.org/entity/Q10",
                "Ann",
                "First Film",
            ),
            binding("Q2", "http://www.wikidata.org/entity/Q20", "Bob", "Second Film"),
        ]);
        let pairs = ActorMovieDecoder.decode(&body).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(
            pairs[0],
            MovieActor {
                actor_uri: "Q1".into(),
                movie_uri: "Q10".into(),
                actor_name: "Ann".into(),
                movie_name: "First Film".into(),
            }
        );
        assert_eq!(pairs[1].actor_uri, "Q2");
        assert_eq!(pairs[1].movie_uri, "Q20");
    }

    #[test]
    fn empty_bindings_decode_to_empty() {
        let pairs = ActorMovieDecoder.decode(&response(&[])).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn unparsable_text_is_malformed() {
        let err = ActorMovieDecoder.decode("<html>timeout</html>").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn missing_label_is_malformed() {
        let body = r#"{"results":{"bindings":[{"actor":{"value":"Q1"},"movie":{"value":"Q2"},"actorLabel":{"value":"A"}}]}}"#;
        assert!(ActorMovieDecoder.decode(body).unwrap_err().is_malformed());
    }

    #[test]
    fn non_string_value_is_malformed() {
        let body = r#"{"results":{"bindings":[{"actor":{"value":1},"movie":{"value":"Q2"},"actorLabel":{"value":"A"},"movieLabel":{"value":"M"}}]}}"#;
        assert!(ActorMovieDecoder.decode(body).unwrap_err().is_malformed());
    }

    #[test]
    fn bindings_must_be_array() {
        let body = r#"{"results":{"bindings":{}}}"#;
        assert!(ActorMovieDecoder.decode(body).unwrap_err().is_malformed());
    }
}
