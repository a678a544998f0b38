use crate::analysis::{AnalysisError, RecommendationQuery};
use crate::config::{CatalogConfig, ScoringConfig};
use crate::models::{CatalogTrack, FeatureVector, RecommendationsResponse, ScoreRequest};
use ureq::Agent;
use urlencoding::encode;

/// Client for the hosted popularity scoring endpoint
pub struct ScoringClient {
    agent: Agent,
    endpoint: String,
    api_key: String,
    deployment: Option<String>,
}

impl ScoringClient {
    pub fn new(config: ScoringConfig) -> Self {
        ScoringClient {
            agent: Agent::new(),
            endpoint: config.endpoint,
            api_key: config.api_key,
            deployment: config.deployment,
        }
    }

    /// Submit a feature vector and return the model's label. The body
    /// shape is pinned by the deployed model; see `ScoreRequest`.
    pub fn classify(&self, features: &FeatureVector) -> Result<String, AnalysisError> {
        let body = ScoreRequest::from_features(features);

        let mut request = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .set("Authorization", &format!("Bearer {}", self.api_key));
        if let Some(deployment) = &self.deployment {
            request = request.set("azureml-model-deployment", deployment);
        }

        let response = request
            .send_json(&body)
            .map_err(|e| AnalysisError::Upstream(format!("scoring request failed: {e}")))?;

        let response_text = response
            .into_string()
            .map_err(|e| AnalysisError::Upstream(format!("scoring response unreadable: {e}")))?;

        // The endpoint answers with a one-element array of labels.
        let labels: Vec<String> = serde_json::from_str(&response_text).map_err(|e| {
            AnalysisError::Upstream(format!("unexpected scoring response format: {e}"))
        })?;

        labels
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::Upstream("empty scoring response".to_string()))
    }
}

/// Client for the catalog recommendation API
pub struct CatalogClient {
    agent: Agent,
    base_url: String,
    token: String,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Self {
        CatalogClient {
            agent: Agent::new(),
            base_url: config.base_url,
            token: config.token,
        }
    }

    /// Fetch tracks similar to the query's seeds within its feature
    /// windows.
    pub fn similar_tracks(
        &self,
        query: &RecommendationQuery,
    ) -> Result<Vec<CatalogTrack>, AnalysisError> {
        let url = recommendations_url(&self.base_url, query);

        let response = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .call()
            .map_err(|e| {
                AnalysisError::Upstream(format!("recommendations request failed: {e}"))
            })?;

        let response_text = response.into_string().map_err(|e| {
            AnalysisError::Upstream(format!("recommendations response unreadable: {e}"))
        })?;

        let parsed: RecommendationsResponse = serde_json::from_str(&response_text).map_err(|e| {
            AnalysisError::Upstream(format!("unexpected recommendations response format: {e}"))
        })?;

        Ok(parsed.tracks)
    }
}

/// Build the recommendations URL for a validated query. Kept as a plain
/// function so the wire format is testable without a server.
pub fn recommendations_url(base_url: &str, query: &RecommendationQuery) -> String {
    let mut url = format!(
        "{}/v1/recommendations?seed_genres={}&limit={}",
        base_url.trim_end_matches('/'),
        encode(&query.seed_genres.join(",")),
        query.limit
    );

    for bound in &query.bounds {
        let name = bound.feature.wire_name();
        url.push_str(&format!(
            "&min_{name}={}&max_{name}={}&target_{name}={}",
            bound.min, bound.max, bound.target
        ));
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::QueryBuilder;
    use crate::models::AudioFeature;
    use std::collections::HashMap;

    fn base_values() -> HashMap<AudioFeature, f64> {
        let mut base = HashMap::new();
        base.insert(AudioFeature::Tempo, 120.0);
        base.insert(AudioFeature::Danceability, 0.5);
        base
    }

    #[test]
    fn recommendations_url_carries_bounds_for_selected_features_only() {
        let query = QueryBuilder::build_query(
            &base_values(),
            &[AudioFeature::Tempo],
            &["rock".to_string()],
            10,
        )
        .unwrap();

        let url = recommendations_url("https://api.example.com", &query);

        assert_eq!(
            url,
            "https://api.example.com/v1/recommendations?seed_genres=rock&limit=10\
             &min_tempo=110&max_tempo=130&target_tempo=120"
        );
    }

    #[test]
    fn seed_genres_are_joined_and_encoded() {
        let query = QueryBuilder::build_query(
            &base_values(),
            &[],
            &["hip hop".to_string(), "latin".to_string()],
            5,
        )
        .unwrap();

        let url = recommendations_url("https://api.example.com/", &query);

        assert_eq!(
            url,
            "https://api.example.com/v1/recommendations?seed_genres=hip%20hop%2Clatin&limit=5"
        );
    }

    #[test]
    fn score_request_body_matches_the_deployed_shape() {
        let features = FeatureVector {
            danceability: 0.5,
            energy: 0.6,
            loudness: -20.0,
            speechiness: 0.05,
            acousticness: 0.2,
            instrumentalness: 0.0,
            valence: 0.4,
            tempo: 120.0,
        };

        let body = serde_json::to_value(ScoreRequest::from_features(&features)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "input_data": {
                    "columns": [
                        "danceability",
                        "energy",
                        "loudness",
                        "speechiness",
                        "acousticness",
                        "instrumentalness",
                        "valence",
                        "tempo"
                    ],
                    "index": [0],
                    "data": [[0.5, 0.6, -20.0, 0.05, 0.2, 0.0, 0.4, 120.0]]
                }
            })
        );
    }

    #[test]
    fn recommendations_response_parses_nested_urls() {
        let payload = r#"{
            "tracks": [
                {
                    "name": "Uptown Funk",
                    "artists": [{"name": "Mark Ronson"}, {"name": "Bruno Mars"}],
                    "external_urls": {"spotify": "https://open.spotify.com/track/abc"}
                },
                {
                    "name": "No Link Song",
                    "artists": [{"name": "Someone"}],
                    "external_urls": {}
                }
            ]
        }"#;

        let parsed: RecommendationsResponse = serde_json::from_str(payload).unwrap();

        assert_eq!(parsed.tracks.len(), 2);
        assert_eq!(parsed.tracks[0].artist_names(), "Mark Ronson, Bruno Mars");
        assert_eq!(
            parsed.tracks[0].external_urls.spotify.as_deref(),
            Some("https://open.spotify.com/track/abc")
        );
        assert!(parsed.tracks[1].external_urls.spotify.is_none());
    }

    #[test]
    fn scoring_labels_parse_as_an_array() {
        let labels: Vec<String> = serde_json::from_str(r#"["Alta popularidad"]"#).unwrap();
        assert_eq!(labels[0], "Alta popularidad");
    }
}
