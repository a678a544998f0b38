use std::collections::HashMap;

use super::error::AnalysisError;
use crate::models::AudioFeature;

/// Upstream catalog limits: at most 3 seed genres and 3 bounded features
/// per recommendation request.
pub const MAX_SEED_GENRES: usize = 3;
pub const MAX_BOUNDED_FEATURES: usize = 3;

/// min/max/target window around a base value for one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBound {
    pub feature: AudioFeature,
    pub min: f64,
    pub max: f64,
    pub target: f64,
}

/// A fully validated recommendation request. Features that were not
/// selected carry no bound at all.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationQuery {
    pub seed_genres: Vec<String>,
    pub limit: u32,
    pub bounds: Vec<FeatureBound>,
}

/// Builds bounded catalog queries from slider values.
pub struct QueryBuilder;

impl QueryBuilder {
    /// Turn base feature values into a catalog query. Each selected
    /// feature gets `base - tolerance` / `base + tolerance` / `base` as
    /// its min/max/target.
    pub fn build_query(
        base_values: &HashMap<AudioFeature, f64>,
        selected_features: &[AudioFeature],
        seed_genres: &[String],
        limit: u32,
    ) -> Result<RecommendationQuery, AnalysisError> {
        if seed_genres.is_empty() {
            return Err(AnalysisError::EmptySeeds);
        }
        if seed_genres.len() > MAX_SEED_GENRES {
            return Err(AnalysisError::TooManySeeds(seed_genres.len()));
        }
        if selected_features.len() > MAX_BOUNDED_FEATURES {
            return Err(AnalysisError::TooManyFeatures(selected_features.len()));
        }

        let mut bounds = Vec::with_capacity(selected_features.len());
        for &feature in selected_features {
            let base = *base_values
                .get(&feature)
                .ok_or(AnalysisError::MissingBaseValue(feature.wire_name()))?;
            let tol = tolerance(feature);
            bounds.push(FeatureBound {
                feature,
                min: base - tol,
                max: base + tol,
                target: base,
            });
        }

        Ok(RecommendationQuery {
            seed_genres: seed_genres.to_vec(),
            limit,
            bounds,
        })
    }
}

/// Per-feature window half-width. Adding a feature is one line here.
pub fn tolerance(feature: AudioFeature) -> f64 {
    match feature {
        AudioFeature::Danceability => 0.05,
        AudioFeature::Energy => 0.05,
        AudioFeature::Loudness => 5.0,
        AudioFeature::Speechiness => 0.05,
        AudioFeature::Acousticness => 0.05,
        AudioFeature::Instrumentalness => 0.05,
        AudioFeature::Valence => 0.05,
        AudioFeature::Tempo => 10.0,
    }
}
