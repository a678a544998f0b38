use serde::{Deserialize, Serialize};

/// One row of the cleaned streaming dataset. Loaded once per run and
/// treated as read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub artist_name: String,
    pub track_name: String,
    pub genre: String,
    pub popularity: f64,
    pub danceability: f64,
    pub energy: f64,
    pub key: u8,
    pub loudness: f64,
    pub mode: u8,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub valence: f64,
    pub tempo: f64,
}

/// The eight tunable audio features exposed by the dataset and both
/// external APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFeature {
    Danceability,
    Energy,
    Loudness,
    Speechiness,
    Acousticness,
    Instrumentalness,
    Valence,
    Tempo,
}

impl AudioFeature {
    pub const ALL: [AudioFeature; 8] = [
        AudioFeature::Danceability,
        AudioFeature::Energy,
        AudioFeature::Loudness,
        AudioFeature::Speechiness,
        AudioFeature::Acousticness,
        AudioFeature::Instrumentalness,
        AudioFeature::Valence,
        AudioFeature::Tempo,
    ];

    /// Name used in dataset columns, the scoring body and catalog query
    /// parameters.
    pub fn wire_name(self) -> &'static str {
        match self {
            AudioFeature::Danceability => "danceability",
            AudioFeature::Energy => "energy",
            AudioFeature::Loudness => "loudness",
            AudioFeature::Speechiness => "speechiness",
            AudioFeature::Acousticness => "acousticness",
            AudioFeature::Instrumentalness => "instrumentalness",
            AudioFeature::Valence => "valence",
            AudioFeature::Tempo => "tempo",
        }
    }
}

/// A full set of feature values, as submitted to the scoring endpoint.
#[derive(Debug, Clone, Copy)]
pub struct FeatureVector {
    pub danceability: f64,
    pub energy: f64,
    pub loudness: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub valence: f64,
    pub tempo: f64,
}

impl FeatureVector {
    /// Column order expected by the scoring endpoint. `as_row` must stay
    /// in sync with this.
    pub const COLUMNS: [&'static str; 8] = [
        "danceability",
        "energy",
        "loudness",
        "speechiness",
        "acousticness",
        "instrumentalness",
        "valence",
        "tempo",
    ];

    pub fn as_row(&self) -> [f64; 8] {
        [
            self.danceability,
            self.energy,
            self.loudness,
            self.speechiness,
            self.acousticness,
            self.instrumentalness,
            self.valence,
            self.tempo,
        ]
    }
}

/// Per-artist aggregate derived from the track collection. Recomputed on
/// demand, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistAggregate {
    pub artist_name: String,
    pub average_popularity: f64,
    pub representative_genre: String,
    pub song_count: usize,
}

/// Request body for the scoring endpoint. The shape is fixed by the
/// deployed model and must not drift.
#[derive(Debug, Serialize)]
pub struct ScoreRequest {
    pub input_data: ScoreInputData,
}

#[derive(Debug, Serialize)]
pub struct ScoreInputData {
    pub columns: Vec<String>,
    pub index: Vec<u32>,
    pub data: Vec<Vec<f64>>,
}

impl ScoreRequest {
    pub fn from_features(features: &FeatureVector) -> Self {
        ScoreRequest {
            input_data: ScoreInputData {
                columns: FeatureVector::COLUMNS.iter().map(|c| c.to_string()).collect(),
                index: vec![0],
                data: vec![features.as_row().to_vec()],
            },
        }
    }
}

/// Response structure for the catalog recommendations call
#[derive(Debug, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<CatalogTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogTrack {
    pub name: String,
    pub artists: Vec<CatalogArtist>,
    pub external_urls: ExternalUrls,
}

impl CatalogTrack {
    /// All credited artist names, joined for display
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}
