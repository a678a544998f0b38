use std::time::Duration;

use super::aggregate::Aggregator;
use super::cache::{TtlCache, DEFAULT_TTL};
use super::error::AnalysisError;
use crate::models::{ArtistAggregate, Track};

/// One user session over a loaded dataset: the read-only track collection
/// plus a memoization cache per aggregation. The dataset is fixed for the
/// session's lifetime, so `n` alone keys each cache; function identity is
/// the cache instance itself. Nothing here is global, separate sessions
/// share no state.
pub struct Session {
    tracks: Vec<Track>,
    artists_by_popularity: TtlCache<usize, Vec<ArtistAggregate>>,
    artists_by_song_count: TtlCache<usize, Vec<(String, usize)>>,
    tracks_by_popularity: TtlCache<usize, Vec<Track>>,
}

impl Session {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self::with_ttl(tracks, DEFAULT_TTL)
    }

    pub fn with_ttl(tracks: Vec<Track>, ttl: Duration) -> Self {
        Session {
            tracks,
            artists_by_popularity: TtlCache::new(ttl),
            artists_by_song_count: TtlCache::new(ttl),
            tracks_by_popularity: TtlCache::new(ttl),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn top_artists_by_popularity(
        &self,
        n: usize,
    ) -> Result<Vec<ArtistAggregate>, AnalysisError> {
        self.artists_by_popularity
            .try_get_or_insert_with(n, || Aggregator::top_artists_by_popularity(&self.tracks, n))
    }

    pub fn top_artists_by_song_count(
        &self,
        n: usize,
    ) -> Result<Vec<(String, usize)>, AnalysisError> {
        self.artists_by_song_count
            .try_get_or_insert_with(n, || Aggregator::top_artists_by_song_count(&self.tracks, n))
    }

    pub fn top_tracks_by_popularity(&self, n: usize) -> Result<Vec<Track>, AnalysisError> {
        self.tracks_by_popularity
            .try_get_or_insert_with(n, || Aggregator::top_tracks_by_popularity(&self.tracks, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(artist: &str, title: &str, genre: &str, popularity: f64) -> Track {
        Track {
            artist_name: artist.to_string(),
            track_name: title.to_string(),
            genre: genre.to_string(),
            popularity,
            danceability: 0.5,
            energy: 0.5,
            key: 0,
            loudness: -10.0,
            mode: 1,
            speechiness: 0.05,
            acousticness: 0.2,
            instrumentalness: 0.0,
            valence: 0.5,
            tempo: 120.0,
        }
    }

    fn sample_tracks() -> Vec<Track> {
        vec![
            track("A", "one", "rock", 80.0),
            track("A", "two", "rock", 60.0),
            track("B", "three", "pop", 90.0),
        ]
    }

    #[test]
    fn memoized_result_matches_direct_computation() {
        let tracks = sample_tracks();
        let session = Session::new(tracks.clone());

        let direct = Aggregator::top_artists_by_popularity(&tracks, 2).unwrap();
        let cached_first = session.top_artists_by_popularity(2).unwrap();
        let cached_second = session.top_artists_by_popularity(2).unwrap();

        assert_eq!(direct, cached_first);
        assert_eq!(cached_first, cached_second);
    }

    #[test]
    fn different_n_values_are_cached_independently() {
        let session = Session::new(sample_tracks());

        assert_eq!(session.top_artists_by_song_count(1).unwrap().len(), 1);
        assert_eq!(session.top_artists_by_song_count(2).unwrap().len(), 2);
    }

    #[test]
    fn invalid_n_propagates() {
        let session = Session::new(sample_tracks());
        assert!(matches!(
            session.top_tracks_by_popularity(0),
            Err(AnalysisError::InvalidN)
        ));
        // A later valid request still works; the failure was not cached.
        assert_eq!(session.top_tracks_by_popularity(3).unwrap().len(), 3);
    }
}
