use std::cmp::Ordering;
use std::collections::HashMap;

use super::error::AnalysisError;
use crate::models::{ArtistAggregate, Track};

/// Grouped statistics over the track collection. All functions are pure:
/// the same input always produces the same output.
pub struct Aggregator;

/// Running totals for one artist, in first-appearance order.
struct ArtistGroup {
    name: String,
    first_genre: String,
    popularity_total: f64,
    song_count: usize,
}

impl Aggregator {
    /// Artists with the highest mean popularity. Returns at most `n`
    /// aggregates, descending by mean; ties keep the artist's
    /// first-appearance order in the dataset.
    pub fn top_artists_by_popularity(
        tracks: &[Track],
        n: usize,
    ) -> Result<Vec<ArtistAggregate>, AnalysisError> {
        if n == 0 {
            return Err(AnalysisError::InvalidN);
        }

        let mut aggregates: Vec<ArtistAggregate> = group_by_artist(tracks)
            .into_iter()
            .map(|group| ArtistAggregate {
                average_popularity: group.popularity_total / group.song_count as f64,
                representative_genre: capitalize_first(&group.first_genre),
                artist_name: group.name,
                song_count: group.song_count,
            })
            .collect();

        aggregates.sort_by(|a, b| {
            b.average_popularity
                .partial_cmp(&a.average_popularity)
                .unwrap_or(Ordering::Equal)
        });
        aggregates.truncate(n);
        Ok(aggregates)
    }

    /// Artists with the most songs, as (artist_name, song_count) pairs.
    /// Same ordering and tie rules as `top_artists_by_popularity`.
    pub fn top_artists_by_song_count(
        tracks: &[Track],
        n: usize,
    ) -> Result<Vec<(String, usize)>, AnalysisError> {
        if n == 0 {
            return Err(AnalysisError::InvalidN);
        }

        let mut counts: Vec<(String, usize)> = group_by_artist(tracks)
            .into_iter()
            .map(|group| (group.name, group.song_count))
            .collect();

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(n);
        Ok(counts)
    }

    /// The `n` most popular individual tracks, stable on ties.
    pub fn top_tracks_by_popularity(
        tracks: &[Track],
        n: usize,
    ) -> Result<Vec<Track>, AnalysisError> {
        if n == 0 {
            return Err(AnalysisError::InvalidN);
        }

        let mut sorted = tracks.to_vec();
        sorted.sort_by(|a, b| {
            b.popularity
                .partial_cmp(&a.popularity)
                .unwrap_or(Ordering::Equal)
        });
        sorted.truncate(n);
        Ok(sorted)
    }
}

/// Group tracks by artist, preserving the order in which artists first
/// appear. The first genre seen for an artist becomes the group's genre.
fn group_by_artist(tracks: &[Track]) -> Vec<ArtistGroup> {
    let mut groups: Vec<ArtistGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for track in tracks {
        match index.get(track.artist_name.as_str()) {
            Some(&i) => {
                groups[i].popularity_total += track.popularity;
                groups[i].song_count += 1;
            }
            None => {
                index.insert(track.artist_name.as_str(), groups.len());
                groups.push(ArtistGroup {
                    name: track.artist_name.clone(),
                    first_genre: track.genre.clone(),
                    popularity_total: track.popularity,
                    song_count: 1,
                });
            }
        }
    }

    groups
}

/// Uppercase the first character, leave the rest as-is.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
