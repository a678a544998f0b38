use std::cmp::Ordering;

use super::error::AnalysisError;
use crate::models::Track;

/// Interquartile-range outlier removal over the track collection.
pub struct OutlierFilter;

impl OutlierFilter {
    /// Drop rows falling outside the 1.5 * IQR fence for each named
    /// column, in order. The fence for a column is computed over the rows
    /// that survived the previous columns, not the original set. Survivors
    /// keep their input order; the input itself is never modified.
    pub fn filter(tracks: &[Track], columns: &[&str]) -> Result<Vec<Track>, AnalysisError> {
        let mut surviving = tracks.to_vec();

        for &column in columns {
            let select = column_selector(column)
                .ok_or_else(|| AnalysisError::InvalidColumn(column.to_string()))?;

            if surviving.is_empty() {
                continue;
            }

            let mut values: Vec<f64> = surviving.iter().map(select).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

            let q1 = quantile(&values, 0.25);
            let q3 = quantile(&values, 0.75);
            let iqr = q3 - q1;
            let lower = q1 - 1.5 * iqr;
            let upper = q3 + 1.5 * iqr;

            surviving.retain(|track| {
                let value = select(track);
                value >= lower && value <= upper
            });
        }

        Ok(surviving)
    }
}

/// Map a column name to its numeric accessor. Text columns and unknown
/// names have no accessor.
fn column_selector(column: &str) -> Option<fn(&Track) -> f64> {
    Some(match column {
        "popularity" => |t: &Track| t.popularity,
        "danceability" => |t: &Track| t.danceability,
        "energy" => |t: &Track| t.energy,
        "loudness" => |t: &Track| t.loudness,
        "speechiness" => |t: &Track| t.speechiness,
        "acousticness" => |t: &Track| t.acousticness,
        "instrumentalness" => |t: &Track| t.instrumentalness,
        "valence" => |t: &Track| t.valence,
        "tempo" => |t: &Track| t.tempo,
        "key" => |t: &Track| f64::from(t.key),
        "mode" => |t: &Track| f64::from(t.mode),
        _ => return None,
    })
}

/// Linearly interpolated quantile of sorted data, rank = q * (n - 1).
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let fraction = rank - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_with(popularity: f64, tempo: f64) -> Track {
        Track {
            artist_name: "Test Artist".to_string(),
            track_name: "Test Track".to_string(),
            genre: "pop".to_string(),
            popularity,
            danceability: 0.5,
            energy: 0.5,
            key: 5,
            loudness: -10.0,
            mode: 1,
            speechiness: 0.05,
            acousticness: 0.2,
            instrumentalness: 0.0,
            valence: 0.5,
            tempo,
        }
    }

    #[test]
    fn quantile_interpolates_between_neighbours() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&data, 0.25), 1.75);
        assert_eq!(quantile(&data, 0.5), 2.5);
        assert_eq!(quantile(&data, 0.75), 3.25);
        assert_eq!(quantile(&data, 0.0), 1.0);
        assert_eq!(quantile(&data, 1.0), 4.0);
    }

    #[test]
    fn empty_column_list_is_identity() {
        let tracks = vec![track_with(50.0, 120.0), track_with(90.0, 90.0)];
        let filtered = OutlierFilter::filter(&tracks, &[]).unwrap();
        assert_eq!(filtered.len(), tracks.len());
        assert_eq!(filtered[0].popularity, 50.0);
        assert_eq!(filtered[1].popularity, 90.0);
    }

    #[test]
    fn removes_extreme_value_and_preserves_order() {
        let mut tracks: Vec<Track> = (50..58).map(|p| track_with(p as f64, 120.0)).collect();
        tracks.push(track_with(1000.0, 120.0));

        let filtered = OutlierFilter::filter(&tracks, &["popularity"]).unwrap();

        assert_eq!(filtered.len(), 8);
        let popularities: Vec<f64> = filtered.iter().map(|t| t.popularity).collect();
        assert_eq!(
            popularities,
            vec![50.0, 51.0, 52.0, 53.0, 54.0, 55.0, 56.0, 57.0]
        );
    }

    #[test]
    fn keeps_everything_within_the_fence() {
        let tracks: Vec<Track> = (0..20).map(|p| track_with(40.0 + p as f64, 120.0)).collect();
        let filtered = OutlierFilter::filter(&tracks, &["popularity", "tempo"]).unwrap();
        assert_eq!(filtered.len(), tracks.len());
    }

    #[test]
    fn fences_are_computed_sequentially() {
        // Row 6 is an outlier in popularity. Once it is gone, the tempo
        // fence over the survivors collapses to [10, 10] and row 5 falls
        // out too. A fence over the unfiltered tempo column would have
        // kept row 5.
        let tracks = vec![
            track_with(1.0, 10.0),
            track_with(1.0, 10.0),
            track_with(1.0, 10.0),
            track_with(1.0, 10.0),
            track_with(1.0, 50.0),
            track_with(100.0, 1000.0),
        ];

        let filtered = OutlierFilter::filter(&tracks, &["popularity", "tempo"]).unwrap();

        assert_eq!(filtered.len(), 4);
        assert!(filtered.iter().all(|t| t.tempo == 10.0));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let tracks = vec![track_with(50.0, 120.0)];
        let result = OutlierFilter::filter(&tracks, &["bpm"]);
        assert!(matches!(result, Err(AnalysisError::InvalidColumn(ref c)) if c == "bpm"));
    }

    #[test]
    fn text_column_is_rejected() {
        let tracks = vec![track_with(50.0, 120.0)];
        let result = OutlierFilter::filter(&tracks, &["genre"]);
        assert!(matches!(result, Err(AnalysisError::InvalidColumn(_))));
    }

    #[test]
    fn bad_column_is_rejected_even_for_empty_input() {
        let result = OutlierFilter::filter(&[], &["artist_name"]);
        assert!(matches!(result, Err(AnalysisError::InvalidColumn(_))));
    }

    #[test]
    fn empty_input_stays_empty() {
        let filtered = OutlierFilter::filter(&[], &["popularity"]).unwrap();
        assert!(filtered.is_empty());
    }
}
