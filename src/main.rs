use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod analysis;
mod client;
mod config;
mod dataset;
mod models;


use crate::analysis::{OutlierFilter, QueryBuilder, Session};
use crate::client::{CatalogClient, ScoringClient};
use crate::config::{load_catalog_config, load_scoring_config};
use crate::models::{AudioFeature, FeatureVector};

#[derive(Parser)]
#[command(name = "track-insights")]
#[command(about = "Console explorer for the cleaned streaming dataset")]
#[command(version)]
struct Args {
    /// Path to the cleaned dataset CSV
    #[arg(short = 'd', long = "data", default_value = "spotify_data_cleaned.csv")]
    data_file: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Artists with the highest mean popularity
    TopArtists {
        /// How many artists to show
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },

    /// Artists with the most songs in the dataset
    Prolific {
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },

    /// Most popular tracks and their audio profile
    TopTracks {
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },

    /// Drop IQR outliers for the given columns, optionally writing a
    /// cleaned CSV
    Clean {
        /// Column to fence; repeat for sequential filtering
        #[arg(long = "column", required = true)]
        columns: Vec<String>,

        /// Where to write the surviving rows
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Ask the hosted model whether a song with these features would be
    /// popular
    Predict {
        #[arg(long, default_value_t = 0.5)]
        danceability: f64,
        #[arg(long, default_value_t = 0.5)]
        energy: f64,
        #[arg(long, default_value_t = -20.0, allow_negative_numbers = true)]
        loudness: f64,
        #[arg(long, default_value_t = 0.5)]
        speechiness: f64,
        #[arg(long, default_value_t = 0.5)]
        acousticness: f64,
        #[arg(long, default_value_t = 0.5)]
        instrumentalness: f64,
        #[arg(long, default_value_t = 0.5)]
        valence: f64,
        #[arg(long, default_value_t = 120.0)]
        tempo: f64,
    },

    /// Fetch similar tracks from the catalog for up to three seed genres
    Recommend {
        /// Seed genre; repeat up to three times
        #[arg(long = "genre", required = true)]
        genres: Vec<String>,

        #[arg(long, default_value_t = 10)]
        limit: u32,

        /// Bound a feature around this value; at most three features
        #[arg(long)]
        danceability: Option<f64>,
        #[arg(long)]
        energy: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        loudness: Option<f64>,
        #[arg(long)]
        speechiness: Option<f64>,
        #[arg(long)]
        acousticness: Option<f64>,
        #[arg(long)]
        instrumentalness: Option<f64>,
        #[arg(long)]
        valence: Option<f64>,
        #[arg(long)]
        tempo: Option<f64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!(
        "track-insights report, {}",
        chrono::Local::now().format("%A %Y-%m-%d")
    );

    match args.command {
        Command::TopArtists { count } => {
            let session = open_session(&args.data_file)?;
            print_top_artists(&session, count)
        }
        Command::Prolific { count } => {
            let session = open_session(&args.data_file)?;
            print_prolific_artists(&session, count)
        }
        Command::TopTracks { count } => {
            let session = open_session(&args.data_file)?;
            print_top_tracks(&session, count)
        }
        Command::Clean { columns, output } => {
            let session = open_session(&args.data_file)?;
            clean_dataset(&session, &columns, output.as_deref())
        }
        Command::Predict {
            danceability,
            energy,
            loudness,
            speechiness,
            acousticness,
            instrumentalness,
            valence,
            tempo,
        } => {
            let features = FeatureVector {
                danceability,
                energy,
                loudness,
                speechiness,
                acousticness,
                instrumentalness,
                valence,
                tempo,
            };
            predict_popularity(&features)
        }
        Command::Recommend {
            genres,
            limit,
            danceability,
            energy,
            loudness,
            speechiness,
            acousticness,
            instrumentalness,
            valence,
            tempo,
        } => {
            // Flags become base values; the selected set is whatever was
            // provided, in feature-table order.
            let flag_values = [
                danceability,
                energy,
                loudness,
                speechiness,
                acousticness,
                instrumentalness,
                valence,
                tempo,
            ];
            let mut base_values = HashMap::new();
            let mut selected = Vec::new();
            for (feature, value) in AudioFeature::ALL.into_iter().zip(flag_values) {
                if let Some(value) = value {
                    base_values.insert(feature, value);
                    selected.push(feature);
                }
            }
            recommend_tracks(&base_values, &selected, &genres, limit)
        }
    }
}

/// Check the dataset exists and load it into a session.
fn open_session(path: &str) -> Result<Session> {
    if !Path::new(path).exists() {
        eprintln!("Error: dataset '{path}' not found.");
        eprintln!("Please point --data at the cleaned CSV export.");
        return Err(anyhow::anyhow!("dataset '{}' not found", path));
    }

    println!("\nLoading dataset from: {path}");
    let tracks = dataset::load_tracks(Path::new(path))?;
    println!("Loaded {} tracks.", tracks.len());

    Ok(Session::new(tracks))
}

fn print_top_artists(session: &Session, count: usize) -> Result<()> {
    let top = session.top_artists_by_popularity(count)?;

    println!("\nTop {} artists by mean popularity", top.len());
    println!("{:<4} {:<30} {:>10}  {:<16} {:>6}", "#", "Artist", "Avg pop", "Genre", "Songs");
    for (i, artist) in top.iter().enumerate() {
        println!(
            "{:<4} {:<30} {:>10.2}  {:<16} {:>6}",
            i + 1,
            artist.artist_name,
            artist.average_popularity,
            artist.representative_genre,
            artist.song_count
        );
    }

    Ok(())
}

fn print_prolific_artists(session: &Session, count: usize) -> Result<()> {
    let top = session.top_artists_by_song_count(count)?;

    println!("\nTop {} artists by song count", top.len());
    println!("{:<4} {:<30} {:>6}", "#", "Artist", "Songs");
    for (i, (artist, songs)) in top.iter().enumerate() {
        println!("{:<4} {:<30} {:>6}", i + 1, artist, songs);
    }

    Ok(())
}

fn print_top_tracks(session: &Session, count: usize) -> Result<()> {
    let top = session.top_tracks_by_popularity(count)?;

    println!("\nTop {} tracks by popularity", top.len());
    println!(
        "{:<4} {:<30} {:<24} {:>6} {:>8} {:>6} {:>5}",
        "#", "Track", "Artist", "Pop", "Dance", "Tempo", "Key"
    );
    for (i, track) in top.iter().enumerate() {
        println!(
            "{:<4} {:<30} {:<24} {:>6.0} {:>8.2} {:>6.1} {:>5}",
            i + 1,
            track.track_name,
            track.artist_name,
            track.popularity,
            track.danceability,
            track.tempo,
            track.key
        );
    }

    Ok(())
}

fn clean_dataset(session: &Session, columns: &[String], output: Option<&str>) -> Result<()> {
    let column_refs: Vec<&str> = columns.iter().map(|c| c.as_str()).collect();

    println!("\nFencing outliers on: {}", columns.join(", "));
    let surviving = OutlierFilter::filter(session.tracks(), &column_refs)?;
    let dropped = session.tracks().len() - surviving.len();
    println!(
        "Kept {} of {} tracks ({} outliers dropped).",
        surviving.len(),
        session.tracks().len(),
        dropped
    );

    match output {
        Some(path) => {
            let mut writer = csv::Writer::from_path(path)
                .map_err(|e| anyhow::anyhow!("failed to open '{}' for writing: {}", path, e))?;
            for track in &surviving {
                writer.serialize(track)?;
            }
            writer.flush()?;
            println!("✓ Wrote cleaned dataset to '{path}'.");
        }
        None => {
            for track in surviving.iter().take(5) {
                println!(
                    "  {} by {} (popularity {:.0})",
                    track.track_name, track.artist_name, track.popularity
                );
            }
            if surviving.len() > 5 {
                println!("  ... and {} more. Use --output to save them.", surviving.len() - 5);
            }
        }
    }

    Ok(())
}

fn predict_popularity(features: &FeatureVector) -> Result<()> {
    let config = load_scoring_config()?;
    let client = ScoringClient::new(config);

    println!("\nSubmitting features to the scoring endpoint...");
    match client.classify(features) {
        Ok(label) => match label.as_str() {
            "Alta popularidad" => {
                println!("✓ The model expects this song to be highly popular.")
            }
            "Baja popularidad" => {
                println!("✗ The model expects low popularity for this song.")
            }
            other => println!("Model label: {other}"),
        },
        // Upstream trouble is reported inline; the session keeps going.
        Err(e) => eprintln!("✗ Prediction unavailable: {e}"),
    }

    Ok(())
}

fn recommend_tracks(
    base_values: &HashMap<AudioFeature, f64>,
    selected: &[AudioFeature],
    genres: &[String],
    limit: u32,
) -> Result<()> {
    let query = QueryBuilder::build_query(base_values, selected, genres, limit)?;

    let config = load_catalog_config()?;
    let client = CatalogClient::new(config);

    println!(
        "\nFetching up to {} similar tracks for seeds: {}",
        query.limit,
        query.seed_genres.join(", ")
    );
    for bound in &query.bounds {
        println!(
            "  {}: {} to {} (target {})",
            bound.feature.wire_name(),
            bound.min,
            bound.max,
            bound.target
        );
    }

    match client.similar_tracks(&query) {
        Ok(tracks) if tracks.is_empty() => {
            println!("No similar tracks found for these seeds.");
        }
        Ok(tracks) => {
            for (i, track) in tracks.iter().enumerate() {
                let link = track
                    .external_urls
                    .spotify
                    .as_deref()
                    .unwrap_or("no link available");
                println!("{}. \"{}\" by {} [{}]", i + 1, track.name, track.artist_names(), link);
            }
        }
        Err(e) => eprintln!("✗ Recommendations unavailable: {e}"),
    }

    Ok(())
}
