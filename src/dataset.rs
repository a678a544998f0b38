use std::io::Read;
use std::path::Path;

use anyhow::Result;

use crate::models::Track;

/// Load the cleaned streaming dataset from a CSV file. The file is read
/// once per run; row order is preserved because downstream tie-breaking
/// depends on it. Columns beyond the `Track` fields are ignored.
pub fn load_tracks(path: &Path) -> Result<Vec<Track>> {
    let file = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("failed to open dataset '{}': {}", path.display(), e))?;
    read_tracks(file)
        .map_err(|e| anyhow::anyhow!("failed to read dataset '{}': {}", path.display(), e))
}

fn read_tracks<R: Read>(reader: R) -> Result<Vec<Track>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut tracks = Vec::new();
    for (row, record) in csv_reader.deserialize().enumerate() {
        // +2: one for the header line, one for zero-based enumerate
        let track: Track =
            record.map_err(|e| anyhow::anyhow!("bad record on line {}: {}", row + 2, e))?;
        tracks.push(track);
    }
    Ok(tracks)
}
