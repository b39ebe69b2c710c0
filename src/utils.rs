use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};

use crate::types::{DeviceTableRow, PlaybackDevice};

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Splits a `;` separated song list, keeping order and duplicates.
pub fn parse_songs(songs: &str) -> Vec<String> {
    songs
        .split(';')
        .map(str::trim)
        .filter(|song| !song.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn progress_remark(song_count: usize) -> &'static str {
    if song_count > 50 {
        "I am creating the playlist for you now. This might take a little while."
    } else if song_count > 20 {
        "Hang on, while I'm creating the playlist for you."
    } else {
        "Alright, one moment please."
    }
}

pub fn device_table_rows(devices: &[PlaybackDevice]) -> Vec<DeviceTableRow> {
    devices
        .iter()
        .map(|d| DeviceTableRow {
            name: d.name.clone(),
            kind: d.kind.clone().unwrap_or_else(|| "-".to_string()),
            active: if d.is_active { "yes" } else { "no" }.to_string(),
        })
        .collect()
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
