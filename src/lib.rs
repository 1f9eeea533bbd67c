// Core of the video-based English practice app: tokenizing and shuffling
// subtitle lines, the build and fill games, syncing subtitles to a player
// clock and the persisted learning progress. The `shortglish` binary in
// main.rs drives these against a simulated player.

pub mod config;
pub mod error;
pub mod model;
pub mod playback;
pub mod session;
pub mod source;
pub mod speech;
pub mod store;
pub mod text;
