pub mod build;
pub mod lookup;
pub mod player;
pub mod review;
pub mod sim;
pub mod tracker;

pub use build::{BuildSync, Navigation, SentenceDone, SyncStep};
pub use player::{PlayerState, VideoPlayer};
pub use review::{ReviewStep, ReviewSync};
pub use sim::SimulatedPlayer;
pub use tracker::TimeTracker;
