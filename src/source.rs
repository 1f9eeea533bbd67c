use std::fs;
use std::path::PathBuf;

use log::{error, warn};
use serde::de::DeserializeOwned;

use crate::error::SourceError;
use crate::model::{Subtitle, Video, VideoDetail};
use crate::store::storage::sanitize_key;

/// Where the video list and per-video details come from.
pub trait ContentSource {
    fn videos(&self) -> Result<Vec<Video>, SourceError>;
    fn detail(&self, video_id: &str) -> Result<VideoDetail, SourceError>;
}

fn detail_path(video_id: &str) -> String {
    format!("detail/{}.json", sanitize_key(video_id))
}

fn parse<T: DeserializeOwned>(what: &str, body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(|source| SourceError::Parse {
        what: what.to_string(),
        source,
    })
}

/// Static content laid out as the web app serves it.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn read<T: DeserializeOwned>(&self, relative: &str) -> Result<T, SourceError> {
        let path = self.root.join(relative);
        let body = fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        parse(relative, &body)
    }
}

impl ContentSource for DirSource {
    fn videos(&self) -> Result<Vec<Video>, SourceError> {
        self.read("videos.json")
    }

    fn detail(&self, video_id: &str) -> Result<VideoDetail, SourceError> {
        self.read(&detail_path(video_id))
    }
}

#[cfg(feature = "network")]
pub struct HttpSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "network")]
impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| SourceError::Http {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn fetch<T: DeserializeOwned>(&self, relative: &str) -> Result<T, SourceError> {
        let url = format!("{}/{relative}", self.base_url);
        let http_err = |reason: String| SourceError::Http {
            url: url.clone(),
            reason,
        };
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| http_err(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(http_err(status.to_string()));
        }
        let body = response.text().map_err(|e| http_err(e.to_string()))?;
        parse(relative, &body)
    }
}

#[cfg(feature = "network")]
impl ContentSource for HttpSource {
    fn videos(&self) -> Result<Vec<Video>, SourceError> {
        self.fetch("videos.json")
    }

    fn detail(&self, video_id: &str) -> Result<VideoDetail, SourceError> {
        self.fetch(&detail_path(video_id))
    }
}

/// HTTP when a base URL is given, the content directory otherwise.
pub fn open_source(
    content_url: Option<&str>,
    content_dir: PathBuf,
) -> Result<Box<dyn ContentSource>, SourceError> {
    match content_url {
        #[cfg(feature = "network")]
        Some(url) => Ok(Box::new(HttpSource::new(url)?)),
        #[cfg(not(feature = "network"))]
        Some(_) => Err(SourceError::NetworkDisabled),
        None => Ok(Box::new(DirSource::new(content_dir))),
    }
}

/// The video list, or nothing if it cannot be fetched.
pub fn load_videos(source: &dyn ContentSource) -> Vec<Video> {
    source.videos().unwrap_or_else(|e| {
        error!("failed to load video list: {e}");
        Vec::new()
    })
}

/// Subtitles of a video in index order. Unreadable data yields an empty
/// list; records without a usable time range are dropped.
pub fn load_subtitles(source: &dyn ContentSource, video_id: &str) -> Vec<Subtitle> {
    let detail = match source.detail(video_id) {
        Ok(detail) => detail,
        Err(e) => {
            error!("failed to load subtitles for {video_id}: {e}");
            return Vec::new();
        }
    };
    let mut subtitles: Vec<Subtitle> = detail
        .subtitles
        .into_iter()
        .filter(|s| {
            let valid = s.has_valid_range();
            if !valid {
                warn!(
                    "dropping subtitle {} of {video_id}: start {} is not before end {}",
                    s.index, s.start_time, s.end_time
                );
            }
            valid
        })
        .collect();
    subtitles.sort_by_key(|s| s.index);
    subtitles
}
