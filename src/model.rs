use serde::{Deserialize, Serialize};

/// A timed dialogue line. `text == ""` marks a silent interval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtitle {
    pub index: u32,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blanked_words: Option<Vec<String>>,
}

impl Subtitle {
    pub fn is_silent(&self) -> bool {
        self.text.is_empty()
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }

    pub fn has_valid_range(&self) -> bool {
        self.start_time.is_finite() && self.end_time.is_finite() && self.start_time < self.end_time
    }

    pub fn has_blanks(&self) -> bool {
        self.blanked_words.as_ref().is_some_and(|w| !w.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoDetail {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub subtitles: Vec<Subtitle>,
}

/// One accepted word of a reconstructed sentence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedWordInfo {
    pub word: String,
    /// 1 = right on the first try.
    pub attempts: u32,
    /// Id of the shuffled button that was used.
    pub id: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Build,
    Fill,
    Review,
}

impl StepType {
    pub fn as_str(self) -> &'static str {
        match self {
            StepType::Build => "build",
            StepType::Fill => "fill",
            StepType::Review => "review",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "build" => Some(StepType::Build),
            "fill" => Some(StepType::Fill),
            "review" => Some(StepType::Review),
            _ => None,
        }
    }

    pub fn all() -> &'static [StepType] {
        &[StepType::Build, StepType::Fill, StepType::Review]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_json_uses_camel_case() {
        let json = r#"{"index":3,"startTime":1.5,"endTime":2.75,"text":"Hi there","translation":"안녕","blankedWords":["there"]}"#;
        let sub: Subtitle = serde_json::from_str(json).unwrap();
        assert_eq!(sub.index, 3);
        assert_eq!(sub.start_time, 1.5);
        assert_eq!(sub.end_time, 2.75);
        assert!(sub.has_blanks());
        assert!(sub.contains(1.5));
        assert!(!sub.contains(2.75));
    }

    #[test]
    fn test_subtitle_optional_fields_default() {
        let json = r#"{"index":0,"startTime":0,"endTime":1,"text":""}"#;
        let sub: Subtitle = serde_json::from_str(json).unwrap();
        assert!(sub.is_silent());
        assert!(!sub.has_blanks());
        assert_eq!(sub.translation, "");
    }

    #[test]
    fn test_inverted_range_is_invalid() {
        let sub = Subtitle {
            index: 0,
            start_time: 2.0,
            end_time: 2.0,
            text: "x".to_string(),
            translation: String::new(),
            blanked_words: None,
        };
        assert!(!sub.has_valid_range());
    }

    #[test]
    fn test_step_type_keys() {
        for &step in StepType::all() {
            assert_eq!(StepType::from_key(step.as_str()), Some(step));
        }
        assert_eq!(StepType::from_key("watch"), None);
        assert_eq!(serde_json::to_string(&StepType::Fill).unwrap(), "\"fill\"");
    }
}
