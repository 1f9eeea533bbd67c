use log::info;

/// Voice settings for read-aloud.
#[derive(Clone, Debug, PartialEq)]
pub struct Voice {
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            rate: 0.9,
            pitch: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Voice,
}

/// Fire-and-forget text-to-speech. A new utterance cancels the previous one.
pub trait Speaker {
    fn speak(&mut self, utterance: &Utterance);
}

/// Stand-in for platforms without a synthesizer: writes the line to the log.
#[derive(Debug, Default)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn speak(&mut self, utterance: &Utterance) {
        info!(
            "speak [{} x{:.1}]: {}",
            utterance.voice.lang, utterance.voice.rate, utterance.text
        );
    }
}
