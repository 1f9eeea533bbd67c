use crate::model::Subtitle;

/// First subtitle (by position) whose `[start, end)` contains `time`.
pub fn position_at(subtitles: &[Subtitle], time: f64) -> Option<usize> {
    subtitles.iter().position(|s| s.contains(time))
}

pub fn position_of_index(subtitles: &[Subtitle], index: u32) -> Option<usize> {
    subtitles.iter().position(|s| s.index == index)
}

/// The subtitle numbered `index + 1`.
pub fn next_position(subtitles: &[Subtitle], current: usize) -> Option<usize> {
    let index = subtitles.get(current)?.index.checked_add(1)?;
    position_of_index(subtitles, index)
}

/// The subtitle numbered `index - 1`.
pub fn previous_position(subtitles: &[Subtitle], current: usize) -> Option<usize> {
    let index = subtitles.get(current)?.index.checked_sub(1)?;
    position_of_index(subtitles, index)
}
