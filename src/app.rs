use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use shortglish::model::Subtitle;
use shortglish::playback::{
    BuildSync, Navigation, PlayerState, ReviewStep, ReviewSync, SentenceDone, SimulatedPlayer, SyncStep,
    TimeTracker, VideoPlayer,
};
use shortglish::session::{CheckResult, ClickOutcome, FillAdvance, FillSession, LetterEvent, WordGame};
use shortglish::speech::{LogSpeaker, Voice};
use shortglish::store::LearningStores;

use crate::render;

pub enum Lesson {
    Build {
        sync: BuildSync,
        game: Option<WordGame>,
    },
    Fill(FillSession),
    Review(ReviewSync),
}

pub struct App {
    pub video_id: String,
    pub stores: LearningStores,
    pub player: SimulatedPlayer,
    pub lesson: Lesson,
    pub voice: Voice,
    pub should_quit: bool,
    speaker: LogSpeaker,
    rng: SmallRng,
    last_clock: Instant,
}

/// Clip length for the simulated player: a second past the last line.
fn clip_duration(subtitles: &[Subtitle]) -> f64 {
    subtitles.iter().map(|s| s.end_time).fold(0.0, f64::max) + 1.0
}

impl App {
    fn with_lesson(
        video_id: &str,
        stores: LearningStores,
        duration: f64,
        lesson: Lesson,
        voice: Voice,
    ) -> Self {
        Self {
            video_id: video_id.to_string(),
            stores,
            player: SimulatedPlayer::new(duration),
            lesson,
            voice,
            should_quit: false,
            speaker: LogSpeaker,
            rng: SmallRng::from_entropy(),
            last_clock: Instant::now(),
        }
    }

    pub fn build(
        video_id: &str,
        subtitles: Vec<Subtitle>,
        stores: LearningStores,
        tracker: TimeTracker,
        voice: Voice,
    ) -> Self {
        let duration = clip_duration(&subtitles);
        let sync = BuildSync::new(video_id, subtitles, tracker);
        let mut app = Self::with_lesson(
            video_id,
            stores,
            duration,
            Lesson::Build { sync, game: None },
            voice,
        );
        app.player.play();
        app.flush_player();
        app
    }

    pub fn fill(
        video_id: &str,
        subtitles: Vec<Subtitle>,
        stores: LearningStores,
        voice: Voice,
    ) -> Self {
        let session = FillSession::resume(video_id, subtitles, &stores.fills);
        let app = Self::with_lesson(video_id, stores, 0.0, Lesson::Fill(session), voice);
        app.show_fill();
        app
    }

    pub fn review(
        video_id: &str,
        subtitles: Vec<Subtitle>,
        stores: LearningStores,
        tracker: TimeTracker,
        voice: Voice,
    ) -> Self {
        let duration = clip_duration(&subtitles);
        let sync = ReviewSync::new(video_id, subtitles, tracker);
        let mut app = Self::with_lesson(video_id, stores, duration, Lesson::Review(sync), voice);
        app.player.play();
        app.flush_player();
        app
    }

    /// Advance the simulated clock by the wall time since the last call.
    pub fn on_clock(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_clock).as_secs_f64();
        self.last_clock = now;
        self.player.advance(elapsed);
        self.flush_player();
    }

    pub fn on_sync(&mut self, generation: u64) {
        match &mut self.lesson {
            Lesson::Build { sync, game } => match sync.handle_tick(generation, &mut self.player) {
                SyncStep::Activated(_) => {
                    *game = sync.word_game(&self.stores, &mut self.rng);
                    show_build(sync, game.as_ref());
                }
                SyncStep::Looped(index) => println!("(line {index} again: rebuild it, or r to replay)"),
                SyncStep::Idle => {}
            },
            Lesson::Review(sync) => {
                let step = sync.handle_tick(generation, &mut self.player, &mut self.stores.progress);
                show_review_step(sync, step);
            }
            Lesson::Fill(_) => {}
        }
        self.flush_player();
    }

    pub fn handle_line(&mut self, line: &str) {
        let line = line.trim();
        if line == "q" || line == ":q" {
            self.should_quit = true;
            return;
        }
        match self.lesson {
            Lesson::Build { .. } => self.handle_build_line(line),
            Lesson::Fill(_) => self.handle_fill_line(line),
            Lesson::Review(_) => self.handle_review_line(line),
        }
        self.flush_player();
    }

    /// Deliver queued player state changes to the active synchronizer.
    fn flush_player(&mut self) {
        for state in self.player.take_state_changes() {
            match &mut self.lesson {
                Lesson::Build { sync, .. } => sync.on_state_change(state),
                Lesson::Review(sync) => {
                    let step =
                        sync.on_state_change(state, &mut self.player, &mut self.stores.progress);
                    show_review_step(sync, step);
                }
                Lesson::Fill(_) => {}
            }
        }
    }

    fn handle_build_line(&mut self, line: &str) {
        let Lesson::Build { sync, game } = &mut self.lesson else {
            return;
        };
        match line {
            "r" => sync.repeat(&mut self.player),
            "h" => match game.as_ref().and_then(WordGame::hint) {
                Some(id) => println!("hint: button {id}"),
                None => println!("no hint available"),
            },
            "n" => match sync.next(&mut self.player, &self.stores.dialogues) {
                Navigation::Moved(_) => {
                    *game = sync.word_game(&self.stores, &mut self.rng);
                    show_build(sync, game.as_ref());
                }
                Navigation::Blocked => println!("finish this sentence first"),
                Navigation::AtEnd => println!("this is the last line"),
            },
            "p" => match sync.previous(&mut self.player) {
                Navigation::Moved(_) => {
                    *game = sync.word_game(&self.stores, &mut self.rng);
                    show_build(sync, game.as_ref());
                }
                _ => println!("this is the first line"),
            },
            other => {
                let Ok(id) = other.parse::<usize>() else {
                    println!("commands: <button id>, h hint, r replay, n next, p previous, q quit");
                    return;
                };
                let Some(g) = game.as_mut() else {
                    println!("wait for a line to start");
                    return;
                };
                match g.click(id) {
                    ClickOutcome::Ignored => {}
                    ClickOutcome::Accepted(_) => show_build(sync, Some(&*g)),
                    ClickOutcome::Wrong { id } => {
                        println!("button {id} is not next");
                        sync.repeat(&mut self.player);
                        show_build(sync, Some(&*g));
                    }
                    ClickOutcome::Completed(words) => {
                        println!("{}", render::sentence_line(g));
                        match sync.complete_current(words, &mut self.stores) {
                            Some(SentenceDone::NextUnlocked) => println!("solved! n for the next line"),
                            Some(SentenceDone::StepFinished) => {
                                println!("build step complete. Continue with `fill {}`", self.video_id);
                                self.should_quit = true;
                            }
                            None => {}
                        }
                    }
                }
            }
        }
    }

    fn handle_fill_line(&mut self, line: &str) {
        let Lesson::Fill(session) = &mut self.lesson else {
            return;
        };
        match line {
            ":hint" => session.show_hint(),
            ":speak" => session.speak(&mut self.speaker, &self.voice),
            ":retry" => session.retry(),
            ":check" => match session.check() {
                CheckResult::Success => println!("correct! :next to continue"),
                CheckResult::Error => println!("not quite. :retry and fix it"),
                CheckResult::Pending => println!("fill every blank first"),
            },
            ":next" => match session.advance(&mut self.stores) {
                FillAdvance::Next => {}
                FillAdvance::Blocked => println!("check a correct answer first"),
                FillAdvance::StepFinished => {
                    println!("fill step complete. Continue with `review {}`", self.video_id);
                    self.should_quit = true;
                    return;
                }
            },
            _ if !line.is_empty() && line.chars().all(|c| c == '-') => {
                for _ in line.chars() {
                    session.backspace();
                }
            }
            _ if line.starts_with(':') => {
                println!("commands: letters to type, - backspace, :hint :check :retry :next :speak :q");
                return;
            }
            _ => {
                for ch in line.chars().filter(|c| !c.is_whitespace()) {
                    if session.type_char(ch) == LetterEvent::Rejected {
                        println!("'{ch}' is not a letter");
                    }
                }
            }
        }
        self.show_fill();
    }

    fn handle_review_line(&mut self, line: &str) {
        let Lesson::Review(sync) = &mut self.lesson else {
            return;
        };
        match line {
            "restart" => sync.restart(&mut self.player),
            "p" => {
                if self.player.state() == PlayerState::Playing {
                    self.player.pause();
                } else {
                    self.player.play();
                }
            }
            other => {
                let toggled = other
                    .parse::<u32>()
                    .is_ok_and(|index| sync.toggle_repeat(index, &mut self.player));
                if toggled {
                    println!("{}", render::dialogue_list(sync));
                } else {
                    println!("commands: <line index> toggle repeat, p play/pause, restart, q");
                }
            }
        }
    }

    fn show_fill(&self) {
        let Lesson::Fill(session) = &self.lesson else {
            return;
        };
        let Some(sub) = session.current() else {
            println!("no fill exercises for this video");
            return;
        };
        let (current, total) = session.progress();
        println!("[{current}/{total}] {}", sub.translation);
        println!("  {}", render::blanks_line(session));
    }
}

fn show_build(sync: &BuildSync, game: Option<&WordGame>) {
    let Some(sub) = sync.current() else {
        return;
    };
    if !sub.translation.is_empty() {
        println!("{:>3}: {}", sub.index, sub.translation);
    }
    match game {
        Some(game) => {
            println!("     {}", render::sentence_line(game));
            if !game.is_complete() {
                println!("     {}", render::buttons_line(game));
            }
        }
        None => println!("     (no words in this line, n to move on)"),
    }
}

fn show_review_step(sync: &ReviewSync, step: ReviewStep) {
    match step {
        ReviewStep::Activated(_) => println!("{}", render::dialogue_list(sync)),
        ReviewStep::Ended => {
            println!("review complete: every step of this video is done. `restart` to watch again, q to quit")
        }
        ReviewStep::Looped(_) | ReviewStep::Idle => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortglish::model::StepType;
    use std::time::Duration;

    fn subs() -> Vec<Subtitle> {
        vec![Subtitle {
            index: 0,
            start_time: 0.0,
            end_time: 2.0,
            text: "Hi there".to_string(),
            translation: String::new(),
            blanked_words: Some(vec!["there".to_string()]),
        }]
    }

    fn tracker() -> TimeTracker {
        TimeTracker::new(Duration::from_millis(100), |_| true)
    }

    #[test]
    fn test_clip_duration_pads_last_line() {
        assert_eq!(clip_duration(&subs()), 3.0);
        assert_eq!(clip_duration(&[]), 1.0);
    }

    #[test]
    fn test_build_app_starts_playing_and_tracking() {
        let app = App::build("vid", subs(), LearningStores::in_memory(), tracker(), Voice::default());
        assert_eq!(app.player.state(), PlayerState::Playing);
        let Lesson::Build { sync, .. } = &app.lesson else {
            panic!("expected build lesson");
        };
        assert!(sync.is_tracking());
    }

    #[test]
    fn test_fill_app_finishes_step_from_typed_lines() {
        let mut stores = LearningStores::in_memory();
        stores.progress.mark_step_completed("vid", StepType::Build);
        let mut app = App::fill("vid", subs(), stores, Voice::default());
        app.handle_line("there");
        app.handle_line(":check");
        app.handle_line(":next");
        assert!(app.should_quit);
        assert!(app.stores.progress.is_step_completed("vid", StepType::Fill));
    }
}
