use std::fs;
use std::path::Path;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use shortglish::model::StepType;
use shortglish::playback::{
    BuildSync, Navigation, PlayerState, ReviewStep, ReviewSync, SentenceDone, SimulatedPlayer,
    SyncStep, TimeTracker, VideoPlayer,
};
use shortglish::session::{CheckResult, ClickOutcome, FillAdvance, FillSession, WordGame};
use shortglish::source::{DirSource, load_subtitles};
use shortglish::store::LearningStores;
use shortglish::store::completion::CompletionLookup;
use shortglish::store::progress::{NextStep, StepStatus};

const DETAIL: &str = r#"{
  "title": "Quick coffee",
  "description": "Ordering at a cafe",
  "thumbnail": "clip.jpg",
  "subtitles": [
    {"index": 0, "startTime": 0.0, "endTime": 2.0, "text": "Hold on, okay?", "translation": "잠깐만, 알았지?", "blankedWords": ["okay"]},
    {"index": 1, "startTime": 2.0, "endTime": 3.0, "text": ""},
    {"index": 2, "startTime": 3.0, "endTime": 5.0, "text": "See you soon.", "translation": "곧 봐.", "blankedWords": ["soon"]}
  ]
}"#;

fn content_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("detail")).unwrap();
    fs::write(dir.path().join("detail/clip.json"), DETAIL).unwrap();
    dir
}

fn tracker() -> TimeTracker {
    TimeTracker::new(Duration::from_millis(100), |_| true)
}

/// Solve a word game in sentence order, returning the accepted words.
fn solve(game: &mut WordGame) -> Vec<shortglish::model::SelectedWordInfo> {
    loop {
        let id = game.hint().expect("a button for the next word");
        if let ClickOutcome::Completed(words) = game.click(id) {
            return words;
        }
    }
}

fn build_pass(data: &Path, content: &Path) {
    let mut stores = LearningStores::open(data.to_path_buf());
    let mut rng = SmallRng::seed_from_u64(7);
    let subtitles = load_subtitles(&DirSource::new(content.to_path_buf()), "clip");
    assert_eq!(subtitles.len(), 3);

    let mut sync = BuildSync::new("clip", subtitles, tracker());
    let mut player = SimulatedPlayer::new(6.0);
    player.play();
    for state in player.take_state_changes() {
        sync.on_state_change(state);
    }
    assert!(sync.is_tracking());

    assert_eq!(sync.step(&mut player), SyncStep::Activated(0));
    player.advance(2.2);
    assert_eq!(sync.step(&mut player), SyncStep::Looped(0));
    assert_eq!(player.state(), PlayerState::Paused);
    assert_eq!(sync.next(&mut player, &stores.dialogues), Navigation::Blocked);

    let mut game = sync.word_game(&stores, &mut rng).unwrap();
    let words = solve(&mut game);
    assert_eq!(words.len(), 3);
    assert!(words.iter().all(|w| w.attempts == 1));
    assert_eq!(
        sync.complete_current(words, &mut stores),
        Some(SentenceDone::NextUnlocked)
    );

    assert_eq!(sync.next(&mut player, &stores.dialogues), Navigation::Moved(1));
    assert!(sync.word_game(&stores, &mut rng).is_none());
    assert_eq!(sync.next(&mut player, &stores.dialogues), Navigation::Moved(2));

    let mut game = sync.word_game(&stores, &mut rng).unwrap();
    let words = solve(&mut game);
    assert_eq!(
        sync.complete_current(words, &mut stores),
        Some(SentenceDone::StepFinished)
    );
}

fn fill_pass(data: &Path, content: &Path) {
    let mut stores = LearningStores::open(data.to_path_buf());
    let subtitles = load_subtitles(&DirSource::new(content.to_path_buf()), "clip");
    let mut session = FillSession::resume("clip", subtitles, &stores.fills);
    assert_eq!(session.progress(), (1, 2));

    session.set_input(2, "okey");
    assert_eq!(session.check(), CheckResult::Error);
    session.set_input(2, "okay");
    assert_eq!(session.check(), CheckResult::Success);
    assert_eq!(session.advance(&mut stores), FillAdvance::Next);

    session.set_input(2, "soon");
    assert_eq!(session.check(), CheckResult::Success);
    assert_eq!(session.advance(&mut stores), FillAdvance::StepFinished);
}

fn review_pass(data: &Path, content: &Path) {
    let mut stores = LearningStores::open(data.to_path_buf());
    let subtitles = load_subtitles(&DirSource::new(content.to_path_buf()), "clip");
    let mut sync = ReviewSync::new("clip", subtitles, tracker());
    let mut player = SimulatedPlayer::new(6.0);
    player.play();

    assert_eq!(
        sync.step(&mut player, &mut stores.progress),
        ReviewStep::Activated(0)
    );
    player.advance(5.1);
    assert_eq!(sync.step(&mut player, &mut stores.progress), ReviewStep::Ended);
}

#[test]
fn test_full_learning_pass_persists_between_sessions() {
    let data = TempDir::new().unwrap();
    let content = content_dir();

    build_pass(data.path(), content.path());
    {
        let stores = LearningStores::open(data.path().to_path_buf());
        assert!(stores.progress.is_step_completed("clip", StepType::Build));
        assert!(stores.progress.can_access_step("clip", StepType::Fill));
        assert!(!stores.progress.can_access_step("clip", StepType::Review));
        assert_eq!(stores.dialogues.completed_count("clip"), 2);
        assert_eq!(
            stores.progress.step_status("clip", StepType::Fill),
            StepStatus::InProgress
        );
    }

    fill_pass(data.path(), content.path());
    {
        let stores = LearningStores::open(data.path().to_path_buf());
        assert_eq!(stores.fills.completed("clip"), vec![0, 2]);
        assert!(stores.fills.is_completed("clip", 2));
        assert!(stores.progress.can_access_step("clip", StepType::Review));
    }

    review_pass(data.path(), content.path());
    let mut stores = LearningStores::open(data.path().to_path_buf());
    assert_eq!(stores.progress.next_step("clip"), NextStep::AllCompleted);

    stores.reset_video("clip");
    let stores = LearningStores::open(data.path().to_path_buf());
    assert_eq!(stores.progress.next_step("clip"), NextStep::Step(StepType::Build));
    assert_eq!(stores.dialogues.completed_count("clip"), 0);
    assert!(stores.fills.completed("clip").is_empty());
}

#[test]
fn test_progress_files_use_namespaced_envelopes() {
    let data = TempDir::new().unwrap();
    let mut stores = LearningStores::open(data.path().to_path_buf());
    stores.progress.mark_step_completed("clip", StepType::Build);
    stores.fills.mark_completed("clip", 4);

    let progress = fs::read_to_string(data.path().join("shortglish.video_progress.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&progress).unwrap();
    assert_eq!(value["version"], 0);
    assert_eq!(value["state"]["progress"]["clip"]["build"]["isCompleted"], true);

    let fills = fs::read_to_string(data.path().join("shortglish.subtitle_completion.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fills).unwrap();
    assert_eq!(value["state"]["completions"]["clip"], serde_json::json!([4]));
}

#[test]
fn test_unusable_data_dir_degrades_to_memory() {
    let data = TempDir::new().unwrap();
    let blocker = data.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    let mut stores = LearningStores::open(blocker.clone());
    stores.progress.mark_step_completed("clip", StepType::Build);
    assert!(stores.progress.can_access_step("clip", StepType::Fill));

    let reopened = LearningStores::open(blocker);
    assert!(!reopened.progress.is_step_completed("clip", StepType::Build));
}
