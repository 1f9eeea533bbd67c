mod app;
mod event;
mod render;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use log::info;

use shortglish::config::Config;
use shortglish::model::StepType;
use shortglish::playback::TimeTracker;
use shortglish::source::{load_subtitles, load_videos, open_source};
use shortglish::store::LearningStores;
use shortglish::store::progress::NextStep;
use shortglish::text::tokenize;

use app::App;
use event::{AppEvent, EventHandler};

/// How often the simulated player's clock moves.
const CLOCK_RATE: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(
    name = "shortglish",
    version,
    about = "Learn English from short video clips, one subtitle line at a time"
)]
struct Cli {
    #[arg(long, global = true, help = "Directory for saved progress")]
    data_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory holding videos.json and detail/")]
    content_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Base URL to fetch content from instead")]
    content_url: Option<String>,

    #[arg(long, global = true, help = "Subtitle sync interval in milliseconds")]
    poll_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show how a sentence splits into words and punctuation
    Tokenize { sentence: String },
    /// List available videos
    Videos,
    /// Show step progress for a video
    Progress { video_id: String },
    /// Forget progress for a video, or for one step of it
    Reset {
        video_id: String,
        #[arg(long, help = "build, fill or review")]
        step: Option<String>,
    },
    /// Put each line's words back in order
    Build { video_id: String },
    /// Spell the missing words of each line
    Fill { video_id: String },
    /// Watch the whole video with the dialogue list
    Review { video_id: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir.to_string_lossy().to_string();
    }
    if let Some(dir) = cli.content_dir {
        config.content_dir = dir.to_string_lossy().to_string();
    }
    if cli.content_url.is_some() {
        config.content_url = cli.content_url;
    }
    if let Some(ms) = cli.poll_ms {
        config.poll_interval_ms = ms;
    }
    config.validate();

    match cli.command {
        Command::Tokenize { sentence } => {
            for token in tokenize(&sentence) {
                println!("{:>4} | {} | {}", token.prefix, token.word, token.suffix);
            }
            Ok(())
        }
        Command::Videos => {
            let source = open_source(config.content_url.as_deref(), config.content_path())?;
            for video in load_videos(&*source) {
                println!("{:<16} {:>6.1}s  {}", video.id, video.duration, video.title);
            }
            Ok(())
        }
        Command::Progress { video_id } => {
            let stores = LearningStores::open(config.data_path());
            print_progress(&stores, &video_id);
            Ok(())
        }
        Command::Reset { video_id, step } => {
            let mut stores = LearningStores::open(config.data_path());
            match step {
                Some(key) => {
                    let Some(step) = StepType::from_key(&key) else {
                        bail!("unknown step {key:?}, expected build, fill or review");
                    };
                    stores.progress.reset_step(&video_id, step);
                    info!("reset {} of {video_id}", step.as_str());
                }
                None => {
                    stores.reset_video(&video_id);
                    info!("reset all progress of {video_id}");
                }
            }
            print_progress(&stores, &video_id);
            Ok(())
        }
        Command::Build { video_id } => run_step(&config, &video_id, StepType::Build),
        Command::Fill { video_id } => run_step(&config, &video_id, StepType::Fill),
        Command::Review { video_id } => run_step(&config, &video_id, StepType::Review),
    }
}

fn print_progress(stores: &LearningStores, video_id: &str) {
    for &step in StepType::all() {
        let status = stores.progress.step_status(video_id, step);
        println!("{:<7} {}", step.as_str(), render::step_badge(status));
    }
    println!(
        "sentences built: {}, blanks solved: {}",
        stores.dialogues.completed_count(video_id),
        stores.fills.completed(video_id).len()
    );
    match stores.progress.next_step(video_id) {
        NextStep::Step(step) => println!("next: {}", step.as_str()),
        NextStep::AllCompleted => println!("all steps completed"),
    }
}

fn run_step(config: &Config, video_id: &str, step: StepType) -> Result<()> {
    let stores = LearningStores::open(config.data_path());
    if !stores.progress.can_access_step(video_id, step) {
        println!(
            "{} is locked for {video_id}; finish the earlier steps first",
            step.as_str()
        );
        return Ok(());
    }

    let source = open_source(config.content_url.as_deref(), config.content_path())?;
    let subtitles = load_subtitles(&*source, video_id);
    if subtitles.is_empty() {
        println!("video {video_id} not found");
        return Ok(());
    }

    let events = EventHandler::new(CLOCK_RATE);
    let tracker = || {
        let tx = events.sender();
        TimeTracker::new(config.poll_interval(), move |generation| {
            tx.send(AppEvent::Sync(generation)).is_ok()
        })
    };
    let voice = config.voice();

    let mut app = match step {
        StepType::Build => App::build(video_id, subtitles, stores, tracker(), voice),
        StepType::Fill => App::fill(video_id, subtitles, stores, voice),
        StepType::Review => App::review(video_id, subtitles, stores, tracker(), voice),
    };
    run_app(&mut app, &events)
}

fn run_app(app: &mut App, events: &EventHandler) -> Result<()> {
    loop {
        match events.next()? {
            AppEvent::Line(line) => app.handle_line(&line),
            AppEvent::Clock => app.on_clock(),
            AppEvent::Sync(generation) => app.on_sync(generation),
            AppEvent::InputClosed => app.should_quit = true,
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
