mod cli;

use cinegen::{
    client::HttpStageClient,
    config,
    history::{self, HistoryClient, HistoryFilter},
    render,
    session::{Command, CommandOutcome, WizardSession},
    wizard::LAST_STEP,
};
use cinegen_core::events::{Event, EventPayload};
use cinegen_core::SceneStatus;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, HistoryCommands};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Brief fields given on the command line.
struct CreateArgs {
    title: String,
    genre: String,
    description: String,
    style: String,
    scenes: Option<u32>,
    retries: u32,
    no_video: bool,
    poster: bool,
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "cinegen=debug,cinegen_core=debug".to_string()
        } else {
            "cinegen=info,cinegen_core=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Create {
            title,
            genre,
            description,
            style,
            scenes,
            retries,
            no_video,
            poster,
            json,
        } => {
            let args = CreateArgs {
                title,
                genre,
                description,
                style,
                scenes,
                retries,
                no_video,
                poster,
                json,
            };
            runtime()?.block_on(create_movie(args, cli.config.as_deref()))
        }
        Commands::History { command } => {
            runtime()?.block_on(run_history(command, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("cinegen {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Stage calls are strictly sequential, so a single-threaded runtime is
/// enough.
fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Attach the service's suggestion to a pipeline error.
fn explain(err: cinegen_core::Error) -> anyhow::Error {
    match err.suggestion() {
        Some(suggestion) => anyhow::anyhow!("{}\n  Suggestion: {}", err, suggestion),
        None => anyhow::Error::new(err),
    }
}

async fn create_movie(args: CreateArgs, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let client = Arc::new(HttpStageClient::new(&config.service));
    let mut session = WizardSession::from_config(&config, client);

    tracing::info!("Using generation service at {}", config.service.base_url);

    let mut events = session.orchestrator().events().subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Progress display skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let result = drive(&mut session, &args).await;

    if result.is_ok() && args.json {
        print_run_json(&session)?;
    }

    drop(session);
    join_printer(printer).await;
    result
}

/// Wait for the progress printer to drain. Returns `false` if it panicked
/// or was cancelled; the run's own result is unaffected.
async fn join_printer(printer: JoinHandle<()>) -> bool {
    match printer.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Progress display stopped abnormally: {}", e);
            false
        }
    }
}

async fn drive(session: &mut WizardSession, args: &CreateArgs) -> Result<()> {
    let mut fields = vec![
        Command::SetTitle(args.title.clone()),
        Command::SetGenre(args.genre.clone()),
        Command::SetDescription(args.description.clone()),
        Command::SetStyle(args.style.clone()),
    ];
    if let Some(count) = args.scenes {
        fields.push(Command::SetSceneCount(count));
    }
    for command in fields {
        session.dispatch(command).await.map_err(explain)?;
    }

    while session.wizard().step() < LAST_STEP {
        session.dispatch(Command::Advance).await.map_err(explain)?;
    }

    if let CommandOutcome::Review(review) =
        session.dispatch(Command::Review).await.map_err(explain)?
    {
        println!("Review:");
        for (label, value) in review.rows() {
            println!("  {:<17} {}", label, value);
        }
        println!();
    }

    if let CommandOutcome::Script(report) =
        session.dispatch(Command::SubmitBrief).await.map_err(explain)?
    {
        println!("Script ready ({} scenes):\n", report.scenes);
        println!("{}\n", report.script.trim());
    }

    if let CommandOutcome::Images(report) =
        session.dispatch(Command::GenerateImages).await.map_err(explain)?
    {
        println!(
            "\n{} of {} scene images generated",
            report.succeeded, report.total
        );
    }

    for attempt in 1..=args.retries {
        let failed: Vec<usize> = session
            .orchestrator()
            .snapshot()
            .iter()
            .enumerate()
            .filter(|(_, item)| item.status == SceneStatus::Error)
            .map(|(index, _)| index)
            .collect();
        if failed.is_empty() {
            break;
        }
        tracing::info!("Retry {}: regenerating {} scenes", attempt, failed.len());
        for index in failed {
            session
                .dispatch(Command::RegenerateItem(index))
                .await
                .map_err(explain)?;
        }
    }

    print_scene_cards(session);

    if args.no_video {
        return Ok(());
    }

    if let CommandOutcome::Video(report) =
        session.dispatch(Command::GenerateVideo).await.map_err(explain)?
    {
        println!(
            "\nVideo ready: {} ({} scenes)",
            report.video_path, report.images_used
        );
        if let Some(brief) = session.orchestrator().run().brief() {
            println!("Save as: {}", brief.download_name(chrono::Utc::now()));
        }
    }

    if args.poster {
        if let CommandOutcome::Poster(report) =
            session.dispatch(Command::GeneratePoster).await.map_err(explain)?
        {
            println!("Poster ready: {}", report.poster_path);
        }
    }

    Ok(())
}

fn print_event(event: &Event) {
    match &event.payload {
        EventPayload::Progress {
            stage,
            percent,
            status,
        } => {
            println!("[{} {:>3.0}%] {}", stage, percent, status);
        }
        EventPayload::ItemFailed {
            index, failure, ..
        } => {
            println!("  scene {} failed: {}", index + 1, failure.user_message());
        }
        EventPayload::StageFailed { stage, failure } => {
            println!("{} stage failed: {}", stage, failure.user_message());
        }
        _ => {}
    }
}

fn print_scene_cards(session: &WizardSession) {
    println!();
    for card in session.scene_cards() {
        let marker = match card.status {
            SceneStatus::Success => "✓",
            SceneStatus::Error => "✗",
            _ => "…",
        };
        println!("{} {} ({})", marker, card.title, card.position);
        match &card.image {
            Some(image) => println!("    {}", image),
            None => println!("    {}", card.status_line),
        }
    }
}

fn print_run_json(session: &WizardSession) -> Result<()> {
    let run = session.orchestrator().run();
    let value = serde_json::json!({
        "run_id": run.id(),
        "stage": run.stage(),
        "brief": run.brief(),
        "script": run.script(),
        "scenes": render::scene_cards(run.items()),
        "video_path": run.video_artifact(),
        "download_name": run
            .video_artifact()
            .and(run.brief())
            .map(|brief| brief.download_name(chrono::Utc::now())),
        "poster_path": run.poster_artifact(),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn run_history(command: HistoryCommands, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let client = HistoryClient::new(&config.service);

    match command {
        HistoryCommands::List { search, filter } => {
            let filter: HistoryFilter = filter.parse()?;
            let movies = client.list().await?;
            let shown = history::filter_movies(&movies, &search, filter);

            if shown.is_empty() {
                println!("No movies found.");
                return Ok(());
            }

            for movie in shown {
                let created = movie
                    .created()
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "Unknown".to_string());
                println!(
                    "{} {}  [{} / {}]",
                    if movie.is_completed() { "✅" } else { "⏳" },
                    movie.title,
                    movie.genre,
                    movie.style
                );
                println!(
                    "    id: {}  created: {}  duration: {}  size: {}  scenes: {}",
                    movie.id,
                    created,
                    movie.duration_label(),
                    movie.size_label(),
                    movie.num_scenes
                );
            }
        }
        HistoryCommands::Show { id, json } => {
            let movie = client.get(&id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&movie)?);
                return Ok(());
            }

            let summary = &movie.summary;
            println!("{}", summary.title);
            println!("  Genre: {}", summary.genre);
            println!("  Style: {}", summary.style);
            println!("  Status: {}", summary.status);
            println!("  Duration: {}", summary.duration_label());
            println!("  File Size: {}", summary.size_label());
            println!("  Scenes: {}", summary.num_scenes);
            if let Some(resolution) = summary
                .video_info
                .as_ref()
                .and_then(|info| info.resolution.as_deref())
            {
                println!("  Resolution: {}", resolution);
            }
            println!("  Download: {}", client.download_url(&summary.id));
            if let Some(ref description) = movie.description {
                println!("\n{}", description);
            }
            for (i, scene) in movie.scenes.iter().enumerate() {
                let title = scene
                    .title
                    .clone()
                    .unwrap_or_else(|| format!("Scene {}", scene.id));
                println!("\n  {}. {}", i + 1, title);
                println!("     {}", scene.content);
            }
        }
        HistoryCommands::Delete { id } => {
            client.delete(&id).await?;
            println!("Movie {} deleted", id);
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Service: {}", config.service.base_url);
    println!("  Timeout: {}s", config.service.timeout_secs);
    println!(
        "  Scenes: default {}, max {}",
        config.wizard.default_scene_count, config.wizard.max_scene_count
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finished_printer_joins_cleanly() {
        let printer = tokio::spawn(async {});
        assert!(join_printer(printer).await);
    }

    #[tokio::test]
    async fn panicked_printer_is_reported() {
        let printer = tokio::spawn(async { panic!("display broke") });
        assert!(!join_printer(printer).await);
    }
}
