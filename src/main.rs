use futures::StreamExt;
use rposeai::{
    logger, progress_channel, prompt, CancellationToken, Config, EditRequest, GeminiClient,
    Orchestrator, ProgressSink, SourceImage, StudioError, StudioSettings, SuggestionCategory,
    SuggestionFetcher, SuggestionOutcome,
};
use std::env;
use std::path::PathBuf;

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(
        logger::LoggerConfig::development().with_level(logger::LogLevel::Info),
    )?;
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    let client = GeminiClient::new(config.gemini.clone())?;
    let credential = config.credential.clone();

    // Suggestions for both search fields, looked up concurrently.
    let fetcher = SuggestionFetcher::new(client.text().clone(), config.suggestions.clone());
    let pose_keyword = env_or("POSE_KEYWORD", "duduk");
    let expression_keyword = env_or("EXPRESSION_KEYWORD", "senyum");
    let outcomes = fetcher
        .fetch_many(
            &[
                (pose_keyword.as_str(), SuggestionCategory::Pose),
                (expression_keyword.as_str(), SuggestionCategory::Expression),
            ],
            credential.as_ref(),
        )
        .await;

    let mut picks = Vec::new();
    for ((keyword, category), outcome) in [
        (pose_keyword.as_str(), SuggestionCategory::Pose),
        (expression_keyword.as_str(), SuggestionCategory::Expression),
    ]
    .iter()
    .zip(outcomes)
    {
        let usable = matches!(&outcome, SuggestionOutcome::Suggestions(items) if !items.is_empty());
        let options = outcome.into_options(keyword);
        log::info!("📋 {} suggestions for \"{}\":", category, keyword);
        for option in &options {
            log::info!("   - {}", option);
        }
        // never edit with a placeholder as the pose or expression
        let pick = if usable {
            options[0].clone()
        } else {
            category.default_options().remove(0)
        };
        picks.push(pick);
    }

    let Some(credential) = credential else {
        log::error!("❌ GEMINI_API_KEY is not set; skipping image generation");
        return Ok(());
    };
    let image_path = match env::var("INPUT_IMAGE_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => {
            log::warn!("⚠️  INPUT_IMAGE_PATH is not set; skipping image generation");
            return Ok(());
        }
    };

    let settings = StudioSettings {
        style: env_or("STYLE", "Fotorrealistis").parse()?,
        quality: env_or("QUALITY", "Standar").parse()?,
    };
    let base_prompt = prompt::compose_base_prompt(
        &picks[0],
        &picks[1],
        &env::var("CUSTOM_PROMPT").unwrap_or_default(),
    );
    let request = EditRequest::new(
        SourceImage::from_path(&image_path).await?,
        base_prompt,
        settings,
        credential,
    );

    let orchestrator = Orchestrator::new(client.image().clone(), config.orchestrator.clone())?;
    let cancel = CancellationToken::new();
    let (sink, mut progress) = progress_channel();

    let progress_task = tokio::spawn(async move {
        while let Some(signal) = progress.next().await {
            log::info!("🎨 Generating image {}/{}...", signal.current, signal.total);
        }
    });
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("⚠️  Cancelling round...");
            ctrl_c.cancel();
        }
    });

    let result = orchestrator
        .run(&request, Some(&sink as &dyn ProgressSink), &cancel)
        .await;
    drop(sink);
    let _ = progress_task.await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(StudioError::RoundExhausted { first_cause }) => {
            log::error!("❌ Every variant failed. First error: {}", first_cause);
            return Err(StudioError::RoundExhausted { first_cause }.into());
        }
        Err(e) => return Err(e.into()),
    };

    for failure in &outcome.failures {
        log::warn!("⚠️  Variant {} failed: {}", failure.variant, failure.reason);
    }

    let output_dir = PathBuf::from(env_or("OUTPUT_DIR", "generated"));
    tokio::fs::create_dir_all(&output_dir).await?;
    for image in &outcome.images {
        let path = output_dir.join(format!(
            "variant-{}-{}.{}",
            image.variant,
            image.id,
            image.file_extension()
        ));
        tokio::fs::write(&path, image.decode()?).await?;
        log::info!("💾 Saved {}", path.display());
    }

    log::info!(
        "✅ {} of {} images generated{}",
        outcome.images.len(),
        config.orchestrator.variant_count,
        if outcome.cancelled { " (cancelled)" } else { "" }
    );
    Ok(())
}
