use std::path::PathBuf;

use studyplan_content_intelligence::config::Config;
use studyplan_content_intelligence::intelligence::EngineConfig;
use studyplan_content_intelligence::logging::init_tracing;
use studyplan_content_intelligence::report::{InsightInput, InsightRunner, ReportError};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let log_guard = init_tracing(&config.log_level, config.file_logs.as_ref());

    let code = match std::env::args().nth(1).map(PathBuf::from).or(config.data_file) {
        None => {
            tracing::error!("no input: pass a JSON file path or set INTEL_DATA_FILE");
            2
        }
        Some(path) => match run(path).await {
            Ok(report) => {
                println!("{report}");
                0
            }
            Err(err) => {
                tracing::error!(error = %err, "content intelligence run failed");
                1
            }
        },
    };

    // flush file logs before exiting
    drop(log_guard);
    if code != 0 {
        std::process::exit(code);
    }
}

async fn run(path: PathBuf) -> Result<String, ReportError> {
    let input = InsightInput::load(&path).await?;
    tracing::info!(
        path = %path.display(),
        users = input.users.len(),
        candidates = input.candidates.len(),
        "loaded activity snapshot"
    );

    let engine_config = EngineConfig::from_env();
    let runner = InsightRunner::new(input.users.clone(), engine_config);
    let reports = runner.run(&input).await?;
    Ok(serde_json::to_string_pretty(&reports)?)
}
