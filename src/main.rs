use std::env;

use studysmarts::{
    app_state::AppState,
    config::Config,
    errors::AppResult,
    services::export,
};

#[tokio::main]
async fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        if config.credentials.is_empty() {
            log::error!("{}", e);
            return Err(e);
        }
        log::warn!("{}; running in offline mode", e);
    }

    let state = AppState::new(config)?;
    let report = state.restore();
    log::info!(
        "Restored state: session={}, publication={}, attempts={}",
        report.session,
        report.publication,
        report.attempts
    );

    match state.session.current() {
        Some(identity) => log::info!("Signed in as {} '{}'", identity.role, identity.id),
        None => log::info!("No one is signed in"),
    }

    let Some(bundle) = state.publication.current() else {
        log::info!("No quiz is published");
        return Ok(());
    };
    log::info!(
        "Published quiz '{}' has {} questions and {} recorded attempts",
        bundle.document_name,
        bundle.quiz.len(),
        state.attempts.for_quiz(&bundle.document_name).count()
    );

    if let Some(dir) = env::args().nth(1) {
        let path = export::write_study_aids(&bundle, &dir)?;
        log::info!("Study aids written to {}", path.display());
    }

    Ok(())
}
