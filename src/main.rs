use std::time::Duration;

use bookreview::{app, db, session::FileSessionStore, AppState};

const SESSION_SWEEP_EVERY: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing("bookreview=debug,axum=info,tower_http=info");

    let app_state = AppState::init().await?;
    db::migrate(&app_state.db).await?;

    let store = FileSessionStore::new(&app_state.config.session_dir).await?;
    tracing::info!(dir = %store.dir().display(), "file session store ready");
    bookreview::session::spawn_expired_sweep(store.clone(), SESSION_SWEEP_EVERY);

    if app_state.config.enrich.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; book summaries disabled");
    }

    let router = app::build_app(app_state, store);
    app::serve(router).await
}
