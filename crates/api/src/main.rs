use std::sync::Arc;

use taller_api::app::AppServices;
use taller_api::config::Config;
use taller_auth::{Hs256TokenService, TokenService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    taller_observability::init();

    let config = Config::from_env();

    let tokens: Arc<dyn TokenService> =
        Arc::new(Hs256TokenService::new(config.jwt_secret.as_bytes()));

    let services = match &config.database_url {
        Some(url) => {
            tracing::info!("using postgres store");
            AppServices::postgres(url, tokens).await?
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store");
            AppServices::in_memory(tokens)
        }
    };

    if let (Some(email), Some(password)) =
        (&config.superadmin_email, &config.superadmin_password)
    {
        taller_infra::seed::ensure_super_admin(&*services.users, email, password).await?;
    }

    let app = taller_api::app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
