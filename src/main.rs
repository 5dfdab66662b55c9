use anyhow::{Context, Result};
use identity_backoffice::application::{
    context::{Principal, claim_types},
    dto::CreateOrganizationCommand,
    ports::{cache::Cache, identity::IdentityResolver, time::Clock, util::SlugGenerator},
    services::ApplicationServices,
};
use identity_backoffice::config::{AppConfig, SeedConfig};
use identity_backoffice::domain::{
    audit::AuditLogRepository,
    group::GroupRepository,
    organization::{OrganizationRepository, OrganizationSlug},
};
use identity_backoffice::infrastructure::{
    cache::{InMemoryCache, RedisCache},
    database,
    identity::ClaimsIdentityResolver,
    repositories::{
        PostgresAuditLogRepository, PostgresGroupRepository, PostgresOrganizationRepository,
    },
    time::SystemClock,
    util::DefaultSlugGenerator,
};
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url(), config.database_max_connections())
        .await
        .context("connecting to the database")?;
    database::run_migrations(&pool)
        .await
        .context("running migrations")?;

    let group_repo: Arc<dyn GroupRepository> = Arc::new(PostgresGroupRepository::new(pool.clone()));
    let organization_repo: Arc<dyn OrganizationRepository> =
        Arc::new(PostgresOrganizationRepository::new(pool.clone()));
    let audit_log_repo: Arc<dyn AuditLogRepository> =
        Arc::new(PostgresAuditLogRepository::new(pool.clone()));

    let cache: Arc<dyn Cache> = match config.redis_url() {
        Some(url) => {
            tracing::info!("using redis cache");
            Arc::new(RedisCache::from_url(url)?)
        }
        None => {
            tracing::info!("REDIS_URL not set; using in-memory cache");
            Arc::new(InMemoryCache::new())
        }
    };
    let identity: Arc<dyn IdentityResolver> = Arc::new(ClaimsIdentityResolver::default());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let slugger: Arc<dyn SlugGenerator> = Arc::new(DefaultSlugGenerator);

    let services = ApplicationServices::new(
        group_repo,
        Arc::clone(&organization_repo),
        audit_log_repo,
        identity,
        cache,
        clock,
        Arc::clone(&slugger),
        config.page_limits(),
        config.cache_ttl(),
    );

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            cancel.cancel();
        })
    };

    if let Some(seed) = config.seed() {
        seed_organization(&services, organization_repo.as_ref(), slugger.as_ref(), seed, &cancel)
            .await?;
    }

    watcher.abort();
    tracing::info!("startup tasks complete");
    Ok(())
}

/// Creates the configured organization unless one with the same slug exists.
async fn seed_organization(
    services: &ApplicationServices,
    organizations: &dyn OrganizationRepository,
    slugger: &dyn SlugGenerator,
    seed: &SeedConfig,
    cancel: &CancellationToken,
) -> Result<()> {
    let slug = OrganizationSlug::new(slugger.slugify(&seed.organization_name))?;
    if organizations.find_by_slug(&slug, cancel).await?.is_some() {
        tracing::info!(slug = %slug, "seed organization already present");
        return Ok(());
    }

    let mut principal = Principal::anonymous().with_claim(claim_types::NAME, "system");
    if let Some(owner) = seed.owner_id {
        principal = principal.with_claim(claim_types::SUBJECT, owner.to_string());
    }
    let ctx = services.context(principal, None);

    let command = CreateOrganizationCommand {
        name: seed.organization_name.clone(),
        slug: Some(slug.to_string()),
        address: Default::default(),
        owner_id: seed.owner_id.map(Into::into),
        active: true,
    };

    let created = services
        .organizations
        .create(&ctx, command, cancel)
        .await
        .context("seeding organization")?;
    tracing::info!(id = %created.id, slug = %created.slug, "seeded organization");
    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received; cancelling startup tasks");
}
