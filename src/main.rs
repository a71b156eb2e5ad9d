use std::{process, sync::Arc, time::Duration};

use pagewright::{
    application::{
        error::AppError,
        frame::SiteFrameService,
        render::PageComposer,
        repos::{ContentRepo, WebsiteSettingsRepo},
        site::SiteRenderer,
        slugs::SlugService,
    },
    cache::{CacheConfig, MemoryCacheStore, PageCache},
    config,
    domain::slug::derive_slug,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HttpState},
        memory::MemoryRepositories,
        telemetry,
        templates::{MiniJinjaRenderer, StaticPageDirectory, templates_dir},
    },
};
use tokio::{sync::watch, try_join};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) =
        config::load_with_cli().map_err(|err| AppError::from(InfraError::from(err)))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    if let config::Command::Slug(args) = &command {
        println!("{}", derive_slug(&args.title));
        return Ok(());
    }

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Render(args) => run_render(settings, &args.slug).await,
        config::Command::Slug(_) => Ok(()),
    }
}

struct ApplicationContext {
    renderer: Arc<SiteRenderer>,
    slugs: Arc<SlugService>,
    db: Option<Arc<PostgresRepositories>>,
}

struct Repositories {
    content: Arc<dyn ContentRepo>,
    settings: Arc<dyn WebsiteSettingsRepo>,
    db: Option<Arc<PostgresRepositories>>,
}

async fn init_repositories(settings: &config::Settings) -> Result<Repositories, AppError> {
    if let Some(url) = settings.database.url.as_deref() {
        let pool = PostgresRepositories::connect(url, settings.database.max_connections.get())
            .await
            .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;
        PostgresRepositories::run_migrations(&pool)
            .await
            .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

        info!("content served from postgres");
        let db = Arc::new(PostgresRepositories::new(pool));
        return Ok(Repositories {
            content: db.clone(),
            settings: db.clone(),
            db: Some(db),
        });
    }

    let memory = match settings.content.seed_file.as_deref() {
        Some(path) => {
            let repos = MemoryRepositories::load_seed_file(path).await?;
            info!(seed_file = %path.display(), "content loaded into memory");
            repos
        }
        None => {
            warn!("no database url or content seed file configured; serving an empty site");
            MemoryRepositories::new()
        }
    };
    let memory = Arc::new(memory);

    Ok(Repositories {
        content: memory.clone(),
        settings: memory,
        db: None,
    })
}

async fn build_application_context(
    settings: &config::Settings,
) -> Result<ApplicationContext, AppError> {
    let Repositories {
        content,
        settings: website_settings,
        db,
    } = init_repositories(settings).await?;

    let templates = templates_dir(&settings.website.root);
    let composer = PageComposer::new(
        content.clone(),
        website_settings.clone(),
        SiteFrameService::new(website_settings, settings.website.default_brand.clone()),
        Arc::new(StaticPageDirectory::new(&templates)),
        Arc::new(MiniJinjaRenderer::new(templates)),
        settings.website.template_map.clone(),
    );

    let cache_config = CacheConfig::from(&settings.cache);
    let store = Arc::new(MemoryCacheStore::new(&cache_config));
    let cache = PageCache::new(store, cache_config);

    Ok(ApplicationContext {
        renderer: Arc::new(SiteRenderer::new(composer, cache.clone())),
        slugs: Arc::new(SlugService::new(content, cache)),
        db,
    })
}

async fn run_render(settings: config::Settings, slug: &str) -> Result<(), AppError> {
    let app = build_application_context(&settings).await?;
    let page = app.renderer.render(slug).await;
    info!(slug, status = page.status.as_u16(), "page rendered");
    println!("{}", page.body);
    Ok(())
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let app = build_application_context(&settings).await?;

    let http_state = HttpState {
        renderer: app.renderer.clone(),
    };
    let admin_state = AdminState {
        renderer: app.renderer,
        slugs: app.slugs,
        db: app.db,
    };

    serve_http(&settings, http_state, admin_state).await
}

async fn serve_http(
    settings: &config::Settings,
    http_state: HttpState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_router(http_state);
    let admin_router = http::build_admin_router(admin_state);

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        public_addr = %settings.server.public_addr,
        admin_addr = %settings.server.admin_addr,
        "listening"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for shutdown signal");
            return;
        }
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let public_server = axum::serve(public_listener, public_router.into_make_service())
        .with_graceful_shutdown(shutdown_requested(shutdown_rx.clone()));
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service())
        .with_graceful_shutdown(shutdown_requested(shutdown_rx.clone()));

    let grace = settings.server.graceful_shutdown;
    tokio::select! {
        result = async { try_join!(public_server, admin_server) } => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        () = shutdown_deadline(shutdown_rx, grace) => {
            warn!(grace_seconds = grace.as_secs(), "graceful shutdown timed out");
        }
    }

    Ok(())
}

async fn shutdown_requested(mut rx: watch::Receiver<bool>) {
    // Sender gone without a signal: keep serving.
    if rx.wait_for(|requested| *requested).await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn shutdown_deadline(rx: watch::Receiver<bool>, grace: Duration) {
    shutdown_requested(rx).await;
    tokio::time::sleep(grace).await;
}
