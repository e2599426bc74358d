use std::{io, process, sync::Arc};

use gambit::{
    application::{
        booking::BookingService,
        content::BlogService,
        error::AppError,
        landing::{LandingService, SiteIdentity},
        render::markdown_renderer,
        site::{SiteService, export_site},
    },
    config,
    domain::error::DomainError,
    infra::{
        content::load_documents,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use time::OffsetDateTime;
use tokio::{net::TcpListener, sync::oneshot, task::JoinError};
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
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Index(_) => run_index(settings).await,
        config::Command::Show(args) => run_show(settings, args).await,
        config::Command::Export(args) => run_export(settings, args).await,
    }
}

async fn build_site(settings: &config::Settings) -> Result<SiteService, AppError> {
    let documents = load_documents(&settings.content.directory).await?;
    let organization = settings.site.organization.clone();
    let link = settings.messaging.link();

    let identity = SiteIdentity {
        organization: organization.clone(),
        tagline: settings.site.tagline.clone(),
        contact_phone: settings.site.contact_phone.clone(),
        contact_email: settings.site.contact_email.clone(),
        contact_address: settings.site.contact_address.clone(),
    };

    let blog = BlogService::new(Arc::new(documents), markdown_renderer(), organization.clone());
    let booking = BookingService::new(link.clone(), organization);
    let landing = LandingService::new(identity, link);

    Ok(SiteService::new(
        Arc::new(blog),
        Arc::new(booking),
        Arc::new(landing),
        settings.site.base_url.as_str(),
    ))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let site = build_site(&settings).await?;
    let state = HttpState {
        site: Arc::new(site),
    };
    serve_http(&settings, state).await
}

async fn run_index(settings: config::Settings) -> Result<(), AppError> {
    let site = build_site(&settings).await?;
    let summaries = site.blog().index()?;
    print_json(&summaries)
}

async fn run_show(settings: config::Settings, args: config::ShowArgs) -> Result<(), AppError> {
    let site = build_site(&settings).await?;
    let today = OffsetDateTime::now_utc().date();
    let document = site
        .blog()
        .find(&args.identifier, today)
        .ok_or_else(|| DomainError::not_found("post", args.identifier.clone()))?;
    print_json(&document)
}

async fn run_export(settings: config::Settings, args: config::ExportArgs) -> Result<(), AppError> {
    let site = build_site(&settings).await?;
    let today = OffsetDateTime::now_utc().date();
    let written = export_site(&site, &args.output, today).await?;
    info!(
        target = "gambit::export",
        output = %args.output.display(),
        files = written,
        "export complete"
    );
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let encoded = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::unexpected(format!("failed to encode output: {err}")))?;
    println!("{encoded}");
    Ok(())
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);
    let listener = TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "gambit::serve",
        addr = %settings.server.addr,
        "listening"
    );

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => return server_outcome(joined),
        () = shutdown_signal() => {}
    }

    info!(target = "gambit::serve", "shutdown requested; draining connections");
    let _ = stop_tx.send(());

    match tokio::time::timeout(settings.server.graceful_shutdown, &mut server).await {
        Ok(joined) => server_outcome(joined),
        Err(_) => {
            warn!(
                target = "gambit::serve",
                timeout_secs = settings.server.graceful_shutdown.as_secs(),
                "graceful shutdown timed out; closing remaining connections"
            );
            server.abort();
            Ok(())
        }
    }
}

fn server_outcome(joined: Result<io::Result<()>, JoinError>) -> Result<(), AppError> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(AppError::unexpected(format!("server error: {err}"))),
        Err(err) => Err(AppError::unexpected(format!("server task failed: {err}"))),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(
            target = "gambit::serve",
            error = %err,
            "failed to listen for shutdown signal"
        );
        std::future::pending::<()>().await;
    }
}
