use clap::Parser;
use flog_core::config::FlogConfig;
use flog_core::{BookingWindow, Clock, SystemClock};
use flog_golfer::{GolferClient, ReservationService};
use flog_queue::{PendingQueue, QueueStore};
use flog_scheduler::{Booker, DailySchedule, SweepEngine, Sweeper};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod app;
mod http;

/// Queues golf tee-time requests and books them the moment they open.
#[derive(Debug, Parser)]
#[command(name = "flog", version)]
struct Cli {
    /// Config file (default: $FLOG_CONFIG, then ./flog.toml).
    #[arg(long, env = "FLOG_CONFIG")]
    config: Option<String>,
    /// Reservation site account email.
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    pass: Option<String>,
    /// Address to listen on.
    #[arg(long)]
    bind: Option<String>,
    /// File the pending queue is saved to.
    #[arg(long)]
    file: Option<String>,
}

impl Cli {
    /// Flags win over the config file and FLOG_* env vars.
    fn apply(self, config: &mut FlogConfig) {
        if let Some(user) = self.user {
            config.golfer.username = Some(user);
        }
        if let Some(pass) = self.pass {
            config.golfer.password = Some(pass);
        }
        if let Some(bind) = self.bind {
            config.gateway.bind = bind;
        }
        if let Some(file) = self.file {
            config.queue.path = file;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "flog=info,flog_scheduler=info,flog_queue=info,flog_golfer=info,tower_http=debug"
                    .into()
            }),
        )
        .init();

    let cli = Cli::parse();
    let mut config = FlogConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    // a queue file from another format version ends startup here
    let queue = Arc::new(PendingQueue::open(QueueStore::new(&config.queue.path))?);

    info!(course_id = config.golfer.course_id, "logging in to reservation site");
    let service: Arc<dyn ReservationService> = Arc::new(GolferClient::connect(&config.golfer).await?);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let window = BookingWindow::from_config(&config.booking);
    let schedule = DailySchedule::new(config.booking.sweep_hour, config.booking.sweep_minute)?;

    let sweeper = Arc::new(Sweeper::new(
        queue.clone(),
        Booker::new(service.clone()),
        window,
        clock.clone(),
    ));
    let (engine, trigger) = SweepEngine::new(sweeper, schedule, clock.clone());
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let engine_task = tokio::spawn(engine.run(shutdown_rx));

    let addr: SocketAddr = config.gateway.bind.parse()?;
    let state = Arc::new(app::AppState {
        config,
        queue,
        service,
        window,
        schedule,
        clock,
        trigger,
    });
    let router = app::build_router(state);

    info!("flog listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // let an in-flight sweep finish before exiting
    let _ = shutdown_tx.send(true);
    engine_task.await?;
    info!("flog stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
