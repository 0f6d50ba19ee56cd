//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Assemble the host router from the mounted collaborator routers
//! - Wire up middleware (request ID, tracing, limits, timeouts, panics)
//! - Serve until the termination signal, then drain with a deadline
//! - Own every connection task so the deadline can abort them

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use hyper::{body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer,
    trace::TraceLayer, ServiceBuilderExt,
};

use crate::config::HostConfig;
use crate::http::meta::{self, MetaState};
use crate::http::request::{request_id, MakeRequestUuid};
use crate::lifecycle::{AppInfo, LifecycleState, StateHandle};
use crate::observability::metrics;
use crate::routing::RouterHandle;

/// HTTP server for the mounted routers.
pub struct HttpServer {
    router: Router,
    state: StateHandle,
    drain_timeout: Duration,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(
        config: &HostConfig,
        info: AppInfo,
        routers: Vec<RouterHandle>,
        state: StateHandle,
    ) -> Self {
        let meta = MetaState {
            info,
            state: state.clone(),
        };
        let router = Self::build_router(config, routers, meta);

        Self {
            router,
            state,
            drain_timeout: Duration::from_secs(config.lifecycle.drain_timeout_secs),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &HostConfig, routers: Vec<RouterHandle>, meta: MetaState) -> Router {
        let mut router = Router::new();
        for handle in routers {
            router = handle.mount(router);
        }
        if config.meta.enabled {
            router = router.merge(meta::router(meta));
        }

        let permits = Arc::new(Semaphore::new(config.listener.max_concurrent_requests));

        router
            .layer(middleware::from_fn(track_requests))
            .layer(CatchPanicLayer::new())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(middleware::from_fn_with_state(permits, limit_concurrency))
            .layer(
                ServiceBuilder::new()
                    .set_x_request_id(MakeRequestUuid)
                    .layer(TraceLayer::new_for_http().make_span_with(request_span))
                    .propagate_x_request_id(),
            )
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `signal` resolves, then drain for at most the drain timeout.
    ///
    /// Each connection runs on a task owned by this call. Connections still
    /// open at the deadline are aborted, so no handler outlives `serve`.
    pub async fn serve<S>(self, listener: TcpListener, signal: S) -> io::Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let (draining_tx, draining_rx) = watch::channel(());
        let mut connections = JoinSet::new();
        tokio::pin!(signal);

        loop {
            let (stream, peer) = tokio::select! {
                _ = &mut signal => break,
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                        continue;
                    }
                },
            };
            while connections.try_join_next().is_some() {}
            connections.spawn(serve_connection(
                stream,
                peer,
                self.router.clone(),
                draining_rx.clone(),
            ));
        }
        drop(listener);

        self.state.advance(LifecycleState::Stopping);
        tracing::info!(
            connections = connections.len(),
            "Shutdown signal received, draining in-flight requests"
        );
        draining_tx.send_replace(());

        let drain = async { while connections.join_next().await.is_some() {} };
        if tokio::time::timeout(self.drain_timeout, drain).await.is_err() {
            tracing::warn!(
                timeout = ?self.drain_timeout,
                remaining = connections.len(),
                "Drain deadline reached, aborting in-flight requests"
            );
            connections.shutdown().await;
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Serve one HTTP/1 connection, closing it gracefully once draining starts.
async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    router: Router,
    mut draining: watch::Receiver<()>,
) {
    let service = service_fn(move |request: hyper::Request<Incoming>| {
        router.clone().oneshot(request)
    });
    let connection = http1::Builder::new()
        .timer(TokioTimer::new())
        .serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);

    let finished = tokio::select! {
        result = connection.as_mut() => Some(result),
        _ = draining.changed() => None,
    };
    let result = match finished {
        Some(result) => result,
        None => {
            connection.as_mut().graceful_shutdown();
            connection.await
        }
    };

    if let Err(e) = result {
        tracing::debug!(peer = %peer, error = %e, "Connection ended with an error");
    }
}

fn request_span(request: &Request) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request),
    )
}

async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}

/// Hold a permit for the lifetime of each request.
async fn limit_concurrency(
    State(permits): State<Arc<Semaphore>>,
    request: Request,
    next: Next,
) -> Response {
    let _permit = match permits.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => return StatusCode::SERVICE_UNAVAILABLE.into_response(),
    };
    next.run(request).await
}
