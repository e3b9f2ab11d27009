use super::error::{bad_request, error_response};
use super::http::{HttpMethod, HttpRequest, HttpResponse};
use super::routes::build_router;
use super::router::Router;
use crate::libs::config::ServerConfig;
use crate::libs::error::AppError;
use crate::services::Services;
use anyhow::Result;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

struct ServerState {
    services: Services,
    router: Router,
    api_token: Option<String>,
}

impl ServerState {
    fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        if let Some(expected) = &self.api_token {
            if request.method != HttpMethod::OPTIONS && request.bearer_token() != Some(expected.as_str()) {
                warn!(path = %request.path, "rejected request without a valid token");
                return error_response(&AppError::unauthorized("A valid bearer token is required"));
            }
        }
        self.router.handle(&self.services, request)
    }
}

/// JSON REST front end over [`Services`].
///
/// Each connection carries one request and is served on its own task; the
/// blocking service call runs on the blocking pool.
#[derive(Clone)]
pub struct Server {
    state: Arc<ServerState>,
}

impl Server {
    pub fn new(services: Services, api_token: Option<String>) -> Self {
        Server {
            state: Arc::new(ServerState {
                services,
                router: build_router(),
                api_token: api_token.filter(|t| !t.is_empty()),
            }),
        }
    }

    /// Binds the configured address and serves until Ctrl-C.
    pub async fn serve(services: Services, config: &ServerConfig) -> Result<()> {
        let listener = TcpListener::bind(config.address()).await?;
        let server = Server::new(services, config.api_token.clone());

        tokio::select! {
            result = server.run(listener) => result,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                Ok(())
            }
        }
    }

    /// Accepts connections on `listener` forever.
    pub async fn run(&self, listener: TcpListener) -> Result<()> {
        info!(address = %listener.local_addr()?, "REST server listening");

        loop {
            let (stream, peer) = listener.accept().await?;
            debug!(%peer, "connection accepted");
            let state = self.state.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, state).await {
                    warn!(%peer, error = %e, "connection failed");
                }
            });
        }
    }
}

async fn handle_connection(mut stream: TcpStream, state: Arc<ServerState>) -> Result<()> {
    let request = match HttpRequest::parse(&mut stream).await {
        Ok(request) => request,
        Err(e) => return bad_request(e.to_string()).send(&mut stream).await,
    };

    let method = request.method;
    let path = request.path.clone();
    let response = match tokio::task::spawn_blocking(move || state.dispatch(request)).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "request handler panicked");
            error_response(&AppError::Internal(e.to_string()))
        }
    };

    info!(method = method.as_str(), path = %path, status = response.status_code(), "request served");
    response.send(&mut stream).await
}
