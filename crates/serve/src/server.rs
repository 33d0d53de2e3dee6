//! Server module for the Growthfy proxy

use crate::handlers::{
    handle_health_check, handle_search, handle_search_post, handle_trends,
    handle_trends_available, handle_user, handle_user_timeline, AppState,
};
use crate::ServerConfig;
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::get,
    Router,
};
use growthfy_core::{GrowthfyError, Result};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Growthfy HTTP proxy server
pub struct GrowthfyServer {
    config: ServerConfig,
    app: Router,
}

impl GrowthfyServer {
    /// Create a new server instance
    pub fn new(config: ServerConfig) -> Result<Self> {
        let app = create_app(&config)?;

        Ok(Self { config, app })
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| GrowthfyError::validation(format!("Invalid address {}: {}", addr, e)))?;

        let listener = tokio::net::TcpListener::bind(socket_addr)
            .await
            .map_err(|e| GrowthfyError::network(format!("Failed to bind to {}: {}", addr, e)))?;

        tracing::info!("Growthfy proxy listening on {}", addr);

        axum::serve(listener, self.app)
            .await
            .map_err(|e| GrowthfyError::network(format!("Server error: {}", e)))?;

        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Proxy routes
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handle_health_check))
        .route(
            "/api/twitter/search",
            get(handle_search).post(handle_search_post),
        )
        .route("/api/twitter/trends", get(handle_trends))
        .route("/api/twitter/trends/available", get(handle_trends_available))
        .route("/api/twitter/user", get(handle_user))
        .route("/api/twitter/user/timeline", get(handle_user_timeline))
}

/// Create the Axum application with middleware
pub fn create_app(config: &ServerConfig) -> Result<Router> {
    let state = AppState::new(config)?;

    let mut app = create_routes().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(config.max_request_size)),
    );

    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE]);

        app = app.layer(cors);
    }

    Ok(app)
}

/// Server builder for configuration
pub struct ServerBuilder {
    config: ServerConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.config.vendor.api_key = Some(key.into());
        self
    }

    /// Enable or disable CORS
    pub fn cors(mut self, enabled: bool) -> Self {
        self.config.cors_enabled = enabled;
        self
    }

    /// Set maximum request body size in bytes
    pub fn max_request_size(mut self, size: usize) -> Self {
        self.config.max_request_size = size;
        self
    }

    pub fn build(self) -> Result<GrowthfyServer> {
        GrowthfyServer::new(self.config)
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
