use super::{connect, load_config};
use anyhow::Result;
use depot_server::state::AppState;
use std::path::Path;
use std::sync::Arc;

pub fn run(root: &Path, api_url: Option<&str>, port: Option<u16>) -> Result<()> {
    let config = load_config(root, api_url)?;
    let port = port.unwrap_or(config.server.port);

    // The blocking HTTP client must be built and dropped outside the runtime,
    // so this handle outlives it.
    let backend = Arc::new(connect(&config)?);
    let base_url = backend.base_url().to_string();
    let state = AppState::new(config, backend.clone());

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!("{}", banner(actual_port, &base_url));

        tokio::select! {
            res = depot_server::serve_on(state, listener) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    });
    drop(rt);
    drop(backend);
    result
}

fn banner(port: u16, base_url: &str) -> String {
    format!("depot dashboard listening on http://localhost:{port} (API {base_url})")
}
