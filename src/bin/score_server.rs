use std::{env, sync::Arc};

use tracing::info;

use snake_arcade::config::resolve_server_addr;
use snake_arcade::server::{self, MemoryScoreStore};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    snake_arcade::init_tracing("snake_arcade=info,score_server=info,tower_http=info");

    let addr = resolve_server_addr(|key| env::var(key).ok());
    let app = server::router(Arc::new(MemoryScoreStore::new()));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "score server listening");
    axum::serve(listener, app).await
}
