//! Headless falling-block client.
//!
//! Composition root that assembles a [`Game`], drives it with a periodic
//! mover fed by a random shape factory, and attaches a console subscriber that
//! polls the state. After the configured run time the game is shut down and
//! the final grid is printed to stdout, followed by the snapshot as JSON.
//!
//! ```bash
//! TETRIS_TICK_MS=100 TETRIS_RUN_MS=3000 RUST_LOG=debug cargo run -p tetris-client
//! ```

mod config;
mod console;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use tetris_core::RandomShapeFactory;
use tetris_runtime::{FileGridLogger, Game};

use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    info!(
        dimension = %config.game.dimension,
        tick_ms = config.tick.as_millis() as u64,
        run_ms = config.run_for.as_millis() as u64,
        seed = ?config.seed,
        "starting tetris client"
    );

    let mut builder = Game::builder().config(config.game);
    if let Some(path) = &config.dump_path {
        info!(path = %path.display(), "grid dump enabled");
        builder = builder.grid_logger(Arc::new(FileGridLogger::new(path)));
    }
    let game = builder.build();

    let factory = match config.seed {
        Some(seed) => RandomShapeFactory::with_seed(seed),
        None => RandomShapeFactory::new(),
    };
    let mover = game
        .spawn_mover("mover", factory, config.mover())
        .context("failed to start periodic mover")?;
    let console = console::spawn(
        game.subscribe("console")
            .context("failed to subscribe console")?,
        config.poll,
    );

    tokio::select! {
        _ = tokio::time::sleep(config.run_for) => {}
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }

    game.shutdown();
    mover.join().await.context("periodic mover failed")?;
    let observed = console.await.context("console subscriber failed")?;

    let snapshot = game.state().snapshot();
    info!(revision = snapshot.revision, observed, "game finished");
    print!("{}", snapshot.dump());
    println!(
        "{}",
        serde_json::to_string(&snapshot).context("failed to encode snapshot")?
    );

    Ok(())
}
