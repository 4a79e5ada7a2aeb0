//! Eternity demo host.
//!
//! Loads the config, then drives one character through its status, HUD and
//! footstep components with logging stand-ins for the engine services.

mod demo;
mod host;
mod logger;

use std::sync::Arc;

use eternity_core::ETERNITY_CONFIG;
use eternity_core::entity::ActorId;
use eternity_utils::TokioTimerManager;
use tokio_util::sync::CancellationToken;

use crate::demo::DemoCharacter;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    logger::init();

    let config = &*ETERNITY_CONFIG;
    log::info!(
        "Config loaded: crosshair {}px, {} footstep surfaces",
        config.crosshair.size,
        config.footstep.surfaces.len()
    );

    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Received Ctrl-C, stopping");
            ctrl_c_token.cancel();
        }
    });

    let timers = Arc::new(TokioTimerManager::current());
    let character = DemoCharacter::spawn(ActorId(1), "Wanderer", config, timers);
    character.run(config, &cancel_token).await;

    log::info!("Demo finished");
}
