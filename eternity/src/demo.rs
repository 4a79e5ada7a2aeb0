//! A single demo character running through the status, HUD and footstep code.

use std::sync::Arc;
use std::time::Duration;

use eternity_core::entity::{ActorId, EntityOwner};
use eternity_core::footstep::{FootstepNotify, FootstepOutcome, SurfaceType};
use eternity_core::hud::CrosshairHud;
use eternity_core::{EternityConfig, StatusComponent, StatusFlag, StatusFlags};
use eternity_utils::TimerScheduler;
use eternity_utils::math::{Vector2, Vector3};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::host::{FlatFloor, LogEffects, LogScreen, StandingMesh};

/// Slack added on top of a timed flag's duration before checking it expired.
const EXPIRY_GRACE: Duration = Duration::from_millis(100);

/// The components a playable character carries.
pub struct DemoCharacter {
    pub id: ActorId,
    pub status: Arc<StatusComponent>,
    pub crosshair: CrosshairHud,
    pub footstep: FootstepNotify,
}

impl DemoCharacter {
    /// Builds the character and subscribes log output to its status delegates.
    pub fn spawn(id: ActorId, name: &str, config: &EternityConfig, timers: Arc<dyn TimerScheduler>) -> Self {
        let status = Arc::new(
            StatusComponent::new()
                .with_owner(EntityOwner::new(id, name))
                .with_scheduler(timers),
        );

        let label = name.to_owned();
        status.on_initialized.add(move |_: &()| {
            log::info!("{label} is ready");
        });
        let label = name.to_owned();
        status.on_flag_added.add(move |mask: &StatusFlags| {
            log::info!("{label} gained [{}]", mask.describe());
        });
        let label = name.to_owned();
        status.on_flag_removed.add(move |mask: &StatusFlags| {
            log::info!("{label} lost [{}]", mask.describe());
        });

        Self {
            id,
            status,
            crosshair: CrosshairHud::from_config(&config.crosshair),
            footstep: FootstepNotify::from_config(&config.footstep),
        }
    }

    /// Runs the scripted scenario. Returns early if `cancel_token` fires.
    pub async fn run(&self, config: &EternityConfig, cancel_token: &CancellationToken) {
        self.status.initialize();

        match config.initial_flags() {
            Ok(initial) => self.status.add_flags(initial),
            Err(e) => log::warn!("Skipping initial flags: {e}"),
        }

        self.status
            .add_flags(StatusFlag::Injured | StatusFlag::Panicking);
        self.status.remove_flags(StatusFlags::INJURED);
        log::info!("Active: {}", self.status.describe_active_flags());

        let can_sneak = self
            .status
            .can_perform_action(StatusFlags::empty(), StatusFlags::DEAD | StatusFlags::IN_CINEMATIC);
        log::info!("Can sneak: {can_sneak}");

        let seconds = config.status.demo_timed_seconds;
        if self.status.add_timed_flag(StatusFlag::Hiding, seconds).is_some() {
            log::info!("Hiding for {seconds}s");
            tokio::select! {
                () = cancel_token.cancelled() => {
                    log::info!("Interrupted while hiding");
                    return;
                }
                () = sleep(Duration::from_secs_f32(seconds) + EXPIRY_GRACE) => {}
            }
            log::info!(
                "Still hiding after {seconds}s: {}",
                self.status.has_flag(StatusFlag::Hiding)
            );
        }

        let screen = LogScreen {
            viewport: Some(Vector2::new(1920.0, 1080.0)),
        };
        let segments = self.crosshair.draw_hud(&screen);
        log::debug!("Crosshair drew {segments} segments");

        let mesh = StandingMesh {
            owner: self.id,
            foot: Vector3::new(0.0, 0.0, 12.0),
        };
        let floor = FlatFloor {
            height: 0.0,
            surface: Some(SurfaceType(1)),
        };
        match self.footstep.notify(Some(&mesh), true, &floor, &LogEffects) {
            FootstepOutcome::Played(surface) => log::info!("Footstep on {surface}"),
            other => log::info!("Footstep produced nothing: {other:?}"),
        }

        self.status.clear_all_flags();
        log::info!("Final: {}", self.status.describe_active_flags());
    }
}
