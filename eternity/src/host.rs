//! Stand-in host services that log what a real engine would render or play.

use eternity_core::entity::ActorId;
use eternity_core::footstep::{EffectSpawner, RayCaster, SkeletalMesh, SurfaceType, TraceHit};
use eternity_core::hud::{LinearColor, ScreenDrawer};
use eternity_utils::math::{Vector2, Vector3};

/// A fixed size screen that logs every line drawn on it.
pub struct LogScreen {
    pub viewport: Option<Vector2<f32>>,
}

impl ScreenDrawer for LogScreen {
    fn viewport_size(&self) -> Option<Vector2<f32>> {
        self.viewport
    }

    fn draw_line(&self, start: Vector2<f32>, end: Vector2<f32>, color: LinearColor, thickness: f32) {
        tracing::debug!(?start, ?end, ?color, thickness, "draw_line");
    }
}

/// A mesh standing at a fixed position with its foot socket above the origin.
pub struct StandingMesh {
    pub owner: ActorId,
    pub foot: Vector3<f32>,
}

impl SkeletalMesh for StandingMesh {
    fn owner(&self) -> Option<ActorId> {
        Some(self.owner)
    }

    fn socket_location(&self, _socket: &str) -> Vector3<f32> {
        self.foot
    }
}

/// An infinite flat floor at `z = height` made of a single surface.
pub struct FlatFloor {
    pub height: f32,
    pub surface: Option<SurfaceType>,
}

impl RayCaster for FlatFloor {
    fn line_trace(&self, start: Vector3<f32>, end: Vector3<f32>, _ignored: ActorId) -> Option<TraceHit> {
        let (top, bottom) = if start.z >= end.z { (start, end) } else { (end, start) };
        if self.height > top.z || self.height < bottom.z {
            return None;
        }
        Some(TraceHit {
            location: Vector3::new(start.x, start.y, self.height),
            surface: self.surface,
        })
    }
}

/// Logs sounds and particle systems instead of playing them.
pub struct LogEffects;

impl EffectSpawner for LogEffects {
    fn play_sound_at(&self, sound: &str, location: Vector3<f32>) {
        tracing::info!(sound, ?location, "Playing sound");
    }

    fn spawn_particles_at(&self, particles: &str, location: Vector3<f32>) {
        tracing::info!(particles, ?location, "Spawning particles");
    }
}
