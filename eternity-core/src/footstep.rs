//! Footstep effects driven by an animation notify.
//!
//! When the notify fires, a ray is traced straight down from the foot socket.
//! The physical surface it hits selects a sound and particle pair from a small
//! lookup table, which is then played at the hit location.

use std::fmt;

use eternity_utils::math::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::FootstepConfig;
use crate::entity::ActorId;

/// Physical surface classification reported by the host's physics materials.
///
/// `0` is the default surface; `1..=62` are project defined surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceType(pub u8);

impl SurfaceType {
    /// The surface assigned to materials without an explicit type.
    pub const DEFAULT: Self = Self(0);
    /// Highest project defined surface.
    pub const MAX: Self = Self(62);
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::DEFAULT {
            f.write_str("SurfaceType_Default")
        } else {
            write!(f, "SurfaceType{}", self.0)
        }
    }
}

/// One row of the footstep lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceData {
    /// Surface this row applies to.
    pub surface_type: SurfaceType,
    /// Sound asset to play, if any.
    #[serde(default)]
    pub sound: Option<String>,
    /// Particle system asset to spawn, if any.
    #[serde(default)]
    pub particles: Option<String>,
}

/// Result of a successful trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    /// World position of the hit.
    pub location: Vector3<f32>,
    /// Surface of the hit material, `None` if no physical material was returned.
    pub surface: Option<SurfaceType>,
}

/// The animated mesh that owns the foot socket.
pub trait SkeletalMesh {
    /// The actor owning this mesh, if it is attached to one.
    fn owner(&self) -> Option<ActorId>;

    /// World position of the named socket.
    fn socket_location(&self, socket: &str) -> Vector3<f32>;
}

/// Spatial query service.
pub trait RayCaster {
    /// Returns the first blocking hit between `start` and `end`, skipping `ignored`.
    fn line_trace(&self, start: Vector3<f32>, end: Vector3<f32>, ignored: ActorId) -> Option<TraceHit>;
}

/// Audio and particle playback service.
pub trait EffectSpawner {
    /// Plays a sound at a world position.
    fn play_sound_at(&self, sound: &str, location: Vector3<f32>);

    /// Spawns a particle system at a world position.
    fn spawn_particles_at(&self, particles: &str, location: Vector3<f32>);
}

/// What a footstep notify ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FootstepOutcome {
    /// Mesh, animation or owner missing; nothing was traced.
    Skipped,
    /// The trace hit nothing.
    NoHit,
    /// The trace hit something without a physical material.
    NoMaterial,
    /// No table row matches the surface.
    NoMatch(SurfaceType),
    /// The row for this surface was played.
    Played(SurfaceType),
}

/// Plays surface dependent footstep effects.
#[derive(Debug, Clone, PartialEq)]
pub struct FootstepNotify {
    /// Socket the trace starts from.
    pub foot_socket: String,
    /// How far below the socket the trace reaches.
    pub trace_distance: f32,
    /// Lookup table, searched front to back.
    pub surfaces: Vec<SurfaceData>,
}

impl FootstepNotify {
    /// Default socket name.
    pub const DEFAULT_SOCKET: &'static str = "foot_l_socket";
    /// Default trace length below the socket.
    pub const DEFAULT_TRACE_DISTANCE: f32 = 50.0;

    /// Creates a notify with the default trace length.
    #[must_use]
    pub fn new(foot_socket: impl Into<String>, surfaces: Vec<SurfaceData>) -> Self {
        Self {
            foot_socket: foot_socket.into(),
            trace_distance: Self::DEFAULT_TRACE_DISTANCE,
            surfaces,
        }
    }

    /// Creates a notify from the `footstep` config section.
    #[must_use]
    pub fn from_config(config: &FootstepConfig) -> Self {
        Self {
            foot_socket: config.foot_socket.clone(),
            trace_distance: config.trace_distance,
            surfaces: config.surfaces.clone(),
        }
    }

    /// The first table row for `surface`.
    #[must_use]
    pub fn lookup(&self, surface: SurfaceType) -> Option<&SurfaceData> {
        self.surfaces.iter().find(|row| row.surface_type == surface)
    }

    /// Handles the animation notify.
    ///
    /// `mesh` and `animation_present` mirror the host passing a possibly
    /// missing mesh and animation; either missing skips the footstep.
    pub fn notify(
        &self,
        mesh: Option<&dyn SkeletalMesh>,
        animation_present: bool,
        tracer: &dyn RayCaster,
        spawner: &dyn EffectSpawner,
    ) -> FootstepOutcome {
        let Some(mesh) = mesh else {
            return FootstepOutcome::Skipped;
        };
        if !animation_present {
            return FootstepOutcome::Skipped;
        }
        self.trace_and_play(mesh, tracer, spawner)
    }

    fn trace_and_play(
        &self,
        mesh: &dyn SkeletalMesh,
        tracer: &dyn RayCaster,
        spawner: &dyn EffectSpawner,
    ) -> FootstepOutcome {
        let Some(owner) = mesh.owner() else {
            return FootstepOutcome::Skipped;
        };

        let start = mesh.socket_location(&self.foot_socket);
        let end = start - Vector3::new(0.0, 0.0, self.trace_distance);

        let Some(hit) = tracer.line_trace(start, end, owner) else {
            return FootstepOutcome::NoHit;
        };
        let Some(surface) = hit.surface else {
            return FootstepOutcome::NoMaterial;
        };

        let Some(row) = self.lookup(surface) else {
            log::trace!("No footstep effects for {surface} under {owner}");
            return FootstepOutcome::NoMatch(surface);
        };

        if let Some(sound) = &row.sound {
            spawner.play_sound_at(sound, hit.location);
        }
        if let Some(particles) = &row.particles {
            spawner.spawn_particles_at(particles, hit.location);
        }
        FootstepOutcome::Played(surface)
    }
}
