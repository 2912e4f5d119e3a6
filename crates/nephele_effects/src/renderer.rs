//! # The Renderer Seam
//!
//! Effects never rasterize. They compute attribute buffers and hand them to
//! whatever sits behind [`SceneRenderer`]: a GPU backend in the shipping
//! host, the [`RecordingRenderer`] in tests and headless runs.
//!
//! ## Contract
//!
//! - Handles are issued by the renderer and owned by exactly one component.
//! - A submission replaces the previous buffer wholesale; there is no
//!   partial or incremental path.
//! - Release is synchronous. After `release_*` returns, the handle is dead.

use std::collections::HashMap;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use parking_lot::Mutex;

use nephele_shared::{Rgba, Rgba8, Vec2, Vec3};

/// One camera-facing sprite in a particle batch.
///
/// Laid out for direct upload: eight floats, no padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointSprite {
    /// World position.
    pub position: Vec3,
    /// World-space edge length.
    pub size: f32,
    /// Tint and opacity.
    pub color: Rgba,
}

/// Attribute buffers of one submitted mesh.
///
/// The component owns an instance and rewrites it in place every tick, so
/// steady-state regeneration allocates nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Texture coordinates.
    pub uvs: Vec<Vec2>,
    /// Per-vertex colors, alpha carries the fade.
    pub colors: Vec<Rgba8>,
    /// Triangle indices, u32 because dense lattices exceed u16.
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Empties all buffers, keeping their capacity.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.colors.clear();
        self.indices.clear();
    }

    /// Number of vertices currently held.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of whole triangles currently held.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Handle to a renderer-owned particle batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParticleBufferId(u32);

impl ParticleBufferId {
    /// Raw id value, for logging.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Handle to a renderer-owned mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(u32);

impl MeshId {
    /// Raw id value, for logging.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Axis-aligned bounding box of submitted geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Smallest corner.
    pub min: Vec3,
    /// Largest corner.
    pub max: Vec3,
}

impl Aabb {
    /// Tightest box around a point set. `None` for an empty set.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let mut aabb = Self {
            min: first,
            max: first,
        };
        for p in &points[1..] {
            aabb.min.x = aabb.min.x.min(p.x);
            aabb.min.y = aabb.min.y.min(p.y);
            aabb.min.z = aabb.min.z.min(p.z);
            aabb.max.x = aabb.max.x.max(p.x);
            aabb.max.y = aabb.max.y.max(p.y);
            aabb.max.z = aabb.max.z.max(p.z);
        }
        Some(aabb)
    }

    /// Whether a point lies inside or on the box.
    #[must_use]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

/// The rendering collaborator every effect component talks to.
///
/// Object-safe so a stage can own heterogeneous components over one
/// renderer instance.
pub trait SceneRenderer {
    /// Reserves a particle batch of fixed capacity.
    ///
    /// `emission_extents` is a shape hint for renderer-side emitter setup;
    /// it never influences the positions the component submits.
    fn allocate_particles(&mut self, capacity: usize, emission_extents: Vec3) -> ParticleBufferId;

    /// Replaces the contents of a particle batch.
    fn submit_particles(&mut self, id: ParticleBufferId, sprites: &[PointSprite]);

    /// Returns a particle batch to the renderer.
    fn release_particles(&mut self, id: ParticleBufferId);

    /// Reserves a mesh slot.
    fn allocate_mesh(&mut self) -> MeshId;

    /// Replaces the geometry of a mesh.
    fn submit_mesh(&mut self, id: MeshId, buffers: &MeshBuffers);

    /// Rebuilds the bounding volume from the last submitted positions.
    fn recompute_bounds(&mut self, id: MeshId);

    /// Returns a mesh to the renderer.
    fn release_mesh(&mut self, id: MeshId);
}

/// Capture of one particle batch inside the recording renderer.
#[derive(Clone, Debug, Default)]
pub struct ParticleCapture {
    /// Capacity requested at allocation.
    pub capacity: usize,
    /// Emission shape hint passed at allocation.
    pub emission_extents: Vec3,
    /// The most recently submitted sprites.
    pub sprites: Vec<PointSprite>,
    /// How many submissions this batch has received.
    pub submit_count: u64,
}

/// Capture of one mesh inside the recording renderer.
#[derive(Clone, Debug, Default)]
pub struct MeshCapture {
    /// The most recently submitted buffers.
    pub buffers: MeshBuffers,
    /// Bounds computed at the last `recompute_bounds` call.
    pub bounds: Option<Aabb>,
    /// How many submissions this mesh has received.
    pub submit_count: u64,
    /// How many times bounds were recomputed.
    pub bounds_recomputes: u64,
}

#[derive(Default)]
struct RecorderState {
    next_id: u32,
    particles: HashMap<u32, ParticleCapture>,
    meshes: HashMap<u32, MeshCapture>,
    released_particles: u64,
    released_meshes: u64,
}

/// Headless [`SceneRenderer`] that retains the last submission per handle.
///
/// Captures live behind a shared handle so they can be inspected while a
/// stage owns the renderer itself:
///
/// ```rust,ignore
/// let renderer = RecordingRenderer::new();
/// let captures = renderer.captures();
/// let stage = Stage::new(Box::new(renderer), observer);
/// // ... tick ...
/// assert_eq!(captures.live_particle_batches(), 1);
/// ```
#[derive(Default)]
pub struct RecordingRenderer {
    state: Arc<Mutex<RecorderState>>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a capture handle onto this recorder.
    #[must_use]
    pub fn captures(&self) -> CaptureHandle {
        CaptureHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl SceneRenderer for RecordingRenderer {
    fn allocate_particles(&mut self, capacity: usize, emission_extents: Vec3) -> ParticleBufferId {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.particles.insert(
            id,
            ParticleCapture {
                capacity,
                emission_extents,
                sprites: Vec::new(),
                submit_count: 0,
            },
        );
        tracing::debug!(id, capacity, "particle batch allocated");
        ParticleBufferId(id)
    }

    fn submit_particles(&mut self, id: ParticleBufferId, sprites: &[PointSprite]) {
        let mut state = self.state.lock();
        if let Some(capture) = state.particles.get_mut(&id.0) {
            capture.sprites.clear();
            capture.sprites.extend_from_slice(sprites);
            capture.submit_count += 1;
        }
    }

    fn release_particles(&mut self, id: ParticleBufferId) {
        let mut state = self.state.lock();
        if state.particles.remove(&id.0).is_some() {
            state.released_particles += 1;
            tracing::debug!(id = id.0, "particle batch released");
        }
    }

    fn allocate_mesh(&mut self) -> MeshId {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.meshes.insert(id, MeshCapture::default());
        tracing::debug!(id, "mesh allocated");
        MeshId(id)
    }

    fn submit_mesh(&mut self, id: MeshId, buffers: &MeshBuffers) {
        let mut state = self.state.lock();
        if let Some(capture) = state.meshes.get_mut(&id.0) {
            capture.buffers.clone_from(buffers);
            capture.submit_count += 1;
        }
    }

    fn recompute_bounds(&mut self, id: MeshId) {
        let mut state = self.state.lock();
        if let Some(capture) = state.meshes.get_mut(&id.0) {
            capture.bounds = Aabb::from_points(&capture.buffers.positions);
            capture.bounds_recomputes += 1;
        }
    }

    fn release_mesh(&mut self, id: MeshId) {
        let mut state = self.state.lock();
        if state.meshes.remove(&id.0).is_some() {
            state.released_meshes += 1;
            tracing::debug!(id = id.0, "mesh released");
        }
    }
}

/// Read-side handle onto a [`RecordingRenderer`]'s captures.
///
/// Cheap to clone; holds the recorder's state alive even after the
/// renderer itself is dropped.
#[derive(Clone)]
pub struct CaptureHandle {
    state: Arc<Mutex<RecorderState>>,
}

impl CaptureHandle {
    /// Number of particle batches currently allocated.
    #[must_use]
    pub fn live_particle_batches(&self) -> usize {
        self.state.lock().particles.len()
    }

    /// Number of meshes currently allocated.
    #[must_use]
    pub fn live_meshes(&self) -> usize {
        self.state.lock().meshes.len()
    }

    /// Total release calls that hit a live particle batch.
    #[must_use]
    pub fn released_particle_batches(&self) -> u64 {
        self.state.lock().released_particles
    }

    /// Total release calls that hit a live mesh.
    #[must_use]
    pub fn released_meshes(&self) -> u64 {
        self.state.lock().released_meshes
    }

    /// Snapshot of one particle batch, if it is live.
    #[must_use]
    pub fn particle_capture(&self, id: ParticleBufferId) -> Option<ParticleCapture> {
        self.state.lock().particles.get(&id.0).cloned()
    }

    /// Snapshot of one mesh, if it is live.
    #[must_use]
    pub fn mesh_capture(&self, id: MeshId) -> Option<MeshCapture> {
        self.state.lock().meshes.get(&id.0).cloned()
    }

    /// Snapshot of the lone live particle batch, for single-effect tests.
    #[must_use]
    pub fn only_particle_capture(&self) -> Option<ParticleCapture> {
        let state = self.state.lock();
        if state.particles.len() == 1 {
            state.particles.values().next().cloned()
        } else {
            None
        }
    }

    /// Snapshots of every live particle batch, in allocation order.
    #[must_use]
    pub fn particle_captures(&self) -> Vec<ParticleCapture> {
        let state = self.state.lock();
        let mut entries: Vec<_> = state.particles.iter().collect();
        entries.sort_by_key(|(id, _)| **id);
        entries.into_iter().map(|(_, c)| c.clone()).collect()
    }

    /// Snapshots of every live mesh, in allocation order.
    #[must_use]
    pub fn mesh_captures(&self) -> Vec<MeshCapture> {
        let state = self.state.lock();
        let mut entries: Vec<_> = state.meshes.iter().collect();
        entries.sort_by_key(|(id, _)| **id);
        entries.into_iter().map(|(_, c)| c.clone()).collect()
    }

    /// Snapshot of the lone live mesh, for single-effect tests.
    #[must_use]
    pub fn only_mesh_capture(&self) -> Option<MeshCapture> {
        let state = self.state.lock();
        if state.meshes.len() == 1 {
            state.meshes.values().next().cloned()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_submit_release_roundtrip() {
        let mut renderer = RecordingRenderer::new();
        let captures = renderer.captures();

        let id = renderer.allocate_particles(4, Vec3::splat(10.0));
        assert_eq!(captures.live_particle_batches(), 1);

        let sprites = [PointSprite::default(); 4];
        renderer.submit_particles(id, &sprites);
        let capture = captures.particle_capture(id).unwrap();
        assert_eq!(capture.sprites.len(), 4);
        assert_eq!(capture.capacity, 4);
        assert_eq!(capture.submit_count, 1);
        assert_eq!(capture.emission_extents, Vec3::splat(10.0));

        renderer.release_particles(id);
        assert_eq!(captures.live_particle_batches(), 0);
        assert_eq!(captures.released_particle_batches(), 1);
        assert!(captures.particle_capture(id).is_none());
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut renderer = RecordingRenderer::new();
        let captures = renderer.captures();

        let id = renderer.allocate_particles(1, Vec3::ZERO);
        renderer.release_particles(id);
        renderer.release_particles(id);
        assert_eq!(captures.released_particle_batches(), 1);
    }

    #[test]
    fn test_mesh_bounds_follow_positions() {
        let mut renderer = RecordingRenderer::new();
        let captures = renderer.captures();

        let id = renderer.allocate_mesh();
        let mut buffers = MeshBuffers::default();
        buffers.positions.push(Vec3::new(-1.0, 0.0, 2.0));
        buffers.positions.push(Vec3::new(3.0, -2.0, 5.0));
        renderer.submit_mesh(id, &buffers);
        renderer.recompute_bounds(id);

        let capture = captures.mesh_capture(id).unwrap();
        let bounds = capture.bounds.unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 2.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 0.0, 5.0));
        assert!(bounds.contains(Vec3::new(0.0, -1.0, 3.0)));
        assert!(!bounds.contains(Vec3::new(4.0, 0.0, 3.0)));
    }

    #[test]
    fn test_point_sprite_is_pod() {
        let sprite = PointSprite {
            position: Vec3::new(1.0, 2.0, 3.0),
            size: 0.5,
            color: Rgba::WHITE,
        };
        let bytes: &[u8] = bytemuck::bytes_of(&sprite);
        assert_eq!(bytes.len(), 32); // 8 floats, no padding
    }

    #[test]
    fn test_captures_outlive_renderer() {
        let captures = {
            let mut renderer = RecordingRenderer::new();
            let captures = renderer.captures();
            let _ = renderer.allocate_mesh();
            captures
        };
        assert_eq!(captures.live_meshes(), 1);
    }
}
