//! # The Effect Contract
//!
//! Every ambient component advances through the same narrow interface: one
//! [`tick`](AmbientEffect::tick) per frame with the renderer, the observer
//! and the clock, and one [`teardown`](AmbientEffect::teardown) when the
//! stage shuts down.

use crate::observer::SceneObserver;
use crate::renderer::SceneRenderer;

/// Everything a component may touch during one frame.
pub struct FrameContext<'a> {
    /// Sink for sprite batches and meshes.
    pub renderer: &'a mut dyn SceneRenderer,
    /// The view the frame is rendered from.
    pub observer: &'a dyn SceneObserver,
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Seconds since the stage started.
    pub elapsed: f32,
}

/// A component that dresses the scene and advances once per frame.
///
/// Components that hold renderer resources release them in
/// [`teardown`](AmbientEffect::teardown); the default implementation is
/// for components that own nothing renderer-side.
pub trait AmbientEffect {
    /// Stable name for logs and stage summaries.
    fn name(&self) -> &'static str;

    /// Advances the component by one frame.
    fn tick(&mut self, ctx: &mut FrameContext<'_>);

    /// Returns renderer resources. Must be safe to call more than once.
    fn teardown(&mut self, _renderer: &mut dyn SceneRenderer) {}
}
