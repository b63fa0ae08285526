//! Render Pass Abstraction
//!
//! The viewer draws a frame as a short, fixed sequence of passes; each pass
//! builds its GPU resources once and records into the frame's encoder.

use wgpu::{CommandEncoder, Device, Queue, TextureView};

/// Render pass execution priority (lower = earlier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderPassPriority {
    /// Scene geometry; clears the frame
    Geometry = 100,
    /// UI overlay (always on top)
    UI = 400,
}

/// GPU context shared between render passes
pub struct RenderContext<'a> {
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub surface_format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

/// Frame context for a single render frame
pub struct FrameContext<'a> {
    pub encoder: &'a mut CommandEncoder,
    pub color_view: &'a TextureView,
    pub depth_view: &'a TextureView,
    /// Background color for the pass that clears
    pub clear_color: wgpu::Color,
}

/// Trait for implementing render passes
pub trait RenderPass {
    /// Unique name for this pass (for logging)
    fn name(&self) -> &'static str;

    /// Execution priority (determines render order)
    fn priority(&self) -> RenderPassPriority;

    /// Create GPU resources (called once on creation)
    fn initialize(&mut self, ctx: &RenderContext);

    /// Record the pass
    fn render(&self, ctx: &RenderContext, frame: &mut FrameContext);
}

/// Render `passes` in priority order
pub fn render_in_order(passes: &mut [&dyn RenderPass], ctx: &RenderContext, frame: &mut FrameContext) {
    passes.sort_by_key(|p| p.priority());
    for pass in passes.iter() {
        tracing::trace!(pass = pass.name(), "recording pass");
        pass.render(ctx, frame);
    }
}
