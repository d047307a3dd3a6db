//! Geometry for "contain"-fit media: the video frame is scaled to fit the
//! on-screen container while preserving aspect ratio, leaving letterbox bars
//! on one axis. Pointer positions map through this layout into a normalized
//! vertical fraction of the true frame, and back.

/// True decoded resolution of the media source, queried from the backend or
/// falling back to a configured default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMeta {
    pub width: u32,
    pub height: u32,
    pub fps: f32,
}

impl FrameMeta {
    pub fn new(width: u32, height: u32, fps: f32) -> Self {
        Self { width, height, fps }
    }

    /// A frame with a zero dimension cannot be mapped into.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for FrameMeta {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 0.0,
        }
    }
}

/// On-screen bounding rectangle of the video container, in the same
/// coordinate space as incoming pointer positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ContainerRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Where the frame actually lands inside the container.
///
/// Invariant for non-degenerate inputs: the drawn area never exceeds the
/// container and touches it on at least one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainLayout {
    pub offset_x: f32,
    pub offset_y: f32,
    pub drawn_width: f32,
    pub drawn_height: f32,
    pub scale: f32,
}

impl ContainLayout {
    pub fn compute(container: ContainerRect, meta: FrameMeta) -> Self {
        if meta.is_degenerate() || container.is_degenerate() {
            // Zero-size frame or container: unit scale, no letterboxing.
            return Self {
                offset_x: 0.0,
                offset_y: 0.0,
                drawn_width: container.width.max(0.0),
                drawn_height: container.height.max(0.0),
                scale: 1.0,
            };
        }

        let frame_w = meta.width as f32;
        let frame_h = meta.height as f32;
        let scale = (container.width / frame_w).min(container.height / frame_h);
        let drawn_width = frame_w * scale;
        let drawn_height = frame_h * scale;

        Self {
            offset_x: (container.width - drawn_width) / 2.0,
            offset_y: (container.height - drawn_height) / 2.0,
            drawn_width,
            drawn_height,
            scale,
        }
    }
}

/// Map an absolute pointer Y into the normalized vertical fraction of the
/// frame. Pointer positions outside the drawn area clamp to the nearest edge
/// (0 or 1) instead of erroring; degenerate geometry yields `fallback`.
pub fn pointer_to_norm(
    pointer_y: f32,
    container: ContainerRect,
    meta: FrameMeta,
    fallback: f32,
) -> f32 {
    if meta.is_degenerate() || container.is_degenerate() {
        return fallback.clamp(0.0, 1.0);
    }

    let layout = ContainLayout::compute(container, meta);
    if layout.drawn_height <= 0.0 || layout.scale <= 0.0 {
        return fallback.clamp(0.0, 1.0);
    }

    let local_y = pointer_y - container.top;
    let y_in_drawn = (local_y - layout.offset_y).clamp(0.0, layout.drawn_height);
    let y_in_frame = y_in_drawn / layout.scale;
    (y_in_frame / meta.height as f32).clamp(0.0, 1.0)
}

/// Inverse of [`pointer_to_norm`]: the container-relative Y offset at which
/// to render the line overlay. Add the container top to obtain an absolute
/// position.
pub fn norm_to_offset(y_norm: f32, layout: ContainLayout, meta: FrameMeta) -> f32 {
    layout.offset_y + y_norm.clamp(0.0, 1.0) * meta.height as f32 * layout.scale
}
