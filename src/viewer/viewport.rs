//! 3D line viewport widget for egui

use egui::{pos2, Color32, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};
use glam::{Mat4, Vec4};

use super::camera::OrbitCamera;
use crate::geom::Segment;

/// Clip-space w below which a point counts as behind the camera.
const W_MIN: f32 = 1e-4;

/// A batch of segments drawn with one stroke.
pub struct LineLayer<'a> {
    pub segments: &'a [Segment],
    pub color: Color32,
    pub width: f32,
}

/// Viewport state
pub struct Viewport {
    pub camera: OrbitCamera,
}

impl Viewport {
    pub fn new() -> Self {
        Self { camera: OrbitCamera::default() }
    }

    /// Show viewport, handle camera input and draw `layers` back to front
    pub fn show(&mut self, ui: &mut Ui, layers: &[LineLayer<'_>], background: Color32) -> Response {
        let _span = tracing::trace_span!("viewport_show").entered();
        let available = ui.available_size();
        let size = Vec2::new(available.x.max(64.0), available.y.max(64.0));

        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

        self.handle_input(ui, &response);
        self.camera.update(ui.input(|i| i.stable_dt));

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, background);

        let view_proj = self.camera.view_proj_matrix(rect.aspect_ratio());
        for layer in layers {
            let stroke = Stroke::new(layer.width, layer.color);
            for seg in layer.segments {
                if let Some(points) = project_segment(view_proj, rect, seg) {
                    painter.line_segment(points, stroke);
                }
            }
        }

        response
    }

    fn handle_input(&mut self, ui: &Ui, response: &Response) {
        // Orbit with left mouse drag
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.camera.orbit(delta.x, delta.y);
        }

        // Pan with middle mouse drag
        if response.dragged_by(egui::PointerButton::Middle) {
            let delta = response.drag_delta();
            self.camera.pan(delta.x, delta.y);
        }

        // Zoom with right mouse drag
        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            self.camera.zoom(delta.y);
        }

        // Zoom with scroll
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.0 {
                self.camera.zoom(scroll * 0.1);
            }
        }

        // Reset camera with Home key
        if response.hovered() && ui.input(|i| i.key_pressed(egui::Key::Home)) {
            self.camera.reset();
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// Project a world-space segment into `rect`, clipping the part behind the camera.
fn project_segment(view_proj: Mat4, rect: Rect, seg: &Segment) -> Option<[Pos2; 2]> {
    let mut a = view_proj * seg.start.extend(1.0);
    let mut b = view_proj * seg.end.extend(1.0);

    if a.w < W_MIN && b.w < W_MIN {
        return None;
    }
    if a.w < W_MIN {
        a = a.lerp(b, (W_MIN - a.w) / (b.w - a.w));
    } else if b.w < W_MIN {
        b = b.lerp(a, (W_MIN - b.w) / (a.w - b.w));
    }

    Some([to_screen(a, rect), to_screen(b, rect)])
}

fn to_screen(clip: Vec4, rect: Rect) -> Pos2 {
    let ndc = clip.truncate() / clip.w;
    pos2(
        rect.left() + (ndc.x * 0.5 + 0.5) * rect.width(),
        rect.top() + (0.5 - ndc.y * 0.5) * rect.height(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn rect() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(100.0, 100.0))
    }

    #[test]
    fn test_identity_projection() {
        let seg = Segment::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        let [a, b] = project_segment(Mat4::IDENTITY, rect(), &seg).unwrap();
        assert_eq!(a, pos2(50.0, 50.0));
        assert_eq!(b, pos2(100.0, 0.0));
    }

    #[test]
    fn test_behind_camera_is_dropped() {
        let flip_w = Mat4::from_diagonal(Vec4::new(1.0, 1.0, 1.0, -1.0));
        let seg = Segment::new(Vec3::ZERO, Vec3::ONE);
        assert!(project_segment(flip_w, rect(), &seg).is_none());
    }

    #[test]
    fn test_crossing_segment_is_clipped() {
        // w = z, so the segment runs from behind the camera to in front of it
        let w_from_z = Mat4::from_cols(Vec4::X, Vec4::Y, Vec4::new(0.0, 0.0, 1.0, 1.0), Vec4::ZERO);
        let seg = Segment::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0));
        let [a, b] = project_segment(w_from_z, rect(), &seg).unwrap();
        assert!(a.x.is_finite() && a.y.is_finite());
        assert_eq!(b, pos2(50.0, 50.0));
    }
}
