use glam::Vec2;

use crate::hover::{InputState, RegionId};

/// Axis-aligned rectangle in logical pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment, matching how a pointer leaves a box at its far edge.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionEvent {
    Enter(RegionId),
    Leave(RegionId),
}

/// Turns raw cursor positions into enter/leave transitions.
///
/// A native window only reports pointer motion, so the tracker remembers
/// which regions contained the previous position and emits the difference.
#[derive(Debug, Clone)]
pub struct RegionTracker {
    rects: Vec<Rect>,
    inside: Vec<bool>,
}

impl RegionTracker {
    pub fn new(rects: Vec<Rect>) -> Self {
        let inside = vec![false; rects.len()];
        Self { rects, inside }
    }

    /// Returns leaves before enters so that moving straight from one region
    /// into another ends with the new region hovered.
    pub fn update(&mut self, point: Vec2) -> Vec<RegionEvent> {
        let mut leaves = Vec::new();
        let mut enters = Vec::new();
        for (index, (rect, inside)) in self.rects.iter().zip(self.inside.iter_mut()).enumerate() {
            let now_inside = rect.contains(point);
            if now_inside != *inside {
                *inside = now_inside;
                if now_inside {
                    enters.push(RegionEvent::Enter(RegionId(index)));
                } else {
                    leaves.push(RegionEvent::Leave(RegionId(index)));
                }
            }
        }
        leaves.extend(enters);
        leaves
    }

    /// Called when the pointer leaves the window entirely.
    pub fn leave_all(&mut self) -> Vec<RegionEvent> {
        self.inside
            .iter_mut()
            .enumerate()
            .filter_map(|(index, inside)| {
                std::mem::replace(inside, false).then_some(RegionEvent::Leave(RegionId(index)))
            })
            .collect()
    }

    /// Moves the cursor and forwards the resulting transitions to `input`.
    pub fn dispatch_pointer(&mut self, input: &mut InputState, point: Vec2) {
        input.on_pointer_move(point.x, point.y);
        for event in self.update(point) {
            apply(input, event);
        }
    }

    pub fn dispatch_pointer_left(&mut self, input: &mut InputState) {
        for event in self.leave_all() {
            apply(input, event);
        }
    }
}

fn apply(input: &mut InputState, event: RegionEvent) {
    match event {
        RegionEvent::Enter(region) => input.on_region_enter(region),
        RegionEvent::Leave(region) => input.on_region_leave(region),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_regions() -> RegionTracker {
        RegionTracker::new(vec![
            Rect::new(100.0, 100.0, 200.0, 80.0),
            Rect::new(100.0, 300.0, 200.0, 80.0),
        ])
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(9.99, 9.99)));
        assert!(!rect.contains(Vec2::new(10.0, 5.0)));
        assert!(!rect.contains(Vec2::new(5.0, -0.1)));
    }

    #[test]
    fn emits_enter_once_then_leave() {
        let mut tracker = two_regions();
        assert!(tracker.update(Vec2::new(10.0, 10.0)).is_empty());
        assert_eq!(
            tracker.update(Vec2::new(150.0, 120.0)),
            vec![RegionEvent::Enter(RegionId(0))]
        );
        assert!(tracker.update(Vec2::new(160.0, 130.0)).is_empty());
        assert_eq!(
            tracker.update(Vec2::new(150.0, 250.0)),
            vec![RegionEvent::Leave(RegionId(0))]
        );
    }

    #[test]
    fn jump_between_regions_leaves_before_entering() {
        let mut tracker = two_regions();
        tracker.update(Vec2::new(150.0, 120.0));
        assert_eq!(
            tracker.update(Vec2::new(150.0, 320.0)),
            vec![
                RegionEvent::Leave(RegionId(0)),
                RegionEvent::Enter(RegionId(1))
            ]
        );
    }

    #[test]
    fn dispatch_drives_input_state() {
        let mut tracker = two_regions();
        let mut input = InputState::new(2);
        tracker.dispatch_pointer(&mut input, Vec2::new(150.0, 120.0));
        assert!(input.is_hovering());
        assert_eq!(input.active_texture(), Some(RegionId(0)));

        tracker.dispatch_pointer(&mut input, Vec2::new(150.0, 320.0));
        assert!(input.is_hovering());
        assert_eq!(input.active_texture(), Some(RegionId(1)));

        tracker.dispatch_pointer_left(&mut input);
        assert!(!input.is_hovering());
        assert_eq!(input.active_texture(), Some(RegionId(1)));
        assert!(tracker.leave_all().is_empty());
    }

    #[test]
    fn overlapping_regions_stay_hovered_until_pointer_clears_both() {
        let mut tracker = RegionTracker::new(vec![
            Rect::new(0.0, 0.0, 200.0, 100.0),
            Rect::new(100.0, 0.0, 200.0, 100.0),
        ]);
        let mut input = InputState::new(2);

        tracker.dispatch_pointer(&mut input, Vec2::new(50.0, 50.0));
        assert!(input.is_hovering());
        assert_eq!(input.active_texture(), Some(RegionId(0)));

        tracker.dispatch_pointer(&mut input, Vec2::new(150.0, 50.0));
        assert!(input.is_hovering());
        assert_eq!(input.active_texture(), Some(RegionId(1)));

        tracker.dispatch_pointer(&mut input, Vec2::new(250.0, 50.0));
        assert!(input.is_hovering(), "pointer is still inside the second region");
        assert_eq!(input.active_texture(), Some(RegionId(1)));

        tracker.dispatch_pointer(&mut input, Vec2::new(350.0, 50.0));
        assert!(!input.is_hovering());
    }
}
