use glam::Vec2;
use tracing::debug;

/// Index of a hoverable region in the scene's region table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

/// Per-region hover state. Every region starts `Idle` and never terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverPhase {
    #[default]
    Idle,
    Hovering,
}

impl HoverPhase {
    /// Value the fade accumulator chases while in this phase.
    pub fn alpha_target(self) -> f32 {
        match self {
            HoverPhase::Idle => 0.0,
            HoverPhase::Hovering => 1.0,
        }
    }
}

/// State written by input callbacks and read once per frame.
///
/// The three `on_*` methods are the only mutation entry points. The frame
/// step only borrows this immutably, so a single redraw always sees one
/// consistent snapshot of cursor, hover flag, and texture selection.
#[derive(Debug, Clone)]
pub struct InputState {
    cursor: Vec2,
    regions: Vec<HoverPhase>,
    hover: HoverPhase,
    active_texture: Option<RegionId>,
}

impl InputState {
    pub fn new(region_count: usize) -> Self {
        Self {
            cursor: Vec2::ZERO,
            regions: vec![HoverPhase::Idle; region_count],
            hover: HoverPhase::Idle,
            active_texture: None,
        }
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(x, y);
    }

    /// Marks `region` as hovered and binds its texture. Entering a second
    /// region without leaving the first simply rebinds.
    pub fn on_region_enter(&mut self, region: RegionId) {
        let Some(phase) = self.regions.get_mut(region.0) else {
            debug!(region = region.0, "ignoring enter for unknown region");
            return;
        };
        *phase = HoverPhase::Hovering;
        self.hover = HoverPhase::Hovering;
        self.active_texture = Some(region);
    }

    /// Marks `region` idle. The hover flag only drops once no region is
    /// hovered, so leaving one of two overlapping regions keeps the plane up.
    /// The bound texture stays so the plane can fade out showing the last
    /// image.
    pub fn on_region_leave(&mut self, region: RegionId) {
        let Some(phase) = self.regions.get_mut(region.0) else {
            debug!(region = region.0, "ignoring leave for unknown region");
            return;
        };
        *phase = HoverPhase::Idle;
        if self.regions.iter().all(|phase| *phase == HoverPhase::Idle) {
            self.hover = HoverPhase::Idle;
        }
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// `Hovering` while any region is hovered.
    pub fn hover(&self) -> HoverPhase {
        self.hover
    }

    pub fn is_hovering(&self) -> bool {
        self.hover == HoverPhase::Hovering
    }

    pub fn active_texture(&self) -> Option<RegionId> {
        self.active_texture
    }
}
