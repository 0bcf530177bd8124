use crate::config::ToyConfig;
use crate::coords::Vec2;
use crate::paint::hsv::{hsv_to_rgb, rgb_to_hsv};
use crate::paint::Rgba8;

use super::screen::{Screen, ScreenId};

/// Insertion-ordered collection of placed screens plus the current selection.
///
/// The selection is held as a [`ScreenId`] and resolved by lookup on every use,
/// so inserting or removing screens can never leave it pointing at the wrong
/// entry. Structural mutations (`create`, `delete`) clear it.
///
/// Every operation on "the selected screen" is a silent no-op when nothing is
/// selected.
#[derive(Debug, Clone)]
pub struct ScreenRegistry {
    screens: Vec<Screen>,
    selected: Option<ScreenId>,
    drag_offset: Vec2,
    next_id: u64,
    config: ToyConfig,
}

impl ScreenRegistry {
    pub fn new(config: &ToyConfig) -> Self {
        Self {
            screens: Vec::new(),
            selected: None,
            drag_offset: Vec2::zero(),
            next_id: 0,
            config: config.clone(),
        }
    }

    // ── queries ────────────────────────────────────────────────────────────

    /// Screens in insertion (draw) order.
    #[inline]
    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn get(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.iter().find(|s| s.id() == id)
    }

    #[inline]
    pub fn selected_id(&self) -> Option<ScreenId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Screen> {
        self.selected.and_then(|id| self.get(id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.screens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Cursor-minus-centre offset recorded by the last successful `select`.
    #[inline]
    pub fn drag_offset(&self) -> Vec2 {
        self.drag_offset
    }

    // ── structure ──────────────────────────────────────────────────────────

    /// Appends a screen centred on `position` with the default size and tint.
    pub fn create(&mut self, position: Vec2) -> ScreenId {
        let id = ScreenId(self.next_id);
        self.next_id += 1;

        let width = (self.config.canvas_width as f32 * self.config.initial_size_ratio) as u32;
        let height = (self.config.canvas_height as f32 * self.config.initial_size_ratio) as u32;
        let width = width.min(self.config.max_width());
        let height = height.min(self.config.max_height());

        self.screens.push(Screen::new(
            id,
            position,
            width,
            height,
            self.config.default_screen_color,
        ));
        self.selected = None;

        log::debug!(
            "created screen {} at ({:.1}, {:.1}) size {}x{}",
            id.raw(),
            position.x,
            position.y,
            width,
            height
        );
        id
    }

    /// Removes the screen and clears the selection.
    pub fn delete(&mut self, id: ScreenId) -> Option<Screen> {
        let index = self.screens.iter().position(|s| s.id() == id)?;
        self.selected = None;
        let removed = self.screens.remove(index);
        log::debug!("deleted screen {} ({} remaining)", id.raw(), self.screens.len());
        Some(removed)
    }

    // ── selection ──────────────────────────────────────────────────────────

    /// Hit-tests from the most recently created screen backwards and selects
    /// the smallest-area hit. Equal areas keep the first hit of that scan.
    pub fn select(&mut self, position: Vec2) -> Option<ScreenId> {
        let mut best: Option<&Screen> = None;
        for screen in self.screens.iter().rev() {
            if !screen.contains(position) {
                continue;
            }
            match best {
                Some(b) if screen.area() >= b.area() => {}
                _ => best = Some(screen),
            }
        }

        match best {
            Some(screen) => {
                let id = screen.id();
                self.drag_offset = position - screen.position();
                self.selected = Some(id);
                Some(id)
            }
            None => {
                self.selected = None;
                None
            }
        }
    }

    // ── selected-screen mutation ───────────────────────────────────────────

    fn selected_mut(&mut self) -> Option<&mut Screen> {
        let id = self.selected?;
        self.screens.iter_mut().find(|s| s.id() == id)
    }

    /// Moves the selected centre to `position - drag_offset` while the primary
    /// button is held.
    pub fn drag(&mut self, position: Vec2, primary_held: bool) {
        if !primary_held {
            return;
        }
        let offset = self.drag_offset;
        if let Some(screen) = self.selected_mut() {
            screen.set_position(position - offset);
        }
    }

    /// Grows (positive delta) or shrinks (negative delta) the selected screen.
    pub fn scale(&mut self, scroll_delta: f32) {
        if scroll_delta == 0.0 || !scroll_delta.is_finite() {
            return;
        }
        let factor = if scroll_delta > 0.0 {
            self.config.scale_up
        } else {
            self.config.scale_down
        };
        let min = self.config.min_scaled_size;
        let (max_w, max_h) = (self.config.max_width(), self.config.max_height());

        if let Some(screen) = self.selected_mut() {
            let w = scale_dimension(screen.width(), factor).clamp(min, max_w.max(min));
            let h = scale_dimension(screen.height(), factor).clamp(min, max_h.max(min));
            screen.set_size(w, h);
        }
    }

    pub fn rotate(&mut self, delta_degrees: f32) {
        if !delta_degrees.is_finite() {
            return;
        }
        if let Some(screen) = self.selected_mut() {
            screen.rotate(delta_degrees);
        }
    }

    /// Commits live-resize dimensions for the selected screen.
    pub fn resize_selected(&mut self, width: u32, height: u32) {
        let (w, h) = self.clamp_resize(width, height);
        if let Some(screen) = self.selected_mut() {
            screen.set_size(w, h);
            log::debug!("resized screen {} to {}x{}", screen.id().raw(), w, h);
        }
    }

    /// Live-resize bounds. Shared with the overlay so pending dimensions are
    /// shown exactly as they would commit.
    pub fn clamp_resize(&self, width: u32, height: u32) -> (u32, u32) {
        let min = self.config.min_resized_size;
        let w = width.clamp(min, self.config.max_width().max(min));
        let h = height.clamp(min, self.config.max_height().max(min));
        (w, h)
    }

    /// Raises the selected tint's alpha, capped at `max_screen_alpha`.
    pub fn strengthen(&mut self) {
        let step = self.config.alpha_delta();
        let cap = self.config.max_screen_alpha as i32;
        if let Some(screen) = self.selected_mut() {
            let c = screen.color();
            let a = ((c.a as f32 + step) as i32).min(cap).clamp(0, 255);
            screen.set_color(c.with_alpha(a as u8));
        }
    }

    /// Lowers the selected tint's alpha, floored at zero.
    pub fn weaken(&mut self) {
        let step = self.config.alpha_delta();
        if let Some(screen) = self.selected_mut() {
            let c = screen.color();
            let a = ((c.a as f32 - step) as i32).clamp(0, 255);
            screen.set_color(c.with_alpha(a as u8));
        }
    }

    /// Advances the selected tint's hue by `hue_step`, wrapping.
    pub fn cycle_hue(&mut self) {
        let step = self.config.hue_step;
        self.map_hsv(|h, s, v| ((h + step).rem_euclid(1.0), s, v));
    }

    /// Lowers the selected tint's saturation by `saturation_step`, wrapping.
    pub fn cycle_saturation(&mut self) {
        let step = self.config.saturation_step;
        self.map_hsv(|h, s, v| (h, (s - step + 1.0).rem_euclid(1.0), v));
    }

    fn map_hsv(&mut self, f: impl FnOnce(f32, f32, f32) -> (f32, f32, f32)) {
        if let Some(screen) = self.selected_mut() {
            let c = screen.color();
            let (h, s, v) = rgb_to_hsv(c.r, c.g, c.b);
            let (h, s, v) = f(h, s, v);
            let (r, g, b) = hsv_to_rgb(h, s, v);
            screen.set_color(Rgba8::new(r, g, b, c.a));
        }
    }
}

/// `dim * factor` in double precision, truncated toward zero.
fn scale_dimension(dim: u32, factor: f64) -> u32 {
    let scaled = dim as f64 * factor;
    if scaled <= 0.0 {
        0
    } else if scaled >= u32::MAX as f64 {
        u32::MAX
    } else {
        scaled as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ScreenRegistry {
        ScreenRegistry::new(&ToyConfig::default())
    }

    fn centre() -> Vec2 {
        Vec2::new(800.0, 475.0)
    }

    // ── create / select ────────────────────────────────────────────────────

    #[test]
    fn create_uses_canvas_ratio_and_defaults() {
        let mut reg = registry();
        let id = reg.create(centre());
        let s = reg.get(id).unwrap();
        assert_eq!((s.width(), s.height()), (400, 237));
        assert_eq!(s.rotation(), 0.0);
        assert_eq!(s.color(), Rgba8::new(66, 135, 245, 15));
        assert_eq!(s.position(), centre());
    }

    #[test]
    fn create_then_select_returns_new_screen() {
        let mut reg = registry();
        reg.create(Vec2::new(300.0, 300.0));
        reg.create(Vec2::new(320.0, 310.0));
        let id = reg.create(Vec2::new(310.0, 290.0));
        assert_eq!(reg.select(Vec2::new(310.0, 290.0)), Some(id));
    }

    #[test]
    fn smaller_older_screen_beats_fresh_create() {
        let mut reg = registry();
        let older = reg.create(centre());
        reg.select(centre());
        reg.scale(-1.0);

        let newer = reg.create(centre());
        assert_ne!(older, newer);
        assert_eq!(reg.select(centre()), Some(older));
    }

    #[test]
    fn create_clears_selection() {
        let mut reg = registry();
        let a = reg.create(centre());
        assert_eq!(reg.select(centre()), Some(a));
        reg.create(Vec2::new(100.0, 100.0));
        assert_eq!(reg.selected_id(), None);
    }

    #[test]
    fn select_prefers_strictly_smallest_area() {
        let mut reg = registry();
        let older = reg.create(centre());
        reg.select(centre());
        reg.scale(-1.0);
        let newer = reg.create(centre());

        // The older screen is drawn underneath but is smaller, so it wins.
        assert_eq!(reg.select(centre()), Some(older));
        assert_ne!(reg.selected_id(), Some(newer));
    }

    #[test]
    fn select_equal_area_tie_goes_to_newest() {
        let mut reg = registry();
        reg.create(centre());
        reg.create(Vec2::new(810.0, 480.0));
        let newest = reg.create(Vec2::new(790.0, 470.0));
        assert_eq!(reg.select(centre()), Some(newest));
    }

    #[test]
    fn select_miss_clears_selection() {
        let mut reg = registry();
        reg.create(centre());
        assert!(reg.select(centre()).is_some());
        assert_eq!(reg.select(Vec2::new(5.0, 5.0)), None);
        assert_eq!(reg.selected_id(), None);
    }

    #[test]
    fn select_respects_rotation() {
        let mut reg = registry();
        reg.create(centre());
        reg.select(centre());
        reg.rotate(90.0);
        // 400x237 turned a quarter: x extent is now +-118.5.
        assert_eq!(reg.select(Vec2::new(800.0 + 150.0, 475.0)), None);
        assert!(reg.select(Vec2::new(800.0, 475.0 + 150.0)).is_some());
    }

    #[test]
    fn select_records_drag_offset() {
        let mut reg = registry();
        reg.create(centre());
        reg.select(Vec2::new(810.0, 465.0));
        assert_eq!(reg.drag_offset(), Vec2::new(10.0, -10.0));
    }

    // ── drag ───────────────────────────────────────────────────────────────

    #[test]
    fn drag_moves_only_while_primary_held() {
        let mut reg = registry();
        let id = reg.create(centre());
        reg.select(Vec2::new(810.0, 475.0));

        reg.drag(Vec2::new(500.0, 500.0), false);
        assert_eq!(reg.get(id).unwrap().position(), centre());

        reg.drag(Vec2::new(510.0, 500.0), true);
        assert_eq!(reg.get(id).unwrap().position(), Vec2::new(500.0, 500.0));
    }

    #[test]
    fn drag_without_selection_is_noop() {
        let mut reg = registry();
        let id = reg.create(centre());
        reg.drag(Vec2::new(0.0, 0.0), true);
        assert_eq!(reg.get(id).unwrap().position(), centre());
    }

    // ── scale ──────────────────────────────────────────────────────────────

    #[test]
    fn scroll_scenario_truncates() {
        let mut reg = registry();
        let id = reg.create(centre());
        reg.select(centre());

        reg.scale(1.0);
        let s = reg.get(id).unwrap();
        assert_eq!((s.width(), s.height()), (420, 248));

        // Lossy round trip: 420*0.95 = 399, 248*0.95 = 235.6.
        reg.scale(-1.0);
        let s = reg.get(id).unwrap();
        assert_eq!((s.width(), s.height()), (399, 235));
    }

    #[test]
    fn zero_scroll_is_noop() {
        let mut reg = registry();
        let id = reg.create(centre());
        reg.select(centre());
        reg.scale(0.0);
        let s = reg.get(id).unwrap();
        assert_eq!((s.width(), s.height()), (400, 237));
    }

    #[test]
    fn scale_stays_within_bounds_for_any_sequence() {
        let mut reg = registry();
        let id = reg.create(centre());
        reg.select(centre());

        let mut seq = 0x2545_f491_u32;
        for _ in 0..2000 {
            seq ^= seq << 13;
            seq ^= seq >> 17;
            seq ^= seq << 5;
            let delta = if seq % 3 == 0 { -1.0 } else { 1.0 };
            reg.scale(delta);

            let s = reg.get(id).unwrap();
            assert!((10..=1600).contains(&s.width()));
            assert!((10..=950).contains(&s.height()));
        }

        for _ in 0..200 {
            reg.scale(-1.0);
        }
        let s = reg.get(id).unwrap();
        assert_eq!((s.width(), s.height()), (10, 10));
    }

    #[test]
    fn scale_up_saturates_at_canvas() {
        let mut reg = registry();
        let id = reg.create(centre());
        reg.select(centre());
        for _ in 0..200 {
            reg.scale(1.0);
        }
        let s = reg.get(id).unwrap();
        assert_eq!((s.width(), s.height()), (1600, 950));
    }

    // ── rotate ─────────────────────────────────────────────────────────────

    #[test]
    fn rotation_stays_normalized() {
        let mut reg = registry();
        let id = reg.create(centre());
        reg.select(centre());
        for _ in 0..370 {
            reg.rotate(-1.0);
        }
        let r = reg.get(id).unwrap().rotation();
        assert!((0.0..360.0).contains(&r));
        assert!((r - 350.0).abs() < 1e-2);
    }

    // ── delete ─────────────────────────────────────────────────────────────

    #[test]
    fn delete_removes_and_clears_selection() {
        let mut reg = registry();
        let a = reg.create(Vec2::new(200.0, 200.0));
        let b = reg.create(Vec2::new(1200.0, 700.0));
        reg.select(Vec2::new(1200.0, 700.0));

        let removed = reg.delete(b).unwrap();
        assert_eq!(removed.id(), b);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.selected_id(), None);
        assert!(reg.get(a).is_some());
        assert!(reg.delete(b).is_none());
    }

    #[test]
    fn selection_survives_only_by_id() {
        let mut reg = registry();
        let a = reg.create(Vec2::new(200.0, 200.0));
        let b = reg.create(Vec2::new(1200.0, 700.0));
        reg.select(Vec2::new(1200.0, 700.0));
        assert_eq!(reg.selected().map(Screen::id), Some(b));

        reg.delete(a);
        // Structural change cleared it; re-resolving by position finds `b`.
        assert!(reg.selected().is_none());
        assert_eq!(reg.select(Vec2::new(1200.0, 700.0)), Some(b));
    }

    #[test]
    fn operations_without_screens_are_noops() {
        let mut reg = registry();
        reg.scale(1.0);
        reg.rotate(10.0);
        reg.strengthen();
        reg.weaken();
        reg.cycle_hue();
        reg.cycle_saturation();
        reg.resize_selected(10, 10);
        reg.drag(Vec2::zero(), true);
        assert!(reg.is_empty());
        assert_eq!(reg.select(Vec2::zero()), None);
    }

    // ── color ──────────────────────────────────────────────────────────────

    #[test]
    fn strengthen_converges_to_cap() {
        let mut reg = registry();
        let id = reg.create(centre());
        reg.select(centre());

        let mut last = reg.get(id).unwrap().color().a;
        for _ in 0..20 {
            reg.strengthen();
            let a = reg.get(id).unwrap().color().a;
            assert!(a >= last && a <= 100);
            last = a;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn weaken_converges_to_zero() {
        let mut reg = registry();
        let id = reg.create(centre());
        reg.select(centre());
        reg.strengthen();
        reg.strengthen();
        assert_eq!(reg.get(id).unwrap().color().a, 65);

        let mut last = 65;
        for _ in 0..10 {
            reg.weaken();
            let a = reg.get(id).unwrap().color().a;
            assert!(a <= last);
            last = a;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn hue_cycle_keeps_alpha_and_changes_rgb() {
        let mut reg = registry();
        let id = reg.create(centre());
        reg.select(centre());
        let before = reg.get(id).unwrap().color();
        for _ in 0..50 {
            reg.cycle_hue();
        }
        let after = reg.get(id).unwrap().color();
        assert_eq!(after.a, before.a);
        assert_ne!((after.r, after.g, after.b), (before.r, before.g, before.b));
    }

    #[test]
    fn saturation_cycle_wraps_from_grey() {
        let cfg = ToyConfig {
            default_screen_color: Rgba8::new(200, 200, 200, 15),
            saturation_step: 0.5,
            ..ToyConfig::default()
        };
        let mut reg = ScreenRegistry::new(&cfg);
        let id = reg.create(centre());
        reg.select(centre());

        // Saturation 0 wraps to 0.5 at hue 0.
        reg.cycle_saturation();
        assert_eq!(reg.get(id).unwrap().color(), Rgba8::new(200, 100, 100, 15));
    }

    // ── resize ─────────────────────────────────────────────────────────────

    #[test]
    fn resize_selected_clamps_to_canvas() {
        let mut reg = registry();
        let id = reg.create(centre());
        reg.select(centre());
        reg.resize_selected(5000, 0);
        let s = reg.get(id).unwrap();
        assert_eq!((s.width(), s.height()), (1600, 0));
    }
}
