use crate::Point;
use crate::config::GameConfig;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn set_center_x(&mut self, cx: f64) {
        self.x = cx - self.width / 2.0;
    }

    /// Half-open containment: left/top edges inside, right/bottom outside.
    pub fn contains(&self, (px, py): Point) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.y + self.height
    }
}

/// Draggable knob picking the tick delay on a log scale.
/// Right end of the track is fastest (smallest delay).
pub struct SpeedSlider {
    track: Rect,
    knob: Rect,
    min_speed: f64,
    max_speed: f64,
    value: f64,
    dragging: bool,
}

impl SpeedSlider {
    pub fn new(config: &GameConfig) -> Self {
        let track = Rect::new(config.slider_x, config.slider_y, config.slider_width, config.slider_height);
        let knob = Rect::new(
            track.x,
            track.y - track.height / 2.0,
            config.knob_size,
            config.knob_size,
        );

        let mut slider = SpeedSlider {
            track,
            knob,
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            value: config.default_speed,
            dragging: false,
        };
        let cx = track.left() + track.width * slider.ratio_for(config.default_speed);
        slider.knob.set_center_x(cx);
        slider
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn track(&self) -> Rect {
        self.track
    }

    pub fn knob(&self) -> Rect {
        self.knob
    }

    #[cfg(test)]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn pointer_down(&mut self, pos: Point) {
        if self.knob.contains(pos) {
            self.dragging = true;
        }
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Returns the new value when the drag moved the knob.
    pub fn pointer_move(&mut self, pos: Point) -> Option<f64> {
        if !self.dragging {
            return None;
        }

        let cx = pos.0.max(self.track.left()).min(self.track.right());
        self.knob.set_center_x(cx);
        Some(self.update_value())
    }

    pub fn update_value(&mut self) -> f64 {
        let ratio = (self.knob.center_x() - self.track.left()) / self.track.width;
        self.value = self.value_at(ratio);
        self.value
    }

    fn value_at(&self, ratio: f64) -> f64 {
        let log_min = self.min_speed.ln();
        let log_max = self.max_speed.ln();
        (log_min + (log_max - log_min) * (1.0 - ratio)).exp()
    }

    fn ratio_for(&self, value: f64) -> f64 {
        let log_min = self.min_speed.ln();
        let log_max = self.max_speed.ln();
        let ratio = 1.0 - (value.ln() - log_min) / (log_max - log_min);
        ratio.max(0.0).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider() -> SpeedSlider {
        SpeedSlider::new(&GameConfig::default())
    }

    fn grab(slider: &mut SpeedSlider) {
        let knob = slider.knob();
        slider.pointer_down((knob.center_x(), knob.center_y()));
        assert!(slider.is_dragging());
    }

    #[test]
    fn starts_at_default_with_matching_knob() {
        let mut slider = slider();
        assert_eq!(slider.value(), 0.2);
        assert!((slider.update_value() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn track_ends_map_to_bounds() {
        let mut slider = slider();
        grab(&mut slider);

        let right = slider.pointer_move((10_000.0, 0.0)).unwrap();
        assert!((right - 0.001).abs() < 1e-12);
        assert_eq!(slider.knob().center_x(), slider.track().right());

        let left = slider.pointer_move((-10_000.0, 0.0)).unwrap();
        assert!((left - 1.0).abs() < 1e-12);
        assert_eq!(slider.knob().center_x(), slider.track().left());
    }

    #[test]
    fn value_strictly_decreases_to_the_right() {
        let mut slider = slider();
        grab(&mut slider);
        let track = slider.track();

        let mut previous = f64::INFINITY;
        for step in 0..=200 {
            let x = track.left() + step as f64;
            let value = slider.pointer_move((x, 0.0)).unwrap();
            assert!(value < previous);
            assert!(value >= 0.001 - 1e-12 && value <= 1.0 + 1e-12);
            previous = value;
        }
    }

    #[test]
    fn drag_needs_press_on_knob() {
        let mut slider = slider();
        slider.pointer_down((0.0, 0.0));
        assert!(!slider.is_dragging());
        assert_eq!(slider.pointer_move((700.0, 25.0)), None);
        assert_eq!(slider.value(), 0.2);

        grab(&mut slider);
        slider.pointer_up();
        assert!(!slider.is_dragging());
        assert_eq!(slider.pointer_move((700.0, 25.0)), None);
    }
}
