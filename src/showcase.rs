//! Input and overlay: maps gestures to display requests and draws the selection dots.

use raylib::prelude::*;

use crate::display::{Display, TransitionRequest};

const DRAG_THRESHOLD: f32 = 8.0; // Pixels before a press counts as a swipe
const DOT_RADIUS: f32 = 8.0;
const DOT_SPACING: f32 = 32.0;
const DOT_TOP: f32 = 36.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Press and release x positions of a drag or touch.
    Swipe { start_x: f32, end_x: f32 },
    /// raylib wheel move: positive when scrolling up.
    Wheel(f32),
    Select(usize),
    Left,
    Right,
}

#[derive(Debug, Default)]
pub struct Showcase {
    drag_start: Option<Vector2>,
    /// Dot highlighted in the overlay.
    selected: usize,
}

impl Showcase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Feeds one gesture to the display. Returns true if a transition started.
    pub fn apply(&mut self, gesture: Gesture, display: &mut Display) -> bool {
        let request = match gesture {
            Gesture::Swipe { start_x, end_x } => swipe_request(start_x, end_x),
            Gesture::Wheel(delta) => wheel_request(delta),
            Gesture::Select(index) if index == display.current_index() => None,
            Gesture::Select(index) => Some(TransitionRequest::Index(index)),
            Gesture::Left => Some(TransitionRequest::Left),
            Gesture::Right => Some(TransitionRequest::Right),
        };
        let Some(request) = request else {
            return false;
        };

        // The ring index only moves once the outgoing phase ends, so it
        // still names the item we are leaving.
        if display.request(request) {
            self.selected = request.resolve(display.current_index(), display.len());
            true
        } else {
            // Busy: the highlighted dot stays on the previous selection
            false
        }
    }

    /// Polls raylib input for this frame and applies whatever it produced.
    pub fn handle_input(&mut self, rl: &RaylibHandle, display: &mut Display) {
        let mut gestures = Vec::new();

        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
            gestures.push(Gesture::Right);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            gestures.push(Gesture::Left);
        }
        let digits = [
            KeyboardKey::KEY_ONE,
            KeyboardKey::KEY_TWO,
            KeyboardKey::KEY_THREE,
            KeyboardKey::KEY_FOUR,
            KeyboardKey::KEY_FIVE,
        ];
        for (index, key) in digits.into_iter().enumerate() {
            if rl.is_key_pressed(key) {
                gestures.push(Gesture::Select(index));
            }
        }

        let wheel = rl.get_mouse_wheel_move();
        if wheel != 0.0 {
            gestures.push(Gesture::Wheel(wheel));
        }

        let mouse = rl.get_mouse_position();
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            self.drag_start = Some(mouse);
        }
        if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            if let Some(start) = self.drag_start.take() {
                let dots = dot_centers(rl.get_screen_width() as f32, display.len());
                if (mouse.x - start.x).abs() < DRAG_THRESHOLD {
                    if let Some(index) = hit_dot(mouse, &dots) {
                        gestures.push(Gesture::Select(index));
                    }
                } else {
                    gestures.push(Gesture::Swipe { start_x: start.x, end_x: mouse.x });
                }
            }
        }

        for gesture in gestures {
            self.apply(gesture, display);
        }
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle, display: &Display) {
        let dots = dot_centers(d.get_screen_width() as f32, display.len());
        for (index, center) in dots.iter().enumerate() {
            if index == self.selected {
                d.draw_circle_v(*center, DOT_RADIUS, Color::WHITE);
            } else {
                d.draw_circle_lines(center.x as i32, center.y as i32, DOT_RADIUS, Color::WHITE);
            }
        }

        if let Some(item) = display.scene().items.get(self.selected) {
            let width = measure_text(&item.name, 20);
            let x = d.get_screen_width() / 2 - width / 2;
            d.draw_text(&item.name, x, (DOT_TOP + DOT_RADIUS * 2.5) as i32, 20, Color::WHITE);
        }
    }
}

/// Dragging towards the left brings in the next item, like a touch swipe.
pub fn swipe_request(start_x: f32, end_x: f32) -> Option<TransitionRequest> {
    if end_x < start_x {
        Some(TransitionRequest::Right)
    } else if end_x > start_x {
        Some(TransitionRequest::Left)
    } else {
        None
    }
}

pub fn wheel_request(delta: f32) -> Option<TransitionRequest> {
    if delta > 0.0 {
        Some(TransitionRequest::Left)
    } else if delta < 0.0 {
        Some(TransitionRequest::Right)
    } else {
        None
    }
}

/// Centers of the selection dots, in a row across the top of the window.
pub fn dot_centers(screen_width: f32, count: usize) -> Vec<Vector2> {
    let row = DOT_SPACING * count.saturating_sub(1) as f32;
    let left = screen_width * 0.5 - row * 0.5;
    (0..count)
        .map(|i| Vector2::new(left + DOT_SPACING * i as f32, DOT_TOP))
        .collect()
}

pub fn hit_dot(point: Vector2, dots: &[Vector2]) -> Option<usize> {
    dots.iter().position(|c| {
        let (dx, dy) = (point.x - c.x, point.y - c.y);
        dx * dx + dy * dy <= DOT_RADIUS * DOT_RADIUS * 2.0
    })
}
