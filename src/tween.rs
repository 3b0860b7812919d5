use raylib::prelude::*;
use serde::{Deserialize, Serialize};

/// Easing curve applied to a tween's normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    CircularInOut,
    Linear,
}

impl Easing {
    /// The raylib easing function, in `(t, start, change, duration)` form.
    pub fn function(self) -> fn(f32, f32, f32, f32) -> f32 {
        match self {
            Easing::CircularInOut => ease::circ_in_out,
            Easing::Linear => ease::linear_none,
        }
    }

    /// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        (self.function())(t, 0.0, 1.0, 1.0)
    }
}

/// A multi-channel interpolation from `from` to `to` over `duration` seconds.
///
/// Each channel is a raylib tween; all channels share the duration, so a
/// batch of uniforms fades in lockstep.
pub struct Tween {
    channels: Vec<ease::Tween>,
    current: Vec<f32>,
    to: Vec<f32>,
    duration: f32,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: Vec<f32>, to: Vec<f32>, duration: f32, easing: Easing) -> Self {
        debug_assert_eq!(from.len(), to.len(), "tween channel count mismatch");
        let duration = duration.max(0.0);
        let channels = from
            .iter()
            .zip(&to)
            .map(|(a, b)| ease::Tween::new(easing.function(), *a, *b, duration))
            .collect();
        Self {
            channels,
            current: from,
            to,
            duration,
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.is_finished() {
            return;
        }
        for (channel, value) in self.channels.iter_mut().zip(self.current.iter_mut()) {
            *value = channel.apply(dt);
        }
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current channel values. A finished tween yields exactly its targets.
    pub fn values(&self) -> Vec<f32> {
        if self.is_finished() {
            self.to.clone()
        } else {
            self.current.clone()
        }
    }
}
