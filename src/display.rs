use raylib::prelude::*;

use crate::animation::{AnimationSystem, Callbacks, TweenId};
use crate::config::{CarouselConfig, TransitionTimings};
use crate::constants::*;
use crate::scene::{
    vec3, CameraRig, DisplayItem, Mesh, ObjectId, Rgb, Scene, ShaderKind, Transform, Uniform,
    UniformSet, UniformValue,
};

/// Texture slot of the background strip; item `i` uses slot `i + 1`.
pub const STRIP_TEXTURE: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRequest {
    Right,
    Left,
    /// Out of range targets fall back to the first item.
    Index(usize),
}

impl TransitionRequest {
    pub fn resolve(self, current: usize, len: usize) -> usize {
        match self {
            TransitionRequest::Right => (current + 1) % len,
            TransitionRequest::Left => (current + len - 1) % len,
            TransitionRequest::Index(index) if index >= len => 0,
            TransitionRequest::Index(index) => index,
        }
    }
}

/// Where a transition currently is.
///
/// The ring index moves to `next` as soon as `Outgoing` hands over to
/// `Incoming`, while the busy flag holds until the background color fade of
/// `Incoming` completes. Requests arriving in between are still rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionPhase {
    Idle,
    /// Strip stretches, current item slides to the intermediate slot and fades out.
    Outgoing { from: usize, next: usize, fade: TweenId },
    /// Next item slides into the spotlight and fades in, background color cross-fades.
    Incoming { color_fade: TweenId },
}

/// Owns the scene and drives the ring rotation.
pub struct Display {
    scene: Scene,
    animations: AnimationSystem,
    timings: TransitionTimings,
    current_index: usize,
    phase: TransitionPhase,
    viewport: (i32, i32),
    clock: f32,
}

impl Display {
    pub fn new(config: &CarouselConfig, width: i32, height: i32) -> Self {
        let items: Vec<DisplayItem> = config
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let slot = if index == 0 { SPOTLIGHT_POSITION } else { BACKGROUND_POSITION };
                let mut uniforms = UniformSet::new(ShaderKind::Item);
                let lerp = if index == 0 { 1.0 } else { 0.0 };
                uniforms.set(Uniform::LerpValue, UniformValue::Float(lerp));
                DisplayItem {
                    name: item.name.clone(),
                    mesh: Mesh {
                        transform: Transform::at(vec3(slot)),
                        size: Vector2::new(item.size[0], item.size[1]),
                        texture: index + 1,
                        uniforms,
                    },
                    color: item.color,
                }
            })
            .collect();

        let mut strip_uniforms = UniformSet::new(ShaderKind::Strip);
        strip_uniforms.set(
            Uniform::Resolution,
            UniformValue::Vec2(Vector2::new(width as f32, height as f32)),
        );
        let strip = Mesh {
            transform: Transform {
                rotation: STRIP_ROTATION,
                ..Transform::at(vec3(STRIP_POSITION))
            },
            size: Vector2::new(config.strip.size[0], config.strip.size[1]),
            texture: STRIP_TEXTURE,
            uniforms: strip_uniforms,
        };

        let background = items
            .first()
            .map(|item| Rgb::from_bytes(item.color))
            .unwrap_or_default();

        Self {
            scene: Scene {
                camera: CameraRig::new(aspect(width, height)),
                background,
                strip,
                items,
            },
            animations: AnimationSystem::new(config.easing),
            timings: config.timings.clone(),
            current_index: 0,
            phase: TransitionPhase::Idle,
            viewport: (width, height),
            clock: 0.0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.scene.items.len()
    }

    pub fn is_animating(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    pub fn toggle_right(&mut self) -> bool {
        self.request(TransitionRequest::Right)
    }

    pub fn toggle_left(&mut self) -> bool {
        self.request(TransitionRequest::Left)
    }

    pub fn toggle_index(&mut self, index: usize) -> bool {
        self.request(TransitionRequest::Index(index))
    }

    /// Starts a transition, or drops the request if one is already running.
    pub fn request(&mut self, request: TransitionRequest) -> bool {
        if self.is_animating() || self.scene.items.is_empty() {
            log::debug!("{:?} dropped, transition in progress", request);
            return false;
        }

        let from = self.current_index;
        let next = request.resolve(from, self.len());
        log::info!(
            "{:?}: {} -> {}",
            request,
            self.scene.items[from].name,
            self.scene.items[next].name
        );

        let phase = self.timings.phase;
        let stretch = Vector3::new(1.0, self.timings.strip_stretch, 1.0);
        self.animations
            .lerp_scale(&mut self.scene, ObjectId::Strip, stretch, phase, Callbacks::none());
        self.animations.lerp_object_position(
            &mut self.scene,
            ObjectId::Item(from),
            vec3(INTERMEDIATE_POSITION),
            phase,
            Callbacks::none(),
        );
        let fade = self.animations.lerp_uniform_float(
            &mut self.scene,
            &[(ObjectId::Item(from), Uniform::LerpValue)],
            &[0.0],
            phase,
            Callbacks::none(),
        );

        self.phase = TransitionPhase::Outgoing { from, next, fade };
        true
    }

    /// Per-frame step: clock uniform, animations, then phase hand-over.
    pub fn update(&mut self, dt: f32) {
        self.clock += dt;
        self.scene
            .strip
            .uniforms
            .set(Uniform::Time, UniformValue::Float(self.clock));

        self.animations.tick(dt, &mut self.scene);
        self.advance_transition();
    }

    fn advance_transition(&mut self) {
        match self.phase {
            TransitionPhase::Outgoing { from, next, fade } if !self.animations.is_running(fade) => {
                let phase = self.timings.phase;
                let (prev_color, next_color) = (self.scene.items[from].color, self.scene.items[next].color);
                self.animations.lerp_scale(
                    &mut self.scene,
                    ObjectId::Strip,
                    Vector3::new(1.0, 1.0, 1.0),
                    phase,
                    Callbacks::none(),
                );
                self.animations.lerp_object_position(
                    &mut self.scene,
                    ObjectId::Item(next),
                    vec3(SPOTLIGHT_POSITION),
                    phase,
                    Callbacks::none(),
                );
                self.animations.lerp_uniform_float(
                    &mut self.scene,
                    &[(ObjectId::Item(next), Uniform::LerpValue)],
                    &[1.0],
                    phase,
                    Callbacks::none(),
                );
                let color_fade = self.animations.lerp_background_color(
                    &mut self.scene,
                    prev_color,
                    next_color,
                    self.timings.color_fade,
                    Callbacks::none(),
                );

                // Snap after the tweens above captured their start values.
                self.scene.items[from].mesh.transform.position = vec3(BACKGROUND_POSITION);
                self.current_index = next;
                self.phase = TransitionPhase::Incoming { color_fade };
                log::debug!("outgoing phase done, index now {}", next);
            }
            TransitionPhase::Incoming { color_fade } if !self.animations.is_running(color_fade) => {
                self.phase = TransitionPhase::Idle;
                log::debug!("transition to {} finished", self.current_index);
            }
            _ => {}
        }
    }

    /// Applies a new viewport size. Returns true if anything changed.
    pub fn resize(&mut self, width: i32, height: i32) -> bool {
        if (width, height) == self.viewport || width <= 0 || height <= 0 {
            return false;
        }
        self.viewport = (width, height);
        self.scene.camera.aspect = aspect(width, height);
        self.scene.strip.uniforms.set(
            Uniform::Resolution,
            UniformValue::Vec2(Vector2::new(width as f32, height as f32)),
        );
        true
    }

    /// Feeds the pointer, in window pixels, to the strip's parallax uniforms.
    pub fn on_pointer_move(&mut self, pointer: Vector2, bounds: Rectangle) {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return;
        }
        let ndc = pointer_to_ndc(pointer, bounds);
        let uniforms = &mut self.scene.strip.uniforms;
        uniforms.set(Uniform::Tx, UniformValue::Float(ndc.x));
        uniforms.set(Uniform::Ty, UniformValue::Float(ndc.y));
    }
}

pub fn pointer_to_ndc(pointer: Vector2, bounds: Rectangle) -> Vector2 {
    Vector2::new(
        (pointer.x - bounds.x) / bounds.width * 2.0 - 1.0,
        -((pointer.y - bounds.y) / bounds.height) * 2.0 + 1.0,
    )
}

fn aspect(width: i32, height: i32) -> f32 {
    if height > 0 {
        width as f32 / height as f32
    } else {
        1.0
    }
}
