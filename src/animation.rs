//! Property animations over the scene model.
//!
//! Every entry point captures start values from the scene, queues a tween and
//! returns a [`TweenId`]. [`AnimationSystem::tick`] advances all in-flight
//! tweens, writes the interpolated values back and fires callbacks.

use raylib::prelude::*;

use crate::scene::{ObjectId, Rgb, Scene, Uniform, UniformValue};
use crate::tween::{Easing, Tween};

pub type SceneFn = Box<dyn FnOnce(&mut Scene)>;
pub type SceneFnMut = Box<dyn FnMut(&mut Scene)>;

/// Hooks around a single animation.
///
/// `pre` runs before start values are captured, `on_update` after every
/// property write, `on_complete` once after the final write.
#[derive(Default)]
pub struct Callbacks {
    pre: Option<SceneFn>,
    on_update: Option<SceneFnMut>,
    on_complete: Option<SceneFn>,
}

impl Callbacks {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn pre(mut self, f: impl FnOnce(&mut Scene) + 'static) -> Self {
        self.pre = Some(Box::new(f));
        self
    }

    pub fn on_update(mut self, f: impl FnMut(&mut Scene) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce(&mut Scene) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(u64);

#[derive(Debug, Clone)]
enum Target {
    CameraPosition,
    Position(ObjectId),
    Scale(ObjectId),
    Uniforms(Vec<(ObjectId, Uniform)>),
    /// Interpolated in 0-255, written normalized.
    BackgroundColor,
}

struct Animation {
    id: TweenId,
    tween: Tween,
    target: Target,
    on_update: Option<SceneFnMut>,
    on_complete: Option<SceneFn>,
}

pub struct AnimationSystem {
    easing: Easing,
    running: Vec<Animation>,
    next_id: u64,
}

impl AnimationSystem {
    pub fn new(easing: Easing) -> Self {
        Self {
            easing,
            running: Vec::new(),
            next_id: 0,
        }
    }

    pub fn lerp_camera_position(
        &mut self,
        scene: &mut Scene,
        position: Vector3,
        duration: f32,
        callbacks: Callbacks,
    ) -> TweenId {
        self.start(scene, Target::CameraPosition, duration, callbacks, |scene| {
            let p = scene.camera.position;
            Some((vec![p.x, p.y, p.z], vec![position.x, position.y, position.z]))
        })
    }

    pub fn lerp_object_position(
        &mut self,
        scene: &mut Scene,
        object: ObjectId,
        position: Vector3,
        duration: f32,
        callbacks: Callbacks,
    ) -> TweenId {
        self.start(scene, Target::Position(object), duration, callbacks, |scene| {
            let p = scene.object(object)?.transform.position;
            Some((vec![p.x, p.y, p.z], vec![position.x, position.y, position.z]))
        })
    }

    pub fn lerp_scale(
        &mut self,
        scene: &mut Scene,
        object: ObjectId,
        value: Vector3,
        duration: f32,
        callbacks: Callbacks,
    ) -> TweenId {
        self.start(scene, Target::Scale(object), duration, callbacks, |scene| {
            let s = scene.object(object)?.transform.scale;
            Some((vec![s.x, s.y, s.z], vec![value.x, value.y, value.z]))
        })
    }

    pub fn lerp_uniform_vec4(
        &mut self,
        scene: &mut Scene,
        object: ObjectId,
        uniform: Uniform,
        value: Vector4,
        duration: f32,
        callbacks: Callbacks,
    ) -> TweenId {
        let to = UniformValue::Vec4(value);
        self.lerp_uniforms(scene, &[(object, uniform)], &[to], duration, callbacks)
    }

    /// Fades several vec3 uniforms with one shared progress.
    pub fn lerp_uniform_vec3(
        &mut self,
        scene: &mut Scene,
        uniforms: &[(ObjectId, Uniform)],
        values: &[Vector3],
        duration: f32,
        callbacks: Callbacks,
    ) -> TweenId {
        let to: Vec<UniformValue> = values.iter().map(|v| UniformValue::Vec3(*v)).collect();
        self.lerp_uniforms(scene, uniforms, &to, duration, callbacks)
    }

    /// Fades several float uniforms with one shared progress.
    pub fn lerp_uniform_float(
        &mut self,
        scene: &mut Scene,
        uniforms: &[(ObjectId, Uniform)],
        values: &[f32],
        duration: f32,
        callbacks: Callbacks,
    ) -> TweenId {
        let to: Vec<UniformValue> = values.iter().map(|v| UniformValue::Float(*v)).collect();
        self.lerp_uniforms(scene, uniforms, &to, duration, callbacks)
    }

    /// Cross-fades the scene background from `prev` to `value`, both 0-255 triples.
    pub fn lerp_background_color(
        &mut self,
        scene: &mut Scene,
        prev: [u8; 3],
        value: [u8; 3],
        duration: f32,
        callbacks: Callbacks,
    ) -> TweenId {
        self.start(scene, Target::BackgroundColor, duration, callbacks, |_| {
            let bytes = |c: [u8; 3]| c.iter().map(|&v| v as f32).collect::<Vec<_>>();
            Some((bytes(prev), bytes(value)))
        })
    }

    /// Advances every in-flight animation by `dt` seconds.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) {
        let mut i = 0;
        while i < self.running.len() {
            let animation = &mut self.running[i];
            animation.tween.advance(dt);
            write(scene, &animation.target, &animation.tween.values());
            if let Some(on_update) = animation.on_update.as_mut() {
                on_update(scene);
            }

            if animation.tween.is_finished() {
                let mut done = self.running.remove(i);
                if let Some(on_complete) = done.on_complete.take() {
                    on_complete(scene);
                }
            } else {
                i += 1;
            }
        }
    }

    pub fn is_running(&self, id: TweenId) -> bool {
        self.running.iter().any(|a| a.id == id)
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    fn lerp_uniforms(
        &mut self,
        scene: &mut Scene,
        uniforms: &[(ObjectId, Uniform)],
        values: &[UniformValue],
        duration: f32,
        callbacks: Callbacks,
    ) -> TweenId {
        let targets = uniforms.to_vec();
        self.start(scene, Target::Uniforms(targets.clone()), duration, callbacks, |scene| {
            if targets.len() != values.len() {
                return None;
            }
            let mut from = Vec::new();
            let mut to = Vec::new();
            for ((object, uniform), value) in targets.iter().zip(values) {
                let current = scene.object(*object)?.uniforms.get(*uniform)?;
                if std::mem::discriminant(&current) != std::mem::discriminant(value) {
                    return None;
                }
                from.extend(current.components());
                to.extend(value.components());
            }
            Some((from, to))
        })
    }

    fn start(
        &mut self,
        scene: &mut Scene,
        target: Target,
        duration: f32,
        callbacks: Callbacks,
        capture: impl FnOnce(&Scene) -> Option<(Vec<f32>, Vec<f32>)>,
    ) -> TweenId {
        let Callbacks {
            pre,
            on_update,
            on_complete,
        } = callbacks;

        if let Some(pre) = pre {
            pre(scene);
        }

        let id = TweenId(self.next_id);
        self.next_id += 1;

        let Some((from, to)) = capture(&*scene) else {
            log::warn!("animation target {:?} is not present in the scene, skipping", target);
            return id;
        };

        self.running.push(Animation {
            id,
            tween: Tween::new(from, to, duration, self.easing),
            target,
            on_update,
            on_complete,
        });
        id
    }
}

fn write(scene: &mut Scene, target: &Target, values: &[f32]) {
    match target {
        Target::CameraPosition => {
            scene.camera.position = Vector3::new(values[0], values[1], values[2]);
        }
        Target::Position(object) => {
            if let Some(mesh) = scene.object_mut(*object) {
                mesh.transform.position = Vector3::new(values[0], values[1], values[2]);
            }
        }
        Target::Scale(object) => {
            if let Some(mesh) = scene.object_mut(*object) {
                mesh.transform.scale = Vector3::new(values[0], values[1], values[2]);
            }
        }
        Target::Uniforms(targets) => {
            let mut offset = 0;
            for (object, uniform) in targets {
                let Some(mesh) = scene.object_mut(*object) else {
                    continue;
                };
                let width = mesh.uniforms.get(*uniform).map_or(0, |v| v.components().len());
                mesh.uniforms.set_components(*uniform, &values[offset..offset + width]);
                offset += width;
            }
        }
        Target::BackgroundColor => {
            scene.background = Rgb {
                r: values[0] / 255.0,
                g: values[1] / 255.0,
                b: values[2] / 255.0,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CameraRig, DisplayItem, Mesh, ShaderKind, Transform, UniformSet};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn mesh(kind: ShaderKind) -> Mesh {
        Mesh {
            transform: Transform::at(Vector3::new(0.0, 0.0, 0.0)),
            size: Vector2::new(1.0, 1.0),
            texture: 0,
            uniforms: UniformSet::new(kind),
        }
    }

    fn scene() -> Scene {
        let items = (0..2)
            .map(|index| DisplayItem {
                name: format!("item{}", index),
                mesh: mesh(ShaderKind::Item),
                color: [0, 0, 0],
            })
            .collect();
        Scene {
            camera: CameraRig::new(1.0),
            background: Rgb::default(),
            strip: mesh(ShaderKind::Strip),
            items,
        }
    }

    #[test]
    fn object_position_reaches_target() {
        let mut scene = scene();
        let mut animations = AnimationSystem::new(Easing::CircularInOut);
        let id = animations.lerp_object_position(
            &mut scene,
            ObjectId::Item(1),
            Vector3::new(10.0, -4.0, 2.0),
            1.0,
            Callbacks::none(),
        );

        animations.tick(0.5, &mut scene);
        let half = scene.items[1].mesh.transform.position;
        assert!(close(half.x, 5.0));
        assert!(animations.is_running(id));

        animations.tick(0.6, &mut scene);
        assert_eq!(scene.items[1].mesh.transform.position, Vector3::new(10.0, -4.0, 2.0));
        assert!(!animations.is_running(id));
        assert!(animations.is_idle());
    }

    #[test]
    fn camera_and_scale_targets_are_written() {
        let mut scene = scene();
        let mut animations = AnimationSystem::new(Easing::Linear);
        animations.lerp_camera_position(
            &mut scene,
            Vector3::new(0.0, 0.0, 5.0),
            1.0,
            Callbacks::none(),
        );
        animations.lerp_scale(
            &mut scene,
            ObjectId::Strip,
            Vector3::new(1.0, 2.0, 1.0),
            2.0,
            Callbacks::none(),
        );

        animations.tick(1.0, &mut scene);
        assert_eq!(scene.camera.position, Vector3::new(0.0, 0.0, 5.0));
        assert!(close(scene.strip.transform.scale.y, 1.5));

        animations.tick(1.0, &mut scene);
        assert_eq!(scene.strip.transform.scale, Vector3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn camera_move_keeps_its_view_direction() {
        let mut scene = scene();
        let mut animations = AnimationSystem::new(Easing::CircularInOut);
        animations.lerp_camera_position(
            &mut scene,
            Vector3::new(10.0, 0.0, 0.0),
            1.0,
            Callbacks::none(),
        );

        animations.tick(0.5, &mut scene);
        assert_eq!(scene.camera.forward, Vector3::new(0.0, 0.0, -1.0));

        animations.tick(0.5, &mut scene);
        let camera = scene.camera.to_camera3d();
        assert_eq!(camera.position, Vector3::new(10.0, 0.0, 0.0));
        assert_eq!(camera.target, Vector3::new(10.0, 0.0, -1.0));
        let direction = Vector3::new(
            camera.target.x - camera.position.x,
            camera.target.y - camera.position.y,
            camera.target.z - camera.position.z,
        );
        assert_eq!(direction, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn callbacks_run_in_order_and_complete_once() {
        let mut scene = scene();
        let mut animations = AnimationSystem::new(Easing::CircularInOut);
        let log = Rc::new(RefCell::new(Vec::new()));

        let (pre, update, complete) = (log.clone(), log.clone(), log.clone());
        animations.lerp_uniform_float(
            &mut scene,
            &[(ObjectId::Item(0), Uniform::LerpValue)],
            &[1.0],
            0.3,
            Callbacks::none()
                .pre(move |_| pre.borrow_mut().push("pre"))
                .on_update(move |_| update.borrow_mut().push("update"))
                .on_complete(move |_| complete.borrow_mut().push("complete")),
        );
        assert_eq!(*log.borrow(), vec!["pre"]);

        for _ in 0..5 {
            animations.tick(0.1, &mut scene);
        }
        let log = log.borrow();
        assert_eq!(log.first(), Some(&"pre"));
        assert_eq!(log.last(), Some(&"complete"));
        assert_eq!(log.iter().filter(|e| **e == "complete").count(), 1);
        assert!(log.iter().filter(|e| **e == "update").count() >= 3);
    }

    #[test]
    fn on_complete_sees_the_final_value() {
        let mut scene = scene();
        let mut animations = AnimationSystem::new(Easing::CircularInOut);
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        animations.lerp_uniform_float(
            &mut scene,
            &[(ObjectId::Item(0), Uniform::LerpValue)],
            &[1.0],
            1.0,
            Callbacks::none().on_complete(move |scene| {
                *sink.borrow_mut() = scene.items[0].mesh.uniforms.float(Uniform::LerpValue);
            }),
        );
        animations.tick(2.0, &mut scene);
        assert_eq!(*seen.borrow(), Some(1.0));
    }

    #[test]
    fn batched_float_uniforms_share_progress() {
        let mut scene = scene();
        scene.items[1].mesh.uniforms.set(Uniform::LerpValue, UniformValue::Float(1.0));
        let mut animations = AnimationSystem::new(Easing::Linear);
        animations.lerp_uniform_float(
            &mut scene,
            &[
                (ObjectId::Item(0), Uniform::LerpValue),
                (ObjectId::Item(1), Uniform::LerpValue),
            ],
            &[1.0, 0.0],
            1.0,
            Callbacks::none(),
        );
        animations.tick(0.25, &mut scene);
        let a = scene.items[0].mesh.uniforms.float(Uniform::LerpValue).unwrap();
        let b = scene.items[1].mesh.uniforms.float(Uniform::LerpValue).unwrap();
        assert!(close(a, 0.25));
        assert!(close(b, 0.75));
    }

    #[test]
    fn batched_vec3_uniforms_share_progress() {
        let mut scene = scene();
        let mut animations = AnimationSystem::new(Easing::Linear);
        let updates = Rc::new(RefCell::new(0));
        let completed = Rc::new(RefCell::new(false));
        let (count, flag) = (updates.clone(), completed.clone());
        let id = animations.lerp_uniform_vec3(
            &mut scene,
            &[(ObjectId::Item(0), Uniform::Tint), (ObjectId::Strip, Uniform::Tint)],
            &[Vector3::new(0.5, 0.0, 1.0), Vector3::new(0.0, 1.0, 0.2)],
            1.0,
            Callbacks::none()
                .on_update(move |_| *count.borrow_mut() += 1)
                .on_complete(move |_| *flag.borrow_mut() = true),
        );

        animations.tick(0.5, &mut scene);
        let Some(UniformValue::Vec3(item)) = scene.items[0].mesh.uniforms.get(Uniform::Tint) else {
            panic!("item tint is not a vec3");
        };
        let Some(UniformValue::Vec3(strip)) = scene.strip.uniforms.get(Uniform::Tint) else {
            panic!("strip tint is not a vec3");
        };
        assert!(close(item.x, 0.75) && close(item.y, 0.5) && close(item.z, 1.0));
        assert!(close(strip.x, 0.5) && close(strip.y, 1.0) && close(strip.z, 0.6));
        assert!(animations.is_running(id));
        assert!(!*completed.borrow());

        animations.tick(0.5, &mut scene);
        assert_eq!(
            scene.items[0].mesh.uniforms.get(Uniform::Tint),
            Some(UniformValue::Vec3(Vector3::new(0.5, 0.0, 1.0)))
        );
        assert_eq!(
            scene.strip.uniforms.get(Uniform::Tint),
            Some(UniformValue::Vec3(Vector3::new(0.0, 1.0, 0.2)))
        );
        assert_eq!(*updates.borrow(), 2);
        assert!(*completed.borrow());
    }

    #[test]
    fn vec4_uniform_reaches_its_target() {
        let mut scene = scene();
        let mut animations = AnimationSystem::new(Easing::Linear);
        let completed = Rc::new(RefCell::new(None));
        let sink = completed.clone();
        let id = animations.lerp_uniform_vec4(
            &mut scene,
            ObjectId::Item(1),
            Uniform::Glow,
            Vector4::new(1.0, 0.5, 0.0, 1.0),
            1.0,
            Callbacks::none().on_complete(move |scene| {
                *sink.borrow_mut() = scene.items[1].mesh.uniforms.get(Uniform::Glow);
            }),
        );

        animations.tick(0.5, &mut scene);
        let Some(UniformValue::Vec4(glow)) = scene.items[1].mesh.uniforms.get(Uniform::Glow) else {
            panic!("glow is not a vec4");
        };
        assert!(close(glow.x, 0.5) && close(glow.y, 0.25) && close(glow.z, 0.0) && close(glow.w, 0.5));
        assert!(animations.is_running(id));
        assert_eq!(
            scene.items[0].mesh.uniforms.get(Uniform::Glow),
            Some(UniformValue::Vec4(Vector4::new(0.0, 0.0, 0.0, 0.0)))
        );

        animations.tick(0.5, &mut scene);
        let target = Some(UniformValue::Vec4(Vector4::new(1.0, 0.5, 0.0, 1.0)));
        assert_eq!(scene.items[1].mesh.uniforms.get(Uniform::Glow), target);
        assert_eq!(*completed.borrow(), target);
        assert!(!animations.is_running(id));
    }

    #[test]
    fn undeclared_uniforms_are_skipped() {
        let mut scene = scene();
        let mut animations = AnimationSystem::new(Easing::Linear);
        let completed = Rc::new(RefCell::new(false));
        let flag = completed.clone();
        let id = animations.lerp_uniform_vec3(
            &mut scene,
            &[(ObjectId::Strip, Uniform::LerpValue)],
            &[Vector3::new(1.0, 1.0, 1.0)],
            1.0,
            Callbacks::none().on_complete(move |_| *flag.borrow_mut() = true),
        );
        assert!(!animations.is_running(id));
        animations.tick(2.0, &mut scene);
        assert!(!*completed.borrow());
    }

    #[test]
    fn vec4_uniform_with_wrong_shape_is_skipped() {
        let mut scene = scene();
        let mut animations = AnimationSystem::new(Easing::Linear);
        let id = animations.lerp_uniform_vec4(
            &mut scene,
            ObjectId::Strip,
            Uniform::Time,
            Vector4::new(1.0, 2.0, 3.0, 4.0),
            1.0,
            Callbacks::none(),
        );
        assert!(!animations.is_running(id));
        assert_eq!(scene.strip.uniforms.float(Uniform::Time), Some(0.0));
    }

    #[test]
    fn background_color_interpolates_in_byte_space() {
        let mut scene = scene();
        let mut animations = AnimationSystem::new(Easing::Linear);
        animations.lerp_background_color(&mut scene, [0, 100, 255], [255, 200, 55], 1.0, Callbacks::none());

        animations.tick(0.5, &mut scene);
        assert!(close(scene.background.r, 127.5 / 255.0));
        assert!(close(scene.background.g, 150.0 / 255.0));
        assert!(close(scene.background.b, 155.0 / 255.0));

        animations.tick(0.5, &mut scene);
        assert_eq!(scene.background, Rgb::from_bytes([255, 200, 55]));
    }
}
