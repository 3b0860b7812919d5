//! Plain-data scene model: transforms, typed shader uniforms and the camera rig.
//!
//! Nothing in here touches the GPU; the renderer reads this model every frame.

use raylib::prelude::*;
use std::collections::BTreeMap;

use crate::constants::*;

/// Uniforms understood by the carousel shaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Uniform {
    LerpValue,
    Tx,
    Ty,
    Time,
    Resolution,
    Tint,
    Glow,
}

impl Uniform {
    /// Name of the uniform in the GLSL source.
    pub fn glsl_name(self) -> &'static str {
        match self {
            Uniform::LerpValue => "u_lerpValue",
            Uniform::Tx => "tx",
            Uniform::Ty => "ty",
            Uniform::Time => "time",
            Uniform::Resolution => "u_Resolution",
            Uniform::Tint => "u_tint",
            Uniform::Glow => "u_glow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vector2),
    Vec3(Vector3),
    Vec4(Vector4),
}

impl UniformValue {
    pub fn components(&self) -> Vec<f32> {
        match *self {
            UniformValue::Float(v) => vec![v],
            UniformValue::Vec2(v) => vec![v.x, v.y],
            UniformValue::Vec3(v) => vec![v.x, v.y, v.z],
            UniformValue::Vec4(v) => vec![v.x, v.y, v.z, v.w],
        }
    }

    /// Rebuilds a value of the same shape from `components`.
    fn with_components(&self, c: &[f32]) -> UniformValue {
        match self {
            UniformValue::Float(_) => UniformValue::Float(c[0]),
            UniformValue::Vec2(_) => UniformValue::Vec2(Vector2::new(c[0], c[1])),
            UniformValue::Vec3(_) => UniformValue::Vec3(Vector3::new(c[0], c[1], c[2])),
            UniformValue::Vec4(_) => UniformValue::Vec4(Vector4::new(c[0], c[1], c[2], c[3])),
        }
    }
}

/// The two shader programs the carousel draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    /// Sprite items, faded by `u_lerpValue`, lit by `u_glow`.
    Item,
    /// Scrolling parallax background strip.
    Strip,
}

impl ShaderKind {
    /// Uniforms this shader declares, with their initial values.
    pub fn declared(self) -> &'static [Uniform] {
        match self {
            ShaderKind::Item => &[Uniform::LerpValue, Uniform::Tint, Uniform::Glow],
            ShaderKind::Strip => &[
                Uniform::Tx,
                Uniform::Ty,
                Uniform::Time,
                Uniform::Resolution,
                Uniform::Tint,
            ],
        }
    }

    fn initial(uniform: Uniform) -> UniformValue {
        match uniform {
            Uniform::Ty => UniformValue::Float(1.0),
            Uniform::Resolution => UniformValue::Vec2(Vector2::new(0.0, 0.0)),
            // rgb multiplier, neutral
            Uniform::Tint => UniformValue::Vec3(Vector3::new(1.0, 1.0, 1.0)),
            // rgb added with strength w
            Uniform::Glow => UniformValue::Vec4(Vector4::new(0.0, 0.0, 0.0, 0.0)),
            Uniform::LerpValue | Uniform::Tx | Uniform::Time => UniformValue::Float(0.0),
        }
    }
}

/// Typed uniform storage for one material. Only uniforms declared by the
/// shader kind can be read or written, and writes must keep the value shape.
#[derive(Debug, Clone)]
pub struct UniformSet {
    kind: ShaderKind,
    values: BTreeMap<Uniform, UniformValue>,
}

impl UniformSet {
    pub fn new(kind: ShaderKind) -> Self {
        let values = kind
            .declared()
            .iter()
            .map(|&u| (u, ShaderKind::initial(u)))
            .collect();
        Self { kind, values }
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn get(&self, uniform: Uniform) -> Option<UniformValue> {
        self.values.get(&uniform).copied()
    }

    pub fn float(&self, uniform: Uniform) -> Option<f32> {
        match self.get(uniform)? {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Writes `value`; returns false if the uniform is undeclared or the shape differs.
    pub fn set(&mut self, uniform: Uniform, value: UniformValue) -> bool {
        match self.values.get_mut(&uniform) {
            Some(slot) if std::mem::discriminant(slot) == std::mem::discriminant(&value) => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    pub fn set_components(&mut self, uniform: Uniform, components: &[f32]) -> bool {
        match self.values.get(&uniform) {
            Some(current) if current.components().len() == components.len() => {
                let value = current.with_components(components);
                self.set(uniform, value)
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Uniform, UniformValue)> + '_ {
        self.values.iter().map(|(u, v)| (*u, *v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3,
    pub scale: Vector3,
    /// Rotation about the view axis, radians.
    pub rotation: f32,
}

impl Transform {
    pub fn at(position: Vector3) -> Self {
        Self {
            position,
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: 0.0,
        }
    }
}

/// A textured plane. `texture` indexes the renderer's texture table.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub transform: Transform,
    pub size: Vector2,
    pub texture: usize,
    pub uniforms: UniformSet,
}

#[derive(Debug, Clone)]
pub struct DisplayItem {
    pub name: String,
    pub mesh: Mesh,
    pub color: [u8; 3],
}

/// Addresses an object in the scene for the animation system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectId {
    Strip,
    Item(usize),
}

/// Normalized RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn from_bytes(rgb: [u8; 3]) -> Self {
        Self {
            r: rgb[0] as f32 / 255.0,
            g: rgb[1] as f32 / 255.0,
            b: rgb[2] as f32 / 255.0,
        }
    }

    pub fn to_color(self) -> Color {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color::new(byte(self.r), byte(self.g), byte(self.b), 255)
    }
}

/// Perspective camera. Orientation is a view direction, so moving the
/// camera translates the view without turning it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vector3,
    pub forward: Vector3,
    pub fovy: f32,
    /// Viewport width over height; raylib derives the projection from the
    /// framebuffer, this mirrors it for the scene model.
    pub aspect: f32,
}

impl CameraRig {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            forward: Vector3::new(0.0, 0.0, -1.0),
            fovy: CAMERA_FOVY,
            aspect,
        }
    }

    pub fn target(&self) -> Vector3 {
        Vector3::new(
            self.position.x + self.forward.x,
            self.position.y + self.forward.y,
            self.position.z + self.forward.z,
        )
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D::perspective(self.position, self.target(), Vector3::new(0.0, 1.0, 0.0), self.fovy)
    }
}

pub struct Scene {
    pub camera: CameraRig,
    pub background: Rgb,
    pub strip: Mesh,
    pub items: Vec<DisplayItem>,
}

impl Scene {
    pub fn object(&self, id: ObjectId) -> Option<&Mesh> {
        match id {
            ObjectId::Strip => Some(&self.strip),
            ObjectId::Item(i) => self.items.get(i).map(|item| &item.mesh),
        }
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Mesh> {
        match id {
            ObjectId::Strip => Some(&mut self.strip),
            ObjectId::Item(i) => self.items.get_mut(i).map(|item| &mut item.mesh),
        }
    }
}

pub fn vec3(v: [f32; 3]) -> Vector3 {
    Vector3::new(v[0], v[1], v[2])
}
