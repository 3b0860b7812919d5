use std::collections::BTreeMap;
use anyhow::{Context, Result};
use raylib::prelude::*;
use thiserror::Error;

use crate::scene::{Mesh, Scene, ShaderKind, Uniform, UniformSet, UniformValue};

const ITEM_FS: &str = include_str!("shaders/item.fs");
const STRIP_FS: &str = include_str!("shaders/strip.fs");

#[derive(Debug, Error, PartialEq)]
pub enum ShaderError {
    #[error("uniform '{name}' is missing from the {kind:?} shader")]
    MissingUniform { kind: ShaderKind, name: &'static str },
}

/// Looks up every uniform `kind` declares. A location of -1 means the
/// program does not expose it (not declared, optimized out, or the shader
/// failed to compile and raylib fell back to its default).
pub fn resolve_locations(
    kind: ShaderKind,
    lookup: impl Fn(&str) -> i32,
) -> Result<BTreeMap<Uniform, i32>, ShaderError> {
    kind.declared()
        .iter()
        .map(|&uniform| {
            let name = uniform.glsl_name();
            match lookup(name) {
                loc if loc >= 0 => Ok((uniform, loc)),
                _ => Err(ShaderError::MissingUniform { kind, name }),
            }
        })
        .collect()
}

/// A compiled shader with its uniform locations resolved up front.
pub struct ShaderBinding {
    shader: Shader,
    kind: ShaderKind,
    locations: BTreeMap<Uniform, i32>,
}

impl ShaderBinding {
    pub fn bind(shader: Shader, kind: ShaderKind) -> Result<Self, ShaderError> {
        let locations = resolve_locations(kind, |name| shader.get_shader_location(name))?;
        Ok(Self { shader, kind, locations })
    }

    pub fn upload(&mut self, uniforms: &UniformSet) {
        debug_assert_eq!(uniforms.kind(), self.kind);
        for (uniform, value) in uniforms.iter() {
            let Some(&loc) = self.locations.get(&uniform) else {
                continue;
            };
            match value {
                UniformValue::Float(v) => self.shader.set_shader_value(loc, v),
                UniformValue::Vec2(v) => self.shader.set_shader_value(loc, v),
                UniformValue::Vec3(v) => self.shader.set_shader_value(loc, v),
                UniformValue::Vec4(v) => self.shader.set_shader_value(loc, v),
            }
        }
    }
}

pub struct Renderer {
    textures: Vec<Texture2D>,
    item_shader: ShaderBinding,
    strip_shader: ShaderBinding,
}

impl Renderer {
    /// `textures` must follow the scene's slot order: strip first, then items.
    pub fn new(rl: &mut RaylibHandle, thread: &RaylibThread, textures: Vec<Texture2D>) -> Result<Self> {
        let item = rl.load_shader_from_memory(thread, None, Some(ITEM_FS));
        let item_shader = ShaderBinding::bind(item, ShaderKind::Item).context("Item shader")?;

        let strip = rl.load_shader_from_memory(thread, None, Some(STRIP_FS));
        let strip_shader = ShaderBinding::bind(strip, ShaderKind::Strip).context("Strip shader")?;

        Ok(Self { textures, item_shader, strip_shader })
    }

    pub fn draw(&mut self, d: &mut RaylibDrawHandle, scene: &Scene) {
        d.clear_background(scene.background.to_color());

        let mut d3 = d.begin_mode3D(scene.camera.to_camera3d());
        let meshes = std::iter::once(&scene.strip).chain(scene.items.iter().map(|item| &item.mesh));
        for mesh in meshes {
            let Some(texture) = self.textures.get(mesh.texture) else {
                continue;
            };
            let binding = match mesh.uniforms.kind() {
                ShaderKind::Item => &mut self.item_shader,
                ShaderKind::Strip => &mut self.strip_shader,
            };
            binding.upload(&mesh.uniforms);

            let (size, origin) = billboard_extent(mesh);
            let mut s = d3.begin_shader_mode(&binding.shader);
            s.draw_billboard_pro(
                scene.camera.to_camera3d(),
                texture,
                Rectangle::new(0.0, 0.0, texture.width() as f32, texture.height() as f32),
                mesh.transform.position,
                Vector3::new(0.0, 1.0, 0.0),
                size,
                origin,
                mesh.transform.rotation.to_degrees(),
                Color::WHITE,
            );
        }
    }
}

/// Scaled quad size and its center, the pivot for rotation.
fn billboard_extent(mesh: &Mesh) -> (Vector2, Vector2) {
    let scale = mesh.transform.scale;
    let size = Vector2::new(mesh.size.x * scale.x, mesh.size.y * scale.y);
    (size, Vector2::new(size.x * 0.5, size.y * 0.5))
}
