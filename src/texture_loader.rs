use std::fs;
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use raylib::prelude::*;

use crate::config::CarouselConfig;

// --- Load one sprite from disk into a GPU texture ---
pub fn load_sprite(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D> {
    let file_bytes = fs::read(image_path)
        .with_context(|| format!("Failed to read sprite {}", image_path.display()))?;

    // raylib wants the extension as a loader hint
    let extension = image_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("png")
        .to_lowercase();

    let image = Image::load_image_from_mem(&(".".to_string() + &extension), &file_bytes)
        .map_err(|e| anyhow!("Failed to decode {}: {}", image_path.display(), e))?;

    let mut texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| anyhow!("Failed to create texture for {}: {}", image_path.display(), e))?;
    texture.set_texture_filter(thread, TextureFilter::TEXTURE_FILTER_ANISOTROPIC_16X);

    log::info!(
        "Loaded {} ({}x{})",
        image_path.display(),
        texture.width(),
        texture.height()
    );
    Ok(texture)
}

// --- Load the strip and every item, in texture slot order ---
pub fn load_sprites(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    config: &CarouselConfig,
) -> Result<Vec<Texture2D>> {
    let mut textures = Vec::with_capacity(config.items.len() + 1);
    textures.push(load_sprite(rl, thread, &config.sprite_path(&config.strip.sprite))?);
    for item in &config.items {
        let texture = load_sprite(rl, thread, &config.sprite_path(&item.sprite))
            .with_context(|| format!("Item '{}'", item.name))?;
        textures.push(texture);
    }
    Ok(textures)
}
