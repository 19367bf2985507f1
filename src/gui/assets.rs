//! Asset Cache
//! Decodes page images from the assets directory into egui textures.

use egui::{ColorImage, TextureHandle, TextureOptions};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct AssetCache {
    root: PathBuf,
    /// `None` marks an asset that failed to load, so it is not retried every frame.
    textures: HashMap<String, Option<TextureHandle>>,
}

impl AssetCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: HashMap::new(),
        }
    }

    pub fn texture(&mut self, ctx: &egui::Context, asset: &str) -> Option<&TextureHandle> {
        let root = &self.root;
        self.textures
            .entry(asset.to_string())
            .or_insert_with(|| match decode(&root.join(asset)) {
                Ok(image) => Some(ctx.load_texture(asset, image, TextureOptions::LINEAR)),
                Err(e) => {
                    log::warn!("Asset {} not available: {}", asset, e);
                    None
                }
            })
            .as_ref()
    }
}

fn decode(path: &Path) -> Result<ColorImage, image::ImageError> {
    let rgba = image::open(path)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_from_disk() {
        let path = std::env::temp_dir().join(format!("vientos_{}_asset.png", std::process::id()));
        image::RgbaImage::from_pixel(3, 2, image::Rgba([0, 79, 109, 255]))
            .save(&path)
            .unwrap();
        let decoded = decode(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(decoded.size, [3, 2]);
        assert_eq!(decoded.pixels[0], egui::Color32::from_rgb(0, 79, 109));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(decode(Path::new("no/such/asset.png")).is_err());
    }
}
