use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use tracing::info;

const SUNFLOWER_FILE: &str = "sunflower.txt";
const DRAGONFLY_FILE: &str = "dragonfly.txt";

/// A small glyph picture, one string per terminal row.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    rows: Vec<String>,
}

/// Sprites loaded once at startup and kept for the life of the process.
pub struct Assets {
    pub sunflower: Sprite,
    pub dragonfly: Sprite,
}

impl Sprite {
    pub fn parse(source: &str) -> Result<Self> {
        let rows: Vec<String> = source.lines()
            .map(|line| line.trim_end().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        if rows.is_empty() {
            bail!("sprite has no visible rows");
        }

        Ok(Sprite { rows })
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read sprite {}", path.display()))?;
        Sprite::parse(&source).with_context(|| format!("invalid sprite {}", path.display()))
    }
}

impl Assets {
    pub fn load(dir: &Path) -> Result<Self> {
        let sunflower = Sprite::load(&dir.join(SUNFLOWER_FILE))?;
        let dragonfly = Sprite::load(&dir.join(DRAGONFLY_FILE))?;
        info!(dir = %dir.display(), "assets loaded");
        Ok(Assets { sunflower, dragonfly })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_blank_lines() {
        let sprite = Sprite::parse("\n}{  \n\n").unwrap();
        assert_eq!(sprite.rows(), &["}{".to_string()]);
    }

    #[test]
    fn empty_sprite_is_rejected() {
        assert!(Sprite::parse("  \n\n").is_err());
    }

    #[test]
    fn missing_asset_dir_is_an_error() {
        let err = Assets::load(Path::new("definitely/not/here")).err().unwrap();
        assert!(format!("{:#}", err).contains("sunflower.txt"));
    }

    #[test]
    fn bundled_assets_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let assets = Assets::load(&dir).unwrap();
        assert!(!assets.sunflower.rows().is_empty());
        assert!(!assets.dragonfly.rows().is_empty());
    }
}
