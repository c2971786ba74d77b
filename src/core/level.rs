//! Level files: where the player starts and which sprites stand where.
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use glam::DVec2;
use serde::Deserialize;

use crate::core::objects::ObjectHandler;
use crate::core::sprite::{
    ANIMATED_SCALE, ANIMATED_SHIFT, ANIMATION_INTERVAL, Animation, STATIC_SCALE, STATIC_SHIFT,
    Sprite,
};
use crate::render::textures::{ImageKey, TextureManager, TextureStore};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SpriteSpec {
    Static {
        image: String,
        pos: DVec2,
        scale: Option<f64>,
        shift: Option<f64>,
    },
    Animated {
        frames: Vec<String>,
        pos: DVec2,
        scale: Option<f64>,
        shift: Option<f64>,
        interval_ms: Option<u64>,
    },
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LevelSpec {
    #[serde(default = "default_start")]
    pub player_start: DVec2,
    #[serde(default)]
    pub player_angle: f64,
    #[serde(default)]
    pub sprites: Vec<SpriteSpec>,
    /// Fail on sprite images that cannot be read instead of generating one.
    #[serde(default)]
    pub strict_assets: bool,
}

fn default_start() -> DVec2 {
    DVec2::new(1.5, 5.0)
}

impl LevelSpec {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).with_context(|| format!("read level: {}", path.display()))?;
        let spec: Self =
            serde_json::from_str(&txt).with_context(|| format!("parse level: {}", path.display()))?;
        Ok(spec)
    }

    /// Candelabra plus green and red lights, as in the shipped demo map.
    pub fn builtin() -> Self {
        let green = |x, y| SpriteSpec::Animated {
            frames: (0..4).map(|i| format!("green_light/{i}")).collect(),
            pos: DVec2::new(x, y),
            scale: None,
            shift: None,
            interval_ms: None,
        };
        let red = |x, y| SpriteSpec::Animated {
            frames: (0..4).map(|i| format!("red_light/{i}")).collect(),
            pos: DVec2::new(x, y),
            scale: None,
            shift: None,
            interval_ms: None,
        };
        Self {
            player_start: default_start(),
            player_angle: 0.0,
            sprites: vec![
                SpriteSpec::Static {
                    image: "candlebra".into(),
                    pos: DVec2::new(10.5, 3.5),
                    scale: None,
                    shift: None,
                },
                green(11.5, 3.5),
                green(1.5, 1.5),
                green(1.5, 7.5),
                green(5.5, 3.25),
                green(5.5, 4.75),
                green(7.5, 2.5),
                green(7.5, 5.5),
                red(14.5, 7.5),
                red(12.5, 7.5),
                red(9.5, 7.5),
            ],
            strict_assets: false,
        }
    }

    /// Load every image the level names from `sprite_dir` and fill a registry.
    /// `start` is the clock reading animations count from.
    pub fn populate(
        &self,
        textures: &mut TextureManager,
        sprite_dir: impl AsRef<Path>,
        start: Duration,
    ) -> Result<ObjectHandler> {
        let dir = sprite_dir.as_ref();
        let mut objects = ObjectHandler::new();
        for (i, spec) in self.sprites.iter().enumerate() {
            let sprite = match spec {
                SpriteSpec::Static { image, pos, scale, shift } => {
                    let key = self
                        .load_image(textures, dir, image)
                        .with_context(|| format!("sprite {i}"))?;
                    let size = textures
                        .image_size(key)
                        .with_context(|| format!("sprite {i}: image {image}"))?;
                    Sprite::new_static(*pos, key, size)
                        .with_scale(scale.unwrap_or(STATIC_SCALE), shift.unwrap_or(STATIC_SHIFT))
                }
                SpriteSpec::Animated { frames, pos, scale, shift, interval_ms } => {
                    if frames.is_empty() {
                        bail!("sprite {i}: animated sprite without frames");
                    }
                    let keys = frames
                        .iter()
                        .map(|f| self.load_image(textures, dir, f))
                        .collect::<Result<Vec<_>>>()
                        .with_context(|| format!("sprite {i}"))?;
                    let size = textures
                        .image_size(keys[0])
                        .with_context(|| format!("sprite {i}: image {}", frames[0]))?;
                    let interval = interval_ms.map(Duration::from_millis).unwrap_or(ANIMATION_INTERVAL);
                    Sprite::new_animated(*pos, Animation::new(keys, interval, start), size)
                        .with_scale(scale.unwrap_or(ANIMATED_SCALE), shift.unwrap_or(ANIMATED_SHIFT))
                }
            };
            objects.add_sprite(sprite);
        }
        log::info!("level: {} sprites", objects.len());
        Ok(objects)
    }

    fn load_image(&self, textures: &mut TextureManager, dir: &Path, name: &str) -> Result<ImageKey> {
        if self.strict_assets {
            textures.load_sprite_strict(dir, name)
        } else {
            Ok(textures.load_sprite(dir, name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sprite::SpriteKind;

    #[test]
    fn parses_both_sprite_kinds() {
        let txt = r#"{
            "player_start": [2.5, 2.5],
            "sprites": [
                { "kind": "static", "image": "barrel", "pos": [3.5, 4.5] },
                { "kind": "animated", "frames": ["a", "b"], "pos": [1.5, 1.5],
                  "scale": 1.0, "interval_ms": 250 }
            ]
        }"#;
        let spec: LevelSpec = serde_json::from_str(txt).unwrap();
        assert_eq!(spec.player_start, DVec2::new(2.5, 2.5));
        assert_eq!(spec.player_angle, 0.0);
        assert_eq!(spec.sprites.len(), 2);
        assert!(!spec.strict_assets);

        let mut tm = TextureManager::new(64);
        let objects = spec.populate(&mut tm, "/nonexistent", Duration::ZERO).unwrap();
        let sprites: Vec<&Sprite> = objects.sprites().collect();
        assert_eq!(sprites[0].pos, DVec2::new(3.5, 4.5));
        assert_eq!(sprites[0].scale, STATIC_SCALE);
        assert_eq!(sprites[1].scale, 1.0);
        assert_eq!(sprites[1].height_shift, ANIMATED_SHIFT);
        match &sprites[1].kind {
            SpriteKind::Animated(anim) => {
                assert_eq!(anim.frame_count(), 2);
                assert_eq!(anim.interval(), Duration::from_millis(250));
            }
            SpriteKind::Static { .. } => panic!("expected animation"),
        }
    }

    #[test]
    fn builtin_level_populates() {
        let mut tm = TextureManager::new(64);
        let objects = LevelSpec::builtin().populate(&mut tm, "/nonexistent", Duration::ZERO).unwrap();
        assert_eq!(objects.len(), 11);
        // frames are loaded once and shared between sprites using the same animation
        let heads: Vec<_> = objects.sprites().filter_map(Sprite::image).collect();
        assert_eq!(heads[1], heads[2]);
        assert_eq!(heads[1], tm.sprite_key("green_light/0").unwrap());
        assert_eq!(heads[8], tm.sprite_key("red_light/0").unwrap());
        assert!(tm.sprite_key("red_light/3").is_some());
    }

    #[test]
    fn animation_without_frames_is_rejected() {
        let spec: LevelSpec =
            serde_json::from_str(r#"{ "sprites": [{ "kind": "animated", "frames": [], "pos": [1, 1] }] }"#)
                .unwrap();
        let mut tm = TextureManager::new(64);
        assert!(spec.populate(&mut tm, "/nonexistent", Duration::ZERO).is_err());
    }

    #[test]
    fn strict_level_rejects_missing_images() {
        let txt = r#"{
            "strict_assets": true,
            "sprites": [{ "kind": "animated", "frames": ["torch/0", "torch/1"], "pos": [2, 2] }]
        }"#;
        let spec: LevelSpec = serde_json::from_str(txt).unwrap();
        let mut tm = TextureManager::new(64);
        let err = spec.populate(&mut tm, "/nonexistent", Duration::ZERO).unwrap_err();
        assert!(format!("{err:#}").contains("torch/0.png"), "{err:#}");

        let lenient = LevelSpec { strict_assets: false, ..spec };
        assert_eq!(lenient.populate(&mut tm, "/nonexistent", Duration::ZERO).unwrap().len(), 1);
    }

    #[test]
    fn unknown_kind_fails_to_parse() {
        let res: Result<LevelSpec, _> =
            serde_json::from_str(r#"{ "sprites": [{ "kind": "npc", "pos": [1, 1] }] }"#);
        assert!(res.is_err());
    }
}
