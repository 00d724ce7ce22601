//! Shared fixtures for the character integration tests.
//!
//! A [`TestContext`] owns an in-memory texture store, a loader reading from
//! it and a catalogue built from one of the JSON bundles below.

use std::sync::Arc;

use marionette_core::asset::{AssetCatalogue, AssetId};
use marionette_core::bone::CharacterPose;
use marionette_graphics::{GraphicsCharacter, VfsTextureLoader};
use marionette_vfs::{AssetStore, MemoryProvider};

/// Body with a `FULL`-mirrored arm layer sharing the torso's points.
pub const BODY_BUNDLE: &str = r#"{
    "skeleton": {
        "body": {"pos": [500.0, 700.0]},
        "elbow_l": {"pos": [700.0, 500.0], "mirror": "elbow_r"}
    },
    "assets": {
        "body": {"layers": [
            {"name": "torso", "x": 100, "y": 200, "width": 800, "height": 800,
             "image": "body/torso.png", "priority": "BODY", "point_type": ["torso"],
             "points": [
                {"pos": [400, 300], "type": "torso"},
                {"pos": [600, 300], "type": "torso"},
                {"pos": [400, 900], "type": "torso"},
                {"pos": [600, 900], "type": "torso"},
                {"pos": [500, 600], "type": "torso"},
                {"pos": [650, 450], "type": "arm_l",
                 "transforms": [{"type": "rotate", "bone": "elbow_l", "factor": 1.0}]},
                {"pos": [780, 430], "type": "arm_l",
                 "transforms": [{"type": "rotate", "bone": "elbow_l", "factor": 1.0}]},
                {"pos": [720, 620], "type": "arm_l",
                 "transforms": [{"type": "rotate", "bone": "elbow_l", "factor": 1.0}]}
             ]},
            {"name": "arm_l", "x": 100, "y": 200, "width": 800, "height": 800,
             "image": "body/arm.png", "priority": "ARMS", "mirror": "FULL",
             "point_type": ["arm_l"], "points": 0}
        ]},
        "glove": {"layers": [
            {"name": "hand", "x": 200, "y": 500, "width": 100, "height": 100,
             "image": "glove/base.png", "priority": "ABOVE_ARMS",
             "image_overrides": [
                {"image": "glove/a.png",
                 "condition": [[{"bone": "elbow_r", "operator": ">=", "value": 10.0}]]},
                {"image": "glove/b.png",
                 "condition": [[{"bone": "elbow_r", "operator": "<=", "value": -5.0}]]}
             ],
             "points": [{"pos": [200, 500]}, {"pos": [300, 500]}, {"pos": [250, 600]}]}
        ]}
    }
}"#;

/// One asset per priority band, each a single triangle.
pub const BANDS_BUNDLE: &str = r#"{
    "skeleton": {"body": {"pos": [500.0, 700.0]}},
    "assets": {
        "backdrop": {"layers": [{"name": "backdrop", "x": 0, "y": 0, "width": 1000, "height": 1500,
            "image": "backdrop.png", "priority": "BACKGROUND",
            "points": [{"pos": [0, 0]}, {"pos": [1000, 0]}, {"pos": [500, 1500]}]}]},
        "cape": {"layers": [{"name": "cape", "x": 300, "y": 300, "width": 400, "height": 800,
            "image": "cape.png", "priority": "BELOW_BODY",
            "points": [{"pos": [300, 300]}, {"pos": [700, 300]}, {"pos": [500, 1100]}]}]},
        "skin": {"layers": [{"name": "skin", "x": 300, "y": 300, "width": 400, "height": 800,
            "image": "skin.png", "priority": "BODY",
            "points": [{"pos": [300, 300]}, {"pos": [700, 300]}, {"pos": [500, 1100]}]}]},
        "sleeves": {"layers": [{"name": "sleeves", "x": 200, "y": 300, "width": 600, "height": 400,
            "image": "sleeves.png", "priority": "ARMS",
            "points": [{"pos": [200, 300]}, {"pos": [800, 300]}, {"pos": [500, 700]}]}]},
        "bracers": {"layers": [{"name": "bracers", "x": 200, "y": 300, "width": 600, "height": 400,
            "image": "bracers.png", "priority": "ABOVE_ARMS",
            "points": [{"pos": [200, 300]}, {"pos": [800, 300]}, {"pos": [500, 700]}]}]},
        "aura": {"layers": [{"name": "aura", "x": 0, "y": 0, "width": 1000, "height": 1500,
            "image": "aura.png", "priority": "OVERLAY",
            "points": [{"pos": [0, 0]}, {"pos": [1000, 0]}, {"pos": [500, 1500]}]}]}
    }
}"#;

/// Every texture name used by the bundles above.
pub const TEXTURES: &[&str] = &[
    "body/torso.png",
    "body/arm.png",
    "glove/base.png",
    "glove/a.png",
    "glove/b.png",
    "backdrop.png",
    "cape.png",
    "skin.png",
    "sleeves.png",
    "bracers.png",
    "aura.png",
];

/// Initialize test logging once.
pub fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .parse_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Encode a solid `width`x`height` PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 160, 120, 255]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

pub fn id(name: &str) -> AssetId {
    AssetId::from(name)
}

pub struct TestContext {
    pub textures: MemoryProvider,
    pub loader: Arc<VfsTextureLoader>,
    pub catalogue: Arc<AssetCatalogue>,
    pub pose: CharacterPose,
}

impl TestContext {
    /// Load `bundle` and serve every texture in [`TEXTURES`] from memory.
    pub fn new(bundle: &str) -> Self {
        init_logging();
        let textures = MemoryProvider::new();
        for (i, name) in TEXTURES.iter().enumerate() {
            textures.insert(*name, png(i as u32 + 1, 1));
        }
        let mut store = AssetStore::new();
        store.mount("textures", textures.clone());

        let catalogue = Arc::new(AssetCatalogue::from_json("test", bundle.as_bytes()).unwrap());
        let pose = CharacterPose::new(catalogue.skeleton().clone());
        Self {
            textures,
            loader: Arc::new(VfsTextureLoader::new(store, "textures")),
            catalogue,
            pose,
        }
    }

    pub fn character(&self) -> GraphicsCharacter {
        GraphicsCharacter::new(self.catalogue.clone(), self.loader.clone())
    }
}
