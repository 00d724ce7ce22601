//! Pose dump
//!
//! Loads a catalogue from a directory, equips the requested assets, applies
//! bone rotations and prints every layer of the composite in draw order.
//!
//! ```bash
//! pose_dump --catalogue-dir assets --asset body --asset shirt \
//!     --bone elbow_l=45 --bone elbow_r=-10 --arms back
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use marionette_core::asset::{AssetCatalogue, AssetId, CatalogueHandle, GraphicsDefinitionFile};
use marionette_core::bone::{ArmsPose, CharacterPose};
use marionette_core::canvas::CharacterCanvas;
use marionette_demos::{content_hash, describe_layer, parse_bone};
use marionette_graphics::{AppearanceItem, GraphicsCharacter, VfsTextureLoader};
use marionette_vfs::{AssetStore, DirectoryProvider, poll_now};

const MOUNT: &str = "catalogue";
const MAX_TEXTURE_POLLS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum CliArms {
    /// Arms drawn over the body.
    #[default]
    Front,
    /// Arms drawn under the body.
    Back,
}

impl From<CliArms> for ArmsPose {
    fn from(cli: CliArms) -> Self {
        match cli {
            CliArms::Front => ArmsPose::Front,
            CliArms::Back => ArmsPose::Back,
        }
    }
}

/// Print the composite of a posed character.
#[derive(Parser, Debug)]
#[command(name = "pose_dump", version)]
struct Args {
    /// Directory holding the catalogue file and the textures it names.
    #[arg(long, default_value = ".")]
    catalogue_dir: PathBuf,

    /// Catalogue file inside the directory.
    #[arg(long, default_value = "graphics.json")]
    file: String,

    /// Asset to equip. Repeat in equip order.
    #[arg(long = "asset", required = true)]
    assets: Vec<String>,

    /// Bone rotation as NAME=VALUE. Repeatable.
    #[arg(long = "bone", value_parser = parse_bone)]
    bones: Vec<(String, f32)>,

    /// Whether the arms are in front of or behind the body.
    #[arg(long, default_value = "front", value_enum)]
    arms: CliArms,

    /// Override the catalogue's canvas width.
    #[arg(long)]
    width: Option<f32>,

    /// Override the catalogue's canvas height.
    #[arg(long)]
    height: Option<f32>,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut store = AssetStore::new();
    store.mount(MOUNT, DirectoryProvider::new(args.catalogue_dir.clone()));

    let bytes = poll_now(store.read(&format!("{MOUNT}/{}", args.file)))?;
    let hash = content_hash(&bytes);
    let mut handle = CatalogueHandle::new();

    if args.width.is_some() || args.height.is_some() {
        let mut file: GraphicsDefinitionFile = serde_json::from_slice(&bytes)?;
        file.canvas = CharacterCanvas::new(
            args.width.unwrap_or(file.canvas.width),
            args.height.unwrap_or(file.canvas.height),
        );
        let catalogue = AssetCatalogue::from_definition(hash, file)?;
        handle.replace(catalogue);
    } else {
        handle.update(&hash, &bytes)?;
    }
    let catalogue = handle
        .current()
        .ok_or("catalogue handle is empty after loading")?;

    let mut pose = CharacterPose::new(catalogue.skeleton().clone());
    pose.apply(args.bones.iter().map(|(name, value)| (name.as_str(), *value)));
    pose.set_arms(args.arms.into());

    let loader = Arc::new(VfsTextureLoader::new(store, MOUNT));
    let mut character = GraphicsCharacter::new(catalogue.clone(), loader);
    let items = args
        .assets
        .iter()
        .map(|asset| AppearanceItem::new(AssetId::new(asset)))
        .collect();
    character.set_items(items, &pose)?;

    let mut polls = 0;
    while character.pending_loads() > 0 && polls < MAX_TEXTURE_POLLS {
        character.poll_textures();
        polls += 1;
    }
    if character.pending_loads() > 0 {
        log::warn!("{} texture loads still pending", character.pending_loads());
    }

    let canvas = catalogue.canvas();
    let node = character.node();
    println!(
        "catalogue {} canvas {}x{} arms {:?}: {} layers, {} triangles",
        catalogue.hash(),
        canvas.width,
        canvas.height,
        pose.arms(),
        node.len(),
        node.triangle_count()
    );
    for layer in &node.layers {
        println!("{}", describe_layer(layer));
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    marionette_core::init();
    marionette_graphics::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
