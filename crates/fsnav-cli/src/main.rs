//! fsnav — prints a directory through the navigation cache.
//!
//! Usage: `fsnav [PATH] [DEPTH]`. Lists `PATH` (default: the current
//! directory) down to `DEPTH` levels (default: 1), folders first and in
//! natural order. Image files show their thumbnail size when thumbnails are
//! enabled in the config.

use std::path::PathBuf;

use anyhow::Context;
use fsnav_core::{Config, CoreError, FileSystem, NodeId, PathBackend};
use tracing_subscriber::EnvFilter;

/// Extensions the thumbnail decoder is built to read.
const IMAGE_EXTENSIONS: &str = "png,gif,bmp,ico,tif,tiff,webp";

/// Returns the path to the config file (~/.config/fsnav/config.toml).
fn config_path() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
        .join(".config")
        .join("fsnav")
        .join("config.toml")
}

/// Loads the config, falling back to defaults when the file is absent.
fn load_config() -> Config {
    let path = config_path();
    match Config::load(&path) {
        Ok(config) => config,
        Err(CoreError::NotFound(_)) => Config::default(),
        Err(e) => {
            tracing::warn!("ignoring {}: {e}", path.display());
            Config::default()
        }
    }
}

fn print_tree(
    fs: &mut FileSystem<PathBackend>,
    config: &Config,
    id: NodeId,
    depth: usize,
    max_depth: usize,
) {
    if depth >= max_depth {
        return;
    }
    let children = fs.children(id).to_vec();
    for child in children {
        let Some(node) = fs.node(child) else {
            continue;
        };
        let indent = "  ".repeat(depth);
        let name = node.display_name().to_string();
        let is_container = node.is_container();
        let wants_thumbnail = config.thumbnails.enabled && node.has_extension(IMAGE_EXTENSIONS);

        if is_container {
            println!("{indent}{name}/");
            print_tree(fs, config, child, depth + 1, max_depth);
        } else if wants_thumbnail {
            match fs.load_thumbnail(child, config.thumbnails.max_size) {
                Ok(thumb) => println!("{indent}{name} [{}x{}]", thumb.width(), thumb.height()),
                Err(e) => {
                    tracing::debug!("no thumbnail for {name}: {e}");
                    println!("{indent}{name}");
                }
            }
        } else {
            println!("{indent}{name}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let start = match args.next() {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir().context("failed to get current directory")?,
    };
    let max_depth = match args.next() {
        Some(depth) => depth
            .parse::<usize>()
            .with_context(|| format!("invalid depth {depth:?}"))?,
        None => 1,
    };

    let config = load_config();
    let mut fs: FileSystem<PathBackend> = FileSystem::init(PathBackend::from_config(&config));

    let start_display = start.display().to_string();
    let node = fs
        .resolve_path(&start_display)
        .with_context(|| format!("cannot open {start_display}"))?;

    if let Some(n) = fs.node(node) {
        println!("{}", n.file_name());
    }
    print_tree(&mut fs, &config, node, 0, max_depth);

    let stats = fs.teardown();
    tracing::debug!("released {} cached nodes", stats.nodes);
    Ok(())
}
