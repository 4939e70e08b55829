//! Save and restore worlds on disk
//!
//! The file format itself lives with the world (see [`World::serialize`]);
//! this module deals with files, paths and error reporting.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::options::WorldOptions;
use crate::world::{CodecError, World};

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Save data error: {0}")]
    Codec(#[from] CodecError),

    #[error("Save file not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Write the world to `path`, replacing any existing file
pub fn save_world(world: &World, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    world.serialize(&mut writer)?;
    writer.flush()?;
    info!(path = %path.display(), rooms = world.rooms().len(), "saved world");
    Ok(())
}

/// Read a world from `path`; the file must exist
pub fn read_world(path: impl AsRef<Path>, options: &WorldOptions) -> Result<World, SaveError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|_| SaveError::NotFound(path.to_path_buf()))?;
    let mut world = World::deserialize(BufReader::new(file), options)?;
    world.set_save_path(path);
    info!(path = %path.display(), "loaded world");
    Ok(world)
}

/// Read a world from `path`, starting a fresh one when no file exists yet
pub fn load_world(path: impl AsRef<Path>, options: &WorldOptions) -> Result<World, SaveError> {
    let path = path.as_ref();
    if !save_exists(path) {
        info!(path = %path.display(), "no save file, starting a new world");
        let mut world = World::new(options);
        world.set_save_path(path);
        return Ok(world);
    }
    read_world(path, options)
}

/// Check if a save file exists
pub fn save_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}
