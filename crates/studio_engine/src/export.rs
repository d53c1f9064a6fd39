use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use studio_logging::{studio_debug, studio_info};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::{asset_filename, AssetId, ImageReference};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("image reference is not a base64 data url")]
    NotADataUrl,
    #[error("image payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("export target {0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("writing image failed: {0}")]
    Io(#[from] io::Error),
}

/// Decodes a completed asset's data URL and writes the image into `dir`,
/// creating the directory when missing.
///
/// An earlier export of the same asset is replaced in one step: the bytes go
/// to a temp file next to the target, which is then renamed over it.
pub fn export_image(
    dir: &Path,
    name: &str,
    asset_id: AssetId,
    image_url: &str,
) -> Result<PathBuf, ExportError> {
    let image = ImageReference::from_data_url(image_url).ok_or(ExportError::NotADataUrl)?;
    let bytes = image.decode()?;
    let target = dir.join(asset_filename(name, asset_id, image.file_extension()));

    prepare_dir(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|err| ExportError::Io(err.error))?;

    studio_info!("Exported asset {} ({} bytes) to {:?}", asset_id, bytes.len(), target);
    Ok(target)
}

fn prepare_dir(dir: &Path) -> Result<(), ExportError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ExportError::NotADirectory(dir.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            studio_debug!("Creating export directory {:?}", dir);
            fs::create_dir_all(dir)?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
