// SPDX-License-Identifier: GPL-3.0-only

//! File import
//!
//! Turns user-picked image files into [`CapturedImage`]s carrying a base64
//! data URI, keyed by the same generator as live captures.

use crate::constants::file_formats;
use crate::errors::ImportError;
use crate::gallery::CapturedImage;
use crate::pipelines::photo::{ObjectKeyGenerator, to_data_uri};
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Raw contents of one picked file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImportedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Image format, sniffed from content first and the file name second
    fn format(&self) -> Option<ImageFormat> {
        image::guess_format(&self.bytes).ok().or_else(|| {
            let ext = Path::new(&self.name).extension()?.to_str()?;
            if file_formats::is_image_extension(ext) {
                ImageFormat::from_extension(ext)
            } else {
                None
            }
        })
    }

    fn into_data_uri(self) -> Result<String, ImportError> {
        let format = self
            .format()
            .ok_or_else(|| ImportError::UnsupportedType(self.name.clone()))?;
        debug!(name = %self.name, ?format, bytes = self.bytes.len(), "Converting file");
        Ok(to_data_uri(format.to_mime_type(), &self.bytes))
    }
}

/// Read picked files from disk
pub async fn read_files(paths: &[PathBuf]) -> Result<Vec<ImportedFile>, ImportError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ImportError::ReadFailed(format!("{}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        files.push(ImportedFile::new(name, bytes));
    }
    Ok(files)
}

/// Convert picked files into captured images, in pick order
///
/// Fails without producing anything when no files were picked or any file
/// is not a recognisable image.
pub fn import(
    files: Vec<ImportedFile>,
    keys: &mut ObjectKeyGenerator,
) -> Result<Vec<CapturedImage>, ImportError> {
    if files.is_empty() {
        return Err(ImportError::NoFilesSelected);
    }

    let payloads = files
        .into_iter()
        .map(ImportedFile::into_data_uri)
        .collect::<Result<Vec<_>, _>>()?;

    info!(count = payloads.len(), "Files imported");
    Ok(payloads
        .into_iter()
        .map(|payload| CapturedImage::new(payload, keys.next_key()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::photo::parse_data_uri;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_zero_files_rejected() {
        let mut keys = ObjectKeyGenerator::new();
        assert_eq!(
            import(Vec::new(), &mut keys),
            Err(ImportError::NoFilesSelected)
        );
    }

    #[test]
    fn test_import_sniffs_content() {
        let mut keys = ObjectKeyGenerator::new();
        let bytes = png_bytes();
        let images = import(
            vec![
                ImportedFile::new("photo.bin", bytes.clone()),
                ImportedFile::new("second.png", bytes.clone()),
            ],
            &mut keys,
        )
        .unwrap();

        assert_eq!(images.len(), 2);
        assert_ne!(images[0].key(), images[1].key());
        let (mime, decoded) = parse_data_uri(images[0].payload()).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_non_image_rejected() {
        let mut keys = ObjectKeyGenerator::new();
        let result = import(
            vec![ImportedFile::new("notes.txt", b"hello".to_vec())],
            &mut keys,
        );
        assert_eq!(
            result,
            Err(ImportError::UnsupportedType("notes.txt".to_string()))
        );
    }

    #[tokio::test]
    async fn test_read_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pic.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let files = read_files(&[path]).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "pic.png");

        let missing = read_files(&[dir.path().join("missing.png")]).await;
        assert!(matches!(missing, Err(ImportError::ReadFailed(_))));
    }
}
