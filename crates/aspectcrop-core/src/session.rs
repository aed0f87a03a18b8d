//! The list of uploaded images and their crop state.
//!
//! An `ImageRegistry` owns every source and cropped raster for one session.
//! Replacing a crop or removing a record drops the old buffers immediately.

use serde::Serialize;
use thiserror::Error;

use crate::aspect::{classify, AspectClass};
use crate::config::{ConfigError, CropConfig};
use crate::decode::{prepare_source, EncodedImage};
use crate::error::{CropError, ResizeError};
use crate::export::{crop_with_fallback, CroppedRaster};
use crate::transform::Selection;

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("No image with id {0}")]
    NotFound(ImageId),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resize(#[from] ResizeError),

    #[error(transparent)]
    Crop(#[from] CropError),
}

/// Session-unique image identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ImageId(u32);

impl ImageId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ImageId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One uploaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub id: ImageId,
    /// Original file name.
    pub name: String,
    /// Size of the upload in bytes.
    pub size: usize,
    /// Upload dimensions before downsampling.
    pub original_width: u32,
    pub original_height: u32,
    /// Source to crop from, possibly downsampled.
    pub source: EncodedImage,
    pub aspect: AspectClass,
    pub cropped: Option<CroppedRaster>,
}

impl ImageRecord {
    /// Whether the image still has to be cropped before export.
    pub fn needs_crop(&self) -> bool {
        !self.aspect.is_accepted && self.cropped.is_none()
    }

    pub fn was_resized(&self) -> bool {
        self.source.width != self.original_width || self.source.height != self.original_height
    }

    /// The file handed to the user: the crop if present, else the upload.
    pub fn download(&self) -> Option<Download<'_>> {
        match &self.cropped {
            Some(raster) => Some(Download {
                id: self.id,
                file_name: &raster.file_name,
                image: &raster.image,
            }),
            None if self.aspect.is_accepted => Some(Download {
                id: self.id,
                file_name: &self.name,
                image: &self.source,
            }),
            None => None,
        }
    }
}

/// A file ready for the batch download.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Download<'a> {
    pub id: ImageId,
    pub file_name: &'a str,
    pub image: &'a EncodedImage,
}

/// Outcome of cropping one record.
#[derive(Debug, Clone, PartialEq)]
pub struct CropReport {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
    pub byte_size: usize,
    /// Set when the rotated crop failed and the unrotated crop was kept.
    pub fallback: Option<CropError>,
}

/// Processing progress across the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub accepted: usize,
    pub cropped: usize,
    /// Rejected images without a crop yet.
    pub pending: usize,
    pub all_complete: bool,
    /// `cropped / total` as a rounded percentage.
    pub progress_percent: u32,
}

/// Ordered collection of image records.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    config: CropConfig,
    records: Vec<ImageRecord>,
    next_id: u32,
}

impl ImageRegistry {
    /// Create an empty registry.
    ///
    /// # Errors
    ///
    /// `SessionError::Config` if the configuration is invalid.
    pub fn new(config: CropConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            config,
            records: Vec::new(),
            next_id: 1,
        })
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: ImageId) -> Result<&mut ImageRecord, SessionError> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(SessionError::NotFound(id))
    }

    /// Decode, downsample and classify an upload, then append it.
    ///
    /// # Errors
    ///
    /// - `SessionError::Resize` if the bytes cannot be decoded or re-encoded
    /// - `SessionError::Config` if the aspect target list is empty
    pub fn add(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<&ImageRecord, SessionError> {
        let name = name.into();
        let size = bytes.len();
        let prepared = prepare_source(bytes, &self.config.resize)?;
        let aspect = classify(
            prepared.original_width,
            prepared.original_height,
            &self.config.aspect,
        )?;

        // Ids start at 1 and never repeat within a session.
        let id = ImageId(self.next_id.max(1));
        self.next_id = id.0.saturating_add(1);

        log::debug!(
            "added {} as image {}: {}x{}, ratio {:.3}, accepted {}",
            name,
            id,
            prepared.original_width,
            prepared.original_height,
            aspect.ratio,
            aspect.is_accepted
        );

        let index = self.records.len();
        self.records.push(ImageRecord {
            id,
            name,
            size,
            original_width: prepared.original_width,
            original_height: prepared.original_height,
            source: prepared.source,
            aspect,
            cropped: None,
        });
        Ok(&self.records[index])
    }

    /// Crop a record, replacing any previous crop on success.
    ///
    /// On failure the previous crop is left untouched.
    pub fn crop(
        &mut self,
        id: ImageId,
        selection: Selection,
        degrees: f64,
    ) -> Result<CropReport, SessionError> {
        let config = &self.config;
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(SessionError::NotFound(id))?;

        let outcome = crop_with_fallback(&record.source, &record.name, selection, degrees, config)?;

        let report = CropReport {
            id,
            width: outcome.raster.image.width,
            height: outcome.raster.image.height,
            byte_size: outcome.raster.image.byte_size(),
            fallback: outcome.fallback,
        };
        record.cropped = Some(outcome.raster);
        Ok(report)
    }

    /// Discard a record's crop. Returns whether there was one.
    pub fn clear_crop(&mut self, id: ImageId) -> Result<bool, SessionError> {
        Ok(self.get_mut(id)?.cropped.take().is_some())
    }

    /// Remove a record, releasing its buffers.
    pub fn remove(&mut self, id: ImageId) -> Result<ImageRecord, SessionError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(SessionError::NotFound(id))?;
        Ok(self.records.remove(index))
    }

    pub fn summary(&self) -> Summary {
        let total = self.records.len();
        let accepted = self.records.iter().filter(|r| r.aspect.is_accepted).count();
        let cropped = self.records.iter().filter(|r| r.cropped.is_some()).count();
        let pending = self.records.iter().filter(|r| r.needs_crop()).count();

        let progress_percent = if total == 0 {
            0
        } else {
            (cropped as f64 / total as f64 * 100.0).round() as u32
        };

        Summary {
            total,
            accepted,
            cropped,
            pending,
            all_complete: pending == 0 && total > 0,
            progress_percent,
        }
    }

    /// Every record that is ready for export, in upload order.
    pub fn downloads(&self) -> Vec<Download<'_>> {
        self.records.iter().filter_map(ImageRecord::download).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::reader::test_support::encoded_gradient;
    use crate::decode::DecodeError;
    use image::ImageFormat;

    fn png(width: u32, height: u32) -> Vec<u8> {
        encoded_gradient(width, height, ImageFormat::Png)
    }

    fn registry() -> ImageRegistry {
        ImageRegistry::new(CropConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = CropConfig::default();
        config.aspect.targets.clear();
        assert_eq!(
            ImageRegistry::new(config).unwrap_err(),
            SessionError::Config(ConfigError::NoTargets)
        );
    }

    #[test]
    fn test_add_classifies() {
        let mut reg = registry();
        let square = reg.add("square.png", png(100, 100)).unwrap().clone();
        let wide = reg.add("wide.png", png(130, 100)).unwrap().clone();

        assert!(square.aspect.is_accepted);
        assert!(!square.needs_crop());
        assert!(!wide.aspect.is_accepted);
        assert!(wide.needs_crop());
        assert_eq!(wide.aspect.nearest.name, "1:1");
        assert_ne!(square.id, wide.id);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_add_records_size_and_dimensions() {
        let bytes = png(64, 80);
        let len = bytes.len();
        let mut reg = registry();
        let record = reg.add("p.png", bytes).unwrap();

        assert_eq!(record.size, len);
        assert_eq!((record.original_width, record.original_height), (64, 80));
        assert!(!record.was_resized());
        assert!(record.aspect.is_accepted);
    }

    #[test]
    fn test_add_downsamples_with_config() {
        let mut config = CropConfig::default();
        config.resize.ceiling = 50;
        config.resize.max_dimension = 40;
        let mut reg = ImageRegistry::new(config).unwrap();

        let record = reg.add("big.png", png(100, 80)).unwrap();
        assert!(record.was_resized());
        assert_eq!((record.source.width, record.source.height), (40, 32));
        assert_eq!((record.original_width, record.original_height), (100, 80));
    }

    #[test]
    fn test_add_garbage_fails_without_record() {
        let mut reg = registry();
        let err = reg.add("x.jpg", b"garbage".to_vec()).unwrap_err();
        assert_eq!(
            err,
            SessionError::Resize(ResizeError::Decode(DecodeError::InvalidFormat))
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn test_crop_completes_record() {
        let mut reg = registry();
        let id = reg.add("wide.png", png(130, 100)).unwrap().id;

        let report = reg.crop(id, Selection::new(15, 0, 100, 100), 0.0).unwrap();
        assert_eq!((report.width, report.height), (100, 100));
        assert!(report.fallback.is_none());

        let record = reg.get(id).unwrap();
        assert!(!record.needs_crop());
        let cropped = record.cropped.as_ref().unwrap();
        assert_eq!(cropped.file_name, "cropped-wide.png");
    }

    #[test]
    fn test_recrop_replaces() {
        let mut reg = registry();
        let id = reg.add("wide.png", png(130, 100)).unwrap().id;

        reg.crop(id, Selection::new(0, 0, 100, 100), 0.0).unwrap();
        reg.crop(id, Selection::new(0, 0, 80, 100), 0.0).unwrap();

        let cropped = reg.get(id).unwrap().cropped.as_ref().unwrap();
        assert_eq!((cropped.image.width, cropped.image.height), (80, 100));
    }

    #[test]
    fn test_failed_crop_keeps_previous() {
        let mut reg = registry();
        let id = reg.add("wide.png", png(130, 100)).unwrap().id;
        reg.crop(id, Selection::new(0, 0, 100, 100), 0.0).unwrap();

        let err = reg.crop(id, Selection::new(100, 0, 100, 100), 0.0).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Crop(CropError::InvalidSelection { .. })
        ));

        let cropped = reg.get(id).unwrap().cropped.as_ref().unwrap();
        assert_eq!((cropped.image.width, cropped.image.height), (100, 100));
    }

    #[test]
    fn test_unknown_id() {
        let mut reg = registry();
        let missing = ImageId::from(42);
        assert_eq!(
            reg.crop(missing, Selection::full(1, 1), 0.0).unwrap_err(),
            SessionError::NotFound(missing)
        );
        assert_eq!(reg.clear_crop(missing), Err(SessionError::NotFound(missing)));
        assert!(reg.remove(missing).is_err());
    }

    #[test]
    fn test_clear_crop() {
        let mut reg = registry();
        let id = reg.add("wide.png", png(130, 100)).unwrap().id;
        reg.crop(id, Selection::new(0, 0, 100, 100), 0.0).unwrap();

        assert_eq!(reg.clear_crop(id), Ok(true));
        assert_eq!(reg.clear_crop(id), Ok(false));
        assert!(reg.get(id).unwrap().needs_crop());
    }

    #[test]
    fn test_remove_keeps_ids_unique() {
        let mut reg = registry();
        let a = reg.add("a.png", png(10, 10)).unwrap().id;
        let removed = reg.remove(a).unwrap();
        assert_eq!(removed.name, "a.png");

        let b = reg.add("b.png", png(10, 10)).unwrap().id;
        assert_ne!(a, b);
        assert!(reg.get(a).is_none());
    }

    #[test]
    fn test_summary_progress() {
        let mut reg = registry();
        assert_eq!(
            reg.summary(),
            Summary {
                total: 0,
                accepted: 0,
                cropped: 0,
                pending: 0,
                all_complete: false,
                progress_percent: 0,
            }
        );

        reg.add("ok.png", png(100, 100)).unwrap();
        let wide = reg.add("wide.png", png(130, 100)).unwrap().id;
        reg.add("tall.png", png(100, 200)).unwrap();

        let summary = reg.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.pending, 2);
        assert!(!summary.all_complete);

        reg.crop(wide, Selection::new(0, 0, 100, 100), 0.0).unwrap();
        let summary = reg.summary();
        assert_eq!(summary.cropped, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.progress_percent, 33);
    }

    #[test]
    fn test_all_complete_and_downloads() {
        let mut reg = registry();
        reg.add("ok.png", png(100, 100)).unwrap();
        let wide = reg.add("wide.png", png(130, 100)).unwrap().id;

        assert_eq!(reg.downloads().len(), 1);

        reg.crop(wide, Selection::new(0, 0, 100, 100), 0.0).unwrap();
        assert!(reg.summary().all_complete);

        let names: Vec<_> = reg.downloads().iter().map(|d| d.file_name).collect();
        assert_eq!(names, ["ok.png", "cropped-wide.png"]);
    }

    #[test]
    fn test_summary_serializes() {
        let reg = registry();
        let json = serde_json::to_value(reg.summary()).unwrap();
        assert_eq!(json["total"], 0);
        assert_eq!(json["all_complete"], false);
        assert_eq!(json["progress_percent"], 0);
    }
}
