//! Converting many documents at once.
//!
//! A failing document never stops the batch: it is logged, recorded, and skipped.

use std::io::Read;

use log::{debug, info, warn};

use crate::{convert::MapConverter, error::Error, raster::MapImage, raster::Rendered};

/// Outcome of converting a batch of named documents.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Documents that produced an image, in input order.
    pub converted: Vec<(String, MapImage)>,
    /// Documents holding never-drawn maps.
    pub blank: Vec<String>,
    /// Documents that failed, along with why.
    pub failed: Vec<(String, Error)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.blank.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Convert each `(name, source)` pair in turn.
pub fn convert_all<I, N, R>(converter: &MapConverter, docs: I) -> BatchReport
where
    I: IntoIterator<Item = (N, R)>,
    N: Into<String>,
    R: Read,
{
    let mut report = BatchReport::default();
    for (name, src) in docs {
        let name = name.into();
        debug!("Converting {}", name);
        match converter.convert(src) {
            Ok(conv) => match conv.rendered {
                Rendered::Image(img) => {
                    info!("Converted {}", name);
                    report.converted.push((name, img));
                }
                Rendered::Blank => {
                    info!("Skipping {}: blank map", name);
                    report.blank.push(name);
                }
            },
            Err(err) => {
                warn!("Failed to convert {}: {}", name, err);
                report.failed.push((name, err));
            }
        }
    }
    info!(
        "Batch done: {} converted, {} blank, {} failed",
        report.converted.len(),
        report.blank.len(),
        report.failed.len()
    );
    report
}
