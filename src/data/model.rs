use serde::Serialize;

// ---------------------------------------------------------------------------
// Dataset – one parsed input file
// ---------------------------------------------------------------------------

/// One table of spectra sharing a single measurement axis.
///
/// Fields are private so the row-length invariant cannot be broken after
/// construction: every spectrum has exactly `axis.len()` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    axis: Vec<f64>,
    spectra: Vec<Vec<f64>>,
}

impl Dataset {
    /// Build a dataset, rejecting an empty axis or any ragged row.
    pub fn new(
        name: impl Into<String>,
        axis: Vec<f64>,
        spectra: Vec<Vec<f64>>,
    ) -> Result<Self, DatasetError> {
        if axis.is_empty() {
            return Err(DatasetError::EmptyAxis);
        }
        if let Some((row, sp)) = spectra
            .iter()
            .enumerate()
            .find(|(_, sp)| sp.len() != axis.len())
        {
            return Err(DatasetError::RaggedRow {
                row,
                expected: axis.len(),
                found: sp.len(),
            });
        }
        Ok(Dataset {
            name: name.into(),
            axis,
            spectra,
        })
    }

    /// Source file name, also the registry key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wavenumber axis (x).
    pub fn axis(&self) -> &[f64] {
        &self.axis
    }

    pub fn spectra(&self) -> &[Vec<f64>] {
        &self.spectra
    }

    /// Number of spectra (data rows).
    pub fn spectrum_count(&self) -> usize {
        self.spectra.len()
    }

    /// Bounds-checked access to a single spectrum.
    pub fn spectrum(&self, index: usize) -> Option<&[f64]> {
        self.spectra.get(index).map(Vec::as_slice)
    }

    /// Lightweight metadata served by the listing endpoint.
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            filename: self.name.clone(),
            num_spectra: self.spectrum_count(),
            axis_length: self.axis.len(),
        }
    }
}

/// JSON shape of a dataset in `GET /data`.
///
/// Key names are the ones the browser viewer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "NumSpectra")]
    pub num_spectra: usize,
    #[serde(rename = "AxisLength")]
    pub axis_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    #[error("axis has no values")]
    EmptyAxis,

    #[error("spectrum {row} has {found} values but the axis has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}
