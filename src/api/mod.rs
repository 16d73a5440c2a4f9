/// HTTP query layer over the dataset registry.
///
/// ```text
///  GET /data                          → JSON [{Filename, NumSpectra, AxisLength}]
///  GET /data/{dataid}/data            → all spectra, row-major  ┐
///  GET /data/{dataid}/axis            → axis                    ├ little-endian f64
///  GET /data/{dataid}/{spectrumid}/data → one spectrum          ┘
/// ```

pub mod error;
pub mod handlers;
