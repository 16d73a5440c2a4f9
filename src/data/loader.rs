use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use super::model::{Dataset, DatasetError};
use super::registry::{DuplicateName, Registry};

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

/// Table formats recognised by file extension (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// `.txt` – tab-delimited spectra table.
    Tsv,
    /// `.csv` – reserved, not parsed yet.
    Csv,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "txt" => Some(TableFormat::Tsv),
            "csv" => Some(TableFormat::Csv),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a single table could not be turned into a [`Dataset`].
///
/// Line numbers are 1-based and count physical lines in the file; columns are
/// 1-based tab-separated fields.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("file contains no rows")]
    Empty,

    #[error("line {line}: header row has no axis values")]
    MissingAxis { line: u64 },

    #[error("line {line}, column {column}: '{value}' is not a number")]
    InvalidNumber {
        line: u64,
        column: usize,
        value: String,
    },

    #[error("line {line}: row has {found} values but the axis has {expected}")]
    RowLength {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Invalid(#[from] DatasetError),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Startup failures while building the [`Registry`]. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to walk data directory")]
    Walk(#[from] walkdir::Error),

    #[error("failed to open {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{}: .{extension} tables are not supported yet", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("{}: not a dataset file", .0.display())]
    UnknownFormat(PathBuf),

    #[error(transparent)]
    Duplicate(#[from] DuplicateName),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every dataset under `dir` (recursively) into a [`Registry`].
///
/// Fail-fast: the first walk or parse error aborts the whole load, nothing
/// partial is returned. `.csv` files are reported and skipped; files with
/// other extensions are ignored.
pub fn load_folder(dir: &Path) -> Result<Registry, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }

    let mut datasets = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        if TableFormat::from_path(path).is_none() {
            debug!("Ignoring {}", path.display());
            continue;
        }

        match load_file(path) {
            Ok(ds) => {
                debug!(
                    "Loaded {} ({} spectra × {} points)",
                    path.display(),
                    ds.spectrum_count(),
                    ds.axis().len()
                );
                datasets.push(ds);
            }
            Err(LoadError::UnsupportedFormat { path, extension }) => {
                warn!(
                    "Skipping {}: .{extension} tables are not supported yet",
                    path.display()
                );
            }
            Err(e) => return Err(e),
        }
    }

    let registry = Registry::from_datasets(datasets)?;
    info!(
        "Loaded {} dataset(s) from {}",
        registry.len(),
        dir.display()
    );
    Ok(registry)
}

/// Load a single dataset from a file. Dispatch by extension.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    match TableFormat::from_path(path) {
        Some(TableFormat::Tsv) => {
            let file = File::open(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_table(file_name(path), file).map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                source,
            })
        }
        Some(TableFormat::Csv) => Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: "csv".to_string(),
        }),
        None => Err(LoadError::UnknownFormat(path.to_path_buf())),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tab-delimited table parser
// ---------------------------------------------------------------------------

/// Layout:
///
/// ```text
///          <tab>  4000.0 <tab> 3998.0 <tab> ...     ← header: blank labels, then axis
/// sample_1 <tab>  0.12   <tab> 0.14   <tab> ...     ← one spectrum per row
/// sample_2 <tab>  0.11   <tab> 0.13   <tab> ...
/// ```
///
/// The first non-empty header cell marks where numbers start; every column
/// before it is a label column in all rows.
pub fn parse_table<R: Read>(name: impl Into<String>, reader: R) -> Result<Dataset, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut records = reader.records();

    let header = records.next().ok_or(ParseError::Empty)??;
    let header_line = line_of(&header, 1);

    let start_index = header
        .iter()
        .position(|cell| !cell.trim().is_empty())
        .ok_or(ParseError::MissingAxis { line: header_line })?;

    let axis = parse_cells(&header, start_index, header_line)?;

    let mut spectra = Vec::new();
    for (row_no, result) in records.enumerate() {
        let record = result?;
        let line = line_of(&record, row_no as u64 + 2);

        let found = record.len().saturating_sub(start_index);
        if found != axis.len() {
            return Err(ParseError::RowLength {
                line,
                expected: axis.len(),
                found,
            });
        }

        spectra.push(parse_cells(&record, start_index, line)?);
    }

    Ok(Dataset::new(name, axis, spectra)?)
}

fn line_of(record: &csv::StringRecord, fallback: u64) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(fallback)
}

fn parse_cells(
    record: &csv::StringRecord,
    start_index: usize,
    line: u64,
) -> Result<Vec<f64>, ParseError> {
    record
        .iter()
        .enumerate()
        .skip(start_index)
        .map(|(col, cell)| {
            cell.trim()
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidNumber {
                    line,
                    column: col + 1,
                    value: cell.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_sample() {
        let text = "\t1.0\t2.0\t3.0\nrowA\t10.0\t20.0\t30.0\n";
        let ds = parse_table("sample.txt", text.as_bytes()).unwrap();

        assert_eq!(ds.name(), "sample.txt");
        assert_eq!(ds.axis(), &[1.0, 2.0, 3.0]);
        assert_eq!(ds.spectrum_count(), 1);
        assert_eq!(ds.spectrum(0), Some(&[10.0, 20.0, 30.0][..]));
    }

    #[test]
    fn test_parse_multiple_label_columns() {
        let text = "\t\t\t400\t402\n\
                    A\t1\tx\t0.5\t0.6\n\
                    B\t2\ty\t0.7\t0.8\n";
        let ds = parse_table("labels.txt", text.as_bytes()).unwrap();

        assert_eq!(ds.axis(), &[400.0, 402.0]);
        assert_eq!(ds.spectra(), &[vec![0.5, 0.6], vec![0.7, 0.8]]);
    }

    #[test]
    fn test_parse_crlf_and_blank_lines() {
        let text = "\t1\t2\r\n\r\nr1\t3\t4\r\nr2\t5\t6\r\n";
        let ds = parse_table("crlf.txt", text.as_bytes()).unwrap();
        assert_eq!(ds.spectrum_count(), 2);
        assert_eq!(ds.spectrum(1), Some(&[5.0, 6.0][..]));
    }

    #[test]
    fn test_parse_header_only() {
        let ds = parse_table("h.txt", "\t1\t2\n".as_bytes()).unwrap();
        assert_eq!(ds.spectrum_count(), 0);
        assert_eq!(ds.axis().len(), 2);
    }

    #[test]
    fn test_bad_axis_cell() {
        let err = parse_table("bad.txt", "\t1.0\tabc\n".as_bytes()).unwrap_err();
        match err {
            ParseError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 1);
                assert_eq!(column, 3);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_data_cell() {
        let text = "\t1\t2\nr1\t3\t4\nr2\t5\tnope\n";
        let err = parse_table("bad.txt", text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 3, column: 3, .. }));
    }

    #[test]
    fn test_empty_cell_in_numeric_region() {
        let text = "\t1\t2\t3\nr1\t3\t\t5\n";
        let err = parse_table("gap.txt", text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { column: 3, .. }));
    }

    #[test]
    fn test_short_row() {
        let text = "\t1\t2\t3\nr1\t3\t4\n";
        let err = parse_table("short.txt", text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::RowLength { line: 2, expected: 3, found: 2 }
        ));
    }

    #[test]
    fn test_long_row() {
        let text = "\t1\t2\nr1\t3\t4\t5\n";
        let err = parse_table("long.txt", text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::RowLength { expected: 2, found: 3, .. }
        ));
    }

    #[test]
    fn test_empty_file() {
        let err = parse_table("empty.txt", "".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::Empty));
    }

    #[test]
    fn test_header_without_axis() {
        let err = parse_table("blank.txt", "\t\t\nr1\t1\t2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MissingAxis { line: 1 }));
    }

    #[test]
    fn test_quote_in_label_is_literal() {
        let text = "\t1\t2\n\"a\t1\t2\n\"b\t3\t4\n";
        let ds = parse_table("quoted.txt", text.as_bytes()).unwrap();
        assert_eq!(ds.spectrum_count(), 2);
        assert_eq!(ds.spectra(), &[vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(TableFormat::from_path(Path::new("a/b.txt")), Some(TableFormat::Tsv));
        assert_eq!(TableFormat::from_path(Path::new("B.TXT")), Some(TableFormat::Tsv));
        assert_eq!(TableFormat::from_path(Path::new("c.csv")), Some(TableFormat::Csv));
        assert_eq!(TableFormat::from_path(Path::new("d.json")), None);
        assert_eq!(TableFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_load_file_csv_is_unsupported() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "table.csv", "a,b\n1,2\n");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_load_file_unknown_extension() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "notes.md", "# readme\n");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnknownFormat(ref p) if p == &path));
    }

    #[test]
    fn test_load_folder_sample() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "sample.txt", "\t1.0\t2.0\t3.0\nrowA\t10.0\t20.0\t30.0\n");

        let reg = load_folder(tmp.path()).unwrap();
        assert_eq!(reg.len(), 1);
        let ds = reg.get("sample.txt").unwrap();
        assert_eq!(ds.axis(), &[1.0, 2.0, 3.0]);
        assert_eq!(ds.spectrum_count(), 1);
    }

    #[test]
    fn test_load_folder_recurses_and_filters() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "top.txt", "\t1\nr\t2\n");
        write(tmp.path(), "nested/deeper/inner.txt", "\t1\t2\nr\t3\t4\nq\t5\t6\n");
        write(tmp.path(), "nested/table.csv", "not,parsed\n");
        write(tmp.path(), "notes.md", "# readme\n");

        let reg = load_folder(tmp.path()).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("inner.txt").unwrap().spectrum_count(), 2);
        assert!(reg.get("table.csv").is_none());
    }

    #[test]
    fn test_load_folder_empty() {
        let tmp = TempDir::new().unwrap();
        let reg = load_folder(tmp.path()).unwrap();
        assert!(reg.is_empty());
    }

    #[test]
    fn test_load_folder_one_bad_file_aborts_everything() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a_good.txt", "\t1\t2\nr\t3\t4\n");
        write(tmp.path(), "b_bad.txt", "\t1\tx\nr\t3\t4\n");
        write(tmp.path(), "c_good.txt", "\t1\t2\nr\t3\t4\n");

        let err = load_folder(tmp.path()).unwrap_err();
        match err {
            LoadError::Parse { path, source } => {
                assert!(path.ends_with("b_bad.txt"));
                assert!(matches!(source, ParseError::InvalidNumber { line: 1, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_folder_duplicate_names() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "run1/scan.txt", "\t1\nr\t2\n");
        write(tmp.path(), "run2/scan.txt", "\t1\nr\t3\n");

        let err = load_folder(tmp.path()).unwrap_err();
        assert!(matches!(err, LoadError::Duplicate(DuplicateName(ref n)) if n == "scan.txt"));
    }

    #[test]
    fn test_load_folder_not_a_directory() {
        let tmp = TempDir::new().unwrap();
        let file = write(tmp.path(), "sample.txt", "\t1\nr\t2\n");

        assert!(matches!(load_folder(&file), Err(LoadError::NotADirectory(_))));
        assert!(matches!(
            load_folder(&tmp.path().join("missing")),
            Err(LoadError::NotADirectory(_))
        ));
    }

    fn render(axis: &[f64], rows: &[Vec<f64>]) -> String {
        let mut out = String::new();
        for v in axis {
            out.push('\t');
            out.push_str(&v.to_string());
        }
        out.push('\n');
        for (i, row) in rows.iter().enumerate() {
            out.push_str(&format!("row{i}"));
            for v in row {
                out.push('\t');
                out.push_str(&v.to_string());
            }
            out.push('\n');
        }
        out
    }

    proptest! {
        #[test]
        fn prop_shape_survives_parsing(
            (axis, rows) in (1usize..12).prop_flat_map(|width| (
                prop::collection::vec(-1e6f64..1e6, width),
                prop::collection::vec(prop::collection::vec(-1e6f64..1e6, width), 0..20),
            ))
        ) {
            let ds = parse_table("gen.txt", render(&axis, &rows).as_bytes()).unwrap();

            prop_assert_eq!(ds.spectrum_count(), rows.len());
            prop_assert!(ds.spectra().iter().all(|sp| sp.len() == axis.len()));
            // Display for f64 prints the shortest string that round-trips.
            prop_assert_eq!(ds.axis(), &axis[..]);
            prop_assert_eq!(ds.spectra(), &rows[..]);
        }
    }
}
