use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dataset::{Dataset, DatasetMetadata};
use crate::error::{GateError, Result};

/// Tabular output format for exported events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[default]
    #[serde(alias = "excel")]
    Xlsx,
    Parquet,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Csv, Self::Xlsx, Self::Parquet];

    /// Extension appended when the output path does not already carry one.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Parquet => "parquet.gzip",
        }
    }

    /// Guess the format from a file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_ascii_lowercase();
        if name.ends_with(".parquet.gzip") || name.ends_with(".parquet") {
            Some(Self::Parquet)
        } else if name.ends_with(".xlsx") {
            Some(Self::Xlsx)
        } else if name.ends_with(".csv") {
            Some(Self::Csv)
        } else {
            None
        }
    }

    /// Whether this build can write the format.
    pub fn is_available(self) -> bool {
        match self {
            Self::Csv => true,
            Self::Xlsx => cfg!(feature = "xlsx"),
            Self::Parquet => cfg!(feature = "parquet"),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::Xlsx => write!(f, "Excel"),
            Self::Parquet => write!(f, "Parquet"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "parquet" => Ok(Self::Parquet),
            other => Err(GateError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Pick the output format and final path.
///
/// An explicit format wins over the extension; without either the default
/// format is used. The format's extension is appended when the path does not
/// already end in it.
pub fn resolve_output_path(output: &Path, format: Option<ExportFormat>) -> (PathBuf, ExportFormat) {
    let detected = ExportFormat::from_path(output);
    let format = format.or(detected).unwrap_or_default();
    if detected == Some(format) {
        return (output.to_path_buf(), format);
    }
    let mut name = output.as_os_str().to_os_string();
    name.push(".");
    name.push(format.extension());
    (PathBuf::from(name), format)
}

/// Write the events at `indices` (all channels, in index order) to `output`.
///
/// The file is first written next to the target under a `.partial` name and
/// renamed once complete; on failure the partial file is removed.
/// Indices past the end of the dataset are skipped.
pub fn export_selection(
    dataset: &Dataset,
    indices: &[usize],
    output: &Path,
    format: ExportFormat,
) -> Result<()> {
    if !format.is_available() {
        return Err(GateError::UnsupportedFormat(format!(
            "{format} support is not compiled in"
        )));
    }

    let total = dataset.event_count();
    let rows: Vec<usize> = indices.iter().copied().filter(|&i| i < total).collect();
    if rows.len() != indices.len() {
        warn!(
            skipped = indices.len() - rows.len(),
            "Skipping out-of-range event indices"
        );
    }

    let partial = partial_path(output);
    let written = match format {
        ExportFormat::Csv => write_csv(dataset, &rows, &partial),
        ExportFormat::Xlsx => write_xlsx(dataset, &rows, &partial),
        ExportFormat::Parquet => write_parquet(dataset, &rows, &partial),
    };
    if let Err(e) = written.and_then(|()| fs::rename(&partial, output).map_err(GateError::from)) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }

    info!(
        path = %output.display(),
        format = %format,
        rows = rows.len(),
        "Exported selection"
    );
    Ok(())
}

/// Write header and TEXT keywords to `<stem>_metadata.json` beside `output`.
pub fn export_metadata_json(metadata: &DatasetMetadata, output: &Path) -> Result<PathBuf> {
    let path = metadata_path(output);
    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(&path, json)?;
    info!(path = %path.display(), "Exported metadata");
    Ok(path)
}

fn metadata_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lower = name.to_ascii_lowercase();
    let stem_len = [".parquet.gzip", ".parquet", ".xlsx", ".csv"]
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map_or_else(
            || Path::new(&name).file_stem().map_or(0, |s| s.len()),
            |ext| name.len() - ext.len(),
        );
    output.with_file_name(format!("{}_metadata.json", &name[..stem_len]))
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".partial");
    PathBuf::from(name)
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

fn write_csv(dataset: &Dataset, rows: &[usize], path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let header: Vec<String> = dataset.channels().iter().map(|c| csv_field(c)).collect();
    writeln!(out, "{}", header.join(","))?;

    let columns = dataset.columns();
    for &row in rows {
        for (col, column) in columns.iter().enumerate() {
            if col > 0 {
                out.write_all(b",")?;
            }
            write!(out, "{}", column[row])?;
        }
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(feature = "xlsx")]
fn write_xlsx(dataset: &Dataset, rows: &[usize], path: &Path) -> Result<()> {
    use rust_xlsxwriter::{Format, Workbook};

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let meta_sheet = workbook.add_worksheet();
    meta_sheet.set_name("metadata")?;
    meta_sheet.write_string_with_format(0, 0, "Key", &bold)?;
    meta_sheet.write_string_with_format(0, 1, "Value", &bold)?;
    let metadata = dataset.metadata();
    let mut row: u32 = 1;
    for (key, value) in &metadata.header {
        meta_sheet.write_string(row, 0, key)?;
        meta_sheet.write_string(row, 1, value)?;
        row += 1;
    }
    row += 1;
    meta_sheet.write_string_with_format(row, 0, "FCS keywords", &bold)?;
    row += 1;
    for (key, value) in &metadata.text {
        meta_sheet.write_string(row, 0, key)?;
        meta_sheet.write_string(row, 1, value)?;
        row += 1;
    }

    let data_sheet = workbook.add_worksheet();
    data_sheet.set_name("data")?;
    for (col, channel) in dataset.channels().iter().enumerate() {
        data_sheet.write_string_with_format(0, col as u16, channel, &bold)?;
    }
    let columns = dataset.columns();
    for (out_row, &event) in rows.iter().enumerate() {
        for (col, column) in columns.iter().enumerate() {
            data_sheet.write_number(out_row as u32 + 1, col as u16, column[event])?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(not(feature = "xlsx"))]
fn write_xlsx(_dataset: &Dataset, _rows: &[usize], _path: &Path) -> Result<()> {
    Err(GateError::UnsupportedFormat("xlsx".into()))
}

#[cfg(feature = "parquet")]
fn write_parquet(dataset: &Dataset, rows: &[usize], path: &Path) -> Result<()> {
    use std::sync::Arc;

    use arrow_array::{ArrayRef, Float64Array, RecordBatch};
    use arrow_schema::{DataType, Field, Schema};
    use parquet::arrow::arrow_writer::ArrowWriter;
    use parquet::basic::{Compression, GzipLevel};
    use parquet::file::properties::WriterProperties;

    let schema = Arc::new(Schema::new(
        dataset
            .channels()
            .iter()
            .map(|c| Field::new(c.as_str(), DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = dataset
        .columns()
        .iter()
        .map(|column| {
            let values: Vec<f64> = rows.iter().map(|&r| column[r]).collect();
            Arc::new(Float64Array::from(values)) as ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::GZIP(GzipLevel::default()))
        .build();
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

#[cfg(not(feature = "parquet"))]
fn write_parquet(_dataset: &Dataset, _rows: &[usize], _path: &Path) -> Result<()> {
    Err(GateError::UnsupportedFormat("parquet".into()))
}
