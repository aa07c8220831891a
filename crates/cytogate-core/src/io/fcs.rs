use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use memmap2::Mmap;
use tracing::{debug, info};

use crate::dataset::{Dataset, DatasetMetadata};
use crate::error::{GateError, Result};

pub const FCS_HEADER_SIZE: usize = 58;

/// Fixed-width ASCII header at the start of every FCS file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FcsHeader {
    /// e.g. `FCS3.1`
    pub version: String,
    pub text_start: usize,
    pub text_end: usize,
    pub data_start: usize,
    pub data_end: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DataType {
    Float,
    Double,
    Integer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

/// Per-channel decoding parameters from `$PnB`, `$PnR`, `$PnE`, `$PnG`.
#[derive(Clone, Debug)]
struct ChannelLayout {
    bytes: usize,
    range: f64,
    mask: u64,
    log_decades: f64,
    log_offset: f64,
    gain: f64,
}

/// Memory-mapped FCS 2.0/3.x reader.
pub struct FcsReader {
    mmap: Mmap,
    pub header: FcsHeader,
    pub keywords: BTreeMap<String, String>,
}

impl FcsReader {
    /// Open a file and parse its header and TEXT segment.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let header = parse_header(&mmap)?;
        if header.text_end >= mmap.len() || header.text_start >= header.text_end {
            return Err(GateError::InvalidFcs(format!(
                "TEXT segment {}..{} outside file of {} bytes",
                header.text_start,
                header.text_end,
                mmap.len()
            )));
        }
        let keywords = parse_text(&mmap[header.text_start..=header.text_end])?;
        debug!(
            version = %header.version,
            keywords = keywords.len(),
            "Parsed FCS TEXT segment"
        );

        Ok(Self {
            mmap,
            header,
            keywords,
        })
    }

    pub fn keyword(&self, key: &str) -> Option<&str> {
        self.keywords.get(&key.to_ascii_uppercase()).map(String::as_str)
    }

    fn required(&self, key: &str) -> Result<&str> {
        self.keyword(key)
            .ok_or_else(|| GateError::InvalidFcs(format!("missing keyword {key}")))
    }

    fn required_usize(&self, key: &str) -> Result<usize> {
        let raw = self.required(key)?;
        raw.trim()
            .parse()
            .map_err(|_| GateError::InvalidFcs(format!("{key} is not an integer: {raw:?}")))
    }

    pub fn channel_count(&self) -> Result<usize> {
        self.required_usize("$PAR")
    }

    /// `$PnN` for every channel, falling back to `Channel{n}`.
    pub fn channel_names(&self) -> Result<Vec<String>> {
        let n = self.channel_count()?;
        Ok((1..=n)
            .map(|i| {
                self.keyword(&format!("$P{i}N"))
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| format!("Channel{i}"))
            })
            .collect())
    }

    fn data_type(&self) -> Result<DataType> {
        match self.required("$DATATYPE")?.trim().to_ascii_uppercase().as_str() {
            "F" => Ok(DataType::Float),
            "D" => Ok(DataType::Double),
            "I" => Ok(DataType::Integer),
            other => Err(GateError::UnsupportedDataType(other.to_string())),
        }
    }

    fn endian(&self) -> Endian {
        match self.keyword("$BYTEORD").map(str::trim) {
            Some(order) if order.starts_with('1') => Endian::Little,
            Some(_) => Endian::Big,
            None => Endian::Little,
        }
    }

    fn layouts(&self, data_type: DataType) -> Result<Vec<ChannelLayout>> {
        let names = self.channel_names()?;
        names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let n = idx + 1;
                let bits = match data_type {
                    DataType::Float => 32,
                    DataType::Double => 64,
                    DataType::Integer => self.required_usize(&format!("$P{n}B"))?,
                };
                if data_type == DataType::Integer && !matches!(bits, 8 | 16 | 32) {
                    return Err(GateError::UnsupportedDataType(format!(
                        "{bits}-bit integer channel {name}"
                    )));
                }
                let range = self
                    .keyword(&format!("$P{n}R"))
                    .and_then(|r| r.trim().parse::<f64>().ok())
                    .filter(|r| *r > 0.0)
                    .unwrap_or(2f64.powi(bits as i32));
                let (log_decades, log_offset) = self
                    .keyword(&format!("$P{n}E"))
                    .and_then(parse_amplification)
                    .unwrap_or((0.0, 0.0));
                let gain = self
                    .keyword(&format!("$P{n}G"))
                    .and_then(|g| g.trim().parse::<f64>().ok())
                    .filter(|g| *g > 0.0)
                    .unwrap_or(1.0);
                Ok(ChannelLayout {
                    bytes: bits / 8,
                    range,
                    mask: range_mask(range, bits),
                    log_decades,
                    log_offset,
                    gain,
                })
            })
            .collect()
    }

    /// Byte range of the DATA segment, preferring header offsets and falling
    /// back to `$BEGINDATA`/`$ENDDATA` when the header leaves them zero.
    fn data_segment(&self) -> Result<(usize, usize)> {
        let (mut start, mut end) = (self.header.data_start, self.header.data_end);
        if start == 0 && end == 0 {
            start = self.required_usize("$BEGINDATA")?;
            end = self.required_usize("$ENDDATA")?;
        }
        if end < start || end >= self.mmap.len() {
            return Err(GateError::InvalidFcs(format!(
                "DATA segment {start}..{end} outside file of {} bytes",
                self.mmap.len()
            )));
        }
        Ok((start, end))
    }

    /// Decode every event into one column per channel.
    pub fn read_columns(&self) -> Result<Vec<Vec<f64>>> {
        if let Some(mode) = self.keyword("$MODE") {
            if !mode.trim().eq_ignore_ascii_case("L") {
                return Err(GateError::UnsupportedDataType(format!("$MODE {mode}")));
            }
        }
        let data_type = self.data_type()?;
        let layouts = self.layouts(data_type)?;
        let (start, end) = self.data_segment()?;
        let data = &self.mmap[start..=end];

        let event_bytes: usize = layouts.iter().map(|l| l.bytes).sum();
        if event_bytes == 0 {
            return Ok(vec![Vec::new(); layouts.len()]);
        }
        let events = match self.keyword("$TOT") {
            Some(_) => self.required_usize("$TOT")?,
            None => data.len() / event_bytes,
        };
        let needed = events.checked_mul(event_bytes).unwrap_or(usize::MAX);
        if needed > data.len() {
            return Err(GateError::InvalidFcs(format!(
                "DATA segment holds {} bytes, {events} events need {needed}",
                data.len()
            )));
        }

        let columns = match self.endian() {
            Endian::Little => decode::<LittleEndian>(data, events, data_type, &layouts),
            Endian::Big => decode::<BigEndian>(data, events, data_type, &layouts),
        };
        Ok(columns)
    }

    /// Header summary fields plus the raw TEXT keywords.
    pub fn metadata(&self) -> Result<DatasetMetadata> {
        let mut header = BTreeMap::new();
        header.insert("FCS format".to_string(), self.header.version.clone());
        header.insert(
            "Total events".to_string(),
            self.keyword("$TOT").unwrap_or("0").trim().to_string(),
        );
        header.insert(
            "Total channels".to_string(),
            self.channel_count()?.to_string(),
        );
        Ok(DatasetMetadata {
            header,
            text: self.keywords.clone(),
        })
    }
}

/// Read an FCS file into a [`Dataset`].
pub fn read_fcs(path: &Path) -> Result<Dataset> {
    let reader = FcsReader::open(path)?;
    let channels = reader.channel_names()?;
    let columns = reader.read_columns()?;
    let metadata = reader.metadata()?;
    let dataset = Dataset::new(path, channels, columns, metadata)?;
    info!(
        path = %path.display(),
        events = dataset.event_count(),
        channels = dataset.channel_count(),
        "Loaded FCS file"
    );
    Ok(dataset)
}

pub fn parse_header(bytes: &[u8]) -> Result<FcsHeader> {
    if bytes.len() < FCS_HEADER_SIZE {
        return Err(GateError::InvalidFcs("File too small for FCS header".into()));
    }
    if &bytes[0..3] != b"FCS" {
        return Err(GateError::InvalidFcs("Missing FCS magic".into()));
    }
    let version = String::from_utf8_lossy(&bytes[0..6]).trim().to_string();
    let offset = |start: usize| -> Result<usize> {
        let field = String::from_utf8_lossy(&bytes[start..start + 8]);
        let field = field.trim();
        if field.is_empty() {
            return Ok(0);
        }
        field
            .parse()
            .map_err(|_| GateError::InvalidFcs(format!("bad header offset {field:?}")))
    };
    Ok(FcsHeader {
        version,
        text_start: offset(10)?,
        text_end: offset(18)?,
        data_start: offset(26)?,
        data_end: offset(34)?,
    })
}

/// Split a TEXT segment into keywords. The first byte is the delimiter; a
/// doubled delimiter stands for a literal one. Keys are upper-cased.
pub fn parse_text(segment: &[u8]) -> Result<BTreeMap<String, String>> {
    let Some((&delim, body)) = segment.split_first() else {
        return Err(GateError::InvalidFcs("Empty TEXT segment".into()));
    };

    let mut tokens: Vec<String> = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut i = 0;
    while i < body.len() {
        let b = body[i];
        if b == delim {
            if body.get(i + 1) == Some(&delim) {
                current.push(delim);
                i += 2;
                continue;
            }
            tokens.push(String::from_utf8_lossy(&current).into_owned());
            current.clear();
        } else {
            current.push(b);
        }
        i += 1;
    }
    if !current.is_empty() {
        tokens.push(String::from_utf8_lossy(&current).into_owned());
    }

    Ok(tokens
        .chunks_exact(2)
        .map(|kv| (kv[0].trim().to_ascii_uppercase(), kv[1].clone()))
        .collect())
}

fn parse_amplification(raw: &str) -> Option<(f64, f64)> {
    let (a, b) = raw.split_once(',')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

/// Bit mask covering `$PnR` (values are stored in the low bits of the word).
fn range_mask(range: f64, bits: usize) -> u64 {
    let word = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
    let needed = (range.max(1.0) - 1.0).max(0.0) as u64;
    if needed == 0 {
        return word;
    }
    let used = 64 - needed.leading_zeros();
    let mask = if used >= 64 { u64::MAX } else { (1u64 << used) - 1 };
    mask & word
}

fn decode<B: ByteOrder>(
    data: &[u8],
    events: usize,
    data_type: DataType,
    layouts: &[ChannelLayout],
) -> Vec<Vec<f64>> {
    let mut columns: Vec<Vec<f64>> = layouts.iter().map(|_| Vec::with_capacity(events)).collect();
    let mut offset = 0;
    for _ in 0..events {
        for (layout, column) in layouts.iter().zip(columns.iter_mut()) {
            let raw = &data[offset..offset + layout.bytes];
            offset += layout.bytes;
            let value = match data_type {
                DataType::Float => B::read_f32(raw) as f64,
                DataType::Double => B::read_f64(raw),
                DataType::Integer => {
                    let word = match layout.bytes {
                        1 => raw[0] as u64,
                        2 => B::read_u16(raw) as u64,
                        _ => B::read_u32(raw) as u64,
                    };
                    scale_integer(word & layout.mask, layout)
                }
            };
            column.push(value);
        }
    }
    columns
}

fn scale_integer(value: u64, layout: &ChannelLayout) -> f64 {
    let v = value as f64;
    if layout.log_decades > 0.0 {
        let offset = if layout.log_offset > 0.0 { layout.log_offset } else { 1.0 };
        offset * 10f64.powf(layout.log_decades * v / layout.range)
    } else {
        v / layout.gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_with_escaped_delimiter() {
        let kw = parse_text(b"/$PAR/2/$P1N/FSC//A/").unwrap();
        assert_eq!(kw.get("$PAR").map(String::as_str), Some("2"));
        assert_eq!(kw.get("$P1N").map(String::as_str), Some("FSC/A"));
    }

    #[test]
    fn lowercase_keys_are_normalized() {
        let kw = parse_text(b"|$tot|10|").unwrap();
        assert_eq!(kw.get("$TOT").map(String::as_str), Some("10"));
    }

    #[test]
    fn range_mask_covers_range() {
        assert_eq!(range_mask(1024.0, 16), 0x3FF);
        assert_eq!(range_mask(65536.0, 16), 0xFFFF);
        assert_eq!(range_mask(262144.0, 16), 0xFFFF);
    }
}
