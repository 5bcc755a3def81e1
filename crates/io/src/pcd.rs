use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};
use xyzi2rgb_core::{PointCloud, PointXYZI, PointXYZRGB};

/// A point type with a fixed PCD field layout.
///
/// Every field is written as a 4-byte float (`SIZE 4`, `TYPE F`, `COUNT 1`).
pub trait PcdPoint {
    const FIELDS: &'static [&'static str];

    /// Appends the ASCII values for one point, space separated, no newline.
    fn write_ascii(&self, out: &mut String);

    /// Appends the little-endian bytes for one point.
    fn write_le(&self, buf: &mut Vec<u8>);
}

impl PcdPoint for PointXYZI {
    const FIELDS: &'static [&'static str] = &["x", "y", "z", "intensity"];

    fn write_ascii(&self, out: &mut String) {
        out.push_str(&format!(
            "{} {} {} {}",
            self.x, self.y, self.z, self.intensity
        ));
    }

    fn write_le(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.x.to_le_bytes());
        buf.extend_from_slice(&self.y.to_le_bytes());
        buf.extend_from_slice(&self.z.to_le_bytes());
        buf.extend_from_slice(&self.intensity.to_le_bytes());
    }
}

impl PcdPoint for PointXYZRGB {
    const FIELDS: &'static [&'static str] = &["x", "y", "z", "rgb"];

    // PCL prints the packed color as its unsigned integer bit pattern.
    fn write_ascii(&self, out: &mut String) {
        out.push_str(&format!(
            "{} {} {} {}",
            self.x,
            self.y,
            self.z,
            self.rgb.to_bits()
        ));
    }

    fn write_le(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.x.to_le_bytes());
        buf.extend_from_slice(&self.y.to_le_bytes());
        buf.extend_from_slice(&self.z.to_le_bytes());
        buf.extend_from_slice(&self.rgb.to_bits().to_le_bytes());
    }
}

/// Reads an XYZI cloud from a PCD file (ASCII or binary).
///
/// A file without an `intensity` field loads with zero intensity.
pub fn read_pcd_xyzi(path: impl AsRef<Path>) -> io::Result<PointCloud<PointXYZI>> {
    let path = path.as_ref();
    let raw = fs::read(path)?;
    let pcd = PcdFile::parse(&raw)?;

    let ix = pcd.header.require("x")?;
    let iy = pcd.header.require("y")?;
    let iz = pcd.header.require("z")?;
    let ii = pcd.header.position("intensity");
    if ii.is_none() {
        warn!(path = %path.display(), "PCD file has no intensity field, using 0");
    }

    let points = pcd.collect_points(|rec| {
        Ok(PointXYZI {
            x: rec.value(ix)?,
            y: rec.value(iy)?,
            z: rec.value(iz)?,
            intensity: match ii {
                Some(ii) => rec.value(ii)?,
                None => 0.0,
            },
        })
    })?;

    debug!(path = %path.display(), points = points.len(), "read XYZI PCD");
    Ok(pcd.header.shape(points))
}

/// Reads a packed-color cloud from a PCD file. The color comes from the
/// `rgb` field, or `rgba` when there is no `rgb`.
pub fn read_pcd_xyzrgb(path: impl AsRef<Path>) -> io::Result<PointCloud<PointXYZRGB>> {
    let raw = fs::read(path)?;
    let pcd = PcdFile::parse(&raw)?;

    let ix = pcd.header.require("x")?;
    let iy = pcd.header.require("y")?;
    let iz = pcd.header.require("z")?;
    let ic = pcd
        .header
        .position("rgb")
        .or_else(|| pcd.header.position("rgba"))
        .ok_or_else(|| invalid("PCD file has no rgb or rgba field"))?;

    let points = pcd.collect_points(|rec| {
        Ok(PointXYZRGB::from_packed(
            rec.value(ix)?,
            rec.value(iy)?,
            rec.value(iz)?,
            f32::from_bits(rec.bits(ic)?),
        ))
    })?;

    Ok(pcd.header.shape(points))
}

/// Writes a PCD file in ASCII format.
pub fn write_pcd<P: PcdPoint>(path: impl AsRef<Path>, cloud: &PointCloud<P>) -> io::Result<()> {
    let mut out = header_text::<P>(cloud, "ascii");
    for p in cloud.iter() {
        p.write_ascii(&mut out);
        out.push('\n');
    }
    fs::write(path, out)
}

/// Writes a PCD file in binary format.
pub fn write_pcd_binary<P: PcdPoint>(
    path: impl AsRef<Path>,
    cloud: &PointCloud<P>,
) -> io::Result<()> {
    let header = header_text::<P>(cloud, "binary");
    let point_size = P::FIELDS.len() * 4;
    let mut buf = Vec::with_capacity(header.len() + cloud.len() * point_size);
    buf.extend_from_slice(header.as_bytes());
    for p in cloud.iter() {
        p.write_le(&mut buf);
    }
    fs::write(path, buf)
}

fn header_text<P: PcdPoint>(cloud: &PointCloud<P>, data: &str) -> String {
    let n = P::FIELDS.len();
    let repeat = |v: &str| vec![v; n].join(" ");

    let mut out = String::new();
    out.push_str("# .PCD v0.7 - Point Cloud Data file format\n");
    out.push_str("VERSION 0.7\n");
    out.push_str(&format!("FIELDS {}\n", P::FIELDS.join(" ")));
    out.push_str(&format!("SIZE {}\n", repeat("4")));
    out.push_str(&format!("TYPE {}\n", repeat("F")));
    out.push_str(&format!("COUNT {}\n", repeat("1")));
    out.push_str(&format!("WIDTH {}\n", cloud.width()));
    out.push_str(&format!("HEIGHT {}\n", cloud.height()));
    out.push_str("VIEWPOINT 0 0 0 1 0 0 0\n");
    out.push_str(&format!("POINTS {}\n", cloud.len()));
    out.push_str(&format!("DATA {}\n", data));
    out
}

// --- Internal helpers ---

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataFormat {
    Ascii,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Float,
    Unsigned,
    Signed,
}

#[derive(Debug, Clone)]
struct Field {
    name: String,
    size: usize,
    kind: FieldKind,
    /// Byte offset of the first element inside a binary record.
    offset: usize,
    /// Index of the first element inside an ASCII row.
    column: usize,
}

#[derive(Debug)]
struct PcdHeader {
    fields: Vec<Field>,
    width: usize,
    height: usize,
    points: usize,
    data: DataFormat,
    /// Bytes per binary record.
    stride: usize,
    /// Values per ASCII row.
    columns: usize,
}

impl PcdHeader {
    fn parse(text: &str) -> io::Result<Self> {
        let mut names: Vec<String> = Vec::new();
        let mut sizes: Option<Vec<usize>> = None;
        let mut kinds: Option<Vec<FieldKind>> = None;
        let mut counts: Option<Vec<usize>> = None;
        let mut width = None;
        let mut height = 1;
        let mut points = None;
        let mut data = None;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let mut parts = trimmed.split_whitespace();
            let key = parts.next().unwrap_or_default();
            let values: Vec<&str> = parts.collect();

            match key {
                "FIELDS" | "COLUMNS" => names = values.iter().map(|s| s.to_string()).collect(),
                "SIZE" => sizes = Some(parse_list(key, &values)?),
                "TYPE" => {
                    kinds = Some(
                        values
                            .iter()
                            .map(|t| parse_kind(t))
                            .collect::<io::Result<_>>()?,
                    )
                }
                "COUNT" => counts = Some(parse_list(key, &values)?),
                "WIDTH" => width = Some(parse_single(key, &values)?),
                "HEIGHT" => height = parse_single(key, &values)?,
                "POINTS" => points = Some(parse_single(key, &values)?),
                "DATA" => {
                    data = Some(match values.first().copied() {
                        Some("ascii") => DataFormat::Ascii,
                        Some("binary") => DataFormat::Binary,
                        Some(other) => {
                            return Err(io::Error::new(
                                io::ErrorKind::Unsupported,
                                format!("unsupported PCD DATA format: {}", other),
                            ))
                        }
                        None => return Err(invalid("PCD DATA line has no format")),
                    });
                    break;
                }
                _ => {}
            }
        }

        let data = data.ok_or_else(|| invalid("PCD file missing DATA line"))?;
        if names.is_empty() {
            return Err(invalid("PCD file missing FIELDS line"));
        }
        let n = names.len();
        let sizes = sizes.unwrap_or_else(|| vec![4; n]);
        let kinds = kinds.unwrap_or_else(|| vec![FieldKind::Float; n]);
        let counts = counts.unwrap_or_else(|| vec![1; n]);
        if sizes.len() != n || kinds.len() != n || counts.len() != n {
            return Err(invalid(format!(
                "PCD header lists {} fields but {} sizes, {} types and {} counts",
                n,
                sizes.len(),
                kinds.len(),
                counts.len()
            )));
        }

        let mut fields = Vec::with_capacity(n);
        let mut offset: usize = 0;
        let mut column = 0;
        for (((name, size), kind), count) in names.into_iter().zip(sizes).zip(kinds).zip(counts) {
            let supported = match kind {
                FieldKind::Float => matches!(size, 4 | 8),
                FieldKind::Unsigned | FieldKind::Signed => matches!(size, 1 | 2 | 4 | 8),
            };
            if !supported {
                return Err(invalid(format!(
                    "PCD field `{}` has unsupported size {} for its type",
                    name, size
                )));
            }
            if count == 0 {
                return Err(invalid(format!("PCD field `{}` has COUNT 0", name)));
            }
            let next = size
                .checked_mul(count)
                .and_then(|bytes| offset.checked_add(bytes))
                .ok_or_else(|| invalid(format!("PCD field `{}` COUNT is too large", name)))?;
            fields.push(Field {
                name,
                size,
                kind,
                offset,
                column,
            });
            offset = next;
            column += count;
        }

        let width = match (width, points) {
            (Some(w), _) => w,
            (None, Some(p)) => p,
            (None, None) => return Err(invalid("PCD file missing POINTS/WIDTH header")),
        };
        let points = points.unwrap_or(width.saturating_mul(height));

        Ok(Self {
            fields,
            width,
            height,
            points,
            data,
            stride: offset,
            columns: column,
        })
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    fn require(&self, name: &str) -> io::Result<usize> {
        self.position(name)
            .ok_or_else(|| invalid(format!("PCD file missing `{}` field", name)))
    }

    fn shape<P>(&self, points: Vec<P>) -> PointCloud<P> {
        if self.height > 1 && self.width.checked_mul(self.height) == Some(points.len()) {
            PointCloud::organized(points, self.width, self.height)
        } else {
            PointCloud::from_points(points)
        }
    }
}

fn parse_single(key: &str, values: &[&str]) -> io::Result<usize> {
    values
        .first()
        .ok_or_else(|| invalid(format!("PCD {} line has no value", key)))?
        .parse::<usize>()
        .map_err(|e| invalid(format!("invalid {} value: {}", key, e)))
}

fn parse_list(key: &str, values: &[&str]) -> io::Result<Vec<usize>> {
    values
        .iter()
        .map(|v| {
            v.parse::<usize>()
                .map_err(|e| invalid(format!("invalid {} value {:?}: {}", key, v, e)))
        })
        .collect()
}

fn parse_kind(t: &str) -> io::Result<FieldKind> {
    match t {
        "F" => Ok(FieldKind::Float),
        "U" => Ok(FieldKind::Unsigned),
        "I" => Ok(FieldKind::Signed),
        other => Err(invalid(format!("unknown PCD TYPE {:?}", other))),
    }
}

/// Finds the byte offset just past the newline ending the DATA line.
fn find_data_line_end(raw: &[u8]) -> Option<usize> {
    let data_marker = b"DATA";
    for i in 0..raw.len().saturating_sub(data_marker.len() - 1) {
        if (i == 0 || raw[i - 1] == b'\n') && raw[i..].starts_with(data_marker) {
            if let Some(offset) = raw[i..].iter().position(|&b| b == b'\n') {
                return Some(i + offset + 1);
            }
            return Some(raw.len());
        }
    }
    None
}

struct PcdFile<'a> {
    header: PcdHeader,
    body: &'a [u8],
}

impl<'a> PcdFile<'a> {
    fn parse(raw: &'a [u8]) -> io::Result<Self> {
        let data_end =
            find_data_line_end(raw).ok_or_else(|| invalid("PCD file missing DATA line"))?;
        let header_text = std::str::from_utf8(&raw[..data_end])
            .map_err(|_| invalid("PCD header is not valid UTF-8"))?;
        let header = PcdHeader::parse(header_text)?;
        Ok(Self {
            header,
            body: &raw[data_end..],
        })
    }

    fn collect_points<P>(
        &self,
        mut make: impl FnMut(&Record<'_>) -> io::Result<P>,
    ) -> io::Result<Vec<P>> {
        let n = self.header.points;
        // Every point takes at least one body byte; don't trust POINTS for the allocation.
        let mut out = Vec::with_capacity(n.min(self.body.len()));

        match self.header.data {
            DataFormat::Ascii => {
                let body = std::str::from_utf8(self.body)
                    .map_err(|e| invalid(format!("invalid UTF-8: {}", e)))?;
                let mut rows = body
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty() && !l.starts_with('#'));
                for index in 0..n {
                    let row = rows.next().ok_or_else(|| {
                        invalid(format!(
                            "ASCII PCD data has {} rows, header declares {} points",
                            index, n
                        ))
                    })?;
                    let tokens: Vec<&str> = row.split_whitespace().collect();
                    if tokens.len() < self.header.columns {
                        return Err(invalid(format!(
                            "point {}: expected {} values, found {}",
                            index,
                            self.header.columns,
                            tokens.len()
                        )));
                    }
                    out.push(make(&Record {
                        header: &self.header,
                        index,
                        data: RecordData::Ascii(&tokens),
                    })?);
                }
            }
            DataFormat::Binary => {
                let stride = self.header.stride;
                let expected = n
                    .checked_mul(stride)
                    .ok_or_else(|| invalid("PCD POINTS value is too large"))?;
                if self.body.len() < expected {
                    return Err(invalid(format!(
                        "binary PCD data too short: have {} bytes, expected {} ({} points x {} bytes)",
                        self.body.len(),
                        expected,
                        n,
                        stride
                    )));
                }
                if stride == 0 {
                    return Ok(out);
                }
                for (index, chunk) in self.body[..expected].chunks_exact(stride).enumerate() {
                    out.push(make(&Record {
                        header: &self.header,
                        index,
                        data: RecordData::Binary(chunk),
                    })?);
                }
            }
        }

        Ok(out)
    }
}

enum RecordData<'a> {
    Ascii(&'a [&'a str]),
    Binary(&'a [u8]),
}

/// One point's worth of raw field data.
struct Record<'a> {
    header: &'a PcdHeader,
    index: usize,
    data: RecordData<'a>,
}

impl Record<'_> {
    /// First element of field `field` as `f32`.
    fn value(&self, field: usize) -> io::Result<f32> {
        let f = &self.header.fields[field];
        match self.data {
            RecordData::Ascii(tokens) => {
                let tok = tokens[f.column];
                tok.parse::<f32>().map_err(|_| {
                    invalid(format!(
                        "point {}: field `{}` value {:?} is not a number",
                        self.index, f.name, tok
                    ))
                })
            }
            RecordData::Binary(bytes) => Ok(decode_le(&bytes[f.offset..f.offset + f.size], f)),
        }
    }

    /// First element of field `field` as a raw 32-bit pattern.
    fn bits(&self, field: usize) -> io::Result<u32> {
        let f = &self.header.fields[field];
        if f.size != 4 {
            return Err(invalid(format!(
                "PCD field `{}` must be 4 bytes wide, found {}",
                f.name, f.size
            )));
        }
        match self.data {
            RecordData::Ascii(tokens) => {
                let tok = tokens[f.column];
                // Packed colors are printed as integers; fall back to a float literal.
                tok.parse::<u32>()
                    .or_else(|_| tok.parse::<i32>().map(|v| v as u32))
                    .or_else(|_| tok.parse::<f32>().map(f32::to_bits))
                    .map_err(|_| {
                        invalid(format!(
                            "point {}: field `{}` value {:?} is not a number",
                            self.index, f.name, tok
                        ))
                    })
            }
            RecordData::Binary(bytes) => {
                let b = &bytes[f.offset..f.offset + 4];
                Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            }
        }
    }
}

fn decode_le(b: &[u8], field: &Field) -> f32 {
    match (field.kind, field.size) {
        (FieldKind::Float, 4) => f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        (FieldKind::Float, _) => {
            f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f32
        }
        (FieldKind::Unsigned, 1) => f32::from(b[0]),
        (FieldKind::Unsigned, 2) => f32::from(u16::from_le_bytes([b[0], b[1]])),
        (FieldKind::Unsigned, 4) => u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32,
        (FieldKind::Unsigned, _) => {
            u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f32
        }
        (FieldKind::Signed, 1) => f32::from(b[0] as i8),
        (FieldKind::Signed, 2) => f32::from(i16::from_le_bytes([b[0], b[1]])),
        (FieldKind::Signed, 4) => i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32,
        (FieldKind::Signed, _) => {
            i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f32
        }
    }
}
