//! Wire format for numeric payloads.
//!
//! A payload is a bare run of little-endian IEEE-754 `f64`s: no length prefix,
//! no framing, no type tag. The browser reads it straight into a
//! `Float64Array`, so the element count has to come from elsewhere
//! (`AxisLength` in the listing, or the shape headers on matrix responses).

/// Width in bytes of one encoded value.
pub const F64_WIDTH: usize = std::mem::size_of::<f64>();

/// Encode `values` in order, `8 × values.len()` bytes.
pub fn encode_f64_le(values: &[f64]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(values.len() * F64_WIDTH);
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf
}

/// Encode a matrix row-major: row 0 first, then row 1, ...
pub fn encode_rows(rows: &[Vec<f64>]) -> Vec<u8> {
    let total: usize = rows.iter().map(Vec::len).sum();
    let mut buf = Vec::with_capacity(total * F64_WIDTH);
    for row in rows {
        for v in row {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }
    buf
}

/// Inverse of [`encode_f64_le`]. Returns `None` if the length is not a
/// multiple of the value width.
#[cfg(test)]
pub fn decode_f64_le(bytes: &[u8]) -> Option<Vec<f64>> {
    if bytes.len() % F64_WIDTH != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(F64_WIDTH)
            .map(|chunk| {
                let mut raw = [0u8; F64_WIDTH];
                raw.copy_from_slice(chunk);
                f64::from_le_bytes(raw)
            })
            .collect(),
    )
}
