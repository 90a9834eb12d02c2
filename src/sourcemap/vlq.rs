//! Base64 VLQ coding of the `mappings` field.
//!
//! Each value is a run of base64 digits. A digit carries five data bits
//! and a continuation bit; the lowest bit of the assembled number is the
//! sign.

use super::document::MappingSegment;
use crate::MalformedMapError;

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE_MASK: u64 = (1 << VLQ_BASE_SHIFT) - 1;
const VLQ_CONTINUATION_BIT: u64 = 1 << VLQ_BASE_SHIFT;

/// Seven digits carry 35 bits, enough for a sign bit plus 32 magnitude bits.
const VLQ_MAX_SHIFT: u32 = 30;

fn base64_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(u64::from(value))
}

/// Decode one VLQ value starting at `*pos`, advancing past it.
fn decode_value(input: &str, pos: &mut usize) -> Result<i64, MalformedMapError> {
    let bytes = input.as_bytes();
    let start = *pos;
    let mut accum: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let byte = match bytes.get(*pos) {
            Some(b',') | Some(b';') | None => {
                return Err(MalformedMapError::UnterminatedVlq { offset: start })
            }
            Some(&byte) => byte,
        };

        let digit = base64_value(byte).ok_or_else(|| MalformedMapError::InvalidBase64 {
            offset: *pos,
            character: input[*pos..].chars().next().unwrap_or(byte as char),
        })?;
        *pos += 1;

        if shift > VLQ_MAX_SHIFT {
            return Err(MalformedMapError::VlqOverflow { offset: start });
        }
        accum |= (digit & VLQ_BASE_MASK) << shift;
        if accum > u64::from(u32::MAX) {
            return Err(MalformedMapError::VlqOverflow { offset: start });
        }

        if digit & VLQ_CONTINUATION_BIT == 0 {
            break;
        }
        shift += VLQ_BASE_SHIFT;
    }

    let magnitude = (accum >> 1) as i64;
    Ok(if accum & 1 == 1 { -magnitude } else { magnitude })
}

/// Decode the raw field deltas of a single segment such as `"AAgBC"`.
pub fn decode_segment(segment: &str) -> Result<Vec<i64>, MalformedMapError> {
    let mut pos = 0;
    let mut values = Vec::with_capacity(5);
    while pos < segment.len() {
        values.push(decode_value(segment, &mut pos)?);
    }
    Ok(values)
}

/// Running values carried from one segment to the next.
#[derive(Default)]
struct DecodeState {
    generated_column: i64,
    source: i64,
    original_line: i64,
    original_column: i64,
    name: i64,
}

struct SegmentContext {
    segment: usize,
    offset: usize,
}

impl SegmentContext {
    fn to_u32(&self, field: &'static str, value: i64) -> Result<u32, MalformedMapError> {
        if value < 0 {
            return Err(MalformedMapError::NegativeValue {
                segment: self.segment,
                offset: self.offset,
                field,
                value,
            });
        }
        u32::try_from(value).map_err(|_| MalformedMapError::VlqOverflow {
            offset: self.offset,
        })
    }

    fn to_one_based(&self, field: &'static str, value: i64) -> Result<u32, MalformedMapError> {
        self.to_u32(field, value)?
            .checked_add(1)
            .ok_or(MalformedMapError::VlqOverflow {
                offset: self.offset,
            })
    }
}

/// Decode a whole `mappings` string into segments in file order.
///
/// `source_count` and `name_count` bound the source and name indices; any
/// segment pointing past them is rejected.
pub fn decode_mappings(
    input: &str,
    source_count: usize,
    name_count: usize,
) -> Result<Vec<MappingSegment>, MalformedMapError> {
    let bytes = input.as_bytes();
    let mut segments = Vec::new();
    let mut fields: Vec<i64> = Vec::with_capacity(5);
    let mut state = DecodeState::default();
    let mut generated_line: u32 = 1;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b';' => {
                generated_line = generated_line
                    .checked_add(1)
                    .ok_or(MalformedMapError::VlqOverflow { offset: pos })?;
                state.generated_column = 0;
                pos += 1;
            }
            b',' => pos += 1,
            _ => {
                let ctx = SegmentContext {
                    segment: segments.len(),
                    offset: pos,
                };

                fields.clear();
                while pos < bytes.len() && bytes[pos] != b',' && bytes[pos] != b';' {
                    fields.push(decode_value(input, &mut pos)?);
                }

                if !matches!(fields.len(), 1 | 4 | 5) {
                    return Err(MalformedMapError::InvalidSegmentLength {
                        segment: ctx.segment,
                        offset: ctx.offset,
                        fields: fields.len(),
                    });
                }

                state.generated_column += fields[0];
                let mut segment = MappingSegment {
                    generated_line,
                    generated_column: ctx.to_u32("generated column", state.generated_column)?,
                    source_index: None,
                    original_line: None,
                    original_column: None,
                    name_index: None,
                };

                if fields.len() >= 4 {
                    state.source += fields[1];
                    state.original_line += fields[2];
                    state.original_column += fields[3];

                    let source = ctx.to_u32("source index", state.source)?;
                    if source as usize >= source_count {
                        return Err(MalformedMapError::SourceIndexOutOfBounds {
                            segment: ctx.segment,
                            offset: ctx.offset,
                            index: source,
                            len: source_count,
                        });
                    }
                    segment.source_index = Some(source);
                    segment.original_line =
                        Some(ctx.to_one_based("original line", state.original_line)?);
                    segment.original_column =
                        Some(ctx.to_u32("original column", state.original_column)?);
                }

                if fields.len() == 5 {
                    state.name += fields[4];
                    let name = ctx.to_u32("name index", state.name)?;
                    if name as usize >= name_count {
                        return Err(MalformedMapError::NameIndexOutOfBounds {
                            segment: ctx.segment,
                            offset: ctx.offset,
                            index: name,
                            len: name_count,
                        });
                    }
                    segment.name_index = Some(name);
                }

                segments.push(segment);
            }
        }
    }

    Ok(segments)
}

fn encode_value(out: &mut String, value: i64) {
    let mut vlq: u64 = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = vlq & VLQ_BASE_MASK;
        vlq >>= VLQ_BASE_SHIFT;
        if vlq > 0 {
            digit |= VLQ_CONTINUATION_BIT;
        }
        out.push(BASE64_ALPHABET[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// Encode segments back into a `mappings` string.
///
/// Segments must be in file order (non-decreasing generated line). A
/// segment whose source index lacks an original position is written as a
/// generated-only segment.
pub fn encode_mappings(segments: &[MappingSegment]) -> String {
    let mut out = String::new();
    let mut state = DecodeState::default();
    let mut line: u32 = 1;
    let mut first_in_line = true;

    for segment in segments {
        while line < segment.generated_line {
            out.push(';');
            line += 1;
            state.generated_column = 0;
            first_in_line = true;
        }
        if !first_in_line {
            out.push(',');
        }
        first_in_line = false;

        let column = i64::from(segment.generated_column);
        encode_value(&mut out, column - state.generated_column);
        state.generated_column = column;

        let (source, original_line, original_column) = match (
            segment.source_index,
            segment.original_line,
            segment.original_column,
        ) {
            (Some(s), Some(l), Some(c)) => (i64::from(s), i64::from(l) - 1, i64::from(c)),
            _ => continue,
        };

        encode_value(&mut out, source - state.source);
        encode_value(&mut out, original_line - state.original_line);
        encode_value(&mut out, original_column - state.original_column);
        state.source = source;
        state.original_line = original_line;
        state.original_column = original_column;

        if let Some(name) = segment.name_index {
            let name = i64::from(name);
            encode_value(&mut out, name - state.name);
            state.name = name;
        }
    }

    out
}
