//! Typed parameter values used by mission variables and script entries.

use kufedit_common::{BinaryReader, BinaryWriter};

use crate::{Error, Result};

const TAG_INT: u32 = 0;
const TAG_FLOAT: u32 = 1;
const TAG_STRING: u32 = 2;
const TAG_ENUM: u32 = 3;

/// A tagged parameter value.
///
/// Wire form is a 4-byte type tag followed by the payload; strings carry a
/// u32 length prefix and no terminator. An unknown tag fails the parse so
/// the enclosing tail can fall back to its raw form instead of guessing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value"))]
pub enum ParamValue {
    Int(i32),
    Float(f32),
    String(String),
    Enum(i32),
}

impl ParamValue {
    /// Parse one tagged value from the cursor.
    pub fn parse(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let tag = reader.read_u32()?;
        match tag {
            TAG_INT => Ok(Self::Int(reader.read_i32()?)),
            TAG_FLOAT => Ok(Self::Float(reader.read_f32()?)),
            TAG_STRING => {
                let len = reader.read_u32()? as usize;
                let bytes = reader.read_bytes(len)?;
                // Strict decode: a byte sequence that is not UTF-8 cannot be
                // re-emitted faithfully, so it rejects the whole tail.
                let text = std::str::from_utf8(bytes)
                    .map_err(kufedit_common::Error::from)?
                    .to_owned();
                Ok(Self::String(text))
            }
            TAG_ENUM => Ok(Self::Enum(reader.read_i32()?)),
            other => Err(Error::UnknownParamType(other)),
        }
    }

    /// Serialize the value with its type tag.
    pub fn write(&self, writer: &mut BinaryWriter) {
        match self {
            Self::Int(v) => {
                writer.write_u32(TAG_INT);
                writer.write_i32(*v);
            }
            Self::Float(v) => {
                writer.write_u32(TAG_FLOAT);
                writer.write_f32(*v);
            }
            Self::String(s) => {
                writer.write_u32(TAG_STRING);
                writer.write_u32(s.len() as u32);
                writer.write_bytes(s.as_bytes());
            }
            Self::Enum(v) => {
                writer.write_u32(TAG_ENUM);
                writer.write_i32(*v);
            }
        }
    }

    /// Serialized size in bytes, tag included.
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Int(_) | Self::Float(_) | Self::Enum(_) => 8,
            Self::String(s) => 8 + s.len(),
        }
    }

    /// Human-readable type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Enum(_) => "enum",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(value: ParamValue) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        value.write(&mut w);
        let bytes = w.into_bytes();

        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(ParamValue::parse(&mut reader).unwrap(), value);
        assert!(reader.is_empty());
        bytes
    }

    #[test]
    fn test_int_wire_form() {
        let bytes = round_trip(ParamValue::Int(-5));
        assert_eq!(bytes[..4], [0, 0, 0, 0]);
        assert_eq!(bytes.len(), 8);
    }

    #[test]
    fn test_string_wire_form() {
        let bytes = round_trip(ParamValue::String("Area01".into()));
        assert_eq!(bytes[..4], [2, 0, 0, 0]);
        assert_eq!(bytes[4..8], [6, 0, 0, 0]);
        assert_eq!(&bytes[8..], b"Area01");
    }

    #[test]
    fn test_float_and_enum() {
        round_trip(ParamValue::Float(1.5));
        round_trip(ParamValue::Enum(42));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let data = [7u8, 0, 0, 0, 1, 0, 0, 0];
        let mut reader = BinaryReader::new(&data);
        assert!(matches!(
            ParamValue::parse(&mut reader),
            Err(Error::UnknownParamType(7))
        ));
    }

    #[test]
    fn test_string_length_overrun_rejected() {
        let data = [2u8, 0, 0, 0, 0xFF, 0, 0, 0, b'x'];
        let mut reader = BinaryReader::new(&data);
        assert!(ParamValue::parse(&mut reader).is_err());
    }
}
