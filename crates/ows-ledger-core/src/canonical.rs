//! Canonical CBOR encoding for deterministic serialization.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats
//!
//! The canonical encoding is critical: change set hashes are computed over
//! these bytes, so the same change set must produce identical bytes on every
//! node.

use ciborium::value::Value;
use std::io::Cursor;

use crate::error::CoreError;

/// Encode a CBOR Value to canonical bytes.
///
/// Panics on floats and simple values other than booleans and null. Ledger
/// structures are built from integers, strings, arrays and maps only, and
/// [`decode_value`] refuses anything else.
pub fn encode_canonical(value: &Value) -> Vec<u8> {
    let mut writer = Writer::default();
    writer.value(value);
    writer.buf
}

/// Decode a single canonical CBOR item.
///
/// Rejects trailing bytes, floats, duplicate map keys and any encoding that
/// differs from [`encode_canonical`] of the decoded value. Every accepted
/// input therefore re-encodes to exactly the bytes it was read from.
pub fn decode_value(bytes: &[u8]) -> Result<Value, CoreError> {
    let mut cursor = Cursor::new(bytes);
    let value: Value = ciborium::from_reader(&mut cursor)
        .map_err(|e| CoreError::DecodingError(e.to_string()))?;

    if cursor.position() as usize != bytes.len() {
        return Err(CoreError::DecodingError(format!(
            "{} trailing bytes after CBOR item",
            bytes.len() - cursor.position() as usize
        )));
    }

    check_encodable(&value)?;
    if encode_canonical(&value) != bytes {
        return Err(CoreError::NonCanonical(
            "item does not use the shortest, sorted, definite-length form".into(),
        ));
    }
    Ok(value)
}

fn check_encodable(value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(_) | Value::Bytes(_) | Value::Text(_) | Value::Bool(_) | Value::Null => Ok(()),
        Value::Array(items) => items.iter().try_for_each(check_encodable),
        Value::Tag(_, inner) => check_encodable(inner),
        Value::Map(entries) => {
            let mut keys = Vec::with_capacity(entries.len());
            for (k, v) in entries {
                check_encodable(k)?;
                check_encodable(v)?;
                keys.push(encode_canonical(k));
            }
            keys.sort();
            if keys.windows(2).any(|pair| pair[0] == pair[1]) {
                return Err(CoreError::NonCanonical("duplicate map key".into()));
            }
            Ok(())
        }
        Value::Float(_) => Err(CoreError::NonCanonical("floats are not allowed".into())),
        _ => Err(CoreError::NonCanonical("unsupported CBOR value".into())),
    }
}

/// Fail if a decoded map still holds entries the caller did not take.
pub fn expect_consumed(entries: Vec<(Value, Value)>, what: &str) -> Result<(), CoreError> {
    match entries.first() {
        None => Ok(()),
        Some((key, _)) => Err(CoreError::DecodingError(format!(
            "{what}: unknown key {key:?}"
        ))),
    }
}

/// Expect an array value.
pub fn expect_array(value: Value, what: &str) -> Result<Vec<Value>, CoreError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(CoreError::DecodingError(format!("{what}: expected array"))),
    }
}

/// Expect a byte string value.
pub fn expect_bytes(value: Value, what: &str) -> Result<Vec<u8>, CoreError> {
    match value {
        Value::Bytes(b) => Ok(b),
        _ => Err(CoreError::DecodingError(format!("{what}: expected bytes"))),
    }
}

/// Expect a text string value.
pub fn expect_text(value: Value, what: &str) -> Result<String, CoreError> {
    match value {
        Value::Text(s) => Ok(s),
        _ => Err(CoreError::DecodingError(format!("{what}: expected text"))),
    }
}

/// Expect a map value.
pub fn expect_map(value: Value, what: &str) -> Result<Vec<(Value, Value)>, CoreError> {
    match value {
        Value::Map(entries) => Ok(entries),
        _ => Err(CoreError::DecodingError(format!("{what}: expected map"))),
    }
}

/// Remove and return the entry for an integer key.
pub fn take_field(entries: &mut Vec<(Value, Value)>, key: u64) -> Option<Value> {
    let pos = entries
        .iter()
        .position(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == i128::from(key)))?;
    Some(entries.swap_remove(pos).1)
}

/// Build an integer-keyed map value.
pub fn int_map(entries: Vec<(u64, Value)>) -> Value {
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (Value::Integer(k.into()), v))
            .collect(),
    )
}

const UNSIGNED: u8 = 0;
const NEGATIVE: u8 = 1;
const BYTES: u8 = 2;
const TEXT: u8 = 3;
const ARRAY: u8 = 4;
const MAP: u8 = 5;
const TAG: u8 = 6;

const FALSE: u8 = 0xf4;
const TRUE: u8 = 0xf5;
const NULL: u8 = 0xf6;

#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn value(&mut self, value: &Value) {
        match value {
            Value::Integer(i) => {
                let n = i128::from(*i);
                if n >= 0 {
                    self.head(UNSIGNED, n as u64);
                } else {
                    // -1 is stored as 0, -2 as 1, ...
                    self.head(NEGATIVE, (-1 - n) as u64);
                }
            }
            Value::Bytes(b) => self.raw(BYTES, b),
            Value::Text(s) => self.raw(TEXT, s.as_bytes()),
            Value::Array(items) => {
                self.head(ARRAY, items.len() as u64);
                items.iter().for_each(|item| self.value(item));
            }
            Value::Map(entries) => self.map(entries),
            Value::Tag(tag, inner) => {
                self.head(TAG, *tag);
                self.value(inner);
            }
            Value::Bool(b) => self.buf.push(if *b { TRUE } else { FALSE }),
            Value::Null => self.buf.push(NULL),
            Value::Float(_) => panic!("floats are not part of canonical ledger encoding"),
            other => panic!("unsupported CBOR value in canonical encoding: {other:?}"),
        }
    }

    /// Initial byte plus argument in its shortest form.
    fn head(&mut self, major: u8, arg: u64) {
        let major = major << 5;
        match arg {
            0..=23 => self.buf.push(major | arg as u8),
            24..=0xff => self.buf.extend_from_slice(&[major | 24, arg as u8]),
            0x100..=0xffff => {
                self.buf.push(major | 25);
                self.buf.extend_from_slice(&(arg as u16).to_be_bytes());
            }
            0x1_0000..=0xffff_ffff => {
                self.buf.push(major | 26);
                self.buf.extend_from_slice(&(arg as u32).to_be_bytes());
            }
            _ => {
                self.buf.push(major | 27);
                self.buf.extend_from_slice(&arg.to_be_bytes());
            }
        }
    }

    fn raw(&mut self, major: u8, data: &[u8]) {
        self.head(major, data.len() as u64);
        self.buf.extend_from_slice(data);
    }

    /// Entries are written in the byte order of their encoded keys.
    fn map(&mut self, entries: &[(Value, Value)]) {
        let mut sorted: Vec<(Vec<u8>, &Value)> = entries
            .iter()
            .map(|(k, v)| (encode_canonical(k), v))
            .collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        self.head(MAP, sorted.len() as u64);
        for (key, value) in sorted {
            self.buf.extend_from_slice(&key);
            self.value(value);
        }
    }
}
