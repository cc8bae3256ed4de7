//! Bencode values as stored in Transmission `.resume` files.
//!
//! Dictionaries keep their on-disk key order so that untouched fields are
//! re-encoded byte for byte.

use crate::error::Error;

const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Dict(Dictionary),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<(Vec<u8>, Value)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_slice() == key.as_bytes())
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Replace the value in place, or insert the key at its sorted position.
    pub fn insert(&mut self, key: &str, value: Value) {
        if let Some((_, slot)) = self
            .entries
            .iter_mut()
            .find(|(k, _)| k.as_slice() == key.as_bytes())
        {
            *slot = value;
            return;
        }
        let at = self
            .entries
            .partition_point(|(k, _)| k.as_slice() < key.as_bytes());
        self.entries.insert(at, (key.as_bytes().to_vec(), value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v))
    }
}

pub fn decode(input: &[u8]) -> Result<Value, Error> {
    let mut decoder = Decoder { input, pos: 0 };
    let value = decoder.value(0)?;
    if decoder.pos != input.len() {
        return Err(decoder.error("trailing data after top-level value"));
    }
    Ok(value)
}

pub fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(value, &mut out);
    out
}

fn encode_into(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Int(i) => {
            out.push(b'i');
            out.extend_from_slice(i.to_string().as_bytes());
            out.push(b'e');
        }
        Value::Bytes(bytes) => encode_bytes(bytes, out),
        Value::List(items) => {
            out.push(b'l');
            for item in items {
                encode_into(item, out);
            }
            out.push(b'e');
        }
        Value::Dict(dict) => {
            out.push(b'd');
            for (key, item) in dict.iter() {
                encode_bytes(key, out);
                encode_into(item, out);
            }
            out.push(b'e');
        }
    }
}

fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(bytes.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(bytes);
}

struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn error(&self, reason: &str) -> Error {
        Error::Format {
            offset: self.pos,
            reason: reason.to_string(),
        }
    }

    fn peek(&self) -> Result<u8, Error> {
        self.input
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.error("unexpected end of data"))
    }

    fn value(&mut self, depth: usize) -> Result<Value, Error> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        match self.peek()? {
            b'i' => {
                self.pos += 1;
                let n = self.integer(b'e')?;
                Ok(Value::Int(n))
            }
            b'l' => {
                self.pos += 1;
                let mut items = Vec::new();
                while self.peek()? != b'e' {
                    items.push(self.value(depth + 1)?);
                }
                self.pos += 1;
                Ok(Value::List(items))
            }
            b'd' => {
                self.pos += 1;
                let mut dict = Dictionary::new();
                while self.peek()? != b'e' {
                    if !self.peek()?.is_ascii_digit() {
                        return Err(self.error("dictionary key is not a byte string"));
                    }
                    let key = self.bytes()?;
                    let item = self.value(depth + 1)?;
                    dict.entries.push((key, item));
                }
                self.pos += 1;
                Ok(Value::Dict(dict))
            }
            b'0'..=b'9' => Ok(Value::Bytes(self.bytes()?)),
            _ => Err(self.error("unexpected byte")),
        }
    }

    fn bytes(&mut self) -> Result<Vec<u8>, Error> {
        let len = self.integer(b':')?;
        let len = usize::try_from(len).map_err(|_| self.error("negative string length"))?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.input.len())
            .ok_or_else(|| self.error("string runs past end of data"))?;
        let bytes = self.input[self.pos..end].to_vec();
        self.pos = end;
        Ok(bytes)
    }

    fn integer(&mut self, terminator: u8) -> Result<i64, Error> {
        let start = self.pos;
        let rest = &self.input[start..];
        let len = rest
            .iter()
            .position(|b| *b == terminator)
            .ok_or_else(|| self.error("unterminated integer"))?;
        let digits = &rest[..len];

        let unsigned = digits.strip_prefix(b"-").unwrap_or(digits);
        if unsigned.is_empty() || !unsigned.iter().all(u8::is_ascii_digit) {
            return Err(self.error("invalid integer"));
        }
        if unsigned.len() > 1 && unsigned[0] == b'0' {
            return Err(self.error("integer has leading zeros"));
        }
        if digits.len() != unsigned.len() && unsigned == b"0" {
            return Err(self.error("negative zero"));
        }

        // ASCII digits and an optional sign are valid UTF-8.
        let text = std::str::from_utf8(digits).map_err(|_| self.error("invalid integer"))?;
        let n = text
            .parse::<i64>()
            .map_err(|_| self.error("integer out of range"))?;
        self.pos = start + len + 1;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_nested_document() {
        let value = decode(b"d4:name3:foo5:peersl1:a1:be4:sizei-42ee").unwrap();
        let Value::Dict(dict) = value else {
            panic!("expected a dictionary");
        };
        assert_eq!(dict.get("name"), Some(&Value::Bytes(b"foo".to_vec())));
        assert_eq!(dict.get("size"), Some(&Value::Int(-42)));
        assert_eq!(
            dict.get("peers"),
            Some(&Value::List(vec![
                Value::Bytes(b"a".to_vec()),
                Value::Bytes(b"b".to_vec())
            ]))
        );
    }

    #[test]
    fn test_unsorted_keys_survive_reencoding() {
        let raw: &[u8] = b"d1:zi1e1:a0:1:mde1:kli0eee";
        let value = decode(raw).unwrap();
        assert_eq!(encode(&value), raw);
    }

    #[test]
    fn test_insert_new_key_at_sorted_position() {
        let Value::Dict(mut dict) = decode(b"d1:ai1e1:ci3ee").unwrap() else {
            panic!("expected a dictionary");
        };
        dict.insert("b", Value::Int(2));
        dict.insert("a", Value::Int(9));
        assert_eq!(encode(&Value::Dict(dict)), b"d1:ai9e1:bi2e1:ci3ee");
    }

    #[test]
    fn test_rejects_malformed_integers() {
        for raw in [&b"i03e"[..], b"i-0e", b"ie", b"i12", b"i99999999999999999999e"] {
            assert!(
                matches!(decode(raw), Err(Error::Format { .. })),
                "{:?} should be rejected",
                String::from_utf8_lossy(raw)
            );
        }
    }

    #[test]
    fn test_rejects_truncated_and_trailing_data() {
        assert!(matches!(decode(b"5:abc"), Err(Error::Format { .. })));
        assert!(matches!(decode(b"d1:a"), Err(Error::Format { .. })));
        assert!(matches!(
            decode(b"i1ei2e"),
            Err(Error::Format { offset: 3, .. })
        ));
        assert!(matches!(decode(b"di1ei2ee"), Err(Error::Format { .. })));
    }

    #[test]
    fn test_rejects_excessive_nesting() {
        let mut raw = vec![b'l'; MAX_DEPTH + 2];
        raw.extend(vec![b'e'; MAX_DEPTH + 2]);
        assert!(matches!(decode(&raw), Err(Error::Format { .. })));
    }
}
