//! Macaroon V2 binary envelope.
//!
//! # Wire Format
//!
//! ```text
//! [0x02]                          # Format version
//! [location]? [identifier] [EOS]  # Header section
//! ([location]? [id] [vid]? [EOS])*  # One section per caveat
//! [EOS]                           # End of caveats
//! [signature]                     # 32-byte signature field
//! ```
//!
//! Every field is `[type: uvarint][length: uvarint][data]`; `EOS` is the
//! single byte `0x00`. Field types: location=1, identifier=2, vid=4,
//! signature=6.

use lsat_crypto::{Signature, HASH_LEN};
use lsat_types::constants::{MAX_CAVEATS, MAX_TOKEN_SIZE};

use crate::error::{DecodeError, EncodeError};

/// Macaroon binary format version byte.
pub const MACAROON_V2: u8 = 0x02;

const FIELD_EOS: u64 = 0;
const FIELD_LOCATION: u64 = 1;
const FIELD_IDENTIFIER: u64 = 2;
const FIELD_VERIFICATION_ID: u64 = 4;
const FIELD_SIGNATURE: u64 = 6;

/// A caveat as stored in the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCaveat {
    /// Optional location hint (third-party caveats only, in practice).
    pub location: Option<String>,
    /// Caveat id: the encoded `condition=value` for first-party caveats.
    pub id: Vec<u8>,
    /// Verification id; present only on third-party caveats.
    pub verification_id: Option<Vec<u8>>,
}

impl RawCaveat {
    /// Create a first-party caveat.
    pub fn first_party(id: impl Into<Vec<u8>>) -> Self {
        Self {
            location: None,
            id: id.into(),
            verification_id: None,
        }
    }

    /// Whether this caveat must be discharged by a third party.
    pub fn is_third_party(&self) -> bool {
        self.verification_id.is_some()
    }
}

/// A macaroon in its envelope form: fields as bytes, nothing verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMacaroon {
    /// Location hint (`LSAT` for minted tokens).
    pub location: Option<String>,
    /// Opaque identifier bytes.
    pub identifier: Vec<u8>,
    /// Caveats in chain order.
    pub caveats: Vec<RawCaveat>,
    /// Tail of the HMAC chain.
    pub signature: Signature,
}

impl RawMacaroon {
    /// Ids of first-party caveats, in order.
    pub fn first_party_caveats(&self) -> impl Iterator<Item = &[u8]> {
        self.caveats
            .iter()
            .filter(|c| !c.is_third_party())
            .map(|c| c.id.as_slice())
    }

    /// Encode to V2 binary.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        if self.caveats.len() > MAX_CAVEATS {
            return Err(EncodeError::TooManyCaveats {
                count: self.caveats.len(),
                max: MAX_CAVEATS,
            });
        }

        let mut buf = Vec::with_capacity(64 + self.identifier.len());
        buf.push(MACAROON_V2);

        if let Some(location) = non_empty(&self.location) {
            put_field(&mut buf, FIELD_LOCATION, location.as_bytes());
        }
        put_field(&mut buf, FIELD_IDENTIFIER, &self.identifier);
        buf.push(FIELD_EOS as u8);

        for caveat in &self.caveats {
            if let Some(location) = non_empty(&caveat.location) {
                put_field(&mut buf, FIELD_LOCATION, location.as_bytes());
            }
            put_field(&mut buf, FIELD_IDENTIFIER, &caveat.id);
            if let Some(vid) = caveat.verification_id.as_deref().filter(|v| !v.is_empty()) {
                put_field(&mut buf, FIELD_VERIFICATION_ID, vid);
            }
            buf.push(FIELD_EOS as u8);
        }
        buf.push(FIELD_EOS as u8);

        put_field(&mut buf, FIELD_SIGNATURE, self.signature.as_bytes());

        if buf.len() > MAX_TOKEN_SIZE {
            return Err(EncodeError::TooLarge {
                size: buf.len(),
                max: MAX_TOKEN_SIZE,
            });
        }
        Ok(buf)
    }

    /// Decode from V2 binary.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() > MAX_TOKEN_SIZE {
            return Err(DecodeError::TooLarge {
                size: bytes.len(),
                max: MAX_TOKEN_SIZE,
            });
        }

        let mut reader = Reader::new(bytes);
        let version = reader.read_u8()?;
        if version != MACAROON_V2 {
            return Err(DecodeError::UnsupportedMacaroonVersion(version));
        }

        // Header section
        let (location, identifier) = match reader.read_section_start()? {
            Some(start) => start,
            None => {
                return Err(DecodeError::UnexpectedField {
                    expected: FIELD_IDENTIFIER,
                    got: FIELD_EOS,
                })
            }
        };
        reader.expect_eos()?;

        // Caveat sections
        let mut caveats = Vec::new();
        while let Some((location, id)) = reader.read_section_start()? {
            let (field_type, data) = reader.read_field()?;
            let verification_id = match field_type {
                FIELD_EOS => None,
                FIELD_VERIFICATION_ID => {
                    reader.expect_eos()?;
                    Some(data.to_vec()).filter(|v| !v.is_empty())
                }
                got => {
                    return Err(DecodeError::UnexpectedField {
                        expected: FIELD_EOS,
                        got,
                    })
                }
            };

            caveats.push(RawCaveat {
                location,
                id,
                verification_id,
            });
            if caveats.len() > MAX_CAVEATS {
                return Err(DecodeError::TooManyCaveats(MAX_CAVEATS));
            }
        }

        // Signature
        let (field_type, data) = reader.read_field()?;
        if field_type != FIELD_SIGNATURE {
            return Err(DecodeError::UnexpectedField {
                expected: FIELD_SIGNATURE,
                got: field_type,
            });
        }
        if data.len() != HASH_LEN {
            return Err(DecodeError::InvalidField(format!(
                "signature must be {} bytes, got {}",
                HASH_LEN,
                data.len()
            )));
        }
        let mut signature = [0u8; 32];
        signature.copy_from_slice(data);

        if reader.remaining() > 0 {
            return Err(DecodeError::TrailingBytes(reader.remaining()));
        }

        Ok(Self {
            location,
            identifier,
            caveats,
            signature: Signature::from_bytes(signature),
        })
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

fn put_uvarint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

fn put_field(buf: &mut Vec<u8>, field_type: u64, data: &[u8]) {
    put_uvarint(buf, field_type);
    put_uvarint(buf, data.len() as u64);
    buf.extend_from_slice(data);
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = *self.bytes.get(self.pos).ok_or(DecodeError::Truncated {
            expected: self.pos + 1,
            got: self.bytes.len(),
        })?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_uvarint(&mut self) -> Result<u64, DecodeError> {
        let mut value: u64 = 0;
        for i in 0..10 {
            let byte = self.read_u8()?;
            if i == 9 && byte > 1 {
                return Err(DecodeError::VarintOverflow);
            }
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::VarintOverflow)
    }

    /// Read one field. `EOS` is returned as type 0 with no data.
    fn read_field(&mut self) -> Result<(u64, &'a [u8]), DecodeError> {
        let field_type = self.read_uvarint()?;
        if field_type == FIELD_EOS {
            return Ok((FIELD_EOS, &[]));
        }

        let len = usize::try_from(self.read_uvarint()?)
            .map_err(|_| DecodeError::InvalidField("field length overflows usize".into()))?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(DecodeError::Truncated {
                expected: self.pos.saturating_add(len),
                got: self.bytes.len(),
            })?;

        let data = &self.bytes[self.pos..end];
        self.pos = end;
        Ok((field_type, data))
    }

    fn expect_eos(&mut self) -> Result<(), DecodeError> {
        match self.read_field()? {
            (FIELD_EOS, _) => Ok(()),
            (got, _) => Err(DecodeError::UnexpectedField {
                expected: FIELD_EOS,
                got,
            }),
        }
    }

    /// Read `[location]? identifier` at the start of a section.
    ///
    /// Returns `None` if the section is empty (an immediate `EOS`).
    fn read_section_start(&mut self) -> Result<Option<(Option<String>, Vec<u8>)>, DecodeError> {
        let (mut field_type, mut data) = self.read_field()?;
        if field_type == FIELD_EOS {
            return Ok(None);
        }

        let mut location = None;
        if field_type == FIELD_LOCATION {
            location = Some(
                String::from_utf8(data.to_vec())
                    .map_err(|_| DecodeError::InvalidField("location is not UTF-8".into()))?,
            );
            (field_type, data) = self.read_field()?;
        }

        if field_type != FIELD_IDENTIFIER {
            return Err(DecodeError::UnexpectedField {
                expected: FIELD_IDENTIFIER,
                got: field_type,
            });
        }
        Ok(Some((location, data.to_vec())))
    }
}
