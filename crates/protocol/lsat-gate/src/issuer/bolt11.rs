//! Minimal BOLT11 decoding.
//!
//! Only what the gate needs from an invoice handed back by a remote backend:
//! checksum, network prefix, amount and payment hash. Node signatures are not
//! checked.

use lsat_crypto::Hash;

use crate::error::{GateError, GateResult};

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

const CHECKSUM_LEN: usize = 6;
const TIMESTAMP_LEN: usize = 7;
const SIGNATURE_LEN: usize = 104;

/// Tagged field type of the payment hash.
const TAG_PAYMENT_HASH: u8 = 1;
/// Length in 5-bit groups of a 32-byte payment hash.
const PAYMENT_HASH_GROUPS: usize = 52;

const MSAT_PER_BTC: u64 = 100_000_000_000;

/// The parts of a decoded invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bolt11 {
    /// Human-readable part, e.g. `lnbc2500u`.
    pub hrp: String,
    /// Network prefix, e.g. `bc` or `tb`.
    pub currency: String,
    /// Amount in millisatoshis, if the invoice carries one.
    pub amount_msat: Option<u64>,
    /// Creation time, seconds since the Unix epoch.
    pub timestamp: u64,
    /// Payment hash from the `p` field.
    pub payment_hash: Hash,
}

/// Decode a BOLT11 payment request.
///
/// Accepts an optional `lightning:` prefix. Mixed-case strings are rejected.
pub fn decode_bolt11(invoice: &str) -> GateResult<Bolt11> {
    let invoice = invoice.trim();
    let invoice = match invoice.get(..10) {
        Some(prefix) if prefix.eq_ignore_ascii_case("lightning:") => &invoice[10..],
        _ => invoice,
    };

    if invoice.chars().any(|c| c.is_ascii_lowercase())
        && invoice.chars().any(|c| c.is_ascii_uppercase())
    {
        return Err(invalid("mixed case"));
    }
    let invoice = invoice.to_ascii_lowercase();

    let (hrp, data) = invoice
        .rsplit_once('1')
        .ok_or_else(|| invalid("missing separator"))?;
    if !hrp.starts_with("ln") {
        return Err(invalid("not a lightning invoice"));
    }

    let groups = data
        .bytes()
        .map(|c| {
            CHARSET
                .iter()
                .position(|&x| x == c)
                .map(|p| p as u8)
                .ok_or_else(|| invalid(format!("invalid character {:?}", c as char)))
        })
        .collect::<GateResult<Vec<u8>>>()?;

    if groups.len() < CHECKSUM_LEN + TIMESTAMP_LEN + SIGNATURE_LEN {
        return Err(invalid("too short"));
    }
    if !verify_checksum(hrp, &groups) {
        return Err(invalid("checksum mismatch"));
    }

    let body = &groups[..groups.len() - CHECKSUM_LEN - SIGNATURE_LEN];
    let timestamp = body[..TIMESTAMP_LEN]
        .iter()
        .fold(0u64, |acc, &g| (acc << 5) | u64::from(g));

    let payment_hash = find_payment_hash(&body[TIMESTAMP_LEN..])?;
    let (currency, amount_msat) = parse_hrp(hrp)?;

    Ok(Bolt11 {
        hrp: hrp.to_string(),
        currency,
        amount_msat,
        timestamp,
        payment_hash,
    })
}

fn invalid(reason: impl Into<String>) -> GateError {
    GateError::InvalidInvoice(reason.into())
}

fn polymod(values: impl Iterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn verify_checksum(hrp: &str, groups: &[u8]) -> bool {
    let expanded = hrp
        .bytes()
        .map(|c| c >> 5)
        .chain(std::iter::once(0))
        .chain(hrp.bytes().map(|c| c & 31));
    polymod(expanded.chain(groups.iter().copied())) == 1
}

fn find_payment_hash(mut fields: &[u8]) -> GateResult<Hash> {
    while fields.len() >= 3 {
        let tag = fields[0];
        let len = usize::from(fields[1]) * 32 + usize::from(fields[2]);
        let value = fields
            .get(3..3 + len)
            .ok_or_else(|| invalid("truncated tagged field"))?;
        // Readers skip `p` fields of the wrong length.
        if tag == TAG_PAYMENT_HASH && len == PAYMENT_HASH_GROUPS {
            return Hash::from_slice(&groups_to_bytes(value))
                .map_err(|e| invalid(e.to_string()));
        }
        fields = &fields[3 + len..];
    }
    Err(invalid("missing payment hash"))
}

fn groups_to_bytes(groups: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(groups.len() * 5 / 8);
    let mut acc: u32 = 0;
    let mut bits = 0;
    for &g in groups {
        acc = ((acc << 5) | u32::from(g)) & 0xfff;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }
    out
}

fn parse_hrp(hrp: &str) -> GateResult<(String, Option<u64>)> {
    let rest = &hrp[2..];
    let split = rest
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (currency, amount) = rest.split_at(split);
    if currency.is_empty() {
        return Err(invalid("missing currency prefix"));
    }
    if amount.is_empty() {
        return Ok((currency.to_string(), None));
    }

    let (digits, multiplier) = match amount.as_bytes()[amount.len() - 1] {
        m @ (b'm' | b'u' | b'n' | b'p') => (&amount[..amount.len() - 1], Some(m)),
        _ => (amount, None),
    };
    let value: u64 = digits
        .parse()
        .map_err(|_| invalid(format!("invalid amount {:?}", amount)))?;

    let msat = match multiplier {
        None => value.checked_mul(MSAT_PER_BTC),
        Some(b'm') => value.checked_mul(MSAT_PER_BTC / 1_000),
        Some(b'u') => value.checked_mul(MSAT_PER_BTC / 1_000_000),
        Some(b'n') => value.checked_mul(MSAT_PER_BTC / 1_000_000_000),
        _ => {
            if value % 10 != 0 {
                return Err(invalid("sub-millisatoshi amount"));
            }
            Some(value / 10)
        }
    }
    .ok_or_else(|| invalid("amount overflow"))?;

    Ok((currency.to_string(), Some(msat)))
}
