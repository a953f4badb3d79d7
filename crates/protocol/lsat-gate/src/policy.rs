//! Pricing and per-request caveat policies.

use lsat_types::{Caveat, DEFAULT_PRICE_SATS, REQUEST_PATH_CAVEAT};

use crate::types::RequestContext;

/// Decides how many satoshis a request costs.
pub trait AmountPolicy: Send + Sync {
    /// Price of the request in satoshis.
    fn price(&self, request: &RequestContext) -> i64;
}

/// Every request costs the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPrice(pub i64);

impl Default for FixedPrice {
    fn default() -> Self {
        Self(DEFAULT_PRICE_SATS)
    }
}

impl AmountPolicy for FixedPrice {
    fn price(&self, _request: &RequestContext) -> i64 {
        self.0
    }
}

impl<F> AmountPolicy for F
where
    F: Fn(&RequestContext) -> i64 + Send + Sync,
{
    fn price(&self, request: &RequestContext) -> i64 {
        self(request)
    }
}

/// Derives caveats from the request, both when minting and when verifying.
pub trait CaveatPolicy: Send + Sync {
    /// Caveats the token for this request must carry.
    fn request_caveats(&self, request: &RequestContext) -> Vec<Caveat>;
}

/// Binds tokens to the request path under `RequestPath`.
///
/// The value is the path with `%` and `=` percent-escaped, so every path
/// yields a caveat that survives the codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathCaveat;

impl CaveatPolicy for PathCaveat {
    fn request_caveats(&self, request: &RequestContext) -> Vec<Caveat> {
        vec![Caveat::new(REQUEST_PATH_CAVEAT, escape_path(&request.path))]
    }
}

/// Escape `%` and `=` in a path. Injective, and a no-op for paths without them.
pub fn escape_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '=' => escaped.push_str("%3D"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Adds no per-request caveats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoRequestCaveats;

impl CaveatPolicy for NoRequestCaveats {
    fn request_caveats(&self, _request: &RequestContext) -> Vec<Caveat> {
        Vec::new()
    }
}

impl<F> CaveatPolicy for F
where
    F: Fn(&RequestContext) -> Vec<Caveat> + Send + Sync,
{
    fn request_caveats(&self, request: &RequestContext) -> Vec<Caveat> {
        self(request)
    }
}
