use base64::Engine;
use hmac::{Hmac, Mac};
use md5::Md5;
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::error::PaymentError;

// Tried in order when a provider does not advertise its algorithm.
pub const DEFAULT_ALGORITHMS: &[Algorithm] = &[Algorithm::Sha256, Algorithm::Sha512, Algorithm::Md5];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Sha256,
    Sha512,
    Md5,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha512 => "sha512",
            Algorithm::Md5 => "md5",
        }
    }
}

pub fn compute(algorithm: Algorithm, payload: &[u8], secret: &[u8]) -> Vec<u8> {
    match algorithm {
        Algorithm::Sha256 => {
            let mut mac =
                Hmac::<Sha256>::new_from_slice(secret).expect("HMAC accepts keys of any length");
            mac.update(payload);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac =
                Hmac::<Sha512>::new_from_slice(secret).expect("HMAC accepts keys of any length");
            mac.update(payload);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Md5 => {
            let mut mac =
                Hmac::<Md5>::new_from_slice(secret).expect("HMAC accepts keys of any length");
            mac.update(payload);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

// Accepts the signature hex-encoded, or base64-encoded as a fallback.
// Comparison is constant-time in both paths.
pub fn verify_hmac(payload: &[u8], signature: &str, secret: &str, algorithm: Algorithm) -> bool {
    let signature = signature.trim();
    let expected = compute(algorithm, payload, secret.as_bytes());

    if ct_eq(hex::encode(&expected).as_bytes(), signature.as_bytes()) {
        return true;
    }
    if let Ok(decoded) = base64::engine::general_purpose::STANDARD.decode(signature) {
        if ct_eq(&expected, &decoded) {
            return true;
        }
    }
    false
}

// first matching algorithm wins
pub fn verify_webhook(
    payload: &[u8],
    signature: &str,
    secret: &str,
    algorithms: &[Algorithm],
) -> bool {
    algorithms
        .iter()
        .any(|&algorithm| verify_hmac(payload, signature, secret, algorithm))
}

pub fn verify_or_fail(
    gateway: &str,
    payload: &[u8],
    signature: &str,
    secret: &str,
    algorithms: &[Algorithm],
) -> Result<(), PaymentError> {
    if verify_webhook(payload, signature, secret, algorithms) {
        Ok(())
    } else {
        Err(PaymentError::InvalidSignature(gateway.to_string()))
    }
}

// Razorpay-style scheme: HMAC-SHA256 over "{order_id}|{payment_id}".
pub fn verify_order_payment(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &str,
) -> bool {
    let canonical = format!("{}|{}", order_id, payment_id);
    verify_hmac(canonical.as_bytes(), signature, secret, Algorithm::Sha256)
}

// Stripe-style scheme: a comma-delimited t=<unix>,v1=<hex> header,
// HMAC-SHA256 over "{t}.{payload}". A non-positive tolerance disables the
// timestamp window check.
pub fn verify_signed_header(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
) -> bool {
    let mut timestamp = None;
    let mut v1 = None;
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => v1 = Some(value),
            _ => {}
        }
    }
    let (Some(timestamp), Some(v1)) = (timestamp, v1) else {
        return false;
    };
    let Ok(ts) = timestamp.parse::<i64>() else {
        return false;
    };
    if tolerance_secs > 0 && (chrono::Utc::now().timestamp() - ts).abs() > tolerance_secs {
        return false;
    }

    let mut signed = Vec::with_capacity(timestamp.len() + 1 + payload.len());
    signed.extend_from_slice(timestamp.as_bytes());
    signed.push(b'.');
    signed.extend_from_slice(payload);
    verify_hmac(&signed, v1, secret, Algorithm::Sha256)
}

// PhonePe-style scheme: the header carries "{digest}###{key_index}" where
// digest is plain SHA-256 over body + path + secret. The key index is public
// routing data, so it is matched with ordinary equality; the digest
// comparison stays constant-time.
pub fn verify_keyed_digest(
    body: &str,
    path: &str,
    header: &str,
    secret: &str,
    key_index: &str,
) -> bool {
    let Some((digest, index)) = header.rsplit_once("###") else {
        return false;
    };
    if index != key_index {
        return false;
    }

    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    hasher.update(path.as_bytes());
    hasher.update(secret.as_bytes());
    let expected = hex::encode(hasher.finalize());
    ct_eq(expected.as_bytes(), digest.as_bytes())
}
