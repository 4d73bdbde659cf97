use serde::{Deserialize, Serialize};
use std::fmt;

use super::ClipFormat;

const DOMAIN_TAG: &[u8] = b"clip-fingerprint-v1|";

/// Content hash of a normalized payload.
///
/// Independent of the order in which the platform enumerated formats.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    pub fn of_formats(formats: &[ClipFormat]) -> Self {
        let mut ordered: Vec<&ClipFormat> = formats.iter().collect();
        // 顺序无关
        ordered.sort_by(|a, b| a.kind.cmp(&b.kind));

        let mut hasher = blake3::Hasher::new();
        hasher.update(DOMAIN_TAG);
        for format in ordered {
            let key = format.kind.storage_key();
            hasher.update(&(key.len() as u64).to_le_bytes());
            hasher.update(key.as_bytes());
            hasher.update(&(format.bytes.len() as u64).to_le_bytes());
            hasher.update(&format.bytes);
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> anyhow::Result<Self> {
        let bytes = hex::decode(s)?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("fingerprint must be 32 bytes"))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..12])
    }
}
