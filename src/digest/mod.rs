//! Hash algorithms and the canonical digest encoding.
//!
//! Digests are encoded as lowercase hex. Comparison decodes the stored
//! thumbprint and checks it against the recomputed bytes in constant time,
//! so upper-case hex from other producers still matches.

use std::io::Read;

use serde::{Deserialize, Serialize};
use sha2::Digest;
use subtle::ConstantTimeEq;

/// Hash algorithms the verifier can recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
    Blake3,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [Self::Sha256, Self::Sha384, Self::Sha512, Self::Blake3];

    /// Parse an algorithm name, ignoring case and `-`/`_` separators.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "sha256" => Some(Self::Sha256),
            "sha384" => Some(Self::Sha384),
            "sha512" => Some(Self::Sha512),
            "blake3" => Some(Self::Blake3),
            _ => None,
        }
    }

    /// Canonical name written into thumbprints.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Blake3 => "blake3",
        }
    }

    /// Digest length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha256 | Self::Blake3 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => sha2::Sha256::digest(data).to_vec(),
            Self::Sha384 => sha2::Sha384::digest(data).to_vec(),
            Self::Sha512 => sha2::Sha512::digest(data).to_vec(),
            Self::Blake3 => blake3::hash(data).as_bytes().to_vec(),
        }
    }

    /// Digest everything `reader` yields without buffering it whole.
    pub fn digest_reader<R: Read>(&self, mut reader: R) -> std::io::Result<Vec<u8>> {
        let digest = match self {
            Self::Sha256 => {
                let mut hasher = sha2::Sha256::new();
                std::io::copy(&mut reader, &mut hasher)?;
                hasher.finalize().to_vec()
            }
            Self::Sha384 => {
                let mut hasher = sha2::Sha384::new();
                std::io::copy(&mut reader, &mut hasher)?;
                hasher.finalize().to_vec()
            }
            Self::Sha512 => {
                let mut hasher = sha2::Sha512::new();
                std::io::copy(&mut reader, &mut hasher)?;
                hasher.finalize().to_vec()
            }
            Self::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                std::io::copy(&mut reader, &mut hasher)?;
                hasher.finalize().as_bytes().to_vec()
            }
        };
        Ok(digest)
    }

    /// Digest of `data` in the canonical (lowercase hex) encoding.
    pub fn hex_digest(&self, data: &[u8]) -> String {
        hex::encode(self.digest(data))
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compare a stored hex thumbprint against freshly computed digest bytes.
///
/// Runs in constant time with respect to the digest contents. A stored value
/// that is not valid hex never matches.
pub fn digests_match(expected_hex: &str, actual: &[u8]) -> bool {
    match hex::decode(expected_hex) {
        Ok(expected) => expected.as_slice().ct_eq(actual).into(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn lenient_names() {
        assert_eq!(HashAlgorithm::from_name("SHA256"), Some(HashAlgorithm::Sha256));
        assert_eq!(HashAlgorithm::from_name("sha-512"), Some(HashAlgorithm::Sha512));
        assert_eq!(HashAlgorithm::from_name("SHA_384"), Some(HashAlgorithm::Sha384));
        assert_eq!(HashAlgorithm::from_name("Blake3"), Some(HashAlgorithm::Blake3));
        assert_eq!(HashAlgorithm::from_name("md9"), None);
        assert_eq!(HashAlgorithm::from_name("sha1"), None);
        assert_eq!(HashAlgorithm::from_name(""), None);
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(HashAlgorithm::Sha256.hex_digest(b"hello"), HELLO_SHA256);
    }

    #[test]
    fn output_lengths() {
        for alg in HashAlgorithm::ALL {
            assert_eq!(alg.digest(b"x").len(), alg.output_len(), "{alg}");
        }
    }

    #[test]
    fn streaming_digest_matches_in_memory() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        for alg in HashAlgorithm::ALL {
            let streamed = alg.digest_reader(std::io::Cursor::new(&data)).unwrap();
            assert_eq!(streamed, alg.digest(&data), "{alg}");
        }
    }

    #[test]
    fn match_is_case_insensitive_and_rejects_garbage() {
        let actual = HashAlgorithm::Sha256.digest(b"hello");
        assert!(digests_match(HELLO_SHA256, &actual));
        assert!(digests_match(&HELLO_SHA256.to_uppercase(), &actual));
        assert!(!digests_match(&HELLO_SHA256[..62], &actual));
        assert!(!digests_match("not-hex", &actual));
        assert!(!digests_match(
            &HashAlgorithm::Sha256.hex_digest(b"hello!"),
            &actual
        ));
    }
}
