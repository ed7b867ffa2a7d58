use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use std::fmt;
use stellar_strkey::ed25519::{PrivateKey, PublicKey};

use crate::error::MintError;

/// Signing identity derived from an `S...` seed.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Parse a secret seed. `role` names the key in the resulting error.
    pub fn from_seed(seed: &str, role: &'static str) -> Result<Self, MintError> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Err(MintError::InvalidSeed {
                role,
                reason: "seed is empty".to_string(),
            });
        }

        let private = PrivateKey::from_string(seed).map_err(|_| MintError::InvalidSeed {
            role,
            reason: "not a valid secret seed".to_string(),
        })?;

        Ok(Self {
            signing_key: SigningKey::from_bytes(&private.0),
        })
    }

    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The `G...` account address.
    pub fn address(&self) -> String {
        PublicKey(self.public_key()).to_string()
    }

    /// The `S...` secret seed. Handle with care.
    pub fn seed(&self) -> String {
        PrivateKey(self.signing_key.to_bytes()).to_string()
    }

    /// Last four bytes of the public key, used to match signatures to signers.
    pub fn signature_hint(&self) -> [u8; 4] {
        let public = self.public_key();
        [public[28], public[29], public[30], public[31]]
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .field("seed", &"[REDACTED]")
            .finish()
    }
}

/// Decode a `G...` address into raw ed25519 public key bytes.
pub fn decode_address(address: &str) -> Result<[u8; 32], MintError> {
    PublicKey::from_string(address.trim())
        .map(|key| key.0)
        .map_err(|_| MintError::InvalidAddress {
            address: address.to_string(),
        })
}
