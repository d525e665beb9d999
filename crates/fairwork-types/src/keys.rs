use crate::TypeError;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ed25519 public key (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify an ed25519 signature over a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let Ok(sig_bytes) = <[u8; 64]>::try_from(signature.as_bytes()) else {
            return false;
        };
        let dalek_sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Detached signature bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Ed25519 keypair. The signing key never leaves this struct except
/// through `to_bytes`, which only storage code calls.
pub struct Keypair {
    signing_key: SigningKey,
    public_key: PublicKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        let public_key = PublicKey::from_bytes(verifying_key.to_bytes());

        Self {
            signing_key,
            public_key,
        }
    }

    /// Reconstruct a keypair from its 32-byte secret key.
    pub fn from_bytes(bytes: &[u8]) -> crate::Result<Self> {
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }

        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(bytes);

        let signing_key = SigningKey::from_bytes(&key_bytes);
        let verifying_key = signing_key.verifying_key();
        let public_key = PublicKey::from_bytes(verifying_key.to_bytes());

        Ok(Self {
            signing_key,
            public_key,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        let signature = self.signing_key.sign(message);
        Signature::new(signature.to_bytes().to_vec())
    }

    /// Export the secret key (public key is derivable).
    pub fn to_bytes(&self) -> Vec<u8> {
        self.signing_key.to_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let keypair = Keypair::generate();
        let message = b"listing escrow payload";

        let signature = keypair.sign(message);
        assert!(keypair.public_key().verify(message, &signature));
        assert!(!keypair.public_key().verify(b"other payload", &signature));
    }

    #[test]
    fn test_secret_round_trip() {
        let keypair = Keypair::generate();
        let restored = Keypair::from_bytes(&keypair.to_bytes()).unwrap();

        assert_eq!(restored.public_key(), keypair.public_key());

        let message = b"round trip";
        assert!(keypair
            .public_key()
            .verify(message, &restored.sign(message)));
    }

    #[test]
    fn test_from_bytes_rejects_bad_length() {
        assert!(Keypair::from_bytes(&[0u8; 16]).is_err());
    }

    #[test]
    fn test_verify_rejects_foreign_key() {
        let signer = Keypair::generate();
        let other = Keypair::generate();

        let message = b"authority only";
        let signature = signer.sign(message);
        assert!(!other.public_key().verify(message, &signature));
    }
}
