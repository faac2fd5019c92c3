//! Ed25519 transaction signer.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use chainmuse_core::Address;
use chainmuse_error::{LedgerError, LedgerErrorKind};
use ed25519_dalek::Signer as _;
use ed25519_dalek::SigningKey;

type Blake2b256 = Blake2b<U32>;

/// Signature scheme flag for Ed25519 keys and signatures.
const ED25519_FLAG: u8 = 0x00;

/// Intent prefix for transaction data: scope, version, app id.
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

const BECH32_HRP: &str = "suiprivkey";

/// Signing identity bound to the minting service.
///
/// The key never leaves this type; only the derived address and detached
/// signatures are exposed.
pub struct SuiSigner {
    key: SigningKey,
    address: Address,
}

impl SuiSigner {
    /// Load a signer from its textual secret.
    ///
    /// Accepts a bech32 `suiprivkey…` string, 32 raw bytes in hex (with or
    /// without `0x`), or base64 of `flag || key` as found in Sui keystores.
    ///
    /// # Errors
    ///
    /// Returns `Signer` if the secret cannot be decoded or is not Ed25519.
    pub fn from_secret(secret: &str) -> Result<Self, LedgerError> {
        let secret = secret.trim();
        let bytes = if secret.starts_with(BECH32_HRP) {
            decode_bech32(secret)?
        } else if let Some(bytes) = decode_hex(secret) {
            bytes
        } else {
            decode_base64(secret)?
        };
        Ok(Self::from_bytes(&bytes))
    }

    /// Build a signer from raw 32-byte key material.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let key = SigningKey::from_bytes(bytes);
        let address = derive_address(key.verifying_key().as_bytes());
        Self { key, address }
    }

    /// Ledger address controlled by this key.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Sign transaction bytes, returning the serialized base64 signature
    /// `flag || signature || public key`.
    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> String {
        let mut hasher = Blake2b256::new();
        hasher.update(TRANSACTION_INTENT);
        hasher.update(tx_bytes);
        let digest = hasher.finalize();

        let signature = self.key.sign(&digest);
        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(self.key.verifying_key().as_bytes());
        STANDARD.encode(serialized)
    }
}

impl std::fmt::Debug for SuiSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Address of an Ed25519 public key: `0x` + hex(blake2b-256(flag || pk)).
pub fn derive_address(public_key: &[u8; 32]) -> Address {
    let mut hasher = Blake2b256::new();
    hasher.update([ED25519_FLAG]);
    hasher.update(public_key);
    Address::new(format!("0x{}", hex::encode(hasher.finalize())))
}

fn signer_error(message: impl Into<String>) -> LedgerError {
    LedgerError::new(LedgerErrorKind::Signer(message.into()))
}

fn decode_bech32(secret: &str) -> Result<[u8; 32], LedgerError> {
    let (hrp, data) =
        bech32::decode(secret).map_err(|e| signer_error(format!("invalid bech32 key: {}", e)))?;
    if hrp.to_string() != BECH32_HRP {
        return Err(signer_error(format!("unexpected key prefix '{}'", hrp)));
    }
    flagged_key(&data)
}

fn decode_hex(secret: &str) -> Option<[u8; 32]> {
    let stripped = secret.strip_prefix("0x").unwrap_or(secret);
    let bytes = hex::decode(stripped).ok()?;
    bytes.try_into().ok()
}

fn decode_base64(secret: &str) -> Result<[u8; 32], LedgerError> {
    let bytes = STANDARD
        .decode(secret)
        .map_err(|e| signer_error(format!("unrecognized key encoding: {}", e)))?;
    match bytes.len() {
        32 => Ok(to_array(&bytes)),
        33 => flagged_key(&bytes),
        n => Err(signer_error(format!("expected 32 or 33 key bytes, got {}", n))),
    }
}

fn flagged_key(data: &[u8]) -> Result<[u8; 32], LedgerError> {
    match data.split_first() {
        Some((&ED25519_FLAG, key)) if key.len() == 32 => Ok(to_array(key)),
        Some((&ED25519_FLAG, key)) => Err(signer_error(format!(
            "expected 32 key bytes, got {}",
            key.len()
        ))),
        Some((flag, _)) => Err(signer_error(format!(
            "unsupported signature scheme flag {:#04x}",
            flag
        ))),
        None => Err(signer_error("empty key")),
    }
}

fn to_array(bytes: &[u8]) -> [u8; 32] {
    let mut key = [0u8; 32];
    key.copy_from_slice(bytes);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use bech32::{Bech32, Hrp};
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    const KEY: [u8; 32] = [7u8; 32];

    #[test]
    fn encodings_resolve_to_the_same_address() {
        let from_hex = SuiSigner::from_secret(&hex::encode(KEY)).expect("hex key");
        let from_prefixed = SuiSigner::from_secret(&format!("0x{}", hex::encode(KEY)))
            .expect("prefixed hex key");

        let mut flagged = vec![ED25519_FLAG];
        flagged.extend_from_slice(&KEY);
        let from_base64 = SuiSigner::from_secret(&STANDARD.encode(&flagged)).expect("base64 key");

        let hrp = Hrp::parse(BECH32_HRP).expect("valid hrp");
        let encoded = bech32::encode::<Bech32>(hrp, &flagged).expect("bech32 encoding");
        let from_bech32 = SuiSigner::from_secret(&encoded).expect("bech32 key");

        assert_eq!(from_hex.address(), from_prefixed.address());
        assert_eq!(from_hex.address(), from_base64.address());
        assert_eq!(from_hex.address(), from_bech32.address());
        assert!(from_hex.address().as_str().starts_with("0x"));
        assert_eq!(from_hex.address().as_str().len(), 66);
    }

    #[test]
    fn non_ed25519_flag_is_rejected() {
        let mut flagged = vec![0x01];
        flagged.extend_from_slice(&KEY);
        let err = SuiSigner::from_secret(&STANDARD.encode(&flagged)).expect_err("secp key");
        assert!(matches!(err.kind, LedgerErrorKind::Signer(_)));
    }

    #[test]
    fn garbage_secret_is_rejected() {
        let err = SuiSigner::from_secret("not a key!").expect_err("garbage");
        assert!(matches!(err.kind, LedgerErrorKind::Signer(_)));
    }

    #[test]
    fn signature_verifies_over_intent_digest() {
        let signer = SuiSigner::from_bytes(&KEY);
        let tx_bytes = b"transaction data";
        let encoded = signer.sign_transaction(tx_bytes);
        let raw = STANDARD.decode(encoded).expect("base64 signature");

        assert_eq!(raw.len(), 97);
        assert_eq!(raw[0], ED25519_FLAG);

        let signature = Signature::from_slice(&raw[1..65]).expect("signature bytes");
        let public: [u8; 32] = raw[65..].try_into().expect("public key bytes");
        let verifying = VerifyingKey::from_bytes(&public).expect("verifying key");
        assert_eq!(derive_address(&public), *signer.address());

        let mut hasher = Blake2b256::new();
        hasher.update(TRANSACTION_INTENT);
        hasher.update(tx_bytes);
        verifying
            .verify(&hasher.finalize(), &signature)
            .expect("signature verifies");
    }

    #[test]
    fn debug_does_not_leak_key() {
        let signer = SuiSigner::from_bytes(&KEY);
        let rendered = format!("{:?}", signer);
        assert!(!rendered.contains(&hex::encode(KEY)));
        assert!(rendered.contains(signer.address().as_str()));
    }
}
