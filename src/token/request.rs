//! Signed mint requests
//!
//! A mint request is authenticated by an ECDSA signature over its digest,
//! so the ledger learns the caller from the key rather than trusting a
//! claimed identity.

use serde::{Deserialize, Serialize};

use super::account::AccountId;
use crate::crypto::{public_key_from_hex, sha256, verify_signature, KeyError, KeyPair};

/// An unsigned request to mint `amount` to `recipient`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MintRequest {
    /// Id of the ledger the request is meant for
    pub ledger_id: String,
    pub recipient: AccountId,
    pub amount: u128,
    /// Must equal the ledger's mint nonce when applied
    pub nonce: u64,
}

impl MintRequest {
    pub fn new(ledger_id: &str, recipient: AccountId, amount: u128, nonce: u64) -> Self {
        Self {
            ledger_id: ledger_id.to_string(),
            recipient,
            amount,
            nonce,
        }
    }

    /// SHA-256 over ledger id length (8 bytes BE) || ledger id ||
    /// recipient (20 bytes) || amount (16 bytes BE) || nonce (8 bytes BE)
    pub fn digest(&self) -> Vec<u8> {
        let id = self.ledger_id.as_bytes();
        let mut buf = Vec::with_capacity(52 + id.len());
        buf.extend_from_slice(&(id.len() as u64).to_be_bytes());
        buf.extend_from_slice(id);
        buf.extend_from_slice(self.recipient.as_bytes());
        buf.extend_from_slice(&self.amount.to_be_bytes());
        buf.extend_from_slice(&self.nonce.to_be_bytes());
        sha256(&buf)
    }

    /// Sign the request with the caller's key pair
    pub fn sign(self, key_pair: &KeyPair) -> Result<SignedMintRequest, KeyError> {
        let signature = key_pair.sign(&self.digest())?;
        Ok(SignedMintRequest {
            request: self,
            public_key_hex: key_pair.public_key_hex(),
            signature_hex: hex::encode(signature),
        })
    }
}

/// A mint request together with the caller's public key and signature
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedMintRequest {
    pub request: MintRequest,
    pub public_key_hex: String,
    pub signature_hex: String,
}

impl SignedMintRequest {
    /// Verify the signature and return the signing account
    pub fn signer(&self) -> Result<AccountId, KeyError> {
        let public_key = public_key_from_hex(&self.public_key_hex)?;
        let signature = hex::decode(&self.signature_hex).map_err(|_| KeyError::InvalidSignature)?;

        if !verify_signature(&public_key, &self.request.digest(), &signature)? {
            return Err(KeyError::VerificationFailed);
        }

        Ok(AccountId::from_public_key(&public_key))
    }
}
