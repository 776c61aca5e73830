//! Transaction entity

use crate::error::{Result, TransactionError};
use shared_crypto::{wallet_id, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, Sha256Hasher};

/// UTXO-style transfer from `sender_id` to `receiver_id`.
///
/// All content fields are fixed at construction. Only the sender public key
/// and signature are attached afterwards, and both must be present before the
/// transaction is submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    id: String,
    sender_id: String,
    receiver_id: String,
    amount: i64,
    /// Unix epoch seconds
    timestamp: i64,
    note: String,
    input_utxo_ids: Vec<String>,
    sender_public_key: Option<Ed25519PublicKey>,
    signature: Option<Ed25519Signature>,
}

impl Transaction {
    /// Create a transaction stamped with the current time.
    pub fn new(
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        amount: i64,
        note: impl Into<String>,
        input_utxo_ids: Vec<String>,
    ) -> Self {
        Self::with_timestamp(
            sender_id,
            receiver_id,
            amount,
            chrono::Utc::now().timestamp(),
            note,
            input_utxo_ids,
        )
    }

    /// Create a transaction with an explicit timestamp.
    ///
    /// Used when rebuilding a transaction from a submitted request, and by the
    /// settlement scheduler so that one pass yields reproducible ids.
    pub fn with_timestamp(
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        amount: i64,
        timestamp: i64,
        note: impl Into<String>,
        input_utxo_ids: Vec<String>,
    ) -> Self {
        let mut tx = Self {
            id: String::new(),
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            amount,
            timestamp,
            note: note.into(),
            input_utxo_ids,
            sender_public_key: None,
            signature: None,
        };
        tx.id = tx.compute_id();
        tx
    }

    /// The exact bytes that are signed and verified.
    pub fn payload(&self) -> Vec<u8> {
        format!(
            "{}|{}|{}|{}|{}",
            self.sender_id, self.receiver_id, self.amount, self.timestamp, self.note
        )
        .into_bytes()
    }

    /// SHA-256 over the payload followed by each input id, in order.
    pub fn compute_id(&self) -> String {
        let mut hasher = Sha256Hasher::new();
        hasher.update(&self.payload());
        for input in &self.input_utxo_ids {
            hasher.update(input.as_bytes());
        }
        hasher.finalize_hex()
    }

    /// Sign the payload and attach the signer's public key.
    pub fn sign(&mut self, keypair: &Ed25519KeyPair) {
        let signature = keypair.sign(&self.payload());
        self.attach_signature(keypair.public_key(), signature);
    }

    /// Attach a signature produced elsewhere.
    pub fn attach_signature(&mut self, public_key: Ed25519PublicKey, signature: Ed25519Signature) {
        self.sender_public_key = Some(public_key);
        self.signature = Some(signature);
    }

    /// Verify the attached signature over [`Self::payload`].
    pub fn verify_signature(&self) -> Result<()> {
        let (Some(public_key), Some(signature)) = (&self.sender_public_key, &self.signature)
        else {
            return Err(TransactionError::Unsigned {
                tx_id: self.id.clone(),
            });
        };

        public_key
            .verify(&self.payload(), signature)
            .map_err(|_| TransactionError::InvalidSignature {
                tx_id: self.id.clone(),
            })
    }

    /// Check that the sender id is the wallet id of the attached key.
    pub fn verify_sender_key(&self) -> Result<()> {
        let Some(public_key) = &self.sender_public_key else {
            return Err(TransactionError::Unsigned {
                tx_id: self.id.clone(),
            });
        };

        let derived = wallet_id(public_key);
        if derived != self.sender_id {
            return Err(TransactionError::SenderKeyMismatch {
                sender: self.sender_id.clone(),
                derived,
            });
        }
        Ok(())
    }

    /// Whether both authorization fields are attached.
    pub fn is_signed(&self) -> bool {
        self.sender_public_key.is_some() && self.signature.is_some()
    }

    /// Deterministic transaction id (lowercase hex).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sender wallet id.
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    /// Receiver wallet id.
    pub fn receiver_id(&self) -> &str {
        &self.receiver_id
    }

    /// Transferred amount.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Creation time (Unix epoch seconds).
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Free-form note.
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Ordered ids of the outputs this transaction spends.
    pub fn input_utxo_ids(&self) -> &[String] {
        &self.input_utxo_ids
    }

    /// Attached sender public key, if any.
    pub fn sender_public_key(&self) -> Option<&Ed25519PublicKey> {
        self.sender_public_key.as_ref()
    }

    /// Attached signature, if any.
    pub fn signature(&self) -> Option<&Ed25519Signature> {
        self.signature.as_ref()
    }
}
