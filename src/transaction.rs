//! Single-operation transactions: build, hash, sign, and encode.
//!
//! Every transaction carries exactly one operation, infinite time bounds, and
//! uses `source.sequence + 1`. The snapshot passed to [`TransactionBuilder::new`]
//! must come from a lookup made right before the build.

use sha2::{Digest, Sha256};
use stellar_xdr::curr::{self as xdr, Limits, WriteXdr};

use crate::asset::Asset;
use crate::crypto::{decode_address, Keypair};
use crate::error::MintError;
use crate::ledger::Account;

const MAX_MEMO_TEXT_BYTES: usize = 28;

/// Text memos are limited to 28 bytes on the wire.
pub fn check_memo(memo: Option<&str>) -> Result<(), MintError> {
    match memo {
        Some(text) if text.len() > MAX_MEMO_TEXT_BYTES => {
            Err(MintError::InvalidInput("memo must be at most 28 bytes"))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateAccount {
        destination: String,
        starting_balance: i64,
    },
    ChangeTrust {
        asset: Asset,
        limit: i64,
    },
    Payment {
        destination: String,
        asset: Asset,
        amount: i64,
    },
    SetOptions(SetOptions),
}

/// The subset of set-options fields this tool ever touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub master_weight: Option<u32>,
    pub low_threshold: Option<u32>,
    pub med_threshold: Option<u32>,
    pub high_threshold: Option<u32>,
    pub signer: Option<SignerWeight>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerWeight {
    pub address: String,
    pub weight: u32,
}

impl SetOptions {
    /// Zero the master weight and every threshold, and pin the account's own
    /// signer at weight zero. The account can never sign again.
    pub fn lock(address: &str) -> Self {
        Self {
            master_weight: Some(0),
            low_threshold: Some(0),
            med_threshold: Some(0),
            high_threshold: Some(0),
            signer: Some(SignerWeight {
                address: address.to_string(),
                weight: 0,
            }),
        }
    }
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateAccount { .. } => "create_account",
            Operation::ChangeTrust { .. } => "change_trust",
            Operation::Payment { .. } => "payment",
            Operation::SetOptions(_) => "set_options",
        }
    }

    fn to_xdr(&self) -> Result<xdr::Operation, MintError> {
        let body = match self {
            Operation::CreateAccount {
                destination,
                starting_balance,
            } => xdr::OperationBody::CreateAccount(xdr::CreateAccountOp {
                destination: account_id(destination)?,
                starting_balance: *starting_balance,
            }),
            Operation::ChangeTrust { asset, limit } => {
                xdr::OperationBody::ChangeTrust(xdr::ChangeTrustOp {
                    line: asset.to_change_trust_asset()?,
                    limit: *limit,
                })
            }
            Operation::Payment {
                destination,
                asset,
                amount,
            } => xdr::OperationBody::Payment(xdr::PaymentOp {
                destination: muxed_account(destination)?,
                asset: asset.to_xdr()?,
                amount: *amount,
            }),
            Operation::SetOptions(opts) => {
                let signer = match &opts.signer {
                    Some(signer) => Some(xdr::Signer {
                        key: xdr::SignerKey::Ed25519(xdr::Uint256(decode_address(
                            &signer.address,
                        )?)),
                        weight: signer.weight,
                    }),
                    None => None,
                };
                xdr::OperationBody::SetOptions(xdr::SetOptionsOp {
                    inflation_dest: None,
                    clear_flags: None,
                    set_flags: None,
                    master_weight: opts.master_weight,
                    low_threshold: opts.low_threshold,
                    med_threshold: opts.med_threshold,
                    high_threshold: opts.high_threshold,
                    home_domain: None,
                    signer,
                })
            }
        };

        Ok(xdr::Operation {
            source_account: None,
            body,
        })
    }
}

pub struct TransactionBuilder {
    source: String,
    sequence: i64,
    operation: Operation,
    base_fee: u32,
    memo: Option<String>,
}

impl TransactionBuilder {
    pub fn new(source: &Account, operation: Operation, base_fee: u32) -> Result<Self, MintError> {
        let sequence = source
            .sequence
            .checked_add(1)
            .ok_or(MintError::InvalidInput("account sequence number exhausted"))?;

        Ok(Self {
            source: source.address.clone(),
            sequence,
            operation,
            base_fee,
            memo: None,
        })
    }

    pub fn memo(mut self, memo: Option<String>) -> Self {
        self.memo = memo;
        self
    }

    fn build(&self) -> Result<xdr::Transaction, MintError> {
        check_memo(self.memo.as_deref())?;
        let memo = match &self.memo {
            Some(text) => xdr::Memo::Text(text.clone().try_into()?),
            None => xdr::Memo::None,
        };

        Ok(xdr::Transaction {
            source_account: muxed_account(&self.source)?,
            fee: self.base_fee,
            seq_num: xdr::SequenceNumber(self.sequence),
            cond: xdr::Preconditions::Time(xdr::TimeBounds {
                min_time: xdr::TimePoint(0),
                max_time: xdr::TimePoint(0),
            }),
            memo,
            operations: vec![self.operation.to_xdr()?].try_into()?,
            ext: xdr::TransactionExt::V0,
        })
    }

    /// Hash the transaction for `network_passphrase`, sign it, and encode the
    /// envelope for submission.
    pub fn sign(
        self,
        keypair: &Keypair,
        network_passphrase: &str,
    ) -> Result<SignedTransaction, MintError> {
        let tx = self.build()?;
        let hash = transaction_hash(&tx, network_passphrase)?;

        let signature = xdr::DecoratedSignature {
            hint: xdr::SignatureHint(keypair.signature_hint()),
            signature: xdr::Signature(keypair.sign(&hash).to_vec().try_into()?),
        };
        let envelope = xdr::TransactionEnvelope::Tx(xdr::TransactionV1Envelope {
            tx,
            signatures: vec![signature].try_into()?,
        });

        Ok(SignedTransaction {
            source: self.source,
            sequence: self.sequence,
            operation: self.operation,
            memo: self.memo,
            hash,
            envelope_xdr: envelope.to_xdr_base64(Limits::none())?,
        })
    }
}

/// A signed, encoded transaction ready for submission.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub source: String,
    pub sequence: i64,
    pub operation: Operation,
    pub memo: Option<String>,
    pub hash: [u8; 32],
    pub envelope_xdr: String,
}

impl SignedTransaction {
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// SHA-256 of the network passphrase.
pub fn network_id(network_passphrase: &str) -> [u8; 32] {
    sha256(network_passphrase.as_bytes())
}

fn transaction_hash(tx: &xdr::Transaction, network_passphrase: &str) -> Result<[u8; 32], MintError> {
    let payload = xdr::TransactionSignaturePayload {
        network_id: xdr::Hash(network_id(network_passphrase)),
        tagged_transaction: xdr::TransactionSignaturePayloadTaggedTransaction::Tx(tx.clone()),
    };
    Ok(sha256(&payload.to_xdr(Limits::none())?))
}

fn sha256(bytes: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(bytes);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

fn muxed_account(address: &str) -> Result<xdr::MuxedAccount, MintError> {
    Ok(xdr::MuxedAccount::Ed25519(xdr::Uint256(decode_address(address)?)))
}

fn account_id(address: &str) -> Result<xdr::AccountId, MintError> {
    Ok(xdr::AccountId(xdr::PublicKey::PublicKeyTypeEd25519(
        xdr::Uint256(decode_address(address)?),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TESTNET_PASSPHRASE;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};
    use stellar_xdr::curr::ReadXdr;

    fn payment(issuer: &Keypair, destination: &Keypair) -> Operation {
        Operation::Payment {
            destination: destination.address(),
            asset: Asset::new("GOLD", issuer.address()),
            amount: 1000,
        }
    }

    #[test]
    fn test_testnet_network_id() {
        assert_eq!(
            hex::encode(network_id(TESTNET_PASSPHRASE)),
            "cee0302d59844d32bdca915c8203dd44b33fbb7edc19051ea37abedf28ecd472"
        );
    }

    #[test]
    fn test_uses_next_sequence_number() {
        let issuer = Keypair::random();
        let source = Account::new(issuer.address(), 41);
        let signed = TransactionBuilder::new(&source, payment(&issuer, &Keypair::random()), 100)
            .unwrap()
            .sign(&issuer, TESTNET_PASSPHRASE)
            .unwrap();
        assert_eq!(signed.sequence, 42);

        let envelope =
            xdr::TransactionEnvelope::from_xdr_base64(&signed.envelope_xdr, Limits::none()).unwrap();
        let xdr::TransactionEnvelope::Tx(v1) = envelope else {
            panic!("expected a v1 envelope");
        };
        assert_eq!(v1.tx.seq_num, xdr::SequenceNumber(42));
        assert_eq!(v1.tx.operations.len(), 1);
        assert_eq!(v1.signatures.len(), 1);
        assert!(matches!(v1.tx.memo, xdr::Memo::None));
    }

    #[test]
    fn test_signature_covers_network_bound_hash() {
        let issuer = Keypair::random();
        let destination = Keypair::random();
        let source = Account::new(issuer.address(), 7);

        let build = |passphrase: &str| {
            TransactionBuilder::new(&source, payment(&issuer, &destination), 100)
                .unwrap()
                .sign(&issuer, passphrase)
                .unwrap()
        };
        let testnet = build(TESTNET_PASSPHRASE);
        let other = build("Some Other Network");

        assert_eq!(testnet.hash, build(TESTNET_PASSPHRASE).hash);
        assert_ne!(testnet.hash, other.hash);

        let envelope =
            xdr::TransactionEnvelope::from_xdr_base64(&testnet.envelope_xdr, Limits::none())
                .unwrap();
        let xdr::TransactionEnvelope::Tx(v1) = envelope else {
            panic!("expected a v1 envelope");
        };
        let decorated = &v1.signatures[0];
        assert_eq!(decorated.hint.0, issuer.signature_hint());

        let sig_bytes: [u8; 64] = decorated.signature.0.to_vec().try_into().unwrap();
        VerifyingKey::from_bytes(&issuer.public_key())
            .unwrap()
            .verify(&testnet.hash, &Signature::from_bytes(&sig_bytes))
            .unwrap();
    }

    #[test]
    fn test_memo_limit() {
        let issuer = Keypair::random();
        let source = Account::new(issuer.address(), 1);
        let long = TransactionBuilder::new(&source, payment(&issuer, &Keypair::random()), 100)
            .unwrap()
            .memo(Some("x".repeat(29)))
            .sign(&issuer, TESTNET_PASSPHRASE);
        assert!(matches!(long, Err(MintError::InvalidInput(_))));

        let ok = TransactionBuilder::new(&source, payment(&issuer, &Keypair::random()), 100)
            .unwrap()
            .memo(Some("Minting new asset".to_string()))
            .sign(&issuer, TESTNET_PASSPHRASE)
            .unwrap();
        assert_eq!(ok.memo.as_deref(), Some("Minting new asset"));
    }

    #[test]
    fn test_lock_options_encode_zero_weights() {
        let issuer = Keypair::random();
        let source = Account::new(issuer.address(), 3);
        let signed = TransactionBuilder::new(
            &source,
            Operation::SetOptions(SetOptions::lock(&issuer.address())),
            100,
        )
        .unwrap()
        .sign(&issuer, TESTNET_PASSPHRASE)
        .unwrap();

        let envelope =
            xdr::TransactionEnvelope::from_xdr_base64(&signed.envelope_xdr, Limits::none())
                .unwrap();
        let xdr::TransactionEnvelope::Tx(v1) = envelope else {
            panic!("expected a v1 envelope");
        };
        let xdr::OperationBody::SetOptions(op) = &v1.tx.operations[0].body else {
            panic!("expected set options");
        };
        assert_eq!(op.master_weight, Some(0));
        assert_eq!(op.low_threshold, Some(0));
        assert_eq!(op.med_threshold, Some(0));
        assert_eq!(op.high_threshold, Some(0));
        assert_eq!(op.signer.as_ref().map(|s| s.weight), Some(0));
    }

    #[test]
    fn test_bad_destination_rejected() {
        let issuer = Keypair::random();
        let source = Account::new(issuer.address(), 1);
        let op = Operation::Payment {
            destination: "GBAD".to_string(),
            asset: Asset::new("GOLD", issuer.address()),
            amount: 1,
        };
        let result = TransactionBuilder::new(&source, op, 100)
            .unwrap()
            .sign(&issuer, TESTNET_PASSPHRASE);
        assert!(matches!(result, Err(MintError::InvalidAddress { .. })));
    }
}
