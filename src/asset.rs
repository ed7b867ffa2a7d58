use std::fmt;
use std::str::FromStr;

use stellar_xdr::curr::{
    AccountId, AlphaNum12, AlphaNum4, Asset as XdrAsset, AssetCode12, AssetCode4,
    ChangeTrustAsset, PublicKey as XdrPublicKey, Uint256,
};

use crate::crypto::decode_address;
use crate::error::MintError;

/// An issued (non-native) asset, identified by its code and issuer address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asset {
    pub code: String,
    pub issuer: String,
}

impl Asset {
    pub fn new(code: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            issuer: issuer.into(),
        }
    }

    /// Checks the code and issuer without touching the network.
    pub fn validate(&self) -> Result<(), MintError> {
        self.to_xdr().map(|_| ())
    }

    pub fn to_xdr(&self) -> Result<XdrAsset, MintError> {
        if !self.code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(self.unsupported("code must be ASCII alphanumeric"));
        }
        let issuer = self.issuer_account_id()?;
        let code = self.code.as_bytes();
        match code.len() {
            1..=4 => {
                let mut buf = [0u8; 4];
                buf[..code.len()].copy_from_slice(code);
                Ok(XdrAsset::CreditAlphanum4(AlphaNum4 {
                    asset_code: AssetCode4(buf),
                    issuer,
                }))
            }
            5..=12 => {
                let mut buf = [0u8; 12];
                buf[..code.len()].copy_from_slice(code);
                Ok(XdrAsset::CreditAlphanum12(AlphaNum12 {
                    asset_code: AssetCode12(buf),
                    issuer,
                }))
            }
            _ => Err(self.unsupported("code must be 1-12 characters")),
        }
    }

    /// The trust-line form of this asset, used by change-trust operations.
    pub fn to_change_trust_asset(&self) -> Result<ChangeTrustAsset, MintError> {
        match self.to_xdr()? {
            XdrAsset::CreditAlphanum4(a) => Ok(ChangeTrustAsset::CreditAlphanum4(a)),
            XdrAsset::CreditAlphanum12(a) => Ok(ChangeTrustAsset::CreditAlphanum12(a)),
            XdrAsset::Native => Err(self.unsupported("native asset cannot be trusted")),
        }
    }

    fn issuer_account_id(&self) -> Result<AccountId, MintError> {
        let key = decode_address(&self.issuer)
            .map_err(|_| self.unsupported("issuer is not a valid account address"))?;
        Ok(AccountId(XdrPublicKey::PublicKeyTypeEd25519(Uint256(key))))
    }

    fn unsupported(&self, reason: &'static str) -> MintError {
        MintError::UnsupportedAsset {
            code: self.code.clone(),
            reason,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.code, self.issuer)
    }
}

impl FromStr for Asset {
    type Err = MintError;

    /// Parses `CODE:ISSUER`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, issuer) = s
            .split_once(':')
            .ok_or(MintError::InvalidInput("asset must be given as CODE:ISSUER"))?;
        let asset = Asset::new(code.trim(), issuer.trim());
        asset.validate()?;
        Ok(asset)
    }
}
