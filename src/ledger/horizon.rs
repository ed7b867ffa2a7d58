//! Horizon REST client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::{Account, Balance, LedgerClient, SubmitResponse};
use crate::asset::Asset;
use crate::error::LedgerError;
use crate::transaction::SignedTransaction;

#[derive(Debug, Clone)]
pub struct HorizonClient {
    http: reqwest::Client,
    base_url: String,
}

impl HorizonClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AccountRecord {
    account_id: String,
    sequence: String,
    #[serde(default)]
    balances: Vec<BalanceRecord>,
}

#[derive(Debug, Deserialize)]
struct BalanceRecord {
    balance: String,
    asset_type: String,
    asset_code: Option<String>,
    asset_issuer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitRecord {
    hash: String,
    ledger: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct Problem {
    title: Option<String>,
    extras: Option<ProblemExtras>,
}

#[derive(Debug, Deserialize)]
struct ProblemExtras {
    result_codes: Option<ResultCodes>,
}

#[derive(Debug, Deserialize)]
struct ResultCodes {
    transaction: Option<String>,
    #[serde(default)]
    operations: Vec<String>,
}

impl TryFrom<AccountRecord> for Account {
    type Error = LedgerError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        let sequence = record.sequence.parse().map_err(|_| {
            LedgerError::Unexpected(format!("invalid sequence number {:?}", record.sequence))
        })?;

        let balances = record
            .balances
            .into_iter()
            .map(|b| {
                let asset = match (b.asset_type.as_str(), b.asset_code, b.asset_issuer) {
                    ("native", _, _) => None,
                    (_, Some(code), Some(issuer)) => Some(Asset::new(code, issuer)),
                    // Liquidity pool shares carry no code or issuer.
                    _ => None,
                };
                Balance {
                    asset,
                    amount: b.balance,
                }
            })
            .collect();

        Ok(Account {
            address: record.account_id,
            sequence,
            balances,
        })
    }
}

impl Problem {
    fn describe(&self) -> String {
        match self.extras.as_ref().and_then(|e| e.result_codes.as_ref()) {
            Some(codes) => {
                let tx = codes.transaction.as_deref().unwrap_or("unknown");
                if codes.operations.is_empty() {
                    tx.to_string()
                } else {
                    format!("{} [{}]", tx, codes.operations.join(", "))
                }
            }
            None => self
                .title
                .clone()
                .unwrap_or_else(|| "no result codes".to_string()),
        }
    }
}

#[async_trait]
impl LedgerClient for HorizonClient {
    async fn account_detail(&self, account_id: &str) -> Result<Account, LedgerError> {
        let url = format!("{}/accounts/{}", self.base_url, account_id);
        debug!(%url, "fetching account");

        let response = self.http.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(LedgerError::NotFound(account_id.to_string())),
            status if status.is_success() => response.json::<AccountRecord>().await?.try_into(),
            status => Err(LedgerError::Unexpected(format!(
                "account lookup returned {status}"
            ))),
        }
    }

    async fn submit_transaction(
        &self,
        tx: &SignedTransaction,
    ) -> Result<SubmitResponse, LedgerError> {
        let url = format!("{}/transactions", self.base_url);
        debug!(%url, hash = %tx.hash_hex(), "submitting transaction");

        let response = self
            .http
            .post(&url)
            .form(&[("tx", tx.envelope_xdr.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let record: SubmitRecord = response.json().await?;
            return Ok(SubmitResponse {
                hash: record.hash,
                ledger: record.ledger,
            });
        }

        let problem: Problem = response.json().await.unwrap_or_default();
        Err(LedgerError::Rejected {
            status: status.as_u16(),
            result_codes: problem.describe(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TESTNET_PASSPHRASE;
    use crate::crypto::Keypair;
    use crate::transaction::{Operation, TransactionBuilder};
    use httpmock::prelude::*;
    use serde_json::json;

    fn signed_payment() -> SignedTransaction {
        let issuer = Keypair::random();
        TransactionBuilder::new(
            &Account::new(issuer.address(), 1),
            Operation::Payment {
                destination: Keypair::random().address(),
                asset: Asset::new("GOLD", issuer.address()),
                amount: 10,
            },
            100,
        )
        .unwrap()
        .sign(&issuer, TESTNET_PASSPHRASE)
        .unwrap()
    }

    #[tokio::test]
    async fn test_account_detail_maps_balances() {
        let server = MockServer::start_async().await;
        let issuer = Keypair::random().address();
        let account = Keypair::random().address();

        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/accounts/{account}"));
                then.status(200).json_body(json!({
                    "id": account,
                    "account_id": account,
                    "sequence": "103720918407102567",
                    "balances": [
                        {
                            "balance": "1000.0000000",
                            "limit": "922337203685.4775807",
                            "asset_type": "credit_alphanum4",
                            "asset_code": "GOLD",
                            "asset_issuer": issuer
                        },
                        { "balance": "9999.9999900", "asset_type": "native" }
                    ]
                }));
            })
            .await;

        let client = HorizonClient::new(&format!("{}/", server.base_url()));
        let snapshot = client.account_detail(&account).await.unwrap();

        mock.assert_async().await;
        assert_eq!(snapshot.address, account);
        assert_eq!(snapshot.sequence, 103_720_918_407_102_567);
        assert_eq!(snapshot.balances.len(), 2);
        assert!(snapshot.trusts(&Asset::new("GOLD", issuer.as_str())));
        assert_eq!(snapshot.balances[1].asset, None);
    }

    #[tokio::test]
    async fn test_missing_account_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/accounts/GMISSING");
                then.status(404).json_body(json!({ "status": 404, "title": "Resource Missing" }));
            })
            .await;

        let client = HorizonClient::new(&server.base_url());
        let err = client.account_detail("GMISSING").await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(id) if id == "GMISSING"));
    }

    #[tokio::test]
    async fn test_submit_posts_envelope() {
        let server = MockServer::start_async().await;
        let tx = signed_payment();
        let hash = tx.hash_hex();

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/transactions")
                    .x_www_form_urlencoded_tuple("tx", tx.envelope_xdr.as_str());
                then.status(200)
                    .json_body(json!({ "hash": hash, "ledger": 42, "successful": true }));
            })
            .await;

        let client = HorizonClient::new(&server.base_url());
        let response = client.submit_transaction(&tx).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.hash, tx.hash_hex());
        assert_eq!(response.ledger, Some(42));
    }

    #[tokio::test]
    async fn test_submit_failure_reports_result_codes() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/transactions");
                then.status(400).json_body(json!({
                    "title": "Transaction Failed",
                    "status": 400,
                    "extras": {
                        "result_codes": {
                            "transaction": "tx_failed",
                            "operations": ["op_no_trust"]
                        }
                    }
                }));
            })
            .await;

        let client = HorizonClient::new(&server.base_url());
        let err = client.submit_transaction(&signed_payment()).await.unwrap_err();
        match err {
            LedgerError::Rejected {
                status,
                result_codes,
            } => {
                assert_eq!(status, 400);
                assert_eq!(result_codes, "tx_failed [op_no_trust]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
