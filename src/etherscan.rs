use async_trait::async_trait;
use ethers_core::types::Address;
use serde::Deserialize;
use tracing::debug;

use crate::errors::EtherscanError;
use crate::types::ContractMetadata;

const DEFAULT_BASE_URL: &str = "https://api.etherscan.io/api";

/// The exact ABI payload Etherscan serves for contracts without verified
/// source. Recognized and turned into the distinguished
/// [`EtherscanError::NotVerified`].
const NOT_VERIFIED_SENTINEL: &str = "Contract source code not verified";

/// Verified-source and bare-ABI lookups for an address.
#[async_trait]
pub trait MetadataSource {
    /// Fetches verified source, name and ABI.
    ///
    /// `Ok(None)` means the provider answered but not with an "OK" message;
    /// the signal is ambiguous (unknown address or throttling) and callers
    /// cannot tell which. [`EtherscanError::NotVerified`] is recoverable,
    /// everything else is fatal.
    async fn get_source_code(
        &self,
        address: Address,
    ) -> Result<Option<ContractMetadata>, EtherscanError>;

    /// Fetches only the ABI, with the same not-OK convention.
    async fn get_abi(&self, address: Address) -> Result<Option<Vec<u8>>, EtherscanError>;
}

#[derive(Debug, Deserialize)]
struct Envelope {
    message: String,
    // `result` is an array of records on success but a bare string on
    // throttled/not-OK answers, so it is decoded in a second step.
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SourceCodeRecord {
    source_code: String,
    constructor_arguments: String,
    contract_name: String,
    #[serde(rename = "ABI")]
    abi: String,
}

/// [`MetadataSource`] backed by the Etherscan HTTP API.
#[derive(Clone, Debug)]
pub struct EtherscanClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EtherscanClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn query(&self, action: &str, address: Address) -> Result<Envelope, EtherscanError> {
        let address = format!("{:?}", address);
        let envelope = self
            .http
            .get(&self.base_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("module", "contract"),
                ("action", action),
                ("address", address.as_str()),
            ])
            .send()
            .await?
            .json::<Envelope>()
            .await?;
        debug!("etherscan {} for {}: {}", action, address, envelope.message);
        Ok(envelope)
    }
}

fn source_from_envelope(
    envelope: Envelope,
) -> Result<Option<ContractMetadata>, EtherscanError> {
    if envelope.message != "OK" {
        return Ok(None);
    }

    let records: Vec<SourceCodeRecord> = serde_json::from_value(envelope.result)?;
    if records.len() > 1 {
        return Err(EtherscanError::AmbiguousResult);
    }
    let Some(record) = records.into_iter().next() else {
        return Ok(None);
    };

    if record.abi == NOT_VERIFIED_SENTINEL {
        return Err(EtherscanError::NotVerified);
    }

    let constructor_args = hex::decode(&record.constructor_arguments)?;

    Ok(Some(ContractMetadata {
        source_code: record.source_code,
        constructor_args,
        contract_name: record.contract_name,
        abi: record.abi.into_bytes(),
    }))
}

fn abi_from_envelope(envelope: Envelope) -> Result<Option<Vec<u8>>, EtherscanError> {
    if envelope.message != "OK" {
        return Ok(None);
    }
    let abi: String = serde_json::from_value(envelope.result)?;
    Ok(Some(abi.into_bytes()))
}

#[async_trait]
impl MetadataSource for EtherscanClient {
    async fn get_source_code(
        &self,
        address: Address,
    ) -> Result<Option<ContractMetadata>, EtherscanError> {
        source_from_envelope(self.query("getsourcecode", address).await?)
    }

    async fn get_abi(&self, address: Address) -> Result<Option<Vec<u8>>, EtherscanError> {
        abi_from_envelope(self.query("getabi", address).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> Envelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_source_ok() {
        let env = envelope(
            r#"{
                "status": "1",
                "message": "OK",
                "result": [{
                    "SourceCode": "contract Box {}",
                    "ConstructorArguments": "deadbeef",
                    "ContractName": "Box",
                    "ABI": "[]"
                }]
            }"#,
        );
        let meta = source_from_envelope(env).unwrap().unwrap();
        assert_eq!(meta.contract_name, "Box");
        assert_eq!(meta.source_code, "contract Box {}");
        assert_eq!(meta.constructor_args, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(meta.abi, b"[]");
    }

    #[test]
    fn test_source_not_ok_is_absent() {
        // Throttled answers carry a string result, which must not break
        // envelope decoding.
        let env = envelope(
            r#"{"status": "0", "message": "NOTOK", "result": "Max rate limit reached"}"#,
        );
        assert!(source_from_envelope(env).unwrap().is_none());
    }

    #[test]
    fn test_source_not_verified() {
        let env = envelope(
            r#"{
                "status": "1",
                "message": "OK",
                "result": [{
                    "SourceCode": "",
                    "ConstructorArguments": "",
                    "ContractName": "",
                    "ABI": "Contract source code not verified"
                }]
            }"#,
        );
        assert!(matches!(
            source_from_envelope(env),
            Err(EtherscanError::NotVerified)
        ));
    }

    #[test]
    fn test_source_ambiguous() {
        let record = r#"{
            "SourceCode": "",
            "ConstructorArguments": "",
            "ContractName": "A",
            "ABI": "[]"
        }"#;
        let env = envelope(&format!(
            r#"{{"status": "1", "message": "OK", "result": [{record}, {record}]}}"#
        ));
        assert!(matches!(
            source_from_envelope(env),
            Err(EtherscanError::AmbiguousResult)
        ));
    }

    #[test]
    fn test_source_bad_constructor_args() {
        let env = envelope(
            r#"{
                "status": "1",
                "message": "OK",
                "result": [{
                    "SourceCode": "",
                    "ConstructorArguments": "zzzz",
                    "ContractName": "A",
                    "ABI": "[]"
                }]
            }"#,
        );
        assert!(matches!(
            source_from_envelope(env),
            Err(EtherscanError::ConstructorArgs(_))
        ));
    }

    #[test]
    fn test_abi_ok_and_absent() {
        let env = envelope(r#"{"status": "1", "message": "OK", "result": "[]"}"#);
        assert_eq!(abi_from_envelope(env).unwrap(), Some(b"[]".to_vec()));

        let env = envelope(
            r#"{"status": "0", "message": "NOTOK", "result": "Contract source code not verified"}"#,
        );
        assert!(abi_from_envelope(env).unwrap().is_none());
    }
}
