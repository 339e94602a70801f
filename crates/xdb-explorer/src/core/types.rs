//! Core domain types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

use super::error::{ExplorerError, ExplorerResult, FetchError};
use crate::address::AccountId;

/// Asset type reported by Horizon for the network's own asset
pub const NATIVE_ASSET_TYPE: &str = "native";

/// Account state as returned by `/accounts/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAccountSnapshot")]
pub struct AccountSnapshot {
    pub account_id: String,
    pub sequence: u64,
    pub subentry_count: u32,
    pub balances: Vec<Balance>,
    pub flags: BTreeMap<String, bool>,
    pub signers: Vec<Signer>,
}

/// Wire shape of the snapshot. Horizon sends both `id` and `account_id`.
#[derive(Deserialize)]
struct RawAccountSnapshot {
    account_id: Option<String>,
    id: Option<String>,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    sequence: u64,
    #[serde(default)]
    subentry_count: u32,
    #[serde(default)]
    balances: Vec<Balance>,
    #[serde(default)]
    flags: BTreeMap<String, bool>,
    #[serde(default)]
    signers: Vec<Signer>,
}

impl TryFrom<RawAccountSnapshot> for AccountSnapshot {
    type Error = String;

    fn try_from(raw: RawAccountSnapshot) -> Result<Self, Self::Error> {
        let account_id = raw
            .account_id
            .or(raw.id)
            .ok_or_else(|| "account snapshot has neither `account_id` nor `id`".to_string())?;

        Ok(Self {
            account_id,
            sequence: raw.sequence,
            subentry_count: raw.subentry_count,
            balances: raw.balances,
            flags: raw.flags,
            signers: raw.signers,
        })
    }
}

impl AccountSnapshot {
    pub fn native_balance(&self) -> Option<&Balance> {
        self.balances.iter().find(|b| b.is_native())
    }

    /// Names of the flags currently set, in name order
    pub fn enabled_flags(&self) -> Vec<&str> {
        self.flags
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub asset_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_issuer: Option<String>,
    /// Decimal amount exactly as sent by the server
    pub balance: String,
}

impl Balance {
    pub fn is_native(&self) -> bool {
        self.asset_type == NATIVE_ASSET_TYPE
    }

    pub fn asset_label<'a>(&'a self, native_code: &'a str) -> &'a str {
        if self.is_native() {
            return native_code;
        }
        self.asset_code.as_deref().unwrap_or(&self.asset_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub key: String,
    #[serde(default)]
    pub weight: u32,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// One element of a collection (transaction, payment, offer, effect, asset).
///
/// Kept as the raw JSON object; fields are only interpreted at render time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerRecord(Map<String, Value>);

impl LedgerRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Integer field; Horizon encodes large integers as strings
    pub fn get_u64(&self, field: &str) -> Option<u64> {
        match self.get(field)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// The record's `type` discriminator, if any
    pub fn kind(&self) -> Option<&str> {
        self.get_str("type")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for LedgerRecord {
    type Error = FetchError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(FetchError::decode(format!("expected record object, got {other}"))),
        }
    }
}

/// One page of a collection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub records: Vec<LedgerRecord>,
    /// Cursor naming the next page; `None` on the last page
    pub next: Option<Url>,
}

/// Account-scoped collections tracked by a lookup, in fetch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Transactions,
    Payments,
    Offers,
    Effects,
    Assets,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Transactions,
        ResourceKind::Payments,
        ResourceKind::Offers,
        ResourceKind::Effects,
        ResourceKind::Assets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Transactions => "transactions",
            ResourceKind::Payments => "payments",
            ResourceKind::Offers => "offers",
            ResourceKind::Effects => "effects",
            ResourceKind::Assets => "assets",
        }
    }

    /// Request path relative to the API base
    pub fn path(&self, account: &AccountId) -> String {
        match self {
            ResourceKind::Assets => "/assets".to_string(),
            other => format!("/accounts/{}/{}", account, other.as_str()),
        }
    }

    /// Query parameters scoping the collection to `account`, if the path does not
    pub fn scope_query(&self, account: &AccountId) -> Vec<(&'static str, String)> {
        match self {
            ResourceKind::Assets => vec![("asset_issuer", account.to_string())],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown resource '{}', expected one of: transactions, payments, offers, effects, assets",
                    s
                )
            })
    }
}

/// Outcome of collecting one resource, independent of every other resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CollectionResult {
    Loaded { records: Vec<LedgerRecord> },
    Failed { error: FetchError },
}

impl CollectionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CollectionResult::Loaded { .. })
    }

    pub fn records(&self) -> Option<&[LedgerRecord]> {
        match self {
            CollectionResult::Loaded { records } => Some(records),
            CollectionResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            CollectionResult::Failed { error } => Some(error),
            CollectionResult::Loaded { .. } => None,
        }
    }
}

impl From<Result<Vec<LedgerRecord>, FetchError>> for CollectionResult {
    fn from(result: Result<Vec<LedgerRecord>, FetchError>) -> Self {
        match result {
            Ok(records) => CollectionResult::Loaded { records },
            Err(error) => CollectionResult::Failed { error },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccountState {
    Found(AccountSnapshot),
    NotFound,
}

/// Everything one lookup produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub address: AccountId,
    pub account: AccountState,
    /// Empty when the account was not found
    pub collections: BTreeMap<ResourceKind, CollectionResult>,
}

impl AggregateResult {
    pub fn not_found(address: AccountId) -> Self {
        Self {
            address,
            account: AccountState::NotFound,
            collections: BTreeMap::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.account, AccountState::NotFound)
    }

    pub fn account(&self) -> Option<&AccountSnapshot> {
        match &self.account {
            AccountState::Found(snapshot) => Some(snapshot),
            AccountState::NotFound => None,
        }
    }

    /// The snapshot, or `AccountNotFound` for callers treating absence as an error
    pub fn require_account(&self) -> ExplorerResult<&AccountSnapshot> {
        self.account().ok_or_else(|| ExplorerError::AccountNotFound {
            address: self.address.to_string(),
        })
    }

    pub fn collection(&self, kind: ResourceKind) -> Option<&CollectionResult> {
        self.collections.get(&kind)
    }

    pub fn failed_resources(&self) -> Vec<ResourceKind> {
        self.collections
            .iter()
            .filter(|(_, result)| !result.is_success())
            .map(|(kind, _)| *kind)
            .collect()
    }
}

fn u64_from_str_or_num<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StrOrNum {
        Str(String),
        Num(u64),
    }

    match StrOrNum::deserialize(deserializer)? {
        StrOrNum::Num(n) => Ok(n),
        StrOrNum::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADDRESS: &str = "GAIH3ULLFQ4DGSECF2AR555KZ4KNDGEKN4AFI4SU2M7B43MGK3QJZNSR";

    #[test]
    fn test_snapshot_from_horizon_shape() {
        let snapshot: AccountSnapshot = serde_json::from_value(json!({
            "id": ADDRESS,
            "account_id": ADDRESS,
            "sequence": "123456789012",
            "subentry_count": 2,
            "balances": [
                { "balance": "10.5000000", "asset_type": "credit_alphanum4", "asset_code": "USD", "asset_issuer": "GISSUER" },
                { "balance": "250.0000000", "asset_type": "native" }
            ],
            "flags": { "auth_required": false, "auth_revocable": true, "auth_immutable": false },
            "signers": [{ "key": ADDRESS, "weight": 1, "type": "ed25519_public_key" }]
        }))
        .unwrap();

        assert_eq!(snapshot.account_id, ADDRESS);
        assert_eq!(snapshot.sequence, 123456789012);
        assert_eq!(snapshot.subentry_count, 2);
        assert_eq!(snapshot.native_balance().unwrap().balance, "250.0000000");
        assert_eq!(snapshot.enabled_flags(), vec!["auth_revocable"]);
        assert_eq!(snapshot.signers[0].kind, "ed25519_public_key");
    }

    #[test]
    fn test_snapshot_accepts_id_only_and_numeric_sequence() {
        let snapshot: AccountSnapshot =
            serde_json::from_value(json!({ "id": ADDRESS, "sequence": 7 })).unwrap();

        assert_eq!(snapshot.account_id, ADDRESS);
        assert_eq!(snapshot.sequence, 7);
        assert!(snapshot.balances.is_empty());
        assert!(snapshot.enabled_flags().is_empty());
    }

    #[test]
    fn test_snapshot_without_identifier_is_rejected() {
        let result = serde_json::from_value::<AccountSnapshot>(json!({ "sequence": "1" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_balance_labels() {
        let native = Balance {
            asset_type: "native".to_string(),
            asset_code: None,
            asset_issuer: None,
            balance: "1.0000000".to_string(),
        };
        let pool = Balance {
            asset_type: "liquidity_pool_shares".to_string(),
            asset_code: None,
            asset_issuer: None,
            balance: "3.0000000".to_string(),
        };
        assert_eq!(native.asset_label("XDB"), "XDB");
        assert_eq!(pool.asset_label("XDB"), "liquidity_pool_shares");
    }

    #[test]
    fn test_record_accessors() {
        let record = LedgerRecord::try_from(json!({
            "type": "payment",
            "fee_charged": "100",
            "ledger": 42,
            "successful": true,
            "memo": null
        }))
        .unwrap();

        assert_eq!(record.kind(), Some("payment"));
        assert_eq!(record.get_u64("fee_charged"), Some(100));
        assert_eq!(record.get_u64("ledger"), Some(42));
        assert_eq!(record.get_bool("successful"), Some(true));
        assert!(record.get("memo").is_none());
        assert!(LedgerRecord::try_from(json!([1, 2])).is_err());
    }

    #[test]
    fn test_resource_paths() {
        let account = AccountId::parse(ADDRESS).unwrap();
        assert_eq!(
            ResourceKind::Offers.path(&account),
            format!("/accounts/{ADDRESS}/offers")
        );
        assert_eq!(ResourceKind::Assets.path(&account), "/assets");
        assert_eq!(
            ResourceKind::Assets.scope_query(&account),
            vec![("asset_issuer", ADDRESS.to_string())]
        );
        assert!(ResourceKind::Effects.scope_query(&account).is_empty());
    }

    #[test]
    fn test_resource_kind_parsing() {
        assert_eq!("Payments".parse::<ResourceKind>(), Ok(ResourceKind::Payments));
        assert!("ledgers".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_not_found_aggregate() {
        let result = AggregateResult::not_found(AccountId::parse(ADDRESS).unwrap());
        assert!(result.is_not_found());
        assert!(result.collections.is_empty());
        assert_eq!(
            result.require_account(),
            Err(ExplorerError::AccountNotFound { address: ADDRESS.to_string() })
        );
    }
}
