//! Terminal rendering of lookup results

use chrono::{DateTime, Utc};

use crate::core::{
    AccountSnapshot, AccountState, AggregateResult, CollectionResult, LedgerRecord, Page, ResourceKind,
};

/// Stroops per unit of the native asset
pub const STROOPS_PER_UNIT: u64 = 10_000_000;

/// Digits after the decimal point in ledger amounts
pub const AMOUNT_DECIMALS: usize = 7;

const NOT_AVAILABLE: &str = "N/A";

/// Pad or cut a decimal amount string to exactly seven fractional digits.
///
/// Anything that is not a plain decimal is returned unchanged.
pub fn format_amount(amount: &str) -> String {
    let amount = amount.trim();
    let (int_part, frac_part) = amount.split_once('.').unwrap_or((amount, ""));
    let digits = int_part.strip_prefix('-').unwrap_or(int_part);

    let well_formed = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && frac_part.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return amount.to_string();
    }

    let mut frac: String = frac_part.chars().take(AMOUNT_DECIMALS).collect();
    while frac.len() < AMOUNT_DECIMALS {
        frac.push('0');
    }
    format!("{int_part}.{frac}")
}

/// Native-asset amount for a stroop count, e.g. `100` -> `0.0000100`
pub fn format_stroops(stroops: u64) -> String {
    format!(
        "{}.{:0width$}",
        stroops / STROOPS_PER_UNIT,
        stroops % STROOPS_PER_UNIT,
        width = AMOUNT_DECIMALS
    )
}

/// RFC 3339 timestamp as UTC wall-clock time; unparsable input is returned as is
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub struct Renderer {
    native_code: String,
}

impl Renderer {
    pub fn new(native_code: impl Into<String>) -> Self {
        Self {
            native_code: native_code.into(),
        }
    }

    /// Full text report of a lookup
    pub fn aggregate(&self, result: &AggregateResult) -> String {
        let snapshot = match &result.account {
            AccountState::Found(snapshot) => snapshot,
            AccountState::NotFound => {
                return format!("Wallet not found or not activated: {}\n", result.address);
            }
        };

        let mut out = self.account(snapshot);
        for (kind, collection) in &result.collections {
            out.push('\n');
            out.push_str(&self.collection(*kind, collection));
        }
        out
    }

    pub fn account(&self, snapshot: &AccountSnapshot) -> String {
        let native = snapshot
            .native_balance()
            .map(|b| format_amount(&b.balance))
            .unwrap_or_else(|| format_stroops(0));
        let flags = snapshot.enabled_flags();
        let flags = if flags.is_empty() {
            "None".to_string()
        } else {
            flags.join(", ")
        };

        let mut lines = vec![
            "== Wallet ==".to_string(),
            field("Account ID", &snapshot.account_id),
            field(&format!("{} Balance", self.native_code), &format!("{} {}", native, self.native_code)),
            field("Sequence", &snapshot.sequence.to_string()),
            field("Subentry Count", &snapshot.subentry_count.to_string()),
            field("Signers", &snapshot.signers.len().to_string()),
            field("Flags", &flags),
        ];

        let others: Vec<_> = snapshot.balances.iter().filter(|b| !b.is_native()).collect();
        if !others.is_empty() {
            lines.push("  Other balances:".to_string());
            for balance in others {
                lines.push(format!(
                    "    {} {}",
                    format_amount(&balance.balance),
                    balance.asset_label(&self.native_code)
                ));
            }
        }

        lines.join("\n") + "\n"
    }

    pub fn collection(&self, kind: ResourceKind, result: &CollectionResult) -> String {
        let header = format!("== {} ==\n", title(kind));
        match result {
            CollectionResult::Failed { error } => format!("{header}Error loading {kind}: {error}\n"),
            CollectionResult::Loaded { records } => format!("{header}{}", self.records(kind, records)),
        }
    }

    /// One page of a collection, with its continuation cursor
    pub fn page(&self, kind: ResourceKind, page: &Page) -> String {
        let mut out = format!("== {} ==\n{}", title(kind), self.records(kind, &page.records));
        if let Some(next) = &page.next {
            out.push_str(&format!("Next page: {next}\n"));
        }
        out
    }

    fn records(&self, kind: ResourceKind, records: &[LedgerRecord]) -> String {
        if records.is_empty() {
            return format!("No {kind} found\n");
        }
        records
            .iter()
            .map(|record| self.record(kind, record))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn record(&self, kind: ResourceKind, record: &LedgerRecord) -> String {
        let lines = match kind {
            ResourceKind::Transactions => self.transaction(record),
            ResourceKind::Payments => self.payment(record),
            ResourceKind::Offers => self.offer(record),
            ResourceKind::Effects => self.effect(record),
            ResourceKind::Assets => self.asset(record),
        };
        lines.join("\n") + "\n"
    }

    fn transaction(&self, tx: &LedgerRecord) -> Vec<String> {
        let fee = tx
            .get_u64("fee_charged")
            .or_else(|| tx.get_u64("max_fee"))
            .unwrap_or(0);
        let successful = match tx.get_bool("successful") {
            Some(true) => "Yes",
            Some(false) => "No",
            None => NOT_AVAILABLE,
        };

        vec![
            heading("transaction", tx.get_str("created_at")),
            field("Hash", text(tx, "hash")),
            field("Ledger", &number(tx, "ledger")),
            field("Source Account", text(tx, "source_account")),
            field("Fee", &format!("{} {}", format_stroops(fee), self.native_code)),
            field("Operation Count", &number(tx, "operation_count")),
            field("Successful", successful),
        ]
    }

    fn payment(&self, payment: &LedgerRecord) -> Vec<String> {
        let amount = payment.get_str("amount").map(format_amount).unwrap_or_else(|| "0".to_string());

        vec![
            heading(payment.kind().unwrap_or("payment"), payment.get_str("created_at")),
            field("From", text(payment, "from")),
            field("To", text(payment, "to")),
            field("Amount", &format!("{} {}", amount, self.asset_code(payment, ""))),
            field("Transaction Hash", text(payment, "transaction_hash")),
        ]
    }

    fn offer(&self, offer: &LedgerRecord) -> Vec<String> {
        let id = offer
            .get_str("id")
            .map(str::to_string)
            .unwrap_or_else(|| number(offer, "id"));
        let amount = offer.get_str("amount").map(format_amount).unwrap_or_else(|| "0".to_string());
        let selling = self.nested_asset_code(offer, "selling");
        let buying = self.nested_asset_code(offer, "buying");

        vec![
            heading(&format!("offer #{id}"), offer.get_str("last_modified_time")),
            field("Seller", text(offer, "seller")),
            field("Selling", &format!("{amount} {selling}")),
            field("Buying", &buying),
            field("Price", text(offer, "price")),
        ]
    }

    fn effect(&self, effect: &LedgerRecord) -> Vec<String> {
        let mut lines = vec![
            heading(effect.kind().unwrap_or("effect"), effect.get_str("created_at")),
            field("Account", text(effect, "account")),
            field("Type ID", &number(effect, "type_i")),
        ];
        if let Some(amount) = effect.get_str("amount") {
            lines.push(field(
                "Amount",
                &format!("{} {}", format_amount(amount), self.asset_code(effect, "")),
            ));
        }
        lines.push(field("Transaction Hash", text(effect, "transaction_hash")));
        lines
    }

    fn asset(&self, asset: &LedgerRecord) -> Vec<String> {
        let amount = asset
            .get_str("amount")
            .or_else(|| {
                asset
                    .get("balances")
                    .and_then(|b| b.get("authorized"))
                    .and_then(|v| v.as_str())
            })
            .map(format_amount)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let accounts = asset
            .get_u64("num_accounts")
            .or_else(|| {
                asset
                    .get("accounts")
                    .and_then(|a| a.get("authorized"))
                    .and_then(|v| v.as_u64())
            })
            .map(|n| n.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        vec![
            heading(text(asset, "asset_code"), None),
            field("Issuer", text(asset, "asset_issuer")),
            field("Amount", &amount),
            field("Accounts", &accounts),
        ]
    }

    /// `<prefix>asset_code`, or the native code for native/unspecified assets
    fn asset_code(&self, record: &LedgerRecord, prefix: &str) -> String {
        record
            .get_str(&format!("{prefix}asset_code"))
            .unwrap_or(&self.native_code)
            .to_string()
    }

    /// Asset code inside a nested asset object such as an offer's `selling`
    fn nested_asset_code(&self, record: &LedgerRecord, field: &str) -> String {
        record
            .get(field)
            .and_then(|asset| asset.get("asset_code"))
            .and_then(|code| code.as_str())
            .unwrap_or(&self.native_code)
            .to_string()
    }
}

fn title(kind: ResourceKind) -> String {
    let name = kind.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn heading(label: &str, timestamp: Option<&str>) -> String {
    match timestamp {
        Some(ts) => format!("[{}] {}", label, format_timestamp(ts)),
        None => format!("[{label}]"),
    }
}

fn field(label: &str, value: &str) -> String {
    format!("  {:<18}{}", format!("{label}:"), value)
}

fn text<'a>(record: &'a LedgerRecord, name: &str) -> &'a str {
    record.get_str(name).unwrap_or(NOT_AVAILABLE)
}

fn number(record: &LedgerRecord, name: &str) -> String {
    record
        .get_u64(name)
        .map(|n| n.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
