// Core ledger data structures consumed by the filters.
// Transactions arrive already decoded; only fields the filters read are modeled.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset referenced by an operation.
/// Canonical form is "native" or "CODE:ISSUER", which is also the serde form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Asset {
    Native,
    Credit { code: String, issuer: String },
}

impl Asset {
    pub fn credit(code: &str, issuer: &str) -> Self {
        Asset::Credit {
            code: code.to_string(),
            issuer: issuer.to_string(),
        }
    }

    /// Canonical string used for whitelist lookups
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Issuing account, if any (native has none)
    pub fn issuer(&self) -> Option<&str> {
        match self {
            Asset::Native => None,
            Asset::Credit { issuer, .. } => Some(issuer),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Credit { code, issuer } => write!(f, "{}:{}", code, issuer),
        }
    }
}

impl FromStr for Asset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "native" {
            return Ok(Asset::Native);
        }
        match s.split_once(':') {
            Some((code, issuer)) if !code.is_empty() && !issuer.is_empty() => {
                Ok(Asset::credit(code, issuer))
            }
            _ => Err(format!("invalid asset '{}': expected 'native' or 'CODE:ISSUER'", s)),
        }
    }
}

impl TryFrom<String> for Asset {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Asset> for String {
    fn from(asset: Asset) -> Self {
        asset.canonical()
    }
}

/// Operation payload. Only account and asset references are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationBody {
    CreateAccount {
        destination: String,
    },
    Payment {
        destination: String,
        asset: Asset,
    },
    PathPayment {
        destination: String,
        send_asset: Asset,
        dest_asset: Asset,
        #[serde(default)]
        path: Vec<Asset>,
    },
    ManageOffer {
        selling: Asset,
        buying: Asset,
    },
    ChangeTrust {
        line: Asset,
    },
    AllowTrust {
        trustor: String,
        asset: Asset,
    },
    AccountMerge {
        destination: String,
    },
    SetOptions {
        #[serde(default)]
        signer: Option<String>,
    },
    BumpSequence,
    ManageData {
        name: String,
    },
}

impl OperationBody {
    /// Assets this operation touches, in declaration order
    pub fn assets(&self) -> Vec<&Asset> {
        match self {
            OperationBody::Payment { asset, .. } | OperationBody::AllowTrust { asset, .. } => {
                vec![asset]
            }
            OperationBody::PathPayment {
                send_asset,
                dest_asset,
                path,
                ..
            } => {
                let mut assets = vec![send_asset, dest_asset];
                assets.extend(path.iter());
                assets
            }
            OperationBody::ManageOffer { selling, buying } => vec![selling, buying],
            OperationBody::ChangeTrust { line } => vec![line],
            OperationBody::CreateAccount { .. }
            | OperationBody::AccountMerge { .. }
            | OperationBody::SetOptions { .. }
            | OperationBody::BumpSequence
            | OperationBody::ManageData { .. } => Vec::new(),
        }
    }
}

/// A single operation; `source_account` overrides the transaction source when set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub source_account: Option<String>,
    #[serde(flatten)]
    pub body: OperationBody,
}

impl Operation {
    pub fn new(body: OperationBody) -> Self {
        Self {
            source_account: None,
            body,
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source_account = Some(source.to_string());
        self
    }
}

/// Decoded ledger transaction as handed to the filter stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub hash: String,
    pub ledger_sequence: u32,
    pub source_account: String,
    /// Fee-bump payer, when different from the inner source
    #[serde(default)]
    pub fee_account: Option<String>,
    #[serde(default = "default_true")]
    pub successful: bool,
    pub operations: Vec<Operation>,
}

fn default_true() -> bool { true }

impl LedgerTransaction {
    pub fn new(hash: &str, ledger_sequence: u32, source_account: &str) -> Self {
        Self {
            hash: hash.to_string(),
            ledger_sequence,
            source_account: source_account.to_string(),
            fee_account: None,
            successful: true,
            operations: Vec::new(),
        }
    }

    pub fn with_operation(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    pub fn with_fee_account(mut self, fee_account: &str) -> Self {
        self.fee_account = Some(fee_account.to_string());
        self
    }
}

/// A participant account of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Participant {
    address: String,
}

impl Participant {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
        }
    }

    /// Canonical account identifier
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}
