//! Participant extraction
//!
//! Given a decoded transaction, produce the accounts it touches: sources,
//! fee payer, destinations, trustors, issuers and signers. Filters depend only
//! on the `ParticipantExtractor` trait; `OperationParticipants` is the default.

use crate::error::ExtractionError;
use crate::types::{LedgerTransaction, OperationBody, Participant};
use std::collections::HashSet;

/// Source of participant accounts for a transaction
pub trait ParticipantExtractor: Send + Sync {
    /// `sequence` is the ledger sequence being ingested (0 when unknown)
    fn participants_for_transaction(
        &self,
        sequence: u32,
        transaction: &LedgerTransaction,
    ) -> Result<Vec<Participant>, ExtractionError>;
}

/// Walks the transaction envelope and every operation body.
#[derive(Debug, Default, Clone, Copy)]
pub struct OperationParticipants;

impl ParticipantExtractor for OperationParticipants {
    fn participants_for_transaction(
        &self,
        _sequence: u32,
        transaction: &LedgerTransaction,
    ) -> Result<Vec<Participant>, ExtractionError> {
        if transaction.operations.is_empty() {
            return Err(ExtractionError::EmptyTransaction {
                hash: transaction.hash.clone(),
            });
        }

        let mut collector = Collector::default();
        collector.push(&transaction.source_account);
        if let Some(fee_account) = &transaction.fee_account {
            collector.push(fee_account);
        }

        for (index, op) in transaction.operations.iter().enumerate() {
            let mut accounts: Vec<&str> = Vec::new();
            if let Some(source) = &op.source_account {
                accounts.push(source);
            }
            match &op.body {
                OperationBody::CreateAccount { destination }
                | OperationBody::AccountMerge { destination } => accounts.push(destination),
                OperationBody::Payment { destination, .. }
                | OperationBody::PathPayment { destination, .. } => accounts.push(destination),
                OperationBody::AllowTrust { trustor, .. } => accounts.push(trustor),
                OperationBody::SetOptions { signer: Some(signer) } => accounts.push(signer),
                _ => {}
            }
            // Trust line changes involve the issuer of the line
            if let OperationBody::ChangeTrust { line } = &op.body {
                if let Some(issuer) = line.issuer() {
                    accounts.push(issuer);
                }
            }

            for account in accounts {
                if account.is_empty() {
                    return Err(ExtractionError::InvalidAccount {
                        hash: transaction.hash.clone(),
                        index,
                    });
                }
                collector.push(account);
            }
        }

        Ok(collector.participants)
    }
}

/// Keeps first-seen order, drops repeats
#[derive(Default)]
struct Collector<'a> {
    seen: HashSet<&'a str>,
    participants: Vec<Participant>,
}

impl<'a> Collector<'a> {
    fn push(&mut self, account: &'a str) {
        if self.seen.insert(account) {
            self.participants.push(Participant::new(account));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Asset, Operation};

    fn addresses(participants: &[Participant]) -> Vec<&str> {
        participants.iter().map(|p| p.address()).collect()
    }

    #[test]
    fn test_payment_participants() {
        let tx = LedgerTransaction::new("h1", 10, "GSRC").with_operation(Operation::new(
            OperationBody::Payment {
                destination: "GDST".to_string(),
                asset: Asset::Native,
            },
        ));
        let got = OperationParticipants.participants_for_transaction(0, &tx).unwrap();
        assert_eq!(addresses(&got), vec!["GSRC", "GDST"]);
    }

    #[test]
    fn test_dedup_and_order() {
        let tx = LedgerTransaction::new("h2", 10, "GA")
            .with_fee_account("GFEE")
            .with_operation(
                Operation::new(OperationBody::CreateAccount {
                    destination: "GB".to_string(),
                })
                .with_source("GC"),
            )
            .with_operation(Operation::new(OperationBody::AccountMerge {
                destination: "GA".to_string(),
            }))
            .with_operation(Operation::new(OperationBody::ChangeTrust {
                line: Asset::credit("USD", "GISSUER"),
            }))
            .with_operation(Operation::new(OperationBody::SetOptions {
                signer: Some("GSIGNER".to_string()),
            }));
        let got = OperationParticipants.participants_for_transaction(7, &tx).unwrap();
        assert_eq!(
            addresses(&got),
            vec!["GA", "GFEE", "GC", "GB", "GISSUER", "GSIGNER"]
        );
    }

    #[test]
    fn test_empty_transaction_rejected() {
        let tx = LedgerTransaction::new("h3", 10, "GA");
        let err = OperationParticipants
            .participants_for_transaction(0, &tx)
            .unwrap_err();
        assert_eq!(
            err,
            ExtractionError::EmptyTransaction {
                hash: "h3".to_string()
            }
        );
    }

    #[test]
    fn test_empty_account_rejected() {
        let tx = LedgerTransaction::new("h4", 10, "GA")
            .with_operation(Operation::new(OperationBody::BumpSequence))
            .with_operation(Operation::new(OperationBody::AllowTrust {
                trustor: String::new(),
                asset: Asset::credit("USD", "GA"),
            }));
        let err = OperationParticipants
            .participants_for_transaction(0, &tx)
            .unwrap_err();
        assert_eq!(
            err,
            ExtractionError::InvalidAccount {
                hash: "h4".to_string(),
                index: 1
            }
        );
    }
}
