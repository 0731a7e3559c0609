//! New-transaction form.
//!
//! Holds the raw user input for a deposit, withdrawal or transfer and turns
//! it into the request body the backend expects.

use api_types::{account::AccountTxn, transaction::TransactionKind};

use crate::{HistoryError, MoneyCents, ResultHistory};

pub const MIN_AMOUNT: MoneyCents = MoneyCents::new(1);
pub const MAX_AMOUNT: MoneyCents = MoneyCents::new(99_999_999_999_999);
pub const MIN_ACCOUNT_NUMBER: i64 = 10_000_000;
pub const MAX_ACCOUNT_NUMBER: i64 = 99_999_999;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryDraft {
    pub kind: TransactionKind,
    pub amount: String,
    pub notes: String,
    pub account_number: String,
    /// Only read for transfers.
    pub to_account_number: String,
}

impl Default for EntryDraft {
    fn default() -> Self {
        Self {
            kind: TransactionKind::Deposit,
            amount: "0.01".to_string(),
            notes: String::new(),
            account_number: String::new(),
            to_account_number: String::new(),
        }
    }
}

impl EntryDraft {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_transfer(&self) -> bool {
        self.kind == TransactionKind::Transfer
    }

    /// Validates the draft and builds the request body.
    pub fn validate(&self) -> ResultHistory<AccountTxn> {
        let amount: MoneyCents = self.amount.parse()?;
        if amount < MIN_AMOUNT {
            return Err(HistoryError::InvalidAmount(format!(
                "amount must be at least {MIN_AMOUNT}"
            )));
        }
        if amount > MAX_AMOUNT {
            return Err(HistoryError::InvalidAmount(format!(
                "amount must be at most {MAX_AMOUNT}"
            )));
        }

        let source = parse_account_number(&self.account_number, "account")?;
        let target = if self.is_transfer() {
            let target = parse_account_number(&self.to_account_number, "target account")?;
            if target == source {
                return Err(HistoryError::SameAccount);
            }
            Some(target)
        } else {
            None
        };

        Ok(AccountTxn {
            source_account_number: source,
            target_account_number: target,
            amount: amount.cents(),
            notes: self.notes.trim().to_string(),
        })
    }
}

fn parse_account_number(value: &str, label: &str) -> ResultHistory<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HistoryError::InvalidAccount(format!("{label} number is required")));
    }
    let number: i64 = trimmed
        .parse()
        .map_err(|_| HistoryError::InvalidAccount(format!("invalid {label} number")))?;
    if !(MIN_ACCOUNT_NUMBER..=MAX_ACCOUNT_NUMBER).contains(&number) {
        return Err(HistoryError::InvalidAccount(format!(
            "{label} number must have 8 digits"
        )));
    }
    Ok(number)
}
