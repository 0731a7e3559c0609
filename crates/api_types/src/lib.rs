use serde::{Deserialize, Serialize};

pub mod transaction {
    use chrono::{DateTime, FixedOffset};

    use super::*;

    /// Kind of a movement on an account.
    ///
    /// The declaration order is the order used when sorting by kind.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub enum TransactionKind {
        #[serde(rename = "ACCOUNT_DEPOSIT")]
        Deposit,
        #[serde(rename = "ACCOUNT_WITHDRAW")]
        Withdraw,
        #[serde(rename = "ACCOUNT_TRANSFER")]
        Transfer,
    }

    impl TransactionKind {
        pub const ALL: [TransactionKind; 3] = [Self::Deposit, Self::Withdraw, Self::Transfer];

        /// Returns the wire value used by the backend.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Deposit => "ACCOUNT_DEPOSIT",
                Self::Withdraw => "ACCOUNT_WITHDRAW",
                Self::Transfer => "ACCOUNT_TRANSFER",
            }
        }
    }

    /// One transaction or transfer entry as returned by
    /// `GET transaction/list/customer/{id}`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionRecord {
        #[serde(rename = "transactionId")]
        pub id: i64,
        #[serde(rename = "transactionType")]
        pub kind: TransactionKind,
        /// Non-negative amount in cents. Decimal number on the wire.
        #[serde(rename = "transactionAmount", with = "crate::amount")]
        pub amount_minor: i64,
        #[serde(rename = "transactionNotes", default, deserialize_with = "crate::notes")]
        pub notes: String,
        /// RFC3339 timestamp; naive timestamps are read as UTC.
        #[serde(rename = "createdAt", with = "crate::timestamp")]
        pub occurred_at: DateTime<FixedOffset>,
        #[serde(rename = "accountNumber")]
        pub account_number: i64,
    }
}

pub mod account {
    use super::*;

    /// Request body for `account/deposit`, `account/withdraw` and
    /// `account/transferFunds`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountTxn {
        pub source_account_number: i64,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub target_account_number: Option<i64>,
        #[serde(with = "crate::amount")]
        pub amount: i64,
        pub notes: String,
    }
}

/// Decimal currency numbers on the wire, integer cents in memory.
mod amount {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*cents as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(D::Error::custom("amount must be a finite number"));
        }
        if value < 0.0 {
            return Err(D::Error::custom("amount must be >= 0"));
        }
        to_cents(value).ok_or_else(|| D::Error::custom("amount too large"))
    }

    /// `i64::MAX as f64` rounds up to 2^63, which no `i64` can hold.
    pub(crate) fn to_cents(value: f64) -> Option<i64> {
        let cents = (value * 100.0).round();
        if cents >= i64::MAX as f64 {
            return None;
        }
        Some(cents as i64)
    }
}

mod timestamp {
    use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        value: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }

    fn parse(raw: &str) -> Option<DateTime<FixedOffset>> {
        let raw = raw.trim();
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Some(value);
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc().fixed_offset());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc().fixed_offset())
    }
}

fn notes<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::account::AccountTxn;
    use super::transaction::{TransactionKind, TransactionRecord};

    #[test]
    fn record_decodes_backend_payload() {
        let json = r#"{
            "transactionId": 7,
            "transactionType": "ACCOUNT_WITHDRAW",
            "transactionAmount": 12.5,
            "transactionNotes": "atm",
            "createdAt": "2024-03-05T10:15:00+01:00",
            "accountNumber": 12345678
        }"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.kind, TransactionKind::Withdraw);
        assert_eq!(record.amount_minor, 1250);
        assert_eq!(record.notes, "atm");
        assert_eq!(record.occurred_at.to_rfc3339(), "2024-03-05T10:15:00+01:00");
        assert_eq!(record.account_number, 12345678);
    }

    #[test]
    fn record_accepts_naive_timestamp_and_null_notes() {
        let json = r#"{
            "transactionId": 1,
            "transactionType": "ACCOUNT_DEPOSIT",
            "transactionAmount": 100,
            "transactionNotes": null,
            "createdAt": "2023-01-01T08:30:00.123",
            "accountNumber": 123
        }"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.notes, "");
        assert_eq!(record.amount_minor, 10000);
        assert_eq!(record.occurred_at.offset().local_minus_utc(), 0);
    }

    #[test]
    fn record_accepts_date_only_timestamp() {
        let json = r#"{"transactionId":1,"transactionType":"ACCOUNT_DEPOSIT","transactionAmount":1,"createdAt":"2023-01-02","accountNumber":1}"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.occurred_at.to_rfc3339(), "2023-01-02T00:00:00+00:00");
    }

    #[test]
    fn record_rejects_negative_amount() {
        let json = r#"{"transactionId":1,"transactionType":"ACCOUNT_DEPOSIT","transactionAmount":-1,"createdAt":"2023-01-02","accountNumber":1}"#;
        assert!(serde_json::from_str::<TransactionRecord>(json).is_err());
    }

    #[test]
    fn amounts_at_the_i64_limit_are_rejected() {
        assert_eq!(crate::amount::to_cents(12.5), Some(1250));
        assert_eq!(crate::amount::to_cents(9.223372036854776e16), None);
        assert_eq!(crate::amount::to_cents(1e17), None);
        assert!(crate::amount::to_cents(9.0e16).is_some());
    }

    #[test]
    fn record_rejects_unknown_kind() {
        let json = r#"{"transactionId":1,"transactionType":"ACCOUNT_LOAN","transactionAmount":1,"createdAt":"2023-01-02","accountNumber":1}"#;
        assert!(serde_json::from_str::<TransactionRecord>(json).is_err());
    }

    #[test]
    fn kind_order_follows_declaration() {
        assert!(TransactionKind::Deposit < TransactionKind::Withdraw);
        assert!(TransactionKind::Withdraw < TransactionKind::Transfer);
    }

    #[test]
    fn account_txn_omits_missing_target() {
        let deposit = AccountTxn {
            source_account_number: 12345678,
            target_account_number: None,
            amount: 2550,
            notes: String::new(),
        };
        let value = serde_json::to_value(&deposit).unwrap();
        assert_eq!(value["sourceAccountNumber"], 12345678);
        assert_eq!(value["amount"], 25.5);
        assert!(value.get("targetAccountNumber").is_none());
    }
}
