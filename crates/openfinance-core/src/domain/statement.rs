use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::models::Transaction;

static INSTALLMENT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}/\d{1,2}").expect("installment pattern is valid"));

/// Flattened view of a transaction, grouped by calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub name: String,
    pub tag: String,
    pub correlation_id: String,
    /// `YYYY-MM` of the transaction date.
    pub month_key: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_installment: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_installments: Option<u32>,
}

impl Transaction {
    /// Credit card purchases lose their `n/m` installment marker from the
    /// name and carry the counters from the card metadata instead.
    pub fn to_statement(&self) -> Statement {
        let (name, current_installment, total_installments) = match &self.credit_card_metadata {
            Some(card) => (
                INSTALLMENT_MARKER
                    .replace_all(&self.description, "")
                    .trim()
                    .to_owned(),
                card.installment_number,
                card.total_installments,
            ),
            None => (self.description.clone(), None, None),
        };

        Statement {
            name,
            tag: String::new(),
            correlation_id: self.id.clone(),
            month_key: format!("{}-{:02}", self.date.year(), u8::from(self.date.month())),
            timestamp: self.date,
            amount: self.amount,
            current_installment,
            total_installments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(json: &str) -> Transaction {
        serde_json::from_str(json).expect("transaction decodes")
    }

    #[test]
    fn card_purchase_drops_installment_marker() {
        let tx = transaction(
            r#"{
                "id": "tx-1",
                "description": "NETSHOES 03/10",
                "currencyCode": "BRL",
                "amount": 89.9,
                "date": "2024-02-07T03:00:00.000Z",
                "accountId": "acc-1",
                "type": "DEBIT",
                "creditCardMetadata": {"installmentNumber": 3, "totalInstallments": 10}
            }"#,
        );

        let statement = tx.to_statement();
        assert_eq!(statement.name, "NETSHOES");
        assert_eq!(statement.month_key, "2024-02");
        assert_eq!(statement.correlation_id, "tx-1");
        assert_eq!(statement.current_installment, Some(3));
        assert_eq!(statement.total_installments, Some(10));
    }

    #[test]
    fn bank_transaction_keeps_description() {
        let tx = transaction(
            r#"{
                "id": "tx-2",
                "description": "PIX 1/2 ALUGUEL",
                "currencyCode": "BRL",
                "amount": -1500.0,
                "date": "2023-11-30T10:00:00Z",
                "accountId": "acc-1",
                "type": "DEBIT"
            }"#,
        );

        let statement = tx.to_statement();
        assert_eq!(statement.name, "PIX 1/2 ALUGUEL");
        assert_eq!(statement.month_key, "2023-11");
        assert_eq!(statement.current_installment, None);
        assert!(statement.tag.is_empty());
    }
}
