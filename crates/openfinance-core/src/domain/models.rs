use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// One page of a list endpoint.
///
/// `results.len()` is not guaranteed to be at most `total`; the upstream
/// does not promise it and nothing here checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Whether pages remain after `requested`, the page number that was
    /// asked for. The echoed `page` field is not trusted since it defaults
    /// to 0 when the upstream omits it.
    pub fn has_page_after(&self, requested: u32) -> bool {
        requested < self.total_pages
    }
}

/// Synchronisation state of an item.
///
/// Values the upstream adds later are kept verbatim in [`ItemStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemStatus {
    Updating,
    Updated,
    LoginError,
    Outdated,
    WaitingUserInput,
    Other(String),
}

impl ItemStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Updating => "UPDATING",
            Self::Updated => "UPDATED",
            Self::LoginError => "LOGIN_ERROR",
            Self::Outdated => "OUTDATED",
            Self::WaitingUserInput => "WAITING_USER_INPUT",
            Self::Other(status) => status,
        }
    }
}

impl From<String> for ItemStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "UPDATING" => Self::Updating,
            "UPDATED" => Self::Updated,
            "LOGIN_ERROR" => Self::LoginError,
            "OUTDATED" => Self::Outdated,
            "WAITING_USER_INPUT" => Self::WaitingUserInput,
            _ => Self::Other(value),
        }
    }
}

impl From<ItemStatus> for String {
    fn from(value: ItemStatus) -> Self {
        match value {
            ItemStatus::Other(status) => status,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's connection to one financial institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub status: ItemStatus,
    #[serde(default)]
    pub execution_status: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_updated_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub next_auto_sync_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub connector: Option<Connector>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub institution_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub oauth: bool,
    #[serde(default)]
    pub health: Option<ConnectorHealth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorHealth {
    pub status: String,
}

/// Bank (`BANK`) or credit (`CREDIT`) account under an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    pub name: String,
    pub balance: f64,
    pub item_id: String,
    #[serde(default)]
    pub tax_number: Option<String>,
    pub currency_code: String,
    #[serde(default)]
    pub bank_data: Option<BankData>,
    #[serde(default)]
    pub credit_data: Option<CreditData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankData {
    #[serde(default)]
    pub transfer_number: Option<String>,
    #[serde(default)]
    pub closing_balance: Option<f64>,
    #[serde(default)]
    pub automatically_invested_balance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditData {
    #[serde(default)]
    pub brand: Option<String>,
    /// `yyyy-mm-dd`, kept as sent.
    #[serde(default)]
    pub balance_due_date: Option<String>,
    #[serde(default)]
    pub available_credit_limit: Option<f64>,
    #[serde(default)]
    pub minimum_payment: Option<f64>,
    #[serde(default)]
    pub credit_limit: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub description_raw: Option<String>,
    pub currency_code: String,
    pub amount: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    pub account_id: String,
    #[serde(default)]
    pub provider_code: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_data: Option<PaymentData>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub amount_in_account_currency: Option<f64>,
    #[serde(default)]
    pub merchant: Option<Merchant>,
    #[serde(default)]
    pub credit_card_metadata: Option<CreditCardMetadata>,
    #[serde(default)]
    pub operation_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    #[serde(default)]
    pub payer: Option<PaymentParty>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub receiver: Option<PaymentParty>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentParty {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub branch_number: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub routing_number: Option<String>,
    #[serde(default)]
    pub document_number: Option<DocumentNumber>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNumber {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub name: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cnae: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardMetadata {
    #[serde(default, rename = "payeeMCC")]
    pub payee_mcc: Option<u32>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub total_installments: Option<u32>,
    #[serde(default)]
    pub installment_number: Option<u32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub purchase_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub bill_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    pub balance: f64,
    pub currency_code: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub last_month_rate: Option<f64>,
    #[serde(default)]
    pub annual_rate: Option<f64>,
    #[serde(default)]
    pub last_twelve_months_rate: Option<f64>,
    pub item_id: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub taxes: Option<f64>,
    #[serde(default)]
    pub taxes2: Option<f64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub number: Option<Value>,
    #[serde(default)]
    pub amount_profit: Option<f64>,
    #[serde(default)]
    pub amount_withdrawal: Option<f64>,
    #[serde(default)]
    pub amount_original: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transactions: Vec<InvestmentTransaction>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub rate_type: Option<String>,
    #[serde(default)]
    pub fixed_annual_rate: Option<f64>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default, rename = "issuerCNPJ")]
    pub issuer_cnpj: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub issue_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub institution: Option<Institution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentTransaction {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub trade_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub movement_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    pub name: String,
    #[serde(default)]
    pub number: Option<String>,
}

/// Credit card bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub due_date: OffsetDateTime,
    pub total_amount: f64,
    pub total_amount_currency_code: String,
    #[serde(default)]
    pub minimum_payment_amount: Option<f64>,
    #[serde(default)]
    pub allows_installments: Option<bool>,
    #[serde(default)]
    pub finance_charges: Vec<FinanceCharge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceCharge {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub currency_code: String,
    #[serde(default)]
    pub additional_info: Option<String>,
}
