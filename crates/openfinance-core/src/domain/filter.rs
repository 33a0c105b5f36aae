use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Upstream query pairs, in the order they were pushed.
pub type QueryPairs = Vec<(&'static str, String)>;

/// Investment categories accepted by the `type` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestmentType {
    Coe,
    Equity,
    Etf,
    FixedIncome,
    MutualFund,
    Security,
    Other,
}

impl InvestmentType {
    pub const ALL: [Self; 7] = [
        Self::Coe,
        Self::Equity,
        Self::Etf,
        Self::FixedIncome,
        Self::MutualFund,
        Self::Security,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Coe => "COE",
            Self::Equity => "EQUITY",
            Self::Etf => "ETF",
            Self::FixedIncome => "FIXED_INCOME",
            Self::MutualFund => "MUTUAL_FUND",
            Self::Security => "SECURITY",
            Self::Other => "OTHER",
        }
    }

    /// Case-insensitive lookup; `None` for anything outside [`Self::ALL`].
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// Refinement for `GET /transactions`.
///
/// When `ids` is non-empty the date range is not sent; the upstream treats
/// the two as alternatives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub ids: Vec<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub created_at_from: Option<OffsetDateTime>,
}

impl TransactionFilter {
    pub fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        if self.ids.is_empty() {
            if let Some(from) = self.from {
                pairs.push(("from", format_date(from)));
            }
            if let Some(to) = self.to {
                pairs.push(("to", format_date(to)));
            }
        } else {
            pairs.push(("ids", self.ids.join(",")));
        }
        if let Some(created_at_from) = self.created_at_from {
            if let Ok(formatted) = created_at_from.format(&Rfc3339) {
                pairs.push(("createdAtFrom", formatted));
            }
        }
        push_paging(&mut pairs, self.page, self.page_size);
        pairs
    }
}

/// Refinement for `GET /investments`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestmentsFilter {
    pub investment_type: Option<InvestmentType>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl InvestmentsFilter {
    pub fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        if let Some(kind) = self.investment_type {
            pairs.push(("type", kind.as_str().to_owned()));
        }
        push_paging(&mut pairs, self.page, self.page_size);
        pairs
    }
}

// Zero means "upstream default" and is left off the wire.
fn push_paging(pairs: &mut QueryPairs, page: Option<u32>, page_size: Option<u32>) {
    if let Some(page) = page.filter(|page| *page > 0) {
        pairs.push(("page", page.to_string()));
    }
    if let Some(page_size) = page_size.filter(|size| *size > 0) {
        pairs.push(("pageSize", page_size.to_string()));
    }
}

fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}
