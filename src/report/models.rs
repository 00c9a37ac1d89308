use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Price band boundaries. Each band is closed-low/open-high; prices at or
/// above the last boundary fall into the overflow band.
pub(crate) const PRICE_BAND_BOUNDS: [i64; 10] = [0, 101, 201, 301, 401, 501, 601, 701, 801, 901];

/// Number of histogram bands: nine bounded bands plus the overflow band.
pub(crate) const BAND_COUNT: usize = PRICE_BAND_BOUNDS.len();

/// Label for a 1-based band index as produced by `width_bucket` over
/// [`PRICE_BAND_BOUNDS`].
pub(crate) fn band_label(band: usize) -> String {
    match band {
        1..=9 => format!(
            "{} - {}",
            PRICE_BAND_BOUNDS[band - 1],
            PRICE_BAND_BOUNDS[band] - 1
        ),
        _ => "901 and above".to_string(),
    }
}

/// Policy for price bands with no matching transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BandPolicy {
    /// Emit only bands that received at least one transaction
    #[default]
    OmitEmpty,
    /// Emit every band, zero counts included
    EmitZero,
}

/// Database row for a sales transaction. This service never writes it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub date_of_sale: DateTime<Utc>,
}

/// Transaction information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Unique transaction identifier
    pub id: Uuid,
    /// Product title
    #[schema(example = "Wooden bench")]
    pub title: String,
    /// Product description
    #[schema(example = "Solid oak garden bench")]
    pub description: String,
    /// Sale price (non-negative)
    #[schema(example = 250.00)]
    pub price: Decimal,
    /// Product category label
    #[schema(example = "furniture")]
    pub category: String,
    /// Date of the sale (UTC)
    pub date_of_sale: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            price: t.price,
            category: t.category,
            date_of_sale: t.date_of_sale,
        }
    }
}

/// Query parameters for the transaction listing and the combined report
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilters {
    /// Month name filter, resolved against the current calendar year
    #[param(example = "March")]
    pub month: Option<String>,

    /// Free-text term matched against title and description, or an exact
    /// price when it parses as a number
    #[param(example = "sofa")]
    pub search: Option<String>,

    /// 1-based page index
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    #[param(example = 1)]
    pub page: i64,

    /// Page size (1-100)
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_per_page")]
    #[param(example = 10)]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    10
}

/// Query parameters for the chart aggregations
#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthQuery {
    /// Month name, resolved against the current calendar year
    #[param(example = "March")]
    pub month: String,
}

/// Paginated listing response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    /// Transactions on this page
    pub items: Vec<TransactionResponse>,
    /// Total count matching filters, ignoring pagination
    #[schema(example = 60)]
    pub total: i64,
    /// Total number of pages
    #[schema(example = 6)]
    pub pages: i64,
    /// 1-based page index used
    #[schema(example = 1)]
    pub current_page: i64,
}

/// One price band of the histogram
#[derive(Debug, Serialize, PartialEq, Eq, ToSchema)]
pub struct HistogramBucket {
    /// Band label, e.g. "101 - 200" or "901 and above"
    #[schema(example = "101 - 200")]
    pub range: String,
    /// Number of transactions in the band
    #[schema(example = 4)]
    pub count: i64,
}

/// Transaction count for one category
#[derive(Debug, Serialize, PartialEq, Eq, ToSchema)]
pub struct CategoryCount {
    /// Category label as present in the data
    #[schema(example = "furniture")]
    pub category: String,
    /// Number of transactions in the category
    #[schema(example = 12)]
    pub count: i64,
}

/// Combined response: listing plus both chart aggregations
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CombinedResponse {
    /// Paginated listing for the requested page
    pub listing: ListingResponse,
    /// Price histogram for the requested month
    pub histogram: Vec<HistogramBucket>,
    /// Category breakdown for the requested month
    pub categories: Vec<CategoryCount>,
}
