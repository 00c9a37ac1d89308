use rust_decimal::Decimal;
use sqlx::PgPool;
use std::str::FromStr;

use super::models::{
    band_label, BandPolicy, CategoryCount, CombinedResponse, HistogramBucket, ListingFilters,
    ListingResponse, Transaction, BAND_COUNT,
};
use crate::errors::AppError;
use crate::month::MonthRange;

/// Service layer for transaction reporting. All operations are read-only;
/// the pool is handed in per call and no connection state is held here.
pub struct ReportService;

/// Number of pages needed for `total` rows at `per_page` rows each.
fn page_count(total: i64, per_page: i64) -> i64 {
    (total + per_page - 1) / per_page
}

/// A search term doubles as an exact price match when it parses as a number.
/// A term that does not parse simply drops the price clause.
fn parse_price_term(term: &str) -> Option<Decimal> {
    Decimal::from_str(term.trim()).ok()
}

/// Shape raw (band, count) rows into labelled buckets. With `OmitEmpty` only
/// bands that matched at least one row appear; with `EmitZero` all bands
/// appear in boundary order with explicit zero counts.
fn shape_histogram(rows: Vec<(i32, i64)>, policy: BandPolicy) -> Vec<HistogramBucket> {
    match policy {
        BandPolicy::OmitEmpty => rows
            .into_iter()
            .map(|(band, count)| HistogramBucket {
                range: band_label(band as usize),
                count,
            })
            .collect(),
        BandPolicy::EmitZero => {
            let mut counts = [0i64; BAND_COUNT];
            for (band, count) in rows {
                if (1..=BAND_COUNT as i32).contains(&band) {
                    counts[band as usize - 1] = count;
                }
            }
            counts
                .iter()
                .enumerate()
                .map(|(i, &count)| HistogramBucket {
                    range: band_label(i + 1),
                    count,
                })
                .collect()
        }
    }
}

impl ReportService {
    /// List transactions with optional month filter, free-text search and
    /// pagination. Filters AND-compose at the top level; inside the search
    /// filter, title, description and exact-price matches OR-compose.
    pub async fn list_transactions(
        pool: &PgPool,
        filters: &ListingFilters,
    ) -> Result<ListingResponse, AppError> {
        if filters.page < 1 || filters.per_page < 1 {
            return Err(AppError::ValidationError(
                "page and perPage must be positive".to_string(),
            ));
        }

        let range = match &filters.month {
            Some(name) => Some(MonthRange::current_year(name)?),
            None => None,
        };
        let pattern = filters.search.as_ref().map(|term| format!("%{term}%"));
        let price_term = filters.search.as_deref().and_then(parse_price_term);
        let offset = (filters.page - 1) * filters.per_page;

        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, title, description, price, category, date_of_sale
            FROM transactions
            WHERE ($1::timestamptz IS NULL OR (date_of_sale >= $1 AND date_of_sale < $2))
              AND ($3::text IS NULL
                   OR title ILIKE $3
                   OR description ILIKE $3
                   OR ($4::numeric IS NOT NULL AND price = $4))
            ORDER BY date_of_sale DESC, id
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(range.map(|r| r.start))
        .bind(range.map(|r| r.end))
        .bind(&pattern)
        .bind(price_term)
        .bind(filters.per_page)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transactions
            WHERE ($1::timestamptz IS NULL OR (date_of_sale >= $1 AND date_of_sale < $2))
              AND ($3::text IS NULL
                   OR title ILIKE $3
                   OR description ILIKE $3
                   OR ($4::numeric IS NOT NULL AND price = $4))
            "#,
        )
        .bind(range.map(|r| r.start))
        .bind(range.map(|r| r.end))
        .bind(&pattern)
        .bind(price_term)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(ListingResponse {
            items: transactions.into_iter().map(Into::into).collect(),
            total,
            pages: page_count(total, filters.per_page),
            current_page: filters.page,
        })
    }

    /// Count transactions per fixed price band for one month. Bucketing runs
    /// in the store; labels and empty-band policy are applied here.
    pub async fn price_histogram(
        pool: &PgPool,
        month: &str,
        policy: BandPolicy,
    ) -> Result<Vec<HistogramBucket>, AppError> {
        let range = MonthRange::current_year(month)?;

        let rows = sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT width_bucket(
                       price,
                       ARRAY[0, 101, 201, 301, 401, 501, 601, 701, 801, 901]::numeric[]
                   ) AS band,
                   COUNT(*)
            FROM transactions
            WHERE date_of_sale >= $1 AND date_of_sale < $2
            GROUP BY band
            ORDER BY band
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(shape_histogram(rows, policy))
    }

    /// Count transactions per distinct category for one month. Categories
    /// come entirely from the data; entry order is not significant.
    pub async fn category_breakdown(
        pool: &PgPool,
        month: &str,
    ) -> Result<Vec<CategoryCount>, AppError> {
        let range = MonthRange::current_year(month)?;

        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT category, COUNT(*)
            FROM transactions
            WHERE date_of_sale >= $1 AND date_of_sale < $2
            GROUP BY category
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect())
    }

    /// Run the listing and both chart aggregations concurrently and merge
    /// them. Fail-fast: the first sub-query error aborts the whole report,
    /// partial results are never returned.
    pub async fn combined_report(
        pool: &PgPool,
        filters: &ListingFilters,
    ) -> Result<CombinedResponse, AppError> {
        let month = filters.month.as_deref().ok_or_else(|| {
            AppError::ValidationError("month is required for the combined report".to_string())
        })?;

        let (listing, histogram, categories) = futures::try_join!(
            Self::list_transactions(pool, filters),
            Self::price_histogram(pool, month, BandPolicy::default()),
            Self::category_breakdown(pool, month),
        )?;

        Ok(CombinedResponse {
            listing,
            histogram,
            categories,
        })
    }
}
