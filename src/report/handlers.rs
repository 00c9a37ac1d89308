use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};

use super::models::{
    BandPolicy, CategoryCount, CombinedResponse, HistogramBucket, ListingFilters, ListingResponse,
    MonthQuery,
};
use super::service::ReportService;

/// GET /transactions - List transactions with month filter, search and pagination
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "Reports",
    params(ListingFilters),
    responses(
        (status = 200, description = "Paginated list of transactions", body = ListingResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
#[get("/transactions")]
pub async fn list_transactions(
    pool: web::Data<PgPool>,
    query: web::Query<ListingFilters>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let listing = ReportService::list_transactions(pool.get_ref(), &query).await?;

    Ok(HttpResponse::Ok().json(listing))
}

/// GET /transactions/histogram - Transaction counts per fixed price band
#[utoipa::path(
    get,
    path = "/transactions/histogram",
    tag = "Reports",
    params(MonthQuery),
    responses(
        (status = 200, description = "Price band counts for the month", body = Vec<HistogramBucket>),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
#[get("/transactions/histogram")]
pub async fn price_histogram(
    pool: web::Data<PgPool>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, AppError> {
    let buckets =
        ReportService::price_histogram(pool.get_ref(), &query.month, BandPolicy::default()).await?;

    Ok(HttpResponse::Ok().json(buckets))
}

/// GET /transactions/categories - Transaction counts per category
#[utoipa::path(
    get,
    path = "/transactions/categories",
    tag = "Reports",
    params(MonthQuery),
    responses(
        (status = 200, description = "Category counts for the month", body = Vec<CategoryCount>),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
#[get("/transactions/categories")]
pub async fn category_breakdown(
    pool: web::Data<PgPool>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, AppError> {
    let categories = ReportService::category_breakdown(pool.get_ref(), &query.month).await?;

    Ok(HttpResponse::Ok().json(categories))
}

/// GET /transactions/combined - Listing plus both chart aggregations in one call
#[utoipa::path(
    get,
    path = "/transactions/combined",
    tag = "Reports",
    params(ListingFilters),
    responses(
        (status = 200, description = "Listing, histogram and category breakdown", body = CombinedResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
#[get("/transactions/combined")]
pub async fn combined_report(
    pool: web::Data<PgPool>,
    query: web::Query<ListingFilters>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let combined = ReportService::combined_report(pool.get_ref(), &query).await?;

    Ok(HttpResponse::Ok().json(combined))
}
