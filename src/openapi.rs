use utoipa::OpenApi;

use crate::errors::ErrorResponse;
use crate::report::models::{
    CategoryCount, CombinedResponse, HistogramBucket, ListingResponse, TransactionResponse,
};

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sales Report API",
        version = "1.0.0",
        description = "Read-only reporting API over sales transactions",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Reports", description = "Transaction listing and chart aggregations")
    ),
    paths(
        crate::report::handlers::list_transactions,
        crate::report::handlers::price_histogram,
        crate::report::handlers::category_breakdown,
        crate::report::handlers::combined_report,
    ),
    components(
        schemas(
            ErrorResponse,
            TransactionResponse,
            ListingResponse,
            HistogramBucket,
            CategoryCount,
            CombinedResponse,
        )
    )
)]
pub struct ApiDoc;
