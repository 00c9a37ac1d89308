pub mod errors;
pub mod month;
pub mod openapi;
pub mod report;
