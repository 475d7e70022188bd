pub mod http;
pub mod traits;

// Re-export
pub use http::HttpReportSource;
pub use traits::ReportSource;
