pub mod report;
pub mod status;
