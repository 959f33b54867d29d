mod approval_service;
mod district_service;
mod pandal_service;
mod query_builder;

pub use approval_service::ApprovalService;
pub use district_service::DistrictService;
pub use pandal_service::PandalService;
pub use query_builder::PandalQueryBuilder;
