mod pandal_dto;

pub use pandal_dto::*;
