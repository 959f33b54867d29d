mod location_validator;

pub use location_validator::LocationValidator;
