mod hierarchy;

pub use hierarchy::{AdminCountry, AdminDistrict, AdminState, AdministrativeData};
