//! Administrative geography (Country → State → District).
//!
//! The hierarchy is read from a JSON document once at startup and handed to a
//! [`LocationValidator`], which gates pandal creation and resolves district
//! names and images for display.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/locations/administrative` | No | Hierarchy, filterable by `country` and `state` |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::LocationValidator;
