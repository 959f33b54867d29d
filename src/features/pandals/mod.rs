//! Crowd-moderated pandal directory.
//!
//! New entries start `pending` and are published once enough distinct users
//! vote for them. Published entries can be searched by proximity, tag and
//! free text, and rolled up per district.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/pandals` | Yes | Submit a pandal (starts pending) |
//! | GET | `/api/pandals` | Yes | Search approved pandals |
//! | GET | `/api/pandals/pending` | Yes | Moderation queue for the caller |
//! | GET | `/api/pandals/districts` | Yes | Approved pandal counts per district |
//! | GET | `/api/pandals/{id}` | Yes | Get a pandal |
//! | POST/PATCH/PUT | `/api/pandals/{id}/approve` | Yes | Vote to approve |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use handlers::PandalState;
pub use services::{ApprovalService, DistrictService, PandalQueryBuilder, PandalService};
pub use store::{PandalStore, PgPandalStore};
