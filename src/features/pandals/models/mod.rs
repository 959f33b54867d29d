mod district;
mod filter;
mod pandal;

pub use district::{DistrictCount, DistrictFilter, DistrictSummary};
pub use filter::{PandalFilter, Proximity};
pub use pandal::{ApprovalOutcome, Pandal, PandalStatus, PandalUpdate};
