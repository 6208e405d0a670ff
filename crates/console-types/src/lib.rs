//! Wire types for the console REST API.
//!
//! This crate provides:
//! - Response envelopes (paginated pages, structured error bodies)
//! - Entity models for users, voters, and lookup data
//! - List filters and their query-string encoding
//! - Lenient normalizers that shape arbitrary server payloads into
//!   guaranteed containers

mod envelopes;
mod filters;
mod models;
pub mod normalize;

pub use envelopes::{ErrorBody, Page};
pub use filters::{UserFilters, VoterFilters};
pub use models::{
    District, Gender, Region, Role, User, UserDraft, VoteCenter, Voter, VoterDraft,
};
