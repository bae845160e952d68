//! SQL query modules behind the `CandidateStore` contract.

pub mod candidate_crud;
pub mod candidate_query;
pub mod events;
pub mod maintenance;
