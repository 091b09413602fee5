//! API middleware. Only the audit logger remains; the API is local and
//! unauthenticated.

pub mod audit;
