#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # doorlist-entities
//!
//! Reusable, agnostic domain entities for doorlist.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod address;
pub mod city;
pub mod geo;
pub mod unit;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
