//! # Domain Module
//!
//! Business rules of the expense tracker, independent of any storage backend
//! or UI framework.
//!
//! - **entry_repository**: entry CRUD and the income accumulator side effects
//! - **balance_service**: balance derivation and accumulator audit/repair
//! - **entry_list**: list and detail view logic (ordering, formatting)
//! - **entry_form**: create/edit form validation and submission

pub mod balance_service;
pub mod entry_form;
pub mod entry_list;
pub mod entry_repository;

pub use balance_service::*;
pub use entry_form::*;
pub use entry_list::*;
pub use entry_repository::*;
