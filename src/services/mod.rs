//! Services module for business logic
//!
//! This module contains the optimistic project store and the services that
//! coordinate it with the remote adapters.

pub mod project_store;
pub mod transfer;
pub mod write_dispatcher;

pub use project_store::{ProjectStore, StoreOptions, Target};
pub use transfer::{ImportFailure, ImportReport};
pub use write_dispatcher::{
    write_policy, NoticeLevel, NoticeSender, Operation, StoreNotice, WriteHandle, WritePolicy,
};
