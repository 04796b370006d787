#![allow(async_fn_in_trait)]

pub mod asset;
pub mod audio;
pub mod client;
pub mod error;
pub mod paging;
pub mod resource;
pub mod session;

pub use client::ApiClient;
pub use error::{ClientError, Result};
pub use paging::{ListQuery, Page, PageCursors, Paginator};
pub use resource::{ResourcePersistence, ResourceService};
