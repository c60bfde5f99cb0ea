//! # mail-core
//!
//! Captured-mail data model: [`Message`], its SMTP [`Envelope`], parsed [`Path`]s and
//! [`Content`], the caller-assigned [`MessageId`], plus tracing initialization.
//! Storage-agnostic; used by the storage crate and the admin CLI.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{MessageError, Result};
pub use logger::{init_console_tracing, init_tracing};
pub use types::{Content, Envelope, Message, MessageId, Path};
