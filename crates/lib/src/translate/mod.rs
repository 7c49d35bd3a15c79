//! Translation provider abstraction and the MyMemory client.

mod mymemory;

pub use mymemory::{MyMemoryClient, ResponseData, TranslateError, TranslateResponse};
