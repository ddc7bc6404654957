//! Prompt source implementations

mod cached;
mod local;
mod payload;
mod remote;

pub use cached::CachedPromptSource;
pub use local::LocalPromptSource;
pub use payload::PromptPayload;
pub use remote::RemotePromptSource;
