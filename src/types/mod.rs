pub mod synthesis;

pub use synthesis::{AudioRequest, RemoteReply, TokenRequest};
