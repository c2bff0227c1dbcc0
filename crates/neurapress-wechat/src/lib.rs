//! WeChat draft API client.
//!
//! Pushes rendered HTML into the official-account draft box and returns the
//! draft's `media_id`. No lifecycle is tracked after creation.

mod draft;

pub use draft::{build_draft_payload, DraftArticle, DraftPayload, WeChatClient};
