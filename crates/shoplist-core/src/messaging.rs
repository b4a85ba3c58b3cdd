use async_trait::async_trait;

use crate::{domain::ChatId, Result};

/// Outbound side of a transport: where command replies are delivered.
///
/// The console adapter writes to stdout; a chat platform adapter would send
/// a message to the conversation identified by `chat_id`.
#[async_trait]
pub trait ReplyPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;
}
