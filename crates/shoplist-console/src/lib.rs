//! Console transport.
//!
//! Reads one command per line from stdin and writes replies to stdout through
//! the `shoplist-core` `ReplyPort`. Stands in for a chat platform adapter.

use async_trait::async_trait;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt, Stdout},
    sync::Mutex,
};

pub mod handlers;
pub mod router;

use shoplist_core::{domain::ChatId, messaging::ReplyPort, Result};

/// Chat id used for the single console conversation.
pub const CONSOLE_CHAT: ChatId = ChatId(0);

pub struct ConsoleMessenger<W = Stdout> {
    out: Mutex<W>,
}

impl ConsoleMessenger<Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> ConsoleMessenger<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub async fn write_raw(&self, text: &str) -> Result<()> {
        let mut out = self.out.lock().await;
        out.write_all(text.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> ReplyPort for ConsoleMessenger<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send_text(&self, _chat_id: ChatId, text: &str) -> Result<()> {
        let mut line = text.trim_end().to_string();
        line.push('\n');
        self.write_raw(&line).await
    }
}
