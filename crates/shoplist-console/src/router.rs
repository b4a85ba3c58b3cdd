use std::{future::Future, sync::Arc};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use shoplist_core::{config::Config, messaging::ReplyPort, service::ShoppingService};

use crate::{handlers, ConsoleMessenger, CONSOLE_CHAT};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub service: Arc<ShoppingService>,
    pub messenger: Arc<dyn ReplyPort>,
}

/// Why the input loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    EndOfInput,
    Signal,
}

/// Serve stdin until EOF or a termination signal, then save the list.
///
/// The shutdown snapshot error (if any) is returned so the binary can exit non-zero.
pub async fn run(cfg: Arc<Config>, service: Arc<ShoppingService>) -> anyhow::Result<()> {
    let console = Arc::new(ConsoleMessenger::stdout());
    let state = AppState {
        cfg: cfg.clone(),
        service: service.clone(),
        messenger: console.clone(),
    };

    let items = service.store().len().await;
    println!("shoplist started: {items} item(s) on the list");
    println!("State file: {}", cfg.state_file.display());
    println!("Send /help for the list of commands. Ctrl-D or Ctrl-C to quit.");

    // Signal watcher: flips the service into shutdown, which ends the input loop.
    tokio::spawn(watch_signals(service.shutdown_token(), shutdown_signal()));

    let prompt = cfg.show_prompt.then_some(console.as_ref());
    let stdin = BufReader::new(tokio::io::stdin());
    let reason = serve_lines(&state, stdin, prompt).await?;
    tracing::info!(?reason, "input loop stopped");

    service.shutdown().await?;
    Ok(())
}

/// Cancel `token` when `signal` fires.
///
/// If the handlers cannot be installed the token is left alone; EOF still
/// ends the input loop.
async fn watch_signals<F>(token: CancellationToken, signal: F)
where
    F: Future<Output = std::io::Result<&'static str>>,
{
    tokio::select! {
        res = signal => match res {
            Ok(name) => {
                tracing::info!(signal = name, "shutdown signal received");
                token.cancel();
            }
            Err(e) => tracing::error!(error = %e, "failed to listen for shutdown signals"),
        },
        _ = token.cancelled() => {}
    }
}

/// Feed lines from `input` to the command handler until EOF or shutdown.
pub async fn serve_lines<R>(
    state: &AppState,
    input: R,
    prompt: Option<&ConsoleMessenger>,
) -> anyhow::Result<StopReason>
where
    R: AsyncBufRead + Unpin,
{
    let token = state.service.shutdown_token();
    let mut lines = input.lines();

    loop {
        if let Some(console) = prompt {
            console.write_raw("> ").await?;
        }

        let line = tokio::select! {
            _ = token.cancelled() => return Ok(StopReason::Signal),
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            return Ok(StopReason::EndOfInput);
        };

        if let Err(e) = handlers::handle_command(state, CONSOLE_CHAT, &line).await {
            tracing::error!(error = %e, "failed to handle command");
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.map(|_| "SIGINT"),
        _ = term.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|_| "ctrl-c")
}

#[cfg(test)]
mod tests {
    use shoplist_core::{
        domain::{Item, ShoppingList},
        persistence::MemoryGateway,
    };

    use super::*;

    fn state_with(gw: Arc<MemoryGateway>) -> (AppState, Arc<ConsoleMessenger<Vec<u8>>>) {
        let messenger = Arc::new(ConsoleMessenger::new(Vec::new()));
        let state = AppState {
            cfg: Arc::new(Config::from_lookup(|_| None).unwrap()),
            service: Arc::new(ShoppingService::bootstrap(gw).unwrap()),
            messenger: messenger.clone(),
        };
        (state, messenger)
    }

    #[tokio::test]
    async fn serves_until_end_of_input_then_saves() {
        let gw = Arc::new(MemoryGateway::new());
        let (state, _out) = state_with(gw.clone());

        let input: &[u8] = b"/add milk, eggs\n/remove egg\n\n/add bread\n";
        let reason = serve_lines(&state, input, None).await.unwrap();
        assert_eq!(reason, StopReason::EndOfInput);

        state.service.shutdown().await.unwrap();
        let want: Vec<Item> = ["milk", "bread"]
            .iter()
            .map(|s| Item::normalize(s).unwrap())
            .collect();
        assert_eq!(gw.saved(), Some(ShoppingList::from(want)));
    }

    #[tokio::test]
    async fn stops_when_shutdown_begins() {
        let (state, _out) = state_with(Arc::new(MemoryGateway::new()));

        // Keep the write half open so the reader never sees EOF.
        let (reader, _writer) = tokio::io::duplex(64);
        let token = state.service.shutdown_token();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            token.cancel();
        });

        let reason = serve_lines(&state, BufReader::new(reader), None)
            .await
            .unwrap();
        assert_eq!(reason, StopReason::Signal);
    }

    #[tokio::test]
    async fn signal_listener_failure_keeps_serving() {
        let token = CancellationToken::new();
        let failing = async {
            Err::<&'static str, _>(std::io::Error::other("no signal support"))
        };
        watch_signals(token.clone(), failing).await;
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn received_signal_cancels_intake() {
        let token = CancellationToken::new();
        watch_signals(token.clone(), async { Ok("SIGTERM") }).await;
        assert!(token.is_cancelled());
    }
}
