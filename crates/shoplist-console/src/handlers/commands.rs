use shoplist_core::{
    commands::{Command, CommandReply, COMMAND_OVERVIEW},
    domain::{AddResult, ChatId, ListView, RemoveResult, SegmentOutcome},
    errors::Error,
    messaging::ReplyPort,
};

use crate::router::AppState;

const ADD_USAGE: &str = "Please specify an item to add. For example: /add milk, eggs, bread";
const REMOVE_USAGE: &str = "Please specify an item to remove. For example: /remove milk";

/// Handle one inbound line from `chat_id`.
///
/// Only transport failures are returned; user mistakes become reply text.
pub async fn handle_command(state: &AppState, chat_id: ChatId, text: &str) -> anyhow::Result<()> {
    let Some(cmd) = Command::parse(text, &state.cfg.bot_name) else {
        return Ok(());
    };
    let name = cmd.name().to_string();

    let reply = match state.service.execute(cmd).await {
        Ok(reply) => reply,
        Err(Error::ShuttingDown) => {
            tracing::debug!(command = %name, "dropped command during shutdown");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    tracing::debug!(command = %name, "command handled");

    for message in render_reply(&reply) {
        state.messenger.send_text(chat_id, &message).await?;
    }
    Ok(())
}

/// Turn a command outcome into the messages sent back to the user.
pub fn render_reply(reply: &CommandReply) -> Vec<String> {
    match reply {
        CommandReply::Help => vec![help_text()],
        CommandReply::List(view) => vec![render_list(view)],
        CommandReply::Add(AddResult::NoItemsSpecified) => vec![ADD_USAGE.to_string()],
        CommandReply::Add(AddResult::Added(segments)) => segments
            .iter()
            .map(|s| match s {
                SegmentOutcome::Added(item) => format!("\"{item}\" added to shopping list."),
                SegmentOutcome::Empty => ADD_USAGE.to_string(),
            })
            .collect(),
        CommandReply::Remove(RemoveResult::Removed(item)) => {
            vec![format!("\"{item}\" removed from shopping list.")]
        }
        CommandReply::Remove(RemoveResult::NotFound) => {
            vec!["No matching item in the shopping list.".to_string()]
        }
        CommandReply::Remove(RemoveResult::NoItemSpecified) => vec![REMOVE_USAGE.to_string()],
        CommandReply::Cleared => vec!["List cleared!".to_string()],
        CommandReply::Restored(view) => {
            vec!["Shopping list restored.".to_string(), render_list(view)]
        }
        CommandReply::Unknown(name) => {
            vec![format!("Unknown command /{name}. Send /help for the list of commands.")]
        }
    }
}

fn render_list(view: &ListView) -> String {
    match view {
        ListView::Empty => "Shopping list is empty!".to_string(),
        ListView::Items(items) => {
            let mut out = String::from("Shopping list:");
            for item in items {
                out.push_str("\n- ");
                out.push_str(item.as_str());
            }
            out
        }
    }
}

fn help_text() -> String {
    let mut out = String::from("List of commands:");
    for (cmd, desc) in COMMAND_OVERVIEW {
        out.push_str(&format!("\n/{cmd} - {desc}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use shoplist_core::{
        config::Config,
        domain::Item,
        persistence::MemoryGateway,
        service::ShoppingService,
        Result,
    };

    use super::*;

    #[derive(Default)]
    struct RecordingMessenger {
        sends: Mutex<Vec<(ChatId, String)>>,
    }

    impl RecordingMessenger {
        fn take(&self) -> Vec<String> {
            self.sends
                .lock()
                .unwrap()
                .drain(..)
                .map(|(_, text)| text)
                .collect()
        }
    }

    #[async_trait]
    impl ReplyPort for RecordingMessenger {
        async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
            self.sends.lock().unwrap().push((chat_id, text.to_string()));
            Ok(())
        }
    }

    fn state() -> (AppState, Arc<RecordingMessenger>) {
        let cfg = Config::from_lookup(|_| None).unwrap();
        let service = ShoppingService::bootstrap(Arc::new(MemoryGateway::new())).unwrap();
        let messenger = Arc::new(RecordingMessenger::default());
        let state = AppState {
            cfg: Arc::new(cfg),
            service: Arc::new(service),
            messenger: messenger.clone(),
        };
        (state, messenger)
    }

    async fn send(state: &AppState, text: &str) {
        handle_command(state, ChatId(7), text).await.unwrap();
    }

    #[tokio::test]
    async fn add_list_remove_flow() {
        let (state, out) = state();

        send(&state, "/list").await;
        assert_eq!(out.take(), vec!["Shopping list is empty!"]);

        send(&state, "/add  milk ,EGGS,, bread ").await;
        assert_eq!(
            out.take(),
            vec![
                "\"Milk\" added to shopping list.",
                "\"Eggs\" added to shopping list.",
                ADD_USAGE,
                "\"Bread\" added to shopping list.",
            ]
        );

        send(&state, "/remove EGG").await;
        assert_eq!(out.take(), vec!["\"Eggs\" removed from shopping list."]);

        send(&state, "/list").await;
        assert_eq!(out.take(), vec!["Shopping list:\n- Milk\n- Bread"]);
    }

    #[tokio::test]
    async fn usage_hints_for_missing_arguments() {
        let (state, out) = state();
        send(&state, "/add").await;
        send(&state, "/remove   ").await;
        send(&state, "/remove cheese").await;
        assert_eq!(
            out.take(),
            vec![
                ADD_USAGE,
                REMOVE_USAGE,
                "No matching item in the shopping list.",
            ]
        );
    }

    #[tokio::test]
    async fn clear_then_undo_shows_restored_list() {
        let (state, out) = state();
        send(&state, "/add milk, eggs").await;
        out.take();

        send(&state, "/clear").await;
        send(&state, "/undo").await;
        assert_eq!(
            out.take(),
            vec![
                "List cleared!",
                "Shopping list restored.",
                "Shopping list:\n- Milk\n- Eggs",
            ]
        );
    }

    #[tokio::test]
    async fn help_and_unknown() {
        let (state, out) = state();
        send(&state, "/start").await;
        send(&state, "/bogus").await;
        let sent = out.take();
        assert!(sent[0].starts_with("List of commands:\n/list - "));
        assert!(sent[0].contains("/undo - Undo last action"));
        assert_eq!(
            sent[1],
            "Unknown command /bogus. Send /help for the list of commands."
        );
    }

    #[tokio::test]
    async fn blank_lines_and_foreign_bot_commands_are_ignored() {
        let (state, out) = state();
        send(&state, "   ").await;
        send(&state, "/add@otherbot milk").await;
        assert!(out.take().is_empty());
        assert!(state.service.store().is_empty().await);
    }

    #[tokio::test]
    async fn commands_after_shutdown_are_dropped() {
        let (state, out) = state();
        state.service.shutdown().await.unwrap();
        send(&state, "/add milk").await;
        assert!(out.take().is_empty());
    }

    #[test]
    fn renders_restored_empty_list() {
        let msgs = render_reply(&CommandReply::Restored(ListView::Empty));
        assert_eq!(msgs, vec!["Shopping list restored.", "Shopping list is empty!"]);

        let msgs = render_reply(&CommandReply::List(ListView::Items(vec![
            Item::normalize("salt, pepper").unwrap(),
        ])));
        assert_eq!(msgs, vec!["Shopping list:\n- Salt, Pepper"]);
    }
}
