//! Routes command events to handlers: acknowledge first, then reply.

use crate::commands::CommandHandler;
use crate::error::CommandError;
use futures::FutureExt;
use slack_client::{CommandEvent, CommandTransport, Reply};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Lifecycle of a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    Received,
    Acknowledged,
    /// The handler's own reply was delivered.
    Replied,
    /// A fallback reply (usage, error, unknown command) was delivered,
    /// or delivery itself failed.
    FailedReplied,
}

pub struct Dispatcher {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    transport: Arc<dyn CommandTransport>,
    handler_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        handlers: Vec<Arc<dyn CommandHandler>>,
        transport: Arc<dyn CommandTransport>,
        handler_timeout: Duration,
    ) -> Self {
        let handlers = handlers
            .into_iter()
            .map(|h| (h.command().to_string(), h))
            .collect();

        Self {
            handlers,
            transport,
            handler_timeout,
        }
    }

    /// Commands this dispatcher answers, sorted.
    pub fn commands(&self) -> Vec<&str> {
        let mut commands: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        commands.sort_unstable();
        commands
    }

    /// Run one invocation to completion. Never fails: every outcome ends
    /// in a reply attempt, and the final state says which kind.
    #[instrument(skip_all, fields(command = %event.command, user = %event.user_id))]
    pub async fn dispatch(&self, event: CommandEvent) -> InvocationState {
        let mut state = InvocationState::Received;
        debug!(?state, "Command received");

        match self.transport.acknowledge(&event).await {
            Ok(()) => state = InvocationState::Acknowledged,
            Err(e) => warn!("Failed to acknowledge {}: {}", event.envelope_id, e),
        }
        debug!(?state, "Acknowledge step done");

        let outcome = match self.handlers.get(event.command.as_str()) {
            Some(handler) => self.run(handler.as_ref(), &event).await,
            None => {
                info!("Unknown command");
                return self
                    .deliver(
                        &event,
                        Reply::ephemeral(format!(
                            "Unknown command `{}`. Try `/help`.",
                            event.command
                        )),
                        InvocationState::FailedReplied,
                    )
                    .await;
            }
        };

        match outcome {
            Ok(reply) => self.deliver(&event, reply, InvocationState::Replied).await,
            Err(err) => {
                if err.is_internal() {
                    error!("Command failed: {}", err);
                } else {
                    debug!("Command rejected: {}", err);
                }
                self.deliver(&event, err.user_reply(), InvocationState::FailedReplied)
                    .await
            }
        }
    }

    async fn run(
        &self,
        handler: &dyn CommandHandler,
        event: &CommandEvent,
    ) -> Result<Reply, CommandError> {
        let guarded = AssertUnwindSafe(handler.execute(event)).catch_unwind();

        match tokio::time::timeout(self.handler_timeout, guarded).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CommandError::Internal("handler panicked".into())),
            Err(_) => Err(CommandError::Internal(format!(
                "handler timed out after {:?}",
                self.handler_timeout
            ))),
        }
    }

    async fn deliver(
        &self,
        event: &CommandEvent,
        reply: Reply,
        on_success: InvocationState,
    ) -> InvocationState {
        match self.transport.reply(event, &reply).await {
            Ok(()) => {
                debug!(state = ?on_success, "Reply delivered");
                on_success
            }
            Err(e) => {
                error!("Failed to send reply: {}", e);
                InvocationState::FailedReplied
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{test_event, CalcHandler, EchoHandler};
    use crate::error::{APOLOGY, CALC_HELP};
    use async_trait::async_trait;
    use mockall::{mock, Sequence};
    use slack_client::{SlackError, Visibility};
    use std::sync::Mutex;

    mock! {
        pub Transport {}

        #[async_trait]
        impl CommandTransport for Transport {
            async fn acknowledge(&self, event: &CommandEvent) -> Result<(), SlackError>;
            async fn reply(&self, event: &CommandEvent, reply: &Reply) -> Result<(), SlackError>;
        }
    }

    /// Records every reply; acks always succeed.
    #[derive(Default)]
    struct Recorder {
        replies: Mutex<Vec<Reply>>,
    }

    #[async_trait]
    impl CommandTransport for Recorder {
        async fn acknowledge(&self, _event: &CommandEvent) -> Result<(), SlackError> {
            Ok(())
        }

        async fn reply(&self, _event: &CommandEvent, reply: &Reply) -> Result<(), SlackError> {
            self.replies.lock().unwrap().push(reply.clone());
            Ok(())
        }
    }

    impl Recorder {
        fn texts(&self) -> Vec<String> {
            self.replies.lock().unwrap().iter().map(Reply::text).collect()
        }
    }

    struct Sleepy;

    #[async_trait]
    impl CommandHandler for Sleepy {
        fn command(&self) -> &str {
            "/sleepy"
        }

        async fn execute(&self, _event: &CommandEvent) -> Result<Reply, CommandError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Reply::ephemeral("too late"))
        }
    }

    struct Panicky;

    #[async_trait]
    impl CommandHandler for Panicky {
        fn command(&self) -> &str {
            "/panicky"
        }

        async fn execute(&self, _event: &CommandEvent) -> Result<Reply, CommandError> {
            panic!("boom");
        }
    }

    fn dispatcher(transport: Arc<dyn CommandTransport>) -> Dispatcher {
        Dispatcher::new(
            vec![
                Arc::new(EchoHandler::new()),
                Arc::new(CalcHandler::new()),
                Arc::new(Sleepy),
                Arc::new(Panicky),
            ],
            transport,
            Duration::from_millis(100),
        )
    }

    #[tokio::test]
    async fn test_ack_precedes_reply() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();

        transport
            .expect_acknowledge()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        transport
            .expect_reply()
            .withf(|_, reply| reply.text() == "you said: hi")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let state = dispatcher(Arc::new(transport))
            .dispatch(test_event("/echo", "hi"))
            .await;
        assert_eq!(state, InvocationState::Replied);
    }

    #[tokio::test]
    async fn test_ack_failure_still_replies() {
        let mut transport = MockTransport::new();
        transport
            .expect_acknowledge()
            .times(1)
            .returning(|_| Err(SlackError::NotConnected));
        transport.expect_reply().times(1).returning(|_, _| Ok(()));

        let state = dispatcher(Arc::new(transport))
            .dispatch(test_event("/echo", "hi"))
            .await;
        assert_eq!(state, InvocationState::Replied);
    }

    #[tokio::test]
    async fn test_reply_failure_is_reported() {
        let mut transport = MockTransport::new();
        transport.expect_acknowledge().returning(|_| Ok(()));
        transport
            .expect_reply()
            .times(1)
            .returning(|_, _| Err(SlackError::SendFailed("410 Gone".into())));

        let state = dispatcher(Arc::new(transport))
            .dispatch(test_event("/echo", "hi"))
            .await;
        assert_eq!(state, InvocationState::FailedReplied);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let recorder = Arc::new(Recorder::default());
        let state = dispatcher(recorder.clone())
            .dispatch(test_event("/nope", ""))
            .await;

        assert_eq!(state, InvocationState::FailedReplied);
        assert_eq!(recorder.texts(), vec!["Unknown command `/nope`. Try `/help`."]);
        assert_eq!(
            recorder.replies.lock().unwrap()[0].visibility,
            Visibility::Ephemeral
        );
    }

    #[tokio::test]
    async fn test_handler_error_becomes_reply() {
        let recorder = Arc::new(Recorder::default());
        let state = dispatcher(recorder.clone())
            .dispatch(test_event("/calc", "__import__('os')"))
            .await;

        assert_eq!(state, InvocationState::FailedReplied);
        assert_eq!(recorder.texts(), vec![CALC_HELP]);
    }

    #[tokio::test]
    async fn test_handler_timeout() {
        let recorder = Arc::new(Recorder::default());
        let state = dispatcher(recorder.clone())
            .dispatch(test_event("/sleepy", ""))
            .await;

        assert_eq!(state, InvocationState::FailedReplied);
        assert_eq!(recorder.texts(), vec![APOLOGY]);
    }

    #[tokio::test]
    async fn test_handler_panic_is_contained() {
        let recorder = Arc::new(Recorder::default());
        let state = dispatcher(recorder.clone())
            .dispatch(test_event("/panicky", ""))
            .await;

        assert_eq!(state, InvocationState::FailedReplied);
        assert_eq!(recorder.texts(), vec![APOLOGY]);
    }

    #[tokio::test]
    async fn test_success_reply_visibility() {
        let recorder = Arc::new(Recorder::default());
        let state = dispatcher(recorder.clone())
            .dispatch(test_event("/calc", "2+2*3"))
            .await;

        assert_eq!(state, InvocationState::Replied);
        let replies = recorder.replies.lock().unwrap();
        assert_eq!(replies[0].visibility, Visibility::InChannel);
        assert_eq!(replies[0].text(), "🧮 `2+2*3` = *8*");
    }

    #[test]
    fn test_commands_listing() {
        let d = dispatcher(Arc::new(Recorder::default()));
        assert_eq!(d.commands(), vec!["/calc", "/echo", "/panicky", "/sleepy"]);
    }
}
