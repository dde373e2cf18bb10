use super::DebugFlowApp;
use super::store::{Action, AsyncAction};

impl DebugFlowApp {
    pub fn poll_channel_events(&mut self) -> bool {
        let mut any = false;
        while let Ok(event) = self.channel_rx.try_recv() {
            self.dispatch(Action::Async(AsyncAction::Channel(event)));
            any = true;
        }
        any
    }

    pub fn poll_action_messages(&mut self) -> bool {
        let mut any = false;
        while let Ok(action) = self.action_rx.try_recv() {
            self.dispatch(action);
            any = true;
        }
        any
    }

    /// Drains both queues without waiting.
    pub fn poll(&mut self) -> bool {
        let channel = self.poll_channel_events();
        let actions = self.poll_action_messages();
        channel || actions
    }

    /// Waits for the next channel event or runtime result and applies it.
    pub async fn process_next(&mut self) {
        tokio::select! {
            Some(event) = self.channel_rx.recv() => {
                self.dispatch(Action::Async(AsyncAction::Channel(event)));
            }
            Some(action) = self.action_rx.recv() => {
                self.dispatch(action);
            }
            else => {}
        }
    }
}
