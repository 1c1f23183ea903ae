//! Collaborators the wizard reports to: navigation and user notices.
//!
//! The wizard never renders anything. It hands `Notice`s to a `Notifier`
//! and a single `TerminalSignal` to its `WizardHost` when the session ends.

use tokio::sync::mpsc;

use super::model::RestaurantApplication;

/// How a wizard session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalSignal {
    /// The application was submitted; carries the submitted snapshot.
    Submitted(RestaurantApplication),
    /// The user backed out of the first step.
    Exited,
}

/// What a notice button leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeAction {
    TrackApplication,
    GoHome,
    Dismiss,
}

/// A labelled notice button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeButton {
    pub label: &'static str,
    pub action: NoticeAction,
}

/// A user-facing message (alert dialog, toast, or terminal line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub buttons: Vec<NoticeButton>,
}

impl Notice {
    pub fn submitted() -> Self {
        Self {
            title: "Registration Submitted!".to_string(),
            body: "Your application has been submitted successfully. You will receive a confirmation email shortly.".to_string(),
            buttons: vec![
                NoticeButton {
                    label: "Track Application",
                    action: NoticeAction::TrackApplication,
                },
                NoticeButton {
                    label: "Go Home",
                    action: NoticeAction::GoHome,
                },
            ],
        }
    }

    pub fn submission_failed() -> Self {
        Self {
            title: "Error".to_string(),
            body: "Failed to submit registration. Please try again.".to_string(),
            buttons: vec![NoticeButton {
                label: "OK",
                action: NoticeAction::Dismiss,
            }],
        }
    }
}

/// Receives the terminal signal of a wizard session.
pub trait WizardHost: Send + Sync {
    fn on_terminal(&self, signal: TerminalSignal);
}

/// Receives user-facing notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Everything a host can observe, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Notice(Notice),
    Terminal(TerminalSignal),
}

/// Host and notifier that forwards every event into an mpsc channel.
///
/// Used by the terminal front end and by tests to observe the wizard.
#[derive(Clone)]
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<HostEvent>,
}

impl ChannelHost {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: HostEvent) {
        // Receiver gone means the host was torn down; nothing left to tell.
        if self.tx.send(event).is_err() {
            tracing::debug!("Host event dropped, receiver closed");
        }
    }
}

impl WizardHost for ChannelHost {
    fn on_terminal(&self, signal: TerminalSignal) {
        self.emit(HostEvent::Terminal(signal));
    }
}

impl Notifier for ChannelHost {
    fn notify(&self, notice: Notice) {
        self.emit(HostEvent::Notice(notice));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_host_forwards_in_order() {
        let (host, mut rx) = ChannelHost::new();
        host.notify(Notice::submission_failed());
        host.on_terminal(TerminalSignal::Exited);

        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::Notice(Notice::submission_failed())
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::Terminal(TerminalSignal::Exited)
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_receiver_is_ignored() {
        let (host, rx) = ChannelHost::new();
        drop(rx);
        host.on_terminal(TerminalSignal::Exited);
    }

    #[test]
    fn success_notice_offers_tracking() {
        let notice = Notice::submitted();
        assert_eq!(notice.title, "Registration Submitted!");
        assert_eq!(notice.buttons[0].action, NoticeAction::TrackApplication);
        assert_eq!(notice.buttons[1].label, "Go Home");
    }
}
