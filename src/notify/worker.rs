//! Background thread for notification API calls.

use super::client::NotificationApi;
use super::error::Result;
use super::types::{ActionResponse, NotificationList};
use log::{debug, warn};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

/// One API call to run off the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Poll { manual: bool },
    MarkRead(i64),
    MarkAllRead,
    Delete(i64),
}

/// Outcome of a [`Command`], applied with `NotificationCenter::apply`.
#[derive(Debug)]
pub enum Reply {
    Listed {
        manual: bool,
        result: Result<NotificationList>,
    },
    MarkedRead {
        id: i64,
        result: Result<ActionResponse>,
    },
    MarkedAllRead(Result<ActionResponse>),
    Deleted {
        id: i64,
        result: Result<ActionResponse>,
    },
}

impl Command {
    pub fn run(self, api: &dyn NotificationApi) -> Reply {
        match self {
            Command::Poll { manual } => Reply::Listed {
                manual,
                result: api.list(),
            },
            Command::MarkRead(id) => Reply::MarkedRead {
                id,
                result: api.mark_read(id),
            },
            Command::MarkAllRead => Reply::MarkedAllRead(api.mark_all_read()),
            Command::Delete(id) => Reply::Deleted {
                id,
                result: api.delete(id),
            },
        }
    }
}

/// Owns the API on a worker thread; commands go in, replies come back.
pub struct NotificationWorker {
    commands: Sender<Command>,
    replies: Receiver<Reply>,
    pending: usize,
    polls: usize,
}

impl NotificationWorker {
    pub fn spawn(api: Box<dyn NotificationApi + Send>) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<Command>();
        let (reply_tx, reply_rx) = mpsc::channel();

        thread::spawn(move || {
            for command in command_rx {
                debug!("Running {:?}", command);
                if reply_tx.send(command.run(api.as_ref())).is_err() {
                    break;
                }
            }
            debug!("Notification worker exiting");
        });

        Self {
            commands: command_tx,
            replies: reply_rx,
            pending: 0,
            polls: 0,
        }
    }

    pub fn send(&mut self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("Notification worker stopped, dropping {:?}", command);
            return;
        }
        self.pending += 1;
        if matches!(command, Command::Poll { .. }) {
            self.polls += 1;
        }
    }

    /// Next reply, if one is ready. Never blocks.
    pub fn try_recv(&mut self) -> Option<Reply> {
        match self.replies.try_recv() {
            Ok(reply) => {
                self.pending = self.pending.saturating_sub(1);
                if matches!(reply, Reply::Listed { .. }) {
                    self.polls = self.polls.saturating_sub(1);
                }
                Some(reply)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.pending = 0;
                self.polls = 0;
                None
            }
        }
    }

    pub fn is_polling(&self) -> bool {
        self.polls > 0
    }

    pub fn is_idle(&self) -> bool {
        self.pending == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    struct EmptyApi;

    impl NotificationApi for EmptyApi {
        fn list(&self) -> Result<NotificationList> {
            Ok(NotificationList::default())
        }

        fn mark_read(&self, _id: i64) -> Result<ActionResponse> {
            Ok(ActionResponse::ok())
        }

        fn mark_all_read(&self) -> Result<ActionResponse> {
            Ok(ActionResponse::ok())
        }

        fn delete(&self, _id: i64) -> Result<ActionResponse> {
            Ok(ActionResponse::default())
        }
    }

    fn next(worker: &mut NotificationWorker) -> Reply {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(reply) = worker.try_recv() {
                return reply;
            }
            assert!(Instant::now() < deadline, "worker never replied");
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn replies_come_back_in_order() {
        let mut worker = NotificationWorker::spawn(Box::new(EmptyApi));
        worker.send(Command::Poll { manual: false });
        worker.send(Command::Delete(4));
        assert!(worker.is_polling());
        assert!(!worker.is_idle());

        assert!(matches!(next(&mut worker), Reply::Listed { manual: false, .. }));
        assert!(!worker.is_polling());
        match next(&mut worker) {
            Reply::Deleted { id, result } => {
                assert_eq!(id, 4);
                assert!(!result.unwrap().success);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(worker.is_idle());
        assert!(worker.try_recv().is_none());
    }
}
