//! User-facing notification seam.
//!
//! The transfer client reports policy rejections and other user-visible
//! events through the [`Notify`] trait; the UI decides how notices are
//! rendered and dismissed. [`NoticeQueue`] is the in-memory implementation
//! the app drains from its render loop, and doubles as a recording sink in
//! tests.

use std::sync::Mutex;

/// The visual category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A sink for user-facing notices.
pub trait Notify: Send + Sync {
    fn notice(&self, level: NoticeLevel, message: &str);

    fn error(&self, message: &str) {
        self.notice(NoticeLevel::Error, message);
    }
}

/// A single queued notice.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// In-memory notice queue with monotonic ID assignment.
///
/// Interior-mutable so it can be shared as an `Arc<dyn Notify>` across
/// concurrent transfers. Display timing and dismissal are UI concerns.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    inner: Mutex<QueueInner>,
}

#[derive(Debug, Default)]
struct QueueInner {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns all queued notices, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        let mut inner = self.inner.lock().unwrap();
        std::mem::take(&mut inner.notices)
    }

    /// Number of queued notices.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().notices.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notify for NoticeQueue {
    fn notice(&self, level: NoticeLevel, message: &str) {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.notices.push(Notice {
            id,
            level,
            message: message.to_string(),
        });
    }
}

/// A sink that discards every notice, for headless callers and tests that
/// don't assert on notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotify;

impl Notify for SilentNotify {
    fn notice(&self, _level: NoticeLevel, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn notice_is_queued_with_level_and_message() {
        let queue = NoticeQueue::new();
        queue.notice(NoticeLevel::Error, "upload rejected");

        let notices = queue.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "upload rejected");
    }

    #[test]
    fn ids_are_monotonic_across_drains() {
        let queue = NoticeQueue::new();
        queue.error("first");
        queue.drain();
        queue.error("second");

        let notices = queue.drain();
        assert_eq!(notices[0].id, 1);
    }

    #[test]
    fn drain_empties_the_queue() {
        let queue = NoticeQueue::new();
        queue.notice(NoticeLevel::Info, "a");
        queue.notice(NoticeLevel::Warning, "b");

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain().len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn usable_as_shared_trait_object() {
        let queue = Arc::new(NoticeQueue::new());
        let sink: Arc<dyn Notify> = queue.clone();
        sink.error("shared");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn silent_sink_discards() {
        let sink = SilentNotify;
        sink.notice(NoticeLevel::Error, "nobody hears this");
    }

    #[test]
    fn concurrent_notices_are_not_lost() {
        use std::thread;

        let queue = Arc::new(NoticeQueue::new());
        let mut handles = vec![];
        for _ in 0..8 {
            let q = Arc::clone(&queue);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    q.error("x");
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(queue.len(), 800);
    }
}
