use std::collections::VecDeque;

const MAX_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Messages shown in the status line, newest last. Errors stay until the next
/// successful action clears them or the user dismisses them.
#[derive(Debug, Default)]
pub struct Notices {
    items: VecDeque<Notice>,
}

impl Notices {
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.push(NoticeLevel::Error, message);
    }

    /// A successful action supersedes earlier failures.
    pub fn success(&mut self, message: impl Into<String>) {
        self.clear_errors();
        self.info(message);
    }

    pub fn clear_errors(&mut self) {
        self.items.retain(|n| n.level != NoticeLevel::Error);
    }

    /// Drop the newest notice.
    pub fn dismiss(&mut self) -> bool {
        self.items.pop_back().is_some()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.back()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|n| n.level == NoticeLevel::Error)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    fn push(&mut self, level: NoticeLevel, message: String) {
        if self.items.len() == MAX_NOTICES {
            self.items.pop_front();
        }
        self.items.push_back(Notice { level, message });
    }
}
