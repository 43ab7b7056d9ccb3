//! Keyed chat histories with idle expiry and bounded size.
//!
//! Each user key maps to its own [`Conversation`] behind a dedicated mutex, so
//! requests for one key are serialised while different keys proceed in
//! parallel. The outer map lock is only held to look up, insert or evict
//! entries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use hysite_core::{ChatMessage, ChatRole};

/// Default idle time after which a conversation is forgotten.
pub const DEFAULT_CONVERSATION_TTL: Duration = Duration::from_secs(60 * 60);
/// Default cap on concurrently stored conversations.
pub const DEFAULT_MAX_CONVERSATIONS: usize = 1024;
/// Default cap on messages kept per conversation, including the seed.
pub const DEFAULT_MAX_MESSAGES: usize = 64;

/// Limits applied by a [`ConversationStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationStoreConfig {
    /// Idle time after which an entry is evicted.
    pub ttl: Duration,
    /// Maximum number of entries; the least recently used idle entry is
    /// evicted first. Entries held by a caller may push the store past it.
    pub max_conversations: usize,
    /// Maximum messages per conversation, or `None` for no cap.
    pub max_messages: Option<usize>,
}

impl Default for ConversationStoreConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CONVERSATION_TTL,
            max_conversations: DEFAULT_MAX_CONVERSATIONS,
            max_messages: Some(DEFAULT_MAX_MESSAGES),
        }
    }
}

impl ConversationStoreConfig {
    /// Override the idle TTL.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the entry cap.
    #[must_use]
    pub const fn with_max_conversations(mut self, max_conversations: usize) -> Self {
        self.max_conversations = max_conversations;
        self
    }

    /// Override the per-conversation message cap.
    #[must_use]
    pub const fn with_max_messages(mut self, max_messages: Option<usize>) -> Self {
        self.max_messages = max_messages;
        self
    }
}

/// An ordered chat history opened by a system message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    max_messages: Option<usize>,
}

impl Conversation {
    fn seeded(system_prompt: String, max_messages: Option<usize>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
            max_messages,
        }
    }

    /// Messages in order, starting with the system seed.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of stored messages, including the seed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Report whether the conversation holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message.
    ///
    /// The message cap is enforced when an assistant turn completes an
    /// exchange, so a pending user turn never displaces earlier history and
    /// [`Conversation::discard_pending_user`] restores the previous state.
    pub fn push(&mut self, message: ChatMessage) {
        let completes_exchange = message.role == ChatRole::Assistant;
        self.messages.push(message);
        if completes_exchange {
            self.trim();
        }
    }

    /// Remove the last message when it is an unanswered user turn.
    pub fn discard_pending_user(&mut self) -> Option<ChatMessage> {
        if self.messages.last().is_some_and(|m| m.role == ChatRole::User) {
            self.messages.pop()
        } else {
            None
        }
    }

    fn trim(&mut self) {
        let Some(limit) = self.max_messages else {
            return;
        };
        let cap = limit.max(2);
        if self.messages.len() <= cap {
            return;
        }
        let excess = self.messages.len() - cap;
        self.messages.drain(1..=excess);
        // Keep the history opening with a user turn after the seed.
        if self
            .messages
            .get(1)
            .is_some_and(|m| m.role == ChatRole::Assistant)
        {
            self.messages.remove(1);
        }
    }
}

#[derive(Debug)]
struct Entry {
    conversation: Arc<Mutex<Conversation>>,
    last_used: Instant,
}

impl Entry {
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.conversation) > 1
    }
}

/// Process-wide map from user key to conversation.
#[derive(Debug, Default)]
pub struct ConversationStore {
    config: ConversationStoreConfig,
    entries: Mutex<HashMap<String, Entry>>,
}

impl ConversationStore {
    /// Create an empty store with the given limits.
    #[must_use]
    pub fn new(config: ConversationStoreConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Limits applied by this store.
    #[must_use]
    pub const fn config(&self) -> &ConversationStoreConfig {
        &self.config
    }

    /// Fetch the conversation for `user_key`, seeding it on first use.
    ///
    /// `system_prompt` is only evaluated when a new conversation is created;
    /// an existing conversation keeps its original seed.
    pub fn conversation<F>(&self, user_key: &str, system_prompt: F) -> Arc<Mutex<Conversation>>
    where
        F: FnOnce() -> String,
    {
        self.conversation_at(user_key, system_prompt, Instant::now())
    }

    /// [`ConversationStore::conversation`] with an explicit clock reading.
    pub fn conversation_at<F>(
        &self,
        user_key: &str,
        system_prompt: F,
        now: Instant,
    ) -> Arc<Mutex<Conversation>>
    where
        F: FnOnce() -> String,
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        purge(&mut entries, self.config.ttl, now);

        if let Some(entry) = entries.get_mut(user_key) {
            entry.last_used = now;
            return Arc::clone(&entry.conversation);
        }

        while entries.len() >= self.config.max_conversations.max(1) {
            // Conversations still held by a caller stay so their key keeps
            // mapping to the same mutex.
            let Some(oldest) = entries
                .iter()
                .filter(|(_, entry)| !entry.in_use())
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            log::debug!("evicting least recently used conversation for {oldest}");
            entries.remove(&oldest);
        }

        let conversation = Arc::new(Mutex::new(Conversation::seeded(
            system_prompt(),
            self.config.max_messages,
        )));
        entries.insert(
            user_key.to_owned(),
            Entry {
                conversation: Arc::clone(&conversation),
                last_used: now,
            },
        );
        conversation
    }

    /// Evict conversations idle for at least the TTL; returns how many went.
    ///
    /// Conversations still held by a caller are kept.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    /// [`ConversationStore::purge_expired`] with an explicit clock reading.
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        purge(&mut entries, self.config.ttl, now)
    }

    /// Number of stored conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Report whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Report whether `user_key` has a stored conversation.
    #[must_use]
    pub fn contains(&self, user_key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(user_key)
    }
}

fn purge(entries: &mut HashMap<String, Entry>, ttl: Duration, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| {
        entry.in_use() || now.saturating_duration_since(entry.last_used) < ttl
    });
    let purged = before - entries.len();
    if purged > 0 {
        log::debug!("purged {purged} idle conversations");
    }
    purged
}
