//! In-memory fakes for the storage and chat-platform ports

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tally_core::{
    AwardCursor, AwardRecord, AwardStore, ChannelMessage, ChatClient, DomainError, DomainResult,
    HistoryPage, MessageId, TeamInstallation, TeamStore, UserId,
};

/// Build a history page from messages (newest-first, as the platform sends
/// them) and an optional continuation cursor
pub fn page(messages: Vec<ChannelMessage>, next_cursor: Option<&str>) -> HistoryPage {
    HistoryPage {
        messages,
        next_cursor: next_cursor.map(ToString::to_string),
    }
}

// ============================================================================
// Chat client
// ============================================================================

/// A chat client that serves pre-scripted history pages in order and
/// records every request it sees.
#[derive(Default)]
pub struct ScriptedChatClient {
    pages: Mutex<VecDeque<DomainResult<HistoryPage>>>,
    permalink_failure: Mutex<Option<String>>,
    posted_ids: Mutex<VecDeque<MessageId>>,
    pub requested_cursors: Mutex<Vec<Option<String>>>,
    pub permalink_requests: Mutex<Vec<MessageId>>,
    pub posted_messages: Mutex<Vec<(String, String)>>,
}

impl ScriptedChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a history page
    pub fn push_page(&self, page: HistoryPage) {
        self.pages.lock().unwrap().push_back(Ok(page));
    }

    /// Queue a failing history page
    pub fn push_page_error(&self, reason: &str) {
        self.pages
            .lock()
            .unwrap()
            .push_back(Err(DomainError::ApiError(reason.to_string())));
    }

    /// Make every permalink request fail with the given reason
    pub fn fail_permalinks(&self, reason: &str) {
        *self.permalink_failure.lock().unwrap() = Some(reason.to_string());
    }

    /// Queue the id the next `post_message` call returns
    pub fn push_posted_id(&self, id: MessageId) {
        self.posted_ids.lock().unwrap().push_back(id);
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn fetch_history(
        &self,
        _channel: &str,
        _oldest: &MessageId,
        _inclusive: bool,
        cursor: Option<&str>,
    ) -> DomainResult<HistoryPage> {
        self.requested_cursors
            .lock()
            .unwrap()
            .push(cursor.map(ToString::to_string));

        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DomainError::ApiError("no more scripted pages".to_string())))
    }

    async fn get_permalink(&self, channel: &str, message_id: &MessageId) -> DomainResult<String> {
        if let Some(reason) = self.permalink_failure.lock().unwrap().clone() {
            return Err(DomainError::ApiError(reason));
        }

        self.permalink_requests
            .lock()
            .unwrap()
            .push(message_id.clone());

        Ok(format!(
            "https://x.slack.com/archives/{channel}/p{}",
            message_id.permalink_digits()
        ))
    }

    async fn post_message(&self, channel: &str, text: &str) -> DomainResult<MessageId> {
        self.posted_messages
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));

        self.posted_ids
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| DomainError::ApiError("no scripted post id".to_string()))
    }
}

// ============================================================================
// Team store
// ============================================================================

#[derive(Default)]
struct TeamState {
    installations: HashMap<String, TeamInstallation>,
    boundaries: HashMap<String, MessageId>,
}

/// In-memory TeamStore
#[derive(Default)]
pub struct InMemoryTeamStore {
    state: Mutex<TeamState>,
}

impl InMemoryTeamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: register an installed team with a bot user
    pub fn with_team(self, team_id: &str, bot_user_id: &str) -> Self {
        self.state.lock().unwrap().installations.insert(
            team_id.to_string(),
            TeamInstallation {
                team_id: team_id.to_string(),
                team_name: "Test Team".to_string(),
                channel: "#general".to_string(),
                channel_id: "C1".to_string(),
                access_token: "xoxb-test".to_string(),
                bot_user_id: bot_user_id.to_string(),
            },
        );
        self
    }

    /// Convenience: seed a saved divider
    pub fn with_boundary(self, team_id: &str, id: MessageId) -> Self {
        self.state
            .lock()
            .unwrap()
            .boundaries
            .insert(team_id.to_string(), id);
        self
    }
}

#[async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn save_installation(&self, installation: &TeamInstallation) -> DomainResult<()> {
        self.state
            .lock()
            .unwrap()
            .installations
            .insert(installation.team_id.clone(), installation.clone());
        Ok(())
    }

    async fn get_access_token(&self, team_id: &str) -> DomainResult<Option<String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .installations
            .get(team_id)
            .map(|i| i.access_token.clone()))
    }

    async fn get_bot_user_id(&self, team_id: &str) -> DomainResult<Option<UserId>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .installations
            .get(team_id)
            .map(|i| i.bot_user_id.clone()))
    }

    async fn save_boundary(&self, team_id: &str, id: &MessageId) -> DomainResult<()> {
        self.state
            .lock()
            .unwrap()
            .boundaries
            .insert(team_id.to_string(), id.clone());
        Ok(())
    }

    async fn get_saved_boundary(&self, team_id: &str) -> DomainResult<Option<MessageId>> {
        Ok(self.state.lock().unwrap().boundaries.get(team_id).cloned())
    }
}

// ============================================================================
// Award store
// ============================================================================

/// In-memory AwardStore whose cursors count their own closes, so tests can
/// assert the aggregator's scoped-acquisition contract.
#[derive(Default)]
pub struct InMemoryAwardStore {
    records: Mutex<Vec<AwardRecord>>,
    fail_after: Mutex<Option<usize>>,
    cursors_opened: AtomicUsize,
    cursors_closed: Arc<AtomicUsize>,
}

impl InMemoryAwardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored award record
    pub fn with_record(self, record: AwardRecord) -> Self {
        self.records.lock().unwrap().push(record);
        self
    }

    /// Make cursors fail after yielding `count` records
    pub fn fail_after(&self, count: usize) {
        *self.fail_after.lock().unwrap() = Some(count);
    }

    pub fn saved_records(&self) -> Vec<AwardRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn cursors_opened(&self) -> usize {
        self.cursors_opened.load(Ordering::SeqCst)
    }

    pub fn cursors_closed(&self) -> usize {
        self.cursors_closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AwardStore for InMemoryAwardStore {
    async fn save_award_record(&self, record: &AwardRecord) -> DomainResult<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn stream_award_records(&self, team_id: &str) -> DomainResult<Box<dyn AwardCursor>> {
        self.cursors_opened.fetch_add(1, Ordering::SeqCst);

        let records: Vec<AwardRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.team_id == team_id)
            .cloned()
            .collect();

        Ok(Box::new(InMemoryAwardCursor {
            records: records.into(),
            fail_after: *self.fail_after.lock().unwrap(),
            yielded: 0,
            closed: false,
            closed_counter: self.cursors_closed.clone(),
        }))
    }
}

struct InMemoryAwardCursor {
    records: VecDeque<AwardRecord>,
    fail_after: Option<usize>,
    yielded: usize,
    closed: bool,
    closed_counter: Arc<AtomicUsize>,
}

#[async_trait]
impl AwardCursor for InMemoryAwardCursor {
    async fn next(&mut self) -> DomainResult<Option<AwardRecord>> {
        if self.closed {
            return Err(DomainError::StorageError(
                "cursor read after close".to_string(),
            ));
        }

        if let Some(limit) = self.fail_after {
            if self.yielded >= limit {
                return Err(DomainError::StorageError(
                    "scripted cursor failure".to_string(),
                ));
            }
        }

        self.yielded += 1;
        Ok(self.records.pop_front())
    }

    async fn close(mut self: Box<Self>) -> DomainResult<()> {
        self.closed = true;
        self.closed_counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
