//! In-memory store with the same contract as the hosted one. Tests drive
//! it directly; `fail_inserts` simulates a flaky remote.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use lovewall_shared::{NewReply, NewResponse, ReplyRow, ResponseRow};

use crate::error::{EngineError, EngineResult};

use super::RemoteStore;

#[derive(Default)]
pub struct MemoryStore {
    responses: Mutex<Vec<ResponseRow>>,
    replies: Mutex<Vec<ReplyRow>>,
    next_id: AtomicI64,
    fail_inserts: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore {
            next_id: AtomicI64::new(1),
            ..MemoryStore::default()
        }
    }

    /// Make every insert fail until switched back; reads keep working.
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Seed a row as if another client had inserted it.
    pub fn push_response(&self, username: &str, question: &str, answer: &str) -> ResponseRow {
        let row = ResponseRow {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: username.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            created_at: Utc::now(),
            likes: Some(0),
        };
        self.responses.lock().unwrap().insert(0, row.clone());
        row
    }

    pub fn set_likes(&self, id: i64, likes: i64) {
        let mut rows = self.responses.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.id == id) {
            row.likes = Some(likes);
        }
    }

    fn check_up(&self) -> EngineResult<()> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            Err(EngineError::RemoteRejected("injected failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn recent_responses(&self, limit: usize) -> EngineResult<Vec<ResponseRow>> {
        let rows = self.responses.lock().unwrap();
        Ok(rows.iter().take(limit).cloned().collect())
    }

    async fn insert_response(&self, new: &NewResponse) -> EngineResult<ResponseRow> {
        self.check_up()?;
        Ok(self.push_response(&new.username, &new.question, &new.answer))
    }

    async fn recent_replies(&self, limit: usize) -> EngineResult<Vec<ReplyRow>> {
        let rows = self.replies.lock().unwrap();
        Ok(rows.iter().take(limit).cloned().collect())
    }

    async fn insert_reply(&self, new: &NewReply) -> EngineResult<ReplyRow> {
        self.check_up()?;
        let row = ReplyRow {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            post_id: new.post_id,
            username: new.username.clone(),
            content: new.content.clone(),
            created_at: Utc::now(),
        };
        self.replies.lock().unwrap().insert(0, row.clone());
        Ok(row)
    }
}
