use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::client::ApiError;
use crate::roster::{Mahasiswa, NewMahasiswa, RosterService};

/// In-process roster collection. Orders by byte-wise comparison of `nama`,
/// like the hosted service does for plain strings.
pub struct MemoryRoster {
    docs: RwLock<Vec<Mahasiswa>>,
    next_id: AtomicUsize,
    fail_list: AtomicBool,
    inserts_allowed: AtomicUsize,
    list_calls: AtomicUsize,
    list_delay_ms: AtomicU64,
}

impl Default for MemoryRoster {
    fn default() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
            next_id: AtomicUsize::new(0),
            fail_list: AtomicBool::new(false),
            inserts_allowed: AtomicUsize::new(usize::MAX),
            list_calls: AtomicUsize::new(0),
            list_delay_ms: AtomicU64::new(0),
        }
    }
}

impl MemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make list queries fail with a 503.
    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Accept `n` more inserts, then fail every following one.
    pub fn fail_inserts_after(&self, n: usize) {
        self.inserts_allowed.store(n, Ordering::SeqCst);
    }

    /// Hold every list query for `delay` before answering.
    pub fn set_list_delay(&self, delay: Duration) {
        self.list_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.docs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn unavailable() -> ApiError {
        ApiError::Server {
            status: 503,
            message: r#"{"error":{"code":503,"message":"The service is currently unavailable."}}"#
                .into(),
        }
    }
}

#[async_trait::async_trait]
impl RosterService for MemoryRoster {
    async fn list_ordered_by_name(&self) -> Result<Vec<Mahasiswa>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.list_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let mut items = self.docs.read().unwrap().clone();
        items.sort_by(|a, b| a.nama.as_bytes().cmp(b.nama.as_bytes()));
        Ok(items)
    }

    async fn insert(&self, record: &NewMahasiswa) -> Result<String, ApiError> {
        let allowed = self
            .inserts_allowed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if allowed.is_err() {
            return Err(Self::unavailable());
        }
        let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.docs.write().unwrap().push(Mahasiswa {
            id: id.clone(),
            nim: record.nim.clone(),
            nama: record.nama.clone(),
            jurusan: record.jurusan.clone(),
            email: record.email.clone(),
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn orders_by_bytes() {
        let roster = MemoryRoster::new();
        for nama in ["budi", "Siti", "Ahmad"] {
            roster
                .insert(&NewMahasiswa::new("1", nama, "TI", "x@example.com"))
                .await
                .unwrap();
        }
        let names: Vec<String> = roster
            .list_ordered_by_name()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.nama)
            .collect();
        // Upper-case sorts before lower-case.
        assert_eq!(names, vec!["Ahmad", "Siti", "budi"]);
        assert_eq!(roster.list_calls(), 1);
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let roster = MemoryRoster::new();
        let rec = NewMahasiswa::new("1", "Budi", "TI", "budi@example.com");
        let a = roster.insert(&rec).await.unwrap();
        let b = roster.insert(&rec).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(roster.len(), 2);
    }
}
