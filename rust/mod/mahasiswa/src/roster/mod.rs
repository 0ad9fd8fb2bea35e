//! Student roster retrieval and seeding.

pub mod firestore;
pub mod memory;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::ApiError;
use crate::error::RosterError;

pub use firestore::FirestoreRoster;
pub use memory::MemoryRoster;

/// Remote collection holding the roster.
pub const COLLECTION: &str = "mahasiswa";

/// Student record as stored remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mahasiswa {
    pub id: String,
    pub nim: String,
    pub nama: String,
    pub jurusan: String,
    pub email: String,
}

impl Mahasiswa {
    /// First character of the name, upper-cased. Empty names give `None`.
    pub fn avatar_initial(&self) -> Option<String> {
        self.nama.chars().next().map(|c| c.to_uppercase().collect())
    }
}

/// Fields of a record to insert; the id is assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMahasiswa {
    pub nim: String,
    pub nama: String,
    pub jurusan: String,
    pub email: String,
}

impl NewMahasiswa {
    pub fn new(nim: &str, nama: &str, jurusan: &str, email: &str) -> Self {
        Self {
            nim: nim.into(),
            nama: nama.into(),
            jurusan: jurusan.into(),
            email: email.into(),
        }
    }
}

/// The five canned records used to populate an empty roster.
pub fn sample_records() -> Vec<NewMahasiswa> {
    vec![
        NewMahasiswa::new("202101001", "Budi Santoso", "Teknik Informatika", "budi@example.com"),
        NewMahasiswa::new("202101002", "Siti Nurhaliza", "Sistem Informasi", "siti@example.com"),
        NewMahasiswa::new("202101003", "Ahmad Rizki", "Teknik Komputer", "ahmad@example.com"),
        NewMahasiswa::new("202101004", "Dewi Lestari", "Teknik Informatika", "dewi@example.com"),
        NewMahasiswa::new("202101005", "Eko Prasetyo", "Sistem Informasi", "eko@example.com"),
    ]
}

/// Remote data service for the roster collection.
#[async_trait::async_trait]
pub trait RosterService: Send + Sync + 'static {
    /// Every record, ordered by `nama` ascending using the service's collation.
    async fn list_ordered_by_name(&self) -> Result<Vec<Mahasiswa>, ApiError>;

    /// Insert one record, returning its assigned id.
    async fn insert(&self, record: &NewMahasiswa) -> Result<String, ApiError>;
}

/// Roster operations used by the list screen.
#[derive(Clone)]
pub struct Roster {
    service: Arc<dyn RosterService>,
}

impl Roster {
    pub fn new(service: Arc<dyn RosterService>) -> Self {
        Self { service }
    }

    /// Full roster ordered by name.
    pub async fn list(&self) -> Result<Vec<Mahasiswa>, RosterError> {
        let items = self
            .service
            .list_ordered_by_name()
            .await
            .map_err(RosterError::Fetch)?;
        tracing::debug!(count = items.len(), "roster loaded");
        Ok(items)
    }

    /// Re-issue the same query.
    pub async fn refresh(&self) -> Result<Vec<Mahasiswa>, RosterError> {
        tracing::debug!("roster refresh");
        self.list().await
    }

    /// Insert the canned records one by one. Stops at the first failure;
    /// records already inserted stay. Returns the number inserted.
    pub async fn seed_samples(&self) -> Result<usize, RosterError> {
        let records = sample_records();
        let total = records.len();
        for (inserted, record) in records.iter().enumerate() {
            match self.service.insert(record).await {
                Ok(id) => tracing::debug!(id = %id, nim = %record.nim, "sample inserted"),
                Err(source) => {
                    tracing::warn!(inserted, total, error = %source, "seeding stopped");
                    return Err(RosterError::Seed {
                        inserted,
                        total,
                        source,
                    });
                }
            }
        }
        tracing::info!(total, "sample records inserted");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[Mahasiswa]) -> Vec<&str> {
        items.iter().map(|m| m.nama.as_str()).collect()
    }

    #[test]
    fn avatar_initial_uppercases() {
        let m = Mahasiswa {
            nama: "eko Prasetyo".into(),
            ..Default::default()
        };
        assert_eq!(m.avatar_initial().as_deref(), Some("E"));
        assert_eq!(Mahasiswa::default().avatar_initial(), None);
    }

    #[tokio::test]
    async fn empty_then_seed_lists_five_sorted() {
        let roster = Roster::new(Arc::new(MemoryRoster::new()));
        assert!(roster.list().await.unwrap().is_empty());

        assert_eq!(roster.seed_samples().await.unwrap(), 5);

        let items = roster.refresh().await.unwrap();
        assert_eq!(
            names(&items),
            vec!["Ahmad Rizki", "Budi Santoso", "Dewi Lestari", "Eko Prasetyo", "Siti Nurhaliza"]
        );
        assert!(items.iter().all(|m| !m.id.is_empty()));
    }

    #[tokio::test]
    async fn seed_stops_at_first_failure() {
        let service = Arc::new(MemoryRoster::new());
        service.fail_inserts_after(2);
        let roster = Roster::new(service.clone());

        match roster.seed_samples().await {
            Err(RosterError::Seed { inserted, total, .. }) => {
                assert_eq!(inserted, 2);
                assert_eq!(total, 5);
            }
            other => panic!("expected seed error, got {:?}", other),
        }
        // Partial seeding is left in place.
        assert_eq!(names(&roster.list().await.unwrap()), vec!["Budi Santoso", "Siti Nurhaliza"]);
    }

    #[tokio::test]
    async fn list_failure_is_fetch_error() {
        let service = Arc::new(MemoryRoster::new());
        service.set_fail_list(true);
        let roster = Roster::new(service);
        assert!(matches!(roster.list().await, Err(RosterError::Fetch(_))));
    }
}
