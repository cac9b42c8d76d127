//! Integration tests for the MongoDB backend.
//!
//! These tests require a running MongoDB instance.
//! Run with: `docker run -d -p 27017:27017 mongo:7 && cargo test --features integration --test mongo_integration`

#![cfg(feature = "integration")]

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use mongodb::bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};
use serial_test::serial;
use uuid::Uuid;

use spalce_common::codec;
use spalce_common::config::MongoConfig;
use spalce_common::store::backends::mongo;
use spalce_common::{AppError, Database, DocumentRepository, Entity, Filter, Repository};

const TEST_DATABASE: &str = "spalce_integration";
const TEST_COLLECTION: &str = "appointments";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Appointment {
    #[serde(rename = "_id", with = "codec::uuid_string")]
    id: Uuid,
    patient: String,
    #[serde(with = "codec::datetime_offset_string")]
    scheduled_for: DateTime<FixedOffset>,
    #[serde(with = "codec::duration_string")]
    length: Duration,
}

impl Entity for Appointment {
    fn id(&self) -> Uuid {
        self.id
    }
}

fn appointment(patient: &str) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        patient: patient.to_string(),
        scheduled_for: FixedOffset::east_opt(13 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 7, 1, 8, 45, 0)
            .unwrap(),
        length: Duration::minutes(45),
    }
}

async fn database() -> mongodb::Database {
    let config = MongoConfig {
        host: std::env::var("MONGO_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: 27017,
    };
    let db = mongo::connect(&config, TEST_DATABASE)
        .await
        .expect("Failed to create MongoDB client");
    mongo::ping(&db).await.expect("MongoDB is not reachable");
    db
}

/// Drops the test collection so each test starts empty
async fn repository() -> (mongodb::Database, DocumentRepository<Appointment>) {
    let db = database().await;
    db.collection::<Document>(TEST_COLLECTION)
        .drop()
        .await
        .expect("Failed to drop test collection");

    let repo = DocumentRepository::new(Database::from(db.clone()).collection(TEST_COLLECTION));
    (db, repo)
}

// All tests run serially since they share one collection
#[serial]
mod mongo_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_all_on_empty_collection() {
        let (_, repo) = repository().await;
        let response = repo.get_all().await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.into_data(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_create_then_get_by_id() {
        let (_, repo) = repository().await;
        let item = appointment("Aroha");

        repo.create(item.clone()).await.unwrap();
        let found = repo.get_by_id(item.id).await.unwrap();

        assert!(found.is_success());
        assert_eq!(found.into_data(), Some(item));
    }

    #[tokio::test]
    async fn test_values_persist_as_strings() {
        let (db, repo) = repository().await;
        let item = appointment("Wiremu");
        repo.create(item.clone()).await.unwrap();

        let raw = db
            .collection::<Document>(TEST_COLLECTION)
            .find_one(doc! { "_id": item.id.to_string() })
            .await
            .unwrap()
            .expect("document stored under string _id");

        assert_eq!(
            raw.get("scheduled_for"),
            Some(&Bson::String("2024-07-01T08:45:00+13:00".to_string()))
        );
        assert_eq!(raw.get("length"), Some(&Bson::String("00:45:00".to_string())));
    }

    #[tokio::test]
    async fn test_update_missing_does_not_upsert() {
        let (_, repo) = repository().await;
        let response = repo.update(appointment("Mere")).await.unwrap();

        assert!(!response.is_success());
        assert_eq!(response.message, "Record not found");
        assert!(repo.get_all().await.unwrap().into_data().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (_, repo) = repository().await;
        let response = repo.delete(Uuid::new_v4()).await.unwrap();

        assert!(!response.is_success());
        assert_eq!(response.message, "Record not found");
    }

    #[tokio::test]
    async fn test_create_duplicate_propagates_driver_error() {
        let (_, repo) = repository().await;
        let item = appointment("Hemi");
        repo.create(item.clone()).await.unwrap();

        let err = repo.create(item).await.unwrap_err();
        assert!(matches!(err, AppError::Mongo(_)));
    }

    #[tokio::test]
    async fn test_create_many_conflict_is_captured() {
        let (_, repo) = repository().await;
        let existing = appointment("Tama");
        repo.create(existing.clone()).await.unwrap();

        let response = repo.create_many(vec![existing]).await;

        assert!(!response.is_success());
        assert_eq!(response.errors().len(), 1);
        assert!(response.data().is_none());
    }

    #[tokio::test]
    async fn test_update_many_and_delete_many() {
        let (_, repo) = repository().await;
        let mut a = appointment("Ana");
        let mut b = appointment("Ben");
        let c = appointment("Cat");
        let created = repo.create_many(vec![a.clone(), b.clone(), c.clone()]).await;
        assert!(created.is_success());

        a.length = Duration::hours(1);
        b.length = Duration::hours(2);
        let updated = repo
            .update_many(vec![a.clone(), b.clone(), appointment("Dan")])
            .await;
        assert_eq!(
            updated.message,
            "2 records updated successfully and 1 records failed to update"
        );

        let long = repo
            .get_all_where(Filter::is_in("length", ["01:00:00", "02:00:00"]))
            .await
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(long.len(), 2);

        let deleted = repo.delete_many(vec![a.id, b.id, Uuid::new_v4()]).await;
        assert_eq!(
            deleted.message,
            "2 records deleted successfully and 1 records failed to delete"
        );
        assert_eq!(repo.get_all().await.unwrap().into_data(), Some(vec![c]));
    }
}
