use std::time::Duration;

use bson::{doc, oid::ObjectId, DateTime, Document};
use futures::TryStreamExt;
use mongodb::{
    options::{ClientOptions, IndexOptions, ReturnDocument, ServerApi, ServerApiVersion},
    Client, Collection, Database, IndexModel,
};

use super::{Store, StoreError};
use crate::models::{
    community::PublicTripRow,
    review::Review,
    trip::{Trip, TripChanges},
    user::{User, UserProfile},
};

const USERS: &str = "users";
const TRIPS: &str = "trips";
const REVIEWS: &str = "reviews";

pub async fn create_mongo_client(uri: &str) -> Result<Client, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client.database("admin").run_command(doc! { "ping": 1 }).await {
        Ok(_) => log::info!("Connected to MongoDB and verified with ping"),
        Err(e) => log::warn!("Connected to MongoDB but ping failed: {}", e),
    }

    Ok(client)
}

/// MongoDB-backed store. Cheap to clone, the driver pools connections internally.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            db: client.database(database),
        }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    fn trips(&self) -> Collection<Trip> {
        self.db.collection(TRIPS)
    }

    fn reviews(&self) -> Collection<Review> {
        self.db.collection(REVIEWS)
    }

    /// Creates the unique and sort indexes the store relies on. Idempotent.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.users()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;
        self.reviews()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "userId": 1, "tripId": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;
        self.reviews()
            .create_index(IndexModel::builder().keys(doc! { "tripId": 1, "createdAt": -1 }).build())
            .await?;
        self.trips()
            .create_index(IndexModel::builder().keys(doc! { "userId": 1, "startDate": 1 }).build())
            .await?;
        self.trips()
            .create_index(IndexModel::builder().keys(doc! { "isPublic": 1, "createdAt": -1 }).build())
            .await?;

        Ok(())
    }
}

fn inserted_id(result: mongodb::results::InsertOneResult) -> Result<ObjectId, StoreError> {
    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| StoreError::Backend("inserted id is not an ObjectId".to_string()))
}

/// Feed pipeline: match, newest first, cap, then join the owner's profile
/// (name and image only) and the ratings of every review of the trip.
fn public_trips_pipeline(destination: Option<&str>, limit: i64) -> Vec<Document> {
    let mut filter = doc! { "isPublic": true };
    if let Some(destination) = destination {
        filter.insert(
            "destination",
            doc! { "$regex": regex::escape(destination), "$options": "i" },
        );
    }

    vec![
        doc! { "$match": filter },
        doc! { "$sort": { "createdAt": -1 } },
        doc! { "$limit": limit },
        doc! {
            "$lookup": {
                "from": USERS,
                "let": { "ownerId": "$userId" },
                "pipeline": [
                    { "$match": { "$expr": { "$eq": ["$_id", "$$ownerId"] } } },
                    { "$project": { "name": 1, "image": 1 } },
                ],
                "as": "owner",
            }
        },
        doc! { "$unwind": "$owner" },
        doc! {
            "$lookup": {
                "from": REVIEWS,
                "localField": "_id",
                "foreignField": "tripId",
                "as": "reviews",
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "trip": "$$ROOT",
                "owner": 1,
                "ratings": "$reviews.rating",
            }
        },
        doc! { "$project": { "trip.owner": 0, "trip.reviews": 0 } },
    ]
}

impl Store for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<ObjectId, StoreError> {
        inserted_id(self.users().insert_one(user).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn find_user_profiles(&self, ids: &[ObjectId]) -> Result<Vec<UserProfile>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .db
            .collection::<UserProfile>(USERS)
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .projection(doc! { "name": 1, "image": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_trip(&self, trip: &Trip) -> Result<ObjectId, StoreError> {
        inserted_id(self.trips().insert_one(trip).await?)
    }

    async fn find_trip(&self, id: &ObjectId) -> Result<Option<Trip>, StoreError> {
        Ok(self.trips().find_one(doc! { "_id": *id }).await?)
    }

    async fn find_trips_by_owner(&self, owner_id: &ObjectId) -> Result<Vec<Trip>, StoreError> {
        let cursor = self
            .trips()
            .find(doc! { "userId": *owner_id })
            .sort(doc! { "startDate": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_trip(
        &self,
        id: &ObjectId,
        owner_id: &ObjectId,
        changes: &TripChanges,
    ) -> Result<Option<Trip>, StoreError> {
        let mut set = bson::to_document(changes)?;
        set.insert("updatedAt", DateTime::now());

        Ok(self
            .trips()
            .find_one_and_update(doc! { "_id": *id, "userId": *owner_id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn find_public_trips(
        &self,
        destination: Option<&str>,
        limit: i64,
    ) -> Result<Vec<PublicTripRow>, StoreError> {
        let cursor = self
            .trips()
            .aggregate(public_trips_pipeline(destination, limit))
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        documents
            .into_iter()
            .map(|document| bson::from_document(document).map_err(StoreError::from))
            .collect()
    }

    async fn insert_review(&self, review: &Review) -> Result<ObjectId, StoreError> {
        inserted_id(self.reviews().insert_one(review).await?)
    }

    async fn find_review(
        &self,
        user_id: &ObjectId,
        trip_id: &ObjectId,
    ) -> Result<Option<Review>, StoreError> {
        Ok(self
            .reviews()
            .find_one(doc! { "userId": *user_id, "tripId": *trip_id })
            .await?)
    }

    async fn find_reviews_for_trip(&self, trip_id: &ObjectId) -> Result<Vec<Review>, StoreError> {
        let cursor = self
            .reviews()
            .find(doc! { "tripId": *trip_id })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }
}
