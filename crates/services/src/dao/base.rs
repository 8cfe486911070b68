use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub type DaoResult<T> = Result<T, DaoError>;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("not found")]
    NotFound,
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("mongodb error: {0}")]
    Mongo(mongodb::error::Error),
    #[error("bson serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("bson deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
}

impl From<mongodb::error::Error> for DaoError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};
        if let ErrorKind::Write(WriteFailure::WriteError(we)) = &*err.kind {
            // 11000 = unique index violation
            if we.code == 11000 {
                return DaoError::DuplicateKey(we.message.clone());
            }
        }
        DaoError::Mongo(err)
    }
}

/// Thin generic wrapper over a typed MongoDB collection.
pub struct BaseDao<T: Send + Sync> {
    pub collection: Collection<T>,
}

impl<T: Send + Sync> Clone for BaseDao<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
        }
    }
}

impl<T> BaseDao<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + Unpin,
{
    pub fn new(db: &Database, collection: &str) -> Self {
        Self {
            collection: db.collection::<T>(collection),
        }
    }

    pub async fn insert_one(&self, doc: &T) -> DaoResult<ObjectId> {
        let result = self.collection.insert_one(doc).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DaoError::Validation("inserted _id was not an ObjectId".to_string()))
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DaoResult<T> {
        self.find_one(doc! { "_id": id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_one(&self, filter: Document) -> DaoResult<Option<T>> {
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn find_many(
        &self,
        filter: Document,
        sort: Option<Document>,
    ) -> DaoResult<Vec<T>> {
        let mut find = self.collection.find(filter);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }
        Ok(find.await?.try_collect().await?)
    }

    pub async fn find_page(
        &self,
        filter: Document,
        sort: Option<Document>,
        skip: u64,
        limit: i64,
    ) -> DaoResult<Vec<T>> {
        let mut find = self.collection.find(filter).skip(skip).limit(limit);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }
        Ok(find.await?.try_collect().await?)
    }

    pub async fn update_by_id(&self, id: ObjectId, update: Document) -> DaoResult<bool> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, update)
            .await?;
        Ok(result.matched_count > 0)
    }

    pub async fn delete_by_id(&self, id: ObjectId) -> DaoResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn count(&self, filter: Document) -> DaoResult<u64> {
        Ok(self.collection.count_documents(filter).await?)
    }
}
