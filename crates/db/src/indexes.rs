use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        "users",
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index_unique(bson::doc! { "username": 1 }),
        ],
    )
    .await?;

    // Questions
    create_indexes(
        db,
        "questions",
        vec![
            index(bson::doc! { "creator_id": 1 }),
            index(bson::doc! { "category": 1 }),
        ],
    )
    .await?;

    // Attempts
    create_indexes(
        db,
        "attempts",
        vec![
            index(bson::doc! { "user_id": 1, "created_at": -1 }),
            index(bson::doc! { "score": 1 }),
        ],
    )
    .await?;

    // Friendships — pair lookups run in both directions
    create_indexes(
        db,
        "friendships",
        vec![
            index_unique(bson::doc! { "requester_id": 1, "recipient_id": 1 }),
            index(bson::doc! { "recipient_id": 1, "status": 1 }),
        ],
    )
    .await?;

    info!("MongoDB indexes ensured");
    Ok(())
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}
