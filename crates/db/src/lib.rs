pub mod indexes;
pub mod models;

use mongodb::{Client, Database};

pub async fn connect(uri: &str, database: &str) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(uri).await?;
    Ok(client.database(database))
}
