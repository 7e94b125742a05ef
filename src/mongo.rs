use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection,
    bson::{Bson, Document, doc, to_document},
    options::{ClientOptions, ReadPreference, SelectionCriteria, ServerApi, ServerApiVersion},
};
use tokio::time::{Duration, timeout};
use tracing::info;

use crate::store::{StoreError, Student, StudentStore};

pub const DB_NAME: &str = "students";
pub const COLLECTION_NAME: &str = "theirdata";

const PING_TIMEOUT: Duration = Duration::from_secs(15);
const FIND_TIMEOUT: Duration = Duration::from_secs(10);
const INSERT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the client against the configured URI (Stable API V1), pings
/// the primary with a bounded timeout, and hands back the one collection
/// this service works against. Any failure here is fatal to startup:
/// the service must never accept traffic against an unreachable database.
pub async fn connect(uri: &str) -> Result<Collection<Document>> {
    let mut options = ClientOptions::parse(uri)
        .await
        .context("invalid MongoDB URI")?;
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());

    let client = Client::with_options(options).context("MongoDB connection error")?;

    let db = client.database(DB_NAME);
    let ping = db.run_command(
        doc! { "ping": 1 },
        SelectionCriteria::ReadPreference(ReadPreference::Primary),
    );
    timeout(PING_TIMEOUT, ping)
        .await
        .map_err(|_| anyhow!("MongoDB ping timed out"))?
        .context("MongoDB ping failed")?;

    info!("pinged the deployment, MongoDB connection is up");

    Ok(client.database(DB_NAME).collection(COLLECTION_NAME))
}

/// Mongo-backed [`StudentStore`]. Holds the collection handle for the
/// process lifetime; the driver manages its own connection pooling, so
/// no locking happens here. Each call runs under its own timeout scope.
pub struct MongoStudentStore {
    coll: Collection<Document>,
}

impl MongoStudentStore {
    pub fn new(coll: Collection<Document>) -> Self {
        Self { coll }
    }
}

#[async_trait]
impl StudentStore for MongoStudentStore {
    async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        let fetch = async {
            let mut cur = self
                .coll
                .find(doc! {}, None)
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;

            let mut out = vec![];
            while let Some(docu) = cur
                .try_next()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?
            {
                out.push(docu);
            }
            Ok::<Vec<Document>, StoreError>(out)
        };

        // One scope covering the query and the cursor drain.
        timeout(FIND_TIMEOUT, fetch)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
    }

    async fn insert_one(&self, student: &Student) -> Result<Bson, StoreError> {
        // Serializing the bound struct means only the two declared
        // fields reach the database.
        let docu = to_document(student).map_err(|e| StoreError::Insert(e.to_string()))?;

        let res = timeout(INSERT_TIMEOUT, self.coll.insert_one(docu, None))
            .await
            .map_err(|e| StoreError::Insert(e.to_string()))?
            .map_err(|e| StoreError::Insert(e.to_string()))?;

        Ok(res.inserted_id)
    }
}
