// crates/molt-migrate/tests/pipeline.rs
//
// End-to-end pipeline tests over scripted collaborators: whole NDJSON
// streams in, whole provenance logs out. Exercises the public API only
// (RecordReader + Migrator + the molt-core traits).

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use tokio::io::BufReader;

use molt_core::{
    ByteStream, ByteTransport, Cid, MoltError, Receipt, ReceiptOut, SpaceDid, StoreAddOk,
    StoreClient,
};
use molt_migrate::{MigrationReport, Migrator, RecordReader};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// StoreClient that answers every store/add with the same kind of receipt.
struct UniformStore {
    mode: StoreMode,
    counter: Mutex<u64>,
}

enum StoreMode {
    /// Everything is already present in the destination.
    AllDone,
    /// Every shard needs its bytes uploaded to the given URL.
    AllUpload {
        url: String,
        headers: BTreeMap<String, String>,
    },
}

impl UniformStore {
    fn all_done() -> Self {
        Self {
            mode: StoreMode::AllDone,
            counter: Mutex::new(0),
        }
    }

    fn all_upload(url: &str, headers: BTreeMap<String, String>) -> Self {
        Self {
            mode: StoreMode::AllUpload {
                url: url.to_string(),
                headers,
            },
            counter: Mutex::new(0),
        }
    }

    fn next_id(&self) -> String {
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        format!("rcpt-{}", counter)
    }
}

#[async_trait]
impl StoreClient for UniformStore {
    async fn store_add(
        &self,
        _space: &SpaceDid,
        _link: &Cid,
        _size: u64,
    ) -> Result<Receipt<StoreAddOk>, MoltError> {
        let ok = match &self.mode {
            StoreMode::AllDone => StoreAddOk {
                status: "done".to_string(),
                url: None,
                headers: None,
            },
            StoreMode::AllUpload { url, headers } => StoreAddOk {
                status: "upload".to_string(),
                url: Some(url.clone()),
                headers: Some(headers.clone()),
            },
        };
        Ok(Receipt {
            id: self.next_id(),
            out: ReceiptOut::Ok(ok),
        })
    }

    async fn upload_add(
        &self,
        _space: &SpaceDid,
        _root: &Cid,
        _shards: &[Cid],
    ) -> Result<Receipt<Value>, MoltError> {
        Ok(Receipt {
            id: self.next_id(),
            out: ReceiptOut::Ok(json!({})),
        })
    }
}

/// ByteTransport with fixed fetch/put statuses and a fixed body.
struct FixedTransport {
    fetch_status: u16,
    put_status: u16,
    transfers: Mutex<Vec<String>>,
}

impl FixedTransport {
    fn new(fetch_status: u16, put_status: u16) -> Self {
        Self {
            fetch_status,
            put_status,
            transfers: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ByteTransport for FixedTransport {
    async fn fetch(&self, _url: &str) -> Result<ByteStream, MoltError> {
        let chunks: Vec<Result<Bytes, MoltError>> = vec![Ok(Bytes::from_static(b"car"))];
        Ok(ByteStream {
            status: self.fetch_status,
            content_length: Some(3),
            body: Box::pin(futures::stream::iter(chunks)),
        })
    }

    async fn transfer(
        &self,
        url: &str,
        _headers: &BTreeMap<String, String>,
        mut body: ByteStream,
    ) -> Result<u16, MoltError> {
        use futures::StreamExt;
        while let Some(chunk) = body.body.next().await {
            chunk?;
        }
        self.transfers.lock().unwrap().push(url.to_string());
        Ok(self.put_status)
    }
}

async fn migrate<S: StoreClient, T: ByteTransport>(
    store: &S,
    transport: &T,
    input: &str,
) -> (Result<MigrationReport, MoltError>, Vec<Value>) {
    let space = SpaceDid::parse("did:key:z6MkSpace").unwrap();
    let mut migrator = Migrator::new(
        store,
        transport,
        "did:key:z6MkAgent".to_string(),
        space,
        "https://w3s.link/ipfs".to_string(),
        Vec::new(),
    );
    let mut records = RecordReader::new(BufReader::new(input.as_bytes()));
    let result = migrator.run(&mut records).await;
    let output = migrator.into_output();
    let entries = serde_json::Deserializer::from_slice(&output)
        .into_iter::<Value>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    (result, entries)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn done_record_emits_shard_add_then_upload_add() {
    let store = UniformStore::all_done();
    let transport = FixedTransport::new(200, 200);

    let input = "{\"cid\":\"bafyroot\",\"parts\":[\"bafypart1\"]}\n";
    let (result, entries) = migrate(&store, &transport, input).await;
    result.unwrap();

    assert_eq!(entries.len(), 2);

    let shard = &entries[0];
    assert_eq!(shard["type"], "Add");
    assert_eq!(shard["object"], "bafypart1");
    assert_eq!(shard["attributedTo"], "did:key:z6MkAgent");
    assert_eq!(shard["target"], "did:key:z6MkSpace");
    assert!(shard.get("sentCarTo").is_none());

    let upload = &entries[1];
    assert_eq!(upload["object"], "bafyroot");
    assert_eq!(upload["invocation"]["can"], "upload/add");
    assert_eq!(upload["invocation"]["nb"]["root"], "bafyroot");
    assert_eq!(upload["invocation"]["nb"]["shards"], json!(["bafypart1"]));
    assert!(transport.transfers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upload_record_transfers_and_logs_the_transfer() {
    let headers = BTreeMap::from([("content-length".to_string(), "3".to_string())]);
    let store = UniformStore::all_upload("https://dest/x", headers);
    let transport = FixedTransport::new(200, 200);

    let input = "{\"cid\":\"bafyroot\",\"parts\":[\"bafypart1\"]}\n";
    let (result, entries) = migrate(&store, &transport, input).await;
    let report = result.unwrap();

    assert_eq!(report.total_transferred(), 1);
    assert_eq!(
        transport.transfers.lock().unwrap().as_slice(),
        ["https://dest/x"]
    );

    let shard = &entries[0];
    assert_eq!(shard["sentCarTo"]["request"]["url"], "https://dest/x");
    assert_eq!(
        shard["sentCarTo"]["request"]["headers"]["content-length"],
        "3"
    );
    assert_eq!(shard["sentCarTo"]["response"]["status"], 200);
}

#[tokio::test]
async fn rerun_against_fully_migrated_space_is_idempotent() {
    let input = "{\"cid\":\"bafyroota\",\"parts\":[\"bafypart1\",\"bafypart2\"]}\n\
                 {\"cid\":\"bafyrootb\",\"parts\":[\"bafypart3\"]}\n";

    let store = UniformStore::all_done();
    let transport = FixedTransport::new(200, 200);
    let (first, first_entries) = migrate(&store, &transport, input).await;
    first.unwrap();

    let store = UniformStore::all_done();
    let transport = FixedTransport::new(200, 200);
    let (second, second_entries) = migrate(&store, &transport, input).await;
    second.unwrap();

    // No byte transfers either time, and the same entry structure: one per
    // shard plus one per record.
    assert!(transport.transfers.lock().unwrap().is_empty());
    assert_eq!(first_entries.len(), 5);
    assert_eq!(second_entries.len(), 5);
    for (a, b) in first_entries.iter().zip(&second_entries) {
        assert_eq!(a["object"], b["object"]);
        assert_eq!(a["invocation"], b["invocation"]);
        assert!(a.get("sentCarTo").is_none());
    }
}

#[tokio::test]
async fn fetch_failure_leaves_only_the_completed_prefix() {
    let headers = BTreeMap::new();
    let store = UniformStore::all_upload("https://dest/x", headers);
    let transport = FixedTransport::new(404, 200);

    let input = "{\"cid\":\"bafyroot\",\"parts\":[\"bafypart1\"]}\n";
    let (result, entries) = migrate(&store, &transport, input).await;

    assert!(matches!(result, Err(MoltError::Fetch { status: 404, .. })));
    assert!(entries.is_empty());
}

#[tokio::test]
async fn malformed_line_stops_the_run_after_prior_records() {
    let store = UniformStore::all_done();
    let transport = FixedTransport::new(200, 200);

    let input = "{\"cid\":\"bafyroota\",\"parts\":[\"bafypart1\"]}\n{broken\n";
    let (result, entries) = migrate(&store, &transport, input).await;

    assert!(matches!(result, Err(MoltError::Parse { line: 2, .. })));
    // The first record's two entries were already emitted and stay valid.
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["object"], "bafypart1");
    assert_eq!(entries[1]["object"], "bafyroota");
}
