// crates/molt-migrate/src/engine.rs
//
// The per-record, per-shard migration state machine.
//
// For every shard: invoke store/add, interpret the receipt status, move
// bytes only when the destination asks, and emit one provenance entry.
// After all of a record's shards succeed: invoke upload/add and emit the
// upload entry. Records are processed one at a time, shards in export
// order; every failure is fatal and leaves the emitted log prefix as the
// resumption checkpoint.

use std::io::Write;

use chrono::Utc;
use serde::Serialize;
use tokio::io::AsyncBufRead;

use molt_core::{
    ByteTransport, Invocation, MoltError, ProvenanceEntry, ReceiptOut, ReceiptSummary, ShardAdd,
    SpaceDid, StoreAddOk, StoreClient, TransferRequest, TransferResponse, TransferSummary,
    UploadAddNb, UploadRecord,
};

use crate::emit::ProvenanceWriter;
use crate::parser::RecordReader;
use crate::plan;

/// Per-record outcome collected for the end-of-run summary.
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    /// Root content identifier of the migrated upload.
    pub root: String,
    /// Number of shards registered.
    pub shards: usize,
    /// Number of shards whose bytes were actually transferred.
    pub transferred: usize,
}

/// Everything the run accomplished, for diagnostics only. The durable
/// record of the run is the provenance stream, not this.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    pub records: Vec<RecordOutcome>,
}

impl MigrationReport {
    pub fn total_shards(&self) -> usize {
        self.records.iter().map(|r| r.shards).sum()
    }

    pub fn total_transferred(&self) -> usize {
        self.records.iter().map(|r| r.transferred).sum()
    }
}

/// Drives the migration: parser -> planner -> shard registration ->
/// upload finalization, emitting provenance inline after every completed
/// action.
pub struct Migrator<'a, S, T, W: Write> {
    store: &'a S,
    transport: &'a T,
    issuer: String,
    space: SpaceDid,
    gateway: String,
    out: ProvenanceWriter<W>,
}

impl<'a, S, T, W> Migrator<'a, S, T, W>
where
    S: StoreClient,
    T: ByteTransport,
    W: Write,
{
    pub fn new(
        store: &'a S,
        transport: &'a T,
        issuer: String,
        space: SpaceDid,
        gateway: String,
        out: W,
    ) -> Self {
        Self {
            store,
            transport,
            issuer,
            space,
            gateway,
            out: ProvenanceWriter::new(out),
        }
    }

    /// Migrate every record on the input, strictly sequentially.
    pub async fn run<R>(
        &mut self,
        records: &mut RecordReader<R>,
    ) -> Result<MigrationReport, MoltError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut report = MigrationReport::default();
        while let Some(record) = records.next_record().await? {
            let outcome = self.migrate_record(&record).await?;
            report.records.push(outcome);
        }
        Ok(report)
    }

    async fn migrate_record(&mut self, record: &UploadRecord) -> Result<RecordOutcome, MoltError> {
        tracing::info!(
            "migrating upload {} ({} shard(s))",
            record.cid,
            record.parts.len()
        );

        let mut transferred = 0;
        for add in plan::shard_adds(record, &self.gateway) {
            if self.register_shard(record, &add).await? {
                transferred += 1;
            }
        }

        self.finalize_upload(record).await?;

        Ok(RecordOutcome {
            root: record.cid.to_string(),
            shards: record.parts.len(),
            transferred,
        })
    }

    /// Register one shard with the destination, transferring its bytes if
    /// the receipt asks. Returns whether bytes were transferred.
    async fn register_shard(
        &mut self,
        record: &UploadRecord,
        add: &ShardAdd,
    ) -> Result<bool, MoltError> {
        let invocation = Invocation::store_add(&self.space, &add.nb())?;
        let receipt = self.store.store_add(&self.space, &add.link, add.size).await?;
        let summary = ReceiptSummary::of(&receipt)?;

        let ok = match &receipt.out {
            ReceiptOut::Ok(ok) => ok.clone(),
            ReceiptOut::Error(_) => {
                return Err(MoltError::Registration {
                    request: add.clone(),
                    space: self.space.clone(),
                    receipt: summary,
                });
            }
        };

        let sent_car_to = match ok.status.as_str() {
            "done" => {
                tracing::info!("shard {} already present in destination", add.link);
                None
            }
            "upload" => Some(self.transfer_shard(add, &ok).await?),
            other => {
                tracing::warn!("store/add receipt for {} carried status {:?}", add.link, other);
                return Err(MoltError::UnexpectedStatus {
                    link: add.link.clone(),
                    status: other.to_string(),
                });
            }
        };

        let transferred = sent_car_to.is_some();
        self.emit(record, add.link.as_str(), invocation, summary, sent_car_to)?;
        Ok(transferred)
    }

    /// Move shard bytes from the source gateway to the destination-provided
    /// URL, streaming, with the receipt's headers verbatim.
    async fn transfer_shard(
        &self,
        add: &ShardAdd,
        ok: &StoreAddOk,
    ) -> Result<TransferSummary, MoltError> {
        let url = ok.url.clone().ok_or_else(|| MoltError::UnexpectedStatus {
            link: add.link.clone(),
            status: "upload (receipt carried no url)".to_string(),
        })?;
        let headers = ok.headers.clone().unwrap_or_default();

        let source = self.transport.fetch(&add.part_url).await?;
        if source.status != 200 {
            return Err(MoltError::Fetch {
                url: add.part_url.clone(),
                status: source.status,
            });
        }
        if let Some(length) = source.content_length {
            tracing::info!("shard {} has content-length {}", add.link, length);
        }

        tracing::info!("piping shard bytes from {} to {}", add.part_url, url);
        let request = TransferRequest {
            url: url.clone(),
            method: "PUT".to_string(),
            headers: headers.clone(),
        };
        let status = self.transport.transfer(&url, &headers, source).await?;
        if !(200..300).contains(&status) {
            tracing::warn!("shard delivery to {} returned status {}", url, status);
            return Err(MoltError::Transfer { request, status });
        }

        Ok(TransferSummary {
            request,
            response: TransferResponse { status },
        })
    }

    /// Register the logical upload once every shard of the record has a
    /// successful receipt.
    async fn finalize_upload(&mut self, record: &UploadRecord) -> Result<(), MoltError> {
        let nb = UploadAddNb {
            root: record.cid.clone(),
            shards: record.parts.clone(),
        };
        let invocation = Invocation::upload_add(&self.space, &nb)?;
        let receipt = self
            .store
            .upload_add(&self.space, &record.cid, &record.parts)
            .await?;
        let summary = ReceiptSummary::of(&receipt)?;

        if let ReceiptOut::Error(_) = &receipt.out {
            return Err(MoltError::Finalization {
                root: record.cid.clone(),
                space: self.space.clone(),
                receipt: summary,
            });
        }

        tracing::info!("registered upload {} against {}", record.cid, self.space);
        self.emit(record, record.cid.as_str(), invocation, summary, None)
    }

    fn emit(
        &mut self,
        record: &UploadRecord,
        object: &str,
        invocation: Invocation,
        receipt: ReceiptSummary,
        sent_car_to: Option<TransferSummary>,
    ) -> Result<(), MoltError> {
        let entry = ProvenanceEntry {
            kind: "Add".to_string(),
            attributed_to: self.issuer.clone(),
            source: record.summary(),
            object: object.to_string(),
            target: self.space.clone(),
            invocation,
            receipt,
            at: Utc::now(),
            sent_car_to,
        };
        self.out.emit(&entry)
    }

    /// Recover the output writer (used by tests to inspect the log).
    pub fn into_output(self) -> W {
        self.out.into_inner()
    }
}
