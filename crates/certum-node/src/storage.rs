//! RocksDB ledger for the Certum node.

use anyhow::Result;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Mutex;

use certum_core::{CertificateId, CertificateRecord, Identity, Mutation, Timestamp};
use certum_registry::{JournalEntry, Ledger, MutationRules, Receipt, RegistryError};

/// Column family names for different data types.
const CF_RECORDS: &str = "records";
const CF_JOURNAL: &str = "journal";
const CF_META: &str = "meta";

const META_AUTHORITY: &[u8] = b"authority";
const META_HEAD: &[u8] = b"head";
const META_LAST_COMMITTED_AT: &[u8] = b"last_committed_at";
const META_RECORD_COUNT: &[u8] = b"record_count";

/// RocksDB-backed [`Ledger`].
///
/// Records are keyed by the raw 32-byte identifier, journal entries by the
/// big-endian sequence number so iteration follows commit order. Each
/// mutation lands in a single `WriteBatch`.
pub struct RocksLedger {
    db: DB,
    writer: Mutex<()>,
}

impl RocksLedger {
    /// Open or create a ledger at `path` governed by `authority`.
    ///
    /// The authority is persisted on first open. Opening an existing ledger
    /// with a different authority fails.
    pub fn open(path: &Path, authority: &Identity) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_RECORDS, Options::default()),
            ColumnFamilyDescriptor::new(CF_JOURNAL, Options::default()),
            ColumnFamilyDescriptor::new(CF_META, Options::default()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;
        let ledger = Self {
            db,
            writer: Mutex::new(()),
        };

        match ledger.stored_authority()? {
            Some(stored) if stored != *authority => {
                anyhow::bail!(
                    "ledger at {} belongs to authority {}, not {}",
                    path.display(),
                    stored.to_hex(),
                    authority.to_hex()
                );
            }
            Some(_) => {}
            None => {
                let cf = ledger.cf(CF_META)?;
                ledger.db.put_cf(&cf, META_AUTHORITY, authority.as_bytes())?;
                tracing::info!(authority = %authority.to_hex(), "initialized ledger");
            }
        }

        Ok(ledger)
    }

    /// The authority this ledger was created for.
    pub fn stored_authority(&self) -> Result<Option<Identity>> {
        let cf = self.cf(CF_META)?;
        match self.db.get_cf(&cf, META_AUTHORITY)? {
            Some(bytes) => {
                let bytes: [u8; 32] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| anyhow::anyhow!("stored authority has invalid length"))?;
                Ok(Some(Identity::from_bytes(bytes)))
            }
            None => Ok(None),
        }
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", name))
    }

    fn read_u64(&self, key: &[u8]) -> Result<u64> {
        let cf = self.cf(CF_META)?;
        match self.db.get_cf(&cf, key)? {
            Some(bytes) => {
                let bytes: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| anyhow::anyhow!("corrupt counter"))?;
                Ok(u64::from_be_bytes(bytes))
            }
            None => Ok(0),
        }
    }

    fn read_record(&self, id: &CertificateId) -> Result<Option<CertificateRecord>> {
        let cf = self.cf(CF_RECORDS)?;
        match self.db.get_cf(&cf, id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn commit(&self, entry: &JournalEntry, record: Option<&CertificateRecord>) -> Result<()> {
        let records = self.cf(CF_RECORDS)?;
        let journal = self.cf(CF_JOURNAL)?;
        let meta = self.cf(CF_META)?;

        let mut batch = WriteBatch::default();
        if let Some(record) = record {
            batch.put_cf(&records, record.id.as_bytes(), serde_json::to_vec(record)?);
            if matches!(entry.mutation, Mutation::Issue(_)) {
                let count = self.read_u64(META_RECORD_COUNT)? + 1;
                batch.put_cf(&meta, META_RECORD_COUNT, count.to_be_bytes());
            }
        }
        batch.put_cf(
            &journal,
            entry.sequence.to_be_bytes(),
            serde_json::to_vec(entry)?,
        );
        batch.put_cf(&meta, META_HEAD, entry.sequence.to_be_bytes());
        batch.put_cf(&meta, META_LAST_COMMITTED_AT, entry.committed_at.to_be_bytes());

        self.db.write(batch)?;
        Ok(())
    }

    fn read_journal(&self, from: u64, limit: usize) -> Result<Vec<JournalEntry>> {
        let cf = self.cf(CF_JOURNAL)?;
        let start = from.max(1).to_be_bytes();
        let mut entries = Vec::new();
        for item in self
            .db
            .iterator_cf(&cf, IteratorMode::From(&start, Direction::Forward))
            .take(limit)
        {
            let (_, value) = item?;
            entries.push(serde_json::from_slice(&value)?);
        }
        Ok(entries)
    }
}

fn unavailable(err: anyhow::Error) -> RegistryError {
    tracing::error!(error = %err, "ledger operation failed");
    RegistryError::SubstrateUnavailable(err.to_string())
}

impl Ledger for RocksLedger {
    fn get(&self, id: &CertificateId) -> Result<Option<CertificateRecord>, RegistryError> {
        self.read_record(id).map_err(unavailable)
    }

    fn apply(
        &self,
        caller: Identity,
        mutation: Mutation,
        now: Timestamp,
        rules: &MutationRules,
    ) -> Result<Receipt, RegistryError> {
        let _writer = self
            .writer
            .lock()
            .map_err(|_| RegistryError::SubstrateUnavailable("ledger writer lock poisoned".into()))?;

        let head = self.read_u64(META_HEAD).map_err(unavailable)?;
        let last_committed_at = self
            .read_u64(META_LAST_COMMITTED_AT)
            .map_err(unavailable)?;
        let committed_at = now.max(last_committed_at);

        let current = self.read_record(&mutation.id()).map_err(unavailable)?;
        let applied = rules.apply(current.as_ref(), &mutation, committed_at)?;

        let entry = JournalEntry {
            sequence: head + 1,
            committed_at,
            caller,
            mutation,
            changed: applied.changed,
        };
        let record = applied.changed.then_some(&applied.record);
        self.commit(&entry, record).map_err(unavailable)?;

        Ok(entry.receipt())
    }

    fn journal(&self, from: u64, limit: usize) -> Result<Vec<JournalEntry>, RegistryError> {
        self.read_journal(from, limit).map_err(unavailable)
    }

    fn record_count(&self) -> Result<usize, RegistryError> {
        self.read_u64(META_RECORD_COUNT)
            .map(|count| count as usize)
            .map_err(unavailable)
    }

    fn head(&self) -> Result<u64, RegistryError> {
        self.read_u64(META_HEAD).map_err(unavailable)
    }
}
