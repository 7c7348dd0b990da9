use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use rust_decimal::Decimal;
use tempfile::TempDir;
use time::Date;

use crate::purchase::{Category, PaymentMethod, PurchaseRecord, RecordStore};

/// A record store backed by `purchases.csv` in a fresh temporary directory.
///
/// The directory and everything written into it are removed when this is dropped.
pub(crate) struct TempRecordStore {
    pub(crate) store: RecordStore,
    path: PathBuf,
    _dir: TempDir,
}

impl TempRecordStore {
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().expect("could not create temp directory");
        let path = dir.path().join("purchases.csv");

        Self {
            store: RecordStore::new(&path),
            path,
            _dir: dir,
        }
    }

    pub(crate) fn with_contents(contents: &str) -> Self {
        let temp = Self::new();
        fs::write(&temp.path, contents).expect("could not write test data file");

        temp
    }

    pub(crate) fn with_records(records: &[PurchaseRecord]) -> Self {
        let temp = Self::new();
        temp.store
            .save_all(records)
            .expect("could not save test records");

        temp
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// A handle to the store for handler state.
    pub(crate) fn shared(&self) -> Arc<Mutex<RecordStore>> {
        Arc::new(Mutex::new(self.store.clone()))
    }
}

/// A purchase of one widget from Acme paid with cash.
pub(crate) fn test_record(purchase_id: &str, price: &str, purchase_date: Date) -> PurchaseRecord {
    PurchaseRecord {
        purchase_id: purchase_id.to_owned(),
        item_name: "Widget".to_owned(),
        quantity: 1,
        price: Decimal::from_str_exact(price).expect("invalid test price"),
        purchase_date,
        supplier: "Acme".to_owned(),
        category: Category::Electronics,
        payment_method: PaymentMethod::Cash,
        notes: None,
        other: None,
    }
}

#[cfg(test)]
mod temp_record_store_tests {
    use std::fs;

    use time::macros::date;

    use crate::test_utils::{TempRecordStore, test_record};

    #[test]
    fn dropping_removes_backing_file_and_leftovers() {
        let temp = TempRecordStore::with_records(&[test_record("P-1", "1.0", date!(2024 - 01 - 01))]);
        let dir = temp
            .path()
            .parent()
            .expect("backing file should be in a directory")
            .to_owned();
        fs::write(dir.join("purchases.csv.tmp"), "partial").expect("could not write leftover");

        drop(temp);

        assert!(!dir.exists(), "want {} to be removed", dir.display());
    }

    #[test]
    fn each_store_gets_its_own_file() {
        let first = TempRecordStore::new();
        let second = TempRecordStore::new();

        assert_ne!(first.path(), second.path());
    }
}
