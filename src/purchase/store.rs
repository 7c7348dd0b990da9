//! The CSV file that holds every purchase.
//!
//! Every mutation is a full read-modify-write of the file. Callers share one
//! [RecordStore] behind a mutex so that these cycles never interleave within
//! the server process.

use std::{
    ffi::OsString,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    purchase::core::{Category, PaymentMethod, PurchaseFields, PurchaseRecord},
};

/// The header row of the backing file, in column order.
pub const COLUMNS: [&str; 10] = [
    "Purchase ID",
    "Item Name",
    "Quantity",
    "Price",
    "Purchase Date",
    "Supplier",
    "Category",
    "Payment Method",
    "Notes",
    "Other",
];

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// One row of the backing file, as text.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Purchase ID")]
    purchase_id: String,
    #[serde(rename = "Item Name")]
    item_name: String,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Purchase Date")]
    purchase_date: String,
    #[serde(rename = "Supplier")]
    supplier: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Payment Method")]
    payment_method: String,
    #[serde(rename = "Notes")]
    notes: Option<String>,
    #[serde(rename = "Other")]
    other: Option<String>,
}

impl From<&PurchaseRecord> for CsvRow {
    fn from(record: &PurchaseRecord) -> Self {
        Self {
            purchase_id: record.purchase_id.clone(),
            item_name: record.item_name.clone(),
            quantity: record.quantity,
            price: record.price.to_string(),
            purchase_date: format_date(record.purchase_date),
            supplier: record.supplier.clone(),
            category: record.category.to_string(),
            payment_method: record.payment_method.to_string(),
            notes: record.notes.clone(),
            other: record.other.clone(),
        }
    }
}

impl TryFrom<CsvRow> for PurchaseRecord {
    type Error = String;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let price = Decimal::from_str_exact(row.price.trim())
            .ok()
            .filter(|price| *price >= Decimal::ZERO)
            .ok_or_else(|| format!("invalid price {:?}", row.price))?;

        let purchase_date = parse_date(&row.purchase_date)?;
        let category: Category = row.category.parse().map_err(|error| format!("{error}"))?;
        let payment_method: PaymentMethod = row
            .payment_method
            .parse()
            .map_err(|error| format!("{error}"))?;

        Ok(PurchaseRecord::new(
            &row.purchase_id,
            PurchaseFields {
                item_name: row.item_name,
                quantity: row.quantity,
                price,
                purchase_date,
                supplier: row.supplier,
                category,
                payment_method,
                notes: row.notes,
                other: row.other,
            },
        ))
    }
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Parse an ISO 8601 date.
///
/// A time of day after the date, e.g. "2024-01-31 00:00:00" or
/// "2024-01-31T08:30:00", is ignored.
pub fn parse_date(text: &str) -> Result<Date, String> {
    let text = text.trim();
    let date_text = match text.char_indices().nth(10) {
        Some((index, ' ' | 'T')) => &text[..index],
        _ => text,
    };

    Date::parse(date_text, DATE_FORMAT).map_err(|error| format!("invalid date \"{text}\": {error}"))
}

/// Reads and writes purchases in a CSV file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Create a store backed by the CSV file at `path`.
    ///
    /// The file does not need to exist yet, it is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every purchase, in file order.
    ///
    /// A missing or empty file holds no purchases.
    ///
    /// # Errors
    /// Returns [Error::StorageRead] if the file cannot be read, if the header
    /// row does not match [COLUMNS], or if any row cannot be parsed.
    pub fn load_all(&self) -> Result<Vec<PurchaseRecord>, Error> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(error) => return Err(read_error(&self.path, error)),
        };

        let is_empty = file
            .metadata()
            .map_err(|error| read_error(&self.path, error))?
            .len()
            == 0;
        if is_empty {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = reader
            .headers()
            .map_err(|error| read_error(&self.path, error))?;
        if headers.iter().ne(COLUMNS) {
            return Err(Error::StorageRead(format!(
                "{} has the columns {:?}, expected {:?}",
                self.path.display(),
                headers.iter().collect::<Vec<_>>(),
                COLUMNS
            )));
        }

        let mut records = Vec::new();

        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|error| read_error(&self.path, error))?;
            let line = records.len() + 2;
            let record = PurchaseRecord::try_from(row).map_err(|error| {
                Error::StorageRead(format!("{} line {line}: {error}", self.path.display()))
            })?;

            records.push(record);
        }

        tracing::debug!("Read {} purchases from {}", records.len(), self.path.display());

        Ok(records)
    }

    /// Replace the contents of the backing file with `records`.
    ///
    /// The rows are written to a temporary file next to the backing file,
    /// which is then renamed over it, so a failed write leaves the backing
    /// file unchanged.
    ///
    /// # Errors
    /// Returns [Error::StorageWrite] if any part of the write fails.
    pub fn save_all(&self, records: &[PurchaseRecord]) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| write_error(parent, error))?;
        }

        let temporary_path = self.temporary_path();

        let result = write_csv(&temporary_path, records)
            .and_then(|_| fs::rename(&temporary_path, &self.path).map_err(|error| error.to_string()));

        if let Err(error) = result {
            if let Err(remove_error) = fs::remove_file(&temporary_path) {
                tracing::debug!(
                    "Could not remove {}: {remove_error}",
                    temporary_path.display()
                );
            }

            return Err(Error::StorageWrite(format!(
                "{}: {error}",
                self.path.display()
            )));
        }

        tracing::debug!("Wrote {} purchases to {}", records.len(), self.path.display());

        Ok(())
    }

    /// Add `record` after all existing purchases.
    ///
    /// # Errors
    /// Returns [Error::StorageRead] or [Error::StorageWrite] if the backing
    /// file cannot be read or written.
    pub fn append(&self, record: PurchaseRecord) -> Result<(), Error> {
        let mut records = self.load_all()?;
        records.push(record);

        self.save_all(&records)
    }

    /// Replace every field except the purchase ID of the first purchase with
    /// the ID `purchase_id`, and return the updated purchase.
    ///
    /// Other purchases with the same ID are left unchanged.
    ///
    /// # Errors
    /// Returns [Error::NotFound] without writing anything if no purchase has
    /// the ID `purchase_id`, or a storage error if the backing file cannot be
    /// read or written.
    pub fn update_by_id(
        &self,
        purchase_id: &str,
        fields: PurchaseFields,
    ) -> Result<PurchaseRecord, Error> {
        let mut records = self.load_all()?;

        let record = records
            .iter_mut()
            .find(|record| record.purchase_id == purchase_id)
            .ok_or(Error::NotFound)?;
        record.apply(fields);
        let updated_record = record.clone();

        self.save_all(&records)?;

        Ok(updated_record)
    }

    /// Get the first purchase with the ID `purchase_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no purchase has the ID `purchase_id`.
    pub fn get_by_id(&self, purchase_id: &str) -> Result<PurchaseRecord, Error> {
        self.load_all()?
            .into_iter()
            .find(|record| record.purchase_id == purchase_id)
            .ok_or(Error::NotFound)
    }

    /// The distinct purchase IDs, in the order they first appear.
    pub fn unique_ids(&self) -> Result<Vec<String>, Error> {
        Ok(unique_ids(&self.load_all()?))
    }

    fn temporary_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("purchases.csv"));
        file_name.push(".tmp");

        self.path.with_file_name(file_name)
    }
}

/// The distinct purchase IDs in `records`, in the order they first appear.
pub fn unique_ids(records: &[PurchaseRecord]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();

    for record in records {
        if !ids.contains(&record.purchase_id) {
            ids.push(record.purchase_id.clone());
        }
    }

    ids
}

fn write_csv(path: &Path, records: &[PurchaseRecord]) -> Result<(), String> {
    let file = File::create(path).map_err(|error| error.to_string())?;
    // The header is written by hand so that it is present even with no records.
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer
        .write_record(COLUMNS)
        .map_err(|error| error.to_string())?;

    for record in records {
        writer
            .serialize(CsvRow::from(record))
            .map_err(|error| error.to_string())?;
    }

    let file = writer.into_inner().map_err(|error| error.to_string())?;
    file.sync_all().map_err(|error| error.to_string())
}

fn read_error(path: &Path, error: impl std::fmt::Display) -> Error {
    Error::StorageRead(format!("{}: {error}", path.display()))
}

fn write_error(path: &Path, error: impl std::fmt::Display) -> Error {
    Error::StorageWrite(format!("{}: {error}", path.display()))
}

#[cfg(test)]
mod record_store_tests {
    use std::fs;

    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error,
        purchase::{
            core::{Category, PaymentMethod, PurchaseFields, PurchaseRecord},
            store::{COLUMNS, RecordStore, parse_date},
        },
        test_utils::{TempRecordStore, test_record},
    };

    #[test]
    fn missing_file_has_no_records() {
        let temp = TempRecordStore::new();

        assert_eq!(temp.store.load_all(), Ok(Vec::new()));
        assert!(!temp.path().exists(), "reading should not create the file");
    }

    #[test]
    fn empty_file_has_no_records() {
        let temp = TempRecordStore::with_contents("");

        assert_eq!(temp.store.load_all(), Ok(Vec::new()));
    }

    #[test]
    fn header_only_file_has_no_records() {
        let temp = TempRecordStore::with_contents(&format!("{}\n", COLUMNS.join(",")));

        assert_eq!(temp.store.load_all(), Ok(Vec::new()));
    }

    #[test]
    fn save_then_load_returns_same_records() {
        let temp = TempRecordStore::new();
        let mut with_text = test_record("P-2", "0.1", date!(2024 - 02 - 29));
        with_text.item_name = "Shirt, \"blue\"".to_owned();
        with_text.notes = Some("multi\nline".to_owned());
        with_text.other = Some("gift".to_owned());
        with_text.category = Category::Clothing;
        with_text.payment_method = PaymentMethod::CreditCard;
        let records = vec![
            test_record("P-1", "12.34", date!(2024 - 01 - 01)),
            with_text,
            test_record("", "0.0", date!(1999 - 12 - 31)),
        ];

        temp.store.save_all(&records).expect("could not save records");

        assert_eq!(temp.store.load_all(), Ok(records));
    }

    #[test]
    fn empty_optional_text_survives_save_then_load() {
        let temp = TempRecordStore::new();
        let record = PurchaseRecord::new(
            "P-1",
            PurchaseFields {
                notes: Some(String::new()),
                other: Some(String::new()),
                ..test_record("P-1", "2.50", date!(2024 - 01 - 01)).fields()
            },
        );

        temp.store.save_all(&[record.clone()]).expect("could not save records");

        assert_eq!(temp.store.load_all(), Ok(vec![record]));
    }

    #[test]
    fn save_writes_header_and_fixed_column_order() {
        let temp = TempRecordStore::new();
        let mut record = test_record("P-1", "10.5", date!(2024 - 01 - 01));
        record.notes = Some("note".to_owned());

        temp.store.save_all(&[record]).expect("could not save records");

        let contents = fs::read_to_string(temp.path()).expect("could not read file");
        assert_eq!(
            contents,
            "Purchase ID,Item Name,Quantity,Price,Purchase Date,Supplier,Category,Payment Method,Notes,Other\n\
            P-1,Widget,1,10.5,2024-01-01,Acme,Electronics,Cash,note,\n"
        );
    }

    #[test]
    fn saving_no_records_writes_header() {
        let temp = TempRecordStore::new();

        temp.store.save_all(&[]).expect("could not save records");

        let contents = fs::read_to_string(temp.path()).expect("could not read file");
        assert_eq!(contents, format!("{}\n", COLUMNS.join(",")));
        assert_eq!(temp.store.load_all(), Ok(Vec::new()));
    }

    #[test]
    fn load_then_save_reproduces_file() {
        let contents = "Purchase ID,Item Name,Quantity,Price,Purchase Date,Supplier,Category,Payment Method,Notes,Other\n\
            A1,Laptop,1,999.90,2024-03-05,Tech Co,Electronics,Credit Card,,\n\
            A2,\"Milk, whole\",3,1.25,2024-03-06,Grocer,Groceries,Debit Card,weekly,\n\
            A3,Socks,10,20.0,2024-03-07,Clothes R Us,Clothing,Other,,spare\n";
        let temp = TempRecordStore::with_contents(contents);

        let records = temp.store.load_all().expect("could not load records");
        temp.store.save_all(&records).expect("could not save records");

        let saved = fs::read_to_string(temp.path()).expect("could not read file");
        assert_eq!(saved, contents);
    }

    #[test]
    fn append_adds_record_last() {
        let temp = TempRecordStore::new();
        let existing = vec![
            test_record("P-1", "1.0", date!(2024 - 01 - 01)),
            test_record("P-2", "2.0", date!(2024 - 01 - 02)),
        ];
        temp.store.save_all(&existing).expect("could not save records");
        let new_record = test_record("P-3", "3.0", date!(2024 - 01 - 03));

        temp.store
            .append(new_record.clone())
            .expect("could not append record");

        let mut want = existing;
        want.push(new_record);
        assert_eq!(temp.store.load_all(), Ok(want));
    }

    #[test]
    fn append_creates_missing_file() {
        let temp = TempRecordStore::new();
        let record = test_record("P-1", "1.0", date!(2024 - 01 - 01));

        temp.store.append(record.clone()).expect("could not append record");

        assert_eq!(temp.store.load_all(), Ok(vec![record]));
    }

    #[test]
    fn update_replaces_fields_of_matching_record_only() {
        let temp = TempRecordStore::new();
        let records = vec![
            test_record("P-1", "1.0", date!(2024 - 01 - 01)),
            test_record("P-2", "2.0", date!(2024 - 01 - 02)),
            test_record("P-3", "3.0", date!(2024 - 01 - 03)),
        ];
        temp.store.save_all(&records).expect("could not save records");
        let new_fields = PurchaseFields {
            item_name: "Gadget".to_owned(),
            quantity: 4,
            price: Decimal::new(4444, 2),
            purchase_date: date!(2024 - 05 - 05),
            supplier: "Other Shop".to_owned(),
            category: Category::Other,
            payment_method: PaymentMethod::DebitCard,
            notes: Some("updated".to_owned()),
            other: None,
        };

        let updated = temp
            .store
            .update_by_id("P-2", new_fields.clone())
            .expect("could not update record");

        let want = PurchaseRecord::new("P-2", new_fields);
        assert_eq!(updated, want);
        assert_eq!(
            temp.store.load_all(),
            Ok(vec![records[0].clone(), want, records[2].clone()])
        );
    }

    #[test]
    fn update_only_changes_first_duplicate() {
        let temp = TempRecordStore::new();
        let first = test_record("DUP", "1.0", date!(2024 - 01 - 01));
        let second = test_record("DUP", "2.0", date!(2024 - 01 - 02));
        temp.store
            .save_all(&[first.clone(), second.clone()])
            .expect("could not save records");
        let mut new_fields = first.fields();
        new_fields.price = Decimal::new(100, 0);

        temp.store
            .update_by_id("DUP", new_fields.clone())
            .expect("could not update record");

        assert_eq!(
            temp.store.load_all(),
            Ok(vec![PurchaseRecord::new("DUP", new_fields), second])
        );
    }

    #[test]
    fn update_missing_id_returns_not_found_and_leaves_file() {
        let temp = TempRecordStore::new();
        let record = test_record("P-1", "1.0", date!(2024 - 01 - 01));
        temp.store.save_all(&[record.clone()]).expect("could not save records");
        let before = fs::read_to_string(temp.path()).expect("could not read file");

        let result = temp.store.update_by_id("missing", record.fields());

        assert_eq!(result, Err(Error::NotFound));
        let after = fs::read_to_string(temp.path()).expect("could not read file");
        assert_eq!(before, after);
    }

    #[test]
    fn get_by_id_returns_first_match() {
        let temp = TempRecordStore::new();
        let first = test_record("DUP", "1.0", date!(2024 - 01 - 01));
        let second = test_record("DUP", "2.0", date!(2024 - 01 - 02));
        temp.store
            .save_all(&[first.clone(), second])
            .expect("could not save records");

        assert_eq!(temp.store.get_by_id("DUP"), Ok(first));
        assert_eq!(temp.store.get_by_id("nope"), Err(Error::NotFound));
    }

    #[test]
    fn unique_ids_keeps_first_appearance_order() {
        let temp = TempRecordStore::new();
        temp.store
            .save_all(&[
                test_record("B", "1.0", date!(2024 - 01 - 01)),
                test_record("A", "1.0", date!(2024 - 01 - 01)),
                test_record("B", "1.0", date!(2024 - 01 - 01)),
            ])
            .expect("could not save records");

        assert_eq!(
            temp.store.unique_ids(),
            Ok(vec!["B".to_owned(), "A".to_owned()])
        );
    }

    #[test]
    fn wrong_header_is_read_error() {
        let temp = TempRecordStore::with_contents("id,name\n1,foo\n");

        assert!(matches!(temp.store.load_all(), Err(Error::StorageRead(_))));
    }

    #[test]
    fn unparseable_rows_are_read_errors() {
        let header = COLUMNS.join(",");
        let bad_rows = [
            "P-1,Widget,-1,1.0,2024-01-01,Acme,Electronics,Cash,,",
            "P-1,Widget,1,-1.0,2024-01-01,Acme,Electronics,Cash,,",
            "P-1,Widget,1,abc,2024-01-01,Acme,Electronics,Cash,,",
            "P-1,Widget,1,1.0,01/02/2024,Acme,Electronics,Cash,,",
            "P-1,Widget,1,1.0,2024-01-01,Acme,Furniture,Cash,,",
            "P-1,Widget,1,1.0,2024-01-01,Acme,Electronics,Cheque,,",
            "P-1,Widget,1,1.0,2024-01-01,Acme",
        ];

        for row in bad_rows {
            let good_row = "P-0,Widget,1,1.0,2024-01-01,Acme,Electronics,Cash,,";
            let temp = TempRecordStore::with_contents(&format!("{header}\n{good_row}\n{row}\n"));

            let result = temp.store.load_all();

            assert!(
                matches!(result, Err(Error::StorageRead(_))),
                "want read error for row {row:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn failed_write_leaves_file_unchanged() {
        let temp = TempRecordStore::new();
        let record = test_record("P-1", "1.0", date!(2024 - 01 - 01));
        temp.store.save_all(&[record]).expect("could not save records");
        let before = fs::read_to_string(temp.path()).expect("could not read file");
        // A directory where the temporary file should go makes the write fail.
        let blocker = temp.path().with_file_name(format!(
            "{}.tmp",
            temp.path().file_name().unwrap().to_string_lossy()
        ));
        fs::create_dir(&blocker).expect("could not create blocking directory");

        let result = temp
            .store
            .save_all(&[test_record("P-2", "2.0", date!(2024 - 01 - 02))]);

        fs::remove_dir(&blocker).expect("could not remove blocking directory");
        assert!(matches!(result, Err(Error::StorageWrite(_))), "got {result:?}");
        let after = fs::read_to_string(temp.path()).expect("could not read file");
        assert_eq!(before, after);
    }

    #[test]
    fn store_path_is_kept() {
        let store = RecordStore::new("data/purchases.csv");

        assert_eq!(store.path(), std::path::Path::new("data/purchases.csv"));
    }

    #[test]
    fn parse_date_ignores_time_of_day() {
        assert_eq!(parse_date("2024-01-31"), Ok(date!(2024 - 01 - 31)));
        assert_eq!(parse_date("2024-01-31 00:00:00"), Ok(date!(2024 - 01 - 31)));
        assert_eq!(parse_date("2024-01-31T08:30:00"), Ok(date!(2024 - 01 - 31)));
        assert!(parse_date("31/01/2024").is_err());
        assert!(parse_date("").is_err());
    }
}
