use async_trait::async_trait;
use chrono::NaiveDate;
use fuel_ingestion_application::{InvoiceStore, StoreError};
use fuel_ingestion_domain::{InvoiceBatch, InvoiceRecord};
use shaku::Component;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS fuel_invoices (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  invoice_number TEXT NOT NULL,
  ticket_number TEXT NOT NULL,
  delivery_date TEXT NOT NULL,
  delivery_time TEXT NOT NULL,
  po_number TEXT NOT NULL,
  ship_to_code TEXT NOT NULL,
  ship_to_name TEXT NOT NULL,
  ship_to_address TEXT NOT NULL,
  product_code TEXT NOT NULL,
  product_description TEXT NOT NULL,
  unit_number TEXT NOT NULL,
  unit_barcode TEXT NOT NULL,
  quantity TEXT NOT NULL,
  unit_price_less_taxes TEXT NOT NULL,
  federal_excise_tax TEXT NOT NULL,
  provincial_fuel_tax TEXT NOT NULL,
  carbon_tax TEXT NOT NULL,
  sales_tax TEXT NOT NULL,
  total_price TEXT NOT NULL,
  ingested_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const CREATE_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS fuel_invoices_delivery_date_idx ON fuel_invoices(delivery_date)";

const INSERT_INVOICE: &str = r#"
INSERT INTO fuel_invoices
  (invoice_number, ticket_number, delivery_date, delivery_time, po_number,
   ship_to_code, ship_to_name, ship_to_address, product_code, product_description,
   unit_number, unit_barcode, quantity, unit_price_less_taxes,
   federal_excise_tax, provincial_fuel_tax, carbon_tax, sales_tax, total_price)
VALUES
  (?1, ?2, ?3, ?4, ?5,
   ?6, ?7, ?8, ?9, ?10,
   ?11, ?12, ?13, ?14,
   ?15, ?16, ?17, ?18, ?19)
"#;

/// Invoice storage in a single SQLite database file.
///
/// One connection is held between `open` and `close`; the existence check
/// and the batch insert run on that same connection.
#[derive(Component)]
#[shaku(interface = InvoiceStore)]
pub struct SqliteInvoiceStore {
    database_url: String,
    #[shaku(default = Mutex::new(None))]
    connection: Mutex<Option<SqliteConnection>>,
}

impl SqliteInvoiceStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            connection: Mutex::new(None),
        }
    }

    /// Number of stored invoices delivered on `date`. Requires an open session.
    pub async fn count_for_date(&self, date: NaiveDate) -> Result<u64, StoreError> {
        let mut guard = self.connection.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::NotOpen)?;

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM fuel_invoices WHERE delivery_date = ?1")
                .bind(date.format(DATE_FORMAT).to_string())
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| StoreError::Persistence(e.to_string()))?;

        Ok(count as u64)
    }

    async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        let options = SqliteConnectOptions::from_str(&self.database_url)
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .create_if_missing(true);

        let mut conn = options.connect().await.map_err(|e| {
            error!("Unable to open invoice database: {}", e);
            StoreError::Connection(e.to_string())
        })?;

        for statement in [CREATE_TABLE, CREATE_DATE_INDEX] {
            sqlx::query(statement)
                .execute(&mut conn)
                .await
                .map_err(|e| StoreError::Connection(format!("schema setup failed: {}", e)))?;
        }

        Ok(conn)
    }
}

#[async_trait]
impl InvoiceStore for SqliteInvoiceStore {
    async fn open(&self) -> Result<(), StoreError> {
        let mut guard = self.connection.lock().await;
        if guard.is_some() {
            warn!("Invoice store already open, reusing connection");
            return Ok(());
        }

        *guard = Some(self.connect().await?);
        info!("Opened invoice store");
        Ok(())
    }

    async fn records_exist(&self, date: NaiveDate) -> Result<bool, StoreError> {
        let mut guard = self.connection.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::NotOpen)?;

        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM fuel_invoices WHERE delivery_date = ?1)",
        )
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| StoreError::Persistence(e.to_string()))?;

        Ok(exists != 0)
    }

    async fn save_many(&self, batch: &InvoiceBatch) -> Result<(), StoreError> {
        let mut guard = self.connection.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::NotOpen)?;

        let mut tx = conn
            .begin()
            .await
            .map_err(|e| StoreError::Persistence(e.to_string()))?;

        for record in batch.records() {
            if let Err(e) = insert_invoice(&mut tx, record).await {
                error!(
                    "Database error inserting invoice {}: {}",
                    record.invoice_number(),
                    e
                );
                if let Err(rollback) = tx.rollback().await {
                    error!("Rollback after failed insert also failed: {}", rollback);
                }
                return Err(StoreError::Persistence(format!(
                    "insert of invoice {} failed: {}",
                    record.invoice_number(),
                    e
                )));
            }
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Persistence(e.to_string()))?;

        info!("Committed {} invoices for {}", batch.len(), batch.date());
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        let Some(conn) = self.connection.lock().await.take() else {
            return Ok(());
        };

        conn.close()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        info!("Closed invoice store");
        Ok(())
    }
}

async fn insert_invoice(
    conn: &mut SqliteConnection,
    record: &InvoiceRecord,
) -> Result<(), sqlx::Error> {
    let details = record.details();

    sqlx::query(INSERT_INVOICE)
        .bind(record.invoice_number())
        .bind(&details.ticket_number)
        .bind(record.delivery_date().format(DATE_FORMAT).to_string())
        .bind(record.delivery_time().format(TIME_FORMAT).to_string())
        .bind(&details.po_number)
        .bind(&details.ship_to_code)
        .bind(&details.ship_to_name)
        .bind(&details.ship_to_address)
        .bind(&details.product_code)
        .bind(&details.product_description)
        .bind(&details.unit_number)
        .bind(&details.unit_barcode)
        .bind(details.quantity.to_string())
        .bind(details.unit_price_less_taxes.to_string())
        .bind(details.taxes.federal_excise.to_string())
        .bind(details.taxes.provincial_fuel.to_string())
        .bind(details.taxes.carbon.to_string())
        .bind(details.taxes.sales.to_string())
        .bind(details.total_price.to_string())
        .execute(&mut *conn)
        .await?;

    Ok(())
}
