use crate::ports::{InvoiceSource, InvoiceStore, SourceError, StoreError};
use async_trait::async_trait;
use chrono::NaiveDate;
use fuel_ingestion_domain::{BatchError, InvoiceBatch};
use shaku::{Component, Interface};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

#[async_trait]
pub trait IngestionService: Interface {
    async fn run(&self, date: NaiveDate) -> Result<RunOutcome, IngestionError>;
}

/// Terminal state of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The provider had no invoices for the date; the store was not touched.
    NothingToIngest { date: NaiveDate },
    /// Invoices for the date were already stored; nothing was written.
    AlreadyIngested { date: NaiveDate },
    Persisted { date: NaiveDate, count: usize },
}

#[derive(Component)]
#[shaku(interface = IngestionService)]
pub struct IngestionServiceImpl {
    #[shaku(inject)]
    source: Arc<dyn InvoiceSource>,
    #[shaku(inject)]
    store: Arc<dyn InvoiceStore>,
    deadline: Option<Duration>,
}

impl IngestionServiceImpl {
    pub fn new(
        source: Arc<dyn InvoiceSource>,
        store: Arc<dyn InvoiceStore>,
        deadline: Option<Duration>,
    ) -> Self {
        Self {
            source,
            store,
            deadline,
        }
    }

    async fn ingest(&self, date: NaiveDate) -> Result<RunOutcome, IngestionError> {
        let started = Instant::now();
        info!("Fetching invoices for date {}", date);

        let records = self.within_deadline(started, self.source.fetch(date)).await??;

        if records.is_empty() {
            info!("No records found for {}", date);
            return Ok(RunOutcome::NothingToIngest { date });
        }

        info!("Fetched {} invoices for {}", records.len(), date);
        let batch = InvoiceBatch::new(date, records)?;

        self.within_deadline(started, self.store.open()).await??;

        let outcome = match self
            .within_deadline(started, self.persist_if_absent(&batch))
            .await
        {
            Ok(result) => result.map_err(IngestionError::from),
            Err(e) => Err(e),
        };

        let closed = self.store.close().await;

        match (outcome, closed) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(e)) => {
                error!("Failed to close invoice store: {}", e);
                Err(e.into())
            }
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                error!("Failed to close invoice store after error: {}", close_err);
                Err(e)
            }
        }
    }

    async fn persist_if_absent(&self, batch: &InvoiceBatch) -> Result<RunOutcome, StoreError> {
        let date = batch.date();

        if self.store.records_exist(date).await? {
            warn!("Records already exist for {}", date);
            return Ok(RunOutcome::AlreadyIngested { date });
        }

        self.store.save_many(batch).await?;
        info!("Stored {} invoices for {}", batch.len(), date);

        Ok(RunOutcome::Persisted {
            date,
            count: batch.len(),
        })
    }

    async fn within_deadline<F, T>(&self, started: Instant, work: F) -> Result<T, IngestionError>
    where
        F: Future<Output = T> + Send,
    {
        let Some(deadline) = self.deadline else {
            return Ok(work.await);
        };

        let remaining = deadline.saturating_sub(started.elapsed());
        tokio::time::timeout(remaining, work)
            .await
            .map_err(|_| IngestionError::DeadlineExceeded(deadline))
    }
}

#[async_trait]
impl IngestionService for IngestionServiceImpl {
    async fn run(&self, date: NaiveDate) -> Result<RunOutcome, IngestionError> {
        let span = info_span!("ingestion_run", run_id = %Uuid::new_v4(), %date);
        self.ingest(date).instrument(span).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid batch: {0}")]
    InvalidBatch(#[from] BatchError),

    #[error("Run exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),
}
