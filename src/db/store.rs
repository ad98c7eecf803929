use crate::db::queries;
use crate::error::{AppError, AppResult};
use crate::models::{
    Account, Bill, DebitNote, DebitNoteUpdate, DefaultAccount, DocumentId, Item, ItemTrack,
    Organization, Supplier, TrialBalance,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// 借项通知单持久化接口
#[async_trait]
pub trait DebitNoteStore: Send + Sync {
    async fn find_debit_note(&self, org: &DocumentId, id: &DocumentId) -> AppResult<Option<DebitNote>>;

    /// 同一供应商、同一账单下含任一商品的最新通知单 (按 created_date_time 降序)
    async fn find_latest_debit_note(
        &self,
        org: &DocumentId,
        supplier: &DocumentId,
        bill: &DocumentId,
        item_ids: &[DocumentId],
    ) -> AppResult<Option<DebitNote>>;

    async fn find_organization(&self, org: &DocumentId) -> AppResult<Option<Organization>>;
    async fn find_supplier(&self, org: &DocumentId, supplier: &DocumentId) -> AppResult<Option<Supplier>>;
    async fn find_bill(&self, org: &DocumentId, bill: &DocumentId) -> AppResult<Option<Bill>>;
    async fn find_default_account(&self, org: &DocumentId) -> AppResult<Option<DefaultAccount>>;
    async fn find_supplier_account(&self, org: &DocumentId, supplier: &DocumentId) -> AppResult<Option<Account>>;
    async fn find_account(&self, org: &DocumentId, account: &DocumentId) -> AppResult<Option<Account>>;
    async fn find_items(&self, org: &DocumentId, item_ids: &[DocumentId]) -> AppResult<Vec<Item>>;

    async fn list_trial_balance(&self, org: &DocumentId, operation: &DocumentId) -> AppResult<Vec<TrialBalance>>;
    async fn list_item_tracks(&self, org: &DocumentId, operation: &DocumentId) -> AppResult<Vec<ItemTrack>>;

    /// 原子写入: 保存通知单, 替换分录和库存流水 (沿用最早的创建时间), 重算账单退货数量
    async fn apply_update(&self, update: DebitNoteUpdate) -> AppResult<DebitNote>;
}

/// PostgreSQL 实现
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DebitNoteStore for PgStore {
    async fn find_debit_note(&self, org: &DocumentId, id: &DocumentId) -> AppResult<Option<DebitNote>> {
        Ok(queries::get_debit_note(&self.pool, org, id).await?)
    }

    async fn find_latest_debit_note(
        &self,
        org: &DocumentId,
        supplier: &DocumentId,
        bill: &DocumentId,
        item_ids: &[DocumentId],
    ) -> AppResult<Option<DebitNote>> {
        Ok(queries::get_latest_debit_note(&self.pool, org, supplier, bill, item_ids).await?)
    }

    async fn find_organization(&self, org: &DocumentId) -> AppResult<Option<Organization>> {
        Ok(queries::get_organization(&self.pool, org).await?)
    }

    async fn find_supplier(&self, org: &DocumentId, supplier: &DocumentId) -> AppResult<Option<Supplier>> {
        Ok(queries::get_supplier(&self.pool, org, supplier).await?)
    }

    async fn find_bill(&self, org: &DocumentId, bill: &DocumentId) -> AppResult<Option<Bill>> {
        Ok(queries::get_bill(&self.pool, org, bill).await?)
    }

    async fn find_default_account(&self, org: &DocumentId) -> AppResult<Option<DefaultAccount>> {
        Ok(queries::get_default_account(&self.pool, org).await?)
    }

    async fn find_supplier_account(&self, org: &DocumentId, supplier: &DocumentId) -> AppResult<Option<Account>> {
        Ok(queries::get_supplier_account(&self.pool, org, supplier).await?)
    }

    async fn find_account(&self, org: &DocumentId, account: &DocumentId) -> AppResult<Option<Account>> {
        Ok(queries::get_account(&self.pool, org, account).await?)
    }

    async fn find_items(&self, org: &DocumentId, item_ids: &[DocumentId]) -> AppResult<Vec<Item>> {
        Ok(queries::list_items(&self.pool, org, item_ids).await?)
    }

    async fn list_trial_balance(&self, org: &DocumentId, operation: &DocumentId) -> AppResult<Vec<TrialBalance>> {
        Ok(queries::list_trial_balance(&self.pool, org, operation).await?)
    }

    async fn list_item_tracks(&self, org: &DocumentId, operation: &DocumentId) -> AppResult<Vec<ItemTrack>> {
        Ok(queries::list_item_tracks(&self.pool, org, operation).await?)
    }

    async fn apply_update(&self, update: DebitNoteUpdate) -> AppResult<DebitNote> {
        let debit_note = &update.debit_note;
        let org = &debit_note.organization_id;
        let operation = &debit_note.id;
        let affected = update.affected_item_ids();

        let mut tx = self.pool.begin().await?;

        let updated = queries::save_debit_note(&mut tx, debit_note).await?;
        if updated == 0 {
            // 事务随 tx drop 回滚
            return Err(AppError::not_found("Debit note not found"));
        }

        let journal_created = queries::delete_trial_balance(&mut tx, org, operation).await?;
        let journal = preserve_created(update.journal.clone(), journal_created, |r| &mut r.created_date_time);
        queries::insert_trial_balance(&mut tx, &journal).await?;

        let tracks_created = queries::delete_item_tracks(&mut tx, org, operation).await?;
        let tracks = preserve_created(update.item_tracks.clone(), tracks_created, |r| &mut r.created_date_time);
        queries::insert_item_tracks(&mut tx, &tracks).await?;

        for item_id in &affected {
            queries::refresh_return_quantity(
                &mut tx,
                org,
                &debit_note.supplier_id,
                &debit_note.bill_id,
                item_id,
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            debit_id = %operation,
            journal_rows = journal.len(),
            item_tracks = tracks.len(),
            bill_items = affected.len(),
            "Debit note update committed"
        );

        Ok(update.debit_note)
    }
}

/// 替换写入时沿用原记录的创建时间
pub(crate) fn preserve_created<T>(
    mut rows: Vec<T>,
    created: Option<DateTime<Utc>>,
    field: impl Fn(&mut T) -> &mut DateTime<Utc>,
) -> Vec<T> {
    if let Some(created) = created {
        for row in rows.iter_mut() {
            *field(row) = created;
        }
    }
    rows
}
