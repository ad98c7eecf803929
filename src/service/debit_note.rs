use crate::db::DebitNoteStore;
use crate::error::{AppError, AppResult};
use crate::models::{DebitNote, DebitNoteUpdate, DocumentId, TrialBalance, UpdateDebitNoteRequest};
use crate::service::accounts::{self, default_accounting, item_track, purchase_journal};
use crate::service::calculation::{calculate_debit_note, tax_mode};
use crate::service::validation::{
    ensure_latest, validate_ids, validate_inputs, validate_references, InputContext,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// 借项通知单服务
pub struct DebitNoteService {
    store: Arc<dyn DebitNoteStore>,
}

impl DebitNoteService {
    pub fn new(store: Arc<dyn DebitNoteStore>) -> Self {
        Self { store }
    }

    /// 更新借项通知单
    ///
    /// 流程:
    /// 1. 读取原通知单并校验ID, 只允许编辑最新一张
    /// 2. 校验组织/供应商/账单及全部业务规则
    /// 3. 解析科目并重算金额
    /// 4. 生成分录和库存流水, 一次性原子写入
    pub async fn update(
        &self,
        org: &DocumentId,
        debit_id: &DocumentId,
        req: UpdateDebitNoteRequest,
    ) -> AppResult<DebitNote> {
        let existing = self
            .store
            .find_debit_note(org, debit_id)
            .await?
            .ok_or_else(|| AppError::not_found("Debit note not found"))?;

        let ids = validate_ids(&req, &existing)?;

        let latest = self
            .store
            .find_latest_debit_note(org, &ids.supplier_id, &ids.bill_id, &ids.item_ids)
            .await?;
        ensure_latest(latest.as_ref(), debit_id)?;

        let (organization, supplier, bill) = validate_references(
            self.store.find_organization(org).await?,
            self.store.find_supplier(org, &ids.supplier_id).await?,
            self.store.find_bill(org, &ids.bill_id).await?,
        )?;

        let masters = self.store.find_items(org, &ids.item_ids).await?;

        validate_inputs(
            &req,
            &InputContext {
                organization: &organization,
                supplier: &supplier,
                bill: &bill,
                items: &masters,
                existing: &existing,
            },
        )?;

        let mode = tax_mode(&req, &supplier);
        let accounting = default_accounting(self.store.as_ref(), org, &supplier.id, &req, mode).await?;

        let calc = calculate_debit_note(&req, &ids.item_ids, mode)?;
        let purchase = purchase_journal(&calc.items, &masters, &accounting.defaults)?;

        let now = Utc::now();
        let previous_item_ids: Vec<DocumentId> = existing.item_ids().cloned().collect();

        let debit_note = DebitNote {
            id: existing.id,
            organization_id: existing.organization_id,
            supplier_id: supplier.id.clone(),
            supplier_display_name: supplier.supplier_display_name.clone(),
            source_of_supply: req.source_of_supply,
            destination_of_supply: req.destination_of_supply,
            tax_mode: mode.to_string(),
            bill_id: bill.id.clone(),
            bill_number: bill.bill_number.clone(),
            bill_date: req.bill_date,
            bill_type: req.bill_type,
            order_number: req.order_number,
            payment_mode: req.payment_mode,
            deposit_account_id: accounting.deposit_account.as_ref().map(|a| a.id.clone()),
            debit_note: existing.debit_note,
            supplier_debit_date: req.supplier_debit_date,
            subject: req.subject,
            note: req.note,
            items: calc.items,
            total_item: calc.total_item,
            sub_total: calc.sub_total,
            cgst: calc.cgst,
            sgst: calc.sgst,
            igst: calc.igst,
            vat: calc.vat,
            total_tax_amount: calc.total_tax_amount,
            grand_total: calc.grand_total,
            purchase_journal: purchase,
            created_date: existing.created_date,
            created_date_time: existing.created_date_time,
            last_modified_date: Some(now),
        };

        let journal = accounts::journal(&debit_note, &accounting, now)?;
        let item_tracks = item_track(&debit_note, &masters, now);

        info!(
            debit_id = %debit_note.id,
            organization_id = %debit_note.organization_id,
            items = debit_note.items.len(),
            grand_total = %debit_note.grand_total,
            "Saving debit note"
        );

        self.store
            .apply_update(DebitNoteUpdate {
                debit_note,
                previous_item_ids,
                journal,
                item_tracks,
            })
            .await
    }

    pub async fn get(&self, org: &DocumentId, debit_id: &DocumentId) -> AppResult<DebitNote> {
        self.store
            .find_debit_note(org, debit_id)
            .await?
            .ok_or_else(|| AppError::not_found("Debit note not found"))
    }

    /// 通知单对应的试算平衡分录
    pub async fn journal(&self, org: &DocumentId, debit_id: &DocumentId) -> AppResult<Vec<TrialBalance>> {
        let note = self.get(org, debit_id).await?;
        self.store.list_trial_balance(org, &note.id).await
    }
}
