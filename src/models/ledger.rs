use super::{DebitNote, DocumentId};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 试算平衡分录 (复式记账行)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalance {
    pub organization_id: DocumentId,
    pub operation_id: DocumentId,
    pub transaction_id: String,
    pub date: String,
    pub account_id: DocumentId,
    pub action: String,
    pub debit_amount: BigDecimal,
    pub credit_amount: BigDecimal,
    pub remark: Option<String>,
    pub created_date_time: DateTime<Utc>,
}

/// 库存流水
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTrack {
    pub organization_id: DocumentId,
    pub operation_id: DocumentId,
    pub transaction_id: String,
    pub action: String,
    pub date: Option<String>,
    pub item_id: DocumentId,
    pub selling_price: BigDecimal,
    pub cost_price: BigDecimal,
    /// 出库数量
    pub credit_quantity: i64,
    pub remark: String,
    pub created_date_time: DateTime<Utc>,
}

/// 一次更新需要原子写入的全部内容
#[derive(Debug, Clone)]
pub struct DebitNoteUpdate {
    pub debit_note: DebitNote,
    /// 更新前的明细商品, 用于重算被移除商品的退货数量
    pub previous_item_ids: Vec<DocumentId>,
    pub journal: Vec<TrialBalance>,
    pub item_tracks: Vec<ItemTrack>,
}

impl DebitNoteUpdate {
    /// 需要重算退货数量的商品 (新旧明细并集, 保序去重)
    pub fn affected_item_ids(&self) -> Vec<DocumentId> {
        let mut ids: IndexSet<DocumentId> = self.debit_note.item_ids().cloned().collect();
        ids.extend(self.previous_item_ids.iter().cloned());
        ids.into_iter().collect()
    }
}
