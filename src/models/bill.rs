use super::DocumentId;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 采购账单
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: DocumentId,
    pub organization_id: DocumentId,
    pub supplier_id: DocumentId,
    pub bill_number: String,
    pub bill_date: Option<String>,
    pub order_number: Option<String>,
    #[sqlx(skip)]
    pub items: Vec<BillItem>,
}

impl Bill {
    pub fn item(&self, item_id: &DocumentId) -> Option<&BillItem> {
        self.items.iter().find(|bi| &bi.item_id == item_id)
    }
}

/// 账单明细, return_quantity 由借项通知单维护
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItem {
    pub item_id: DocumentId,
    pub item_quantity: i64,
    pub item_cost_price: BigDecimal,
    pub item_cgst: BigDecimal,
    pub item_sgst: BigDecimal,
    pub item_igst: BigDecimal,
    pub return_quantity: i64,
}
