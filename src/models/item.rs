use super::DocumentId;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 商品主数据
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: DocumentId,
    pub organization_id: DocumentId,
    pub item_name: String,
    pub cost_price: BigDecimal,
    pub selling_price: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub vat: BigDecimal,
    pub tax_preference: String,
    /// 为空时使用组织默认采购科目
    pub purchase_account_id: Option<DocumentId>,
}
