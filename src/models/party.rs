use super::DocumentId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 组织
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: DocumentId,
    pub organization_country: String,
}

/// 供应商
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: DocumentId,
    pub organization_id: DocumentId,
    pub supplier_display_name: String,
    /// "GST" / "VAT" / 其他 (不计税)
    pub tax_type: String,
}

impl Supplier {
    pub fn is_gst(&self) -> bool {
        self.tax_type == "GST"
    }
}

/// 会计科目; party_id 不为空时为供应商明细账科目
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: DocumentId,
    pub organization_id: DocumentId,
    pub account_name: String,
    pub party_id: Option<DocumentId>,
}

/// 组织默认科目
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultAccount {
    pub organization_id: Option<DocumentId>,
    pub purchase_account: Option<DocumentId>,
    pub input_cgst: Option<DocumentId>,
    pub input_sgst: Option<DocumentId>,
    pub input_igst: Option<DocumentId>,
    pub input_vat: Option<DocumentId>,
}
