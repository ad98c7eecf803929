use super::DocumentId;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// 借项通知单 (采购退货)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitNote {
    pub id: DocumentId,
    pub organization_id: DocumentId,
    pub supplier_id: DocumentId,
    pub supplier_display_name: String,
    pub source_of_supply: Option<String>,
    pub destination_of_supply: Option<String>,
    pub tax_mode: String,
    pub bill_id: DocumentId,
    pub bill_number: String,
    pub bill_date: Option<String>,
    pub bill_type: Option<String>,
    pub order_number: Option<String>,
    pub payment_mode: Option<String>,
    pub deposit_account_id: Option<DocumentId>,
    /// 通知单编号
    pub debit_note: String,
    pub supplier_debit_date: Option<String>,
    pub subject: Option<String>,
    pub note: Option<String>,
    pub items: Vec<DebitNoteItem>,
    pub total_item: i64,
    pub sub_total: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub vat: BigDecimal,
    pub total_tax_amount: BigDecimal,
    pub grand_total: BigDecimal,
    pub purchase_journal: Vec<PurchaseJournalEntry>,
    pub created_date: String,
    pub created_date_time: DateTime<Utc>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl DebitNote {
    pub fn item_ids(&self) -> impl Iterator<Item = &DocumentId> {
        self.items.iter().map(|i| &i.item_id)
    }

    pub fn quantity_of(&self, item_id: &DocumentId) -> i64 {
        self.items
            .iter()
            .filter(|i| &i.item_id == item_id)
            .map(|i| i.item_quantity)
            .sum()
    }

    pub fn is_cash(&self) -> bool {
        self.payment_mode.as_deref() == Some("Cash")
    }
}

/// 借项通知单明细 (已重算)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitNoteItem {
    pub item_id: DocumentId,
    pub item_name: String,
    pub item_quantity: i64,
    pub item_cost_price: BigDecimal,
    pub tax_preference: String,
    pub item_cgst: BigDecimal,
    pub item_sgst: BigDecimal,
    pub item_igst: BigDecimal,
    pub item_vat: BigDecimal,
    pub item_cgst_amount: BigDecimal,
    pub item_sgst_amount: BigDecimal,
    pub item_igst_amount: BigDecimal,
    pub item_vat_amount: BigDecimal,
    pub item_total_tax: BigDecimal,
    pub item_amount: BigDecimal,
    pub stock: Option<i64>,
}

/// 采购分录: 按采购科目归集的退货金额 (贷方)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseJournalEntry {
    pub account_id: DocumentId,
    pub credit_amount: BigDecimal,
}

/// 更新请求体
///
/// 字符串字段去除首尾空白, 空串视为未提供
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDebitNoteRequest {
    #[serde(default, deserialize_with = "clean_string")]
    pub supplier_id: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub supplier_display_name: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub source_of_supply: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub destination_of_supply: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub bill_id: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub bill_number: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub bill_date: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub bill_type: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub order_number: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub payment_mode: Option<String>,
    #[serde(default, alias = "depositTo", deserialize_with = "clean_string")]
    pub deposit_account_id: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub debit_note: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub supplier_debit_date: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub note: Option<String>,
    #[serde(default)]
    pub items: Vec<DebitNoteItemInput>,
    pub total_item: Option<i64>,
    pub sub_total: Option<BigDecimal>,
    pub cgst: Option<BigDecimal>,
    pub sgst: Option<BigDecimal>,
    pub igst: Option<BigDecimal>,
    pub vat: Option<BigDecimal>,
    pub total_tax_amount: Option<BigDecimal>,
    pub grand_total: Option<BigDecimal>,
}

impl UpdateDebitNoteRequest {
    pub fn is_cash(&self) -> bool {
        self.payment_mode.as_deref() == Some("Cash")
    }
}

/// 请求明细
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitNoteItemInput {
    #[serde(default, deserialize_with = "clean_string")]
    pub item_id: Option<String>,
    #[serde(default, deserialize_with = "clean_string")]
    pub item_name: Option<String>,
    pub item_quantity: Option<i64>,
    pub item_cost_price: Option<BigDecimal>,
    #[serde(default, deserialize_with = "clean_string")]
    pub tax_preference: Option<String>,
    pub item_cgst: Option<BigDecimal>,
    pub item_sgst: Option<BigDecimal>,
    pub item_igst: Option<BigDecimal>,
    pub item_vat: Option<BigDecimal>,
    pub item_cgst_amount: Option<BigDecimal>,
    pub item_sgst_amount: Option<BigDecimal>,
    pub item_igst_amount: Option<BigDecimal>,
    pub item_vat_amount: Option<BigDecimal>,
    pub item_total_tax: Option<BigDecimal>,
    pub item_amount: Option<BigDecimal>,
    pub stock: Option<i64>,
}

impl DebitNoteItemInput {
    pub fn quantity(&self) -> i64 {
        self.item_quantity.unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.item_name.as_deref().unwrap_or_default()
    }
}

fn clean_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}
