//! 会计科目解析与分录生成

use crate::db::DebitNoteStore;
use crate::error::{AppError, AppResult};
use crate::models::{
    Account, DebitNote, DebitNoteItem, DefaultAccount, DocumentId, Item, ItemTrack,
    PurchaseJournalEntry, TrialBalance, UpdateDebitNoteRequest,
};
use crate::service::calculation::{TAX_MODE_INTER, TAX_MODE_INTRA, TAX_MODE_VAT};
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

pub const ACTION_PURCHASE_RETURN: &str = "Purchase Return";
pub const ACTION_DEBIT_NOTE: &str = "Debit Note";

/// 本次更新用到的科目
#[derive(Debug, Clone)]
pub struct Accounting {
    pub defaults: DefaultAccount,
    pub supplier_account: Account,
    /// 仅现金退款时存在
    pub deposit_account: Option<Account>,
}

fn required<'a>(account: &'a Option<DocumentId>, label: &str) -> AppResult<&'a DocumentId> {
    account
        .as_ref()
        .ok_or_else(|| AppError::bad_request(format!("{} account not configured", label)))
}

/// 解析默认科目、供应商明细科目和现金退款的收款科目
pub async fn default_accounting(
    store: &dyn DebitNoteStore,
    org: &DocumentId,
    supplier_id: &DocumentId,
    req: &UpdateDebitNoteRequest,
    mode: &str,
) -> AppResult<Accounting> {
    let defaults = store
        .find_default_account(org)
        .await?
        .ok_or_else(|| AppError::bad_request("Default accounts not configured"))?;

    match mode {
        TAX_MODE_INTRA => {
            required(&defaults.input_cgst, "Input CGST")?;
            required(&defaults.input_sgst, "Input SGST")?;
        }
        TAX_MODE_INTER => {
            required(&defaults.input_igst, "Input IGST")?;
        }
        TAX_MODE_VAT => {
            required(&defaults.input_vat, "Input VAT")?;
        }
        _ => {}
    }

    let supplier_account = store
        .find_supplier_account(org, supplier_id)
        .await?
        .ok_or_else(|| AppError::bad_request("Supplier account not found"))?;

    let deposit_account = if req.is_cash() {
        let deposit_id = req
            .deposit_account_id
            .as_deref()
            .and_then(DocumentId::parse)
            .ok_or_else(|| AppError::bad_request("Deposit account not found"))?;
        let account = store
            .find_account(org, &deposit_id)
            .await?
            .ok_or_else(|| AppError::bad_request("Deposit account not found"))?;
        Some(account)
    } else {
        None
    };

    Ok(Accounting {
        defaults,
        supplier_account,
        deposit_account,
    })
}

/// 按商品采购科目归集明细金额, 保持首次出现的顺序
pub fn purchase_journal(
    items: &[DebitNoteItem],
    masters: &[Item],
    defaults: &DefaultAccount,
) -> AppResult<Vec<PurchaseJournalEntry>> {
    let mut grouped: IndexMap<DocumentId, BigDecimal> = IndexMap::new();

    for line in items {
        let account_id = masters
            .iter()
            .find(|m| m.id == line.item_id)
            .and_then(|m| m.purchase_account_id.as_ref())
            .or(defaults.purchase_account.as_ref())
            .ok_or_else(|| {
                AppError::bad_request(format!("Purchase account not found for {}", line.item_name))
            })?;

        *grouped.entry(account_id.clone()).or_insert_with(BigDecimal::zero) += &line.item_amount;
    }

    Ok(grouped
        .into_iter()
        .map(|(account_id, credit_amount)| PurchaseJournalEntry {
            account_id,
            credit_amount,
        })
        .collect())
}

/// 试算平衡分录
///
/// 采购退货: 贷记采购科目及进项税, 借记供应商; 现金退款另记一组
/// 贷记供应商、借记收款科目的分录。借贷合计必须相等。
pub fn journal(note: &DebitNote, accounting: &Accounting, now: DateTime<Utc>) -> AppResult<Vec<TrialBalance>> {
    let row = |account_id: &DocumentId, action: &str, debit: BigDecimal, credit: BigDecimal| TrialBalance {
        organization_id: note.organization_id.clone(),
        operation_id: note.id.clone(),
        transaction_id: note.bill_number.clone(),
        date: note.created_date.clone(),
        account_id: account_id.clone(),
        action: action.to_string(),
        debit_amount: debit,
        credit_amount: credit,
        remark: note.note.clone(),
        created_date_time: now,
    };
    let zero = BigDecimal::zero;
    let defaults = &accounting.defaults;

    let mut rows: Vec<TrialBalance> = note
        .purchase_journal
        .iter()
        .map(|entry| row(&entry.account_id, ACTION_PURCHASE_RETURN, zero(), entry.credit_amount.clone()))
        .collect();

    let taxes = [
        (&note.cgst, &defaults.input_cgst, "Input CGST"),
        (&note.sgst, &defaults.input_sgst, "Input SGST"),
        (&note.igst, &defaults.input_igst, "Input IGST"),
        (&note.vat, &defaults.input_vat, "Input VAT"),
    ];
    for (amount, account, label) in taxes {
        if amount.is_zero() {
            continue;
        }
        let account_id = required(account, label)?;
        rows.push(row(account_id, ACTION_PURCHASE_RETURN, zero(), amount.clone()));
    }

    let supplier = &accounting.supplier_account.id;
    rows.push(row(supplier, ACTION_PURCHASE_RETURN, note.grand_total.clone(), zero()));

    if note.is_cash() && !note.grand_total.is_zero() {
        let deposit = accounting
            .deposit_account
            .as_ref()
            .ok_or_else(|| AppError::bad_request("Deposit account not found"))?;
        rows.push(row(supplier, ACTION_DEBIT_NOTE, zero(), note.grand_total.clone()));
        rows.push(row(&deposit.id, ACTION_DEBIT_NOTE, note.grand_total.clone(), zero()));
    }

    ensure_balanced(&rows)?;
    Ok(rows)
}

fn ensure_balanced(rows: &[TrialBalance]) -> AppResult<()> {
    let debit = rows.iter().fold(BigDecimal::zero(), |acc, r| acc + &r.debit_amount);
    let credit = rows.iter().fold(BigDecimal::zero(), |acc, r| acc + &r.credit_amount);
    if debit != credit {
        tracing::error!(%debit, %credit, "Debit note journal does not balance");
        return Err(AppError::Unbalanced { debit, credit });
    }
    Ok(())
}

/// 库存流水, 每个明细一行
pub fn item_track(note: &DebitNote, masters: &[Item], now: DateTime<Utc>) -> Vec<ItemTrack> {
    note.items
        .iter()
        .map(|line| {
            let (selling_price, cost_price) = masters
                .iter()
                .find(|m| m.id == line.item_id)
                .map(|m| (m.selling_price.clone(), m.cost_price.clone()))
                .unwrap_or_else(|| (BigDecimal::zero(), line.item_cost_price.clone()));

            ItemTrack {
                organization_id: note.organization_id.clone(),
                operation_id: note.id.clone(),
                transaction_id: note.debit_note.clone(),
                action: ACTION_DEBIT_NOTE.to_string(),
                date: note.supplier_debit_date.clone(),
                item_id: line.item_id.clone(),
                selling_price,
                cost_price,
                credit_quantity: line.item_quantity,
                remark: format!("Returned to {}", note.supplier_display_name),
                created_date_time: now,
            }
        })
        .collect()
}
