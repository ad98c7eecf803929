//! 借项通知单更新校验
//!
//! 除 ID 校验外, 所有规则都收集到同一个错误列表, 一次性返回给前端。

use crate::error::{AppError, AppResult};
use crate::models::reference::{supply_regions, VALID_BILL_TYPES, VALID_PAYMENT_MODES};
use crate::models::{
    Bill, DebitNote, DebitNoteItemInput, DocumentId, Item, Organization, Supplier,
    UpdateDebitNoteRequest,
};
use bigdecimal::BigDecimal;
use indexmap::IndexSet;

/// 通过 ID 校验后的引用
#[derive(Debug, Clone)]
pub struct ValidatedIds {
    pub supplier_id: DocumentId,
    pub bill_id: DocumentId,
    pub item_ids: Vec<DocumentId>,
}

/// 校验供应商、账单、商品ID及通知单编号 (在任何查询之前执行)
pub fn validate_ids(req: &UpdateDebitNoteRequest, existing: &DebitNote) -> AppResult<ValidatedIds> {
    let supplier_id = match req.supplier_id.as_deref() {
        None => return Err(AppError::bad_request("Please select a Supplier")),
        Some(raw) => DocumentId::parse(raw)
            .ok_or_else(|| AppError::bad_request(format!("Invalid supplier ID: {}", raw)))?,
    };

    let bill_id = match req.bill_id.as_deref() {
        None => return Err(AppError::bad_request("Select a bill")),
        Some(raw) => DocumentId::parse(raw)
            .ok_or_else(|| AppError::bad_request(format!("Invalid bill ID: {}", raw)))?,
    };

    if req.items.is_empty() {
        return Err(AppError::bad_request("Select an item"));
    }

    let raw_ids: Vec<&str> = req
        .items
        .iter()
        .map(|item| item.item_id.as_deref().unwrap_or_default())
        .collect();

    let invalid: Vec<&str> = raw_ids
        .iter()
        .copied()
        .filter(|raw| DocumentId::parse(raw).is_none())
        .collect();
    if !invalid.is_empty() {
        return Err(AppError::bad_request(format!("Invalid item IDs: {}", invalid.join(", "))));
    }

    let item_ids: Vec<DocumentId> = raw_ids.iter().filter_map(|raw| DocumentId::parse(raw)).collect();
    let unique: IndexSet<&DocumentId> = item_ids.iter().collect();
    if unique.len() != item_ids.len() {
        return Err(AppError::bad_request("Duplicate Item found in the list."));
    }

    if req.debit_note.as_deref() != Some(existing.debit_note.as_str()) {
        return Err(AppError::bad_request(format!(
            "The provided debitNote does not match the existing record. Expected: {}",
            existing.debit_note
        )));
    }

    Ok(ValidatedIds {
        supplier_id,
        bill_id,
        item_ids,
    })
}

/// 只允许编辑最新的一张通知单
pub fn ensure_latest(latest: Option<&DebitNote>, debit_id: &DocumentId) -> AppResult<()> {
    match latest {
        None => Err(AppError::not_found("No debit note found for this supplier.")),
        Some(latest) if &latest.id != debit_id => {
            Err(AppError::bad_request("Only the latest debit note can be edited."))
        }
        Some(_) => Ok(()),
    }
}

/// 组织、供应商、账单必须存在
pub fn validate_references(
    organization: Option<Organization>,
    supplier: Option<Supplier>,
    bill: Option<Bill>,
) -> AppResult<(Organization, Supplier, Bill)> {
    let organization = organization.ok_or_else(|| AppError::not_found("Organization not found"))?;
    let supplier = supplier.ok_or_else(|| AppError::not_found("Supplier not found"))?;
    let bill = bill.ok_or_else(|| AppError::not_found("Bill not found"))?;
    Ok((organization, supplier, bill))
}

/// 校验所需的上下文
pub struct InputContext<'a> {
    pub organization: &'a Organization,
    pub supplier: &'a Supplier,
    pub bill: &'a Bill,
    pub items: &'a [Item],
    pub existing: &'a DebitNote,
}

/// 业务规则校验, 返回全部错误
pub fn validate_inputs(req: &UpdateDebitNoteRequest, ctx: &InputContext<'_>) -> AppResult<()> {
    let mut errors = Vec::new();

    validate_required_fields(req, ctx.supplier, &mut errors);
    validate_item_table(&req.items, ctx.items, &mut errors);
    validate_bill_data(req, ctx.bill, ctx.existing, &mut errors);

    validate_supply(
        "Source of Supply",
        req.source_of_supply.as_deref(),
        ctx.organization,
        &mut errors,
    );
    validate_supply(
        "Destination of Supply",
        req.destination_of_supply.as_deref(),
        ctx.organization,
        &mut errors,
    );
    validate_listed("Bill Type", req.bill_type.as_deref(), VALID_BILL_TYPES, &mut errors);
    validate_listed("Payment Mode", req.payment_mode.as_deref(), VALID_PAYMENT_MODES, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn check(condition: bool, message: impl FnOnce() -> String, errors: &mut Vec<String>) {
    if condition {
        errors.push(message());
    }
}

fn validate_required_fields(req: &UpdateDebitNoteRequest, supplier: &Supplier, errors: &mut Vec<String>) {
    let gst = supplier.is_gst();
    check(gst && req.source_of_supply.is_none(), || "Source of supply required".into(), errors);
    check(gst && req.destination_of_supply.is_none(), || "Destination of supply required".into(), errors);
    check(req.bill_type.is_none(), || "Select a bill type".into(), errors);
    check(req.payment_mode.is_none(), || "Select payment mode".into(), errors);
    check(req.supplier_debit_date.is_none(), || "Select supplier debit date".into(), errors);
    check(req.grand_total.is_none(), || "Enter the amount".into(), errors);
    check(
        req.is_cash() && req.deposit_account_id.is_none(),
        || "Select deposit account".into(),
        errors,
    );
}

fn rate(value: &Option<BigDecimal>) -> BigDecimal {
    value.clone().unwrap_or_default()
}

/// 与商品主数据比对
fn validate_item_table(inputs: &[DebitNoteItemInput], items: &[Item], errors: &mut Vec<String>) {
    check(
        inputs.len() != items.len(),
        || "Mismatch in item count between request and database.".into(),
        errors,
    );

    for input in inputs {
        let raw_id = input.item_id.as_deref().unwrap_or_default();
        let Some(item) = items.iter().find(|it| it.id == *raw_id) else {
            errors.push(format!("Item with ID {} was not found.", raw_id));
            continue;
        };

        let name = input.name();
        check(name != item.item_name, || format!("Item Name Mismatch : {}", name), errors);
        check(
            rate(&input.item_cgst) != item.cgst,
            || format!("CGST Mismatch for {}: {}", name, rate(&input.item_cgst)),
            errors,
        );
        check(
            rate(&input.item_sgst) != item.sgst,
            || format!("SGST Mismatch for {}: {}", name, rate(&input.item_sgst)),
            errors,
        );
        check(
            rate(&input.item_igst) != item.igst,
            || format!("IGST Mismatch for {}: {}", name, rate(&input.item_igst)),
            errors,
        );
        check(
            rate(&input.item_vat) != item.vat,
            || format!("VAT Mismatch for {}: {}", name, rate(&input.item_vat)),
            errors,
        );
        check(
            input.tax_preference.as_deref() != Some(item.tax_preference.as_str()),
            || {
                format!(
                    "Tax Preference mismatch for {}: {}",
                    name,
                    input.tax_preference.as_deref().unwrap_or_default()
                )
            },
            errors,
        );
    }
}

/// 与账单比对: 只校验通知单包含的商品
fn validate_bill_data(req: &UpdateDebitNoteRequest, bill: &Bill, existing: &DebitNote, errors: &mut Vec<String>) {
    check(
        bill.bill_date != req.bill_date,
        || format!("Bill Date mismatch for {}", bill.bill_date.as_deref().unwrap_or_default()),
        errors,
    );
    check(
        bill.order_number != req.order_number,
        || format!("Order Number mismatch for {}", bill.order_number.as_deref().unwrap_or_default()),
        errors,
    );

    for input in &req.items {
        let raw_id = input.item_id.as_deref().unwrap_or_default();
        let Some(bill_item) = bill.items.iter().find(|bi| bi.item_id == *raw_id) else {
            errors.push(format!("Item ID {} not found in provided bills.", raw_id));
            continue;
        };

        let id = &bill_item.item_id;
        let qty = input.quantity();
        let cost = rate(&input.item_cost_price);
        check(
            cost != bill_item.item_cost_price,
            || format!("Item Cost Price mismatch for {}: Expected {}, got {}", id, bill_item.item_cost_price, cost),
            errors,
        );
        check(
            rate(&input.item_cgst) != bill_item.item_cgst,
            || format!("Item CGST mismatch for {}: Expected {}, got {}", id, bill_item.item_cgst, rate(&input.item_cgst)),
            errors,
        );
        check(
            rate(&input.item_sgst) != bill_item.item_sgst,
            || format!("Item SGST mismatch for {}: Expected {}, got {}", id, bill_item.item_sgst, rate(&input.item_sgst)),
            errors,
        );
        check(
            rate(&input.item_igst) != bill_item.item_igst,
            || format!("Item IGST mismatch for {}: Expected {}, got {}", id, bill_item.item_igst, rate(&input.item_igst)),
            errors,
        );
        check(
            qty > bill_item.item_quantity,
            || format!(
                "Provided quantity ({}) cannot exceed bill items quantity ({}).",
                qty, bill_item.item_quantity
            ),
            errors,
        );
        check(qty <= 0, || format!("Quantity must be greater than 0 for item {}.", id), errors);
        if let Some(stock) = input.stock {
            check(
                qty > stock,
                || format!(
                    "Provided quantity ({}) cannot exceed stock available ({}) for item {}.",
                    qty, stock, id
                ),
                errors,
            );
        }

        // 本单原数量已计入 return_quantity, 需加回
        let returnable = bill_item.item_quantity - bill_item.return_quantity + existing.quantity_of(id);
        check(
            qty > returnable && qty <= bill_item.item_quantity,
            || format!(
                "Provided quantity ({}) exceeds the returnable quantity ({}) for item {}.",
                qty, returnable, id
            ),
            errors,
        );
    }
}

fn validate_supply(label: &str, value: Option<&str>, organization: &Organization, errors: &mut Vec<String>) {
    if let Some(value) = value {
        let known = supply_regions(&organization.organization_country)
            .is_some_and(|regions| regions.contains(&value));
        check(!known, || format!("Invalid {}: {}", label, value), errors);
    }
}

fn validate_listed(label: &str, value: Option<&str>, valid: &[&str], errors: &mut Vec<String>) {
    if let Some(value) = value {
        check(!valid.contains(&value), || format!("Invalid {}: {}", label, value), errors);
    }
}
