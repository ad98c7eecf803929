use crate::error::{AppError, AppResult};
use crate::models::{DebitNoteItem, DebitNoteItemInput, DocumentId, Supplier, UpdateDebitNoteRequest};
use bigdecimal::{BigDecimal, Zero};

pub const TAX_MODE_INTRA: &str = "Intra";
pub const TAX_MODE_INTER: &str = "Inter";
pub const TAX_MODE_VAT: &str = "VAT";
pub const TAX_MODE_NONE: &str = "Non-Tax";

/// 计税方式: GST 按供应地区分州内/州际
pub fn tax_mode(req: &UpdateDebitNoteRequest, supplier: &Supplier) -> &'static str {
    match supplier.tax_type.as_str() {
        "GST" if req.source_of_supply == req.destination_of_supply => TAX_MODE_INTRA,
        "GST" => TAX_MODE_INTER,
        "VAT" => TAX_MODE_VAT,
        _ => TAX_MODE_NONE,
    }
}

/// 重算结果
#[derive(Debug, Clone)]
pub struct Calculation {
    pub items: Vec<DebitNoteItem>,
    pub total_item: i64,
    pub sub_total: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub vat: BigDecimal,
    pub total_tax_amount: BigDecimal,
    pub grand_total: BigDecimal,
}

/// 金额统一保留两位小数
fn money(value: BigDecimal) -> BigDecimal {
    value.round(2).with_scale(2)
}

fn percent(amount: &BigDecimal, rate: &BigDecimal) -> BigDecimal {
    money(amount * rate / BigDecimal::from(100))
}

/// 提供了金额时与重算值比对, 不一致记为错误
fn compare(field: &str, owner: Option<&str>, calculated: &BigDecimal, provided: Option<&BigDecimal>, errors: &mut Vec<String>) {
    let Some(provided) = provided else {
        return;
    };
    if money(provided.clone()) != *calculated {
        let target = match owner {
            Some(name) => format!("{} for {}", field, name),
            None => field.to_string(),
        };
        errors.push(format!(
            "Mismatch in {}: calculated {}, provided {}",
            target, calculated, provided
        ));
    }
}

fn calculate_item(
    input: &DebitNoteItemInput,
    item_id: DocumentId,
    mode: &str,
    errors: &mut Vec<String>,
) -> DebitNoteItem {
    let rate = |v: &Option<BigDecimal>| v.clone().unwrap_or_default();
    let cost = rate(&input.item_cost_price);
    let amount = money(&cost * BigDecimal::from(input.quantity()));

    let taxable = input.tax_preference.as_deref() == Some("Taxable");
    let zero = BigDecimal::zero;
    let (cgst, sgst, igst, vat) = match mode {
        TAX_MODE_INTRA if taxable => (
            percent(&amount, &rate(&input.item_cgst)),
            percent(&amount, &rate(&input.item_sgst)),
            zero(),
            zero(),
        ),
        TAX_MODE_INTER if taxable => (zero(), zero(), percent(&amount, &rate(&input.item_igst)), zero()),
        TAX_MODE_VAT if taxable => (zero(), zero(), zero(), percent(&amount, &rate(&input.item_vat))),
        _ => (zero(), zero(), zero(), zero()),
    };
    let total_tax = &cgst + &sgst + &igst + &vat;

    let name = input.name();
    compare("itemAmount", Some(name), &amount, input.item_amount.as_ref(), errors);
    compare("itemCgstAmount", Some(name), &cgst, input.item_cgst_amount.as_ref(), errors);
    compare("itemSgstAmount", Some(name), &sgst, input.item_sgst_amount.as_ref(), errors);
    compare("itemIgstAmount", Some(name), &igst, input.item_igst_amount.as_ref(), errors);
    compare("itemVatAmount", Some(name), &vat, input.item_vat_amount.as_ref(), errors);
    compare("itemTotalTax", Some(name), &total_tax, input.item_total_tax.as_ref(), errors);

    DebitNoteItem {
        item_id,
        item_name: name.to_string(),
        item_quantity: input.quantity(),
        item_cost_price: cost,
        tax_preference: input.tax_preference.clone().unwrap_or_default(),
        item_cgst: rate(&input.item_cgst),
        item_sgst: rate(&input.item_sgst),
        item_igst: rate(&input.item_igst),
        item_vat: rate(&input.item_vat),
        item_cgst_amount: cgst,
        item_sgst_amount: sgst,
        item_igst_amount: igst,
        item_vat_amount: vat,
        item_total_tax: total_tax,
        item_amount: amount,
        stock: input.stock,
    }
}

fn sum(items: &[DebitNoteItem], field: impl Fn(&DebitNoteItem) -> &BigDecimal) -> BigDecimal {
    items.iter().map(field).fold(BigDecimal::zero(), |acc, v| acc + v)
}

/// 重算明细与合计, 请求中提供的金额必须与重算值一致
///
/// `item_ids` 为已校验的明细商品ID, 与 `req.items` 一一对应
pub fn calculate_debit_note(
    req: &UpdateDebitNoteRequest,
    item_ids: &[DocumentId],
    mode: &str,
) -> AppResult<Calculation> {
    let mut errors = Vec::new();

    let items: Vec<DebitNoteItem> = req
        .items
        .iter()
        .zip(item_ids.iter().cloned())
        .map(|(input, item_id)| calculate_item(input, item_id, mode, &mut errors))
        .collect();

    let total_item: i64 = items.iter().map(|i| i.item_quantity).sum();
    let sub_total = sum(&items, |i| &i.item_amount);
    let cgst = sum(&items, |i| &i.item_cgst_amount);
    let sgst = sum(&items, |i| &i.item_sgst_amount);
    let igst = sum(&items, |i| &i.item_igst_amount);
    let vat = sum(&items, |i| &i.item_vat_amount);
    let total_tax_amount = &cgst + &sgst + &igst + &vat;
    let grand_total = &sub_total + &total_tax_amount;

    if let Some(provided) = req.total_item {
        if provided != total_item {
            errors.push(format!(
                "Mismatch in totalItem: calculated {}, provided {}",
                total_item, provided
            ));
        }
    }
    compare("subTotal", None, &sub_total, req.sub_total.as_ref(), &mut errors);
    compare("cgst", None, &cgst, req.cgst.as_ref(), &mut errors);
    compare("sgst", None, &sgst, req.sgst.as_ref(), &mut errors);
    compare("igst", None, &igst, req.igst.as_ref(), &mut errors);
    compare("vat", None, &vat, req.vat.as_ref(), &mut errors);
    compare("totalTaxAmount", None, &total_tax_amount, req.total_tax_amount.as_ref(), &mut errors);
    compare("grandTotal", None, &grand_total, req.grand_total.as_ref(), &mut errors);

    if !errors.is_empty() {
        tracing::warn!("Debit note calculation mismatch: {:?}", errors);
        return Err(AppError::Validation(errors));
    }

    Ok(Calculation {
        items,
        total_item,
        sub_total,
        cgst,
        sgst,
        igst,
        vat,
        total_tax_amount,
        grand_total,
    })
}
