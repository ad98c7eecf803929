#![allow(dead_code)]

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, TimeZone, Utc};
use debit_note_service::db::MemoryStore;
use debit_note_service::models::{
    Account, Bill, BillItem, DebitNote, DebitNoteItem, DefaultAccount, DocumentId, Item, ItemTrack,
    Organization, PurchaseJournalEntry, Supplier, TrialBalance,
};
use serde_json::{json, Value};

pub const ORG: &str = "65f000000000000000000e01";
pub const SUPPLIER: &str = "65f000000000000000000b01";
pub const BILL: &str = "65f000000000000000000c01";
pub const NOTE: &str = "65f000000000000000000f01";
pub const WIDGET: &str = "65f000000000000000000d01";
pub const GADGET: &str = "65f000000000000000000d02";

pub const PURCHASE_ACCOUNT: &str = "65f000000000000000000a01";
pub const CGST_ACCOUNT: &str = "65f000000000000000000a02";
pub const SGST_ACCOUNT: &str = "65f000000000000000000a03";
pub const IGST_ACCOUNT: &str = "65f000000000000000000a04";
pub const DEPOSIT_ACCOUNT: &str = "65f000000000000000000a05";
pub const GADGET_ACCOUNT: &str = "65f000000000000000000a07";
pub const SUPPLIER_ACCOUNT: &str = "65f000000000000000000a09";

pub fn id(raw: &str) -> DocumentId {
    DocumentId::parse(raw).unwrap()
}

pub fn dec(raw: &str) -> BigDecimal {
    raw.parse().unwrap()
}

/// 原通知单及其分录的创建时间
pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()
}

fn account(raw: &str, name: &str, party: Option<&str>) -> Account {
    Account {
        id: id(raw),
        organization_id: id(ORG),
        account_name: name.into(),
        party_id: party.map(id),
    }
}

fn item(raw: &str, name: &str, cost: &str, selling: &str, purchase_account: Option<&str>) -> Item {
    Item {
        id: id(raw),
        organization_id: id(ORG),
        item_name: name.into(),
        cost_price: dec(cost),
        selling_price: dec(selling),
        cgst: dec("9"),
        sgst: dec("9"),
        igst: dec("18"),
        vat: BigDecimal::zero(),
        tax_preference: "Taxable".into(),
        purchase_account_id: purchase_account.map(id),
    }
}

fn bill_item(raw: &str, qty: i64, cost: &str, returned: i64) -> BillItem {
    BillItem {
        item_id: id(raw),
        item_quantity: qty,
        item_cost_price: dec(cost),
        item_cgst: dec("9"),
        item_sgst: dec("9"),
        item_igst: dec("18"),
        return_quantity: returned,
    }
}

pub fn note_line(raw: &str, name: &str, qty: i64, cost: &str) -> DebitNoteItem {
    let amount = dec(cost) * BigDecimal::from(qty);
    let tax = &amount * dec("0.09");
    DebitNoteItem {
        item_id: id(raw),
        item_name: name.into(),
        item_quantity: qty,
        item_cost_price: dec(cost),
        tax_preference: "Taxable".into(),
        item_cgst: dec("9"),
        item_sgst: dec("9"),
        item_igst: dec("18"),
        item_vat: BigDecimal::zero(),
        item_cgst_amount: tax.clone(),
        item_sgst_amount: tax.clone(),
        item_igst_amount: BigDecimal::zero(),
        item_vat_amount: BigDecimal::zero(),
        item_total_tax: &tax + &tax,
        item_amount: amount,
        stock: None,
    }
}

/// 已保存的通知单 DN-1: Widget x3, Gadget x2
pub fn existing_note() -> DebitNote {
    DebitNote {
        id: id(NOTE),
        organization_id: id(ORG),
        supplier_id: id(SUPPLIER),
        supplier_display_name: "Acme Traders".into(),
        source_of_supply: Some("KL".into()),
        destination_of_supply: Some("KL".into()),
        tax_mode: "Intra".into(),
        bill_id: id(BILL),
        bill_number: "BILL-100".into(),
        bill_date: Some("2024-03-01".into()),
        bill_type: Some("Registered".into()),
        order_number: Some("PO-9".into()),
        payment_mode: Some("Credit".into()),
        deposit_account_id: None,
        debit_note: "DN-1".into(),
        supplier_debit_date: Some("2024-03-05".into()),
        subject: None,
        note: None,
        items: vec![
            note_line(WIDGET, "Widget", 3, "50"),
            note_line(GADGET, "Gadget", 2, "20"),
        ],
        total_item: 5,
        sub_total: dec("190"),
        cgst: dec("17.10"),
        sgst: dec("17.10"),
        igst: BigDecimal::zero(),
        vat: BigDecimal::zero(),
        total_tax_amount: dec("34.20"),
        grand_total: dec("224.20"),
        purchase_journal: vec![
            PurchaseJournalEntry {
                account_id: id(PURCHASE_ACCOUNT),
                credit_amount: dec("150"),
            },
            PurchaseJournalEntry {
                account_id: id(GADGET_ACCOUNT),
                credit_amount: dec("40"),
            },
        ],
        created_date: "2024-03-05".into(),
        created_date_time: created_at(),
        last_modified_date: None,
    }
}

fn old_journal_row(account_id: &str, debit: &str, credit: &str) -> TrialBalance {
    TrialBalance {
        organization_id: id(ORG),
        operation_id: id(NOTE),
        transaction_id: "BILL-100".into(),
        date: "2024-03-05".into(),
        account_id: id(account_id),
        action: "Purchase Return".into(),
        debit_amount: dec(debit),
        credit_amount: dec(credit),
        remark: None,
        created_date_time: created_at(),
    }
}

/// 组织、供应商、科目、商品、账单及原通知单
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();

    store.insert_organization(Organization {
        id: id(ORG),
        organization_country: "India".into(),
    });
    store.insert_supplier(Supplier {
        id: id(SUPPLIER),
        organization_id: id(ORG),
        supplier_display_name: "Acme Traders".into(),
        tax_type: "GST".into(),
    });

    store.insert_account(account(PURCHASE_ACCOUNT, "Purchase", None));
    store.insert_account(account(CGST_ACCOUNT, "Input CGST", None));
    store.insert_account(account(SGST_ACCOUNT, "Input SGST", None));
    store.insert_account(account(IGST_ACCOUNT, "Input IGST", None));
    store.insert_account(account(DEPOSIT_ACCOUNT, "Petty Cash", None));
    store.insert_account(account(GADGET_ACCOUNT, "Hardware Purchase", None));
    store.insert_account(account(SUPPLIER_ACCOUNT, "Acme Traders", Some(SUPPLIER)));
    store.set_default_account(
        id(ORG),
        DefaultAccount {
            organization_id: Some(id(ORG)),
            purchase_account: Some(id(PURCHASE_ACCOUNT)),
            input_cgst: Some(id(CGST_ACCOUNT)),
            input_sgst: Some(id(SGST_ACCOUNT)),
            input_igst: Some(id(IGST_ACCOUNT)),
            input_vat: None,
        },
    );

    store.insert_item(item(WIDGET, "Widget", "50", "80", None));
    store.insert_item(item(GADGET, "Gadget", "20", "35", Some(GADGET_ACCOUNT)));

    store.insert_bill(Bill {
        id: id(BILL),
        organization_id: id(ORG),
        supplier_id: id(SUPPLIER),
        bill_number: "BILL-100".into(),
        bill_date: Some("2024-03-01".into()),
        order_number: Some("PO-9".into()),
        items: vec![bill_item(WIDGET, 10, "50", 3), bill_item(GADGET, 5, "20", 2)],
    });

    store.insert_debit_note(existing_note());
    store.insert_trial_balance(vec![
        old_journal_row(PURCHASE_ACCOUNT, "0", "150"),
        old_journal_row(GADGET_ACCOUNT, "0", "40"),
        old_journal_row(CGST_ACCOUNT, "0", "17.10"),
        old_journal_row(SGST_ACCOUNT, "0", "17.10"),
        old_journal_row(SUPPLIER_ACCOUNT, "224.20", "0"),
    ]);
    store.insert_item_tracks(
        existing_note()
            .items
            .iter()
            .map(|line| ItemTrack {
                organization_id: id(ORG),
                operation_id: id(NOTE),
                transaction_id: "DN-1".into(),
                action: "Debit Note".into(),
                date: Some("2024-03-05".into()),
                item_id: line.item_id.clone(),
                selling_price: BigDecimal::zero(),
                cost_price: line.item_cost_price.clone(),
                credit_quantity: line.item_quantity,
                remark: "Returned to Acme Traders".into(),
                created_date_time: created_at(),
            })
            .collect(),
    );

    store
}

fn line_json(raw: &str, name: &str, qty: i64, cost: i64) -> Value {
    json!({
        "itemId": raw,
        "itemName": name,
        "itemQuantity": qty,
        "itemCostPrice": cost,
        "taxPreference": "Taxable",
        "itemCgst": 9,
        "itemSgst": 9,
        "itemIgst": 18,
    })
}

/// 更新请求: Widget x4, Gadget x1, 合计 259.60
pub fn update_body() -> Value {
    json!({
        "supplierId": SUPPLIER,
        "supplierDisplayName": "Acme Traders",
        "sourceOfSupply": "KL",
        "destinationOfSupply": "KL",
        "billId": BILL,
        "billNumber": "BILL-100",
        "billDate": "2024-03-01",
        "billType": "Registered",
        "orderNumber": "PO-9",
        "paymentMode": "Credit",
        "debitNote": "DN-1",
        "supplierDebitDate": "2024-03-06",
        "subject": "  Damaged in transit ",
        "note": "Returned two cartons",
        "items": [
            line_json(WIDGET, "Widget", 4, 50),
            line_json(GADGET, "Gadget", 1, 20),
        ],
        "totalItem": 5,
        "subTotal": "220.00",
        "cgst": "19.80",
        "sgst": "19.80",
        "totalTaxAmount": "39.60",
        "grandTotal": "259.60",
    })
}

/// 只保留 Widget x4 的请求
pub fn widget_only_body() -> Value {
    let mut body = update_body();
    body["items"] = json!([line_json(WIDGET, "Widget", 4, 50)]);
    body["totalItem"] = json!(4);
    body["subTotal"] = json!("200");
    body["cgst"] = json!("18");
    body["sgst"] = json!("18");
    body["totalTaxAmount"] = json!("36");
    body["grandTotal"] = json!("236");
    body
}

pub const UAE_ORG: &str = "65f000000000000000000e02";
pub const UAE_SUPPLIER: &str = "65f000000000000000000b02";
pub const UAE_BILL: &str = "65f000000000000000000c02";
pub const UAE_NOTE: &str = "65f000000000000000000f11";
pub const LAMP: &str = "65f000000000000000000d11";
pub const UAE_PURCHASE_ACCOUNT: &str = "65f000000000000000000a11";
pub const VAT_ACCOUNT: &str = "65f000000000000000000a16";
pub const UAE_SUPPLIER_ACCOUNT: &str = "65f000000000000000000a19";

fn uae_account(raw: &str, name: &str, party: Option<&str>) -> Account {
    Account {
        organization_id: id(UAE_ORG),
        ..account(raw, name, party)
    }
}

/// 阿联酋组织: VAT 供应商, Lamp 5% VAT, 原通知单 DN-U1 (Lamp x1)
pub fn seed_uae(store: &MemoryStore) {
    store.insert_organization(Organization {
        id: id(UAE_ORG),
        organization_country: "United Arab Emirates".into(),
    });
    store.insert_supplier(Supplier {
        id: id(UAE_SUPPLIER),
        organization_id: id(UAE_ORG),
        supplier_display_name: "Gulf Supplies".into(),
        tax_type: "VAT".into(),
    });

    store.insert_account(uae_account(UAE_PURCHASE_ACCOUNT, "Purchase", None));
    store.insert_account(uae_account(VAT_ACCOUNT, "Input VAT", None));
    store.insert_account(uae_account(UAE_SUPPLIER_ACCOUNT, "Gulf Supplies", Some(UAE_SUPPLIER)));
    store.set_default_account(
        id(UAE_ORG),
        DefaultAccount {
            organization_id: Some(id(UAE_ORG)),
            purchase_account: Some(id(UAE_PURCHASE_ACCOUNT)),
            input_vat: Some(id(VAT_ACCOUNT)),
            ..Default::default()
        },
    );

    store.insert_item(Item {
        id: id(LAMP),
        organization_id: id(UAE_ORG),
        item_name: "Lamp".into(),
        cost_price: dec("110"),
        selling_price: dec("150"),
        cgst: BigDecimal::zero(),
        sgst: BigDecimal::zero(),
        igst: BigDecimal::zero(),
        vat: dec("5"),
        tax_preference: "Taxable".into(),
        purchase_account_id: None,
    });

    store.insert_bill(Bill {
        id: id(UAE_BILL),
        organization_id: id(UAE_ORG),
        supplier_id: id(UAE_SUPPLIER),
        bill_number: "BILL-UAE-1".into(),
        bill_date: Some("2024-04-01".into()),
        order_number: None,
        items: vec![BillItem {
            item_id: id(LAMP),
            item_quantity: 5,
            item_cost_price: dec("110"),
            item_cgst: BigDecimal::zero(),
            item_sgst: BigDecimal::zero(),
            item_igst: BigDecimal::zero(),
            return_quantity: 1,
        }],
    });

    let mut note = existing_note();
    note.id = id(UAE_NOTE);
    note.organization_id = id(UAE_ORG);
    note.supplier_id = id(UAE_SUPPLIER);
    note.supplier_display_name = "Gulf Supplies".into();
    note.source_of_supply = Some("Dubai".into());
    note.destination_of_supply = Some("Dubai".into());
    note.tax_mode = "VAT".into();
    note.bill_id = id(UAE_BILL);
    note.bill_number = "BILL-UAE-1".into();
    note.bill_date = Some("2024-04-01".into());
    note.order_number = None;
    note.debit_note = "DN-U1".into();
    note.items = vec![note_line(LAMP, "Lamp", 1, "110")];
    store.insert_debit_note(note);
}

/// VAT 更新请求: Lamp x2, 5% VAT, 合计 231.00
pub fn vat_body() -> Value {
    json!({
        "supplierId": UAE_SUPPLIER,
        "sourceOfSupply": "Dubai",
        "destinationOfSupply": "Dubai",
        "billId": UAE_BILL,
        "billDate": "2024-04-01",
        "billType": "Overseas",
        "paymentMode": "Credit",
        "debitNote": "DN-U1",
        "supplierDebitDate": "2024-04-03",
        "items": [{
            "itemId": LAMP,
            "itemName": "Lamp",
            "itemQuantity": 2,
            "itemCostPrice": 110,
            "taxPreference": "Taxable",
            "itemVat": 5,
        }],
        "vat": "11.00",
        "grandTotal": "231.00",
    })
}
