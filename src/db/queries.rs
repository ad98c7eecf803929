use crate::models::{
    Account, Bill, BillItem, DebitNote, DebitNoteItem, DefaultAccount, DocumentId, Item, ItemTrack,
    Organization, PurchaseJournalEntry, Supplier, TrialBalance,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgPool};

const DEBIT_NOTE_COLUMNS: &str = r#"
    id, organization_id, supplier_id, supplier_display_name,
    source_of_supply, destination_of_supply, tax_mode,
    bill_id, bill_number, bill_date, bill_type, order_number,
    payment_mode, deposit_account_id, debit_note, supplier_debit_date,
    subject, note, items, total_item, sub_total,
    cgst, sgst, igst, vat, total_tax_amount, grand_total,
    purchase_journal, created_date, created_date_time, last_modified_date
"#;

/// debit_notes 表行 (明细与采购分录存为 JSONB)
#[derive(Debug, FromRow)]
struct DebitNoteRow {
    id: DocumentId,
    organization_id: DocumentId,
    supplier_id: DocumentId,
    supplier_display_name: String,
    source_of_supply: Option<String>,
    destination_of_supply: Option<String>,
    tax_mode: String,
    bill_id: DocumentId,
    bill_number: String,
    bill_date: Option<String>,
    bill_type: Option<String>,
    order_number: Option<String>,
    payment_mode: Option<String>,
    deposit_account_id: Option<DocumentId>,
    debit_note: String,
    supplier_debit_date: Option<String>,
    subject: Option<String>,
    note: Option<String>,
    items: Json<Vec<DebitNoteItem>>,
    total_item: i64,
    sub_total: BigDecimal,
    cgst: BigDecimal,
    sgst: BigDecimal,
    igst: BigDecimal,
    vat: BigDecimal,
    total_tax_amount: BigDecimal,
    grand_total: BigDecimal,
    purchase_journal: Json<Vec<PurchaseJournalEntry>>,
    created_date: String,
    created_date_time: DateTime<Utc>,
    last_modified_date: Option<DateTime<Utc>>,
}

impl From<DebitNoteRow> for DebitNote {
    fn from(row: DebitNoteRow) -> Self {
        Self {
            id: row.id,
            organization_id: row.organization_id,
            supplier_id: row.supplier_id,
            supplier_display_name: row.supplier_display_name,
            source_of_supply: row.source_of_supply,
            destination_of_supply: row.destination_of_supply,
            tax_mode: row.tax_mode,
            bill_id: row.bill_id,
            bill_number: row.bill_number,
            bill_date: row.bill_date,
            bill_type: row.bill_type,
            order_number: row.order_number,
            payment_mode: row.payment_mode,
            deposit_account_id: row.deposit_account_id,
            debit_note: row.debit_note,
            supplier_debit_date: row.supplier_debit_date,
            subject: row.subject,
            note: row.note,
            items: row.items.0,
            total_item: row.total_item,
            sub_total: row.sub_total,
            cgst: row.cgst,
            sgst: row.sgst,
            igst: row.igst,
            vat: row.vat,
            total_tax_amount: row.total_tax_amount,
            grand_total: row.grand_total,
            purchase_journal: row.purchase_journal.0,
            created_date: row.created_date,
            created_date_time: row.created_date_time,
            last_modified_date: row.last_modified_date,
        }
    }
}

/// 查询借项通知单
pub async fn get_debit_note(
    pool: &PgPool,
    organization_id: &DocumentId,
    debit_id: &DocumentId,
) -> Result<Option<DebitNote>, sqlx::Error> {
    let sql = format!(
        "SELECT {DEBIT_NOTE_COLUMNS} FROM debit_notes WHERE id = $1 AND organization_id = $2"
    );
    let row = sqlx::query_as::<_, DebitNoteRow>(&sql)
        .bind(debit_id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(DebitNote::from))
}

/// 查询同一供应商、同一账单下含任一指定商品的最新借项通知单
pub async fn get_latest_debit_note(
    pool: &PgPool,
    organization_id: &DocumentId,
    supplier_id: &DocumentId,
    bill_id: &DocumentId,
    item_ids: &[DocumentId],
) -> Result<Option<DebitNote>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {DEBIT_NOTE_COLUMNS}
        FROM debit_notes dn
        WHERE dn.organization_id = $1
          AND dn.supplier_id = $2
          AND dn.bill_id = $3
          AND EXISTS (
              SELECT 1 FROM jsonb_array_elements(dn.items) e
              WHERE e->>'itemId' = ANY($4)
          )
        ORDER BY dn.created_date_time DESC
        LIMIT 1
        "#
    );
    let row = sqlx::query_as::<_, DebitNoteRow>(&sql)
        .bind(organization_id)
        .bind(supplier_id)
        .bind(bill_id)
        .bind(item_ids)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(DebitNote::from))
}

pub async fn get_organization(
    pool: &PgPool,
    organization_id: &DocumentId,
) -> Result<Option<Organization>, sqlx::Error> {
    sqlx::query_as::<_, Organization>(
        "SELECT id, organization_country FROM organizations WHERE id = $1",
    )
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_supplier(
    pool: &PgPool,
    organization_id: &DocumentId,
    supplier_id: &DocumentId,
) -> Result<Option<Supplier>, sqlx::Error> {
    sqlx::query_as::<_, Supplier>(
        r#"
        SELECT id, organization_id, supplier_display_name, tax_type
        FROM suppliers
        WHERE id = $1 AND organization_id = $2
        "#,
    )
    .bind(supplier_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}

/// 查询账单主表及明细
pub async fn get_bill(
    pool: &PgPool,
    organization_id: &DocumentId,
    bill_id: &DocumentId,
) -> Result<Option<Bill>, sqlx::Error> {
    let bill = sqlx::query_as::<_, Bill>(
        r#"
        SELECT id, organization_id, supplier_id, bill_number, bill_date, order_number
        FROM bills
        WHERE id = $1 AND organization_id = $2
        "#,
    )
    .bind(bill_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await?;

    let Some(mut bill) = bill else {
        return Ok(None);
    };
    bill.items = list_bill_items(pool, bill_id).await?;
    Ok(Some(bill))
}

/// 查询账单明细列表
pub async fn list_bill_items(
    pool: &PgPool,
    bill_id: &DocumentId,
) -> Result<Vec<BillItem>, sqlx::Error> {
    sqlx::query_as::<_, BillItem>(
        r#"
        SELECT item_id, item_quantity, item_cost_price,
               item_cgst, item_sgst, item_igst, return_quantity
        FROM bill_items
        WHERE bill_id = $1
        "#,
    )
    .bind(bill_id)
    .fetch_all(pool)
    .await
}

pub async fn get_default_account(
    pool: &PgPool,
    organization_id: &DocumentId,
) -> Result<Option<DefaultAccount>, sqlx::Error> {
    sqlx::query_as::<_, DefaultAccount>(
        r#"
        SELECT organization_id, purchase_account, input_cgst, input_sgst, input_igst, input_vat
        FROM default_accounts
        WHERE organization_id = $1
        "#,
    )
    .bind(organization_id)
    .fetch_optional(pool)
    .await
}

/// 供应商明细账科目
pub async fn get_supplier_account(
    pool: &PgPool,
    organization_id: &DocumentId,
    supplier_id: &DocumentId,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT id, organization_id, account_name, party_id
        FROM accounts
        WHERE organization_id = $1 AND party_id = $2
        LIMIT 1
        "#,
    )
    .bind(organization_id)
    .bind(supplier_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_account(
    pool: &PgPool,
    organization_id: &DocumentId,
    account_id: &DocumentId,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT id, organization_id, account_name, party_id
        FROM accounts
        WHERE organization_id = $1 AND id = $2
        "#,
    )
    .bind(organization_id)
    .bind(account_id)
    .fetch_optional(pool)
    .await
}

/// 批量查询商品主数据
pub async fn list_items(
    pool: &PgPool,
    organization_id: &DocumentId,
    item_ids: &[DocumentId],
) -> Result<Vec<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>(
        r#"
        SELECT id, organization_id, item_name, cost_price, selling_price,
               cgst, sgst, igst, vat, tax_preference, purchase_account_id
        FROM items
        WHERE organization_id = $1 AND id = ANY($2)
        "#,
    )
    .bind(organization_id)
    .bind(item_ids)
    .fetch_all(pool)
    .await
}

pub async fn list_trial_balance(
    pool: &PgPool,
    organization_id: &DocumentId,
    operation_id: &DocumentId,
) -> Result<Vec<TrialBalance>, sqlx::Error> {
    sqlx::query_as::<_, TrialBalance>(
        r#"
        SELECT organization_id, operation_id, transaction_id, date, account_id, action,
               debit_amount, credit_amount, remark, created_date_time
        FROM trial_balances
        WHERE organization_id = $1 AND operation_id = $2
        ORDER BY id
        "#,
    )
    .bind(organization_id)
    .bind(operation_id)
    .fetch_all(pool)
    .await
}

pub async fn list_item_tracks(
    pool: &PgPool,
    organization_id: &DocumentId,
    operation_id: &DocumentId,
) -> Result<Vec<ItemTrack>, sqlx::Error> {
    sqlx::query_as::<_, ItemTrack>(
        r#"
        SELECT organization_id, operation_id, transaction_id, action, date, item_id,
               selling_price, cost_price, credit_quantity, remark, created_date_time
        FROM item_tracks
        WHERE organization_id = $1 AND operation_id = $2
        ORDER BY id
        "#,
    )
    .bind(organization_id)
    .bind(operation_id)
    .fetch_all(pool)
    .await
}

/// 保存借项通知单 (事务内)
pub async fn save_debit_note(
    conn: &mut PgConnection,
    note: &DebitNote,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE debit_notes SET
            supplier_id = $3, supplier_display_name = $4,
            source_of_supply = $5, destination_of_supply = $6, tax_mode = $7,
            bill_id = $8, bill_number = $9, bill_date = $10, bill_type = $11,
            order_number = $12, payment_mode = $13, deposit_account_id = $14,
            debit_note = $15, supplier_debit_date = $16, subject = $17, note = $18,
            items = $19, total_item = $20, sub_total = $21,
            cgst = $22, sgst = $23, igst = $24, vat = $25,
            total_tax_amount = $26, grand_total = $27, purchase_journal = $28,
            last_modified_date = $29
        WHERE id = $1 AND organization_id = $2
        "#,
    )
    .bind(&note.id)
    .bind(&note.organization_id)
    .bind(&note.supplier_id)
    .bind(&note.supplier_display_name)
    .bind(&note.source_of_supply)
    .bind(&note.destination_of_supply)
    .bind(&note.tax_mode)
    .bind(&note.bill_id)
    .bind(&note.bill_number)
    .bind(&note.bill_date)
    .bind(&note.bill_type)
    .bind(&note.order_number)
    .bind(&note.payment_mode)
    .bind(&note.deposit_account_id)
    .bind(&note.debit_note)
    .bind(&note.supplier_debit_date)
    .bind(&note.subject)
    .bind(&note.note)
    .bind(Json(&note.items))
    .bind(note.total_item)
    .bind(&note.sub_total)
    .bind(&note.cgst)
    .bind(&note.sgst)
    .bind(&note.igst)
    .bind(&note.vat)
    .bind(&note.total_tax_amount)
    .bind(&note.grand_total)
    .bind(Json(&note.purchase_journal))
    .bind(note.last_modified_date)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// 删除操作下的分录, 返回最早的创建时间
pub async fn delete_trial_balance(
    conn: &mut PgConnection,
    organization_id: &DocumentId,
    operation_id: &DocumentId,
) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
    let created: Option<DateTime<Utc>> = sqlx::query_scalar(
        r#"
        SELECT MIN(created_date_time) FROM trial_balances
        WHERE organization_id = $1 AND operation_id = $2
        "#,
    )
    .bind(organization_id)
    .bind(operation_id)
    .fetch_one(&mut *conn)
    .await?;

    let result = sqlx::query("DELETE FROM trial_balances WHERE organization_id = $1 AND operation_id = $2")
        .bind(organization_id)
        .bind(operation_id)
        .execute(&mut *conn)
        .await?;
    tracing::debug!("Deleted {} trial balance rows for operation {}", result.rows_affected(), operation_id);

    Ok(created)
}

/// 批量插入分录
pub async fn insert_trial_balance(
    conn: &mut PgConnection,
    rows: &[TrialBalance],
) -> Result<(), sqlx::Error> {
    if rows.is_empty() {
        return Ok(());
    }

    let mut query_builder = sqlx::QueryBuilder::new(
        "INSERT INTO trial_balances (
            organization_id, operation_id, transaction_id, date, account_id, action,
            debit_amount, credit_amount, remark, created_date_time
        ) ",
    );
    query_builder.push_values(rows, |mut b, row| {
        b.push_bind(&row.organization_id)
            .push_bind(&row.operation_id)
            .push_bind(&row.transaction_id)
            .push_bind(&row.date)
            .push_bind(&row.account_id)
            .push_bind(&row.action)
            .push_bind(&row.debit_amount)
            .push_bind(&row.credit_amount)
            .push_bind(&row.remark)
            .push_bind(row.created_date_time);
    });
    query_builder.build().execute(conn).await?;
    Ok(())
}

/// 删除操作下的库存流水, 返回最早的创建时间
pub async fn delete_item_tracks(
    conn: &mut PgConnection,
    organization_id: &DocumentId,
    operation_id: &DocumentId,
) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
    let created: Option<DateTime<Utc>> = sqlx::query_scalar(
        r#"
        SELECT MIN(created_date_time) FROM item_tracks
        WHERE organization_id = $1 AND operation_id = $2
        "#,
    )
    .bind(organization_id)
    .bind(operation_id)
    .fetch_one(&mut *conn)
    .await?;

    let result = sqlx::query("DELETE FROM item_tracks WHERE organization_id = $1 AND operation_id = $2")
        .bind(organization_id)
        .bind(operation_id)
        .execute(&mut *conn)
        .await?;
    tracing::debug!("Deleted {} item track rows for operation {}", result.rows_affected(), operation_id);

    Ok(created)
}

/// 批量插入库存流水
pub async fn insert_item_tracks(
    conn: &mut PgConnection,
    rows: &[ItemTrack],
) -> Result<(), sqlx::Error> {
    if rows.is_empty() {
        return Ok(());
    }

    let mut query_builder = sqlx::QueryBuilder::new(
        "INSERT INTO item_tracks (
            organization_id, operation_id, transaction_id, action, date, item_id,
            selling_price, cost_price, credit_quantity, remark, created_date_time
        ) ",
    );
    query_builder.push_values(rows, |mut b, row| {
        b.push_bind(&row.organization_id)
            .push_bind(&row.operation_id)
            .push_bind(&row.transaction_id)
            .push_bind(&row.action)
            .push_bind(&row.date)
            .push_bind(&row.item_id)
            .push_bind(&row.selling_price)
            .push_bind(&row.cost_price)
            .push_bind(row.credit_quantity)
            .push_bind(&row.remark)
            .push_bind(row.created_date_time);
    });
    query_builder.build().execute(conn).await?;
    Ok(())
}

/// 按全部借项通知单重算账单明细的退货数量
pub async fn refresh_return_quantity(
    conn: &mut PgConnection,
    organization_id: &DocumentId,
    supplier_id: &DocumentId,
    bill_id: &DocumentId,
    item_id: &DocumentId,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE bill_items SET return_quantity = (
            SELECT COALESCE(SUM((e->>'itemQuantity')::BIGINT), 0)
            FROM debit_notes dn, jsonb_array_elements(dn.items) e
            WHERE dn.organization_id = $1
              AND dn.supplier_id = $2
              AND dn.bill_id = $3
              AND e->>'itemId' = $4
        )
        WHERE bill_id = $3 AND item_id = $4
        "#,
    )
    .bind(organization_id)
    .bind(supplier_id)
    .bind(bill_id)
    .bind(item_id)
    .execute(conn)
    .await?;
    Ok(())
}
