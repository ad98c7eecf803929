use crate::db::store::{preserve_created, DebitNoteStore};
use crate::error::{AppError, AppResult};
use crate::models::{
    Account, Bill, DebitNote, DebitNoteUpdate, DefaultAccount, DocumentId, Item, ItemTrack,
    Organization, Supplier, TrialBalance,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryData {
    organizations: HashMap<DocumentId, Organization>,
    suppliers: HashMap<DocumentId, Supplier>,
    accounts: HashMap<DocumentId, Account>,
    default_accounts: HashMap<DocumentId, DefaultAccount>,
    items: HashMap<DocumentId, Item>,
    bills: HashMap<DocumentId, Bill>,
    debit_notes: HashMap<DocumentId, DebitNote>,
    trial_balances: Vec<TrialBalance>,
    item_tracks: Vec<ItemTrack>,
}

/// 内存实现, 单把锁内完成一次更新
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_organization(&self, organization: Organization) {
        self.lock().organizations.insert(organization.id.clone(), organization);
    }

    pub fn insert_supplier(&self, supplier: Supplier) {
        self.lock().suppliers.insert(supplier.id.clone(), supplier);
    }

    pub fn insert_account(&self, account: Account) {
        self.lock().accounts.insert(account.id.clone(), account);
    }

    pub fn set_default_account(&self, organization_id: DocumentId, defaults: DefaultAccount) {
        self.lock().default_accounts.insert(organization_id, defaults);
    }

    pub fn insert_item(&self, item: Item) {
        self.lock().items.insert(item.id.clone(), item);
    }

    pub fn insert_bill(&self, bill: Bill) {
        self.lock().bills.insert(bill.id.clone(), bill);
    }

    pub fn insert_debit_note(&self, note: DebitNote) {
        self.lock().debit_notes.insert(note.id.clone(), note);
    }

    pub fn insert_trial_balance(&self, rows: Vec<TrialBalance>) {
        self.lock().trial_balances.extend(rows);
    }

    pub fn insert_item_tracks(&self, rows: Vec<ItemTrack>) {
        self.lock().item_tracks.extend(rows);
    }

    pub fn bill(&self, bill_id: &DocumentId) -> Option<Bill> {
        self.lock().bills.get(bill_id).cloned()
    }
}

impl MemoryData {
    fn replace_rows<T>(
        rows: &mut Vec<T>,
        matches: impl Fn(&T) -> bool,
        created: impl Fn(&T) -> DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let earliest = rows.iter().filter(|r| matches(r)).map(&created).min();
        rows.retain(|r| !matches(r));
        earliest
    }

    fn returned_quantity(&self, note: &DebitNote, item_id: &DocumentId) -> i64 {
        self.debit_notes
            .values()
            .filter(|dn| {
                dn.organization_id == note.organization_id
                    && dn.supplier_id == note.supplier_id
                    && dn.bill_id == note.bill_id
            })
            .map(|dn| dn.quantity_of(item_id))
            .sum()
    }
}

#[async_trait]
impl DebitNoteStore for MemoryStore {
    async fn find_debit_note(&self, org: &DocumentId, id: &DocumentId) -> AppResult<Option<DebitNote>> {
        Ok(self
            .lock()
            .debit_notes
            .get(id)
            .filter(|dn| &dn.organization_id == org)
            .cloned())
    }

    async fn find_latest_debit_note(
        &self,
        org: &DocumentId,
        supplier: &DocumentId,
        bill: &DocumentId,
        item_ids: &[DocumentId],
    ) -> AppResult<Option<DebitNote>> {
        Ok(self
            .lock()
            .debit_notes
            .values()
            .filter(|dn| &dn.organization_id == org && &dn.supplier_id == supplier && &dn.bill_id == bill)
            .filter(|dn| dn.item_ids().any(|id| item_ids.contains(id)))
            .max_by_key(|dn| dn.created_date_time)
            .cloned())
    }

    async fn find_organization(&self, org: &DocumentId) -> AppResult<Option<Organization>> {
        Ok(self.lock().organizations.get(org).cloned())
    }

    async fn find_supplier(&self, org: &DocumentId, supplier: &DocumentId) -> AppResult<Option<Supplier>> {
        Ok(self
            .lock()
            .suppliers
            .get(supplier)
            .filter(|s| &s.organization_id == org)
            .cloned())
    }

    async fn find_bill(&self, org: &DocumentId, bill: &DocumentId) -> AppResult<Option<Bill>> {
        Ok(self
            .lock()
            .bills
            .get(bill)
            .filter(|b| &b.organization_id == org)
            .cloned())
    }

    async fn find_default_account(&self, org: &DocumentId) -> AppResult<Option<DefaultAccount>> {
        Ok(self.lock().default_accounts.get(org).cloned())
    }

    async fn find_supplier_account(&self, org: &DocumentId, supplier: &DocumentId) -> AppResult<Option<Account>> {
        Ok(self
            .lock()
            .accounts
            .values()
            .find(|a| &a.organization_id == org && a.party_id.as_ref() == Some(supplier))
            .cloned())
    }

    async fn find_account(&self, org: &DocumentId, account: &DocumentId) -> AppResult<Option<Account>> {
        Ok(self
            .lock()
            .accounts
            .get(account)
            .filter(|a| &a.organization_id == org)
            .cloned())
    }

    async fn find_items(&self, org: &DocumentId, item_ids: &[DocumentId]) -> AppResult<Vec<Item>> {
        let data = self.lock();
        Ok(item_ids
            .iter()
            .filter_map(|id| data.items.get(id))
            .filter(|item| &item.organization_id == org)
            .cloned()
            .collect())
    }

    async fn list_trial_balance(&self, org: &DocumentId, operation: &DocumentId) -> AppResult<Vec<TrialBalance>> {
        Ok(self
            .lock()
            .trial_balances
            .iter()
            .filter(|r| &r.organization_id == org && &r.operation_id == operation)
            .cloned()
            .collect())
    }

    async fn list_item_tracks(&self, org: &DocumentId, operation: &DocumentId) -> AppResult<Vec<ItemTrack>> {
        Ok(self
            .lock()
            .item_tracks
            .iter()
            .filter(|r| &r.organization_id == org && &r.operation_id == operation)
            .cloned()
            .collect())
    }

    async fn apply_update(&self, update: DebitNoteUpdate) -> AppResult<DebitNote> {
        let affected = update.affected_item_ids();
        let DebitNoteUpdate {
            debit_note,
            journal,
            item_tracks,
            ..
        } = update;

        let mut data = self.lock();

        let exists = data
            .debit_notes
            .get(&debit_note.id)
            .is_some_and(|dn| dn.organization_id == debit_note.organization_id);
        if !exists {
            return Err(AppError::not_found("Debit note not found"));
        }
        data.debit_notes.insert(debit_note.id.clone(), debit_note.clone());

        let (org, operation) = (&debit_note.organization_id, &debit_note.id);
        let belongs = |o: &DocumentId, op: &DocumentId| o == org && op == operation;

        let created = MemoryData::replace_rows(
            &mut data.trial_balances,
            |r| belongs(&r.organization_id, &r.operation_id),
            |r| r.created_date_time,
        );
        let journal = preserve_created(journal, created, |r| &mut r.created_date_time);
        data.trial_balances.extend(journal);

        let created = MemoryData::replace_rows(
            &mut data.item_tracks,
            |r| belongs(&r.organization_id, &r.operation_id),
            |r| r.created_date_time,
        );
        let item_tracks = preserve_created(item_tracks, created, |r| &mut r.created_date_time);
        data.item_tracks.extend(item_tracks);

        for item_id in &affected {
            let returned = data.returned_quantity(&debit_note, item_id);
            if let Some(bill_item) = data
                .bills
                .get_mut(&debit_note.bill_id)
                .and_then(|bill| bill.items.iter_mut().find(|bi| &bi.item_id == item_id))
            {
                bill_item.return_quantity = returned;
            }
        }

        Ok(debit_note)
    }
}
