pub mod bill;
pub mod debit_note;
pub mod id;
pub mod item;
pub mod ledger;
pub mod party;
pub mod reference;

pub use bill::{Bill, BillItem};
pub use debit_note::{
    DebitNote, DebitNoteItem, DebitNoteItemInput, PurchaseJournalEntry, UpdateDebitNoteRequest,
};
pub use id::DocumentId;
pub use item::Item;
pub use ledger::{DebitNoteUpdate, ItemTrack, TrialBalance};
pub use party::{Account, DefaultAccount, Organization, Supplier};
