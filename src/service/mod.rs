pub mod accounts;
pub mod calculation;
pub mod debit_note;
pub mod validation;

pub use debit_note::DebitNoteService;
