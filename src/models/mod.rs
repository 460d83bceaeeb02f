//! Records owned by the server of record and consumed by the client flows.

pub mod contact;
pub mod contract;
pub mod file;
pub mod invoice;
pub mod job;
pub mod message;
pub mod quote;

pub use contact::Contact;
pub use contract::{Contract, ContractStatus};
pub use file::{JobFile, NewFile};
pub use invoice::{Invoice, InvoiceStatus};
pub use job::{stage_label, stage_progress, Job, JobStage};
pub use message::{
    looks_like_email, Message, MessageDirection, MessageKind, NewMessage, TestEmailReceipt, TestEmailRequest,
};
pub use quote::{ApproveQuote, Quote, QuoteApproval, QuoteItem, QuoteStatus, UpdateQuote};
