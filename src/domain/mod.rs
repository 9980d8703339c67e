mod record_email;
mod stored_record;

pub use record_email::RecordEmail;
pub use stored_record::StoredRecord;
