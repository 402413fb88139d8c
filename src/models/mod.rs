mod record;
mod settings;

pub(crate) use record::{Field, Record, RecordFields};
pub(crate) use settings::{within_limit, Currency, Settings, MAX_INTEGER_DIGITS};
