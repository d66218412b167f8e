pub mod errors;
pub mod model;
pub mod profiles;
pub mod transactions;

pub use errors::IngestError;
pub use model::{
    is_na_token, RawProfile, RawTransaction, PROFILES_SOURCE, PROFILE_COLUMNS,
    TRANSACTIONS_SOURCE, TRANSACTION_COLUMNS,
};
pub use profiles::{parse_profiles_json, read_profiles_json};
pub use transactions::{parse_transactions_csv, read_transactions_csv};
