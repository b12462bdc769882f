//! AWS adapters: the identity/repository provider and profile discovery.

mod cli_provider;
mod profiles;

pub use cli_provider::AwsCliProvider;
pub use profiles::{CREDENTIALS_FILE_ENV, credentials_file_path, list_profiles};
