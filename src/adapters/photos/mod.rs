//! Photo storage adapters.

mod local_photo_storage;
mod url_signer;

pub use local_photo_storage::LocalPhotoStorage;
pub use url_signer::{validate_path, UrlSigner};
