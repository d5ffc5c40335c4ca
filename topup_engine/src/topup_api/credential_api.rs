use std::fmt::Debug;

use log::*;
use topup_common::Secret;

use crate::{
    db_types::{Merchant, MerchantProfile, NewMerchant, VendorCredentials},
    topup_api::errors::CredentialError,
    traits::{CredentialManagement, NewMerchantRecord},
};

/// bcrypt only looks at the first 72 bytes of its input.
const MAX_SECRET_LEN: usize = 72;

/// `CredentialApi` manages merchant accounts: creation by an admin, login, the transaction PIN gate and the lookup of
/// the vendor credentials that every vendor call needs.
///
/// There is no cache; every call reads the store.
pub struct CredentialApi<B> {
    db: B,
    bcrypt_cost: u32,
}

impl<B> Debug for CredentialApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialApi (cost {})", self.bcrypt_cost)
    }
}

impl<B> CredentialApi<B> {
    pub fn new(db: B) -> Self {
        Self { db, bcrypt_cost: bcrypt::DEFAULT_COST }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> CredentialApi<B>
where B: CredentialManagement
{
    pub async fn create_merchant(&self, merchant: NewMerchant) -> Result<MerchantProfile, CredentialError> {
        let NewMerchant { username, password, pin, vendor_username, vendor_key } = merchant;
        let username = username.trim().to_string();
        let vendor_username = vendor_username.trim().to_string();
        let fields = [
            ("username", username.as_str()),
            ("password", password.reveal().trim()),
            ("PIN", pin.reveal().trim()),
            ("vendor username", vendor_username.as_str()),
            ("vendor key", vendor_key.reveal().trim()),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| v.is_empty()) {
            return Err(CredentialError::Validation(format!("The {name} cannot be empty")));
        }
        if password.reveal().len() > MAX_SECRET_LEN || pin.reveal().len() > MAX_SECRET_LEN {
            return Err(CredentialError::Validation(format!(
                "Passwords and PINs may not be longer than {MAX_SECRET_LEN} bytes"
            )));
        }
        if self.db.fetch_merchant_by_username(&username).await?.is_some() {
            return Err(CredentialError::DuplicateUsername(username));
        }
        let password_hash = hash_secret(password, self.bcrypt_cost).await?;
        let pin_hash = hash_secret(pin, self.bcrypt_cost).await?;
        let record = NewMerchantRecord { username, password_hash, pin_hash, vendor_username, vendor_key };
        let profile = self.db.insert_merchant(record).await?;
        info!("🔑️ Merchant {} created with id {}", profile.username, profile.id);
        Ok(profile)
    }

    pub async fn fetch_merchant(&self, username: &str) -> Result<Merchant, CredentialError> {
        self.db
            .fetch_merchant_by_username(username)
            .await?
            .ok_or_else(|| CredentialError::MerchantNotFound(username.to_string()))
    }

    pub async fn list_merchants(&self) -> Result<Vec<MerchantProfile>, CredentialError> {
        Ok(self.db.fetch_merchants().await?)
    }

    pub async fn delete_merchant(&self, id: i64) -> Result<(), CredentialError> {
        if self.db.delete_merchant(id).await? {
            info!("🔑️ Merchant #{id} deleted");
            Ok(())
        } else {
            Err(CredentialError::MerchantIdNotFound(id))
        }
    }

    /// Checks a merchant's login. Unknown users and wrong passwords produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<MerchantProfile, CredentialError> {
        let merchant = self.db.fetch_merchant_by_username(username).await?;
        let Some(merchant) = merchant else {
            debug!("🔑️ Login attempt for unknown merchant {username}");
            return Err(CredentialError::AuthenticationFailed);
        };
        if verify_secret(password, &merchant.password_hash).await? {
            Ok(merchant.profile())
        } else {
            debug!("🔑️ Wrong password for merchant {username}");
            Err(CredentialError::AuthenticationFailed)
        }
    }

    /// The transaction PIN gate. Only the exact PIN passes.
    pub async fn verify_pin(&self, username: &str, pin: &str) -> Result<Merchant, CredentialError> {
        let merchant = self.fetch_merchant(username).await?;
        if verify_secret(pin, &merchant.pin_hash).await? {
            Ok(merchant)
        } else {
            warn!("🔑️ Wrong transaction PIN for merchant {username}");
            Err(CredentialError::InvalidPin)
        }
    }

    pub async fn vendor_credentials(&self, username: &str) -> Result<VendorCredentials, CredentialError> {
        let merchant = self.fetch_merchant(username).await?;
        vendor_credentials_for(&merchant)
    }
}

/// The vendor account stored for `merchant`. Empty fields are a configuration error.
pub fn vendor_credentials_for(merchant: &Merchant) -> Result<VendorCredentials, CredentialError> {
    if merchant.vendor_username.trim().is_empty() || merchant.vendor_key.reveal().trim().is_empty() {
        return Err(CredentialError::MissingVendorCredentials(merchant.username.clone()));
    }
    Ok(VendorCredentials { username: merchant.vendor_username.clone(), api_key: merchant.vendor_key.clone() })
}

/// Hashes a secret with bcrypt on the blocking thread pool.
pub async fn hash_secret(secret: Secret<String>, cost: u32) -> Result<String, CredentialError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(secret.reveal(), cost))
        .await
        .map_err(|e| CredentialError::HashingError(e.to_string()))?
        .map_err(CredentialError::from)
}

pub async fn verify_secret(secret: &str, hash: &str) -> Result<bool, CredentialError> {
    let secret = secret.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(secret, &hash))
        .await
        .map_err(|e| CredentialError::HashingError(e.to_string()))?
        .map_err(CredentialError::from)
}
