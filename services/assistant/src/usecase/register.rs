use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::AccountDirectory;
use crate::domain::types::{Account, InstitutionalDomains, MIN_PASSWORD_LEN, Role};
use crate::error::AssistantError;
use crate::usecase::issue::hash_secret;

pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub struct RegisterUseCase<D>
where
    D: AccountDirectory,
{
    pub accounts: D,
    pub domains: InstitutionalDomains,
}

impl<D> RegisterUseCase<D>
where
    D: AccountDirectory,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<Account, AssistantError> {
        // 1. Each role registers under its own institutional domain
        let email = input.email.trim().to_lowercase();
        let allowed = match input.role {
            Role::Student => self.domains.matches_student(&email),
            Role::Teacher => self.domains.matches_staff(&email),
        };
        if !allowed {
            return Err(AssistantError::NonInstitutionalEmail);
        }

        // 2. Password floor
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AssistantError::PasswordTooShort);
        }

        // 3. One account per address → 409 on a duplicate
        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AssistantError::AccountExists);
        }

        let account = Account {
            id: Uuid::new_v4(),
            email,
            full_name: input.full_name.trim().to_owned(),
            password_hash: hash_secret(&input.password)?,
            role: input.role,
            credential_version: 0,
            created_at: Utc::now(),
        };
        // The directory enforces uniqueness again on the write itself.
        self.accounts.insert(&account).await?;
        Ok(account)
    }
}
