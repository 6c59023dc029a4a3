//! OTP service: send and verify for the signup and login flows

use std::sync::Arc;
use tracing::{error, info, warn};

use og_shared::phone::{mask_phone_number, normalize_phone};

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::UserDirectory;

use super::clock::{Clock, SystemClock};
use super::generator::{CodeGenerator, OsRngCodeGenerator};
use super::store::OtpStore;
use super::traits::DeliveryChannel;
use super::types::{OtpFlow, OtpSent, VerifiedUser, VerifyOutcome};

/// Orchestrates code issuance, delivery and verification
///
/// Both flows share one store, so request counting and blocking apply to a
/// phone number regardless of which flow the request came through.
pub struct OtpService<U, D>
where
    U: UserDirectory + ?Sized,
    D: DeliveryChannel + ?Sized,
{
    /// Account lookups and creation
    user_directory: Arc<U>,
    /// Channel that carries the code to the user
    delivery_channel: Arc<D>,
    /// Shared record store
    store: Arc<OtpStore>,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
}

impl<U, D> OtpService<U, D>
where
    U: UserDirectory + ?Sized,
    D: DeliveryChannel + ?Sized,
{
    /// Create a new OTP service using the OS random source and system clock
    ///
    /// # Arguments
    ///
    /// * `user_directory` - Account store consulted for eligibility
    /// * `delivery_channel` - Channel used to send codes
    /// * `store` - Record store; its policy governs the service
    pub fn new(user_directory: Arc<U>, delivery_channel: Arc<D>, store: Arc<OtpStore>) -> Self {
        Self {
            user_directory,
            delivery_channel,
            store,
            generator: Arc::new(OsRngCodeGenerator),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the code generator
    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<OtpStore> {
        &self.store
    }

    /// Issue and deliver a code for `flow`.
    ///
    /// Steps:
    /// 1. Normalize the phone and check eligibility against the directory
    /// 2. Check the issuance policy and store the new code atomically
    /// 3. Deliver the message with no store lock held
    /// 4. Withdraw the code if delivery fails or times out
    ///
    /// # Errors
    ///
    /// * `AuthError::AlreadyRegistered` / `AuthError::NotRegistered` - flow does not fit the account state
    /// * `AuthError::RateLimited` - the phone is blocked
    /// * `AuthError::DeliveryFailed` - the channel rejected the message or timed out
    /// * `DomainError::Internal` - the user directory failed
    pub async fn send_otp(&self, flow: OtpFlow, phone: &str) -> DomainResult<OtpSent> {
        let phone = require_phone(phone)?;
        let masked = mask_phone_number(&phone);

        let exists = self.user_exists(&phone).await?;
        match (flow, exists) {
            (OtpFlow::Signup, true) => return Err(AuthError::AlreadyRegistered.into()),
            (OtpFlow::Login, false) => return Err(AuthError::NotRegistered.into()),
            _ => {}
        }

        let policy = self.store.policy();
        let code = self.generator.generate(policy.code_length);
        let now = self.clock.now();

        let decision = self.store.try_issue(&phone, &code, now);
        if !decision.is_allowed() {
            warn!(
                phone = %masked,
                %flow,
                ?decision,
                "OTP issuance refused"
            );
            return Err(AuthError::RateLimited {
                retry_after_secs: decision.retry_after_secs(),
            }
            .into());
        }

        let message = compose_message(flow, &code, policy.ttl_minutes);
        let delivery = tokio::time::timeout(
            policy.delivery_timeout,
            self.delivery_channel.send(&phone, &message),
        )
        .await;

        let cause = match delivery {
            Ok(Ok(delivery_id)) => {
                info!(
                    phone = %masked,
                    %flow,
                    provider = self.delivery_channel.provider_name(),
                    delivery_id = %delivery_id,
                    "OTP sent"
                );
                let expires_at = now + policy.ttl;
                return Ok(OtpSent {
                    flow,
                    delivery_id,
                    expires_at,
                    expires_in_secs: policy.ttl.num_seconds(),
                });
            }
            Ok(Err(cause)) => cause,
            Err(_) => format!(
                "delivery timed out after {}s",
                policy.delivery_timeout.as_secs()
            ),
        };

        self.store.rollback_issue(&phone, &code, self.clock.now());
        error!(
            phone = %masked,
            %flow,
            provider = self.delivery_channel.provider_name(),
            %cause,
            "OTP delivery failed"
        );
        Err(AuthError::DeliveryFailed { cause }.into())
    }

    /// Verify `candidate` for `flow`.
    ///
    /// The directory is re-checked first in case the account state changed
    /// since the code was sent; a mismatch withdraws any outstanding code but
    /// keeps the phone's request count and block.
    /// On success a signup creates the account and a login returns the
    /// existing one.
    ///
    /// # Errors
    ///
    /// * `AuthError::AlreadyRegistered` / `AuthError::NotRegistered` - flow does not fit the account state
    /// * `AuthError::NoActiveCode` - never issued, already used, or expired
    /// * `AuthError::IncorrectCode` - wrong code, attempts remain
    /// * `AuthError::TooManyAttempts` - attempt cap exceeded
    /// * `DomainError::Internal` - directory lookup or user creation failed
    pub async fn verify_otp(
        &self,
        flow: OtpFlow,
        phone: &str,
        candidate: &str,
    ) -> DomainResult<VerifiedUser> {
        let phone = require_phone(phone)?;
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "otp".to_string(),
            }
            .into());
        }
        let masked = mask_phone_number(&phone);

        let existing = match flow {
            OtpFlow::Signup => {
                if self.user_exists(&phone).await? {
                    self.store.discard_code(&phone, self.clock.now());
                    return Err(AuthError::AlreadyRegistered.into());
                }
                None
            }
            OtpFlow::Login => match self.find_user(&phone).await? {
                Some(user) => Some(user),
                None => {
                    self.store.discard_code(&phone, self.clock.now());
                    return Err(AuthError::NotRegistered.into());
                }
            },
        };

        match self.store.verify(&phone, candidate, self.clock.now()) {
            VerifyOutcome::Success => {}
            VerifyOutcome::NoActiveCode | VerifyOutcome::Expired => {
                return Err(AuthError::NoActiveCode.into());
            }
            VerifyOutcome::TooManyAttempts => {
                warn!(phone = %masked, %flow, "OTP attempts exhausted");
                return Err(AuthError::TooManyAttempts.into());
            }
            VerifyOutcome::Mismatch { remaining_attempts } => {
                return Err(AuthError::IncorrectCode { remaining_attempts }.into());
            }
        }

        let user = match existing {
            Some(user) => user,
            None => self.user_directory.create_user(&phone).await.map_err(|e| {
                // The code is consumed at this point and is not reissued.
                error!(phone = %masked, error = %e, "Failed to create user after OTP verification");
                DomainError::internal("Failed to create user")
            })?,
        };

        info!(phone = %masked, %flow, user_id = user.id, "OTP verified");
        Ok(VerifiedUser { flow, user })
    }

    /// `send_otp` for the signup flow
    pub async fn signup_send(&self, phone: &str) -> DomainResult<OtpSent> {
        self.send_otp(OtpFlow::Signup, phone).await
    }

    /// `verify_otp` for the signup flow
    pub async fn signup_verify(&self, phone: &str, code: &str) -> DomainResult<VerifiedUser> {
        self.verify_otp(OtpFlow::Signup, phone, code).await
    }

    /// `send_otp` for the login flow
    pub async fn login_send(&self, phone: &str) -> DomainResult<OtpSent> {
        self.send_otp(OtpFlow::Login, phone).await
    }

    /// `verify_otp` for the login flow
    pub async fn login_verify(&self, phone: &str, code: &str) -> DomainResult<VerifiedUser> {
        self.verify_otp(OtpFlow::Login, phone, code).await
    }

    async fn user_exists(&self, phone: &str) -> DomainResult<bool> {
        self.user_directory.exists_by_phone(phone).await.map_err(|e| {
            error!(phone = %mask_phone_number(phone), error = %e, "User lookup failed");
            DomainError::internal("User lookup failed")
        })
    }

    async fn find_user(&self, phone: &str) -> DomainResult<Option<User>> {
        self.user_directory.find_by_phone(phone).await.map_err(|e| {
            error!(phone = %mask_phone_number(phone), error = %e, "User lookup failed");
            DomainError::internal("User lookup failed")
        })
    }
}

fn require_phone(phone: &str) -> DomainResult<String> {
    let phone = normalize_phone(phone);
    if phone.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "phone".to_string(),
        }
        .into());
    }
    Ok(phone)
}

/// Message text carrying the code and its lifetime in whole minutes
pub(crate) fn compose_message(flow: OtpFlow, code: &str, ttl_minutes: u64) -> String {
    let kind = match flow {
        OtpFlow::Signup => "verification code",
        OtpFlow::Login => "login verification code",
    };
    format!(
        "Your {} is {}. It expires in {} minute(s).",
        kind, code, ttl_minutes
    )
}
