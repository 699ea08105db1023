//! Form validation.
//!
//! Every check here runs before a network call. A failed check produces a
//! [`ValidationError`] whose `Display` is the exact message shown inline
//! under the form, and nothing is sent to the backend.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use profesionales_types::{
    Coordinates, Identity, LoginRequest, RegisterClientRequest, RegisterProfessionalRequest, Role,
    Service,
};

use crate::text;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Accepted phone lengths, counted in digits.
pub const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 8..=9;

/// A form that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was left empty.
    #[error("{}", text::REQUIRED_FIELDS)]
    MissingFields,

    /// Login submitted without email or password.
    #[error("{}", text::LOGIN_REQUIRED)]
    LoginRequired,

    /// Recovery submitted without an email.
    #[error("{}", text::EMAIL_REQUIRED)]
    EmailRequired,

    /// Email is not of the form `local@domain.tld`.
    #[error("{}", text::INVALID_EMAIL)]
    InvalidEmail,

    /// Password does not meet the strength policy.
    #[error("{}", text::WEAK_PASSWORD)]
    WeakPassword,

    /// Password and confirmation differ.
    #[error("{}", text::PASSWORD_MISMATCH)]
    PasswordMismatch,

    /// Phone does not have 8 or 9 digits.
    #[error("{}", text::INVALID_PHONE)]
    InvalidPhone,

    /// Years of experience is not a whole number.
    #[error("{}", text::INVALID_EXPERIENCE)]
    InvalidExperience,

    /// Coverage radius is not a positive number.
    #[error("{}", text::INVALID_RADIUS)]
    InvalidRadius,

    /// Professional registration without a profession.
    #[error("{}", text::PROFESSION_REQUIRED)]
    ProfessionRequired,
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// True if `email` looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// True if `password` has at least 8 characters including an uppercase
/// letter, a lowercase letter, a digit and a special character.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(char::is_uppercase)
        && password.chars().any(char::is_lowercase)
        && password.chars().any(|c| c.is_ascii_digit())
        && password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

/// Digits of `phone` if it has an accepted length.
///
/// Separators (spaces, dashes, parentheses, a leading `+`) are ignored.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    PHONE_DIGITS.contains(&digits.len()).then_some(digits)
}

/// Split a comma-separated list, keeping order and dropping blanks.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Login form fields.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    /// Email as typed.
    pub email: String,
    /// Password as typed.
    pub password: String,
}

impl LoginForm {
    /// Check the form and build the request body.
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        if blank(&self.email) || self.password.is_empty() {
            return Err(ValidationError::LoginRequired);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if !is_strong_password(&self.password) {
            return Err(ValidationError::WeakPassword);
        }
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// Password recovery form.
#[derive(Debug, Clone, Default)]
pub struct ForgotPasswordForm {
    /// Email as typed.
    pub email: String,
}

impl ForgotPasswordForm {
    /// Check the form and return the trimmed email.
    pub fn validate(&self) -> Result<String, ValidationError> {
        if blank(&self.email) {
            return Err(ValidationError::EmailRequired);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(self.email.trim().to_string())
    }
}

/// Extra sign-up fields for professionals, as typed.
#[derive(Debug, Clone, Default)]
pub struct ProfessionalExtras {
    /// Main profession.
    pub profession: String,
    /// Comma-separated specialties.
    pub specialties: String,
    /// Whole years of experience.
    pub years_of_experience: String,
    /// Comma-separated service names.
    pub services: String,
    /// Coverage radius in kilometres.
    pub coverage_radius_km: String,
}

impl ProfessionalExtras {
    fn validate(&self) -> Result<ProfessionalDetails, ValidationError> {
        if blank(&self.profession) {
            return Err(ValidationError::ProfessionRequired);
        }
        let years_of_experience = match self.years_of_experience.trim() {
            "" => 0,
            years => years
                .parse::<u32>()
                .map_err(|_| ValidationError::InvalidExperience)?,
        };
        let coverage_radius_km = self
            .coverage_radius_km
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite() && *r > 0.0)
            .ok_or(ValidationError::InvalidRadius)?;

        Ok(ProfessionalDetails {
            profession: self.profession.trim().to_string(),
            specialties: split_list(&self.specialties),
            years_of_experience,
            services: split_list(&self.services)
                .into_iter()
                .map(|name| Service {
                    name,
                    description: None,
                    price: None,
                })
                .collect(),
            coverage_radius_km,
        })
    }
}

#[derive(Debug, Clone)]
struct ProfessionalDetails {
    profession: String,
    specialties: Vec<String>,
    years_of_experience: u32,
    services: Vec<Service>,
    coverage_radius_km: f64,
}

/// Sign-up form fields.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email.
    pub email: String,
    /// Phone, any formatting.
    pub phone: String,
    /// Free-text address, geocoded after validation.
    pub address: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
    /// Present when registering as a professional.
    pub professional: Option<ProfessionalExtras>,
}

impl SignUpForm {
    /// Role the form registers.
    pub fn role(&self) -> Role {
        if self.professional.is_some() {
            Role::Professional
        } else {
            Role::Client
        }
    }

    /// Check the form, in the order the app reports problems.
    ///
    /// The returned registration carries [`Coordinates::ORIGIN`] until
    /// the address is geocoded.
    pub fn validate(&self) -> Result<Registration, ValidationError> {
        let required = [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.address,
            &self.password,
            &self.confirm_password,
        ];
        if required.iter().any(|field| blank(field)) {
            return Err(ValidationError::MissingFields);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        let phone = normalize_phone(&self.phone).ok_or(ValidationError::InvalidPhone)?;
        if !is_strong_password(&self.password) {
            return Err(ValidationError::WeakPassword);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        let base = RegisterClientRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone,
            address: self.address.trim().to_string(),
            location: Coordinates::ORIGIN,
        };

        match &self.professional {
            None => Ok(Registration::Client(base)),
            Some(extras) => {
                let details = extras.validate()?;
                Ok(Registration::Professional(RegisterProfessionalRequest {
                    base,
                    profession: details.profession,
                    specialties: details.specialties,
                    years_of_experience: details.years_of_experience,
                    services: details.services,
                    coverage_radius_km: details.coverage_radius_km,
                }))
            }
        }
    }
}

/// Edit of the signed-in user's own contact details.
#[derive(Debug, Clone, Default)]
pub struct ProfileEditForm {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Phone; empty clears it.
    pub phone: String,
    /// Address; empty clears it.
    pub address: String,
}

impl ProfileEditForm {
    /// Prefill from the current identity.
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            phone: identity.phone.clone().unwrap_or_default(),
            address: identity.address.clone().unwrap_or_default(),
        }
    }

    /// Check the form and produce the edited identity.
    ///
    /// Id, role, email and professional fields are carried over unchanged.
    pub fn apply(&self, identity: &Identity) -> Result<Identity, ValidationError> {
        if blank(&self.first_name) || blank(&self.last_name) {
            return Err(ValidationError::MissingFields);
        }
        let phone = match self.phone.trim() {
            "" => None,
            phone => Some(normalize_phone(phone).ok_or(ValidationError::InvalidPhone)?),
        };
        let address = Some(self.address.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        Ok(Identity {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone,
            address,
            ..identity.clone()
        })
    }
}

/// A validated registration, ready to send once geocoded.
#[derive(Debug, Clone)]
pub enum Registration {
    /// `POST /auth/registro/cliente`.
    Client(RegisterClientRequest),
    /// `POST /auth/registro/profesional`.
    Professional(RegisterProfessionalRequest),
}

impl Registration {
    fn base(&self) -> &RegisterClientRequest {
        match self {
            Registration::Client(base) => base,
            Registration::Professional(request) => &request.base,
        }
    }

    /// Address to geocode.
    pub fn address(&self) -> &str {
        &self.base().address
    }

    /// Email being registered.
    pub fn email(&self) -> &str {
        &self.base().email
    }

    /// Role being registered.
    pub fn role(&self) -> Role {
        match self {
            Registration::Client(_) => Role::Client,
            Registration::Professional(_) => Role::Professional,
        }
    }

    /// Attach the geocoded location.
    pub fn with_location(mut self, location: Coordinates) -> Self {
        match &mut self {
            Registration::Client(base) => base.location = location,
            Registration::Professional(request) => request.base.location = location,
        }
        self
    }

    /// Current location (origin until geocoded).
    pub fn location(&self) -> Coordinates {
        self.base().location
    }
}
