//! Demo authentication
//!
//! There is no account store: login compares against fixed demo
//! credentials and signup only validates its form.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::clock::{TickHandle, Ticker};
use crate::error::ValidationError;
use crate::navigation::Route;

pub const DEMO_USERNAME: &str = "test";
pub const DEMO_PASSWORD: &str = "1234";
/// Seconds the login screen shows its loading state before answering
pub const LOGIN_DELAY_SECS: u32 = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Check credentials, returning where to go on success
pub fn authenticate(credentials: &Credentials) -> Result<Route, ValidationError> {
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    if credentials.username == DEMO_USERNAME && credentials.password == DEMO_PASSWORD {
        info!("Login successful");
        Ok(Route::Home)
    } else {
        warn!("Login rejected for {:?}", credentials.username);
        Err(ValidationError::InvalidCredentials)
    }
}

/// A submitted login waiting out its delay
///
/// The credentials are captured at submit time. Dropping the attempt
/// cancels its ticks.
pub struct PendingLogin {
    credentials: Credentials,
    remaining: Rc<Cell<u32>>,
    _ticks: TickHandle,
}

impl PendingLogin {
    pub fn start(credentials: Credentials, delay_secs: u32, ticker: &dyn Ticker) -> Self {
        debug!("Logging in as {:?}", credentials.username);
        let remaining = Rc::new(Cell::new(delay_secs));
        let counter = remaining.clone();
        let ticks = ticker.on_every_second(Box::new(move || {
            counter.set(counter.get().saturating_sub(1));
        }));
        Self {
            credentials,
            remaining,
            _ticks: ticks,
        }
    }

    pub fn is_due(&self) -> bool {
        self.remaining.get() == 0
    }

    /// Check the credentials once the delay is over, `None` before that
    pub fn poll(&self) -> Option<Result<Route, ValidationError>> {
        self.is_due().then(|| authenticate(&self.credentials))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// Validate the form. Nothing is stored; success sends the user to login.
    pub fn validate(&self) -> Result<Route, ValidationError> {
        if self.email.is_empty()
            || self.username.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        info!("Signup successful for {:?}", self.username);
        Ok(Route::Login)
    }
}

/// Matches `^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$`
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));

    // the TLD can't hold a dot, so it is whatever follows the last one
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    local_ok && host_ok && tld_ok
}
