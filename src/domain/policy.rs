const DEFAULT_PHONE_MAX_DIGITS: u8 = 9;

/// Configurable dials for the contact validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    phone_max_digits: u8,
    require_national_id: bool,
}

impl ValidationPolicy {
    pub fn new(phone_max_digits: u8, require_national_id: bool) -> Self {
        let phone_max_digits = if phone_max_digits == 0 {
            DEFAULT_PHONE_MAX_DIGITS
        } else {
            phone_max_digits
        };

        Self {
            phone_max_digits,
            require_national_id,
        }
    }

    pub fn phone_max_digits(&self) -> u8 {
        self.phone_max_digits
    }

    pub fn require_national_id(&self) -> bool {
        self.require_national_id
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PHONE_MAX_DIGITS, false)
    }
}
