use rust_decimal::Decimal;

pub const ACCOUNT_NUMBER_LENGTH: usize = 16;

pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;
pub const MAX_COUNTRY_NAME_LENGTH: usize = 100;
pub const MAX_CURRENCY_NAME_LENGTH: usize = 50;

// NUMERIC(10, 2)
const AMOUNT_SCALE: u32 = 2;
const AMOUNT_MAX_INTEGER_DIGITS: u32 = 8;

#[derive(Debug)]
pub enum Validity {
    Valid,
    Invalid(String),
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        match &self {
            Validity::Valid => true,
            Validity::Invalid(_) => false,
        }
    }
}

pub fn validate_account_number(number: &str) -> Validity {
    if number.len() != ACCOUNT_NUMBER_LENGTH || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Validity::Invalid(String::from("Account number must be 16 digits."));
    }

    Validity::Valid
}

pub fn validate_amount(amount: Decimal) -> Validity {
    if amount <= Decimal::ZERO {
        return Validity::Invalid(String::from("Amount must be greater than zero."));
    }

    if amount.normalize().scale() > AMOUNT_SCALE {
        return Validity::Invalid(String::from(
            "Amount cannot have more than 2 decimal places.",
        ));
    }

    if !fits_numeric_column(amount) {
        return Validity::Invalid(String::from("Amount is too large."));
    }

    Validity::Valid
}

/// Whether `value` can be stored in a `NUMERIC(10, 2)` column without overflowing.
pub fn fits_numeric_column(value: Decimal) -> bool {
    value.abs().trunc() < Decimal::from(10u64.pow(AMOUNT_MAX_INTEGER_DIGITS))
}

pub fn validate_name(name: &str, field: &str, max_len: usize) -> Validity {
    if name.trim().is_empty() {
        return Validity::Invalid(format!("{field} cannot be blank."));
    }

    if name.chars().count() > max_len {
        return Validity::Invalid(format!(
            "{field} cannot be longer than {max_len} characters."
        ));
    }

    Validity::Valid
}

pub fn validate_currency_symbol(symbol: &str) -> Validity {
    let mut chars = symbol.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Validity::Valid,
        _ => Validity::Invalid(String::from(
            "Currency symbol must be exactly one character.",
        )),
    }
}
