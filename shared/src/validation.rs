//! Input validation shared by the REST and GraphQL surfaces

use rust_decimal::Decimal;

/// Longest accepted product or grade name
pub const MAX_NAME_LEN: usize = 100;

/// Largest quantity in kg accepted for a single lot or sale
///
/// Together with [`MAX_UNIT_AMOUNT`] this keeps any one line's cost within
/// 1e18, so valuation sums stay far inside `Decimal`'s range.
pub const MAX_QUANTITY_KG: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest unit cost, unit price or market price per kg
pub const MAX_UNIT_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email format");
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        return Err("Invalid email format");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Names are trimmed before storage; reject blank or overlong ones
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required");
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err("Name must be at most 100 characters");
    }
    Ok(())
}

/// Quantities of a lot or sale must be strictly positive and at most
/// [`MAX_QUANTITY_KG`]
pub fn validate_quantity(quantity_kg: Decimal) -> Result<(), &'static str> {
    if quantity_kg <= Decimal::ZERO {
        return Err("Quantity must be greater than zero");
    }
    if quantity_kg > MAX_QUANTITY_KG {
        return Err("Quantity must be at most 1000000000 kg");
    }
    Ok(())
}

/// Unit costs, unit prices and market prices may be zero but never negative,
/// and never above [`MAX_UNIT_AMOUNT`]
pub fn validate_unit_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    if amount > MAX_UNIT_AMOUNT {
        return Err("Amount must be at most 1000000000");
    }
    Ok(())
}
