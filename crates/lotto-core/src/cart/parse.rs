// ── Batch parsing and validation ──
//
// Checks run in a fixed order and the first failure wins:
//   1. required fields (name, phone, numbers, counts)
//   2. numeric ranges (numbers 0-37, counts 1-80)
//   3. shape (single token when editing, equal list lengths when adding)

use super::ValidationError;
use super::form::{FormField, JackpotForm, LuckyDrawForm};
use crate::model::{
    Customer, JACKPOT_LEN, MAX_COUNT, MAX_NUMBER, MIN_COUNT, MIN_NUMBER, Wager,
};

/// Split `#`-separated input, trimming tokens and dropping empty ones.
pub fn tokens(input: &str) -> Vec<&str> {
    input
        .split('#')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_ranged(
    raw: &[&str],
    field: FormField,
    label: &str,
    min: i64,
    max: i64,
) -> Result<Vec<i64>, ValidationError> {
    let mut values = Vec::with_capacity(raw.len());
    for token in raw {
        let value: i64 = token.parse().map_err(|_| {
            ValidationError::new(field, format!("{label} must contain only numbers"))
        })?;
        if !(min..=max).contains(&value) {
            return Err(ValidationError::new(
                field,
                format!("{label} must be between {min} and {max}"),
            ));
        }
        values.push(value);
    }
    Ok(values)
}

/// Parse `#`-separated bid numbers, each in `0..=37`.
pub fn parse_numbers(input: &str) -> Result<Vec<u8>, ValidationError> {
    let values = parse_ranged(
        &tokens(input),
        FormField::Numbers,
        "Bid number",
        i64::from(MIN_NUMBER),
        i64::from(MAX_NUMBER),
    )?;
    Ok(values
        .into_iter()
        .filter_map(|v| u8::try_from(v).ok())
        .collect())
}

/// Parse `#`-separated bid counts, each in `1..=80`.
pub fn parse_counts(input: &str) -> Result<Vec<u32>, ValidationError> {
    let values = parse_ranged(
        &tokens(input),
        FormField::Counts,
        "Bid count",
        i64::from(MIN_COUNT),
        i64::from(MAX_COUNT),
    )?;
    Ok(values
        .into_iter()
        .filter_map(|v| u32::try_from(v).ok())
        .collect())
}

/// Phone numbers are exactly ten ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

fn require_customer(name: &str, phone: &str) -> Result<Customer, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new(
            FormField::CustomerName,
            "Name is required",
        ));
    }
    if !is_valid_phone(phone) {
        return Err(ValidationError::new(
            FormField::CustomerPhone,
            "Phone must be 10 digits",
        ));
    }
    Ok(Customer {
        name: name.trim().to_owned(),
        phone: phone.to_owned(),
    })
}

/// Validate the Lucky Draw form into one wager per number/count pair.
///
/// `editing` limits both fields to a single token.
pub fn lucky_draw_wagers(
    form: &LuckyDrawForm,
    editing: bool,
) -> Result<(Customer, Vec<Wager>), ValidationError> {
    let customer = require_customer(&form.customer_name, &form.customer_phone)?;
    if tokens(&form.numbers).is_empty() {
        return Err(ValidationError::new(
            FormField::Numbers,
            "Bid number required",
        ));
    }
    if tokens(&form.counts).is_empty() {
        return Err(ValidationError::new(FormField::Counts, "Count required"));
    }

    let numbers = parse_numbers(&form.numbers)?;
    let counts = parse_counts(&form.counts)?;

    if editing {
        if numbers.len() != 1 {
            return Err(ValidationError::new(
                FormField::Numbers,
                "Editing accepts a single number",
            ));
        }
        if counts.len() != 1 {
            return Err(ValidationError::new(
                FormField::Counts,
                "Editing accepts a single count",
            ));
        }
    } else if numbers.len() != counts.len() {
        return Err(ValidationError::new(
            FormField::Counts,
            "Numbers and counts must match in quantity",
        ));
    }

    let wagers = numbers
        .into_iter()
        .zip(counts)
        .map(|(number, count)| Wager::LuckyDraw { number, count })
        .collect();
    Ok((customer, wagers))
}

/// Validate the Jackpot form into a single six-number combination.
/// Repeated numbers are allowed.
pub fn jackpot_wager(form: &JackpotForm) -> Result<(Customer, Wager), ValidationError> {
    let customer = require_customer(&form.customer_name, &form.customer_phone)?;
    if form.numbers.iter().any(|n| n.trim().is_empty()) {
        return Err(ValidationError::new(
            FormField::Numbers,
            format!("All {JACKPOT_LEN} numbers required"),
        ));
    }

    let mut numbers = [0u8; JACKPOT_LEN];
    for (slot, raw) in numbers.iter_mut().zip(&form.numbers) {
        let parsed = raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|v| (i64::from(MIN_NUMBER)..=i64::from(MAX_NUMBER)).contains(v))
            .and_then(|v| u8::try_from(v).ok());
        *slot = parsed.ok_or_else(|| {
            ValidationError::new(
                FormField::Numbers,
                format!("Numbers must be {MIN_NUMBER}-{MAX_NUMBER}"),
            )
        })?;
    }
    Ok((customer, Wager::Jackpot { numbers }))
}
