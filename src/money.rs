//! Currency amounts: minor-unit formatting and pre-flight amount validation.

// self
use crate::_prelude::*;

/// Amount rejected by [`AmountPolicy`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum AmountError {
	/// Input is not an integer number of minor units.
	#[error("Amount `{input}` is not a whole number of minor units.")]
	NotNumeric {
		/// Offending input, as received.
		input: String,
	},
	/// Zero or negative amount.
	#[error("Amount must be positive, got {amount}.")]
	NonPositive {
		/// Rejected amount in minor units.
		amount: i64,
	},
	/// Amount below the currency's minimum.
	#[error("Amount {amount} is below the {currency} minimum of {minimum}.")]
	BelowMinimum {
		/// Rejected amount in minor units.
		amount: i64,
		/// Applicable minimum in minor units.
		minimum: i64,
		/// Currency the minimum belongs to.
		currency: String,
	},
}

/// PayPal amount object: ISO-4217 code plus a decimal string value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
	/// Three-letter currency code.
	pub currency_code: String,
	/// Decimal amount with two fractional digits.
	pub value: String,
}
impl Money {
	/// Wraps an already formatted value.
	pub fn new(currency_code: impl Into<String>, value: impl Into<String>) -> Self {
		Self { currency_code: currency_code.into(), value: value.into() }
	}

	/// Formats an integer minor-unit amount (e.g. cents) with exactly two decimals.
	pub fn from_minor_units(amount: i64, currency_code: impl Into<String>) -> Self {
		let sign = if amount < 0 { "-" } else { "" };
		let magnitude = amount.unsigned_abs();

		Self {
			currency_code: currency_code.into(),
			value: format!("{sign}{}.{:02}", magnitude / 100, magnitude % 100),
		}
	}

	/// Parses [`value`](Self::value) back into minor units.
	pub fn minor_units(&self) -> Result<i64, AmountError> {
		let not_numeric = || AmountError::NotNumeric { input: self.value.clone() };
		let (negative, digits) = match self.value.strip_prefix('-') {
			Some(rest) => (true, rest),
			None => (false, self.value.as_str()),
		};
		let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

		if whole.is_empty()
			|| fraction.len() != 2
			|| !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit())
		{
			return Err(not_numeric());
		}

		let whole = whole.parse::<i64>().map_err(|_| not_numeric())?;
		let fraction = fraction.parse::<i64>().map_err(|_| not_numeric())?;
		let total = whole
			.checked_mul(100)
			.and_then(|value| value.checked_add(fraction))
			.ok_or_else(not_numeric)?;

		Ok(if negative { -total } else { total })
	}
}

/// Formats an integer minor-unit amount as a [`Money`] value.
pub fn format_amount(amount: i64, currency_code: impl Into<String>) -> Money {
	Money::from_minor_units(amount, currency_code)
}

/// Per-currency minimum amounts applied before an amount enters a payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountPolicy {
	/// Minimum (minor units) for currencies without an explicit entry.
	pub default_minimum: i64,
	/// Currency-specific minimums keyed by upper-case currency code.
	pub minimums: BTreeMap<String, i64>,
}
impl AmountPolicy {
	/// Default minimum in minor units.
	pub const DEFAULT_MINIMUM: i64 = 100;

	/// Sets a currency-specific minimum.
	pub fn with_minimum(mut self, currency_code: &str, minimum: i64) -> Self {
		self.minimums.insert(currency_code.to_ascii_uppercase(), minimum);

		self
	}

	/// Minimum applied to `currency_code`.
	pub fn minimum_for(&self, currency_code: &str) -> i64 {
		self.minimums
			.get(&currency_code.to_ascii_uppercase())
			.copied()
			.unwrap_or(self.default_minimum)
	}

	/// Validates an integer minor-unit amount.
	pub fn validate(&self, amount: i64, currency_code: &str) -> Result<i64, AmountError> {
		if amount <= 0 {
			return Err(AmountError::NonPositive { amount });
		}

		let minimum = self.minimum_for(currency_code);

		if amount < minimum {
			return Err(AmountError::BelowMinimum {
				amount,
				minimum,
				currency: currency_code.to_ascii_uppercase(),
			});
		}

		Ok(amount)
	}

	/// Parses then validates a textual minor-unit amount.
	pub fn validate_str(&self, raw: &str, currency_code: &str) -> Result<i64, AmountError> {
		let amount = raw
			.trim()
			.parse::<i64>()
			.map_err(|_| AmountError::NotNumeric { input: raw.to_owned() })?;

		self.validate(amount, currency_code)
	}

	/// Validates an amount received as JSON (integer number or numeric string).
	pub fn validate_value(&self, raw: &Value, currency_code: &str) -> Result<i64, AmountError> {
		match raw {
			Value::Number(number) => match number.as_i64() {
				Some(amount) => self.validate(amount, currency_code),
				None => Err(AmountError::NotNumeric { input: number.to_string() }),
			},
			Value::String(text) => self.validate_str(text, currency_code),
			other => Err(AmountError::NotNumeric { input: other.to_string() }),
		}
	}

	/// Validates and formats in one step.
	pub fn money(&self, amount: i64, currency_code: &str) -> Result<Money, AmountError> {
		self.validate(amount, currency_code)
			.map(|amount| Money::from_minor_units(amount, currency_code))
	}
}
impl Default for AmountPolicy {
	fn default() -> Self {
		Self { default_minimum: Self::DEFAULT_MINIMUM, minimums: BTreeMap::new() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn formatting_always_uses_two_decimals() {
		assert_eq!(format_amount(2500, "USD"), Money::new("USD", "25.00"));
		assert_eq!(format_amount(0, "GBP"), Money::new("GBP", "0.00"));
		assert_eq!(format_amount(5, "EUR").value, "0.05");
		assert_eq!(format_amount(123_456, "JPY").value, "1234.56");
		assert_eq!(format_amount(-250, "USD").value, "-2.50");
	}

	#[test]
	fn formatted_money_serializes_with_paypal_field_names() {
		let payload = serde_json::to_value(format_amount(2500, "USD"))
			.expect("Money should serialize to JSON.");

		assert_eq!(payload, json!({ "currency_code": "USD", "value": "25.00" }));
	}

	#[test]
	fn minor_units_parse_back() {
		assert_eq!(Money::new("USD", "25.00").minor_units(), Ok(2500));
		assert_eq!(Money::new("USD", "7").minor_units(), Ok(700));
		assert_eq!(Money::new("USD", "-0.05").minor_units(), Ok(-5));
		assert!(Money::new("USD", "1.5").minor_units().is_err());
		assert!(Money::new("USD", "abc").minor_units().is_err());
	}

	#[test]
	fn validation_rejects_small_zero_negative_and_garbage() {
		let policy = AmountPolicy::default().with_minimum("jpy", 50);

		assert_eq!(policy.validate(100, "USD"), Ok(100));
		assert_eq!(
			policy.validate(99, "usd"),
			Err(AmountError::BelowMinimum { amount: 99, minimum: 100, currency: "USD".into() })
		);
		assert_eq!(policy.validate(60, "JPY"), Ok(60));
		assert_eq!(policy.validate(0, "JPY"), Err(AmountError::NonPositive { amount: 0 }));
		assert_eq!(policy.validate(-500, "USD"), Err(AmountError::NonPositive { amount: -500 }));
		assert!(matches!(policy.validate_str("12abc", "USD"), Err(AmountError::NotNumeric { .. })));
		assert_eq!(policy.validate_str(" 2500 ", "USD"), Ok(2500));
		assert!(matches!(
			policy.validate_value(&json!(12.5), "USD"),
			Err(AmountError::NotNumeric { .. })
		));
		assert!(matches!(
			policy.validate_value(&json!(null), "USD"),
			Err(AmountError::NotNumeric { .. })
		));
		assert_eq!(policy.validate_value(&json!("300"), "USD"), Ok(300));
	}
}
