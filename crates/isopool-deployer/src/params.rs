// Positional market-parameter parsing
//
// The CLI takes the whole asset configuration as one comma-separated string
// of positional fields. The schema is explicit: thirteen named fields in a
// fixed order, each with a declared type, checked before anything touches
// the chain. The trailing plugin/rewards fields may be empty, which parses
// to "unset".

use std::str::FromStr;

use alloy_primitives::Address;

use isopool_error::ParseError;
use isopool_types::{parse_ether, MarketDelegate, MarketSpec, Ratio};

/// Field names, in wire order. Arity errors report against this schema.
pub const FIELDS: [&str; 13] = [
    "pool_name",
    "creator",
    "delegate",
    "underlying",
    "interest_rate_model",
    "initial_exchange_rate",
    "collateral_factor",
    "reserve_factor",
    "admin_fee",
    "bypass_price_feed_check",
    "plugin",
    "rewards_distributor",
    "reward_token",
];

/// Parse `"pool,creator,delegate,underlying,irm,rate,cf,rf,fee,bypass,,,"`
/// into a typed `MarketSpec`. No chain interaction on any path.
pub fn parse_market_spec(input: &str) -> Result<MarketSpec, ParseError> {
    let fields: Vec<&str> = input.split(',').map(str::trim).collect();
    if fields.len() != FIELDS.len() {
        return Err(ParseError::Arity {
            expected: FIELDS.len(),
            found: fields.len(),
        });
    }

    Ok(MarketSpec {
        pool_name: required(0, &fields)?.to_string(),
        creator: required(1, &fields)?.to_string(),
        delegate: parse_field::<MarketDelegate>(2, &fields)?,
        underlying: parse_field::<Address>(3, &fields)?,
        interest_rate_model: parse_field::<Address>(4, &fields)?,
        initial_exchange_rate: parse_ether(required(5, &fields)?)
            .map_err(|e| ParseError::field(FIELDS[5], fields[5], e.to_string()))?,
        collateral_factor: parse_field::<Ratio>(6, &fields)?,
        reserve_factor: parse_field::<Ratio>(7, &fields)?,
        admin_fee: parse_field::<Ratio>(8, &fields)?,
        bypass_price_feed_check: parse_bool(9, &fields)?,
        plugin: optional_address(10, &fields)?,
        rewards_distributor: optional_address(11, &fields)?,
        reward_token: optional_address(12, &fields)?,
    })
}

fn required<'a>(index: usize, fields: &[&'a str]) -> Result<&'a str, ParseError> {
    let value = fields[index];
    if value.is_empty() {
        return Err(ParseError::field(
            FIELDS[index],
            value,
            "field is required",
        ));
    }
    Ok(value)
}

fn parse_field<T>(index: usize, fields: &[&str]) -> Result<T, ParseError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = required(index, fields)?;
    value
        .parse::<T>()
        .map_err(|e| ParseError::field(FIELDS[index], value, e.to_string()))
}

fn parse_bool(index: usize, fields: &[&str]) -> Result<bool, ParseError> {
    match required(index, fields)? {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ParseError::field(
            FIELDS[index],
            other,
            "expected \"true\" or \"false\"",
        )),
    }
}

fn optional_address(index: usize, fields: &[&str]) -> Result<Option<Address>, ParseError> {
    let value = fields[index];
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<Address>()
        .map(Some)
        .map_err(|e| ParseError::field(FIELDS[index], value, e.to_string()))
}
