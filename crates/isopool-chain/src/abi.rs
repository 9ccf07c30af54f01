// Minimal ABI encoding/decoding
//
// The harness calls a fixed, small contract surface, so the encoding is
// written out rather than generated: selectors, head/tail encoding for the
// argument types that actually occur (address, uint, bool, string,
// address[]), and decoding for return words, strings, and revert reasons.

use alloy_primitives::{keccak256, Address, U256};
use thiserror::Error;

use isopool_error::ChainError;

/// Selector of the standard `Error(string)` revert payload
pub const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

const WORD: usize = 32;

/// Errors from return-data decoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("return data too short: {len} bytes, need {need}")]
    ShortData { len: usize, need: usize },

    #[error("dynamic offset {0} out of bounds")]
    BadOffset(usize),

    #[error("string payload is not valid UTF-8")]
    BadUtf8,
}

impl From<AbiError> for ChainError {
    fn from(err: AbiError) -> Self {
        ChainError::contract(err.to_string())
    }
}

/// One encodable argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Uint(U256),
    Uint8(u8),
    Bool(bool),
    String(String),
    AddressArray(Vec<Address>),
}

impl Token {
    fn is_dynamic(&self) -> bool {
        matches!(self, Token::String(_) | Token::AddressArray(_))
    }

    fn head_word(&self) -> [u8; 32] {
        match self {
            Token::Address(addr) => addr.into_word().0,
            Token::Uint(value) => value.to_be_bytes::<32>(),
            Token::Uint8(value) => U256::from(*value).to_be_bytes::<32>(),
            Token::Bool(value) => U256::from(*value as u8).to_be_bytes::<32>(),
            // Dynamic tokens get an offset word instead
            Token::String(_) | Token::AddressArray(_) => unreachable!("dynamic token has no head"),
        }
    }

    fn tail(&self) -> Vec<u8> {
        match self {
            Token::String(s) => {
                let mut out = U256::from(s.len()).to_be_bytes::<32>().to_vec();
                out.extend_from_slice(s.as_bytes());
                let padding = (WORD - s.len() % WORD) % WORD;
                out.extend(std::iter::repeat(0u8).take(padding));
                out
            }
            Token::AddressArray(addrs) => {
                let mut out = U256::from(addrs.len()).to_be_bytes::<32>().to_vec();
                for addr in addrs {
                    out.extend_from_slice(&addr.into_word().0);
                }
                out
            }
            _ => Vec::new(),
        }
    }
}

/// First four bytes of `keccak256(signature)`
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Full calldata for a function call: selector plus encoded arguments
pub fn encode_call(signature: &str, tokens: &[Token]) -> Vec<u8> {
    let mut out = selector(signature).to_vec();
    out.extend(encode_tokens(tokens));
    out
}

/// Standard head/tail argument encoding
pub fn encode_tokens(tokens: &[Token]) -> Vec<u8> {
    let head_len = WORD * tokens.len();
    let mut heads = Vec::with_capacity(head_len);
    let mut tails: Vec<u8> = Vec::new();
    for token in tokens {
        if token.is_dynamic() {
            let offset = head_len + tails.len();
            heads.extend_from_slice(&U256::from(offset).to_be_bytes::<32>());
            tails.extend(token.tail());
        } else {
            heads.extend_from_slice(&token.head_word());
        }
    }
    heads.extend(tails);
    heads
}

fn word(data: &[u8], index: usize) -> Result<&[u8], AbiError> {
    let start = index * WORD;
    let end = start + WORD;
    if data.len() < end {
        return Err(AbiError::ShortData {
            len: data.len(),
            need: end,
        });
    }
    Ok(&data[start..end])
}

/// Decode the word at `index` as an address (last 20 bytes)
pub fn decode_address(data: &[u8], index: usize) -> Result<Address, AbiError> {
    Ok(Address::from_slice(&word(data, index)?[12..]))
}

/// Decode the word at `index` as a uint256
pub fn decode_u256(data: &[u8], index: usize) -> Result<U256, AbiError> {
    Ok(U256::from_be_slice(word(data, index)?))
}

/// Decode a single returned `string`
pub fn decode_string(data: &[u8]) -> Result<String, AbiError> {
    let offset = usize::try_from(decode_u256(data, 0)?).map_err(|_| AbiError::BadOffset(0))?;
    if data.len() < offset + WORD {
        return Err(AbiError::BadOffset(offset));
    }
    let len = usize::try_from(U256::from_be_slice(&data[offset..offset + WORD]))
        .map_err(|_| AbiError::BadOffset(offset))?;
    let start = offset + WORD;
    if data.len() < start + len {
        return Err(AbiError::ShortData {
            len: data.len(),
            need: start + len,
        });
    }
    String::from_utf8(data[start..start + len].to_vec()).map_err(|_| AbiError::BadUtf8)
}

/// Extract the reason from an `Error(string)` revert payload, if that is
/// what the data carries.
pub fn decode_revert(data: &[u8]) -> Option<String> {
    if data.len() < 4 || data[..4] != ERROR_SELECTOR {
        return None;
    }
    decode_string(&data[4..]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_match_known_erc20_values() {
        assert_eq!(selector("symbol()"), [0x95, 0xd8, 0x9b, 0x41]);
        assert_eq!(selector("name()"), [0x06, 0xfd, 0xde, 0x03]);
        assert_eq!(selector("decimals()"), [0x31, 0x3c, 0xe5, 0x67]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("Error(string)"), ERROR_SELECTOR);
    }

    #[test]
    fn encodes_static_arguments() {
        let to = Address::repeat_byte(0xaa);
        let data = encode_call(
            "transfer(address,uint256)",
            &[Token::Address(to), Token::Uint(U256::from(1))],
        );
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(decode_address(&data[4..], 0).unwrap(), to);
        assert_eq!(decode_u256(&data[4..], 1).unwrap(), U256::from(1));
    }

    #[test]
    fn encodes_dynamic_string() {
        let encoded = encode_tokens(&[Token::String("DAI".to_string())]);
        // offset word, length word, one padded data word
        assert_eq!(encoded.len(), 96);
        assert_eq!(decode_u256(&encoded, 0).unwrap(), U256::from(32));
        assert_eq!(decode_string(&encoded).unwrap(), "DAI");
    }

    #[test]
    fn encodes_mixed_static_and_dynamic() {
        let oracle = Address::repeat_byte(0x05);
        let member = Address::repeat_byte(0x07);
        let encoded = encode_tokens(&[
            Token::String("TEST".to_string()),
            Token::Bool(true),
            Token::Uint(U256::from(20)),
            Token::Address(oracle),
            Token::AddressArray(vec![member]),
        ]);
        // five head words
        assert_eq!(decode_u256(&encoded, 0).unwrap(), U256::from(5 * 32));
        assert_eq!(decode_u256(&encoded, 1).unwrap(), U256::from(1));
        assert_eq!(decode_u256(&encoded, 2).unwrap(), U256::from(20));
        assert_eq!(decode_address(&encoded, 3).unwrap(), oracle);
        // string tail sits right after the heads, array tail after it
        let array_offset = usize::try_from(decode_u256(&encoded, 4).unwrap()).unwrap();
        assert_eq!(array_offset, 5 * 32 + 64);
        let array = &encoded[array_offset..];
        assert_eq!(decode_u256(array, 0).unwrap(), U256::from(1));
        assert_eq!(decode_address(array, 1).unwrap(), member);
        assert_eq!(decode_string(&encoded).unwrap(), "TEST");
    }

    #[test]
    fn decodes_revert_reason() {
        let mut data = ERROR_SELECTOR.to_vec();
        data.extend(encode_tokens(&[Token::String("CF_TOO_HIGH".to_string())]));
        assert_eq!(decode_revert(&data).as_deref(), Some("CF_TOO_HIGH"));

        assert_eq!(decode_revert(&[0x01, 0x02]), None);
        assert_eq!(decode_revert(&encode_call("symbol()", &[])), None);
    }

    #[test]
    fn short_data_is_rejected() {
        assert!(matches!(
            decode_address(&[0u8; 16], 0),
            Err(AbiError::ShortData { .. })
        ));
        assert!(decode_string(&[0u8; 32]).is_err());
    }
}
