//! # ABI Codec
//!
//! Minimal Solidity ABI encoding for the argument shapes the FlightSurety
//! contracts use (`address`, `uint256`, `string`) and decoding for `bool`
//! returns and `Error(string)` revert payloads.

use super::errors::ChainCallError;
use super::value_objects::{Address, ContractMethod, U256};
use sha3::{Digest, Keccak256};

/// ABI word size.
const WORD: usize = 32;

/// `Error(string)` selector.
const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// A single call argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// `address`
    Address(Address),
    /// `uint256`
    Uint(U256),
    /// `string` (dynamic)
    String(String),
}

/// First four bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

/// Encode calldata for `method` with the given arguments.
pub fn encode_call(method: ContractMethod, tokens: &[Token]) -> Vec<u8> {
    let mut out = selector(method.signature()).to_vec();
    out.extend_from_slice(&encode_tokens(tokens));
    out
}

/// Encode a tuple of tokens (head + tail layout).
pub fn encode_tokens(tokens: &[Token]) -> Vec<u8> {
    let head_len = WORD * tokens.len();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        match token {
            Token::Address(addr) => {
                let mut word = [0u8; WORD];
                word[12..].copy_from_slice(addr.as_bytes());
                head.extend_from_slice(&word);
            }
            Token::Uint(value) => head.extend_from_slice(&uint_word(*value)),
            Token::String(s) => {
                head.extend_from_slice(&uint_word(U256::from(head_len + tail.len())));
                tail.extend_from_slice(&uint_word(U256::from(s.len())));
                tail.extend_from_slice(s.as_bytes());
                let pad = (WORD - s.len() % WORD) % WORD;
                tail.extend(std::iter::repeat(0u8).take(pad));
            }
        }
    }

    head.extend_from_slice(&tail);
    head
}

fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

/// Decode a single `bool` return value.
pub fn decode_bool(data: &[u8]) -> Result<bool, ChainCallError> {
    if data.len() < WORD {
        return Err(ChainCallError::Decode(format!(
            "bool return needs {} bytes, got {}",
            WORD,
            data.len()
        )));
    }
    let word = &data[..WORD];
    if word[..WORD - 1].iter().any(|b| *b != 0) || word[WORD - 1] > 1 {
        return Err(ChainCallError::Decode("bool word out of range".to_string()));
    }
    Ok(word[WORD - 1] == 1)
}

/// Extract the reason string from an `Error(string)` revert payload.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if data.len() < 4 + 2 * WORD || data[..4] != ERROR_SELECTOR {
        return None;
    }
    let body = &data[4..];
    let offset = read_usize(&body[..WORD])?;
    let len_start = offset;
    let len = read_usize(body.get(len_start..len_start + WORD)?)?;
    let bytes = body.get(len_start + WORD..len_start + WORD + len)?;
    String::from_utf8(bytes.to_vec()).ok()
}

fn read_usize(word: &[u8]) -> Option<usize> {
    let value = U256::from_big_endian(word);
    if value > U256::from(usize::MAX) {
        return None;
    }
    Some(value.as_usize())
}

/// Decode a `0x`-prefixed hex payload.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, ChainCallError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(stripped).map_err(|e| ChainCallError::Decode(e.to_string()))
}
