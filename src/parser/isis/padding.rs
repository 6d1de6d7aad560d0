//! Padding TLVs for hellos, which must fill the link MTU.
use crate::error::ParserError;
use crate::models::*;
use bytes::Bytes;

/// Largest value a single TLV can carry.
const MAX_PAD_VALUE: usize = 255;
/// A full padding TLV on the wire: two header octets and 255 value octets.
const FULL_PAD_TLV: usize = MAX_PAD_VALUE + 2;

/// The padding TLVs that add exactly `shortfall` octets.
///
/// As many full 255-octet TLVs as fit, then one shorter TLV for the rest. A remainder of one
/// octet cannot be expressed directly (a TLV is at least two octets), so one full TLV is
/// shortened to 254 and followed by an empty one. A shortfall of exactly one octet cannot
/// be padded at all.
pub fn padding_tlvs(shortfall: usize) -> Result<Vec<Tlv>, ParserError> {
    let (full, part) = (shortfall / FULL_PAD_TLV, shortfall % FULL_PAD_TLV);
    let mut lens = vec![MAX_PAD_VALUE; full];
    match part {
        0 => {}
        1 => match lens.last_mut() {
            Some(last) => {
                *last = MAX_PAD_VALUE - 1;
                lens.push(0);
            }
            None => {
                return Err(ParserError::malformed(
                    "cannot pad an IS-IS PDU by a single octet",
                ))
            }
        },
        n => lens.push(n - 2),
    }
    Ok(lens
        .into_iter()
        .map(|len| {
            Tlv::new(
                TlvType::PADDING,
                TlvValue::Padding(Bytes::from(vec![0u8; len])),
            )
        })
        .collect())
}

/// Append padding TLVs so that `frame` encodes to exactly `target_len` octets.
///
/// A frame already at the target is left alone; a longer one is an error.
pub fn pad_frame(frame: &mut IsisFrame, target_len: usize) -> Result<(), ParserError> {
    let len = frame.encoded_len();
    if len > target_len {
        return Err(ParserError::malformed(format!(
            "IS-IS frame of {} octets exceeds padding target {}",
            len, target_len
        )));
    }
    if len == target_len {
        return Ok(());
    }
    let padding = padding_tlvs(target_len - len)?;
    let tlvs = frame
        .pdu
        .tlvs_mut()
        .ok_or_else(|| ParserError::malformed("IS-IS PDU without a TLV area"))?;
    if !tlvs.trailing.is_empty() {
        return Err(ParserError::malformed(
            "cannot pad after a stray trailing octet",
        ));
    }
    tlvs.entries.extend(padding);
    Ok(())
}
