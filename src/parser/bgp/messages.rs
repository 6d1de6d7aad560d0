use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::warn;

use crate::error::ParserError;
use crate::models::*;
use crate::parser::bgp::attributes::parse_attributes;
use crate::parser::{parse_prefix_list, ReadUtils};

/// BGP message
///
/// Format:
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                                                               +
/// |                                                               |
/// +                                                               +
/// |                           Marker                              |
/// +                                                               +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Length               |      Type     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Consumes exactly one message from `data`; anything after it is left in place.
pub fn parse_bgp_message(data: &mut Bytes) -> Result<BgpMessage, ParserError> {
    data.has_n_remaining(BGP_HEADER_LEN)?;
    if data[..BGP_MARKER_LEN] != BGP_MARKER {
        return Err(ParserError::malformed("BGP marker is not all ones"));
    }

    /*
     This 2-octet unsigned integer indicates the total length of the
     message, including the header in octets.  Thus, it allows one
     to locate the (Marker field of the) next message in the TCP
     stream.  The value of the Length field MUST always be at least
     19 and no greater than 4096, and MAY be further constrained,
     depending on the message type.
    */
    let length = u16::from_be_bytes([data[16], data[17]]) as usize;
    if !(BGP_HEADER_LEN..=BGP_MAX_MESSAGE_LEN).contains(&length) {
        return Err(ParserError::malformed(format!(
            "invalid BGP message length {}",
            length
        )));
    }
    data.has_n_remaining(length)?;

    let mut msg = data.split_to(length);
    msg.advance(BGP_MARKER_LEN + 2);
    let msg_type = msg.get_u8();
    parse_bgp_message_body(msg_type, msg)
}

/// Decode a message body whose 19-byte header has already been consumed.
///
/// Unknown message types are kept as [BgpMessage::Unknown].
pub fn parse_bgp_message_body(msg_type: u8, mut body: Bytes) -> Result<BgpMessage, ParserError> {
    let msg_type = match BgpMessageType::try_from(msg_type) {
        Ok(t) => t,
        Err(_) => {
            warn!("unknown BGP message type {}", msg_type);
            return Ok(BgpMessage::Unknown {
                msg_type,
                data: body,
            });
        }
    };

    Ok(match msg_type {
        BgpMessageType::OPEN => BgpMessage::Open(parse_bgp_open_message(&mut body)?),
        BgpMessageType::UPDATE => BgpMessage::Update(parse_bgp_update_message(body)?),
        BgpMessageType::NOTIFICATION => {
            BgpMessage::Notification(parse_bgp_notification_message(body)?)
        }
        BgpMessageType::KEEPALIVE => {
            if !body.is_empty() {
                warn!("KEEPALIVE with {} trailing bytes", body.len());
            }
            BgpMessage::KeepAlive
        }
        BgpMessageType::ROUTE_REFRESH => BgpMessage::RouteRefresh(body),
    })
}

pub fn parse_bgp_notification_message(
    mut input: Bytes,
) -> Result<BgpNotificationMessage, ParserError> {
    let error_code = input.read_u8()?;
    let error_subcode = input.read_u8()?;
    Ok(BgpNotificationMessage {
        error_code,
        error_subcode,
        data: input,
    })
}

impl BgpNotificationMessage {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(2 + self.data.len());
        buf.put_u8(self.error_code);
        buf.put_u8(self.error_subcode);
        buf.put_slice(&self.data);
        buf.freeze()
    }
}

/// Parse BGP OPEN message. Capabilities are decoded for CAPABILITY parameters; any other
/// parameter keeps its raw value.
pub fn parse_bgp_open_message(input: &mut Bytes) -> Result<BgpOpenMessage, ParserError> {
    let version = input.read_u8()?;
    let asn = input.read_u16()?;
    let hold_time = input.read_u16()?;
    let bgp_identifier = input.read_ipv4_address()?;
    let opt_params_len = input.read_u8()? as usize;

    input.has_n_remaining(opt_params_len)?;
    let mut params_data = input.split_to(opt_params_len);

    let mut opt_params: Vec<OptParam> = vec![];
    while params_data.has_remaining() {
        let param_type = OptParamType::from(params_data.read_u8()?);
        let param_len = params_data.read_u8()? as usize;
        let mut value = params_data.read_n_bytes(param_len)?;

        // https://tools.ietf.org/html/rfc3392
        // https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-11
        let param_value = match param_type {
            OptParamType::CAPABILITY => {
                let mut capabilities = vec![];
                while value.has_remaining() {
                    capabilities.push(Capability::parse(&mut value)?);
                }
                ParamValue::Capabilities(capabilities)
            }
            _ => ParamValue::Raw(value),
        };
        opt_params.push(OptParam {
            param_type,
            param_value,
        });
    }

    if input.has_remaining() {
        warn!("{} bytes after OPEN optional parameters", input.remaining());
    }

    Ok(BgpOpenMessage {
        version,
        asn,
        hold_time,
        bgp_identifier,
        opt_params,
    })
}

impl OptParam {
    pub fn encode(&self) -> Bytes {
        let value = match &self.param_value {
            ParamValue::Raw(raw) => raw.clone(),
            ParamValue::Capabilities(caps) => {
                let mut buf = BytesMut::new();
                for cap in caps {
                    buf.extend(cap.encode());
                }
                buf.freeze()
            }
        };
        let mut buf = BytesMut::with_capacity(2 + value.len());
        buf.put_u8(self.param_type.into());
        buf.put_u8(value.len() as u8);
        buf.put_slice(&value);
        buf.freeze()
    }
}

impl BgpOpenMessage {
    pub fn encode(&self) -> Bytes {
        let mut params = BytesMut::new();
        for param in &self.opt_params {
            params.extend(param.encode());
        }

        let mut buf = BytesMut::with_capacity(10 + params.len());
        buf.put_u8(self.version);
        buf.put_u16(self.asn);
        buf.put_u16(self.hold_time);
        buf.put_slice(&self.bgp_identifier.octets());
        buf.put_u8(params.len() as u8);
        buf.put_slice(&params);
        buf.freeze()
    }
}

/// read nlri portion of a bgp update message.
fn read_nlri(input: &mut Bytes, length: usize) -> Result<Vec<Prefix>, ParserError> {
    input.has_n_remaining(length)?;
    parse_prefix_list(input.split_to(length))
}

/// read bgp update message.
pub fn parse_bgp_update_message(mut input: Bytes) -> Result<BgpUpdateMessage, ParserError> {
    // parse withdrawn prefixes nlri
    let withdrawn_length = input.read_u16()? as usize;
    let withdrawn_prefixes = read_nlri(&mut input, withdrawn_length)?;

    // parse attributes
    let attribute_length = input.read_u16()? as usize;
    input.has_n_remaining(attribute_length)?;
    let attributes = parse_attributes(input.split_to(attribute_length))?;

    // parse announced prefixes nlri; everything left belongs to it
    let announced_prefixes = parse_prefix_list(input)?;

    Ok(BgpUpdateMessage {
        withdrawn_prefixes,
        attributes,
        announced_prefixes,
    })
}

impl BgpUpdateMessage {
    pub fn encode(&self) -> Bytes {
        let mut withdrawn = BytesMut::new();
        for prefix in &self.withdrawn_prefixes {
            withdrawn.extend(prefix.encode());
        }
        let attributes = self.attributes.encode();

        let mut buf = BytesMut::with_capacity(4 + withdrawn.len() + attributes.len());
        buf.put_u16(withdrawn.len() as u16);
        buf.put_slice(&withdrawn);
        buf.put_u16(attributes.len() as u16);
        buf.put_slice(&attributes);
        for prefix in &self.announced_prefixes {
            buf.extend(prefix.encode());
        }
        buf.freeze()
    }

    /// Whether this UPDATE is the end-of-RIB marker: no withdrawals, no attributes and no
    /// announcements.
    pub fn is_end_of_rib(&self) -> bool {
        self.withdrawn_prefixes.is_empty()
            && self.attributes.is_empty()
            && self.announced_prefixes.is_empty()
    }
}

impl BgpMessage {
    /// The message body, without the 19-byte header.
    pub fn encode_body(&self) -> Bytes {
        match self {
            BgpMessage::Open(msg) => msg.encode(),
            BgpMessage::Update(msg) => msg.encode(),
            BgpMessage::Notification(msg) => msg.encode(),
            BgpMessage::KeepAlive => Bytes::new(),
            BgpMessage::RouteRefresh(data) | BgpMessage::Unknown { data, .. } => data.clone(),
        }
    }

    /// The full message, marker and header included.
    pub fn encode(&self) -> Bytes {
        let body = self.encode_body();
        let mut buf = BytesMut::with_capacity(BGP_HEADER_LEN + body.len());
        buf.put_slice(&BGP_MARKER);
        buf.put_u16((BGP_HEADER_LEN + body.len()) as u16);
        buf.put_u8(self.msg_type());
        buf.put_slice(&body);
        buf.freeze()
    }
}
