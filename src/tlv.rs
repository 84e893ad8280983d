//! OTR TLV framing for SMP messages.
//!
//! A TLV is a 2-byte type, a 2-byte value length and the value, all big-endian.
//! The value of every SMP TLV is a 4-byte MPI count followed by the MPIs, each a
//! 4-byte length and a big-endian magnitude. SMP1Q puts the question and a NUL
//! byte in front of that.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::protocol::{Message, MessageKind};
use crate::{Error, Result};

/// TLV type for SMP1.
pub const TYPE_SMP1: u16 = 0x0002;
/// TLV type for SMP2.
pub const TYPE_SMP2: u16 = 0x0003;
/// TLV type for SMP3.
pub const TYPE_SMP3: u16 = 0x0004;
/// TLV type for SMP4.
pub const TYPE_SMP4: u16 = 0x0005;
/// TLV type for SMP abort.
pub const TYPE_ABORT: u16 = 0x0006;
/// TLV type for SMP1 with a question.
pub const TYPE_SMP1Q: u16 = 0x0007;

/// The TLV type carrying `kind`.
pub fn tlv_type(kind: MessageKind) -> u16 {
    match kind {
        MessageKind::Smp1 => TYPE_SMP1,
        MessageKind::Smp1Q => TYPE_SMP1Q,
        MessageKind::Smp2 => TYPE_SMP2,
        MessageKind::Smp3 => TYPE_SMP3,
        MessageKind::Smp4 => TYPE_SMP4,
        MessageKind::Abort => TYPE_ABORT,
    }
}

fn message_kind(tlv_type: u16) -> Result<MessageKind> {
    Ok(match tlv_type {
        TYPE_SMP1 => MessageKind::Smp1,
        TYPE_SMP1Q => MessageKind::Smp1Q,
        TYPE_SMP2 => MessageKind::Smp2,
        TYPE_SMP3 => MessageKind::Smp3,
        TYPE_SMP4 => MessageKind::Smp4,
        TYPE_ABORT => MessageKind::Abort,
        other => return Err(Error::UnknownTlvType(other)),
    })
}

fn put_mpi(out: &mut Vec<u8>, value: &BigUint) {
    let bytes = if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    };
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(&bytes);
}

/// Encodes `message` as a single TLV.
///
/// # Errors
///
/// - [`Error::MalformedTlv`] if an SMP1Q question contains a NUL byte, which
///   would end the question early on the wire.
/// - [`Error::TlvTooLong`] if the value does not fit the 16-bit length field.
pub fn encode(message: &Message) -> Result<Vec<u8>> {
    let mpis = message.to_mpis();

    let mut value = Vec::new();
    if let Message::Smp1Q(msg) = message {
        if msg.question().contains('\0') {
            return Err(Error::MalformedTlv("question contains a NUL byte".into()));
        }
        value.extend_from_slice(msg.question().as_bytes());
        value.push(0);
    }
    value.extend_from_slice(&(mpis.len() as u32).to_be_bytes());
    for mpi in &mpis {
        put_mpi(&mut value, mpi);
    }

    let len = u16::try_from(value.len()).map_err(|_| Error::TlvTooLong(value.len()))?;

    let mut tlv = Vec::with_capacity(4 + value.len());
    tlv.extend_from_slice(&tlv_type(message.kind()).to_be_bytes());
    tlv.extend_from_slice(&len.to_be_bytes());
    tlv.extend_from_slice(&value);
    Ok(tlv)
}

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if self.buf.len() < n {
            return Err(Error::MalformedTlv(format!(
                "truncated {what}: need {n} bytes, have {}",
                self.buf.len()
            )));
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn u16(&mut self, what: &str) -> Result<u16> {
        let bytes = self.take(2, what)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        let bytes = self.take(4, what)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn mpi(&mut self) -> Result<BigUint> {
        let len = self.u32("MPI length")? as usize;
        Ok(BigUint::from_bytes_be(self.take(len, "MPI")?))
    }

    fn mpis(&mut self) -> Result<Vec<BigUint>> {
        let count = self.u32("MPI count")? as usize;
        // Every MPI takes at least four bytes.
        if count > self.buf.len() / 4 {
            return Err(Error::MalformedTlv(format!(
                "{count} MPIs cannot fit in {} bytes",
                self.buf.len()
            )));
        }
        (0..count).map(|_| self.mpi()).collect()
    }
}

/// Decodes the first TLV in `bytes`.
///
/// Bytes after the declared value length belong to the next TLV and are
/// ignored. An Abort is accepted with any payload, including none.
///
/// # Errors
///
/// - [`Error::MalformedTlv`] if the buffer is truncated or an SMP1Q lacks its NUL.
/// - [`Error::UnknownTlvType`] if the type is not an SMP type.
/// - [`Error::InvalidElementCount`] if the MPI count does not match the type.
pub fn decode(bytes: &[u8]) -> Result<Message> {
    let mut reader = Reader { buf: bytes };
    let kind = message_kind(reader.u16("type")?)?;
    let len = reader.u16("length")? as usize;
    let mut value = &reader.take(len, "value")?[..];

    if kind == MessageKind::Abort {
        return Ok(Message::Abort);
    }

    let question = if kind == MessageKind::Smp1Q {
        let nul = value
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::MalformedTlv("question is not NUL-terminated".into()))?;
        let question = String::from_utf8_lossy(&value[..nul]).into_owned();
        value = &value[nul + 1..];
        Some(question)
    } else {
        None
    };

    let mpis = Reader { buf: value }.mpis()?;
    Message::from_mpis(kind, question.as_deref(), &mpis)
}
