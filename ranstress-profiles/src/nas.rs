//! NAS signaling message profiles
//!
//! Attach, tracking-area-update, and detach requests aimed at the MME.
//! Each carries a random subscriber identity so every message looks
//! like a distinct UE.

use ranstress_core::{ByteField, RandomizedTemplate, Result};

pub const ATTACH_REQUEST: &str = "nas-attach-request";
pub const TAU_REQUEST: &str = "nas-tau-request";
pub const DETACH_REQUEST: &str = "nas-detach-request";

/// Security header | message type | type flags | key set id | identity (u64)
fn nas_template(header: u8, message_type: u8, tag: &'static str) -> Result<RandomizedTemplate> {
    let mut template = Vec::with_capacity(12);
    template.push(header);
    template.push(message_type);
    template.push(0x00);
    template.push(0x00);
    template.extend_from_slice(&0u64.to_be_bytes());
    RandomizedTemplate::new(template, vec![ByteField::new(4, 8)], tag)
}

/// NAS Attach Request with a random IMSI
pub fn attach_request() -> Result<RandomizedTemplate> {
    nas_template(0x41, 0x07, ATTACH_REQUEST)
}

/// NAS Tracking Area Update Request with a random GUTI
pub fn tau_request() -> Result<RandomizedTemplate> {
    nas_template(0x48, 0x49, TAU_REQUEST)
}

/// NAS Detach Request with a random IMSI
pub fn detach_request() -> Result<RandomizedTemplate> {
    nas_template(0x45, 0x45, DETACH_REQUEST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranstress_core::PayloadGenerator;

    #[test]
    fn test_attach_request_layout() {
        let gen = attach_request().unwrap();
        let payload = gen.generate(0);
        let data = payload.data();
        assert_eq!(data.len(), 12);
        assert_eq!(data[0], 0x41);
        assert_eq!(data[1], 0x07);
        assert_eq!(&data[2..4], &[0x00, 0x00]);
    }

    #[test]
    fn test_tau_request_layout() {
        let gen = tau_request().unwrap();
        let data = gen.generate(0);
        assert_eq!(data.data()[0], 0x48);
        assert_eq!(data.data()[1], 0x49);
    }

    #[test]
    fn test_detach_request_layout() {
        let gen = detach_request().unwrap();
        let data = gen.generate(0);
        assert_eq!(data.data()[0], 0x45);
        assert_eq!(data.data()[1], 0x45);
    }

    #[test]
    fn test_identity_varies_across_messages() {
        let gen = attach_request().unwrap();
        let identities: std::collections::HashSet<Vec<u8>> = (0..200)
            .map(|seq| gen.generate(seq).data()[4..12].to_vec())
            .collect();
        assert!(identities.len() > 1);
    }
}
