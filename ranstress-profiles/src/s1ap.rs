//! S1AP-facing message profiles
//!
//! Paging storms and E-RAB (bearer) setup/modify floods. All share the
//! testbed's 0x12345678 message header.

use ranstress_core::{ByteField, RandomizedTemplate, Result};

pub const PAGING: &str = "paging";
pub const ERAB_SETUP_REQUEST: &str = "erab-setup-request";
pub const ERAB_MODIFY_REQUEST: &str = "erab-modify-request";

const MESSAGE_HEADER: u32 = 0x1234_5678;

/// Paging message
///
/// Layout: header | message type 0x0002 | IMSI (u64, randomized) |
/// paging cause 0x0001.
pub fn paging() -> Result<RandomizedTemplate> {
    let mut template = Vec::with_capacity(16);
    template.extend_from_slice(&MESSAGE_HEADER.to_be_bytes());
    template.extend_from_slice(&0x0002u16.to_be_bytes());
    template.extend_from_slice(&0u64.to_be_bytes());
    template.extend_from_slice(&0x0001u16.to_be_bytes());
    RandomizedTemplate::new(template, vec![ByteField::new(6, 8)], PAGING)
}

/// Header | message type | UE id (u32) | bearer id | QCI | GBR | MBR.
/// UE and bearer identities are randomized per send.
fn erab_template(
    message_type: u16,
    qci: u8,
    gbr: u32,
    mbr: u32,
    tag: &'static str,
) -> Result<RandomizedTemplate> {
    let mut template = Vec::with_capacity(20);
    template.extend_from_slice(&MESSAGE_HEADER.to_be_bytes());
    template.extend_from_slice(&message_type.to_be_bytes());
    template.extend_from_slice(&0u32.to_be_bytes()); // UE id
    template.push(0x00); // bearer id
    template.push(qci);
    template.extend_from_slice(&gbr.to_be_bytes());
    template.extend_from_slice(&mbr.to_be_bytes());
    RandomizedTemplate::new(
        template,
        vec![ByteField::new(6, 4), ByteField::new(10, 1)],
        tag,
    )
}

/// E-RAB Setup Request
pub fn erab_setup_request() -> Result<RandomizedTemplate> {
    erab_template(0x0003, 0x01, 0x0000_0001, 0x0000_0002, ERAB_SETUP_REQUEST)
}

/// E-RAB Modify Request
pub fn erab_modify_request() -> Result<RandomizedTemplate> {
    erab_template(0x0004, 0x02, 0x0000_0003, 0x0000_0004, ERAB_MODIFY_REQUEST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranstress_core::PayloadGenerator;

    #[test]
    fn test_paging_layout() {
        let gen = paging().unwrap();
        let payload = gen.generate(0);
        let data = payload.data();
        assert_eq!(data.len(), 16);
        assert_eq!(&data[0..4], &MESSAGE_HEADER.to_be_bytes());
        assert_eq!(&data[4..6], &[0x00, 0x02]);
        assert_eq!(&data[14..16], &[0x00, 0x01]);
    }

    #[test]
    fn test_erab_setup_layout() {
        let gen = erab_setup_request().unwrap();
        let payload = gen.generate(0);
        let data = payload.data();
        assert_eq!(data.len(), 20);
        assert_eq!(&data[4..6], &[0x00, 0x03]);
        assert_eq!(data[11], 0x01); // QCI fixed
        assert_eq!(&data[12..16], &[0x00, 0x00, 0x00, 0x01]);
        assert_eq!(&data[16..20], &[0x00, 0x00, 0x00, 0x02]);
    }

    #[test]
    fn test_erab_modify_layout() {
        let gen = erab_modify_request().unwrap();
        let data = gen.generate(0);
        assert_eq!(&data.data()[4..6], &[0x00, 0x04]);
        assert_eq!(data.data()[11], 0x02);
    }

    #[test]
    fn test_imsi_varies_in_paging() {
        let gen = paging().unwrap();
        let imsis: std::collections::HashSet<Vec<u8>> = (0..200)
            .map(|seq| gen.generate(seq).data()[6..14].to_vec())
            .collect();
        assert!(imsis.len() > 1);
    }
}
