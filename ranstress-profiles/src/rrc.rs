//! RRC message profiles
//!
//! Simplified RRC encodings used against the testbed eNB: a connection
//! request carrying a random UE identity, a reestablishment request
//! with random C-RNTI/PCI/ShortMAC-I, and a measurement report with
//! random per-cell radio measurements.

use ranstress_core::{ByteField, RandomizedTemplate, Result};

pub const CONNECTION_REQUEST: &str = "rrc-connection-request";
pub const REESTABLISHMENT_REQUEST: &str = "rrc-reestablishment-request";
pub const MEASUREMENT_REPORT: &str = "rrc-measurement-report";

/// RRC Connection Request
///
/// Layout: UE identity (u32, randomized) | message type 0x0001 |
/// establishment cause 0x0000.
pub fn connection_request() -> Result<RandomizedTemplate> {
    let mut template = Vec::with_capacity(8);
    template.extend_from_slice(&0u32.to_be_bytes());
    template.extend_from_slice(&0x0001u16.to_be_bytes());
    template.extend_from_slice(&0x0000u16.to_be_bytes());
    RandomizedTemplate::new(template, vec![ByteField::new(0, 4)], CONNECTION_REQUEST)
}

/// RRC Connection Reestablishment Request
///
/// Layout: message type 0x02 | C-RNTI (u16) | PCI (u16) |
/// ShortMAC-I (u16); all three identity fields randomized.
pub fn reestablishment_request() -> Result<RandomizedTemplate> {
    let mut template = Vec::with_capacity(7);
    template.push(0x02);
    template.extend_from_slice(&0u16.to_be_bytes());
    template.extend_from_slice(&0u16.to_be_bytes());
    template.extend_from_slice(&0u16.to_be_bytes());
    RandomizedTemplate::new(template, vec![ByteField::new(1, 6)], REESTABLISHMENT_REQUEST)
}

/// RRC Measurement Report
///
/// Layout: message type 0x0005 | UE identity (u32) | 4 neighbor cells,
/// each cell id (u16) + RSRP + RSRQ + SINR. UE identity and every cell
/// block are randomized.
pub fn measurement_report() -> Result<RandomizedTemplate> {
    let mut template = Vec::with_capacity(26);
    template.extend_from_slice(&0x0005u16.to_be_bytes());
    template.extend_from_slice(&0u32.to_be_bytes());
    for _ in 0..4 {
        template.extend_from_slice(&0u16.to_be_bytes()); // cell id
        template.push(0); // RSRP
        template.push(0); // RSRQ
        template.push(0); // SINR
    }
    RandomizedTemplate::new(
        template,
        vec![ByteField::new(2, 4), ByteField::new(6, 20)],
        MEASUREMENT_REPORT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranstress_core::PayloadGenerator;

    #[test]
    fn test_connection_request_layout() {
        let gen = connection_request().unwrap();
        let payload = gen.generate(0);
        let data = payload.data();
        assert_eq!(data.len(), 8);
        // Message type and establishment cause stay fixed
        assert_eq!(&data[4..6], &[0x00, 0x01]);
        assert_eq!(&data[6..8], &[0x00, 0x00]);
    }

    #[test]
    fn test_reestablishment_request_layout() {
        let gen = reestablishment_request().unwrap();
        let payload = gen.generate(0);
        assert_eq!(payload.len(), 7);
        assert_eq!(payload.data()[0], 0x02);
    }

    #[test]
    fn test_measurement_report_layout() {
        let gen = measurement_report().unwrap();
        let payload = gen.generate(0);
        assert_eq!(payload.len(), 26);
        assert_eq!(&payload.data()[0..2], &[0x00, 0x05]);
    }

    #[test]
    fn test_ue_identity_varies() {
        let gen = connection_request().unwrap();
        let identities: std::collections::HashSet<Vec<u8>> = (0..200)
            .map(|seq| gen.generate(seq).data()[0..4].to_vec())
            .collect();
        assert!(identities.len() > 1);
    }
}
