//! LTE control-plane message profiles
//!
//! Each profile is a payload template with the identity fields marked
//! for per-send randomization. Profiles carry no engine logic of their
//! own: a former standalone attack script is reduced to one template
//! value handed to the generic engine.
//!
//! The byte layouts are the simplified testbed encodings, not
//! standards-conformant ASN.1.

pub mod nas;
pub mod rrc;
pub mod s1ap;

use ranstress_core::{Error, PayloadGenerator, RandomizedTemplate, Result};
use std::sync::Arc;

/// One entry in the profile catalog
#[derive(Debug, Clone, Copy)]
pub struct ProfileEntry {
    pub name: &'static str,
    pub description: &'static str,
}

/// All known profiles, in display order
pub fn catalog() -> Vec<ProfileEntry> {
    vec![
        ProfileEntry {
            name: rrc::CONNECTION_REQUEST,
            description: "RRC Connection Request with random UE identity",
        },
        ProfileEntry {
            name: rrc::REESTABLISHMENT_REQUEST,
            description: "RRC Connection Reestablishment Request with random C-RNTI/PCI/ShortMAC-I",
        },
        ProfileEntry {
            name: rrc::MEASUREMENT_REPORT,
            description: "RRC Measurement Report with random cell measurements",
        },
        ProfileEntry {
            name: nas::ATTACH_REQUEST,
            description: "NAS Attach Request with random IMSI",
        },
        ProfileEntry {
            name: nas::TAU_REQUEST,
            description: "NAS Tracking Area Update Request with random GUTI",
        },
        ProfileEntry {
            name: nas::DETACH_REQUEST,
            description: "NAS Detach Request with random IMSI",
        },
        ProfileEntry {
            name: s1ap::PAGING,
            description: "Paging message with random IMSI",
        },
        ProfileEntry {
            name: s1ap::ERAB_SETUP_REQUEST,
            description: "E-RAB Setup Request with random UE and bearer identities",
        },
        ProfileEntry {
            name: s1ap::ERAB_MODIFY_REQUEST,
            description: "E-RAB Modify Request with random UE and bearer identities",
        },
    ]
}

/// Resolve a profile name to its generator
pub fn lookup(name: &str) -> Result<Arc<dyn PayloadGenerator>> {
    let template: RandomizedTemplate = match name {
        rrc::CONNECTION_REQUEST => rrc::connection_request()?,
        rrc::REESTABLISHMENT_REQUEST => rrc::reestablishment_request()?,
        rrc::MEASUREMENT_REPORT => rrc::measurement_report()?,
        nas::ATTACH_REQUEST => nas::attach_request()?,
        nas::TAU_REQUEST => nas::tau_request()?,
        nas::DETACH_REQUEST => nas::detach_request()?,
        s1ap::PAGING => s1ap::paging()?,
        s1ap::ERAB_SETUP_REQUEST => s1ap::erab_setup_request()?,
        s1ap::ERAB_MODIFY_REQUEST => s1ap::erab_modify_request()?,
        other => return Err(Error::UnknownProfile(other.to_string())),
    };
    Ok(Arc::new(template))
}
