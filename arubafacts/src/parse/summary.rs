//! `show summary` scanner.

use serde::{Deserialize, Serialize};

use super::value_after_colon;

/// Identity fields found in `show summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryFields {
    pub hostname: String,
    pub fqdn: String,
    pub serial_number: String,
}

/// Scan `show summary` output for hostname, FQDN and serial number.
///
/// The first line that yields a value for a field wins. The FQDN is only
/// built once a hostname has been seen, so a `DNSDomain` line above the
/// `Name` line is ignored. One line may feed several fields.
pub fn parse_summary(text: &str) -> SummaryFields {
    let mut fields = SummaryFields::default();

    for line in text.lines() {
        if line.contains("Name") && fields.hostname.is_empty() {
            if let Some(name) = value_after_colon(line) {
                fields.hostname = name.trim().to_lowercase();
            }
        }

        if line.contains("DNSDomain") && !fields.hostname.is_empty() && fields.fqdn.is_empty() {
            // An empty domain still yields "hostname."
            if let Some(domain) = value_after_colon(line) {
                fields.fqdn = format!("{}.{}", fields.hostname, domain.trim());
            }
        }

        // Serial numbers are kept verbatim
        if line.contains("Serial Number") && fields.serial_number.is_empty() {
            if let Some(serial) = value_after_colon(line) {
                fields.serial_number = serial.to_string();
            }
        }
    }

    fields
}
