use crate::services::{Device, ServiceError};

/// Parses `<cli> device --json` output: either one JSON array, or one JSON
/// object per line. Non-JSON lines (banners, warnings) are skipped.
pub fn parse_devices(output: &str) -> Result<Vec<Device>, ServiceError> {
    let trimmed = output.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| ServiceError::Parse(format!("device list: {e}")));
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .map(|line| {
            serde_json::from_str::<Device>(line)
                .map_err(|e| ServiceError::Parse(format!("device entry: {e}")))
        })
        .collect()
}
