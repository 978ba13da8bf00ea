use serde::Deserialize;

use super::frame::IngestError;

/// Session lifecycle command, received on the control topic.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum SessionCommand {
    Start {
        #[serde(default)]
        session_id: Option<String>,
        #[serde(default)]
        network_type: Option<String>,
        #[serde(default)]
        resolution: Option<String>,
    },
    Stop,
    Reset,
    Export,
}

#[cfg(test)]
impl SessionCommand {
    pub(crate) fn start_default() -> Self {
        Self::Start {
            session_id: None,
            network_type: None,
            resolution: None,
        }
    }
}

pub fn parse_command(payload: &[u8]) -> Result<SessionCommand, IngestError> {
    let payload_str = std::str::from_utf8(payload)?;
    Ok(serde_json::from_str::<SessionCommand>(payload_str)?)
}
